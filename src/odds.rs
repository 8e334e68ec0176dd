use serde::Serialize;

/// A decimal odd, or unavailable when the probability cannot be priced. Serializes to a
/// number or `null`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Odd(Option<f64>);

impl Odd {
    pub const UNAVAILABLE: Odd = Odd(None);

    pub fn value(self) -> Option<f64> {
        self.0
    }

    pub fn is_available(self) -> bool {
        self.0.is_some()
    }
}

pub fn to_odd(p: f64) -> Odd {
    if !p.is_finite() || p <= 0.0 {
        return Odd::UNAVAILABLE;
    }
    let odd = round2(1.0 / p);
    // Subnormal probabilities overflow the inverse.
    if odd.is_finite() { Odd(Some(odd)) } else { Odd::UNAVAILABLE }
}

pub fn to_odd_opt(p: Option<f64>) -> Odd {
    p.map(to_odd).unwrap_or(Odd::UNAVAILABLE)
}

/// Rounds on the exact binary value, ties to even: `3.125` gives `3.12`, `2.675` gives `2.67`.
fn round2(v: f64) -> f64 {
    format!("{v:.2}").parse::<f64>().unwrap_or(v)
}
