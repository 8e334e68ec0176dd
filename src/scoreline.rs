use crate::fixture_row::EXACT_SCORE_PREFIX;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreEntry {
    pub home_goals: u32,
    pub away_goals: u32,
    pub total_goals: u32,
    pub probability: f64,
}

impl ScoreEntry {
    pub fn new(home_goals: u32, away_goals: u32, probability: f64) -> Self {
        Self {
            home_goals,
            away_goals,
            total_goals: home_goals.saturating_add(away_goals),
            probability,
        }
    }

    pub fn label(&self) -> String {
        format!("{}-{}", self.home_goals, self.away_goals)
    }

    pub fn both_score(&self) -> bool {
        self.home_goals > 0 && self.away_goals > 0
    }
}

/// Exact-score entries for one fixture, in field order. Duplicate scorelines are kept.
pub type ScoreTable = Vec<ScoreEntry>;

/// Parses `R:<h>-<a>` into `(h, a)`.
pub fn parse_score_key(key: &str) -> Option<(u32, u32)> {
    let score = key.strip_prefix(EXACT_SCORE_PREFIX)?;
    let mut parts = score.split('-');
    let home = parts.next()?.trim().parse::<u32>().ok()?;
    let away = parts.next()?.trim().parse::<u32>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((home, away))
}

/// Unparseable keys are skipped; the rest still contribute.
pub fn build_score_table<'a, I>(fields: I) -> ScoreTable
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    fields
        .into_iter()
        .filter_map(|(key, prob)| {
            let (h, a) = parse_score_key(key)?;
            Some(ScoreEntry::new(h, a, prob))
        })
        .collect()
}
