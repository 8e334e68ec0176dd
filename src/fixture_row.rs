pub const EXACT_SCORE_PREFIX: &str = "R:";

/// One fixture's named numeric fields, in the order they were inserted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixtureRow {
    fields: Vec<(String, Option<f64>)>,
}

impl FixtureRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a field. Replacing keeps the original position; NaN is stored as missing.
    pub fn insert(&mut self, name: impl Into<String>, value: Option<f64>) {
        let name = name.into();
        let value = value.filter(|v| !v.is_nan());
        if let Some(slot) = self.fields.iter_mut().find(|(k, _)| *k == name) {
            slot.1 = value;
        } else {
            self.fields.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .and_then(|(_, v)| *v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, Option<f64>)> for FixtureRow {
    fn from_iter<I: IntoIterator<Item = (K, Option<f64>)>>(iter: I) -> Self {
        let mut row = FixtureRow::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GoalDiffBucket {
    AwayByMoreThanFive,
    AwayByFive,
    AwayByFour,
    AwayByThree,
    AwayByTwo,
    AwayByOne,
    Level,
    HomeByOne,
    HomeByTwo,
    HomeByThree,
    HomeByFour,
    HomeByFive,
    HomeByMoreThanFive,
}

impl GoalDiffBucket {
    pub const ALL: [GoalDiffBucket; 13] = [
        GoalDiffBucket::AwayByMoreThanFive,
        GoalDiffBucket::AwayByFive,
        GoalDiffBucket::AwayByFour,
        GoalDiffBucket::AwayByThree,
        GoalDiffBucket::AwayByTwo,
        GoalDiffBucket::AwayByOne,
        GoalDiffBucket::Level,
        GoalDiffBucket::HomeByOne,
        GoalDiffBucket::HomeByTwo,
        GoalDiffBucket::HomeByThree,
        GoalDiffBucket::HomeByFour,
        GoalDiffBucket::HomeByFive,
        GoalDiffBucket::HomeByMoreThanFive,
    ];

    pub fn field_name(self) -> &'static str {
        match self {
            GoalDiffBucket::AwayByMoreThanFive => "GD<-5",
            GoalDiffBucket::AwayByFive => "GD=-5",
            GoalDiffBucket::AwayByFour => "GD=-4",
            GoalDiffBucket::AwayByThree => "GD=-3",
            GoalDiffBucket::AwayByTwo => "GD=-2",
            GoalDiffBucket::AwayByOne => "GD=-1",
            GoalDiffBucket::Level => "GD=0",
            GoalDiffBucket::HomeByOne => "GD=1",
            GoalDiffBucket::HomeByTwo => "GD=2",
            GoalDiffBucket::HomeByThree => "GD=3",
            GoalDiffBucket::HomeByFour => "GD=4",
            GoalDiffBucket::HomeByFive => "GD=5",
            GoalDiffBucket::HomeByMoreThanFive => "GD>5",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_home_win(self) -> bool {
        self.index() > GoalDiffBucket::Level.index()
    }

    pub fn is_away_win(self) -> bool {
        self.index() < GoalDiffBucket::Level.index()
    }
}

/// All 13 goal-difference probabilities, indexed by [`GoalDiffBucket`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalDiffBuckets([f64; 13]);

impl GoalDiffBuckets {
    pub fn new(probs: [f64; 13]) -> Self {
        Self(probs)
    }

    /// `None` unless every bucket field is present and numeric.
    pub fn from_row(row: &FixtureRow) -> Option<Self> {
        let mut probs = [0.0; 13];
        for bucket in GoalDiffBucket::ALL {
            probs[bucket.index()] = row.get(bucket.field_name())?;
        }
        Some(Self(probs))
    }

    pub fn get(&self, bucket: GoalDiffBucket) -> f64 {
        self.0[bucket.index()]
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }
}

/// The two probability families the market engine reads from a row.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub goal_diff: Option<GoalDiffBuckets>,
    /// Present `R:` fields in row order, keys unparsed.
    pub exact_scores: Vec<(String, f64)>,
}

pub fn extract_distribution(row: &FixtureRow) -> Distribution {
    let exact_scores = row
        .iter()
        .filter(|(k, _)| k.starts_with(EXACT_SCORE_PREFIX))
        .filter_map(|(k, v)| v.map(|p| (k.to_string(), p)))
        .collect();
    Distribution {
        goal_diff: GoalDiffBuckets::from_row(row),
        exact_scores,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_gd_row() -> FixtureRow {
        GoalDiffBucket::ALL
            .iter()
            .map(|b| (b.field_name(), Some(1.0 / 13.0)))
            .collect()
    }

    #[test]
    fn insert_replaces_in_place_and_drops_nan() {
        let mut row = FixtureRow::new();
        row.insert("a", Some(1.0));
        row.insert("b", Some(2.0));
        row.insert("a", Some(f64::NAN));
        let keys: Vec<&str> = row.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert!(row.contains("a"));
        assert_eq!(row.get("a"), None);
        assert_eq!(row.get("b"), Some(2.0));
    }

    #[test]
    fn buckets_require_every_field() {
        let mut row = full_gd_row();
        assert!(GoalDiffBuckets::from_row(&row).is_some());
        row.insert("GD>5", None);
        assert!(GoalDiffBuckets::from_row(&row).is_none());
    }

    #[test]
    fn bucket_sides_split_around_level() {
        let home = GoalDiffBucket::ALL.iter().filter(|b| b.is_home_win()).count();
        let away = GoalDiffBucket::ALL.iter().filter(|b| b.is_away_win()).count();
        assert_eq!(home, 6);
        assert_eq!(away, 6);
        assert!(!GoalDiffBucket::Level.is_home_win());
        assert!(!GoalDiffBucket::Level.is_away_win());
    }

    #[test]
    fn extract_keeps_present_exact_scores_in_order() {
        let mut row = full_gd_row();
        row.insert("Date", None);
        row.insert("R:1-0", Some(0.2));
        row.insert("R:0-0", None);
        row.insert("R:x-y", Some(0.1));
        let dist = extract_distribution(&row);
        assert!(dist.goal_diff.is_some());
        assert_eq!(
            dist.exact_scores,
            vec![("R:1-0".to_string(), 0.2), ("R:x-y".to_string(), 0.1)]
        );
    }
}
