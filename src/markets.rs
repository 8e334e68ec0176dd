use crate::fixture_row::{GoalDiffBucket, GoalDiffBuckets};
use crate::scoreline::ScoreEntry;

pub const TOP_SCORES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutcomeProbs {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl OutcomeProbs {
    pub fn from_goal_diff(buckets: &GoalDiffBuckets) -> Self {
        let mut home = 0.0;
        let mut away = 0.0;
        for bucket in GoalDiffBucket::ALL {
            if bucket.is_home_win() {
                home += buckets.get(bucket);
            } else if bucket.is_away_win() {
                away += buckets.get(bucket);
            }
        }
        Self {
            home,
            draw: buckets.get(GoalDiffBucket::Level),
            away,
        }
    }

    pub fn home_or_draw(&self) -> f64 {
        self.home + self.draw
    }

    pub fn home_or_away(&self) -> f64 {
        self.home + self.away
    }

    pub fn draw_or_away(&self) -> f64 {
        self.draw + self.away
    }
}

/// Secondary market probabilities, all summed over the score table.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MarketProbs {
    pub over_0_5: f64,
    pub over_1_5: f64,
    pub over_2_5: f64,
    pub over_3_5: f64,
    pub home_over_0_5: f64,
    pub home_over_1_5: f64,
    pub away_over_0_5: f64,
    pub away_over_1_5: f64,
    pub btts_yes: f64,
    pub btts_no: f64,
    pub home_and_btts: f64,
    pub away_and_btts: f64,
    pub goals_0_1: f64,
    pub goals_2_3: f64,
    pub goals_4_plus: f64,
}

fn mass(scores: &[ScoreEntry], pred: impl Fn(&ScoreEntry) -> bool) -> f64 {
    let mut sum = 0.0;
    for s in scores {
        if pred(s) {
            sum += s.probability;
        }
    }
    sum
}

fn is_nil_nil(s: &ScoreEntry) -> bool {
    s.home_goals == 0 && s.away_goals == 0
}

fn home_win_and_btts(s: &ScoreEntry) -> bool {
    s.home_goals > s.away_goals && s.both_score()
}

fn away_win_and_btts(s: &ScoreEntry) -> bool {
    s.away_goals > s.home_goals && s.both_score()
}

pub fn compute_market_probs(scores: &[ScoreEntry]) -> MarketProbs {
    let total_le_1 = mass(scores, |s| s.total_goals <= 1);
    let total_le_2 = mass(scores, |s| s.total_goals <= 2);
    let total_le_3 = mass(scores, |s| s.total_goals <= 3);
    let btts_yes = mass(scores, ScoreEntry::both_score);

    MarketProbs {
        over_0_5: 1.0 - mass(scores, is_nil_nil),
        over_1_5: 1.0 - total_le_1,
        over_2_5: 1.0 - total_le_2,
        over_3_5: 1.0 - total_le_3,
        home_over_0_5: mass(scores, |s| s.home_goals >= 1),
        home_over_1_5: mass(scores, |s| s.home_goals >= 2),
        away_over_0_5: mass(scores, |s| s.away_goals >= 1),
        away_over_1_5: mass(scores, |s| s.away_goals >= 2),
        btts_yes,
        btts_no: 1.0 - btts_yes,
        home_and_btts: mass(scores, home_win_and_btts),
        away_and_btts: mass(scores, away_win_and_btts),
        goals_0_1: mass(scores, |s| s.total_goals <= 1),
        goals_2_3: mass(scores, |s| matches!(s.total_goals, 2 | 3)),
        goals_4_plus: mass(scores, |s| s.total_goals >= 4),
    }
}

/// Highest-probability scorelines first; equal probabilities keep table order.
pub fn top_scores(scores: &[ScoreEntry], n: usize) -> Vec<ScoreEntry> {
    let mut ranked = scores.to_vec();
    ranked.sort_by(|a, b| b.probability.total_cmp(&a.probability));
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Vec<ScoreEntry> {
        vec![
            ScoreEntry::new(1, 0, 0.20),
            ScoreEntry::new(0, 0, 0.25),
            ScoreEntry::new(1, 1, 0.15),
            ScoreEntry::new(2, 0, 0.10),
            ScoreEntry::new(0, 1, 0.10),
            ScoreEntry::new(2, 1, 0.10),
            ScoreEntry::new(2, 2, 0.10),
        ]
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn outcome_probs_sum_buckets_by_side() {
        let mut probs = [0.0; 13];
        probs[GoalDiffBucket::AwayByMoreThanFive.index()] = 0.01;
        probs[GoalDiffBucket::AwayByOne.index()] = 0.19;
        probs[GoalDiffBucket::Level.index()] = 0.3;
        probs[GoalDiffBucket::HomeByOne.index()] = 0.4;
        probs[GoalDiffBucket::HomeByMoreThanFive.index()] = 0.1;
        let p = OutcomeProbs::from_goal_diff(&GoalDiffBuckets::new(probs));
        assert!(approx(p.home, 0.5));
        assert!(approx(p.draw, 0.3));
        assert!(approx(p.away, 0.2));
        assert!(approx(p.home + p.draw + p.away, 1.0));
        assert!(approx(p.home_or_draw(), 0.8));
        assert!(approx(p.home_or_away(), 0.7));
        assert!(approx(p.draw_or_away(), 0.5));
    }

    #[test]
    fn market_probs_follow_predicates() {
        let m = compute_market_probs(&table());
        assert!(approx(m.over_0_5, 0.75));
        assert!(approx(m.over_1_5, 0.45));
        assert!(approx(m.over_2_5, 0.20));
        assert!(approx(m.over_3_5, 0.10));
        assert!(approx(m.home_over_0_5, 0.65));
        assert!(approx(m.home_over_1_5, 0.30));
        assert!(approx(m.away_over_0_5, 0.45));
        assert!(approx(m.away_over_1_5, 0.10));
        assert!(approx(m.btts_yes, 0.35));
        assert!(approx(m.btts_no, 0.65));
        assert!(approx(m.home_and_btts, 0.10));
        assert!(approx(m.away_and_btts, 0.0));
        assert!(approx(m.goals_0_1, 0.55));
        assert!(approx(m.goals_2_3, 0.35));
        assert!(approx(m.goals_4_plus, 0.10));
    }

    #[test]
    fn empty_table_prices_overs_at_one() {
        let m = compute_market_probs(&[]);
        assert_eq!(m.over_0_5, 1.0);
        assert_eq!(m.btts_yes, 0.0);
        assert_eq!(m.btts_no, 1.0);
    }

    #[test]
    fn top_scores_is_stable_and_bounded() {
        let top = top_scores(&table(), TOP_SCORES);
        let labels: Vec<String> = top.iter().map(ScoreEntry::label).collect();
        assert_eq!(labels, vec!["0-0", "1-0", "1-1", "2-0"]);

        let short = top_scores(&table()[..2], TOP_SCORES);
        assert_eq!(short.len(), 2);
        assert_eq!(short[0].label(), "0-0");
    }
}
