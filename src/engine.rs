use serde::Serialize;

use crate::fixture_row::{FixtureRow, extract_distribution};
use crate::heatmap::{Heatmap, build_heatmap};
use crate::markets::{MarketProbs, OutcomeProbs, TOP_SCORES, compute_market_probs, top_scores};
use crate::odds::{Odd, to_odd};
use crate::scoreline::build_score_table;

/// Engine output for one fixture. When `odds_available` is false nothing else is serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketResult {
    pub odds_available: bool,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub markets: Option<Markets>,
}

impl MarketResult {
    pub fn unavailable() -> Self {
        Self {
            odds_available: false,
            markets: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Markets {
    pub probabilities: Probabilities,
    pub odds: OddsBook,
    pub top_correct_scores: Vec<CorrectScoreOdd>,
    pub correct_score_heatmap: Heatmap,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Probabilities {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OddsBook {
    pub home_win: Odd,
    pub draw: Odd,
    pub away_win: Odd,
    pub double_chance: DoubleChanceOdds,
    pub over_under: OverUnderOdds,
    pub team_goals_over: TeamGoalsOdds,
    pub btts: BttsOdds,
    pub result_and_btts: ResultAndBttsOdds,
    pub goal_ranges: GoalRangeOdds,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DoubleChanceOdds {
    #[serde(rename = "1X")]
    pub home_or_draw: Odd,
    #[serde(rename = "12")]
    pub home_or_away: Odd,
    #[serde(rename = "X2")]
    pub draw_or_away: Odd,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverUnderOdds {
    pub over0_5: Odd,
    pub over1_5: Odd,
    pub over2_5: Odd,
    pub over3_5: Odd,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TeamGoalsOdds {
    pub home_over_0_5: Odd,
    pub home_over_1_5: Odd,
    pub away_over_0_5: Odd,
    pub away_over_1_5: Odd,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BttsOdds {
    pub yes: Odd,
    pub no: Odd,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResultAndBttsOdds {
    pub home_and_btts_yes: Odd,
    pub away_and_btts_yes: Odd,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalRangeOdds {
    pub goals_0_1: Odd,
    pub goals_2_3: Odd,
    pub goals_4_plus: Odd,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrectScoreOdd {
    pub score: String,
    pub odd: Odd,
}

impl OddsBook {
    pub fn price(outcome: &OutcomeProbs, m: &MarketProbs) -> Self {
        Self {
            home_win: to_odd(outcome.home),
            draw: to_odd(outcome.draw),
            away_win: to_odd(outcome.away),
            double_chance: DoubleChanceOdds {
                home_or_draw: to_odd(outcome.home_or_draw()),
                home_or_away: to_odd(outcome.home_or_away()),
                draw_or_away: to_odd(outcome.draw_or_away()),
            },
            over_under: OverUnderOdds {
                over0_5: to_odd(m.over_0_5),
                over1_5: to_odd(m.over_1_5),
                over2_5: to_odd(m.over_2_5),
                over3_5: to_odd(m.over_3_5),
            },
            team_goals_over: TeamGoalsOdds {
                home_over_0_5: to_odd(m.home_over_0_5),
                home_over_1_5: to_odd(m.home_over_1_5),
                away_over_0_5: to_odd(m.away_over_0_5),
                away_over_1_5: to_odd(m.away_over_1_5),
            },
            btts: BttsOdds {
                yes: to_odd(m.btts_yes),
                no: to_odd(m.btts_no),
            },
            result_and_btts: ResultAndBttsOdds {
                home_and_btts_yes: to_odd(m.home_and_btts),
                away_and_btts_yes: to_odd(m.away_and_btts),
            },
            goal_ranges: GoalRangeOdds {
                goals_0_1: to_odd(m.goals_0_1),
                goals_2_3: to_odd(m.goals_2_3),
                goals_4_plus: to_odd(m.goals_4_plus),
            },
        }
    }
}

pub fn calculate_markets(row: &FixtureRow) -> MarketResult {
    let dist = extract_distribution(row);
    let Some(goal_diff) = dist.goal_diff else {
        return MarketResult::unavailable();
    };
    let outcome = OutcomeProbs::from_goal_diff(&goal_diff);

    let scores = build_score_table(dist.exact_scores.iter().map(|(k, p)| (k.as_str(), *p)));
    if scores.is_empty() {
        return MarketResult::unavailable();
    }

    let market_probs = compute_market_probs(&scores);
    let top_correct_scores = top_scores(&scores, TOP_SCORES)
        .into_iter()
        .map(|s| CorrectScoreOdd {
            score: s.label(),
            odd: to_odd(s.probability),
        })
        .collect();

    MarketResult {
        odds_available: true,
        markets: Some(Markets {
            probabilities: Probabilities {
                home_win: outcome.home,
                draw: outcome.draw,
                away_win: outcome.away,
            },
            odds: OddsBook::price(&outcome, &market_probs),
            top_correct_scores,
            correct_score_heatmap: build_heatmap(&scores),
        }),
    }
}
