use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::engine::{MarketResult, calculate_markets};
use crate::fixture_row::{FixtureRow, GoalDiffBuckets, extract_distribution};
use crate::fixtures_csv::FixtureRecord;
use crate::scoreline::build_score_table;

/// Goal-difference and exact-score totals further apart than this get a debug line.
pub const CONSISTENCY_TOLERANCE: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureReport {
    pub date: String,
    pub country: String,
    pub home: String,
    pub away: String,
    #[serde(flatten)]
    pub markets: MarketResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportSummary {
    pub fixtures: usize,
    pub priced: usize,
}

impl ReportSummary {
    pub fn from_reports(reports: &[FixtureReport]) -> Self {
        Self {
            fixtures: reports.len(),
            priced: reports.iter().filter(|r| r.markets.odds_available).count(),
        }
    }

    pub fn unpriced(&self) -> usize {
        self.fixtures - self.priced
    }
}

pub fn build_report(record: &FixtureRecord) -> FixtureReport {
    if let Some(gap) = distribution_gap(&record.row) {
        if gap.abs() > CONSISTENCY_TOLERANCE {
            debug!(
                home = %record.home,
                away = %record.away,
                gap,
                "goal-difference and exact-score totals disagree"
            );
        }
    }
    FixtureReport {
        date: record.date.clone(),
        country: record.country.clone(),
        home: record.home.clone(),
        away: record.away.clone(),
        markets: calculate_markets(&record.row),
    }
}

/// Output order matches input order.
pub fn build_reports(records: &[FixtureRecord]) -> Vec<FixtureReport> {
    records.par_iter().map(build_report).collect()
}

pub fn filter_by_date(records: Vec<FixtureRecord>, date: NaiveDate) -> Vec<FixtureRecord> {
    records
        .into_iter()
        .filter(|r| {
            NaiveDate::parse_from_str(r.date.trim(), "%Y-%m-%d")
                .map(|d| d == date)
                .unwrap_or(false)
        })
        .collect()
}

/// `sum(GD) - sum(R:)`, or `None` when either family is unusable.
pub fn distribution_gap(row: &FixtureRow) -> Option<f64> {
    let dist = extract_distribution(row);
    let gd_total = dist.goal_diff.as_ref().map(GoalDiffBuckets::total)?;
    let scores = build_score_table(dist.exact_scores.iter().map(|(k, p)| (k.as_str(), *p)));
    if scores.is_empty() {
        return None;
    }
    let score_total: f64 = scores.iter().map(|s| s.probability).sum();
    Some(gd_total - score_total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture_row::GoalDiffBucket;

    fn record(date: &str, with_scores: bool) -> FixtureRecord {
        let mut row = FixtureRow::new();
        for bucket in GoalDiffBucket::ALL {
            let p = if bucket == GoalDiffBucket::Level { 1.0 } else { 0.0 };
            row.insert(bucket.field_name(), Some(p));
        }
        if with_scores {
            row.insert("R:0-0", Some(0.6));
            row.insert("R:1-1", Some(0.4));
        }
        FixtureRecord {
            date: date.to_string(),
            country: "ENG".to_string(),
            home: "Arsenal".to_string(),
            away: "Chelsea".to_string(),
            row,
        }
    }

    #[test]
    fn reports_keep_order_and_count_priced() {
        let records = vec![
            record("2026-10-17", true),
            record("2026-10-18", false),
            record("2026-10-19", true),
        ];
        let reports = build_reports(&records);
        let dates: Vec<&str> = reports.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2026-10-17", "2026-10-18", "2026-10-19"]);

        let summary = ReportSummary::from_reports(&reports);
        assert_eq!(summary.fixtures, 3);
        assert_eq!(summary.priced, 2);
        assert_eq!(summary.unpriced(), 1);
    }

    #[test]
    fn filter_by_date_skips_unparseable_dates() {
        let records = vec![
            record("2026-10-17", true),
            record("17/10/2026", true),
            record("2026-10-18", true),
        ];
        let day = NaiveDate::from_ymd_opt(2026, 10, 17).expect("valid date");
        let kept = filter_by_date(records, day);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].date, "2026-10-17");
    }

    #[test]
    fn distribution_gap_compares_totals() {
        let gap = distribution_gap(&record("2026-10-17", true).row).expect("gap");
        assert!(gap.abs() < 1e-9);
        assert!(distribution_gap(&record("2026-10-17", false).row).is_none());
    }

    #[test]
    fn unpriced_report_serializes_identity_and_flag_only() {
        let report = build_report(&record("2026-10-18", false));
        let json = serde_json::to_string(&report).expect("serializes");
        assert_eq!(
            json,
            r#"{"date":"2026-10-18","country":"ENG","home":"Arsenal","away":"Chelsea","oddsAvailable":false}"#
        );
    }
}
