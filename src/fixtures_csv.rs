use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use tracing::{debug, warn};

use crate::fixture_row::FixtureRow;

const COL_DATE: &str = "Date";
const COL_COUNTRY: &str = "Country";
const COL_HOME: &str = "Home";
const COL_AWAY: &str = "Away";

#[derive(Debug, Clone, PartialEq)]
pub struct FixtureRecord {
    pub date: String,
    pub country: String,
    pub home: String,
    pub away: String,
    pub row: FixtureRow,
}

/// Parses the ClubElo fixtures CSV. Bad records are skipped, a bad header is an error.
pub fn parse_fixtures_csv(raw: &str) -> Result<Vec<FixtureRecord>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(raw.as_bytes());
    let headers = reader
        .headers()
        .context("invalid fixtures csv header")?
        .clone();

    let mut out = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = match record {
            Ok(r) => r,
            Err(err) => {
                warn!(line = idx + 2, error = %err, "skipping malformed fixtures csv record");
                continue;
            }
        };

        let mut fixture = FixtureRecord {
            date: String::new(),
            country: String::new(),
            home: String::new(),
            away: String::new(),
            row: FixtureRow::new(),
        };
        for (name, cell) in headers.iter().zip(record.iter()) {
            match name {
                COL_DATE => fixture.date = cell.to_string(),
                COL_COUNTRY => fixture.country = cell.to_string(),
                COL_HOME => fixture.home = cell.to_string(),
                COL_AWAY => fixture.away = cell.to_string(),
                _ => fixture.row.insert(name, parse_cell(cell)),
            }
        }
        out.push(fixture);
    }

    debug!(fixtures = out.len(), columns = headers.len(), "parsed fixtures csv");
    Ok(out)
}

fn parse_cell(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| !v.is_nan())
}
