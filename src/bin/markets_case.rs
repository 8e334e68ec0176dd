use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use serde_json::Value;

use clubelo_markets::{FixtureRow, calculate_markets};

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/market_case.json"));

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed reading {}", path.display()))?;
    let row = row_from_json(&raw)?;

    // One row in, one result out: no network, no cache, for eyeballing the engine.
    let result = calculate_markets(&row);
    println!(
        "{}",
        serde_json::to_string_pretty(&result).context("serialize market result")?
    );
    Ok(())
}

fn row_from_json(raw: &str) -> Result<FixtureRow> {
    let value: Value = serde_json::from_str(raw).context("invalid market case json")?;
    let Some(obj) = value.as_object() else {
        return Err(anyhow!("market case must be a json object"));
    };
    Ok(obj.iter().map(|(k, v)| (k.as_str(), v.as_f64())).collect())
}
