use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use clubelo_markets::config::FetchConfig;
use clubelo_markets::fixtures_csv::parse_fixtures_csv;
use clubelo_markets::fixtures_fetch::fetch_fixtures_csv;
use clubelo_markets::report::{ReportSummary, build_reports, filter_by_date};

#[derive(Debug, Default)]
struct Args {
    csv: Option<PathBuf>,
    date: Option<NaiveDate>,
    out: Option<PathBuf>,
    pretty: bool,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_logging();

    let res = run();
    if let Err(err) = &res {
        error!(error = %format!("{err:#}"), "fixtures run failed");
    }
    res
}

fn run() -> Result<()> {
    let args = parse_args(std::env::args().skip(1).collect())?;

    let raw = match args.csv.as_ref() {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed reading {}", path.display()))?,
        None => fetch_fixtures_csv(&FetchConfig::from_env())?,
    };

    let mut records = parse_fixtures_csv(&raw)?;
    if let Some(date) = args.date {
        records = filter_by_date(records, date);
    }
    let reports = build_reports(&records);

    let summary = ReportSummary::from_reports(&reports);
    info!(
        fixtures = summary.fixtures,
        priced = summary.priced,
        unpriced = summary.unpriced(),
        "markets computed"
    );

    let json = if args.pretty {
        serde_json::to_string_pretty(&reports)
    } else {
        serde_json::to_string(&reports)
    }
    .context("serialize fixtures report")?;

    match args.out.as_ref() {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("failed writing {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes()).context("write stdout")?;
            stdout.write_all(b"\n").context("write stdout")?;
        }
    }
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn parse_args(args: Vec<String>) -> Result<Args> {
    let mut out = Args::default();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((f, v)) => (f.to_string(), Some(v.to_string())),
            None => (arg.clone(), None),
        };
        if flag == "--pretty" {
            out.pretty = true;
            continue;
        }
        let value = match inline.or_else(|| iter.next()) {
            Some(v) if !v.trim().is_empty() => v.trim().to_string(),
            _ => return Err(anyhow!("missing value for {flag}")),
        };
        match flag.as_str() {
            "--csv" => out.csv = Some(PathBuf::from(value)),
            "--out" => out.out = Some(PathBuf::from(value)),
            "--date" => {
                let date = NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                    .with_context(|| format!("invalid --date {value}, expected YYYY-MM-DD"))?;
                out.date = Some(date);
            }
            other => return Err(anyhow!("unknown argument {other}")),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Result<Args> {
        parse_args(raw.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn parses_flags_in_both_forms() {
        let a = args(&["--csv", "f.csv", "--date=2026-10-17", "--pretty"]).expect("valid");
        assert_eq!(a.csv, Some(PathBuf::from("f.csv")));
        assert_eq!(a.date, NaiveDate::from_ymd_opt(2026, 10, 17));
        assert!(a.pretty);
        assert!(a.out.is_none());
    }

    #[test]
    fn rejects_bad_input() {
        assert!(args(&["--date", "17/10/2026"]).is_err());
        assert!(args(&["--out"]).is_err());
        assert!(args(&["--verbose"]).is_err());
    }
}
