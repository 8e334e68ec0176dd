use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_FIXTURES_URL: &str = "http://api.clubelo.com/Fixtures";
pub const DEFAULT_FALLBACK_URLS: &str = "https://api.clubelo.com/Fixtures";

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CACHE_MAX_AGE_HOURS: u64 = 48;

const CACHE_DIR: &str = "clubelo_markets";
const CACHE_FILE: &str = "fixtures_cache.json";

#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Primary first, then fallbacks; no duplicates.
    pub urls: Vec<String>,
    pub timeout: Duration,
    pub cache_path: Option<PathBuf>,
    /// `None` means any cached copy is usable.
    pub max_cache_age: Option<Duration>,
}

impl FetchConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let primary = lookup("CLUBELO_FIXTURES_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_FIXTURES_URL.to_string());
        let fallbacks =
            lookup("CLUBELO_FALLBACK_URLS").unwrap_or_else(|| DEFAULT_FALLBACK_URLS.to_string());

        let mut urls = vec![primary];
        for url in fallbacks.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if !urls.iter().any(|u| u == url) {
                urls.push(url.to_string());
            }
        }

        let timeout_secs = lookup("CLUBELO_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .clamp(1, 120);

        let cache_path = if parse_bool(lookup("CLUBELO_CACHE_ENABLED"), true) {
            lookup("CLUBELO_CACHE_PATH")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .or_else(|| default_cache_path(&lookup))
        } else {
            None
        };

        let max_age_hours = lookup("CLUBELO_CACHE_MAX_AGE_HOURS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_CACHE_MAX_AGE_HOURS);
        let max_cache_age =
            (max_age_hours > 0).then(|| Duration::from_secs(max_age_hours.saturating_mul(3600)));

        Self {
            urls,
            timeout: Duration::from_secs(timeout_secs),
            cache_path,
            max_cache_age,
        }
    }
}

fn parse_bool(raw: Option<String>, default: bool) -> bool {
    raw.map(|v| {
        let t = v.trim().to_ascii_lowercase();
        !(t.is_empty() || t == "0" || t == "false" || t == "off" || t == "no")
    })
    .unwrap_or(default)
}

fn default_cache_path(lookup: &impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    if let Some(base) = lookup("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR).join(CACHE_FILE));
        }
    }
    let home = lookup("HOME")?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR).join(CACHE_FILE))
}
