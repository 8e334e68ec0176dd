use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ETAG, HeaderName, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::FetchConfig;
use crate::http_client::http_client;

const CACHE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct FixturesCacheFile {
    version: u32,
    entries: HashMap<String, CacheEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    body: String,
    etag: Option<String>,
    last_modified: Option<String>,
    fetched_at: i64,
}

enum Fetched {
    Fresh(CacheEntry),
    NotModified,
}

/// Fetches the fixtures CSV, trying each configured URL in turn and falling back to the
/// cache file when all of them fail.
pub fn fetch_fixtures_csv(cfg: &FetchConfig) -> Result<String> {
    let client = http_client(cfg.timeout)?;
    fetch_fixtures_csv_with(client, cfg)
}

pub fn fetch_fixtures_csv_with(client: &Client, cfg: &FetchConfig) -> Result<String> {
    if cfg.urls.is_empty() {
        return Err(anyhow!("no fixtures urls configured"));
    }
    let mut cache = cfg
        .cache_path
        .as_deref()
        .map(load_cache_file)
        .unwrap_or_default();

    let mut failures = Vec::new();
    for url in &cfg.urls {
        let cached = cache.entries.get(url);
        match fetch_one(client, url, cached) {
            Ok(Fetched::Fresh(entry)) => {
                info!(%url, bytes = entry.body.len(), "fetched fixtures");
                let body = entry.body.clone();
                store_entry(cfg.cache_path.as_deref(), &mut cache, url, entry);
                return Ok(body);
            }
            Ok(Fetched::NotModified) => {
                let Some(mut entry) = cached.cloned() else {
                    failures.push(format!("{url}: 304 without cached body"));
                    continue;
                };
                debug!(%url, "fixtures not modified, using cached body");
                entry.fetched_at = Utc::now().timestamp();
                let body = entry.body.clone();
                store_entry(cfg.cache_path.as_deref(), &mut cache, url, entry);
                return Ok(body);
            }
            Err(err) => {
                warn!(%url, error = %format!("{err:#}"), "fixtures source failed");
                failures.push(format!("{url}: {err:#}"));
            }
        }
    }

    if let Some((url, entry)) = newest_usable_entry(&cache, cfg) {
        let age_mins = (Utc::now().timestamp() - entry.fetched_at).max(0) / 60;
        warn!(%url, age_mins, "all fixtures sources failed, serving cached copy");
        return Ok(entry.body.clone());
    }

    Err(anyhow!(
        "all fixtures sources failed: {}",
        failures.join("; ")
    ))
}

fn fetch_one(client: &Client, url: &str, cached: Option<&CacheEntry>) -> Result<Fetched> {
    let mut req = client.get(url);
    if let Some(entry) = cached {
        if let Some(etag) = entry.etag.as_ref() {
            req = req.header(IF_NONE_MATCH, etag);
        }
        if let Some(last_modified) = entry.last_modified.as_ref() {
            req = req.header(IF_MODIFIED_SINCE, last_modified);
        }
    }

    let resp = req.send().context("request failed")?;
    let status = resp.status();
    if status == StatusCode::NOT_MODIFIED {
        return Ok(Fetched::NotModified);
    }
    let headers = resp.headers().clone();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        let snippet = body.trim().chars().take(160).collect::<String>();
        return Err(anyhow!("http {}: {}", status, snippet));
    }
    if body.trim().is_empty() {
        return Err(anyhow!("empty fixtures body"));
    }

    let header_str = |name: HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string())
    };
    Ok(Fetched::Fresh(CacheEntry {
        body,
        etag: header_str(ETAG),
        last_modified: header_str(LAST_MODIFIED),
        fetched_at: Utc::now().timestamp(),
    }))
}

fn newest_usable_entry<'a>(
    cache: &'a FixturesCacheFile,
    cfg: &FetchConfig,
) -> Option<(&'a str, &'a CacheEntry)> {
    let now = Utc::now().timestamp();
    cfg.urls
        .iter()
        .filter_map(|url| cache.entries.get_key_value(url))
        .filter(|(_, entry)| match cfg.max_cache_age {
            Some(max) => {
                let age = (now - entry.fetched_at).max(0) as u64;
                age <= max.as_secs()
            }
            None => true,
        })
        .max_by_key(|(_, entry)| entry.fetched_at)
        .map(|(url, entry)| (url.as_str(), entry))
}

fn store_entry(path: Option<&Path>, cache: &mut FixturesCacheFile, url: &str, entry: CacheEntry) {
    cache.version = CACHE_VERSION;
    cache.entries.insert(url.to_string(), entry);
    let Some(path) = path else {
        return;
    };
    if let Err(err) = save_cache_file(path, cache) {
        warn!(path = %path.display(), error = %format!("{err:#}"), "failed to write fixtures cache");
    }
}

fn load_cache_file(path: &Path) -> FixturesCacheFile {
    let Ok(raw) = fs::read_to_string(path) else {
        return FixturesCacheFile::default();
    };
    let cache = serde_json::from_str::<FixturesCacheFile>(&raw).unwrap_or_default();
    if cache.version != CACHE_VERSION {
        return FixturesCacheFile::default();
    }
    cache
}

fn save_cache_file(path: &Path, cache: &FixturesCacheFile) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).ok();
    }
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(cache).context("serialize fixtures cache")?;
    fs::write(&tmp, json).context("write fixtures cache")?;
    fs::rename(&tmp, path).context("swap fixtures cache")?;
    Ok(())
}
