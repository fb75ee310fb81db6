use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDateTime};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::data_structures::RateTable;

pub const RATES_URL: &str = "https://www.cbr-xml-daily.ru/daily_json.js";

/// Snapshot files are named by their retrieval time; the name is the
/// snapshot's identity and its age is recomputed from it at every read.
const SNAPSHOT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
const SNAPSHOT_EXTENSION: &str = "json";

/// Source of the raw exchange-rate payload. The production implementation
/// talks to the provider over HTTP; tests substitute a canned one.
pub trait RateProvider {
    fn fetch_raw(&self) -> Result<Value>;
}

/// Blocking HTTP provider for the Central Bank of Russia daily feed.
/// One GET per call: no retries, no backoff, no timeout wrapper. Callers
/// needing responsiveness guarantees wrap the call themselves.
pub struct CbrProvider {
    client: reqwest::blocking::Client,
    url: String,
}

impl CbrProvider {
    pub fn new() -> Self {
        Self::with_url(RATES_URL)
    }

    pub fn with_url(url: &str) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            url: url.to_string(),
        }
    }
}

impl Default for CbrProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RateProvider for CbrProvider {
    fn fetch_raw(&self) -> Result<Value> {
        info!(url = %self.url, "requesting exchange rates");
        let response = self
            .client
            .get(&self.url)
            .send()
            .with_context(|| format!("rate request to {} failed", self.url))?
            .error_for_status()
            .context("rate provider returned an error status")?;
        response.json().context("rate payload is not valid JSON")
    }
}

/// One-snapshot disk cache in front of a rate provider.
///
/// At most one snapshot exists in the cache directory at any time. A read
/// reuses it while it is younger than an hour and refetches otherwise; the
/// remove-then-write sequence is not atomic, and a crash in between simply
/// leaves no snapshot, which heals itself on the next read.
pub struct ExchangeRateCache {
    cache_dir: PathBuf,
    max_age: Duration,
    provider: Box<dyn RateProvider>,
}

impl ExchangeRateCache {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self::with_provider(cache_dir, Box::new(CbrProvider::new()))
    }

    pub fn with_provider(cache_dir: impl Into<PathBuf>, provider: Box<dyn RateProvider>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            max_age: Duration::hours(1),
            provider,
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// The single read operation: returns the cached table while the
    /// snapshot is fresh, otherwise replaces it with a newly fetched one.
    /// A provider failure is fatal to this call; there is no cached
    /// fallback for a stale or missing snapshot.
    pub fn fetch(&self) -> Result<RateTable> {
        let path = match self.find_snapshot()? {
            Some(path) if self.is_fresh(&path) => {
                debug!(snapshot = %path.display(), "reusing cached exchange rates");
                path
            }
            Some(_) => {
                self.clear_snapshots()?;
                self.request_and_persist()?
            }
            None => self.request_and_persist()?,
        };

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read rate snapshot {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("rate snapshot {} is corrupt", path.display()))
    }

    fn find_snapshot(&self) -> Result<Option<PathBuf>> {
        let dir = match fs::read_dir(&self.cache_dir) {
            Ok(dir) => dir,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed to read cache directory {}", self.cache_dir.display())
                })
            }
        };

        for entry in dir {
            let path = entry.context("failed to read cache directory entry")?.path();
            if let Some(extension) = path.extension() {
                if extension == SNAPSHOT_EXTENSION {
                    return Ok(Some(path));
                }
            }
        }

        Ok(None)
    }

    fn is_fresh(&self, path: &Path) -> bool {
        let stem = match path.file_stem().and_then(|stem| stem.to_str()) {
            Some(stem) => stem,
            None => return false,
        };

        match NaiveDateTime::parse_from_str(stem, SNAPSHOT_TIME_FORMAT) {
            Ok(taken_at) => Local::now().naive_local() - taken_at <= self.max_age,
            Err(err) => {
                warn!(
                    snapshot = %path.display(),
                    %err,
                    "snapshot name is not a timestamp, treating as stale"
                );
                false
            }
        }
    }

    fn clear_snapshots(&self) -> Result<()> {
        for entry in fs::read_dir(&self.cache_dir).with_context(|| {
            format!("failed to read cache directory {}", self.cache_dir.display())
        })? {
            let path = entry.context("failed to read cache directory entry")?.path();
            if path.is_file() {
                fs::remove_file(&path).with_context(|| {
                    format!("failed to remove stale snapshot {}", path.display())
                })?;
            }
        }
        Ok(())
    }

    fn request_and_persist(&self) -> Result<PathBuf> {
        let payload = self.provider.fetch_raw()?;

        fs::create_dir_all(&self.cache_dir).with_context(|| {
            format!("failed to create cache directory {}", self.cache_dir.display())
        })?;

        let name = format!(
            "{}.{}",
            Local::now().naive_local().format(SNAPSHOT_TIME_FORMAT),
            SNAPSHOT_EXTENSION
        );
        let path = self.cache_dir.join(name);

        // Pretty-printed; serde_json leaves non-ASCII characters literal,
        // so the Cyrillic currency names stay readable in the file.
        let body = serde_json::to_string_pretty(&payload)
            .context("failed to serialize rate payload")?;
        fs::write(&path, body)
            .with_context(|| format!("failed to write rate snapshot {}", path.display()))?;

        info!(snapshot = %path.display(), "cached fresh exchange rates");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingProvider {
        calls: Arc<AtomicUsize>,
    }

    impl RateProvider for CountingProvider {
        fn fetch_raw(&self) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(sample_payload())
        }
    }

    struct FailingProvider;

    impl RateProvider for FailingProvider {
        fn fetch_raw(&self) -> Result<Value> {
            anyhow::bail!("connection refused")
        }
    }

    fn sample_payload() -> Value {
        json!({
            "Date": "2021-12-22T11:30:00+03:00",
            "Valute": {
                "USD": {
                    "ID": "R01235",
                    "NumCode": "840",
                    "CharCode": "USD",
                    "Nominal": 1,
                    "Name": "Доллар США",
                    "Value": 73.0,
                    "Previous": 73.5
                },
                "EUR": {
                    "ID": "R01239",
                    "NumCode": "978",
                    "CharCode": "EUR",
                    "Nominal": 1,
                    "Name": "Евро",
                    "Value": 82.5,
                    "Previous": 83.0
                }
            }
        })
    }

    fn counting_cache(dir: &Path) -> (ExchangeRateCache, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = ExchangeRateCache::with_provider(
            dir,
            Box::new(CountingProvider {
                calls: Arc::clone(&calls),
            }),
        );
        (cache, calls)
    }

    fn snapshot_files(dir: &Path) -> Vec<PathBuf> {
        fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect()
    }

    #[test]
    fn test_second_read_within_hour_reuses_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let (cache, calls) = counting_cache(dir.path());

        let first = cache.fetch().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let files = snapshot_files(dir.path());
        assert_eq!(files.len(), 1);
        let bytes_before = fs::read(&files[0]).unwrap();

        let second = cache.fetch().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.quote("USD").unwrap().value(), second.quote("USD").unwrap().value());
        assert_eq!(fs::read(&files[0]).unwrap(), bytes_before);
    }

    #[test]
    fn test_stale_snapshot_is_replaced_with_one_new_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let (cache, calls) = counting_cache(dir.path());

        cache.fetch().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Age the snapshot past the staleness window by renaming it.
        let old_path = snapshot_files(dir.path()).remove(0);
        let aged_name = format!(
            "{}.{}",
            (Local::now().naive_local() - Duration::hours(2)).format(SNAPSHOT_TIME_FORMAT),
            SNAPSHOT_EXTENSION
        );
        let aged_path = dir.path().join(aged_name);
        fs::rename(&old_path, &aged_path).unwrap();

        cache.fetch().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let files = snapshot_files(dir.path());
        assert_eq!(files.len(), 1);
        assert_ne!(files[0], aged_path);
    }

    #[test]
    fn test_missing_cache_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("rates");
        let (cache, calls) = counting_cache(&nested);

        let table = cache.fetch().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(table.quote("EUR").unwrap().value(), 82.5);
        assert_eq!(snapshot_files(&nested).len(), 1);
    }

    #[test]
    fn test_snapshot_is_pretty_printed_with_literal_cyrillic() {
        let dir = tempfile::tempdir().unwrap();
        let (cache, _calls) = counting_cache(dir.path());

        cache.fetch().unwrap();
        let body = fs::read_to_string(&snapshot_files(dir.path())[0]).unwrap();
        assert!(body.contains("Доллар США"));
        assert!(body.contains('\n'));
    }

    #[test]
    fn test_unparseable_snapshot_name_treated_as_stale() {
        let dir = tempfile::tempdir().unwrap();
        let (cache, calls) = counting_cache(dir.path());
        fs::write(dir.path().join("latest.json"), "{}").unwrap();

        cache.fetch().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let files = snapshot_files(dir.path());
        assert_eq!(files.len(), 1);
        assert_ne!(files[0].file_name().unwrap(), "latest.json");
    }

    #[test]
    fn test_provider_failure_propagates_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ExchangeRateCache::with_provider(dir.path(), Box::new(FailingProvider));

        let err = cache.fetch().unwrap_err();
        assert!(err.to_string().contains("connection refused"));
        assert!(snapshot_files(dir.path()).is_empty());
    }
}
