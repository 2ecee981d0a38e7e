//! Ordered resolution of the ridership table.
//!
//! Each [`RidershipSource`] either yields a parsed table or an error; the
//! [`RidershipLoader`] tries them in order and falls back to the embedded
//! sample, so loading never fails.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, error, info, warn};

use super::ridership::RidershipTable;
use crate::fetch::{HttpClient, fetch_text};

/// Canonical location of the station ridership dataset.
pub const RIDERSHIP_URL: &str = "https://files.data.gouv.fr/sncf/gares/frequentation-gares.csv";

/// File name of the local copy, relative to the data directory.
pub const CACHE_FILE_NAME: &str = "frequentation-gares.csv";

/// Last-resort table so downstream analyses always have data.
pub const EMBEDDED_SAMPLE: &str = "nom_gare;total_voyageurs_2022;total_voyageurs_2023;total_voyageurs_2024;non_voyageurs\n\
Paris Gare de Lyon;100000000;105000000;110000000;0\n\
Lyon Part-Dieu;50000000;52000000;54000000;0\n\
Bordeaux St Jean;30000000;31000000;32000000;0\n";

pub trait RidershipSource {
    /// Short label used in logs and in [`Resolved::source`].
    fn name(&self) -> &str;

    fn resolve(&self) -> Result<RidershipTable>;
}

/// A table on local disk.
pub struct LocalFile {
    label: String,
    path: PathBuf,
}

impl LocalFile {
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RidershipSource for LocalFile {
    fn name(&self) -> &str {
        &self.label
    }

    fn resolve(&self) -> Result<RidershipTable> {
        if !self.path.is_file() {
            bail!("{} does not exist", self.path.display());
        }
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        RidershipTable::parse(&text).with_context(|| format!("parsing {}", self.path.display()))
    }
}

/// The canonical dataset over HTTP, saved to `cache_path` on success.
pub struct RemoteSource {
    url: String,
    client: Box<dyn HttpClient>,
    cache_path: Option<PathBuf>,
}

impl RemoteSource {
    pub fn new(url: impl Into<String>, client: Box<dyn HttpClient>) -> Self {
        Self {
            url: url.into(),
            client,
            cache_path: None,
        }
    }

    pub fn with_cache(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = Some(path.into());
        self
    }

    fn persist(&self, path: &Path, text: &str) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, text)?;
        Ok(())
    }
}

impl RidershipSource for RemoteSource {
    fn name(&self) -> &str {
        "remote"
    }

    fn resolve(&self) -> Result<RidershipTable> {
        let text = fetch_text(self.client.as_ref(), &self.url)?;
        let table = RidershipTable::parse(&text).with_context(|| format!("parsing {}", self.url))?;

        if let Some(path) = &self.cache_path {
            match self.persist(path, &text) {
                Ok(()) => info!(path = %path.display(), "Cached remote ridership table"),
                Err(e) => warn!(path = %path.display(), error = %e, "Could not cache ridership table"),
            }
        }

        Ok(table)
    }
}

/// The built-in three-station sample.
pub struct EmbeddedSample;

impl RidershipSource for EmbeddedSample {
    fn name(&self) -> &str {
        "embedded"
    }

    fn resolve(&self) -> Result<RidershipTable> {
        RidershipTable::parse(EMBEDDED_SAMPLE)
    }
}

/// A table together with the name of the source that produced it.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub table: RidershipTable,
    pub source: String,
}

/// Tries each source in order; the first parseable table wins.
#[derive(Default)]
pub struct RidershipLoader {
    sources: Vec<Box<dyn RidershipSource>>,
}

impl RidershipLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit path (if any), then the local cache, then the remote URL.
    pub fn standard(
        explicit: Option<PathBuf>,
        cache_path: PathBuf,
        url: &str,
        client: Box<dyn HttpClient>,
    ) -> Self {
        let mut loader = Self::new();
        if let Some(path) = explicit {
            loader = loader.with_source(LocalFile::new("explicit", path));
        }
        loader
            .with_source(LocalFile::new("cache", cache_path.clone()))
            .with_source(RemoteSource::new(url, client).with_cache(cache_path))
    }

    pub fn with_source(mut self, source: impl RidershipSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Resolves the table. The embedded sample is always tried last, so
    /// this never fails.
    #[tracing::instrument(skip(self), fields(sources = self.sources.len()))]
    pub fn load(&self) -> Resolved {
        let chain = self
            .sources
            .iter()
            .map(|s| s.as_ref())
            .chain(std::iter::once(&EmbeddedSample as &dyn RidershipSource));

        for source in chain {
            debug!(source = source.name(), "Trying ridership source");
            match source.resolve() {
                Ok(table) => {
                    info!(
                        source = source.name(),
                        stations = table.len(),
                        years = ?table.years,
                        "Ridership table resolved"
                    );
                    return Resolved {
                        table,
                        source: source.name().to_string(),
                    };
                }
                Err(e) => warn!(source = source.name(), error = %format!("{e:#}"), "Ridership source failed"),
            }
        }

        error!("Embedded ridership sample failed to parse");
        Resolved {
            table: RidershipTable::default(),
            source: EmbeddedSample.name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    struct StubClient(Result<&'static str, &'static str>);

    impl HttpClient for StubClient {
        fn get(&self, _url: &str) -> Result<Vec<u8>> {
            match self.0 {
                Ok(body) => Ok(body.as_bytes().to_vec()),
                Err(msg) => bail!("{msg}"),
            }
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    const REMOTE_BODY: &str = "nom_gare;total_voyageurs_2023;total_voyageurs_2024\nRemote;1;2\n";

    #[test]
    fn test_embedded_sample_parses() {
        let table = EmbeddedSample.resolve().unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.years, vec![2022, 2023, 2024]);
        assert!(table.has_non_travelers);
    }

    #[test]
    fn test_empty_chain_falls_back_to_embedded() {
        let resolved = RidershipLoader::new().load();
        assert_eq!(resolved.source, "embedded");
        assert_eq!(resolved.table.len(), 3);
    }

    #[test]
    fn test_explicit_path_wins() {
        let path = temp_path("sncf_insights_test_explicit.csv");
        fs::write(&path, "nom_gare;total_voyageurs_2024\nExplicit;7\n").unwrap();

        let loader = RidershipLoader::new()
            .with_source(LocalFile::new("explicit", &path))
            .with_source(RemoteSource::new("http://unused", Box::new(StubClient(Ok(REMOTE_BODY)))));
        let resolved = loader.load();

        assert_eq!(resolved.source, "explicit");
        assert_eq!(resolved.table.records[0].station_name, "Explicit");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_unparseable_file_is_skipped() {
        let path = temp_path("sncf_insights_test_unparseable.csv");
        fs::write(&path, "gare;total\nA;1\n").unwrap();

        let loader = RidershipLoader::new()
            .with_source(LocalFile::new("explicit", &path))
            .with_source(RemoteSource::new("http://x", Box::new(StubClient(Ok(REMOTE_BODY)))));

        assert_eq!(loader.load().source, "remote");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_remote_success_writes_cache() {
        let dir = temp_path("sncf_insights_test_remote_cache");
        let _ = fs::remove_dir_all(&dir);
        let cache = dir.join(CACHE_FILE_NAME);

        let loader = RidershipLoader::standard(
            Some(temp_path("sncf_insights_test_does_not_exist.csv")),
            cache.clone(),
            "http://example.test/ridership.csv",
            Box::new(StubClient(Ok(REMOTE_BODY))),
        );
        assert_eq!(loader.source_names(), vec!["explicit", "cache", "remote"]);

        let resolved = loader.load();
        assert_eq!(resolved.source, "remote");
        assert_eq!(fs::read_to_string(&cache).unwrap(), REMOTE_BODY);

        // Second pass is served from the cache.
        let again = RidershipLoader::standard(
            None,
            cache.clone(),
            "http://example.test/ridership.csv",
            Box::new(StubClient(Err("offline"))),
        )
        .load();
        assert_eq!(again.source, "cache");
        assert_eq!(again.table, resolved.table);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_everything_fails_returns_embedded() {
        let loader = RidershipLoader::standard(
            None,
            temp_path("sncf_insights_test_missing_cache.csv"),
            "http://example.test/ridership.csv",
            Box::new(StubClient(Err("connection refused"))),
        );

        let resolved = loader.load();

        assert_eq!(resolved.source, "embedded");
        assert_eq!(resolved.table.records[0].station_name, "Paris Gare de Lyon");
    }

    #[test]
    fn test_remote_garbage_is_not_cached() {
        let cache = temp_path("sncf_insights_test_garbage_cache.csv");
        let _ = fs::remove_file(&cache);

        let source = RemoteSource::new("http://x", Box::new(StubClient(Ok("<html>oops</html>"))))
            .with_cache(&cache);

        assert!(source.resolve().is_err());
        assert!(!cache.exists());
    }
}
