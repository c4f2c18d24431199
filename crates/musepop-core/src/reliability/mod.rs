//! Fallback policy for both upstream sources.
//!
//! Rankings: live page -> snapshot cache -> bundled snapshot.
//! Populations: live resolution -> memo of earlier successes -> curated table.

pub mod bundled;

pub use bundled::{bundled_snapshot, curated_population};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{ExtractionError, FetchError, MusepopError};
use crate::knowledge::{KnowledgeResolver, ResolutionMemo};
use crate::models::{MusepopConfig, Provenance, RankedEntityRecord, ResolvedQuantity};
use crate::ranking::extract_records;
use crate::source::{HttpSource, JsonRequest};

/// Records returned by a ranking fetch, with the tier that produced them.
#[derive(Debug, Clone)]
pub struct RankingFetch {
    pub records: Vec<RankedEntityRecord>,
    pub provenance: Provenance,
}

/// Ranking table access with cache and bundled fallbacks.
pub struct RankingSource<'a, S: HttpSource> {
    source: &'a S,
    config: &'a MusepopConfig,
    offline: bool,
}

impl<'a, S: HttpSource> RankingSource<'a, S> {
    pub fn new(source: &'a S, config: &'a MusepopConfig) -> Self {
        Self {
            source,
            config,
            offline: false,
        }
    }

    /// Skip the live tier.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Records at or above `threshold`, from the first tier that has any.
    pub fn fetch(&self, threshold: u64) -> RankingFetch {
        let (records, provenance) = self.resolve_tier();

        let total = records.len();
        let records: Vec<RankedEntityRecord> = records
            .into_iter()
            .filter(|r| r.meets_threshold(threshold))
            .collect();

        info!(
            "{} of {} {} records have at least {} visitors",
            records.len(),
            total,
            provenance,
            threshold
        );
        RankingFetch {
            records,
            provenance,
        }
    }

    fn resolve_tier(&self) -> (Vec<RankedEntityRecord>, Provenance) {
        let cache_path = self.config.storage.cache_path();

        if !self.offline {
            match self.fetch_live() {
                Ok(records) => {
                    if let Err(e) = save_cache(&cache_path, &records) {
                        warn!("Could not write cache {}: {}", cache_path.display(), e);
                    }
                    return (records, Provenance::Live);
                }
                Err(e) => warn!("Live ranking unavailable ({}), using cached data", e),
            }
        }

        match load_cache(&cache_path) {
            Some(records) => (records, Provenance::Cache),
            None => {
                info!("No usable cache at {}, using bundled snapshot", cache_path.display());
                (
                    bundled_snapshot(&self.config.sources.ranking_source_url),
                    Provenance::Bundled,
                )
            }
        }
    }

    /// Fetch and extract the live page. An empty extraction counts as a failure.
    pub fn fetch_live(&self) -> Result<Vec<RankedEntityRecord>, MusepopError> {
        let sources = &self.config.sources;
        let request = JsonRequest::new(&sources.wiki_api_url, sources.ranking_timeout())
            .param("action", "parse")
            .param("page", sources.ranking_page.as_str())
            .param("prop", "text")
            .param("format", "json")
            .param("formatversion", "2");
        let body = self.source.get_json(&request)?;

        let html = rendered_text(&body)
            .ok_or_else(|| ExtractionError::MissingField("parse.text".to_string()))?;
        let records = extract_records(html, &sources.ranking_source_url)?;
        if records.is_empty() {
            return Err(ExtractionError::NoData.into());
        }

        info!("Fetched {} museums from the live page", records.len());
        Ok(records)
    }
}

/// Rendered HTML of a parse response (`formatversion=2` or the legacy `{"*": ...}` shape).
pub fn rendered_text(body: &Value) -> Option<&str> {
    let text = body.pointer("/parse/text")?;
    text.as_str()
        .or_else(|| text.get("*").and_then(Value::as_str))
}

/// Read the snapshot cache. Missing, unreadable or empty caches are `None`.
pub fn load_cache(path: &Path) -> Option<Vec<RankedEntityRecord>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            debug!("Cache {} not readable: {}", path.display(), e);
            return None;
        }
    };
    match serde_json::from_str::<Vec<RankedEntityRecord>>(&content) {
        Ok(records) if !records.is_empty() => Some(records),
        Ok(_) => None,
        Err(e) => {
            warn!("Ignoring malformed cache {}: {}", path.display(), e);
            None
        }
    }
}

/// Overwrite the snapshot cache through a temp file and rename.
pub fn save_cache(path: &Path, records: &[RankedEntityRecord]) -> Result<(), MusepopError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(records).map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
    })?;

    let temp_path = temp_path_for(path);
    fs::write(&temp_path, content)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Population lookups with memo and curated fallbacks.
pub struct PopulationSource<'a, S: HttpSource> {
    resolver: KnowledgeResolver<'a, S>,
    offline: bool,
}

impl<'a, S: HttpSource> PopulationSource<'a, S> {
    pub fn new(resolver: KnowledgeResolver<'a, S>) -> Self {
        Self {
            resolver,
            offline: false,
        }
    }

    /// Skip the live tier.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Population for a group key.
    ///
    /// A live miss falls back like a live failure. The live error is
    /// returned only when no fallback has the key.
    pub fn lookup(
        &self,
        key: &str,
        memo: &mut ResolutionMemo,
    ) -> Result<Option<ResolvedQuantity>, FetchError> {
        let mut live_error = None;

        if !self.offline {
            match self.resolver.resolve(key) {
                Ok(Some(resolved)) => {
                    debug!("Live population for {}: {}", key, resolved.quantity);
                    memo.record(&resolved);
                    return Ok(Some(resolved));
                }
                Ok(None) => debug!("No live population for {}", key),
                Err(e) => {
                    debug!("Population lookup for {} failed: {}", key, e);
                    live_error = Some(e);
                }
            }
        }

        if let Some(hit) = memo.get(key) {
            return Ok(Some(hit));
        }
        if let Some(curated) = curated_population(key) {
            return Ok(Some(curated));
        }

        match live_error {
            Some(e) => Err(e),
            None => Ok(None),
        }
    }
}
