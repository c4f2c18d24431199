//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::MusepopError;

/// Default minimum annual visitor count for a museum to be kept.
pub const DEFAULT_VISITOR_THRESHOLD: u64 = 2_000_000;

/// Main configuration for the musepop pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MusepopConfig {
    /// Upstream source configuration.
    pub sources: SourceConfig,

    /// Record filtering configuration.
    pub filter: FilterConfig,

    /// Local storage configuration.
    pub storage: StorageConfig,
}

/// Upstream endpoints and request identification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// MediaWiki API serving the rendered ranking page and page props.
    pub wiki_api_url: String,

    /// Title of the ranking page.
    pub ranking_page: String,

    /// Human-facing URL recorded as provenance on every ranked record.
    pub ranking_source_url: String,

    /// Wikibase API serving entity statements.
    pub knowledge_api_url: String,

    /// Property holding the quantity (population).
    pub quantity_property: String,

    /// Qualifier holding the point-in-time date.
    pub point_in_time_qualifier: String,

    /// User-Agent sent with every request.
    pub user_agent: String,

    /// Optional bearer credential for the knowledge API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knowledge_token: Option<String>,

    /// Timeout for the ranking page fetch, in seconds.
    pub ranking_timeout_secs: u64,

    /// Timeout for each knowledge lookup, in seconds.
    pub lookup_timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            wiki_api_url: "https://en.wikipedia.org/w/api.php".to_string(),
            ranking_page: "List_of_most-visited_museums".to_string(),
            ranking_source_url: "https://en.wikipedia.org/wiki/List_of_most-visited_museums"
                .to_string(),
            knowledge_api_url: "https://www.wikidata.org/w/api.php".to_string(),
            quantity_property: "P1082".to_string(),
            point_in_time_qualifier: "P585".to_string(),
            user_agent: concat!("musepop/", env!("CARGO_PKG_VERSION"), " (museum-data-pipeline)")
                .to_string(),
            knowledge_token: None,
            ranking_timeout_secs: 30,
            lookup_timeout_secs: 15,
        }
    }
}

impl SourceConfig {
    pub fn ranking_timeout(&self) -> Duration {
        Duration::from_secs(self.ranking_timeout_secs)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }
}

/// Record filtering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Minimum magnitude (annual visitors) to keep a ranked record.
    pub visitor_threshold: u64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            visitor_threshold: DEFAULT_VISITOR_THRESHOLD,
        }
    }
}

/// Local storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the snapshot cache and table files.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

impl StorageConfig {
    /// Path of the ranking snapshot cache.
    pub fn cache_path(&self) -> PathBuf {
        self.data_dir.join("museums_cache.json")
    }

    /// Directory of the table files.
    pub fn tables_dir(&self) -> PathBuf {
        self.data_dir.join("tables")
    }
}

impl MusepopConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Apply `MUSEPOP_*` environment overrides.
    pub fn with_env_overrides(self) -> Result<Self, MusepopError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, MusepopError> {
        if let Some(agent) = lookup("MUSEPOP_USER_AGENT") {
            self.sources.user_agent = agent;
        }
        if let Some(token) = lookup("MUSEPOP_KNOWLEDGE_TOKEN").filter(|t| !t.is_empty()) {
            self.sources.knowledge_token = Some(token);
        }
        if let Some(dir) = lookup("MUSEPOP_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup("MUSEPOP_VISITOR_THRESHOLD") {
            self.filter.visitor_threshold = raw.trim().parse().map_err(|_| {
                MusepopError::Config(format!("MUSEPOP_VISITOR_THRESHOLD is not a number: {raw}"))
            })?;
        }
        Ok(self)
    }
}
