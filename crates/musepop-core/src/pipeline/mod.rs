//! Pipeline stages: ingest, enrich, build features, train, summarize, predict.

pub mod regression;
pub mod store;

pub use regression::{fit_log_log, metrics, FitMetrics, LinearFit, OrdinaryLeastSquares, Regressor};
pub use store::{Features, JsonStore, MemoryStore, Museums, Populations, Store, Table};

use std::collections::HashMap;

use chrono::Utc;
use tracing::{info, warn};

use crate::error::{MusepopError, Result};
use crate::knowledge::{KnowledgeResolver, ResolutionMemo};
use crate::models::{FeatureRow, ModelMetadata, MusepopConfig, Provenance, ResolvedQuantity};
use crate::reliability::{PopulationSource, RankingSource};
use crate::source::HttpSource;

/// Outcome of the ingest stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub stored: usize,
    pub provenance: Provenance,
}

/// Outcome of the enrich stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichReport {
    pub resolved: usize,
    /// Keys that could not be resolved, with the reason.
    pub failed: Vec<(String, String)>,
}

/// A visitor estimate from the latest model.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub population: u64,
    pub visitors: u64,
    pub model_version: String,
}

/// The data-gathering stages, bound to a configuration and an HTTP source.
pub struct Pipeline<'a, S: HttpSource> {
    config: &'a MusepopConfig,
    source: &'a S,
    offline: bool,
}

impl<'a, S: HttpSource> Pipeline<'a, S> {
    pub fn new(config: &'a MusepopConfig, source: &'a S) -> Self {
        Self {
            config,
            source,
            offline: false,
        }
    }

    /// Use only cached and bundled data.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Fetch the ranking, keep museums above the threshold and store them.
    pub fn ingest<St: Store>(&self, store: &mut St) -> Result<IngestReport> {
        let fetched = RankingSource::new(self.source, self.config)
            .offline(self.offline)
            .fetch(self.config.filter.visitor_threshold);

        store.replace_all::<Museums>(&fetched.records)?;
        info!(
            "Stored {} museums ({} data)",
            fetched.records.len(),
            fetched.provenance
        );

        Ok(IngestReport {
            stored: fetched.records.len(),
            provenance: fetched.provenance,
        })
    }

    /// Resolve the population of every city of the stored museums.
    ///
    /// Failures are logged and skipped. `progress` is called after each
    /// key with `(done, total, key)`.
    pub fn enrich<St, F>(&self, store: &mut St, mut progress: F) -> Result<EnrichReport>
    where
        St: Store,
        F: FnMut(usize, usize, &str),
    {
        let keys = city_keys(&store.read_all::<Museums>()?);
        let populations = PopulationSource::new(KnowledgeResolver::new(
            self.source,
            &self.config.sources,
        ))
        .offline(self.offline);

        let mut memo = ResolutionMemo::new();
        let mut resolved: Vec<ResolvedQuantity> = Vec::with_capacity(keys.len());
        let mut report = EnrichReport::default();

        for (i, key) in keys.iter().enumerate() {
            match populations.lookup(key, &mut memo) {
                Ok(Some(quantity)) => resolved.push(quantity),
                Ok(None) => {
                    warn!("No population found for {}", key);
                    report.failed.push((key.clone(), "not found".to_string()));
                }
                Err(e) => {
                    warn!("Population lookup failed for {}: {}", key, e);
                    report.failed.push((key.clone(), e.to_string()));
                }
            }
            progress(i + 1, keys.len(), key);
        }

        store.replace_all::<Populations>(&resolved)?;
        report.resolved = resolved.len();
        info!(
            "Stored {} populations, {} keys unresolved",
            report.resolved,
            report.failed.len()
        );
        Ok(report)
    }
}

/// Distinct join keys of the museums, in first-seen order.
fn city_keys(museums: &[crate::models::RankedEntityRecord]) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for key in museums.iter().filter_map(|m| m.join_key()) {
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}

/// Join museums above `threshold` with the latest population of their city.
///
/// Replaces the feature table and returns its row count. Empty inputs
/// clear the table.
pub fn build_features<St: Store>(store: &mut St, threshold: u64) -> Result<usize> {
    let museums = store.read_all::<Museums>()?;
    let populations = store.read_all::<Populations>()?;

    if museums.is_empty() || populations.is_empty() {
        warn!("Empty museum or population table, clearing features");
        store.replace_all::<Features>(&[])?;
        return Ok(0);
    }

    // Dated beats undated, later date wins, later row wins ties
    let mut latest: HashMap<&str, &ResolvedQuantity> = HashMap::new();
    for population in &populations {
        let replace = latest
            .get(population.source_key.as_str())
            .is_none_or(|current| population.as_of >= current.as_of);
        if replace {
            latest.insert(population.source_key.as_str(), population);
        }
    }

    let rows: Vec<FeatureRow> = museums
        .iter()
        .filter(|m| m.meets_threshold(threshold))
        .filter_map(|m| {
            let key = m.join_key()?;
            let population = latest.get(key.as_str())?;
            Some(FeatureRow {
                name: m.name.clone(),
                group_label: m.group_label.clone(),
                category_label: m.category_label.clone(),
                magnitude: m.magnitude?,
                period: m.period,
                quantity: population.quantity,
                as_of: population.as_of,
            })
        })
        .collect();

    store.replace_all::<Features>(&rows)?;
    info!("Built feature table with {} rows", rows.len());
    Ok(rows.len())
}

/// Fit the log-log model on the feature table and register it.
pub fn train<St: Store, R: Regressor>(store: &mut St, regressor: &R) -> Result<ModelMetadata> {
    let features = store.read_all::<Features>()?;
    if features.is_empty() {
        return Err(MusepopError::EmptyDataset(
            "no training data in the feature table".to_string(),
        ));
    }

    let pairs: Vec<(u64, u64)> = features
        .iter()
        .map(|row| (row.quantity, row.magnitude))
        .filter(|&(population, visitors)| population > 0 && visitors > 0)
        .collect();

    let (fit, n_samples) = fit_log_log(regressor, &pairs).ok_or_else(|| {
        MusepopError::EmptyDataset("no rows with positive population and visitors".to_string())
    })?;

    let observed: Vec<f64> = pairs.iter().map(|&(_, v)| v as f64).collect();
    let predicted: Vec<f64> = pairs
        .iter()
        .map(|&(p, _)| fit.apply((p as f64).ln()).exp())
        .collect();
    let scores = metrics(&observed, &predicted);

    let trained_at = Utc::now();
    let model = ModelMetadata {
        version: trained_at.format("%Y%m%d%H%M%S").to_string(),
        coefficient: fit.slope,
        intercept: fit.intercept,
        r2: scores.r2,
        rmse: scores.rmse,
        mae: scores.mae,
        n_samples,
        trained_at,
    };
    store.register_model(&model)?;

    info!(
        "Trained model v{}: R²={:.4} RMSE={:.0} MAE={:.0} (n={})",
        model.version, model.r2, model.rmse, model.mae, model.n_samples
    );
    Ok(model)
}

/// Latest registered model.
pub fn summary<St: Store>(store: &St) -> Result<ModelMetadata> {
    store.get_latest_model()?.ok_or_else(|| {
        MusepopError::EmptyDataset("no trained model, run the pipeline first".to_string())
    })
}

/// Estimate annual visitors for a city population with the latest model.
pub fn predict<St: Store>(store: &St, population: u64) -> Result<Prediction> {
    let model = summary(store)?;
    Ok(Prediction {
        population,
        visitors: model.predict(population),
        model_version: model.version,
    })
}
