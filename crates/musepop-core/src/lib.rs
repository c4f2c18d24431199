//! Core library for the museum visitors / city population pipeline.
//!
//! This crate provides:
//! - Tolerant extraction of ranking tables from rendered HTML
//! - Population resolution from knowledge-graph statements
//! - Live / cache / bundled fallback for both sources
//! - Table storage, feature join and a log-log regression

pub mod error;
pub mod extract;
pub mod html;
pub mod knowledge;
pub mod models;
pub mod pipeline;
pub mod ranking;
pub mod reliability;
pub mod source;

pub use error::{ExtractionError, FetchError, MusepopError, Result, StoreError};
pub use html::Document;
pub use knowledge::{KnowledgeResolver, ResolutionMemo};
pub use models::{
    FeatureRow, ModelMetadata, MusepopConfig, Provenance, QuantityStatement, RankedEntityRecord,
    ResolvedQuantity,
};
pub use pipeline::{JsonStore, MemoryStore, OrdinaryLeastSquares, Pipeline, Store};
pub use ranking::extract_records;
pub use reliability::{PopulationSource, RankingSource};
pub use source::{HttpClient, HttpSource, OfflineSource};
