//! Data models and configuration.

pub mod config;
pub mod records;

pub use config::{MusepopConfig, DEFAULT_VISITOR_THRESHOLD};
pub use records::{
    FeatureRow, ModelMetadata, Provenance, QuantityStatement, RankedEntityRecord,
    ResolvedQuantity,
};
