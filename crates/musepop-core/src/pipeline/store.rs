//! Table storage: whole-table replace, full reads and a model registry.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::StoreError;
use crate::models::{FeatureRow, ModelMetadata, RankedEntityRecord, ResolvedQuantity};

/// A named table and the row type it holds.
pub trait Table {
    const NAME: &'static str;
    type Row: Serialize + DeserializeOwned;
}

/// Ranked museums after threshold filtering.
pub struct Museums;

/// Resolved city populations.
pub struct Populations;

/// Museums joined with populations.
pub struct Features;

impl Table for Museums {
    const NAME: &'static str = "museums";
    type Row = RankedEntityRecord;
}

impl Table for Populations {
    const NAME: &'static str = "populations";
    type Row = ResolvedQuantity;
}

impl Table for Features {
    const NAME: &'static str = "features";
    type Row = FeatureRow;
}

const MODELS: &str = "models";

/// Storage backend used by the pipeline.
pub trait Store {
    /// Replace the whole content of a table.
    fn replace_all<T: Table>(&mut self, rows: &[T::Row]) -> Result<(), StoreError>;

    /// Every row of a table; empty when the table was never written.
    fn read_all<T: Table>(&self) -> Result<Vec<T::Row>, StoreError>;

    /// Append a model to the registry.
    fn register_model(&mut self, model: &ModelMetadata) -> Result<(), StoreError>;

    /// Most recently trained model.
    fn get_latest_model(&self) -> Result<Option<ModelMetadata>, StoreError>;
}

fn latest(models: Vec<ModelMetadata>) -> Option<ModelMetadata> {
    models.into_iter().max_by_key(|m| m.trained_at)
}

fn serialize_error(table: &str) -> impl FnOnce(serde_json::Error) -> StoreError + '_ {
    move |source| StoreError::Serialize {
        table: table.to_string(),
        source,
    }
}

/// In-memory tables, for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: HashMap<&'static str, Value>,
    models: Vec<ModelMetadata>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn replace_all<T: Table>(&mut self, rows: &[T::Row]) -> Result<(), StoreError> {
        let value = serde_json::to_value(rows).map_err(serialize_error(T::NAME))?;
        self.tables.insert(T::NAME, value);
        Ok(())
    }

    fn read_all<T: Table>(&self) -> Result<Vec<T::Row>, StoreError> {
        match self.tables.get(T::NAME) {
            Some(value) => {
                serde_json::from_value(value.clone()).map_err(serialize_error(T::NAME))
            }
            None => Ok(Vec::new()),
        }
    }

    fn register_model(&mut self, model: &ModelMetadata) -> Result<(), StoreError> {
        self.models.push(model.clone());
        Ok(())
    }

    fn get_latest_model(&self) -> Result<Option<ModelMetadata>, StoreError> {
        Ok(latest(self.models.clone()))
    }
}

/// One pretty-printed JSON file per table inside a directory.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{table}.json"))
    }

    fn io_error(table: &str) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
        move |source| StoreError::Io {
            table: table.to_string(),
            source,
        }
    }

    fn read_rows<R: DeserializeOwned>(&self, table: &str) -> Result<Vec<R>, StoreError> {
        let content = match fs::read_to_string(self.path(table)) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Self::io_error(table)(e)),
        };
        serde_json::from_str(&content).map_err(serialize_error(table))
    }

    fn write_rows<R: Serialize>(&self, table: &str, rows: &[R]) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(Self::io_error(table))?;

        let content = serde_json::to_string_pretty(rows).map_err(serialize_error(table))?;
        let path = self.path(table);
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, content).map_err(Self::io_error(table))?;
        fs::rename(&temp_path, &path).map_err(Self::io_error(table))?;

        debug!("Wrote {} rows to {}", rows.len(), path.display());
        Ok(())
    }
}

impl Store for JsonStore {
    fn replace_all<T: Table>(&mut self, rows: &[T::Row]) -> Result<(), StoreError> {
        self.write_rows(T::NAME, rows)
    }

    fn read_all<T: Table>(&self) -> Result<Vec<T::Row>, StoreError> {
        self.read_rows(T::NAME)
    }

    fn register_model(&mut self, model: &ModelMetadata) -> Result<(), StoreError> {
        let mut models: Vec<ModelMetadata> = self.read_rows(MODELS)?;
        models.push(model.clone());
        self.write_rows(MODELS, &models)
    }

    fn get_latest_model(&self) -> Result<Option<ModelMetadata>, StoreError> {
        Ok(latest(self.read_rows(MODELS)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Provenance;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn population(key: &str, quantity: u64) -> ResolvedQuantity {
        ResolvedQuantity {
            label: key.to_string(),
            entity_id: String::new(),
            quantity,
            as_of: None,
            source_key: key.to_string(),
            provenance: Provenance::Bundled,
        }
    }

    fn model(version: &str, second: u32) -> ModelMetadata {
        ModelMetadata {
            version: version.to_string(),
            coefficient: 0.5,
            intercept: 1.0,
            r2: 0.9,
            rmse: 10.0,
            mae: 5.0,
            n_samples: 3,
            trained_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, second).unwrap(),
        }
    }

    fn exercise<S: Store>(store: &mut S) {
        assert!(store.read_all::<Populations>().unwrap().is_empty());
        assert_eq!(store.get_latest_model().unwrap(), None);

        store
            .replace_all::<Populations>(&[population("Paris", 1), population("London", 2)])
            .unwrap();
        store
            .replace_all::<Populations>(&[population("Rome", 3)])
            .unwrap();
        assert_eq!(
            store.read_all::<Populations>().unwrap(),
            vec![population("Rome", 3)]
        );
        assert!(store.read_all::<Features>().unwrap().is_empty());

        store.register_model(&model("older", 1)).unwrap();
        store.register_model(&model("newer", 2)).unwrap();
        assert_eq!(store.get_latest_model().unwrap().unwrap().version, "newer");
    }

    #[test]
    fn test_memory_store() {
        exercise(&mut MemoryStore::new());
    }

    #[test]
    fn test_json_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::new(dir.path().join("tables"));
        exercise(&mut store);

        assert!(dir.path().join("tables/populations.json").exists());
        assert!(!dir.path().join("tables/populations.json.tmp").exists());

        // A second handle sees the same data
        let reopened = JsonStore::new(dir.path().join("tables"));
        assert_eq!(reopened.read_all::<Populations>().unwrap().len(), 1);
    }

    #[test]
    fn test_json_store_rejects_corrupt_table() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("museums.json"), "[{").unwrap();
        let store = JsonStore::new(dir.path());
        assert!(matches!(
            store.read_all::<Museums>(),
            Err(StoreError::Serialize { .. })
        ));
    }
}
