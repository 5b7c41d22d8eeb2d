//! Durable per-unit documentation store.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{EngineError, Result};

pub const DOC_STORE_SCHEMA_VERSION: u32 = 1;

/// File name of the persisted store inside a run directory
pub const DOC_STORE_FILE_NAME: &str = "raw_documentation.json";

/// Structured view of a unit's documentation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StructuredDoc {
    /// Language tag of the unit
    pub language: String,
    /// Comments-only extract of the annotated source
    pub documentation: String,
}

/// Everything captured for one source unit.
///
/// `annotated_code` keeps the repaired annotated source so every output
/// format can be re-rendered from the store without another generation
/// request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocRecord {
    /// Concatenated raw collaborator responses
    pub generated_text: String,
    pub structured_doc: StructuredDoc,
    /// Verified annotated source after reassembly and repair
    pub annotated_code: String,
    /// Unit text exactly as read from disk
    pub original_code: String,
}

/// In-memory store mapping unit names to their documentation records
#[derive(Debug, Clone, Default)]
pub struct DocStore {
    records: BTreeMap<String, DocRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedDocStore {
    schema_version: u32,
    records: BTreeMap<String, DocRecord>,
}

impl DocStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from disk. A missing file is an empty store.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        let persisted: PersistedDocStore = serde_json::from_slice(&bytes)?;
        if persisted.schema_version != DOC_STORE_SCHEMA_VERSION {
            return Err(EngineError::SchemaVersion {
                found: persisted.schema_version,
                expected: DOC_STORE_SCHEMA_VERSION,
            });
        }
        Ok(Self {
            records: persisted.records,
        })
    }

    /// Persist the store with an atomic tmp-then-rename write
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let persisted = PersistedDocStore {
            schema_version: DOC_STORE_SCHEMA_VERSION,
            records: self.records.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&persisted)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    pub fn insert(&mut self, name: String, record: DocRecord) {
        self.records.insert(name, record);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DocRecord> {
        self.records.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub const fn records(&self) -> &BTreeMap<String, DocRecord> {
        &self.records
    }
}
