use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::model::{BillableRecord, OcrStatus, RecordKind};
use crate::domain::ports::{OcrProvider, RecordStore, RulesSource};
use crate::utils::error::{ExplainError, Result};

/// Rate-card bytes from the local filesystem; the source ref is the path.
#[derive(Debug, Clone, Default)]
pub struct FileRulesSource;

impl FileRulesSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RulesSource for FileRulesSource {
    async fn read_rules_bytes(&self, source_ref: &str) -> Result<Vec<u8>> {
        tokio::fs::read(source_ref)
            .await
            .map_err(|e| ExplainError::RulesUnavailable {
                source_ref: source_ref.to_string(),
                reason: e.to_string(),
            })
    }
}

/// On-disk fixture shape for the JSON-backed store: the records plus the OCR
/// statuses keyed by expense id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordFixture {
    #[serde(default)]
    pub records: Vec<BillableRecord>,
    #[serde(default)]
    pub ocr: HashMap<String, OcrStatus>,
}

/// Record store and OCR provider backed by a JSON fixture file. Stands in
/// for the back-office database in the CLI and in tests.
#[derive(Debug, Clone, Default)]
pub struct JsonRecordStore {
    fixture: RecordFixture,
}

impl JsonRecordStore {
    pub fn new(fixture: RecordFixture) -> Self {
        Self { fixture }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let fixture: RecordFixture = serde_json::from_str(&text)?;
        Ok(Self { fixture })
    }
}

#[async_trait]
impl RecordStore for JsonRecordStore {
    async fn get_record(&self, kind: RecordKind, id: &str) -> Result<BillableRecord> {
        self.fixture
            .records
            .iter()
            .find(|r| r.kind() == kind && r.id() == id)
            .cloned()
            .ok_or_else(|| ExplainError::RecordNotFound {
                kind,
                id: id.to_string(),
            })
    }
}

#[async_trait]
impl OcrProvider for JsonRecordStore {
    async fn get_status(&self, expense_id: &str) -> Result<OcrStatus> {
        Ok(self
            .fixture
            .ocr
            .get(expense_id)
            .copied()
            .unwrap_or_default())
    }
}
