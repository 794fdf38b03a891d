use crate::domain::model::{BillableRecord, OcrStatus, RecordKind};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Upstream record storage. Resolves a record by kind and id or fails with
/// `RecordNotFound`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get_record(&self, kind: RecordKind, id: &str) -> Result<BillableRecord>;
}

/// Source of the active rate card's raw bytes. The engine reads the bytes
/// exactly once per explanation; any caching lives behind this port and must
/// still hand back the bytes the hash is computed over.
#[async_trait]
pub trait RulesSource: Send + Sync {
    async fn read_rules_bytes(&self, source_ref: &str) -> Result<Vec<u8>>;
}

/// OCR status lookup, consulted for expenses only.
#[async_trait]
pub trait OcrProvider: Send + Sync {
    async fn get_status(&self, expense_id: &str) -> Result<OcrStatus>;
}
