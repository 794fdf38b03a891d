pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::local::{FileRulesSource, JsonRecordStore};
pub use crate::core::engine::ExplainEngine;
pub use domain::model::{
    BillableRecord, Explanation, OcrBlock, OcrState, OcrStatus, PricingStep, RateCard, RecordKind,
    RuleEntry, RuleType,
};
pub use domain::ports::{OcrProvider, RecordStore, RulesSource};
pub use utils::error::{ExplainError, Result};
