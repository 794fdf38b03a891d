pub mod canonical;
pub mod engine;
pub mod hash;
pub mod rules;
pub mod steps;

pub use crate::domain::model::{BillableRecord, Explanation, PricingStep, RateCard, RecordKind};
pub use crate::domain::ports::{OcrProvider, RecordStore, RulesSource};
pub use crate::utils::error::Result;
