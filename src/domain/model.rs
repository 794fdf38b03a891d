use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which side of the billing model a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Task,
    Expense,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Expense => "expense",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "task" => Some(Self::Task),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit semantics of a rate-card entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    /// Per-hour rate, multiplied by a task's quantity.
    Hour,
    /// Per-unit rate, multiplied by a task's quantity.
    Unit,
    /// Fixed amount, quantity-independent.
    Flat,
    /// Percentage, of an expense amount (base) or of the base step (modifier).
    Percent,
}

impl RuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Unit => "unit",
            Self::Flat => "flat",
            Self::Percent => "percent",
        }
    }
}

/// One rule definition inside a rate card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleEntry {
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    pub value: Decimal,
}

/// A versioned rate card, pinned to the exact bytes it was loaded from.
///
/// `version` is author-declared; `hash`/`short_hash` are derived from the raw
/// bytes. The two are independent signals: the same version number over
/// different bytes still yields a different hash.
#[derive(Debug, Clone)]
pub struct RateCard {
    pub version: u32,
    pub currency: String,
    pub rounding: u32,
    pub entries: BTreeMap<String, RuleEntry>,
    /// Full 64-char hex SHA-256 of the raw rules bytes.
    pub hash: String,
    /// First 12 hex chars of `hash`, the display/pinning fingerprint.
    pub short_hash: String,
}

impl RateCard {
    pub fn entry(&self, key: &str) -> Option<&RuleEntry> {
        self.entries.get(key)
    }
}

/// A billable record as resolved by the upstream store.
///
/// Task and expense are distinct variants rather than one shape with optional
/// fields; the step deriver matches on the tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum BillableRecord {
    Task {
        id: String,
        rate_key: String,
        quantity: Decimal,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        currency: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        modifiers: Vec<String>,
    },
    Expense {
        id: String,
        rate_key: String,
        amount: Decimal,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        currency: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        modifiers: Vec<String>,
    },
}

impl BillableRecord {
    pub fn id(&self) -> &str {
        match self {
            Self::Task { id, .. } | Self::Expense { id, .. } => id,
        }
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Task { .. } => RecordKind::Task,
            Self::Expense { .. } => RecordKind::Expense,
        }
    }

    pub fn rate_key(&self) -> &str {
        match self {
            Self::Task { rate_key, .. } | Self::Expense { rate_key, .. } => rate_key,
        }
    }

    pub fn currency(&self) -> Option<&str> {
        match self {
            Self::Task { currency, .. } | Self::Expense { currency, .. } => currency.as_deref(),
        }
    }

    pub fn modifiers(&self) -> &[String] {
        match self {
            Self::Task { modifiers, .. } | Self::Expense { modifiers, .. } => modifiers,
        }
    }
}

/// One contributing line of a price breakdown.
///
/// The order of steps in an explanation is part of the contract: reordering
/// changes the canonical string and therefore the pricing hash, even when the
/// total is unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingStep {
    /// `"base"` or `"modifier:<name>"`.
    pub step_kind: String,
    /// The rate-card entry key this step consulted.
    pub rule_key: String,
    pub value: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// OCR outcome for an expense, as reported by the OCR collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrState {
    #[default]
    Off,
    Abstain,
    Ok,
}

impl OcrState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Abstain => "abstain",
            Self::Ok => "ok",
        }
    }
}

/// Raw status returned by the OCR provider port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OcrStatus {
    pub status: OcrState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
}

/// OCR block embedded in an explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrBlock {
    pub enabled: bool,
    pub status: OcrState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
}

impl OcrBlock {
    /// The fixed block for records that never go through OCR (tasks).
    pub fn off() -> Self {
        Self {
            enabled: false,
            status: OcrState::Off,
            confidence: None,
        }
    }
}

impl From<OcrStatus> for OcrBlock {
    fn from(status: OcrStatus) -> Self {
        Self {
            enabled: status.status != OcrState::Off,
            status: status.status,
            confidence: status.confidence,
        }
    }
}

/// The assembled pricing explanation.
///
/// Constructed fresh on every request and never persisted by the engine.
/// Decimal fields serialize as exact-precision strings so the hash
/// verification property survives language and platform boundaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Explanation {
    pub id: String,
    pub kind: RecordKind,
    pub currency: String,
    pub steps: Vec<PricingStep>,
    pub total: Decimal,
    pub rules_version: u32,
    pub rules_hash: String,
    pub pricing_hash: String,
    pub ocr: OcrBlock,
    pub formatted_total: String,
}
