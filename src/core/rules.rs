use std::collections::BTreeMap;

use serde::Deserialize;

use crate::core::hash;
use crate::domain::model::{RateCard, RuleEntry};
use crate::domain::ports::RulesSource;
use crate::utils::error::{ExplainError, Result};

/// Upper bound on fractional digits. Step values carry `rounding + 2`
/// intermediate digits, which must stay well inside Decimal's 28-digit range.
const MAX_ROUNDING: u32 = 12;

/// On-disk shape of a rate card. Fractional rates are best written as
/// strings (`value = "12.50"`) so they enter the decimal domain exactly.
#[derive(Debug, Deserialize)]
struct RateCardFile {
    version: u32,
    currency: String,
    rounding: u32,
    #[serde(default)]
    entries: BTreeMap<String, RuleEntry>,
}

/// Parse a rate card from its raw bytes, pinning the card to those exact
/// bytes first. Any byte change, including comments or whitespace, yields a
/// different hash and invalidates prior pinned explanations.
pub fn parse_rate_card(raw: &[u8]) -> Result<RateCard> {
    let full_hash = hash::sha256_hex(raw);
    let short_hash = hash::fingerprint(&full_hash);

    let text = std::str::from_utf8(raw).map_err(|e| ExplainError::RulesMalformed {
        detail: format!("rate card is not valid UTF-8: {e}"),
    })?;
    let file: RateCardFile = toml::from_str(text).map_err(|e| ExplainError::RulesMalformed {
        detail: e.to_string(),
    })?;

    if file.currency.is_empty() {
        return Err(ExplainError::RulesMalformed {
            detail: "currency must be a non-empty ISO code".to_string(),
        });
    }
    if file.rounding > MAX_ROUNDING {
        return Err(ExplainError::RulesMalformed {
            detail: format!(
                "rounding must be between 0 and {MAX_ROUNDING}, got {}",
                file.rounding
            ),
        });
    }

    Ok(RateCard {
        version: file.version,
        currency: file.currency,
        rounding: file.rounding,
        entries: file.entries,
        hash: full_hash,
        short_hash,
    })
}

/// Resolve the active rate card through the rules source. The bytes are read
/// exactly once per call; the returned card's hash reflects the bytes used
/// for every computation in the same call.
pub async fn load<R: RulesSource + ?Sized>(rules: &R, source_ref: &str) -> Result<RateCard> {
    let raw = rules.read_rules_bytes(source_ref).await?;
    let card = parse_rate_card(&raw)?;
    tracing::debug!(
        "loaded rate card version {} ({} entries, hash {})",
        card.version,
        card.entries.len(),
        card.short_hash
    );
    Ok(card)
}
