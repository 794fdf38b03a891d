use std::collections::BTreeSet;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::model::{BillableRecord, PricingStep, RateCard, RuleType};
use crate::utils::error::{ExplainError, Result};

/// Decompose a record into its ordered pricing steps and the rounded total.
///
/// Exactly one `base` step first, then one step per distinct modifier key in
/// ascending lexical key order. Lexical sorting, never map iteration order,
/// keeps the sequence reproducible. Step values carry `rounding + 2`
/// fractional digits; only the total is rounded to `rounding` places, with
/// round-half-to-even.
pub fn derive_steps(record: &BillableRecord, card: &RateCard) -> Result<(Vec<PricingStep>, Decimal)> {
    if let Some(found) = record.currency() {
        if found != card.currency {
            return Err(ExplainError::CurrencyMismatch {
                record_id: record.id().to_string(),
                expected: card.currency.clone(),
                found: found.to_string(),
            });
        }
    }

    let scale = card.rounding + 2;
    let mut steps = Vec::with_capacity(1 + record.modifiers().len());

    let base = base_step(record, card, scale)?;
    let base_value = base.value;
    steps.push(base);

    // Distinct keys only; a modifier listed twice still contributes once.
    let modifier_keys: BTreeSet<&String> = record.modifiers().iter().collect();
    for key in modifier_keys {
        steps.push(modifier_step(record, card, key, base_value, scale)?);
    }

    let mut total = steps
        .iter()
        .map(|s| s.value)
        .sum::<Decimal>()
        .round_dp_with_strategy(card.rounding, RoundingStrategy::MidpointNearestEven);
    // Pin the scale so the total always serializes with exactly `rounding`
    // fractional digits.
    total.rescale(card.rounding);

    Ok((steps, total))
}

fn base_step(record: &BillableRecord, card: &RateCard, scale: u32) -> Result<PricingStep> {
    let key = record.rate_key();
    let entry = card.entry(key).ok_or_else(|| ExplainError::RateKeyNotFound {
        key: key.to_string(),
        record_id: record.id().to_string(),
    })?;

    let (value, note) = match record {
        BillableRecord::Task { quantity, .. } => match entry.rule_type {
            RuleType::Hour | RuleType::Unit => (
                *quantity * entry.value,
                Some(format!(
                    "{} {} @ {}",
                    quantity,
                    entry.rule_type.as_str(),
                    entry.value
                )),
            ),
            RuleType::Flat => (entry.value, Some("flat".to_string())),
            RuleType::Percent => {
                return Err(ExplainError::RulesMalformed {
                    detail: format!("entry \"{key}\" has type percent, unusable as a task base rate"),
                })
            }
        },
        BillableRecord::Expense { amount, .. } => match entry.rule_type {
            RuleType::Percent => (
                *amount * entry.value / Decimal::ONE_HUNDRED,
                Some(format!("{}% of {}", entry.value, amount)),
            ),
            RuleType::Flat => (entry.value, Some("flat".to_string())),
            RuleType::Hour | RuleType::Unit => {
                return Err(ExplainError::RulesMalformed {
                    detail: format!(
                        "entry \"{key}\" has type {}, unusable as an expense base rate",
                        entry.rule_type.as_str()
                    ),
                })
            }
        },
    };

    Ok(PricingStep {
        step_kind: "base".to_string(),
        rule_key: key.to_string(),
        value: at_scale(value, scale),
        note,
    })
}

/// Round to `scale` fractional digits and pin the scale, so intermediate
/// values serialize identically no matter how they were computed.
fn at_scale(value: Decimal, scale: u32) -> Decimal {
    let mut v = value.round_dp_with_strategy(scale, RoundingStrategy::MidpointNearestEven);
    v.rescale(scale);
    v
}

fn modifier_step(
    record: &BillableRecord,
    card: &RateCard,
    key: &str,
    base_value: Decimal,
    scale: u32,
) -> Result<PricingStep> {
    let entry = card.entry(key).ok_or_else(|| ExplainError::RateKeyNotFound {
        key: key.to_string(),
        record_id: record.id().to_string(),
    })?;

    // Percent modifiers apply to the base step, not the running total, so
    // their contributions stay independent of modifier ordering.
    let (value, note) = match entry.rule_type {
        RuleType::Percent => (
            base_value * entry.value / Decimal::ONE_HUNDRED,
            Some(format!("{}% of base", entry.value)),
        ),
        RuleType::Flat => (entry.value, None),
        RuleType::Hour | RuleType::Unit => {
            return Err(ExplainError::RulesMalformed {
                detail: format!(
                    "entry \"{key}\" has type {}, unusable as a modifier",
                    entry.rule_type.as_str()
                ),
            })
        }
    };

    // Modifier name: the last segment of the rule key.
    let name = key.rsplit('.').next().unwrap_or(key);

    Ok(PricingStep {
        step_kind: format!("modifier:{name}"),
        rule_key: key.to_string(),
        value: at_scale(value, scale),
        note,
    })
}
