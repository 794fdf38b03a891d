use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::hash;
use crate::domain::model::PricingStep;

/// ASCII unit separator. Never appears in step kinds, rule keys, or rendered
/// decimals, so fields cannot bleed into each other in the preimage.
const FIELD_SEP: char = '\u{1f}';

/// Render a decimal with exactly `dp` fractional digits: no thousands
/// separators, no locale, trailing zeros padded.
pub fn render_fixed(value: Decimal, dp: u32) -> String {
    let mut fixed = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven);
    fixed.rescale(dp);
    fixed.to_string()
}

/// Build the canonical string for an explanation: every step's kind, rule
/// key, and fixed-format value in step order, then the rendered total, then
/// the rules fingerprint. Byte-identical inputs produce byte-identical
/// output; step order is part of the preimage.
pub fn canonical_string(
    steps: &[PricingStep],
    total: Decimal,
    rounding: u32,
    rules_hash: &str,
) -> String {
    let mut fields = Vec::with_capacity(steps.len() * 3 + 2);
    for step in steps {
        fields.push(step.step_kind.clone());
        fields.push(step.rule_key.clone());
        fields.push(render_fixed(step.value, rounding));
    }
    fields.push(render_fixed(total, rounding));
    fields.push(rules_hash.to_string());

    let sep = FIELD_SEP.to_string();
    fields.join(&sep)
}

/// First 12 hex chars of SHA-256 over the canonical string's UTF-8 bytes.
pub fn pricing_hash(canonical: &str) -> String {
    hash::fingerprint(&hash::sha256_hex(canonical.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn step(kind: &str, key: &str, value: Decimal) -> PricingStep {
        PricingStep {
            step_kind: kind.to_string(),
            rule_key: key.to_string(),
            value,
            note: None,
        }
    }

    #[test]
    fn test_render_fixed_pads_and_rounds() {
        assert_eq!(render_fixed(dec!(1600), 2), "1600.00");
        assert_eq!(render_fixed(dec!(12.005), 2), "12.00");
        assert_eq!(render_fixed(dec!(12.015), 2), "12.02");
        assert_eq!(render_fixed(dec!(7.5), 0), "8");
        assert_eq!(render_fixed(dec!(8.5), 0), "8");
    }

    #[test]
    fn test_canonical_layout() {
        let steps = vec![step("base", "rates.hour_electric", dec!(1600))];
        let canonical = canonical_string(&steps, dec!(1600.00), 2, "abc123def456");
        assert_eq!(
            canonical,
            "base\u{1f}rates.hour_electric\u{1f}1600.00\u{1f}1600.00\u{1f}abc123def456"
        );
    }

    #[test]
    fn test_step_order_changes_hash() {
        let a = step("modifier:a", "a", dec!(10));
        let b = step("modifier:b", "b", dec!(20));
        let forward = canonical_string(&[a.clone(), b.clone()], dec!(30), 2, "ffffffffffff");
        let reversed = canonical_string(&[b, a], dec!(30), 2, "ffffffffffff");
        assert_ne!(forward, reversed);
        assert_ne!(pricing_hash(&forward), pricing_hash(&reversed));
    }

    #[test]
    fn test_notes_do_not_affect_hash() {
        let mut with_note = step("base", "rates.day", dec!(500));
        with_note.note = Some("flat".to_string());
        let without_note = step("base", "rates.day", dec!(500));
        assert_eq!(
            canonical_string(&[with_note], dec!(500), 2, "000000000000"),
            canonical_string(&[without_note], dec!(500), 2, "000000000000")
        );
    }

    #[test]
    fn test_pricing_hash_shape() {
        let h = pricing_hash("anything");
        assert_eq!(h.len(), 12);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
