use num_format::{Locale, ToFormattedString};
use rust_decimal::{Decimal, RoundingStrategy};

/// Currency-format an amount for display: symbol placement plus thousands
/// grouping. Purely presentational; canonical hashing never sees this output.
pub fn format_amount(currency: &str, amount: Decimal, rounding: u32) -> String {
    let mut fixed = amount.round_dp_with_strategy(rounding, RoundingStrategy::MidpointNearestEven);
    fixed.rescale(rounding);
    let raw = fixed.to_string();
    let (sign, digits) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    let grouped = int_part
        .parse::<i128>()
        .map(|n| n.to_formatted_string(&Locale::en))
        .unwrap_or_else(|_| int_part.to_string());
    let number = if frac_part.is_empty() {
        grouped
    } else {
        format!("{grouped}.{frac_part}")
    };
    match symbol(currency) {
        Some(sym) => format!("{sign}{sym}{number}"),
        None => format!("{sign}{currency} {number}"),
    }
}

fn symbol(code: &str) -> Option<&'static str> {
    match code {
        "ILS" => Some("₪"),
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_ils_symbol_and_grouping() {
        assert_eq!(format_amount("ILS", dec!(1600), 2), "₪1,600.00");
        assert_eq!(format_amount("ILS", dec!(1234567.5), 2), "₪1,234,567.50");
    }

    #[test]
    fn test_negative_amount() {
        assert_eq!(format_amount("ILS", dec!(-50), 2), "-₪50.00");
    }

    #[test]
    fn test_unknown_code_falls_back_to_prefix() {
        assert_eq!(format_amount("XYZ", dec!(12.5), 2), "XYZ 12.50");
    }

    #[test]
    fn test_zero_rounding_places() {
        assert_eq!(format_amount("USD", dec!(999.4), 0), "$999");
    }
}
