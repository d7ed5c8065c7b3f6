//! en-US display formatting for report figures.
//!
//! The report projection already fixes the number of decimals; these helpers
//! only add thousands separators and the currency sign.

/// Groups the integer digits of a fixed-precision figure: `"20125"` becomes
/// `"20,125"`, `"-1986.5"` becomes `"-1,986.5"`. Text that is not a plain
/// decimal figure is returned unchanged.
pub fn format_number(figure: &str) -> String {
    let (sign, unsigned) = match figure.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", figure),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let is_plain = !integer.is_empty()
        && integer.bytes().all(|b| b.is_ascii_digit())
        && fraction.is_none_or(|f| f.bytes().all(|b| b.is_ascii_digit()));
    if !is_plain {
        return figure.to_string();
    }

    let mut grouped = String::with_capacity(figure.len() + integer.len() / 3);
    grouped.push_str(sign);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

/// Whole-dollar currency: `"17106"` becomes `"$17,106"`, `"-2028"` becomes
/// `"-$2,028"`.
pub fn format_currency(figure: &str) -> String {
    match figure.strip_prefix('-') {
        Some(rest) => format!("-${}", format_number(rest)),
        None => format!("${}", format_number(figure)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_number("0"), "0");
        assert_eq!(format_number("575"), "575");
        assert_eq!(format_number("7500"), "7,500");
        assert_eq!(format_number("1234567"), "1,234,567");
        assert_eq!(format_number("-1986"), "-1,986");
        assert_eq!(format_number("12345.67"), "12,345.67");
    }

    #[test]
    fn leaves_non_figures_alone() {
        assert_eq!(format_number("Infinity"), "Infinity");
        assert_eq!(format_number("N/A"), "N/A");
        assert_eq!(format_number(""), "");
        assert_eq!(format_number("1e21"), "1e21");
    }

    #[test]
    fn currency_puts_sign_before_dollar() {
        assert_eq!(format_currency("17106"), "$17,106");
        assert_eq!(format_currency("-2028"), "-$2,028");
        assert_eq!(format_currency("0"), "$0");
    }
}
