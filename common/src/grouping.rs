//! Thousands grouping for plain decimal strings.

/// Insert `,` every three digits of the integer part of `number`.
///
/// `number` is a plain decimal string (`-?\d*\.?\d*`). The sign and any
/// fractional part, including a trailing `.`, are kept as-is.
pub fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int_part, fraction) = match unsigned.find('.') {
        Some(idx) => unsigned.split_at(idx),
        None => (unsigned, ""),
    };

    let digits = int_part.len();
    let mut grouped = String::with_capacity(number.len() + digits / 3);
    grouped.push_str(sign);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped.push_str(fraction);
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("0"), "0");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("1234567.891"), "1,234,567.891");
        assert_eq!(group_thousands("-1234.5"), "-1,234.5");
    }

    #[test]
    fn test_partial_input_is_preserved() {
        assert_eq!(group_thousands("1234."), "1,234.");
        assert_eq!(group_thousands("-"), "-");
        assert_eq!(group_thousands("0.000001"), "0.000001");
    }
}
