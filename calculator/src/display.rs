//! Calculator buffer rendering.

use valuta_common::group_thousands;

/// Group the raw input buffer for display, keeping a partially typed
/// fraction intact (`"1234."` renders as `"1,234."`).
pub fn format_input_display(buffer: &str) -> String {
    group_thousands(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_input_display() {
        assert_eq!(format_input_display("0"), "0");
        assert_eq!(format_input_display("1234."), "1,234.");
        assert_eq!(format_input_display("-1234567.05"), "-1,234,567.05");
    }
}
