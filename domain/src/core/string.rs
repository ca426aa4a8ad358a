//! String utilities for the domain layer.

/// Truncate a string to a maximum length with ellipsis (UTF-8 safe)
///
/// Uses byte length for max_len but ensures truncation occurs at valid
/// UTF-8 character boundaries.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let target = max_len.saturating_sub(3);
        let mut end = target.min(s.len());
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate("Buy milk", 20), "Buy milk");
        assert_eq!(truncate("Buy milk and eggs", 8), "Buy m...");
    }

    #[test]
    fn test_truncate_multibyte() {
        // "ü" is 2 bytes: target 3 falls inside the second "ü", back off to 2
        assert_eq!(truncate("üüüü", 6), "ü...");
        assert_eq!(truncate("日本語", 9), "日本語");
    }
}
