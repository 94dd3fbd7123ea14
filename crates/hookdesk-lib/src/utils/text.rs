// Text helpers for log summaries

/// Maximum characters kept in payload and response summaries
pub const SUMMARY_MAX_CHARS: usize = 200;

/// Truncate to at most `max_chars` characters (not bytes)
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}

/// Truncate to [`SUMMARY_MAX_CHARS`]
pub fn summarize(text: &str) -> String {
    truncate_chars(text, SUMMARY_MAX_CHARS)
}

/// Mask a secret for display, keeping the last four characters
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count == 0 {
        return String::new();
    }
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("héllo wörld", 4), "héll");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_summarize_limit() {
        let long = "x".repeat(450);
        assert_eq!(summarize(&long).chars().count(), SUMMARY_MAX_CHARS);

        let exact = "y".repeat(SUMMARY_MAX_CHARS);
        assert_eq!(summarize(&exact), exact);
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret(""), "");
        assert_eq!(mask_secret("abc"), "***");
        assert_eq!(mask_secret("sk_live_1234"), "********1234");
    }
}
