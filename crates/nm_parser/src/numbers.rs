//! Numeric-list scanning for statistics and counting inputs.

use std::sync::LazyLock;

use regex::Regex;

static RE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+\.?\d*").expect("valid regex literal"));

/// Every number literal in `text`, in order. Tokens that fail to parse are
/// skipped, never reported.
pub fn extract_numbers(text: &str) -> Vec<f64> {
    RE_NUMBER
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list() {
        assert_eq!(
            extract_numbers("mean of 1, 2.5, -3 and 4."),
            vec![1.0, 2.5, -3.0, 4.0]
        );
    }

    #[test]
    fn test_none() {
        assert!(extract_numbers("median of nothing").is_empty());
    }
}
