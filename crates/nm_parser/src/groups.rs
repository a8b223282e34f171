//! Balanced-group helpers shared by the normalizer and the router.
//!
//! All positions are byte offsets; delimiters are ASCII so slicing at them is
//! always on a char boundary.

/// Return the closing delimiter that pairs with `open`.
fn closer_for(open: u8) -> Option<u8> {
    match open {
        b'(' => Some(b')'),
        b'{' => Some(b'}'),
        b'[' => Some(b']'),
        _ => None,
    }
}

/// Find the index of the delimiter closing the one at `open_idx`.
///
/// Only the delimiter kind found at `open_idx` is counted, so `{a(b}` closes
/// at the `}` regardless of the stray parenthesis.
pub fn matching_close(s: &str, open_idx: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let open = *bytes.get(open_idx)?;
    let close = closer_for(open)?;
    let mut depth = 0usize;

    for (i, &b) in bytes.iter().enumerate().skip(open_idx) {
        if b == open {
            depth += 1;
        } else if b == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Read a `{...}` group starting at `start` (after optional whitespace).
/// Returns the inner text and the index just past the closing brace.
pub fn take_brace_group(s: &str, start: usize) -> Option<(&str, usize)> {
    let offset = s[start..].len() - s[start..].trim_start().len();
    let open = start + offset;
    if s.as_bytes().get(open) != Some(&b'{') {
        return None;
    }
    let close = matching_close(s, open)?;
    Some((&s[open + 1..close], close + 1))
}

/// Split on `sep` at nesting depth zero, ignoring separators inside
/// parentheses, brackets and braces.
pub fn split_top_level(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;

    for (i, ch) in s.char_indices() {
        match ch {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            c if c == sep && depth == 0 => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

/// Whether the whole string is one parenthesized group: `(a+b)` but not `(a)+(b)`.
pub fn is_wrapped_in_parens(s: &str) -> bool {
    s.starts_with('(') && matching_close(s, 0) == Some(s.len() - 1)
}

/// Remove redundant outer parentheses: `((x+1))` → `x+1`.
pub fn strip_outer_parens(s: &str) -> &str {
    let mut current = s.trim();
    while current.len() >= 2 && is_wrapped_in_parens(current) {
        current = current[1..current.len() - 1].trim();
    }
    current
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_number(s: &str) -> bool {
    let mut seen_digit = false;
    let mut seen_dot = false;
    for c in s.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }
    seen_digit
}

/// Whether `s` can be used as an operand without extra parentheses:
/// an identifier, a number, a parenthesized group or a function call.
pub fn is_atomic(s: &str) -> bool {
    let s = s.trim();
    if s.is_empty() {
        return false;
    }
    if is_identifier(s) || is_number(s) || is_wrapped_in_parens(s) {
        return true;
    }
    // Function call: name(...) where the first '(' closes at the very end.
    match s.find('(') {
        Some(open) if open > 0 && is_identifier(&s[..open]) => {
            matching_close(s, open) == Some(s.len() - 1)
        }
        _ => false,
    }
}

/// Count `open` and `close` characters: `(opens, closes)`.
pub fn balance(s: &str, open: char, close: char) -> (usize, usize) {
    let opens = s.chars().filter(|&c| c == open).count();
    let closes = s.chars().filter(|&c| c == close).count();
    (opens, closes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_close_nested() {
        assert_eq!(matching_close("{a{b}c}", 0), Some(6));
        assert_eq!(matching_close("(x+(y))z", 0), Some(6));
        assert_eq!(matching_close("(x", 0), None);
    }

    #[test]
    fn test_take_brace_group_skips_whitespace() {
        let s = "\\frac {1}{x}";
        let (inner, end) = take_brace_group(s, 5).unwrap();
        assert_eq!(inner, "1");
        let (inner2, _) = take_brace_group(s, end).unwrap();
        assert_eq!(inner2, "x");
    }

    #[test]
    fn test_split_top_level_respects_nesting() {
        assert_eq!(split_top_level("x*cos(x*y)*2", '*'), vec!["x", "cos(x*y)", "2"]);
        assert_eq!(split_top_level("f(a,b),c", ','), vec!["f(a,b)", "c"]);
    }

    #[test]
    fn test_is_atomic() {
        assert!(is_atomic("x"));
        assert!(is_atomic("x_1"));
        assert!(is_atomic("3.5"));
        assert!(is_atomic("sin(x)"));
        assert!(is_atomic("(a+b)"));
        assert!(!is_atomic("a+b"));
        assert!(!is_atomic("(a)+(b)"));
        assert!(!is_atomic("sin(x)*2"));
        assert!(!is_atomic("-1"));
    }

    #[test]
    fn test_strip_outer_parens() {
        assert_eq!(strip_outer_parens("((x+1))"), "x+1");
        assert_eq!(strip_outer_parens("(a)+(b)"), "(a)+(b)");
    }
}
