//! Trigonometry chain: identities, equations, plain simplification.

use std::sync::LazyLock;

use nm_parser::normalize_fragment;
use regex::Regex;

use super::{Chain, RouteInput};
use crate::request::SolveRequest;
use crate::validate::Diagnostic;

pub(crate) const CHAIN: Chain = &[
    ("identity", identity),
    ("equation", equation),
    ("simplify", simplify),
];

static RE_IDENTITY_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:prove|verify|show|identity)\b").expect("valid regex literal")
});

static RE_FILLER_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:prove|verify|show|that|the|identity|simplify|reduce|expand)\b\s*:?")
        .expect("valid regex literal")
});

fn body(input: &RouteInput<'_>) -> String {
    RE_FILLER_WORDS
        .replace_all(&input.extraction.equation_body, "")
        .trim()
        .to_string()
}

/// Split at the first `=` that is not part of `<=`, `>=` or `!=`.
fn split_equation(text: &str) -> Option<(&str, &str)> {
    let bytes = text.as_bytes();
    let idx = text.char_indices().find_map(|(i, c)| {
        let prev = i.checked_sub(1).map(|p| bytes[p]);
        (c == '=' && !matches!(prev, Some(b'<' | b'>' | b'!'))).then_some(i)
    })?;
    Some((&text[..idx], &text[idx + 1..]))
}

/// `lhs = rhs` to check as an identity becomes `lhs - (rhs)`, which
/// simplifies to zero when the identity holds.
fn identity(input: &RouteInput<'_>) -> Option<SolveRequest> {
    if !RE_IDENTITY_WORDS.is_match(input.source) {
        return None;
    }
    let text = body(input);
    let expr = match split_equation(&text) {
        Some((lhs, rhs)) => {
            let lhs = normalize_fragment(lhs);
            let rhs = normalize_fragment(rhs);
            if lhs.is_empty() || rhs.is_empty() {
                return None;
            }
            format!("{lhs} - ({rhs})")
        }
        None => normalize_fragment(&text),
    };
    (!expr.is_empty()).then_some(SolveRequest::TrigSimplify { expr })
}

fn equation(input: &RouteInput<'_>) -> Option<SolveRequest> {
    let text = body(input);
    let (lhs, rhs) = split_equation(&text)?;
    let lhs = normalize_fragment(lhs);
    let rhs = normalize_fragment(rhs);
    if lhs.is_empty() || rhs.is_empty() {
        return None;
    }
    Some(SolveRequest::TrigSolve { lhs, rhs })
}

fn simplify(input: &RouteInput<'_>) -> Option<SolveRequest> {
    let expr = normalize_fragment(&body(input));
    (!expr.is_empty()).then_some(SolveRequest::TrigSimplify { expr })
}

pub(crate) fn gap(_: &RouteInput<'_>) -> Option<Diagnostic> {
    None
}

pub(crate) fn warm_up() {
    LazyLock::force(&RE_IDENTITY_WORDS);
    LazyLock::force(&RE_FILLER_WORDS);
}

#[cfg(test)]
mod tests {
    use super::super::test_support::route_text;
    use super::*;
    use crate::family::RouteFamily;

    fn trig(raw: &str) -> SolveRequest {
        route_text(RouteFamily::Trigonometry, raw).unwrap()
    }

    #[test]
    fn test_simplify_without_equals() {
        assert_eq!(
            trig("\\sin^{2}(x) + \\cos^{2}(x)"),
            SolveRequest::TrigSimplify {
                expr: "sin(x)**2 + cos(x)**2".into()
            }
        );
    }

    #[test]
    fn test_equation() {
        assert_eq!(
            trig("\\sin(x) = 0.5"),
            SolveRequest::TrigSolve {
                lhs: "sin(x)".into(),
                rhs: "0.5".into()
            }
        );
    }

    #[test]
    fn test_identity_becomes_difference() {
        assert_eq!(
            trig("prove \\sin^{2}(x) + \\cos^{2}(x) = 1"),
            SolveRequest::TrigSimplify {
                expr: "sin(x)**2 + cos(x)**2 - (1)".into()
            }
        );
    }

    #[test]
    fn test_split_equation_skips_relations() {
        assert_eq!(split_equation("a <= b = c"), Some(("a <= b ", " c")));
        assert_eq!(split_equation("a != b"), None);
    }
}
