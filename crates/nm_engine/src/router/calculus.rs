//! Calculus chain: definite integral, indefinite integral, derivative,
//! limit, series.
//!
//! A definite-integral token is a strict superstring of the indefinite form,
//! so definite entries come first. Patterns match the LaTeX view; captured
//! parts are normalized individually.

use std::sync::LazyLock;

use nm_parser::groups::{matching_close, take_brace_group};
use nm_parser::normalize_fragment;
use regex::Regex;

use super::{ibp, Chain, RouteInput};
use crate::family::CalculusMarkers;
use crate::request::SolveRequest;
use crate::validate::{Diagnostic, DiagnosticKind};

pub(crate) const CHAIN: Chain = &[
    ("definite_integral_bounds", definite_bounds),
    ("definite_integral_words", definite_from_limits),
    ("indefinite_integral", indefinite),
    ("derivative_slash_parens", derivative_slash_parens),
    ("derivative_slash", derivative_slash),
    ("derivative_frac_parens", derivative_frac_parens),
    ("derivative_frac", derivative_frac),
    ("derivative_words", derivative_words),
    ("limit", limit),
    ("series", series),
];

const DEFAULT_SERIES_ORDER: u32 = 6;

// ============================================================================
// Patterns
// ============================================================================

/// One bound after `_` or `^` when it is not braced: a macro such as `\pi`
/// or a single, optionally negated, character.
static RE_BOUND_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\\[a-zA-Z]+|-?[0-9a-zA-Z])").expect("valid regex literal")
});

static RE_INT_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:integrate|integral\s+of|antiderivative\s+of)\s+(.+?)\s*d([a-zA-Z])(?:[^a-zA-Z]|$)",
    )
    .expect("valid regex literal")
});

/// `d` + letter not followed by another letter. The `d` starts a word or
/// follows a one-letter token (`xdx`), so `study` carries no `dy`.
static RE_DIFFERENTIAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^a-zA-Z]|(?:^|[^a-zA-Z\\])[a-zA-Z])d([a-zA-Z])(?:[^a-zA-Z]|$)")
        .expect("valid regex literal")
});

/// `d/dx(` and `\partial/\partial x(`, up to the opening parenthesis.
static RE_SLASH_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:d/d|\\partial\s*/\s*\\partial\s*)([a-zA-Z])\s*\(").expect("valid regex literal")
});

static RE_SLASH_SPACED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:d/d|\\partial\s*/\s*\\partial\s*)([a-zA-Z])\s+(.+)").expect("valid regex literal")
});

static RE_FRAC_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\frac\{(?:d|\\partial)\}\{(?:d|\\partial\s*)([a-zA-Z])\}\s*\(")
        .expect("valid regex literal")
});

static RE_FRAC_SPACED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\frac\{(?:d|\\partial)\}\{(?:d|\\partial\s*)([a-zA-Z])\}\s*(.+)")
        .expect("valid regex literal")
});

static RE_DERIVATIVE_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bderivative\s+of\s+(.+?)(?:\s+with\s+respect\s+to\s+([a-zA-Z]))?\s*$")
        .expect("valid regex literal")
});

/// Limit notations, in priority order. Every pattern names `var`, `point`
/// and `expr`.
static RE_LIMITS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?s)\\lim_\{\s*(?P<var>[a-zA-Z])\s*(?:\\to|\\rightarrow|->|→)\s*(?P<point>[^}]+)\}\s*(?P<expr>.+)",
        r"(?is)\blim\s+(?P<var>[a-zA-Z])\s*(?:→|->|\\to)\s*(?P<point>\S+)\s+(?P<expr>.+)",
        r"(?is)\blim_?\{?\s*(?P<var>[a-zA-Z])\s*(?:->|→|\\to)\s*(?P<point>[^}\s]+)\}?\s*(?P<expr>[^}\s].*)",
        r"(?is)\blimit\s*\(\s*(?P<expr>.+?)\s*,\s*(?P<var>[a-zA-Z])\s*,\s*(?P<point>.+?)\s*\)",
        r"(?is)\blimit\s+(?:as\s+)?(?P<var>[a-zA-Z])\s+(?:approaches|tends\s+to|to)\s+(?P<point>\S+)\s+(?:of\s+)?(?P<expr>.+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex literal"))
    .collect()
});

static RE_INFINITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([+-]?)\s*(?:∞|\\infty|infinity|inf|oo)$").expect("valid regex literal")
});

static RE_SERIES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:taylor|maclaurin|series)\b").expect("valid regex literal"));

static RE_SERIES_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:find|compute|expand|the|taylor|maclaurin|series|expansion|of)\b")
        .expect("valid regex literal")
});

static RE_SERIES_POINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:at|around|about)\s+(?:[a-zA-Z]\s*=\s*)?(-?[0-9a-zA-Z.\\]+)")
        .expect("valid regex literal")
});

static RE_SERIES_ORDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:to\s+)?order\s+(\d+)").expect("valid regex literal")
});

// ============================================================================
// Helpers
// ============================================================================

/// Split `body dx trailing` at the last differential. Returns the integrand
/// text and the variable.
fn split_differential(body: &str) -> Option<(&str, String)> {
    let caps = RE_DIFFERENTIAL.captures_iter(body).last()?;
    let var = caps.get(1)?;
    let integrand = body[..var.start() - 1].trim();
    if integrand.is_empty() {
        return None;
    }
    Some((integrand, var.as_str().to_string()))
}

/// Text after a bare `\int`. A following letter, `_` or `^` means another
/// macro or a bounded integral.
fn integral_body(source: &str) -> Option<&str> {
    let at = source.find("\\int")?;
    let body = &source[at + "\\int".len()..];
    match body.chars().next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '^' => None,
        _ => Some(body),
    }
}

/// Integrand and variable from `\int … dx` or a word form.
fn integrand_and_var(source: &str) -> Option<(String, String)> {
    if let Some(body) = integral_body(source) {
        if let Some((integrand, var)) = split_differential(body) {
            return Some((normalize_fragment(integrand), var));
        }
    }
    let caps = RE_INT_WORDS.captures(source)?;
    let integrand = caps[1].trim();
    if integrand.is_empty() {
        return None;
    }
    Some((normalize_fragment(integrand), caps[2].to_string()))
}

/// Read one bound starting at `start`: a balanced `{...}` group or a single
/// token. Returns the bound text and the index just past it.
fn read_bound(s: &str, start: usize) -> Option<(&str, usize)> {
    if let Some(group) = take_brace_group(s, start) {
        return Some(group);
    }
    let rest = &s[start..];
    let at = start + (rest.len() - rest.trim_start().len());
    let token = RE_BOUND_TOKEN.find(&s[at..])?;
    Some((token.as_str(), at + token.end()))
}

/// `\int_a^b body` in any mix of braced and bare bounds. Returns lower,
/// upper and the text after the upper bound.
fn integral_bounds(source: &str) -> Option<(&str, &str, &str)> {
    let start = source.find("\\int_")? + "\\int_".len();
    let (lower, after_lower) = read_bound(source, start)?;
    let rest = source[after_lower..].trim_start().strip_prefix('^')?;
    let (upper, after_upper) = read_bound(rest, 0)?;
    Some((lower, upper, &rest[after_upper..]))
}

/// Bound in canonical syntax; infinities become `oo`.
fn canonical_point(raw: &str) -> String {
    let raw = raw.trim();
    if let Some(caps) = RE_INFINITY.captures(raw) {
        return if &caps[1] == "-" { "-oo".into() } else { "oo".into() };
    }
    let point = normalize_fragment(raw);
    match point.as_str() {
        "-oo" | "+oo" | "oo" => point.trim_start_matches('+').to_string(),
        _ => point,
    }
}

fn format_bound(value: f64) -> String {
    if value.is_infinite() {
        return if value < 0.0 { "-oo".into() } else { "oo".into() };
    }
    value.to_string()
}

fn definite(integrand_text: &str, var: String, lower: &str, upper: &str) -> Option<SolveRequest> {
    let integrand = normalize_fragment(integrand_text);
    if integrand.is_empty() {
        return None;
    }
    Some(SolveRequest::DefiniteIntegral {
        integrand,
        var,
        lower: canonical_point(lower),
        upper: canonical_point(upper),
    })
}

// ============================================================================
// Integrals
// ============================================================================

fn definite_bounds(input: &RouteInput<'_>) -> Option<SolveRequest> {
    let (lower, upper, body) = integral_bounds(input.source)?;
    let (integrand, var) = split_differential(body)?;
    definite(integrand, var, lower, upper)
}

/// `integrate x^2 dx from 0 to 1`: bounds come from the extractor.
fn definite_from_limits(input: &RouteInput<'_>) -> Option<SolveRequest> {
    let (lo, hi) = input.extraction.limits?;
    let (integrand, var) = integrand_and_var(input.source)?;
    Some(SolveRequest::DefiniteIntegral {
        integrand,
        var,
        lower: format_bound(lo),
        upper: format_bound(hi),
    })
}

fn indefinite(input: &RouteInput<'_>) -> Option<SolveRequest> {
    let (integrand, var) = integrand_and_var(input.source)?;
    let decision = ibp::decide(&integrand, &var);
    match (decision.needed, decision.u_part, decision.dv_part) {
        (true, Some(u), Some(dv)) => Some(SolveRequest::IntegrationByParts {
            integrand,
            var,
            u,
            dv,
        }),
        _ => Some(SolveRequest::IndefiniteIntegral { integrand, var }),
    }
}

// ============================================================================
// Derivatives
// ============================================================================

fn derivative_request(expr_text: &str, var: &str) -> Option<SolveRequest> {
    let expr = normalize_fragment(expr_text);
    if expr.is_empty() {
        return None;
    }
    Some(SolveRequest::Derivative {
        expr,
        var: var.to_string(),
    })
}

fn derivative_from(re: &Regex, source: &str) -> Option<SolveRequest> {
    let caps = re.captures(source)?;
    derivative_request(&caps[2], &caps[1])
}

/// Operator followed by a parenthesized operand. The operand ends at the
/// matching parenthesis; directly chained groups such as `(x+1)(x-1)` are
/// one product. Anything after that is not part of the operand.
fn derivative_in_parens(re: &Regex, source: &str) -> Option<SolveRequest> {
    let caps = re.captures(source)?;
    let open = caps.get(0)?.end() - 1;
    let close = matching_close(source, open)?;
    let mut end = close;
    while source[end + 1..].starts_with('(') {
        end = matching_close(source, end + 1)?;
    }
    let operand = if end == close {
        &source[open + 1..close]
    } else {
        &source[open..=end]
    };
    derivative_request(operand, &caps[1])
}

fn derivative_slash_parens(input: &RouteInput<'_>) -> Option<SolveRequest> {
    derivative_in_parens(&RE_SLASH_OPEN, input.source)
}

fn derivative_slash(input: &RouteInput<'_>) -> Option<SolveRequest> {
    derivative_from(&RE_SLASH_SPACED, input.source)
}

fn derivative_frac_parens(input: &RouteInput<'_>) -> Option<SolveRequest> {
    derivative_in_parens(&RE_FRAC_OPEN, input.source)
}

fn derivative_frac(input: &RouteInput<'_>) -> Option<SolveRequest> {
    derivative_from(&RE_FRAC_SPACED, input.source)
}

fn derivative_words(input: &RouteInput<'_>) -> Option<SolveRequest> {
    let caps = RE_DERIVATIVE_WORDS.captures(input.source)?;
    let expr = normalize_fragment(&caps[1]);
    if expr.is_empty() {
        return None;
    }
    let var = caps
        .get(2)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| input.var_or_x());
    Some(SolveRequest::Derivative { expr, var })
}

// ============================================================================
// Limits and series
// ============================================================================

fn limit(input: &RouteInput<'_>) -> Option<SolveRequest> {
    RE_LIMITS.iter().find_map(|re| {
        let caps = re.captures(input.source)?;
        let expr = normalize_fragment(caps.name("expr")?.as_str());
        if expr.is_empty() {
            return None;
        }
        Some(SolveRequest::Limit {
            expr,
            var: caps.name("var")?.as_str().to_string(),
            point: canonical_point(caps.name("point")?.as_str()),
        })
    })
}

fn series(input: &RouteInput<'_>) -> Option<SolveRequest> {
    if !RE_SERIES.is_match(input.source) {
        return None;
    }

    let point = RE_SERIES_POINT
        .captures(input.source)
        .map(|c| canonical_point(&c[1]))
        .unwrap_or_else(|| "0".to_string());
    let order = RE_SERIES_ORDER
        .captures(input.source)
        .and_then(|c| c[1].parse().ok())
        .unwrap_or(DEFAULT_SERIES_ORDER);

    let body = RE_SERIES_POINT.replace_all(input.source, "");
    let body = RE_SERIES_ORDER.replace_all(&body, "");
    let body = RE_SERIES_WORDS.replace_all(&body, "");
    let expr = normalize_fragment(body.trim().trim_matches(|c: char| c == ',' || c == ':'));
    if expr.is_empty() {
        return None;
    }

    Some(SolveRequest::Series {
        expr,
        var: input.var_or_x(),
        point,
        order,
    })
}

// ============================================================================
// Gaps
// ============================================================================

pub(crate) fn gap(input: &RouteInput<'_>) -> Option<Diagnostic> {
    let markers = CalculusMarkers::scan(input.source);
    let lower = input.lower();

    if markers.integral || lower.contains("integrate") || lower.contains("integral") {
        return Some(Diagnostic::new(
            DiagnosticKind::MissingIntegrand,
            "Integral has no integrand",
            "Write the function to integrate between the integral sign and the differential",
            "Example: \\int x^{2} dx",
            "Your integral is missing the function to integrate.",
        ));
    }
    if markers.derivative || lower.contains("derivative") {
        return Some(Diagnostic::new(
            DiagnosticKind::MissingDerivativeExpression,
            "Derivative has no expression",
            "Write the expression to differentiate after the derivative operator",
            "Example: d/dx(x^3) or \\frac{d}{dx}(x^3)",
            "Your derivative is missing the expression to differentiate.",
        ));
    }
    if markers.limit {
        return Some(Diagnostic::new(
            DiagnosticKind::MissingLimitExpression,
            "Limit has no expression",
            "Write the expression after the limit clause",
            "Example: \\lim_{x \\to 0} \\frac{\\sin(x)}{x}",
            "Your limit is missing the expression to evaluate.",
        ));
    }
    None
}

pub(crate) fn warm_up() {
    LazyLock::force(&RE_BOUND_TOKEN);
    LazyLock::force(&RE_INT_WORDS);
    LazyLock::force(&RE_DIFFERENTIAL);
    LazyLock::force(&RE_SLASH_OPEN);
    LazyLock::force(&RE_SLASH_SPACED);
    LazyLock::force(&RE_FRAC_OPEN);
    LazyLock::force(&RE_FRAC_SPACED);
    LazyLock::force(&RE_DERIVATIVE_WORDS);
    LazyLock::force(&RE_LIMITS);
    LazyLock::force(&RE_INFINITY);
    LazyLock::force(&RE_SERIES);
    LazyLock::force(&RE_SERIES_WORDS);
    LazyLock::force(&RE_SERIES_POINT);
    LazyLock::force(&RE_SERIES_ORDER);
}

#[cfg(test)]
mod tests {
    use super::super::test_support::route_text;
    use super::*;
    use crate::error::RouteError;
    use crate::family::RouteFamily;

    fn calc(raw: &str) -> SolveRequest {
        route_text(RouteFamily::Calculus, raw).unwrap()
    }

    #[test]
    fn test_indefinite_integral() {
        assert_eq!(
            calc("\\int x^{2}dx"),
            SolveRequest::IndefiniteIntegral {
                integrand: "x**2".into(),
                var: "x".into()
            }
        );
        assert_eq!(
            calc("∫x²dx"),
            SolveRequest::IndefiniteIntegral {
                integrand: "x**2".into(),
                var: "x".into()
            }
        );
    }

    #[test]
    fn test_integration_by_parts() {
        assert_eq!(
            calc("\\int x\\cos(x)dx"),
            SolveRequest::IntegrationByParts {
                integrand: "x*cos(x)".into(),
                var: "x".into(),
                u: "x".into(),
                dv: "cos(x)".into(),
            }
        );
    }

    #[test]
    fn test_definite_integral_notations() {
        let expected = SolveRequest::DefiniteIntegral {
            integrand: "x**2".into(),
            var: "x".into(),
            lower: "0".into(),
            upper: "1".into(),
        };
        assert_eq!(calc("\\int_{0}^{1} x^{2} dx"), expected);
        assert_eq!(calc("\\int_0^1 x^{2} dx"), expected);
        assert_eq!(calc("∫₀¹x²dx"), expected);
        assert_eq!(calc("integrate x^2 dx from 0 to 1"), expected);
    }

    #[test]
    fn test_definite_integral_infinite_bound() {
        match calc("\\int_{0}^{\\infty} e^{-x} dx") {
            SolveRequest::DefiniteIntegral { lower, upper, .. } => {
                assert_eq!(lower, "0");
                assert_eq!(upper, "oo");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_word_integral() {
        assert_eq!(
            calc("integral of sin(x) dx"),
            SolveRequest::IndefiniteIntegral {
                integrand: "sin(x)".into(),
                var: "x".into()
            }
        );
    }

    #[test]
    fn test_derivative_notations() {
        let expected = SolveRequest::Derivative {
            expr: "x**3".into(),
            var: "x".into(),
        };
        assert_eq!(calc("d/dx(x^3)"), expected);
        assert_eq!(calc("d/dx x^3"), expected);
        assert_eq!(calc("\\frac{d}{dx}(x^3)"), expected);
        assert_eq!(calc("\\frac{d}{dx} x^{3}"), expected);
        assert_eq!(calc("derivative of x^3 with respect to x"), expected);
        assert_eq!(
            calc("derivative of t^3 with respect to t"),
            SolveRequest::Derivative {
                expr: "t**3".into(),
                var: "t".into()
            }
        );
    }

    #[test]
    fn test_limit_notations() {
        let expected = SolveRequest::Limit {
            expr: "sin(x)/x".into(),
            var: "x".into(),
            point: "0".into(),
        };
        assert_eq!(calc("\\lim_{x\\to 0} \\frac{\\sin(x)}{x}"), expected);
        assert_eq!(calc("\\lim_{x \\rightarrow 0} \\frac{\\sin(x)}{x}"), expected);
        assert_eq!(calc("lim x→0 sin(x)/x"), expected);
        assert_eq!(calc("lim_{x->0} sin(x)/x"), expected);
        assert_eq!(calc("limit(sin(x)/x, x, 0)"), expected);
        assert_eq!(calc("limit as x approaches 0 of sin(x)/x"), expected);
    }

    #[test]
    fn test_limit_at_infinity() {
        for raw in ["lim x→∞ 1/x", "\\lim_{x\\to\\infty} 1/x", "limit as x approaches infinity of 1/x"] {
            match calc(raw) {
                SolveRequest::Limit { point, .. } => assert_eq!(point, "oo", "{raw}"),
                other => panic!("unexpected {other:?} for {raw}"),
            }
        }
        match calc("\\lim_{x\\to -\\infty} e^{x}") {
            SolveRequest::Limit { point, .. } => assert_eq!(point, "-oo"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_series() {
        assert_eq!(
            calc("taylor series of sin(x)"),
            SolveRequest::Series {
                expr: "sin(x)".into(),
                var: "x".into(),
                point: "0".into(),
                order: 6,
            }
        );
        match calc("series of e^{x} around 1 order 4") {
            SolveRequest::Series { expr, point, order, .. } => {
                assert_eq!(expr, "e**x");
                assert_eq!(point, "1");
                assert_eq!(order, 4);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_gaps() {
        let err = route_text(RouteFamily::Calculus, "\\int dx").unwrap_err();
        assert!(matches!(err, RouteError::Gap(ref d) if d.kind == DiagnosticKind::MissingIntegrand));

        let err = route_text(RouteFamily::Calculus, "d/dx").unwrap_err();
        assert!(matches!(
            err,
            RouteError::Gap(ref d) if d.kind == DiagnosticKind::MissingDerivativeExpression
        ));

        let err = route_text(RouteFamily::Calculus, "\\lim_{x\\to 0}").unwrap_err();
        assert!(matches!(
            err,
            RouteError::Gap(ref d) if d.kind == DiagnosticKind::MissingLimitExpression
        ));
    }

    #[test]
    fn test_routing_miss() {
        let err = route_text(RouteFamily::Calculus, "x + 1").unwrap_err();
        assert!(matches!(err, RouteError::NoMatch { family: RouteFamily::Calculus, .. }));
    }

    #[test]
    fn test_split_differential_takes_last() {
        assert_eq!(
            split_differential(" x\\cos(x)dx"),
            Some(("x\\cos(x)", "x".to_string()))
        );
        assert_eq!(split_differential(" dx"), None);
        assert_eq!(split_differential(" x^{2}"), None);
        assert_eq!(split_differential("xdx"), Some(("x", "x".to_string())));
    }

    #[test]
    fn test_differential_ignores_letters_inside_words() {
        assert_eq!(
            split_differential(" x dx for the study"),
            Some(("x", "x".to_string()))
        );
        assert_eq!(
            calc("\\int x dx for the study"),
            SolveRequest::IndefiniteIntegral {
                integrand: "x".into(),
                var: "x".into()
            }
        );
    }

    #[test]
    fn test_definite_bounds_with_nested_braces() {
        assert_eq!(
            calc("\\int_{0}^{\\frac{\\pi}{2}} \\cos(x) dx"),
            SolveRequest::DefiniteIntegral {
                integrand: "cos(x)".into(),
                var: "x".into(),
                lower: "0".into(),
                upper: normalize_fragment("\\frac{\\pi}{2}"),
            }
        );
    }

    #[test]
    fn test_definite_bounds_mixed_forms() {
        let sine = |lower: &str, upper: &str| SolveRequest::DefiniteIntegral {
            integrand: "sin(x)".into(),
            var: "x".into(),
            lower: lower.into(),
            upper: upper.into(),
        };
        assert_eq!(calc("\\int_0^{\\pi} \\sin(x) dx"), sine("0", "pi"));
        assert_eq!(calc("\\int_{0}^\\pi \\sin(x) dx"), sine("0", "pi"));
        assert_eq!(calc("\\int_0^\\pi \\sin(x) dx"), sine("0", "pi"));
        assert_eq!(
            calc("\\int_0^{10} x dx"),
            SolveRequest::DefiniteIntegral {
                integrand: "x".into(),
                var: "x".into(),
                lower: "0".into(),
                upper: "10".into(),
            }
        );
    }

    #[test]
    fn test_integral_bounds_reader() {
        assert_eq!(
            integral_bounds("\\int_{a}^{b^{2}} f dx"),
            Some(("a", "b^{2}", " f dx"))
        );
        assert_eq!(integral_bounds("\\int_-1^1 x dx"), Some(("-1", "1", " x dx")));
        assert_eq!(integral_bounds("\\int_{0} x dx"), None);
        assert_eq!(integral_bounds("\\int x dx"), None);
    }

    #[test]
    fn test_derivative_operand_ends_at_matching_paren() {
        assert_eq!(
            calc("d/dx(x^2) + d/dx(x)"),
            SolveRequest::Derivative {
                expr: "x**2".into(),
                var: "x".into()
            }
        );
        assert_eq!(
            calc("d/dx(x+1)(x-1)"),
            SolveRequest::Derivative {
                expr: "(x+1)*(x-1)".into(),
                var: "x".into()
            }
        );
        assert_eq!(
            calc("\\frac{d}{dx}(\\sin(x)) + 1"),
            SolveRequest::Derivative {
                expr: "sin(x)".into(),
                var: "x".into()
            }
        );
    }

    #[test]
    fn test_partial_derivatives() {
        let expected = SolveRequest::Derivative {
            expr: "x**2".into(),
            var: "x".into(),
        };
        assert_eq!(calc("∂/∂x(x^2)"), expected);
        assert_eq!(calc("\\partial/\\partial x (x^2)"), expected);
        assert_eq!(calc("\\frac{\\partial}{\\partial x}(x^2)"), expected);
        assert_eq!(
            calc("\\frac{\\partial}{\\partial y} x y"),
            SolveRequest::Derivative {
                expr: normalize_fragment("x y"),
                var: "y".into()
            }
        );

        let err = route_text(RouteFamily::Calculus, "∂/∂x").unwrap_err();
        assert!(matches!(
            err,
            RouteError::Gap(ref d) if d.kind == DiagnosticKind::MissingDerivativeExpression
        ));
    }
}
