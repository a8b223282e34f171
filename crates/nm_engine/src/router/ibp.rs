//! Integration-by-parts heuristic.
//!
//! A product integrand qualifies when it splits into polynomial factors in the
//! integration variable and transcendental factors of that variable. The
//! polynomial side always becomes `u`, so repeated differentiation reaches
//! zero. Anything else (quotients, sums, two transcendental factors with no
//! polynomial) goes to a direct antiderivative request.
//!
//! Input is canonical syntax (`x*cos(x)`, `x**2*e**x`).

use std::sync::LazyLock;

use nm_parser::groups::matching_close;
use regex::Regex;
use smallvec::SmallVec;

/// Product factors; integrands rarely have more than four.
type Factors<'a> = SmallVec<[&'a str; 4]>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IbpDecision {
    pub needed: bool,
    pub u_part: Option<String>,
    pub dv_part: Option<String>,
}

impl IbpDecision {
    fn direct() -> Self {
        Self {
            needed: false,
            u_part: None,
            dv_part: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FactorKind {
    Constant,
    Polynomial,
    Transcendental,
}

static RE_TRANSCENDENTAL_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:sinh|cosh|tanh|sin|cos|tan|sec|csc|cot|exp|log|ln)\(")
        .expect("valid regex literal")
});

static RE_POWER_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*\d+$").expect("valid regex literal"));

/// Integer exponent, not the head of a decimal (`**2.5`). The tail
/// character is captured so it survives replacement.
static RE_INTEGER_POWER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*(?:\(\d+\)|\d+)(?P<tail>[^\d.]|$)").expect("valid regex literal")
});

static RE_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z_][a-zA-Z0-9_]*").expect("valid regex literal"));

/// Decide whether `integrand` should be integrated by parts in `var`.
pub fn decide(integrand: &str, var: &str) -> IbpDecision {
    let Some(factors) = split_product(integrand) else {
        return IbpDecision::direct();
    };
    if factors.len() < 2 {
        return IbpDecision::direct();
    }

    let mut u: Factors = SmallVec::new();
    let mut dv: Factors = SmallVec::new();
    let mut has_polynomial = false;

    for factor in &factors {
        match classify_factor(factor, var) {
            Some(FactorKind::Constant) => u.push(factor),
            Some(FactorKind::Polynomial) => {
                has_polynomial = true;
                u.push(factor);
            }
            Some(FactorKind::Transcendental) => dv.push(factor),
            None => return IbpDecision::direct(),
        }
    }

    if !has_polynomial || dv.is_empty() {
        return IbpDecision::direct();
    }

    let decision = IbpDecision {
        needed: true,
        u_part: Some(u.join("*")),
        dv_part: Some(dv.join("*")),
    };
    tracing::debug!(
        target: "route",
        integrand,
        u = ?decision.u_part,
        dv = ?decision.dv_part,
        "integration by parts"
    );
    decision
}

/// Split on top-level single `*`. Returns `None` when the expression is not a
/// plain product at the top level (a sum, difference or quotient).
fn split_product(expr: &str) -> Option<Factors<'_>> {
    let expr = expr.trim();
    let bytes = expr.as_bytes();
    let mut factors: Factors = SmallVec::new();
    let mut depth = 0i32;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth -= 1,
            b'*' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                continue;
            }
            b'*' if depth == 0 => {
                factors.push(expr[start..i].trim());
                start = i + 1;
            }
            b'/' if depth == 0 => return None,
            // A sign after an operand is a binary operator; a leading sign or
            // one inside an exponent (`x**-1`) is not.
            b'+' | b'-' if depth == 0 && i > 0 && !matches!(bytes[i - 1], b'*' | b'(') => {
                return None;
            }
            _ => {}
        }
        i += 1;
    }
    factors.push(expr[start..].trim());

    if factors.iter().any(|f| f.is_empty()) {
        return None;
    }
    Some(factors)
}

fn mentions(expr: &str, var: &str) -> bool {
    RE_IDENTIFIER.find_iter(expr).any(|m| m.as_str() == var)
}

fn classify_factor(factor: &str, var: &str) -> Option<FactorKind> {
    if !mentions(factor, var) {
        return Some(FactorKind::Constant);
    }
    if is_polynomial(factor, var) {
        return Some(FactorKind::Polynomial);
    }
    if is_transcendental(factor, var) {
        return Some(FactorKind::Transcendental);
    }
    None
}

/// Only `var`, digits, `+ - * ( )` and integer powers.
fn is_polynomial(factor: &str, var: &str) -> bool {
    if RE_IDENTIFIER.find_iter(factor).any(|m| m.as_str() != var) {
        return false;
    }
    let without_powers = RE_INTEGER_POWER.replace_all(factor, "$tail");
    if without_powers.contains("**") {
        return false;
    }
    let without_var = RE_IDENTIFIER.replace_all(&without_powers, "");
    without_var
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '*' | '(' | ')' | '.' | ' '))
}

/// `sin(..)`, `exp(..)`, `ln(..)` and friends, optionally raised to an
/// integer power, or `e**(..)`, with `var` in the argument.
fn is_transcendental(factor: &str, var: &str) -> bool {
    if let Some(m) = RE_TRANSCENDENTAL_CALL.find(factor) {
        let open = m.end() - 1;
        return match matching_close(factor, open) {
            Some(close) => {
                let rest = &factor[close + 1..];
                (rest.is_empty() || RE_POWER_SUFFIX.is_match(rest))
                    && mentions(&factor[open + 1..close], var)
            }
            None => false,
        };
    }
    factor
        .strip_prefix("e**")
        .is_some_and(|exponent| mentions(exponent, var))
}

pub(crate) fn warm_up() {
    LazyLock::force(&RE_TRANSCENDENTAL_CALL);
    LazyLock::force(&RE_POWER_SUFFIX);
    LazyLock::force(&RE_INTEGER_POWER);
    LazyLock::force(&RE_IDENTIFIER);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(integrand: &str) -> (Option<String>, Option<String>) {
        let d = decide(integrand, "x");
        (d.u_part, d.dv_part)
    }

    #[test]
    fn test_polynomial_times_trig() {
        let d = decide("x*cos(x)", "x");
        assert!(d.needed);
        assert_eq!(d.u_part.as_deref(), Some("x"));
        assert_eq!(d.dv_part.as_deref(), Some("cos(x)"));
    }

    #[test]
    fn test_polynomial_always_u_regardless_of_order() {
        assert_eq!(
            split("e**x*x**2"),
            (Some("x**2".to_string()), Some("e**x".to_string()))
        );
        assert_eq!(
            split("ln(x)*x"),
            (Some("x".to_string()), Some("ln(x)".to_string()))
        );
    }

    #[test]
    fn test_constants_join_u() {
        assert_eq!(
            split("3*x*sin(2*x)"),
            (Some("3*x".to_string()), Some("sin(2*x)".to_string()))
        );
    }

    #[test]
    fn test_direct_cases() {
        assert!(!decide("x**2", "x").needed);
        assert!(!decide("sin(x)", "x").needed);
        assert!(!decide("x + sin(x)", "x").needed);
        assert!(!decide("x/sin(x)", "x").needed);
        // Two transcendental factors: not handled by the heuristic.
        assert!(!decide("e**x*sin(x)", "x").needed);
        // Constant coefficient only.
        assert!(!decide("2*cos(x)", "x").needed);
        // Unknown factor kind.
        assert!(!decide("x*sqrt(x)", "x").needed);
    }

    #[test]
    fn test_transcendental_needs_the_variable() {
        assert!(!decide("x*cos(y)", "x").needed);
        assert!(decide("t*exp(t)", "t").needed);
    }

    #[test]
    fn test_power_of_trig_and_negative_exponent() {
        assert!(decide("x*sin(x)**2", "x").needed);
        assert!(!decide("x**-1*cos(x)", "x").needed);
    }

    #[test]
    fn test_fractional_power_is_not_polynomial() {
        assert!(!decide("x**2.5*sin(x)", "x").needed);
        assert!(!decide("x**(2.5)*sin(x)", "x").needed);
        assert!(decide("x**25*sin(x)", "x").needed);
        assert!(decide("x**(2)*sin(x)", "x").needed);
    }
}
