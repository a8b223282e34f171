//! Entity Extractor
//!
//! Pulls free variables, the solve target, the bare equation body and
//! numeric bounds out of the text. Each extraction is a chain of fallible
//! strategies; the first `Some` wins and exhausting the chain is not an error.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::classify::{ClassifierOutput, ProblemType};

/// Everything the extractor found. Fields are independent of each other.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Extraction {
    /// Isolated single letters, first-occurrence order, deduplicated.
    pub variables: Vec<String>,
    pub solve_for: Option<String>,
    /// Input with instruction phrases removed.
    pub equation_body: String,
    pub limits: Option<(f64, f64)>,
}

/// Letters that read as articles, the imaginary unit or Euler's number.
const EXCLUDED_VARIABLES: &[&str] = &["a", "i", "A", "I", "e", "E"];

static RE_SINGLE_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([a-zA-Z])\b").expect("valid regex literal"));

/// Explicit target phrases, in priority order.
static RE_TARGET_PHRASES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)solve for\s+([a-zA-Z])\b",
        r"(?i)\bfind\s+([a-zA-Z])\b",
        r"(?i)what is\s+([a-zA-Z])\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex literal"))
    .collect()
});

static RE_INSTRUCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:solve|find|calculate|what is|determine)\s+").expect("valid regex literal")
});

static RE_TARGET_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:for|the value of)\s+[a-zA-Z]\b\s*").expect("valid regex literal")
});

static RE_FROM_TO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:from|between)\s+([-\d.]+)\s+(?:to|and)\s+([-\d.]+)")
        .expect("valid regex literal")
});

static RE_BRACKET_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^,\[\]]+),\s*([^\[\]]+)\]").expect("valid regex literal"));

pub fn extract(text: &str, classification: &ClassifierOutput) -> Extraction {
    let variables = extract_variables(text);
    let solve_for = extract_solve_for(text, &variables);
    let equation_body = extract_equation_body(text);
    let limits = extract_limits(text, classification.problem_type);

    tracing::debug!(
        target: "extract",
        variables = ?variables,
        solve_for = ?solve_for,
        limits = ?limits,
        "extracted"
    );

    Extraction {
        variables,
        solve_for,
        equation_body,
        limits,
    }
}

pub fn extract_variables(text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for caps in RE_SINGLE_LETTER.captures_iter(text) {
        let letter = &caps[1];
        if EXCLUDED_VARIABLES.contains(&letter) || out.iter().any(|v| v == letter) {
            continue;
        }
        out.push(letter.to_string());
    }
    out
}

/// Explicit phrase first, then `x` if present, then the first variable.
pub fn extract_solve_for(text: &str, variables: &[String]) -> Option<String> {
    RE_TARGET_PHRASES
        .iter()
        .find_map(|re| re.captures(text).map(|c| c[1].to_string()))
        .or_else(|| variables.iter().find(|v| *v == "x").cloned())
        .or_else(|| variables.first().cloned())
}

pub fn extract_equation_body(text: &str) -> String {
    let body = RE_INSTRUCTION.replace_all(text, "");
    let body = RE_TARGET_CLAUSE.replace_all(&body, "");
    body.trim().trim_end_matches([',', '.', '?']).trim().to_string()
}

// ============================================================================
// Bounds
// ============================================================================

type LimitStrategy = fn(&str) -> Option<(f64, f64)>;

fn parse_pair(lo: &str, hi: &str) -> Option<(f64, f64)> {
    Some((lo.trim().parse().ok()?, hi.trim().parse().ok()?))
}

fn limits_from_words(text: &str) -> Option<(f64, f64)> {
    let caps = RE_FROM_TO.captures(text)?;
    parse_pair(&caps[1], &caps[2])
}

fn limits_from_brackets(text: &str) -> Option<(f64, f64)> {
    RE_BRACKET_PAIR
        .captures_iter(text)
        .find_map(|caps| parse_pair(&caps[1], &caps[2]))
}

/// Bound strategies in priority order. A parse failure in one strategy falls
/// through to the next.
const LIMIT_STRATEGIES: &[LimitStrategy] = &[limits_from_words, limits_from_brackets];

/// Numeric bounds. Bracket pairs are skipped for linear algebra, where
/// `[1, 2]` is a matrix row.
pub fn extract_limits(text: &str, problem_type: ProblemType) -> Option<(f64, f64)> {
    let strategies = if problem_type == ProblemType::LinearAlgebra {
        &LIMIT_STRATEGIES[..1]
    } else {
        LIMIT_STRATEGIES
    };
    strategies.iter().find_map(|strategy| strategy(text))
}

pub(crate) fn warm_up() {
    LazyLock::force(&RE_SINGLE_LETTER);
    LazyLock::force(&RE_TARGET_PHRASES);
    LazyLock::force(&RE_INSTRUCTION);
    LazyLock::force(&RE_TARGET_CLAUSE);
    LazyLock::force(&RE_FROM_TO);
    LazyLock::force(&RE_BRACKET_PAIR);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;

    #[test]
    fn test_variables_exclusions_and_order() {
        assert_eq!(extract_variables("y = a x + e + b + y"), vec!["y", "x", "b"]);
        assert!(extract_variables("I think").is_empty());
    }

    #[test]
    fn test_solve_for_chain() {
        let vars = extract_variables("solve for y: x + y = 2");
        assert_eq!(extract_solve_for("solve for y: x + y = 2", &vars).as_deref(), Some("y"));
        assert_eq!(extract_solve_for("find t if t + 1 = 3", &[]).as_deref(), Some("t"));
        assert_eq!(extract_solve_for("what is z", &[]).as_deref(), Some("z"));

        let vars = vec!["y".to_string(), "x".to_string()];
        assert_eq!(extract_solve_for("y = x + 1", &vars).as_deref(), Some("x"));
        let vars = vec!["t".to_string()];
        assert_eq!(extract_solve_for("t + 1 = 0", &vars).as_deref(), Some("t"));
        assert_eq!(extract_solve_for("2 + 2", &[]), None);
    }

    #[test]
    fn test_equation_body() {
        assert_eq!(extract_equation_body("Solve 2x + 3 = 7 for x"), "2x + 3 = 7");
        assert_eq!(extract_equation_body("find the value of y in y^2 = 4"), "in y^2 = 4");
        assert_eq!(extract_equation_body("x + 3 = 0"), "x + 3 = 0");
    }

    #[test]
    fn test_limits_from_words() {
        assert_eq!(
            extract_limits("integrate x dx from 0 to 2.5", ProblemType::CalculusIntegral),
            Some((0.0, 2.5))
        );
        assert_eq!(
            extract_limits("area between -1 and 1", ProblemType::CalculusIntegral),
            Some((-1.0, 1.0))
        );
    }

    #[test]
    fn test_limits_degrade_to_none() {
        assert_eq!(extract_limits("from . to -", ProblemType::Algebra), None);
        assert_eq!(extract_limits("[a, b]", ProblemType::Algebra), None);
        assert_eq!(extract_limits("x in [0, 3]", ProblemType::Algebra), Some((0.0, 3.0)));
    }

    #[test]
    fn test_bracket_limits_skipped_for_matrices() {
        assert_eq!(extract_limits("det [[1, 2], [3, 4]]", ProblemType::LinearAlgebra), None);
    }

    #[test]
    fn test_extract_scenario() {
        let text = "x + 3 = 0";
        let ex = extract(text, &classify(text));
        assert_eq!(ex.variables, vec!["x"]);
        assert_eq!(ex.solve_for.as_deref(), Some("x"));
        assert_eq!(ex.limits, None);
    }
}
