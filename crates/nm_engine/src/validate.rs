//! Structural Validator
//!
//! Rejects malformed notation before any routing is attempted. Every rule is
//! a plain function returning `Option<Diagnostic>`; [`validate`] runs them in
//! priority order and reports the first failure. Nothing here repairs input.

use std::fmt;
use std::sync::LazyLock;

use nm_api_models::ValidationFailureJson;
use nm_parser::groups::balance;
use nm_parser::is_math_glyph;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::family::ValidationHint;

// ============================================================================
// Diagnostic
// ============================================================================

/// Machine-readable failure category. The snake_case name is the
/// `error_kind` clients see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    EmptyInput,
    UnbalancedParentheses,
    UnbalancedBraces,
    MissingDifferential,
    IncompleteDefiniteIntegral,
    MissingDerivativeVariable,
    IncompleteDerivativeNotation,
    MissingLimitPoint,
    UnmatchedMatrixEnvironment,
    ConsecutiveOperators,
    UnexpectedCharacters,
    MissingOperand,
    DivisionByZero,
    // Extraction gaps reported by the router.
    MissingIntegrand,
    MissingDerivativeExpression,
    MissingLimitExpression,
    MissingData,
    MissingMatrix,
    MalformedMatrix,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::EmptyInput => "empty_input",
            DiagnosticKind::UnbalancedParentheses => "unbalanced_parentheses",
            DiagnosticKind::UnbalancedBraces => "unbalanced_braces",
            DiagnosticKind::MissingDifferential => "missing_differential",
            DiagnosticKind::IncompleteDefiniteIntegral => "incomplete_definite_integral",
            DiagnosticKind::MissingDerivativeVariable => "missing_derivative_variable",
            DiagnosticKind::IncompleteDerivativeNotation => "incomplete_derivative_notation",
            DiagnosticKind::MissingLimitPoint => "missing_limit_point",
            DiagnosticKind::UnmatchedMatrixEnvironment => "unmatched_matrix_environment",
            DiagnosticKind::ConsecutiveOperators => "consecutive_operators",
            DiagnosticKind::UnexpectedCharacters => "unexpected_characters",
            DiagnosticKind::MissingOperand => "missing_operand",
            DiagnosticKind::DivisionByZero => "division_by_zero",
            DiagnosticKind::MissingIntegrand => "missing_integrand",
            DiagnosticKind::MissingDerivativeExpression => "missing_derivative_expression",
            DiagnosticKind::MissingLimitExpression => "missing_limit_expression",
            DiagnosticKind::MissingData => "missing_data",
            DiagnosticKind::MissingMatrix => "missing_matrix",
            DiagnosticKind::MalformedMatrix => "malformed_matrix",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structural failure with a developer message and a user-facing
/// suggestion/hint pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub suggestion: String,
    pub hint: String,
    pub user_message: String,
}

impl Diagnostic {
    pub fn new(
        kind: DiagnosticKind,
        message: impl Into<String>,
        suggestion: impl Into<String>,
        hint: impl Into<String>,
        user_message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            suggestion: suggestion.into(),
            hint: hint.into(),
            user_message: user_message.into(),
        }
    }

    pub fn to_json(&self) -> ValidationFailureJson {
        ValidationFailureJson::new(
            self.kind.as_str(),
            self.user_message.clone(),
            self.suggestion.clone(),
            self.hint.clone(),
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(Diagnostic),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(d) => Some(d),
        }
    }
}

// ============================================================================
// Patterns
// ============================================================================

static RE_MACRO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\[a-zA-Z]+|\\.").expect("valid regex literal"));

/// `d` + one letter, not followed by another letter: `dx` but not `do`.
/// The `d` starts a word or follows a one-letter token, so `study` has none.
static RE_DIFFERENTIAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^a-zA-Z]|(?:^|[^a-zA-Z\\])[a-zA-Z])d([a-zA-Z])(?:[^a-zA-Z]|$)")
        .expect("valid regex literal")
});

static RE_INTEGRAL_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:integrate|integral|antiderivative)\b").expect("valid regex literal")
});

static RE_DEFINITE_BOUNDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\\int|∫)_(?:\{[^}]*\}|[^\s{])\s*\^(?:\{[^}]*\}|[^\s{])")
        .expect("valid regex literal")
});

static RE_D_SLASH_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"d/d[a-zA-Z]").expect("valid regex literal"));

static RE_FRAC_DERIVATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\frac\{d[a-zA-Z]?\}\{d[a-zA-Z]\}").expect("valid regex literal")
});

static RE_LIMIT_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\\lim|\blim(?:_|\b)|\blimit\b").expect("valid regex literal")
});

/// Accepted "variable → point" spellings, in any of the supported notations.
static RE_LIMIT_CLAUSES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\\lim_\{\s*[a-zA-Z]\s*(?:\\to|\\rightarrow|->|→)\s*[^}\s][^}]*\}",
        r"(?i)\blim_?\{?\s*[a-zA-Z]\s*(?:\\to|->|→)\s*[^\s}]+",
        r"(?i)\blimit\s*\(",
        r"(?i)\b[a-zA-Z]\s+(?:approaches|tends\s+to)\s+\S+",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex literal"))
    .collect()
});

static RE_CONSECUTIVE_OPS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[+\-*/^]{2,}").expect("valid regex literal"));

static RE_OPERATOR_BEFORE_EQ: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[+\-*/^]\s*=").expect("valid regex literal"));

static RE_OPERATOR_AFTER_EQ: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"=\s*[+*/^]").expect("valid regex literal"));

static RE_DIVIDE_BY_ZERO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\s*0(?:[^\d.]|$)").expect("valid regex literal"));

const ALLOWED_ASCII: &str = "+-*/^(){}[]_.,=<>!|'&?:;";

// ============================================================================
// Rules
// ============================================================================

type Rule = fn(&str, ValidationHint) -> Option<Diagnostic>;

/// Rules in priority order. The first failure wins.
const RULES: &[Rule] = &[
    check_empty,
    check_parentheses,
    check_braces,
    check_differential,
    check_definite_bounds,
    check_derivative_notation,
    check_limit_point,
    check_matrix_environment,
    check_consecutive_operators,
    check_unexpected_characters,
    check_missing_operand,
    check_division_by_zero,
];

/// Validate `text` under the given rule set. Total: every input maps to
/// exactly one result.
pub fn validate(text: &str, hint: ValidationHint) -> ValidationResult {
    for rule in RULES {
        if let Some(diag) = rule(text, hint) {
            tracing::debug!(
                target: "validate",
                kind = %diag.kind,
                hint = hint.as_str(),
                "input rejected"
            );
            return ValidationResult::Invalid(diag);
        }
    }
    ValidationResult::Valid
}

fn strip_macros(text: &str) -> String {
    RE_MACRO.replace_all(text, " ").into_owned()
}

fn has_integral_marker(text: &str) -> bool {
    text.contains("\\int") || text.contains('∫') || RE_INTEGRAL_WORD.is_match(text)
}

fn check_empty(text: &str, _: ValidationHint) -> Option<Diagnostic> {
    if !text.trim().is_empty() {
        return None;
    }
    Some(Diagnostic::new(
        DiagnosticKind::EmptyInput,
        "Empty equation",
        "Enter an equation or expression",
        "Example: x + 3 = 0",
        "Please enter an equation or expression to solve.",
    ))
}

fn check_parentheses(text: &str, _: ValidationHint) -> Option<Diagnostic> {
    let (opens, closes) = balance(text, '(', ')');
    if opens == closes {
        return None;
    }
    Some(Diagnostic::new(
        DiagnosticKind::UnbalancedParentheses,
        "Unbalanced parentheses",
        "Make sure all opening parentheses \"(\" have matching closing \")\"",
        "Example: (x + 1)(x - 1)",
        format!("Unbalanced parentheses! You have {opens} opening but {closes} closing."),
    ))
}

fn check_braces(text: &str, _: ValidationHint) -> Option<Diagnostic> {
    let (opens, closes) = balance(text, '{', '}');
    if opens == closes {
        return None;
    }
    Some(Diagnostic::new(
        DiagnosticKind::UnbalancedBraces,
        "Unbalanced braces",
        "Make sure all opening braces \"{\" have matching closing \"}\"",
        "Example: x^{2} or \\frac{1}{2}",
        format!("Unbalanced braces! You have {opens} opening but {closes} closing."),
    ))
}

/// Best guess at the integration variable: `x` if present, else the first
/// letter left after macros and instruction words are removed.
fn guess_variable(stripped: &str) -> char {
    let residue = RE_INTEGRAL_WORD.replace_all(stripped, "");
    let letters: Vec<char> = residue.chars().filter(|c| c.is_ascii_alphabetic()).collect();
    if letters.contains(&'x') {
        'x'
    } else {
        letters.first().copied().unwrap_or('x')
    }
}

fn check_differential(text: &str, hint: ValidationHint) -> Option<Diagnostic> {
    if hint != ValidationHint::Integral && !has_integral_marker(text) {
        return None;
    }
    let stripped = strip_macros(text);
    if RE_DIFFERENTIAL.is_match(&stripped) {
        return None;
    }

    let var = guess_variable(&stripped);
    let body = text.replace("\\int", "").replace('∫', "");
    let body = body.trim();
    Some(Diagnostic::new(
        DiagnosticKind::MissingDifferential,
        "Missing differential in integral",
        format!("Did you mean to include \"d{var}\"?"),
        format!("Example: \\int {body} d{var}"),
        format!("Your integral is missing a differential! Try adding \"d{var}\" at the end."),
    ))
}

fn check_definite_bounds(text: &str, _: ValidationHint) -> Option<Diagnostic> {
    if !(text.contains("\\int_") || text.contains("∫_")) || RE_DEFINITE_BOUNDS.is_match(text) {
        return None;
    }
    Some(Diagnostic::new(
        DiagnosticKind::IncompleteDefiniteIntegral,
        "Incomplete definite integral",
        "Definite integrals need both lower and upper limits",
        "Example: ∫₀² x dx  or  \\int_{0}^{2} x dx",
        "Your definite integral is missing limits! Include both lower and upper bounds like ∫₀² or \\int_{0}^{2}.",
    ))
}

fn check_derivative_notation(text: &str, _: ValidationHint) -> Option<Diagnostic> {
    if text.contains("d/d") && !RE_D_SLASH_VAR.is_match(text) {
        return Some(Diagnostic::new(
            DiagnosticKind::MissingDerivativeVariable,
            "Missing variable in derivative notation",
            "Specify which variable to differentiate with respect to",
            "Example: d/dx(x^2) or d/dt(\\sin(t))",
            "Your derivative notation is incomplete! Specify the variable like \"d/dx\" or \"d/dt\".",
        ));
    }
    if text.contains("\\frac{d") && !RE_FRAC_DERIVATIVE.is_match(text) {
        return Some(Diagnostic::new(
            DiagnosticKind::IncompleteDerivativeNotation,
            "Incomplete derivative notation",
            "Use proper derivative notation: \\frac{d}{dx}",
            "Example: \\frac{d}{dx}(x^2)",
            "Your derivative notation is incomplete! Use \\frac{d}{dx} or \\frac{d}{dt}.",
        ));
    }
    None
}

fn check_limit_point(text: &str, hint: ValidationHint) -> Option<Diagnostic> {
    if hint != ValidationHint::Limit && !RE_LIMIT_MARKER.is_match(text) {
        return None;
    }
    if RE_LIMIT_CLAUSES.iter().any(|re| re.is_match(text)) {
        return None;
    }
    Some(Diagnostic::new(
        DiagnosticKind::MissingLimitPoint,
        "Missing limit point",
        "Specify what value the variable approaches",
        "Example: \\lim_{x\\to 0} or lim x→0",
        "Your limit is missing a point! Specify where the variable approaches, like \"x→0\" or \"x→∞\".",
    ))
}

fn check_matrix_environment(text: &str, _: ValidationHint) -> Option<Diagnostic> {
    let begins = text.matches("\\begin{").count();
    let ends = text.matches("\\end{").count();
    if begins == ends {
        return None;
    }
    Some(Diagnostic::new(
        DiagnosticKind::UnmatchedMatrixEnvironment,
        "Unmatched matrix environment",
        "Every \\begin{matrix} needs a matching \\end{matrix}",
        "Example: \\begin{pmatrix} 1 & 2 \\\\ 3 & 4 \\end{pmatrix}",
        "Unmatched matrix environment! Make sure every \\begin{matrix} has an \\end{matrix}.",
    ))
}

fn check_consecutive_operators(text: &str, _: ValidationHint) -> Option<Diagnostic> {
    // `**` is power, `--` double negation, `+-` a plus-minus glyph.
    let cleaned = text.replace("**", "").replace("--", "").replace("+-", "");
    let found = RE_CONSECUTIVE_OPS.find(&cleaned)?;
    Some(Diagnostic::new(
        DiagnosticKind::ConsecutiveOperators,
        format!("Multiple consecutive operators: {}", found.as_str()),
        "Remove duplicate operators like \"++\" or \"*/\"",
        "Example: x + 2 = 5",
        "Multiple consecutive operators detected! Check for typos like \"++\".",
    ))
}

fn check_unexpected_characters(text: &str, _: ValidationHint) -> Option<Diagnostic> {
    let stripped = strip_macros(text);
    let mut unexpected: Vec<char> = Vec::new();
    for c in stripped.chars() {
        let allowed = c.is_ascii_alphanumeric()
            || c.is_whitespace()
            || ALLOWED_ASCII.contains(c)
            || is_math_glyph(c);
        if !allowed && !unexpected.contains(&c) {
            unexpected.push(c);
        }
    }
    if unexpected.is_empty() {
        return None;
    }

    let list: String = unexpected.into_iter().collect();
    Some(Diagnostic::new(
        DiagnosticKind::UnexpectedCharacters,
        "Unexpected characters",
        format!("Found unexpected characters: {list}"),
        "Use letters, digits, operators and LaTeX commands",
        format!("Unexpected characters found: {list}. Please use standard math notation."),
    ))
}

fn check_missing_operand(text: &str, hint: ValidationHint) -> Option<Diagnostic> {
    if hint != ValidationHint::Equation {
        return None;
    }
    // Comparison operators end in `=` too; only a bare arithmetic operator counts.
    let cleaned = text.replace("<=", "<").replace(">=", ">").replace("!=", "!");
    if !RE_OPERATOR_BEFORE_EQ.is_match(&cleaned) && !RE_OPERATOR_AFTER_EQ.is_match(&cleaned) {
        return None;
    }
    Some(Diagnostic::new(
        DiagnosticKind::MissingOperand,
        "Missing operand",
        "Check that all operators (+, -, *, /, ^) have numbers or variables on both sides",
        "Example: 2x + 3 = 7",
        "Missing operand! Make sure operators like +, -, *, / have values on both sides.",
    ))
}

fn check_division_by_zero(text: &str, hint: ValidationHint) -> Option<Diagnostic> {
    if hint != ValidationHint::Equation || !RE_DIVIDE_BY_ZERO.is_match(text) {
        return None;
    }
    Some(Diagnostic::new(
        DiagnosticKind::DivisionByZero,
        "Division by zero",
        "A literal division by 0 is undefined",
        "Example: x/2 = 3",
        "Division by zero! Check the denominator.",
    ))
}

pub(crate) fn warm_up() {
    LazyLock::force(&RE_MACRO);
    LazyLock::force(&RE_DIFFERENTIAL);
    LazyLock::force(&RE_INTEGRAL_WORD);
    LazyLock::force(&RE_DEFINITE_BOUNDS);
    LazyLock::force(&RE_D_SLASH_VAR);
    LazyLock::force(&RE_FRAC_DERIVATIVE);
    LazyLock::force(&RE_LIMIT_MARKER);
    LazyLock::force(&RE_LIMIT_CLAUSES);
    LazyLock::force(&RE_CONSECUTIVE_OPS);
    LazyLock::force(&RE_OPERATOR_BEFORE_EQ);
    LazyLock::force(&RE_OPERATOR_AFTER_EQ);
    LazyLock::force(&RE_DIVIDE_BY_ZERO);
}
