//! Note-type hints and route families.
//!
//! Callers pass a note type (`algebra`, `calculus`, ..., `auto`). The family
//! actually routed is the hint, except that calculus notation always wins:
//! a `∫` in an "algebra" note is still an integral.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::classify::ProblemType;

/// Caller-supplied hint about what kind of note the input came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteType {
    Algebra,
    Calculus,
    Physics,
    Trigonometry,
    Statistics,
    LinearAlgebra,
    #[default]
    Auto,
}

impl NoteType {
    /// Parse a hint string. Case-insensitive; unknown values mean `Auto`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "algebra" | "general" => NoteType::Algebra,
            "calculus" => NoteType::Calculus,
            "physics" => NoteType::Physics,
            "trigonometry" | "trig" => NoteType::Trigonometry,
            "statistics" | "stats" => NoteType::Statistics,
            "linear_algebra" | "matrix" => NoteType::LinearAlgebra,
            _ => NoteType::Auto,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NoteType::Algebra => "algebra",
            NoteType::Calculus => "calculus",
            NoteType::Physics => "physics",
            NoteType::Trigonometry => "trigonometry",
            NoteType::Statistics => "statistics",
            NoteType::LinearAlgebra => "linear_algebra",
            NoteType::Auto => "auto",
        }
    }

    fn explicit_family(self) -> Option<RouteFamily> {
        match self {
            NoteType::Algebra => Some(RouteFamily::Algebra),
            NoteType::Calculus => Some(RouteFamily::Calculus),
            NoteType::Physics => Some(RouteFamily::Physics),
            NoteType::Trigonometry => Some(RouteFamily::Trigonometry),
            NoteType::Statistics => Some(RouteFamily::Statistics),
            NoteType::LinearAlgebra => Some(RouteFamily::LinearAlgebra),
            NoteType::Auto => None,
        }
    }
}

impl fmt::Display for NoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The routing chain family a request is dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteFamily {
    Algebra,
    Calculus,
    Physics,
    Trigonometry,
    Statistics,
    LinearAlgebra,
}

impl RouteFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteFamily::Algebra => "algebra",
            RouteFamily::Calculus => "calculus",
            RouteFamily::Physics => "physics",
            RouteFamily::Trigonometry => "trigonometry",
            RouteFamily::Statistics => "statistics",
            RouteFamily::LinearAlgebra => "linear_algebra",
        }
    }

    /// Family implied by a classifier result.
    pub fn from_problem_type(problem_type: ProblemType) -> Self {
        match problem_type {
            ProblemType::CalculusDerivative
            | ProblemType::CalculusIntegral
            | ProblemType::CalculusLimit => RouteFamily::Calculus,
            ProblemType::PhysicsKinematics
            | ProblemType::PhysicsForce
            | ProblemType::PhysicsEnergy
            | ProblemType::PhysicsElectricity => RouteFamily::Physics,
            ProblemType::Statistics => RouteFamily::Statistics,
            ProblemType::LinearAlgebra => RouteFamily::LinearAlgebra,
            ProblemType::Trigonometry => RouteFamily::Trigonometry,
            ProblemType::Algebra => RouteFamily::Algebra,
        }
    }
}

impl fmt::Display for RouteFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which validator rule set applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationHint {
    #[default]
    General,
    Integral,
    Derivative,
    Limit,
    Equation,
    Matrix,
}

impl ValidationHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationHint::General => "general",
            ValidationHint::Integral => "integral",
            ValidationHint::Derivative => "derivative",
            ValidationHint::Limit => "limit",
            ValidationHint::Equation => "equation",
            ValidationHint::Matrix => "matrix",
        }
    }
}

// ============================================================================
// Calculus markers
// ============================================================================

static RE_LIMIT_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\blim(?:_|\b)|\blimit\b").expect("valid regex literal"));

/// Which kinds of calculus notation appear in the text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalculusMarkers {
    pub integral: bool,
    pub derivative: bool,
    pub limit: bool,
}

impl CalculusMarkers {
    pub fn scan(text: &str) -> Self {
        Self {
            integral: text.contains("\\int") || text.contains('∫'),
            derivative: text.contains("d/d")
                || text.contains("\\frac{d")
                || text.contains("\\partial")
                || text.contains('∂'),
            limit: text.contains("\\lim") || text.contains('→') || RE_LIMIT_WORD.is_match(text),
        }
    }

    pub fn any(&self) -> bool {
        self.integral || self.derivative || self.limit
    }
}

/// Validator rule set for this input, decided before classification runs.
pub fn validation_hint(note: NoteType, text: &str) -> ValidationHint {
    let markers = CalculusMarkers::scan(text);
    let lower = text.to_lowercase();

    if markers.integral || lower.contains("integrate") {
        ValidationHint::Integral
    } else if markers.derivative || lower.contains("derivative") {
        ValidationHint::Derivative
    } else if markers.limit {
        ValidationHint::Limit
    } else {
        match note {
            NoteType::Algebra => ValidationHint::Equation,
            NoteType::LinearAlgebra => ValidationHint::Matrix,
            _ => ValidationHint::General,
        }
    }
}

/// Pick the family to route to.
pub fn resolve_family(note: NoteType, text: &str, problem_type: ProblemType) -> RouteFamily {
    if CalculusMarkers::scan(text).any() {
        return RouteFamily::Calculus;
    }
    note.explicit_family()
        .unwrap_or_else(|| RouteFamily::from_problem_type(problem_type))
}

pub(crate) fn warm_up() {
    LazyLock::force(&RE_LIMIT_WORD);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_type_aliases() {
        assert_eq!(NoteType::parse("Trig"), NoteType::Trigonometry);
        assert_eq!(NoteType::parse("stats"), NoteType::Statistics);
        assert_eq!(NoteType::parse("matrix"), NoteType::LinearAlgebra);
        assert_eq!(NoteType::parse("general"), NoteType::Algebra);
        assert_eq!(NoteType::parse("chemistry"), NoteType::Auto);
        assert_eq!(NoteType::parse(""), NoteType::Auto);
    }

    #[test]
    fn test_calculus_markers_override_hint() {
        assert_eq!(
            resolve_family(NoteType::Algebra, "∫x dx", ProblemType::Algebra),
            RouteFamily::Calculus
        );
        assert_eq!(
            resolve_family(NoteType::Physics, "lim x→0 x", ProblemType::Algebra),
            RouteFamily::Calculus
        );
    }

    #[test]
    fn test_partial_derivative_is_calculus() {
        let view = nm_parser::to_latex("∂/∂x(x^2 y)");
        assert!(CalculusMarkers::scan(&view).derivative);
        assert!(CalculusMarkers::scan("\\frac{\\partial}{\\partial y} x y").derivative);
        assert_eq!(
            resolve_family(NoteType::Algebra, &view, ProblemType::Algebra),
            RouteFamily::Calculus
        );
    }

    #[test]
    fn test_auto_uses_problem_type() {
        assert_eq!(
            resolve_family(NoteType::Auto, "mean of 1 2 3", ProblemType::Statistics),
            RouteFamily::Statistics
        );
        assert_eq!(
            resolve_family(NoteType::Statistics, "x + 1 = 2", ProblemType::Algebra),
            RouteFamily::Statistics
        );
    }

    #[test]
    fn test_limit_word_needs_boundary() {
        assert!(!CalculusMarkers::scan("eliminate x").limit);
        assert!(!CalculusMarkers::scan("sublime").limit);
        assert!(CalculusMarkers::scan("lim_{x->0} x").limit);
        assert!(CalculusMarkers::scan("the limit as x approaches 0").limit);
    }

    #[test]
    fn test_validation_hint() {
        assert_eq!(validation_hint(NoteType::Auto, "\\int x"), ValidationHint::Integral);
        assert_eq!(validation_hint(NoteType::Auto, "d/dx(x)"), ValidationHint::Derivative);
        assert_eq!(validation_hint(NoteType::Algebra, "x + 1 = 2"), ValidationHint::Equation);
        assert_eq!(validation_hint(NoteType::LinearAlgebra, "det"), ValidationHint::Matrix);
        assert_eq!(validation_hint(NoteType::Auto, "x + 1 = 2"), ValidationHint::General);
    }
}
