//! Problem Classifier and Confidence Scorer
//!
//! Category detection counts how many of each category's patterns match and
//! keeps the best score; ties go to the category declared first in
//! [`CATEGORY_PATTERNS`]. Operation detection is an ordered substring table,
//! first hit wins. Both fall back to a default (`algebra` / `solve`).

use std::fmt;
use std::sync::LazyLock;

use nm_api_models::ClassificationJson;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::extract::Extraction;

// ============================================================================
// Problem types
// ============================================================================

/// Closed set of problem categories. `Algebra` is the universal fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemType {
    CalculusDerivative,
    CalculusIntegral,
    CalculusLimit,
    PhysicsKinematics,
    PhysicsForce,
    PhysicsEnergy,
    PhysicsElectricity,
    Statistics,
    LinearAlgebra,
    Trigonometry,
    Algebra,
}

impl ProblemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemType::CalculusDerivative => "calculus_derivative",
            ProblemType::CalculusIntegral => "calculus_integral",
            ProblemType::CalculusLimit => "calculus_limit",
            ProblemType::PhysicsKinematics => "physics_kinematics",
            ProblemType::PhysicsForce => "physics_force",
            ProblemType::PhysicsEnergy => "physics_energy",
            ProblemType::PhysicsElectricity => "physics_electricity",
            ProblemType::Statistics => "statistics",
            ProblemType::LinearAlgebra => "linear_algebra",
            ProblemType::Trigonometry => "trigonometry",
            ProblemType::Algebra => "algebra",
        }
    }
}

impl fmt::Display for ProblemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category pattern table, in tie-break order.
const CATEGORY_PATTERNS: &[(ProblemType, &[&str])] = &[
    (
        ProblemType::CalculusDerivative,
        &[
            r"d[xy]/d[xy]",
            r"\\frac\{d",
            r"derivative",
            r"f'",
            r"\\partial",
            r"\bd/d[a-z]\b",
        ],
    ),
    (
        ProblemType::CalculusIntegral,
        &[r"\\int", r"integral", r"∫", r"area under", r"\bintegrate\b"],
    ),
    (
        ProblemType::CalculusLimit,
        &[r"\\lim", r"limit", r"approaches", r"as.*→", r"tends to"],
    ),
    (
        ProblemType::PhysicsKinematics,
        &[
            r"\bv\s*=\s*u\s*\+\s*a\s*\*?\s*t\b",
            r"\bs\s*=\s*u\s*\*?\s*t\s*\+",
            r"\bv\s*\*\*?\s*2\s*=\s*u\s*\*\*?\s*2",
            r"velocity|acceleration|displacement",
        ],
    ),
    (
        ProblemType::PhysicsForce,
        &[r"\bF\s*=\s*m\s*\*?\s*a\b", r"force|newton|mass.*acceleration"],
    ),
    (
        ProblemType::PhysicsEnergy,
        &[
            r"\bE\s*=\s*m\s*\*?\s*c\s*\*\*?\s*2",
            r"KE\s*=|PE\s*=",
            r"kinetic|potential.*energy",
        ],
    ),
    (
        ProblemType::PhysicsElectricity,
        &[
            r"\bV\s*=\s*I\s*\*?\s*R\b",
            r"\bP\s*=\s*V\s*\*?\s*I\b",
            r"voltage|current|resistance|ohm",
        ],
    ),
    (
        ProblemType::Statistics,
        &[
            r"mean|average|median|mode",
            r"variance|std|standard deviation",
            r"probability|P\(",
            r"normal distribution|gaussian",
        ],
    ),
    (
        ProblemType::LinearAlgebra,
        &[
            r"matrix|determinant|eigenvalue",
            r"\\begin\{[pbvBV]?matrix\}",
            r"dot product|cross product",
            r"vector",
            r"\bdet\b|\brref\b|\btrace\b|\btranspose\b|\[\[",
        ],
    ),
    (
        ProblemType::Trigonometry,
        &[
            r"\bsin\b|\bcos\b|\btan\b|\bcot\b|\bsec\b|\bcsc\b",
            r"\\sin|\\cos|\\tan",
            r"triangle|angle",
        ],
    ),
    (ProblemType::Algebra, &[r"solve|find|calculate", r"=.*[a-z]"]),
];

static CATEGORY_TABLE: LazyLock<Vec<(ProblemType, Vec<Regex>)>> = LazyLock::new(|| {
    CATEGORY_PATTERNS
        .iter()
        .map(|(ty, patterns)| {
            let compiled = patterns
                .iter()
                .map(|p| Regex::new(&format!("(?i){p}")).expect("valid regex literal"))
                .collect();
            (*ty, compiled)
        })
        .collect()
});

// ============================================================================
// Operations
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Solve,
    Simplify,
    Factor,
    Differentiate,
    Integrate,
    Limit,
    Plot,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Solve => "solve",
            Operation::Simplify => "simplify",
            Operation::Factor => "factor",
            Operation::Differentiate => "differentiate",
            Operation::Integrate => "integrate",
            Operation::Limit => "limit",
            Operation::Plot => "plot",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation keywords, matched as lowercase substrings. First hit wins.
const OPERATION_KEYWORDS: &[(Operation, &[&str])] = &[
    (
        Operation::Solve,
        &["solve", "find", "what is", "calculate", "determine", "="],
    ),
    (Operation::Simplify, &["simplify", "reduce", "expand"]),
    (Operation::Factor, &["factor", "factorize", "factorise"]),
    (
        Operation::Differentiate,
        &["derivative", "differentiate", "f'", "d/d", "rate of change"],
    ),
    (
        Operation::Integrate,
        &["integrate", "integral", "antiderivative", "area"],
    ),
    (Operation::Limit, &["limit", "approaches", "tends to"]),
    (Operation::Plot, &["plot", "graph", "draw", "sketch"]),
];

// ============================================================================
// Classification
// ============================================================================

/// What [`classify`] decides on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierOutput {
    pub problem_type: ProblemType,
    pub operation: Operation,
    pub confidence: f64,
}

/// Classifier output merged with extracted entities.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub problem_type: ProblemType,
    pub operation: Operation,
    pub variables: Vec<String>,
    pub solve_for: Option<String>,
    pub limits: Option<(f64, f64)>,
    pub confidence: f64,
}

impl Classification {
    pub fn from_parts(output: ClassifierOutput, extraction: &Extraction) -> Self {
        Self {
            problem_type: output.problem_type,
            operation: output.operation,
            variables: extraction.variables.clone(),
            solve_for: extraction.solve_for.clone(),
            limits: extraction.limits,
            confidence: output.confidence,
        }
    }

    pub fn to_json(&self) -> ClassificationJson {
        ClassificationJson {
            problem_type: self.problem_type.as_str().to_string(),
            operation: self.operation.as_str().to_string(),
            confidence: self.confidence,
            variables: self.variables.clone(),
            solve_for: self.solve_for.clone(),
            limits: self.limits.map(|(lo, hi)| [lo, hi]),
        }
    }
}

/// Per-category match counts, in declaration order. Zero scores included.
pub fn score_categories(text: &str) -> Vec<(ProblemType, usize)> {
    CATEGORY_TABLE
        .iter()
        .map(|(ty, patterns)| (*ty, patterns.iter().filter(|re| re.is_match(text)).count()))
        .collect()
}

pub fn detect_problem_type(text: &str) -> ProblemType {
    let mut best: Option<(ProblemType, usize)> = None;
    for (ty, score) in score_categories(text) {
        // Strictly greater: an equal later score never displaces an earlier one.
        if score > 0 && best.map_or(true, |(_, s)| score > s) {
            best = Some((ty, score));
        }
    }
    best.map_or(ProblemType::Algebra, |(ty, _)| ty)
}

pub fn detect_operation(text: &str) -> Operation {
    let lower = text.to_lowercase();
    OPERATION_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map_or(Operation::Solve, |(op, _)| *op)
}

/// Step function over "is the result specific?". Not a probability.
pub fn confidence(problem_type: ProblemType, operation: Operation) -> f64 {
    let specific_type = problem_type != ProblemType::Algebra;
    let specific_op = operation != Operation::Solve;
    match (specific_type, specific_op) {
        (true, true) => 0.9,
        (true, false) => 0.7,
        (false, true) => 0.6,
        (false, false) => 0.5,
    }
}

pub fn classify(text: &str) -> ClassifierOutput {
    let problem_type = detect_problem_type(text);
    let operation = detect_operation(text);
    let confidence = confidence(problem_type, operation);

    tracing::debug!(
        target: "classify",
        problem_type = %problem_type,
        operation = %operation,
        confidence,
        "classified"
    );

    ClassifierOutput {
        problem_type,
        operation,
        confidence,
    }
}

pub(crate) fn warm_up() {
    LazyLock::force(&CATEGORY_TABLE);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_algebra_solve() {
        let out = classify("x + 3 = 0");
        assert_eq!(out.problem_type, ProblemType::Algebra);
        assert_eq!(out.operation, Operation::Solve);
        assert_eq!(out.confidence, 0.5);
    }

    #[test]
    fn test_integral() {
        let out = classify("\\int x^{2}dx");
        assert_eq!(out.problem_type, ProblemType::CalculusIntegral);
        assert_eq!(out.confidence, 0.7);
    }

    #[test]
    fn test_derivative_operation() {
        let out = classify("find the derivative of x^3");
        assert_eq!(out.problem_type, ProblemType::CalculusDerivative);
        // "find" precedes "derivative" in the keyword table.
        assert_eq!(out.operation, Operation::Solve);
        let out = classify("derivative of x^3");
        assert_eq!(out.operation, Operation::Differentiate);
        assert_eq!(out.confidence, 0.9);
    }

    #[test]
    fn test_case_insensitive_patterns() {
        assert_eq!(detect_problem_type("Compute the DETERMINANT"), ProblemType::LinearAlgebra);
        assert_eq!(detect_problem_type("f = m a, FORCE"), ProblemType::PhysicsForce);
    }

    #[test]
    fn test_highest_score_wins() {
        // trigonometry scores 2 (\bsin\b and \\sin), limit scores 1.
        assert_eq!(
            detect_problem_type("\\lim_{x\\to 0} \\frac{\\sin(x)}{x}"),
            ProblemType::Trigonometry
        );
    }

    #[test]
    fn test_tie_goes_to_first_declared() {
        // One statistics pattern, one trigonometry pattern.
        let scores = score_categories("median angle");
        let stat = scores.iter().find(|(t, _)| *t == ProblemType::Statistics).unwrap().1;
        let trig = scores.iter().find(|(t, _)| *t == ProblemType::Trigonometry).unwrap().1;
        assert_eq!((stat, trig), (1, 1));
        assert_eq!(detect_problem_type("median angle"), ProblemType::Statistics);
    }

    #[test]
    fn test_confidence_table() {
        assert_eq!(confidence(ProblemType::Statistics, Operation::Plot), 0.9);
        assert_eq!(confidence(ProblemType::Statistics, Operation::Solve), 0.7);
        assert_eq!(confidence(ProblemType::Algebra, Operation::Factor), 0.6);
        assert_eq!(confidence(ProblemType::Algebra, Operation::Solve), 0.5);
    }

    #[test]
    fn test_to_json_names() {
        let ex = Extraction {
            variables: vec!["x".into()],
            solve_for: Some("x".into()),
            equation_body: "x + 3 = 0".into(),
            limits: Some((0.0, 1.0)),
        };
        let c = Classification::from_parts(classify("x + 3 = 0"), &ex);
        let json = c.to_json();
        assert_eq!(json.problem_type, "algebra");
        assert_eq!(json.operation, "solve");
        assert_eq!(json.limits, Some([0.0, 1.0]));
    }
}
