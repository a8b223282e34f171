//! Physics chain: explicit equations first, then named formulas.

use std::sync::LazyLock;

use nm_parser::groups::split_top_level;
use nm_parser::normalize_fragment;
use regex::Regex;

use super::{Chain, RouteInput};
use crate::classify::{score_categories, ProblemType};
use crate::request::SolveRequest;
use crate::validate::Diagnostic;

pub(crate) const CHAIN: Chain = &[
    ("equation", equation),
    ("kinetic_energy", kinetic_energy),
    ("potential_energy", potential_energy),
    ("wave", wave),
    ("ideal_gas", ideal_gas),
    ("ohm", ohm),
];

static RE_KINETIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bkinetic\b|\bKE\b").expect("valid regex literal"));

static RE_POTENTIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bpotential\b|\bPE\b").expect("valid regex literal"));

static RE_ANGULAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)omega|ω|\bangular\b").expect("valid regex literal"));

static RE_CLAUSE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[;]|\bwhen\b|\bwhere\b|\bif\b").expect("valid regex literal"));

/// Best-scoring physics row of the category table, independent of the
/// overall classification winner.
fn topic(source: &str) -> &'static str {
    let mut best: Option<(ProblemType, usize)> = None;
    for (ty, score) in score_categories(source) {
        let is_physics = matches!(
            ty,
            ProblemType::PhysicsKinematics
                | ProblemType::PhysicsForce
                | ProblemType::PhysicsEnergy
                | ProblemType::PhysicsElectricity
        );
        if is_physics && score > 0 && best.map_or(true, |(_, s)| score > s) {
            best = Some((ty, score));
        }
    }
    match best.map(|(ty, _)| ty) {
        Some(ProblemType::PhysicsKinematics) => "kinematics",
        Some(ProblemType::PhysicsForce) => "force",
        Some(ProblemType::PhysicsEnergy) => "energy",
        Some(ProblemType::PhysicsElectricity) => "electricity",
        _ => "general",
    }
}

/// `v = u + at, when u = 0` keeps only the leading equation.
fn leading_clause(body: &str) -> &str {
    let first = split_top_level(body, ',').into_iter().next().unwrap_or(body);
    match RE_CLAUSE_BREAK.find(first) {
        Some(m) => &first[..m.start()],
        None => first,
    }
}

fn equation(input: &RouteInput<'_>) -> Option<SolveRequest> {
    let clause = leading_clause(&input.extraction.equation_body);
    let (lhs, rhs) = clause.split_once('=')?;
    let lhs = normalize_fragment(lhs);
    let rhs = normalize_fragment(rhs);
    if lhs.is_empty() || rhs.is_empty() {
        return None;
    }
    let target_var = input
        .extraction
        .solve_for
        .clone()
        .or_else(|| input.extraction.variables.first().cloned());
    Some(SolveRequest::PhysicsEquation {
        lhs,
        rhs,
        topic: topic(input.source).to_string(),
        target_var,
    })
}

fn formula(lhs: &str, rhs: &str, topic: &str) -> SolveRequest {
    SolveRequest::PhysicsEquation {
        lhs: lhs.to_string(),
        rhs: rhs.to_string(),
        topic: topic.to_string(),
        target_var: Some(lhs.to_string()),
    }
}

fn kinetic_energy(input: &RouteInput<'_>) -> Option<SolveRequest> {
    RE_KINETIC
        .is_match(input.source)
        .then(|| formula("KE", "m*v**2/2", "energy"))
}

fn potential_energy(input: &RouteInput<'_>) -> Option<SolveRequest> {
    RE_POTENTIAL
        .is_match(input.source)
        .then(|| formula("PE", "m*g*h", "energy"))
}

fn wave(input: &RouteInput<'_>) -> Option<SolveRequest> {
    let lower = input.lower();
    if !(lower.contains("wave") || lower.contains("frequency")) {
        return None;
    }
    if RE_ANGULAR.is_match(input.source) {
        Some(formula("omega", "2*pi*f", "waves"))
    } else {
        Some(formula("v", "f*lambda_var", "waves"))
    }
}

fn ideal_gas(input: &RouteInput<'_>) -> Option<SolveRequest> {
    let lower = input.lower();
    let compact: String = lower.chars().filter(|c| !c.is_whitespace()).collect();
    (compact.contains("pv") || lower.contains("ideal gas"))
        .then(|| formula("P*V", "n*R*T", "thermodynamics"))
}

fn ohm(input: &RouteInput<'_>) -> Option<SolveRequest> {
    input
        .lower()
        .contains("ohm")
        .then(|| formula("V", "I*R", "electricity"))
}

pub(crate) fn gap(_: &RouteInput<'_>) -> Option<Diagnostic> {
    None
}

pub(crate) fn warm_up() {
    LazyLock::force(&RE_KINETIC);
    LazyLock::force(&RE_POTENTIAL);
    LazyLock::force(&RE_ANGULAR);
    LazyLock::force(&RE_CLAUSE_BREAK);
}

#[cfg(test)]
mod tests {
    use super::super::test_support::route_text;
    use super::*;
    use crate::error::RouteError;
    use crate::family::RouteFamily;

    fn phys(raw: &str) -> SolveRequest {
        route_text(RouteFamily::Physics, raw).unwrap()
    }

    #[test]
    fn test_equation_with_target() {
        assert_eq!(
            phys("F = ma, solve for a"),
            SolveRequest::PhysicsEquation {
                lhs: "F".into(),
                rhs: "ma".into(),
                topic: "force".into(),
                target_var: Some("a".into()),
            }
        );
    }

    #[test]
    fn test_equation_drops_given_values() {
        match phys("v = u + at, solve for v when u=0, a=9.8, t=2") {
            SolveRequest::PhysicsEquation {
                lhs, rhs, target_var, ..
            } => {
                assert_eq!(lhs, "v");
                assert_eq!(rhs, "u + at");
                assert_eq!(target_var.as_deref(), Some("v"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_named_formulas() {
        assert_eq!(phys("kinetic energy"), formula("KE", "m*v**2/2", "energy"));
        assert_eq!(phys("potential energy"), formula("PE", "m*g*h", "energy"));
        assert_eq!(phys("wave speed"), formula("v", "f*lambda_var", "waves"));
        assert_eq!(phys("angular frequency ω"), formula("omega", "2*pi*f", "waves"));
        assert_eq!(phys("ideal gas law"), formula("P*V", "n*R*T", "thermodynamics"));
        assert_eq!(phys("ohm's law"), formula("V", "I*R", "electricity"));
    }

    #[test]
    fn test_topic_from_physics_rows() {
        assert_eq!(topic("v = u + at"), "kinematics");
        assert_eq!(topic("V = IR"), "electricity");
        assert_eq!(topic("y = 2"), "general");
    }

    #[test]
    fn test_no_formula() {
        let err = route_text(RouteFamily::Physics, "momentum").unwrap_err();
        assert!(matches!(err, RouteError::NoMatch { family: RouteFamily::Physics, .. }));
    }
}
