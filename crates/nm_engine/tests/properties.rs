use nm_engine::classify::{confidence, detect_problem_type, score_categories};
use nm_engine::{classify, validate, NoteType, Operation, Pipeline, ProblemType, ValidationHint};
use proptest::prelude::*;

fn arb_input() -> impl Strategy<Value = String> {
    let tokens = vec![
        "x", "t", "3", "0.5", "+", "-", "*", "/", "^", "=", "<", " ", "(", ")", "{", "}", "[", "]",
        ",", "\\int", "\\frac", "\\lim_{x\\to 0}", "d/dx", "dx", "\\sin", "\\cos", "∫", "∂", "√",
        "²", "mean", "det", "force", "integrate", "solve", "simplify", "binomial", "\\begin{pmatrix}",
        "&", "\\\\", "\\end{pmatrix}", "€",
    ];
    prop::collection::vec(prop::sample::select(tokens), 0..16).prop_map(|v| v.concat())
}

fn arb_hint() -> impl Strategy<Value = ValidationHint> {
    prop::sample::select(vec![
        ValidationHint::General,
        ValidationHint::Integral,
        ValidationHint::Derivative,
        ValidationHint::Limit,
        ValidationHint::Equation,
        ValidationHint::Matrix,
    ])
}

fn arb_note() -> impl Strategy<Value = NoteType> {
    prop::sample::select(vec![
        NoteType::Algebra,
        NoteType::Calculus,
        NoteType::Physics,
        NoteType::Trigonometry,
        NoteType::Statistics,
        NoteType::LinearAlgebra,
        NoteType::Auto,
    ])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Every input gets a verdict, and every rejection says something.
    #[test]
    fn validator_is_total(s in arb_input(), hint in arb_hint()) {
        if let Some(d) = validate(&s, hint).diagnostic() {
            prop_assert!(!d.user_message.is_empty());
            prop_assert!(!d.suggestion.is_empty());
            prop_assert!(!d.kind.as_str().is_empty());
        }
    }

    #[test]
    fn validator_is_total_on_any_string(s in ".{0,48}", hint in arb_hint()) {
        let _ = validate(&s, hint);
    }

    #[test]
    fn classifier_is_deterministic(s in arb_input()) {
        prop_assert_eq!(classify(&s), classify(&s));
    }

    /// Highest score wins; on a tie the first-declared category wins.
    #[test]
    fn first_declared_wins_ties(s in arb_input()) {
        let scores = score_categories(&s);
        let max = scores.iter().map(|(_, n)| *n).max().unwrap_or(0);
        let expected = if max == 0 {
            ProblemType::Algebra
        } else {
            scores.iter().find(|(_, n)| *n == max).map(|(ty, _)| *ty).unwrap()
        };
        prop_assert_eq!(detect_problem_type(&s), expected);
    }

    #[test]
    fn pipeline_never_panics(s in arb_input(), note in arb_note()) {
        let _ = Pipeline::new().route(&s, note);
    }
}

#[test]
fn confidence_is_monotone_in_specificity() {
    let types = [
        ProblemType::CalculusDerivative,
        ProblemType::CalculusIntegral,
        ProblemType::CalculusLimit,
        ProblemType::PhysicsKinematics,
        ProblemType::PhysicsForce,
        ProblemType::PhysicsEnergy,
        ProblemType::PhysicsElectricity,
        ProblemType::Statistics,
        ProblemType::LinearAlgebra,
        ProblemType::Trigonometry,
    ];
    let ops = [
        Operation::Simplify,
        Operation::Factor,
        Operation::Differentiate,
        Operation::Integrate,
        Operation::Limit,
        Operation::Plot,
    ];
    let base = confidence(ProblemType::Algebra, Operation::Solve);
    assert_eq!(base, 0.5);
    for ty in types {
        let type_only = confidence(ty, Operation::Solve);
        assert!(type_only > base);
        for op in ops {
            assert!(confidence(ty, op) > type_only);
            assert!(confidence(ProblemType::Algebra, op) > base);
        }
    }
}
