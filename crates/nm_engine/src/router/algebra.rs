//! Algebra chain. Always produces a request: anything that is not a
//! simplify/factor instruction or an inequality is an equation to solve.

use std::sync::LazyLock;

use nm_parser::{normalize, normalize_fragment};
use regex::Regex;

use super::{Chain, RouteInput};
use crate::classify::Operation;
use crate::request::{Relation, SolveRequest};
use crate::validate::Diagnostic;

pub(crate) const CHAIN: Chain = &[
    ("simplify", simplify),
    ("factor", factor),
    ("inequality", inequality),
    ("equation", equation),
];

static RE_SIMPLIFY_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:simplify|reduce|expand)\b\s*:?").expect("valid regex literal")
});

static RE_FACTOR_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:factorize|factorise|factor)\b\s*:?").expect("valid regex literal")
});

/// Two-character relations are checked before their one-character prefixes.
const RELATIONS: &[(&str, Relation)] = &[
    ("<=", Relation::Le),
    (">=", Relation::Ge),
    ("!=", Relation::Ne),
    ("<", Relation::Lt),
    (">", Relation::Gt),
];

fn stripped_expr(re: &Regex, source: &str) -> Option<String> {
    let expr = normalize_fragment(&re.replace_all(source, ""));
    (!expr.is_empty()).then_some(expr)
}

fn simplify(input: &RouteInput<'_>) -> Option<SolveRequest> {
    if input.classification.operation != Operation::Simplify {
        return None;
    }
    stripped_expr(&RE_SIMPLIFY_WORDS, input.source).map(|expr| SolveRequest::Simplify { expr })
}

fn factor(input: &RouteInput<'_>) -> Option<SolveRequest> {
    if input.classification.operation != Operation::Factor {
        return None;
    }
    stripped_expr(&RE_FACTOR_WORDS, input.source).map(|expr| SolveRequest::Factor { expr })
}

/// Byte offset and relation of the first relational operator. `->` is an
/// arrow, not a comparison.
fn find_relation(expr: &str) -> Option<(usize, &'static str, Relation)> {
    for (symbol, relation) in RELATIONS {
        let found = expr.match_indices(symbol).find(|(idx, _)| {
            !(*symbol == ">" && *idx > 0 && expr.as_bytes()[idx - 1] == b'-')
        });
        if let Some((idx, _)) = found {
            return Some((idx, *symbol, *relation));
        }
    }
    None
}

fn inequality(input: &RouteInput<'_>) -> Option<SolveRequest> {
    let body = normalize(&input.extraction.equation_body);
    let (idx, symbol, relation) = find_relation(body.as_str())?;
    let lhs = normalize_fragment(&body.as_str()[..idx]);
    let rhs = normalize_fragment(&body.as_str()[idx + symbol.len()..]);
    if lhs.is_empty() || rhs.is_empty() {
        return None;
    }
    Some(SolveRequest::Inequality {
        lhs,
        relation,
        rhs,
        var: input.extraction.solve_for.clone(),
    })
}

fn equation(input: &RouteInput<'_>) -> Option<SolveRequest> {
    let body = &input.extraction.equation_body;
    let expr = if body.trim().is_empty() {
        input.normalized.as_str().to_string()
    } else {
        normalize_fragment(body)
    };
    if expr.is_empty() {
        return None;
    }
    Some(SolveRequest::EquationSolve {
        expr,
        target_var: input.extraction.solve_for.clone(),
    })
}

/// The algebra chain always matches on validated input, so there is no gap
/// to report.
pub(crate) fn gap(_: &RouteInput<'_>) -> Option<Diagnostic> {
    None
}

pub(crate) fn warm_up() {
    LazyLock::force(&RE_SIMPLIFY_WORDS);
    LazyLock::force(&RE_FACTOR_WORDS);
}
