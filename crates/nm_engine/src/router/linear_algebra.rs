//! Linear algebra chain.
//!
//! Keyword groups are tried in a fixed order; each needs at least one
//! well-formed matrix (two for multiplication). Matrices come from bracket
//! literals or LaTeX matrix environments.

use std::sync::LazyLock;

use nm_parser::{find_matrices, normalize_fragment, MatrixLiteral};
use regex::Regex;

use super::{Chain, RouteInput};
use crate::request::{MatrixOpKind, MatrixRows, SolveRequest};
use crate::validate::{Diagnostic, DiagnosticKind};

pub(crate) const CHAIN: Chain = &[
    ("determinant", determinant),
    ("eigenvalues", eigenvalues),
    ("eigenvectors", eigenvectors),
    ("inverse", inverse),
    ("transpose", transpose),
    ("rank", rank),
    ("trace", trace),
    ("rref", rref),
    ("null_space", null_space),
    ("column_space", column_space),
    ("row_space", row_space),
    ("multiply", multiply),
    ("solve_system", solve_system),
];

/// Keyword patterns per operation, in chain order.
static KEYWORDS: LazyLock<Vec<(MatrixOpKind, Regex)>> = LazyLock::new(|| {
    [
        (MatrixOpKind::Determinant, r"(?i)\bdet\b|determinant"),
        (MatrixOpKind::Eigenvalues, r"(?i)eigenvalue"),
        (MatrixOpKind::Eigenvectors, r"(?i)eigenvector"),
        (MatrixOpKind::Inverse, r"(?i)inverse|\binv\b|\^\{?-1\}?"),
        (MatrixOpKind::Transpose, r"(?i:transpose)|\^\{?T\}?"),
        (MatrixOpKind::Rank, r"(?i)\brank\b"),
        (MatrixOpKind::Trace, r"(?i)\btrace\b|\btr\("),
        (MatrixOpKind::Rref, r"(?i)\brref\b|row\s+echelon"),
        (MatrixOpKind::NullSpace, r"(?i)null\s*space|\bkernel\b"),
        (MatrixOpKind::ColumnSpace, r"(?i)column\s*space"),
        (MatrixOpKind::RowSpace, r"(?i)row\s*space"),
        (
            MatrixOpKind::Multiply,
            r"(?i)multiply|\btimes\b|product|\*|\\cdot|\\times",
        ),
        (MatrixOpKind::SolveSystem, r"(?i)\bsolve\b"),
    ]
    .into_iter()
    .map(|(kind, p)| (kind, Regex::new(p).expect("valid regex literal")))
    .collect()
});

fn keyword_matches(kind: MatrixOpKind, text: &str) -> bool {
    KEYWORDS
        .iter()
        .find(|(k, _)| *k == kind)
        .is_some_and(|(_, re)| re.is_match(text))
}

fn canonical_rows(m: MatrixLiteral) -> MatrixRows {
    m.rows
        .into_iter()
        .map(|row| row.iter().map(|e| normalize_fragment(e)).collect())
        .collect()
}

/// Well-formed matrices in order of appearance; ragged or unparseable
/// candidates are dropped.
fn valid_matrices(source: &str) -> Vec<MatrixRows> {
    find_matrices(source)
        .into_iter()
        .filter_map(Result::ok)
        .map(canonical_rows)
        .collect()
}

fn single(input: &RouteInput<'_>, kind: MatrixOpKind) -> Option<SolveRequest> {
    if !keyword_matches(kind, input.source) {
        return None;
    }
    let matrix = valid_matrices(input.source).into_iter().next()?;
    Some(SolveRequest::MatrixOp {
        kind,
        matrix,
        matrix2: None,
    })
}

fn determinant(input: &RouteInput<'_>) -> Option<SolveRequest> {
    single(input, MatrixOpKind::Determinant)
}

fn eigenvalues(input: &RouteInput<'_>) -> Option<SolveRequest> {
    single(input, MatrixOpKind::Eigenvalues)
}

fn eigenvectors(input: &RouteInput<'_>) -> Option<SolveRequest> {
    single(input, MatrixOpKind::Eigenvectors)
}

fn inverse(input: &RouteInput<'_>) -> Option<SolveRequest> {
    single(input, MatrixOpKind::Inverse)
}

fn transpose(input: &RouteInput<'_>) -> Option<SolveRequest> {
    single(input, MatrixOpKind::Transpose)
}

fn rank(input: &RouteInput<'_>) -> Option<SolveRequest> {
    single(input, MatrixOpKind::Rank)
}

fn trace(input: &RouteInput<'_>) -> Option<SolveRequest> {
    single(input, MatrixOpKind::Trace)
}

fn rref(input: &RouteInput<'_>) -> Option<SolveRequest> {
    single(input, MatrixOpKind::Rref)
}

fn null_space(input: &RouteInput<'_>) -> Option<SolveRequest> {
    single(input, MatrixOpKind::NullSpace)
}

fn column_space(input: &RouteInput<'_>) -> Option<SolveRequest> {
    single(input, MatrixOpKind::ColumnSpace)
}

fn row_space(input: &RouteInput<'_>) -> Option<SolveRequest> {
    single(input, MatrixOpKind::RowSpace)
}

fn multiply(input: &RouteInput<'_>) -> Option<SolveRequest> {
    if !keyword_matches(MatrixOpKind::Multiply, input.source) {
        return None;
    }
    let mut matrices = valid_matrices(input.source).into_iter();
    let matrix = matrices.next()?;
    let second = matrices.next()?;
    Some(SolveRequest::MatrixOp {
        kind: MatrixOpKind::Multiply,
        matrix,
        matrix2: Some(second),
    })
}

/// `solve` plus an equation or the word "system": the first matrix is the
/// coefficient (or augmented) matrix, an optional second one the right-hand
/// side.
fn solve_system(input: &RouteInput<'_>) -> Option<SolveRequest> {
    if !keyword_matches(MatrixOpKind::SolveSystem, input.source) {
        return None;
    }
    if !(input.source.contains('=') || input.lower().contains("system")) {
        return None;
    }
    let mut matrices = valid_matrices(input.source).into_iter();
    let matrix = matrices.next()?;
    Some(SolveRequest::MatrixOp {
        kind: MatrixOpKind::SolveSystem,
        matrix,
        matrix2: matrices.next(),
    })
}

pub(crate) fn gap(input: &RouteInput<'_>) -> Option<Diagnostic> {
    let candidates = find_matrices(input.source);
    if !candidates.is_empty() && candidates.iter().all(Result::is_err) {
        let detail = candidates
            .iter()
            .find_map(|c| c.as_ref().err())
            .map(ToString::to_string)
            .unwrap_or_default();
        return Some(Diagnostic::new(
            DiagnosticKind::MalformedMatrix,
            format!("Malformed matrix: {detail}"),
            "Every row needs the same number of entries",
            "Example: [[1, 2], [3, 4]]",
            "Your matrix could not be read. Check that all rows have the same length.",
        ));
    }

    let any_keyword = KEYWORDS.iter().any(|(_, re)| re.is_match(input.source));
    if candidates.is_empty() && any_keyword {
        return Some(Diagnostic::new(
            DiagnosticKind::MissingMatrix,
            "Matrix operation without a matrix",
            "Write the matrix as [[a, b], [c, d]] or a \\begin{pmatrix} environment",
            "Example: det [[1, 2], [3, 4]]",
            "I found a matrix operation but no matrix to apply it to.",
        ));
    }
    None
}

pub(crate) fn warm_up() {
    LazyLock::force(&KEYWORDS);
}
