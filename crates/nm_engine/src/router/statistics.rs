//! Statistics chain.
//!
//! Distributions and counting come before the summary statistics: their
//! parameter text ("normal with mean 0") contains summary keywords.

use std::sync::LazyLock;

use nm_parser::extract_numbers;
use regex::Regex;

use super::{Chain, RouteInput};
use crate::request::{CountingKind, Distribution, SolveRequest, StatKind};
use crate::validate::{Diagnostic, DiagnosticKind};

pub(crate) const CHAIN: Chain = &[
    ("binomial", binomial),
    ("normal", normal),
    ("permutation", permutation),
    ("combination", combination),
    ("mean", mean),
    ("median", median),
    ("mode", mode),
    ("spread", spread),
];

static RE_BINOMIAL_N: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bn\s*=\s*(\d+)").expect("valid regex literal"));

static RE_BINOMIAL_P: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bp\s*=\s*(0?\.\d+|\d+\.?\d*)").expect("valid regex literal")
});

static RE_BINOMIAL_K: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[xXkK]\s*=\s*(\d+)").expect("valid regex literal"));

static RE_NORMAL_MEAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:μ|\\mu\b|\bmu\b|\bmean\b)\s*=?\s*(-?\d+\.?\d*)").expect("valid regex literal")
});

static RE_NORMAL_STD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:σ|\\sigma\b|\bsigma\b|\bstd\b|\bstandard\s+deviation\b)\s*=?\s*(\d+\.?\d*)")
        .expect("valid regex literal")
});

static RE_PERMUTATION_INFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*P\s*(\d+)").expect("valid regex literal"));

static RE_COMBINATION_INFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*(?-i:C)\s*(\d+)|(\d+)\s*choose\s*(\d+)").expect("valid regex literal")
});

// ============================================================================
// Distributions and counting
// ============================================================================

fn binomial(input: &RouteInput<'_>) -> Option<SolveRequest> {
    if !input.lower().contains("binomial") {
        return None;
    }
    let n = RE_BINOMIAL_N.captures(input.source)?[1].parse().ok()?;
    let p = RE_BINOMIAL_P.captures(input.source)?[1].parse().ok()?;
    let k = RE_BINOMIAL_K
        .captures(input.source)
        .and_then(|c| c[1].parse().ok());
    Some(SolveRequest::Distribution {
        distribution: Distribution::Binomial { n, p, k },
    })
}

fn normal(input: &RouteInput<'_>) -> Option<SolveRequest> {
    let lower = input.lower();
    if !(lower.contains("normal") || lower.contains("gaussian")) {
        return None;
    }
    let mean = RE_NORMAL_MEAN
        .captures(input.source)
        .and_then(|c| c[1].parse().ok())
        .unwrap_or(0.0);
    let std = RE_NORMAL_STD
        .captures(input.source)
        .and_then(|c| c[1].parse().ok())
        .unwrap_or(1.0);
    Some(SolveRequest::Distribution {
        distribution: Distribution::Normal { mean, std },
    })
}

/// First two non-negative integers in the text.
fn leading_pair(text: &str) -> Option<(u64, u64)> {
    let mut ints = extract_numbers(text)
        .into_iter()
        .filter(|v| *v >= 0.0 && v.fract() == 0.0)
        .map(|v| v as u64);
    Some((ints.next()?, ints.next()?))
}

fn counting(
    input: &RouteInput<'_>,
    kind: CountingKind,
    infix: &Regex,
    keywords: &[&str],
) -> Option<SolveRequest> {
    let compact: String = input.lower().chars().filter(|c| !c.is_whitespace()).collect();
    let by_keyword = keywords.iter().any(|k| compact.contains(k));

    let pair = match infix.captures(input.source) {
        Some(caps) => {
            let groups: Vec<&str> = caps.iter().skip(1).flatten().map(|m| m.as_str()).collect();
            match groups.as_slice() {
                [n, r, ..] => Some((n.parse().ok()?, r.parse().ok()?)),
                _ => None,
            }
        }
        None if by_keyword => leading_pair(input.source),
        None => return None,
    }?;

    Some(SolveRequest::Counting {
        kind,
        n: pair.0,
        r: pair.1,
    })
}

fn permutation(input: &RouteInput<'_>) -> Option<SolveRequest> {
    counting(
        input,
        CountingKind::Permutation,
        &RE_PERMUTATION_INFIX,
        &["permutation", "npr"],
    )
}

fn combination(input: &RouteInput<'_>) -> Option<SolveRequest> {
    counting(
        input,
        CountingKind::Combination,
        &RE_COMBINATION_INFIX,
        &["combination", "ncr", "choose"],
    )
}

// ============================================================================
// Summary statistics
// ============================================================================

fn summary(input: &RouteInput<'_>, keywords: &[&str], kind: StatKind) -> Option<SolveRequest> {
    if !keywords.iter().any(|k| input.lower().contains(k)) {
        return None;
    }
    let data = extract_numbers(input.source);
    (!data.is_empty()).then_some(SolveRequest::StatSummary { kind, data })
}

fn mean(input: &RouteInput<'_>) -> Option<SolveRequest> {
    summary(input, &["mean", "average"], StatKind::Mean)
}

fn median(input: &RouteInput<'_>) -> Option<SolveRequest> {
    summary(input, &["median"], StatKind::Median)
}

fn mode(input: &RouteInput<'_>) -> Option<SolveRequest> {
    summary(input, &["mode"], StatKind::Mode)
}

fn spread(input: &RouteInput<'_>) -> Option<SolveRequest> {
    let kind = if input.lower().contains("variance") {
        StatKind::Variance
    } else {
        StatKind::StdDev
    };
    summary(input, &["variance", "std", "standard deviation"], kind)
}

// ============================================================================
// Gaps
// ============================================================================

/// Keywords that need data, with a worked example for the hint.
const DATA_KEYWORDS: &[(&[&str], &str)] = &[
    (&["binomial"], "Example: P(X=2) for binomial(n=10, p=0.5)"),
    (&["permutation", "npr"], "Example: 5P2 or permutations of 5 taken 2"),
    (&["combination", "ncr", "choose"], "Example: 5C2 or 5 choose 2"),
    (
        &["mean", "average", "median", "mode", "variance", "std", "standard deviation"],
        "Example: mean of [2, 4, 6, 8]",
    ),
];

pub(crate) fn gap(input: &RouteInput<'_>) -> Option<Diagnostic> {
    let lower = input.lower();
    let (_, example) = DATA_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))?;
    Some(Diagnostic::new(
        DiagnosticKind::MissingData,
        "Statistics problem has no data",
        "Include the numbers or parameters to work with",
        *example,
        "I found a statistics keyword but no data to compute it on.",
    ))
}

pub(crate) fn warm_up() {
    LazyLock::force(&RE_BINOMIAL_N);
    LazyLock::force(&RE_BINOMIAL_P);
    LazyLock::force(&RE_BINOMIAL_K);
    LazyLock::force(&RE_NORMAL_MEAN);
    LazyLock::force(&RE_NORMAL_STD);
    LazyLock::force(&RE_PERMUTATION_INFIX);
    LazyLock::force(&RE_COMBINATION_INFIX);
}
