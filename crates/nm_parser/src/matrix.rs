//! Matrix literal parsing.
//!
//! Two spellings are recognized:
//! - bracket literals `[[1, 2], [3, 4]]`, parsed with nom;
//! - LaTeX environments `\begin{pmatrix} 1 & 2 \\ 3 & 4 \end{pmatrix}`
//!   (`matrix`, `pmatrix`, `bmatrix`, `Bmatrix`, `vmatrix`, `Vmatrix`).
//!
//! Entries stay as text; the backend interprets them.

use std::fmt;
use std::sync::LazyLock;

use nom::{
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    multi::separated_list1,
    sequence::{delimited, preceded, terminated},
    IResult,
};
use regex::Regex;

use crate::error::ParseError;
use crate::groups::matching_close;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixLiteral {
    pub rows: Vec<Vec<String>>,
}

impl MatrixLiteral {
    /// Build from rows, rejecting ragged input.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Result<Self, ParseError> {
        let expected = rows.first().map_or(0, Vec::len);
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
            return Err(ParseError::RaggedMatrix {
                row,
                expected,
                found: r.len(),
            });
        }
        Ok(Self { rows })
    }

    /// `(rows, columns)`
    pub fn dims(&self) -> (usize, usize) {
        (self.rows.len(), self.rows.first().map_or(0, Vec::len))
    }

    pub fn is_square(&self) -> bool {
        let (r, c) = self.dims();
        r == c && r > 0
    }
}

impl fmt::Display for MatrixLiteral {
    /// Bracket form: `[[1, 2], [3, 4]]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "[{}]", row.join(", "))?;
        }
        f.write_str("]")
    }
}

// ============================================================================
// Bracket literals (nom)
// ============================================================================

fn entry(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c != ',' && c != '[' && c != ']')(input)
}

fn row(input: &str) -> IResult<&str, Vec<&str>> {
    delimited(
        preceded(multispace0, char('[')),
        separated_list1(char(','), entry),
        terminated(char(']'), multispace0),
    )(input)
}

fn bracket_matrix(input: &str) -> IResult<&str, Vec<Vec<&str>>> {
    delimited(
        preceded(multispace0, char('[')),
        separated_list1(char(','), row),
        preceded(multispace0, char(']')),
    )(input)
}

/// Parse a single `[[..], [..]]` literal. The whole input must be consumed.
pub fn parse_matrix(text: &str) -> Result<MatrixLiteral, ParseError> {
    let (rest, rows) =
        bracket_matrix(text).map_err(|e| ParseError::MatrixSyntax(e.to_string()))?;
    if !rest.trim().is_empty() {
        return Err(ParseError::UnconsumedInput(rest.to_string()));
    }

    let rows = rows
        .into_iter()
        .map(|r| r.into_iter().map(|e| e.trim().to_string()).collect())
        .collect();
    MatrixLiteral::from_rows(rows)
}

// ============================================================================
// LaTeX environments
// ============================================================================

static RE_MATRIX_ENV: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\\begin\{([pbvBV]?matrix)\}(.*?)\\end\{[pbvBV]?matrix\}")
        .expect("valid regex literal")
});

fn parse_environment_body(body: &str) -> Result<MatrixLiteral, ParseError> {
    let rows: Vec<Vec<String>> = body
        .split("\\\\")
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(|r| r.split('&').map(|cell| cell.trim().to_string()).collect())
        .collect();

    if rows.is_empty() || rows.iter().flatten().any(String::is_empty) {
        return Err(ParseError::MatrixSyntax(format!(
            "empty cell in matrix environment: {}",
            body.trim()
        )));
    }
    MatrixLiteral::from_rows(rows)
}

/// Find every matrix in `text`, in order of appearance.
///
/// Each candidate yields its own result, so a ragged matrix is reported
/// instead of silently skipped.
pub fn find_matrices(text: &str) -> Vec<Result<MatrixLiteral, ParseError>> {
    let mut found: Vec<(usize, Result<MatrixLiteral, ParseError>)> = Vec::new();

    let mut search = 0;
    while let Some(offset) = text[search..].find("[[") {
        let start = search + offset;
        match matching_close(text, start) {
            Some(close) => {
                found.push((start, parse_matrix(&text[start..=close])));
                search = close + 1;
            }
            None => {
                found.push((
                    start,
                    Err(ParseError::MatrixSyntax("unterminated matrix literal".to_string())),
                ));
                break;
            }
        }
    }

    for caps in RE_MATRIX_ENV.captures_iter(text) {
        let start = caps.get(0).map_or(0, |m| m.start());
        let body = caps.get(2).map_or("", |m| m.as_str());
        found.push((start, parse_environment_body(body)));
    }

    found.sort_by_key(|(pos, _)| *pos);
    found.into_iter().map(|(_, m)| m).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bracket_literal() {
        let m = parse_matrix("[[1, 2], [3, 4]]").unwrap();
        assert_eq!(m.dims(), (2, 2));
        assert_eq!(m.rows[1], vec!["3", "4"]);
        assert!(m.is_square());
        assert_eq!(m.to_string(), "[[1, 2], [3, 4]]");
    }

    #[test]
    fn test_symbolic_entries() {
        let m = parse_matrix("[[a, x+1],[0, -b]]").unwrap();
        assert_eq!(m.rows[0], vec!["a", "x+1"]);
        assert_eq!(m.rows[1], vec!["0", "-b"]);
    }

    #[test]
    fn test_ragged_rejected() {
        let err = parse_matrix("[[1, 2], [3]]").unwrap_err();
        assert_eq!(
            err,
            ParseError::RaggedMatrix {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_trailing_garbage_rejected() {
        assert!(matches!(
            parse_matrix("[[1]] extra"),
            Err(ParseError::UnconsumedInput(_))
        ));
    }

    #[test]
    fn test_environment() {
        let found = find_matrices("\\det \\begin{pmatrix} 1 & 2 \\\\ 3 & 4 \\end{pmatrix}");
        assert_eq!(found.len(), 1);
        let m = found[0].as_ref().unwrap();
        assert_eq!(m.rows, vec![vec!["1", "2"], vec!["3", "4"]]);
    }

    #[test]
    fn test_find_in_sentence_keeps_order() {
        let found = find_matrices("multiply [[1,0],[0,1]] by [[2],[3]]");
        let dims: Vec<_> = found.iter().map(|m| m.as_ref().unwrap().dims()).collect();
        assert_eq!(dims, vec![(2, 2), (2, 1)]);
    }

    #[test]
    fn test_find_reports_ragged() {
        let found = find_matrices("det [[1,2],[3]]");
        assert_eq!(found.len(), 1);
        assert!(found[0].is_err());
    }
}
