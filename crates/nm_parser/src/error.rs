use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Matrix syntax error: {0}")]
    MatrixSyntax(String),
    #[error("Ragged matrix: row {row} has {found} entries, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Unconsumed input: {0}")]
    UnconsumedInput(String),
}
