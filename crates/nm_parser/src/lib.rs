pub mod error;
pub mod groups;
pub mod matrix;
pub mod normalize;
pub mod numbers;
pub mod symbols;

pub use error::ParseError;
pub use matrix::{find_matrices, parse_matrix, MatrixLiteral};
pub use normalize::{normalize, normalize_fragment, NormalizedExpression};
pub use numbers::extract_numbers;
pub use symbols::{is_math_glyph, to_latex};
