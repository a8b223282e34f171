//! Unicode Math Symbol Tables
//!
//! Handwriting recognizers emit a mix of LaTeX and Unicode glyphs. This module
//! owns the glyph tables and the first normalization stage, [`to_latex`], which
//! rewrites glyphs into their LaTeX spelling while leaving everything else
//! untouched. Structural matching (integral bounds, limit clauses) happens on
//! that view, before canonicalization flattens it.

// ============================================================================
// Glyph Tables
// ============================================================================

/// Convert a superscript character to the ASCII text it stands for.
/// Returns None if the character is not a superscript glyph.
fn superscript_to_ascii(c: char) -> Option<char> {
    match c {
        '⁰' => Some('0'),
        '¹' => Some('1'),
        '²' => Some('2'),
        '³' => Some('3'),
        '⁴' => Some('4'),
        '⁵' => Some('5'),
        '⁶' => Some('6'),
        '⁷' => Some('7'),
        '⁸' => Some('8'),
        '⁹' => Some('9'),
        'ⁿ' => Some('n'),
        '⁻' => Some('-'),
        '⁺' => Some('+'),
        _ => None,
    }
}

/// Convert a subscript character to the ASCII text it stands for.
fn subscript_to_ascii(c: char) -> Option<char> {
    match c {
        '₀' => Some('0'),
        '₁' => Some('1'),
        '₂' => Some('2'),
        '₃' => Some('3'),
        '₄' => Some('4'),
        '₅' => Some('5'),
        '₆' => Some('6'),
        '₇' => Some('7'),
        '₈' => Some('8'),
        '₉' => Some('9'),
        _ => None,
    }
}

/// Operator glyphs with a LaTeX macro spelling.
const GLYPH_MACROS: &[(char, &str)] = &[
    ('∫', "\\int"),
    ('∂', "\\partial"),
    ('∑', "\\sum"),
    ('∏', "\\prod"),
    ('√', "\\sqrt"),
    ('∞', "\\infty"),
];

/// Operator glyphs with a plain ASCII spelling.
const GLYPH_OPERATORS: &[(char, &str)] = &[
    ('≠', "!="),
    ('≤', "<="),
    ('≥', ">="),
    ('±', "+-"),
    ('×', "*"),
    ('·', "*"),
    ('÷', "/"),
    ('≈', "="),
    ('−', "-"),
];

/// Greek glyphs and the identifier each becomes in canonical syntax.
///
/// `λ` and `μ` get a suffix because `lambda` and `mu` collide with reserved
/// names in the algebra backend.
pub const GREEK_GLYPHS: &[(char, &str)] = &[
    ('α', "alpha"),
    ('β', "beta"),
    ('γ', "gamma"),
    ('δ', "delta"),
    ('ε', "epsilon"),
    ('ζ', "zeta"),
    ('η', "eta"),
    ('θ', "theta"),
    ('ι', "iota"),
    ('κ', "kappa"),
    ('λ', "lambda_var"),
    ('μ', "mu_var"),
    ('ν', "nu"),
    ('ξ', "xi"),
    ('ο', "omicron"),
    ('π', "pi"),
    ('ρ', "rho"),
    ('σ', "sigma"),
    ('τ', "tau"),
    ('υ', "upsilon"),
    ('φ', "phi"),
    ('χ', "chi"),
    ('ψ', "psi"),
    ('ω', "omega"),
    ('Γ', "Gamma"),
    ('Δ', "Delta"),
    ('Θ', "Theta"),
    ('Λ', "Lambda"),
    ('Ξ', "Xi"),
    ('Π', "Pi"),
    ('Σ', "Sigma"),
    ('Υ', "Upsilon"),
    ('Φ', "Phi"),
    ('Ψ', "Psi"),
    ('Ω', "Omega"),
];

/// Arrow glyph used by `lim x→0` notation. Kept verbatim by [`to_latex`].
pub const ARROW: char = '→';

/// Look up the canonical identifier for a Greek glyph.
pub fn greek_name(c: char) -> Option<&'static str> {
    GREEK_GLYPHS
        .iter()
        .find(|(glyph, _)| *glyph == c)
        .map(|(_, name)| *name)
}

/// Whether `c` is one of the Unicode math glyphs the normalizer understands.
///
/// The structural validator uses this as the non-ASCII half of its character
/// whitelist, so anything the normalizer can rewrite is never rejected.
pub fn is_math_glyph(c: char) -> bool {
    c == ARROW
        || superscript_to_ascii(c).is_some()
        || subscript_to_ascii(c).is_some()
        || GLYPH_MACROS.iter().any(|(g, _)| *g == c)
        || GLYPH_OPERATORS.iter().any(|(g, _)| *g == c)
        || greek_name(c).is_some()
}

// ============================================================================
// Stage 1: Unicode -> LaTeX
// ============================================================================

/// Rewrite Unicode math glyphs into LaTeX spelling.
///
/// - `∫ ∂ ∑ ∏ √ ∞` become the matching macro; a space is inserted when the
///   glyph is directly followed by a letter so `∫x` does not read as `\intx`.
/// - runs of superscripts collapse into one group: `x²³` → `x^{23}`.
/// - runs of subscripts likewise: `∫₀²` → `\int_{0}^{2}`.
/// - comparison and arithmetic glyphs become ASCII operators.
///
/// Greek letters and `→` are left alone. The function is idempotent.
pub fn to_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(first) = superscript_to_ascii(c) {
            out.push_str("^{");
            out.push(first);
            while let Some(next) = chars.peek().copied().and_then(superscript_to_ascii) {
                out.push(next);
                chars.next();
            }
            out.push('}');
            continue;
        }

        if let Some(first) = subscript_to_ascii(c) {
            out.push_str("_{");
            out.push(first);
            while let Some(next) = chars.peek().copied().and_then(subscript_to_ascii) {
                out.push(next);
                chars.next();
            }
            out.push('}');
            continue;
        }

        if let Some((_, mac)) = GLYPH_MACROS.iter().find(|(g, _)| *g == c) {
            out.push_str(mac);
            if chars.peek().is_some_and(|n| n.is_ascii_alphabetic()) {
                out.push(' ');
            }
            continue;
        }

        if let Some((_, op)) = GLYPH_OPERATORS.iter().find(|(g, _)| *g == c) {
            out.push_str(op);
            continue;
        }

        out.push(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_glyph_with_superscript() {
        assert_eq!(to_latex("∫x²dx"), "\\int x^{2}dx");
    }

    #[test]
    fn test_superscript_run_collapses() {
        assert_eq!(to_latex("x²³"), "x^{23}");
        assert_eq!(to_latex("x⁻¹"), "x^{-1}");
    }

    #[test]
    fn test_definite_bounds_from_subscript_and_superscript() {
        assert_eq!(to_latex("∫₀²x dx"), "\\int_{0}^{2}x dx");
    }

    #[test]
    fn test_operators() {
        assert_eq!(to_latex("x ≤ 3"), "x <= 3");
        assert_eq!(to_latex("a ≠ b"), "a != b");
        assert_eq!(to_latex("6÷2×3"), "6/2*3");
    }

    #[test]
    fn test_greek_and_arrow_untouched() {
        assert_eq!(to_latex("lim x→0 θ"), "lim x→0 θ");
    }

    #[test]
    fn test_idempotent_on_samples() {
        for s in ["∫₀²x² dx", "√x + ∞", "x ≥ 2", "plain text"] {
            let once = to_latex(s);
            assert_eq!(to_latex(&once), once, "not idempotent for {s}");
        }
    }

    #[test]
    fn test_glyph_whitelist() {
        assert!(is_math_glyph('∫'));
        assert!(is_math_glyph('λ'));
        assert!(is_math_glyph('²'));
        assert!(is_math_glyph('→'));
        assert!(!is_math_glyph('€'));
        assert!(!is_math_glyph('a'));
    }
}
