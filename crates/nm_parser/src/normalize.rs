//! Symbol Normalizer
//!
//! Rewrites handwritten-derived math text into canonical algebraic syntax:
//! explicit `**` powers, explicit `*` products, ASCII names for Greek letters
//! and Unicode operators, `Abs(...)` for absolute-value bars.
//!
//! The rewrite runs a fixed sequence of steps and repeats the sequence until
//! the text stops changing, so `normalize(normalize(s)) == normalize(s)`.
//!
//! # Example
//! ```
//! use nm_parser::normalize;
//!
//! assert_eq!(normalize("x^{2} + 3x").as_str(), "x**2 + 3*x");
//! assert_eq!(normalize("\\frac{\\sin(x)}{x}").as_str(), "sin(x)/x");
//! ```

use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::groups::{is_atomic, matching_close, strip_outer_parens, take_brace_group};
use crate::symbols::{greek_name, to_latex, ARROW};

/// Upper bound on rewrite passes. Typical inputs converge in two or three.
const MAX_PASSES: usize = 16;

// ============================================================================
// NormalizedExpression
// ============================================================================

/// Text in canonical syntax. Only [`normalize`] constructs it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedExpression(String);

impl NormalizedExpression {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NormalizedExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedExpression {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Entry Points
// ============================================================================

/// Normalize a full input string. Never fails: unrecognized tokens pass
/// through unchanged and are left for the validator to report.
pub fn normalize(text: &str) -> NormalizedExpression {
    let mut current = text.to_string();
    let mut passes = 0;

    while passes < MAX_PASSES {
        passes += 1;
        let next = normalize_pass(&current);
        if next == current {
            break;
        }
        current = next;
    }

    tracing::trace!(target: "normalize", passes, output = %current, "normalized");
    NormalizedExpression(current)
}

/// Normalize a captured sub-expression (integrand, limit body, bound) and
/// drop redundant outer parentheses: `(x^3)` → `x**3`.
pub fn normalize_fragment(text: &str) -> String {
    let normalized = normalize(text.trim());
    strip_outer_parens(normalized.as_str()).to_string()
}

fn normalize_pass(text: &str) -> String {
    let s = substitute_symbols(text);
    let s = strip_sizing(&s);
    let s = convert_abs_bars(&s);
    let s = collapse_subscripts(&s);
    let s = collapse_exponents(&s);
    let s = expand_macros(&s);
    let s = rewrite_trig_powers(&s);
    let s = rename_reserved_words(&s);
    let s = insert_implicit_multiplication(&s);
    collapse_whitespace(&s)
}

/// Whether the text written so far ends in something a following factor
/// would multiply.
fn ends_with_operand(out: &str) -> bool {
    out.chars()
        .next_back()
        .is_some_and(|c| c.is_ascii_alphanumeric() || c == ')')
}

// ============================================================================
// Step 1: Unicode -> canonical
// ============================================================================

fn substitute_symbols(text: &str) -> String {
    let latex = to_latex(text);
    let mut out = String::with_capacity(latex.len() + 8);
    let mut chars = latex.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(name) = greek_name(c) {
            if ends_with_operand(&out) {
                out.push('*');
            }
            out.push_str(name);
            if chars.peek().is_some_and(|n| n.is_ascii_alphanumeric()) {
                out.push('*');
            }
        } else if c == ARROW {
            out.push_str("->");
        } else {
            out.push(c);
        }
    }

    out
}

/// `\left(` → `(`, `\lvert x \rvert` → `|x|`. Sizing hints carry no meaning
/// and would otherwise glue onto the delimiter that follows them.
fn strip_sizing(s: &str) -> String {
    static RE_SIZING: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"\\(?:left|right|big|Big|bigg|Bigg)([^a-zA-Z]|$)").expect("valid regex literal")
    });
    static RE_VERT: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\\[lr]vert").expect("valid regex literal"));

    let s = RE_VERT.replace_all(s, "|");
    RE_SIZING.replace_all(&s, "$1").into_owned()
}

// ============================================================================
// Step 2: |E| -> Abs(E)
// ============================================================================

fn convert_abs_bars(s: &str) -> String {
    static RE_ABS: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\|([^|]+)\|").expect("valid regex literal"));

    // Innermost pairs first; every round removes at least two bars, so this
    // ends at any nesting depth.
    let mut current = s.to_string();
    loop {
        let next = RE_ABS
            .replace_all(&current, |caps: &Captures| {
                let whole = caps.get(0).map_or(0..0, |m| m.range());
                let glue = if ends_with_operand(&current[..whole.start]) { "*" } else { "" };
                format!("{glue}Abs({})", caps[1].trim())
            })
            .into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}

// ============================================================================
// Step 3: x_{1} -> x_1
// ============================================================================

fn collapse_subscripts(s: &str) -> String {
    static RE_SUBSCRIPT: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"([A-Za-z]+)_\{([A-Za-z0-9]+)\}").expect("valid regex literal")
    });
    RE_SUBSCRIPT.replace_all(s, "${1}_${2}").into_owned()
}

// ============================================================================
// Step 4: x^{E} -> x**E / x**(E)
// ============================================================================

fn collapse_exponents(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    let mut i = 0;

    while let Some(c) = s[i..].chars().next() {
        if c == '^' {
            if let Some((inner, end)) = take_brace_group(s, i + 1) {
                let exponent = collapse_exponents(inner.trim());
                out.push_str("**");
                if is_atomic(&exponent) {
                    out.push_str(&exponent);
                } else {
                    out.push('(');
                    out.push_str(&exponent);
                    out.push(')');
                }
                i = end;
                continue;
            }
            out.push_str("**");
        } else {
            out.push(c);
        }
        i += c.len_utf8();
    }

    out
}

// ============================================================================
// Step 5: LaTeX macros
// ============================================================================

enum Macro {
    /// Expands to an operator or separator.
    Operator(&'static str),
    /// Expands to an identifier or function name.
    Identifier(&'static str),
    /// `\frac{a}{b}` and its display variants.
    Fraction,
    /// `\sqrt{x}` / `\sqrt[n]{x}`.
    Root,
    /// `\text{...}`: keep the braced content as plain words.
    Text,
}

fn lookup_macro(name: &str) -> Option<Macro> {
    use Macro::*;

    let m = match name {
        "frac" | "dfrac" | "tfrac" => Fraction,
        "sqrt" => Root,
        "text" | "textbf" | "textrm" | "mathrm" | "mathit" | "operatorname" => Text,

        "cdot" | "times" | "ast" => Operator("*"),
        "div" => Operator("/"),
        "pm" => Operator("+-"),
        "mp" => Operator("-+"),
        "leq" | "le" => Operator("<="),
        "geq" | "ge" => Operator(">="),
        "neq" | "ne" => Operator("!="),
        "approx" => Operator("="),
        "to" | "rightarrow" | "Rightarrow" => Operator("->"),
        "quad" | "qquad" => Operator(" "),
        "displaystyle" | "limits" => Operator(""),

        "infty" => Identifier("oo"),
        "ln" | "log" => Identifier("log"),
        "exp" => Identifier("exp"),
        "sin" => Identifier("sin"),
        "cos" => Identifier("cos"),
        "tan" => Identifier("tan"),
        "sec" => Identifier("sec"),
        "csc" => Identifier("csc"),
        "cot" => Identifier("cot"),
        "arcsin" => Identifier("arcsin"),
        "arccos" => Identifier("arccos"),
        "arctan" => Identifier("arctan"),
        "sinh" => Identifier("sinh"),
        "cosh" => Identifier("cosh"),
        "tanh" => Identifier("tanh"),

        "alpha" => Identifier("alpha"),
        "beta" => Identifier("beta"),
        "gamma" => Identifier("gamma"),
        "delta" => Identifier("delta"),
        "epsilon" | "varepsilon" => Identifier("epsilon"),
        "zeta" => Identifier("zeta"),
        "eta" => Identifier("eta"),
        "theta" | "vartheta" => Identifier("theta"),
        "iota" => Identifier("iota"),
        "kappa" => Identifier("kappa"),
        "lambda" => Identifier("lambda_var"),
        "mu" => Identifier("mu_var"),
        "nu" => Identifier("nu"),
        "xi" => Identifier("xi"),
        "pi" => Identifier("pi"),
        "rho" => Identifier("rho"),
        "sigma" => Identifier("sigma"),
        "tau" => Identifier("tau"),
        "upsilon" => Identifier("upsilon"),
        "phi" | "varphi" => Identifier("phi"),
        "chi" => Identifier("chi"),
        "psi" => Identifier("psi"),
        "omega" => Identifier("omega"),
        "Gamma" => Identifier("Gamma"),
        "Delta" => Identifier("Delta"),
        "Theta" => Identifier("Theta"),
        "Lambda" => Identifier("Lambda"),
        "Xi" => Identifier("Xi"),
        "Pi" => Identifier("Pi"),
        "Sigma" => Identifier("Sigma"),
        "Upsilon" => Identifier("Upsilon"),
        "Phi" => Identifier("Phi"),
        "Psi" => Identifier("Psi"),
        "Omega" => Identifier("Omega"),
        _ => return None,
    };
    Some(m)
}

/// Expansion state: the output buffer plus where the last passed-through
/// macro ended, so `\int\sin` does not become `\int*sin`.
struct MacroWriter {
    out: String,
    passthrough_end: Option<usize>,
}

impl MacroWriter {
    fn new(capacity: usize) -> Self {
        Self {
            out: String::with_capacity(capacity),
            passthrough_end: None,
        }
    }

    fn after_operand(&self) -> bool {
        self.passthrough_end != Some(self.out.len()) && ends_with_operand(&self.out)
    }

    /// Push an operand, inserting `*` when it directly follows another one
    /// and a space when it would otherwise extend a kept macro name.
    fn push_operand(&mut self, text: &str) {
        if self.passthrough_end == Some(self.out.len()) {
            self.out.push(' ');
        } else if self.after_operand() {
            self.out.push('*');
        }
        self.out.push_str(text);
    }

    fn push_passthrough(&mut self, name: &str) {
        self.out.push('\\');
        self.out.push_str(name);
        self.passthrough_end = Some(self.out.len());
    }
}

fn expand_macros(s: &str) -> String {
    let mut w = MacroWriter::new(s.len());
    let mut i = 0;

    while let Some(c) = s[i..].chars().next() {
        if c != '\\' {
            w.out.push(c);
            i += c.len_utf8();
            continue;
        }

        let after = &s[i + 1..];
        let name_len = after.bytes().take_while(|b| b.is_ascii_alphabetic()).count();

        if name_len == 0 {
            // Control symbols: spacing is dropped, everything else kept.
            match after.chars().next() {
                Some(sp @ (',' | ';' | ':' | ' ' | '!')) => {
                    if sp != '!' {
                        w.out.push(' ');
                    }
                    i += 2;
                }
                Some(other) => {
                    w.out.push('\\');
                    w.out.push(other);
                    i += 1 + other.len_utf8();
                }
                None => {
                    w.out.push('\\');
                    i += 1;
                }
            }
            continue;
        }

        let name = &after[..name_len];
        let next = i + 1 + name_len;

        i = match lookup_macro(name) {
            Some(Macro::Operator(text)) => {
                w.out.push_str(text);
                next
            }
            Some(Macro::Identifier(ident)) => {
                w.push_operand(ident);
                next
            }
            Some(Macro::Fraction) => match expand_fraction(s, next, &mut w) {
                Some(end) => end,
                None => {
                    w.push_passthrough(name);
                    next
                }
            },
            Some(Macro::Root) => match expand_root(s, next, &mut w) {
                Some(end) => end,
                None => {
                    w.push_passthrough(name);
                    next
                }
            },
            Some(Macro::Text) => match take_brace_group(s, next) {
                Some((inner, end)) => {
                    w.out.push(' ');
                    w.out.push_str(inner.trim());
                    w.out.push(' ');
                    end
                }
                None => next,
            },
            None => {
                w.push_passthrough(name);
                next
            }
        };
    }

    w.out
}

/// Normalize the inside of a brace group and parenthesize it unless it is
/// already a single operand.
fn fraction_operand(inner: &str) -> String {
    let expanded = expand_macros(inner);
    let trimmed = collapse_whitespace(strip_outer_parens(&expanded));
    if is_atomic(&trimmed) {
        trimmed
    } else {
        format!("({trimmed})")
    }
}

fn expand_fraction(s: &str, start: usize, w: &mut MacroWriter) -> Option<usize> {
    let (num, after_num) = take_brace_group(s, start)?;
    let (den, end) = take_brace_group(s, after_num)?;

    let fraction = format!("{}/{}", fraction_operand(num), fraction_operand(den));
    let rest = s[end..].trim_start();
    let binds_left = w.out.ends_with("**") || w.out.ends_with('/');
    let binds_right = rest.starts_with('^') || rest.starts_with("**");

    if binds_left || binds_right {
        w.push_operand(&format!("({fraction})"));
    } else {
        w.push_operand(&fraction);
    }

    if s[end..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '(')
    {
        w.out.push('*');
    }
    Some(end)
}

fn expand_root(s: &str, start: usize, w: &mut MacroWriter) -> Option<usize> {
    let mut pos = start + (s[start..].len() - s[start..].trim_start().len());

    let index = if s[pos..].starts_with('[') {
        let close = matching_close(s, pos)?;
        let idx = collapse_whitespace(&expand_macros(&s[pos + 1..close]));
        pos = close + 1;
        pos += s[pos..].len() - s[pos..].trim_start().len();
        Some(idx)
    } else {
        None
    };

    let (radicand, end) = match s[pos..].chars().next()? {
        '{' => {
            let (inner, end) = take_brace_group(s, pos)?;
            (inner, end)
        }
        '(' => {
            let close = matching_close(s, pos)?;
            (&s[pos + 1..close], close + 1)
        }
        c if c.is_ascii_alphanumeric() => {
            let len = s[pos..]
                .bytes()
                .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_' || *b == b'.')
                .count();
            (&s[pos..pos + len], pos + len)
        }
        _ => return None,
    };

    let radicand = collapse_whitespace(strip_outer_parens(&expand_macros(radicand)));
    let call = match index {
        Some(n) => format!("root({radicand}, {n})"),
        None => format!("sqrt({radicand})"),
    };
    w.push_operand(&call);
    Some(end)
}

/// `sin**2(x)` → `sin(x)**2`.
fn rewrite_trig_powers(s: &str) -> String {
    static RE_TRIG_POWER: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"\b(sin|cos|tan|sec|csc|cot)\*\*(\d+)\(([^()]*)\)").expect("valid regex literal")
    });
    RE_TRIG_POWER.replace_all(s, "$1($3)**$2").into_owned()
}

/// Bare `lambda` / `mu` words collide with backend names, same as the glyphs.
fn rename_reserved_words(s: &str) -> String {
    static RE_LAMBDA: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\blambda\b").expect("valid regex literal"));
    static RE_MU: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\bmu\b").expect("valid regex literal"));

    let s = RE_LAMBDA.replace_all(s, "lambda_var");
    RE_MU.replace_all(&s, "mu_var").into_owned()
}

// ============================================================================
// Step 6: implicit multiplication
// ============================================================================

fn insert_implicit_multiplication(s: &str) -> String {
    static RE_DIGIT_LETTER: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(\d)([A-Za-z])").expect("valid regex literal"));
    static RE_ADJACENT_GROUPS: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\)\s*\(").expect("valid regex literal"));

    let s = RE_DIGIT_LETTER.replace_all(s, "$1*$2");
    RE_ADJACENT_GROUPS.replace_all(&s, ")*(").into_owned()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(s: &str) -> String {
        normalize(s).into_string()
    }

    #[test]
    fn test_exponent_braces() {
        assert_eq!(n("x^{2}"), "x**2");
        assert_eq!(n("x^{-1}"), "x**(-1)");
        assert_eq!(n("e^{2x}"), "e**(2*x)");
        assert_eq!(n("x^3"), "x**3");
    }

    #[test]
    fn test_nested_exponent_fraction() {
        assert_eq!(n("x^{\\frac{1}{2}}"), "x**(1/2)");
    }

    #[test]
    fn test_subscripts() {
        assert_eq!(n("x_{1} + x_{2}"), "x_1 + x_2");
    }

    #[test]
    fn test_fraction_unwrapping() {
        assert_eq!(n("\\frac{\\sin(x)}{x}"), "sin(x)/x");
        assert_eq!(n("\\frac{x+1}{2x}"), "(x+1)/(2*x)");
        assert_eq!(n("2\\frac{1}{x}"), "2*1/x");
        assert_eq!(n("\\frac{a}{b}^{2}"), "(a/b)**2");
    }

    #[test]
    fn test_roots() {
        assert_eq!(n("\\sqrt{x+1}"), "sqrt(x+1)");
        assert_eq!(n("\\sqrt[3]{x}"), "root(x, 3)");
        assert_eq!(n("√x"), "sqrt(x)");
    }

    #[test]
    fn test_abs_bars() {
        assert_eq!(n("|x - 2| = 3"), "Abs(x - 2) = 3");
        assert_eq!(n("\\left|x\\right|"), "Abs(x)");
        assert_eq!(n("||x|-1|"), "Abs(Abs(x)-1)");
    }

    #[test]
    fn test_deeply_nested_bars_in_one_call() {
        let depth = 40;
        let input = format!("{}x{}", "|".repeat(depth), "|".repeat(depth));
        let once = n(&input);
        assert!(!once.contains('|'));
        assert_eq!(once.matches("Abs(").count(), depth);
        assert_eq!(n(&once), once);
    }

    #[test]
    fn test_greek_and_reserved_names() {
        assert_eq!(n("2π r"), "2*pi r");
        assert_eq!(n("λ = h/p"), "lambda_var = h/p");
        assert_eq!(n("\\mu + mu"), "mu_var + mu_var");
        assert_eq!(n("\\theta_{1}"), "theta_1");
    }

    #[test]
    fn test_macro_adjacent_to_operand() {
        assert_eq!(n("x\\cos(x)"), "x*cos(x)");
        assert_eq!(n("\\int\\sin(x)dx"), "\\int sin(x)dx");
    }

    #[test]
    fn test_trig_power() {
        assert_eq!(n("\\sin^{2}(x) + \\cos^2(x)"), "sin(x)**2 + cos(x)**2");
    }

    #[test]
    fn test_operators_and_infinity() {
        assert_eq!(n("x \\leq 3"), "x <= 3");
        assert_eq!(n("a \\cdot b"), "a * b");
        assert_eq!(n("\\infty"), "oo");
        assert_eq!(n("∞"), "oo");
    }

    #[test]
    fn test_implicit_multiplication() {
        assert_eq!(n("3x + 2y"), "3*x + 2*y");
        assert_eq!(n("(x+1)(x-1)"), "(x+1)*(x-1)");
    }

    #[test]
    fn test_unknown_macro_passes_through() {
        assert_eq!(n("\\foo{x}"), "\\foo{x}");
    }

    #[test]
    fn test_fragment_strips_outer_parens() {
        assert_eq!(normalize_fragment("(x^3)"), "x**3");
        assert_eq!(normalize_fragment("  x^{2} "), "x**2");
    }

    #[test]
    fn test_idempotent_on_samples() {
        let samples = [
            "\\int_{0}^{2} x^{2} dx",
            "\\lim_{x\\to 0} \\frac{\\sin(x)}{x}",
            "|x|+|y|",
            "\\mathrm{x}_{1}",
            "2π|x|λ",
            "\\frac{\\frac{1}{2}}{x}y",
            "x^{y^{2}}",
        ];
        for s in samples {
            let once = n(s);
            assert_eq!(n(&once), once, "not idempotent for {s:?}");
        }
    }
}
