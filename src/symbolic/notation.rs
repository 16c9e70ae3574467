//! # Notation normalizer
//!
//! Rewrites math the way students type it (`2x^2+3x-5`, `x(x+1)`, `(x+1)(x-1)`) into the
//! canonical expression string the parser accepts (`2*x**2+3*x-5`). Operators are only ever
//! inserted: no token is removed or reordered, so unambiguous input keeps its meaning.
//!
//! Rules, applied in this order:
//! 1. strip all whitespace
//! 2. `^N` -> `**N` for a run of digits N
//! 3. digit followed by letter: `2x` -> `2*x`
//! 4. letter followed by digit: `x2` -> `x*2` (always a product, never a subscript)
//! 5. letter followed by `(`: `x(` -> `x*(`, unless the letters end in a known function name
//! 6. `)(` -> `)*(`
//! 7. adjacent letters: `xy` -> `x*y`; letter runs are split greedily into known function names,
//!    `pi` and single letters, so `xsin(x)` becomes `x*sin(x)` (can be switched off)
//!
//! Normalization never fails; whatever it cannot make sense of is left for the parser to report.
//! Applying it twice gives the same string as applying it once.
use log::debug;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// identifiers that are never split into single-letter products
pub const KNOWN_FUNCTIONS: [&str; 18] = [
    "arcsin", "arccos", "arctan", "arctg", "asin", "acos", "atan", "sqrt", "sin", "cos", "tan",
    "tg", "cot", "ctg", "exp", "log", "ln", "abs",
];
pub const KNOWN_CONSTANTS: [&str; 1] = ["pi"];

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static CARET_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\^(\d+)").unwrap());
static DIGIT_LETTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d)([A-Za-z])").unwrap());
static LETTER_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([A-Za-z])(\d)").unwrap());
static LETTERS_PAREN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([A-Za-z]+)\(").unwrap());
static CLOSE_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\)\(").unwrap());
static LETTER_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z]+").unwrap());

pub fn is_known_function(name: &str) -> bool {
    KNOWN_FUNCTIONS.contains(&name)
}

fn is_whitelisted(name: &str) -> bool {
    is_known_function(name) || KNOWN_CONSTANTS.contains(&name)
}

/// Greedy left-to-right split of a letter run: the longest whitelisted identifier starting at
/// the current position, otherwise one letter.
pub fn split_letter_run(run: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < run.len() {
        let rest = &run[i..];
        let len = KNOWN_FUNCTIONS
            .iter()
            .chain(KNOWN_CONSTANTS.iter())
            .filter(|name| rest.starts_with(*name))
            .map(|name| name.len())
            .max()
            .unwrap_or(1);
        tokens.push(&run[i..i + len]);
        i += len;
    }
    tokens
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizerOptions {
    /// rule 7: split adjacent letters into products
    pub split_letters: bool,
}

impl Default for NormalizerOptions {
    fn default() -> Self {
        NormalizerOptions {
            split_letters: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    pub options: NormalizerOptions,
}

impl Normalizer {
    pub fn new() -> Self {
        Normalizer::default()
    }

    pub fn with_options(options: NormalizerOptions) -> Self {
        Normalizer { options }
    }

    /// the identifier directly in front of `(` is a function call and needs no operator
    fn letters_call_a_function(&self, run: &str) -> bool {
        if self.options.split_letters {
            split_letter_run(run)
                .last()
                .is_some_and(|last| is_known_function(last))
        } else {
            is_known_function(run)
        }
    }

    pub fn normalize(&self, input: &str) -> String {
        let s = WHITESPACE.replace_all(input, "");
        let s = CARET_DIGITS.replace_all(&s, "**${1}");
        let s = DIGIT_LETTER.replace_all(&s, "${1}*${2}");
        let s = LETTER_DIGIT.replace_all(&s, "${1}*${2}");
        let s = LETTERS_PAREN.replace_all(&s, |caps: &Captures| {
            let run = &caps[1];
            if self.letters_call_a_function(run) {
                format!("{}(", run)
            } else {
                format!("{}*(", run)
            }
        });
        let s = CLOSE_OPEN.replace_all(&s, ")*(");
        let s = if self.options.split_letters {
            LETTER_RUN.replace_all(&s, |caps: &Captures| {
                let run = &caps[0];
                if is_whitelisted(run) {
                    run.to_string()
                } else {
                    split_letter_run(run).join("*")
                }
            })
        } else {
            s
        };
        let normalized = s.into_owned();
        debug!("normalized '{}' -> '{}'", input, normalized);
        normalized
    }
}

/// Normalizes with the default options (letter splitting on).
///
/// ```
/// use RustedMathForm::symbolic::notation::normalize;
/// assert_eq!(normalize("2x^2 + 3x - 5"), "2*x**2+3*x-5");
/// assert_eq!(normalize("xsin(x)"), "x*sin(x)");
/// ```
pub fn normalize(input: &str) -> String {
    Normalizer::new().normalize(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_is_stripped() {
        assert_eq!(normalize(" 2 * x +\t5 = 15 "), "2*x+5=15");
    }

    #[test]
    fn test_caret_digits_become_power() {
        assert_eq!(normalize("x^2"), "x**2");
        assert_eq!(normalize("x^12+1"), "x**12+1");
        // only digit runs are rewritten
        assert_eq!(normalize("x^(n+1)"), "x^(n+1)");
    }

    #[test]
    fn test_digit_letter() {
        assert_eq!(normalize("2x"), "2*x");
        assert_eq!(normalize("2x^2+3x-5"), "2*x**2+3*x-5");
        assert_eq!(normalize("2.5x"), "2.5*x");
    }

    #[test]
    fn test_letter_digit_is_a_product() {
        assert_eq!(normalize("x2"), "x*2");
        assert_eq!(normalize("x2y"), "x*2*y");
    }

    #[test]
    fn test_letter_paren() {
        assert_eq!(normalize("x(x+1)"), "x*(x+1)");
        assert_eq!(normalize("sin(x)"), "sin(x)");
        assert_eq!(normalize("sqrt(x)+exp(x)"), "sqrt(x)+exp(x)");
        assert_eq!(normalize("pi(x)"), "pi*(x)");
    }

    #[test]
    fn test_close_open() {
        assert_eq!(normalize("(x+1)(x-1)"), "(x+1)*(x-1)");
        assert_eq!(normalize("(x)(y)(z)"), "(x)*(y)*(z)");
    }

    #[test]
    fn test_letter_runs_split_but_functions_survive() {
        assert_eq!(normalize("xy"), "x*y");
        assert_eq!(normalize("xsin(x)"), "x*sin(x)");
        assert_eq!(normalize("2xcos(x)"), "2*x*cos(x)");
        assert_eq!(normalize("arcsin(x)+asin(x)"), "arcsin(x)+asin(x)");
        assert_eq!(normalize("2pix"), "2*pi*x");
    }

    #[test]
    fn test_letter_split_can_be_disabled() {
        let normalizer = Normalizer::with_options(NormalizerOptions {
            split_letters: false,
        });
        assert_eq!(normalizer.normalize("xy+2x"), "xy+2*x");
        assert_eq!(normalizer.normalize("xy(x)"), "xy*(x)");
        assert_eq!(normalizer.normalize("cos(x)"), "cos(x)");
    }

    #[test]
    fn test_equation_sides_are_kept() {
        assert_eq!(normalize("x^2 - 4x + 3 = 0"), "x**2-4*x+3=0");
    }

    #[test]
    fn test_idempotent() {
        for input in [
            "2x^2+3x-5",
            "x(x+1)(x-1)",
            "xsin(x)y",
            "2 pi x ^ 3",
            "sqrt(x2)",
            "x^(2)",
            "a1b2c3",
            "((x))((y))",
            "log(2x)=1",
            "",
        ] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "normalize is not idempotent on {}", input);
        }
    }

    #[test]
    fn test_only_inserts_operators() {
        for input in ["2x^2+3x-5", "x(x+1)", "xsin(x)", "(a)(b)"] {
            let normalized = normalize(input);
            let stripped: String = normalized.replace('*', "");
            let expected: String = input
                .replace('^', "")
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            assert_eq!(stripped, expected);
        }
    }
}
