//! turns a canonical expression string into a symbolic expression
//!# Example
//! ```
//! use RustedMathForm::symbolic::symbolic_engine::Expr;
//! let parsed_expression = Expr::parse_expression("2*x**2 + 3*x - 5").unwrap();
//! assert_eq!(parsed_expression.to_string(), "2*x**2 + 3*x - 5");
//! ```
//                  precedence ladder
//                "2*x**2+3*x-5"
//                |  expr   := term (('+'|'-') term)*      |
//                |  term   := unary (('*'|'/') unary)*    |
//                |  unary  := ('-'|'+') unary | power     |
//                |  power  := atom (('**'|'^') unary)?    |
//                |  atom   := number | name '(' expr ')'  |
//                |          | name | '(' expr ')'         |
use crate::error::{FormatError, MathError};
use crate::symbolic::symbolic_engine::Expr;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, digit0, digit1, multispace0},
    combinator::{map_res, not, opt, recognize},
    error::{ErrorKind, FromExternalError, ParseError},
    multi::many0,
    sequence::{delimited, pair, preceded, terminated},
};
use std::f64::consts::{E, PI};

/// what went wrong, attached to the remaining input at the failure point
#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxErrorKind {
    Nom(ErrorKind),
    UnknownFunction(String),
    MissingArgument(String),
    UnclosedParenthesis,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError<'a> {
    pub input: &'a str,
    pub kind: SyntaxErrorKind,
}

impl<'a> ParseError<&'a str> for SyntaxError<'a> {
    fn from_error_kind(input: &'a str, kind: ErrorKind) -> Self {
        SyntaxError {
            input,
            kind: SyntaxErrorKind::Nom(kind),
        }
    }

    fn append(_: &'a str, _: ErrorKind, other: Self) -> Self {
        other
    }
}

impl<'a, E> FromExternalError<&'a str, E> for SyntaxError<'a> {
    fn from_external_error(input: &'a str, kind: ErrorKind, _e: E) -> Self {
        SyntaxError::from_error_kind(input, kind)
    }
}

type PResult<'a, O> = IResult<&'a str, O, SyntaxError<'a>>;

/// single character token with optional surrounding whitespace
fn sym<'a>(c: char) -> impl FnMut(&'a str) -> PResult<'a, char> {
    move |input: &'a str| delimited(multispace0, char(c), multispace0).parse(input)
}

fn pow_op(input: &str) -> PResult<'_, &str> {
    delimited(multispace0, alt((tag("**"), tag("^"))), multispace0).parse(input)
}

/// `*` but not the first half of `**`
fn mul_op(input: &str) -> PResult<'_, char> {
    alt((terminated(sym('*'), not(char('*'))), sym('/'))).parse(input)
}

fn number(input: &str) -> PResult<'_, Expr> {
    let literal = recognize(alt((
        recognize(pair(digit1, opt(pair(char('.'), digit0)))),
        recognize(pair(char('.'), digit1)),
    )));
    map_res(literal, |s: &str| s.parse::<f64>().map(Expr::Const)).parse(input)
}

fn identifier(input: &str) -> PResult<'_, &str> {
    recognize(pair(alpha1, many0(alt((alphanumeric1, tag("_")))))).parse(input)
}

/// maps a function name to its node constructor
fn function_node(name: &str) -> Option<fn(Box<Expr>) -> Expr> {
    let ctor: fn(Box<Expr>) -> Expr = match name {
        "exp" => Expr::Exp,
        "log" | "ln" => Expr::Ln,
        "sin" => Expr::sin,
        "cos" => Expr::cos,
        "tan" | "tg" => Expr::tg,
        "cot" | "ctg" => Expr::ctg,
        "asin" | "arcsin" => Expr::arcsin,
        "acos" | "arccos" => Expr::arccos,
        "atan" | "arctan" | "arctg" => Expr::arctg,
        "sqrt" => Expr::sqrt,
        "abs" => Expr::abs,
        _ => return None,
    };
    Some(ctor)
}

fn named_constant(name: &str) -> Option<f64> {
    match name {
        "pi" => Some(PI),
        "E" => Some(E),
        _ => None,
    }
}

/// closing parenthesis of a group that was already opened; a miss is fatal
fn closing<'a>(opened_at: &'a str) -> impl FnMut(&'a str) -> PResult<'a, char> {
    move |input: &'a str| match sym(')')(input) {
        Ok(done) => Ok(done),
        Err(nom::Err::Error(_)) => Err(nom::Err::Failure(SyntaxError {
            input: opened_at,
            kind: SyntaxErrorKind::UnclosedParenthesis,
        })),
        Err(e) => Err(e),
    }
}

fn call_or_name(input: &str) -> PResult<'_, Expr> {
    let (rest, name) = identifier(input)?;
    let (after_paren, paren) = opt(sym('(')).parse(rest)?;
    if paren.is_some() {
        let Some(ctor) = function_node(name) else {
            return Err(nom::Err::Failure(SyntaxError {
                input,
                kind: SyntaxErrorKind::UnknownFunction(name.to_string()),
            }));
        };
        let (rest, arg) = expr(after_paren)?;
        let (rest, _) = closing(input)(rest)?;
        return Ok((rest, ctor(Box::new(arg))));
    }
    if function_node(name).is_some() {
        return Err(nom::Err::Failure(SyntaxError {
            input,
            kind: SyntaxErrorKind::MissingArgument(name.to_string()),
        }));
    }
    match named_constant(name) {
        Some(value) => Ok((rest, Expr::Const(value))),
        None => Ok((rest, Expr::Var(name.to_string()))),
    }
}

fn group(input: &str) -> PResult<'_, Expr> {
    let (rest, _) = sym('(')(input)?;
    let (rest, inner) = expr(rest)?;
    let (rest, _) = closing(input)(rest)?;
    Ok((rest, inner))
}

fn atom(input: &str) -> PResult<'_, Expr> {
    delimited(multispace0, alt((number, call_or_name, group)), multispace0).parse(input)
}

fn power(input: &str) -> PResult<'_, Expr> {
    let (rest, base) = atom(input)?;
    let (rest, exponent) = opt(preceded(pow_op, unary)).parse(rest)?;
    match exponent {
        Some(exponent) => Ok((rest, base.pow(exponent))),
        None => Ok((rest, base)),
    }
}

fn unary(input: &str) -> PResult<'_, Expr> {
    match alt((sym('-'), sym('+'))).parse(input) {
        Ok((rest, sign)) => {
            let (rest, inner) = unary(rest)?;
            Ok((rest, if sign == '-' { -inner } else { inner }))
        }
        Err(nom::Err::Error(_)) => power(input),
        Err(e) => Err(e),
    }
}

fn term(input: &str) -> PResult<'_, Expr> {
    let (mut input, mut acc) = unary(input)?;
    loop {
        match mul_op(input) {
            Ok((rest, op)) => {
                let (rest, rhs) = unary(rest)?;
                acc = if op == '*' { acc * rhs } else { acc / rhs };
                input = rest;
            }
            Err(nom::Err::Error(_)) => return Ok((input, acc)),
            Err(e) => return Err(e),
        }
    }
}

fn expr(input: &str) -> PResult<'_, Expr> {
    let (mut input, mut acc) = term(input)?;
    loop {
        match alt((sym('+'), sym('-'))).parse(input) {
            Ok((rest, op)) => {
                let (rest, rhs) = term(rest)?;
                acc = if op == '+' { acc + rhs } else { acc - rhs };
                input = rest;
            }
            Err(nom::Err::Error(_)) => return Ok((input, acc)),
            Err(e) => return Err(e),
        }
    }
}

/// character position of `rest` inside `source`
fn position_of(source: &str, rest: &str) -> usize {
    let byte_offset = source.len().saturating_sub(rest.len());
    source[..byte_offset].chars().count()
}

fn unexpected(source: &str, rest: &str) -> FormatError {
    let found: String = rest.trim_start().chars().take(8).collect();
    let rest = rest.trim_start();
    FormatError::UnexpectedInput {
        position: position_of(source, rest),
        found: if found.is_empty() {
            "end of input".to_string()
        } else {
            found
        },
    }
}

/// Parses a canonical expression string. The whole input must be consumed.
pub fn parse_expression_func(input: &str) -> Result<Expr, MathError> {
    if input.trim().is_empty() {
        return Err(FormatError::EmptyInput.into());
    }
    match expr(input) {
        Ok((rest, parsed)) if rest.trim().is_empty() => Ok(parsed),
        Ok((rest, _)) if rest.trim_start().starts_with(')') => {
            Err(FormatError::UnbalancedParentheses {
                position: position_of(input, rest.trim_start()),
            }
            .into())
        }
        Ok((rest, _)) => Err(unexpected(input, rest).into()),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let err = match e.kind {
                SyntaxErrorKind::UnknownFunction(name) => FormatError::UnknownFunction { name },
                SyntaxErrorKind::MissingArgument(name) => FormatError::MissingArgument { name },
                SyntaxErrorKind::UnclosedParenthesis => FormatError::UnbalancedParentheses {
                    position: position_of(input, e.input.trim_start()),
                },
                SyntaxErrorKind::Nom(_) => unexpected(input, e.input),
            };
            Err(err.into())
        }
        Err(nom::Err::Incomplete(_)) => Err(unexpected(input, "").into()),
    }
}

impl Expr {
    /// String to symbolic expression.
    pub fn parse_expression(input: &str) -> Result<Expr, MathError> {
        parse_expression_func(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Box<Expr> {
        Box::new(Expr::Var("x".to_string()))
    }

    #[test]
    fn test_parse_constant() {
        let expr = parse_expression_func("42").unwrap();
        assert_eq!(expr, Expr::Const(42.0));
        assert_eq!(parse_expression_func("0.5").unwrap(), Expr::Const(0.5));
        assert_eq!(parse_expression_func(".5").unwrap(), Expr::Const(0.5));
    }

    #[test]
    fn test_parse_variable() {
        let expr = parse_expression_func("x").unwrap();
        assert_eq!(expr, Expr::Var("x".to_string()));
    }

    #[test]
    fn test_parse_addition_and_subtraction_are_left_associative() {
        let expr = parse_expression_func("x - 2 - 1").unwrap();
        assert_eq!(
            expr,
            Expr::Sub(
                Box::new(Expr::Sub(x(), Box::new(Expr::Const(2.0)))),
                Box::new(Expr::Const(1.0))
            )
        );
    }

    #[test]
    fn test_parse_power_both_notations() {
        let expected = Expr::Pow(x(), Box::new(Expr::Const(2.0)));
        assert_eq!(parse_expression_func("x**2").unwrap(), expected);
        assert_eq!(parse_expression_func("x^2").unwrap(), expected);
    }

    #[test]
    fn test_power_is_right_associative_and_binds_tighter_than_minus() {
        let expr = parse_expression_func("-x**2").unwrap();
        assert_eq!(expr, -Expr::Pow(x(), Box::new(Expr::Const(2.0))));

        let expr = parse_expression_func("2**3**2").unwrap();
        assert_eq!(
            expr,
            Expr::Const(2.0).pow(Expr::Const(3.0).pow(Expr::Const(2.0)))
        );
    }

    #[test]
    fn test_negative_exponent() {
        let expr = parse_expression_func("x**-1").unwrap();
        assert_eq!(expr, Expr::Pow(x(), Box::new(Expr::Const(-1.0))));
    }

    #[test]
    fn test_parse_polynomial() {
        let expr = parse_expression_func("2*x**2 + 3*x - 5").unwrap();
        let expected = Expr::Const(2.0) * Expr::Pow(x(), Box::new(Expr::Const(2.0)))
            + Expr::Const(3.0) * *x()
            - Expr::Const(5.0);
        assert_eq!(expr, expected);
    }

    #[test]
    fn test_parse_functions_and_aliases() {
        assert_eq!(parse_expression_func("log(x)").unwrap(), Expr::Ln(x()));
        assert_eq!(parse_expression_func("ln(x)").unwrap(), Expr::Ln(x()));
        assert_eq!(parse_expression_func("tan(x)").unwrap(), Expr::tg(x()));
        assert_eq!(parse_expression_func("tg(x)").unwrap(), Expr::tg(x()));
        assert_eq!(parse_expression_func("sqrt(x)").unwrap(), Expr::sqrt(x()));
        assert_eq!(
            parse_expression_func("sin(cos(x))").unwrap(),
            Expr::sin(Box::new(Expr::cos(x())))
        );
    }

    #[test]
    fn test_parse_named_constants() {
        assert_eq!(parse_expression_func("pi").unwrap(), Expr::Const(PI));
        assert_eq!(parse_expression_func("E").unwrap(), Expr::Const(E));
        // lower-case e stays a symbol
        assert_eq!(parse_expression_func("e").unwrap(), Expr::var("e"));
    }

    #[test]
    fn test_whitespace_between_tokens() {
        let spaced = parse_expression_func("  ( x + 1 ) * ( x - 1 ) ").unwrap();
        let tight = parse_expression_func("(x+1)*(x-1)").unwrap();
        assert_eq!(spaced, tight);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(
            parse_expression_func("   "),
            Err(MathError::Format(FormatError::EmptyInput))
        );
    }

    #[test]
    fn test_unclosed_parenthesis() {
        let result = parse_expression_func("(x + y");
        assert_eq!(
            result,
            Err(MathError::Format(FormatError::UnbalancedParentheses {
                position: 0
            }))
        );
    }

    #[test]
    fn test_extra_closing_parenthesis() {
        let result = parse_expression_func("x + 1)");
        assert_eq!(
            result,
            Err(MathError::Format(FormatError::UnbalancedParentheses {
                position: 5
            }))
        );
    }

    #[test]
    fn test_unknown_function() {
        let result = parse_expression_func("foo(x)");
        assert_eq!(
            result,
            Err(MathError::Format(FormatError::UnknownFunction {
                name: "foo".to_string()
            }))
        );
    }

    #[test]
    fn test_function_name_without_argument() {
        let result = parse_expression_func("cos*x");
        assert_eq!(
            result,
            Err(MathError::Format(FormatError::MissingArgument {
                name: "cos".to_string()
            }))
        );
    }

    #[test]
    fn test_dangling_operator() {
        let result = parse_expression_func("x +");
        assert!(matches!(
            result,
            Err(MathError::Format(FormatError::UnexpectedInput { .. }))
        ));
    }

    #[test]
    fn test_implicit_multiplication_is_rejected() {
        // the normalizer is responsible for inserting operators
        let result = parse_expression_func("2(x+1)");
        assert_eq!(
            result,
            Err(MathError::Format(FormatError::UnexpectedInput {
                position: 1,
                found: "(x+1)".to_string()
            }))
        );
    }

    #[test]
    fn test_display_round_trip() {
        for input in [
            "2*x**2 + 3*x - 5",
            "x - (x - 1)",
            "(x + 1)*(x - 1)",
            "-x**2",
            "(-2)**x",
            "x/(2*x)",
            "sqrt(x - 1)/log(x)",
            "x**y**2",
            "(x**y)**2",
        ] {
            let parsed = parse_expression_func(input).unwrap();
            let reparsed = parse_expression_func(&parsed.to_string()).unwrap();
            assert_eq!(parsed, reparsed, "round trip of {}", input);
        }
    }
}
