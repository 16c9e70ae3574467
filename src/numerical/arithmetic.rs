//! The four arithmetic operations of the calculator panel.
use crate::error::{DomainError, FormatError, MathError, Result};
use crate::session::i18n::Locale;
use log::debug;
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};

/// Operation selector. Parses from English names, symbols and the Arabic labels,
/// displays as its symbol.
///
/// ```
/// use RustedMathForm::numerical::arithmetic::Operation;
/// assert_eq!(Operation::parse("قسمة").unwrap(), Operation::Divide);
/// assert_eq!(Operation::parse("*").unwrap().to_string(), "×");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum Operation {
    #[strum(to_string = "+", serialize = "add", serialize = "plus", serialize = "جمع")]
    Add,
    #[strum(
        to_string = "-",
        serialize = "subtract",
        serialize = "sub",
        serialize = "minus",
        serialize = "طرح"
    )]
    Subtract,
    #[strum(
        to_string = "×",
        serialize = "*",
        serialize = "x",
        serialize = "multiply",
        serialize = "mul",
        serialize = "times",
        serialize = "ضرب"
    )]
    Multiply,
    #[strum(
        to_string = "÷",
        serialize = "/",
        serialize = "divide",
        serialize = "div",
        serialize = "قسمة"
    )]
    Divide,
}

impl Operation {
    pub fn parse(text: &str) -> Result<Operation> {
        let text = text.trim();
        Operation::from_str(text)
            .map_err(|_| FormatError::UnknownOperation(text.to_string()).into())
    }

    /// name shown in the operation selector
    pub fn label(&self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::Arabic, Operation::Add) => "جمع",
            (Locale::Arabic, Operation::Subtract) => "طرح",
            (Locale::Arabic, Operation::Multiply) => "ضرب",
            (Locale::Arabic, Operation::Divide) => "قسمة",
            (Locale::English, Operation::Add) => "add",
            (Locale::English, Operation::Subtract) => "subtract",
            (Locale::English, Operation::Multiply) => "multiply",
            (Locale::English, Operation::Divide) => "divide",
        }
    }

    /// Applies the operation. Division by zero is an error, never inf or NaN.
    pub fn apply(&self, a: f64, b: f64) -> Result<f64> {
        let result = match self {
            Operation::Add => a + b,
            Operation::Subtract => a - b,
            Operation::Multiply => a * b,
            Operation::Divide => {
                if b == 0.0 {
                    return Err(DomainError::DivisionByZero.into());
                }
                a / b
            }
        };
        debug!("{} {} {} = {}", a, self, b, result);
        Ok(result)
    }
}

/// Parses an operand typed by the user. Arabic-Indic digits and the Arabic decimal separator
/// are accepted.
///
/// ```
/// use RustedMathForm::numerical::arithmetic::parse_operand;
/// assert_eq!(parse_operand("١٢٫٥").unwrap(), 12.5);
/// ```
pub fn parse_operand(text: &str) -> Result<f64> {
    let ascii: String = text
        .trim()
        .chars()
        .map(|c| match c {
            '٠'..='٩' => char::from(b'0' + (c as u32 - '٠' as u32) as u8),
            '٫' => '.',
            other => other,
        })
        .collect();
    match ascii.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(MathError::Format(FormatError::InvalidNumber(
            text.trim().to_string(),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use strum::IntoEnumIterator;

    #[test]
    fn test_apply() {
        assert_eq!(Operation::Add.apply(2.0, 3.0).unwrap(), 5.0);
        assert_eq!(Operation::Subtract.apply(2.0, 3.0).unwrap(), -1.0);
        assert_eq!(Operation::Multiply.apply(2.0, 3.0).unwrap(), 6.0);
        assert_relative_eq!(Operation::Divide.apply(2.0, 3.0).unwrap(), 2.0 / 3.0);
    }

    #[test]
    fn test_division_by_zero_is_reported() {
        let result = Operation::Divide.apply(5.0, 0.0);
        assert_eq!(result, Err(MathError::Domain(DomainError::DivisionByZero)));
        assert!(Operation::Divide.apply(5.0, -0.0).is_err());
        assert_eq!(Operation::Divide.apply(0.0, 5.0).unwrap(), 0.0);
    }

    #[test]
    fn test_parse_aliases() {
        for (text, op) in [
            ("+", Operation::Add),
            ("Add", Operation::Add),
            ("جمع", Operation::Add),
            ("-", Operation::Subtract),
            ("طرح", Operation::Subtract),
            ("*", Operation::Multiply),
            ("×", Operation::Multiply),
            ("ضرب", Operation::Multiply),
            ("/", Operation::Divide),
            ("÷", Operation::Divide),
            (" قسمة ", Operation::Divide),
        ] {
            assert_eq!(Operation::parse(text).unwrap(), op, "{}", text);
        }
        assert_eq!(
            Operation::parse("%"),
            Err(MathError::Format(FormatError::UnknownOperation("%".to_string())))
        );
    }

    #[test]
    fn test_labels_parse_back() {
        for op in Operation::iter() {
            for locale in [Locale::Arabic, Locale::English] {
                assert_eq!(Operation::parse(op.label(locale)).unwrap(), op);
            }
            assert_eq!(Operation::parse(&op.to_string()).unwrap(), op);
        }
    }

    #[test]
    fn test_parse_operand() {
        assert_eq!(parse_operand(" 2.5 ").unwrap(), 2.5);
        assert_eq!(parse_operand("-3").unwrap(), -3.0);
        assert_eq!(parse_operand("٣").unwrap(), 3.0);
        assert!(parse_operand("abc").is_err());
        assert!(parse_operand("inf").is_err());
        assert!(parse_operand("").is_err());
    }
}
