/// parse a settings document with structure like " title1 key1: value1, value2 key2: value2 title2 key3:value3, value4"
/// which has section titles and pairs key-vector of values, into HashMap<String, HashMap<String, Vec<Value>>>.
///
/// Lines starting with //, #, % or ; are comments. A value is an integer, a float, a boolean or, failing all three,
/// a plain string (so `color: #1f77b4` and `locale: ar` both work).
use crate::error::{FormatError, MathError, Result};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, alphanumeric1, multispace0, space0},
    combinator::{map, recognize},
    multi::{many0, many1, separated_list0},
    sequence::{delimited, pair, separated_pair, terminated},
};
use std::collections::HashMap;
use std::fmt::Display;

pub type SectionMap = HashMap<String, Vec<Value>>;
pub type DocumentMap = HashMap<String, SectionMap>;

/// one value of a `key: value, value` list
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    pub fn as_string(&self) -> Option<&String> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// Floats and integers both count as numbers: `x_max: 10` is a valid float setting.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Float(val) => write!(f, "{}", val),
            Value::Integer(val) => write!(f, "{}", val),
            Value::Boolean(val) => write!(f, "{}", val),
        }
    }
}

/// identifier: letter or underscore, then letters, digits, underscores
fn parse_identifier(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    let mut parser = map(parser, String::from);
    parser.parse(input)
}

fn parse_title(input: &str) -> IResult<&str, String> {
    let (input, title) = parse_identifier(input)?;
    Ok((input.trim_start(), title))
}

fn parse_value(input: &str) -> IResult<&str, Value> {
    // a single value runs up to a comma, whitespace or a semicolon
    let value_parser = take_while1(|c: char| !matches!(c, ',' | ' ' | '\t' | '\n' | '\r' | ';'));
    let mut value_parser = map(value_parser, |s: &str| {
        if let Ok(val) = s.parse::<i64>() {
            Value::Integer(val)
        } else if let Ok(val) = s.parse::<f64>() {
            Value::Float(val)
        } else if let Ok(val) = s.parse::<bool>() {
            Value::Boolean(val)
        } else {
            Value::String(s.to_string())
        }
    });
    value_parser.parse(input)
}

fn parse_value_list(input: &str) -> IResult<&str, Vec<Value>> {
    let separator_coma = delimited(space0, tag(","), space0);
    let mut value_parser = separated_list0(separator_coma, parse_value);
    value_parser.parse(input)
}

fn parse_key_value_pair(input: &str) -> IResult<&str, (String, Vec<Value>)> {
    let colon_separator = delimited(space0, tag(":"), space0);
    let mut parser = separated_pair(parse_identifier, colon_separator, parse_value_list);
    let (input, result) = parser.parse(input)?;
    // a trailing semicolon ends the line like a newline does
    let input = input.trim_start_matches([' ', '\t', ';']);
    Ok((input.trim_start(), result))
}

fn parse_section(input: &str) -> IResult<&str, (String, SectionMap)> {
    let (input, title) = parse_title(input)?;
    let (input, _) = multispace0(input)?;
    let mut parser = many1(terminated(parse_key_value_pair, space0));
    let (input, pairs) = parser.parse(input)?;
    Ok((input, (title, pairs.into_iter().collect())))
}

/// Drops comment lines (starting with //, #, % or ;) and blank lines.
fn filter_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("//")
                && !trimmed.starts_with('#')
                && !trimmed.starts_with('%')
                && !trimmed.starts_with(';')
                && !trimmed.is_empty()
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// nom-level parser over an already comment-free document
pub fn parse_document(input: &str) -> IResult<&str, DocumentMap> {
    let mut parser = many1(delimited(space0, parse_section, multispace0));
    let (input, sections) = parser.parse(input)?;
    let mut result: DocumentMap = HashMap::new();
    for (title, section) in sections {
        // a repeated section title extends the earlier one
        result.entry(title).or_default().extend(section);
    }
    Ok((input, result))
}

/// Parses a whole settings document. An empty document (or one with only comments) is an empty
/// map; anything left unparsed is a format error naming the first offending line.
pub fn parse_settings_document(input: &str) -> Result<DocumentMap> {
    let filtered = filter_comments(input);
    if filtered.trim().is_empty() {
        return Ok(HashMap::new());
    }
    let invalid = |rest: &str| {
        MathError::Format(FormatError::InvalidSetting {
            key: rest.lines().next().unwrap_or_default().trim().to_string(),
            reason: "expected a section title followed by `key: value` lines".to_string(),
        })
    };
    match parse_document(filtered.trim_start()) {
        Ok((remaining, parsed)) if remaining.trim().is_empty() => Ok(parsed),
        Ok((remaining, _)) => Err(invalid(remaining)),
        Err(_) => Err(invalid(filtered.trim_start())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_types() {
        assert_eq!(parse_value("42").unwrap().1, Value::Integer(42));
        assert_eq!(parse_value("-1e-8").unwrap().1, Value::Float(-1e-8));
        assert_eq!(parse_value("true").unwrap().1, Value::Boolean(true));
        assert_eq!(
            parse_value("#1f77b4").unwrap().1,
            Value::String("#1f77b4".to_string())
        );
        assert_eq!(parse_value("ar, en").unwrap(), (", en", Value::String("ar".to_string())));
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Integer(10).as_f64(), Some(10.0));
        assert_eq!(Value::Float(0.5).as_f64(), Some(0.5));
        assert_eq!(Value::String("x".into()).as_f64(), None);
        assert_eq!(Value::Float(0.5).as_integer(), None);
        assert_eq!(Value::Boolean(false).as_boolean(), Some(false));
        assert_eq!(Value::String("ar".into()).to_string(), "ar");
    }

    #[test]
    fn test_parse_value_list() {
        let (_, values) = parse_value_list("1, 2.5 ,three").unwrap();
        assert_eq!(
            values,
            vec![
                Value::Integer(1),
                Value::Float(2.5),
                Value::String("three".to_string())
            ]
        );
    }

    #[test]
    fn test_parse_document_with_sections() {
        let input = "plot\nx_min: -5\nx_max: 5\ncolor: #ff0000\nsolver\ntolerance: 1e-8\n";
        let doc = parse_settings_document(input).unwrap();
        assert_eq!(doc.len(), 2);
        assert_eq!(doc["plot"]["x_min"], vec![Value::Integer(-5)]);
        assert_eq!(doc["plot"]["color"], vec![Value::String("#ff0000".into())]);
        assert_eq!(doc["solver"]["tolerance"], vec![Value::Float(1e-8)]);
    }

    #[test]
    fn test_comments_and_single_line_layout() {
        let input = "# scratch settings\n// more\nsession locale: en loglevel: debug\n% done";
        let doc = parse_settings_document(input).unwrap();
        assert_eq!(doc["session"]["locale"], vec![Value::String("en".into())]);
        assert_eq!(doc["session"]["loglevel"], vec![Value::String("debug".into())]);
    }

    #[test]
    fn test_empty_document() {
        assert!(parse_settings_document("").unwrap().is_empty());
        assert!(parse_settings_document("; nothing here\n").unwrap().is_empty());
    }

    #[test]
    fn test_garbage_is_rejected() {
        let err = parse_settings_document("plot\nx_min: 1\n: 2").unwrap_err();
        assert!(matches!(
            err,
            MathError::Format(FormatError::InvalidSetting { .. })
        ));
        assert!(parse_settings_document("123").is_err());
    }
}
