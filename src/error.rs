//! error types shared by every computation path.
//!
//! Every failure a user can trigger is one of three kinds: the text could not be understood
//! (`Format`), the input is understood but has no value (`Domain`), or the request is outside
//! what the engine can do (`Unsupported`). The session layer turns all of them into localized
//! banners, so nothing reaches the user as a crash.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MathError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MathError {
    #[error("format error: {0}")]
    Format(#[from] FormatError),
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("unsupported operation: {0}")]
    Unsupported(String),
    /// scratch artifacts (charts, narration scripts, csv tables) could not be written
    #[error("i/o error: {0}")]
    Io(String),
}

/// input-format errors: the text cannot be turned into an expression or an equation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("empty input")]
    EmptyInput,
    #[error("equation must contain '='")]
    MissingEquals,
    #[error("equation must contain exactly one '=', found {0}")]
    MultipleEquals(usize),
    #[error("unbalanced parentheses at position {position}")]
    UnbalancedParentheses { position: usize },
    #[error("unknown function '{name}'")]
    UnknownFunction { name: String },
    #[error("function '{name}' needs an argument in parentheses")]
    MissingArgument { name: String },
    #[error("unexpected input '{found}' at position {position}")]
    UnexpectedInput { position: usize, found: String },
    #[error("not a number: '{0}'")]
    InvalidNumber(String),
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),
    #[error("invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },
}

/// domain errors: the input is well formed but the operation has no value for it
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("invalid range [{start}, {end}]")]
    InvalidRange { start: f64, end: f64 },
    #[error("at least {needed} points are required, got {got}")]
    NotEnoughPoints { needed: usize, got: usize },
    #[error("at most {max} points can be sampled, got {got}")]
    TooManyPoints { max: usize, got: usize },
    #[error("pixel buffer of {width}x{height}x{channels} does not match {len} bytes")]
    PixelBufferSize {
        width: usize,
        height: usize,
        channels: usize,
        len: usize,
    },
}

impl MathError {
    pub fn unsupported(msg: impl Into<String>) -> Self {
        MathError::Unsupported(msg.into())
    }
}

impl From<std::io::Error> for MathError {
    fn from(e: std::io::Error) -> Self {
        MathError::Io(e.to_string())
    }
}
