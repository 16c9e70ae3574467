//! One user session: the history and settings, threaded through every action by value.
//!
//! `handle` never panics and never returns an error: every failure becomes a localized error
//! banner and leaves the history untouched.
use crate::Utils::settings::Settings;
use crate::error::{MathError, Result};
use crate::numerical::arithmetic::{Operation, parse_operand};
use crate::numerical::digitize::{DigitizedCurve, PixelBuffer, ViewWindow};
use crate::numerical::equation_solver::{Equation, Solution};
use crate::numerical::function_analysis::{
    Analysis, Domain, FunctionAnalyzer, Samples, check_points,
};
use crate::session::i18n::{Locale, Message};
use crate::session::narration::Explanation;
use crate::symbolic::utils::format_number;
use log::{info, warn};

/// digits kept when a number is written into the history
const HISTORY_DIGITS: usize = 10;
/// pixels darker (gray) or more opaque (RGBA) than this are strokes
pub const STROKE_THRESHOLD: u8 = 128;

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    /// oldest first
    pub history: Vec<HistoryEntry>,
    pub settings: Settings,
}

impl SessionState {
    pub fn new(settings: Settings) -> Self {
        SessionState {
            history: Vec::new(),
            settings,
        }
    }

    pub fn locale(&self) -> Locale {
        self.settings.session.locale
    }

    /// history as displayed: newest first
    pub fn history_newest_first(&self) -> Vec<&str> {
        self.history.iter().rev().map(|e| e.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// operands and operation as typed
    Arithmetic {
        a: String,
        b: String,
        operation: String,
    },
    Solve {
        equation: String,
    },
    /// `None` takes the plot settings
    Plot {
        function: String,
        domain: Option<Domain>,
        points: Option<usize>,
        analyze: bool,
    },
    Digitize {
        buffer: PixelBuffer,
        view: ViewWindow,
        points: Option<usize>,
    },
    SetLocale(Locale),
    ClearHistory,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Banner {
    Success(String),
    Error(String),
}

impl Banner {
    pub fn text(&self) -> &str {
        match self {
            Banner::Success(text) | Banner::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Banner::Error(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    None,
    Number(f64),
    Solution(Box<Solution>),
    /// full analysis, or bare samples when analysis was not requested
    Analysis(Box<Analysis>),
    Samples(Samples),
    Digitized {
        curve: Vec<(f64, f64)>,
        samples: Samples,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub banner: Banner,
    pub payload: Payload,
    /// narration script source; empty for housekeeping requests
    pub explanation: Explanation,
}

impl Response {
    fn success(banner: String, payload: Payload, explanation: Explanation) -> Self {
        Response {
            banner: Banner::Success(banner),
            payload,
            explanation,
        }
    }
}

/// what a successful action produced
struct Outcome {
    banner: String,
    payload: Payload,
    explanation: Explanation,
    history: Option<String>,
}

fn arithmetic(state: &SessionState, a: &str, b: &str, operation: &str) -> Result<Outcome> {
    let locale = state.locale();
    let a = parse_operand(a)?;
    let b = parse_operand(b)?;
    let operation = Operation::parse(operation)?;
    let result = operation.apply(a, b)?;
    let shown = format_number(result, HISTORY_DIGITS);
    Ok(Outcome {
        banner: locale.message(&Message::Result(shown.clone())),
        payload: Payload::Number(result),
        explanation: Explanation::arithmetic(locale, a, operation, b, result),
        history: Some(format!(
            "{} {} {} = {}",
            format_number(a, HISTORY_DIGITS),
            operation.label(locale),
            format_number(b, HISTORY_DIGITS),
            shown
        )),
    })
}

fn solve(state: &SessionState, text: &str) -> Result<Outcome> {
    let locale = state.locale();
    let equation = Equation::parse(text)?;
    let solution = equation.solve(&state.settings.solver)?;
    Ok(Outcome {
        banner: locale.message(&Message::Solution(solution.to_string())),
        explanation: Explanation::solve(locale, &equation, &solution),
        history: Some(format!("{} -> {}", text.trim(), solution)),
        payload: Payload::Solution(Box::new(solution)),
    })
}

fn plot(
    state: &SessionState,
    function: &str,
    domain: Option<Domain>,
    points: Option<usize>,
    analyze: bool,
) -> Result<Outcome> {
    let locale = state.locale();
    let analyzer = FunctionAnalyzer::with_settings(function, state.settings.solver.clone())?;
    let domain = domain.unwrap_or(state.settings.plot.domain);
    let points = check_points(points.unwrap_or(state.settings.plot.points))?;
    let banner = locale.message(&Message::Plotted {
        function: analyzer.expr.to_string(),
    });
    let (payload, explanation) = if analyze {
        let analysis = analyzer.analyze(&domain, points);
        let explanation = Explanation::plot(locale, &analysis);
        (Payload::Analysis(Box::new(analysis)), explanation)
    } else {
        (
            Payload::Samples(analyzer.sample(&domain, points)),
            Explanation::default(),
        )
    };
    Ok(Outcome {
        history: Some(banner.clone()),
        banner,
        payload,
        explanation,
    })
}

fn digitize(
    state: &SessionState,
    buffer: &PixelBuffer,
    view: &ViewWindow,
    points: Option<usize>,
) -> Result<Outcome> {
    let points = check_points(points.unwrap_or(state.settings.plot.points))?;
    let cloud = buffer.point_cloud(view, STROKE_THRESHOLD);
    let curve = DigitizedCurve::fit(&cloud)?;
    let samples = curve.sample(&view.x, points);
    Ok(Outcome {
        banner: state.locale().message(&Message::Digitized {
            points: cloud.len(),
        }),
        payload: Payload::Digitized {
            curve: curve.knots,
            samples,
        },
        explanation: Explanation::default(),
        history: None,
    })
}

/// banner for a failed action: the action that failed, then why
fn failure(locale: Locale, context: Message, error: &MathError) -> Banner {
    let detail = locale.error(error);
    match (context, error) {
        // a domain error in arithmetic says it all ("cannot divide by zero")
        (Message::OperationFailed, MathError::Domain(_)) => Banner::Error(detail),
        (context, _) => Banner::Error(format!("{}: {}", locale.message(&context), detail)),
    }
}

/// Applies one request to the session and returns the new session with the response.
pub fn handle(mut state: SessionState, request: Request) -> (SessionState, Response) {
    let locale = state.locale();
    let (outcome, context) = match &request {
        Request::ClearHistory => {
            state.history.clear();
            info!("history cleared");
            let banner = locale.message(&Message::HistoryCleared);
            return (
                state,
                Response::success(banner, Payload::None, Explanation::default()),
            );
        }
        Request::SetLocale(new_locale) => {
            state.settings.session.locale = *new_locale;
            let banner = new_locale.code().to_string();
            return (
                state,
                Response::success(banner, Payload::None, Explanation::default()),
            );
        }
        Request::Arithmetic { a, b, operation } => (
            arithmetic(&state, a, b, operation),
            Message::OperationFailed,
        ),
        Request::Solve { equation } => (solve(&state, equation), Message::InvalidEquation),
        Request::Plot {
            function,
            domain,
            points,
            analyze,
        } => (
            plot(&state, function, *domain, *points, *analyze),
            Message::InvalidFunction,
        ),
        Request::Digitize {
            buffer,
            view,
            points,
        } => (
            digitize(&state, buffer, view, *points),
            Message::DigitizeFailed,
        ),
    };
    match outcome {
        Ok(outcome) => {
            if let Some(entry) = outcome.history {
                info!("history: {}", entry);
                state.history.push(HistoryEntry { text: entry });
            }
            let response = Response::success(outcome.banner, outcome.payload, outcome.explanation);
            (state, response)
        }
        Err(error) => {
            warn!("request {:?} failed: {}", request, error);
            let response = Response {
                banner: failure(locale, context, &error),
                payload: Payload::None,
                explanation: Explanation::default(),
            };
            (state, response)
        }
    }
}
