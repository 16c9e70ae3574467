//! # Function analysis and sampling
//!
//! A single-variable function typed by the user is normalized, parsed, differentiated twice and
//! compiled. It can then be sampled for plotting, where points without a real value (`sqrt` of a
//! negative, poles, `log` of zero) become NaN instead of failing the whole run, and analysed for
//! roots, critical points and inflection points inside a domain.
//!
//! # Examples
//! ```
//! use RustedMathForm::numerical::function_analysis::{Domain, FunctionAnalyzer};
//! let f = FunctionAnalyzer::new("sqrt(x)").unwrap();
//! let samples = f.sample(&Domain::default(), 400);
//! assert_eq!(samples.len(), 400);
//! assert_eq!(samples.missing_count(), 200);
//! ```
use crate::Utils::settings::SolverSettings;
use crate::error::{DomainError, MathError, Result};
use crate::numerical::root_finding::{RootFindingConfig, ScalarRootFinder};
use crate::symbolic::notation::normalize;
use crate::symbolic::symbolic_engine::Expr;
use log::{debug, info};
use ndarray::Array1;
use std::fmt;
use strum_macros::Display;

pub const DEFAULT_POINTS: usize = 400;
/// upper bound for any sampling grid
pub const MAX_POINTS: usize = 1_000_000;
const DEFAULT_VARIABLE: &str = "x";
/// relative step used to look left and right of a stationary point
const PROBE_STEP: f64 = 1e-4;
/// zeros closer than this (relative) are one zero
const ZERO_MERGE: f64 = 1e-7;

/// Closed sampling interval [start, end].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    pub start: f64,
    pub end: f64,
}

impl Default for Domain {
    fn default() -> Self {
        Domain {
            start: -10.0,
            end: 10.0,
        }
    }
}

impl Domain {
    pub fn new(start: f64, end: f64) -> Result<Domain> {
        if !start.is_finite() || !end.is_finite() || start >= end {
            return Err(DomainError::InvalidRange { start, end }.into());
        }
        Ok(Domain { start, end })
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.start && x <= self.end
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    /// evenly spaced grid including both ends; callers check `points` with [`check_points`]
    pub fn grid(&self, points: usize) -> Array1<f64> {
        Array1::linspace(self.start, self.end, points.max(2))
    }
}

/// Rejects sample counts above [`MAX_POINTS`].
pub fn check_points(points: usize) -> Result<usize> {
    if points > MAX_POINTS {
        return Err(DomainError::TooManyPoints {
            max: MAX_POINTS,
            got: points,
        }
        .into());
    }
    Ok(points)
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Sampled (x, y) values; `y` is NaN where the function has no finite real value.
#[derive(Debug, Clone, PartialEq)]
pub struct Samples {
    pub x: Array1<f64>,
    pub y: Array1<f64>,
}

impl Samples {
    /// Evaluates `f` on the grid, replacing every non-finite value by NaN.
    pub fn from_fn<F: Fn(f64) -> f64>(x: Array1<f64>, f: F) -> Samples {
        let y = x.mapv(|x| {
            let y = f(x);
            if y.is_finite() { y } else { f64::NAN }
        });
        Samples { x, y }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.y.iter().filter(|y| y.is_nan()).count()
    }

    pub fn finite_points(&self) -> Vec<(f64, f64)> {
        self.x
            .iter()
            .zip(self.y.iter())
            .filter(|(_, y)| y.is_finite())
            .map(|(x, y)| (*x, *y))
            .collect()
    }

    /// runs of consecutive finite points, split at every missing value
    pub fn segments(&self) -> Vec<Vec<(f64, f64)>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for (x, y) in self.x.iter().zip(self.y.iter()) {
            if y.is_finite() {
                current.push((*x, *y));
            } else if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }

    /// (min, max) of the finite values, `None` if there are none
    pub fn y_range(&self) -> Option<(f64, f64)> {
        self.y
            .iter()
            .filter(|y| y.is_finite())
            .fold(None, |acc, &y| match acc {
                None => Some((y, y)),
                Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PointKind {
    Minimum,
    Maximum,
    /// f' = 0 without an extremum, e.g. x**3 at 0
    Stationary,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalPoint {
    pub x: f64,
    pub y: f64,
    pub kind: PointKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InflectionPoint {
    pub x: f64,
    pub y: f64,
}

/// Everything the plot panel shows for one function.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub function: Expr,
    pub variable: String,
    pub domain: Domain,
    pub derivative: Expr,
    pub second_derivative: Expr,
    pub samples: Samples,
    pub roots: Vec<f64>,
    pub critical_points: Vec<CriticalPoint>,
    pub inflection_points: Vec<InflectionPoint>,
}

pub struct FunctionAnalyzer {
    /// text as typed
    pub text: String,
    pub expr: Expr,
    pub variable: String,
    pub derivative: Expr,
    pub second_derivative: Expr,
    func: Box<dyn Fn(f64) -> f64>,
    settings: SolverSettings,
}

impl fmt::Debug for FunctionAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FunctionAnalyzer")
            .field("expr", &self.expr)
            .field("variable", &self.variable)
            .finish()
    }
}

impl FunctionAnalyzer {
    pub fn new(text: &str) -> Result<FunctionAnalyzer> {
        FunctionAnalyzer::with_settings(text, SolverSettings::default())
    }

    /// Normalizes, parses and compiles the function. A function of more than one variable is
    /// unsupported; a constant is a function of `x`.
    pub fn with_settings(text: &str, settings: SolverSettings) -> Result<FunctionAnalyzer> {
        let canonical = normalize(text);
        let expr = Expr::parse_expression(&canonical)?;
        let variables = expr.variables();
        let variable = match variables.as_slice() {
            [] => DEFAULT_VARIABLE.to_string(),
            [var] => var.clone(),
            _ => {
                return Err(MathError::unsupported(format!(
                    "function of {} variables ({}), plotting needs exactly one",
                    variables.len(),
                    variables.join(", ")
                )));
            }
        };
        let derivative = expr.diff(&variable).simplify();
        let second_derivative = derivative.diff(&variable).simplify();
        debug!("f = {}, f' = {}, f'' = {}", expr, derivative, second_derivative);
        let func = expr.lambdify1D(&variable);
        Ok(FunctionAnalyzer {
            text: text.to_string(),
            expr,
            variable,
            derivative,
            second_derivative,
            func,
            settings,
        })
    }

    /// f(x), NaN where it has no finite real value
    pub fn evaluate(&self, x: f64) -> f64 {
        let y = (self.func)(x);
        if y.is_finite() { y } else { f64::NAN }
    }

    /// Samples `points` evenly spaced values over the domain. Never fails.
    pub fn sample(&self, domain: &Domain, points: usize) -> Samples {
        let samples = Samples::from_fn(domain.grid(points), |x| (self.func)(x));
        info!(
            "sampled {} on {} at {} points, {} missing",
            self.expr,
            domain,
            samples.len(),
            samples.missing_count()
        );
        samples
    }

    /// real zeros of `expr` inside the domain, without repetition
    fn zeros(&self, expr: &Expr, domain: &Domain) -> Vec<f64> {
        let mut zeros = match expr.as_polynomial(&self.variable) {
            // an identically zero function has no isolated zeros
            Some(poly) if poly.is_zero() => Vec::new(),
            Some(poly) => poly
                .real_roots(self.settings.tolerance.sqrt())
                .into_iter()
                .filter(|x| domain.contains(*x))
                .collect(),
            None => {
                let f = expr.lambdify1D(&self.variable);
                let finder = ScalarRootFinder::with_config(RootFindingConfig {
                    tolerance: self.settings.tolerance,
                    max_iterations: self.settings.max_iterations,
                    ..RootFindingConfig::default()
                });
                finder.scan(&f, domain.start, domain.end, self.settings.search_points)
            }
        };
        zeros.dedup_by(|a, b| (*a - *b).abs() <= ZERO_MERGE * a.abs().max(1.0));
        zeros
    }

    /// Real roots of f inside the domain.
    pub fn roots(&self, domain: &Domain) -> Vec<f64> {
        self.zeros(&self.expr, domain)
            .into_iter()
            .filter(|x| self.evaluate(*x).is_finite())
            .collect()
    }

    fn classify(&self, x: f64) -> PointKind {
        let curvature = self.second_derivative.eval(&self.variable, x);
        if curvature.is_finite() && curvature.abs() > self.settings.tolerance.sqrt() {
            return if curvature > 0.0 {
                PointKind::Minimum
            } else {
                PointKind::Maximum
            };
        }
        // flat curvature: look at the slope on both sides
        let h = PROBE_STEP * (1.0 + x.abs());
        let left = self.derivative.eval(&self.variable, x - h);
        let right = self.derivative.eval(&self.variable, x + h);
        if left < 0.0 && right > 0.0 {
            PointKind::Minimum
        } else if left > 0.0 && right < 0.0 {
            PointKind::Maximum
        } else {
            PointKind::Stationary
        }
    }

    /// Real roots of f' inside the domain, classified by the sign of f''.
    pub fn critical_points(&self, domain: &Domain) -> Vec<CriticalPoint> {
        self.zeros(&self.derivative, domain)
            .into_iter()
            .filter_map(|x| {
                let y = self.evaluate(x);
                y.is_finite().then(|| CriticalPoint {
                    x,
                    y,
                    kind: self.classify(x),
                })
            })
            .collect()
    }

    /// Real roots of f'' inside the domain where f'' changes sign.
    pub fn inflection_points(&self, domain: &Domain) -> Vec<InflectionPoint> {
        self.zeros(&self.second_derivative, domain)
            .into_iter()
            .filter(|&x| {
                let h = PROBE_STEP * (1.0 + x.abs());
                let left = self.second_derivative.eval(&self.variable, x - h);
                let right = self.second_derivative.eval(&self.variable, x + h);
                left * right < 0.0
            })
            .filter_map(|x| {
                let y = self.evaluate(x);
                y.is_finite().then_some(InflectionPoint { x, y })
            })
            .collect()
    }

    pub fn analyze(&self, domain: &Domain, points: usize) -> Analysis {
        let analysis = Analysis {
            function: self.expr.clone(),
            variable: self.variable.clone(),
            domain: *domain,
            derivative: self.derivative.clone(),
            second_derivative: self.second_derivative.clone(),
            samples: self.sample(domain, points),
            roots: self.roots(domain),
            critical_points: self.critical_points(domain),
            inflection_points: self.inflection_points(domain),
        };
        info!(
            "{}: {} roots, {} critical points, {} inflection points",
            self.expr,
            analysis.roots.len(),
            analysis.critical_points.len(),
            analysis.inflection_points.len()
        );
        analysis
    }
}
