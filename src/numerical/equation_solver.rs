//! # Equation solver
//!
//! Solves `lhs = rhs` for its single free variable. The equation is normalized, both sides are
//! parsed and moved to one side as `lhs - (rhs)`, then the residual decides the method:
//!
//! | residual                  | method                                  |
//! |---------------------------|-----------------------------------------|
//! | no variable / degree 0    | direct evaluation: every value or none  |
//! | degree 1                  | closed form                             |
//! | degree 2                  | quadratic formula, complex roots kept   |
//! | degree 3 and above        | Durand–Kerner iteration                 |
//! | not a polynomial          | sign-change bracketing and bisection    |
//!
//! # Examples
//! ```
//! use RustedMathForm::numerical::equation_solver::Equation;
//! use RustedMathForm::Utils::settings::SolverSettings;
//! let solution = Equation::parse("x^2 - 4x + 3 = 0").unwrap()
//!     .solve(&SolverSettings::default()).unwrap();
//! assert_eq!(solution.to_string(), "[1, 3]");
//! ```
use crate::Utils::settings::SolverSettings;
use crate::error::{FormatError, MathError, Result};
use crate::numerical::root_finding::{RootFindingConfig, ScalarRootFinder};
use crate::symbolic::notation::normalize;
use crate::symbolic::polynomial::Polynomial;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::{format_number, snap_to_integer};
use log::info;
use num_complex::Complex64;
use std::cmp::Ordering;
use std::fmt;
use strum_macros::Display;

/// imaginary parts below this (relative to max(1, |re|)) are treated as zero
pub const IMAGINARY_SNAP: f64 = 1e-9;
/// digits shown for roots that are not integers
const ROOT_DIGITS: usize = 6;

/// A root of the residual; real roots have a zero imaginary part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Root(pub Complex64);

impl Root {
    /// Cleans up a computed root: the imaginary part is snapped to zero when negligible and
    /// both parts are snapped to nearby integers.
    pub fn new(z: Complex64) -> Root {
        let re = snap_to_integer(z.re);
        let im = if z.im.abs() <= IMAGINARY_SNAP * z.re.abs().max(1.0) {
            0.0
        } else {
            snap_to_integer(z.im)
        };
        Root(Complex64::new(re, im))
    }

    pub fn real(value: f64) -> Root {
        Root::new(Complex64::new(value, 0.0))
    }

    pub fn is_real(&self) -> bool {
        self.0.im == 0.0
    }

    pub fn re(&self) -> f64 {
        self.0.re
    }

    pub fn im(&self) -> f64 {
        self.0.im
    }

    fn order(&self, other: &Root) -> Ordering {
        self.0
            .re
            .total_cmp(&other.0.re)
            .then(self.0.im.total_cmp(&other.0.im))
    }
}

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let re = format_number(self.0.re, ROOT_DIGITS);
        if self.is_real() {
            return write!(f, "{}", re);
        }
        let im = format_number(self.0.im.abs(), ROOT_DIGITS);
        let sign = if self.0.im < 0.0 { "-" } else { "+" };
        if self.0.re == 0.0 {
            let sign = if self.0.im < 0.0 { "-" } else { "" };
            write!(f, "{}{}i", sign, im)
        } else {
            write!(f, "{} {} {}i", re, sign, im)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SolveMethod {
    /// no free variable, or every power cancelled
    Evaluation,
    Linear,
    QuadraticFormula,
    PolynomialIteration,
    NumericBracketing,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SolutionSet {
    /// sorted by (re, im), repeated roots kept
    Roots(Vec<Root>),
    /// the equation holds for every value (`x = x`, `2 = 2`)
    AllValues,
    /// the equation holds for no value (`2 = 3`, or no real root found by bracketing)
    Empty,
}

impl SolutionSet {
    pub fn roots(&self) -> &[Root] {
        match self {
            SolutionSet::Roots(roots) => roots,
            _ => &[],
        }
    }

    pub fn real_roots(&self) -> Vec<f64> {
        self.roots()
            .iter()
            .filter(|r| r.is_real())
            .map(|r| r.re())
            .collect()
    }
}

impl fmt::Display for SolutionSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SolutionSet::Roots(roots) => {
                let items: Vec<String> = roots.iter().map(|r| r.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            SolutionSet::AllValues => write!(f, "ℝ"),
            SolutionSet::Empty => write!(f, "∅"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub variable: Option<String>,
    pub method: SolveMethod,
    /// `lhs - (rhs)` after simplification
    pub residual: Expr,
    pub degree: Option<usize>,
    pub discriminant: Option<f64>,
    pub set: SolutionSet,
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.set)
    }
}

/// An equation split into its two sides.
#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
    /// text as typed
    pub text: String,
    /// normalized text that was parsed
    pub canonical: String,
    pub lhs: Expr,
    pub rhs: Expr,
}

impl Equation {
    /// Normalizes and parses `lhs = rhs`. Exactly one `=` is required.
    pub fn parse(text: &str) -> Result<Equation> {
        let canonical = normalize(text);
        if canonical.is_empty() {
            return Err(FormatError::EmptyInput.into());
        }
        let sides: Vec<&str> = canonical.split('=').collect();
        match sides.len() {
            1 => return Err(FormatError::MissingEquals.into()),
            2 => {}
            n => return Err(FormatError::MultipleEquals(n - 1).into()),
        }
        let lhs = Expr::parse_expression(sides[0])?;
        let rhs = Expr::parse_expression(sides[1])?;
        Ok(Equation {
            text: text.to_string(),
            canonical,
            lhs,
            rhs,
        })
    }

    /// `lhs - (rhs)`, unsimplified
    pub fn residual(&self) -> Expr {
        self.lhs.clone() - self.rhs.clone()
    }

    pub fn variables(&self) -> Vec<String> {
        self.residual().variables()
    }

    pub fn solve(&self, settings: &SolverSettings) -> Result<Solution> {
        let residual = self.residual().simplify();
        let variables = residual.variables();
        match variables.len() {
            0 => {
                let value = residual.eval_constant().unwrap_or(f64::NAN);
                Ok(Solution {
                    variable: None,
                    method: SolveMethod::Evaluation,
                    set: constant_solution_set(value, settings.tolerance),
                    residual,
                    degree: None,
                    discriminant: None,
                })
            }
            1 => {
                let var = variables[0].clone();
                match residual.as_polynomial(&var) {
                    Some(poly) => Ok(solve_polynomial(&var, residual, &poly, settings)),
                    None => Ok(solve_numeric(&var, residual, settings)),
                }
            }
            _ => Err(MathError::unsupported(format!(
                "equation has {} variables ({}), only one can be solved for",
                variables.len(),
                variables.join(", ")
            ))),
        }
    }
}

fn constant_solution_set(value: f64, tolerance: f64) -> SolutionSet {
    if value.abs() <= tolerance {
        SolutionSet::AllValues
    } else {
        SolutionSet::Empty
    }
}

fn sorted(mut roots: Vec<Root>) -> Vec<Root> {
    roots.sort_by(|a, b| a.order(b));
    roots
}

fn solve_polynomial(
    var: &str,
    residual: Expr,
    poly: &Polynomial,
    settings: &SolverSettings,
) -> Solution {
    let degree = poly.degree();
    let (method, set) = match degree {
        0 => (
            SolveMethod::Evaluation,
            constant_solution_set(poly.coeff(0), settings.tolerance),
        ),
        1 => {
            let root = -poly.coeff(0) / poly.coeff(1);
            (SolveMethod::Linear, SolutionSet::Roots(vec![Root::real(root)]))
        }
        2 => {
            let [r1, r2] = Polynomial::quadratic_roots(poly.coeff(2), poly.coeff(1), poly.coeff(0));
            (
                SolveMethod::QuadraticFormula,
                SolutionSet::Roots(sorted(vec![Root::new(r1), Root::new(r2)])),
            )
        }
        _ => (
            SolveMethod::PolynomialIteration,
            SolutionSet::Roots(solve_general(poly, settings)),
        ),
    };
    info!(
        "solved {} = 0 for {} (degree {}) by {}: {}",
        residual, var, degree, method, set
    );
    Solution {
        variable: Some(var.to_string()),
        method,
        residual,
        degree: Some(degree),
        discriminant: poly.discriminant(),
        set,
    }
}

/// General polynomial solve routine: Durand–Kerner for every degree, no closed forms.
/// For quadratics it returns the same root set as the quadratic formula.
pub fn solve_general(poly: &Polynomial, settings: &SolverSettings) -> Vec<Root> {
    let roots = poly
        .roots_iterative(settings.tolerance, settings.max_iterations)
        .into_iter()
        .map(Root::new)
        .collect();
    sorted(roots)
}

fn solve_numeric(var: &str, residual: Expr, settings: &SolverSettings) -> Solution {
    let f = residual.lambdify1D(var);
    let finder = ScalarRootFinder::with_config(RootFindingConfig {
        tolerance: settings.tolerance,
        max_iterations: settings.max_iterations,
        ..RootFindingConfig::default()
    });
    let roots = finder.scan(
        &f,
        settings.search_min,
        settings.search_max,
        settings.search_points,
    );
    let set = if roots.is_empty() {
        SolutionSet::Empty
    } else {
        SolutionSet::Roots(roots.into_iter().map(Root::real).collect())
    };
    info!(
        "solved {} = 0 for {} numerically on [{}, {}]: {}",
        residual, var, settings.search_min, settings.search_max, set
    );
    Solution {
        variable: Some(var.to_string()),
        method: SolveMethod::NumericBracketing,
        residual,
        degree: None,
        discriminant: None,
        set,
    }
}
