//! # Symbolic Engine Module
//!
//! The expression tree every other stage works on. A canonical expression string (the output of
//! the notation normalizer) is parsed into an [`Expr`], differentiated, simplified, compiled into
//! a closure for sampling, or turned into a [`Polynomial`](crate::symbolic::polynomial::Polynomial)
//! for closed-form solving.
//!
//! ## Main Structures and Methods
//!
//! - **Variables**: `Var(String)` - symbolic variables like "x"
//! - **Constants**: `Const(f64)` - numerical constants
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow` - basic arithmetic
//! - **Functions**: `Exp`, `Ln`, `sin`, `cos`, `sqrt`, ... - elementary functions
//!
//! - `set_variable()` - substitute a value for a variable
//! - `variables()` - sorted list of free variables
//! - `Display` - canonical string (`2*x**2 + 3*x - 5`) that parses back into the same tree
//!
//! Function variants keep the mathematical names (`tg`, `ctg`, `arctg`) while printing uses the
//! names the parser and most students know (`tan`, `cot`, `atan`).

#![allow(non_camel_case_types)]

use std::collections::{BTreeSet, HashMap};
use std::f64;
use std::fmt;

/// Core symbolic expression enum representing mathematical expressions as an abstract syntax tree.
///
/// # Examples
/// ```
/// use RustedMathForm::symbolic::symbolic_engine::Expr;
/// let x = Expr::Var("x".to_string());
/// let expr = Expr::Add(Box::new(x), Box::new(Expr::Const(2.0)));
/// assert_eq!(expr.to_string(), "x + 2");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name (e.g., "x")
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ** exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Exponential function: e^x
    Exp(Box<Expr>),
    /// Natural logarithm: ln(x), typed as `log(x)` or `ln(x)`
    Ln(Box<Expr>),
    sin(Box<Expr>),
    cos(Box<Expr>),
    /// Tangent function: tan(x)
    tg(Box<Expr>),
    /// Cotangent function: cot(x)
    ctg(Box<Expr>),
    arcsin(Box<Expr>),
    arccos(Box<Expr>),
    /// Arctangent function: atan(x)
    arctg(Box<Expr>),
    /// Square root, NaN for negative arguments
    sqrt(Box<Expr>),
    /// Absolute value
    abs(Box<Expr>),
}

/// binding strength used by `Display` to decide where parentheses are needed
const PREC_SUM: u8 = 1;
const PREC_PRODUCT: u8 = 2;
const PREC_UNARY: u8 = 3;
const PREC_POWER: u8 = 4;
const PREC_ATOM: u8 = 5;

impl Expr {
    fn precedence(&self) -> u8 {
        match self {
            Expr::Add(..) | Expr::Sub(..) => PREC_SUM,
            Expr::Mul(lhs, _) if **lhs == Expr::Const(-1.0) => PREC_UNARY,
            Expr::Mul(..) | Expr::Div(..) => PREC_PRODUCT,
            Expr::Const(c) if c.is_sign_negative() && *c != 0.0 => PREC_UNARY,
            Expr::Pow(..) => PREC_POWER,
            _ => PREC_ATOM,
        }
    }

    /// name used when printing a function application, `None` for non-function nodes
    pub fn function_name(&self) -> Option<&'static str> {
        let name = match self {
            Expr::Exp(_) => "exp",
            Expr::Ln(_) => "log",
            Expr::sin(_) => "sin",
            Expr::cos(_) => "cos",
            Expr::tg(_) => "tan",
            Expr::ctg(_) => "cot",
            Expr::arcsin(_) => "asin",
            Expr::arccos(_) => "acos",
            Expr::arctg(_) => "atan",
            Expr::sqrt(_) => "sqrt",
            Expr::abs(_) => "abs",
            _ => return None,
        };
        Some(name)
    }

    /// the argument of a one-argument function node
    pub fn function_argument(&self) -> Option<&Expr> {
        match self {
            Expr::Exp(e)
            | Expr::Ln(e)
            | Expr::sin(e)
            | Expr::cos(e)
            | Expr::tg(e)
            | Expr::ctg(e)
            | Expr::arcsin(e)
            | Expr::arccos(e)
            | Expr::arctg(e)
            | Expr::sqrt(e)
            | Expr::abs(e) => Some(e),
            _ => None,
        }
    }

    /// rebuilds a function node of the same kind around a new argument
    pub fn with_function_argument(&self, arg: Expr) -> Expr {
        let arg = Box::new(arg);
        match self {
            Expr::Exp(_) => Expr::Exp(arg),
            Expr::Ln(_) => Expr::Ln(arg),
            Expr::sin(_) => Expr::sin(arg),
            Expr::cos(_) => Expr::cos(arg),
            Expr::tg(_) => Expr::tg(arg),
            Expr::ctg(_) => Expr::ctg(arg),
            Expr::arcsin(_) => Expr::arcsin(arg),
            Expr::arccos(_) => Expr::arccos(arg),
            Expr::arctg(_) => Expr::arctg(arg),
            Expr::sqrt(_) => Expr::sqrt(arg),
            Expr::abs(_) => Expr::abs(arg),
            _ => self.clone(),
        }
    }
}

fn write_child(f: &mut fmt::Formatter, child: &Expr, parens: bool) -> fmt::Result {
    if parens {
        write!(f, "({})", child)
    } else {
        write!(f, "{}", child)
    }
}

/// Display implementation printing the canonical expression string.
///
/// Parentheses are only emitted where the parser would otherwise build a different tree, so
/// `Expr::parse_expression(&e.to_string())` gives back `e`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Add(lhs, rhs) | Expr::Sub(lhs, rhs) => {
                let op = if matches!(self, Expr::Add(..)) { "+" } else { "-" };
                write_child(f, lhs, lhs.precedence() < PREC_SUM)?;
                write!(f, " {} ", op)?;
                write_child(f, rhs, rhs.precedence() <= PREC_SUM)
            }
            Expr::Mul(lhs, rhs) if **lhs == Expr::Const(-1.0) => {
                write!(f, "-")?;
                write_child(f, rhs, rhs.precedence() < PREC_UNARY)
            }
            Expr::Mul(lhs, rhs) | Expr::Div(lhs, rhs) => {
                let op = if matches!(self, Expr::Mul(..)) { "*" } else { "/" };
                write_child(f, lhs, lhs.precedence() < PREC_PRODUCT)?;
                write!(f, "{}", op)?;
                write_child(f, rhs, rhs.precedence() <= PREC_PRODUCT)
            }
            Expr::Pow(base, exp) => {
                write_child(f, base, base.precedence() <= PREC_POWER)?;
                write!(f, "**")?;
                write_child(f, exp, exp.precedence() < PREC_UNARY)
            }
            other => match (other.function_name(), other.function_argument()) {
                (Some(name), Some(arg)) => write!(f, "{}({})", name, arg),
                _ => unreachable!("every remaining variant is a one-argument function"),
            },
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Expr::Const(c) => Expr::Const(-c),
            other => Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(other)),
        }
    }
}

impl Expr {
    /// BASIC FEATURES

    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    pub fn var(name: &str) -> Expr {
        Expr::Var(name.to_string())
    }

    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(c) if *c == 0.0)
    }

    /// Substitutes a variable with a constant value throughout the expression.
    pub fn set_variable(&self, var: &str, value: f64) -> Expr {
        self.substitute_variable(var, &Expr::Const(value))
    }

    /// Substitutes multiple variables with constant values using a HashMap.
    /// Only variables present in the map are substituted.
    pub fn set_variable_from_map(&self, var_map: &HashMap<String, f64>) -> Expr {
        match self {
            Expr::Var(name) => match var_map.get(name) {
                Some(value) => Expr::Const(*value),
                None => self.clone(),
            },
            Expr::Const(_) => self.clone(),
            _ => self.map_children(|child| child.set_variable_from_map(var_map)),
        }
    }

    /// Replaces every occurrence of a variable with an expression.
    pub fn substitute_variable(&self, var: &str, expr: &Expr) -> Expr {
        match self {
            Expr::Var(name) if name == var => expr.clone(),
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            _ => self.map_children(|child| child.substitute_variable(var, expr)),
        }
    }

    /// Applies `f` to the direct children of a node and rebuilds the node.
    pub fn map_children<F: Fn(&Expr) -> Expr>(&self, f: F) -> Expr {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => Expr::Add(Box::new(f(lhs)), Box::new(f(rhs))),
            Expr::Sub(lhs, rhs) => Expr::Sub(Box::new(f(lhs)), Box::new(f(rhs))),
            Expr::Mul(lhs, rhs) => Expr::Mul(Box::new(f(lhs)), Box::new(f(rhs))),
            Expr::Div(lhs, rhs) => Expr::Div(Box::new(f(lhs)), Box::new(f(rhs))),
            Expr::Pow(base, exp) => Expr::Pow(Box::new(f(base)), Box::new(f(exp))),
            other => match other.function_argument() {
                Some(arg) => other.with_function_argument(f(arg)),
                None => other.clone(),
            },
        }
    }

    /// true if the variable occurs anywhere in the expression
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                lhs.contains_variable(var_name) || rhs.contains_variable(var_name)
            }
            other => other
                .function_argument()
                .is_some_and(|arg| arg.contains_variable(var_name)),
        }
    }

    fn collect_variables(&self, acc: &mut BTreeSet<String>) {
        match self {
            Expr::Var(name) => {
                acc.insert(name.clone());
            }
            Expr::Const(_) => {}
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                lhs.collect_variables(acc);
                rhs.collect_variables(acc);
            }
            other => {
                if let Some(arg) = other.function_argument() {
                    arg.collect_variables(acc);
                }
            }
        }
    }

    /// Sorted, de-duplicated names of all free variables.
    pub fn variables(&self) -> Vec<String> {
        let mut acc = BTreeSet::new();
        self.collect_variables(&mut acc);
        acc.into_iter().collect()
    }

    /// number of nodes in the tree
    pub fn size(&self) -> usize {
        match self {
            Expr::Var(_) | Expr::Const(_) => 1,
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => 1 + lhs.size() + rhs.size(),
            other => 1 + other.function_argument().map_or(0, Expr::size),
        }
    }
}
