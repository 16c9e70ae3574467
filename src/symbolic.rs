#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// rewrites math the way students type it into the canonical expression string
///
///# Example
/// ```
/// use RustedMathForm::symbolic::notation::normalize;
/// use RustedMathForm::symbolic::symbolic_engine::Expr;
/// let canonical = normalize("2x^2 + 3x - 5");
/// assert_eq!(canonical, "2*x**2+3*x-5");
/// let parsed_expression = Expr::parse_expression(&canonical).unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod notation;
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use RustedMathForm::symbolic::symbolic_engine::Expr;
/// let input = "x^2.3* log(x+y+y^2.6)";
/// let parsed_expression = Expr::parse_expression(input).unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// assert_eq!(parsed_expression.variables(), vec!["x", "y"]);
///  ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) holds the expression tree every stage works on
/// 2) turns a symbolic expression into a Rust function
/// 3) turns a symbolic expression into a canonical string for printing and control results
///# Example#
/// ```
/// use RustedMathForm::symbolic::symbolic_engine::Expr;
/// let input = "exp(x)+log(x)";
/// let parsed_expression = Expr::parse_expression(input).unwrap();
/// // derivative, simplified
/// let df = parsed_expression.diff("x").simplify();
/// println!("d/dx {} = {}", parsed_expression, df);
/// // compiled for sampling
/// let f = df.lambdify1D("x");
/// println!("f'(1) = {}", f(1.0));
/// ```
pub mod symbolic_engine;
pub mod symbolic_engine_derivatives;
#[cfg(test)]
mod symbolic_engine_tests;
pub mod symbolic_lambdify;
pub mod symbolic_simplify;
/// polynomial coefficients, roots, expansion and factorization
///# Example
/// ```
/// use RustedMathForm::symbolic::symbolic_engine::Expr;
/// let e = Expr::parse_expression("x**3 - 6*x**2 + 11*x - 6").unwrap();
/// let p = e.as_polynomial("x").unwrap();
/// println!("roots {:?}", p.real_roots(1e-9));
/// println!("factored {}", p.factor());
/// ```
pub mod polynomial;
pub mod utils;
