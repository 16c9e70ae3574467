use crate::symbolic::symbolic_engine::Expr;

impl Expr {
    /// LAMBDIFICATION - Converting Symbolic Expressions to Executable Functions

    /// Converts a single-variable symbolic expression into an executable Rust closure.
    ///
    /// The expression tree is walked once and turned into nested closures, so the result can be
    /// called repeatedly over a sampling grid without re-interpreting the tree. Domain errors
    /// follow IEEE semantics: `sqrt(-1)` is NaN, `1/0` is inf, nothing panics.
    /// Variables other than `var` evaluate to NaN.
    ///
    /// # Examples
    /// ```
    /// use RustedMathForm::symbolic::symbolic_engine::Expr;
    /// let f = Expr::parse_expression("x**2 + 1").unwrap().lambdify1D("x");
    /// assert_eq!(f(3.0), 10.0);
    /// assert!(Expr::parse_expression("sqrt(x)").unwrap().lambdify1D("x")(-1.0).is_nan());
    /// ```
    pub fn lambdify1D(&self, var: &str) -> Box<dyn Fn(f64) -> f64> {
        match self {
            Expr::Var(name) => {
                if name == var {
                    Box::new(|x| x)
                } else {
                    Box::new(|_| f64::NAN)
                }
            }
            Expr::Const(val) => {
                let val = *val;
                Box::new(move |_| val)
            }
            Expr::Add(lhs, rhs) => {
                let lhs_fn = lhs.lambdify1D(var);
                let rhs_fn = rhs.lambdify1D(var);
                Box::new(move |x| lhs_fn(x) + rhs_fn(x))
            }
            Expr::Sub(lhs, rhs) => {
                let lhs_fn = lhs.lambdify1D(var);
                let rhs_fn = rhs.lambdify1D(var);
                Box::new(move |x| lhs_fn(x) - rhs_fn(x))
            }
            Expr::Mul(lhs, rhs) => {
                let lhs_fn = lhs.lambdify1D(var);
                let rhs_fn = rhs.lambdify1D(var);
                Box::new(move |x| lhs_fn(x) * rhs_fn(x))
            }
            Expr::Div(lhs, rhs) => {
                let lhs_fn = lhs.lambdify1D(var);
                let rhs_fn = rhs.lambdify1D(var);
                Box::new(move |x| lhs_fn(x) / rhs_fn(x))
            }
            Expr::Pow(base, exp) => {
                let base_fn = base.lambdify1D(var);
                // integer exponents keep negative bases defined
                match exp.as_ref() {
                    Expr::Const(n) if n.fract() == 0.0 && n.abs() <= i32::MAX as f64 => {
                        let n = *n as i32;
                        Box::new(move |x| base_fn(x).powi(n))
                    }
                    _ => {
                        let exp_fn = exp.lambdify1D(var);
                        Box::new(move |x| base_fn(x).powf(exp_fn(x)))
                    }
                }
            }
            Expr::Exp(expr) => {
                let expr_fn = expr.lambdify1D(var);
                Box::new(move |x| expr_fn(x).exp())
            }
            Expr::Ln(expr) => {
                let expr_fn = expr.lambdify1D(var);
                Box::new(move |x| expr_fn(x).ln())
            }
            Expr::sin(expr) => {
                let expr_fn = expr.lambdify1D(var);
                Box::new(move |x| expr_fn(x).sin())
            }
            Expr::cos(expr) => {
                let expr_fn = expr.lambdify1D(var);
                Box::new(move |x| expr_fn(x).cos())
            }
            Expr::tg(expr) => {
                let expr_fn = expr.lambdify1D(var);
                Box::new(move |x| expr_fn(x).tan())
            }
            Expr::ctg(expr) => {
                let expr_fn = expr.lambdify1D(var);
                Box::new(move |x| 1.0 / expr_fn(x).tan())
            }
            Expr::arcsin(expr) => {
                let expr_fn = expr.lambdify1D(var);
                Box::new(move |x| expr_fn(x).asin())
            }
            Expr::arccos(expr) => {
                let expr_fn = expr.lambdify1D(var);
                Box::new(move |x| expr_fn(x).acos())
            }
            Expr::arctg(expr) => {
                let expr_fn = expr.lambdify1D(var);
                Box::new(move |x| expr_fn(x).atan())
            }
            Expr::sqrt(expr) => {
                let expr_fn = expr.lambdify1D(var);
                Box::new(move |x| expr_fn(x).sqrt())
            }
            Expr::abs(expr) => {
                let expr_fn = expr.lambdify1D(var);
                Box::new(move |x| expr_fn(x).abs())
            }
        }
    } // end of lambdify1D

    /// Direct evaluation at one point without building closures.
    pub fn eval(&self, var: &str, x: f64) -> f64 {
        match self {
            Expr::Var(name) => {
                if name == var {
                    x
                } else {
                    f64::NAN
                }
            }
            Expr::Const(val) => *val,
            Expr::Add(lhs, rhs) => lhs.eval(var, x) + rhs.eval(var, x),
            Expr::Sub(lhs, rhs) => lhs.eval(var, x) - rhs.eval(var, x),
            Expr::Mul(lhs, rhs) => lhs.eval(var, x) * rhs.eval(var, x),
            Expr::Div(lhs, rhs) => lhs.eval(var, x) / rhs.eval(var, x),
            Expr::Pow(base, exp) => match exp.as_ref() {
                Expr::Const(n) if n.fract() == 0.0 && n.abs() <= i32::MAX as f64 => {
                    base.eval(var, x).powi(*n as i32)
                }
                _ => base.eval(var, x).powf(exp.eval(var, x)),
            },
            Expr::Exp(expr) => expr.eval(var, x).exp(),
            Expr::Ln(expr) => expr.eval(var, x).ln(),
            Expr::sin(expr) => expr.eval(var, x).sin(),
            Expr::cos(expr) => expr.eval(var, x).cos(),
            Expr::tg(expr) => expr.eval(var, x).tan(),
            Expr::ctg(expr) => 1.0 / expr.eval(var, x).tan(),
            Expr::arcsin(expr) => expr.eval(var, x).asin(),
            Expr::arccos(expr) => expr.eval(var, x).acos(),
            Expr::arctg(expr) => expr.eval(var, x).atan(),
            Expr::sqrt(expr) => expr.eval(var, x).sqrt(),
            Expr::abs(expr) => expr.eval(var, x).abs(),
        }
    }

    /// Value of an expression without free variables, `None` otherwise.
    pub fn eval_constant(&self) -> Option<f64> {
        if self.variables().is_empty() {
            Some(self.eval("", 0.0))
        } else {
            None
        }
    }
}
