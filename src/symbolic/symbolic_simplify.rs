//! # Symbolic Expression Simplification Module
//!
//! Bottom-up simplification of [`Expr`] trees: children are simplified first, then one set of
//! local rules is applied to the rebuilt node.
//!
//! ## Rules
//!
//! 1. **Constant Folding**: `2 + 3 = 5`, `2**3 = 8` (results that are not finite are left alone)
//! 2. **Algebraic Identities**: `x + 0 = x`, `x*1 = x`, `x*0 = 0`, `x/1 = x`, `x**1 = x`, `x**0 = 1`
//! 3. **Signs**: `-(-x) = x`, `a + (-b) = a - b`, `a - (-b) = a + b`
//! 4. **Products**: constants move to the front and are merged, `x*x = x**2`, `x**a*x**b = x**(a+b)`
//! 5. **Elementary functions**: exact values only (`sin(0) = 0`, `exp(0) = 1`, `log(1) = 0`)
//!
//! Like-term collection of polynomials lives in
//! [`Polynomial`](crate::symbolic::polynomial::Polynomial); `expand(var)` gives the collected form.

use crate::symbolic::symbolic_engine::Expr;

fn is_const(expr: &Expr, value: f64) -> bool {
    matches!(expr, Expr::Const(c) if *c == value)
}

fn is_minus_one_times(expr: &Expr) -> Option<&Expr> {
    match expr {
        Expr::Mul(lhs, rhs) if is_const(lhs, -1.0) => Some(rhs),
        _ => None,
    }
}

/// base and exponent of a factor, `x` counts as `x**1`
fn base_and_exponent(expr: &Expr) -> (Expr, Expr) {
    match expr {
        Expr::Pow(base, exp) => ((**base).clone(), (**exp).clone()),
        other => (other.clone(), Expr::Const(1.0)),
    }
}

fn is_integer(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0
}

impl Expr {
    //___________________________________SIMPLIFICATION____________________________________

    /// Simplifies expressions by evaluating constant arithmetic operations only.
    ///
    /// - `Const(2) + Const(3)` → `Const(5)`
    /// - `x + Const(2) + Const(3)` → unchanged, the sum is left associative
    pub fn simplify_numbers(&self) -> Expr {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => match (lhs.simplify_numbers(), rhs.simplify_numbers()) {
                (Expr::Const(a), Expr::Const(b)) => Expr::Const(a + b),
                (lhs, rhs) => Expr::Add(Box::new(lhs), Box::new(rhs)),
            },
            Expr::Sub(lhs, rhs) => match (lhs.simplify_numbers(), rhs.simplify_numbers()) {
                (Expr::Const(a), Expr::Const(b)) => Expr::Const(a - b),
                (lhs, rhs) => Expr::Sub(Box::new(lhs), Box::new(rhs)),
            },
            Expr::Mul(lhs, rhs) => match (lhs.simplify_numbers(), rhs.simplify_numbers()) {
                (Expr::Const(a), Expr::Const(b)) => Expr::Const(a * b),
                (lhs, rhs) => Expr::Mul(Box::new(lhs), Box::new(rhs)),
            },
            Expr::Div(lhs, rhs) => match (lhs.simplify_numbers(), rhs.simplify_numbers()) {
                (Expr::Const(a), Expr::Const(b)) if b != 0.0 => Expr::Const(a / b),
                (lhs, rhs) => Expr::Div(Box::new(lhs), Box::new(rhs)),
            },
            _ => self.map_children(Expr::simplify_numbers),
        }
    }

    /// Algebraic simplification: constant folding plus the identities listed in the module docs.
    ///
    /// # Examples
    /// ```
    /// use RustedMathForm::symbolic::symbolic_engine::Expr;
    /// let e = Expr::parse_expression("0 + 1*x**1 - (-3)").unwrap();
    /// assert_eq!(e.simplify().to_string(), "x + 3");
    /// ```
    pub fn simplify(&self) -> Expr {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => simplify_add(lhs.simplify(), rhs.simplify()),
            Expr::Sub(lhs, rhs) => simplify_sub(lhs.simplify(), rhs.simplify()),
            Expr::Mul(lhs, rhs) => simplify_mul(lhs.simplify(), rhs.simplify()),
            Expr::Div(lhs, rhs) => simplify_div(lhs.simplify(), rhs.simplify()),
            Expr::Pow(base, exp) => simplify_pow(base.simplify(), exp.simplify()),
            other => match other.function_argument() {
                Some(arg) => simplify_function(other.with_function_argument(arg.simplify())),
                None => other.clone(),
            },
        }
    }
}

fn simplify_add(lhs: Expr, rhs: Expr) -> Expr {
    match (&lhs, &rhs) {
        (Expr::Const(a), Expr::Const(b)) => Expr::Const(a + b),
        (Expr::Const(a), _) if *a == 0.0 => rhs,
        (_, Expr::Const(b)) if *b == 0.0 => lhs,
        // a + (-c) = a - c
        (_, Expr::Const(b)) if *b < 0.0 => Expr::Sub(Box::new(lhs), Box::new(Expr::Const(-b))),
        // constants go last: 2 + x = x + 2
        (Expr::Const(_), _) => simplify_add(rhs, lhs),
        (_, Expr::Mul(..)) if is_minus_one_times(&rhs).is_some() => {
            let negated = is_minus_one_times(&rhs).cloned().unwrap_or_else(|| rhs.clone());
            simplify_sub(lhs, negated)
        }
        _ if lhs == rhs => simplify_mul(Expr::Const(2.0), lhs),
        _ => Expr::Add(Box::new(lhs), Box::new(rhs)),
    }
}

fn simplify_sub(lhs: Expr, rhs: Expr) -> Expr {
    match (&lhs, &rhs) {
        (Expr::Const(a), Expr::Const(b)) => Expr::Const(a - b),
        (_, Expr::Const(b)) if *b == 0.0 => lhs,
        (Expr::Const(a), _) if *a == 0.0 => simplify_mul(Expr::Const(-1.0), rhs),
        // a - (-c) = a + c
        (_, Expr::Const(b)) if *b < 0.0 => Expr::Add(Box::new(lhs), Box::new(Expr::Const(-b))),
        (_, Expr::Mul(..)) if is_minus_one_times(&rhs).is_some() => {
            let negated = is_minus_one_times(&rhs).cloned().unwrap_or_else(|| rhs.clone());
            simplify_add(lhs, negated)
        }
        _ if lhs == rhs => Expr::Const(0.0),
        _ => Expr::Sub(Box::new(lhs), Box::new(rhs)),
    }
}

fn simplify_mul(lhs: Expr, rhs: Expr) -> Expr {
    match (&lhs, &rhs) {
        (Expr::Const(a), Expr::Const(b)) => Expr::Const(a * b),
        (Expr::Const(a), _) | (_, Expr::Const(a)) if *a == 0.0 => Expr::Const(0.0),
        (Expr::Const(a), _) if *a == 1.0 => rhs,
        (_, Expr::Const(b)) if *b == 1.0 => lhs,
        // constants go first: x*2 = 2*x
        (_, Expr::Const(_)) => simplify_mul(rhs, lhs),
        // (a*(b*x)) = (a*b)*x
        (Expr::Const(a), Expr::Mul(inner_lhs, inner_rhs)) => match inner_lhs.as_ref() {
            Expr::Const(b) => simplify_mul(Expr::Const(a * b), (**inner_rhs).clone()),
            _ => Expr::Mul(Box::new(lhs), Box::new(rhs)),
        },
        // (a*x)*y = a*(x*y)
        (Expr::Mul(inner_lhs, inner_rhs), _) if matches!(inner_lhs.as_ref(), Expr::Const(_)) => {
            simplify_mul(
                (**inner_lhs).clone(),
                simplify_mul((**inner_rhs).clone(), rhs),
            )
        }
        // x*(a*y) = a*(x*y)
        (_, Expr::Mul(inner_lhs, inner_rhs)) if matches!(inner_lhs.as_ref(), Expr::Const(_)) => {
            simplify_mul(
                (**inner_lhs).clone(),
                simplify_mul(lhs.clone(), (**inner_rhs).clone()),
            )
        }
        (Expr::Const(_), _) => Expr::Mul(Box::new(lhs), Box::new(rhs)),
        _ => {
            // x**a * x**b = x**(a+b)
            let (base_l, exp_l) = base_and_exponent(&lhs);
            let (base_r, exp_r) = base_and_exponent(&rhs);
            if base_l == base_r {
                simplify_pow(base_l, simplify_add(exp_l, exp_r))
            } else {
                Expr::Mul(Box::new(lhs), Box::new(rhs))
            }
        }
    }
}

fn simplify_div(lhs: Expr, rhs: Expr) -> Expr {
    match (&lhs, &rhs) {
        (Expr::Const(a), Expr::Const(b)) if *b != 0.0 => Expr::Const(a / b),
        (_, Expr::Const(b)) if *b == 0.0 => Expr::Div(Box::new(lhs), Box::new(rhs)),
        (Expr::Const(a), _) if *a == 0.0 => Expr::Const(0.0),
        (_, Expr::Const(b)) if *b == 1.0 => lhs,
        _ if lhs == rhs => Expr::Const(1.0),
        _ => Expr::Div(Box::new(lhs), Box::new(rhs)),
    }
}

fn simplify_pow(base: Expr, exp: Expr) -> Expr {
    match (&base, &exp) {
        (Expr::Const(a), Expr::Const(b)) if a.powf(*b).is_finite() => Expr::Const(a.powf(*b)),
        (_, Expr::Const(b)) if *b == 0.0 => Expr::Const(1.0),
        (_, Expr::Const(b)) if *b == 1.0 => base,
        (Expr::Const(a), _) if *a == 1.0 => Expr::Const(1.0),
        // (x**a)**b = x**(a*b), only for integer a and b
        (Expr::Pow(inner_base, inner_exp), Expr::Const(b)) if is_integer(*b) => {
            match inner_exp.as_ref() {
                Expr::Const(a) if is_integer(*a) => {
                    simplify_pow((**inner_base).clone(), Expr::Const(a * b))
                }
                _ => Expr::Pow(Box::new(base), Box::new(exp)),
            }
        }
        _ => Expr::Pow(Box::new(base), Box::new(exp)),
    }
}

fn simplify_function(expr: Expr) -> Expr {
    let exact = match (&expr, expr.function_argument()) {
        (Expr::Exp(_), Some(Expr::Const(a))) if *a == 0.0 => Some(1.0),
        (Expr::Ln(_), Some(Expr::Const(a))) if *a == 1.0 => Some(0.0),
        (Expr::sin(_) | Expr::tg(_) | Expr::arcsin(_) | Expr::arctg(_), Some(Expr::Const(a)))
            if *a == 0.0 =>
        {
            Some(0.0)
        }
        (Expr::cos(_), Some(Expr::Const(a))) if *a == 0.0 => Some(1.0),
        (Expr::arccos(_), Some(Expr::Const(a))) if *a == 1.0 => Some(0.0),
        (Expr::sqrt(_), Some(Expr::Const(a))) if *a == 0.0 || *a == 1.0 => Some(*a),
        (Expr::abs(_), Some(Expr::Const(a))) => Some(a.abs()),
        _ => None,
    };
    match exact {
        Some(value) => Expr::Const(value),
        None => expr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(input: &str) -> String {
        Expr::parse_expression(input).unwrap().simplify().to_string()
    }

    #[test]
    fn test_simplify_numbers() {
        let e = Expr::parse_expression("(2 + 3)*x + 4/2").unwrap();
        assert_eq!(e.simplify_numbers().to_string(), "5*x + 2");
    }

    #[test]
    fn test_additive_identities() {
        assert_eq!(s("x + 0"), "x");
        assert_eq!(s("0 + x"), "x");
        assert_eq!(s("x - 0"), "x");
        assert_eq!(s("x - x"), "0");
        assert_eq!(s("x + x"), "2*x");
    }

    #[test]
    fn test_multiplicative_identities() {
        assert_eq!(s("1*x"), "x");
        assert_eq!(s("x*1"), "x");
        assert_eq!(s("x*0"), "0");
        assert_eq!(s("0*sin(x)"), "0");
        assert_eq!(s("x/1"), "x");
        assert_eq!(s("x/x"), "1");
    }

    #[test]
    fn test_powers() {
        assert_eq!(s("x**1"), "x");
        assert_eq!(s("x**0"), "1");
        assert_eq!(s("1**x"), "1");
        assert_eq!(s("2**3"), "8");
        assert_eq!(s("x*x"), "x**2");
        assert_eq!(s("x**2*x**3"), "x**5");
        assert_eq!(s("(x**2)**3"), "x**6");
    }

    #[test]
    fn test_signs() {
        assert_eq!(s("-(-x)"), "x");
        assert_eq!(s("x + (-2)"), "x - 2");
        assert_eq!(s("x - (-2)"), "x + 2");
        assert_eq!(s("x + -y"), "x - y");
        assert_eq!(s("0 - x"), "-x");
    }

    #[test]
    fn test_constants_are_collected() {
        assert_eq!(s("x*3"), "3*x");
        assert_eq!(s("2*(3*x)"), "6*x");
        assert_eq!(s("(2*x)*3"), "6*x");
        assert_eq!(s("2 + x"), "x + 2");
    }

    #[test]
    fn test_exact_function_values() {
        assert_eq!(s("sin(0) + cos(0)"), "1");
        assert_eq!(s("exp(0)*log(1)"), "0");
        assert_eq!(s("abs(-4)"), "4");
        // no floating point approximation of sqrt(2)
        assert_eq!(s("sqrt(2)"), "sqrt(2)");
    }

    #[test]
    fn test_division_by_zero_is_not_folded() {
        assert_eq!(s("1/0"), "1/0");
    }

    #[test]
    fn test_simplify_keeps_value() {
        let e = Expr::parse_expression("(x + 0)*(1*x) - 3*x/1 + 2**2").unwrap();
        let simplified = e.simplify();
        for x in [-3.0, 0.5, 7.0] {
            assert!((e.eval("x", x) - simplified.eval("x", x)).abs() < 1e-12);
        }
    }
}
