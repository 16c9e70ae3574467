//! # Polynomials in one variable
//!
//! Coefficient extraction from an [`Expr`], closed-form and iterative root finding, expansion
//! and factorization over the reals. The equation solver dispatches on [`Polynomial::degree`]:
//! linear and quadratic equations get closed forms, higher degrees the Durand–Kerner iteration.
//!
//! # Examples
//! ```
//! use RustedMathForm::symbolic::symbolic_engine::Expr;
//! let e = Expr::parse_expression("(x - 1)*(x - 3)").unwrap();
//! let p = e.as_polynomial("x").unwrap();
//! assert_eq!(p.coeffs(), &[3.0, -4.0, 1.0]);
//! assert_eq!(p.to_expr().to_string(), "x**2 - 4*x + 3");
//! ```
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::snap_to_integer;
use num_complex::Complex64;

/// exponents above this are not expanded
const MAX_EXPANDED_DEGREE: usize = 64;

/// Polynomial in one variable, coefficients in ascending order (`coeffs[i]` multiplies `var**i`).
/// Trailing zero coefficients are trimmed, the zero polynomial has no coefficients.
#[derive(Clone, Debug, PartialEq)]
pub struct Polynomial {
    var: String,
    coeffs: Vec<f64>,
}

impl Polynomial {
    pub fn new(var: &str, mut coeffs: Vec<f64>) -> Self {
        while coeffs.last().is_some_and(|c| *c == 0.0) {
            coeffs.pop();
        }
        Polynomial {
            var: var.to_string(),
            coeffs,
        }
    }

    pub fn constant(var: &str, value: f64) -> Self {
        Polynomial::new(var, vec![value])
    }

    pub fn var(&self) -> &str {
        &self.var
    }

    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// degree, 0 for constants and for the zero polynomial
    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    pub fn leading_coefficient(&self) -> f64 {
        self.coeffs.last().copied().unwrap_or(0.0)
    }

    /// coefficient of `var**power`
    pub fn coeff(&self, power: usize) -> f64 {
        self.coeffs.get(power).copied().unwrap_or(0.0)
    }

    /// Horner evaluation
    pub fn eval(&self, x: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c)
    }

    pub fn eval_complex(&self, z: Complex64) -> Complex64 {
        self.coeffs
            .iter()
            .rev()
            .fold(Complex64::new(0.0, 0.0), |acc, c| acc * z + *c)
    }

    pub fn derivative(&self) -> Polynomial {
        let coeffs = self
            .coeffs
            .iter()
            .enumerate()
            .skip(1)
            .map(|(power, c)| power as f64 * c)
            .collect();
        Polynomial::new(&self.var, coeffs)
    }

    fn add(&self, other: &Polynomial) -> Polynomial {
        let len = self.coeffs.len().max(other.coeffs.len());
        let coeffs = (0..len).map(|i| self.coeff(i) + other.coeff(i)).collect();
        Polynomial::new(&self.var, coeffs)
    }

    fn scale(&self, factor: f64) -> Polynomial {
        Polynomial::new(&self.var, self.coeffs.iter().map(|c| c * factor).collect())
    }

    fn mul(&self, other: &Polynomial) -> Polynomial {
        if self.is_zero() || other.is_zero() {
            return Polynomial::new(&self.var, Vec::new());
        }
        let mut coeffs = vec![0.0; self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in other.coeffs.iter().enumerate() {
                coeffs[i + j] += a * b;
            }
        }
        Polynomial::new(&self.var, coeffs)
    }

    fn powi(&self, n: usize) -> Polynomial {
        let mut result = Polynomial::constant(&self.var, 1.0);
        for _ in 0..n {
            result = result.mul(self);
        }
        result
    }

    /// Expanded expression in descending powers: `2*x**2 + 3*x - 5`.
    pub fn to_expr(&self) -> Expr {
        let x = Expr::var(&self.var);
        let mut acc: Option<Expr> = None;
        for (power, c) in self.coeffs.iter().enumerate().rev() {
            let c = snap_to_integer(*c);
            if c == 0.0 {
                continue;
            }
            let monomial = match power {
                0 => None,
                1 => Some(x.clone()),
                _ => Some(x.clone().pow(Expr::Const(power as f64))),
            };
            acc = Some(match (acc, monomial) {
                (None, None) => Expr::Const(c),
                (None, Some(m)) if c == 1.0 => m,
                (None, Some(m)) if c == -1.0 => -m,
                (None, Some(m)) => Expr::Const(c) * m,
                (Some(sum), m) => {
                    let magnitude = match m {
                        None => Expr::Const(c.abs()),
                        Some(m) if c.abs() == 1.0 => m,
                        Some(m) => Expr::Const(c.abs()) * m,
                    };
                    if c > 0.0 { sum + magnitude } else { sum - magnitude }
                }
            });
        }
        acc.unwrap_or(Expr::Const(0.0))
    }

    /// Roots of a quadratic `a*x**2 + b*x + c` using the cancellation-free form of the formula.
    /// A negative discriminant gives a complex conjugate pair.
    pub fn quadratic_roots(a: f64, b: f64, c: f64) -> [Complex64; 2] {
        let discriminant = b * b - 4.0 * a * c;
        if discriminant >= 0.0 {
            let sign = if b < 0.0 { -1.0 } else { 1.0 };
            let q = -0.5 * (b + sign * discriminant.sqrt());
            if q == 0.0 {
                return [Complex64::new(0.0, 0.0); 2];
            }
            [Complex64::new(q / a, 0.0), Complex64::new(c / q, 0.0)]
        } else {
            let re = -b / (2.0 * a);
            let im = (-discriminant).sqrt() / (2.0 * a).abs();
            [Complex64::new(re, -im), Complex64::new(re, im)]
        }
    }

    pub fn discriminant(&self) -> Option<f64> {
        match self.degree() {
            2 => Some(self.coeff(1).powi(2) - 4.0 * self.coeff(2) * self.coeff(0)),
            _ => None,
        }
    }

    /// All complex roots with multiplicity: closed forms up to degree 2, Durand–Kerner above.
    pub fn roots(&self) -> Vec<Complex64> {
        match self.degree() {
            0 => Vec::new(),
            1 => vec![Complex64::new(-self.coeff(0) / self.coeff(1), 0.0)],
            2 => Polynomial::quadratic_roots(self.coeff(2), self.coeff(1), self.coeff(0)).to_vec(),
            _ => self.roots_iterative(1e-12, 500),
        }
    }

    /// Durand–Kerner (Weierstrass) simultaneous iteration followed by Newton polishing.
    ///
    /// Roots at zero are split off exactly before iterating. Works for any degree >= 1; used by
    /// `roots()` above degree 2 and by the general solve routine for every degree.
    pub fn roots_iterative(&self, tolerance: f64, max_iterations: usize) -> Vec<Complex64> {
        let zero_roots = self.coeffs.iter().take_while(|c| **c == 0.0).count();
        let reduced = Polynomial::new(&self.var, self.coeffs[zero_roots..].to_vec());
        let mut roots = vec![Complex64::new(0.0, 0.0); zero_roots];
        let n = reduced.degree();
        if n == 0 {
            return roots;
        }
        let monic = reduced.scale(1.0 / reduced.leading_coefficient());
        let seed = Complex64::new(0.4, 0.9);
        let mut z: Vec<Complex64> = (0..n).map(|k| seed.powu(k as u32)).collect();
        for _ in 0..max_iterations {
            let mut max_step: f64 = 0.0;
            for i in 0..n {
                let mut denominator = Complex64::new(1.0, 0.0);
                for j in 0..n {
                    if i != j {
                        denominator *= z[i] - z[j];
                    }
                }
                if denominator.norm() == 0.0 {
                    // coincident estimates, nudge apart
                    z[i] += Complex64::new(tolerance.sqrt(), tolerance.sqrt());
                    max_step = f64::INFINITY;
                    continue;
                }
                let step = monic.eval_complex(z[i]) / denominator;
                z[i] -= step;
                max_step = max_step.max(step.norm());
            }
            if max_step < tolerance {
                break;
            }
        }
        let derivative = monic.derivative();
        for root in z.iter_mut() {
            for _ in 0..3 {
                let slope = derivative.eval_complex(*root);
                if slope.norm() == 0.0 {
                    break;
                }
                let step = monic.eval_complex(*root) / slope;
                if !step.re.is_finite() || !step.im.is_finite() {
                    break;
                }
                *root -= step;
            }
        }
        roots.extend(monic.merge_repeated(z));
        roots
    }

    /// Estimates of an m-fold root only reach about eps^(1/m) and come out as a small ring
    /// around it. Neighbouring estimates are grouped, the group mean is polished on the
    /// (m-1)-th derivative, and it is kept as an m-fold root if the polynomial vanishes there
    /// up to rounding error. Otherwise the group is left as it was.
    fn merge_repeated(&self, estimates: Vec<Complex64>) -> Vec<Complex64> {
        let n = estimates.len();
        if n < 2 {
            return estimates;
        }
        let radius = (f64::EPSILON.powf(1.0 / n as f64) * 100.0).min(0.05);
        let mut assigned = vec![false; n];
        let mut merged = Vec::with_capacity(n);
        for i in 0..n {
            if assigned[i] {
                continue;
            }
            assigned[i] = true;
            let mut cluster = vec![i];
            let mut k = 0;
            while k < cluster.len() {
                let center = estimates[cluster[k]];
                for j in 0..n {
                    if !assigned[j]
                        && (estimates[j] - center).norm() <= radius * center.norm().max(1.0)
                    {
                        assigned[j] = true;
                        cluster.push(j);
                    }
                }
                k += 1;
            }
            let m = cluster.len();
            if m == 1 {
                merged.push(estimates[i]);
                continue;
            }
            let mean = cluster.iter().map(|&j| estimates[j]).sum::<Complex64>() / m as f64;
            let center = self.polish_multiple(mean, m);
            if self.vanishes_at(center) {
                merged.extend(std::iter::repeat_n(center, m));
            } else {
                merged.extend(cluster.iter().map(|&j| estimates[j]));
            }
        }
        merged
    }

    /// Newton on the (m-1)-th derivative, where an m-fold root is simple.
    fn polish_multiple(&self, start: Complex64, multiplicity: usize) -> Complex64 {
        let mut g = self.clone();
        for _ in 1..multiplicity {
            g = g.derivative();
        }
        let slope_poly = g.derivative();
        let mut z = start;
        for _ in 0..5 {
            let slope = slope_poly.eval_complex(z);
            if slope.norm() == 0.0 {
                break;
            }
            let step = g.eval_complex(z) / slope;
            if !step.re.is_finite() || !step.im.is_finite() {
                break;
            }
            z -= step;
        }
        z
    }

    /// |p(z)| within the rounding bound of Horner evaluation
    fn vanishes_at(&self, z: Complex64) -> bool {
        let r = z.norm();
        let bound: f64 = self
            .coeffs
            .iter()
            .enumerate()
            .map(|(i, c)| c.abs() * r.powi(i as i32))
            .sum();
        self.eval_complex(z).norm() <= 64.0 * self.coeffs.len() as f64 * f64::EPSILON * bound
    }

    /// Real roots sorted ascending; complex roots whose imaginary part is below `tolerance`
    /// count as real.
    pub fn real_roots(&self, tolerance: f64) -> Vec<f64> {
        let mut real: Vec<f64> = self
            .roots()
            .into_iter()
            .filter(|z| z.im.abs() <= tolerance * z.re.abs().max(1.0))
            .map(|z| snap_to_integer(z.re))
            .collect();
        real.sort_by(f64::total_cmp);
        real
    }

    /// Factorization over the reals: the leading coefficient times one linear factor per real
    /// root and one quadratic factor per complex conjugate pair. Repeated factors become powers.
    ///
    /// ```
    /// use RustedMathForm::symbolic::symbolic_engine::Expr;
    /// let p = Expr::parse_expression("2*x**2 - 2").unwrap().as_polynomial("x").unwrap();
    /// assert_eq!(p.factor().to_string(), "2*(x + 1)*(x - 1)");
    /// ```
    pub fn factor(&self) -> Expr {
        if self.degree() < 2 {
            return self.to_expr();
        }
        let tolerance = 1e-9;
        let x = Expr::var(&self.var);
        let mut factors: Vec<Expr> = Vec::new();
        let mut roots = self.roots();
        roots.sort_by(|a, b| a.re.total_cmp(&b.re).then(a.im.total_cmp(&b.im)));
        for root in roots.iter().filter(|z| z.im.abs() <= tolerance) {
            let r = snap_to_integer(root.re);
            factors.push(if r == 0.0 {
                x.clone()
            } else if r > 0.0 {
                x.clone() - Expr::Const(r)
            } else {
                x.clone() + Expr::Const(-r)
            });
        }
        // one quadratic per conjugate pair, taken from the root with positive imaginary part
        for root in roots.iter().filter(|z| z.im > tolerance) {
            let linear = snap_to_integer(-2.0 * root.re);
            let constant = snap_to_integer(root.norm_sqr());
            let quadratic = Polynomial::new(&self.var, vec![constant, linear, 1.0]);
            factors.push(quadratic.to_expr());
        }
        let mut grouped: Vec<(Expr, usize)> = Vec::new();
        for factor in factors {
            match grouped.iter_mut().find(|(f, _)| *f == factor) {
                Some((_, count)) => *count += 1,
                None => grouped.push((factor, 1)),
            }
        }
        let mut product: Vec<Expr> = grouped
            .into_iter()
            .map(|(f, count)| {
                if count == 1 {
                    f
                } else {
                    f.pow(Expr::Const(count as f64))
                }
            })
            .collect();
        let leading = snap_to_integer(self.leading_coefficient());
        if leading == -1.0 && !product.is_empty() {
            let first = product.remove(0);
            product.insert(0, -first);
        } else if leading != 1.0 {
            product.insert(0, Expr::Const(leading));
        }
        product
            .into_iter()
            .reduce(|acc, f| acc * f)
            .unwrap_or(Expr::Const(leading))
    }
}

impl Expr {
    /// Coefficients of the expression as a polynomial in `var`, `None` if it is not one
    /// (other free variables, `var` inside a function or a denominator, fractional or symbolic
    /// exponents).
    pub fn as_polynomial(&self, var: &str) -> Option<Polynomial> {
        if !self.contains_variable(var) {
            let value = self.eval_constant()?;
            return value
                .is_finite()
                .then(|| Polynomial::constant(var, value));
        }
        match self {
            Expr::Var(_) => Some(Polynomial::new(var, vec![0.0, 1.0])),
            Expr::Add(lhs, rhs) => Some(lhs.as_polynomial(var)?.add(&rhs.as_polynomial(var)?)),
            Expr::Sub(lhs, rhs) => Some(
                lhs.as_polynomial(var)?
                    .add(&rhs.as_polynomial(var)?.scale(-1.0)),
            ),
            Expr::Mul(lhs, rhs) => Some(lhs.as_polynomial(var)?.mul(&rhs.as_polynomial(var)?)),
            Expr::Div(lhs, rhs) => {
                let denominator = rhs.as_polynomial(var)?;
                if denominator.degree() > 0 || denominator.is_zero() {
                    return None;
                }
                Some(lhs.as_polynomial(var)?.scale(1.0 / denominator.coeff(0)))
            }
            Expr::Pow(base, exp) => {
                let n = exp.eval_constant()?;
                if n < 0.0 || n.fract() != 0.0 || n > MAX_EXPANDED_DEGREE as f64 {
                    return None;
                }
                Some(base.as_polynomial(var)?.powi(n as usize))
            }
            _ => None,
        }
    }

    /// polynomial degree in `var`, `None` for non-polynomial expressions
    pub fn degree(&self, var: &str) -> Option<usize> {
        self.as_polynomial(var).map(|p| p.degree())
    }

    /// expanded polynomial form with like terms collected, or the simplified expression when it
    /// is not a polynomial in `var`
    pub fn expand(&self, var: &str) -> Expr {
        match self.as_polynomial(var) {
            Some(p) => p.to_expr(),
            None => self.simplify(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn poly(input: &str) -> Option<Polynomial> {
        Expr::parse_expression(input).unwrap().as_polynomial("x")
    }

    #[test]
    fn test_coefficient_extraction() {
        let p = poly("2*x**2 + 3*x - 5").unwrap();
        assert_eq!(p.coeffs(), &[-5.0, 3.0, 2.0]);
        assert_eq!(p.degree(), 2);
        assert_eq!(poly("(x + 1)**3").unwrap().coeffs(), &[1.0, 3.0, 3.0, 1.0]);
        assert_eq!(poly("x/2").unwrap().coeffs(), &[0.0, 0.5]);
        assert_eq!(poly("x*x - x**2").unwrap().degree(), 0);
        assert!(poly("x*x - x**2").unwrap().is_zero());
    }

    #[test]
    fn test_constant_subtrees() {
        let p = poly("sin(0)*x + 2**3").unwrap();
        assert_eq!(p.coeffs(), &[8.0]);
    }

    #[test]
    fn test_not_polynomials() {
        assert!(poly("sin(x)").is_none());
        assert!(poly("1/x").is_none());
        assert!(poly("x**0.5").is_none());
        assert!(poly("x**-1").is_none());
        assert!(poly("x*y").is_none());
        assert!(poly("2**x").is_none());
    }

    #[test]
    fn test_expand_and_degree() {
        let e = Expr::parse_expression("(x + 1)*(x - 1) + 2*x").unwrap();
        assert_eq!(e.expand("x").to_string(), "x**2 + 2*x - 1");
        assert_eq!(e.degree("x"), Some(2));
        let e = Expr::parse_expression("-(x**3) + x").unwrap();
        assert_eq!(e.expand("x").to_string(), "-x**3 + x");
        assert_eq!(Expr::parse_expression("sin(x)").unwrap().degree("x"), None);
    }

    #[test]
    fn test_eval_and_derivative() {
        let p = poly("x**3 - 2*x + 1").unwrap();
        assert_relative_eq!(p.eval(2.0), 5.0);
        assert_eq!(p.derivative().coeffs(), &[-2.0, 0.0, 3.0]);
        let z = p.eval_complex(Complex64::new(0.0, 1.0));
        assert_relative_eq!(z.re, 1.0);
        assert_relative_eq!(z.im, -3.0);
    }

    #[test]
    fn test_quadratic_roots() {
        let roots = Polynomial::quadratic_roots(1.0, -4.0, 3.0);
        let mut re: Vec<f64> = roots.iter().map(|z| z.re).collect();
        re.sort_by(f64::total_cmp);
        assert_eq!(re, vec![1.0, 3.0]);
        let roots = Polynomial::quadratic_roots(1.0, 0.0, 1.0);
        assert_relative_eq!(roots[0].im, -1.0);
        assert_relative_eq!(roots[1].im, 1.0);
    }

    #[test]
    fn test_iterative_roots_match_quadratic_formula() {
        for input in ["x**2 - 4*x + 3", "x**2 + 2*x + 5", "3*x**2 - 7*x"] {
            let p = poly(input).unwrap();
            let mut closed = p.roots();
            let mut iterative = p.roots_iterative(1e-12, 500);
            let key = |a: &Complex64, b: &Complex64| {
                a.re.total_cmp(&b.re).then(a.im.total_cmp(&b.im))
            };
            closed.sort_by(key);
            iterative.sort_by(key);
            for (a, b) in closed.iter().zip(iterative.iter()) {
                assert_relative_eq!(a.re, b.re, epsilon = 1e-9);
                assert_relative_eq!(a.im, b.im, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_cubic_roots() {
        let p = poly("x**3 - 6*x**2 + 11*x - 6").unwrap();
        assert_eq!(p.real_roots(1e-9), vec![1.0, 2.0, 3.0]);
        let p = poly("x**3 - 1").unwrap();
        assert_eq!(p.real_roots(1e-9), vec![1.0]);
        assert_eq!(p.roots().len(), 3);
    }

    #[test]
    fn test_repeated_roots() {
        let p = poly("(x - 1)**3").unwrap();
        assert_eq!(p.real_roots(1e-9), vec![1.0, 1.0, 1.0]);
        let p = poly("(x - 2)**4").unwrap();
        let roots = p.roots();
        assert_eq!(roots.len(), 4);
        for z in roots {
            assert_relative_eq!(z.re, 2.0, epsilon = 1e-9);
            assert!(z.im.abs() < 1e-9, "{}", z);
        }
        let p = poly("(x - 1)**2*(x + 3)").unwrap();
        assert_eq!(p.real_roots(1e-9), vec![-3.0, 1.0, 1.0]);
        assert_eq!(poly("(x - 1)**3").unwrap().factor().to_string(), "(x - 1)**3");
    }

    #[test]
    fn test_close_simple_roots_stay_apart() {
        let p = poly("(x - 1)*(x - 1.0001)*(x - 5)").unwrap();
        let roots = p.real_roots(1e-9);
        assert_eq!(roots.len(), 3);
        assert_relative_eq!(roots[0], 1.0, epsilon = 1e-9);
        assert_relative_eq!(roots[1], 1.0001, epsilon = 1e-9);
        assert_relative_eq!(roots[2], 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_roots_are_exact() {
        let p = poly("x**4 - x**2").unwrap();
        let roots = p.real_roots(1e-9);
        assert_eq!(roots, vec![-1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_factor() {
        let p = poly("x**2 - 4*x + 3").unwrap();
        assert_eq!(p.factor().to_string(), "(x - 1)*(x - 3)");
        let p = poly("x**2 - 2*x + 1").unwrap();
        assert_eq!(p.factor().to_string(), "(x - 1)**2");
        let p = poly("x**3 + x").unwrap();
        assert_eq!(p.factor().to_string(), "x*(x**2 + 1)");
        let p = poly("-x**2 + 1").unwrap();
        assert_eq!(p.factor().to_string(), "-(x + 1)*(x - 1)");
    }
}
