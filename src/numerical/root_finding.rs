//! Scalar root finding for functions without a closed form.
//!
//! The search interval is scanned on a uniform grid; every sign change brackets a root that is
//! refined by bisection. A bracket whose midpoint value does not go to zero is a pole
//! (`1/x` changes sign at 0 too) and is dropped.
use log::{debug, info};
use ndarray::Array1;

/// Configuration for root finding methods
#[derive(Debug, Clone)]
pub struct RootFindingConfig {
    pub tolerance: f64,
    pub max_iterations: usize,
    /// largest |f(root)| accepted after bisection
    pub residual_tolerance: f64,
}

impl Default for RootFindingConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 200,
            residual_tolerance: 1e-6,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RootFindingResult {
    pub root: f64,
    pub function_value: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Main structure for scalar root finding methods
#[derive(Debug, Clone, Default)]
pub struct ScalarRootFinder {
    config: RootFindingConfig,
}

impl ScalarRootFinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RootFindingConfig) -> Self {
        Self { config }
    }

    /// Bisection method for finding roots.
    /// Requires that f(a) and f(b) have opposite signs, returns `None` otherwise.
    pub fn bisection<F>(&self, function: &F, mut a: f64, mut b: f64) -> Option<RootFindingResult>
    where
        F: Fn(f64) -> f64,
    {
        if a > b {
            std::mem::swap(&mut a, &mut b);
        }
        let mut fa = function(a);
        let fb = function(b);
        if !(fa * fb <= 0.0) {
            return None;
        }
        if fa == 0.0 {
            return Some(RootFindingResult {
                root: a,
                function_value: fa,
                iterations: 0,
                converged: true,
            });
        }
        if fb == 0.0 {
            return Some(RootFindingResult {
                root: b,
                function_value: fb,
                iterations: 0,
                converged: true,
            });
        }
        let mut iterations = 0;
        while iterations < self.config.max_iterations {
            let c = 0.5 * (a + b);
            let fc = function(c);
            iterations += 1;
            if fc == 0.0 || 0.5 * (b - a) < self.config.tolerance {
                return Some(RootFindingResult {
                    root: c,
                    function_value: fc,
                    iterations,
                    converged: true,
                });
            }
            if fa * fc < 0.0 {
                b = c;
            } else {
                a = c;
                fa = fc;
            }
        }
        let c = 0.5 * (a + b);
        Some(RootFindingResult {
            root: c,
            function_value: function(c),
            iterations,
            converged: false,
        })
    }

    /// All roots found by scanning `points` grid nodes over [start, end], sorted ascending.
    /// Non-finite function values never bracket a root.
    pub fn scan<F>(&self, function: &F, start: f64, end: f64, points: usize) -> Vec<f64>
    where
        F: Fn(f64) -> f64,
    {
        let grid = Array1::linspace(start, end, points.max(2));
        let values: Vec<f64> = grid.iter().map(|&x| function(x)).collect();
        let mut roots = Vec::new();
        for i in 0..grid.len() {
            let (x0, f0) = (grid[i], values[i]);
            if f0 == 0.0 {
                roots.push(x0);
                continue;
            }
            if i + 1 == grid.len() {
                break;
            }
            let f1 = values[i + 1];
            if !f0.is_finite() || !f1.is_finite() || f0 * f1 >= 0.0 {
                continue;
            }
            match self.bisection(function, x0, grid[i + 1]) {
                Some(result) if result.function_value.abs() <= self.config.residual_tolerance => {
                    debug!(
                        "root {} after {} bisection steps, f = {:e}",
                        result.root, result.iterations, result.function_value
                    );
                    roots.push(result.root);
                }
                Some(result) => {
                    debug!(
                        "sign change at {} rejected as a pole, f = {:e}",
                        result.root, result.function_value
                    );
                }
                None => {}
            }
        }
        roots.dedup_by(|a, b| (*a - *b).abs() < self.config.tolerance.sqrt());
        info!(
            "scan of [{}, {}] on {} points found {} roots",
            start,
            end,
            grid.len(),
            roots.len()
        );
        roots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bisection_simple_quadratic() {
        let finder = ScalarRootFinder::new();
        let result = finder.bisection(&|x: f64| x * x - 4.0, 0.0, 5.0).unwrap();
        assert!(result.converged);
        assert_relative_eq!(result.root, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bisection_invalid_interval() {
        let finder = ScalarRootFinder::new();
        assert!(finder.bisection(&|x: f64| x * x + 1.0, -1.0, 1.0).is_none());
    }

    #[test]
    fn test_bisection_root_at_endpoint() {
        let finder = ScalarRootFinder::new();
        let result = finder.bisection(&|x: f64| x - 1.0, 1.0, 3.0).unwrap();
        assert_eq!(result.root, 1.0);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_scan_trigonometric() {
        let finder = ScalarRootFinder::new();
        let roots = finder.scan(&|x: f64| x.sin(), -4.0, 4.0, 101);
        assert_eq!(roots.len(), 3);
        assert_relative_eq!(roots[0], -std::f64::consts::PI, epsilon = 1e-8);
        assert_relative_eq!(roots[1], 0.0, epsilon = 1e-8);
        assert_relative_eq!(roots[2], std::f64::consts::PI, epsilon = 1e-8);
    }

    #[test]
    fn test_scan_rejects_poles() {
        let finder = ScalarRootFinder::new();
        let roots = finder.scan(&|x: f64| 1.0 / (x - 0.3), -2.0, 2.0, 50);
        assert!(roots.is_empty());
        let roots = finder.scan(&|x: f64| x.tan(), -1.0, 2.0, 301);
        assert_eq!(roots.len(), 1);
        assert_relative_eq!(roots[0], 0.0, epsilon = 1e-8);
    }

    #[test]
    fn test_scan_skips_undefined_values() {
        let finder = ScalarRootFinder::new();
        // log(x) is NaN left of zero
        let roots = finder.scan(&|x: f64| x.ln(), -5.0, 5.0, 200);
        assert_eq!(roots.len(), 1);
        assert_relative_eq!(roots[0], 1.0, epsilon = 1e-8);
    }
}
