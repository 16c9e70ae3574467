/// the four operations of the calculator panel
///  Example#1
/// ```
/// use RustedMathForm::numerical::arithmetic::{Operation, parse_operand};
/// let op = Operation::parse("ضرب").unwrap();
/// let r = op.apply(parse_operand("٦").unwrap(), 7.0).unwrap();
/// assert_eq!(r, 42.0);
/// // division by zero is an error, never inf
/// assert!(Operation::Divide.apply(1.0, 0.0).is_err());
///  ```
pub mod arithmetic;
/// single-variable equations: closed forms for degree 1 and 2, iteration for higher degrees,
/// bracketing for everything else
/// Example#1
/// ```
/// use RustedMathForm::numerical::equation_solver::Equation;
/// use RustedMathForm::Utils::settings::SolverSettings;
/// let eq = Equation::parse("x^2 - 5x + 6 = 0").unwrap();
/// let solution = eq.solve(&SolverSettings::default()).unwrap();
/// println!("{} -> {} ({})", eq.text, solution, solution.method);
/// assert_eq!(solution.set.real_roots(), vec![2.0, 3.0]);
/// ```
pub mod equation_solver;
/// sampling with missing values, roots, extrema and inflection points of a typed function
/// ```
/// use RustedMathForm::numerical::function_analysis::{Domain, FunctionAnalyzer};
/// let f = FunctionAnalyzer::new("x^2 - 4").unwrap();
/// let analysis = f.analyze(&Domain::default(), 200);
/// assert_eq!(analysis.roots, vec![-2.0, 2.0]);
/// ```
pub mod function_analysis;
/// curve drawn on a canvas -> point cloud -> spline
pub mod digitize;
/// bisection and grid scanning for functions without a closed-form solution
pub mod root_finding;
