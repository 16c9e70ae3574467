//! Step-by-step explanations of a result, and the narrator that turns them into an artifact.
use crate::error::Result;
use crate::numerical::arithmetic::Operation;
use crate::numerical::equation_solver::{Equation, Solution, SolutionSet};
use crate::numerical::function_analysis::Analysis;
use crate::session::i18n::{Locale, Message};
use crate::symbolic::utils::format_number;
use log::info;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

const DIGITS: usize = 4;

/// Ordered, localized explanation lines.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Explanation {
    pub lines: Vec<String>,
}

impl Explanation {
    fn push(&mut self, locale: Locale, message: Message) {
        self.lines.push(locale.message(&message));
    }

    pub fn arithmetic(locale: Locale, a: f64, operation: Operation, b: f64, result: f64) -> Self {
        let mut explanation = Explanation::default();
        explanation.push(
            locale,
            Message::Operands {
                a: format_number(a, DIGITS),
                b: format_number(b, DIGITS),
                operation: operation.label(locale).to_string(),
            },
        );
        explanation.push(locale, Message::Result(format_number(result, DIGITS)));
        explanation
    }

    pub fn solve(locale: Locale, equation: &Equation, solution: &Solution) -> Self {
        let mut explanation = Explanation::default();
        explanation.push(locale, Message::Canonical(equation.canonical.clone()));
        explanation.push(locale, Message::Residual(solution.residual.to_string()));
        if let Some(degree) = solution.degree {
            explanation.push(locale, Message::Degree(degree));
        }
        if let Some(discriminant) = solution.discriminant {
            explanation.push(locale, Message::Discriminant(format_number(discriminant, DIGITS)));
        }
        explanation.push(locale, Message::Method(solution.method));
        match &solution.set {
            SolutionSet::AllValues => explanation.push(locale, Message::AllValues),
            SolutionSet::Empty => explanation.push(locale, Message::NoSolution),
            SolutionSet::Roots(roots) => {
                explanation.push(locale, Message::RootCount(roots.len()));
                for (i, root) in roots.iter().enumerate() {
                    explanation.push(
                        locale,
                        Message::Root {
                            index: i + 1,
                            value: root.to_string(),
                        },
                    );
                }
            }
        }
        explanation
    }

    pub fn plot(locale: Locale, analysis: &Analysis) -> Self {
        let mut explanation = Explanation::default();
        explanation.push(locale, Message::Derivative(analysis.derivative.to_string()));
        explanation.push(
            locale,
            Message::SecondDerivative(analysis.second_derivative.to_string()),
        );
        if analysis.roots.is_empty() {
            explanation.push(locale, Message::Roots("∅".to_string()));
        } else {
            let roots: Vec<String> = analysis
                .roots
                .iter()
                .map(|x| format_number(*x, DIGITS))
                .collect();
            explanation.push(locale, Message::Roots(roots.join(", ")));
        }
        for point in &analysis.critical_points {
            explanation.push(
                locale,
                Message::CriticalPoint {
                    kind: point.kind,
                    x: format_number(point.x, DIGITS),
                    y: format_number(point.y, DIGITS),
                },
            );
        }
        for point in &analysis.inflection_points {
            explanation.push(
                locale,
                Message::InflectionPoint {
                    x: format_number(point.x, DIGITS),
                    y: format_number(point.y, DIGITS),
                },
            );
        }
        let missing = analysis.samples.missing_count();
        if missing > 0 {
            explanation.push(locale, Message::MissingPoints(missing));
        }
        explanation
    }

    /// the text handed to the narrator
    pub fn script(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Turns an explanation into a playable (or readable) artifact and returns where it is.
pub trait Narrator {
    fn narrate(&mut self, text: &str) -> Result<PathBuf>;
}

/// Writes the narration script to one scratch file, overwritten on every call, so there is
/// never more than one artifact on disk.
#[derive(Debug, Clone)]
pub struct ScriptNarrator {
    path: PathBuf,
}

impl ScriptNarrator {
    pub fn new(path: &Path) -> Self {
        ScriptNarrator {
            path: path.to_path_buf(),
        }
    }

    /// scratch file in the system temp directory
    pub fn scratch() -> Self {
        ScriptNarrator::new(&std::env::temp_dir().join("math_form_narration.txt"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Narrator for ScriptNarrator {
    fn narrate(&mut self, text: &str) -> Result<PathBuf> {
        fs::write(&self.path, text)?;
        info!("narration script written to {}", self.path.display());
        Ok(self.path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Utils::settings::SolverSettings;
    use crate::numerical::function_analysis::{Domain, FunctionAnalyzer};
    use tempfile::tempdir;

    #[test]
    fn test_arithmetic_explanation() {
        let explanation = Explanation::arithmetic(Locale::Arabic, 6.0, Operation::Divide, 4.0, 1.5);
        assert_eq!(explanation.lines.len(), 2);
        assert!(explanation.lines[0].contains("قسمة"));
        assert_eq!(explanation.lines[1], "النتيجة = 1.5");
    }

    #[test]
    fn test_quadratic_explanation_mentions_degree_and_discriminant() {
        let equation = Equation::parse("x^2 - 5x + 6 = 0").unwrap();
        let solution = equation.solve(&SolverSettings::default()).unwrap();
        let explanation = Explanation::solve(Locale::English, &equation, &solution);
        assert!(explanation.lines.contains(&"Degree: 2".to_string()));
        assert!(explanation.lines.contains(&"Discriminant: 1".to_string()));
        assert!(explanation.lines.contains(&"Method: quadratic formula".to_string()));
        assert_eq!(explanation.lines.last().unwrap(), "Solution 2: 3");
    }

    #[test]
    fn test_contradiction_explanation() {
        let equation = Equation::parse("2 = 3").unwrap();
        let solution = equation.solve(&SolverSettings::default()).unwrap();
        let explanation = Explanation::solve(Locale::Arabic, &equation, &solution);
        assert_eq!(explanation.lines.last().unwrap(), "لا يوجد حل");
    }

    #[test]
    fn test_plot_explanation() {
        let analysis = FunctionAnalyzer::new("x^2 - 4")
            .unwrap()
            .analyze(&Domain::default(), 400);
        let explanation = Explanation::plot(Locale::English, &analysis);
        assert_eq!(explanation.lines[0], "First derivative: 2*x");
        assert_eq!(explanation.lines[2], "x-intercepts: -2, 2");
        assert_eq!(explanation.lines[3], "minimum at (0, -4)");

        let analysis = FunctionAnalyzer::new("sqrt(x)")
            .unwrap()
            .analyze(&Domain::default(), 400);
        let explanation = Explanation::plot(Locale::English, &analysis);
        assert!(
            explanation
                .lines
                .last()
                .unwrap()
                .starts_with("200 points outside")
        );
    }

    #[test]
    fn test_script_narrator_overwrites_single_artifact() {
        let dir = tempdir().unwrap();
        let mut narrator = ScriptNarrator::new(&dir.path().join("narration.txt"));
        let first = narrator.narrate("first").unwrap();
        let second = narrator.narrate("second").unwrap();
        assert_eq!(first, second);
        assert_eq!(fs::read_to_string(&second).unwrap(), "second");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_narrator_reports_io_errors() {
        let mut narrator = ScriptNarrator::new(Path::new("/nonexistent/dir/narration.txt"));
        assert!(narrator.narrate("text").is_err());
    }
}
