//! Settings read from a task_parser document:
//!
//! ```text
//! plot
//! x_min: -10
//! x_max: 10
//! points: 400
//! color: #1f77b4
//! solver
//! tolerance: 1e-10
//! session
//! locale: ar
//! loglevel: info
//! ```
//! Every key is optional and falls back to its default.
use crate::Utils::task_parser::{SectionMap, Value, parse_settings_document};
use crate::error::{FormatError, MathError, Result};
use crate::numerical::function_analysis::{DEFAULT_POINTS, Domain, check_points};
use crate::session::i18n::Locale;
use log::info;
use std::fs;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub struct PlotSettings {
    pub domain: Domain,
    pub points: usize,
    pub color: String,
    pub width: u32,
    pub height: u32,
}

impl Default for PlotSettings {
    fn default() -> Self {
        PlotSettings {
            domain: Domain::default(),
            points: DEFAULT_POINTS,
            color: "#1f77b4".to_string(),
            width: 800,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolverSettings {
    pub tolerance: f64,
    pub max_iterations: usize,
    /// interval scanned for roots of non-polynomial equations
    pub search_min: f64,
    pub search_max: f64,
    pub search_points: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        SolverSettings {
            tolerance: 1e-10,
            max_iterations: 500,
            search_min: -100.0,
            search_max: 100.0,
            search_points: 2000,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub locale: Locale,
    pub loglevel: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            locale: Locale::default(),
            loglevel: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settings {
    pub plot: PlotSettings,
    pub solver: SolverSettings,
    pub session: SessionSettings,
}

fn invalid(key: &str, reason: impl Into<String>) -> MathError {
    MathError::Format(FormatError::InvalidSetting {
        key: key.to_string(),
        reason: reason.into(),
    })
}

/// the single value stored under `key`, if the key is present
fn single<'a>(section: Option<&'a SectionMap>, key: &str) -> Result<Option<&'a Value>> {
    match section.and_then(|s| s.get(key)) {
        None => Ok(None),
        Some(values) if values.len() == 1 => Ok(values.first()),
        Some(values) => Err(invalid(
            key,
            format!("expected one value, found {}", values.len()),
        )),
    }
}

fn float(section: Option<&SectionMap>, key: &str, default: f64) -> Result<f64> {
    match single(section, key)? {
        None => Ok(default),
        Some(value) => value
            .as_f64()
            .filter(|v| v.is_finite())
            .ok_or_else(|| invalid(key, format!("'{}' is not a number", value))),
    }
}

fn count(section: Option<&SectionMap>, key: &str, default: usize) -> Result<usize> {
    match single(section, key)? {
        None => Ok(default),
        Some(value) => value
            .as_integer()
            .and_then(|v| usize::try_from(v).ok())
            .filter(|v| *v > 0)
            .ok_or_else(|| invalid(key, format!("'{}' is not a positive integer", value))),
    }
}

fn text(section: Option<&SectionMap>, key: &str, default: &str) -> Result<String> {
    Ok(single(section, key)?.map_or_else(|| default.to_string(), |v| v.to_string()))
}

impl Settings {
    pub fn from_document(input: &str) -> Result<Settings> {
        let doc = parse_settings_document(input)?;
        for title in doc.keys() {
            if !matches!(title.as_str(), "plot" | "solver" | "session") {
                return Err(invalid(title, "unknown section"));
            }
        }
        let defaults = Settings::default();

        let plot = doc.get("plot");
        let x_min = float(plot, "x_min", defaults.plot.domain.start)?;
        let x_max = float(plot, "x_max", defaults.plot.domain.end)?;
        let plot = PlotSettings {
            domain: Domain::new(x_min, x_max)?,
            points: check_points(count(plot, "points", defaults.plot.points)?)?,
            color: text(plot, "color", &defaults.plot.color)?,
            width: count(plot, "width", defaults.plot.width as usize)? as u32,
            height: count(plot, "height", defaults.plot.height as usize)? as u32,
        };

        let solver = doc.get("solver");
        let solver = SolverSettings {
            tolerance: float(solver, "tolerance", defaults.solver.tolerance)?,
            max_iterations: count(solver, "max_iterations", defaults.solver.max_iterations)?,
            search_min: float(solver, "search_min", defaults.solver.search_min)?,
            search_max: float(solver, "search_max", defaults.solver.search_max)?,
            search_points: check_points(count(
                solver,
                "search_points",
                defaults.solver.search_points,
            )?)?,
        };
        if solver.tolerance <= 0.0 {
            return Err(invalid("tolerance", "must be positive"));
        }
        Domain::new(solver.search_min, solver.search_max)?;

        let session = doc.get("session");
        let locale = text(session, "locale", defaults.session.locale.code())?;
        let session = SessionSettings {
            locale: Locale::from_str(&locale)
                .map_err(|_| invalid("locale", format!("'{}' is not one of ar, en", locale)))?,
            loglevel: text(session, "loglevel", &defaults.session.loglevel)?,
        };

        Ok(Settings {
            plot,
            solver,
            session,
        })
    }

    pub fn from_file(path: &Path) -> Result<Settings> {
        let content = fs::read_to_string(path)?;
        let settings = Settings::from_document(&content)?;
        info!("settings loaded from {}", path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_for_empty_document() {
        assert_eq!(Settings::from_document("").unwrap(), Settings::default());
        let defaults = Settings::default();
        assert_eq!(defaults.plot.points, 400);
        assert_eq!(defaults.session.locale, Locale::Arabic);
    }

    #[test]
    fn test_partial_document() {
        let settings = Settings::from_document(
            "plot\nx_min: -2\nx_max: 3.5\ncolor: red\nsession\nlocale: en\n",
        )
        .unwrap();
        assert_eq!(settings.plot.domain, Domain::new(-2.0, 3.5).unwrap());
        assert_eq!(settings.plot.color, "red");
        assert_eq!(settings.plot.points, 400);
        assert_eq!(settings.session.locale, Locale::English);
        assert_eq!(settings.solver, SolverSettings::default());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            Settings::from_document("plot\npoints: many"),
            Err(MathError::Format(FormatError::InvalidSetting { .. }))
        ));
        assert!(Settings::from_document("plot\npoints: -4").is_err());
        assert!(Settings::from_document("plot\nx_min: 1, 2").is_err());
        assert!(Settings::from_document("session\nlocale: fr").is_err());
        assert!(Settings::from_document("colors\nred: 1").is_err());
        assert!(Settings::from_document("solver\ntolerance: 0").is_err());
        assert_eq!(
            Settings::from_document("plot\nx_min: 5\nx_max: 1"),
            Err(MathError::Domain(DomainError::InvalidRange {
                start: 5.0,
                end: 1.0
            }))
        );
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "// solver tuning").unwrap();
        writeln!(file, "solver").unwrap();
        writeln!(file, "search_min: -10").unwrap();
        writeln!(file, "search_max: 10").unwrap();
        writeln!(file, "search_points: 500").unwrap();
        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.solver.search_min, -10.0);
        assert_eq!(settings.solver.search_points, 500);
        assert!(matches!(
            Settings::from_file(Path::new("/definitely/not/here.txt")),
            Err(MathError::Io(_))
        ));
    }
}
