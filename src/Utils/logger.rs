use crate::error::{FormatError, MathError, Result};
use crate::numerical::function_analysis::Samples;
use chrono::Local;
use csv::Writer;
use log::info;
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::File;
use std::path::{Path, PathBuf};

/// `off | none | debug | info | warn | error`, case-insensitive
pub fn parse_level(level: &str) -> Result<LevelFilter> {
    match level.trim().to_lowercase().as_str() {
        "off" | "none" => Ok(LevelFilter::Off),
        "debug" => Ok(LevelFilter::Debug),
        "info" => Ok(LevelFilter::Info),
        "warn" => Ok(LevelFilter::Warn),
        "error" => Ok(LevelFilter::Error),
        other => Err(MathError::Format(FormatError::InvalidSetting {
            key: "loglevel".to_string(),
            reason: format!("'{}' must be off, none, debug, info, warn or error", other),
        })),
    }
}

/// log_<date>_<time>.txt in the working directory
pub fn default_log_file_name() -> PathBuf {
    let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
    PathBuf::from(format!("log_{}.txt", date_and_time))
}

/// Terminal logger plus, when `log_file` is given, a copy written to that file.
/// Calling it again once a logger is installed changes nothing.
pub fn init_logger(level: &str, log_file: Option<&Path>) -> Result<()> {
    let log_option = parse_level(level)?;
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    loggers.push(TermLogger::new(
        log_option,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ));
    if let Some(path) = log_file {
        loggers.push(WriteLogger::new(
            log_option,
            Config::default(),
            File::create(path)?,
        ));
    }
    match CombinedLogger::init(loggers) {
        Ok(()) => info!("program started with loglevel: {}", log_option),
        // already initialised by an earlier call
        Err(_) => {}
    }
    Ok(())
}

/// Writes samples as `x,y` rows; missing values are empty cells.
pub fn save_samples_to_csv(samples: &Samples, arg: &str, value: &str, path: &Path) -> Result<()> {
    let to_io = |e: csv::Error| MathError::Io(e.to_string());
    let file = File::create(path)?;
    let mut writer = Writer::from_writer(file);
    writer.write_record([arg, value]).map_err(to_io)?;
    for (x, y) in samples.x.iter().zip(samples.y.iter()) {
        let y = if y.is_finite() {
            y.to_string()
        } else {
            String::new()
        };
        writer.write_record([x.to_string(), y]).map_err(to_io)?;
    }
    writer.flush()?;
    info!("samples saved to {}", path.display());
    Ok(())
}
