//! The info command: validate and display a settings file.

use std::str::FromStr;

use crate::cli::logging::{log, LogLevel};
use crate::config::{InfoArgs, Settings};
use crate::eval::Metric;

/// Parse a settings file, check its metric names, and print the
/// configuration.
pub fn run_info(args: InfoArgs, level: LogLevel) -> Result<(), String> {
    let settings = Settings::from_path(&args.settings).map_err(|e| e.to_string())?;

    for name in &settings.parameters.metrics {
        Metric::from_str(name).map_err(|e| e.to_string())?;
    }

    log(level, LogLevel::Normal, &format!("dataset: {}", settings.parameters.dataset));
    log(level, LogLevel::Normal, &format!("model:   {}", settings.parameters.model));
    log(
        level,
        LogLevel::Normal,
        &format!("metrics: {}", settings.parameters.metrics.join(", ")),
    );

    Ok(())
}
