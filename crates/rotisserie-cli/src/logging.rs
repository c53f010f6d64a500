use anyhow::{anyhow, bail, Result};
use twyg::{LogLevel, OptsBuilder};

use crate::config::LoggingConfig;

/// Parse a configured level name, ignoring case.
pub(crate) fn parse_level(level: &str) -> Result<LogLevel> {
    Ok(match level.trim().to_ascii_lowercase().as_str() {
        "trace" => LogLevel::Trace,
        "debug" => LogLevel::Debug,
        "info" => LogLevel::Info,
        "warn" | "warning" => LogLevel::Warn,
        "error" => LogLevel::Error,
        other => bail!("Unknown log level: {other}\n\nValid levels: trace, debug, info, warn, error"),
    })
}

/// Install the global logger. `verbose` forces debug output.
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let level = if verbose {
        LogLevel::Debug
    } else {
        parse_level(&config.level)?
    };

    let opts = OptsBuilder::new()
        .coloured(config.coloured)
        .level(level)
        .report_caller(config.report_caller)
        .build()
        .map_err(|e| anyhow!("Invalid logging options: {e:?}"))?;

    twyg::setup(opts).map_err(|e| anyhow!("Could not set up logger: {e:?}"))?;
    Ok(())
}
