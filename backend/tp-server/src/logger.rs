use crate::{
    audit::AUDIT_TARGET,
    error::{Result as ServerErrorResult, ServerError},
};

use std::{fmt, path::PathBuf, time::SystemTime};

use fern::{
    Dispatch, FormatCallback,
    colors::{Color, ColoredLevelConfig},
};
use log::{LevelFilter, Record, info};

/// Initialize the global fern logger.
///
/// # Arguments
/// * `log_level` - Level for everything except the overrides below
/// * `log_file` - Optional path to log file. None = stdout, Some = file output
/// * `colored` - Enable colored output (ignored when logging to file)
///
/// Two targets are pinned regardless of `log_level`:
/// * `audit` stays at Info, so the JSON lines written by `AuditLogger` survive
///   a `warn` or `error` deployment level. Filter on `[audit]` to split them out.
/// * `sqlx` is capped at Warn to keep per-query statements out of the stream.
pub fn initialize(
    log_level: tp_config::LogLevel,
    log_file: Option<PathBuf>,
    colored: bool,
) -> ServerErrorResult<()> {
    let level_filter = log_level.0;

    let base_dispatch = Dispatch::new()
        .level(level_filter)
        .level_for(AUDIT_TARGET, audit_level(level_filter))
        .level_for("sqlx", LevelFilter::Warn);

    let output = match (&log_file, colored) {
        (Some(log_path), _) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)
                .map_err(|e| ServerError::Logger {
                    message: format!("Failed to open log file {}: {}", log_path.display(), e),
                })?;
            Dispatch::new()
                .format(|out, message, record| write_line(out, message, record, record.level()))
                .chain(file)
        }
        (None, true) => {
            let colors = ColoredLevelConfig::new()
                .trace(Color::Magenta)
                .debug(Color::Blue)
                .info(Color::Green)
                .warn(Color::Yellow)
                .error(Color::Red);
            Dispatch::new()
                .format(move |out, message, record| {
                    write_line(out, message, record, colors.color(record.level()))
                })
                .chain(std::io::stdout())
        }
        // Plain output for non-TTY (systemd, docker logs)
        (None, false) => Dispatch::new()
            .format(|out, message, record| write_line(out, message, record, record.level()))
            .chain(std::io::stdout()),
    };

    base_dispatch
        .chain(output)
        .apply()
        .map_err(|e| ServerError::Logger {
            message: format!("Failed to initialize logger: {e}"),
        })?;

    match log_file {
        Some(path) => info!(
            "Logger initialized: level={:?}, file={}",
            level_filter,
            path.display()
        ),
        None => info!("Logger initialized: level={:?}, stdout", level_filter),
    }

    // Bridge tracing to log
    tracing_log::LogTracer::init().ok();

    Ok(())
}

/// Never quieter than Info; follows the global level when it is more verbose
pub(crate) fn audit_level(global: LevelFilter) -> LevelFilter {
    global.max(LevelFilter::Info)
}

fn write_line(
    out: FormatCallback<'_>,
    message: &fmt::Arguments<'_>,
    record: &Record<'_>,
    level: impl fmt::Display,
) {
    out.finish(format_args!(
        "[{} - {}] [{}] {}",
        humantime::format_rfc3339(SystemTime::now()),
        level,
        record.target(),
        message,
    ))
}
