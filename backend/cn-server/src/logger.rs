use crate::error::{Result as ServerErrorResult, ServerError};
use crate::log_bridge::{LogBridgeLayer, current_span_fields};

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{LevelFilter, info};
use tracing_log::AsTrace;
use tracing_subscriber::Registry;
use tracing_subscriber::layer::SubscriberExt;

/// Install the process logger.
///
/// `log` records go through fern, to `log_file` when given and to stdout
/// otherwise (`colored` only applies to stdout). A `tracing` subscriber is
/// installed next to it so dispatch spans are live: lines written inside a
/// span end with its fields in braces, e.g.
/// `{target_user_id=.. event_type=updated_contact route=contact}`.
///
/// Can only succeed once per process.
pub fn initialize(
    log_level: cn_config::LogLevel,
    log_file: Option<PathBuf>,
    colored: bool,
) -> ServerErrorResult<()> {
    let level_filter = log_level.0;

    let output = match log_file.as_deref() {
        Some(path) => file_output(path)?,
        None => stdout_output(colored),
    };

    Dispatch::new()
        .level(level_filter)
        .chain(output)
        .apply()
        .map_err(|e| ServerError::Logger {
            message: format!("Failed to install log dispatcher: {e}"),
        })?;

    install_span_subscriber(level_filter)?;

    match log_file {
        Some(path) => info!("Logging at {level_filter} to {}", path.display()),
        None => info!("Logging at {level_filter} to stdout"),
    }

    Ok(())
}

fn install_span_subscriber(level_filter: LevelFilter) -> ServerErrorResult<()> {
    let subscriber = Registry::default()
        .with(level_filter.as_trace())
        .with(LogBridgeLayer);

    tracing::subscriber::set_global_default(subscriber).map_err(|e| ServerError::Logger {
        message: format!("Failed to install tracing subscriber: {e}"),
    })
}

/// Plain lines with source location; no colors in files
fn file_output(path: &Path) -> ServerErrorResult<Dispatch> {
    let file = fern::log_file(path).map_err(|e| ServerError::Logger {
        message: format!("Failed to open log file {}: {e}", path.display()),
    })?;

    Ok(Dispatch::new()
        .format(|out, message, record| {
            let location = format!(
                "{}:{}",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0)
            );
            write_line(out, message, &record.level(), &location);
        })
        .chain(file))
}

fn stdout_output(colored: bool) -> Dispatch {
    let dispatch = if colored {
        let colors = ColoredLevelConfig::new()
            .trace(Color::Magenta)
            .debug(Color::Blue)
            .info(Color::Green)
            .warn(Color::Yellow)
            .error(Color::Red);

        Dispatch::new().format(move |out, message, record| {
            write_line(out, message, &colors.color(record.level()), record.target());
        })
    } else {
        // systemd, docker logs
        Dispatch::new().format(|out, message, record| {
            write_line(out, message, &record.level(), record.target());
        })
    };

    dispatch.chain(std::io::stdout())
}

fn write_line(
    out: FormatCallback<'_>,
    message: &std::fmt::Arguments<'_>,
    level: &dyn std::fmt::Display,
    origin: &str,
) {
    let context = current_span_fields()
        .map(|fields| format!(" {{{fields}}}"))
        .unwrap_or_default();

    out.finish(format_args!(
        "[{} - {level}] {message}{context} [{origin}]",
        humantime::format_rfc3339(SystemTime::now()),
    ));
}
