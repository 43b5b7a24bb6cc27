//! Logger set-up for the `kommwert` binary.
//!
//! All records go to stderr so that stdout only carries the formatted result.
use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{LevelFilter, Record};
use std::env;
use std::fmt::Arguments;

/// Environment variable consulted when `--log-level` is not given.
const LOG_LEVEL_ENV: &str = "KOMMWERT_LOG_LEVEL";

/// Used when neither the flag nor the environment variable is set.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Install the `fern` dispatcher. The command-line level wins over the
/// environment variable.
pub fn init(level_from_cli: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let level_from_env = env::var(LOG_LEVEL_ENV).ok();
    let level = parse_level(&choose_level(level_from_cli, level_from_env.as_deref()))?;

    let colours = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);
    let use_colour = atty::is(atty::Stream::Stderr);

    Dispatch::new()
        .format(move |out, message, record| {
            write_log(out, message, record, use_colour, &colours);
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()?;

    Ok(())
}

fn choose_level(level_from_cli: Option<&str>, level_from_env: Option<&str>) -> String {
    level_from_cli
        .or(level_from_env)
        .unwrap_or(DEFAULT_LOG_LEVEL)
        .to_string()
}

fn parse_level(level: &str) -> Result<LevelFilter, Box<dyn std::error::Error>> {
    match level.to_lowercase().as_str() {
        "off" => Ok(LevelFilter::Off),
        "error" => Ok(LevelFilter::Error),
        "warn" => Ok(LevelFilter::Warn),
        "info" => Ok(LevelFilter::Info),
        "debug" => Ok(LevelFilter::Debug),
        "trace" => Ok(LevelFilter::Trace),
        unknown => Err(format!("Unknown log level: {unknown}").into()),
    }
}

fn write_log(
    out: FormatCallback,
    message: &Arguments,
    record: &Record,
    use_colour: bool,
    colours: &ColoredLevelConfig,
) {
    let timestamp = Local::now().format("%H:%M:%S");
    let target = record.target();
    if use_colour {
        let level = colours.color(record.level());
        out.finish(format_args!("[{timestamp} {level} {target}] {message}"));
    } else {
        let level = record.level();
        out.finish(format_args!("[{timestamp} {level} {target}] {message}"));
    }
}
