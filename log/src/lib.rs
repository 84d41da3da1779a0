use std::{fmt::Display, str::FromStr};

use backtrace::Backtrace;
use tracing::{debug, error, info, level_filters::LevelFilter, trace, warn};

/// Installs the global fmt subscriber.
///
/// `level_filter` accepts the usual `tracing` names (`off`, `error`, `warn`,
/// `info`, `debug`, `trace`). Returns the parse error message when it does not.
pub fn init(display_level: &bool, level_filter: &str) -> Result<(), String> {
    let level_filter = LevelFilter::from_str(level_filter)
        .map_err(|err| format!("Invalid log level filter '{level_filter}': {err}"))?;

    tracing_subscriber::fmt()
        .with_level(*display_level)
        .with_max_level(level_filter)
        .try_init()
        .map_err(|err| err.to_string())
}

fn line<T: Display>(prefix: Option<&str>, fallback: &str, msg: T) -> String {
    format!("{} {msg}", prefix.unwrap_or(fallback))
}

pub fn trace<T: Display>(prefix: Option<&str>, msg: T) {
    trace!("{}", line(prefix, "🐾", msg));
}

pub fn debug<T: Display>(prefix: Option<&str>, msg: T) {
    debug!("{}", line(prefix, "🐞", msg));
}

pub fn info<T: Display>(prefix: Option<&str>, msg: T) {
    info!("{}", line(prefix, "📢", msg));
}

pub fn warn<T: Display>(prefix: Option<&str>, msg: T) {
    warn!("{}", line(prefix, "⚠️", msg));
}

pub fn error<T: Display>(prefix: Option<&str>, msg: T) {
    let msg = line(prefix, "🚨", msg);
    if std::env::var("RUST_BACKTRACE").is_ok_and(|var| var == "1") {
        error!("{msg}\n{:?}", Backtrace::new());
    } else {
        error!("{msg}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_uses_prefix_when_given() {
        assert_eq!(line(Some("🔧"), "📢", "ready"), "🔧 ready");
    }

    #[test]
    fn line_falls_back_to_default_prefix() {
        assert_eq!(line(None, "📢", 42), "📢 42");
    }

    #[test]
    fn init_rejects_unknown_level() {
        assert!(init(&true, "loud").is_err());
    }
}
