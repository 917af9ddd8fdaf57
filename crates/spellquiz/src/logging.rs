//! Log output for the CLI and the server.
//!
//! Request traces from `tower-http` are filtered separately from the crate's
//! own events so that a busy server stays quiet at the default verbosity.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// How much the binary logs, set by `-q` and `-v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Info and above; request traces only on warnings.
    #[default]
    Normal,
    /// Debug, including every request.
    Verbose,
    /// Everything.
    Trace,
}

impl Verbosity {
    /// Level for events from this crate.
    #[must_use]
    pub fn to_level_filter(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// The default filter directive for this verbosity.
    ///
    /// Request traces from `tower_http` are only shown from `Verbose` up.
    #[must_use]
    pub fn filter_directive(&self) -> String {
        let level = self.to_level_filter();
        let http_level = match self {
            Self::Quiet | Self::Normal => Level::WARN.min(level),
            Self::Verbose | Self::Trace => level,
        };
        format!("spellquiz={level},tower_http={http_level}")
    }
}

/// Install the global subscriber. `RUST_LOG`, when set, replaces the
/// directive derived from `verbosity`. Later calls are no-ops.
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.filter_directive()));

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        );

    let _ = subscriber.try_init();
}

/// Subscriber for tests, writing through the test harness.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_to_level() {
        assert_eq!(Verbosity::Quiet.to_level_filter(), Level::ERROR);
        assert_eq!(Verbosity::Normal.to_level_filter(), Level::INFO);
        assert_eq!(Verbosity::Verbose.to_level_filter(), Level::DEBUG);
        assert_eq!(Verbosity::Trace.to_level_filter(), Level::TRACE);
    }

    #[test]
    fn test_verbosity_default() {
        assert_eq!(Verbosity::default(), Verbosity::Normal);
    }

    #[test]
    fn test_filter_directive() {
        assert_eq!(
            Verbosity::Normal.filter_directive(),
            "spellquiz=INFO,tower_http=WARN"
        );
        assert_eq!(
            Verbosity::Quiet.filter_directive(),
            "spellquiz=ERROR,tower_http=ERROR"
        );
        assert_eq!(
            Verbosity::Verbose.filter_directive(),
            "spellquiz=DEBUG,tower_http=DEBUG"
        );
    }

    #[test]
    fn test_filter_directive_parses() {
        for v in [
            Verbosity::Quiet,
            Verbosity::Normal,
            Verbosity::Verbose,
            Verbosity::Trace,
        ] {
            assert!(EnvFilter::try_new(v.filter_directive()).is_ok());
        }
    }

    #[test]
    fn test_init_logging_does_not_panic() {
        init_logging(Verbosity::Normal);
        init_logging(Verbosity::Trace);
    }

    #[test]
    fn test_init_test_logging_does_not_panic() {
        init_test_logging();
    }
}
