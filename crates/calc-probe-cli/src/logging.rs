//! Tracing subscriber setup.

use crate::config::Verbosity;
use tracing_subscriber::EnvFilter;

/// Filter directives used when `RUST_LOG` is unset.
///
/// chromiumoxide logs every CDP message at debug, so it stays at `warn`
/// below `-vv`.
#[must_use]
pub fn default_directives(verbosity: Verbosity) -> String {
    let level = verbosity.log_level();
    match verbosity {
        Verbosity::Debug => level.to_string(),
        _ => format!("{level},chromiumoxide=warn"),
    }
}

/// Install the global subscriber, writing to stderr.
///
/// `RUST_LOG` wins over the verbosity flags. Installing twice is a no-op.
pub fn init(verbosity: Verbosity, color: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(color)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert_eq!(default_directives(Verbosity::Normal), "warn,chromiumoxide=warn");
        assert_eq!(default_directives(Verbosity::Verbose), "info,chromiumoxide=warn");
        assert_eq!(default_directives(Verbosity::Debug), "debug");
    }

    #[test]
    fn test_directives_parse() {
        for verbosity in [
            Verbosity::Quiet,
            Verbosity::Normal,
            Verbosity::Verbose,
            Verbosity::Debug,
        ] {
            assert!(EnvFilter::try_new(default_directives(verbosity)).is_ok());
        }
    }

    #[test]
    fn test_init_twice() {
        init(Verbosity::Quiet, false);
        init(Verbosity::Debug, false);
    }
}
