//! Diagnostics setup. Output goes to stderr so it never interleaves with the
//! tables printed on stdout.

use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter used when `RUST_LOG` is not set.
///
/// Verbose mode shows this crate's debug output and only warnings from the
/// HTTP stack.
fn default_directives(verbose: bool) -> &'static str {
    if verbose { "cnyrate=debug,warn" } else { "off" }
}

fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over `verbose`.
pub fn init_logging(verbose: bool) -> Result<()> {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter(verbose))
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_quiet_unless_verbose() {
        let quiet = EnvFilter::new(default_directives(false));
        assert_eq!(quiet.max_level_hint(), Some(LevelFilter::OFF));
    }

    #[test]
    fn test_verbose_enables_crate_debug() {
        let directives = default_directives(true);
        assert!(EnvFilter::try_new(directives).is_ok());
        assert!(directives.contains("cnyrate=debug"));
        assert_eq!(
            EnvFilter::new(directives).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
    }
}
