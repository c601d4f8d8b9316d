//! Tracing subscriber setup for the `strata` binary.
//!
//! Diagnostics always go to stderr so stdout stays clean for reports and
//! `--output-format json` documents. With JSON output the log lines are JSON
//! as well.
//!
//! `STRATA_LOG`, then `RUST_LOG`, replace the flag-derived filter entirely.

use std::io::IsTerminal as _;

use tracing_subscriber::{EnvFilter, Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{GlobalArgs, OutputFormat};

const LOG_ENV: &str = "STRATA_LOG";

/// Install the global subscriber. Call once, before the first event.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(args)));

    let fmt = tracing_subscriber::fmt::layer()
        .with_target(args.verbose >= 2)
        .with_writer(std::io::stderr);

    let fmt = if args.output_format == OutputFormat::Json {
        fmt.json().boxed()
    } else {
        fmt.with_ansi(!args.no_color && std::io::stderr().is_terminal())
            .boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))
}

/// Per-crate filter for the given flags.
///
/// The adapters run one step ahead of the rest at `-v`: snapshot reads,
/// commits and ledger writes are what a user debugging a migration wants
/// to see next to the runner's progress.
fn filter_directives(args: &GlobalArgs) -> String {
    let (app, adapters) = match (args.quiet, args.verbose) {
        (true, _) => ("error", "error"),
        (false, 0) => ("warn", "warn"),
        (false, 1) => ("info", "debug"),
        (false, 2) => ("debug", "debug"),
        _ => ("trace", "trace"),
    };
    format!("strata={app},strata_core={app},strata_adapters={adapters}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn flags(verbose: u8, quiet: bool) -> GlobalArgs {
        GlobalArgs {
            verbose,
            quiet,
            no_color: true,
            config: None,
            output_format: OutputFormat::Auto,
            project: PathBuf::from("."),
        }
    }

    #[test]
    fn default_shows_warnings_only() {
        assert_eq!(
            filter_directives(&flags(0, false)),
            "strata=warn,strata_core=warn,strata_adapters=warn"
        );
    }

    #[test]
    fn single_verbose_surfaces_adapter_io() {
        let directives = filter_directives(&flags(1, false));
        assert!(directives.contains("strata_core=info"));
        assert!(directives.contains("strata_adapters=debug"));
    }

    #[test]
    fn higher_verbosity_saturates_at_trace() {
        assert!(filter_directives(&flags(2, false)).contains("strata_core=debug"));
        assert_eq!(
            filter_directives(&flags(3, false)),
            filter_directives(&flags(9, false))
        );
        assert!(filter_directives(&flags(3, false)).contains("strata=trace"));
    }

    #[test]
    fn quiet_wins_over_verbose() {
        assert_eq!(
            filter_directives(&flags(3, true)),
            "strata=error,strata_core=error,strata_adapters=error"
        );
    }

    #[test]
    fn every_directive_parses() {
        for (verbose, quiet) in [(0, false), (1, false), (2, false), (3, false), (0, true)] {
            assert!(EnvFilter::try_new(filter_directives(&flags(verbose, quiet))).is_ok());
        }
    }
}
