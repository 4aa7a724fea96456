use tracing_subscriber::{fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter};

/// Builds the log filter for a verbosity level.
///
/// Only the `docket` and `docket_cli` targets are enabled: `info` by default, `debug` with
/// `-v`, `trace` with `-vv` or more. A `RUST_LOG` value, when set, takes precedence.
fn build_filter(verbose: u8) -> EnvFilter {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("docket={},docket_cli={}", level, level)))
}

/// Initialize tracing with the specified verbosity level and output format.
///
/// Logs go to stderr so that command output on stdout stays machine-readable.
///
/// # Arguments
/// * `json` - If true, output logs in JSON format; otherwise, use human-readable format.
/// * `verbose` - Verbosity level: 0 for INFO, 1 for DEBUG, 2+ for TRACE.
pub fn init_tracing(json: bool, verbose: u8) {
    let registry = tracing_subscriber::registry().with(build_filter(verbose));

    if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
    else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
