use tracing_subscriber::EnvFilter;

/// All workspace crate targets that should receive log output.
const CRATE_TARGETS: &[&str] = &[
    "sunsynth",
    "sunsynth_bootstrap",
    "sunsynth_irradiance",
    "sunsynth_pool",
    "sunsynth_stats",
    "sunsynth_table",
];

/// Default filter directives for a verbosity level.
///
/// Mapping:
/// - 0 -> warn
/// - 1 -> info
/// - 2 -> debug
/// - 3+ -> trace
pub fn filter_directives(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Installs a global `fmt` subscriber filtered by verbosity.
///
/// `RUST_LOG` overrides the verbosity if set. Calling this again after a
/// subscriber is installed does nothing.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(verbosity)));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
