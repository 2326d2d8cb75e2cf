use env_logger::{Builder, Env};

/// Install the global logger.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects debug output and
/// the default only shows warnings.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let _ = Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(verbose)
        .try_init();
}
