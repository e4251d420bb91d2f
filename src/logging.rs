use tracing_subscriber::EnvFilter;

/// Initialize logging to stderr.
///
/// `RUST_LOG` wins when set; otherwise `info`, or `debug` for this crate when verbose.
/// `log` records from this crate and its dependencies are forwarded into `tracing`.
pub fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let default_filter = if verbose { "info,chanrank=debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;

    log::debug!("logging initialized (verbose={verbose})");
    Ok(())
}
