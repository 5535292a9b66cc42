use log::LevelFilter;

/// Initialize logging once.
///
/// `RUST_LOG` wins when set; otherwise this crate logs at `info`, or `debug`
/// with `verbose`, and everything else at `warn`.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if std::env::var_os("RUST_LOG").is_none() {
        builder.filter_module("ishpose", level);
    }

    // Already initialized (tests, embedding apps): keep the existing logger.
    let _ = builder.try_init();
}
