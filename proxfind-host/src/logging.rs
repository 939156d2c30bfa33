use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

/// Install the stderr subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("proxfind={},proxfind_host={},warn", level, level)));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(true);

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = Registry::default().with(env_filter).with(fmt_layer).try_init();
}
