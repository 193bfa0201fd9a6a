use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// `filter` uses `RUST_LOG` syntax; an unparsable filter falls back to `info`.
pub fn init(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

    // A second call (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}
