use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes console logging. `RUST_LOG` overrides the default `casos_etl=info`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("casos_etl=info"));

    let console_layer = fmt::layer().with_target(false).with_writer(std::io::stdout);

    // a global subscriber may already be installed
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init();
}
