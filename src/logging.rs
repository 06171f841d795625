//! Logging de diagnóstico vía `tracing`.
//!
//! Lee `RUST_LOG`; si no está definido usa `info`. La salida va a stderr.
//!
//! ```bash
//! RUST_LOG=quickplan=debug cargo run
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // `try_init` para que los tests que arrancan el servidor varias veces no fallen
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
