//! # Inicialización del Logging
//! src/logging.rs
//!
//! Logs estructurados con `tracing`, a stderr. El filtro viene de
//! `--log-filter` o `RUST_LOG` (por ejemplo `static_httpd=debug`).

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Instala el subscriber global
///
/// Un filtro inválido cae a `info`. Llamadas repetidas se ignoran.
pub fn init(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_thread_names(true)
                .with_target(false),
        )
        .try_init();
}
