//! # Static HTTP Server - Entry Point
//! src/main.rs
//!
//! Parsea la configuración, prepara el sandbox y sirve para siempre.

use static_httpd::config::Config;
use static_httpd::logging;
use static_httpd::server::Server;
use tracing::error;

fn main() {
    let config = Config::new();
    logging::init(&config.log_filter);
    config.log_summary();

    // Construir el servidor (valida config, chroot, daemon)
    let server = match Server::new(config) {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, "no se pudo inicializar el servidor");
            std::process::exit(1);
        }
    };

    // Iniciar el servidor (esto bloqueará el thread)
    if let Err(e) = server.run() {
        error!(error = %e, "error fatal");
        std::process::exit(1);
    }
}
