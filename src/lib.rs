//! # Static HTTP Server
//! src/lib.rs
//!
//! Servidor HTTP concurrente de archivos estáticos: un request por
//! conexión, un pool fijo de workers y una cola compartida entre el
//! acceptor y los workers.
//!
//! ## Arquitectura
//!
//! - `workers`: cola FIFO bloqueante y pool fijo de threads
//! - `server`: acceptor, procesamiento de cada conexión y envío con sendfile
//! - `http`: request line, cabeceras de respuesta, 404 fijo, tipo MIME
//! - `sandbox`: chroot y daemon antes de empezar a servir
//! - `config`: argumentos CLI y variables de entorno
//! - `metrics`: contadores de conexiones y resultados
//! - `logging`: inicialización de `tracing`
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use static_httpd::config::Config;
//! use static_httpd::server::Server;
//!
//! let config = Config { directory: "/srv/www".to_string(), ..Config::default() };
//! let server = Server::new(config).expect("configuración inválida");
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod metrics;
pub mod sandbox;
pub mod server;
pub mod workers;

pub use error::{Error, Result};
