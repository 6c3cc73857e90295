//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Escucha en un puerto (thread acceptor)
//! 2. Encola cada conexión aceptada
//! 3. Reparte las conexiones entre un pool fijo de workers
//! 4. Lee el request, envía el archivo o el 404 y cierra

pub mod connection;
pub mod tcp;
pub mod transfer;

// Re-exportar para facilitar el uso
pub use connection::{Outcome, RequestProcessor};
pub use tcp::{Acceptor, Server, ServerHandle};
