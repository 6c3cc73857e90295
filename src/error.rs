//! # Errores de Arranque
//! src/error.rs
//!
//! Solo los errores que impiden que el servidor empiece a aceptar
//! conexiones. Los fallos de una conexión individual se registran en el
//! log y nunca llegan hasta aquí.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errores fatales de construcción o arranque
#[derive(Debug, Error)]
pub enum Error {
    /// Configuración inválida (workers = 0, directorio inexistente...)
    #[error("invalid configuration: {0}")]
    Config(String),

    /// No se pudo confinar el proceso al directorio raíz o desligarlo de la terminal
    #[error("sandbox setup failed ({step}): {source}")]
    Sandbox {
        step: &'static str,
        #[source]
        source: io::Error,
    },

    /// No se encontró ninguna dirección IPv4 para el puerto
    #[error("cannot resolve IPv4 bind address for port {port}")]
    Resolve { port: u16 },

    /// Falló socket/setsockopt/bind
    #[error("cannot bind port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: io::Error,
    },

    /// Falló listen
    #[error("cannot listen on port {port}: {source}")]
    Listen {
        port: u16,
        #[source]
        source: io::Error,
    },

    /// No se pudo lanzar un thread (worker o acceptor)
    #[error("cannot spawn thread: {0}")]
    Spawn(#[source] io::Error),

    /// El directorio raíz no se pudo resolver
    #[error("root directory {path:?} is not usable: {source}")]
    Root {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
