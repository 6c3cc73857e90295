//! # Procesamiento de una Conexión
//! src/server/connection.rs
//!
//! Lo que hace un worker con cada conexión que saca de la cola:
//!
//! 1. Una sola lectura de hasta 4096 bytes
//! 2. Request line `GET <path> HTTP...`; si no coincide no se responde nada
//! 3. Resolver el path contra la raíz y abrir el archivo
//!    - no se puede abrir: 404 fijo
//!    - no se pueden leer los metadatos: no se responde nada
//!    - todo bien: cabecera 200 + archivo con sendfile
//! 4. Cerrar la conexión (al dropear el `TcpStream`)

use crate::http::request::{INDEX_FILE, MAX_REQUEST_SIZE};
use crate::http::{Mime, Request, ResponseHead, StatusCode, NOT_FOUND_RESPONSE};
use crate::metrics::MetricsCollector;
use crate::server::transfer;
use std::fs::{File, Metadata};
use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Resultado de procesar una conexión
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Request vacío o que no es `GET <path> HTTP...`: no se envió nada
    Empty,

    /// El archivo no existe o no se pudo abrir: se envió el 404
    NotFound,

    /// Se abrió el archivo pero fallaron sus metadatos: no se envió nada
    ServerError,

    /// Se envió la cabecera 200 y el archivo
    Success { path: PathBuf, size: u64, mime: Mime },
}

/// Fallo al abrir el destino de un request
enum OpenError {
    NotFound(io::Error),
    Metadata(io::Error),
}

/// Procesador de requests compartido por todos los workers
///
/// No tiene estado mutable propio; los contadores son atómicos.
pub struct RequestProcessor {
    root: PathBuf,
    metrics: Arc<MetricsCollector>,
}

impl RequestProcessor {
    /// `root` es el directorio contra el que se resuelven los paths
    /// (`/` si el proceso hizo chroot)
    pub fn new(root: PathBuf, metrics: Arc<MetricsCollector>) -> Self {
        Self { root, metrics }
    }

    /// Procesa la conexión completa y la cierra
    pub fn process(&self, mut stream: TcpStream) -> Outcome {
        let peer = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        let buffer = self.read_request(&mut stream);

        let outcome = match Request::parse(&buffer) {
            Ok(request) => {
                debug!(%peer, path = %request.display_path(), "GET");
                self.respond(&mut stream, &request)
            }
            Err(e) => {
                debug!(%peer, error = %e, "request descartado sin respuesta");
                Outcome::Empty
            }
        };

        self.metrics.record_outcome(&outcome);
        outcome
    }

    /// Una sola lectura; un error deja el buffer vacío
    fn read_request(&self, stream: &mut TcpStream) -> Vec<u8> {
        let mut buffer = vec![0u8; MAX_REQUEST_SIZE];

        match stream.read(&mut buffer) {
            Ok(n) => buffer.truncate(n),
            Err(e) => {
                error!(error = %e, "recv");
                self.metrics.record_io_error();
                buffer.clear();
            }
        }

        buffer
    }

    fn respond(&self, stream: &mut TcpStream, request: &Request) -> Outcome {
        let Some(path) = request.resolve(&self.root) else {
            warn!(path = %request.display_path(), "path fuera de la raíz");
            return self.not_found(stream);
        };

        let (mut file, metadata, path) = match open_target(path) {
            Ok(target) => target,
            Err(OpenError::NotFound(e)) => {
                debug!(path = %request.display_path(), error = %e, "archivo no encontrado");
                return self.not_found(stream);
            }
            Err(OpenError::Metadata(e)) => {
                error!(path = %request.display_path(), error = %e, "fstat");
                return Outcome::ServerError;
            }
        };

        let size = metadata.len();
        let mime = Mime::from_path(&path);
        let head = ResponseHead::file(mime, size).to_bytes();

        match transfer::send_file(stream, &head, &mut file, size) {
            Ok(sent) => self.metrics.record_bytes_sent(sent),
            Err(e) => {
                error!(path = %path.display(), error = %e, "error enviando archivo");
                self.metrics.record_io_error();
            }
        }

        Outcome::Success { path, size, mime }
    }

    fn not_found(&self, stream: &mut TcpStream) -> Outcome {
        debug!(status = %StatusCode::NotFound, "respuesta fija");
        if let Err(e) = stream.write_all(NOT_FOUND_RESPONSE.as_bytes()) {
            error!(error = %e, "send");
            self.metrics.record_io_error();
        }
        Outcome::NotFound
    }
}

/// Abre el archivo; si es un directorio, abre su `index.html`
fn open_target(path: PathBuf) -> Result<(File, Metadata, PathBuf), OpenError> {
    let (file, metadata) = open_with_metadata(&path)?;
    if !metadata.is_dir() {
        return Ok((file, metadata, path));
    }

    let index = path.join(INDEX_FILE);
    let (file, metadata) = open_with_metadata(&index)?;
    if metadata.is_dir() {
        return Err(OpenError::NotFound(io::Error::new(
            io::ErrorKind::NotFound,
            "index is a directory",
        )));
    }
    Ok((file, metadata, index))
}

fn open_with_metadata(path: &Path) -> Result<(File, Metadata), OpenError> {
    let file = File::open(path).map_err(OpenError::NotFound)?;
    let metadata = file.metadata().map_err(OpenError::Metadata)?;
    Ok((file, metadata))
}
