//! # Parsing de la Request Line
//! src/http/request.rs
//!
//! El servidor solo mira la primera línea de lo que llega por el socket:
//!
//! ```text
//! GET /path HTTP/1.1\r\n
//! (todo lo demás se ignora)
//! ```
//!
//! El resto de headers y el body nunca se leen.

use regex::bytes::Regex;
use std::borrow::Cow;
use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

/// Máximo de bytes que se leen de una conexión (una sola lectura)
pub const MAX_REQUEST_SIZE: usize = 4096;

/// Archivo que se sirve cuando el path apunta a un directorio
pub const INDEX_FILE: &str = "index.html";

/// Errores que convierten la conexión en un request vacío
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No llegó ningún byte
    #[error("empty request")]
    EmptyRequest,

    /// La primera línea no tiene la forma `GET <path> HTTP...`
    #[error("invalid request line: {0:?}")]
    InvalidRequestLine(String),
}

fn request_line_regex() -> &'static Regex {
    static REQUEST_LINE: OnceLock<Regex> = OnceLock::new();
    REQUEST_LINE.get_or_init(|| {
        // Sin modo Unicode: el path puede traer bytes que no son UTF-8
        Regex::new(r"(?-u)^GET (.*) HTTP.*$").unwrap_or_else(|e| panic!("invalid request line regex: {e}"))
    })
}

/// Request GET ya reconocido
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Path tal como llegó, sin decodificar (ej: "/index.html")
    path: Vec<u8>,
}

impl Request {
    /// Parsea el request desde los bytes leídos del socket
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use static_httpd::http::Request;
    ///
    /// let request = Request::parse(b"GET /index.html HTTP/1.1\r\nHost: x\r\n\r\n").unwrap();
    /// assert_eq!(request.path(), b"/index.html");
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        if buffer.is_empty() {
            return Err(ParseError::EmptyRequest);
        }

        let line = request_line(buffer);

        let path = request_line_regex()
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_bytes())
            .filter(|path| !path.is_empty())
            .ok_or_else(|| ParseError::InvalidRequestLine(String::from_utf8_lossy(line).into_owned()))?;

        Ok(Request { path: path.to_vec() })
    }

    pub fn path(&self) -> &[u8] {
        &self.path
    }

    /// Path legible para los logs
    pub fn display_path(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.path)
    }

    /// Resuelve el path del request dentro de `root`
    ///
    /// Se descartan la query y el fragmento. Retorna `None` si algún
    /// componente es `..`.
    ///
    /// ```
    /// use std::path::Path;
    /// use static_httpd::http::Request;
    ///
    /// let request = Request::parse(b"GET /docs/a.txt?v=2 HTTP/1.0\r\n").unwrap();
    /// assert_eq!(request.resolve(Path::new("/srv")).unwrap(), Path::new("/srv/docs/a.txt"));
    /// ```
    pub fn resolve(&self, root: &Path) -> Option<PathBuf> {
        let mut path = self
            .path
            .split(|&b| b == b'?' || b == b'#')
            .next()
            .unwrap_or_default();
        while let [b'/', rest @ ..] = path {
            path = rest;
        }

        let mut resolved = root.to_path_buf();
        for component in Path::new(OsStr::from_bytes(path)).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }

        Some(resolved)
    }
}

/// Retorna la primera línea: hasta el primer `\r` o `\n`, o todo el buffer
pub fn request_line(buffer: &[u8]) -> &[u8] {
    match buffer.iter().position(|&b| b == b'\r' || b == b'\n') {
        Some(end) => &buffer[..end],
        None => buffer,
    }
}
