//! # Construcción de Respuestas HTTP
//!
//! El servidor solo arma dos tipos de respuesta:
//!
//! - 404: documento fijo, conocido en tiempo de compilación
//! - 200: solo la cabecera; el body se envía directo desde el archivo
//!
//! ## Formato de la cabecera 200
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Server: static_httpd/0.1.0\r\n
//! Connection: close\r\n
//! Content-Type: text/html\r\n
//! Content-Length: 1234\r\n
//! \r\n
//! ```

use super::{Mime, StatusCode};

/// Identificador enviado en el header `Server`
pub const SERVER_NAME: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

macro_rules! not_found_body {
    () => {
        "<html>\n<body><h2>404 - No such page</h2></body>\n</html>"
    };
}

/// Body HTML de la respuesta 404
pub const NOT_FOUND_BODY: &str = not_found_body!();

/// Respuesta 404 completa, se envía de una sola vez
pub const NOT_FOUND_RESPONSE: &str = concat!(
    "HTTP/1.1 404 Not Found\r\n",
    "Server: ",
    env!("CARGO_PKG_NAME"),
    "/",
    env!("CARGO_PKG_VERSION"),
    "\r\n",
    "Content-Length: 55\r\n",
    "Connection: close\r\n",
    "\r\n",
    not_found_body!()
);

/// Cabecera de una respuesta HTTP (status line + headers)
///
/// Los headers se escriben en el orden en que se agregan.
#[derive(Debug, Clone)]
pub struct ResponseHead {
    status: StatusCode,
    headers: Vec<(String, String)>,
}

impl ResponseHead {
    /// Crea una cabecera con `Server` y `Connection: close` ya incluidos
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: vec![
                ("Server".to_string(), SERVER_NAME.to_string()),
                ("Connection".to_string(), "close".to_string()),
            ],
        }
    }

    /// Cabecera de un archivo servido con éxito
    ///
    /// # Ejemplo
    /// ```
    /// use static_httpd::http::{Mime, ResponseHead};
    ///
    /// let head = ResponseHead::file(Mime::Html, 11);
    /// let text = String::from_utf8(head.to_bytes()).unwrap();
    /// assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
    /// assert!(text.contains("Content-Length: 11\r\n"));
    /// ```
    pub fn file(mime: Mime, size: u64) -> Self {
        Self::new(StatusCode::Ok)
            .with_header("Content-Type", mime.as_str())
            .with_header("Content-Length", &size.to_string())
    }

    /// Agrega un header al final
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Convierte la cabecera a bytes, terminada en la línea vacía
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = format!("HTTP/1.1 {}\r\n", self.status);

        for (name, value) in &self.headers {
            result.push_str(name);
            result.push_str(": ");
            result.push_str(value);
            result.push_str("\r\n");
        }

        result.push_str("\r\n");
        result.into_bytes()
    }
}
