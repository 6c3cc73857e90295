//! # Módulo HTTP
//!
//! El subconjunto mínimo de HTTP que necesita un servidor de archivos
//! estáticos de un request por conexión:
//!
//! - Reconocer la request line `GET <path> HTTP/<version>`
//! - Construir la cabecera de una respuesta 200
//! - El documento 404 fijo
//! - Elegir el `Content-Type` por extensión
//!
//! ### Formato de Request
//!
//! ```text
//! GET /index.html HTTP/1.1\r\n
//! (headers ignorados)
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Server: static_httpd/0.1.0\r\n
//! Connection: close\r\n
//! Content-Type: text/html\r\n
//! Content-Length: 13\r\n
//! \r\n
//! <bytes del archivo>
//! ```

pub mod mime;
pub mod request;
pub mod response;
pub mod status;

// Re-exportamos los tipos principales para facilitar su uso
pub use mime::Mime;
pub use request::{ParseError, Request};
pub use response::{ResponseHead, NOT_FOUND_BODY, NOT_FOUND_RESPONSE, SERVER_NAME};
pub use status::StatusCode;
