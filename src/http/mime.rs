//! Tipo MIME por extensión: `.html` o texto plano.

use std::os::unix::ffi::OsStrExt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mime {
    Html,
    Plain,
}

impl Mime {
    /// Elige el tipo según el sufijo del path
    ///
    /// ```
    /// use std::os::unix::ffi::OsStrExt;
    /// use std::path::Path;
    /// use static_httpd::http::Mime;
    ///
    /// assert_eq!(Mime::from_path(Path::new("/www/index.html")), Mime::Html);
    /// assert_eq!(Mime::from_path(Path::new("/www/logo.png")), Mime::Plain);
    /// ```
    pub fn from_path(path: &Path) -> Self {
        if path.as_os_str().as_bytes().ends_with(b".html") {
            Mime::Html
        } else {
            Mime::Plain
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mime::Html => "text/html",
            Mime::Plain => "text/plain",
        }
    }
}
