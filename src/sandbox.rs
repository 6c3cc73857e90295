//! # Sandbox del Proceso
//! src/sandbox.rs
//!
//! Se ejecuta una sola vez, antes de abrir el socket y lanzar workers:
//!
//! 1. Con `--chroot`: `chroot(directorio)` + `chdir("/")`. A partir de ahí
//!    los paths de los requests se resuelven contra `/`.
//! 2. Con `--daemon`: `daemon(0, 0)` desliga el proceso de la terminal.
//!
//! Sin `--chroot` el directorio se canonicaliza y los paths se resuelven
//! contra esa ruta absoluta.

use crate::config::Config;
use crate::error::{Error, Result};
use std::ffi::CString;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prepara el proceso y retorna el directorio raíz a usar al resolver paths
pub fn enter(config: &Config) -> Result<PathBuf> {
    let root = canonical_root(Path::new(&config.directory))?;

    let root = if config.chroot {
        chroot(&root)?;
        info!(directory = %root.display(), "proceso confinado con chroot");
        PathBuf::from("/")
    } else {
        root
    };

    if config.daemon {
        daemonize()?;
        info!("proceso desligado de la terminal");
    }

    Ok(root)
}

/// Canonicaliza el directorio y verifica que exista y sea un directorio
pub fn canonical_root(directory: &Path) -> Result<PathBuf> {
    let root = directory.canonicalize().map_err(|source| Error::Root {
        path: directory.to_path_buf(),
        source,
    })?;

    if !root.is_dir() {
        return Err(Error::Config(format!("{} is not a directory", root.display())));
    }

    Ok(root)
}

fn chroot(root: &Path) -> Result<()> {
    let path = CString::new(root.as_os_str().as_bytes()).map_err(|e| Error::Sandbox {
        step: "chroot",
        source: io::Error::new(io::ErrorKind::InvalidInput, e),
    })?;

    // SAFETY: `path` es un C string válido que vive durante la llamada.
    if unsafe { libc::chroot(path.as_ptr()) } != 0 {
        return Err(Error::Sandbox {
            step: "chroot",
            source: io::Error::last_os_error(),
        });
    }

    std::env::set_current_dir("/").map_err(|source| Error::Sandbox { step: "chdir", source })
}

fn daemonize() -> Result<()> {
    // SAFETY: daemon(3) solo hace fork/setsid/dup2; todavía no hay otros
    // threads corriendo en este punto.
    if unsafe { libc::daemon(0, 0) } != 0 {
        return Err(Error::Sandbox {
            step: "daemon",
            source: io::Error::last_os_error(),
        });
    }
    Ok(())
}
