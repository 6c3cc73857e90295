//! # Envío de Archivos
//! src/server/transfer.rs
//!
//! Envía la cabecera y el contenido del archivo por el socket:
//!
//! 1. `TCP_CORK` activado: la cabecera y el inicio del body salen juntos
//! 2. cabecera con `write_all`
//! 3. body con `sendfile(2)`, del descriptor del archivo al del socket,
//!    sin pasar por un buffer en memoria
//! 4. `TCP_CORK` desactivado: se vacía lo que quede pendiente
//!
//! Fuera de Linux no hay cork y el body se copia con `io::copy`.

use std::fs::File;
use std::io::{self, Write};
use std::net::TcpStream;
use tracing::warn;

/// Envía `head` seguido de los primeros `size` bytes de `file`
///
/// Retorna los bytes del body efectivamente enviados. Un fallo de cork solo
/// se registra; un fallo de escritura aborta el envío.
pub fn send_file(stream: &mut TcpStream, head: &[u8], file: &mut File, size: u64) -> io::Result<u64> {
    if let Err(e) = set_cork(stream, true) {
        warn!(error = %e, "no se pudo activar TCP_CORK");
    }

    let result = stream.write_all(head).and_then(|_| copy_body(stream, file, size));

    if let Err(e) = set_cork(stream, false) {
        warn!(error = %e, "no se pudo desactivar TCP_CORK");
    }

    let sent = result?;
    if sent < size {
        warn!(expected = size, sent, "el archivo se acortó durante el envío");
    }
    Ok(sent)
}

#[cfg(target_os = "linux")]
fn set_cork(stream: &TcpStream, enable: bool) -> io::Result<()> {
    use std::os::unix::io::AsRawFd;

    let value: libc::c_int = enable.into();
    // SAFETY: el fd es válido mientras `stream` exista y `value` vive
    // durante toda la llamada.
    let ret = unsafe {
        libc::setsockopt(
            stream.as_raw_fd(),
            libc::IPPROTO_TCP,
            libc::TCP_CORK,
            &value as *const libc::c_int as *const libc::c_void,
            std::mem::size_of::<libc::c_int>() as libc::socklen_t,
        )
    };

    if ret == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn set_cork(_stream: &TcpStream, _enable: bool) -> io::Result<()> {
    Ok(())
}

/// Máximo que acepta `sendfile` en una sola llamada
#[cfg(target_os = "linux")]
const SENDFILE_MAX_CHUNK: u64 = 0x7fff_f000;

#[cfg(target_os = "linux")]
fn copy_body(stream: &mut TcpStream, file: &mut File, size: u64) -> io::Result<u64> {
    use std::os::unix::io::AsRawFd;

    let mut offset: libc::off_t = 0;
    let mut sent: u64 = 0;

    while sent < size {
        let chunk = (size - sent).min(SENDFILE_MAX_CHUNK) as usize;
        // SAFETY: ambos fds son válidos durante la llamada y `offset`
        // apunta a una variable local.
        let n = unsafe { libc::sendfile(stream.as_raw_fd(), file.as_raw_fd(), &mut offset, chunk) };

        if n < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err);
        }
        if n == 0 {
            break;
        }
        sent += n as u64;
    }

    Ok(sent)
}

#[cfg(not(target_os = "linux"))]
fn copy_body(stream: &mut TcpStream, file: &mut File, size: u64) -> io::Result<u64> {
    use std::io::Read;
    io::copy(&mut file.take(size), stream)
}
