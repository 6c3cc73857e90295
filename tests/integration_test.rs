//! Tests de integración para el servidor de archivos estáticos
//! tests/integration_test.rs
//!
//! Cada test arranca un servidor real en un puerto efímero, con su propio
//! directorio raíz bajo `temp_dir()`, y habla con él por TCP.

use static_httpd::config::Config;
use static_httpd::http::{NOT_FOUND_RESPONSE, SERVER_NAME};
use static_httpd::metrics::MetricsCollector;
use static_httpd::server::{Server, ServerHandle};
use std::fs;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Servidor de prueba con su directorio raíz
struct TestServer {
    root: PathBuf,
    addr: SocketAddr,
    metrics: Arc<MetricsCollector>,
    _handle: ServerHandle,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        fs::remove_dir_all(&self.root).ok();
    }
}

/// Helper: crea un directorio raíz con `files` y arranca un servidor con `workers`
fn start_server(name: &str, workers: usize, files: &[(&str, &[u8])]) -> TestServer {
    let root = std::env::temp_dir().join(format!("static_httpd_it_{}_{}", name, std::process::id()));
    fs::create_dir_all(&root).unwrap();
    for (path, contents) in files {
        let full = root.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, contents).unwrap();
    }

    let config = Config {
        directory: root.to_string_lossy().to_string(),
        port: 0,
        workers,
        ..Config::default()
    };

    let server = Server::new(config).expect("server init");
    let metrics = server.metrics();
    let handle = server.start().expect("server start");
    let addr = SocketAddr::from(([127, 0, 0, 1], handle.local_addr().port()));

    TestServer {
        root,
        addr,
        metrics,
        _handle: handle,
    }
}

/// Helper: envía `raw` y retorna todos los bytes hasta que el servidor cierra
fn send_raw(addr: SocketAddr, raw: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).expect("connect");
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    stream.set_write_timeout(Some(Duration::from_secs(5))).unwrap();

    stream.write_all(raw).unwrap();
    stream.flush().unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).expect("read response");
    response
}

/// Helper: separa cabecera y body
fn split_response(response: &[u8]) -> (String, &[u8]) {
    let pos = response
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response without blank line");
    (String::from_utf8_lossy(&response[..pos]).to_string(), &response[pos + 4..])
}

#[test]
fn test_get_html_file() {
    let page = b"<html><body>hola mundo</body></html>";
    let server = start_server("html", 2, &[("index.html", page.as_slice())]);

    let response = send_raw(server.addr, b"GET /index.html HTTP/1.1\r\n\r\n");
    let (head, body) = split_response(&response);

    assert!(head.starts_with("HTTP/1.1 200 OK"));
    assert!(head.contains(&format!("Server: {}", SERVER_NAME)));
    assert!(head.contains("Connection: close"));
    assert!(head.contains("Content-Type: text/html"));
    assert!(head.contains(&format!("Content-Length: {}", page.len())));
    assert_eq!(body, page);
}

#[test]
fn test_get_binary_file_is_plain_and_exact() {
    let contents: Vec<u8> = (0..300_000u32).map(|i| (i * 7 % 256) as u8).collect();
    let server = start_server("binary", 2, &[("data/blob.bin", contents.as_slice())]);

    let response = send_raw(server.addr, b"GET /data/blob.bin HTTP/1.0\r\nHost: localhost\r\n\r\n");
    let (head, body) = split_response(&response);

    assert!(head.contains("Content-Type: text/plain"));
    assert!(head.contains(&format!("Content-Length: {}", contents.len())));
    assert_eq!(body, &contents[..]);
}

#[test]
fn test_missing_file_is_fixed_404() {
    let server = start_server("missing", 2, &[]);

    let response = send_raw(server.addr, b"GET /missing.txt HTTP/1.1\r\n\r\n");

    assert_eq!(response, NOT_FOUND_RESPONSE.as_bytes());
}

#[test]
fn test_post_gets_no_response() {
    let server = start_server("post", 2, &[("index.html", b"x".as_slice())]);

    let response = send_raw(server.addr, b"POST / HTTP/1.1\r\n\r\n");

    assert!(response.is_empty());
}

#[test]
fn test_garbage_gets_no_response() {
    let server = start_server("garbage", 1, &[]);

    let response = send_raw(server.addr, b"\x00\x01\x02\x03garbage\r\n");

    assert!(response.is_empty());
}

#[test]
fn test_repeated_get_is_byte_identical() {
    let server = start_server("idempotent", 2, &[("a.txt", b"contenido estable".as_slice())]);

    let first = send_raw(server.addr, b"GET /a.txt HTTP/1.1\r\n\r\n");
    let second = send_raw(server.addr, b"GET /a.txt HTTP/1.1\r\n\r\n");

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn test_root_serves_index() {
    let server = start_server("root_index", 1, &[("index.html", b"home".as_slice())]);

    let response = send_raw(server.addr, b"GET / HTTP/1.1\r\n\r\n");
    let (head, body) = split_response(&response);

    assert!(head.contains("Content-Type: text/html"));
    assert_eq!(body, b"home");
}

#[test]
fn test_traversal_is_404() {
    let server = start_server("traversal", 1, &[("index.html", b"x".as_slice())]);

    let response = send_raw(server.addr, b"GET /../../../../etc/passwd HTTP/1.1\r\n\r\n");

    assert_eq!(response, NOT_FOUND_RESPONSE.as_bytes());
}

#[test]
fn test_more_connections_than_workers() {
    const WORKERS: usize = 2;
    const CLIENTS: usize = 16;

    let server = start_server("concurrent", WORKERS, &[("page.html", b"<p>ok</p>".as_slice())]);
    let addr = server.addr;

    let clients: Vec<_> = (0..CLIENTS)
        .map(|_| thread::spawn(move || send_raw(addr, b"GET /page.html HTTP/1.1\r\n\r\n")))
        .collect();

    for client in clients {
        let response = client.join().unwrap();
        let (head, body) = split_response(&response);
        assert!(head.starts_with("HTTP/1.1 200 OK"));
        assert_eq!(body, b"<p>ok</p>");
    }

    let snapshot = server.metrics.snapshot();
    assert_eq!(snapshot.ok, CLIENTS as u64);
    assert!(snapshot.peak_busy_workers <= WORKERS as u64);
}

#[test]
fn test_slow_client_does_not_block_other_workers() {
    let server = start_server("slow", 2, &[("a.txt", b"rapido".as_slice())]);

    // Ocupa un worker: conecta y no manda nada
    let idle = TcpStream::connect(server.addr).unwrap();

    let started = Instant::now();
    let response = send_raw(server.addr, b"GET /a.txt HTTP/1.1\r\n\r\n");
    let (_, body) = split_response(&response);

    assert_eq!(body, b"rapido");
    assert!(started.elapsed() < Duration::from_secs(5));
    drop(idle);
}

#[test]
fn test_every_accepted_connection_is_completed() {
    let server = start_server("accounting", 3, &[("x.txt", b"x".as_slice())]);

    let requests: [&[u8]; 4] = [
        b"GET /x.txt HTTP/1.1\r\n\r\n",
        b"GET /nope HTTP/1.1\r\n\r\n",
        b"DELETE /x.txt HTTP/1.1\r\n\r\n",
        b"GET /x.txt HTTP/1.0\r\n\r\n",
    ];
    for raw in requests {
        send_raw(server.addr, raw);
    }

    // El resultado se registra antes de cerrar la conexión
    let snapshot = server.metrics.snapshot();
    assert_eq!(snapshot.accepted, 4);
    assert_eq!(snapshot.completed(), 4);
    assert_eq!(snapshot.ok, 2);
    assert_eq!(snapshot.not_found, 1);
    assert_eq!(snapshot.empty, 1);
}
