//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Un thread acceptor encola cada conexión aceptada; un pool fijo de workers
//! las saca de la cola y las procesa. El acceptor nunca espera a los
//! workers: solo se bloquea en `accept`.
//!
//! ```text
//! acceptor ──push──▶ ConnectionQueue ──wait_and_pop──▶ worker-0..N ──▶ RequestProcessor
//! ```

use crate::config::Config;
use crate::error::{Error, Result};
use crate::metrics::MetricsCollector;
use crate::sandbox;
use crate::server::connection::RequestProcessor;
use crate::workers::{ConnectionQueue, WorkerPool};
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::net::{Ipv4Addr, SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info};

/// Backlog de `listen`
pub const LISTEN_BACKLOG: i32 = 10;

/// Socket de escucha en todas las interfaces IPv4
pub struct Acceptor {
    listener: TcpListener,
}

impl Acceptor {
    /// Resuelve `0.0.0.0:<port>`, activa `SO_REUSEADDR`, hace bind y listen
    pub fn bind(port: u16) -> Result<Self> {
        let address = (Ipv4Addr::UNSPECIFIED, port)
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.find(SocketAddr::is_ipv4))
            .map(SockAddr::from)
            .ok_or(Error::Resolve { port })?;

        let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))
            .map_err(|source| Error::Bind { port, source })?;
        socket
            .set_reuse_address(true)
            .map_err(|source| Error::Bind { port, source })?;
        socket.bind(&address).map_err(|source| Error::Bind { port, source })?;
        socket
            .listen(LISTEN_BACKLOG)
            .map_err(|source| Error::Listen { port, source })?;

        Ok(Self {
            listener: socket.into(),
        })
    }

    /// Dirección realmente asignada (útil con puerto 0)
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Loop infinito: acepta y encola. Un error de accept se registra y se sigue.
    pub fn run(self, queue: Arc<ConnectionQueue<TcpStream>>, metrics: Arc<MetricsCollector>) {
        loop {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    debug!(%peer, "nueva conexión");
                    metrics.record_accept();
                    queue.push(stream);
                }
                Err(e) => {
                    error!(error = %e, "accept");
                    metrics.record_accept_error();
                }
            }
        }
    }
}

/// Servidor de archivos estáticos
pub struct Server {
    config: Config,
    root: PathBuf,
    queue: Arc<ConnectionQueue<TcpStream>>,
    metrics: Arc<MetricsCollector>,
}

impl Server {
    /// Valida la configuración y prepara el sandbox
    ///
    /// # Errores
    ///
    /// `Error::Config` si la configuración es inválida, `Error::Root` o
    /// `Error::Sandbox` si no se pudo preparar el directorio raíz. En esos
    /// casos el servidor no debe arrancar.
    pub fn new(config: Config) -> Result<Self> {
        config.validate().map_err(Error::Config)?;
        let root = sandbox::enter(&config)?;

        Ok(Self {
            config,
            root,
            queue: Arc::new(ConnectionQueue::new()),
            metrics: Arc::new(MetricsCollector::new()),
        })
    }

    pub fn metrics(&self) -> Arc<MetricsCollector> {
        Arc::clone(&self.metrics)
    }

    /// Abre el socket, lanza los workers y el thread acceptor
    pub fn start(&self) -> Result<ServerHandle> {
        if self.config.address != "0.0.0.0" {
            info!(
                address = %self.config.address,
                "la dirección es informativa: se escucha en todas las interfaces IPv4"
            );
        }

        let acceptor = Acceptor::bind(self.config.port)?;
        let local_addr = acceptor.local_addr().map_err(|source| Error::Bind {
            port: self.config.port,
            source,
        })?;

        let processor = Arc::new(RequestProcessor::new(self.root.clone(), Arc::clone(&self.metrics)));
        let metrics = Arc::clone(&self.metrics);

        let pool = WorkerPool::spawn(self.config.workers, Arc::clone(&self.queue), move |stream| {
            let _busy = metrics.busy_guard();
            processor.process(stream);
            debug!(metrics = %metrics.summary_line(), "conexión cerrada");
        })
        .map_err(Error::Spawn)?;

        let acceptor_thread = thread::Builder::new()
            .name("acceptor".to_string())
            .spawn({
                let queue = Arc::clone(&self.queue);
                let metrics = Arc::clone(&self.metrics);
                move || acceptor.run(queue, metrics)
            })
            .map_err(Error::Spawn)?;

        info!(
            %local_addr,
            root = %self.root.display(),
            workers = pool.size(),
            "servidor escuchando"
        );

        Ok(ServerHandle {
            local_addr,
            acceptor: acceptor_thread,
            pool,
        })
    }

    /// Arranca y bloquea el thread actual para siempre
    pub fn run(&self) -> Result<()> {
        self.start()?.wait();
        Ok(())
    }
}

/// Servidor en marcha
pub struct ServerHandle {
    local_addr: SocketAddr,
    acceptor: JoinHandle<()>,
    pool: WorkerPool<TcpStream>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn workers(&self) -> usize {
        self.pool.size()
    }

    /// Espera al thread acceptor, que nunca termina
    pub fn wait(self) {
        if self.acceptor.join().is_err() {
            error!("el thread acceptor terminó con panic");
        }
        self.pool.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    #[test]
    fn test_acceptor_ephemeral_port() {
        let acceptor = Acceptor::bind(0).unwrap();
        let addr = acceptor.local_addr().unwrap();
        assert!(addr.is_ipv4());
        assert_ne!(addr.port(), 0);
        assert!(addr.ip().is_unspecified());
    }

    #[test]
    fn test_acceptor_pushes_connections() {
        let acceptor = Acceptor::bind(0).unwrap();
        let port = acceptor.local_addr().unwrap().port();
        let queue = Arc::new(ConnectionQueue::new());
        let metrics = Arc::new(MetricsCollector::new());

        thread::spawn({
            let queue = Arc::clone(&queue);
            let metrics = Arc::clone(&metrics);
            move || acceptor.run(queue, metrics)
        });

        let mut client = TcpStream::connect(("127.0.0.1", port)).unwrap();
        let mut server_side = queue.wait_and_pop().unwrap();

        client.write_all(b"ping").unwrap();
        let mut buf = [0u8; 4];
        server_side.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"ping");
        assert_eq!(metrics.snapshot().accepted, 1);
    }

    #[test]
    fn test_bind_same_port_twice_fails() {
        let first = Acceptor::bind(0).unwrap();
        let port = first.local_addr().unwrap().port();
        assert!(matches!(Acceptor::bind(port), Err(Error::Bind { .. })));
    }

    #[test]
    fn test_server_rejects_zero_workers() {
        let config = Config {
            workers: 0,
            ..Config::default()
        };
        assert!(matches!(Server::new(config), Err(Error::Config(_))));
    }
}
