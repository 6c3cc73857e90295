//! # Pool de Workers
//! src/workers/pool.rs
//!
//! Pool de tamaño fijo. Cada worker es un thread de larga duración que
//! repite: sacar una conexión de la cola, procesarla y cerrarla.

use super::queue::ConnectionQueue;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info};

/// Un thread del pool
struct Worker {
    id: usize,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    fn spawn<T, F>(id: usize, queue: Arc<ConnectionQueue<T>>, handler: Arc<F>) -> std::io::Result<Self>
    where
        T: Send + 'static,
        F: Fn(T) + Send + Sync + 'static,
    {
        let handle = thread::Builder::new()
            .name(format!("worker-{}", id))
            .spawn(move || {
                debug!(worker = id, "worker iniciado");

                while let Some(conn) = queue.wait_and_pop() {
                    // La conexión se mueve al handler: al terminar (o al hacer
                    // panic) se dropea y queda cerrada.
                    let result = panic::catch_unwind(AssertUnwindSafe(|| handler(conn)));
                    if result.is_err() {
                        error!(worker = id, "panic procesando conexión, el worker continúa");
                    }
                }

                debug!(worker = id, "cola cerrada, worker terminado");
            })?;

        Ok(Self {
            id,
            handle: Some(handle),
        })
    }
}

/// Pool fijo de workers consumiendo una [`ConnectionQueue`]
pub struct WorkerPool<T> {
    workers: Vec<Worker>,
    queue: Arc<ConnectionQueue<T>>,
}

impl<T: Send + 'static> WorkerPool<T> {
    /// Lanza `size` workers que procesan cada elemento de `queue` con `handler`
    ///
    /// # Errores
    ///
    /// Falla si el sistema operativo no puede crear alguno de los threads.
    /// En ese caso la cola queda cerrada y los workers ya lanzados terminan.
    pub fn spawn<F>(size: usize, queue: Arc<ConnectionQueue<T>>, handler: F) -> std::io::Result<Self>
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let handler = Arc::new(handler);
        let mut pool = Self {
            workers: Vec::with_capacity(size),
            queue,
        };

        for id in 0..size {
            // Con `?` el pool parcial se dropea: cierra la cola y hace join
            let worker = Worker::spawn(id, Arc::clone(&pool.queue), Arc::clone(&handler))?;
            pool.workers.push(worker);
        }

        info!(workers = size, "pool de workers listo");

        Ok(pool)
    }

    /// Número de workers del pool
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Cierra la cola y espera a que todos los workers terminen
    ///
    /// Las conexiones que seguían encoladas se procesan antes de salir.
    /// Equivale a dropear el pool.
    pub fn shutdown(self) {
        drop(self);
    }
}

impl<T> Drop for WorkerPool<T> {
    fn drop(&mut self) {
        self.queue.close();

        for worker in &mut self.workers {
            if let Some(handle) = worker.handle.take() {
                if handle.join().is_err() {
                    error!(worker = worker.id, "el worker terminó con panic");
                }
            }
        }
    }
}
