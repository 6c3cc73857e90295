//! # Cola de Conexiones
//! src/workers/queue.rs
//!
//! Cola FIFO thread-safe entre el acceptor (un único productor) y los
//! workers (N consumidores). `push` nunca bloquea al acceptor; `wait_and_pop`
//! bloquea al worker hasta que haya una conexión disponible.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard};

/// Estado protegido por el mutex
struct QueueState<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// Cola FIFO sin capacidad máxima
///
/// Cada elemento encolado sale exactamente una vez y hacia un solo consumidor.
pub struct ConnectionQueue<T> {
    state: Mutex<QueueState<T>>,
    available: Condvar,
}

impl<T> ConnectionQueue<T> {
    /// Crea una cola vacía y abierta
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                closed: false,
            }),
            available: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        // Ningún consumidor procesa con el lock tomado, así que el estado
        // sigue siendo válido aunque otro thread haya hecho panic.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Encola un elemento al final y despierta a un worker en espera
    pub fn push(&self, item: T) {
        let mut state = self.lock();
        state.items.push_back(item);
        drop(state);

        self.available.notify_one();
    }

    /// Desencola el elemento más antiguo
    ///
    /// Bloquea hasta que haya un elemento. Solo retorna `None` cuando la cola
    /// fue cerrada con [`close`](Self::close) y ya no quedan elementos.
    pub fn wait_and_pop(&self) -> Option<T> {
        let mut state = self.lock();

        loop {
            if let Some(item) = state.items.pop_front() {
                return Some(item);
            }
            if state.closed {
                return None;
            }

            state = self
                .available
                .wait(state)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    /// Cierra la cola y despierta a todos los workers
    ///
    /// Los elementos pendientes se siguen entregando; después `wait_and_pop`
    /// retorna `None`.
    pub fn close(&self) {
        self.lock().closed = true;
        self.available.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Retorna el número de conexiones esperando un worker
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for ConnectionQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
