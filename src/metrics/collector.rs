//! # Collector de Métricas
//! src/metrics/collector.rs
//!
//! Contadores compartidos por el acceptor y los workers. Son atómicos para
//! no agregar otro lock al camino de cada conexión: la cola es el único
//! recurso compartido con mutex.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::server::Outcome;

/// Collector de métricas thread-safe
pub struct MetricsCollector {
    accepted: AtomicU64,
    accept_errors: AtomicU64,
    ok: AtomicU64,
    not_found: AtomicU64,
    server_errors: AtomicU64,
    empty: AtomicU64,
    io_errors: AtomicU64,
    bytes_sent: AtomicU64,
    busy_workers: AtomicU64,
    peak_busy_workers: AtomicU64,
    start_time: Instant,
}

/// Copia de las métricas en un instante dado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub accepted: u64,
    pub accept_errors: u64,
    pub ok: u64,
    pub not_found: u64,
    pub server_errors: u64,
    pub empty: u64,
    pub io_errors: u64,
    pub bytes_sent: u64,
    pub busy_workers: u64,
    pub peak_busy_workers: u64,
    pub uptime_secs: u64,
}

impl MetricsSnapshot {
    /// Conexiones ya procesadas por algún worker (con cualquier resultado)
    pub fn completed(&self) -> u64 {
        self.ok + self.not_found + self.server_errors + self.empty
    }
}

impl MetricsCollector {
    /// Crea un nuevo collector de métricas
    pub fn new() -> Self {
        Self {
            accepted: AtomicU64::new(0),
            accept_errors: AtomicU64::new(0),
            ok: AtomicU64::new(0),
            not_found: AtomicU64::new(0),
            server_errors: AtomicU64::new(0),
            empty: AtomicU64::new(0),
            io_errors: AtomicU64::new(0),
            bytes_sent: AtomicU64::new(0),
            busy_workers: AtomicU64::new(0),
            peak_busy_workers: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_accept(&self) {
        self.accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_accept_error(&self) {
        self.accept_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Registra el resultado de una conexión procesada
    pub fn record_outcome(&self, outcome: &Outcome) {
        let counter = match outcome {
            Outcome::Success { .. } => &self.ok,
            Outcome::NotFound => &self.not_found,
            Outcome::ServerError => &self.server_errors,
            Outcome::Empty => &self.empty,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_io_error(&self) {
        self.io_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_bytes_sent(&self, bytes: u64) {
        self.bytes_sent.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Marca un worker como ocupado y actualiza el pico
    pub fn worker_busy(&self) {
        let now = self.busy_workers.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_busy_workers.fetch_max(now, Ordering::SeqCst);
    }

    pub fn worker_idle(&self) {
        self.busy_workers.fetch_sub(1, Ordering::SeqCst);
    }

    /// Marca un worker como ocupado hasta que el guard se dropee (incluso con panic)
    pub fn busy_guard(&self) -> BusyGuard<'_> {
        self.worker_busy();
        BusyGuard { metrics: self }
    }

    /// Obtiene un snapshot de las métricas
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            accepted: self.accepted.load(Ordering::Relaxed),
            accept_errors: self.accept_errors.load(Ordering::Relaxed),
            ok: self.ok.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            server_errors: self.server_errors.load(Ordering::Relaxed),
            empty: self.empty.load(Ordering::Relaxed),
            io_errors: self.io_errors.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            busy_workers: self.busy_workers.load(Ordering::SeqCst),
            peak_busy_workers: self.peak_busy_workers.load(Ordering::SeqCst),
            uptime_secs: self.start_time.elapsed().as_secs(),
        }
    }

    /// Resumen de una línea para el log
    pub fn summary_line(&self) -> String {
        let s = self.snapshot();
        format!(
            "accepted={} ok={} not_found={} server_errors={} empty={} io_errors={} bytes_sent={} busy={}/{} uptime={}s",
            s.accepted,
            s.ok,
            s.not_found,
            s.server_errors,
            s.empty,
            s.io_errors,
            s.bytes_sent,
            s.busy_workers,
            s.peak_busy_workers,
            s.uptime_secs
        )
    }
}

/// Guard retornado por [`MetricsCollector::busy_guard`]
pub struct BusyGuard<'a> {
    metrics: &'a MetricsCollector,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.metrics.worker_idle();
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
