//! # Sistema de Workers
//! src/workers/mod.rs
//!
//! Distribución de conexiones aceptadas entre un pool fijo de threads:
//! - `queue`: cola FIFO bloqueante compartida (un productor, N consumidores)
//! - `pool`: workers de larga duración que consumen la cola

pub mod pool;
pub mod queue;

pub use pool::WorkerPool;
pub use queue::ConnectionQueue;
