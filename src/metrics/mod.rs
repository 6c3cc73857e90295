//! # Sistema de Métricas
//! src/metrics/mod.rs
//!
//! Contadores del servidor:
//! - Conexiones aceptadas y errores de accept
//! - Resultados por tipo (200, 404, error, request vacío)
//! - Bytes de archivo enviados
//! - Workers ocupados y pico de workers ocupados

pub mod collector;

pub use collector::{BusyGuard, MetricsCollector, MetricsSnapshot};
