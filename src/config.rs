//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración con soporte para argumentos CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./static_httpd --directory /srv/www --port 8080 --workers 8
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTPD_PORT=8080 HTTPD_DIRECTORY=/srv/www ./static_httpd
//! ```

use clap::Parser;
use tracing::info;

/// Configuración del servidor de archivos estáticos
#[derive(Debug, Clone, Parser)]
#[command(name = "static_httpd")]
#[command(about = "Servidor HTTP concurrente de archivos estáticos")]
#[command(version)]
pub struct Config {
    /// Directorio raíz desde donde se sirven los archivos
    #[arg(short, long, default_value = ".", env = "HTTPD_DIRECTORY")]
    pub directory: String,

    /// Dirección informativa: el socket siempre escucha en todas las interfaces IPv4
    #[arg(short, long, alias = "host", default_value = "0.0.0.0", env = "HTTPD_ADDRESS")]
    pub address: String,

    /// Puerto TCP (0 = puerto efímero)
    #[arg(short, long, default_value = "8080", env = "HTTPD_PORT")]
    pub port: u16,

    /// Número fijo de workers
    #[arg(short, long, default_value = "4", env = "HTTPD_WORKERS")]
    pub workers: usize,

    /// Hacer chroot al directorio raíz antes de servir (requiere privilegios)
    #[arg(long, env = "HTTPD_CHROOT")]
    pub chroot: bool,

    /// Desligarse de la terminal y correr en segundo plano
    #[arg(long, env = "HTTPD_DAEMON")]
    pub daemon: bool,

    /// Filtro de logs en formato `tracing_subscriber::EnvFilter`
    #[arg(long = "log-filter", default_value = "info", env = "RUST_LOG")]
    pub log_filter: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("workers must be >= 1".to_string());
        }
        if self.directory.trim().is_empty() {
            return Err("directory must not be empty".to_string());
        }
        Ok(())
    }

    /// Registra un resumen de la configuración en el log
    pub fn log_summary(&self) {
        info!(
            directory = %self.directory,
            address = %self.address,
            port = self.port,
            workers = self.workers,
            chroot = self.chroot,
            daemon = self.daemon,
            "configuración"
        );
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            address: "0.0.0.0".to_string(),
            port: 8080,
            workers: 4,
            chroot: false,
            daemon: false,
            log_filter: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.address, "0.0.0.0");
        assert_eq!(config.directory, ".");
        assert_eq!(config.workers, 4);
        assert!(!config.chroot);
        assert!(!config.daemon);
    }

    #[test]
    fn test_validate_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_workers() {
        let mut config = Config::default();
        config.workers = 0;
        let result = config.validate();
        assert!(result.unwrap_err().contains("workers"));
    }

    #[test]
    fn test_validate_empty_directory() {
        let mut config = Config::default();
        config.directory = "  ".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().contains("directory"));
    }

    #[test]
    fn test_parse_short_flags() {
        let config =
            Config::try_parse_from(["static_httpd", "-d", "/srv/www", "-a", "127.0.0.1", "-p", "9000", "-w", "8"])
                .unwrap();
        assert_eq!(config.directory, "/srv/www");
        assert_eq!(config.address, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.workers, 8);
    }

    #[test]
    fn test_parse_long_flags() {
        let config = Config::try_parse_from([
            "static_httpd",
            "--directory",
            "/tmp",
            "--host",
            "10.0.0.1",
            "--port",
            "0",
            "--chroot",
            "--daemon",
        ])
        .unwrap();
        assert_eq!(config.directory, "/tmp");
        assert_eq!(config.address, "10.0.0.1");
        assert_eq!(config.port, 0);
        assert!(config.chroot);
        assert!(config.daemon);
    }

    #[test]
    fn test_parse_invalid_port() {
        assert!(Config::try_parse_from(["static_httpd", "--port", "70000"]).is_err());
    }

    #[test]
    fn test_log_summary_does_not_panic() {
        Config::default().log_summary();
    }
}
