use std::env;

use crate::config::ConfigError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);
        AppConfig { host, port }
    }

    /// Socket address the HTTP listener binds to
    pub fn socket_addr(&self) -> Result<std::net::SocketAddr, ConfigError> {
        let ip = self.host.parse::<std::net::IpAddr>()
            .map_err(|e| ConfigError::InvalidValue(format!("APP_HOST '{}': {}", self.host, e)))?;
        Ok(std::net::SocketAddr::new(ip, self.port))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig { host: "127.0.0.1".to_string(), port: 8080 }
    }
}
