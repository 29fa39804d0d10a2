//! Control server configuration.

use serde::Deserialize;

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub enabled: bool,
    /// Socket address, e.g. `0.0.0.0:3000`.
    pub bind: String,
}

impl ServerConfig {
    /// Replace the port of `bind`, keeping the host.
    pub fn set_port(&mut self, port: u16) {
        let host = self
            .bind
            .rsplit_once(':')
            .map_or("0.0.0.0", |(host, _)| host);
        self.bind = format!("{host}:{port}");
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind: "0.0.0.0:3000".into(),
        }
    }
}
