use super::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address both listeners bind to; empty means all IPv4 interfaces.
    pub bind_host: String,

    pub bind_port: u16,

    pub tcp_idle_timeout_secs: u64,

    /// Largest UDP reply advertised and sent to EDNS clients.
    pub udp_max_payload: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            bind_port: 53,
            tcp_idle_timeout_secs: 10,
            udp_max_payload: 1232,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let host = self.bind_host.trim();
        let ip = if host.is_empty() {
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        } else {
            host.trim_start_matches('[')
                .trim_end_matches(']')
                .parse::<IpAddr>()
                .map_err(|e| {
                    ConfigError::Validation(format!("Invalid bind host '{}': {}", host, e))
                })?
        };
        Ok(SocketAddr::new(ip, self.bind_port))
    }
}
