//! HTTP server configuration object and helpers.

use std::env;
use std::net::SocketAddr;

/// Builder-style configuration for creating the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    bind_addr: SocketAddr,
}

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

impl ServerConfig {
    /// Construct a server configuration for an explicit bind address.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self { bind_addr }
    }

    /// Read the configuration from the environment.
    ///
    /// `BIND_ADDR` overrides the default of `0.0.0.0:8080`; an unparseable
    /// value is a startup error rather than a silent fallback.
    pub fn from_env() -> std::io::Result<Self> {
        let raw = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr = raw
            .parse()
            .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR {raw:?}: {e}")))?;
        Ok(Self { bind_addr })
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_addresses_round_trip() {
        let addr: SocketAddr = "127.0.0.1:9090".parse().expect("valid address");
        assert_eq!(ServerConfig::new(addr).bind_addr(), addr);
    }
}
