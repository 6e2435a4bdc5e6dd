//! `[serve]` section configuration.
//!
//! Contains identicon HTTP server settings.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"     # Network interface (127.0.0.1 = localhost only)
//! port = 7465                 # HTTP port number
//! cache = true                # Memoize rendered documents
//! cache_capacity = 4096       # Documents kept before the cache is flushed
//! ```
//!
//! Use `interface = "0.0.0.0"` to make the server accessible from LAN.

use std::net::{IpAddr, Ipv4Addr};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Identicon server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    /// - `127.0.0.1` (default): localhost only
    /// - `0.0.0.0`: all interfaces (LAN accessible)
    pub interface: IpAddr,

    /// HTTP port number.
    pub port: u16,

    /// Keep rendered documents in memory, keyed by hash.
    pub cache: bool,

    /// Maximum number of cached documents.
    pub cache_capacity: usize,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 7465,
            cache: true,
            cache_capacity: 4096,
        }
    }
}

impl ServeConfig {
    pub const CACHE_CAPACITY: FieldPath = FieldPath::new("serve.cache_capacity");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.cache && self.cache_capacity == 0 {
            diag.error_with_hint(
                Self::CACHE_CAPACITY,
                "must be greater than 0 when the cache is enabled",
                "set `cache = false` to disable caching",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_serve_config() {
        let config =
            test_parse_config("[serve]\ninterface = \"0.0.0.0\"\nport = 8080\ncache = false");

        assert_eq!(
            config.serve.interface,
            IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0))
        );
        assert_eq!(config.serve.port, 8080);
        assert!(!config.serve.cache);
    }

    #[test]
    fn test_serve_config_defaults() {
        let config = test_parse_config("");

        assert_eq!(
            config.serve.interface,
            IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
        );
        assert_eq!(config.serve.port, 7465);
        assert!(config.serve.cache);
        assert_eq!(config.serve.cache_capacity, 4096);
    }

    #[test]
    fn test_serve_config_ipv6() {
        let config = test_parse_config("[serve]\ninterface = \"::1\"");
        assert_eq!(
            config.serve.interface,
            IpAddr::V6(Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 1))
        );
    }

    #[test]
    fn test_serve_config_zero_capacity() {
        let config = test_parse_config("[serve]\ncache_capacity = 0");
        let mut diag = ConfigDiagnostics::new();
        config.serve.validate(&mut diag);
        assert_eq!(diag.len(), 1);

        // Disabled cache ignores capacity
        let config = test_parse_config("[serve]\ncache = false\ncache_capacity = 0");
        let mut diag = ConfigDiagnostics::new();
        config.serve.validate(&mut diag);
        assert!(diag.is_empty());
    }
}
