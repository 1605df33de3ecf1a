//! Node Configuration
//!
//! A single explicit record, populated once at startup from command-line
//! flags or the matching environment variables, validated, and then handed
//! to each component's constructor.

use crate::error::ConfigError;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Scheme used when building download URIs for search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Odin node - indexes a directory and searches it across a peer mesh
#[derive(Parser, Debug, Clone)]
#[command(name = "odin-node")]
#[command(version, about, long_about = None)]
pub struct NodeConfig {
    /// This node's own peer id (`host:port`), as other peers dial it
    #[arg(long, env = "NODE_ID", default_value = "127.0.0.1:5000")]
    pub node_id: String,

    /// Listen address; defaults to 0.0.0.0 on the port of `node_id`
    #[arg(long, env = "NODE_BIND")]
    pub bind: Option<SocketAddr>,

    /// Root directory to index
    #[arg(long, env = "DIRECTORY")]
    pub directory: Option<PathBuf>,

    /// Local hour of day (0-23) at which the daily index run happens
    #[arg(long, env = "INDEX_FILES_TIME", default_value_t = 1)]
    pub index_hour: u32,

    /// Hours between announce cycles
    #[arg(long, env = "PEER_DISCOVER_INTERVAL", default_value_t = 1)]
    pub announce_interval_hours: u64,

    /// Minutes between heartbeat sweeps
    #[arg(long, env = "HEARTBEAT_INTERVAL", default_value_t = 10)]
    pub heartbeat_interval_minutes: u64,

    /// URL returning a JSON array of peer ids, fetched once at startup
    #[arg(long, env = "URL")]
    pub bootstrap_url: Option<String>,

    /// Serve download links over https
    #[arg(long, env = "ENABLE_SSL", default_value_t = false)]
    pub enable_ssl: bool,

    /// Seed peers, comma separated
    #[arg(long, env = "KNOWN_NODES", value_delimiter = ',')]
    pub known_nodes: Vec<String>,

    /// Where the catalog snapshot is kept between restarts
    #[arg(long, env = "CATALOG_PATH", default_value = "catalog.json")]
    pub catalog_path: PathBuf,

    /// Timeout for every outbound peer call, in seconds
    #[arg(long, env = "PEER_TIMEOUT", default_value_t = 5)]
    pub peer_timeout_secs: u64,

    /// First announce retry delay in milliseconds; doubles per attempt
    #[arg(long, env = "ANNOUNCE_BACKOFF_MS", default_value_t = 1000)]
    pub announce_backoff_ms: u64,

    /// External endpoint probed before a heartbeat sweep
    #[arg(long, env = "CONNECTIVITY_URL", default_value = "http://www.google.com")]
    pub connectivity_url: String,

    /// Cap on simultaneous outbound search calls (unbounded when unset)
    #[arg(long, env = "SEARCH_FANOUT_LIMIT")]
    pub search_fanout_limit: Option<usize>,
}

impl NodeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.node_id.trim().is_empty() {
            return Err(ConfigError::EmptyNodeId);
        }
        if self.index_hour > 23 {
            return Err(ConfigError::InvalidIndexHour(self.index_hour));
        }
        if self.announce_interval_hours == 0 {
            return Err(ConfigError::ZeroInterval {
                name: "announce interval",
            });
        }
        if self.heartbeat_interval_minutes == 0 {
            return Err(ConfigError::ZeroInterval {
                name: "heartbeat interval",
            });
        }
        if self.announce_interval_hours.checked_mul(3600).is_none() {
            return Err(ConfigError::IntervalTooLarge {
                name: "announce interval",
            });
        }
        if self.heartbeat_interval_minutes.checked_mul(60).is_none() {
            return Err(ConfigError::IntervalTooLarge {
                name: "heartbeat interval",
            });
        }
        if self.peer_timeout_secs == 0 {
            return Err(ConfigError::ZeroInterval {
                name: "peer timeout",
            });
        }
        if self.search_fanout_limit == Some(0) {
            return Err(ConfigError::ZeroInterval {
                name: "search fan-out limit",
            });
        }
        self.bind_addr()?;
        Ok(())
    }

    pub fn protocol(&self) -> Protocol {
        if self.enable_ssl {
            Protocol::Https
        } else {
            Protocol::Http
        }
    }

    /// Resolves the listen address, falling back to the port in `node_id`.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        if let Some(bind) = self.bind {
            return Ok(bind);
        }
        let port = self
            .node_id
            .rsplit_once(':')
            .and_then(|(_, port)| port.parse::<u16>().ok())
            .ok_or_else(|| ConfigError::InvalidBind(self.node_id.clone()))?;
        Ok(SocketAddr::from(([0, 0, 0, 0], port)))
    }

    /// Seed peers with surrounding whitespace and blanks removed.
    pub fn seed_peers(&self) -> Vec<String> {
        self.known_nodes
            .iter()
            .map(|peer| peer.trim().to_string())
            .filter(|peer| !peer.is_empty())
            .collect()
    }

    pub fn peer_timeout(&self) -> Duration {
        Duration::from_secs(self.peer_timeout_secs)
    }

    pub fn announce_backoff(&self) -> Duration {
        Duration::from_millis(self.announce_backoff_ms)
    }

    pub fn announce_interval(&self) -> Duration {
        Duration::from_secs(self.announce_interval_hours.saturating_mul(3600))
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_minutes.saturating_mul(60))
    }

    /// A configuration with defaults suitable for in-process tests.
    ///
    /// Timeouts and backoff are short and nothing points outside localhost.
    pub fn for_testing(node_id: &str) -> Self {
        Self {
            node_id: node_id.to_string(),
            bind: None,
            directory: None,
            index_hour: 1,
            announce_interval_hours: 1,
            heartbeat_interval_minutes: 10,
            bootstrap_url: None,
            enable_ssl: false,
            known_nodes: Vec::new(),
            catalog_path: PathBuf::from("catalog.json"),
            peer_timeout_secs: 2,
            announce_backoff_ms: 10,
            connectivity_url: "http://127.0.0.1:9".to_string(),
            search_fanout_limit: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse_from_empty_args() {
        let config = NodeConfig::try_parse_from(["odin-node"]).unwrap();

        assert_eq!(config.node_id, "127.0.0.1:5000");
        assert_eq!(config.index_hour, 1);
        assert_eq!(config.heartbeat_interval_minutes, 10);
        assert_eq!(config.protocol(), Protocol::Http);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_known_nodes_split_and_trimmed() {
        let config = NodeConfig::try_parse_from([
            "odin-node",
            "--known-nodes",
            "10.0.0.1:5000, 10.0.0.2:5000,,",
        ])
        .unwrap();

        assert_eq!(config.seed_peers(), vec!["10.0.0.1:5000", "10.0.0.2:5000"]);
    }

    #[test]
    fn test_bind_defaults_to_node_id_port() {
        let config = NodeConfig::for_testing("example.org:7001");
        let bind = config.bind_addr().unwrap();

        assert_eq!(bind.port(), 7001);
        assert!(bind.ip().is_unspecified());
    }

    #[test]
    fn test_node_id_without_port_needs_explicit_bind() {
        let mut config = NodeConfig::for_testing("example.org");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBind(_))
        ));

        config.bind = Some("127.0.0.1:8000".parse().unwrap());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_hour_rejected() {
        let mut config = NodeConfig::for_testing("127.0.0.1:5000");
        config.index_hour = 24;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidIndexHour(24))
        ));
    }

    #[test]
    fn test_zero_intervals_rejected() {
        let mut config = NodeConfig::for_testing("127.0.0.1:5000");
        config.heartbeat_interval_minutes = 0;
        assert!(config.validate().is_err());

        let mut config = NodeConfig::for_testing("127.0.0.1:5000");
        config.search_fanout_limit = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_intervals_rejected_without_overflow() {
        let mut config = NodeConfig::for_testing("127.0.0.1:5000");
        config.announce_interval_hours = u64::MAX;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::IntervalTooLarge { .. })
        ));
        assert_eq!(config.announce_interval(), Duration::from_secs(u64::MAX));

        let mut config = NodeConfig::for_testing("127.0.0.1:5000");
        config.heartbeat_interval_minutes = u64::MAX / 2;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::IntervalTooLarge { .. })
        ));
        assert_eq!(config.heartbeat_interval(), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn test_ssl_switches_protocol() {
        let mut config = NodeConfig::for_testing("127.0.0.1:5000");
        config.enable_ssl = true;

        assert_eq!(config.protocol(), Protocol::Https);
        assert_eq!(config.protocol().to_string(), "https");
    }
}
