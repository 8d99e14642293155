//! Server configuration from environment variables
//!
//! | Variable        | Default   | Meaning                                         |
//! |-----------------|-----------|-------------------------------------------------|
//! | `HOST`          | `0.0.0.0` | bind address                                    |
//! | `PORT`          | `3000`    | bind port                                       |
//! | `SNAPSHOT_PATH` | unset     | JSON snapshot file; unset = in-memory store     |
//! | `SEED_ON_START` | `false`   | load the bundled sample when the store is empty |

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {name} value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub snapshot_path: Option<PathBuf>,
    pub seed_on_start: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
            snapshot_path: None,
            seed_on_start: false,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let host = match get("HOST") {
            Some(raw) => raw.trim().parse::<IpAddr>().map_err(|e| {
                ConfigError::Invalid {
                    name: "HOST",
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?,
            None => defaults.host,
        };

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
                ConfigError::Invalid {
                    name: "PORT",
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?,
            None => defaults.port,
        };

        let seed_on_start = match get("SEED_ON_START") {
            Some(raw) => parse_bool("SEED_ON_START", &raw)?,
            None => defaults.seed_on_start,
        };

        Ok(Self {
            host,
            port,
            snapshot_path: get("SNAPSHOT_PATH").map(PathBuf::from),
            seed_on_start,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: raw.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_reads_all_variables() {
        let config = from_pairs(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8001"),
            ("SNAPSHOT_PATH", "/var/lib/serpent/catalog.json"),
            ("SEED_ON_START", "yes"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:8001");
        assert_eq!(
            config.snapshot_path,
            Some(PathBuf::from("/var/lib/serpent/catalog.json"))
        );
        assert!(config.seed_on_start);
    }

    #[test]
    fn test_empty_values_fall_back_to_defaults() {
        let config = from_pairs(&[("PORT", ""), ("SNAPSHOT_PATH", "  ")]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.snapshot_path, None);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(matches!(
            from_pairs(&[("PORT", "eighty")]),
            Err(ConfigError::Invalid { name: "PORT", .. })
        ));
        assert!(matches!(
            from_pairs(&[("SEED_ON_START", "maybe")]),
            Err(ConfigError::Invalid { name: "SEED_ON_START", .. })
        ));
        assert!(matches!(
            from_pairs(&[("HOST", "not-an-ip")]),
            Err(ConfigError::Invalid { name: "HOST", .. })
        ));
    }
}
