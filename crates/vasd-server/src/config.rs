//! Daemon configuration.
//!
//! One JSON file holds the radar bind address and the lane-to-display
//! map. Key spellings (`radarIP`, `radarPort`) are fixed by the deployed
//! site tooling that edits the same file. When the file does not exist
//! yet, a default configuration is written so an operator has something
//! concrete to edit.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ServerError;

/// Daemon configuration, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Address the radar ingestion socket binds to.
    #[serde(rename = "radarIP")]
    pub radar_ip: IpAddr,
    /// UDP port the radar sends datagrams to.
    #[serde(rename = "radarPort")]
    pub radar_port: u16,
    /// Per-lane display endpoints.
    pub displays: Vec<DisplayConfig>,
}

/// One lane's display endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Lane identifier as the radar reports it.
    pub lane: String,
    /// Display unit address.
    pub ip: IpAddr,
    /// Display unit TCP port.
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        let lane = |lane: &str, ip: [u8; 4]| DisplayConfig {
            lane: lane.to_string(),
            ip: IpAddr::V4(Ipv4Addr::from(ip)),
            port: 4001,
        };

        Self {
            radar_ip: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            radar_port: 62206,
            displays: vec![
                lane("1", [192, 168, 77, 132]),
                lane("2", [192, 168, 77, 133]),
                lane("3", [192, 168, 78, 134]),
                lane("4", [192, 168, 78, 135]),
            ],
        }
    }
}

impl Config {
    /// Load the configuration, writing the default file first if none
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::ConfigIo`] on filesystem failure and
    /// [`ServerError::ConfigParse`] when the file is not valid for the
    /// schema. Both are fatal at startup.
    pub fn load_or_init(path: &Path) -> Result<Self, ServerError> {
        if !path.exists() {
            let default = Self::default();
            let json = serde_json::to_string_pretty(&default)
                .map_err(|source| ServerError::ConfigParse { path: path.to_path_buf(), source })?;
            std::fs::write(path, json)
                .map_err(|source| ServerError::ConfigIo { path: path.to_path_buf(), source })?;
            return Ok(default);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|source| ServerError::ConfigIo { path: path.to_path_buf(), source })?;
        serde_json::from_str(&raw)
            .map_err(|source| ServerError::ConfigParse { path: path.to_path_buf(), source })
    }

    /// Socket address the ingestion loop binds.
    #[must_use]
    pub fn radar_bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.radar_ip, self.radar_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_deployed_key_spelling() {
        let config: Config = serde_json::from_str(
            r#"{
                "radarIP": "10.0.0.1",
                "radarPort": 62206,
                "displays": [ {"lane": "2", "ip": "10.0.0.5", "port": 4001} ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.radar_bind_addr().to_string(), "10.0.0.1:62206");
        assert_eq!(config.displays.len(), 1);
        assert_eq!(config.displays[0].lane, "2");
    }

    #[test]
    fn missing_file_is_seeded_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = Config::load_or_init(&path).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.displays.len(), 4);

        // The written file must load back identically.
        let reloaded = Config::load_or_init(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn malformed_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        let error = Config::load_or_init(&path).unwrap_err();
        assert!(matches!(error, ServerError::ConfigParse { .. }));
    }
}
