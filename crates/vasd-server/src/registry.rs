//! Lane registry.

use std::collections::HashMap;
use std::net::SocketAddr;

use crate::config::Config;

/// Immutable mapping from lane identifier to display endpoint.
///
/// Built once at startup from configuration. A lane missing here
/// disables dispatch for that lane; its readings are still parsed and
/// recorded.
#[derive(Debug, Clone, Default)]
pub struct LaneRegistry {
    endpoints: HashMap<String, SocketAddr>,
}

impl LaneRegistry {
    /// Build the registry from the loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::from_entries(
            config
                .displays
                .iter()
                .map(|display| (display.lane.clone(), SocketAddr::new(display.ip, display.port))),
        )
    }

    /// Build the registry from explicit lane/endpoint pairs.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = (String, SocketAddr)>) -> Self {
        Self { endpoints: entries.into_iter().collect() }
    }

    /// Display endpoint for a lane, if one is registered.
    #[must_use]
    pub fn endpoint(&self, lane: &str) -> Option<SocketAddr> {
        self.endpoints.get(lane).copied()
    }

    /// Whether a lane has a registered display.
    #[must_use]
    pub fn contains(&self, lane: &str) -> bool {
        self.endpoints.contains_key(lane)
    }

    /// All registered lane/endpoint pairs, in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, SocketAddr)> {
        self.endpoints.iter().map(|(lane, endpoint)| (lane.as_str(), *endpoint))
    }
}
