//! Routing service configuration for hospital-route
//!
//! Handles endpoint and profile resolution for OpenRouteService directions requests.

use std::time::Duration;

/// Public OpenRouteService endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.openrouteservice.org";

/// Travel profile used for hospital transfers
pub const DEFAULT_PROFILE: &str = "driving-car";

/// Dataset file looked up when none is given
pub const DEFAULT_DATASET_PATH: &str = "Malaysia Hospital.xlsx";

/// Configuration for the directions service
#[derive(Debug, Clone, PartialEq)]
pub struct RouteConfig {
    /// Base URL of the routing service (no trailing path)
    pub base_url: String,

    /// Travel profile identifier, e.g. `driving-car`
    pub profile: String,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            profile: DEFAULT_PROFILE.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl RouteConfig {
    /// Resolves the GeoJSON directions endpoint for the configured profile
    pub fn directions_url(&self) -> String {
        format!(
            "{}/v2/directions/{}/geojson",
            self.base_url.trim_end_matches('/'),
            self.profile
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directions_url() {
        let config = RouteConfig::default();
        assert_eq!(
            config.directions_url(),
            "https://api.openrouteservice.org/v2/directions/driving-car/geojson"
        );
    }

    #[test]
    fn test_custom_base_url_trailing_slash() {
        let config = RouteConfig {
            base_url: "http://localhost:8080/ors/".to_string(),
            profile: "driving-hgv".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.directions_url(),
            "http://localhost:8080/ors/v2/directions/driving-hgv/geojson"
        );
    }
}
