//! Directions lookups against OpenRouteService
//!
//! Issues one GeoJSON directions request per lookup and reshapes the first
//! route segment into kilometers and hours. There is no retry: any failure is
//! reported once to the caller.

use std::fmt;
use std::time::Duration;

use log::debug;
use once_cell::sync::Lazy;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, ClientBuilder, StatusCode};
use serde::{Deserialize, Serialize};

use crate::core::config::RouteConfig;
use crate::core::dataset::Coordinate;
use crate::core::error::RouteError;

/// ORS error codes meaning the points could not be connected
const ORS_ROUTE_NOT_FOUND: i64 = 2009;
const ORS_POINT_NOT_FOUND: i64 = 2010;

/// Global HTTP client
static GLOBAL_CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .tcp_keepalive(Duration::from_secs(60))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(format!("hospital-route/{}", env!("HOSPITAL_ROUTE_VERSION")))
        .build()
        .expect("Failed to create HTTP client")
});

/// Raw figures of the first route segment
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLeg {
    pub distance_m: f64,
    pub duration_s: f64,
    /// Route path in `[longitude, latitude]` order
    pub geometry: Vec<Coordinate>,
}

/// Whole hours plus truncated remainder minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TravelTime {
    pub hours: u64,
    pub minutes: u64,
}

impl TravelTime {
    /// Split fractional hours. Minutes are floored, never rounded up, so
    /// 1.999 h is "1 hr 59 min".
    pub fn from_hours(hours: f64) -> Self {
        let hours = hours.max(0.0);
        let whole = hours.trunc();
        let minutes = ((hours - whole) * 60.0).floor();
        Self {
            hours: whole as u64,
            minutes: minutes as u64,
        }
    }
}

impl fmt::Display for TravelTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} hr {} min", self.hours, self.minutes)
    }
}

/// Result of a successful lookup, with the estimate at the user's speed
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    pub distance_km: f64,
    pub duration_hr_api: f64,
    pub estimated_hr_user: f64,
    pub geometry: Vec<Coordinate>,
}

impl RouteResult {
    pub fn from_leg(leg: RouteLeg, speed_kmh: u32) -> Self {
        let distance_km = leg.distance_m / 1000.0;
        Self {
            distance_km,
            duration_hr_api: leg.duration_s / 3600.0,
            estimated_hr_user: distance_km / f64::from(speed_kmh),
            geometry: leg.geometry,
        }
    }

    pub fn estimated_time(&self) -> TravelTime {
        TravelTime::from_hours(self.estimated_hr_user)
    }
}

#[derive(Serialize)]
struct DirectionsRequest {
    coordinates: [[f64; 2]; 2],
}

#[derive(Deserialize)]
struct DirectionsResponse {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    properties: FeatureProperties,
    geometry: Option<LineString>,
}

#[derive(Deserialize)]
struct FeatureProperties {
    #[serde(default)]
    segments: Vec<Segment>,
}

#[derive(Deserialize)]
struct Segment {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

#[derive(Deserialize)]
struct LineString {
    #[serde(default)]
    coordinates: Vec<Vec<f64>>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

/// ORS reports errors either as an object or as a bare string
#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Detailed { code: Option<i64>, message: String },
    Message(String),
}

/// Client for the directions endpoint
pub struct RouteClient {
    config: RouteConfig,
}

impl Default for RouteClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteClient {
    /// Create a client for the public OpenRouteService endpoint
    pub fn new() -> Self {
        Self {
            config: RouteConfig::default(),
        }
    }

    /// Create a client with custom configuration
    pub fn with_config(config: RouteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RouteConfig {
        &self.config
    }

    /// Request a route from `from` to `to` and return its first segment
    pub async fn lookup_route(
        &self,
        from: Coordinate,
        to: Coordinate,
        api_key: &str,
    ) -> Result<RouteLeg, RouteError> {
        let url = self.config.directions_url();
        let request = DirectionsRequest {
            coordinates: [from.to_lon_lat(), to.to_lon_lat()],
        };

        debug!(
            "POST {url} from [{}, {}] to [{}, {}]",
            from.longitude, from.latitude, to.longitude, to.latitude
        );

        let response = GLOBAL_CLIENT
            .post(&url)
            .timeout(self.config.timeout)
            .header(AUTHORIZATION, api_key)
            .header(ACCEPT, "application/json, application/geo+json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(classify_error(status, &body));
        }

        parse_directions(&body)
    }
}

/// Extract the first segment and geometry from a GeoJSON directions body
fn parse_directions(body: &str) -> Result<RouteLeg, RouteError> {
    let response: DirectionsResponse =
        serde_json::from_str(body).map_err(|e| RouteError::Malformed(e.to_string()))?;

    let feature = response
        .features
        .into_iter()
        .next()
        .ok_or_else(|| RouteError::NoRoute("response contained no routes".to_string()))?;

    let segment = feature
        .properties
        .segments
        .first()
        .ok_or_else(|| RouteError::Malformed("route has no segments".to_string()))?;

    let geometry = feature
        .geometry
        .map(|line| {
            line.coordinates
                .iter()
                .filter(|point| point.len() >= 2)
                .map(|point| Coordinate::new(point[0], point[1]))
                .collect()
        })
        .unwrap_or_default();

    Ok(RouteLeg {
        distance_m: segment.distance,
        duration_s: segment.duration,
        geometry,
    })
}

/// Turn a non-success response into a route error with the service's message
fn classify_error(status: StatusCode, body: &str) -> RouteError {
    let (code, message) = match serde_json::from_str::<ErrorResponse>(body) {
        Ok(ErrorResponse {
            error: ErrorBody::Detailed { code, message },
        }) => (code, message),
        Ok(ErrorResponse {
            error: ErrorBody::Message(message),
        }) => (None, message),
        Err(_) if body.trim().is_empty() => (None, status.to_string()),
        Err(_) => (None, body.trim().to_string()),
    };

    let no_route_code = matches!(code, Some(ORS_ROUTE_NOT_FOUND | ORS_POINT_NOT_FOUND));

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        RouteError::Auth(message)
    } else if status == StatusCode::NOT_FOUND || no_route_code {
        RouteError::NoRoute(message)
    } else {
        RouteError::Api {
            status: status.as_u16(),
            message,
        }
    }
}
