//! Exportable route summary
//!
//! Numeric figures are stored raw; the display strings used on screen and
//! in exports are produced by the formatting helpers.

use serde::Serialize;

use crate::core::route::{RouteResult, TravelTime};
use crate::core::selection::SelectionState;

/// One row describing the last successful lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRecord {
    pub hospital_a: String,
    pub state_a: String,
    pub hospital_b: String,
    pub state_b: String,
    pub distance_km: f64,
    pub speed_kmh: u32,
    pub estimated_hr_user: f64,
    pub duration_hr_api: f64,
}

impl SummaryRecord {
    /// Combine the selection and a route into a summary.
    ///
    /// Returns `None` unless both hospitals and both states are selected.
    pub fn build(selection: &SelectionState, route: &RouteResult) -> Option<Self> {
        Some(Self {
            hospital_a: selection.hospital_a.clone()?,
            state_a: selection.state_a.clone()?,
            hospital_b: selection.hospital_b.clone()?,
            state_b: selection.state_b.clone()?,
            distance_km: route.distance_km,
            speed_kmh: selection.speed_kmh(),
            estimated_hr_user: route.estimated_hr_user,
            duration_hr_api: route.duration_hr_api,
        })
    }

    pub fn estimated_time(&self) -> TravelTime {
        TravelTime::from_hours(self.estimated_hr_user)
    }

    /// `"{H} hr {M} min"` at the user's speed
    pub fn estimated_time_display(&self) -> String {
        self.estimated_time().to_string()
    }

    /// `"{H:.2} hr"` as reported by the routing service
    pub fn api_time_display(&self) -> String {
        format!("{:.2} hr", self.duration_hr_api)
    }

    pub fn distance_display(&self) -> String {
        format!("{:.2} km", self.distance_km)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::route::RouteLeg;
    use crate::core::selection::Endpoint;

    fn selection() -> SelectionState {
        let mut selection = SelectionState::new();
        selection.set_hospital(Endpoint::A, "WP Kuala Lumpur", "Hospital Kuala Lumpur");
        selection.set_hospital(Endpoint::B, "Johor", "Hospital Sultanah Aminah");
        selection
    }

    fn route(speed_kmh: u32) -> RouteResult {
        RouteResult::from_leg(
            RouteLeg {
                distance_m: 123_400.0,
                duration_s: 5_400.0,
                geometry: vec![],
            },
            speed_kmh,
        )
    }

    #[test]
    fn test_build_and_format() {
        let summary = SummaryRecord::build(&selection(), &route(80)).unwrap();

        assert_eq!(summary.hospital_a, "Hospital Kuala Lumpur");
        assert_eq!(summary.state_b, "Johor");
        assert_eq!(summary.distance_display(), "123.40 km");
        assert_eq!(summary.estimated_time_display(), "1 hr 32 min");
        assert_eq!(summary.api_time_display(), "1.50 hr");
        assert_eq!(summary.speed_kmh, 80);
    }

    #[test]
    fn test_build_requires_complete_selection() {
        let mut incomplete = selection();
        incomplete.set_state(Endpoint::B, "Johor");
        assert_eq!(SummaryRecord::build(&incomplete, &route(80)), None);
    }

    #[test]
    fn test_build_is_deterministic() {
        let first = SummaryRecord::build(&selection(), &route(100));
        let second = SummaryRecord::build(&selection(), &route(100));
        assert_eq!(first, second);
    }
}
