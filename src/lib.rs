//! # Hospital-route Library
//!
//! Driving distance and travel time between two hospitals, using the
//! OpenRouteService directions API.
//!
//! ## Features
//!
//! - **Dataset loading**: CSV or spreadsheet hospital lists, tolerant of header spacing
//! - **Route lookup**: one directions request per lookup, reshaped into km and hours
//! - **ETA at your speed**: whole hours plus truncated minutes at an assumed speed
//! - **Map output**: GeoJSON or a standalone Leaflet page with the route highlighted
//! - **Export**: one-row `hospital_route.xlsx` summary
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dataset = hospital_route::load_dataset("Malaysia Hospital.xlsx")?;
//!     let summary = hospital_route::route_between(
//!         &dataset,
//!         "Hospital Kuala Lumpur",
//!         "Hospital Sultanah Aminah",
//!         "my-ors-api-key",
//!         80,
//!     )
//!     .await?;
//!     println!("{} ({})", summary.distance_display(), summary.estimated_time_display());
//!     Ok(())
//! }
//! ```
//!
//! ## Session Usage
//!
//! ```rust,no_run
//! use hospital_route::{Endpoint, RouteClient, Session};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = Session::new(hospital_route::load_dataset("hospitals.csv")?);
//! session.set_api_key("my-ors-api-key");
//! session.select_state(Endpoint::A, "Selangor")?;
//! session.select_state(Endpoint::B, "Johor")?;
//!
//! session.evaluate(&RouteClient::new()).await;
//! if let Some(summary) = session.summary() {
//!     hospital_route::export_to_file(summary, "hospital_route.xlsx".as_ref(), Default::default())?;
//! }
//! # Ok(())
//! # }
//! ```

pub use crate::core::config::{DEFAULT_BASE_URL, DEFAULT_DATASET_PATH, DEFAULT_PROFILE};
pub use crate::core::error::{Error, Result, RouteError};
pub use crate::core::export::{
    export_to_file, serialize, serialize_csv, OverwriteBehavior, DEFAULT_EXPORT_FILENAME,
    EXPORT_COLUMNS, XLSX_MIME_TYPE,
};
pub use crate::core::map::{render, MapDescription, Marker, MarkerStyle, RouteOverlay};
pub use crate::core::selection::{
    Endpoint, SelectionState, DEFAULT_SPEED_KMH, MAX_SPEED_KMH, MIN_SPEED_KMH,
};
pub use crate::core::summary::SummaryRecord;
pub use crate::core::{
    Coordinate, Dataset, HospitalRecord, Outcome, RouteClient, RouteConfig, RouteLeg,
    RouteResult, Session, TravelTime, View,
};

// Internal modules
mod core;

/// Load a hospital dataset from a `.csv` or spreadsheet file
///
/// # Examples
/// ```rust,no_run
/// let dataset = hospital_route::load_dataset("hospitals.csv")?;
/// for state in dataset.states() {
///     println!("{state}");
/// }
/// # Ok::<(), hospital_route::Error>(())
/// ```
pub fn load_dataset(path: impl AsRef<std::path::Path>) -> Result<Dataset> {
    Dataset::load(path)
}

/// Look up the route between two hospitals by name and summarize it
///
/// Uses the public OpenRouteService endpoint. For a custom endpoint, build a
/// [`Session`] with [`RouteClient::with_config`].
pub async fn route_between(
    dataset: &Dataset,
    hospital_a: &str,
    hospital_b: &str,
    api_key: &str,
    speed_kmh: u32,
) -> Result<SummaryRecord> {
    route_between_with(&RouteClient::new(), dataset, hospital_a, hospital_b, api_key, speed_kmh).await
}

/// Same as [`route_between`], with an explicit client
pub async fn route_between_with(
    client: &RouteClient,
    dataset: &Dataset,
    hospital_a: &str,
    hospital_b: &str,
    api_key: &str,
    speed_kmh: u32,
) -> Result<SummaryRecord> {
    let mut session = Session::new(dataset.clone());
    session.set_api_key(api_key);
    session.set_speed_kmh(speed_kmh)?;
    session.select_hospital(Endpoint::A, hospital_a)?;
    session.select_hospital(Endpoint::B, hospital_b)?;

    match session.evaluate(client).await {
        Outcome::Routed { summary, .. } => Ok(summary.clone()),
        Outcome::Failed(err) => Err(Error::Route(err.clone())),
        Outcome::AwaitingCredential => Err(Error::InvalidInput("API key is empty".to_string())),
        Outcome::AwaitingSelection => {
            Err(Error::InvalidInput("both hospitals must be selected".to_string()))
        }
    }
}
