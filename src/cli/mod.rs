//! CLI-specific utilities for hospital-route
//!
//! This module contains code specific to the command-line interface,
//! separate from the core library functionality.

pub mod progress;
pub mod prompt;

use std::io::Write;
use std::path::Path;

use hospital_route::{MapDescription, Outcome, SummaryRecord};

pub use progress::ProgressManager;

/// Shown instead of an error while no credential is set
pub const MISSING_KEY_HINT: &str =
    "🔑 Please enter your OpenRouteService API key (--api-key, ORS_API_KEY or `key` at the prompt).";

/// Print the three result lines for a successful lookup
pub fn print_summary<W: Write>(out: &mut W, summary: &SummaryRecord) -> std::io::Result<()> {
    writeln!(
        out,
        "🚗 Distance from {} → {}: {}",
        summary.hospital_a,
        summary.hospital_b,
        summary.distance_display()
    )?;
    writeln!(
        out,
        "🕒 Estimated time @ {} km/h: {}",
        summary.speed_kmh,
        summary.estimated_time_display()
    )?;
    writeln!(
        out,
        "⏱  Actual time from OpenRouteService: {}",
        summary.api_time_display()
    )
}

/// Print whatever the last evaluation left for the user
pub fn print_outcome<W: Write>(out: &mut W, outcome: &Outcome) -> std::io::Result<()> {
    match outcome {
        Outcome::AwaitingCredential => writeln!(out, "{MISSING_KEY_HINT}"),
        Outcome::AwaitingSelection => writeln!(out, "🏥 Select hospital A and hospital B."),
        Outcome::Routed { summary, .. } => print_summary(out, summary),
        Outcome::Failed(err) => writeln!(out, "⚠️  Error calculating route: {err}"),
    }
}

/// Write the map as a Leaflet page (`.html`/`.htm`) or as GeoJSON
pub fn write_map(map: &MapDescription, path: &Path) -> anyhow::Result<()> {
    let is_html = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"));

    let contents = if is_html {
        map.to_html()
    } else {
        serde_json::to_string_pretty(&map.to_geojson())?
    };

    std::fs::write(path, contents)?;
    Ok(())
}
