//! Map description of hospitals and the current route
//!
//! Rendering is a pure function: every call rebuilds the full marker set and
//! the optional route overlay. Output can be written as GeoJSON or as a
//! standalone Leaflet page.

use serde::Serialize;
use serde_json::{json, Value};

use crate::core::dataset::{Coordinate, HospitalRecord};

/// Initial view centre (latitude, longitude) and zoom
pub const DEFAULT_CENTER: (f64, f64) = (4.2105, 101.9758);
pub const DEFAULT_ZOOM: u8 = 6;

const LEAFLET_VERSION: &str = "1.9.4";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerStyle {
    Hospital,
    EndpointA,
    EndpointB,
}

impl MarkerStyle {
    pub fn color(self) -> &'static str {
        match self {
            MarkerStyle::Hospital => "blue",
            MarkerStyle::EndpointA => "green",
            MarkerStyle::EndpointB => "red",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub latitude: f64,
    pub longitude: f64,
    pub popup: String,
    pub style: MarkerStyle,
}

/// Route drawn on top of the hospital markers
#[derive(Debug, Clone, Copy)]
pub struct RouteOverlay<'a> {
    pub from: &'a HospitalRecord,
    pub to: &'a HospitalRecord,
    pub path: &'a [Coordinate],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapDescription {
    pub center: (f64, f64),
    pub zoom: u8,
    pub markers: Vec<Marker>,
    pub route: Option<Vec<Coordinate>>,
}

/// Draw every hospital, plus the route and its endpoints when present
pub fn render(hospitals: &[HospitalRecord], overlay: Option<RouteOverlay<'_>>) -> MapDescription {
    let mut markers: Vec<Marker> = hospitals
        .iter()
        .map(|h| Marker {
            latitude: h.latitude,
            longitude: h.longitude,
            popup: format!("{} ({})", h.name, h.state),
            style: MarkerStyle::Hospital,
        })
        .collect();

    let route = overlay.map(|overlay| {
        markers.push(Marker {
            latitude: overlay.from.latitude,
            longitude: overlay.from.longitude,
            popup: format!("Hospital A: {}", overlay.from.name),
            style: MarkerStyle::EndpointA,
        });
        markers.push(Marker {
            latitude: overlay.to.latitude,
            longitude: overlay.to.longitude,
            popup: format!("Hospital B: {}", overlay.to.name),
            style: MarkerStyle::EndpointB,
        });
        overlay.path.to_vec()
    });

    MapDescription {
        center: DEFAULT_CENTER,
        zoom: DEFAULT_ZOOM,
        markers,
        route,
    }
}

impl MapDescription {
    /// GeoJSON FeatureCollection: one Point per marker, one LineString for the route
    pub fn to_geojson(&self) -> Value {
        let mut features: Vec<Value> = Vec::with_capacity(self.markers.len() + 1);

        if let Some(path) = &self.route {
            let coordinates: Vec<[f64; 2]> = path.iter().map(|c| c.to_lon_lat()).collect();
            features.push(json!({
                "type": "Feature",
                "geometry": { "type": "LineString", "coordinates": coordinates },
                "properties": { "name": "Route" }
            }));
        }

        features.extend(self.markers.iter().map(|marker| {
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [marker.longitude, marker.latitude]
                },
                "properties": {
                    "popup": marker.popup,
                    "style": marker.style,
                    "color": marker.style.color()
                }
            })
        }));

        json!({ "type": "FeatureCollection", "features": features })
    }

    /// Self-contained HTML page drawing the map with Leaflet and OSM tiles
    pub fn to_html(&self) -> String {
        // "</" would close the script element early
        let data = self.to_geojson().to_string().replace("</", "<\\/");
        let (lat, lon) = self.center;

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Hospital Route Map</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@{version}/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@{version}/dist/leaflet.js"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
const map = L.map('map').setView([{lat}, {lon}], {zoom});
L.tileLayer('https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{
  attribution: '&copy; OpenStreetMap contributors'
}}).addTo(map);
const data = {data};
L.geoJSON(data, {{
  style: () => ({{ color: '#3388ff', weight: 5 }}),
  pointToLayer: (feature, latlng) => L.circleMarker(latlng, {{
    radius: feature.properties.style === 'hospital' ? 5 : 9,
    color: feature.properties.color,
    fillOpacity: 0.8
  }}),
  onEachFeature: (feature, layer) => {{
    if (feature.properties.popup) layer.bindPopup(feature.properties.popup);
  }}
}}).addTo(map);
</script>
</body>
</html>
"#,
            version = LEAFLET_VERSION,
            zoom = self.zoom,
        )
    }
}
