use serde::{Deserialize, Serialize};

use super::modes::LineMode;

/// One mode served at a stop together with the line ids running under it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineModeGroup {
    pub mode_name: LineMode,
    #[serde(default)]
    pub line_identifier: Vec<String>,
}

/// Flat key/value property attached to a stop point (WiFi, Zone, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalProperty {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopPoint {
    pub id: String,
    pub common_name: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    #[serde(default)]
    pub line_mode_groups: Vec<LineModeGroup>,
    #[serde(default)]
    pub additional_properties: Vec<AdditionalProperty>,
    /// Child station ids for hub stations; arrivals are fetched per child.
    #[serde(default)]
    pub child_station_ids: Vec<String>,
}

impl StopPoint {
    /// Hub stations group several child stations under a `HUB` prefixed id
    /// and carry no arrivals of their own.
    pub fn is_hub(&self) -> bool {
        self.id.starts_with("HUB")
    }

    pub fn coordinate(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.additional_properties
            .iter()
            .find(|p| p.key.eq_ignore_ascii_case(key))
            .map(|p| p.value.as_str())
    }

    pub fn zone(&self) -> Option<&str> {
        self.property("Zone")
    }

    pub fn has_wifi(&self) -> bool {
        self.property("WiFi")
            .map(|v| v.eq_ignore_ascii_case("yes"))
            .unwrap_or(false)
    }

    /// Summed significance weight across the modes served here. Zero means
    /// the stop is bus-only (or serves nothing the map ranks).
    pub fn line_mode_weighting(&self) -> u32 {
        self.line_mode_groups
            .iter()
            .map(|g| g.mode_name.weighting() as u32)
            .sum()
    }
}

/// Anything the geo search can return. Non-stop results (addresses, points
/// of interest) are excluded from map markers by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum Point {
    #[serde(rename = "Tfl.Api.Presentation.Entities.StopPoint, Tfl.Api.Presentation.Entities")]
    StopPoint(StopPoint),
    #[serde(rename = "Tfl.Api.Presentation.Entities.Place, Tfl.Api.Presentation.Entities")]
    PointOfInterest(PointOfInterest),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterest {
    pub id: String,
    pub common_name: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// Envelope returned by the text search endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub matches: Vec<SearchMatch>,
}

/// A stop summary from the text search endpoint (not full detail).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatch {
    pub id: String,
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    #[serde(default)]
    pub modes: Vec<LineMode>,
}

/// Map-displayable wrapper around a stop point.
///
/// Identity is the concatenation of the coordinate components, so two stops
/// sharing a coordinate collapse to a single marker.
#[derive(Debug, Clone, Serialize)]
pub struct StopPointAnnotation {
    pub id: String,
    pub stop_point: StopPoint,
    /// Transient display flag; set while the marker shows its detail card.
    pub is_detail: bool,
}

impl StopPointAnnotation {
    pub fn new(stop_point: StopPoint) -> Self {
        let id = format!(
            "{}{}",
            stop_point.lat.unwrap_or_default(),
            stop_point.lon.unwrap_or_default()
        );
        Self {
            id,
            stop_point,
            is_detail: false,
        }
    }
}
