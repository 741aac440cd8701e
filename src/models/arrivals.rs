use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::dates;

/// A predicted vehicle arrival at a stop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub id: Option<String>,
    pub naptan_id: Option<String>,
    pub station_name: Option<String>,
    pub line_id: Option<String>,
    #[serde(default)]
    pub line_name: String,
    pub platform_name: Option<String>,
    pub direction: Option<String>,
    pub destination_name: Option<String>,
    pub towards: Option<String>,
    /// Seconds until the vehicle reaches the stop
    #[serde(default)]
    pub time_to_station: i64,
    #[serde(default, with = "dates::tfl_date_option")]
    pub expected_arrival: Option<DateTime<Utc>>,
}

impl Prediction {
    pub fn minutes_to_arrival(&self) -> i64 {
        self.time_to_station / 60
    }

    /// Display bucket key: platform where known, else direction.
    pub fn platform_key(&self) -> &str {
        self.platform_name
            .as_deref()
            .or(self.direction.as_deref())
            .unwrap_or("Unknown")
    }
}

/// Predictions for one line at a stop, soonest first.
#[derive(Debug, Clone, Serialize)]
pub struct ArrivalGroup {
    pub line_name: String,
    pub arrivals: Vec<Prediction>,
}

impl ArrivalGroup {
    /// Subdivide by platform/direction for display, preserving the
    /// soonest-first order within each platform.
    pub fn platform_groups(&self) -> Vec<PlatformGroup> {
        let mut groups: Vec<PlatformGroup> = Vec::new();
        for arrival in &self.arrivals {
            let key = arrival.platform_key();
            match groups.iter_mut().find(|g| g.platform == key) {
                Some(group) => group.arrivals.push(arrival.clone()),
                None => groups.push(PlatformGroup {
                    platform: key.to_string(),
                    arrivals: vec![arrival.clone()],
                }),
            }
        }
        groups
    }
}

/// Predictions for one platform (or direction) within a line group.
#[derive(Debug, Clone, Serialize)]
pub struct PlatformGroup {
    pub platform: String,
    pub arrivals: Vec<Prediction>,
}
