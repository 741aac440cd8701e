//! Nearby stop point search and map marker reconciliation.
//!
//! Turns a geo search around a map center into the ordered annotation list
//! the map draws: stops serving a weighted (rail-like) mode first, bus-only
//! stops appended after, each bucket sorted by distance to the user.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::models::{LineMode, Point, StopPoint, StopPointAnnotation};
use crate::providers::tfl::{TflClient, TflError};

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

pub fn haversine_distance(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lon = (to.lon - from.lon).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}

pub struct NearbySearchService {
    client: Arc<TflClient>,
    /// Set while a search is running; overlapping calls return no result.
    in_flight: AtomicBool,
}

impl NearbySearchService {
    pub fn new(client: Arc<TflClient>) -> Self {
        Self {
            client,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Search for map markers around `center`.
    ///
    /// Returns `Ok(None)` when a search is already in flight on this
    /// service; the caller re-triggers once the current search completes.
    /// An empty vector is the valid zero-match outcome.
    pub async fn find_nearby_markers(
        &self,
        center: Coordinate,
        radius_meters: u32,
        mode_filters: &[LineMode],
        user_location: Option<Coordinate>,
    ) -> Result<Option<Vec<StopPointAnnotation>>, TflError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            debug!("Nearby search already in flight, skipping");
            return Ok(None);
        }

        let result = self
            .search_around(center, radius_meters, mode_filters, user_location)
            .await;
        self.in_flight.store(false, Ordering::SeqCst);

        result.map(Some)
    }

    async fn search_around(
        &self,
        center: Coordinate,
        radius_meters: u32,
        mode_filters: &[LineMode],
        user_location: Option<Coordinate>,
    ) -> Result<Vec<StopPointAnnotation>, TflError> {
        let modes = mode_filters
            .iter()
            .map(LineMode::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let path = format!(
            "/StopPoint?lat={}&lon={}&radius={}&modes={}",
            center.lat, center.lon, radius_meters, modes
        );

        // The geo endpoint mixes stop points with addresses and points of
        // interest; decode each element on its own so one stray entry
        // cannot sink the whole result set.
        let raw: Vec<Value> = self.client.get(&path).await?;
        let total = raw.len();

        let stop_points: Vec<StopPoint> = raw
            .into_iter()
            .filter_map(|value| serde_json::from_value::<Point>(value).ok())
            .filter_map(|point| match point {
                Point::StopPoint(stop) => Some(stop),
                Point::PointOfInterest(_) => None,
            })
            .collect();

        let markers = reconcile_markers(stop_points, user_location);

        info!(
            results = total,
            markers = markers.len(),
            radius = radius_meters,
            "Reconciled nearby markers"
        );

        Ok(markers)
    }
}

/// Order and wrap raw geo search results for map display.
///
/// Stops with a positive summed mode weighting come first; bus-only stops
/// are appended after, regardless of distance. Each bucket is independently
/// distance-sorted when the user location is known. Stops with no line mode
/// groups are dropped, and co-located stops collapse onto one marker
/// (annotation identity is the coordinate string).
pub fn reconcile_markers(
    stop_points: Vec<StopPoint>,
    user_location: Option<Coordinate>,
) -> Vec<StopPointAnnotation> {
    let (mut weighted, mut bus_only): (Vec<StopPoint>, Vec<StopPoint>) = stop_points
        .into_iter()
        .partition(|stop| stop.line_mode_weighting() > 0);

    if let Some(user) = user_location {
        sort_by_distance(&mut weighted, user);
        sort_by_distance(&mut bus_only, user);
    }

    let mut seen = std::collections::HashSet::new();
    weighted
        .into_iter()
        .chain(bus_only)
        .filter(|stop| !stop.line_mode_groups.is_empty())
        .map(StopPointAnnotation::new)
        .filter(|annotation| seen.insert(annotation.id.clone()))
        .collect()
}

fn sort_by_distance(stops: &mut [StopPoint], user: Coordinate) {
    stops.sort_by(|a, b| {
        let da = distance_to(a, user);
        let db = distance_to(b, user);
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    });
}

fn distance_to(stop: &StopPoint, user: Coordinate) -> f64 {
    match stop.coordinate() {
        Some((lat, lon)) => haversine_distance(user, Coordinate::new(lat, lon)),
        None => f64::INFINITY,
    }
}
