//! Stop point search and arrival aggregation.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;
use tracing::info;

use crate::models::{ArrivalGroup, Prediction, SearchMatch, SearchResponse, StopPoint};
use crate::providers::tfl::{TflClient, TflError};

/// Cap on text search matches
const SEARCH_MAX_RESULTS: usize = 10;

pub struct StopPointService {
    client: Arc<TflClient>,
}

impl StopPointService {
    pub fn new(client: Arc<TflClient>) -> Self {
        Self { client }
    }

    /// Text search returning stop summaries only, capped at 10 matches.
    pub async fn search_by_name(&self, text: &str) -> Result<Vec<SearchMatch>, TflError> {
        let path = format!(
            "/StopPoint/Search/{}?maxResults={}&faresOnly=false",
            urlencoding::encode(text),
            SEARCH_MAX_RESULTS
        );
        let response: SearchResponse = self.client.get(&path).await?;

        info!(
            count = response.matches.len(),
            search_term = %text,
            "Found stop points"
        );

        Ok(response.matches)
    }

    /// Batch-fetch full detail for a comma-joined id list. The endpoint
    /// answers with a bare object instead of an array for exactly one id.
    pub async fn get_stop_points(&self, ids: &[String]) -> Result<Vec<StopPoint>, TflError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let path = format!("/StopPoint/{}", ids.join(","));
        self.client.get_array_or_single(&path).await
    }

    /// Text search composed with a full-detail batch fetch.
    pub async fn detailed_search(&self, text: &str) -> Result<Vec<StopPoint>, TflError> {
        let matches = self.search_by_name(text).await?;
        let ids: Vec<String> = matches.into_iter().map(|m| m.id).collect();
        let stops = self.get_stop_points(&ids).await?;
        Ok(reverse_for_display(stops))
    }

    /// Predicted arrivals for a stop, grouped per line.
    ///
    /// Hub stations carry no arrivals of their own; every child station is
    /// queried (concurrently, bounded by the client's request limit) and
    /// the results concatenated before grouping.
    pub async fn estimated_arrivals(
        &self,
        stop: &StopPoint,
    ) -> Result<Vec<ArrivalGroup>, TflError> {
        let predictions = if stop.is_hub() {
            let fetches: Vec<_> = stop
                .child_station_ids
                .iter()
                .map(|id| self.arrivals_for_id(id))
                .collect();

            let mut combined = Vec::new();
            for result in join_all(fetches).await {
                combined.extend(result?);
            }
            combined
        } else {
            self.arrivals_for_id(&stop.id).await?
        };

        info!(
            stop = %stop.id,
            predictions = predictions.len(),
            "Fetched arrival predictions"
        );

        Ok(group_arrivals(predictions))
    }

    async fn arrivals_for_id(&self, id: &str) -> Result<Vec<Prediction>, TflError> {
        self.client.get(&format!("/StopPoint/{}/Arrivals", id)).await
    }
}

/// Detailed search results are presented reversed relative to the search
/// endpoint's match order. Display rule carried over from the original
/// client, kept as its own step.
pub fn reverse_for_display(mut stops: Vec<StopPoint>) -> Vec<StopPoint> {
    stops.reverse();
    stops
}

/// Group predictions by line name: within a group soonest first, groups
/// sorted alphabetically by line name for stable display order.
pub fn group_arrivals(predictions: Vec<Prediction>) -> Vec<ArrivalGroup> {
    let mut by_line: BTreeMap<String, Vec<Prediction>> = BTreeMap::new();
    for prediction in predictions {
        by_line
            .entry(prediction.line_name.clone())
            .or_default()
            .push(prediction);
    }

    by_line
        .into_iter()
        .map(|(line_name, mut arrivals)| {
            arrivals.sort_by_key(|a| a.time_to_station);
            ArrivalGroup {
                line_name,
                arrivals,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(line: &str, seconds: i64) -> Prediction {
        Prediction {
            id: None,
            naptan_id: None,
            station_name: None,
            line_id: Some(line.to_lowercase()),
            line_name: line.to_string(),
            platform_name: None,
            direction: None,
            destination_name: None,
            towards: None,
            time_to_station: seconds,
            expected_arrival: None,
        }
    }

    fn bare_stop(id: &str) -> StopPoint {
        StopPoint {
            id: id.to_string(),
            common_name: None,
            lat: None,
            lon: None,
            line_mode_groups: Vec::new(),
            additional_properties: Vec::new(),
            child_station_ids: Vec::new(),
        }
    }

    // --- display ordering ---

    #[test]
    fn detailed_search_order_is_the_exact_reverse_of_the_fetch() {
        let stops = vec![bare_stop("a"), bare_stop("b"), bare_stop("c")];
        let reversed = reverse_for_display(stops);
        let ids: Vec<&str> = reversed.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    // --- grouping ---

    #[test]
    fn groups_sort_alphabetically_by_line_name() {
        let groups = group_arrivals(vec![
            prediction("Victoria", 30),
            prediction("Bakerloo", 300),
            prediction("Northern", 120),
        ]);
        let names: Vec<&str> = groups.iter().map(|g| g.line_name.as_str()).collect();
        assert_eq!(names, vec!["Bakerloo", "Northern", "Victoria"]);
    }

    #[test]
    fn arrivals_within_a_group_sort_soonest_first() {
        let groups = group_arrivals(vec![
            prediction("Victoria", 600),
            prediction("Victoria", 60),
            prediction("Victoria", 300),
        ]);
        let times: Vec<i64> = groups[0].arrivals.iter().map(|a| a.time_to_station).collect();
        assert_eq!(times, vec![60, 300, 600]);
    }

    #[test]
    fn grouping_is_idempotent() {
        let once = group_arrivals(vec![
            prediction("Jubilee", 45),
            prediction("District", 500),
            prediction("Jubilee", 15),
            prediction("District", 90),
        ]);

        let flattened: Vec<Prediction> = once
            .iter()
            .flat_map(|g| g.arrivals.iter().cloned())
            .collect();
        let twice = group_arrivals(flattened);

        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a.line_name, b.line_name);
            let times_a: Vec<i64> = a.arrivals.iter().map(|p| p.time_to_station).collect();
            let times_b: Vec<i64> = b.arrivals.iter().map(|p| p.time_to_station).collect();
            assert_eq!(times_a, times_b);
        }
    }

    #[test]
    fn empty_input_groups_to_nothing() {
        assert!(group_arrivals(Vec::new()).is_empty());
    }

    // --- hub concatenation ---

    #[test]
    fn grouping_is_insensitive_to_child_concatenation_order() {
        // Per-child arrival batches may complete in any order; grouping
        // must produce the same result either way.
        let child_a = vec![prediction("Elizabeth line", 120), prediction("DLR", 30)];
        let child_b = vec![prediction("DLR", 90), prediction("Elizabeth line", 700)];

        let mut one: Vec<Prediction> = child_a.clone();
        one.extend(child_b.clone());
        let mut other: Vec<Prediction> = child_b;
        other.extend(child_a);

        let groups_one = group_arrivals(one);
        let groups_other = group_arrivals(other);

        assert_eq!(groups_one.len(), groups_other.len());
        for (a, b) in groups_one.iter().zip(groups_other.iter()) {
            assert_eq!(a.line_name, b.line_name);
            let times_a: Vec<i64> = a.arrivals.iter().map(|p| p.time_to_station).collect();
            let times_b: Vec<i64> = b.arrivals.iter().map(|p| p.time_to_station).collect();
            assert_eq!(times_a, times_b);
        }
    }
}
