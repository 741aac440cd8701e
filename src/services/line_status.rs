//! Line status fetch and aggregation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::models::{Line, LineMode, StatusSummary};
use crate::providers::tfl::{TflClient, TflError};

/// Line ids pulled to the front of every status list, in this order.
/// Display rule carried over from the original client, not a sort.
const FRONT_LINE_IDS: [&str; 3] = ["london-overground", "tfl-rail", "elizabeth"];

pub struct LineStatusService {
    client: Arc<TflClient>,
}

impl LineStatusService {
    pub fn new(client: Arc<TflClient>) -> Self {
        Self { client }
    }

    /// Fetch line statuses for a mode set, with the fixed front-of-list
    /// reorder applied.
    pub async fn line_statuses(&self, modes: &[LineMode]) -> Result<Vec<Line>, TflError> {
        if modes.is_empty() {
            return Ok(Vec::new());
        }
        let joined = modes
            .iter()
            .map(LineMode::as_str)
            .collect::<Vec<_>>()
            .join(",");

        let mut lines: Vec<Line> = self
            .client
            .get(&format!("/Line/Mode/{}/Status?detail=true", joined))
            .await?;
        reorder_rail_lines(&mut lines);

        info!(modes = %joined, lines = lines.len(), "Fetched line statuses");

        Ok(lines)
    }

    /// Aggregate qualitative status across the given modes.
    pub async fn overview_status(&self, modes: &[LineMode]) -> Result<StatusSummary, TflError> {
        let lines = self.line_statuses(modes).await?;
        Ok(overview_from_lines(&lines, Utc::now()))
    }
}

/// Move the overground and TfL Rail/Elizabeth lines, where present, to the
/// front of the list. All other lines keep their fetched order.
pub fn reorder_rail_lines(lines: &mut Vec<Line>) {
    let mut front: Vec<Line> = Vec::new();
    for id in FRONT_LINE_IDS {
        if let Some(position) = lines.iter().position(|line| line.id == id) {
            front.push(lines.remove(position));
        }
    }
    for line in front.into_iter().rev() {
        lines.insert(0, line);
    }
}

/// Band the share of lines with good service into a qualitative label:
/// 100% good, at least 40%, above zero, or none at all.
pub fn overview_from_lines(lines: &[Line], at: DateTime<Utc>) -> StatusSummary {
    if lines.is_empty() {
        return StatusSummary::AllGood;
    }

    let good = lines
        .iter()
        .filter(|line| line.has_good_service_at(at))
        .count();
    let fraction = good as f64 / lines.len() as f64;

    if fraction >= 1.0 {
        StatusSummary::AllGood
    } else if fraction >= 0.4 {
        StatusSummary::SomeProblems
    } else if fraction > 0.0 {
        StatusSummary::ManyProblems
    } else {
        StatusSummary::AllProblems
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LineStatus, ValidityPeriod};
    use chrono::TimeZone;

    fn line(id: &str, severity: i32) -> Line {
        Line {
            id: id.to_string(),
            name: id.to_string(),
            mode_name: LineMode::Tube,
            line_statuses: vec![LineStatus {
                status_severity: severity,
                status_severity_description: String::new(),
                reason: None,
                validity_periods: vec![ValidityPeriod {
                    from_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                    to_date: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
                    is_now: Some(true),
                }],
                disruption: None,
            }],
        }
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    // --- reorder rule ---

    #[test]
    fn rail_lines_move_to_the_front_in_fixed_order() {
        let mut lines = vec![
            line("bakerloo", 10),
            line("elizabeth", 10),
            line("central", 10),
            line("london-overground", 10),
        ];
        reorder_rail_lines(&mut lines);
        let ids: Vec<&str> = lines.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["london-overground", "elizabeth", "bakerloo", "central"]
        );
    }

    #[test]
    fn reorder_handles_legacy_tfl_rail_id() {
        let mut lines = vec![
            line("victoria", 10),
            line("tfl-rail", 10),
            line("london-overground", 10),
        ];
        reorder_rail_lines(&mut lines);
        let ids: Vec<&str> = lines.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["london-overground", "tfl-rail", "victoria"]);
    }

    #[test]
    fn reorder_without_rail_lines_is_a_no_op() {
        let mut lines = vec![line("northern", 10), line("jubilee", 10)];
        reorder_rail_lines(&mut lines);
        let ids: Vec<&str> = lines.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["northern", "jubilee"]);
    }

    // --- overview banding ---

    #[test]
    fn all_lines_good_is_all_good() {
        let lines = vec![line("a", 10), line("b", 10)];
        assert_eq!(overview_from_lines(&lines, noon()), StatusSummary::AllGood);
    }

    #[test]
    fn three_of_four_good_is_some_problems() {
        let lines = vec![line("a", 10), line("b", 10), line("c", 10), line("d", 6)];
        assert_eq!(
            overview_from_lines(&lines, noon()),
            StatusSummary::SomeProblems
        );
    }

    #[test]
    fn exactly_forty_percent_good_is_some_problems() {
        let lines = vec![
            line("a", 10),
            line("b", 10),
            line("c", 6),
            line("d", 6),
            line("e", 6),
        ];
        assert_eq!(
            overview_from_lines(&lines, noon()),
            StatusSummary::SomeProblems
        );
    }

    #[test]
    fn below_forty_percent_good_is_many_problems() {
        let lines = vec![line("a", 10), line("b", 6), line("c", 6), line("d", 6)];
        assert_eq!(
            overview_from_lines(&lines, noon()),
            StatusSummary::ManyProblems
        );
    }

    #[test]
    fn no_good_lines_is_all_problems() {
        let lines = vec![line("a", 6), line("b", 4)];
        assert_eq!(
            overview_from_lines(&lines, noon()),
            StatusSummary::AllProblems
        );
    }

    #[test]
    fn no_lines_at_all_is_all_good() {
        assert_eq!(overview_from_lines(&[], noon()), StatusSummary::AllGood);
    }
}
