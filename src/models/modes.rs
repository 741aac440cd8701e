use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Europe::London;
use serde::{Deserialize, Serialize};

/// Transport modes understood by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineMode {
    Tube,
    Bus,
    Dlr,
    #[serde(rename = "london-overground")]
    Overground,
    ElizabethLine,
    /// Legacy mode name used before the Elizabeth line opened
    TflRail,
    NationalRail,
    Tram,
    RiverBus,
    #[serde(other)]
    Unknown,
}

impl LineMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineMode::Tube => "tube",
            LineMode::Bus => "bus",
            LineMode::Dlr => "dlr",
            LineMode::Overground => "london-overground",
            LineMode::ElizabethLine => "elizabeth-line",
            LineMode::TflRail => "tfl-rail",
            LineMode::NationalRail => "national-rail",
            LineMode::Tram => "tram",
            LineMode::RiverBus => "river-bus",
            LineMode::Unknown => "unknown",
        }
    }

    /// Significance weight used when ordering map markers. Bus stops and
    /// unrecognised modes carry no weight and sort behind everything else.
    pub fn weighting(&self) -> u8 {
        match self {
            LineMode::Tube => 3,
            LineMode::Dlr | LineMode::Overground | LineMode::ElizabethLine | LineMode::TflRail => 2,
            LineMode::NationalRail | LineMode::Tram | LineMode::RiverBus => 1,
            LineMode::Bus | LineMode::Unknown => 0,
        }
    }

    /// Fixed tint used for mode icons and drawn lines.
    pub fn brand_color(&self) -> &'static str {
        match self {
            LineMode::Tube => "#000F9F",
            LineMode::Bus => "#EE2E24",
            LineMode::Dlr => "#00A4A7",
            LineMode::Overground => "#EE7C0E",
            LineMode::ElizabethLine => "#6950A1",
            LineMode::TflRail => "#0019A8",
            LineMode::NationalRail => "#D41E4C",
            LineMode::Tram => "#84B817",
            LineMode::RiverBus => "#039BE5",
            LineMode::Unknown => "#626262",
        }
    }
}

/// Whether the Elizabeth line had replaced TfL Rail at the given instant.
/// The cutover was 2022-05-24 07:00:00 London time.
pub fn elizabeth_line_live(at: DateTime<Utc>) -> bool {
    match London.with_ymd_and_hms(2022, 5, 24, 7, 0, 0).single() {
        Some(cutover) => at >= cutover.with_timezone(&Utc),
        None => true,
    }
}

/// The default mode set used for searches and the home status screen.
/// Queries before the Elizabeth line cutover use the legacy TfL Rail mode.
pub fn search_modes_at(at: DateTime<Utc>) -> Vec<LineMode> {
    let rail = if elizabeth_line_live(at) {
        LineMode::ElizabethLine
    } else {
        LineMode::TflRail
    };
    vec![
        LineMode::Tube,
        LineMode::Overground,
        rail,
        LineMode::Dlr,
        LineMode::Bus,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Europe::London;

    fn london_instant(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        London
            .with_ymd_and_hms(y, mo, d, h, mi, s)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    // --- wire names ---

    #[test]
    fn decodes_kebab_case_mode_names() {
        let modes: Vec<LineMode> = serde_json::from_str(
            r#"["tube", "london-overground", "elizabeth-line", "tfl-rail", "national-rail"]"#,
        )
        .unwrap();
        assert_eq!(
            modes,
            vec![
                LineMode::Tube,
                LineMode::Overground,
                LineMode::ElizabethLine,
                LineMode::TflRail,
                LineMode::NationalRail,
            ]
        );
    }

    #[test]
    fn unknown_mode_names_decode_to_unknown() {
        let modes: Vec<LineMode> = serde_json::from_str(r#"["cable-car"]"#).unwrap();
        assert_eq!(modes, vec![LineMode::Unknown]);
    }

    #[test]
    fn round_trips_through_as_str() {
        for mode in [
            LineMode::Tube,
            LineMode::Bus,
            LineMode::Dlr,
            LineMode::Overground,
            LineMode::ElizabethLine,
            LineMode::TflRail,
            LineMode::NationalRail,
            LineMode::Tram,
            LineMode::RiverBus,
        ] {
            let encoded = serde_json::to_string(&mode).unwrap();
            assert_eq!(encoded, format!("\"{}\"", mode.as_str()));
        }
    }

    // --- weighting ---

    #[test]
    fn bus_and_unknown_carry_no_weight() {
        assert_eq!(LineMode::Bus.weighting(), 0);
        assert_eq!(LineMode::Unknown.weighting(), 0);
        assert!(LineMode::Tube.weighting() > 0);
        assert!(LineMode::Overground.weighting() > 0);
    }

    // --- cutover ---

    #[test]
    fn one_second_before_cutover_uses_tfl_rail() {
        let modes = search_modes_at(london_instant(2022, 5, 24, 6, 59, 59));
        assert!(modes.contains(&LineMode::TflRail));
        assert!(!modes.contains(&LineMode::ElizabethLine));
    }

    #[test]
    fn one_second_after_cutover_uses_elizabeth_line() {
        let modes = search_modes_at(london_instant(2022, 5, 24, 7, 0, 1));
        assert!(modes.contains(&LineMode::ElizabethLine));
        assert!(!modes.contains(&LineMode::TflRail));
    }

    #[test]
    fn cutover_instant_itself_uses_elizabeth_line() {
        let modes = search_modes_at(london_instant(2022, 5, 24, 7, 0, 0));
        assert!(modes.contains(&LineMode::ElizabethLine));
    }
}
