use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::dates;
use super::modes::LineMode;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub id: String,
    pub name: String,
    pub mode_name: LineMode,
    #[serde(default)]
    pub line_statuses: Vec<LineStatus>,
}

impl Line {
    /// The status in effect right now.
    pub fn current_status(&self) -> Option<&LineStatus> {
        self.current_status_at(Utc::now())
    }

    /// The first status whose validity includes `at` (explicit `isNow` flag
    /// or a containing period); falls back to the first listed status.
    pub fn current_status_at(&self, at: DateTime<Utc>) -> Option<&LineStatus> {
        self.line_statuses
            .iter()
            .find(|s| s.validity_periods.iter().any(|p| p.contains(at)))
            .or_else(|| self.line_statuses.first())
    }

    /// Whether the line is reporting good service at `at`. A line with no
    /// statuses at all has nothing wrong to report.
    pub fn has_good_service_at(&self, at: DateTime<Utc>) -> bool {
        self.current_status_at(at)
            .map(LineStatus::is_good_service)
            .unwrap_or(true)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStatus {
    pub status_severity: i32,
    #[serde(default)]
    pub status_severity_description: String,
    pub reason: Option<String>,
    #[serde(default)]
    pub validity_periods: Vec<ValidityPeriod>,
    pub disruption: Option<Disruption>,
}

impl LineStatus {
    pub fn is_good_service(&self) -> bool {
        matches!(self.status_severity, 10 | 18)
    }

    pub fn severity_color(&self) -> StatusSeverityColor {
        StatusSeverityColor::from_severity(self.status_severity)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidityPeriod {
    #[serde(with = "dates::tfl_date")]
    pub from_date: DateTime<Utc>,
    #[serde(with = "dates::tfl_date")]
    pub to_date: DateTime<Utc>,
    pub is_now: Option<bool>,
}

impl ValidityPeriod {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.is_now == Some(true) || (self.from_date <= at && at <= self.to_date)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Disruption {
    pub category: Option<String>,
    pub category_description: Option<String>,
    pub description: Option<String>,
}

/// Display colour bucket for a status severity code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusSeverityColor {
    Good,
    Minor,
    Severe,
    Info,
}

impl StatusSeverityColor {
    /// Fixed lookup over the severity codes 0-20; anything outside the
    /// table is informational.
    pub fn from_severity(code: i32) -> Self {
        match code {
            10 | 18 => StatusSeverityColor::Good,
            7 | 9 | 14 | 15 | 17 => StatusSeverityColor::Minor,
            1 | 2 | 3 | 4 | 5 | 6 | 8 | 11 | 16 | 20 => StatusSeverityColor::Severe,
            _ => StatusSeverityColor::Info,
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            StatusSeverityColor::Good => "#00843D",
            StatusSeverityColor::Minor => "#F4A61E",
            StatusSeverityColor::Severe => "#E03A3E",
            StatusSeverityColor::Info => "#53B7E8",
        }
    }
}

/// Qualitative overview of a set of line statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusSummary {
    AllGood,
    SomeProblems,
    ManyProblems,
    AllProblems,
}
