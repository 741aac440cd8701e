//! Wire and domain models for the TfL Unified API.

pub mod arrivals;
pub mod dates;
pub mod line;
pub mod modes;
pub mod stop_point;

pub use arrivals::{ArrivalGroup, PlatformGroup, Prediction};
pub use line::{Disruption, Line, LineStatus, StatusSeverityColor, StatusSummary, ValidityPeriod};
pub use modes::LineMode;
pub use stop_point::{
    AdditionalProperty, LineModeGroup, Point, PointOfInterest, SearchMatch, SearchResponse,
    StopPoint, StopPointAnnotation,
};
