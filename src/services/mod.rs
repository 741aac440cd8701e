pub mod line_status;
pub mod nearby;
pub mod stop_points;

pub use line_status::LineStatusService;
pub use nearby::{Coordinate, NearbySearchService};
pub use stop_points::StopPointService;
