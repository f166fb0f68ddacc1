pub mod activity;
pub mod metrics;
pub mod record;

pub use activity::{ActivityDetail, ActivityRecord, ActivitySummary, SummaryMetrics, Waypoint};
pub use metrics::KM_TO_MILE;
pub use record::{Field, Record};
