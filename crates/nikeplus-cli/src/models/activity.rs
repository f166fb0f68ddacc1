//! Activity data models for the Nike+ running service
//!
//! Both models are read-only views over the JSON the service returns. Only the
//! fields listed here have typed accessors; everything else stays reachable
//! through [`ActivityRecord::get`] and [`ActivityRecord::path`].

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::metrics::{self, PaceSeconds};
use super::record::{Field, Record};

/// History block type carrying instantaneous speed samples in km/h
pub const SPEED_HISTORY: &str = "SPEED";

/// Top-level fields shared by activity summaries and activity details
pub trait ActivityRecord {
    /// The underlying record
    fn record(&self) -> &Record;

    /// Raw access to any top-level field
    fn get(&self, key: &str) -> Field<'_> {
        self.record().get(key)
    }

    /// Raw access to a nested field by dotted path
    fn path(&self, dotted: &str) -> Field<'_> {
        self.record().path(dotted)
    }

    /// Activity name, e.g. "RUN ON: 06/21/12 06:28 PM"
    fn name(&self) -> Option<&str> {
        self.get("name").as_str()
    }

    fn activity_id(&self) -> Option<String> {
        self.get("activityId").to_id_string()
    }

    /// Activity type, e.g. "RUN"
    fn activity_type(&self) -> Option<&str> {
        self.get("activityType").as_str()
    }

    fn start_time_utc(&self) -> Option<&str> {
        self.get("startTimeUtc").as_str()
    }

    /// Start time parsed from `startTimeUtc`, which carries its own offset
    fn start_time(&self) -> Option<DateTime<FixedOffset>> {
        self.start_time_utc()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
    }

    fn time_zone(&self) -> Option<&str> {
        self.get("timeZone").as_str()
    }

    fn time_zone_id(&self) -> Option<&str> {
        self.get("timeZoneId").as_str()
    }

    fn dst_offset(&self) -> Option<&str> {
        self.get("dstOffset").as_str()
    }

    /// Upload status, e.g. "complete"
    fn status(&self) -> Option<&str> {
        self.get("status").as_str()
    }

    fn active_time(&self) -> Option<u64> {
        self.get("activeTime").as_u64()
    }

    /// Whether the activity was recorded with GPS
    fn gps(&self) -> Option<bool> {
        self.get("gps").as_bool()
    }

    fn latitude(&self) -> Option<f64> {
        self.get("latitude").as_f64()
    }

    fn longitude(&self) -> Option<f64> {
        self.get("longitude").as_f64()
    }

    /// Whether a heart rate monitor was used
    fn heartrate(&self) -> Option<bool> {
        self.get("heartrate").as_bool()
    }

    /// Recording device, e.g. "IPHONE"
    fn device_type(&self) -> Option<&str> {
        self.get("deviceType").as_str()
    }

    fn is_top_route(&self) -> Option<bool> {
        self.get("isTopRoute").as_bool()
    }
}

/// Lightweight activity entry from the activity listing.
///
/// Carries no waypoints or history; fetch an [`ActivityDetail`] for those.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivitySummary {
    record: Record,
}

impl ActivitySummary {
    pub fn new(record: Record) -> Self {
        Self { record }
    }

    /// Aggregate metrics (`metrics` object)
    pub fn metrics(&self) -> SummaryMetrics<'_> {
        SummaryMetrics(self.record.get("metrics"))
    }

    /// User tags such as `location` or `emotion`. Absent for activities logged without the GPS app.
    pub fn tags(&self) -> Field<'_> {
        self.record.get("tags")
    }

    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags().get(name).as_str()
    }

    /// Duration from the summary metrics as `HH:MM:SS`
    pub fn formatted_duration(&self) -> Option<String> {
        self.metrics().duration_ms().map(metrics::format_duration_ms)
    }

    pub fn into_record(self) -> Record {
        self.record
    }
}

impl ActivityRecord for ActivitySummary {
    fn record(&self) -> &Record {
        &self.record
    }
}

impl From<Record> for ActivitySummary {
    fn from(record: Record) -> Self {
        Self::new(record)
    }
}

/// The `metrics` object of an activity summary
#[derive(Debug, Clone, Copy)]
pub struct SummaryMetrics<'a>(Field<'a>);

impl<'a> SummaryMetrics<'a> {
    pub fn average_heart_rate(&self) -> Option<f64> {
        self.0.get("averageHeartRate").as_f64()
    }

    pub fn minimum_heart_rate(&self) -> Option<f64> {
        self.0.get("minimumHeartRate").as_f64()
    }

    pub fn maximum_heart_rate(&self) -> Option<f64> {
        self.0.get("maximumHeartRate").as_f64()
    }

    /// Average pace in milliseconds per kilometer
    pub fn average_pace(&self) -> Option<f64> {
        self.0.get("averagePace").as_f64()
    }

    /// Duration in milliseconds
    pub fn duration_ms(&self) -> Option<u64> {
        self.0.get("duration").as_u64()
    }

    pub fn calories(&self) -> Option<f64> {
        self.0.get("calories").as_f64()
    }

    /// NikeFuel points
    pub fn fuel(&self) -> Option<f64> {
        self.0.get("fuel").as_f64()
    }

    pub fn steps(&self) -> Option<u64> {
        self.0.get("steps").as_u64()
    }

    /// Distance in kilometers
    pub fn distance_km(&self) -> Option<f64> {
        self.0.get("distance").as_f64()
    }

    pub fn field(&self) -> Field<'a> {
        self.0
    }
}

/// One GPS fix along a route
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Waypoint {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub ele: Option<f64>,
}

/// Full activity record, including route waypoints and time-series history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityDetail {
    record: Record,
}

impl ActivityDetail {
    pub fn new(record: Record) -> Self {
        Self { record }
    }

    /// Duration in milliseconds
    pub fn duration_ms(&self) -> Option<u64> {
        self.record.get("duration").as_u64()
    }

    /// Distance in kilometers
    pub fn distance_km(&self) -> Option<f64> {
        self.record.get("distance").as_f64()
    }

    pub fn calories(&self) -> Option<f64> {
        self.record.get("calories").as_f64()
    }

    pub fn fuel(&self) -> Option<f64> {
        self.record.get("fuel").as_f64()
    }

    pub fn steps(&self) -> Option<u64> {
        self.record.get("steps").as_u64()
    }

    pub fn average_heart_rate(&self) -> Option<f64> {
        self.record.get("averageHeartRate").as_f64()
    }

    /// Id of the previous activity in the user's history
    pub fn prev_id(&self) -> Option<String> {
        self.record.get("prevId").to_id_string()
    }

    /// Sync time in milliseconds since the Unix epoch
    pub fn sync_date(&self) -> Option<i64> {
        self.record.get("syncDate").as_i64()
    }

    pub fn snapshots(&self) -> Field<'_> {
        self.record.get("snapshots")
    }

    pub fn geo(&self) -> Field<'_> {
        self.record.get("geo")
    }

    /// Route start as reported by the service, e.g. "41.762526, -72.66285"
    pub fn coordinate(&self) -> Option<&str> {
        self.geo().get("coordinate").as_str()
    }

    /// Route waypoints in recorded order
    pub fn waypoints(&self) -> Vec<Waypoint> {
        self.geo()
            .get("waypoints")
            .iter()
            .map(|point| Waypoint {
                lat: point.get("lat").as_f64(),
                lon: point.get("lon").as_f64(),
                ele: point.get("ele").as_f64(),
            })
            .collect()
    }

    /// Route as `[lat, lon]` pairs in recorded order.
    ///
    /// Empty when the activity has no `geo` data. Waypoints missing either
    /// coordinate are skipped.
    pub fn waypoint_list(&self) -> Vec<[f64; 2]> {
        self.waypoints()
            .into_iter()
            .filter_map(|w| Some([w.lat?, w.lon?]))
            .collect()
    }

    /// Duration as `HH:MM:SS`
    pub fn formatted_duration(&self) -> Option<String> {
        self.duration_ms().map(metrics::format_duration_ms)
    }

    pub fn kilometers(&self) -> Option<f64> {
        self.distance_km()
    }

    pub fn miles(&self) -> Option<f64> {
        self.distance_km().map(metrics::km_to_miles)
    }

    /// History blocks (`history`), each a `{type, values}` time series
    pub fn history(&self) -> Field<'_> {
        self.record.get("history")
    }

    /// Samples of the last history block of the given type.
    ///
    /// `None` when there is no history at all; empty when no block matches.
    /// A later block of the same type replaces an earlier one.
    pub fn history_values(&self, kind: &str) -> Option<&[Value]> {
        let history = self.history();
        if history.is_absent() {
            return None;
        }
        let mut values: Option<&[Value]> = Some(&[]);
        for block in history.iter() {
            if block.get("type").as_str() == Some(kind) {
                values = block.get("values").as_array();
            }
        }
        values
    }

    /// Speed samples in km/h from the last `SPEED` history block
    pub fn speed_values(&self) -> Option<&[Value]> {
        self.history_values(SPEED_HISTORY)
    }

    /// Average speed in kilometers per hour
    pub fn kmh(&self) -> Option<f64> {
        self.speed_values().and_then(metrics::mean_speed)
    }

    /// Average speed in miles per hour
    pub fn mph(&self) -> Option<f64> {
        self.kmh().map(metrics::km_to_miles)
    }

    /// Pace in minutes per kilometer, `MM:SS`, seconds rounded.
    ///
    /// Absent when the mean speed is zero or negative.
    pub fn mpk(&self) -> Option<String> {
        self.kmh().and_then(|kmh| metrics::pace(kmh, PaceSeconds::Round))
    }

    /// Pace in minutes per mile, `MM:SS`, seconds truncated.
    ///
    /// Absent when the mean speed is zero or negative.
    pub fn mpm(&self) -> Option<String> {
        self.mph().and_then(|mph| metrics::pace(mph, PaceSeconds::Truncate))
    }

    pub fn into_record(self) -> Record {
        self.record
    }
}

impl ActivityRecord for ActivityDetail {
    fn record(&self) -> &Record {
        &self.record
    }
}

impl From<Record> for ActivityDetail {
    fn from(record: Record) -> Self {
        Self::new(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn detail(value: Value) -> ActivityDetail {
        ActivityDetail::new(Record::from_value(value))
    }

    #[test]
    fn test_summary_metrics() {
        let summary = ActivitySummary::new(Record::from_value(json!({
            "name": "RUN ON: 06/21/12 06:28 PM",
            "activityId": "2003132748",
            "gps": true,
            "metrics": {"duration": 2140619, "calories": 393, "distance": 6.240550994873047},
            "tags": {"location": "outdoors"}
        })));

        assert_eq!(summary.activity_id().as_deref(), Some("2003132748"));
        assert_eq!(summary.gps(), Some(true));
        assert_eq!(summary.metrics().duration_ms(), Some(2140619));
        assert_eq!(summary.metrics().calories(), Some(393.0));
        assert_eq!(summary.metrics().steps(), None);
        assert_eq!(summary.tag("location"), Some("outdoors"));
        assert_eq!(summary.formatted_duration().as_deref(), Some("00:35:40"));
    }

    #[test]
    fn test_summary_without_tags_or_metrics() {
        let summary = ActivitySummary::new(Record::from_value(json!({"activityId": 1})));
        assert!(summary.tags().is_absent());
        assert_eq!(summary.tag("emotion"), None);
        assert_eq!(summary.metrics().distance_km(), None);
        assert_eq!(summary.formatted_duration(), None);
    }

    #[test]
    fn test_start_time() {
        let summary = ActivitySummary::new(Record::from_value(json!({
            "startTimeUtc": "2012-06-21T18:28:45-04:00"
        })));
        let start = summary.start_time().unwrap();
        assert_eq!(start.to_rfc3339(), "2012-06-21T18:28:45-04:00");

        let bad = ActivitySummary::new(Record::from_value(json!({"startTimeUtc": "yesterday"})));
        assert_eq!(bad.start_time(), None);
    }

    #[test]
    fn test_waypoint_list() {
        let activity = detail(json!({
            "geo": {"waypoints": [{"lat": 1, "lon": 2, "ele": 3}, {"lat": 4, "lon": 5, "ele": 6}]}
        }));
        assert_eq!(activity.waypoint_list(), vec![[1.0, 2.0], [4.0, 5.0]]);
        assert_eq!(activity.waypoints()[1].ele, Some(6.0));
    }

    #[test]
    fn test_waypoint_list_without_geo() {
        assert!(detail(json!({})).waypoint_list().is_empty());
        assert!(detail(json!({"geo": {"coordinate": "1, 2"}})).waypoint_list().is_empty());
    }

    #[test]
    fn test_waypoint_list_skips_partial_points() {
        let activity = detail(json!({
            "geo": {"waypoints": [{"lat": 1, "lon": 2}, {"lat": 3}, {"lat": 5, "lon": 6}]}
        }));
        assert_eq!(activity.waypoint_list(), vec![[1.0, 2.0], [5.0, 6.0]]);
        assert_eq!(activity.waypoints().len(), 3);
    }

    #[test]
    fn test_distance_conversions() {
        let activity = detail(json!({"distance": 6.240550994873047}));
        assert_eq!(activity.kilometers(), Some(6.240550994873047));
        assert_eq!(activity.miles(), Some(6.240550994873047 * 0.621371192));
        assert_eq!(detail(json!({})).miles(), None);
    }

    #[test]
    fn test_last_speed_block_wins() {
        let activity = detail(json!({
            "history": [
                {"type": "SPEED", "values": [10, 20]},
                {"type": "HEARTRATE", "values": [150, 160]},
                {"type": "SPEED", "values": [30, 40]}
            ]
        }));
        assert_eq!(activity.kmh(), Some(35.0));
        assert_eq!(activity.mph(), Some(35.0 * 0.621371192));
    }

    #[test]
    fn test_speed_values_absent_or_empty() {
        assert_eq!(detail(json!({})).speed_values(), None);

        let no_speed = detail(json!({"history": [{"type": "DISTANCE", "values": [1]}]}));
        assert_eq!(no_speed.speed_values(), Some(&[] as &[Value]));

        let no_values = detail(json!({"history": [{"type": "SPEED"}]}));
        assert_eq!(no_values.speed_values(), None);
    }

    #[test]
    fn test_derived_values_absent_without_history() {
        for activity in [detail(json!({})), detail(json!({"history": []}))] {
            assert_eq!(activity.kmh(), None);
            assert_eq!(activity.mph(), None);
            assert_eq!(activity.mpk(), None);
            assert_eq!(activity.mpm(), None);
        }
    }

    #[test]
    fn test_pace() {
        let activity = detail(json!({"history": [{"type": "SPEED", "values": [10.0, 10.0]}]}));
        assert_eq!(activity.mpk().as_deref(), Some("06:00"));
        assert_eq!(activity.mpm().as_deref(), Some("09:39"));
    }

    #[test]
    fn test_pace_absent_for_negative_speed() {
        let activity = detail(json!({"history": [{"type": "SPEED", "values": [-5.0, -5.0]}]}));
        assert_eq!(activity.kmh(), Some(-5.0));
        assert_eq!(activity.mpk(), None);
        assert_eq!(activity.mpm(), None);
    }

    #[test]
    fn test_formatted_duration() {
        assert_eq!(detail(json!({"duration": 2140619})).formatted_duration().as_deref(), Some("00:35:40"));
        assert_eq!(detail(json!({})).formatted_duration(), None);
    }

    #[test]
    fn test_pass_through_fields() {
        let source = json!({
            "name": "RUN ON: 06/21/12 06:28 PM",
            "activityId": "2003132748",
            "activityType": "RUN",
            "timeZone": "-04:00",
            "status": "complete",
            "deviceType": "IPHONE",
            "prevId": "2000841465",
            "syncDate": 1340320046000i64,
            "latitude": 41.765266,
            "unknownField": {"nested": [1, 2]}
        });
        let activity = detail(source.clone());

        for (key, value) in source.as_object().unwrap() {
            assert_eq!(activity.get(key).value(), Some(value), "field {}", key);
        }
        assert_eq!(activity.device_type(), Some("IPHONE"));
        assert_eq!(activity.prev_id().as_deref(), Some("2000841465"));
        assert_eq!(activity.sync_date(), Some(1340320046000));
        assert_eq!(activity.latitude(), Some(41.765266));
        assert_eq!(activity.clone().into_record().into_value(), source);
    }
}
