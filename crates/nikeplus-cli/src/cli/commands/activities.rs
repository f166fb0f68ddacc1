//! Activity commands for nikeplus-cli

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::config::ClientConfig;
use crate::error::{NikePlusError, Result};
use crate::models::{ActivityDetail, ActivityRecord, ActivitySummary, Waypoint};

use super::auth::login;

/// List activities
pub async fn list(config: &ClientConfig, limit: Option<usize>, format: OutputFormat) -> Result<()> {
    let client = login(config).await?;
    let mut activities = client.list_activities().await?;
    if let Some(limit) = limit {
        activities.truncate(limit);
    }

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&activities)?);
        return Ok(());
    }

    if activities.is_empty() {
        println!("No activities found.");
        return Ok(());
    }

    println!(
        "{:<12} {:<10} {:<8} {:>10} {:>10} {:>8}",
        "ID", "Date", "Type", "Distance", "Duration", "Cal"
    );
    println!("{}", "-".repeat(63));

    for activity in &activities {
        println!("{}", summary_row(activity));
    }

    println!("\nShowing {} activities", activities.len());

    Ok(())
}

/// Print activity ids, one per line
pub async fn ids(config: &ClientConfig) -> Result<()> {
    let client = login(config).await?;

    for id in client.list_activity_ids().await? {
        println!("{}", id);
    }

    Ok(())
}

/// Get activity details with derived speed and pace
pub async fn get(config: &ClientConfig, id: &str, waypoints: bool, format: OutputFormat) -> Result<()> {
    let client = login(config).await?;
    let activity = client
        .get_activity(id)
        .await?
        .ok_or_else(|| NikePlusError::invalid_response(format!("Activity {} not found", id)))?;

    let report = ActivityReport::from_detail(&activity, waypoints);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => print_report(&report),
    }

    Ok(())
}

/// Derived view of an activity for display
#[derive(Debug, Serialize)]
struct ActivityReport {
    id: Option<String>,
    name: Option<String>,
    activity_type: Option<String>,
    start_time_utc: Option<String>,
    device_type: Option<String>,
    duration: Option<String>,
    kilometers: Option<f64>,
    miles: Option<f64>,
    kmh: Option<f64>,
    mph: Option<f64>,
    min_per_km: Option<String>,
    min_per_mile: Option<String>,
    waypoint_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    waypoints: Option<Vec<Waypoint>>,
}

impl ActivityReport {
    fn from_detail(activity: &ActivityDetail, with_waypoints: bool) -> Self {
        let points = activity.waypoints();
        Self {
            id: activity.activity_id(),
            name: activity.name().map(str::to_string),
            activity_type: activity.activity_type().map(str::to_string),
            start_time_utc: activity.start_time_utc().map(str::to_string),
            device_type: activity.device_type().map(str::to_string),
            duration: activity.formatted_duration(),
            kilometers: activity.kilometers(),
            miles: activity.miles(),
            kmh: activity.kmh(),
            mph: activity.mph(),
            min_per_km: activity.mpk(),
            min_per_mile: activity.mpm(),
            waypoint_count: points.len(),
            waypoints: with_waypoints.then_some(points),
        }
    }
}

fn print_report(report: &ActivityReport) {
    let text = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    let number = |v: Option<f64>, unit: &str| {
        v.map(|n| format!("{:.2} {}", n, unit))
            .unwrap_or_else(|| "-".to_string())
    };

    println!("ID:        {}", text(&report.id));
    println!("Name:      {}", text(&report.name));
    println!("Type:      {}", text(&report.activity_type));
    println!("Start:     {}", text(&report.start_time_utc));
    println!("Device:    {}", text(&report.device_type));
    println!("Duration:  {}", text(&report.duration));
    println!("Distance:  {} / {}", number(report.kilometers, "km"), number(report.miles, "mi"));
    println!("Speed:     {} / {}", number(report.kmh, "km/h"), number(report.mph, "mph"));
    println!("Pace:      {} /km, {} /mi", text(&report.min_per_km), text(&report.min_per_mile));
    println!("Waypoints: {}", report.waypoint_count);

    if let Some(points) = &report.waypoints {
        for point in points {
            let coord = |v: Option<f64>| v.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string());
            println!("  {}, {} ({})", coord(point.lat), coord(point.lon), coord(point.ele));
        }
    }
}

fn summary_row(activity: &ActivitySummary) -> String {
    let metrics = activity.metrics();
    let date = activity
        .start_time()
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());
    let distance = metrics
        .distance_km()
        .map(|d| format!("{:.2} km", d))
        .unwrap_or_else(|| "-".to_string());
    let calories = metrics
        .calories()
        .map(|c| format!("{:.0}", c))
        .unwrap_or_else(|| "-".to_string());

    format!(
        "{:<12} {:<10} {:<8} {:>10} {:>10} {:>8}",
        activity.activity_id().unwrap_or_else(|| "-".to_string()),
        date,
        truncate(activity.activity_type().unwrap_or("-"), 8),
        distance,
        activity.formatted_duration().unwrap_or_else(|| "-".to_string()),
        calories
    )
}

/// Truncate string to max length
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
