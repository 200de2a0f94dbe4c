use serde::{Deserialize, Serialize};
use time::Date;

use super::wire;

/// Today's logged metrics, as summarised by the dashboard. Absent when
/// nothing was logged today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodayMetrics {
    pub weight: f64,
    pub calories: u32,
    pub protein: u32,
    pub steps: u32,
    pub water: f64,
    pub sleep: f64,
    pub workout: bool,
    pub protein_hit: bool,
    pub calories_ok: bool,
}

/// Current targets, echoed next to today's numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetSnapshot {
    pub calorie_target: u32,
    pub protein_target: u32,
    pub goal_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub today: Option<TodayMetrics>,
    pub targets: Option<TargetSnapshot>,
    pub has_logged_today: bool,
}

/// One point of the weight trend series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    #[serde(with = "wire::date")]
    pub date: Date,
    pub weight: f64,
}

/// Consecutive-day counts ending today, or yesterday when today is not yet
/// logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streaks {
    pub protein_streak: u32,
    pub calorie_streak: u32,
    pub workout_streak: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Warning,
    Info,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
}

/// Aggregates for one calendar month, keyed by its first day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyMetrics {
    #[serde(with = "wire::date")]
    pub month: Date,
    pub avg_weight: Option<f64>,
    pub bmi: Option<f64>,
    pub bmi_category: String,
    pub weight_change: Option<f64>,
    pub consistency_score: u32,
    pub days_logged: u32,
    pub protein_hit_days: u32,
    pub workout_days: u32,
    pub total_days_in_month: u32,
}

/// The four dashboard sections fetched together for the overview screen.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOverview {
    pub summary: DashboardSummary,
    pub trends: Vec<TrendPoint>,
    pub streaks: Streaks,
    pub alerts: Vec<Alert>,
}
