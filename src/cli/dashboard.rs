//! Dashboard, trend, streak and monthly commands.

use super::output;
use crate::domain::dashboard::{
    AlertKind, MonthlyMetrics, Streaks, TargetSnapshot, TodayMetrics, TrendPoint,
};
use crate::services::ServiceContainer;
use clap::Args;
use tabled::Tabled;

#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// Trend window in days; the server honors 7, 14 and 30
    #[arg(long, default_value_t = 7)]
    pub days: u16,
}

#[derive(Debug, Args)]
pub struct TrendsArgs {
    /// Window in days; the server honors 7, 14 and 30
    #[arg(long, default_value_t = 7)]
    pub days: u16,
}

pub async fn overview(services: &ServiceContainer, args: DashboardArgs) -> anyhow::Result<()> {
    let overview = services.dashboard.overview(args.days).await?;
    for alert in &overview.alerts {
        match alert.kind {
            AlertKind::Warning => output::warning(&alert.message),
            AlertKind::Info | AlertKind::Other => output::info(&alert.message),
        }
    }
    match &overview.summary.today {
        Some(today) => print_today(today, overview.summary.targets.as_ref()),
        None => output::info("Nothing logged today. `fittrack log set` records it."),
    }
    print_streaks(&overview.streaks);
    println!();
    print_trend(&overview.trends);
    Ok(())
}

pub async fn trends(services: &ServiceContainer, args: TrendsArgs) -> anyhow::Result<()> {
    let points = services.dashboard.trends(args.days).await?;
    print_trend(&points);
    Ok(())
}

pub async fn streaks(services: &ServiceContainer) -> anyhow::Result<()> {
    let streaks = services.dashboard.streaks().await?;
    print_streaks(&streaks);
    Ok(())
}

pub async fn monthly(services: &ServiceContainer) -> anyhow::Result<()> {
    let months = services.dashboard.monthly().await?;
    let rows: Vec<MonthRow> = months.iter().map(MonthRow::from).collect();
    output::table(&rows);
    Ok(())
}

fn print_today(today: &TodayMetrics, targets: Option<&TargetSnapshot>) {
    println!("Today");
    if let Some(targets) = targets {
        output::field(
            "calories",
            format!("{} / {} kcal", today.calories, targets.calorie_target),
        );
        output::field(
            "protein",
            format!("{} / {} g", today.protein, targets.protein_target),
        );
    } else {
        output::field("calories", format!("{} kcal", today.calories));
        output::field("protein", format!("{} g", today.protein));
    }
    output::field("weight", format!("{:.1} kg", today.weight));
    output::field("steps", today.steps);
    output::field("water", format!("{:.1} l", today.water));
    output::field("sleep", format!("{:.1} h", today.sleep));
    output::field("workout", today.workout);
}

fn print_streaks(streaks: &Streaks) {
    println!("Streaks");
    output::field("protein", days(streaks.protein_streak));
    output::field("calories", days(streaks.calorie_streak));
    output::field("workouts", days(streaks.workout_streak));
}

fn days(count: u32) -> String {
    if count == 1 { "1 day".to_string() } else { format!("{count} days") }
}

fn print_trend(points: &[TrendPoint]) {
    if points.is_empty() {
        output::info("No weight entries in the window.");
        return;
    }
    let rows: Vec<TrendRow> = points.iter().map(TrendRow::from).collect();
    output::table(&rows);
    if points.len() > 1 {
        let delta = points[points.len() - 1].weight - points[0].weight;
        output::field("change", format!("{delta:+.1} kg"));
    }
}

#[derive(Tabled)]
struct TrendRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Weight")]
    weight: String,
}

impl From<&TrendPoint> for TrendRow {
    fn from(point: &TrendPoint) -> Self {
        Self {
            date: point.date.to_string(),
            weight: format!("{:.1}", point.weight),
        }
    }
}

#[derive(Tabled)]
struct MonthRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Avg kg")]
    avg_weight: String,
    #[tabled(rename = "BMI")]
    bmi: String,
    #[tabled(rename = "Change")]
    change: String,
    #[tabled(rename = "Logged")]
    logged: String,
    #[tabled(rename = "Consistency")]
    consistency: String,
    #[tabled(rename = "Protein")]
    protein_days: u32,
    #[tabled(rename = "Workouts")]
    workout_days: u32,
}

impl From<&MonthlyMetrics> for MonthRow {
    fn from(month: &MonthlyMetrics) -> Self {
        Self {
            month: format!("{}-{:02}", month.month.year(), u8::from(month.month.month())),
            avg_weight: month
                .avg_weight
                .map_or_else(|| "-".to_string(), |weight| format!("{weight:.1}")),
            bmi: month.bmi.map_or_else(|| "-".to_string(), |bmi| format!("{bmi:.1}")),
            change: month
                .weight_change
                .map_or_else(|| "-".to_string(), |change| format!("{change:+.1}")),
            logged: format!("{}/{}", month.days_logged, month.total_days_in_month),
            consistency: format!("{}%", month.consistency_score),
            protein_days: month.protein_hit_days,
            workout_days: month.workout_days,
        }
    }
}
