//! Daily log commands.

use super::output;
use crate::domain::log::{DailyLog, DailyLogDraft};
use crate::domain::today_utc;
use crate::services::ServiceContainer;
use clap::{Args, Subcommand};
use tabled::Tabled;
use time::Date;

#[derive(Debug, Subcommand)]
pub enum LogCommand {
    /// Show one day's log, today's by default
    Show(ShowArgs),
    /// Record or overwrite a day's log
    Set(SetArgs),
    /// Delete a day's log
    Delete(DeleteArgs),
    /// List recent logs
    List(ListArgs),
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Day to show, YYYY-MM-DD
    #[arg(value_parser = super::parse_cli_date)]
    pub date: Option<Date>,
}

#[derive(Debug, Args)]
pub struct SetArgs {
    /// Day to write, defaulting to today
    #[arg(long, value_parser = super::parse_cli_date)]
    pub date: Option<Date>,
    /// Body weight in kilograms
    #[arg(long)]
    pub weight: f64,
    /// Calories eaten, kcal
    #[arg(long)]
    pub calories: u32,
    /// Protein eaten, grams
    #[arg(long)]
    pub protein: u32,
    /// Carbohydrates eaten, grams
    #[arg(long)]
    pub carbs: Option<u32>,
    /// Fat eaten, grams
    #[arg(long)]
    pub fats: Option<u32>,
    /// Steps walked
    #[arg(long, default_value_t = 0)]
    pub steps: u32,
    /// Water drunk, liters
    #[arg(long, default_value_t = 0.0)]
    pub water: f64,
    /// Hours slept
    #[arg(long, default_value_t = 0.0)]
    pub sleep: f64,
    /// Did a workout
    #[arg(long)]
    pub workout: bool,
    /// Did cardio
    #[arg(long)]
    pub cardio: bool,
    /// Ate fruit
    #[arg(long)]
    pub fruit: bool,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Day to delete, YYYY-MM-DD
    #[arg(value_parser = super::parse_cli_date)]
    pub date: Date,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only logs on or after this day, YYYY-MM-DD
    #[arg(long, value_parser = super::parse_cli_date)]
    pub since: Option<Date>,
    /// How many logs to fetch
    #[arg(long, default_value_t = 30)]
    pub limit: u32,
}

pub async fn run(services: &ServiceContainer, command: LogCommand) -> anyhow::Result<()> {
    match command {
        LogCommand::Show(args) => {
            let log = match args.date {
                Some(date) => services.logs.get(date).await?,
                None => services.logs.today().await?,
            };
            match log {
                Some(log) => print_log(&log),
                None => output::info("Nothing logged for that day."),
            }
        }
        LogCommand::Set(args) => {
            let date = args.date.unwrap_or_else(today_utc);
            let draft = DailyLogDraft {
                weight: args.weight,
                calories: args.calories,
                protein: args.protein,
                steps: args.steps,
                water: args.water,
                sleep: args.sleep,
                workout: args.workout,
                cardio: args.cardio,
                carbs: args.carbs,
                fats: args.fats,
                fruit: args.fruit,
            };
            let log = services.logs.create(date, &draft).await?;
            output::success(&format!("Logged {}", log.date));
            print_log(&log);
        }
        LogCommand::Delete(args) => {
            services.logs.delete(args.date).await?;
            output::success(&format!("Deleted the log for {}", args.date));
        }
        LogCommand::List(args) => {
            let page = services.logs.list(args.since, args.limit).await?;
            let rows: Vec<LogRow> = page.results.iter().map(LogRow::from).collect();
            output::table(&rows);
            if page.next.is_some() {
                output::info(&format!(
                    "{} of {} logs shown. Raise --limit to fetch more.",
                    rows.len(),
                    page.count
                ));
            }
        }
    }
    Ok(())
}

#[derive(Tabled)]
struct LogRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Weight")]
    weight: String,
    #[tabled(rename = "Kcal")]
    calories: u32,
    #[tabled(rename = "Protein")]
    protein: u32,
    #[tabled(rename = "Steps")]
    steps: u32,
    #[tabled(rename = "Water")]
    water: String,
    #[tabled(rename = "Sleep")]
    sleep: String,
    #[tabled(rename = "Training")]
    training: String,
    #[tabled(rename = "Targets")]
    targets: String,
}

impl From<&DailyLog> for LogRow {
    fn from(log: &DailyLog) -> Self {
        Self {
            date: log.date.to_string(),
            weight: format!("{:.1}", log.weight),
            calories: log.calories,
            protein: log.protein,
            steps: log.steps,
            water: format!("{:.1}", log.water),
            sleep: format!("{:.1}", log.sleep),
            training: match (log.workout, log.cardio) {
                (true, true) => "both".into(),
                (true, false) => "workout".into(),
                (false, true) => "cardio".into(),
                (false, false) => "-".into(),
            },
            // P = protein target hit, C = calories within range
            targets: match (log.protein_hit, log.calories_ok) {
                (true, true) => "P+C".into(),
                (true, false) => "P".into(),
                (false, true) => "C".into(),
                (false, false) => "-".into(),
            },
        }
    }
}

fn print_log(log: &DailyLog) {
    output::field("date", log.date);
    output::field("weight", format!("{:.1} kg", log.weight));
    output::field("calories", format!("{} kcal{}", log.calories, hit(log.calories_ok)));
    output::field("protein", format!("{} g{}", log.protein, hit(log.protein_hit)));
    if let Some(carbs) = log.carbs {
        output::field("carbs", format!("{carbs} g"));
    }
    if let Some(fats) = log.fats {
        output::field("fats", format!("{fats} g"));
    }
    output::field("steps", log.steps);
    output::field("water", format!("{:.1} l", log.water));
    output::field("sleep", format!("{:.1} h", log.sleep));
    output::field("workout", log.workout);
    output::field("cardio", log.cardio);
    output::field("fruit", log.fruit);
}

const fn hit(ok: bool) -> &'static str {
    if ok { " (target hit)" } else { "" }
}
