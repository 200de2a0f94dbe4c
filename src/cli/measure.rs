//! Body measurement commands.

use super::output;
use crate::domain::measurement::{BodyMeasurement, MeasurementDraft};
use crate::domain::today_utc;
use crate::services::ServiceContainer;
use clap::{Args, Subcommand};
use tabled::Tabled;
use time::Date;
use uuid::Uuid;

#[derive(Debug, Subcommand)]
pub enum MeasureCommand {
    /// Record a measurement snapshot
    Add(AddArgs),
    /// List all measurements
    List,
    /// Show the most recent measurement
    Latest,
    /// Show one measurement by id
    Show(ShowArgs),
}

/// All sites are in centimeters; give only the ones you measured.
#[derive(Debug, Args)]
pub struct AddArgs {
    /// Day of the measurement, defaulting to today
    #[arg(long, value_parser = super::parse_cli_date)]
    pub date: Option<Date>,
    #[arg(long)]
    pub neck: Option<f64>,
    #[arg(long)]
    pub chest: Option<f64>,
    #[arg(long)]
    pub shoulders: Option<f64>,
    #[arg(long)]
    pub bicep: Option<f64>,
    #[arg(long)]
    pub forearm: Option<f64>,
    #[arg(long)]
    pub waist: Option<f64>,
    #[arg(long)]
    pub hips: Option<f64>,
    #[arg(long)]
    pub thigh: Option<f64>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Measurement id
    pub id: Uuid,
}

pub async fn run(services: &ServiceContainer, command: MeasureCommand) -> anyhow::Result<()> {
    match command {
        MeasureCommand::Add(args) => {
            let mut draft = MeasurementDraft::new(args.date.unwrap_or_else(today_utc));
            draft.neck = args.neck;
            draft.chest = args.chest;
            draft.shoulders = args.shoulders;
            draft.bicep = args.bicep;
            draft.forearm = args.forearm;
            draft.waist = args.waist;
            draft.hips = args.hips;
            draft.thigh = args.thigh;
            let (measurement, warning) = services.measurements.create(&draft).await?;
            output::success(&format!("Recorded measurements for {}", measurement.date));
            if let Some(warning) = warning {
                output::warning(&warning);
            }
        }
        MeasureCommand::List => {
            let measurements = services.measurements.list().await?;
            let rows: Vec<MeasurementRow> = measurements.iter().map(MeasurementRow::from).collect();
            output::table(&rows);
        }
        MeasureCommand::Latest => match services.measurements.latest().await? {
            Some(measurement) => print_measurement(&measurement),
            None => output::info("No measurements recorded yet."),
        },
        MeasureCommand::Show(args) => match services.measurements.get(args.id).await? {
            Some(measurement) => print_measurement(&measurement),
            None => output::info("No measurement with that id."),
        },
    }
    Ok(())
}

#[derive(Tabled)]
struct MeasurementRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Neck")]
    neck: String,
    #[tabled(rename = "Chest")]
    chest: String,
    #[tabled(rename = "Shoulders")]
    shoulders: String,
    #[tabled(rename = "Bicep")]
    bicep: String,
    #[tabled(rename = "Forearm")]
    forearm: String,
    #[tabled(rename = "Waist")]
    waist: String,
    #[tabled(rename = "Hips")]
    hips: String,
    #[tabled(rename = "Thigh")]
    thigh: String,
}

impl From<&BodyMeasurement> for MeasurementRow {
    fn from(measurement: &BodyMeasurement) -> Self {
        Self {
            date: measurement.date.to_string(),
            neck: cm(measurement.neck),
            chest: cm(measurement.chest),
            shoulders: cm(measurement.shoulders),
            bicep: cm(measurement.bicep),
            forearm: cm(measurement.forearm),
            waist: cm(measurement.waist),
            hips: cm(measurement.hips),
            thigh: cm(measurement.thigh),
        }
    }
}

fn cm(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |value| format!("{value:.1}"))
}

fn print_measurement(measurement: &BodyMeasurement) {
    output::field("id", measurement.id);
    output::field("date", measurement.date);
    for (label, value) in [
        ("neck", measurement.neck),
        ("chest", measurement.chest),
        ("shoulders", measurement.shoulders),
        ("bicep", measurement.bicep),
        ("forearm", measurement.forearm),
        ("waist", measurement.waist),
        ("hips", measurement.hips),
        ("thigh", measurement.thigh),
    ] {
        if let Some(value) = value {
            output::field(label, format!("{value:.1} cm"));
        }
    }
}
