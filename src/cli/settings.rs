//! Profile and target settings commands.

use super::{account, output};
use crate::domain::user::{DietType, Gender, ProfilePatch, Settings, TargetPatch};
use crate::services::ServiceContainer;
use clap::{Args, Subcommand};

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show profile and targets
    Show,
    /// Update profile fields, targets or both
    Update(UpdateArgs),
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Display name
    #[arg(long)]
    pub name: Option<String>,
    /// Age in years
    #[arg(long)]
    pub age: Option<u32>,
    /// Gender
    #[arg(long, value_enum)]
    pub gender: Option<Gender>,
    /// Height in centimeters
    #[arg(long)]
    pub height_cm: Option<f64>,
    /// Average hours spent sitting per day
    #[arg(long)]
    pub sitting_hours: Option<f64>,
    /// Diet type
    #[arg(long, value_enum)]
    pub diet: Option<DietType>,
    /// Daily calorie target in kcal
    #[arg(long)]
    pub calories: Option<u32>,
    /// Daily protein target in grams
    #[arg(long)]
    pub protein: Option<u32>,
    /// Goal weight in kilograms
    #[arg(long)]
    pub goal_weight: Option<f64>,
}

pub async fn run(services: &ServiceContainer, command: SettingsCommand) -> anyhow::Result<()> {
    match command {
        SettingsCommand::Show => {
            let settings = services.settings.fetch().await?;
            print_settings(&settings);
        }
        SettingsCommand::Update(args) => {
            let profile = ProfilePatch {
                name: args.name,
                age: args.age,
                gender: args.gender,
                height_cm: args.height_cm,
                avg_sitting_hours: args.sitting_hours,
                diet_type: args.diet,
            };
            let targets = TargetPatch {
                calorie_target: args.calories,
                protein_target: args.protein,
                goal_weight: args.goal_weight,
            };
            if profile.is_empty() && targets.is_empty() {
                anyhow::bail!("nothing to update; pass at least one field flag");
            }
            let settings = services
                .settings
                .update(
                    (!profile.is_empty()).then_some(&profile),
                    (!targets.is_empty()).then_some(&targets),
                )
                .await?;
            output::success("Settings updated.");
            print_settings(&settings);
        }
    }
    Ok(())
}

fn print_settings(settings: &Settings) {
    println!("Profile");
    account::print_profile(&settings.profile);
    println!();
    match &settings.targets {
        Some(targets) => {
            println!("Targets");
            output::field("calories", format!("{} kcal", targets.calorie_target));
            output::field("protein", format!("{} g", targets.protein_target));
            output::field("goal weight", format!("{:.1} kg", targets.goal_weight));
        }
        None => output::info("No targets set yet. `fittrack onboard targets` sets them."),
    }
}
