//! First-run onboarding commands.

use super::output;
use crate::domain::onboarding::{OnboardingProfile, OnboardingTargets};
use crate::domain::user::{DietType, Gender, TargetDraft};
use crate::services::ServiceContainer;
use clap::{Args, Subcommand};

#[derive(Debug, Subcommand)]
pub enum OnboardCommand {
    /// Step one: who you are
    Profile(ProfileArgs),
    /// Step two: what you are aiming for
    Targets(TargetsArgs),
    /// Which steps are still missing
    Status,
}

#[derive(Debug, Args)]
pub struct ProfileArgs {
    /// Display name
    #[arg(long)]
    pub name: String,
    /// Age in years
    #[arg(long)]
    pub age: u32,
    /// Gender
    #[arg(long, value_enum)]
    pub gender: Gender,
    /// Height in centimeters
    #[arg(long)]
    pub height_cm: f64,
    /// Average hours spent sitting per day
    #[arg(long)]
    pub sitting_hours: f64,
    /// Diet type
    #[arg(long, value_enum)]
    pub diet: DietType,
}

#[derive(Debug, Args)]
pub struct TargetsArgs {
    /// Daily calorie target in kcal
    #[arg(long)]
    pub calories: u32,
    /// Daily protein target in grams
    #[arg(long)]
    pub protein: u32,
    /// Weight you are working towards, in kilograms
    #[arg(long)]
    pub goal_weight: f64,
    /// Current weight in kilograms
    #[arg(long)]
    pub weight: f64,
}

pub async fn run(services: &ServiceContainer, command: OnboardCommand) -> anyhow::Result<()> {
    match command {
        OnboardCommand::Profile(args) => {
            let profile = OnboardingProfile {
                name: args.name,
                age: args.age,
                gender: args.gender,
                height_cm: args.height_cm,
                avg_sitting_hours: args.sitting_hours,
                diet_type: args.diet,
            };
            services.onboarding.submit_profile(&profile).await?;
            output::success("Profile saved. Next step: `fittrack onboard targets`.");
        }
        OnboardCommand::Targets(args) => {
            let targets = OnboardingTargets {
                targets: TargetDraft {
                    calorie_target: args.calories,
                    protein_target: args.protein,
                    goal_weight: args.goal_weight,
                },
                weight: args.weight,
            };
            let result = services.onboarding.submit_targets(&targets).await?;
            output::success("Targets saved. Setup complete.");
            output::field("bmi", format!("{:.1}", result.bmi));
            output::field("category", &result.bmi_category);
        }
        OnboardCommand::Status => {
            let status = services.onboarding.status().await?;
            output::field("profile", step_state(status.has_profile));
            output::field("targets", step_state(status.has_targets));
            output::field("onboarded", status.is_onboarded);
        }
    }
    Ok(())
}

const fn step_state(done: bool) -> &'static str {
    if done { "done" } else { "missing" }
}
