//! Command line surface. Parsing and presentation only; every rule lives in
//! the domain types and services.

pub mod account;
pub mod dashboard;
pub mod logs;
pub mod measure;
pub mod onboard;
pub mod output;
pub mod settings;

use crate::api::ApiClient;
use crate::config::Config;
use crate::services::ServiceContainer;
use clap::{Parser, Subcommand};
use time::Date;

/// Command line client for the FitTrack API.
#[derive(Debug, Parser)]
#[command(name = "fittrack", version, about, propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub config: Config,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in with email and password
    Login(account::LoginArgs),
    /// Create a new account
    Register(account::RegisterArgs),
    /// Sign out and discard the stored session
    Logout,
    /// Show the signed-in profile
    Whoami,
    /// Confirm an email address with the mailed token
    VerifyEmail(account::VerifyEmailArgs),
    /// Ask for a fresh verification mail
    ResendVerification,
    /// Request or confirm a password reset
    #[command(subcommand)]
    ResetPassword(account::ResetPasswordCommand),
    /// Change the account password
    ChangePassword,
    /// Deactivate the account
    Deactivate(account::DeactivateArgs),
    /// First-run profile and target setup
    #[command(subcommand)]
    Onboard(onboard::OnboardCommand),
    /// Daily logs
    #[command(subcommand)]
    Log(logs::LogCommand),
    /// Body measurements
    #[command(subcommand)]
    Measure(measure::MeasureCommand),
    /// Today's intake, targets, trend, streaks and alerts in one view
    Dashboard(dashboard::DashboardArgs),
    /// Weight trend over the trailing window
    Trends(dashboard::TrendsArgs),
    /// Current protein, calorie and workout streaks
    Streaks,
    /// Month-by-month rollup for the current year
    Monthly,
    /// Profile and target settings
    #[command(subcommand)]
    Settings(settings::SettingsCommand),
}

/// Builds the shared client and services, then dispatches the command.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = ApiClient::new(&cli.config);
    let services = ServiceContainer::new(&client);

    match cli.command {
        Command::Login(args) => account::login(&services, args).await,
        Command::Register(args) => account::register(&services, args).await,
        Command::Logout => account::logout(&services).await,
        Command::Whoami => account::whoami(&services).await,
        Command::VerifyEmail(args) => account::verify_email(&services, args).await,
        Command::ResendVerification => account::resend_verification(&services).await,
        Command::ResetPassword(command) => account::reset_password(&services, command).await,
        Command::ChangePassword => account::change_password(&services).await,
        Command::Deactivate(args) => account::deactivate(&services, args).await,
        Command::Onboard(command) => onboard::run(&services, command).await,
        Command::Log(command) => logs::run(&services, command).await,
        Command::Measure(command) => measure::run(&services, command).await,
        Command::Dashboard(args) => dashboard::overview(&services, args).await,
        Command::Trends(args) => dashboard::trends(&services, args).await,
        Command::Streaks => dashboard::streaks(&services).await,
        Command::Monthly => dashboard::monthly(&services).await,
        Command::Settings(command) => settings::run(&services, command).await,
    }
}

/// Argument parser for date flags and positionals.
pub(crate) fn parse_cli_date(input: &str) -> Result<Date, String> {
    crate::domain::wire::parse_date(input)
        .map_err(|_| format!("expected a date like 2025-03-09, got {input:?}"))
}
