//! Account and session commands.

use super::output;
use crate::domain::user::User;
use crate::services::ServiceContainer;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Email address of the account
    pub email: String,
    /// Password; prompted for when not given
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Email address to register
    pub email: String,
    /// Password; prompted for with confirmation when not given
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Debug, Args)]
pub struct VerifyEmailArgs {
    /// Verification token from the mail
    pub token: String,
}

#[derive(Debug, Subcommand)]
pub enum ResetPasswordCommand {
    /// Mail a reset token to the given address
    Request {
        /// Email address of the account
        email: String,
    },
    /// Set a new password using the mailed token
    Confirm {
        /// Reset token from the mail
        token: String,
    },
}

#[derive(Debug, Args)]
pub struct DeactivateArgs {
    /// Skip the confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

pub async fn login(services: &ServiceContainer, args: LoginArgs) -> anyhow::Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => output::prompt_password("Password: ")?,
    };
    let user = services.session.login(&args.email, &password).await?;
    output::success(&format!("Signed in as {}", user.email));
    if !user.is_email_verified {
        output::warning("Email address not verified yet. `fittrack resend-verification` sends a fresh mail.");
    }
    if !user.is_onboarded {
        output::info("Setup incomplete. `fittrack onboard status` shows what is missing.");
    }
    Ok(())
}

pub async fn register(services: &ServiceContainer, args: RegisterArgs) -> anyhow::Result<()> {
    let (password, confirm) = match args.password {
        Some(password) => (password.clone(), password),
        None => (
            output::prompt_password("Password: ")?,
            output::prompt_password("Confirm password: ")?,
        ),
    };
    services.session.register(&args.email, &password, &confirm).await?;
    output::success("Account created. Check your inbox for the verification mail, then sign in.");
    Ok(())
}

pub async fn logout(services: &ServiceContainer) -> anyhow::Result<()> {
    services.session.logout().await;
    output::success("Signed out.");
    Ok(())
}

pub async fn whoami(services: &ServiceContainer) -> anyhow::Result<()> {
    if !services.session.is_authenticated() {
        anyhow::bail!("not signed in; run `fittrack login` first");
    }
    match services.session.fetch_profile().await {
        Some(user) => {
            print_profile(&user);
            Ok(())
        }
        None => anyhow::bail!("stored session is no longer valid; run `fittrack login` again"),
    }
}

pub async fn verify_email(services: &ServiceContainer, args: VerifyEmailArgs) -> anyhow::Result<()> {
    services.session.verify_email(&args.token).await?;
    output::success("Email address verified. You can sign in now.");
    Ok(())
}

pub async fn resend_verification(services: &ServiceContainer) -> anyhow::Result<()> {
    services.session.resend_verification().await?;
    output::success("Verification mail sent. You can request another in 60 seconds.");
    Ok(())
}

pub async fn reset_password(
    services: &ServiceContainer,
    command: ResetPasswordCommand,
) -> anyhow::Result<()> {
    match command {
        ResetPasswordCommand::Request { email } => {
            services.session.request_password_reset(&email).await?;
            output::success("If that address has an account, a reset mail is on its way.");
        }
        ResetPasswordCommand::Confirm { token } => {
            let password = output::prompt_password("New password: ")?;
            let confirm = output::prompt_password("Confirm new password: ")?;
            services.session.confirm_password_reset(&token, &password, &confirm).await?;
            output::success("Password updated. Sign in with the new password.");
        }
    }
    Ok(())
}

pub async fn change_password(services: &ServiceContainer) -> anyhow::Result<()> {
    let current = output::prompt_password("Current password: ")?;
    let new = output::prompt_password("New password: ")?;
    let confirm = output::prompt_password("Confirm new password: ")?;
    services.session.change_password(&current, &new, &confirm).await?;
    output::success("Password changed.");
    Ok(())
}

pub async fn deactivate(services: &ServiceContainer, args: DeactivateArgs) -> anyhow::Result<()> {
    if !args.yes
        && !output::confirm("Deactivate this account? Your data becomes inaccessible.")?
    {
        output::info("Left the account untouched.");
        return Ok(());
    }
    services.session.deactivate_account().await?;
    output::success("Account deactivated and session cleared.");
    Ok(())
}

pub(crate) fn print_profile(user: &User) {
    output::field("email", &user.email);
    output::field("verified", user.is_email_verified);
    output::field("provider", &user.auth_provider);
    if !user.name.is_empty() {
        output::field("name", &user.name);
    }
    if let Some(age) = user.age {
        output::field("age", age);
    }
    if !user.gender.is_empty() {
        output::field("gender", &user.gender);
    }
    if let Some(height) = user.height_cm {
        output::field("height", format!("{height} cm"));
    }
    if !user.diet_type.is_empty() {
        output::field("diet", &user.diet_type);
    }
    if let Some(hours) = user.avg_sitting_hours {
        output::field("sitting hours", hours);
    }
    output::field("onboarded", user.is_onboarded);
}
