use crate::api::ApiClient;
use crate::domain::onboarding::{
    OnboardingProfile, OnboardingResult, OnboardingStatus, OnboardingTargets,
};
use crate::error::Result;

/// Two-step first-run flow: profile first, then targets. The server flips
/// `is_onboarded` once both steps are in and rejects repeat submissions.
#[derive(Clone, Debug)]
pub struct OnboardingService {
    client: ApiClient,
}

impl OnboardingService {
    #[must_use]
    pub fn new(client: &ApiClient) -> Self {
        Self { client: client.clone() }
    }

    #[tracing::instrument(skip(self, profile), err(level = "warn"))]
    pub async fn submit_profile(&self, profile: &OnboardingProfile) -> Result<()> {
        profile.validate()?;
        self.client.post("/onboarding/profile/", profile).await
    }

    /// Stores targets plus the starting weight and returns the computed BMI.
    #[tracing::instrument(skip(self, targets), err(level = "warn"))]
    pub async fn submit_targets(&self, targets: &OnboardingTargets) -> Result<OnboardingResult> {
        targets.validate()?;
        self.client.post("/onboarding/targets/", targets).await
    }

    pub async fn status(&self) -> Result<OnboardingStatus> {
        self.client.get("/onboarding/status/").await
    }
}
