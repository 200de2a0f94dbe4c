use crate::api::ApiClient;
use crate::domain::user::{ProfilePatch, Settings, TargetDraft, TargetPatch, UserTarget};
use crate::error::Result;
use serde::Serialize;

use super::absent_as_none;

/// Profile and target settings as one combined document, plus direct access
/// to the targets resource.
#[derive(Clone, Debug)]
pub struct SettingsService {
    client: ApiClient,
}

#[derive(Serialize)]
struct SettingsUpdateBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    profile: Option<&'a ProfilePatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    targets: Option<&'a TargetPatch>,
}

impl SettingsService {
    #[must_use]
    pub fn new(client: &ApiClient) -> Self {
        Self { client: client.clone() }
    }

    pub async fn fetch(&self) -> Result<Settings> {
        self.client.get("/settings/").await
    }

    /// Partial update of either section or both. Omitted sections are left
    /// untouched server-side.
    #[tracing::instrument(skip(self, profile, targets), err(level = "warn"))]
    pub async fn update(
        &self,
        profile: Option<&ProfilePatch>,
        targets: Option<&TargetPatch>,
    ) -> Result<Settings> {
        if let Some(patch) = profile {
            patch.validate()?;
        }
        if let Some(patch) = targets {
            patch.validate()?;
        }
        let body = SettingsUpdateBody { profile, targets };
        self.client.put("/settings/", &body).await
    }

    /// The account's targets, or `None` before onboarding has set any.
    pub async fn targets(&self) -> Result<Option<UserTarget>> {
        absent_as_none(self.client.get("/targets/").await)
    }

    #[tracing::instrument(skip(self, draft), err(level = "warn"))]
    pub async fn set_targets(&self, draft: &TargetDraft) -> Result<UserTarget> {
        draft.validate()?;
        self.client.put("/targets/", draft).await
    }
}
