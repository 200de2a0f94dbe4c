use crate::api::{ApiClient, Page};
use crate::domain::measurement::{BodyMeasurement, MeasurementDraft};
use crate::error::Result;
use uuid::Uuid;

use super::absent_as_none;

const LIST_PAGE_SIZE: u32 = 100;

/// Body measurement history. Measurements are append-only; the server offers
/// no update or delete, only new snapshots.
#[derive(Clone, Debug)]
pub struct MeasurementService {
    client: ApiClient,
}

impl MeasurementService {
    #[must_use]
    pub fn new(client: &ApiClient) -> Self {
        Self { client: client.clone() }
    }

    /// The full history, newest first.
    pub async fn list(&self) -> Result<Vec<BodyMeasurement>> {
        let query = [("page_size", LIST_PAGE_SIZE.to_string())];
        let page: Page<BodyMeasurement> =
            self.client.get_with_query("/measurements/", &query).await?;
        Ok(page.results)
    }

    /// The most recent snapshot, or `None` for an account that has never
    /// measured.
    pub async fn latest(&self) -> Result<Option<BodyMeasurement>> {
        absent_as_none(self.client.get("/measurements/latest/").await)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<BodyMeasurement>> {
        absent_as_none(self.client.get(&format!("/measurements/{id}/")).await)
    }

    /// Records a snapshot. The server may attach an advisory warning when
    /// the previous measurement is more than its recommended interval ago;
    /// it is passed through verbatim for the caller to show.
    #[tracing::instrument(skip(self, draft), err(level = "warn"))]
    pub async fn create(
        &self,
        draft: &MeasurementDraft,
    ) -> Result<(BodyMeasurement, Option<String>)> {
        draft.validate()?;
        let payload = self.client.post_payload("/measurements/", draft).await?;
        Ok((payload.data, payload.warning))
    }
}
