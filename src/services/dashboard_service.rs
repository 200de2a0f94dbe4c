use crate::api::ApiClient;
use crate::domain::dashboard::{
    Alert, DashboardOverview, DashboardSummary, MonthlyMetrics, Streaks, TrendPoint,
};
use crate::error::Result;

/// Read-only aggregates computed server-side from logs and targets.
#[derive(Clone, Debug)]
pub struct DashboardService {
    client: ApiClient,
}

impl DashboardService {
    #[must_use]
    pub fn new(client: &ApiClient) -> Self {
        Self { client: client.clone() }
    }

    pub async fn summary(&self) -> Result<DashboardSummary> {
        self.client.get("/dashboard/summary/").await
    }

    /// Weight points for the trailing window. The server only honors 7, 14
    /// and 30 day windows and falls back to 7 for anything else.
    pub async fn trends(&self, days: u16) -> Result<Vec<TrendPoint>> {
        let query = [("days", days.to_string())];
        self.client.get_with_query("/dashboard/trends/", &query).await
    }

    pub async fn streaks(&self) -> Result<Streaks> {
        self.client.get("/dashboard/streaks/").await
    }

    pub async fn alerts(&self) -> Result<Vec<Alert>> {
        self.client.get("/dashboard/alerts/").await
    }

    /// Month-by-month rollup for the current year.
    pub async fn monthly(&self) -> Result<Vec<MonthlyMetrics>> {
        self.client.get("/dashboard/monthly/").await
    }

    /// Everything the dashboard screen shows, fetched concurrently. Fails
    /// as a whole if any leg fails.
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn overview(&self, trend_days: u16) -> Result<DashboardOverview> {
        let (summary, trends, streaks, alerts) = futures::try_join!(
            self.summary(),
            self.trends(trend_days),
            self.streaks(),
            self.alerts(),
        )?;
        Ok(DashboardOverview { summary, trends, streaks, alerts })
    }
}
