pub mod dashboard_service;
pub mod log_service;
pub mod measurement_service;
pub mod onboarding_service;
pub mod session_service;
pub mod settings_service;

pub use dashboard_service::DashboardService;
pub use log_service::LogService;
pub use measurement_service::MeasurementService;
pub use onboarding_service::OnboardingService;
pub use session_service::SessionService;
pub use settings_service::SettingsService;

use crate::api::ApiClient;
use crate::error::Result;

/// Collapses a not-found response into `None`, leaving every other error
/// intact. Several endpoints use 404 to mean "nothing recorded yet".
pub(crate) fn absent_as_none<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(error) if error.is_not_found() => Ok(None),
        Err(error) => Err(error),
    }
}

/// All feature services wired over one shared client.
#[derive(Clone, Debug)]
pub struct ServiceContainer {
    pub session: SessionService,
    pub logs: LogService,
    pub measurements: MeasurementService,
    pub dashboard: DashboardService,
    pub onboarding: OnboardingService,
    pub settings: SettingsService,
}

impl ServiceContainer {
    #[must_use]
    pub fn new(client: &ApiClient) -> Self {
        Self {
            session: SessionService::new(client),
            logs: LogService::new(client),
            measurements: MeasurementService::new(client),
            dashboard: DashboardService::new(client),
            onboarding: OnboardingService::new(client),
            settings: SettingsService::new(client),
        }
    }
}
