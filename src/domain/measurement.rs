use crate::error::ValidationErrors;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::wire;

/// A body measurement snapshot. Immutable once recorded, so there is no
/// `updated_at` and no update draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyMeasurement {
    pub id: Uuid,
    #[serde(with = "wire::date")]
    pub date: Date,
    #[serde(with = "wire::opt_decimal", default)]
    pub neck: Option<f64>,
    #[serde(with = "wire::opt_decimal", default)]
    pub chest: Option<f64>,
    #[serde(with = "wire::opt_decimal", default)]
    pub shoulders: Option<f64>,
    #[serde(with = "wire::opt_decimal", default)]
    pub bicep: Option<f64>,
    #[serde(with = "wire::opt_decimal", default)]
    pub forearm: Option<f64>,
    #[serde(with = "wire::opt_decimal", default)]
    pub waist: Option<f64>,
    #[serde(with = "wire::opt_decimal", default)]
    pub hips: Option<f64>,
    #[serde(with = "wire::opt_decimal", default)]
    pub thigh: Option<f64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// New measurement payload. Every site is optional; only filled-in sites are
/// sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementDraft {
    #[serde(with = "wire::date")]
    pub date: Date,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neck: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chest: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shoulders: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bicep: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forearm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waist: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hips: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thigh: Option<f64>,
}

impl MeasurementDraft {
    #[must_use]
    pub const fn new(date: Date) -> Self {
        Self {
            date,
            neck: None,
            chest: None,
            shoulders: None,
            bicep: None,
            forearm: None,
            waist: None,
            hips: None,
            thigh: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.date > super::today_utc() {
            errors.push("date", "Future dates are not allowed.");
        }
        let sites = [
            ("neck", self.neck),
            ("chest", self.chest),
            ("shoulders", self.shoulders),
            ("bicep", self.bicep),
            ("forearm", self.forearm),
            ("waist", self.waist),
            ("hips", self.hips),
            ("thigh", self.thigh),
        ];
        if sites.iter().all(|(_, value)| value.is_none()) {
            errors.push("measurements", "At least one measurement is required");
        }
        for (field, value) in sites {
            if let Some(value) = value {
                if !value.is_finite() || value <= 0.0 {
                    errors.push(field, "Must be greater than 0");
                }
            }
        }
        errors.into_result()
    }
}
