use crate::error::ValidationErrors;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::wire;

/// One tracked day, keyed by calendar date. `protein_hit` and `calories_ok`
/// are computed server-side from the account's targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    pub id: Uuid,
    #[serde(with = "wire::date")]
    pub date: Date,
    #[serde(with = "wire::decimal")]
    pub weight: f64,
    pub calories: u32,
    pub protein: u32,
    pub carbs: Option<u32>,
    pub fats: Option<u32>,
    pub steps: u32,
    #[serde(with = "wire::decimal")]
    pub water: f64,
    #[serde(with = "wire::decimal")]
    pub sleep: f64,
    pub workout: bool,
    pub cardio: bool,
    pub fruit: bool,
    pub protein_hit: bool,
    pub calories_ok: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl DailyLog {
    /// Draft carrying this log's writable fields, for edit-and-resubmit flows.
    #[must_use]
    pub fn to_draft(&self) -> DailyLogDraft {
        DailyLogDraft {
            weight: self.weight,
            calories: self.calories,
            protein: self.protein,
            steps: self.steps,
            water: self.water,
            sleep: self.sleep,
            workout: self.workout,
            cardio: self.cardio,
            carbs: self.carbs,
            fats: self.fats,
            fruit: self.fruit,
        }
    }
}

/// Writable fields of a daily log. Counts are unsigned so the "must be 0 or
/// more" rules hold by construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DailyLogDraft {
    pub weight: f64,
    pub calories: u32,
    pub protein: u32,
    pub steps: u32,
    pub water: f64,
    pub sleep: f64,
    pub workout: bool,
    pub cardio: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbs: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fats: Option<u32>,
    pub fruit: bool,
}

impl DailyLogDraft {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if !(self.weight.is_finite() && self.weight >= 0.1) {
            errors.push("weight", "Weight is required");
        }
        if !(self.water.is_finite() && self.water >= 0.0) {
            errors.push("water", "Water must be 0 or more");
        }
        if !self.sleep.is_finite() || self.sleep < 0.0 {
            errors.push("sleep", "Sleep must be 0 or more");
        } else if self.sleep > 24.0 {
            errors.push("sleep", "Sleep cannot exceed 24 hours");
        }
        errors.into_result()
    }
}
