use crate::error::ValidationErrors;
use serde::{Deserialize, Serialize};

use super::user::{DietType, Gender, TargetDraft};

/// First onboarding step: who the user is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OnboardingProfile {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub height_cm: f64,
    pub avg_sitting_hours: f64,
    pub diet_type: DietType,
}

impl OnboardingProfile {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.name.is_empty() {
            errors.push("name", "Name is required");
        } else if self.name.chars().count() > 100 {
            errors.push("name", "Name must be at most 100 characters");
        }
        if self.age < 1 {
            errors.push("age", "Age must be at least 1");
        } else if self.age > 120 {
            errors.push("age", "Age must be at most 120");
        }
        if !self.height_cm.is_finite() || self.height_cm <= 0.0 {
            errors.push("height_cm", "Height must be greater than 0");
        }
        if !self.avg_sitting_hours.is_finite() || self.avg_sitting_hours < 0.0 {
            errors.push("avg_sitting_hours", "Must be 0 or more");
        }
        errors.into_result()
    }
}

/// Second onboarding step: targets plus the starting weight that seeds the
/// first daily log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OnboardingTargets {
    #[serde(flatten)]
    pub targets: TargetDraft,
    pub weight: f64,
}

impl OnboardingTargets {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = self.targets.validate().err().unwrap_or_default();
        if !self.weight.is_finite() || self.weight <= 0.0 {
            errors.push("weight", "Weight must be greater than 0");
        }
        errors.into_result()
    }
}

/// Completion state reported by `GET /onboarding/status/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingStatus {
    pub is_onboarded: bool,
    pub has_profile: bool,
    pub has_targets: bool,
}

/// Returned when onboarding completes: starting BMI computed from the given
/// weight and the profile height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardingResult {
    pub bmi: f64,
    pub bmi_category: String,
}
