use crate::error::ValidationErrors;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;
use uuid::Uuid;

use super::wire;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => f.write_str("Male"),
            Self::Female => f.write_str("Female"),
            Self::Other => f.write_str("Other"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum DietType {
    Vegetarian,
    #[serde(rename = "Non-Vegetarian")]
    NonVegetarian,
}

impl fmt::Display for DietType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vegetarian => f.write_str("Vegetarian"),
            Self::NonVegetarian => f.write_str("Non-Vegetarian"),
        }
    }
}

/// The account profile as returned by `/users/me/` and the settings facade.
///
/// `gender` and `diet_type` stay free-form strings here: accounts that have
/// not finished onboarding carry empty values the server never normalises.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub age: Option<u32>,
    pub gender: String,
    #[serde(with = "wire::opt_decimal", default)]
    pub height_cm: Option<f64>,
    pub diet_type: String,
    #[serde(with = "wire::opt_decimal", default)]
    pub avg_sitting_hours: Option<f64>,
    pub auth_provider: String,
    pub is_email_verified: bool,
    pub is_onboarded: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Calorie, protein and goal-weight targets for an onboarded account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserTarget {
    pub id: Uuid,
    pub calorie_target: u32,
    pub protein_target: u32,
    #[serde(with = "wire::decimal")]
    pub goal_weight: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Aggregate returned by `GET /settings/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub profile: User,
    pub targets: Option<UserTarget>,
}

/// Partial profile update. Absent fields are left untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diet_type: Option<DietType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_sitting_hours: Option<f64>,
}

impl ProfilePatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.gender.is_none()
            && self.height_cm.is_none()
            && self.diet_type.is_none()
            && self.avg_sitting_hours.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.name {
            if name.is_empty() {
                errors.push("name", "Name is required");
            } else if name.chars().count() > 100 {
                errors.push("name", "Name must be at most 100 characters");
            }
        }
        if let Some(age) = self.age {
            if age < 1 {
                errors.push("age", "Age must be at least 1");
            } else if age > 120 {
                errors.push("age", "Age must be at most 120");
            }
        }
        if let Some(height) = self.height_cm {
            if !height.is_finite() || height <= 0.0 {
                errors.push("height_cm", "Height must be greater than 0");
            }
        }
        if let Some(hours) = self.avg_sitting_hours {
            if !hours.is_finite() || hours < 0.0 {
                errors.push("avg_sitting_hours", "Must be 0 or more");
            }
        }
        errors.into_result()
    }
}

/// Full replacement for the targets resource, used by `PUT /targets/` and as
/// the target section of onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetDraft {
    pub calorie_target: u32,
    pub protein_target: u32,
    pub goal_weight: f64,
}

impl TargetDraft {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.calorie_target < 1 {
            errors.push("calorie_target", "Calorie target must be at least 1");
        }
        if self.protein_target < 1 {
            errors.push("protein_target", "Protein target must be at least 1");
        }
        if !self.goal_weight.is_finite() || self.goal_weight <= 0.0 {
            errors.push("goal_weight", "Goal weight must be greater than 0");
        }
        errors.into_result()
    }
}

/// Partial targets update for the settings facade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TargetPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calorie_target: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein_target: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_weight: Option<f64>,
}

impl TargetPatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.calorie_target.is_none() && self.protein_target.is_none() && self.goal_weight.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.calorie_target == Some(0) {
            errors.push("calorie_target", "Calorie target must be at least 1");
        }
        if self.protein_target == Some(0) {
            errors.push("protein_target", "Protein target must be at least 1");
        }
        if let Some(goal) = self.goal_weight {
            if !goal.is_finite() || goal <= 0.0 {
                errors.push("goal_weight", "Goal weight must be greater than 0");
            }
        }
        errors.into_result()
    }
}
