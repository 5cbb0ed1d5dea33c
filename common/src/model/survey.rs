use crate::model::question::Question;
use crate::model::user::User;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SurveyStatus {
    Draft,
    Active,
    Completed,
}

impl SurveyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SurveyStatus::Draft => "DRAFT",
            SurveyStatus::Active => "ACTIVE",
            SurveyStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for SurveyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive, accepts the Russian labels used by the legacy frontend.
impl FromStr for SurveyStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_uppercase().as_str() {
            "DRAFT" | "ЧЕРНОВИК" => Ok(SurveyStatus::Draft),
            "ACTIVE" | "АКТИВНЫЙ" | "АКТИВЕН" => Ok(SurveyStatus::Active),
            "COMPLETED" | "ЗАВЕРШЕННЫЙ" | "ЗАВЕРШЕН" => Ok(SurveyStatus::Completed),
            _ => Err(format!("unknown survey status: {}", value)),
        }
    }
}

/// A fully materialized survey: scalar fields, its owner and the ordered
/// question tree (each question carrying its ordered answer options).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: SurveyStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub owner: User,
    pub questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
