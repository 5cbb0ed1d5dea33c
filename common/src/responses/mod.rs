use crate::model::survey::Survey;
use crate::requests::AnswerValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a response submission. `answers_count` counts only the rows
/// actually stored, which may be fewer than the answers submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponseResult {
    pub client_id: i64,
    pub survey_id: i64,
    pub survey_title: String,
    pub respondent_name: String,
    pub respondent_email: String,
    pub submission_id: String,
    pub answers_count: usize,
    pub submitted_at: DateTime<Utc>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyPage {
    pub content: Vec<Survey>,
    pub total_elements: u64,
    pub total_pages: u64,
    pub size: u32,
    pub number: u32,
}

/// One submission rendered back into the request-like shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedResponse {
    pub submission_id: String,
    pub client_id: i64,
    pub survey_id: i64,
    pub respondent: RespondentInfo,
    pub answers: Vec<FormattedAnswer>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RespondentInfo {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedAnswer {
    pub question_id: i64,
    pub answer: AnswerValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsesSummary {
    pub survey_id: i64,
    pub respondents_count: usize,
    pub total_answers_count: usize,
    pub respondent_ids: Vec<i64>,
}

/// A client with its contact attributes and every answer it ever gave.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientWithAnswers {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub age_group: Option<String>,
    pub profession: Option<String>,
    pub region: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub answers: Vec<ClientAnswerEntry>,
}

/// One answer rendered as text: the selected option's text when there is one,
/// else the text answer, else the numeric answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientAnswerEntry {
    pub id: i64,
    pub survey_id: i64,
    pub question_id: i64,
    pub question_text: String,
    pub submission_id: String,
    pub answer: Option<String>,
    pub answered_at: DateTime<Utc>,
}

/// Error payload returned for every failed request. `errors` carries the
/// itemized messages of a validation failure and is empty otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub status: u16,
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}
