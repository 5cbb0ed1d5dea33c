use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A respondent, identified by email.
///
/// Response ingestion only ever sets `name` and `email`. The contact and
/// demographic attributes are not written by this service; the clients report
/// returns whatever the table holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
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
}

/// One stored answer of one submission. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientAnswer {
    pub id: i64,
    pub client_id: i64,
    pub survey_id: i64,
    pub question_id: i64,
    pub answer_option_id: Option<i64>,
    /// Groups the rows written by a single ingestion call.
    pub submission_id: String,
    pub text_answer: Option<String>,
    pub numeric_answer: Option<i32>,
    /// Every selection of a multiple-choice answer, in submission order.
    pub selections: Vec<String>,
    pub created_at: DateTime<Utc>,
}
