use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A survey definition as submitted for creation or update.
///
/// Text fields default to empty so that a missing field is reported by
/// validation with a readable message instead of a deserialization error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyDocument {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub questions: Vec<QuestionDocument>,
}

/// A question as submitted. A present `id` asks to update that existing
/// question in place; an absent one creates a new question.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDocument {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub text: String,
    #[serde(default, rename = "type")]
    pub question_type: String,
    #[serde(default)]
    pub required: bool,
    /// Option texts in display order. Options carry no id; they are matched
    /// to existing rows by position.
    #[serde(default)]
    pub options: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

/// One respondent's answer set for a survey.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponseRequest {
    pub survey_id: i64,
    pub respondent: Respondent,
    #[serde(default)]
    pub answers: Vec<SubmittedAnswer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Respondent {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub consent: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    pub question_id: i64,
    #[serde(default)]
    pub answer: Option<AnswerValue>,
}

/// The raw value of an answer: a number, a single string or a list of strings.
///
/// Any other JSON shape (a boolean, an object, a list holding non-strings) is
/// kept as `Other` so one odd answer never fails the whole request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Number(serde_json::Number),
    Text(String),
    List(Vec<String>),
    Other(serde_json::Value),
}

fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl AnswerValue {
    /// The value as one string: a list yields its first element.
    pub fn as_single_text(&self) -> Option<String> {
        match self {
            AnswerValue::Number(n) => Some(n.to_string()),
            AnswerValue::Text(s) => Some(s.clone()),
            AnswerValue::List(items) => items.first().cloned(),
            AnswerValue::Other(serde_json::Value::Array(items)) => items.first().map(value_text),
            AnswerValue::Other(serde_json::Value::Null) => None,
            AnswerValue::Other(value) => Some(value_text(value)),
        }
    }

    /// The value as a list of strings: a scalar becomes a one-element list.
    pub fn as_list(&self) -> Vec<String> {
        match self {
            AnswerValue::Number(n) => vec![n.to_string()],
            AnswerValue::Text(s) => vec![s.clone()],
            AnswerValue::List(items) => items.clone(),
            AnswerValue::Other(serde_json::Value::Array(items)) => {
                items.iter().map(value_text).collect()
            }
            AnswerValue::Other(serde_json::Value::Null) => Vec::new(),
            AnswerValue::Other(value) => vec![value_text(value)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn answer(value: serde_json::Value) -> SubmittedAnswer {
        serde_json::from_value(json!({ "questionId": 1, "answer": value })).unwrap()
    }

    #[test]
    fn off_type_answers_still_deserialize() {
        let flag = answer(json!(true)).answer.unwrap();
        assert_eq!(flag.as_single_text().as_deref(), Some("true"));

        let numbers = answer(json!([1, "two"])).answer.unwrap();
        assert_eq!(numbers.as_list(), vec!["1", "two"]);

        let object = answer(json!({ "x": 1 })).answer.unwrap();
        assert_eq!(object.as_single_text().as_deref(), Some(r#"{"x":1}"#));
    }

    #[test]
    fn regular_shapes_keep_their_variant() {
        assert!(matches!(answer(json!("a")).answer, Some(AnswerValue::Text(_))));
        assert!(matches!(answer(json!(["a", "b"])).answer, Some(AnswerValue::List(_))));
        assert!(matches!(answer(json!(4)).answer, Some(AnswerValue::Number(_))));
        assert!(answer(json!(null)).answer.is_none());
    }
}
