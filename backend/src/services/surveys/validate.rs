//! Structural validation of submitted survey documents.
//!
//! Validation is strict and all-or-nothing: every problem found is reported in
//! one `ServiceError::ValidationFailed`, and nothing is written.

use crate::error::ServiceError;
use common::model::question::QuestionType;
use common::model::survey::SurveyStatus;
use common::requests::SurveyDocument;

pub fn validate_survey(document: &SurveyDocument) -> Result<(), ServiceError> {
    let mut errors = Vec::new();

    if document.title.trim().is_empty() {
        errors.push("title must not be blank".to_string());
    }

    if let (Some(start), Some(end)) = (document.start_date, document.end_date) {
        if end < start {
            errors.push(format!("end date {} is before start date {}", end, start));
        }
    }

    if document.questions.is_empty() {
        errors.push("a survey must contain at least one question".to_string());
    }

    for (index, question) in document.questions.iter().enumerate() {
        if question.question_type.trim().is_empty() {
            errors.push(format!("question {}: type must not be blank", index + 1));
        }
        if question.text.trim().is_empty() {
            errors.push(format!("question {}: text must not be blank", index + 1));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::ValidationFailed(errors))
    }
}

pub fn parse_question_type(raw: &str) -> Result<QuestionType, ServiceError> {
    raw.parse().map_err(ServiceError::invalid)
}

/// An absent status means `Draft`; a present one must parse.
pub fn parse_status(raw: Option<&str>) -> Result<SurveyStatus, ServiceError> {
    match raw {
        None => Ok(SurveyStatus::Draft),
        Some(raw) => raw.parse().map_err(ServiceError::invalid),
    }
}
