//! # Survey Update
//!
//! Backend logic for `PUT /api/surveys/{survey_id}`: replaces a survey's scalar
//! fields and reconciles its question tree against the submitted document.
//!
//! ## Workflow
//!
//! 1.  **Validation**: the document is checked before anything is read
//!     (`validate::validate_survey`); all problems are reported together.
//! 2.  **Lookup**: the survey and the editor (by email) must both exist.
//! 3.  **Authorization**: only the survey's owner may edit it. There is no
//!     administrator override at this layer.
//! 4.  **Scalar update**: title, description, status and dates are overwritten.
//! 5.  **Reconciliation**: `reconcile::questions` aligns the question list, which
//!     in turn aligns each question's options.
//! 6.  **Result**: the fully materialized survey is read back and returned.
//!
//! Steps 2 to 6 run in one transaction. Any failure drops it uncommitted, so a
//! caller never observes a partially applied update. Concurrent editors are not
//! coordinated: the last commit wins.

use crate::error::ServiceError;
use crate::services::auth::identity::editor_email;
use crate::services::surveys::get::load_survey;
use crate::services::surveys::reconcile::questions::reconcile_questions;
use crate::services::surveys::validate::{parse_status, validate_survey};
use crate::storage::surveys::SurveyFields;
use crate::storage::{questions, surveys, users, Storage};
use crate::token_controller::blacklist::TokenBlacklist;
use actix_web::{web, HttpRequest, HttpResponse, Responder, ResponseError};
use common::model::survey::Survey;
use common::requests::SurveyDocument;
use log::{debug, info};
use rusqlite::Connection;

/// Actix handler for `PUT /api/surveys/{survey_id}`.
///
/// # Returns
/// - `200 OK` with the updated `Survey`.
/// - `400` for an invalid document, `403` when the caller is not the owner,
///   `404` when the survey, the editor or a referenced question does not exist.
pub async fn process(
    req: HttpRequest,
    survey_id: web::Path<i64>,
    payload: web::Json<SurveyDocument>,
    storage: web::Data<Storage>,
    blacklist: web::Data<TokenBlacklist>,
) -> impl Responder {
    let editor = match editor_email(&req, &blacklist).await {
        Ok(email) => email,
        Err(e) => return e.error_response(),
    };
    let survey_id = survey_id.into_inner();
    let document = payload.into_inner();
    match storage
        .run(move |conn| update_survey(conn, survey_id, &document, &editor))
        .await
    {
        Ok(survey) => HttpResponse::Ok().json(survey),
        Err(e) => e.error_response(),
    }
}

pub fn update_survey(
    conn: &mut Connection,
    survey_id: i64,
    document: &SurveyDocument,
    editor_email: &str,
) -> Result<Survey, ServiceError> {
    validate_survey(document)?;
    let status = parse_status(document.status.as_deref())?;

    let tx = conn.transaction()?;
    let record = surveys::find_by_id(&tx, survey_id)?
        .ok_or_else(|| ServiceError::not_found("survey", survey_id))?;
    let editor = users::find_by_email(&tx, editor_email)?
        .ok_or_else(|| ServiceError::not_found("user", editor_email))?;

    if record.created_by != editor.id {
        return Err(ServiceError::AccessDenied(format!(
            "{} is not the owner of survey {}",
            editor.email, survey_id
        )));
    }

    surveys::update_fields(
        &tx,
        survey_id,
        &SurveyFields {
            title: &document.title,
            description: document.description.as_deref(),
            status,
            start_date: document.start_date,
            end_date: document.end_date,
        },
    )?;

    let existing = questions::find_by_survey_ordered(&tx, survey_id)?;
    debug!(
        "Survey {}: existing questions {:?}",
        survey_id,
        existing.iter().map(|q| q.id).collect::<Vec<_>>()
    );
    reconcile_questions(&tx, survey_id, existing, &document.questions)?;

    let survey = load_survey(&tx, survey_id)?;
    tx.commit()?;
    info!("Survey {} updated by {}", survey_id, editor.email);
    Ok(survey)
}
