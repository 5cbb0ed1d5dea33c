use crate::error::ServiceError;
use crate::services::auth::identity::editor_email;
use crate::services::surveys::get::load_survey;
use crate::services::surveys::reconcile::questions::reconcile_questions;
use crate::services::surveys::validate::{parse_status, validate_survey};
use crate::storage::surveys::SurveyFields;
use crate::storage::{surveys, users, Storage};
use crate::token_controller::blacklist::TokenBlacklist;
use actix_web::{web, HttpRequest, HttpResponse, Responder, ResponseError};
use common::model::survey::Survey;
use common::requests::SurveyDocument;
use log::info;
use rusqlite::Connection;

/// Actix handler for `POST /api/surveys`. The owner is the caller named by
/// the `X-User-Email` header.
pub async fn process(
    req: HttpRequest,
    payload: web::Json<SurveyDocument>,
    storage: web::Data<Storage>,
    blacklist: web::Data<TokenBlacklist>,
) -> impl Responder {
    let owner = match editor_email(&req, &blacklist).await {
        Ok(email) => email,
        Err(e) => return e.error_response(),
    };
    let document = payload.into_inner();
    match storage
        .run(move |conn| create_survey(conn, &document, &owner))
        .await
    {
        Ok(survey) => HttpResponse::Created().json(survey),
        Err(e) => e.error_response(),
    }
}

/// Creates a survey owned by `owner_email` with its questions numbered 1..N
/// and their options numbered 1..M, all in one transaction.
pub fn create_survey(
    conn: &mut Connection,
    document: &SurveyDocument,
    owner_email: &str,
) -> Result<Survey, ServiceError> {
    validate_survey(document)?;
    let status = parse_status(document.status.as_deref())?;

    let tx = conn.transaction()?;
    let owner = users::find_by_email(&tx, owner_email)?
        .ok_or_else(|| ServiceError::not_found("user", owner_email))?;

    let fields = SurveyFields {
        title: &document.title,
        description: document.description.as_deref(),
        status,
        start_date: document.start_date,
        end_date: document.end_date,
    };
    let survey_id = surveys::insert(&tx, &fields, owner.id)?;
    // Documents for a new survey may carry ids copied from another survey;
    // they are ignored here, every question is new.
    let questions: Vec<_> = document
        .questions
        .iter()
        .cloned()
        .map(|mut q| {
            q.id = None;
            q
        })
        .collect();
    reconcile_questions(&tx, survey_id, Vec::new(), &questions)?;

    let survey = load_survey(&tx, survey_id)?;
    tx.commit()?;
    info!(
        "Survey {} created by {} with {} questions",
        survey.id,
        owner.email,
        survey.questions.len()
    );
    Ok(survey)
}
