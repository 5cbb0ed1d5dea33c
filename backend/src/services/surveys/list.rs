use crate::error::ServiceError;
use crate::services::auth::identity::editor_email;
use crate::services::surveys::get::materialize;
use crate::storage::{surveys, Storage};
use crate::token_controller::blacklist::TokenBlacklist;
use actix_web::{web, HttpRequest, HttpResponse, Responder, ResponseError};
use common::model::survey::SurveyStatus;
use common::responses::SurveyPage;
use log::warn;
use rusqlite::Connection;
use serde::Deserialize;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    #[serde(default)]
    pub page: u32,
    pub size: Option<u32>,
}

/// Actix handler for `GET /api/surveys`.
///
/// An unrecognized `status` filter is ignored rather than rejected.
pub async fn process(
    req: HttpRequest,
    query: web::Query<ListQuery>,
    storage: web::Data<Storage>,
    blacklist: web::Data<TokenBlacklist>,
) -> impl Responder {
    if let Err(e) = editor_email(&req, &blacklist).await {
        return e.error_response();
    }
    let query = query.into_inner();
    let status = query.status.as_deref().and_then(|raw| match raw.parse::<SurveyStatus>() {
        Ok(status) => Some(status),
        Err(_) => {
            warn!("Unknown survey status filter {:?}, listing all surveys", raw);
            None
        }
    });
    let size = query.size.unwrap_or(DEFAULT_PAGE_SIZE);
    let page = query.page;

    match storage
        .run(move |conn| list_surveys(conn, status, page, size))
        .await
    {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(e) => e.error_response(),
    }
}

/// One page of surveys, newest first. `size` is clamped to 1..=100.
pub fn list_surveys(
    conn: &Connection,
    status: Option<SurveyStatus>,
    page: u32,
    size: u32,
) -> Result<SurveyPage, ServiceError> {
    let size = size.clamp(1, MAX_PAGE_SIZE);
    let total_elements = surveys::count(conn, status)?;
    let records = surveys::find_page(conn, status, size, page as u64 * size as u64)?;
    let content = records
        .into_iter()
        .map(|record| materialize(conn, record))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SurveyPage {
        content,
        total_elements,
        total_pages: total_elements.div_ceil(size as u64),
        size,
        number: page,
    })
}
