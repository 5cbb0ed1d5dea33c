//! Data types shared between the survey backend and its clients.
//!
//! - `model`: the persisted survey tree (surveys, questions, answer options),
//!   respondents and their answers.
//! - `requests`: payloads accepted by the HTTP API.
//! - `responses`: payloads returned by the HTTP API, including the error body.

pub mod model;
pub mod requests;
pub mod responses;
