//! HTTP endpoints. Every route lives under `/api` and takes the
//! [`ApiUser`](crate::auth::ApiUser) guard.
//!
//! Error contract: input problems (blank fields, bad dates, missing foreign
//! keys, empty bulk bodies) are 400, absent or soft-deleted ids are 404,
//! state conflicts (duplicates, already-deleted rows, roles still in use)
//! are 409. Database failures become a generic 500; the detail goes to the
//! server log only.

use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::Route;
use serde::Serialize;
use ts_rs::TS;

pub mod academic_year;
pub mod department;
pub mod internship;
pub mod lecturer;
pub mod menu;
pub mod partner;
pub mod permission;
pub mod role;
pub mod selection;
pub mod semester;
pub mod student;
pub mod thesis;
pub mod user;

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = Custom<Json<ErrorResponse>>;

fn custom(status: Status, message: impl Into<String>) -> ApiError {
    Custom(
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

pub fn bad_request(message: impl Into<String>) -> ApiError {
    custom(Status::BadRequest, message)
}

pub fn not_found(message: impl Into<String>) -> ApiError {
    custom(Status::NotFound, message)
}

pub fn conflict(message: impl Into<String>) -> ApiError {
    custom(Status::Conflict, message)
}

/// Logs the underlying error and returns an opaque 500.
pub fn internal(err: diesel::result::Error) -> ApiError {
    error!("database error: {}", err);
    custom(Status::InternalServerError, "Internal server error")
}

/// 400 when a required text field is blank.
pub fn require_text(value: &str, field: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        Err(bad_request(format!("{} is required", field)))
    } else {
        Ok(())
    }
}

pub fn routes() -> Vec<Route> {
    let mut all = Vec::new();
    all.extend(academic_year::routes());
    all.extend(semester::routes());
    all.extend(department::routes());
    all.extend(student::routes());
    all.extend(lecturer::routes());
    all.extend(partner::routes());
    all.extend(internship::routes());
    all.extend(thesis::routes());
    all.extend(user::routes());
    all.extend(role::routes());
    all.extend(permission::routes());
    all.extend(menu::routes());
    all.extend(selection::routes());
    all
}
