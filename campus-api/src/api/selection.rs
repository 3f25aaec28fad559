//! Dropdown lookups under `/api/selections`.

use rocket::serde::json::Json;
use rocket::Route;

use crate::api::{internal, ApiError};
use crate::auth::ApiUser;
use crate::orm::selection as orm;
use crate::orm::selection::{PermissionGroup, SelectionItem};
use crate::orm::DbConn;

#[get("/selections/academic-years?<search>")]
pub async fn academic_year_selections(
    db: DbConn,
    _user: ApiUser,
    search: Option<String>,
) -> Result<Json<Vec<SelectionItem>>, ApiError> {
    db.run(move |conn| orm::academic_year_options(conn, search.as_deref().unwrap_or("")))
        .await
        .map(Json)
        .map_err(internal)
}

#[get("/selections/semesters?<search>")]
pub async fn semester_selections(
    db: DbConn,
    _user: ApiUser,
    search: Option<String>,
) -> Result<Json<Vec<SelectionItem>>, ApiError> {
    db.run(move |conn| orm::semester_options(conn, search.as_deref().unwrap_or("")))
        .await
        .map(Json)
        .map_err(internal)
}

#[get("/selections/students?<search>")]
pub async fn student_selections(
    db: DbConn,
    _user: ApiUser,
    search: Option<String>,
) -> Result<Json<Vec<SelectionItem>>, ApiError> {
    db.run(move |conn| orm::student_options(conn, search.as_deref().unwrap_or("")))
        .await
        .map(Json)
        .map_err(internal)
}

#[get("/selections/lecturers?<search>")]
pub async fn lecturer_selections(
    db: DbConn,
    _user: ApiUser,
    search: Option<String>,
) -> Result<Json<Vec<SelectionItem>>, ApiError> {
    db.run(move |conn| orm::lecturer_options(conn, search.as_deref().unwrap_or("")))
        .await
        .map(Json)
        .map_err(internal)
}

#[get("/selections/departments?<search>")]
pub async fn department_selections(
    db: DbConn,
    _user: ApiUser,
    search: Option<String>,
) -> Result<Json<Vec<SelectionItem>>, ApiError> {
    db.run(move |conn| orm::department_options(conn, search.as_deref().unwrap_or("")))
        .await
        .map(Json)
        .map_err(internal)
}

#[get("/selections/partners?<search>")]
pub async fn partner_selections(
    db: DbConn,
    _user: ApiUser,
    search: Option<String>,
) -> Result<Json<Vec<SelectionItem>>, ApiError> {
    db.run(move |conn| orm::partner_options(conn, search.as_deref().unwrap_or("")))
        .await
        .map(Json)
        .map_err(internal)
}

#[get("/selections/menus?<search>")]
pub async fn menu_selections(
    db: DbConn,
    _user: ApiUser,
    search: Option<String>,
) -> Result<Json<Vec<SelectionItem>>, ApiError> {
    db.run(move |conn| orm::menu_options(conn, search.as_deref().unwrap_or("")))
        .await
        .map(Json)
        .map_err(internal)
}

#[get("/selections/roles?<search>")]
pub async fn role_selections(
    db: DbConn,
    _user: ApiUser,
    search: Option<String>,
) -> Result<Json<Vec<SelectionItem>>, ApiError> {
    db.run(move |conn| orm::role_options(conn, search.as_deref().unwrap_or("")))
        .await
        .map(Json)
        .map_err(internal)
}

#[get("/selections/permissions?<search>")]
pub async fn permission_selections(
    db: DbConn,
    _user: ApiUser,
    search: Option<String>,
) -> Result<Json<Vec<PermissionGroup>>, ApiError> {
    db.run(move |conn| orm::permission_options(conn, search.as_deref().unwrap_or("")))
        .await
        .map(Json)
        .map_err(internal)
}

pub fn routes() -> Vec<Route> {
    routes![
        academic_year_selections,
        semester_selections,
        student_selections,
        lecturer_selections,
        department_selections,
        partner_selections,
        menu_selections,
        role_selections,
        permission_selections,
    ]
}
