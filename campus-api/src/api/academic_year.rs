use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::{json, Json, Value};
use rocket::Route;

use crate::api::{bad_request, conflict, internal, not_found, require_text, ApiError};
use crate::auth::ApiUser;
use crate::models::{AcademicYear, AcademicYearInput};
use crate::orm::academic_year as orm;
use crate::orm::pagination::{ListParams, Page};
use crate::orm::soft_delete::{RestoreOutcome, SoftDeleteOutcome};
use crate::orm::DbConn;

fn validate(input: &AcademicYearInput) -> Result<(), ApiError> {
    require_text(&input.name, "Name")?;
    if input.start_date >= input.end_date {
        return Err(bad_request("start_date must be before end_date"));
    }
    Ok(())
}

#[get("/academic-years?<page>&<limit>&<search>")]
pub async fn list_academic_years(
    db: DbConn,
    _user: ApiUser,
    page: Option<i64>,
    limit: Option<i64>,
    search: Option<String>,
) -> Result<Json<Page<AcademicYear>>, ApiError> {
    let params = ListParams::new(page, limit, search);
    db.run(move |conn| orm::list_academic_years(conn, &params))
        .await
        .map(Json)
        .map_err(internal)
}

#[get("/academic-years/deleted?<page>&<limit>&<search>")]
pub async fn list_deleted_academic_years(
    db: DbConn,
    _user: ApiUser,
    page: Option<i64>,
    limit: Option<i64>,
    search: Option<String>,
) -> Result<Json<Page<AcademicYear>>, ApiError> {
    let params = ListParams::new(page, limit, search);
    db.run(move |conn| orm::list_deleted_academic_years(conn, &params))
        .await
        .map(Json)
        .map_err(internal)
}

#[get("/academic-years/<id>")]
pub async fn get_academic_year(
    db: DbConn,
    _user: ApiUser,
    id: i32,
) -> Result<Json<AcademicYear>, ApiError> {
    db.run(move |conn| orm::get_academic_year_by_id(conn, id))
        .await
        .map_err(internal)?
        .map(Json)
        .ok_or_else(|| not_found(format!("Academic year with id {} not found", id)))
}

#[post("/academic-years", data = "<input>")]
pub async fn create_academic_year(
    db: DbConn,
    _user: ApiUser,
    input: Json<AcademicYearInput>,
) -> Result<status::Created<Json<AcademicYear>>, ApiError> {
    let input = input.into_inner();
    validate(&input)?;
    let year = db
        .run(move |conn| {
            if orm::academic_year_name_exists(conn, &input.name, None).map_err(internal)? {
                return Err(conflict(format!(
                    "Academic year '{}' already exists",
                    input.name
                )));
            }
            orm::insert_academic_year(conn, &input).map_err(internal)
        })
        .await?;
    let location = format!("/api/academic-years/{}", year.id);
    Ok(status::Created::new(location).body(Json(year)))
}

#[put("/academic-years/<id>", data = "<input>")]
pub async fn update_academic_year(
    db: DbConn,
    _user: ApiUser,
    id: i32,
    input: Json<AcademicYearInput>,
) -> Result<Json<AcademicYear>, ApiError> {
    let input = input.into_inner();
    validate(&input)?;
    db.run(move |conn| {
        if orm::get_academic_year_by_id(conn, id).map_err(internal)?.is_none() {
            return Err(not_found(format!("Academic year with id {} not found", id)));
        }
        if orm::academic_year_name_exists(conn, &input.name, Some(id)).map_err(internal)? {
            return Err(conflict(format!(
                "Academic year '{}' already exists",
                input.name
            )));
        }
        orm::update_academic_year(conn, id, &input)
            .map(Json)
            .map_err(internal)
    })
    .await
}

#[post("/academic-years/soft-delete/<id>")]
pub async fn soft_delete_academic_year(
    db: DbConn,
    _user: ApiUser,
    id: i32,
) -> Result<Status, ApiError> {
    db.run(move |conn| match orm::soft_delete(conn, id).map_err(internal)? {
        SoftDeleteOutcome::Deleted => Ok(Status::NoContent),
        SoftDeleteOutcome::AlreadyDeleted => Err(conflict(format!(
            "Academic year with id {} is already deleted",
            id
        ))),
        SoftDeleteOutcome::NotFound => {
            Err(not_found(format!("Academic year with id {} not found", id)))
        }
    })
    .await
}

#[post("/academic-years/restore/<id>")]
pub async fn restore_academic_year(
    db: DbConn,
    _user: ApiUser,
    id: i32,
) -> Result<Status, ApiError> {
    db.run(move |conn| match orm::restore(conn, id).map_err(internal)? {
        RestoreOutcome::Restored => Ok(Status::NoContent),
        RestoreOutcome::NotDeleted | RestoreOutcome::NotFound => Err(not_found(format!(
            "No deleted academic year with id {}",
            id
        ))),
    })
    .await
}

#[delete("/academic-years/permanent-delete/<id>")]
pub async fn permanent_delete_academic_year(
    db: DbConn,
    _user: ApiUser,
    id: i32,
) -> Result<Status, ApiError> {
    let removed = db
        .run(move |conn| orm::permanent_delete(conn, id))
        .await
        .map_err(internal)?;
    if removed {
        Ok(Status::NoContent)
    } else {
        Err(not_found(format!("Academic year with id {} not found", id)))
    }
}

#[post("/academic-years/bulk-soft-delete", data = "<ids>")]
pub async fn bulk_soft_delete_academic_years(
    db: DbConn,
    _user: ApiUser,
    ids: Json<Vec<i32>>,
) -> Result<Json<Value>, ApiError> {
    let ids = ids.into_inner();
    if ids.is_empty() {
        return Err(bad_request("No ids provided"));
    }
    let count = db
        .run(move |conn| orm::bulk_soft_delete(conn, &ids))
        .await
        .map_err(internal)?;
    if count == 0 {
        return Err(not_found("No matching academic years found"));
    }
    Ok(Json(json!({ "softDeleted": count })))
}

#[post("/academic-years/bulk-restore", data = "<ids>")]
pub async fn bulk_restore_academic_years(
    db: DbConn,
    _user: ApiUser,
    ids: Json<Vec<i32>>,
) -> Result<Json<Value>, ApiError> {
    let ids = ids.into_inner();
    if ids.is_empty() {
        return Err(bad_request("No ids provided"));
    }
    let count = db
        .run(move |conn| orm::bulk_restore(conn, &ids))
        .await
        .map_err(internal)?;
    if count == 0 {
        return Err(not_found("No matching academic years found"));
    }
    Ok(Json(json!({ "restored": count })))
}

#[post("/academic-years/bulk-permanent-delete", data = "<ids>")]
pub async fn bulk_permanent_delete_academic_years(
    db: DbConn,
    _user: ApiUser,
    ids: Json<Vec<i32>>,
) -> Result<Json<Value>, ApiError> {
    let ids = ids.into_inner();
    if ids.is_empty() {
        return Err(bad_request("No ids provided"));
    }
    let count = db
        .run(move |conn| orm::bulk_permanent_delete(conn, &ids))
        .await
        .map_err(internal)?;
    if count == 0 {
        return Err(not_found("No matching academic years found"));
    }
    Ok(Json(json!({ "permanentlyDeleted": count })))
}

pub fn routes() -> Vec<Route> {
    routes![
        list_academic_years,
        list_deleted_academic_years,
        get_academic_year,
        create_academic_year,
        update_academic_year,
        soft_delete_academic_year,
        restore_academic_year,
        permanent_delete_academic_year,
        bulk_soft_delete_academic_years,
        bulk_restore_academic_years,
        bulk_permanent_delete_academic_years,
    ]
}
