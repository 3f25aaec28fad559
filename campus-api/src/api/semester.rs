use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::{json, Json, Value};
use rocket::Route;

use crate::api::{bad_request, conflict, internal, not_found, require_text, ApiError};
use crate::auth::ApiUser;
use crate::models::{Semester, SemesterInput};
use crate::orm::pagination::{ListParams, Page};
use crate::orm::semester as orm;
use crate::orm::soft_delete::{RestoreOutcome, SoftDeleteOutcome};
use crate::orm::DbConn;

fn validate(input: &SemesterInput) -> Result<(), ApiError> {
    require_text(&input.name, "Name")?;
    if input.start_date >= input.end_date {
        return Err(bad_request("start_date must be before end_date"));
    }
    Ok(())
}

/// The academic year must exist and not be soft-deleted, and the name must
/// be free within that year.
fn check_year_and_name(
    conn: &mut diesel::SqliteConnection,
    input: &SemesterInput,
    exclude_id: Option<i32>,
) -> Result<(), ApiError> {
    if crate::orm::academic_year::get_academic_year_by_id(conn, input.academic_year_id)
        .map_err(internal)?
        .is_none()
    {
        return Err(bad_request(format!(
            "Academic year with id {} does not exist",
            input.academic_year_id
        )));
    }
    if orm::semester_name_exists_in_year(conn, &input.name, input.academic_year_id, exclude_id)
        .map_err(internal)?
    {
        return Err(conflict(format!(
            "Semester '{}' already exists in this academic year",
            input.name
        )));
    }
    Ok(())
}

#[get("/semesters?<page>&<limit>&<search>")]
pub async fn list_semesters(
    db: DbConn,
    _user: ApiUser,
    page: Option<i64>,
    limit: Option<i64>,
    search: Option<String>,
) -> Result<Json<Page<Semester>>, ApiError> {
    let params = ListParams::new(page, limit, search);
    db.run(move |conn| orm::list_semesters(conn, &params))
        .await
        .map(Json)
        .map_err(internal)
}

#[get("/semesters/deleted?<page>&<limit>&<search>")]
pub async fn list_deleted_semesters(
    db: DbConn,
    _user: ApiUser,
    page: Option<i64>,
    limit: Option<i64>,
    search: Option<String>,
) -> Result<Json<Page<Semester>>, ApiError> {
    let params = ListParams::new(page, limit, search);
    db.run(move |conn| orm::list_deleted_semesters(conn, &params))
        .await
        .map(Json)
        .map_err(internal)
}

#[get("/semesters/<id>")]
pub async fn get_semester(db: DbConn, _user: ApiUser, id: i32) -> Result<Json<Semester>, ApiError> {
    db.run(move |conn| orm::get_semester_by_id(conn, id))
        .await
        .map_err(internal)?
        .map(Json)
        .ok_or_else(|| not_found(format!("Semester with id {} not found", id)))
}

#[post("/semesters", data = "<input>")]
pub async fn create_semester(
    db: DbConn,
    _user: ApiUser,
    input: Json<SemesterInput>,
) -> Result<status::Created<Json<Semester>>, ApiError> {
    let input = input.into_inner();
    validate(&input)?;
    let semester = db
        .run(move |conn| {
            check_year_and_name(conn, &input, None)?;
            orm::insert_semester(conn, &input).map_err(internal)
        })
        .await?;
    let location = format!("/api/semesters/{}", semester.id);
    Ok(status::Created::new(location).body(Json(semester)))
}

#[put("/semesters/<id>", data = "<input>")]
pub async fn update_semester(
    db: DbConn,
    _user: ApiUser,
    id: i32,
    input: Json<SemesterInput>,
) -> Result<Json<Semester>, ApiError> {
    let input = input.into_inner();
    validate(&input)?;
    db.run(move |conn| {
        if orm::get_semester_by_id(conn, id).map_err(internal)?.is_none() {
            return Err(not_found(format!("Semester with id {} not found", id)));
        }
        check_year_and_name(conn, &input, Some(id))?;
        orm::update_semester(conn, id, &input).map(Json).map_err(internal)
    })
    .await
}

#[post("/semesters/soft-delete/<id>")]
pub async fn soft_delete_semester(db: DbConn, _user: ApiUser, id: i32) -> Result<Status, ApiError> {
    db.run(move |conn| match orm::soft_delete(conn, id).map_err(internal)? {
        SoftDeleteOutcome::Deleted => Ok(Status::NoContent),
        SoftDeleteOutcome::AlreadyDeleted => Err(conflict(format!(
            "Semester with id {} is already deleted",
            id
        ))),
        SoftDeleteOutcome::NotFound => Err(not_found(format!("Semester with id {} not found", id))),
    })
    .await
}

#[post("/semesters/restore/<id>")]
pub async fn restore_semester(db: DbConn, _user: ApiUser, id: i32) -> Result<Status, ApiError> {
    db.run(move |conn| match orm::restore(conn, id).map_err(internal)? {
        RestoreOutcome::Restored => Ok(Status::NoContent),
        RestoreOutcome::NotDeleted | RestoreOutcome::NotFound => {
            Err(not_found(format!("No deleted semester with id {}", id)))
        }
    })
    .await
}

#[delete("/semesters/permanent-delete/<id>")]
pub async fn permanent_delete_semester(
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
        Err(not_found(format!("Semester with id {} not found", id)))
    }
}

#[post("/semesters/bulk-soft-delete", data = "<ids>")]
pub async fn bulk_soft_delete_semesters(
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
        return Err(not_found("No matching semesters found"));
    }
    Ok(Json(json!({ "softDeleted": count })))
}

#[post("/semesters/bulk-restore", data = "<ids>")]
pub async fn bulk_restore_semesters(
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
        return Err(not_found("No matching semesters found"));
    }
    Ok(Json(json!({ "restored": count })))
}

#[post("/semesters/bulk-permanent-delete", data = "<ids>")]
pub async fn bulk_permanent_delete_semesters(
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
        return Err(not_found("No matching semesters found"));
    }
    Ok(Json(json!({ "permanentlyDeleted": count })))
}

pub fn routes() -> Vec<Route> {
    routes![
        list_semesters,
        list_deleted_semesters,
        get_semester,
        create_semester,
        update_semester,
        soft_delete_semester,
        restore_semester,
        permanent_delete_semester,
        bulk_soft_delete_semesters,
        bulk_restore_semesters,
        bulk_permanent_delete_semesters,
    ]
}
