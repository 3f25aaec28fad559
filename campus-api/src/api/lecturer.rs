use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::{json, Json, Value};
use rocket::Route;

use crate::api::{bad_request, conflict, internal, not_found, require_text, ApiError};
use crate::auth::ApiUser;
use crate::models::{Lecturer, LecturerInput};
use crate::orm::lecturer as orm;
use crate::orm::pagination::{ListParams, Page};
use crate::orm::soft_delete::{RestoreOutcome, SoftDeleteOutcome};
use crate::orm::DbConn;

fn validate(input: &LecturerInput) -> Result<(), ApiError> {
    require_text(&input.name, "Name")?;
    require_text(&input.email, "Email")
}

fn check_references(
    conn: &mut diesel::SqliteConnection,
    input: &LecturerInput,
    exclude_id: Option<i32>,
) -> Result<(), ApiError> {
    if let Some(department_id) = input.department_id {
        if crate::orm::department::get_department_by_id(conn, department_id)
            .map_err(internal)?
            .is_none()
        {
            return Err(bad_request(format!(
                "Department with id {} does not exist",
                department_id
            )));
        }
    }
    if orm::lecturer_email_exists(conn, &input.email, exclude_id).map_err(internal)? {
        return Err(conflict(format!(
            "Lecturer with email '{}' already exists",
            input.email
        )));
    }
    Ok(())
}

#[get("/lecturers?<page>&<limit>&<search>")]
pub async fn list_lecturers(
    db: DbConn,
    _user: ApiUser,
    page: Option<i64>,
    limit: Option<i64>,
    search: Option<String>,
) -> Result<Json<Page<Lecturer>>, ApiError> {
    let params = ListParams::new(page, limit, search);
    db.run(move |conn| orm::list_lecturers(conn, &params))
        .await
        .map(Json)
        .map_err(internal)
}

#[get("/lecturers/deleted?<page>&<limit>&<search>")]
pub async fn list_deleted_lecturers(
    db: DbConn,
    _user: ApiUser,
    page: Option<i64>,
    limit: Option<i64>,
    search: Option<String>,
) -> Result<Json<Page<Lecturer>>, ApiError> {
    let params = ListParams::new(page, limit, search);
    db.run(move |conn| orm::list_deleted_lecturers(conn, &params))
        .await
        .map(Json)
        .map_err(internal)
}

#[get("/lecturers/<id>")]
pub async fn get_lecturer(db: DbConn, _user: ApiUser, id: i32) -> Result<Json<Lecturer>, ApiError> {
    db.run(move |conn| orm::get_lecturer_by_id(conn, id))
        .await
        .map_err(internal)?
        .map(Json)
        .ok_or_else(|| not_found(format!("Lecturer with id {} not found", id)))
}

#[post("/lecturers", data = "<input>")]
pub async fn create_lecturer(
    db: DbConn,
    _user: ApiUser,
    input: Json<LecturerInput>,
) -> Result<status::Created<Json<Lecturer>>, ApiError> {
    let input = input.into_inner();
    validate(&input)?;
    let lecturer = db
        .run(move |conn| {
            check_references(conn, &input, None)?;
            orm::insert_lecturer(conn, &input).map_err(internal)
        })
        .await?;
    let location = format!("/api/lecturers/{}", lecturer.id);
    Ok(status::Created::new(location).body(Json(lecturer)))
}

#[put("/lecturers/<id>", data = "<input>")]
pub async fn update_lecturer(
    db: DbConn,
    _user: ApiUser,
    id: i32,
    input: Json<LecturerInput>,
) -> Result<Json<Lecturer>, ApiError> {
    let input = input.into_inner();
    validate(&input)?;
    db.run(move |conn| {
        if orm::get_lecturer_by_id(conn, id).map_err(internal)?.is_none() {
            return Err(not_found(format!("Lecturer with id {} not found", id)));
        }
        check_references(conn, &input, Some(id))?;
        orm::update_lecturer(conn, id, &input).map(Json).map_err(internal)
    })
    .await
}

#[post("/lecturers/soft-delete/<id>")]
pub async fn soft_delete_lecturer(db: DbConn, _user: ApiUser, id: i32) -> Result<Status, ApiError> {
    db.run(move |conn| match orm::soft_delete(conn, id).map_err(internal)? {
        SoftDeleteOutcome::Deleted => Ok(Status::NoContent),
        SoftDeleteOutcome::AlreadyDeleted => Err(conflict(format!(
            "Lecturer with id {} is already deleted",
            id
        ))),
        SoftDeleteOutcome::NotFound => Err(not_found(format!("Lecturer with id {} not found", id))),
    })
    .await
}

#[post("/lecturers/restore/<id>")]
pub async fn restore_lecturer(db: DbConn, _user: ApiUser, id: i32) -> Result<Status, ApiError> {
    db.run(move |conn| match orm::restore(conn, id).map_err(internal)? {
        RestoreOutcome::Restored => Ok(Status::NoContent),
        RestoreOutcome::NotDeleted | RestoreOutcome::NotFound => {
            Err(not_found(format!("No deleted lecturer with id {}", id)))
        }
    })
    .await
}

#[delete("/lecturers/permanent-delete/<id>")]
pub async fn permanent_delete_lecturer(
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
        Err(not_found(format!("Lecturer with id {} not found", id)))
    }
}

#[post("/lecturers/bulk-soft-delete", data = "<ids>")]
pub async fn bulk_soft_delete_lecturers(
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
        return Err(not_found("No matching lecturers found"));
    }
    Ok(Json(json!({ "softDeleted": count })))
}

#[post("/lecturers/bulk-restore", data = "<ids>")]
pub async fn bulk_restore_lecturers(
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
        return Err(not_found("No matching lecturers found"));
    }
    Ok(Json(json!({ "restored": count })))
}

#[post("/lecturers/bulk-permanent-delete", data = "<ids>")]
pub async fn bulk_permanent_delete_lecturers(
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
        return Err(not_found("No matching lecturers found"));
    }
    Ok(Json(json!({ "permanentlyDeleted": count })))
}

pub fn routes() -> Vec<Route> {
    routes![
        list_lecturers,
        list_deleted_lecturers,
        get_lecturer,
        create_lecturer,
        update_lecturer,
        soft_delete_lecturer,
        restore_lecturer,
        permanent_delete_lecturer,
        bulk_soft_delete_lecturers,
        bulk_restore_lecturers,
        bulk_permanent_delete_lecturers,
    ]
}
