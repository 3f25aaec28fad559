use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::{json, Json, Value};
use rocket::Route;

use crate::api::{bad_request, conflict, internal, not_found, require_text, ApiError};
use crate::auth::ApiUser;
use crate::models::{Thesis, ThesisInput};
use crate::orm::pagination::{ListParams, Page};
use crate::orm::soft_delete::{RestoreOutcome, SoftDeleteOutcome};
use crate::orm::thesis as orm;
use crate::orm::DbConn;

fn check_references(
    conn: &mut diesel::SqliteConnection,
    input: &ThesisInput,
) -> Result<(), ApiError> {
    if crate::orm::student::get_student_by_id(conn, input.student_id)
        .map_err(internal)?
        .is_none()
    {
        return Err(bad_request(format!(
            "Student with id {} does not exist",
            input.student_id
        )));
    }
    if crate::orm::lecturer::get_lecturer_by_id(conn, input.supervisor_id)
        .map_err(internal)?
        .is_none()
    {
        return Err(bad_request(format!(
            "Lecturer with id {} does not exist",
            input.supervisor_id
        )));
    }
    if let Some(examiner_id) = input.examiner_id {
        if crate::orm::lecturer::get_lecturer_by_id(conn, examiner_id)
            .map_err(internal)?
            .is_none()
        {
            return Err(bad_request(format!(
                "Lecturer with id {} does not exist",
                examiner_id
            )));
        }
    }
    if crate::orm::academic_year::get_academic_year_by_id(conn, input.academic_year_id)
        .map_err(internal)?
        .is_none()
    {
        return Err(bad_request(format!(
            "Academic year with id {} does not exist",
            input.academic_year_id
        )));
    }
    if crate::orm::semester::get_semester_by_id(conn, input.semester_id)
        .map_err(internal)?
        .is_none()
    {
        return Err(bad_request(format!(
            "Semester with id {} does not exist",
            input.semester_id
        )));
    }
    Ok(())
}

#[get("/theses?<page>&<limit>&<search>")]
pub async fn list_theses(
    db: DbConn,
    _user: ApiUser,
    page: Option<i64>,
    limit: Option<i64>,
    search: Option<String>,
) -> Result<Json<Page<Thesis>>, ApiError> {
    let params = ListParams::new(page, limit, search);
    db.run(move |conn| orm::list_theses(conn, &params))
        .await
        .map(Json)
        .map_err(internal)
}

#[get("/theses/deleted?<page>&<limit>&<search>")]
pub async fn list_deleted_theses(
    db: DbConn,
    _user: ApiUser,
    page: Option<i64>,
    limit: Option<i64>,
    search: Option<String>,
) -> Result<Json<Page<Thesis>>, ApiError> {
    let params = ListParams::new(page, limit, search);
    db.run(move |conn| orm::list_deleted_theses(conn, &params))
        .await
        .map(Json)
        .map_err(internal)
}

#[get("/theses/<id>")]
pub async fn get_thesis(db: DbConn, _user: ApiUser, id: i32) -> Result<Json<Thesis>, ApiError> {
    db.run(move |conn| orm::get_thesis_by_id(conn, id))
        .await
        .map_err(internal)?
        .map(Json)
        .ok_or_else(|| not_found(format!("Thesis with id {} not found", id)))
}

#[post("/theses", data = "<input>")]
pub async fn create_thesis(
    db: DbConn,
    _user: ApiUser,
    input: Json<ThesisInput>,
) -> Result<status::Created<Json<Thesis>>, ApiError> {
    let input = input.into_inner();
    require_text(&input.title, "Title")?;
    let thesis = db
        .run(move |conn| {
            check_references(conn, &input)?;
            orm::insert_thesis(conn, &input).map_err(internal)
        })
        .await?;
    let location = format!("/api/theses/{}", thesis.id);
    Ok(status::Created::new(location).body(Json(thesis)))
}

#[put("/theses/<id>", data = "<input>")]
pub async fn update_thesis(
    db: DbConn,
    _user: ApiUser,
    id: i32,
    input: Json<ThesisInput>,
) -> Result<Json<Thesis>, ApiError> {
    let input = input.into_inner();
    require_text(&input.title, "Title")?;
    db.run(move |conn| {
        if orm::get_thesis_by_id(conn, id).map_err(internal)?.is_none() {
            return Err(not_found(format!("Thesis with id {} not found", id)));
        }
        check_references(conn, &input)?;
        orm::update_thesis(conn, id, &input).map(Json).map_err(internal)
    })
    .await
}

#[post("/theses/soft-delete/<id>")]
pub async fn soft_delete_thesis(db: DbConn, _user: ApiUser, id: i32) -> Result<Status, ApiError> {
    db.run(move |conn| match orm::soft_delete(conn, id).map_err(internal)? {
        SoftDeleteOutcome::Deleted => Ok(Status::NoContent),
        SoftDeleteOutcome::AlreadyDeleted => Err(conflict(format!(
            "Thesis with id {} is already deleted",
            id
        ))),
        SoftDeleteOutcome::NotFound => Err(not_found(format!("Thesis with id {} not found", id))),
    })
    .await
}

#[post("/theses/restore/<id>")]
pub async fn restore_thesis(db: DbConn, _user: ApiUser, id: i32) -> Result<Status, ApiError> {
    db.run(move |conn| match orm::restore(conn, id).map_err(internal)? {
        RestoreOutcome::Restored => Ok(Status::NoContent),
        RestoreOutcome::NotDeleted | RestoreOutcome::NotFound => {
            Err(not_found(format!("No deleted thesis with id {}", id)))
        }
    })
    .await
}

#[delete("/theses/permanent-delete/<id>")]
pub async fn permanent_delete_thesis(
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
        Err(not_found(format!("Thesis with id {} not found", id)))
    }
}

#[post("/theses/bulk-soft-delete", data = "<ids>")]
pub async fn bulk_soft_delete_theses(
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
        return Err(not_found("No matching theses found"));
    }
    Ok(Json(json!({ "softDeleted": count })))
}

#[post("/theses/bulk-restore", data = "<ids>")]
pub async fn bulk_restore_theses(
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
        return Err(not_found("No matching theses found"));
    }
    Ok(Json(json!({ "restored": count })))
}

#[post("/theses/bulk-permanent-delete", data = "<ids>")]
pub async fn bulk_permanent_delete_theses(
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
        return Err(not_found("No matching theses found"));
    }
    Ok(Json(json!({ "permanentlyDeleted": count })))
}

pub fn routes() -> Vec<Route> {
    routes![
        list_theses,
        list_deleted_theses,
        get_thesis,
        create_thesis,
        update_thesis,
        soft_delete_thesis,
        restore_thesis,
        permanent_delete_thesis,
        bulk_soft_delete_theses,
        bulk_restore_theses,
        bulk_permanent_delete_theses,
    ]
}
