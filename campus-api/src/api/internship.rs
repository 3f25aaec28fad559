use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::{json, Json, Value};
use rocket::Route;

use crate::api::{bad_request, conflict, internal, not_found, ApiError};
use crate::auth::ApiUser;
use crate::models::{Internship, InternshipDetail, InternshipInput};
use crate::orm::internship as orm;
use crate::orm::pagination::{ListParams, Page};
use crate::orm::soft_delete::{RestoreOutcome, SoftDeleteOutcome};
use crate::orm::DbConn;

/// All four foreign keys must refer to live rows, the grade (when present)
/// must be on the 0..=10 scale and the (student, year, semester) slot must
/// be free among non-deleted internships.
fn check_references(
    conn: &mut diesel::SqliteConnection,
    input: &InternshipInput,
    exclude_id: Option<i32>,
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
    if crate::orm::partner::get_partner_by_id(conn, input.partner_id)
        .map_err(internal)?
        .is_none()
    {
        return Err(bad_request(format!(
            "Partner with id {} does not exist",
            input.partner_id
        )));
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
    if let Some(grade) = input.grade {
        if !(0.0..=10.0).contains(&grade) {
            return Err(bad_request("Grade must be between 0 and 10"));
        }
    }
    if orm::internship_exists_for(
        conn,
        input.student_id,
        input.academic_year_id,
        input.semester_id,
        exclude_id,
    )
    .map_err(internal)?
    {
        return Err(conflict(
            "An internship for this student already exists in this semester",
        ));
    }
    Ok(())
}

#[get("/internships?<page>&<limit>&<search>")]
pub async fn list_internships(
    db: DbConn,
    _user: ApiUser,
    page: Option<i64>,
    limit: Option<i64>,
    search: Option<String>,
) -> Result<Json<Page<Internship>>, ApiError> {
    let params = ListParams::new(page, limit, search);
    db.run(move |conn| orm::list_internships(conn, &params))
        .await
        .map(Json)
        .map_err(internal)
}

#[get("/internships/deleted?<page>&<limit>&<search>")]
pub async fn list_deleted_internships(
    db: DbConn,
    _user: ApiUser,
    page: Option<i64>,
    limit: Option<i64>,
    search: Option<String>,
) -> Result<Json<Page<Internship>>, ApiError> {
    let params = ListParams::new(page, limit, search);
    db.run(move |conn| orm::list_deleted_internships(conn, &params))
        .await
        .map(Json)
        .map_err(internal)
}

#[get("/internships/<id>")]
pub async fn get_internship(
    db: DbConn,
    _user: ApiUser,
    id: i32,
) -> Result<Json<InternshipDetail>, ApiError> {
    db.run(move |conn| orm::get_internship_detail(conn, id))
        .await
        .map_err(internal)?
        .map(Json)
        .ok_or_else(|| not_found(format!("Internship with id {} not found", id)))
}

#[post("/internships", data = "<input>")]
pub async fn create_internship(
    db: DbConn,
    _user: ApiUser,
    input: Json<InternshipInput>,
) -> Result<status::Created<Json<InternshipDetail>>, ApiError> {
    let input = input.into_inner();
    let detail = db
        .run(move |conn| {
            check_references(conn, &input, None)?;
            orm::insert_internship(conn, &input).map_err(internal)
        })
        .await?;
    let location = format!("/api/internships/{}", detail.internship.id);
    Ok(status::Created::new(location).body(Json(detail)))
}

#[put("/internships/<id>", data = "<input>")]
pub async fn update_internship(
    db: DbConn,
    _user: ApiUser,
    id: i32,
    input: Json<InternshipInput>,
) -> Result<Json<Internship>, ApiError> {
    let input = input.into_inner();
    db.run(move |conn| {
        if orm::get_internship_by_id(conn, id).map_err(internal)?.is_none() {
            return Err(not_found(format!("Internship with id {} not found", id)));
        }
        check_references(conn, &input, Some(id))?;
        orm::update_internship(conn, id, &input).map(Json).map_err(internal)
    })
    .await
}

#[post("/internships/soft-delete/<id>")]
pub async fn soft_delete_internship(
    db: DbConn,
    _user: ApiUser,
    id: i32,
) -> Result<Status, ApiError> {
    db.run(move |conn| match orm::soft_delete(conn, id).map_err(internal)? {
        SoftDeleteOutcome::Deleted => Ok(Status::NoContent),
        SoftDeleteOutcome::AlreadyDeleted => Err(conflict(format!(
            "Internship with id {} is already deleted",
            id
        ))),
        SoftDeleteOutcome::NotFound => {
            Err(not_found(format!("Internship with id {} not found", id)))
        }
    })
    .await
}

#[post("/internships/restore/<id>")]
pub async fn restore_internship(db: DbConn, _user: ApiUser, id: i32) -> Result<Status, ApiError> {
    db.run(move |conn| match orm::restore(conn, id).map_err(internal)? {
        RestoreOutcome::Restored => Ok(Status::NoContent),
        RestoreOutcome::NotDeleted | RestoreOutcome::NotFound => {
            Err(not_found(format!("No deleted internship with id {}", id)))
        }
    })
    .await
}

#[delete("/internships/permanent-delete/<id>")]
pub async fn permanent_delete_internship(
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
        Err(not_found(format!("Internship with id {} not found", id)))
    }
}

#[post("/internships/bulk-soft-delete", data = "<ids>")]
pub async fn bulk_soft_delete_internships(
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
        return Err(not_found("No matching internships found"));
    }
    Ok(Json(json!({ "softDeleted": count })))
}

#[post("/internships/bulk-restore", data = "<ids>")]
pub async fn bulk_restore_internships(
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
        return Err(not_found("No matching internships found"));
    }
    Ok(Json(json!({ "restored": count })))
}

#[post("/internships/bulk-permanent-delete", data = "<ids>")]
pub async fn bulk_permanent_delete_internships(
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
        return Err(not_found("No matching internships found"));
    }
    Ok(Json(json!({ "permanentlyDeleted": count })))
}

pub fn routes() -> Vec<Route> {
    routes![
        list_internships,
        list_deleted_internships,
        get_internship,
        create_internship,
        update_internship,
        soft_delete_internship,
        restore_internship,
        permanent_delete_internship,
        bulk_soft_delete_internships,
        bulk_restore_internships,
        bulk_permanent_delete_internships,
    ]
}
