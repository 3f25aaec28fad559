use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::{json, Json, Value};
use rocket::Route;

use crate::api::{bad_request, conflict, internal, not_found, require_text, ApiError};
use crate::auth::ApiUser;
use crate::models::{Student, StudentInput};
use crate::orm::pagination::{ListParams, Page};
use crate::orm::soft_delete::{RestoreOutcome, SoftDeleteOutcome};
use crate::orm::student as orm;
use crate::orm::DbConn;

fn validate(input: &StudentInput) -> Result<(), ApiError> {
    require_text(&input.student_code, "Student code")?;
    require_text(&input.full_name, "Full name")?;
    require_text(&input.email, "Email")
}

fn check_department(
    conn: &mut diesel::SqliteConnection,
    input: &StudentInput,
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
    Ok(())
}

#[get("/students?<page>&<limit>&<search>")]
pub async fn list_students(
    db: DbConn,
    _user: ApiUser,
    page: Option<i64>,
    limit: Option<i64>,
    search: Option<String>,
) -> Result<Json<Page<Student>>, ApiError> {
    let params = ListParams::new(page, limit, search);
    db.run(move |conn| orm::list_students(conn, &params))
        .await
        .map(Json)
        .map_err(internal)
}

#[get("/students/deleted?<page>&<limit>&<search>")]
pub async fn list_deleted_students(
    db: DbConn,
    _user: ApiUser,
    page: Option<i64>,
    limit: Option<i64>,
    search: Option<String>,
) -> Result<Json<Page<Student>>, ApiError> {
    let params = ListParams::new(page, limit, search);
    db.run(move |conn| orm::list_deleted_students(conn, &params))
        .await
        .map(Json)
        .map_err(internal)
}

#[get("/students/<id>")]
pub async fn get_student(db: DbConn, _user: ApiUser, id: i32) -> Result<Json<Student>, ApiError> {
    db.run(move |conn| orm::get_student_by_id(conn, id))
        .await
        .map_err(internal)?
        .map(Json)
        .ok_or_else(|| not_found(format!("Student with id {} not found", id)))
}

#[post("/students", data = "<input>")]
pub async fn create_student(
    db: DbConn,
    _user: ApiUser,
    input: Json<StudentInput>,
) -> Result<status::Created<Json<Student>>, ApiError> {
    let input = input.into_inner();
    validate(&input)?;
    let student = db
        .run(move |conn| {
            check_department(conn, &input)?;
            orm::insert_student(conn, &input).map_err(internal)
        })
        .await?;
    let location = format!("/api/students/{}", student.id);
    Ok(status::Created::new(location).body(Json(student)))
}

#[put("/students/<id>", data = "<input>")]
pub async fn update_student(
    db: DbConn,
    _user: ApiUser,
    id: i32,
    input: Json<StudentInput>,
) -> Result<Json<Student>, ApiError> {
    let input = input.into_inner();
    validate(&input)?;
    db.run(move |conn| {
        if orm::get_student_by_id(conn, id).map_err(internal)?.is_none() {
            return Err(not_found(format!("Student with id {} not found", id)));
        }
        check_department(conn, &input)?;
        orm::update_student(conn, id, &input).map(Json).map_err(internal)
    })
    .await
}

#[post("/students/soft-delete/<id>")]
pub async fn soft_delete_student(db: DbConn, _user: ApiUser, id: i32) -> Result<Status, ApiError> {
    db.run(move |conn| match orm::soft_delete(conn, id).map_err(internal)? {
        SoftDeleteOutcome::Deleted => Ok(Status::NoContent),
        SoftDeleteOutcome::AlreadyDeleted => Err(conflict(format!(
            "Student with id {} is already deleted",
            id
        ))),
        SoftDeleteOutcome::NotFound => Err(not_found(format!("Student with id {} not found", id))),
    })
    .await
}

#[post("/students/restore/<id>")]
pub async fn restore_student(db: DbConn, _user: ApiUser, id: i32) -> Result<Status, ApiError> {
    db.run(move |conn| match orm::restore(conn, id).map_err(internal)? {
        RestoreOutcome::Restored => Ok(Status::NoContent),
        RestoreOutcome::NotDeleted | RestoreOutcome::NotFound => {
            Err(not_found(format!("No deleted student with id {}", id)))
        }
    })
    .await
}

#[delete("/students/permanent-delete/<id>")]
pub async fn permanent_delete_student(
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
        Err(not_found(format!("Student with id {} not found", id)))
    }
}

#[post("/students/bulk-soft-delete", data = "<ids>")]
pub async fn bulk_soft_delete_students(
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
        return Err(not_found("No matching students found"));
    }
    Ok(Json(json!({ "softDeleted": count })))
}

#[post("/students/bulk-restore", data = "<ids>")]
pub async fn bulk_restore_students(
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
        return Err(not_found("No matching students found"));
    }
    Ok(Json(json!({ "restored": count })))
}

#[post("/students/bulk-permanent-delete", data = "<ids>")]
pub async fn bulk_permanent_delete_students(
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
        return Err(not_found("No matching students found"));
    }
    Ok(Json(json!({ "permanentlyDeleted": count })))
}

pub fn routes() -> Vec<Route> {
    routes![
        list_students,
        list_deleted_students,
        get_student,
        create_student,
        update_student,
        soft_delete_student,
        restore_student,
        permanent_delete_student,
        bulk_soft_delete_students,
        bulk_restore_students,
        bulk_permanent_delete_students,
    ]
}
