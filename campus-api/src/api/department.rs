use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::{json, Json, Value};
use rocket::Route;

use crate::api::{bad_request, conflict, internal, not_found, require_text, ApiError};
use crate::auth::ApiUser;
use crate::models::{Department, DepartmentDetail, DepartmentInput, DepartmentNode};
use crate::orm::department as orm;
use crate::orm::pagination::{ListParams, Page};
use crate::orm::soft_delete::{RestoreOutcome, SoftDeleteOutcome};
use crate::orm::DbConn;

fn validate(input: &DepartmentInput) -> Result<(), ApiError> {
    require_text(&input.name, "Name")?;
    require_text(&input.code, "Code")
}

fn check_parent(
    conn: &mut diesel::SqliteConnection,
    input: &DepartmentInput,
    own_id: Option<i32>,
) -> Result<(), ApiError> {
    let parent_id = match input.parent_department_id {
        Some(parent_id) => parent_id,
        None => return Ok(()),
    };
    if own_id == Some(parent_id) {
        return Err(bad_request("A department cannot be its own parent"));
    }
    if orm::get_department_by_id(conn, parent_id).map_err(internal)?.is_none() {
        return Err(bad_request(format!(
            "Department with id {} does not exist",
            parent_id
        )));
    }
    Ok(())
}

#[get("/departments?<page>&<limit>&<search>")]
pub async fn list_departments(
    db: DbConn,
    _user: ApiUser,
    page: Option<i64>,
    limit: Option<i64>,
    search: Option<String>,
) -> Result<Json<Page<DepartmentNode>>, ApiError> {
    let params = ListParams::new(page, limit, search);
    db.run(move |conn| orm::list_department_tree(conn, &params))
        .await
        .map(Json)
        .map_err(internal)
}

#[get("/departments/deleted?<page>&<limit>&<search>")]
pub async fn list_deleted_departments(
    db: DbConn,
    _user: ApiUser,
    page: Option<i64>,
    limit: Option<i64>,
    search: Option<String>,
) -> Result<Json<Page<Department>>, ApiError> {
    let params = ListParams::new(page, limit, search);
    db.run(move |conn| orm::list_deleted_departments(conn, &params))
        .await
        .map(Json)
        .map_err(internal)
}

#[get("/departments/<id>")]
pub async fn get_department(
    db: DbConn,
    _user: ApiUser,
    id: i32,
) -> Result<Json<DepartmentDetail>, ApiError> {
    db.run(move |conn| orm::get_department_detail(conn, id))
        .await
        .map_err(internal)?
        .map(Json)
        .ok_or_else(|| not_found(format!("Department with id {} not found", id)))
}

#[post("/departments", data = "<input>")]
pub async fn create_department(
    db: DbConn,
    _user: ApiUser,
    input: Json<DepartmentInput>,
) -> Result<status::Created<Json<Department>>, ApiError> {
    let input = input.into_inner();
    validate(&input)?;
    let department = db
        .run(move |conn| {
            check_parent(conn, &input, None)?;
            orm::insert_department(conn, &input).map_err(internal)
        })
        .await?;
    let location = format!("/api/departments/{}", department.id);
    Ok(status::Created::new(location).body(Json(department)))
}

#[put("/departments/<id>", data = "<input>")]
pub async fn update_department(
    db: DbConn,
    _user: ApiUser,
    id: i32,
    input: Json<DepartmentInput>,
) -> Result<Json<Department>, ApiError> {
    let input = input.into_inner();
    validate(&input)?;
    db.run(move |conn| {
        if orm::get_department_by_id(conn, id).map_err(internal)?.is_none() {
            return Err(not_found(format!("Department with id {} not found", id)));
        }
        check_parent(conn, &input, Some(id))?;
        orm::update_department(conn, id, &input).map(Json).map_err(internal)
    })
    .await
}

#[post("/departments/soft-delete/<id>")]
pub async fn soft_delete_department(
    db: DbConn,
    _user: ApiUser,
    id: i32,
) -> Result<Status, ApiError> {
    db.run(move |conn| {
        if orm::has_live_children(conn, id).map_err(internal)? {
            return Err(conflict(format!(
                "Department with id {} still has child departments",
                id
            )));
        }
        match orm::soft_delete(conn, id).map_err(internal)? {
            SoftDeleteOutcome::Deleted => Ok(Status::NoContent),
            SoftDeleteOutcome::AlreadyDeleted => Err(conflict(format!(
                "Department with id {} is already deleted",
                id
            ))),
            SoftDeleteOutcome::NotFound => {
                Err(not_found(format!("Department with id {} not found", id)))
            }
        }
    })
    .await
}

#[post("/departments/restore/<id>")]
pub async fn restore_department(db: DbConn, _user: ApiUser, id: i32) -> Result<Status, ApiError> {
    db.run(move |conn| match orm::restore(conn, id).map_err(internal)? {
        RestoreOutcome::Restored => Ok(Status::NoContent),
        RestoreOutcome::NotDeleted | RestoreOutcome::NotFound => {
            Err(not_found(format!("No deleted department with id {}", id)))
        }
    })
    .await
}

#[delete("/departments/permanent-delete/<id>")]
pub async fn permanent_delete_department(
    db: DbConn,
    _user: ApiUser,
    id: i32,
) -> Result<Status, ApiError> {
    db.run(move |conn| {
        if orm::has_any_children(conn, id).map_err(internal)? {
            return Err(conflict(format!(
                "Department with id {} still has child departments",
                id
            )));
        }
        if orm::permanent_delete(conn, id).map_err(internal)? {
            Ok(Status::NoContent)
        } else {
            Err(not_found(format!("Department with id {} not found", id)))
        }
    })
    .await
}

#[post("/departments/bulk-soft-delete", data = "<ids>")]
pub async fn bulk_soft_delete_departments(
    db: DbConn,
    _user: ApiUser,
    ids: Json<Vec<i32>>,
) -> Result<Json<Value>, ApiError> {
    let ids = ids.into_inner();
    if ids.is_empty() {
        return Err(bad_request("No ids provided"));
    }
    // Departments with live children are skipped, like other ineligible ids.
    let count = db
        .run(move |conn| -> Result<usize, diesel::result::Error> {
            let mut count = 0;
            for id in ids {
                if orm::has_live_children(conn, id)? {
                    continue;
                }
                if orm::soft_delete(conn, id)? == SoftDeleteOutcome::Deleted {
                    count += 1;
                }
            }
            Ok(count)
        })
        .await
        .map_err(internal)?;
    if count == 0 {
        return Err(not_found("No matching departments found"));
    }
    Ok(Json(json!({ "softDeleted": count })))
}

#[post("/departments/bulk-restore", data = "<ids>")]
pub async fn bulk_restore_departments(
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
        return Err(not_found("No matching departments found"));
    }
    Ok(Json(json!({ "restored": count })))
}

#[post("/departments/bulk-permanent-delete", data = "<ids>")]
pub async fn bulk_permanent_delete_departments(
    db: DbConn,
    _user: ApiUser,
    ids: Json<Vec<i32>>,
) -> Result<Json<Value>, ApiError> {
    let ids = ids.into_inner();
    if ids.is_empty() {
        return Err(bad_request("No ids provided"));
    }
    let count = db
        .run(move |conn| -> Result<usize, diesel::result::Error> {
            let mut count = 0;
            for id in ids {
                if orm::has_any_children(conn, id)? {
                    continue;
                }
                if orm::permanent_delete(conn, id)? {
                    count += 1;
                }
            }
            Ok(count)
        })
        .await
        .map_err(internal)?;
    if count == 0 {
        return Err(not_found("No matching departments found"));
    }
    Ok(Json(json!({ "permanentlyDeleted": count })))
}

pub fn routes() -> Vec<Route> {
    routes![
        list_departments,
        list_deleted_departments,
        get_department,
        create_department,
        update_department,
        soft_delete_department,
        restore_department,
        permanent_delete_department,
        bulk_soft_delete_departments,
        bulk_restore_departments,
        bulk_permanent_delete_departments,
    ]
}
