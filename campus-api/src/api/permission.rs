use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::{json, Json, Value};
use rocket::Route;

use crate::api::{bad_request, conflict, internal, not_found, require_text, ApiError};
use crate::auth::ApiUser;
use crate::models::{Permission, PermissionInput};
use crate::orm::pagination::{ListParams, Page};
use crate::orm::permission as orm;
use crate::orm::soft_delete::{RestoreOutcome, SoftDeleteOutcome};
use crate::orm::DbConn;

fn validate(input: &PermissionInput) -> Result<(), ApiError> {
    require_text(&input.name, "Name")?;
    require_text(&input.module, "Module")
}

#[get("/permissions?<page>&<limit>&<search>")]
pub async fn list_permissions(
    db: DbConn,
    _user: ApiUser,
    page: Option<i64>,
    limit: Option<i64>,
    search: Option<String>,
) -> Result<Json<Page<Permission>>, ApiError> {
    let params = ListParams::new(page, limit, search);
    db.run(move |conn| orm::list_permissions(conn, &params))
        .await
        .map(Json)
        .map_err(internal)
}

#[get("/permissions/deleted?<page>&<limit>&<search>")]
pub async fn list_deleted_permissions(
    db: DbConn,
    _user: ApiUser,
    page: Option<i64>,
    limit: Option<i64>,
    search: Option<String>,
) -> Result<Json<Page<Permission>>, ApiError> {
    let params = ListParams::new(page, limit, search);
    db.run(move |conn| orm::list_deleted_permissions(conn, &params))
        .await
        .map(Json)
        .map_err(internal)
}

#[get("/permissions/<id>")]
pub async fn get_permission(
    db: DbConn,
    _user: ApiUser,
    id: i32,
) -> Result<Json<Permission>, ApiError> {
    db.run(move |conn| orm::get_permission_by_id(conn, id))
        .await
        .map_err(internal)?
        .map(Json)
        .ok_or_else(|| not_found(format!("Permission with id {} not found", id)))
}

#[post("/permissions", data = "<input>")]
pub async fn create_permission(
    db: DbConn,
    _user: ApiUser,
    input: Json<PermissionInput>,
) -> Result<status::Created<Json<Permission>>, ApiError> {
    let input = input.into_inner();
    validate(&input)?;
    let permission = db
        .run(move |conn| orm::insert_permission(conn, &input))
        .await
        .map_err(internal)?;
    let location = format!("/api/permissions/{}", permission.id);
    Ok(status::Created::new(location).body(Json(permission)))
}

#[put("/permissions/<id>", data = "<input>")]
pub async fn update_permission(
    db: DbConn,
    _user: ApiUser,
    id: i32,
    input: Json<PermissionInput>,
) -> Result<Json<Permission>, ApiError> {
    let input = input.into_inner();
    validate(&input)?;
    db.run(move |conn| {
        if orm::get_permission_by_id(conn, id).map_err(internal)?.is_none() {
            return Err(not_found(format!("Permission with id {} not found", id)));
        }
        orm::update_permission(conn, id, &input).map(Json).map_err(internal)
    })
    .await
}

#[post("/permissions/soft-delete/<id>")]
pub async fn soft_delete_permission(
    db: DbConn,
    _user: ApiUser,
    id: i32,
) -> Result<Status, ApiError> {
    db.run(move |conn| match orm::soft_delete(conn, id).map_err(internal)? {
        SoftDeleteOutcome::Deleted => Ok(Status::NoContent),
        SoftDeleteOutcome::AlreadyDeleted => Err(conflict(format!(
            "Permission with id {} is already deleted",
            id
        ))),
        SoftDeleteOutcome::NotFound => {
            Err(not_found(format!("Permission with id {} not found", id)))
        }
    })
    .await
}

#[post("/permissions/restore/<id>")]
pub async fn restore_permission(db: DbConn, _user: ApiUser, id: i32) -> Result<Status, ApiError> {
    db.run(move |conn| match orm::restore(conn, id).map_err(internal)? {
        RestoreOutcome::Restored => Ok(Status::NoContent),
        RestoreOutcome::NotDeleted | RestoreOutcome::NotFound => {
            Err(not_found(format!("No deleted permission with id {}", id)))
        }
    })
    .await
}

#[delete("/permissions/permanent-delete/<id>")]
pub async fn permanent_delete_permission(
    db: DbConn,
    _user: ApiUser,
    id: i32,
) -> Result<Status, ApiError> {
    db.run(move |conn| {
        if orm::permission_is_referenced(conn, id).map_err(internal)? {
            return Err(conflict(format!(
                "Permission with id {} is still assigned to roles",
                id
            )));
        }
        if orm::permanent_delete(conn, id).map_err(internal)? {
            Ok(Status::NoContent)
        } else {
            Err(not_found(format!("Permission with id {} not found", id)))
        }
    })
    .await
}

#[post("/permissions/bulk-soft-delete", data = "<ids>")]
pub async fn bulk_soft_delete_permissions(
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
        return Err(not_found("No matching permissions found"));
    }
    Ok(Json(json!({ "softDeleted": count })))
}

#[post("/permissions/bulk-restore", data = "<ids>")]
pub async fn bulk_restore_permissions(
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
        return Err(not_found("No matching permissions found"));
    }
    Ok(Json(json!({ "restored": count })))
}

#[post("/permissions/bulk-permanent-delete", data = "<ids>")]
pub async fn bulk_permanent_delete_permissions(
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
                if orm::permission_is_referenced(conn, id)? {
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
        return Err(not_found("No matching permissions found"));
    }
    Ok(Json(json!({ "permanentlyDeleted": count })))
}

pub fn routes() -> Vec<Route> {
    routes![
        list_permissions,
        list_deleted_permissions,
        get_permission,
        create_permission,
        update_permission,
        soft_delete_permission,
        restore_permission,
        permanent_delete_permission,
        bulk_soft_delete_permissions,
        bulk_restore_permissions,
        bulk_permanent_delete_permissions,
    ]
}
