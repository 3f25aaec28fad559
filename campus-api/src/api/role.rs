use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::{json, Json, Value};
use rocket::Route;

use crate::api::{bad_request, conflict, internal, not_found, require_text, ApiError};
use crate::auth::ApiUser;
use crate::models::{Role, RoleDetail, RoleInput};
use crate::orm::pagination::{ListParams, Page};
use crate::orm::role as orm;
use crate::orm::soft_delete::{RestoreOutcome, SoftDeleteOutcome};
use crate::orm::DbConn;

fn check_links(
    conn: &mut diesel::SqliteConnection,
    input: &RoleInput,
) -> Result<(), ApiError> {
    if let Some(permission_ids) = &input.permission_ids {
        for &permission_id in permission_ids {
            if crate::orm::permission::get_permission_by_id(conn, permission_id)
                .map_err(internal)?
                .is_none()
            {
                return Err(bad_request(format!(
                    "Permission with id {} does not exist",
                    permission_id
                )));
            }
        }
    }
    if let Some(menu_ids) = &input.menu_ids {
        for &menu_id in menu_ids {
            if crate::orm::menu::get_menu_by_id(conn, menu_id)
                .map_err(internal)?
                .is_none()
            {
                return Err(bad_request(format!("Menu with id {} does not exist", menu_id)));
            }
        }
    }
    Ok(())
}

#[get("/roles?<page>&<limit>&<search>")]
pub async fn list_roles(
    db: DbConn,
    _user: ApiUser,
    page: Option<i64>,
    limit: Option<i64>,
    search: Option<String>,
) -> Result<Json<Page<RoleDetail>>, ApiError> {
    let params = ListParams::new(page, limit, search);
    db.run(move |conn| orm::list_roles(conn, &params))
        .await
        .map(Json)
        .map_err(internal)
}

#[get("/roles/deleted?<page>&<limit>&<search>")]
pub async fn list_deleted_roles(
    db: DbConn,
    _user: ApiUser,
    page: Option<i64>,
    limit: Option<i64>,
    search: Option<String>,
) -> Result<Json<Page<Role>>, ApiError> {
    let params = ListParams::new(page, limit, search);
    db.run(move |conn| orm::list_deleted_roles(conn, &params))
        .await
        .map(Json)
        .map_err(internal)
}

#[get("/roles/<id>")]
pub async fn get_role(db: DbConn, _user: ApiUser, id: i32) -> Result<Json<RoleDetail>, ApiError> {
    db.run(move |conn| orm::get_role_detail(conn, id))
        .await
        .map_err(internal)?
        .map(Json)
        .ok_or_else(|| not_found(format!("Role with id {} not found", id)))
}

#[post("/roles", data = "<input>")]
pub async fn create_role(
    db: DbConn,
    _user: ApiUser,
    input: Json<RoleInput>,
) -> Result<status::Created<Json<RoleDetail>>, ApiError> {
    let input = input.into_inner();
    require_text(&input.name, "Name")?;
    let created = db
        .run(move |conn| {
            if orm::role_name_exists(conn, &input.name, None).map_err(internal)? {
                return Err(conflict(format!("Role '{}' already exists", input.name)));
            }
            check_links(conn, &input)?;
            orm::insert_role(conn, &input).map_err(internal)
        })
        .await?;
    let location = format!("/api/roles/{}", created.role.id);
    Ok(status::Created::new(location).body(Json(created)))
}

#[put("/roles/<id>", data = "<input>")]
pub async fn update_role(
    db: DbConn,
    _user: ApiUser,
    id: i32,
    input: Json<RoleInput>,
) -> Result<Json<RoleDetail>, ApiError> {
    let input = input.into_inner();
    require_text(&input.name, "Name")?;
    db.run(move |conn| {
        if orm::get_role_by_id(conn, id).map_err(internal)?.is_none() {
            return Err(not_found(format!("Role with id {} not found", id)));
        }
        if orm::role_name_exists(conn, &input.name, Some(id)).map_err(internal)? {
            return Err(conflict(format!("Role '{}' already exists", input.name)));
        }
        check_links(conn, &input)?;
        orm::update_role(conn, id, &input).map(Json).map_err(internal)
    })
    .await
}

#[post("/roles/soft-delete/<id>")]
pub async fn soft_delete_role(db: DbConn, _user: ApiUser, id: i32) -> Result<Status, ApiError> {
    db.run(move |conn| match orm::soft_delete(conn, id).map_err(internal)? {
        SoftDeleteOutcome::Deleted => Ok(Status::NoContent),
        SoftDeleteOutcome::AlreadyDeleted => {
            Err(conflict(format!("Role with id {} is already deleted", id)))
        }
        SoftDeleteOutcome::NotFound => Err(not_found(format!("Role with id {} not found", id))),
    })
    .await
}

#[post("/roles/restore/<id>")]
pub async fn restore_role(db: DbConn, _user: ApiUser, id: i32) -> Result<Status, ApiError> {
    db.run(move |conn| match orm::restore(conn, id).map_err(internal)? {
        RestoreOutcome::Restored => Ok(Status::NoContent),
        RestoreOutcome::NotDeleted | RestoreOutcome::NotFound => {
            Err(not_found(format!("No deleted role with id {}", id)))
        }
    })
    .await
}

#[delete("/roles/permanent-delete/<id>")]
pub async fn permanent_delete_role(
    db: DbConn,
    _user: ApiUser,
    id: i32,
) -> Result<Status, ApiError> {
    db.run(move |conn| {
        if orm::role_is_assigned(conn, id).map_err(internal)? {
            return Err(conflict(format!(
                "Role with id {} is still assigned to users",
                id
            )));
        }
        if orm::permanent_delete(conn, id).map_err(internal)? {
            Ok(Status::NoContent)
        } else {
            Err(not_found(format!("Role with id {} not found", id)))
        }
    })
    .await
}

#[post("/roles/bulk-soft-delete", data = "<ids>")]
pub async fn bulk_soft_delete_roles(
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
        return Err(not_found("No matching roles found"));
    }
    Ok(Json(json!({ "softDeleted": count })))
}

#[post("/roles/bulk-restore", data = "<ids>")]
pub async fn bulk_restore_roles(
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
        return Err(not_found("No matching roles found"));
    }
    Ok(Json(json!({ "restored": count })))
}

#[post("/roles/bulk-permanent-delete", data = "<ids>")]
pub async fn bulk_permanent_delete_roles(
    db: DbConn,
    _user: ApiUser,
    ids: Json<Vec<i32>>,
) -> Result<Json<Value>, ApiError> {
    let ids = ids.into_inner();
    if ids.is_empty() {
        return Err(bad_request("No ids provided"));
    }
    // Assigned roles are skipped, like other ineligible ids.
    let count = db
        .run(move |conn| -> Result<usize, diesel::result::Error> {
            let mut count = 0;
            for id in ids {
                if orm::role_is_assigned(conn, id)? {
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
        return Err(not_found("No matching roles found"));
    }
    Ok(Json(json!({ "permanentlyDeleted": count })))
}

pub fn routes() -> Vec<Route> {
    routes![
        list_roles,
        list_deleted_roles,
        get_role,
        create_role,
        update_role,
        soft_delete_role,
        restore_role,
        permanent_delete_role,
        bulk_soft_delete_roles,
        bulk_restore_roles,
        bulk_permanent_delete_roles,
    ]
}
