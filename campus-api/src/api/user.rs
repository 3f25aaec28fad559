use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::{json, Json, Value};
use rocket::Route;

use crate::api::{bad_request, conflict, internal, not_found, require_text, ApiError};
use crate::auth::ApiUser;
use crate::models::{User, UserInput, UserWithRoles};
use crate::orm::pagination::{ListParams, Page};
use crate::orm::soft_delete::{RestoreOutcome, SoftDeleteOutcome};
use crate::orm::user as orm;
use crate::orm::DbConn;

fn validate(input: &UserInput) -> Result<(), ApiError> {
    require_text(&input.subject_id, "Subject id")?;
    require_text(&input.name, "Name")?;
    require_text(&input.email, "Email")
}

fn check_roles(
    conn: &mut diesel::SqliteConnection,
    input: &UserInput,
) -> Result<(), ApiError> {
    if let Some(role_ids) = &input.role_ids {
        for &role_id in role_ids {
            if crate::orm::role::get_role_by_id(conn, role_id)
                .map_err(internal)?
                .is_none()
            {
                return Err(bad_request(format!(
                    "Role with id {} does not exist",
                    role_id
                )));
            }
        }
    }
    Ok(())
}

#[get("/users?<page>&<limit>&<search>")]
pub async fn list_users(
    db: DbConn,
    _user: ApiUser,
    page: Option<i64>,
    limit: Option<i64>,
    search: Option<String>,
) -> Result<Json<Page<UserWithRoles>>, ApiError> {
    let params = ListParams::new(page, limit, search);
    db.run(move |conn| orm::list_users(conn, &params))
        .await
        .map(Json)
        .map_err(internal)
}

#[get("/users/deleted?<page>&<limit>&<search>")]
pub async fn list_deleted_users(
    db: DbConn,
    _user: ApiUser,
    page: Option<i64>,
    limit: Option<i64>,
    search: Option<String>,
) -> Result<Json<Page<User>>, ApiError> {
    let params = ListParams::new(page, limit, search);
    db.run(move |conn| orm::list_deleted_users(conn, &params))
        .await
        .map(Json)
        .map_err(internal)
}

#[get("/users/<id>")]
pub async fn get_user(db: DbConn, _user: ApiUser, id: i32) -> Result<Json<UserWithRoles>, ApiError> {
    db.run(move |conn| orm::get_user_with_roles(conn, id))
        .await
        .map_err(internal)?
        .map(Json)
        .ok_or_else(|| not_found(format!("User with id {} not found", id)))
}

#[post("/users", data = "<input>")]
pub async fn create_user(
    db: DbConn,
    _user: ApiUser,
    input: Json<UserInput>,
) -> Result<status::Created<Json<UserWithRoles>>, ApiError> {
    let input = input.into_inner();
    validate(&input)?;
    let created = db
        .run(move |conn| {
            if orm::user_subject_exists(conn, &input.subject_id, None).map_err(internal)? {
                return Err(conflict(format!(
                    "User with subject id '{}' already exists",
                    input.subject_id
                )));
            }
            if orm::user_email_exists(conn, &input.email, None).map_err(internal)? {
                return Err(conflict(format!(
                    "User with email '{}' already exists",
                    input.email
                )));
            }
            check_roles(conn, &input)?;
            orm::insert_user(conn, &input).map_err(internal)
        })
        .await?;
    let location = format!("/api/users/{}", created.user.id);
    Ok(status::Created::new(location).body(Json(created)))
}

#[put("/users/<id>", data = "<input>")]
pub async fn update_user(
    db: DbConn,
    _user: ApiUser,
    id: i32,
    input: Json<UserInput>,
) -> Result<Json<UserWithRoles>, ApiError> {
    let input = input.into_inner();
    validate(&input)?;
    db.run(move |conn| {
        if orm::get_user_by_id(conn, id).map_err(internal)?.is_none() {
            return Err(not_found(format!("User with id {} not found", id)));
        }
        if orm::user_email_exists(conn, &input.email, Some(id)).map_err(internal)? {
            return Err(conflict(format!(
                "User with email '{}' already exists",
                input.email
            )));
        }
        check_roles(conn, &input)?;
        orm::update_user(conn, id, &input).map(Json).map_err(internal)
    })
    .await
}

#[post("/users/soft-delete/<id>")]
pub async fn soft_delete_user(db: DbConn, _user: ApiUser, id: i32) -> Result<Status, ApiError> {
    db.run(move |conn| match orm::soft_delete(conn, id).map_err(internal)? {
        SoftDeleteOutcome::Deleted => Ok(Status::NoContent),
        SoftDeleteOutcome::AlreadyDeleted => {
            Err(conflict(format!("User with id {} is already deleted", id)))
        }
        SoftDeleteOutcome::NotFound => Err(not_found(format!("User with id {} not found", id))),
    })
    .await
}

#[post("/users/restore/<id>")]
pub async fn restore_user(db: DbConn, _user: ApiUser, id: i32) -> Result<Status, ApiError> {
    db.run(move |conn| match orm::restore(conn, id).map_err(internal)? {
        RestoreOutcome::Restored => Ok(Status::NoContent),
        RestoreOutcome::NotDeleted | RestoreOutcome::NotFound => {
            Err(not_found(format!("No deleted user with id {}", id)))
        }
    })
    .await
}

#[delete("/users/permanent-delete/<id>")]
pub async fn permanent_delete_user(
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
        Err(not_found(format!("User with id {} not found", id)))
    }
}

#[post("/users/bulk-soft-delete", data = "<ids>")]
pub async fn bulk_soft_delete_users(
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
        return Err(not_found("No matching users found"));
    }
    Ok(Json(json!({ "softDeleted": count })))
}

#[post("/users/bulk-restore", data = "<ids>")]
pub async fn bulk_restore_users(
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
        return Err(not_found("No matching users found"));
    }
    Ok(Json(json!({ "restored": count })))
}

#[post("/users/bulk-permanent-delete", data = "<ids>")]
pub async fn bulk_permanent_delete_users(
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
        return Err(not_found("No matching users found"));
    }
    Ok(Json(json!({ "permanentlyDeleted": count })))
}

pub fn routes() -> Vec<Route> {
    routes![
        list_users,
        list_deleted_users,
        get_user,
        create_user,
        update_user,
        soft_delete_user,
        restore_user,
        permanent_delete_user,
        bulk_soft_delete_users,
        bulk_restore_users,
        bulk_permanent_delete_users,
    ]
}
