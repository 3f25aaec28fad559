use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::{json, Json, Value};
use rocket::Route;

use crate::api::{bad_request, conflict, internal, not_found, require_text, ApiError};
use crate::auth::ApiUser;
use crate::models::{Menu, MenuInput, MenuNode};
use crate::orm::menu as orm;
use crate::orm::pagination::{ListParams, Page};
use crate::orm::soft_delete::{RestoreOutcome, SoftDeleteOutcome};
use crate::orm::DbConn;

fn validate(input: &MenuInput) -> Result<(), ApiError> {
    require_text(&input.name, "Name")?;
    require_text(&input.path, "Path")
}

fn check_parent(
    conn: &mut diesel::SqliteConnection,
    input: &MenuInput,
    own_id: Option<i32>,
) -> Result<(), ApiError> {
    let parent_id = match input.parent_id {
        Some(parent_id) => parent_id,
        None => return Ok(()),
    };
    if own_id == Some(parent_id) {
        return Err(bad_request("A menu cannot be its own parent"));
    }
    if orm::get_menu_by_id(conn, parent_id).map_err(internal)?.is_none() {
        return Err(bad_request(format!("Menu with id {} does not exist", parent_id)));
    }
    Ok(())
}

#[get("/menus?<page>&<limit>&<search>")]
pub async fn list_menus(
    db: DbConn,
    _user: ApiUser,
    page: Option<i64>,
    limit: Option<i64>,
    search: Option<String>,
) -> Result<Json<Page<MenuNode>>, ApiError> {
    let params = ListParams::new(page, limit, search);
    db.run(move |conn| orm::list_menu_tree(conn, &params))
        .await
        .map(Json)
        .map_err(internal)
}

#[get("/menus/deleted?<page>&<limit>&<search>")]
pub async fn list_deleted_menus(
    db: DbConn,
    _user: ApiUser,
    page: Option<i64>,
    limit: Option<i64>,
    search: Option<String>,
) -> Result<Json<Page<Menu>>, ApiError> {
    let params = ListParams::new(page, limit, search);
    db.run(move |conn| orm::list_deleted_menus(conn, &params))
        .await
        .map(Json)
        .map_err(internal)
}

#[get("/menus/<id>")]
pub async fn get_menu(db: DbConn, _user: ApiUser, id: i32) -> Result<Json<Menu>, ApiError> {
    db.run(move |conn| orm::get_menu_by_id(conn, id))
        .await
        .map_err(internal)?
        .map(Json)
        .ok_or_else(|| not_found(format!("Menu with id {} not found", id)))
}

#[post("/menus", data = "<input>")]
pub async fn create_menu(
    db: DbConn,
    _user: ApiUser,
    input: Json<MenuInput>,
) -> Result<status::Created<Json<Menu>>, ApiError> {
    let input = input.into_inner();
    validate(&input)?;
    let menu = db
        .run(move |conn| {
            check_parent(conn, &input, None)?;
            orm::insert_menu(conn, &input).map_err(internal)
        })
        .await?;
    let location = format!("/api/menus/{}", menu.id);
    Ok(status::Created::new(location).body(Json(menu)))
}

#[put("/menus/<id>", data = "<input>")]
pub async fn update_menu(
    db: DbConn,
    _user: ApiUser,
    id: i32,
    input: Json<MenuInput>,
) -> Result<Json<Menu>, ApiError> {
    let input = input.into_inner();
    validate(&input)?;
    db.run(move |conn| {
        if orm::get_menu_by_id(conn, id).map_err(internal)?.is_none() {
            return Err(not_found(format!("Menu with id {} not found", id)));
        }
        check_parent(conn, &input, Some(id))?;
        orm::update_menu(conn, id, &input).map(Json).map_err(internal)
    })
    .await
}

#[post("/menus/soft-delete/<id>")]
pub async fn soft_delete_menu(db: DbConn, _user: ApiUser, id: i32) -> Result<Status, ApiError> {
    db.run(move |conn| {
        if orm::has_live_children(conn, id).map_err(internal)? {
            return Err(conflict(format!(
                "Menu with id {} still has child menus",
                id
            )));
        }
        match orm::soft_delete(conn, id).map_err(internal)? {
            SoftDeleteOutcome::Deleted => Ok(Status::NoContent),
            SoftDeleteOutcome::AlreadyDeleted => {
                Err(conflict(format!("Menu with id {} is already deleted", id)))
            }
            SoftDeleteOutcome::NotFound => Err(not_found(format!("Menu with id {} not found", id))),
        }
    })
    .await
}

#[post("/menus/restore/<id>")]
pub async fn restore_menu(db: DbConn, _user: ApiUser, id: i32) -> Result<Status, ApiError> {
    db.run(move |conn| match orm::restore(conn, id).map_err(internal)? {
        RestoreOutcome::Restored => Ok(Status::NoContent),
        RestoreOutcome::NotDeleted | RestoreOutcome::NotFound => {
            Err(not_found(format!("No deleted menu with id {}", id)))
        }
    })
    .await
}

#[delete("/menus/permanent-delete/<id>")]
pub async fn permanent_delete_menu(
    db: DbConn,
    _user: ApiUser,
    id: i32,
) -> Result<Status, ApiError> {
    db.run(move |conn| {
        if orm::has_any_children(conn, id).map_err(internal)? {
            return Err(conflict(format!(
                "Menu with id {} still has child menus",
                id
            )));
        }
        if orm::permanent_delete(conn, id).map_err(internal)? {
            Ok(Status::NoContent)
        } else {
            Err(not_found(format!("Menu with id {} not found", id)))
        }
    })
    .await
}

#[post("/menus/bulk-soft-delete", data = "<ids>")]
pub async fn bulk_soft_delete_menus(
    db: DbConn,
    _user: ApiUser,
    ids: Json<Vec<i32>>,
) -> Result<Json<Value>, ApiError> {
    let ids = ids.into_inner();
    if ids.is_empty() {
        return Err(bad_request("No ids provided"));
    }
    // Menus with live children are skipped, like other ineligible ids.
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
        return Err(not_found("No matching menus found"));
    }
    Ok(Json(json!({ "softDeleted": count })))
}

#[post("/menus/bulk-restore", data = "<ids>")]
pub async fn bulk_restore_menus(
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
        return Err(not_found("No matching menus found"));
    }
    Ok(Json(json!({ "restored": count })))
}

#[post("/menus/bulk-permanent-delete", data = "<ids>")]
pub async fn bulk_permanent_delete_menus(
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
        return Err(not_found("No matching menus found"));
    }
    Ok(Json(json!({ "permanentlyDeleted": count })))
}

pub fn routes() -> Vec<Route> {
    routes![
        list_menus,
        list_deleted_menus,
        get_menu,
        create_menu,
        update_menu,
        soft_delete_menu,
        restore_menu,
        permanent_delete_menu,
        bulk_soft_delete_menus,
        bulk_restore_menus,
        bulk_permanent_delete_menus,
    ]
}
