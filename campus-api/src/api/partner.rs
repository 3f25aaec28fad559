use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::{json, Json, Value};
use rocket::Route;

use crate::api::{bad_request, conflict, internal, not_found, require_text, ApiError};
use crate::auth::ApiUser;
use crate::models::{Partner, PartnerInput};
use crate::orm::pagination::{ListParams, Page};
use crate::orm::partner as orm;
use crate::orm::soft_delete::{RestoreOutcome, SoftDeleteOutcome};
use crate::orm::DbConn;

fn validate(input: &PartnerInput) -> Result<(), ApiError> {
    require_text(&input.name, "Name")?;
    require_text(&input.address, "Address")?;
    require_text(&input.phone_number, "Phone number")?;
    require_text(&input.email, "Email")
}

#[get("/partners?<page>&<limit>&<search>")]
pub async fn list_partners(
    db: DbConn,
    _user: ApiUser,
    page: Option<i64>,
    limit: Option<i64>,
    search: Option<String>,
) -> Result<Json<Page<Partner>>, ApiError> {
    let params = ListParams::new(page, limit, search);
    db.run(move |conn| orm::list_partners(conn, &params))
        .await
        .map(Json)
        .map_err(internal)
}

#[get("/partners/deleted?<page>&<limit>&<search>")]
pub async fn list_deleted_partners(
    db: DbConn,
    _user: ApiUser,
    page: Option<i64>,
    limit: Option<i64>,
    search: Option<String>,
) -> Result<Json<Page<Partner>>, ApiError> {
    let params = ListParams::new(page, limit, search);
    db.run(move |conn| orm::list_deleted_partners(conn, &params))
        .await
        .map(Json)
        .map_err(internal)
}

#[get("/partners/<id>")]
pub async fn get_partner(db: DbConn, _user: ApiUser, id: i32) -> Result<Json<Partner>, ApiError> {
    db.run(move |conn| orm::get_partner_by_id(conn, id))
        .await
        .map_err(internal)?
        .map(Json)
        .ok_or_else(|| not_found(format!("Partner with id {} not found", id)))
}

#[post("/partners", data = "<input>")]
pub async fn create_partner(
    db: DbConn,
    _user: ApiUser,
    input: Json<PartnerInput>,
) -> Result<status::Created<Json<Partner>>, ApiError> {
    let input = input.into_inner();
    validate(&input)?;
    let partner = db
        .run(move |conn| orm::insert_partner(conn, &input))
        .await
        .map_err(internal)?;
    let location = format!("/api/partners/{}", partner.id);
    Ok(status::Created::new(location).body(Json(partner)))
}

#[put("/partners/<id>", data = "<input>")]
pub async fn update_partner(
    db: DbConn,
    _user: ApiUser,
    id: i32,
    input: Json<PartnerInput>,
) -> Result<Json<Partner>, ApiError> {
    let input = input.into_inner();
    validate(&input)?;
    db.run(move |conn| {
        if orm::get_partner_by_id(conn, id).map_err(internal)?.is_none() {
            return Err(not_found(format!("Partner with id {} not found", id)));
        }
        orm::update_partner(conn, id, &input).map(Json).map_err(internal)
    })
    .await
}

#[post("/partners/soft-delete/<id>")]
pub async fn soft_delete_partner(db: DbConn, _user: ApiUser, id: i32) -> Result<Status, ApiError> {
    db.run(move |conn| match orm::soft_delete(conn, id).map_err(internal)? {
        SoftDeleteOutcome::Deleted => Ok(Status::NoContent),
        SoftDeleteOutcome::AlreadyDeleted => Err(conflict(format!(
            "Partner with id {} is already deleted",
            id
        ))),
        SoftDeleteOutcome::NotFound => Err(not_found(format!("Partner with id {} not found", id))),
    })
    .await
}

#[post("/partners/restore/<id>")]
pub async fn restore_partner(db: DbConn, _user: ApiUser, id: i32) -> Result<Status, ApiError> {
    db.run(move |conn| match orm::restore(conn, id).map_err(internal)? {
        RestoreOutcome::Restored => Ok(Status::NoContent),
        RestoreOutcome::NotDeleted | RestoreOutcome::NotFound => {
            Err(not_found(format!("No deleted partner with id {}", id)))
        }
    })
    .await
}

#[delete("/partners/permanent-delete/<id>")]
pub async fn permanent_delete_partner(
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
        Err(not_found(format!("Partner with id {} not found", id)))
    }
}

#[post("/partners/bulk-soft-delete", data = "<ids>")]
pub async fn bulk_soft_delete_partners(
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
        return Err(not_found("No matching partners found"));
    }
    Ok(Json(json!({ "softDeleted": count })))
}

#[post("/partners/bulk-restore", data = "<ids>")]
pub async fn bulk_restore_partners(
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
        return Err(not_found("No matching partners found"));
    }
    Ok(Json(json!({ "restored": count })))
}

#[post("/partners/bulk-permanent-delete", data = "<ids>")]
pub async fn bulk_permanent_delete_partners(
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
        return Err(not_found("No matching partners found"));
    }
    Ok(Json(json!({ "permanentlyDeleted": count })))
}

pub fn routes() -> Vec<Route> {
    routes![
        list_partners,
        list_deleted_partners,
        get_partner,
        create_partner,
        update_partner,
        soft_delete_partner,
        restore_partner,
        permanent_delete_partner,
        bulk_soft_delete_partners,
        bulk_restore_partners,
        bulk_permanent_delete_partners,
    ]
}
