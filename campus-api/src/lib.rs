#[macro_use]
extern crate rocket;

use rocket::figment::{
    util::map,
    value::{Map, Value},
};
use rocket::http::Status;
use rocket::request::Request;
use rocket::serde::json::{json, Json, Value as JsonValue};
use rocket::{Build, Rocket};

pub mod api;
pub mod auth;
pub mod models;
pub mod orm;
pub mod schema;

pub use orm::DbConn;

#[catch(400)]
fn bad_request_catcher() -> Json<JsonValue> {
    Json(json!({ "error": "Bad request", "status": 400 }))
}

#[catch(401)]
fn unauthorized_catcher() -> Json<JsonValue> {
    Json(json!({ "error": "Missing or invalid bearer token", "status": 401 }))
}

#[catch(403)]
fn forbidden_catcher() -> Json<JsonValue> {
    Json(json!({ "error": "Account is inactive", "status": 403 }))
}

#[catch(404)]
fn not_found_catcher(req: &Request) -> Json<JsonValue> {
    Json(json!({
        "error": "Not Found",
        "path": req.uri().path().to_string(),
        "status": 404
    }))
}

#[catch(409)]
fn conflict_catcher() -> Json<JsonValue> {
    Json(json!({ "error": "Conflict", "status": 409 }))
}

#[catch(422)]
fn unprocessable_catcher() -> Json<JsonValue> {
    Json(json!({ "error": "Malformed request body", "status": 422 }))
}

#[catch(500)]
fn internal_catcher() -> Json<JsonValue> {
    Json(json!({ "error": "Internal server error", "status": 500 }))
}

#[catch(default)]
fn default_catcher(status: Status, _req: &Request) -> Json<JsonValue> {
    Json(json!({ "error": status.reason_lossy(), "status": status.code }))
}

fn cors_fairing() -> rocket_cors::Cors {
    // Permissive defaults; the frontend origin is not pinned.
    rocket_cors::CorsOptions::default()
        .to_cors()
        .expect("CORS configuration")
}

pub fn mount_api_routes(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket.mount("/api", api::routes())
}

/// Builds the production Rocket instance. `DATABASE_URL` names the SQLite
/// file; the `jwt` figment section configures token verification. Tests use
/// `orm::testing::test_rocket()` instead.
pub fn rocket() -> Rocket<Build> {
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "campus.sqlite".to_string());
    let db_config: Map<_, Value> = map! {
        "url" => database_url.into(),
    };
    let figment = rocket::Config::figment()
        .merge(("databases", map!["sqlite_db" => db_config]));

    let rocket = rocket::custom(figment)
        .attach(DbConn::fairing())
        .attach(orm::set_foreign_keys_fairing())
        .attach(orm::run_migrations_fairing())
        .attach(auth::auth_config_fairing())
        .attach(cors_fairing())
        .register(
            "/",
            catchers![
                bad_request_catcher,
                unauthorized_catcher,
                forbidden_catcher,
                not_found_catcher,
                conflict_catcher,
                unprocessable_catcher,
                internal_catcher,
                default_catcher,
            ],
        );
    mount_api_routes(rocket)
}
