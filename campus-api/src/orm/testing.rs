//! Test plumbing: in-memory databases and a fully wired Rocket instance
//! with a known JWT signing secret.

use diesel::connection::SimpleConnection;
use diesel::sqlite::SqliteConnection;
use jsonwebtoken::{encode, EncodingKey, Header};
use rocket::fairing::AdHoc;
use rocket::figment::{
    util::map,
    value::{Map, Value},
};
use rocket::{Build, Rocket};
use rocket_sync_db_pools::diesel;

use super::db::{run_pending_migrations, set_foreign_keys, DbConn};
use crate::auth::Claims;

pub const TEST_JWT_ISSUER: &str = "https://issuer.test";
pub const TEST_JWT_AUDIENCE: &str = "campus-api";
pub const TEST_JWT_SECRET: &str = "test-secret-not-for-production";

/// Faster but non-durable SQLite settings, for tests only.
fn set_sqlite_test_pragmas(conn: &mut diesel::SqliteConnection) {
    conn.batch_execute(
        r#"
        PRAGMA synchronous = OFF;
        PRAGMA journal_mode = OFF;
        "#,
    )
    .expect("Failed to set SQLite PRAGMAs");
}

fn set_sqlite_test_pragmas_fairing() -> AdHoc {
    AdHoc::on_ignite("Set SQLite Test Pragmas", |rocket| async {
        let conn = DbConn::get_one(&rocket)
            .await
            .expect("database connection for migration");
        conn.run(|c| {
            set_sqlite_test_pragmas(c);
        })
        .await;
        rocket
    })
}

/// A Rocket instance backed by a unique in-memory SQLite database, with
/// migrations run, the test JWT secret configured and all API routes
/// mounted.
pub fn test_rocket() -> Rocket<Build> {
    use uuid::Uuid;

    // Shared-cache keeps the database alive across the pool's connections.
    let unique_db_name = format!("file:test_db_{}?mode=memory&cache=shared", Uuid::new_v4());

    let db_config: Map<_, Value> = map! {
        "url" => unique_db_name.into(),
        "pool_size" => 5.into(),
        "timeout" => 5.into(),
    };
    let jwt_config: Map<_, Value> = map! {
        "issuer" => TEST_JWT_ISSUER.into(),
        "audience" => TEST_JWT_AUDIENCE.into(),
        "hs256_secret" => TEST_JWT_SECRET.into(),
    };

    let figment = rocket::Config::figment()
        .merge(("databases", map!["sqlite_db" => db_config]))
        .merge(("jwt", jwt_config));

    let rocket = rocket::custom(figment)
        .attach(DbConn::fairing())
        .attach(super::db::set_foreign_keys_fairing())
        .attach(set_sqlite_test_pragmas_fairing())
        .attach(super::db::run_migrations_fairing())
        .attach(crate::auth::auth_config_fairing());
    crate::mount_api_routes(rocket)
}

/// Signs an HS256 token accepted by [`test_rocket`]'s instances.
pub fn mint_test_token(subject: &str, name: Option<&str>, email: Option<&str>) -> String {
    let claims = Claims {
        sub: subject.to_string(),
        iss: TEST_JWT_ISSUER.to_string(),
        aud: TEST_JWT_AUDIENCE.to_string(),
        exp: chrono::Utc::now().timestamp() + 3600,
        email: email.map(|s| s.to_string()),
        name: name.map(|s| s.to_string()),
        preferred_username: None,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("test token encoding")
}

/// A synchronous in-memory database with migrations applied, independent per
/// call. For direct Diesel queries in unit tests.
pub fn setup_test_db() -> SqliteConnection {
    use diesel::Connection;

    let mut conn = SqliteConnection::establish(":memory:")
        .expect("Failed to create in-memory SQLite database");
    set_foreign_keys(&mut conn);
    run_pending_migrations(&mut conn);
    conn
}
