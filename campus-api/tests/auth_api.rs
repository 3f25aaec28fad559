use jsonwebtoken::{encode, EncodingKey, Header as JwtHeader};
use rocket::http::{Header, Status};
use rocket::local::asynchronous::Client;

use campus_api::auth::Claims;
use campus_api::orm::testing::{
    mint_test_token, test_rocket, TEST_JWT_AUDIENCE, TEST_JWT_ISSUER, TEST_JWT_SECRET,
};

fn bearer(token: &str) -> Header<'static> {
    Header::new("Authorization", format!("Bearer {}", token))
}

fn sign(claims: &Claims, secret: &str) -> String {
    encode(
        &JwtHeader::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("test token encoding")
}

fn claims_for(subject: &str) -> Claims {
    Claims {
        sub: subject.to_string(),
        iss: TEST_JWT_ISSUER.to_string(),
        aud: TEST_JWT_AUDIENCE.to_string(),
        exp: chrono::Utc::now().timestamp() + 3600,
        email: Some(format!("{}@example.edu", subject)),
        name: Some("Auth Test".to_string()),
        preferred_username: None,
    }
}

#[rocket::async_test]
async fn test_requests_without_token_are_unauthorized() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");

    let response = client.get("/api/students").dispatch().await;
    assert_eq!(response.status(), Status::Unauthorized);

    let response = client
        .get("/api/students")
        .header(Header::new("Authorization", "Bearer not-a-jwt"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);

    // Non-bearer scheme is rejected too.
    let response = client
        .get("/api/students")
        .header(Header::new("Authorization", "Basic dXNlcjpwYXNz"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);
}

#[rocket::async_test]
async fn test_wrong_audience_issuer_or_key_is_rejected() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");

    let mut claims = claims_for("wrong-aud");
    claims.aud = "some-other-api".to_string();
    let response = client
        .get("/api/students")
        .header(bearer(&sign(&claims, TEST_JWT_SECRET)))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);

    let mut claims = claims_for("wrong-iss");
    claims.iss = "https://somewhere-else.test".to_string();
    let response = client
        .get("/api/students")
        .header(bearer(&sign(&claims, TEST_JWT_SECRET)))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);

    let claims = claims_for("wrong-key");
    let response = client
        .get("/api/students")
        .header(bearer(&sign(&claims, "a-different-secret")))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);

    let mut claims = claims_for("expired");
    claims.exp = chrono::Utc::now().timestamp() - 3600;
    let response = client
        .get("/api/students")
        .header(bearer(&sign(&claims, TEST_JWT_SECRET)))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);
}

#[rocket::async_test]
async fn test_valid_token_provisions_a_user_just_in_time() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let token = mint_test_token("jit-subject", Some("Jit User"), Some("jit@example.edu"));

    let response = client
        .get("/api/users")
        .header(bearer(&token))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let page: serde_json::Value = response.into_json().await.expect("valid JSON");
    assert_eq!(page["total"], 1);
    let user = &page["data"][0];
    assert_eq!(user["subject_id"], "jit-subject");
    assert_eq!(user["name"], "Jit User");
    assert_eq!(user["email"], "jit@example.edu");

    // A second request with the same subject reuses the row.
    let response = client
        .get("/api/users")
        .header(bearer(&token))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let page: serde_json::Value = response.into_json().await.expect("valid JSON");
    assert_eq!(page["total"], 1);
}

#[rocket::async_test]
async fn test_soft_deleted_caller_is_forbidden() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let admin = mint_test_token("admin", Some("Admin"), Some("admin@example.edu"));
    let victim = mint_test_token("victim", Some("Victim"), Some("victim@example.edu"));

    // Provision the victim, then soft-delete their row as the admin.
    let response = client
        .get("/api/students")
        .header(bearer(&victim))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let response = client
        .get("/api/users?search=victim")
        .header(bearer(&admin))
        .dispatch()
        .await;
    let page: serde_json::Value = response.into_json().await.expect("valid JSON");
    let victim_id = page["data"][0]["id"].as_i64().expect("victim id");

    let response = client
        .post(format!("/api/users/soft-delete/{}", victim_id))
        .header(bearer(&admin))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NoContent);

    let response = client
        .get("/api/students")
        .header(bearer(&victim))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Forbidden);
}
