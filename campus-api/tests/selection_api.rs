use rocket::http::{Header, Status};
use rocket::local::asynchronous::Client;
use serde_json::json;

use campus_api::orm::testing::{mint_test_token, test_rocket};

fn bearer() -> Header<'static> {
    let token = mint_test_token("test-admin", Some("Test Admin"), Some("admin@example.edu"));
    Header::new("Authorization", format!("Bearer {}", token))
}

async fn created_id(client: &Client, path: &str, body: serde_json::Value) -> i64 {
    let response = client
        .post(path)
        .header(bearer())
        .json(&body)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created, "POST {}", path);
    let created: serde_json::Value = response.into_json().await.expect("valid JSON");
    created["id"].as_i64().expect("created id")
}

#[rocket::async_test]
async fn test_selections_require_authentication() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let response = client.get("/api/selections/departments").dispatch().await;
    assert_eq!(response.status(), Status::Unauthorized);
}

#[rocket::async_test]
async fn test_department_options_use_name_and_code_label() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let id = created_id(
        &client,
        "/api/departments",
        json!({ "name": "Engineering", "code": "ENG", "parent_department_id": null }),
    )
    .await;

    let response = client
        .get("/api/selections/departments")
        .header(bearer())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let options: serde_json::Value = response.into_json().await.expect("valid JSON");
    assert_eq!(options[0]["id"].as_i64(), Some(id));
    assert_eq!(options[0]["name"], "Engineering (ENG)");
}

#[rocket::async_test]
async fn test_options_filter_by_search_and_hide_soft_deleted() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    created_id(
        &client,
        "/api/academic-years",
        json!({
            "name": "2023-2024",
            "start_date": "2023-09-01T00:00:00",
            "end_date": "2024-08-31T00:00:00",
        }),
    )
    .await;
    let later = created_id(
        &client,
        "/api/academic-years",
        json!({
            "name": "2024-2025",
            "start_date": "2024-09-01T00:00:00",
            "end_date": "2025-08-31T00:00:00",
        }),
    )
    .await;

    let response = client
        .get("/api/selections/academic-years?search=2023")
        .header(bearer())
        .dispatch()
        .await;
    let options: serde_json::Value = response.into_json().await.expect("valid JSON");
    assert_eq!(options.as_array().unwrap().len(), 1);
    assert_eq!(options[0]["name"], "2023-2024");

    let response = client
        .post(format!("/api/academic-years/soft-delete/{}", later))
        .header(bearer())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NoContent);

    let response = client
        .get("/api/selections/academic-years")
        .header(bearer())
        .dispatch()
        .await;
    let options: serde_json::Value = response.into_json().await.expect("valid JSON");
    assert_eq!(options.as_array().unwrap().len(), 1);
}

#[rocket::async_test]
async fn test_permission_options_group_by_module() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    for (name, module) in [
        ("users:create", "UserManagement"),
        ("users:delete", "UserManagement"),
        ("reports:view", "Reporting"),
    ] {
        created_id(
            &client,
            "/api/permissions",
            json!({ "name": name, "module": module, "description": null }),
        )
        .await;
    }

    let response = client
        .get("/api/selections/permissions")
        .header(bearer())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let groups: serde_json::Value = response.into_json().await.expect("valid JSON");
    let groups = groups.as_array().unwrap();
    assert_eq!(groups.len(), 2);
    // Modules come back in alphabetical order.
    assert_eq!(groups[0]["module"], "Reporting");
    assert_eq!(groups[1]["module"], "UserManagement");
    let user_perms = groups[1]["permissions"].as_array().unwrap();
    assert_eq!(user_perms.len(), 2);
    assert_eq!(user_perms[0]["description"], "UserManagement.users:create");
}
