use rocket::http::{Header, Status};
use rocket::local::asynchronous::Client;
use serde_json::json;

use campus_api::orm::testing::{mint_test_token, test_rocket};

fn bearer() -> Header<'static> {
    let token = mint_test_token("test-admin", Some("Test Admin"), Some("admin@example.edu"));
    Header::new("Authorization", format!("Bearer {}", token))
}

async fn created(client: &Client, path: &str, body: serde_json::Value) -> serde_json::Value {
    let response = client
        .post(path)
        .header(bearer())
        .json(&body)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created, "POST {}", path);
    response.into_json().await.expect("valid JSON")
}

#[rocket::async_test]
async fn test_role_create_links_permissions_and_menus() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let permission = created(
        &client,
        "/api/permissions",
        json!({ "name": "users:create", "module": "UserManagement", "description": null }),
    )
    .await;
    let menu = created(
        &client,
        "/api/menus",
        json!({
            "name": "Users",
            "path": "/users",
            "icon": null,
            "parent_id": null,
            "display_order": 1,
        }),
    )
    .await;

    let role = created(
        &client,
        "/api/roles",
        json!({
            "name": "Admin",
            "description": "Full access",
            "permission_ids": [permission["id"]],
            "menu_ids": [menu["id"]],
        }),
    )
    .await;
    assert_eq!(role["permissions"][0]["name"], "users:create");
    assert_eq!(role["menus"][0]["path"], "/users");

    // Linking an unknown permission is rejected.
    let response = client
        .post("/api/roles")
        .header(bearer())
        .json(&json!({
            "name": "Broken",
            "description": null,
            "permission_ids": [9999],
            "menu_ids": null,
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
}

#[rocket::async_test]
async fn test_role_name_conflicts_and_freed_name_after_soft_delete() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let role = created(
        &client,
        "/api/roles",
        json!({ "name": "Admin", "description": null, "permission_ids": null, "menu_ids": null }),
    )
    .await;

    let response = client
        .post("/api/roles")
        .header(bearer())
        .json(&json!({ "name": "Admin", "description": null, "permission_ids": null, "menu_ids": null }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Conflict);

    // Soft-deleting the role frees its name.
    let response = client
        .post(format!("/api/roles/soft-delete/{}", role["id"]))
        .header(bearer())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NoContent);
    let response = client
        .post("/api/roles")
        .header(bearer())
        .json(&json!({ "name": "Admin", "description": null, "permission_ids": null, "menu_ids": null }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
}

#[rocket::async_test]
async fn test_assigned_role_cannot_be_permanently_deleted() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let role = created(
        &client,
        "/api/roles",
        json!({ "name": "Staff", "description": null, "permission_ids": null, "menu_ids": null }),
    )
    .await;
    let user = created(
        &client,
        "/api/users",
        json!({
            "subject_id": "manual-user",
            "name": "Manual User",
            "email": "manual@example.edu",
            "avatar_url": null,
            "is_active": true,
            "role_ids": [role["id"]],
        }),
    )
    .await;
    assert_eq!(user["roles"][0]["name"], "Staff");

    let response = client
        .delete(format!("/api/roles/permanent-delete/{}", role["id"]))
        .header(bearer())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Conflict);

    // Dropping the assignment clears the way.
    let response = client
        .put(format!("/api/users/{}", user["id"]))
        .header(bearer())
        .json(&json!({
            "subject_id": "manual-user",
            "name": "Manual User",
            "email": "manual@example.edu",
            "avatar_url": null,
            "is_active": true,
            "role_ids": [],
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let response = client
        .delete(format!("/api/roles/permanent-delete/{}", role["id"]))
        .header(bearer())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NoContent);
}

#[rocket::async_test]
async fn test_user_duplicate_subject_and_email() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    created(
        &client,
        "/api/users",
        json!({
            "subject_id": "subject-1",
            "name": "First",
            "email": "first@example.edu",
            "avatar_url": null,
            "is_active": true,
            "role_ids": null,
        }),
    )
    .await;

    let response = client
        .post("/api/users")
        .header(bearer())
        .json(&json!({
            "subject_id": "subject-1",
            "name": "Other",
            "email": "other@example.edu",
            "avatar_url": null,
            "is_active": true,
            "role_ids": null,
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Conflict);

    let response = client
        .post("/api/users")
        .header(bearer())
        .json(&json!({
            "subject_id": "subject-2",
            "name": "Other",
            "email": "first@example.edu",
            "avatar_url": null,
            "is_active": true,
            "role_ids": null,
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Conflict);
}

#[rocket::async_test]
async fn test_referenced_permission_cannot_be_permanently_deleted() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let permission = created(
        &client,
        "/api/permissions",
        json!({ "name": "users:create", "module": "UserManagement", "description": null }),
    )
    .await;
    created(
        &client,
        "/api/roles",
        json!({
            "name": "Admin",
            "description": null,
            "permission_ids": [permission["id"]],
            "menu_ids": null,
        }),
    )
    .await;

    let response = client
        .delete(format!("/api/permissions/permanent-delete/{}", permission["id"]))
        .header(bearer())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Conflict);
}
