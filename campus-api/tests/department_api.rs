use rocket::http::{Header, Status};
use rocket::local::asynchronous::Client;
use serde_json::json;

use campus_api::orm::testing::{mint_test_token, test_rocket};

fn bearer() -> Header<'static> {
    let token = mint_test_token("test-admin", Some("Test Admin"), Some("admin@example.edu"));
    Header::new("Authorization", format!("Bearer {}", token))
}

async fn create_department(
    client: &Client,
    name: &str,
    code: &str,
    parent: Option<i64>,
) -> i64 {
    let response = client
        .post("/api/departments")
        .header(bearer())
        .json(&json!({
            "name": name,
            "code": code,
            "parent_department_id": parent,
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
    let created: serde_json::Value = response.into_json().await.expect("valid JSON");
    created["id"].as_i64().expect("created id")
}

#[rocket::async_test]
async fn test_listing_groups_children_under_roots() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let faculty = create_department(&client, "Engineering", "ENG", None).await;
    create_department(&client, "Software", "SWE", Some(faculty)).await;
    create_department(&client, "Civil", "CIV", Some(faculty)).await;

    let response = client.get("/api/departments").header(bearer()).dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let page: serde_json::Value = response.into_json().await.expect("valid JSON");
    // Only roots are counted; children ride along on their parent.
    assert_eq!(page["total"], 1);
    let root = &page["data"][0];
    assert_eq!(root["name"], "Engineering");
    assert_eq!(root["children"].as_array().unwrap().len(), 2);
}

#[rocket::async_test]
async fn test_detail_includes_parent_and_children() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let faculty = create_department(&client, "Engineering", "ENG", None).await;
    let software = create_department(&client, "Software", "SWE", Some(faculty)).await;

    let response = client
        .get(format!("/api/departments/{}", software))
        .header(bearer())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let detail: serde_json::Value = response.into_json().await.expect("valid JSON");
    assert_eq!(detail["parent"]["code"], "ENG");
    assert_eq!(detail["children"].as_array().unwrap().len(), 0);
}

#[rocket::async_test]
async fn test_parent_validation() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let faculty = create_department(&client, "Engineering", "ENG", None).await;

    // Unknown parent.
    let response = client
        .post("/api/departments")
        .header(bearer())
        .json(&json!({ "name": "Ghost", "code": "GH", "parent_department_id": 9999 }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);

    // A department cannot be its own parent.
    let response = client
        .put(format!("/api/departments/{}", faculty))
        .header(bearer())
        .json(&json!({ "name": "Engineering", "code": "ENG", "parent_department_id": faculty }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
}

#[rocket::async_test]
async fn test_delete_is_rejected_while_children_exist() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let faculty = create_department(&client, "Engineering", "ENG", None).await;
    let software = create_department(&client, "Software", "SWE", Some(faculty)).await;

    let response = client
        .post(format!("/api/departments/soft-delete/{}", faculty))
        .header(bearer())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Conflict);

    // Soft-deleting the child clears the way for the parent's soft delete.
    let response = client
        .post(format!("/api/departments/soft-delete/{}", software))
        .header(bearer())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NoContent);
    let response = client
        .post(format!("/api/departments/soft-delete/{}", faculty))
        .header(bearer())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NoContent);

    // Permanent delete still sees the soft-deleted child row.
    let response = client
        .delete(format!("/api/departments/permanent-delete/{}", faculty))
        .header(bearer())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Conflict);

    let response = client
        .delete(format!("/api/departments/permanent-delete/{}", software))
        .header(bearer())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NoContent);
    let response = client
        .delete(format!("/api/departments/permanent-delete/{}", faculty))
        .header(bearer())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NoContent);
}

#[rocket::async_test]
async fn test_bulk_soft_delete_skips_departments_with_children() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let faculty = create_department(&client, "Engineering", "ENG", None).await;
    let software = create_department(&client, "Software", "SWE", Some(faculty)).await;
    let lone = create_department(&client, "Library", "LIB", None).await;

    let response = client
        .post("/api/departments/bulk-soft-delete")
        .header(bearer())
        .json(&json!([faculty, software, lone]))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body: serde_json::Value = response.into_json().await.expect("valid JSON");
    // The parent is skipped while its child is live at the time it is visited.
    assert_eq!(body["softDeleted"], 2);
}
