use rocket::http::{Header, Status};
use rocket::local::asynchronous::Client;
use serde_json::json;

use campus_api::orm::testing::{mint_test_token, test_rocket};

fn bearer() -> Header<'static> {
    let token = mint_test_token("test-admin", Some("Test Admin"), Some("admin@example.edu"));
    Header::new("Authorization", format!("Bearer {}", token))
}

struct Fixture {
    student_id: i64,
    partner_id: i64,
    academic_year_id: i64,
    semester_id: i64,
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

/// Seeds one row in each table an internship references.
async fn seed(client: &Client) -> Fixture {
    let academic_year_id = created_id(
        client,
        "/api/academic-years",
        json!({
            "name": "2024-2025",
            "start_date": "2024-09-01T00:00:00",
            "end_date": "2025-08-31T00:00:00",
        }),
    )
    .await;
    let semester_id = created_id(
        client,
        "/api/semesters",
        json!({
            "name": "Fall",
            "academic_year_id": academic_year_id,
            "start_date": "2024-09-01T00:00:00",
            "end_date": "2025-01-15T00:00:00",
        }),
    )
    .await;
    let student_id = created_id(
        client,
        "/api/students",
        json!({
            "student_code": "SV001",
            "full_name": "Alice Nguyen",
            "date_of_birth": "2003-04-12T00:00:00",
            "email": "alice@example.edu",
            "phone_number": null,
            "department_id": null,
        }),
    )
    .await;
    let partner_id = created_id(
        client,
        "/api/partners",
        json!({
            "name": "Acme Corp",
            "description": null,
            "address": "1 Main St",
            "website": null,
            "phone_number": "555-0100",
            "contact_person": null,
            "email": "hr@acme.example",
        }),
    )
    .await;
    Fixture {
        student_id,
        partner_id,
        academic_year_id,
        semester_id,
    }
}

fn internship_body(fx: &Fixture) -> serde_json::Value {
    json!({
        "student_id": fx.student_id,
        "partner_id": fx.partner_id,
        "academic_year_id": fx.academic_year_id,
        "semester_id": fx.semester_id,
        "report_url": "https://reports.example/alice.pdf",
        "grade": 8.5,
    })
}

#[rocket::async_test]
async fn test_create_returns_related_rows() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let fx = seed(&client).await;

    let response = client
        .post("/api/internships")
        .header(bearer())
        .json(&internship_body(&fx))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
    let detail: serde_json::Value = response.into_json().await.expect("valid JSON");
    assert_eq!(detail["student"]["full_name"], "Alice Nguyen");
    assert_eq!(detail["partner"]["name"], "Acme Corp");
    assert_eq!(detail["academic_year"]["name"], "2024-2025");
    assert_eq!(detail["semester"]["name"], "Fall");
    assert_eq!(detail["grade"], 8.5);
}

#[rocket::async_test]
async fn test_missing_references_are_rejected_without_persisting() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let fx = seed(&client).await;

    let mut body = internship_body(&fx);
    body["partner_id"] = json!(9999);
    let response = client
        .post("/api/internships")
        .header(bearer())
        .json(&body)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
    let error: serde_json::Value = response.into_json().await.expect("valid JSON");
    assert_eq!(error["error"], "Partner with id 9999 does not exist");

    // The failed create left no row behind.
    let response = client.get("/api/internships").header(bearer()).dispatch().await;
    let page: serde_json::Value = response.into_json().await.expect("valid JSON");
    assert_eq!(page["total"], 0);
}

#[rocket::async_test]
async fn test_grade_bounds() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let fx = seed(&client).await;

    for bad_grade in [-0.5, 10.5] {
        let mut body = internship_body(&fx);
        body["grade"] = json!(bad_grade);
        let response = client
            .post("/api/internships")
            .header(bearer())
            .json(&body)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);
    }

    // An ungraded internship is fine.
    let mut body = internship_body(&fx);
    body["grade"] = json!(null);
    let response = client
        .post("/api/internships")
        .header(bearer())
        .json(&body)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
}

#[rocket::async_test]
async fn test_duplicate_slot_rule_and_freed_slot_after_soft_delete() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let fx = seed(&client).await;

    let first = created_id(&client, "/api/internships", internship_body(&fx)).await;

    // Same student, year and semester again is a conflict, even at another
    // partner.
    let other_partner = created_id(
        &client,
        "/api/partners",
        json!({
            "name": "Globex",
            "description": null,
            "address": "2 Side St",
            "website": null,
            "phone_number": "555-0101",
            "contact_person": null,
            "email": "hr@globex.example",
        }),
    )
    .await;
    let mut body = internship_body(&fx);
    body["partner_id"] = json!(other_partner);
    let response = client
        .post("/api/internships")
        .header(bearer())
        .json(&body)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Conflict);

    // Soft-deleting the first frees the slot.
    let response = client
        .post(format!("/api/internships/soft-delete/{}", first))
        .header(bearer())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NoContent);

    let response = client
        .post("/api/internships")
        .header(bearer())
        .json(&body)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
}

#[rocket::async_test]
async fn test_detail_survives_partner_soft_delete() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let fx = seed(&client).await;
    let id = created_id(&client, "/api/internships", internship_body(&fx)).await;

    let response = client
        .post(format!("/api/partners/soft-delete/{}", fx.partner_id))
        .header(bearer())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NoContent);

    let response = client
        .get(format!("/api/internships/{}", id))
        .header(bearer())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let detail: serde_json::Value = response.into_json().await.expect("valid JSON");
    assert_eq!(detail["partner"]["name"], "Acme Corp");
}
