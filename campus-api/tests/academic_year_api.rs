use rocket::http::{Header, Status};
use rocket::local::asynchronous::Client;
use serde_json::json;

use campus_api::models::AcademicYear;
use campus_api::orm::testing::{mint_test_token, test_rocket};

fn bearer() -> Header<'static> {
    let token = mint_test_token("test-admin", Some("Test Admin"), Some("admin@example.edu"));
    Header::new("Authorization", format!("Bearer {}", token))
}

async fn create_year(client: &Client, name: &str, start_year: i32) -> AcademicYear {
    let body = json!({
        "name": name,
        "start_date": format!("{}-09-01T00:00:00", start_year),
        "end_date": format!("{}-08-31T00:00:00", start_year + 1),
    });
    let response = client
        .post("/api/academic-years")
        .header(bearer())
        .json(&body)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
    response.into_json().await.expect("valid academic year JSON")
}

#[rocket::async_test]
async fn test_create_get_round_trip_with_location() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");

    let body = json!({
        "name": "2024-2025",
        "start_date": "2024-09-01T00:00:00",
        "end_date": "2025-08-31T00:00:00",
    });
    let response = client
        .post("/api/academic-years")
        .header(bearer())
        .json(&body)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
    let location = response
        .headers()
        .get_one("Location")
        .expect("Location header")
        .to_string();
    let created: AcademicYear = response.into_json().await.expect("valid JSON");
    assert_eq!(location, format!("/api/academic-years/{}", created.id));

    let response = client.get(location.as_str()).header(bearer()).dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let fetched: AcademicYear = response.into_json().await.expect("valid JSON");
    assert_eq!(fetched.name, "2024-2025");
}

#[rocket::async_test]
async fn test_validation_and_duplicate_rules() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    create_year(&client, "2024-2025", 2024).await;

    // Blank name.
    let response = client
        .post("/api/academic-years")
        .header(bearer())
        .json(&json!({
            "name": "  ",
            "start_date": "2024-09-01T00:00:00",
            "end_date": "2025-08-31T00:00:00",
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);

    // Dates out of order.
    let response = client
        .post("/api/academic-years")
        .header(bearer())
        .json(&json!({
            "name": "2026-2027",
            "start_date": "2027-08-31T00:00:00",
            "end_date": "2026-09-01T00:00:00",
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);

    // Duplicate name on create.
    let response = client
        .post("/api/academic-years")
        .header(bearer())
        .json(&json!({
            "name": "2024-2025",
            "start_date": "2024-09-01T00:00:00",
            "end_date": "2025-08-31T00:00:00",
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Conflict);

    // Duplicate name on update of a different row.
    let other = create_year(&client, "2025-2026", 2025).await;
    let response = client
        .put(format!("/api/academic-years/{}", other.id))
        .header(bearer())
        .json(&json!({
            "name": "2024-2025",
            "start_date": "2025-09-01T00:00:00",
            "end_date": "2026-08-31T00:00:00",
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Conflict);

    // Updating a row to its own name is fine.
    let response = client
        .put(format!("/api/academic-years/{}", other.id))
        .header(bearer())
        .json(&json!({
            "name": "2025-2026",
            "start_date": "2025-09-01T00:00:00",
            "end_date": "2026-08-31T00:00:00",
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
}

#[rocket::async_test]
async fn test_soft_delete_round_trip() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let year = create_year(&client, "2024-2025", 2024).await;

    let response = client
        .post(format!("/api/academic-years/soft-delete/{}", year.id))
        .header(bearer())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NoContent);

    // Hidden from get and the live listing.
    let response = client
        .get(format!("/api/academic-years/{}", year.id))
        .header(bearer())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);

    // Second soft delete conflicts.
    let response = client
        .post(format!("/api/academic-years/soft-delete/{}", year.id))
        .header(bearer())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Conflict);

    // Present in the deleted listing.
    let response = client
        .get("/api/academic-years/deleted")
        .header(bearer())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let page: serde_json::Value = response.into_json().await.expect("valid JSON");
    assert_eq!(page["total"], 1);

    // Restore brings it back.
    let response = client
        .post(format!("/api/academic-years/restore/{}", year.id))
        .header(bearer())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NoContent);
    let response = client
        .get(format!("/api/academic-years/{}", year.id))
        .header(bearer())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    // Restoring a live row is a 404.
    let response = client
        .post(format!("/api/academic-years/restore/{}", year.id))
        .header(bearer())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);
}

#[rocket::async_test]
async fn test_bulk_operations_ignore_missing_ids() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let a = create_year(&client, "2020-2021", 2020).await;
    let b = create_year(&client, "2021-2022", 2021).await;

    // Empty body is rejected.
    let response = client
        .post("/api/academic-years/bulk-soft-delete")
        .header(bearer())
        .json(&json!([]))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);

    let response = client
        .post("/api/academic-years/bulk-soft-delete")
        .header(bearer())
        .json(&json!([a.id, b.id, 9999]))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body: serde_json::Value = response.into_json().await.expect("valid JSON");
    assert_eq!(body["softDeleted"], 2);

    // Nothing left to flag.
    let response = client
        .post("/api/academic-years/bulk-soft-delete")
        .header(bearer())
        .json(&json!([a.id, b.id]))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);

    let response = client
        .post("/api/academic-years/bulk-restore")
        .header(bearer())
        .json(&json!([a.id, 9999]))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body: serde_json::Value = response.into_json().await.expect("valid JSON");
    assert_eq!(body["restored"], 1);

    let response = client
        .post("/api/academic-years/bulk-permanent-delete")
        .header(bearer())
        .json(&json!([a.id, b.id, 9999]))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body: serde_json::Value = response.into_json().await.expect("valid JSON");
    assert_eq!(body["permanentlyDeleted"], 2);
}

#[rocket::async_test]
async fn test_list_pagination_and_search() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    for start in 2020..2025 {
        create_year(&client, &format!("{}-{}", start, start + 1), start).await;
    }

    let response = client
        .get("/api/academic-years?page=2&limit=2")
        .header(bearer())
        .dispatch()
        .await;
    let page: serde_json::Value = response.into_json().await.expect("valid JSON");
    assert_eq!(page["total"], 5);
    assert_eq!(page["page"], 2);
    assert_eq!(page["limit"], 2);
    assert_eq!(page["data"].as_array().unwrap().len(), 2);

    // Consecutive pages are disjoint and stitch together into the larger page.
    let names = |page: &serde_json::Value| -> Vec<String> {
        page["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["name"].as_str().unwrap().to_string())
            .collect()
    };
    let response = client
        .get("/api/academic-years?page=1&limit=2")
        .header(bearer())
        .dispatch()
        .await;
    let first = names(&response.into_json().await.expect("valid JSON"));
    let second = names(&page);
    assert!(first.iter().all(|name| !second.contains(name)));
    let response = client
        .get("/api/academic-years?page=1&limit=4")
        .header(bearer())
        .dispatch()
        .await;
    let combined = names(&response.into_json().await.expect("valid JSON"));
    assert_eq!(combined, [first, second].concat());

    let response = client
        .get("/api/academic-years?search=2022")
        .header(bearer())
        .dispatch()
        .await;
    let page: serde_json::Value = response.into_json().await.expect("valid JSON");
    // Substring match hits both 2021-2022 and 2022-2023.
    assert_eq!(page["total"], 2);
}
