mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{send, setup_app};

#[tokio::test]
async fn test_enrollment_lifecycle_end_to_end() {
    let app = setup_app().await;

    let (status, student) = send(
        &app,
        "POST",
        "/students",
        Some(json!({"national_id": "12345", "name": "Ana", "email": "a@x.com", "semester": 3})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let student_id = student["id"].as_i64().expect("student id assigned");
    assert!(student.get("is_deleted").is_none());

    let (status, course) = send(
        &app,
        "POST",
        "/courses",
        Some(json!({"code": "CS101", "name": "Intro", "credits": 3})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let course_id = course["id"].as_i64().expect("course id assigned");
    assert_eq!(course["schedule"], "");

    let (status, enrollment) = send(
        &app,
        "POST",
        "/enrollments",
        Some(json!({"student_id": student_id, "course_id": course_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(enrollment["student_id"], student_id);
    assert_eq!(enrollment["course_id"], course_id);

    let (status, courses) = send(&app, "GET", &format!("/students/{}/courses", student_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(courses.as_array().map(Vec::len), Some(1));
    assert_eq!(courses[0]["code"], "CS101");

    let (status, _) = send(&app, "DELETE", &format!("/students/{}", student_id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", &format!("/students/{}", student_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "404 Not Found");

    let (status, _) = send(&app, "GET", &format!("/students/{}/courses", student_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_and_invalid_students() {
    let app = setup_app().await;
    let ana = json!({"national_id": "12345", "name": "Ana", "email": "a@x.com"});

    let (status, created) = send(&app, "POST", "/students", Some(ana.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["semester"], 1);

    let (status, body) = send(&app, "POST", "/students", Some(ana)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap_or_default().contains("12345"));

    let bad_email = json!({"national_id": "67890", "name": "Luis", "email": "luis"});
    let (status, _) = send(&app, "POST", "/students", Some(bad_email)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let with_id = json!({"id": 99, "national_id": "67890", "name": "Luis", "email": "l@x.com"});
    let (status, _) = send(&app, "POST", "/students", Some(with_id)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_soft_delete_restore_round_trip() {
    let app = setup_app().await;
    let (_, course) = send(
        &app,
        "POST",
        "/courses",
        Some(json!({"code": "MA101", "name": "Calculus", "credits": 4, "schedule": "Mon 08-10"})),
    )
    .await;
    let uri = format!("/courses/{}", course["id"]);

    let (status, _) = send(&app, "PATCH", &format!("{}/restore", uri), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, listed) = send(&app, "GET", "/courses", None).await;
    assert_eq!(listed, json!([]));
    let (_, listed) = send(&app, "GET", "/courses?include_deleted=true", None).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    let (_, deleted) = send(&app, "GET", "/courses/deleted", None).await;
    assert_eq!(deleted[0]["code"], "MA101");

    let (status, body) = send(&app, "PATCH", &format!("{}/restore", uri), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (status, fetched) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, course);
}

#[tokio::test]
async fn test_partial_update_changes_one_field() {
    let app = setup_app().await;
    let (_, student) = send(
        &app,
        "POST",
        "/students",
        Some(json!({"national_id": "12345", "name": "Ana", "email": "a@x.com", "semester": 3})),
    )
    .await;
    let uri = format!("/students/{}", student["id"]);

    let (status, updated) = send(&app, "PATCH", &uri, Some(json!({"name": "Ana María"}))).await;
    assert_eq!(status, StatusCode::OK);

    let mut expected = student.clone();
    expected["name"] = json!("Ana María");
    assert_eq!(updated, expected);

    let (_, fetched) = send(&app, "GET", &uri, None).await;
    assert_eq!(fetched, expected);

    let (status, _) = send(&app, "PATCH", &uri, Some(json!({"semester": 12}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_search_and_filters() {
    let app = setup_app().await;
    for (national_id, name, semester) in [("11111", "Ana", 1), ("22222", "Mariana", 2), ("33333", "Luis", 2)] {
        let body = json!({"national_id": national_id, "name": name, "email": "x@uni.edu", "semester": semester});
        let (status, _) = send(&app, "POST", "/students", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, found) = send(&app, "GET", "/students/search?name=ANA", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().map(Vec::len), Some(2));

    let (status, _) = send(&app, "GET", "/students/search?name=pedro", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, found) = send(&app, "GET", "/students?semester=2&name=lu", None).await;
    assert_eq!(found.as_array().map(Vec::len), Some(1));
    assert_eq!(found[0]["name"], "Luis");

    let (_, page) = send(&app, "GET", "/students?skip=1&limit=1", None).await;
    assert_eq!(page[0]["name"], "Mariana");

    let (status, _) = send(&app, "GET", "/students?limit=101", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_enrollment_conflicts_and_missing_parents() {
    let app = setup_app().await;
    let (_, student) = send(
        &app,
        "POST",
        "/students",
        Some(json!({"national_id": "12345", "name": "Ana", "email": "a@x.com"})),
    )
    .await;
    let (_, course) = send(&app, "POST", "/courses", Some(json!({"code": "CS101", "name": "Intro"}))).await;
    let pair = json!({"student_id": student["id"], "course_id": course["id"]});

    let (status, _) = send(&app, "POST", "/enrollments", Some(pair.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(&app, "POST", "/enrollments", Some(pair.clone())).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, students) = send(&app, "GET", &format!("/courses/{}/students", course["id"]), None).await;
    assert_eq!(students[0]["national_id"], "12345");

    let unenroll = format!("/enrollments/{}/{}", student["id"], course["id"]);
    let (status, _) = send(&app, "DELETE", &unenroll, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "DELETE", &unenroll, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &format!("/courses/{}", course["id"]), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "POST", "/enrollments", Some(pair)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_period_activation() {
    let app = setup_app().await;
    let mut ids = Vec::new();
    for number in 1..=3 {
        let (status, period) = send(
            &app,
            "POST",
            "/periods",
            Some(json!({"year": 2025, "number": number, "active": true})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        ids.push(period["id"].as_i64().expect("period id"));
    }

    let (_, active) = send(&app, "GET", "/periods?active=true", None).await;
    assert_eq!(active.as_array().map(Vec::len), Some(1));
    assert_eq!(active[0]["id"], ids[2]);

    let (status, period) = send(&app, "PATCH", &format!("/periods/{}/activate", ids[0]), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(period["active"], true);

    let (_, active) = send(&app, "GET", "/periods?active=true", None).await;
    assert_eq!(active.as_array().map(Vec::len), Some(1));
    assert_eq!(active[0]["id"], ids[0]);

    let (status, _) = send(&app, "PATCH", "/periods/999/activate", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "POST", "/periods", Some(json!({"year": 2025, "number": 1}))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, "POST", "/periods", Some(json!({"year": 1999, "number": 1}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_service_endpoints() {
    let app = setup_app().await;

    let (status, _) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, root) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(root["service"], "registrar");

    let (status, doc) = send(&app, "GET", "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/periods/{id}/activate"].is_object());

    let (status, _) = send(&app, "GET", "/nowhere", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_requests_get_json_validation_errors() {
    let app = setup_app().await;
    let bad_requests = [
        ("GET", "/students?limit=abc", None),
        ("GET", "/students/search", None),
        ("GET", "/students/abc", None),
        ("DELETE", "/enrollments/1/x", None),
        (
            "POST",
            "/students",
            Some(json!({"id": 9, "national_id": "12345", "name": "Ana", "email": "a@x.com"})),
        ),
        ("POST", "/courses", Some(json!({"code": "CS101"}))),
    ];

    for (method, uri, body) in bad_requests {
        let (status, error) = send(&app, method, uri, body).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{} {}", method, uri);
        assert_eq!(error["error"], "422 Unprocessable Entity", "{} {}", method, uri);
        assert!(error["message"].is_string(), "{} {}", method, uri);
    }

    let (_, students) = send(&app, "GET", "/students", None).await;
    assert_eq!(students, json!([]));
}
