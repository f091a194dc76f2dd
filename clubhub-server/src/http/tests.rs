//! Router tests against the in-memory store

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::{build_router, AppState, ServerConfig};
use crate::db::MemoryStore;

fn app() -> Router {
    build_router(AppState::new(MemoryStore::new()), &ServerConfig::default())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn register(app: &Router, name: &str, email: &str, department: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/members?action=register",
        Some(json!({ "name": name, "email": email, "department": department })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"].clone()
}

fn in_days(days: i64) -> String {
    (Utc::now() + Duration::days(days)).to_rfc3339()
}

#[tokio::test]
async fn health_endpoint() {
    let (status, body) = send(&app(), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app(), "GET", "/api/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn register_lowercases_and_rejects_duplicates() {
    let app = app();
    let member = register(&app, "Ada Lovelace", "Ada@Example.COM", "CS").await;
    assert_eq!(member["email"], "ada@example.com");
    assert_eq!(member["interests"], json!([]));
    assert!(member["joinedAt"].is_string());

    let (status, body) = send(
        &app,
        "POST",
        "/api/members",
        Some(json!({ "name": "Imposter", "email": "ADA@example.com", "department": "EE" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn register_validates_input() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/members?action=register",
        Some(json!({ "name": "Ada", "email": "not-an-email", "department": "CS" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, body) = send(&app, "POST", "/api/members", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "name is required");
}

#[tokio::test]
async fn routing_errors() {
    let app = app();

    let (status, body) = send(&app, "GET", "/api/members?action=register", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "method_not_allowed");

    let (status, body) = send(&app, "GET", "/api/events?action=explode", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "unknown_action");

    let (status, body) = send(&app, "GET", "/api/members?action=get&id=123", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, body) = send(&app, "GET", "/api/members?limit=many", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/events?action=create")
        .header("content-type", "application/json")
        .body(Body::from("{\"title\": "))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_filter_and_paginate_members() {
    let app = app();
    register(&app, "Ada", "ada@x.io", "CS").await;
    register(&app, "Grace", "grace@x.io", "CS").await;
    register(&app, "Emmy", "emmy@x.io", "Math").await;

    let (status, body) = send(&app, "GET", "/api/members?department=CS&limit=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["hasMore"], true);

    let (_, body) = send(&app, "GET", "/api/members?action=list&search=EMMY", None).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["name"], "Emmy");
}

#[tokio::test]
async fn get_update_and_check_email() {
    let app = app();
    let member = register(&app, "Ada", "ada@x.io", "CS").await;
    let id = member["id"].as_str().unwrap();

    let (status, body) = send(&app, "GET", &format!("/api/members?id={id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Ada");

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/members?action=update&id={id}"),
        Some(json!({ "department": "Math", "interests": "rust, chess" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["department"], "Math");
    assert_eq!(body["data"]["interests"], json!(["rust", "chess"]));

    let (_, body) = send(&app, "GET", "/api/members?action=check-email&email=ADA@x.io", None).await;
    assert_eq!(body["data"]["registered"], true);
    assert_eq!(body["data"]["memberId"], id);

    let (_, body) = send(&app, "GET", "/api/members?action=check-email&email=nobody@x.io", None).await;
    assert_eq!(body["data"]["registered"], false);

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/members?id={id}"),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn events_require_future_date() {
    let app = app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/events",
        Some(json!({ "title": "Retro", "eventDate": in_days(-1) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "eventDate must be in the future");

    let (status, body) = send(
        &app,
        "POST",
        "/api/events?action=create",
        Some(json!({ "title": "Hack night", "eventDate": in_days(3), "location": "Lab 2" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_owned();

    send(
        &app,
        "POST",
        "/api/events",
        Some(json!({ "title": "Kickoff", "eventDate": in_days(1) })),
    )
    .await;

    let (_, body) = send(&app, "GET", "/api/events?when=upcoming", None).await;
    let titles: Vec<_> = body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(titles, vec!["Kickoff", "Hack night"]);

    let (_, body) = send(&app, "GET", "/api/events?when=past", None).await;
    assert_eq!(body["data"]["total"], 0);

    let (status, _) = send(&app, "GET", "/api/events?when=someday", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/events?id={id}"),
        Some(json!({ "location": "Main hall" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["location"], "Main hall");

    let (status, _) = send(&app, "DELETE", &format!("/api/events?id={id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "DELETE", &format!("/api/events?id={id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blogs_snapshot_author_and_cascade_on_member_delete() {
    let app = app();
    let author = register(&app, "Ada", "ada@x.io", "CS").await;
    let author_id = author["id"].as_str().unwrap().to_owned();

    let (status, body) = send(
        &app,
        "POST",
        "/api/blogs",
        Some(json!({ "title": "t", "content": "c", "authorId": bson::oid::ObjectId::new().to_hex() })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, body) = send(
        &app,
        "POST",
        "/api/blogs?action=create",
        Some(json!({ "title": "Why Rust", "content": "Because.", "authorId": author_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["authorName"], "Ada");
    assert_eq!(body["data"]["authorEmail"], "ada@x.io");
    assert_eq!(body["data"]["authorDepartment"], "CS");

    // Snapshot is not refreshed by later member edits
    send(
        &app,
        "PUT",
        &format!("/api/members?id={author_id}"),
        Some(json!({ "name": "Ada L." })),
    )
    .await;
    let (_, body) = send(&app, "GET", &format!("/api/blogs?authorId={author_id}"), None).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["authorName"], "Ada");

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/members?action=delete&id={author_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deletedBlogs"], 1);
    assert_eq!(body["message"], "member deleted");

    let (_, body) = send(&app, "GET", "/api/blogs", None).await;
    assert_eq!(body["data"]["total"], 0);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/members?id={author_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dashboard_aggregates() {
    let app = app();
    let ada = register(&app, "Ada", "ada@x.io", "CS").await;
    register(&app, "Grace", "grace@x.io", "CS").await;
    register(&app, "Emmy", "emmy@x.io", "Math").await;
    send(
        &app,
        "POST",
        "/api/events",
        Some(json!({ "title": "Kickoff", "eventDate": in_days(2) })),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/blogs",
        Some(json!({ "title": "Hi", "content": "Hello", "authorId": ada["id"] })),
    )
    .await;

    let (status, body) = send(&app, "GET", "/api/dashboard?action=stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!({ "members": 3, "events": 1, "upcomingEvents": 1, "blogs": 1 })
    );

    let (_, body) = send(&app, "GET", "/api/dashboard?action=departments", None).await;
    assert_eq!(
        body["data"],
        json!([
            { "department": "CS", "count": 2 },
            { "department": "Math", "count": 1 }
        ])
    );

    let (status, body) = send(&app, "GET", "/api/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["stats"]["members"], 3);
    assert_eq!(body["data"]["recent"]["members"].as_array().unwrap().len(), 3);
    assert_eq!(body["data"]["recent"]["upcomingEvents"][0]["title"], "Kickoff");
    assert_eq!(body["data"]["recent"]["blogs"][0]["title"], "Hi");

    let (status, _) = send(&app, "POST", "/api/dashboard", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_member_without_blogs() {
    let app = app();
    let member = register(&app, "Grace", "grace@x.io", "CS").await;
    let id = member["id"].as_str().unwrap();

    let (status, body) = send(&app, "DELETE", &format!("/api/members?id={id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deletedBlogs"], 0);

    let (status, _) = send(&app, "GET", &format!("/api/members?id={id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blog_get_update_delete() {
    let app = app();
    let author = register(&app, "Ada", "ada@x.io", "CS").await;
    let (_, body) = send(
        &app,
        "POST",
        "/api/blogs",
        Some(json!({ "title": "Draft", "content": "First cut", "authorId": author["id"] })),
    )
    .await;
    let id = body["data"]["id"].as_str().unwrap().to_owned();

    let (status, body) = send(&app, "GET", &format!("/api/blogs?action=get&id={id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Draft");

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/blogs?id={id}"),
        Some(json!({ "title": "Final" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Final");
    assert_eq!(body["data"]["content"], "First cut");

    let (status, body) = send(&app, "PUT", &format!("/api/blogs?id={id}"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, body) = send(&app, "DELETE", &format!("/api/blogs?action=delete&id={id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "blog deleted");

    let (status, body) = send(&app, "DELETE", &format!("/api/blogs?id={id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, _) = send(&app, "GET", &format!("/api/blogs?id={id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn event_get_by_id() {
    let app = app();
    let (_, body) = send(
        &app,
        "POST",
        "/api/events",
        Some(json!({ "title": "Demo day", "eventDate": in_days(5), "location": "Atrium" })),
    )
    .await;
    let id = body["data"]["id"].as_str().unwrap().to_owned();

    let (status, body) = send(&app, "GET", &format!("/api/events?action=get&id={id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Demo day");
    assert_eq!(body["data"]["location"], "Atrium");

    let missing = bson::oid::ObjectId::new().to_hex();
    let (status, body) = send(&app, "GET", &format!("/api/events?id={missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn list_members_by_year() {
    let app = app();
    for (name, email, year) in [("Ada", "ada@x.io", "1"), ("Grace", "grace@x.io", "2")] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/members",
            Some(json!({ "name": name, "email": email, "department": "CS", "year": year })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
    register(&app, "Emmy", "emmy@x.io", "Math").await;

    let (status, body) = send(&app, "GET", "/api/members?year=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["name"], "Grace");

    let (_, body) = send(&app, "GET", "/api/members?year=4", None).await;
    assert_eq!(body["data"]["total"], 0);
}

#[tokio::test]
async fn blank_or_null_clears_optional_fields() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/members",
        Some(json!({ "name": "Ada", "email": "ada@x.io", "department": "CS", "year": "3" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["year"], "3");
    let member_id = body["data"]["id"].as_str().unwrap().to_owned();

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/members?id={member_id}"),
        Some(json!({ "year": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["year"], Value::Null);

    send(
        &app,
        "PATCH",
        &format!("/api/members?id={member_id}"),
        Some(json!({ "year": "4" })),
    )
    .await;
    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/members?id={member_id}"),
        Some(json!({ "year": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["year"], Value::Null);

    let (_, body) = send(
        &app,
        "POST",
        "/api/events",
        Some(json!({
            "title": "Hack night",
            "eventDate": in_days(3),
            "description": "Bring laptops",
            "location": "Lab 2"
        })),
    )
    .await;
    let event_id = body["data"]["id"].as_str().unwrap().to_owned();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/events?id={event_id}"),
        Some(json!({ "location": null, "description": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["location"], Value::Null);
    assert_eq!(body["data"]["description"], Value::Null);
    assert_eq!(body["data"]["title"], "Hack night");
}

#[tokio::test]
async fn huge_offset_is_an_empty_page() {
    let app = app();
    register(&app, "Ada", "ada@x.io", "CS").await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/members?offset={}", u64::MAX),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["offset"], i64::MAX);
    assert_eq!(body["data"]["items"], json!([]));
    assert_eq!(body["data"]["hasMore"], false);
}
