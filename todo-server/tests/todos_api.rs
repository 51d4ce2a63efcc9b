//! End-to-end tests for the todo HTTP surface, backed by the in-memory store

use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use todo_server::db::MemoryTodoStore;
use todo_server::models::TodoResponse;
use todo_server::{build_router, AppState, Settings};

fn app() -> Router {
    let settings = Settings::from_lookup(|key| match key {
        "DATABASE_URL" => Some("postgres://unused/todos".to_string()),
        _ => None,
    })
    .unwrap();

    let state = AppState::new(MemoryTodoStore::new(), settings.app_name.clone());
    build_router(state, &settings).unwrap()
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create(app: &Router, title: &str) -> TodoResponse {
    let response = send(app, Method::POST, "/api/todos", Some(json!({ "title": title }))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    serde_json::from_value(body_json(response).await).unwrap()
}

fn assert_problem(response: &Response, status: StatusCode) {
    assert_eq!(response.status(), status);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/problem+json"
    );
}

// --- create ---

#[tokio::test]
async fn create_returns_201_with_defaults() {
    let app = app();
    let response = send(
        &app,
        Method::POST,
        "/api/todos",
        Some(json!({"title": "Buy milk"})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let todo: TodoResponse = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(todo.title, "Buy milk");
    assert_eq!(todo.description, None);
    assert!(!todo.completed);
    assert!(!todo.id.is_nil());
    assert_eq!(todo.created_at, todo.updated_at);
}

#[tokio::test]
async fn create_with_description() {
    let app = app();
    let response = send(
        &app,
        Method::POST,
        "/api/todos",
        Some(json!({"title": "Call mom", "description": "Sunday afternoon"})),
    )
    .await;

    let body = body_json(response).await;
    assert_eq!(body["description"], "Sunday afternoon");
}

#[tokio::test]
async fn create_empty_title_is_422() {
    let app = app();
    let response = send(&app, Method::POST, "/api/todos", Some(json!({"title": ""}))).await;

    assert_problem(&response, StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["status"], 422);
    assert_eq!(body["title"], "Validation Error");
    assert_eq!(body["errors"][0]["loc"], json!(["body", "title"]));
    assert_eq!(body["errors"][0]["type"], "string_too_short");
}

#[tokio::test]
async fn create_reports_every_invalid_field() {
    let app = app();
    let response = send(
        &app,
        Method::POST,
        "/api/todos",
        Some(json!({"title": "x".repeat(201), "description": "y".repeat(1001)})),
    )
    .await;

    assert_problem(&response, StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0]["loc"][1], "title");
    assert_eq!(errors[1]["loc"][1], "description");
}

#[tokio::test]
async fn create_malformed_json_is_422() {
    let app = app();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/todos")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_problem(&response, StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["errors"][0]["type"], "json_invalid");
}

// --- update ---

#[tokio::test]
async fn update_completed_only_keeps_other_fields() {
    let app = app();
    let response = send(
        &app,
        Method::POST,
        "/api/todos",
        Some(json!({"title": "Walk dog", "description": "Around the park"})),
    )
    .await;
    let created: TodoResponse = serde_json::from_value(body_json(response).await).unwrap();

    tokio::time::sleep(Duration::from_millis(5)).await;

    let response = send(
        &app,
        Method::PUT,
        &format!("/api/todos/{}", created.id),
        Some(json!({"completed": true})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated: TodoResponse = serde_json::from_value(body_json(response).await).unwrap();
    assert!(updated.completed);
    assert_eq!(updated.title, "Walk dog");
    assert_eq!(updated.description.as_deref(), Some("Around the park"));
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);
}

#[tokio::test]
async fn update_null_leaves_field() {
    let app = app();
    let created = create(&app, "Keep title").await;

    let response = send(
        &app,
        Method::PUT,
        &format!("/api/todos/{}", created.id),
        Some(json!({"title": null, "description": "added"})),
    )
    .await;

    let updated: TodoResponse = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(updated.title, "Keep title");
    assert_eq!(updated.description.as_deref(), Some("added"));
}

#[tokio::test]
async fn update_accepts_lenient_booleans() {
    let app = app();
    let created = create(&app, "Flexible").await;
    let uri = format!("/api/todos/{}", created.id);

    let response = send(&app, Method::PUT, &uri, Some(json!({"completed": "yes"}))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["completed"], true);

    let response = send(&app, Method::PUT, &uri, Some(json!({"completed": 0}))).await;
    assert_eq!(body_json(response).await["completed"], false);

    let response = send(&app, Method::PUT, &uri, Some(json!({"completed": "maybe"}))).await;
    assert_problem(&response, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["errors"][0]["type"], "bool_parsing");
}

#[tokio::test]
async fn update_missing_todo_is_404() {
    let app = app();
    let uri = format!("/api/todos/{}", uuid::Uuid::new_v4());

    for body in [json!({}), json!({"completed": true}), json!({"title": "new"})] {
        let response = send(&app, Method::PUT, &uri, Some(body)).await;
        assert_problem(&response, StatusCode::NOT_FOUND);
        let problem = body_json(response).await;
        assert_eq!(problem["status"], 404);
        assert_eq!(problem["title"], "Not Found");
    }
}

#[tokio::test]
async fn update_bad_uuid_is_422() {
    let app = app();
    let response = send(
        &app,
        Method::PUT,
        "/api/todos/not-a-uuid",
        Some(json!({"completed": true})),
    )
    .await;

    assert_problem(&response, StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["errors"][0]["loc"], json!(["path", "todo_id"]));
    assert_eq!(body["errors"][0]["type"], "uuid_parsing");
}

// --- delete ---

#[tokio::test]
async fn delete_then_fetch_is_404() {
    let app = app();
    let created = create(&app, "Temporary").await;
    let uri = format!("/api/todos/{}", created.id);

    let response = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty());

    let response = send(&app, Method::GET, &uri, None).await;
    assert_problem(&response, StatusCode::NOT_FOUND);

    let response = send(&app, Method::PUT, &uri, Some(json!({"completed": true}))).await;
    assert_problem(&response, StatusCode::NOT_FOUND);

    let response = send(&app, Method::DELETE, &uri, None).await;
    assert_problem(&response, StatusCode::NOT_FOUND);
}

// --- list ---

#[tokio::test]
async fn list_empty() {
    let app = app();
    let response = send(&app, Method::GET, "/api/todos", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body,
        json!({"items": [], "total": 0, "page": 1, "page_size": 100})
    );
}

#[tokio::test]
async fn list_newest_first() {
    let app = app();
    for title in ["first", "second", "third"] {
        create(&app, title).await;
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    let body = body_json(send(&app, Method::GET, "/api/todos", None).await).await;
    let titles: Vec<_> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn list_pagination_windows() {
    let app = app();
    for i in 0..25 {
        create(&app, &format!("todo {i}")).await;
    }

    for (page, expected) in [(1, 10), (2, 10), (3, 5), (4, 0)] {
        let uri = format!("/api/todos?page={page}&page_size=10");
        let body = body_json(send(&app, Method::GET, &uri, None).await).await;

        assert_eq!(body["items"].as_array().unwrap().len(), expected, "page {page}");
        assert_eq!(body["total"], 25);
        assert_eq!(body["page"], page);
        assert_eq!(body["page_size"], 10);
    }
}

#[tokio::test]
async fn list_rejects_out_of_range_params() {
    let app = app();

    for uri in [
        "/api/todos?page=0",
        "/api/todos?page_size=0",
        "/api/todos?page_size=101",
        "/api/todos?page=abc",
    ] {
        let response = send(&app, Method::GET, uri, None).await;
        assert_problem(&response, StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["errors"][0]["loc"][0], "query", "{uri}");
    }
}

#[tokio::test]
async fn list_reflects_create_exactly() {
    let app = app();
    let response = send(
        &app,
        Method::POST,
        "/api/todos",
        Some(json!({"title": "Round trip", "description": "same bytes"})),
    )
    .await;
    let created = body_json(response).await;

    let listed = body_json(send(&app, Method::GET, "/api/todos", None).await).await;
    assert_eq!(listed["items"][0], created);

    let id = created["id"].as_str().unwrap();
    let fetched = body_json(send(&app, Method::GET, &format!("/api/todos/{id}"), None).await).await;
    assert_eq!(fetched, created);
}

// --- surface ---

#[tokio::test]
async fn unknown_route_is_problem_404() {
    let app = app();
    let response = send(&app, Method::GET, "/api/nope", None).await;

    assert_problem(&response, StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["instance"], "/api/nope");
}

#[tokio::test]
async fn unsupported_method_is_405() {
    let app = app();
    let uri = format!("/api/todos/{}", uuid::Uuid::new_v4());
    let response = send(&app, Method::PATCH, &uri, Some(json!({"completed": true}))).await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn health_reports_database() {
    let app = app();
    let response = send(&app, Method::GET, "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["name"], "Todo API");
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn cors_allows_configured_origin_with_credentials() {
    let app = app();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/todos")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}

#[tokio::test]
async fn cors_ignores_unknown_origin() {
    let app = app();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/todos")
                .header(header::ORIGIN, "https://evil.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
