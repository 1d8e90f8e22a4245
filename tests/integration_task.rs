mod common;

use axum::http::StatusCode;
use common::{Injected, TestApp};
use serde_json::json;

fn new_task(owner: &str, external_id: &str) -> serde_json::Value {
    json!({
        "title": "Grade essays",
        "description": "Week 3 batch",
        "owner_id": owner,
        "external_id": external_id
    })
}

#[tokio::test]
async fn test_task_crud_as_user() {
    let app = TestApp::new();
    let token = app.token("user");

    let (status, created) = app
        .send("POST", "/v1/task/create", Some(&token), Some(new_task("u-1", "EXT-1")))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["status"], "new");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, fetched) = app
        .send("GET", &format!("/v1/task/get/{}", id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Grade essays");
    assert_eq!(fetched["owner_id"], "u-1");

    let (status, updated) = app
        .send(
            "PUT",
            "/v1/task/update",
            Some(&token),
            Some(json!({"id": id, "title": "Grade all essays", "description": ""})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Grade all essays");

    let (status, _) = app
        .send("DELETE", &format!("/v1/task/delete/{}", id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_get_by_external_id() {
    let app = TestApp::new();
    let token = app.token("admin");

    app.send("POST", "/v1/task/create", Some(&token), Some(new_task("u-1", "EXT-42")))
        .await;

    let (status, body) = app
        .send("GET", "/v1/task/get_by_task_id/EXT-42", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["external_id"], "EXT-42");

    let (status, body) = app
        .send("GET", "/v1/task/get_by_task_id/EXT-0", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "NotFoundError");
}

#[tokio::test]
async fn test_change_status() {
    let app = TestApp::new();
    let token = app.token("superadmin");

    let (_, created) = app
        .send("POST", "/v1/task/create", Some(&token), Some(new_task("u-1", "EXT-1")))
        .await;

    let (status, body) = app
        .send(
            "PATCH",
            "/v1/task/change_status",
            Some(&token),
            Some(json!({"id": created["id"], "status": "done"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "done");
}

#[tokio::test]
async fn test_negative_page_rejected_without_backend_call() {
    let app = TestApp::new();
    let token = app.token("user");

    let (status, body) = app
        .send("GET", "/v1/task/getall?page=-1", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "ValidationError");
    assert_eq!(body["cause"], "page");
    assert_eq!(app.tasks.backend.calls(), 0);
}

#[tokio::test]
async fn test_list_filters_by_owner() {
    let app = TestApp::new();
    let token = app.token("user");

    app.send("POST", "/v1/task/create", Some(&token), Some(new_task("u-1", "A")))
        .await;
    app.send("POST", "/v1/task/create", Some(&token), Some(new_task("u-2", "B")))
        .await;

    let (status, body) = app
        .send("GET", "/v1/task/getall?user_id=u-2", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["tasks"][0]["owner_id"], "u-2");
    assert_eq!(app.tasks.backend.last_request().unwrap()["owner_id"], "u-2");
}

#[tokio::test]
async fn test_roles_outside_task_policy_forbidden() {
    let app = TestApp::new();

    for role in ["manager", "administrator", "student"] {
        let token = app.token(role);
        let (status, body) = app
            .send("GET", "/v1/task/getall", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{}", role);
        assert_eq!(body["description"], "Only superadmins, admins and users can list tasks");
    }
    assert_eq!(app.total_calls(), 0);
}

#[tokio::test]
async fn test_transport_failure_is_masked() {
    let app = TestApp::new();
    let token = app.token("user");
    app.tasks.backend.fail_with(Injected::Transport);

    let (status, body) = app
        .send("GET", "/v1/task/getall", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["description"], "backend service unavailable");
    assert_eq!(app.tasks.backend.calls(), 1);
}

#[tokio::test]
async fn test_task_has_no_login_surface() {
    let app = TestApp::new();

    let (status, _) = app
        .send("POST", "/v1/task/login", None, Some(json!({"email": "a@b.co"})))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.total_calls(), 0);
}

#[tokio::test]
async fn test_update_without_id_rejected() {
    let app = TestApp::new();
    let token = app.token("user");

    let (status, body) = app
        .send(
            "PUT",
            "/v1/task/update",
            Some(&token),
            Some(json!({"title": "Grade all essays"})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["description"], "id is required");
    assert_eq!(body["cause"], "id");
    assert_eq!(app.total_calls(), 0);
}
