mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

fn new_student() -> serde_json::Value {
    json!({
        "full_name": "Sam Student",
        "email": "sam@example.com",
        "phone": "998971112233",
        "birthday": "2005-09-01",
        "user_password": "Secret123"
    })
}

#[tokio::test]
async fn test_create_student_as_administrator() {
    let app = TestApp::new();
    let token = app.token("administrator");

    let (status, body) = app
        .send("POST", "/v1/student/create", Some(&token), Some(new_student()))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["birthday"], "2005-09-01");
    assert_eq!(app.students.backend.calls(), 1);
}

#[tokio::test]
async fn test_student_cannot_create_students() {
    let app = TestApp::new();
    let token = app.token("student");

    let (status, body) = app
        .send("POST", "/v1/student/create", Some(&token), Some(new_student()))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "PermissionDeniedError");
    assert_eq!(app.total_calls(), 0);
}

#[tokio::test]
async fn test_future_birthday_rejected() {
    let app = TestApp::new();
    let token = app.token("manager");
    let mut student = new_student();
    student["birthday"] = json!("2030-01-01");

    let (status, body) = app
        .send("POST", "/v1/student/create", Some(&token), Some(student))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["cause"], "birthday");
    assert_eq!(app.total_calls(), 0);
}

#[tokio::test]
async fn test_phone_checked_before_birthday() {
    let app = TestApp::new();
    let token = app.token("manager");
    let mut student = new_student();
    student["phone"] = json!("+998971112233");
    student["birthday"] = json!("yesterday");

    let (status, body) = app
        .send("POST", "/v1/student/create", Some(&token), Some(student))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["cause"], "phone");
}

#[tokio::test]
async fn test_change_password_too_short() {
    let app = TestApp::new();
    let token = app.token("student");

    let (status, body) = app
        .send(
            "PATCH",
            "/v1/student/change_password",
            Some(&token),
            Some(json!({"id": "s-1", "old_password": "Secret123", "new_password": "abc"})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "ValidationError");
    assert_eq!(body["cause"], "new_password");
    assert!(
        body["description"]
            .as_str()
            .unwrap()
            .contains("at least 8 characters")
    );
    assert_eq!(app.total_calls(), 0);
}

#[tokio::test]
async fn test_student_can_read_and_update() {
    let app = TestApp::new();
    let staff = app.token("manager");
    let student = app.token("student");

    let (_, created) = app
        .send("POST", "/v1/student/create", Some(&staff), Some(new_student()))
        .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, fetched) = app
        .send("GET", &format!("/v1/student/get/{}", id), Some(&student), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["email"], "sam@example.com");

    let (status, updated) = app
        .send(
            "PUT",
            "/v1/student/update",
            Some(&student),
            Some(json!({
                "id": id,
                "full_name": "Samantha Student",
                "email": "sam@example.com",
                "phone": "998971112233",
                "birthday": "2005-09-01"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["full_name"], "Samantha Student");
}

#[tokio::test]
async fn test_student_delete_requires_staff() {
    let app = TestApp::new();

    let (status, _) = app.send("DELETE", "/v1/student/delete/s-1", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = app.token("student");
    let (status, _) = app
        .send("DELETE", "/v1/student/delete/s-1", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(app.total_calls(), 0);

    let token = app.token("administrator");
    let (status, body) = app
        .send("DELETE", "/v1/student/delete/s-1", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["description"], "student s-1 not found");
}

#[tokio::test]
async fn test_user_prefix_serves_students() {
    let app = TestApp::new();
    let token = app.token("superadmin");

    let (status, created) = app
        .send("POST", "/v1/user/create", Some(&token), Some(new_student()))
        .await;
    assert_eq!(status, StatusCode::OK);

    let id = created["id"].as_str().unwrap();
    let (status, fetched) = app
        .send("GET", &format!("/v1/student/get/{}", id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["full_name"], "Sam Student");
}

#[tokio::test]
async fn test_list_students_paging() {
    let app = TestApp::new();
    let token = app.token("superadmin");

    for i in 0..3 {
        let mut student = new_student();
        student["full_name"] = json!(format!("Student {}", i));
        app.send("POST", "/v1/student/create", Some(&token), Some(student))
            .await;
    }

    let (status, body) = app
        .send("GET", "/v1/student/getall?page=2&limit=2", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert_eq!(body["students"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_register_confirm_is_public() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            "POST",
            "/v1/student/register-confirm",
            None,
            Some(json!({
                "email": "sam@example.com",
                "otp": "123456",
                "student": new_student()
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["refresh_token"].as_str().unwrap().starts_with("refresh-"));
}
