//! Student endpoints.
//!
//! Served under both `/v1/student` and `/v1/user`; the second prefix is kept
//! for clients of the earlier gateway. Students may read and update records
//! and change passwords, but only staff roles may list, create or delete.

use axum::{
    Json,
    body::Bytes,
    extract::{
        Path, State,
        rejection::{BytesRejection, PathRejection},
    },
    http::{HeaderMap, Uri},
};
use tracing::instrument;

use gateway_core::{Action, ApiError, ErrorEnvelope, ListQuery, Operation, Resource};
use gateway_proto::student_service::{
    CreateStudent, Empty, GetListStudentRequest, GetListStudentResponse, Student,
    StudentChangePassword, StudentChangePasswordResponse, StudentLoginRequest,
    StudentLoginResponse, StudentPrimaryKey, StudentRegisterConfRequest, StudentRegisterRequest,
    StudentRegisterResponse, UpdateStudent,
};

use crate::state::AppState;
use crate::validator::{list_request, path_id, validated};

const fn op(action: Action) -> Operation {
    Operation::new(Resource::Student, action)
}

#[utoipa::path(
    get,
    path = "/v1/student/getall",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of students", body = GetListStudentResponse),
        (status = 400, description = "Invalid paging parameters", body = ErrorEnvelope),
        (status = 401, description = "Unauthorized", body = ErrorEnvelope),
        (status = 403, description = "Forbidden - staff only", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip_all)]
pub async fn get_students(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Json<GetListStudentResponse>, ApiError> {
    let students = state.registry.student();

    state
        .dispatcher(op(Action::GetList))?
        .run(
            state.pipeline(),
            &headers,
            |_| list_request::<GetListStudentRequest>(&uri),
            move |request| async move { students.get_list(request).await },
        )
        .await
}

#[utoipa::path(
    get,
    path = "/v1/student/get/{id}",
    params(
        ("id" = String, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student details", body = Student),
        (status = 401, description = "Unauthorized", body = ErrorEnvelope),
        (status = 403, description = "Forbidden", body = ErrorEnvelope),
        (status = 404, description = "Student not found", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip(state, headers))]
pub async fn get_student(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Student>, ApiError> {
    let students = state.registry.student();

    state
        .dispatcher(op(Action::GetById))?
        .run(
            state.pipeline(),
            &headers,
            |_| Ok(StudentPrimaryKey { id: path_id(id)? }),
            move |request| async move { students.get_by_id(request).await },
        )
        .await
}

#[utoipa::path(
    post,
    path = "/v1/student/create",
    request_body = CreateStudent,
    responses(
        (status = 200, description = "Student created successfully", body = Student),
        (status = 400, description = "Bad request", body = ErrorEnvelope),
        (status = 401, description = "Unauthorized", body = ErrorEnvelope),
        (status = 403, description = "Forbidden - staff only", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip_all)]
pub async fn create_student(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Student>, ApiError> {
    let students = state.registry.student();

    state
        .dispatcher(op(Action::Create))?
        .run(
            state.pipeline(),
            &headers,
            |rules| validated::<CreateStudent>(body, rules),
            move |request| async move { students.create(request).await },
        )
        .await
}

#[utoipa::path(
    put,
    path = "/v1/student/update",
    request_body = UpdateStudent,
    responses(
        (status = 200, description = "Student updated successfully", body = Student),
        (status = 400, description = "Bad request", body = ErrorEnvelope),
        (status = 401, description = "Unauthorized", body = ErrorEnvelope),
        (status = 403, description = "Forbidden", body = ErrorEnvelope),
        (status = 404, description = "Student not found", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip_all)]
pub async fn update_student(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Student>, ApiError> {
    let students = state.registry.student();

    state
        .dispatcher(op(Action::Update))?
        .run(
            state.pipeline(),
            &headers,
            |rules| validated::<UpdateStudent>(body, rules),
            move |request| async move { students.update(request).await },
        )
        .await
}

#[utoipa::path(
    delete,
    path = "/v1/student/delete/{id}",
    params(
        ("id" = String, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student deleted successfully", body = Empty),
        (status = 401, description = "Unauthorized", body = ErrorEnvelope),
        (status = 403, description = "Forbidden - staff only", body = ErrorEnvelope),
        (status = 404, description = "Student not found", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip(state, headers))]
pub async fn delete_student(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Empty>, ApiError> {
    let students = state.registry.student();

    state
        .dispatcher(op(Action::Delete))?
        .run(
            state.pipeline(),
            &headers,
            |_| Ok(StudentPrimaryKey { id: path_id(id)? }),
            move |request| async move { students.delete(request).await },
        )
        .await
}

#[utoipa::path(
    patch,
    path = "/v1/student/change_password",
    request_body = StudentChangePassword,
    responses(
        (status = 200, description = "Password changed", body = StudentChangePasswordResponse),
        (status = 400, description = "Password does not meet the policy", body = ErrorEnvelope),
        (status = 401, description = "Unauthorized", body = ErrorEnvelope),
        (status = 403, description = "Forbidden", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip_all)]
pub async fn change_student_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<StudentChangePasswordResponse>, ApiError> {
    let students = state.registry.student();

    state
        .dispatcher(op(Action::ChangePassword))?
        .run(
            state.pipeline(),
            &headers,
            |rules| validated::<StudentChangePassword>(body, rules),
            move |request| async move { students.change_password(request).await },
        )
        .await
}

#[utoipa::path(
    post,
    path = "/v1/student/login",
    request_body = StudentLoginRequest,
    responses(
        (status = 200, description = "Login successful", body = StudentLoginResponse),
        (status = 400, description = "Bad request", body = ErrorEnvelope),
        (status = 401, description = "Invalid credentials", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tag = "Students"
)]
#[instrument(skip_all)]
pub async fn login_student(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<StudentLoginResponse>, ApiError> {
    let students = state.registry.student();

    state
        .dispatcher(op(Action::Login))?
        .run(
            state.pipeline(),
            &headers,
            |rules| validated::<StudentLoginRequest>(body, rules),
            move |request| async move { students.login(request).await },
        )
        .await
}

#[utoipa::path(
    post,
    path = "/v1/student/register",
    request_body = StudentRegisterRequest,
    responses(
        (status = 200, description = "Confirmation code sent", body = StudentRegisterResponse),
        (status = 400, description = "Bad request", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tag = "Students"
)]
#[instrument(skip_all)]
pub async fn register_student(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<StudentRegisterResponse>, ApiError> {
    let students = state.registry.student();

    state
        .dispatcher(op(Action::Register))?
        .run(
            state.pipeline(),
            &headers,
            |rules| validated::<StudentRegisterRequest>(body, rules),
            move |request| async move { students.register(request).await },
        )
        .await
}

#[utoipa::path(
    post,
    path = "/v1/student/register-confirm",
    request_body = StudentRegisterConfRequest,
    responses(
        (status = 200, description = "Registration confirmed", body = StudentLoginResponse),
        (status = 400, description = "Bad request", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tag = "Students"
)]
#[instrument(skip_all)]
pub async fn confirm_student_registration(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<StudentLoginResponse>, ApiError> {
    let students = state.registry.student();

    state
        .dispatcher(op(Action::RegisterConfirm))?
        .run(
            state.pipeline(),
            &headers,
            |rules| validated::<StudentRegisterConfRequest>(body, rules),
            move |request| async move { students.register_confirm(request).await },
        )
        .await
}
