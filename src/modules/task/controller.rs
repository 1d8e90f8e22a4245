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
use gateway_proto::task_service::{
    CreateTask, Empty, GetListTaskRequest, GetListTaskResponse, Task, TaskChangeStatus,
    TaskExternalKey, TaskPrimaryKey, UpdateTask,
};

use crate::state::AppState;
use crate::validator::{list_request, path_id, validated};

const fn op(action: Action) -> Operation {
    Operation::new(Resource::Task, action)
}

/// Lists tasks. `user_id` narrows the page to one owner.
#[utoipa::path(
    get,
    path = "/v1/task/getall",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of tasks", body = GetListTaskResponse),
        (status = 400, description = "Invalid paging parameters", body = ErrorEnvelope),
        (status = 401, description = "Unauthorized", body = ErrorEnvelope),
        (status = 403, description = "Forbidden", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Tasks"
)]
#[instrument(skip_all)]
pub async fn get_tasks(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Json<GetListTaskResponse>, ApiError> {
    let tasks = state.registry.task();

    state
        .dispatcher(op(Action::GetList))?
        .run(
            state.pipeline(),
            &headers,
            |_| list_request::<GetListTaskRequest>(&uri),
            move |request| async move { tasks.get_list(request).await },
        )
        .await
}

#[utoipa::path(
    get,
    path = "/v1/task/get/{id}",
    params(
        ("id" = String, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task details", body = Task),
        (status = 401, description = "Unauthorized", body = ErrorEnvelope),
        (status = 403, description = "Forbidden", body = ErrorEnvelope),
        (status = 404, description = "Task not found", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Tasks"
)]
#[instrument(skip(state, headers))]
pub async fn get_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Task>, ApiError> {
    let tasks = state.registry.task();

    state
        .dispatcher(op(Action::GetById))?
        .run(
            state.pipeline(),
            &headers,
            |_| Ok(TaskPrimaryKey { id: path_id(id)? }),
            move |request| async move { tasks.get_by_id(request).await },
        )
        .await
}

/// Looks a task up by the identifier it carries in the upstream tracker.
#[utoipa::path(
    get,
    path = "/v1/task/get_by_task_id/{id}",
    params(
        ("id" = String, Path, description = "External task ID")
    ),
    responses(
        (status = 200, description = "Task details", body = Task),
        (status = 401, description = "Unauthorized", body = ErrorEnvelope),
        (status = 403, description = "Forbidden", body = ErrorEnvelope),
        (status = 404, description = "Task not found", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Tasks"
)]
#[instrument(skip(state, headers))]
pub async fn get_task_by_external_id(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Task>, ApiError> {
    let tasks = state.registry.task();

    state
        .dispatcher(op(Action::GetByExternalId))?
        .run(
            state.pipeline(),
            &headers,
            |_| Ok(TaskExternalKey { external_id: path_id(id)? }),
            move |request| async move { tasks.get_by_external_id(request).await },
        )
        .await
}

#[utoipa::path(
    post,
    path = "/v1/task/create",
    request_body = CreateTask,
    responses(
        (status = 200, description = "Task created successfully", body = Task),
        (status = 400, description = "Bad request", body = ErrorEnvelope),
        (status = 401, description = "Unauthorized", body = ErrorEnvelope),
        (status = 403, description = "Forbidden", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Tasks"
)]
#[instrument(skip_all)]
pub async fn create_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Task>, ApiError> {
    let tasks = state.registry.task();

    state
        .dispatcher(op(Action::Create))?
        .run(
            state.pipeline(),
            &headers,
            |rules| validated::<CreateTask>(body, rules),
            move |request| async move { tasks.create(request).await },
        )
        .await
}

#[utoipa::path(
    put,
    path = "/v1/task/update",
    request_body = UpdateTask,
    responses(
        (status = 200, description = "Task updated successfully", body = Task),
        (status = 400, description = "Bad request", body = ErrorEnvelope),
        (status = 401, description = "Unauthorized", body = ErrorEnvelope),
        (status = 403, description = "Forbidden", body = ErrorEnvelope),
        (status = 404, description = "Task not found", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Tasks"
)]
#[instrument(skip_all)]
pub async fn update_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Task>, ApiError> {
    let tasks = state.registry.task();

    state
        .dispatcher(op(Action::Update))?
        .run(
            state.pipeline(),
            &headers,
            |rules| validated::<UpdateTask>(body, rules),
            move |request| async move { tasks.update(request).await },
        )
        .await
}

#[utoipa::path(
    delete,
    path = "/v1/task/delete/{id}",
    params(
        ("id" = String, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task deleted successfully", body = Empty),
        (status = 401, description = "Unauthorized", body = ErrorEnvelope),
        (status = 403, description = "Forbidden", body = ErrorEnvelope),
        (status = 404, description = "Task not found", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Tasks"
)]
#[instrument(skip(state, headers))]
pub async fn delete_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Empty>, ApiError> {
    let tasks = state.registry.task();

    state
        .dispatcher(op(Action::Delete))?
        .run(
            state.pipeline(),
            &headers,
            |_| Ok(TaskPrimaryKey { id: path_id(id)? }),
            move |request| async move { tasks.delete(request).await },
        )
        .await
}

#[utoipa::path(
    patch,
    path = "/v1/task/change_status",
    request_body = TaskChangeStatus,
    responses(
        (status = 200, description = "Status changed", body = Task),
        (status = 400, description = "Bad request", body = ErrorEnvelope),
        (status = 401, description = "Unauthorized", body = ErrorEnvelope),
        (status = 403, description = "Forbidden", body = ErrorEnvelope),
        (status = 404, description = "Task not found", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Tasks"
)]
#[instrument(skip_all)]
pub async fn change_task_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Task>, ApiError> {
    let tasks = state.registry.task();

    state
        .dispatcher(op(Action::ChangeStatus))?
        .run(
            state.pipeline(),
            &headers,
            |rules| validated::<TaskChangeStatus>(body, rules),
            move |request| async move { tasks.change_status(request).await },
        )
        .await
}
