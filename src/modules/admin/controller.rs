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
use gateway_proto::admin_service::{
    Admin, AdminChangePassword, AdminChangePasswordResponse, AdminLoginRequest,
    AdminLoginResponse, AdminPrimaryKey, AdminRegisterConfRequest, AdminRegisterRequest,
    AdminRegisterResponse, CreateAdmin, Empty, GetListAdminRequest, GetListAdminResponse,
    UpdateAdmin,
};

use crate::state::AppState;
use crate::validator::{list_request, path_id, validated};

const fn op(action: Action) -> Operation {
    Operation::new(Resource::Admin, action)
}

#[utoipa::path(
    get,
    path = "/v1/admin/getall",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of admins", body = GetListAdminResponse),
        (status = 400, description = "Invalid paging parameters", body = ErrorEnvelope),
        (status = 401, description = "Unauthorized", body = ErrorEnvelope),
        (status = 403, description = "Forbidden - superadmin or manager only", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admins"
)]
#[instrument(skip_all)]
pub async fn get_admins(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Json<GetListAdminResponse>, ApiError> {
    let admins = state.registry.admin();

    state
        .dispatcher(op(Action::GetList))?
        .run(
            state.pipeline(),
            &headers,
            |_| list_request::<GetListAdminRequest>(&uri),
            move |request| async move { admins.get_list(request).await },
        )
        .await
}

#[utoipa::path(
    get,
    path = "/v1/admin/get/{id}",
    params(
        ("id" = String, Path, description = "Admin ID")
    ),
    responses(
        (status = 200, description = "Admin details", body = Admin),
        (status = 401, description = "Unauthorized", body = ErrorEnvelope),
        (status = 403, description = "Forbidden", body = ErrorEnvelope),
        (status = 404, description = "Admin not found", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admins"
)]
#[instrument(skip(state, headers))]
pub async fn get_admin(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Admin>, ApiError> {
    let admins = state.registry.admin();

    state
        .dispatcher(op(Action::GetById))?
        .run(
            state.pipeline(),
            &headers,
            |_| Ok(AdminPrimaryKey { id: path_id(id)? }),
            move |request| async move { admins.get_by_id(request).await },
        )
        .await
}

#[utoipa::path(
    post,
    path = "/v1/admin/create",
    request_body = CreateAdmin,
    responses(
        (status = 200, description = "Admin created successfully", body = Admin),
        (status = 400, description = "Bad request", body = ErrorEnvelope),
        (status = 401, description = "Unauthorized", body = ErrorEnvelope),
        (status = 403, description = "Forbidden - superadmin or manager only", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admins"
)]
#[instrument(skip_all)]
pub async fn create_admin(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Admin>, ApiError> {
    let admins = state.registry.admin();

    state
        .dispatcher(op(Action::Create))?
        .run(
            state.pipeline(),
            &headers,
            |rules| validated::<CreateAdmin>(body, rules),
            move |request| async move { admins.create(request).await },
        )
        .await
}

#[utoipa::path(
    put,
    path = "/v1/admin/update",
    request_body = UpdateAdmin,
    responses(
        (status = 200, description = "Admin updated successfully", body = Admin),
        (status = 400, description = "Bad request", body = ErrorEnvelope),
        (status = 401, description = "Unauthorized", body = ErrorEnvelope),
        (status = 403, description = "Forbidden", body = ErrorEnvelope),
        (status = 404, description = "Admin not found", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admins"
)]
#[instrument(skip_all)]
pub async fn update_admin(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Admin>, ApiError> {
    let admins = state.registry.admin();

    state
        .dispatcher(op(Action::Update))?
        .run(
            state.pipeline(),
            &headers,
            |rules| validated::<UpdateAdmin>(body, rules),
            move |request| async move { admins.update(request).await },
        )
        .await
}

#[utoipa::path(
    delete,
    path = "/v1/admin/delete/{id}",
    params(
        ("id" = String, Path, description = "Admin ID")
    ),
    responses(
        (status = 200, description = "Admin deleted successfully", body = Empty),
        (status = 401, description = "Unauthorized", body = ErrorEnvelope),
        (status = 403, description = "Forbidden", body = ErrorEnvelope),
        (status = 404, description = "Admin not found", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admins"
)]
#[instrument(skip(state, headers))]
pub async fn delete_admin(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Empty>, ApiError> {
    let admins = state.registry.admin();

    state
        .dispatcher(op(Action::Delete))?
        .run(
            state.pipeline(),
            &headers,
            |_| Ok(AdminPrimaryKey { id: path_id(id)? }),
            move |request| async move { admins.delete(request).await },
        )
        .await
}

#[utoipa::path(
    patch,
    path = "/v1/admin/change_password",
    request_body = AdminChangePassword,
    responses(
        (status = 200, description = "Password changed", body = AdminChangePasswordResponse),
        (status = 400, description = "Password does not meet the policy", body = ErrorEnvelope),
        (status = 401, description = "Unauthorized", body = ErrorEnvelope),
        (status = 403, description = "Forbidden", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admins"
)]
#[instrument(skip_all)]
pub async fn change_admin_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<AdminChangePasswordResponse>, ApiError> {
    let admins = state.registry.admin();

    state
        .dispatcher(op(Action::ChangePassword))?
        .run(
            state.pipeline(),
            &headers,
            |rules| validated::<AdminChangePassword>(body, rules),
            move |request| async move { admins.change_password(request).await },
        )
        .await
}

#[utoipa::path(
    post,
    path = "/v1/admin/login",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AdminLoginResponse),
        (status = 400, description = "Bad request", body = ErrorEnvelope),
        (status = 401, description = "Invalid credentials", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tag = "Admins"
)]
#[instrument(skip_all)]
pub async fn login_admin(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<AdminLoginResponse>, ApiError> {
    let admins = state.registry.admin();

    state
        .dispatcher(op(Action::Login))?
        .run(
            state.pipeline(),
            &headers,
            |rules| validated::<AdminLoginRequest>(body, rules),
            move |request| async move { admins.login(request).await },
        )
        .await
}

#[utoipa::path(
    post,
    path = "/v1/admin/register",
    request_body = AdminRegisterRequest,
    responses(
        (status = 200, description = "Confirmation code sent", body = AdminRegisterResponse),
        (status = 400, description = "Bad request", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tag = "Admins"
)]
#[instrument(skip_all)]
pub async fn register_admin(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<AdminRegisterResponse>, ApiError> {
    let admins = state.registry.admin();

    state
        .dispatcher(op(Action::Register))?
        .run(
            state.pipeline(),
            &headers,
            |rules| validated::<AdminRegisterRequest>(body, rules),
            move |request| async move { admins.register(request).await },
        )
        .await
}

#[utoipa::path(
    post,
    path = "/v1/admin/register-confirm",
    request_body = AdminRegisterConfRequest,
    responses(
        (status = 200, description = "Registration confirmed", body = AdminLoginResponse),
        (status = 400, description = "Bad request", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tag = "Admins"
)]
#[instrument(skip_all)]
pub async fn confirm_admin_registration(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<AdminLoginResponse>, ApiError> {
    let admins = state.registry.admin();

    state
        .dispatcher(op(Action::RegisterConfirm))?
        .run(
            state.pipeline(),
            &headers,
            |rules| validated::<AdminRegisterConfRequest>(body, rules),
            move |request| async move { admins.register_confirm(request).await },
        )
        .await
}
