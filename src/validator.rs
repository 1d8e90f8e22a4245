//! Request decoding and field rules.
//!
//! Bodies and path segments arrive as extractor results and are only
//! inspected here, after authentication and authorization have already
//! run. An unreadable body or path is reported as a validation failure, as
//! is a decoding failure; rules then run in a fixed order per request type
//! and stop at the first violation.

use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, PathRejection};
use axum::extract::{Path, Query};
use axum::http::{StatusCode, Uri};
use serde::de::DeserializeOwned;
use serde_json::error::Category;

use gateway_core::{ApiError, ListQuery, Page, RuleSet, RuleViolation};
use gateway_proto::{admin_service, student_service, task_service};

/// Field rules applied to a decoded request.
pub trait RequestRules {
    fn check(&self, _rules: &RuleSet) -> Result<(), RuleViolation> {
        Ok(())
    }
}

fn decode_error(err: &serde_json::Error) -> ApiError {
    let message = err.to_string();

    if message.contains("missing field") {
        let field = message
            .split("missing field `")
            .nth(1)
            .and_then(|s| s.split('`').next())
            .unwrap_or("unknown");
        return ApiError::validation(format!("{} is required", field)).with_cause(field);
    }

    match err.classify() {
        Category::Data => ApiError::validation("Invalid field type in request"),
        _ => ApiError::validation("Invalid request body"),
    }
}

pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    if body.trim_ascii().is_empty() {
        return Err(ApiError::validation("Request body is required"));
    }

    serde_json::from_slice(body).map_err(|e| decode_error(&e))
}

/// The request body, or why it could not be read.
pub fn body_bytes(body: Result<Bytes, BytesRejection>) -> Result<Bytes, ApiError> {
    body.map_err(|rejection| match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => ApiError::validation("Request body is too large"),
        _ => ApiError::validation("Request body could not be read"),
    })
}

/// The `{id}` path segment, percent-decoded.
pub fn path_id(id: Result<Path<String>, PathRejection>) -> Result<String, ApiError> {
    id.map(|Path(id)| id)
        .map_err(|_| ApiError::validation("Invalid path parameter").with_cause("id"))
}

/// Reads and decodes the body, then applies the type's field rules.
pub fn validated<T>(body: Result<Bytes, BytesRejection>, rules: &RuleSet) -> Result<T, ApiError>
where
    T: DeserializeOwned + RequestRules,
{
    let body = body_bytes(body)?;
    let value: T = decode(&body)?;
    value.check(rules)?;
    Ok(value)
}

/// Parses listing parameters from the request URI.
pub fn list_query(uri: &Uri) -> Result<(ListQuery, Page), ApiError> {
    let Query(query) = Query::<ListQuery>::try_from_uri(uri)
        .map_err(|_| ApiError::validation("Invalid query string"))?;
    let page = query.page()?;
    Ok((query, page))
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Listing request for any of the backends.
pub trait ListRequest: Sized {
    fn from_query(query: &ListQuery, page: Page) -> Self;
}

impl ListRequest for admin_service::GetListAdminRequest {
    fn from_query(query: &ListQuery, page: Page) -> Self {
        Self {
            offset: to_i64(page.offset),
            limit: to_i64(page.limit),
            search: query.search(),
        }
    }
}

impl ListRequest for student_service::GetListStudentRequest {
    fn from_query(query: &ListQuery, page: Page) -> Self {
        Self {
            offset: to_i64(page.offset),
            limit: to_i64(page.limit),
            search: query.search(),
        }
    }
}

impl ListRequest for task_service::GetListTaskRequest {
    fn from_query(query: &ListQuery, page: Page) -> Self {
        Self {
            offset: to_i64(page.offset),
            limit: to_i64(page.limit),
            search: query.search(),
            owner_id: query.owner_id(),
        }
    }
}

pub fn list_request<T: ListRequest>(uri: &Uri) -> Result<T, ApiError> {
    let (query, page) = list_query(uri)?;
    Ok(T::from_query(&query, page))
}

impl RequestRules for admin_service::CreateAdmin {
    fn check(&self, rules: &RuleSet) -> Result<(), RuleViolation> {
        rules.email("email", &self.email)?;
        rules.phone("phone", &self.phone)?;
        rules.password("user_password", &self.user_password)
    }
}

impl RequestRules for admin_service::UpdateAdmin {
    fn check(&self, rules: &RuleSet) -> Result<(), RuleViolation> {
        rules.email("email", &self.email)?;
        rules.phone("phone", &self.phone)
    }
}

impl RequestRules for admin_service::AdminChangePassword {
    fn check(&self, rules: &RuleSet) -> Result<(), RuleViolation> {
        rules.password("new_password", &self.new_password)
    }
}

impl RequestRules for admin_service::AdminRegisterRequest {
    fn check(&self, rules: &RuleSet) -> Result<(), RuleViolation> {
        rules.email("email", &self.email)
    }
}

impl RequestRules for admin_service::AdminLoginRequest {}
impl RequestRules for admin_service::AdminRegisterConfRequest {}

impl RequestRules for student_service::CreateStudent {
    fn check(&self, rules: &RuleSet) -> Result<(), RuleViolation> {
        rules.email("email", &self.email)?;
        rules.phone("phone", &self.phone)?;
        rules.birthday("birthday", &self.birthday)?;
        rules.password("user_password", &self.user_password)
    }
}

impl RequestRules for student_service::UpdateStudent {
    fn check(&self, rules: &RuleSet) -> Result<(), RuleViolation> {
        rules.email("email", &self.email)?;
        rules.phone("phone", &self.phone)?;
        rules.birthday("birthday", &self.birthday)
    }
}

impl RequestRules for student_service::StudentChangePassword {
    fn check(&self, rules: &RuleSet) -> Result<(), RuleViolation> {
        rules.password("new_password", &self.new_password)
    }
}

impl RequestRules for student_service::StudentRegisterRequest {
    fn check(&self, rules: &RuleSet) -> Result<(), RuleViolation> {
        rules.email("email", &self.email)
    }
}

impl RequestRules for student_service::StudentLoginRequest {}
impl RequestRules for student_service::StudentRegisterConfRequest {}

impl RequestRules for task_service::CreateTask {}
impl RequestRules for task_service::UpdateTask {}
impl RequestRules for task_service::TaskChangeStatus {}
