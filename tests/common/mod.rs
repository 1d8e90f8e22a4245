//! In-process fake backends and request helpers for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request as HttpRequest, StatusCode};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use serde_json::Value;
use tonic::{Code, Request, Response, Status};
use tower::ServiceExt;
use uuid::Uuid;

use api_gateway::gateway_auth::create_token;
use api_gateway::gateway_config::{CorsConfig, JwtConfig};
use api_gateway::gateway_core::RuleSet;
use api_gateway::gateway_proto::admin_service::{self as admin, Admin};
use api_gateway::gateway_proto::student_service::{self as student, Student};
use api_gateway::gateway_proto::task_service::{self as task, Task};
use api_gateway::policy::PolicyTable;
use api_gateway::registry::{AdminStub, ServiceRegistry, StudentStub, TaskStub};
use api_gateway::router::init_router;
use api_gateway::state::AppState;

pub const JWT_SECRET: &str = "integration-test-secret";

/// How a fake backend answers while a failure is injected.
#[derive(Debug, Clone)]
pub enum Injected {
    Status(Code, String),
    /// Locally produced transport failure, e.g. connection refused.
    Transport,
}

impl Injected {
    fn status(&self) -> Status {
        match self {
            Self::Status(code, message) => Status::new(*code, message.clone()),
            Self::Transport => Status::from_error(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "tcp connect error: 127.0.0.1:9101",
            ))),
        }
    }
}

/// Call counting and failure injection shared by every fake.
#[derive(Debug, Default)]
pub struct Backend {
    calls: AtomicUsize,
    failure: Mutex<Option<Injected>>,
    last_request: Mutex<Option<Value>>,
}

impl Backend {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail_with(&self, failure: Injected) {
        *self.failure.lock().unwrap() = Some(failure);
    }

    /// The last request message, as JSON.
    pub fn last_request(&self) -> Option<Value> {
        self.last_request.lock().unwrap().clone()
    }

    fn enter<T: serde::Serialize>(&self, request: &Request<T>) -> Result<(), Status> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(
            request.metadata().get("grpc-timeout").is_some(),
            "deadline not propagated"
        );
        *self.last_request.lock().unwrap() = serde_json::to_value(request.get_ref()).ok();

        match self.failure.lock().unwrap().as_ref() {
            Some(failure) => Err(failure.status()),
            None => Ok(()),
        }
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn token_pair(id: &str) -> (String, String) {
    (format!("access-{}", id), format!("refresh-{}", id))
}

#[derive(Debug, Default)]
pub struct FakeAdmins {
    pub backend: Backend,
    store: Mutex<HashMap<String, Admin>>,
}

#[async_trait]
impl AdminStub for FakeAdmins {
    async fn create(&self, request: Request<admin::CreateAdmin>) -> Result<Response<Admin>, Status> {
        self.backend.enter(&request)?;
        let req = request.into_inner();
        let record = Admin {
            id: Uuid::new_v4().to_string(),
            full_name: req.full_name,
            email: req.email,
            phone: req.phone,
            created_at: now(),
            updated_at: now(),
        };
        self.store.lock().unwrap().insert(record.id.clone(), record.clone());
        Ok(Response::new(record))
    }

    async fn get_by_id(&self, request: Request<admin::AdminPrimaryKey>) -> Result<Response<Admin>, Status> {
        self.backend.enter(&request)?;
        let id = request.into_inner().id;
        self.store
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .map(Response::new)
            .ok_or_else(|| Status::not_found(format!("admin {} not found", id)))
    }

    async fn get_list(
        &self,
        request: Request<admin::GetListAdminRequest>,
    ) -> Result<Response<admin::GetListAdminResponse>, Status> {
        self.backend.enter(&request)?;
        let req = request.into_inner();
        let mut admins: Vec<Admin> = self.store.lock().unwrap().values().cloned().collect();
        admins.sort_by(|a, b| a.id.cmp(&b.id));
        let count = admins.len() as i64;
        let admins = admins
            .into_iter()
            .filter(|a| a.full_name.contains(&req.search))
            .skip(req.offset as usize)
            .take(req.limit as usize)
            .collect();
        Ok(Response::new(admin::GetListAdminResponse { count, admins }))
    }

    async fn update(&self, request: Request<admin::UpdateAdmin>) -> Result<Response<Admin>, Status> {
        self.backend.enter(&request)?;
        let req = request.into_inner();
        let mut store = self.store.lock().unwrap();
        let record = store
            .get_mut(&req.id)
            .ok_or_else(|| Status::not_found(format!("admin {} not found", req.id)))?;
        record.full_name = req.full_name;
        record.email = req.email;
        record.phone = req.phone;
        record.updated_at = now();
        Ok(Response::new(record.clone()))
    }

    async fn delete(&self, request: Request<admin::AdminPrimaryKey>) -> Result<Response<admin::Empty>, Status> {
        self.backend.enter(&request)?;
        let id = request.into_inner().id;
        match self.store.lock().unwrap().remove(&id) {
            Some(_) => Ok(Response::new(admin::Empty {})),
            None => Err(Status::not_found(format!("admin {} not found", id))),
        }
    }

    async fn change_password(
        &self,
        request: Request<admin::AdminChangePassword>,
    ) -> Result<Response<admin::AdminChangePasswordResponse>, Status> {
        self.backend.enter(&request)?;
        Ok(Response::new(admin::AdminChangePasswordResponse {
            comment: "password changed".to_string(),
        }))
    }

    async fn login(
        &self,
        request: Request<admin::AdminLoginRequest>,
    ) -> Result<Response<admin::AdminLoginResponse>, Status> {
        self.backend.enter(&request)?;
        let email = request.into_inner().email;
        let store = self.store.lock().unwrap();
        let record = store
            .values()
            .find(|a| a.email == email)
            .ok_or_else(|| Status::unauthenticated("invalid email or password"))?;
        let (access_token, refresh_token) = token_pair(&record.id);
        Ok(Response::new(admin::AdminLoginResponse {
            id: record.id.clone(),
            access_token,
            refresh_token,
        }))
    }

    async fn register(
        &self,
        request: Request<admin::AdminRegisterRequest>,
    ) -> Result<Response<admin::AdminRegisterResponse>, Status> {
        self.backend.enter(&request)?;
        Ok(Response::new(admin::AdminRegisterResponse {
            message: format!("code sent to {}", request.into_inner().email),
        }))
    }

    async fn register_confirm(
        &self,
        request: Request<admin::AdminRegisterConfRequest>,
    ) -> Result<Response<admin::AdminLoginResponse>, Status> {
        self.backend.enter(&request)?;
        let req = request.into_inner();
        if req.otp != "123456" {
            return Err(Status::invalid_argument("wrong confirmation code"));
        }
        let id = Uuid::new_v4().to_string();
        let (access_token, refresh_token) = token_pair(&id);
        Ok(Response::new(admin::AdminLoginResponse {
            id,
            access_token,
            refresh_token,
        }))
    }
}

#[derive(Debug, Default)]
pub struct FakeStudents {
    pub backend: Backend,
    store: Mutex<HashMap<String, Student>>,
}

#[async_trait]
impl StudentStub for FakeStudents {
    async fn create(&self, request: Request<student::CreateStudent>) -> Result<Response<Student>, Status> {
        self.backend.enter(&request)?;
        let req = request.into_inner();
        let record = Student {
            id: Uuid::new_v4().to_string(),
            full_name: req.full_name,
            email: req.email,
            phone: req.phone,
            birthday: req.birthday,
            created_at: now(),
            updated_at: now(),
        };
        self.store.lock().unwrap().insert(record.id.clone(), record.clone());
        Ok(Response::new(record))
    }

    async fn get_by_id(&self, request: Request<student::StudentPrimaryKey>) -> Result<Response<Student>, Status> {
        self.backend.enter(&request)?;
        let id = request.into_inner().id;
        self.store
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .map(Response::new)
            .ok_or_else(|| Status::not_found(format!("student {} not found", id)))
    }

    async fn get_list(
        &self,
        request: Request<student::GetListStudentRequest>,
    ) -> Result<Response<student::GetListStudentResponse>, Status> {
        self.backend.enter(&request)?;
        let req = request.into_inner();
        let mut students: Vec<Student> = self.store.lock().unwrap().values().cloned().collect();
        students.sort_by(|a, b| a.id.cmp(&b.id));
        let count = students.len() as i64;
        let students = students
            .into_iter()
            .skip(req.offset as usize)
            .take(req.limit as usize)
            .collect();
        Ok(Response::new(student::GetListStudentResponse { count, students }))
    }

    async fn update(&self, request: Request<student::UpdateStudent>) -> Result<Response<Student>, Status> {
        self.backend.enter(&request)?;
        let req = request.into_inner();
        let mut store = self.store.lock().unwrap();
        let record = store
            .get_mut(&req.id)
            .ok_or_else(|| Status::not_found(format!("student {} not found", req.id)))?;
        record.full_name = req.full_name;
        record.email = req.email;
        record.phone = req.phone;
        record.birthday = req.birthday;
        record.updated_at = now();
        Ok(Response::new(record.clone()))
    }

    async fn delete(&self, request: Request<student::StudentPrimaryKey>) -> Result<Response<student::Empty>, Status> {
        self.backend.enter(&request)?;
        let id = request.into_inner().id;
        match self.store.lock().unwrap().remove(&id) {
            Some(_) => Ok(Response::new(student::Empty {})),
            None => Err(Status::not_found(format!("student {} not found", id))),
        }
    }

    async fn change_password(
        &self,
        request: Request<student::StudentChangePassword>,
    ) -> Result<Response<student::StudentChangePasswordResponse>, Status> {
        self.backend.enter(&request)?;
        Ok(Response::new(student::StudentChangePasswordResponse {
            comment: "password changed".to_string(),
        }))
    }

    async fn login(
        &self,
        request: Request<student::StudentLoginRequest>,
    ) -> Result<Response<student::StudentLoginResponse>, Status> {
        self.backend.enter(&request)?;
        let email = request.into_inner().email;
        let store = self.store.lock().unwrap();
        let record = store
            .values()
            .find(|s| s.email == email)
            .ok_or_else(|| Status::unauthenticated("invalid email or password"))?;
        let (access_token, refresh_token) = token_pair(&record.id);
        Ok(Response::new(student::StudentLoginResponse {
            id: record.id.clone(),
            access_token,
            refresh_token,
        }))
    }

    async fn register(
        &self,
        request: Request<student::StudentRegisterRequest>,
    ) -> Result<Response<student::StudentRegisterResponse>, Status> {
        self.backend.enter(&request)?;
        Ok(Response::new(student::StudentRegisterResponse {
            message: format!("code sent to {}", request.into_inner().email),
        }))
    }

    async fn register_confirm(
        &self,
        request: Request<student::StudentRegisterConfRequest>,
    ) -> Result<Response<student::StudentLoginResponse>, Status> {
        self.backend.enter(&request)?;
        let req = request.into_inner();
        if req.otp != "123456" {
            return Err(Status::invalid_argument("wrong confirmation code"));
        }
        let id = Uuid::new_v4().to_string();
        let (access_token, refresh_token) = token_pair(&id);
        Ok(Response::new(student::StudentLoginResponse {
            id,
            access_token,
            refresh_token,
        }))
    }
}

#[derive(Debug, Default)]
pub struct FakeTasks {
    pub backend: Backend,
    store: Mutex<HashMap<String, Task>>,
}

impl FakeTasks {
    fn find(&self, predicate: impl Fn(&Task) -> bool, what: &str) -> Result<Task, Status> {
        self.store
            .lock()
            .unwrap()
            .values()
            .find(|t| predicate(t))
            .cloned()
            .ok_or_else(|| Status::not_found(format!("task {} not found", what)))
    }
}

#[async_trait]
impl TaskStub for FakeTasks {
    async fn create(&self, request: Request<task::CreateTask>) -> Result<Response<Task>, Status> {
        self.backend.enter(&request)?;
        let req = request.into_inner();
        let record = Task {
            id: Uuid::new_v4().to_string(),
            title: req.title,
            description: req.description,
            status: "new".to_string(),
            owner_id: req.owner_id,
            external_id: req.external_id,
            created_at: now(),
            updated_at: now(),
        };
        self.store.lock().unwrap().insert(record.id.clone(), record.clone());
        Ok(Response::new(record))
    }

    async fn get_by_id(&self, request: Request<task::TaskPrimaryKey>) -> Result<Response<Task>, Status> {
        self.backend.enter(&request)?;
        let id = request.into_inner().id;
        self.find(|t| t.id == id, &id).map(Response::new)
    }

    async fn get_by_external_id(
        &self,
        request: Request<task::TaskExternalKey>,
    ) -> Result<Response<Task>, Status> {
        self.backend.enter(&request)?;
        let external_id = request.into_inner().external_id;
        self.find(|t| t.external_id == external_id, &external_id)
            .map(Response::new)
    }

    async fn get_list(
        &self,
        request: Request<task::GetListTaskRequest>,
    ) -> Result<Response<task::GetListTaskResponse>, Status> {
        self.backend.enter(&request)?;
        let req = request.into_inner();
        let mut tasks: Vec<Task> = self
            .store
            .lock()
            .unwrap()
            .values()
            .filter(|t| req.owner_id.is_empty() || t.owner_id == req.owner_id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| a.id.cmp(&b.id));
        let count = tasks.len() as i64;
        let tasks = tasks
            .into_iter()
            .skip(req.offset as usize)
            .take(req.limit as usize)
            .collect();
        Ok(Response::new(task::GetListTaskResponse { count, tasks }))
    }

    async fn update(&self, request: Request<task::UpdateTask>) -> Result<Response<Task>, Status> {
        self.backend.enter(&request)?;
        let req = request.into_inner();
        let mut store = self.store.lock().unwrap();
        let record = store
            .get_mut(&req.id)
            .ok_or_else(|| Status::not_found(format!("task {} not found", req.id)))?;
        record.title = req.title;
        record.description = req.description;
        record.updated_at = now();
        Ok(Response::new(record.clone()))
    }

    async fn delete(&self, request: Request<task::TaskPrimaryKey>) -> Result<Response<task::Empty>, Status> {
        self.backend.enter(&request)?;
        let id = request.into_inner().id;
        match self.store.lock().unwrap().remove(&id) {
            Some(_) => Ok(Response::new(task::Empty {})),
            None => Err(Status::not_found(format!("task {} not found", id))),
        }
    }

    async fn change_status(&self, request: Request<task::TaskChangeStatus>) -> Result<Response<Task>, Status> {
        self.backend.enter(&request)?;
        let req = request.into_inner();
        let mut store = self.store.lock().unwrap();
        let record = store
            .get_mut(&req.id)
            .ok_or_else(|| Status::not_found(format!("task {} not found", req.id)))?;
        record.status = req.status;
        record.updated_at = now();
        Ok(Response::new(record.clone()))
    }
}

pub struct TestApp {
    pub router: Router,
    pub admins: Arc<FakeAdmins>,
    pub students: Arc<FakeStudents>,
    pub tasks: Arc<FakeTasks>,
    pub jwt_config: JwtConfig,
}

impl TestApp {
    pub fn new() -> Self {
        let admins = Arc::new(FakeAdmins::default());
        let students = Arc::new(FakeStudents::default());
        let tasks = Arc::new(FakeTasks::default());

        let registry = ServiceRegistry::from_stubs(admins.clone(), students.clone(), tasks.clone());
        let jwt_config = JwtConfig {
            secret: JWT_SECRET.to_string(),
            leeway: 0,
        };
        let rules = RuleSet::default().with_today(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());

        let state = AppState::new(
            registry,
            &PolicyTable::builtin().unwrap(),
            jwt_config.clone(),
            CorsConfig {
                allowed_origins: vec!["*".to_string()],
            },
            rules,
            Duration::from_secs(5),
        )
        .unwrap();

        Self {
            router: init_router(state),
            admins,
            students,
            tasks,
            jwt_config,
        }
    }

    /// A valid bearer credential for `role`.
    pub fn token(&self, role: &str) -> String {
        create_token("subject-1", role, 3600, &self.jwt_config)
    }

    pub fn total_calls(&self) -> usize {
        self.admins.backend.calls() + self.students.backend.calls() + self.tasks.backend.calls()
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = HttpRequest::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, body)
    }
}
