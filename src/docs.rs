use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use gateway_core::{ErrorEnvelope, ErrorKind};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::admin::controller::get_admins,
        crate::modules::admin::controller::get_admin,
        crate::modules::admin::controller::create_admin,
        crate::modules::admin::controller::update_admin,
        crate::modules::admin::controller::delete_admin,
        crate::modules::admin::controller::change_admin_password,
        crate::modules::admin::controller::login_admin,
        crate::modules::admin::controller::register_admin,
        crate::modules::admin::controller::confirm_admin_registration,
        crate::modules::student::controller::get_students,
        crate::modules::student::controller::get_student,
        crate::modules::student::controller::create_student,
        crate::modules::student::controller::update_student,
        crate::modules::student::controller::delete_student,
        crate::modules::student::controller::change_student_password,
        crate::modules::student::controller::login_student,
        crate::modules::student::controller::register_student,
        crate::modules::student::controller::confirm_student_registration,
        crate::modules::task::controller::get_tasks,
        crate::modules::task::controller::get_task,
        crate::modules::task::controller::get_task_by_external_id,
        crate::modules::task::controller::create_task,
        crate::modules::task::controller::update_task,
        crate::modules::task::controller::delete_task,
        crate::modules::task::controller::change_task_status,
    ),
    components(
        schemas(
            ErrorEnvelope,
            ErrorKind,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Admins", description = "Administrator accounts (identity service)"),
        (name = "Students", description = "Student accounts, also served under /v1/user"),
        (name = "Tasks", description = "Task management service")
    ),
    info(
        title = "API Gateway",
        version = "0.1.0",
        description = "HTTP/JSON front for the admin, student and task gRPC services. Every protected endpoint expects a bearer JWT issued by the identity service.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
