//! Typed call stubs, one trait per backend service.
//!
//! The dispatcher only sees these traits. Production stubs are the
//! generated tonic clients over a shared [`Channel`](tonic::transport::Channel);
//! tests substitute in-process fakes.

use async_trait::async_trait;
use tonic::transport::Channel;
use tonic::{Request, Response, Status};

use gateway_proto::admin_service::{self, admin_service_client::AdminServiceClient};
use gateway_proto::student_service::{self, student_service_client::StudentServiceClient};
use gateway_proto::task_service::{self, task_service_client::TaskServiceClient};

/// Declares a stub trait and implements it for the generated client.
///
/// Each call clones the client, which only clones the channel handle, so
/// concurrent requests share one HTTP/2 connection.
macro_rules! backend_stub {
    (
        $(#[$meta:meta])*
        $name:ident for $client:ty {
            $( fn $method:ident($req:ty) -> $resp:ty; )+
        }
    ) => {
        $(#[$meta])*
        #[async_trait]
        pub trait $name: Send + Sync {
            $(
                async fn $method(&self, request: Request<$req>) -> Result<Response<$resp>, Status>;
            )+
        }

        #[async_trait]
        impl $name for $client {
            $(
                async fn $method(&self, request: Request<$req>) -> Result<Response<$resp>, Status> {
                    let mut client = self.clone();
                    <$client>::$method(&mut client, request).await
                }
            )+
        }
    };
}

backend_stub! {
    /// `admin_service.AdminService`
    AdminStub for AdminServiceClient<Channel> {
        fn create(admin_service::CreateAdmin) -> admin_service::Admin;
        fn get_by_id(admin_service::AdminPrimaryKey) -> admin_service::Admin;
        fn get_list(admin_service::GetListAdminRequest) -> admin_service::GetListAdminResponse;
        fn update(admin_service::UpdateAdmin) -> admin_service::Admin;
        fn delete(admin_service::AdminPrimaryKey) -> admin_service::Empty;
        fn change_password(admin_service::AdminChangePassword) -> admin_service::AdminChangePasswordResponse;
        fn login(admin_service::AdminLoginRequest) -> admin_service::AdminLoginResponse;
        fn register(admin_service::AdminRegisterRequest) -> admin_service::AdminRegisterResponse;
        fn register_confirm(admin_service::AdminRegisterConfRequest) -> admin_service::AdminLoginResponse;
    }
}

backend_stub! {
    /// `student_service.StudentService`
    StudentStub for StudentServiceClient<Channel> {
        fn create(student_service::CreateStudent) -> student_service::Student;
        fn get_by_id(student_service::StudentPrimaryKey) -> student_service::Student;
        fn get_list(student_service::GetListStudentRequest) -> student_service::GetListStudentResponse;
        fn update(student_service::UpdateStudent) -> student_service::Student;
        fn delete(student_service::StudentPrimaryKey) -> student_service::Empty;
        fn change_password(student_service::StudentChangePassword) -> student_service::StudentChangePasswordResponse;
        fn login(student_service::StudentLoginRequest) -> student_service::StudentLoginResponse;
        fn register(student_service::StudentRegisterRequest) -> student_service::StudentRegisterResponse;
        fn register_confirm(student_service::StudentRegisterConfRequest) -> student_service::StudentLoginResponse;
    }
}

backend_stub! {
    /// `task_service.TaskService`
    TaskStub for TaskServiceClient<Channel> {
        fn create(task_service::CreateTask) -> task_service::Task;
        fn get_by_id(task_service::TaskPrimaryKey) -> task_service::Task;
        fn get_by_external_id(task_service::TaskExternalKey) -> task_service::Task;
        fn get_list(task_service::GetListTaskRequest) -> task_service::GetListTaskResponse;
        fn update(task_service::UpdateTask) -> task_service::Task;
        fn delete(task_service::TaskPrimaryKey) -> task_service::Empty;
        fn change_status(task_service::TaskChangeStatus) -> task_service::Task;
    }
}
