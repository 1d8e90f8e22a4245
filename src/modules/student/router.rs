use crate::modules::student::controller::{
    change_student_password, confirm_student_registration, create_student, delete_student,
    get_student, get_students, login_student, register_student, update_student,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

pub fn init_student_router() -> Router<AppState> {
    Router::new()
        .route("/getall", get(get_students))
        .route("/get/{id}", get(get_student))
        .route("/create", post(create_student))
        .route("/update", put(update_student))
        .route("/delete/{id}", delete(delete_student))
        .route("/change_password", patch(change_student_password))
        .route("/login", post(login_student))
        .route("/register", post(register_student))
        .route("/register-confirm", post(confirm_student_registration))
}
