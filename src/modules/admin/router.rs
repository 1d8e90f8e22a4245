use crate::modules::admin::controller::{
    change_admin_password, confirm_admin_registration, create_admin, delete_admin, get_admin,
    get_admins, login_admin, register_admin, update_admin,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

pub fn init_admin_router() -> Router<AppState> {
    Router::new()
        .route("/getall", get(get_admins))
        .route("/get/{id}", get(get_admin))
        .route("/create", post(create_admin))
        .route("/update", put(update_admin))
        .route("/delete/{id}", delete(delete_admin))
        .route("/change_password", patch(change_admin_password))
        .route("/login", post(login_admin))
        .route("/register", post(register_admin))
        .route("/register-confirm", post(confirm_admin_registration))
}
