use crate::modules::task::controller::{
    change_task_status, create_task, delete_task, get_task, get_task_by_external_id, get_tasks,
    update_task,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

pub fn init_task_router() -> Router<AppState> {
    Router::new()
        .route("/getall", get(get_tasks))
        .route("/get/{id}", get(get_task))
        .route("/get_by_task_id/{id}", get(get_task_by_external_id))
        .route("/create", post(create_task))
        .route("/update", put(update_task))
        .route("/delete/{id}", delete(delete_task))
        .route("/change_status", patch(change_task_status))
}
