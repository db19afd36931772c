use axum::{
    Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::web::{AppState, auth, dashboard};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(auth::login_page))
        .route("/login", post(auth::process_login))
        .route("/logout", post(auth::logout))
        .route(
            "/dashboard",
            get(dashboard::dashboard_page).post(dashboard::apply_filters),
        )
        .route("/dashboard/export", get(dashboard::export_csv))
        .route("/healthz", get(healthz))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}
