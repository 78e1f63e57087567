use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::api::{
    handler::{report, staff},
    state::StaffAppState,
};

/// Application routes without transport middleware, shared by the binary and tests.
pub fn staff_routes(state: Arc<StaffAppState>) -> Router {
    Router::new()
        .route(
            "/headpat",
            get(|| async {
                axum::Json(shared::responses::HeadpatResponse {
                    message: "nyaa~! all systems operational, senpai! (=^-w-^=)",
                })
            }),
        )
        .route("/api/staff", get(staff::find_all).post(staff::create))
        .route("/api/staff/search", get(staff::search))
        .route(
            "/api/staff/{id}",
            get(staff::find_by_id)
                .put(staff::update)
                .delete(staff::delete),
        )
        .route("/api/staff/export/excel", post(report::export_excel))
        .route("/api/staff/export/pdf", post(report::export_pdf))
        .with_state(state)
}
