use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::header,
    response::{IntoResponse, Response},
};

use crate::{
    api::state::StaffAppState,
    domain::{
        report::{RenderedReport, ReportFormat},
        search::SearchCriteria,
    },
    error::StaffServiceError,
};

fn attachment(report: RenderedReport) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", report.format.file_name());
    (
        [
            (header::CONTENT_TYPE, report.format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.bytes,
    )
        .into_response()
}

#[utoipa::path(
    post,
    path = "/api/staff/export/excel",
    tag = "Reports",
    operation_id = "export_staff_excel",
    request_body = SearchCriteria,
    responses(
        (status = 200, description = "Spreadsheet of matching staff",
            content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            body = Vec<u8>)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn export_excel(
    State(state): State<Arc<StaffAppState>>,
    payload: Result<Json<SearchCriteria>, JsonRejection>,
) -> Result<Response, StaffServiceError> {
    let Json(criteria) = payload?;
    let report = state
        .staff_service
        .export_report(&criteria, ReportFormat::Spreadsheet)
        .await?;

    Ok(attachment(report))
}

#[utoipa::path(
    post,
    path = "/api/staff/export/pdf",
    tag = "Reports",
    operation_id = "export_staff_pdf",
    request_body = SearchCriteria,
    responses(
        (status = 200, description = "PDF table of matching staff",
            content_type = "application/pdf", body = Vec<u8>)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn export_pdf(
    State(state): State<Arc<StaffAppState>>,
    payload: Result<Json<SearchCriteria>, JsonRejection>,
) -> Result<Response, StaffServiceError> {
    let Json(criteria) = payload?;
    let report = state
        .staff_service
        .export_report(&criteria, ReportFormat::Document)
        .await?;

    Ok(attachment(report))
}
