use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::IntoResponse,
};
use shared::{responses::ErrorResponse, types::StaffRecord};
use validator::Validate;

use crate::{
    api::state::StaffAppState,
    domain::{search::SearchCriteria, staff::StaffInput},
    error::StaffServiceError,
};

#[utoipa::path(
    get,
    path = "/api/staff",
    tag = "Staff",
    operation_id = "list_staff",
    responses(
        (status = 200, description = "List all staff", body = Vec<StaffRecord>)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn find_all(
    State(state): State<Arc<StaffAppState>>,
) -> Result<Json<Vec<StaffRecord>>, StaffServiceError> {
    let output = state.staff_service.list_all().await?;
    Ok(Json(output))
}

#[utoipa::path(
    get,
    path = "/api/staff/{id}",
    tag = "Staff",
    operation_id = "get_staff",
    params(
        ("id" = String, Path, description = "Staff ID")
    ),
    responses(
        (status = 200, description = "Staff found", body = StaffRecord),
        (status = 404, description = "Staff not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn find_by_id(
    State(state): State<Arc<StaffAppState>>,
    Path(id): Path<String>,
) -> Result<Json<StaffRecord>, StaffServiceError> {
    let output = state.staff_service.get_by_id(&id).await?;

    match output {
        Some(s) => Ok(Json(s)),
        None => Err(StaffServiceError::NotFound("Staff not found".to_string())),
    }
}

#[utoipa::path(
    post,
    path = "/api/staff",
    tag = "Staff",
    operation_id = "create_staff",
    request_body = StaffInput,
    responses(
        (status = 201, description = "Staff created", body = StaffRecord),
        (status = 400, description = "Invalid payload or duplicate Staff ID", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn create(
    State(state): State<Arc<StaffAppState>>,
    payload: Result<Json<StaffInput>, JsonRejection>,
) -> Result<impl IntoResponse, StaffServiceError> {
    let Json(staff) = payload?;
    staff.validate()?;

    let output = state.staff_service.add(staff.into()).await?;
    let location = format!("/api/staff/{}", output.staff_id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(output),
    ))
}

#[utoipa::path(
    put,
    path = "/api/staff/{id}",
    tag = "Staff",
    operation_id = "update_staff",
    params(
        ("id" = String, Path, description = "Staff ID")
    ),
    request_body = StaffInput,
    responses(
        (status = 200, description = "Staff updated", body = StaffRecord),
        (status = 400, description = "Invalid payload or mismatched Staff ID", body = ErrorResponse),
        (status = 404, description = "Staff not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn update(
    State(state): State<Arc<StaffAppState>>,
    Path(id): Path<String>,
    payload: Result<Json<StaffInput>, JsonRejection>,
) -> Result<Json<StaffRecord>, StaffServiceError> {
    let Json(staff) = payload?;
    if staff.staff_id != id {
        return Err(StaffServiceError::BadRequest(
            "Staff ID in the path does not match the request body".to_string(),
        ));
    }
    staff.validate()?;

    let output = state.staff_service.update(&id, staff.into()).await?;

    Ok(Json(output))
}

#[utoipa::path(
    delete,
    path = "/api/staff/{id}",
    tag = "Staff",
    operation_id = "delete_staff",
    params(
        ("id" = String, Path, description = "Staff ID")
    ),
    responses(
        (status = 204, description = "Staff deleted"),
        (status = 404, description = "Staff not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): State<Arc<StaffAppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, StaffServiceError> {
    if state.staff_service.delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(StaffServiceError::NotFound("Staff not found".to_string()))
    }
}

#[utoipa::path(
    get,
    path = "/api/staff/search",
    tag = "Staff",
    operation_id = "search_staff",
    params(SearchCriteria),
    responses(
        (status = 200, description = "Staff matching every given filter", body = Vec<StaffRecord>)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn search(
    State(state): State<Arc<StaffAppState>>,
    query: Result<Query<SearchCriteria>, QueryRejection>,
) -> Result<Json<Vec<StaffRecord>>, StaffServiceError> {
    let Query(criteria) = query?;
    let output = state.staff_service.search(&criteria).await?;
    Ok(Json(output))
}
