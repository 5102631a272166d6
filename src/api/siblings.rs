//! Sibling relationship endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::{AppResult, ErrorResponse},
    models::sibling::{CreateSibling, Sibling, UpdateSibling},
};

use super::{ApiJson, ApiPath, ApiResponse};

/// List all sibling links
#[utoipa::path(
    get,
    path = "/siblings",
    tag = "siblings",
    responses(
        (status = 200, description = "List of sibling links (in the `data` field)", body = Vec<Sibling>)
    )
)]
pub async fn list_siblings(
    State(state): State<crate::AppState>,
) -> AppResult<Json<ApiResponse<Vec<Sibling>>>> {
    let siblings = state.services.siblings.list().await?;
    Ok(ApiResponse::success(siblings))
}

/// Get a sibling link by ID
#[utoipa::path(
    get,
    path = "/siblings/{id}",
    tag = "siblings",
    params(
        ("id" = i32, Path, description = "Sibling link ID")
    ),
    responses(
        (status = 200, description = "Sibling link", body = Sibling),
        (status = 404, description = "Sibling relationship not found", body = ErrorResponse)
    )
)]
pub async fn get_sibling(
    State(state): State<crate::AppState>,
    WithRejection(Path(id), _): ApiPath<i32>,
) -> AppResult<Json<ApiResponse<Sibling>>> {
    let sibling = state.services.siblings.get_by_id(id).await?;
    Ok(ApiResponse::success(sibling))
}

/// Link two users as siblings
#[utoipa::path(
    post,
    path = "/siblings",
    tag = "siblings",
    request_body = CreateSibling,
    responses(
        (status = 201, description = "Sibling link created, stored with user_id_1 < user_id_2", body = Sibling),
        (status = 400, description = "Missing fields or self link", body = ErrorResponse),
        (status = 404, description = "One or both users not found", body = ErrorResponse),
        (status = 409, description = "Sibling relationship already exists", body = ErrorResponse)
    )
)]
pub async fn create_sibling(
    State(state): State<crate::AppState>,
    WithRejection(Json(data), _): ApiJson<CreateSibling>,
) -> AppResult<(StatusCode, Json<ApiResponse<Sibling>>)> {
    let sibling = state.services.siblings.create(data).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(sibling, "Sibling relationship created"),
    ))
}

/// Update a sibling link
#[utoipa::path(
    put,
    path = "/siblings/{id}",
    tag = "siblings",
    params(
        ("id" = i32, Path, description = "Sibling link ID")
    ),
    request_body = UpdateSibling,
    responses(
        (status = 200, description = "Sibling link updated", body = Sibling),
        (status = 400, description = "Self link or identifier change", body = ErrorResponse),
        (status = 404, description = "Link or users not found", body = ErrorResponse),
        (status = 409, description = "Sibling relationship already exists", body = ErrorResponse)
    )
)]
pub async fn update_sibling(
    State(state): State<crate::AppState>,
    WithRejection(Path(id), _): ApiPath<i32>,
    WithRejection(Json(data), _): ApiJson<UpdateSibling>,
) -> AppResult<Json<ApiResponse<Sibling>>> {
    let sibling = state.services.siblings.update(id, data).await?;
    Ok(ApiResponse::with_message(sibling, "Sibling relationship updated"))
}

/// Delete a sibling link
#[utoipa::path(
    delete,
    path = "/siblings/{id}",
    tag = "siblings",
    params(
        ("id" = i32, Path, description = "Sibling link ID")
    ),
    responses(
        (status = 204, description = "Sibling link deleted"),
        (status = 404, description = "Sibling relationship not found", body = ErrorResponse)
    )
)]
pub async fn delete_sibling(
    State(state): State<crate::AppState>,
    WithRejection(Path(id), _): ApiPath<i32>,
) -> AppResult<StatusCode> {
    state.services.siblings.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
