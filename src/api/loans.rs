//! Loan management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::{AppResult, ErrorResponse},
    models::loan::{CreateLoan, Loan, UpdateLoan},
};

use super::{ApiJson, ApiPath, ApiResponse};

/// List all loans, most recent first
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    responses(
        (status = 200, description = "List of loans (in the `data` field)", body = Vec<Loan>)
    )
)]
pub async fn list_loans(
    State(state): State<crate::AppState>,
) -> AppResult<Json<ApiResponse<Vec<Loan>>>> {
    let loans = state.services.loans.list().await?;
    Ok(ApiResponse::success(loans))
}

/// Get a loan by ID
#[utoipa::path(
    get,
    path = "/loans/{id}",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Loan details", body = Loan),
        (status = 404, description = "Loan not found", body = ErrorResponse)
    )
)]
pub async fn get_loan(
    State(state): State<crate::AppState>,
    WithRejection(Path(id), _): ApiPath<i32>,
) -> AppResult<Json<ApiResponse<Loan>>> {
    let loan = state.services.loans.get_by_id(id).await?;
    Ok(ApiResponse::success(loan))
}

/// Borrow a book
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = CreateLoan,
    responses(
        (status = 201, description = "Loan created, one copy taken off the shelf", body = Loan),
        (status = 400, description = "Missing fields", body = ErrorResponse),
        (status = 404, description = "User or book not found", body = ErrorResponse),
        (status = 409, description = "Book not available", body = ErrorResponse)
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    WithRejection(Json(data), _): ApiJson<CreateLoan>,
) -> AppResult<(StatusCode, Json<ApiResponse<Loan>>)> {
    let loan = state.services.loans.create(data).await?;
    Ok((StatusCode::CREATED, ApiResponse::with_message(loan, "Loan created")))
}

/// Set or clear a loan's return timestamp
#[utoipa::path(
    put,
    path = "/loans/{id}",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    request_body = UpdateLoan,
    responses(
        (status = 200, description = "Loan updated", body = Loan),
        (status = 400, description = "Invalid date or identifier change", body = ErrorResponse),
        (status = 404, description = "Loan not found", body = ErrorResponse),
        (status = 409, description = "No copy left to re-open the loan", body = ErrorResponse)
    )
)]
pub async fn update_loan(
    State(state): State<crate::AppState>,
    WithRejection(Path(id), _): ApiPath<i32>,
    WithRejection(Json(data), _): ApiJson<UpdateLoan>,
) -> AppResult<Json<ApiResponse<Loan>>> {
    let loan = state.services.loans.update(id, data).await?;
    Ok(ApiResponse::with_message(loan, "Loan updated"))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/loans/{id}/return",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = Loan),
        (status = 404, description = "Loan not found", body = ErrorResponse),
        (status = 409, description = "Already returned", body = ErrorResponse)
    )
)]
pub async fn return_loan(
    State(state): State<crate::AppState>,
    WithRejection(Path(id), _): ApiPath<i32>,
) -> AppResult<Json<ApiResponse<Loan>>> {
    let loan = state.services.loans.return_loan(id).await?;
    Ok(ApiResponse::with_message(loan, "Book returned"))
}

/// Delete a loan
#[utoipa::path(
    delete,
    path = "/loans/{id}",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 204, description = "Loan deleted"),
        (status = 404, description = "Loan not found", body = ErrorResponse)
    )
)]
pub async fn delete_loan(
    State(state): State<crate::AppState>,
    WithRejection(Path(id), _): ApiPath<i32>,
) -> AppResult<StatusCode> {
    state.services.loans.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
