use axum::{
	Json, Router,
	extract::{Path, Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use caselens_service::{CaseDetail, Error, SearchRequest, SearchResponse};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/cases/search", post(search))
		.route("/v1/cases/random", get(random_cases))
		.route("/v1/cases/{case_id}", get(get_case))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	Json(payload): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
	let response = state.service.search(payload).await?;

	Ok(Json(response))
}

#[derive(Debug, Deserialize)]
struct RandomParams {
	limit: Option<u32>,
}

async fn random_cases(
	State(state): State<AppState>,
	Query(params): Query<RandomParams>,
) -> Result<Json<Vec<CaseDetail>>, ApiError> {
	let response = state.service.random_cases(params.limit).await?;

	Ok(Json(response))
}

async fn get_case(
	State(state): State<AppState>,
	Path(case_id): Path<String>,
) -> Result<Json<CaseDetail>, ApiError> {
	let response = state.service.get_case(&case_id).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		let message = err.to_string();

		match err {
			Error::InvalidRequest { .. } =>
				ApiError::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message),
			Error::NotFound { .. } => ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", message),
			Error::Embedding { .. } => {
				tracing::error!(error = %message, "Embedding provider failed.");

				ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "EMBEDDING_UNAVAILABLE", message)
			},
			Error::Rerank { .. } => {
				tracing::error!(error = %message, "Rerank provider failed.");

				ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "RERANK_UNAVAILABLE", message)
			},
			Error::Storage { .. } => {
				tracing::error!(error = %message, "Case storage failed.");

				ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "STORAGE_UNAVAILABLE", message)
			},
			Error::Timeout { .. } =>
				ApiError::new(StatusCode::GATEWAY_TIMEOUT, "DEADLINE_EXCEEDED", message),
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
