use axum::{
	Json, Router,
	body::Body,
	extract::{State, rejection::JsonRejection},
	http::{StatusCode, header::CONTENT_TYPE},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use lumen_service::{ChatReply, ChatRequest, Error as ServiceError, Mode, TestModeStatus};

const MISSING_QUERY: &str = "Отсутствует поисковый запрос";
const SEARCH_FAILED: &str = "Произошла ошибка при обработке поискового запроса";
const TOGGLE_FAILED: &str = "Ошибка при переключении тестового режима";
const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";
const SEARCH_PERFORMED_HEADER: &str = "x-search-performed";

#[derive(Debug, Deserialize)]
pub struct SearchBody {
	#[serde(default)]
	pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
	pub test_mode: bool,
	pub result: String,
}

#[derive(Debug, Serialize)]
pub struct ChatStubResponse {
	pub content: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TestModeBody {
	#[serde(default)]
	pub enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct TestModeToggleResponse {
	pub test_mode: bool,
	pub message: String,
}

#[derive(Debug, Serialize)]
pub struct TestModeStatusResponse {
	pub test_mode: bool,
	pub forced_test_mode: bool,
	pub message: String,
}
impl From<TestModeStatus> for TestModeStatusResponse {
	fn from(status: TestModeStatus) -> Self {
		Self {
			test_mode: status.test_mode,
			forced_test_mode: status.forced_test_mode,
			message: toggle_message(status.test_mode),
		}
	}
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/chat", post(chat))
		.route("/search", post(search))
		.route("/test-mode", post(set_test_mode))
		.route("/test-mode/status", get(test_mode_status))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn chat(
	State(state): State<AppState>,
	payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
	let Json(req) = payload.map_err(|err| ApiError::bad_request(err.body_text()))?;
	let mode = state.service.gate.mode();

	match state.service.chat(req, mode).await? {
		ChatReply::Stub { content } => Ok(Json(ChatStubResponse { content }).into_response()),
		ChatReply::Stream { stream, search_performed } => {
			let stream = stream.inspect_err(|err| {
				tracing::warn!(error = %err, "LLM stream ended with an error.");
			});
			let headers = [
				(CONTENT_TYPE.as_str(), TEXT_PLAIN_UTF8),
				(SEARCH_PERFORMED_HEADER, if search_performed { "true" } else { "false" }),
			];

			Ok((headers, Body::from_stream(stream)).into_response())
		},
	}
}

async fn search(
	State(state): State<AppState>,
	payload: Result<Json<SearchBody>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
	let query = payload
		.ok()
		.and_then(|Json(body)| body.query)
		.filter(|query| !query.trim().is_empty())
		.ok_or_else(|| ApiError::bad_request(MISSING_QUERY))?;
	let mode = state.service.gate.mode();
	let result = state.service.search(&query, mode).await.map_err(|err| match err {
		ServiceError::InvalidRequest { .. } => ApiError::bad_request(MISSING_QUERY),
		other => {
			tracing::error!(error = %other, "Search request failed.");

			ApiError::internal(SEARCH_FAILED)
		},
	})?;

	Ok(Json(SearchResponse { test_mode: mode == Mode::Test, result }))
}

async fn set_test_mode(
	State(state): State<AppState>,
	payload: Result<Json<TestModeBody>, JsonRejection>,
) -> Result<Json<TestModeToggleResponse>, ApiError> {
	let Json(body) = payload.map_err(|err| {
		tracing::warn!(error = %err, "Rejected test mode toggle.");

		ApiError {
			status: StatusCode::BAD_REQUEST,
			message: TOGGLE_FAILED.to_string(),
			test_mode: Some(state.service.gate.status().test_mode),
		}
	})?;

	state.service.gate.set_explicit(body.enabled);

	Ok(Json(TestModeToggleResponse {
		test_mode: body.enabled,
		message: toggle_message(body.enabled),
	}))
}

async fn test_mode_status(State(state): State<AppState>) -> Json<TestModeStatusResponse> {
	Json(state.service.gate.status().into())
}

fn toggle_message(enabled: bool) -> String {
	format!("Тестовый режим {}", if enabled { "включен" } else { "выключен" })
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	test_mode: Option<bool>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	message: String,
	test_mode: Option<bool>,
}
impl ApiError {
	fn bad_request(message: impl Into<String>) -> Self {
		Self { status: StatusCode::BAD_REQUEST, message: message.into(), test_mode: None }
	}

	fn internal(message: impl Into<String>) -> Self {
		Self {
			status: StatusCode::INTERNAL_SERVER_ERROR,
			message: message.into(),
			test_mode: Some(false),
		}
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } => Self::bad_request(message),
			ServiceError::Provider { message } => {
				tracing::error!(error = %message, "Provider call failed.");

				Self::internal(message)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error: self.message, test_mode: self.test_mode };

		(self.status, Json(body)).into_response()
	}
}
