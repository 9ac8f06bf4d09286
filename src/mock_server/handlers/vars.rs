//! Workspace variable endpoint handlers.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tokio::sync::RwLock;

use crate::mock_server::state::{CreateRejection, MockState};
use crate::{CreatePayload, Document};

/// A JSON:API error response with a single error object.
fn error_response(status: StatusCode, title: &str, detail: &str) -> Response {
    (
        status,
        Json(serde_json::json!({
            "errors": [{
                "status": status.as_u16().to_string(),
                "title": title,
                "detail": detail,
            }]
        })),
    )
        .into_response()
}

fn internal_error(error: &serde_json::Error) -> Response {
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal error",
        &error.to_string(),
    )
}

/// Reject the request unless it carries the required bearer token.
fn check_auth(state: &MockState, headers: &HeaderMap) -> Option<Response> {
    let required = state.required_token.as_ref()?;
    let expected = format!("Bearer {required}");

    let provided = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    if provided == Some(expected.as_str()) {
        None
    } else {
        Some(error_response(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "invalid or missing bearer token",
        ))
    }
}

/// GET /api/v2/workspaces/{workspace_id}/vars
pub async fn list_variables(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(workspace_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let state = state.read().await;

    if let Some(rejection) = check_auth(&state, &headers) {
        return rejection;
    }

    match state.list_variables(&workspace_id) {
        Some(variables) => match variables
            .iter()
            .map(MockState::api_view)
            .collect::<serde_json::Result<Vec<_>>>()
        {
            Ok(data) => (StatusCode::OK, Json(Document::new(data))).into_response(),
            Err(e) => internal_error(&e),
        },
        None => error_response(
            StatusCode::NOT_FOUND,
            "not found",
            &format!("workspace {workspace_id} not found"),
        ),
    }
}

/// POST /api/v2/workspaces/{workspace_id}/vars
pub async fn create_variable(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(workspace_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut state = state.write().await;

    if let Some(rejection) = check_auth(&state, &headers) {
        return rejection;
    }

    let payload: CreatePayload = match serde_json::from_slice(&body) {
        Ok(p) => p,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, "malformed request", &e.to_string())
        }
    };

    match state.create_variable(&workspace_id, payload) {
        Ok(variable) => match MockState::api_view(&variable) {
            Ok(data) => (StatusCode::CREATED, Json(Document::new(data))).into_response(),
            Err(e) => internal_error(&e),
        },
        Err(CreateRejection::WorkspaceNotFound) => error_response(
            StatusCode::NOT_FOUND,
            "not found",
            &format!("workspace {workspace_id} not found"),
        ),
        Err(CreateRejection::KeyTaken) => error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid attribute",
            "Key has already been taken",
        ),
    }
}
