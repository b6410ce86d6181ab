//! API Handlers
use crate::error::ApiError;
use crate::identity::{is_cookie_value, ClientIp};
use crate::request::{
    LoginResponse, RecallLastReportRequest, SingleReportRequest, SingleReportResponse,
};
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, StringRejection};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use dropstat_core::{DropError, Submission};
use serde_json::{json, Value};

/// Prefix that marks a login as an internal account, created on first use
pub const INTERNAL_USER_ID_PREFIX: &str = "internal_";

pub async fn submit_report(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    headers: HeaderMap,
    payload: Result<Json<SingleReportRequest>, JsonRejection>,
) -> Result<(StatusCode, HeaderMap, Json<SingleReportResponse>), ApiError> {
    let Json(request) = payload?;
    let drops = request.typed_drops()?;

    let user_id = match state.identity.read_identity(&headers) {
        Some(user_id) => user_id,
        None => state.identity.create_identity(&ip)?,
    };
    tracing::info!(
        uid = %user_id,
        stage = %request.stage_id,
        server = %request.server,
        lines = drops.len(),
        "POST /report"
    );

    let receipt = state.submissions.submit(Submission {
        stage_id: request.stage_id,
        server: request.server,
        source: request.source,
        version: request.version,
        drops,
        user_id: user_id.clone(),
        ip,
    })?;
    state.metrics.record_report(receipt.is_reliable);

    let mut response_headers = HeaderMap::new();
    if let Some((name, value)) = state.identity.identity_header(&user_id) {
        response_headers.insert(name, value);
    }

    Ok((
        StatusCode::CREATED,
        response_headers,
        Json(SingleReportResponse {
            report_hash: receipt.report_hash,
        }),
    ))
}

pub async fn recall_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<RecallLastReportRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Some(user_id) = state.identity.read_identity(&headers) else {
        tracing::error!("Error in recall_report: Cannot read user ID");
        return Err(DropError::BusinessRule("Cannot read user ID".to_string()).into());
    };
    let Json(request) = payload?;
    request.validate()?;

    tracing::info!(uid = %user_id, "POST /report/recall");
    match state.recalls.recall(&user_id, &request.report_hash) {
        Ok(_) => {
            state.metrics.record_recall("ok");
            Ok(StatusCode::OK)
        }
        Err(err) => {
            state.metrics.record_recall(err.code().as_str());
            Err(err.into())
        }
    }
}

/// Log in with an existing user id (plain-text body)
pub async fn login(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    body: Result<String, StringRejection>,
) -> Result<(StatusCode, HeaderMap, Json<LoginResponse>), ApiError> {
    let raw = body?;
    let raw = raw.trim();
    let (user_id, is_internal) = match raw.strip_prefix(INTERNAL_USER_ID_PREFIX) {
        Some(rest) => (rest, true),
        None => (raw, false),
    };
    if user_id.is_empty() {
        return Err(DropError::Validation("userID: must not be blank".to_string()).into());
    }
    if !is_cookie_value(user_id) {
        return Err(DropError::Validation(
            "userID: contains characters not allowed in a cookie".to_string(),
        )
        .into());
    }

    if state.users.find_user(user_id)?.is_none() {
        if !is_internal {
            return Err(DropError::NotFound(format!("user not found: uid={}", user_id)).into());
        }
        state.users.create_user_with_id(user_id, &ip)?;
        state.users.add_tag(user_id, "internal")?;
        tracing::info!(uid = user_id, "created internal user");
    }

    let mut headers = HeaderMap::new();
    if let Some((name, value)) = state.identity.identity_header(user_id) {
        headers.insert(name, value);
    }
    Ok((
        StatusCode::OK,
        headers,
        Json(LoginResponse {
            user_id: user_id.to_string(),
        }),
    ))
}

pub async fn metrics(State(state): State<AppState>) -> Result<String, ApiError> {
    state
        .metrics
        .encode()
        .map_err(|e| ApiError(DropError::Service(e.to_string())))
}

pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") })),
    )
}
