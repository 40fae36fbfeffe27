//! Session status handler
//!
//! Polls the remote service for a session. When the session we started
//! comes back with a signature and certificate, the pending record is
//! consumed and the result verified before the payload is returned. A
//! failed verification is remembered, so in strict mode every later poll
//! of that session is refused too.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use dtoken_bridge::StatusView;

use super::AppState;
use crate::api::error::ApiError;
use crate::config::VerificationMode;
use crate::core::verify_completion;

/// Get the current state of a session
///
/// GET /api/status/{session_id}
pub async fn status(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let strict = state.verification_mode == VerificationMode::Strict;
    if strict {
        if let Some(report) = state.store.failure(&session_id).await? {
            warn!(session_id = %session_id, "Session already failed verification");
            return Err(ApiError::VerificationFailed(report));
        }
    }

    let client = state.client.clone();
    let id = session_id.clone();
    let data = state
        .client
        .with_token(|token| async move { client.status(&token, &id).await })
        .await?;

    let view = StatusView::from_payload(&data);
    let Some((signature, certificate)) = view.signed_result() else {
        debug!(session_id = %session_id, state = ?view.state, "Session not complete");
        return Ok(Json(data));
    };

    let Some(record) = state.store.take(&session_id).await? else {
        debug!(session_id = %session_id, "No pending session recorded, skipping verification");
        return Ok(Json(data));
    };

    let report = verify_completion(&session_id, &record, signature, certificate, Utc::now());
    if !report.passed() {
        warn!(
            session_id = %session_id,
            result = ?view.result,
            mode = ?state.verification_mode,
            "Completed session failed verification"
        );
        state.store.record_failure(&session_id, report.clone()).await?;
        if strict {
            return Err(ApiError::VerificationFailed(report));
        }
    }

    Ok(Json(data))
}
