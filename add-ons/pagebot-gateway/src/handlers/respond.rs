//! Respond handler: the only route that runs the matcher. Page glue posts the raw
//! chat input together with the topic key of the page it sits on.

use axum::extract::{Json, State};

use crate::AppState;

#[derive(serde::Deserialize)]
pub(crate) struct RespondRequest {
    topic: String,
    /// Missing text is treated like an empty message.
    #[serde(default)]
    text: Option<String>,
    /// Caller-supplied id for log correlation; generated when absent.
    #[serde(default)]
    correlation_id: Option<String>,
}

/// POST /v1/respond – returns the rendered reply and the policy tier that produced it.
pub(crate) async fn respond(
    State(state): State<AppState>,
    Json(req): Json<RespondRequest>,
) -> axum::Json<serde_json::Value> {
    let correlation_id = req
        .correlation_id
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let span = tracing::info_span!(
        "respond",
        correlation_id = %correlation_id,
        topic = %req.topic
    );
    let _entered = span.enter();

    let reply = state.responder.reply(req.text.as_deref(), &req.topic);
    tracing::info!(target: "pagebot::gateway", kind = reply.kind(), "reply sent");

    axum::Json(serde_json::json!({
        "status": "ok",
        "kind": reply.kind(),
        "text": reply.to_string(),
        "topic": req.topic,
        "correlation_id": correlation_id,
    }))
}
