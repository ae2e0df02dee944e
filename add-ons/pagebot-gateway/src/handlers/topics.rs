use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use crate::AppState;

/// GET /v1/topics – topics in declared order.
pub(crate) async fn list(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "topics": state.responder.knowledge().summaries(),
    }))
}

/// GET /v1/topics/:key/greeting – welcome line for the chat window, 404 for unknown topics.
pub(crate) async fn greeting(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<axum::Json<serde_json::Value>, StatusCode> {
    let greeting = state.responder.greeting(&key).ok_or(StatusCode::NOT_FOUND)?;
    Ok(axum::Json(serde_json::json!({
        "topic": key,
        "greeting": greeting,
    })))
}

#[derive(serde::Deserialize)]
pub(crate) struct ResolveQuery {
    #[serde(default)]
    path: String,
}

/// GET /v1/resolve?path=/pages/activity2.html – maps a page path to its topic key.
pub(crate) async fn resolve(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> axum::Json<serde_json::Value> {
    let topic = state.responder.topic_for_path(&query.path);
    axum::Json(serde_json::json!({
        "path": query.path,
        "topic": topic,
    }))
}
