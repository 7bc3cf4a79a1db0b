use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;

use crate::errors::{ApiError, ApiResult};
use crate::models::{EnqueueRequest, EnqueueResponse};
use crate::queue::publisher::publish_object_reference;
use crate::AppState;

/// Queue an uploaded photo for processing
///
/// POST /queue  {"blobUrl": "..."}
///
/// A body that is not a JSON object with a string `blobUrl` (wrong content
/// type, wrong shape, wrong field type) is an enqueue failure like any other.
pub async fn enqueue_photo(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<EnqueueResponse>> {
    let payload = parse_request(payload).map_err(|reason| {
        tracing::error!(reason = %reason, "Error adding to queue: unreadable request body");
        ApiError::Enqueue
    })?;

    let Some(blob_url) = payload.blob_url else {
        tracing::error!("Error adding to queue: request has no blobUrl");
        return Err(ApiError::Enqueue);
    };

    publish_object_reference(state.queue.as_ref(), &blob_url)
        .await
        .map_err(|e| {
            tracing::error!(blob_url = %blob_url, error = %e, "Error adding to queue");
            ApiError::Enqueue
        })?;

    Ok(Json(EnqueueResponse { success: true }))
}

// Only a JSON object is a request; serde would otherwise read arrays positionally
fn parse_request(payload: Result<Json<Value>, JsonRejection>) -> Result<EnqueueRequest, String> {
    let Json(body) = payload.map_err(|e| e.body_text())?;

    if !body.is_object() {
        return Err("request body is not a JSON object".to_string());
    }

    serde_json::from_value(body).map_err(|e| e.to_string())
}
