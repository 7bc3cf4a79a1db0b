use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

use crate::errors::{ApiError, ApiResult};
use crate::models::{GenerateSasQuery, GenerateSasResponse};
use crate::storage::StorageError;
use crate::AppState;

/// Issue a one-hour, create/write-only upload URL for `filename`
///
/// GET /generate-sas?filename=<name>
pub async fn generate_sas(
    State(state): State<AppState>,
    query: Result<Query<GenerateSasQuery>, QueryRejection>,
) -> ApiResult<Json<GenerateSasResponse>> {
    let Query(query) = query.map_err(|e| {
        tracing::error!(error = %e, "Error generating SAS token: unreadable query string");
        ApiError::CredentialGeneration
    })?;
    let filename = query.filename.unwrap_or_default();

    let grant = state
        .blob_client
        .generate_upload_grant(&filename)
        .map_err(|e: StorageError| {
            tracing::error!(filename = %filename, error = %e, "Error generating SAS token");
            ApiError::CredentialGeneration
        })?;

    tracing::info!(
        blob = %grant.object_name,
        expires_at = %grant.expires_at,
        "Generated upload SAS"
    );

    Ok(Json(grant.into()))
}
