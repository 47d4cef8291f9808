//! Handlers for `/api/content/services`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use logicton_core::content::ServiceDocument;
use logicton_core::error::CoreError;
use logicton_core::service::{ServiceChange, ServicePatch};
use logicton_db::repositories::ServiceRepo;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Entries stay untyped so one malformed change is skipped instead of
/// rejecting the whole batch.
#[derive(Debug, Deserialize)]
pub struct ServiceEditRequest {
    pub changes: Option<Value>,
}

/// Counts reported by the service inline-edit endpoint.
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct EditOutcome {
    pub applied: usize,
    pub skipped: usize,
}

// ---------------------------------------------------------------------------
// Public reads
// ---------------------------------------------------------------------------

/// Active services in display order.
pub async fn active_services(state: &AppState) -> AppResult<Vec<ServiceDocument>> {
    let rows = ServiceRepo::list_active(&state.pool).await?;
    Ok(rows.into_iter().map(ServiceDocument::from).collect())
}

/// GET /api/content/services
pub async fn list_services(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ServiceDocument>>>> {
    Ok(Json(DataResponse::new(active_services(&state).await?)))
}

/// GET /api/content/services/{id}
///
/// Inactive services are reported as not found.
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<ServiceDocument>>> {
    let service = ServiceRepo::find_by_id(&state.pool, &id)
        .await?
        .filter(|s| s.is_active)
        .ok_or(CoreError::NotFound {
            entity: "Service",
            id,
        })?;
    Ok(Json(DataResponse::new(service.into())))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// POST /api/content/services
pub async fn create_service(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<ServiceDocument>,
) -> AppResult<(StatusCode, Json<DataResponse<ServiceDocument>>)> {
    if input.id.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Service id must not be empty".into(),
        )));
    }

    let created = ServiceRepo::create(&state.pool, &input).await?;
    tracing::info!(user = %admin.username, service_id = %created.id, "Service created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(created.into()))))
}

/// DELETE /api/content/services/{id}
pub async fn delete_service(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if !ServiceRepo::delete(&state.pool, &id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Service",
            id,
        }));
    }
    tracing::info!(user = %admin.username, service_id = %id, "Service deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/content/services/inline-edit
///
/// Each change is interpreted and applied on its own. Changes that are not
/// objects of the expected shape, or that carry an unsupported locale,
/// unknown field, invalid value or unknown service id, are skipped and
/// counted.
pub async fn edit_services(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<ServiceEditRequest>,
) -> AppResult<Json<DataResponse<EditOutcome>>> {
    let Some(Value::Array(entries)) = input.changes else {
        return Err(AppError::BadRequest("Invalid changes data".into()));
    };

    let mut outcome = EditOutcome::default();
    for entry in entries {
        let change = match serde_json::from_value::<ServiceChange>(entry) {
            Ok(change) => change,
            Err(e) => {
                tracing::debug!(error = %e, "Skipping malformed service change");
                outcome.skipped += 1;
                continue;
            }
        };
        let patch = match ServicePatch::from_change(&change) {
            Ok(patch) => patch,
            Err(reason) => {
                tracing::debug!(
                    service_id = %change.service_id,
                    field = %change.field,
                    %reason,
                    "Skipping service change"
                );
                outcome.skipped += 1;
                continue;
            }
        };

        if ServiceRepo::apply_patch(&state.pool, &change.service_id, &patch).await? {
            outcome.applied += 1;
        } else {
            tracing::debug!(service_id = %change.service_id, "Skipping change for unknown service");
            outcome.skipped += 1;
        }
    }

    tracing::info!(
        user = %admin.username,
        applied = outcome.applied,
        skipped = outcome.skipped,
        "Service edits applied"
    );
    Ok(Json(DataResponse::new(outcome)))
}
