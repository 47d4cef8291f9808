//! Admin handlers for `/api/contact/inquiries`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use logicton_core::contact::InquiryStatus;
use logicton_core::error::CoreError;
use logicton_db::models::contact_inquiry::{ContactInquiry, InquiryStats};
use logicton_db::repositories::ContactInquiryRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InquiryListQuery {
    pub status: Option<InquiryStatus>,
}

#[derive(Debug, Serialize)]
pub struct InquiryInbox {
    pub inquiries: Vec<ContactInquiry>,
    pub stats: InquiryStats,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: InquiryStatus,
}

/// GET /api/contact/inquiries?status=
pub async fn list_inquiries(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<InquiryListQuery>,
) -> AppResult<Json<DataResponse<InquiryInbox>>> {
    let inquiries = ContactInquiryRepo::list(&state.pool, query.status).await?;
    let stats = ContactInquiryRepo::stats(&state.pool).await?;
    Ok(Json(DataResponse::new(InquiryInbox { inquiries, stats })))
}

/// PUT /api/contact/inquiries/{id}/status
pub async fn update_inquiry_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<Json<DataResponse<ContactInquiry>>> {
    let inquiry = ContactInquiryRepo::update_status(&state.pool, &id, input.status)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Inquiry",
            id,
        })?;
    tracing::info!(
        user = %admin.username,
        inquiry_id = %inquiry.id,
        status = input.status.as_str(),
        "Inquiry status updated"
    );
    Ok(Json(DataResponse::new(inquiry)))
}

/// DELETE /api/contact/inquiries/{id}
pub async fn delete_inquiry(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if !ContactInquiryRepo::delete(&state.pool, &id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Inquiry",
            id,
        }));
    }
    tracing::info!(user = %admin.username, inquiry_id = %id, "Inquiry deleted");
    Ok(StatusCode::NO_CONTENT)
}
