//! Handlers for `/api/content/inline-edit`.
//!
//! Overrides are keyed by dotted content path and locale. Reads return a
//! flat `{path: value}` map for one page.

use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::Json;
use logicton_core::content_path::ContentPath;
use logicton_core::locale::Locale;
use logicton_db::repositories::InlineContentRepo;
use serde::Deserialize;

use super::parse_locale;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InlineContentQuery {
    pub page: Option<String>,
    pub locale: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InlineChange {
    pub path: String,
    pub value: String,
    pub locale: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveInlineRequest {
    #[serde(default)]
    pub changes: Vec<InlineChange>,
}

/// Active overrides for `page` in `locale` as a `{path: value}` map.
pub async fn page_overrides(
    state: &AppState,
    page: &str,
    locale: Locale,
) -> AppResult<BTreeMap<String, String>> {
    let rows = InlineContentRepo::list_active_for_page(&state.pool, page, locale).await?;
    Ok(rows.into_iter().map(|row| (row.path(), row.value)).collect())
}

/// GET /api/content/inline-edit?page=&locale=
pub async fn get_inline_content(
    State(state): State<AppState>,
    Query(query): Query<InlineContentQuery>,
) -> AppResult<Json<DataResponse<BTreeMap<String, String>>>> {
    let page = query
        .page
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::BadRequest("Page parameter is required".into()))?;
    let locale = parse_locale(query.locale.as_deref())?;

    let content = page_overrides(&state, page, locale).await?;
    Ok(Json(DataResponse::new(content)))
}

/// POST /api/content/inline-edit
///
/// Upserts each change. Changes with a malformed path or an unsupported
/// locale are skipped.
pub async fn save_inline_content(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<SaveInlineRequest>,
) -> AppResult<Json<MessageResponse>> {
    if input.changes.is_empty() {
        return Err(AppError::BadRequest("No changes provided".into()));
    }

    let mut saved = 0usize;
    for change in &input.changes {
        let Some(path) = ContentPath::parse(&change.path) else {
            tracing::debug!(path = %change.path, "Skipping change with malformed path");
            continue;
        };
        let Some(locale) = Locale::parse(&change.locale) else {
            tracing::debug!(path = %change.path, locale = %change.locale, "Skipping change with unsupported locale");
            continue;
        };
        InlineContentRepo::upsert(&state.pool, &path, locale, &change.value).await?;
        saved += 1;
    }

    tracing::info!(
        user = %admin.username,
        saved,
        skipped = input.changes.len() - saved,
        "Inline content saved"
    );

    Ok(Json(MessageResponse::new(format!(
        "Saved {saved} change(s) successfully"
    ))))
}
