//! Handler for `POST /api/upload`.

use axum::extract::{Multipart, State};
use axum::Json;
use logicton_core::content_path::ContentPath;
use logicton_core::upload::{folder_for_path, validate_image, validate_upload_path, IMAGES_PREFIX};
use logicton_db::repositories::InlineContentRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    /// Public URL of the stored image.
    pub url: String,
    /// Same as `url`; kept for clients that read `path`.
    pub path: String,
    pub filename: String,
}

struct UploadForm {
    content_type: String,
    bytes: Vec<u8>,
    path: Option<String>,
}

async fn read_form(mut multipart: Multipart) -> AppResult<UploadForm> {
    let bad = |e: axum::extract::multipart::MultipartError| {
        AppError::BadRequest(format!("Invalid multipart body: {e}"))
    };

    let mut file: Option<(String, Vec<u8>)> = None;
    let mut path = None;
    while let Some(field) = multipart.next_field().await.map_err(bad)? {
        match field.name() {
            Some("file") => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(bad)?;
                file = Some((content_type, bytes.to_vec()));
            }
            Some("path") => {
                let value = field.text().await.map_err(bad)?;
                let value = value.trim();
                if !value.is_empty() {
                    path = Some(value.to_string());
                }
            }
            _ => {}
        }
    }

    let (content_type, bytes) =
        file.ok_or_else(|| AppError::BadRequest("No file uploaded".into()))?;
    Ok(UploadForm {
        content_type,
        bytes,
        path,
    })
}

/// POST /api/upload (multipart `file`, optional `path`)
///
/// Stores the image under `/images/<folder>/` where the folder is derived
/// from the content path, then retires the image previously stored at that
/// path, if any.
pub async fn upload_image(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let form = read_form(multipart).await?;
    if form.bytes.len() > state.config.max_upload_bytes {
        return Err(AppError::BadRequest(format!(
            "File too large (max {} bytes)",
            state.config.max_upload_bytes
        )));
    }

    if let Some(path) = &form.path {
        validate_upload_path(path)?;
    }
    let mime = validate_image(&form.content_type, &form.bytes)?;
    let folder = folder_for_path(form.path.as_deref());

    let stored = state.images.save(&folder, mime, &form.bytes).await?;
    tracing::info!(
        user = %user.username,
        url = %stored.public_url,
        bytes = form.bytes.len(),
        "Image uploaded"
    );

    if let Some(path) = form.path.as_deref().and_then(ContentPath::parse) {
        retire_previous_image(&state, &path, &stored.public_url).await;
    }

    Ok(Json(UploadResponse {
        success: true,
        url: stored.public_url.clone(),
        path: stored.public_url,
        filename: stored.filename,
    }))
}

/// Delete the file behind the first stored image override for `path`.
/// Every failure is logged and ignored.
async fn retire_previous_image(state: &AppState, path: &ContentPath, new_url: &str) {
    let values = match InlineContentRepo::values_for_path(&state.pool, path).await {
        Ok(values) => values,
        Err(e) => {
            tracing::warn!(%path, error = %e, "Could not look up previous image");
            return;
        }
    };

    let Some(old_url) = values
        .into_iter()
        .find(|v| v.starts_with(IMAGES_PREFIX) && v != new_url)
    else {
        return;
    };

    match state.images.remove_public(&old_url).await {
        Ok(true) => tracing::info!(%path, url = %old_url, "Previous image removed"),
        Ok(false) => tracing::debug!(%path, url = %old_url, "Previous image not found on disk"),
        Err(e) => tracing::warn!(%path, url = %old_url, error = %e, "Failed to remove previous image"),
    }
}
