//! Image upload rules and the on-disk image store.
//!
//! - MIME allow-list ([`ImageMime`]) checked against both the declared
//!   content type and the sniffed leading bytes.
//! - Folder derivation from a content path, restricted to `[A-Za-z0-9_]`.
//! - Collision-resistant filenames whose extension comes from the validated
//!   MIME type only.
//! - [`ImageStore`], which refuses to write or delete anything that resolves
//!   outside `<public root>/images`.

use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use image::ImageFormat;
use regex::Regex;

use crate::error::CoreError;
use crate::naming::random_token;

/// Folder used when a path yields no usable folder name.
pub const DEFAULT_FOLDER: &str = "general";

/// Public URL prefix (and directory name under the public root) for images.
pub const IMAGES_PREFIX: &str = "/images/";

static UNSAFE_FOLDER_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("static regex is valid"));

// ---------------------------------------------------------------------------
// MIME allow-list
// ---------------------------------------------------------------------------

/// The accepted image types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMime {
    Jpeg,
    Png,
    Webp,
}

impl ImageMime {
    /// Parse a declared content type. Parameters (`; charset=...`) are ignored.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type.split(';').next().unwrap_or("").trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::Webp => ImageFormat::WebP,
        }
    }

    /// Whether the leading bytes carry this type's magic number
    /// (`FF D8 FF`, `89 50 4E 47 ...`, `RIFF....WEBP`).
    pub fn matches_content(self, bytes: &[u8]) -> bool {
        image::guess_format(bytes).is_ok_and(|format| format == self.image_format())
    }
}

/// Validate a declared content type and the file's bytes together.
pub fn validate_image(content_type: &str, bytes: &[u8]) -> Result<ImageMime, CoreError> {
    let mime = ImageMime::from_content_type(content_type).ok_or_else(|| {
        CoreError::Validation("Invalid file type. Only JPG, PNG, and WebP are allowed.".into())
    })?;
    if !mime.matches_content(bytes) {
        return Err(CoreError::Validation(
            "File content does not match its declared type".into(),
        ));
    }
    Ok(mime)
}

// ---------------------------------------------------------------------------
// Paths and names
// ---------------------------------------------------------------------------

/// Reject content paths that carry filesystem syntax.
pub fn validate_upload_path(path: &str) -> Result<(), CoreError> {
    if path.contains('/') || path.contains('\\') || path.contains("..") || path.contains('\0') {
        return Err(CoreError::Validation("Invalid upload path".into()));
    }
    Ok(())
}

/// Storage folder for a content path: the first dot segment with everything
/// outside `[A-Za-z0-9_]` removed, or [`DEFAULT_FOLDER`].
pub fn folder_for_path(path: Option<&str>) -> String {
    let first = path.and_then(|p| p.split('.').next()).unwrap_or("");
    let folder = UNSAFE_FOLDER_CHARS.replace_all(first, "");
    if folder.is_empty() {
        DEFAULT_FOLDER.to_string()
    } else {
        folder.into_owned()
    }
}

/// `img_<unix millis>_<13 char token>.<ext>`.
pub fn generate_filename(mime: ImageMime) -> String {
    format!(
        "img_{}_{}.{}",
        chrono::Utc::now().timestamp_millis(),
        random_token(13),
        mime.extension()
    )
}

/// Resolve `.` and `..` without touching the filesystem. Returns `None` when
/// `..` would climb above the first component.
fn normalize_lexically(path: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    return None;
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    Some(out)
}

// ---------------------------------------------------------------------------
// Image store
// ---------------------------------------------------------------------------

/// Result of a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub folder: String,
    pub filename: String,
    /// `/images/<folder>/<filename>`.
    pub public_url: String,
    pub file_path: PathBuf,
}

/// Writes and retires image files below `<public_root>/images`.
#[derive(Debug, Clone)]
pub struct ImageStore {
    public_root: PathBuf,
}

impl ImageStore {
    pub fn new(public_root: impl Into<PathBuf>) -> Self {
        Self {
            public_root: public_root.into(),
        }
    }

    pub fn images_root(&self) -> PathBuf {
        self.public_root.join(IMAGES_PREFIX.trim_matches('/'))
    }

    /// Write `bytes` into `folder` under a freshly generated name.
    pub async fn save(
        &self,
        folder: &str,
        mime: ImageMime,
        bytes: &[u8],
    ) -> Result<StoredImage, CoreError> {
        let root = self.images_root();
        let dir = self.contained_dir(&root, folder).await?;

        let filename = generate_filename(mime);
        let file_path = dir.join(&filename);
        tokio::fs::write(&file_path, bytes)
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to write upload: {e}")))?;

        Ok(StoredImage {
            folder: folder.to_string(),
            public_url: format!("{IMAGES_PREFIX}{folder}/{filename}"),
            filename,
            file_path,
        })
    }

    /// Create `root/folder` and verify it still resolves inside `root`.
    async fn contained_dir(&self, root: &Path, folder: &str) -> Result<PathBuf, CoreError> {
        let invalid = || CoreError::Validation("Invalid upload path".into());

        let dir = normalize_lexically(&root.join(folder)).ok_or_else(invalid)?;
        let root_norm = normalize_lexically(root).ok_or_else(invalid)?;
        if !dir.starts_with(&root_norm) || dir == root_norm {
            return Err(invalid());
        }

        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to create upload dir: {e}")))?;

        let canonical_root = tokio::fs::canonicalize(root)
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to resolve upload root: {e}")))?;
        let canonical_dir = tokio::fs::canonicalize(&dir)
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to resolve upload dir: {e}")))?;
        if !canonical_dir.starts_with(&canonical_root) {
            return Err(invalid());
        }
        Ok(canonical_dir)
    }

    /// Delete the file behind a public `/images/...` URL.
    ///
    /// Returns `Ok(false)` when the URL is not an image URL, resolves outside
    /// the images root, or the file does not exist.
    pub async fn remove_public(&self, public_url: &str) -> Result<bool, CoreError> {
        if !public_url.starts_with(IMAGES_PREFIX) {
            return Ok(false);
        }

        let root = self.images_root();
        let Some(root_norm) = normalize_lexically(&root) else {
            return Ok(false);
        };
        let Some(candidate) =
            normalize_lexically(&self.public_root.join(public_url.trim_start_matches('/')))
        else {
            return Ok(false);
        };
        if !candidate.starts_with(&root_norm) || candidate == root_norm {
            return Ok(false);
        }

        let (Ok(canonical_root), Ok(canonical_file)) = (
            tokio::fs::canonicalize(&root).await,
            tokio::fs::canonicalize(&candidate).await,
        ) else {
            return Ok(false);
        };
        if !canonical_file.starts_with(&canonical_root) {
            return Ok(false);
        }

        tokio::fs::remove_file(&canonical_file)
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to delete old image: {e}")))?;
        Ok(true)
    }
}
