//! Bilingual content documents and the JSON content directory.
//!
//! Portfolio items, company info and site configuration live as JSON files
//! under the content directory and are never stored in the database. The
//! service and team documents describe the same JSON shape the public API
//! returns, and the shape of the legacy `services.json` / `team.json` seed
//! files.
//!
//! Unknown keys in file-backed documents are kept in `extra` so a
//! read-modify-write cycle does not drop them.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::locale::{Localized, LocalizedText};
use crate::service::{HowWeWorkStep, ServiceCategory};

pub const PORTFOLIO_FILE: &str = "portfolio/items.json";
pub const COMPANY_FILE: &str = "company/info.json";
pub const SITE_CONFIG_FILE: &str = "settings/site-config.json";
pub const SERVICES_FILE: &str = "services/services.json";
pub const TEAM_FILE: &str = "company/team.json";

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Database-backed documents (API and seed shape)
// ---------------------------------------------------------------------------

/// A service as served to the site and as found in `services.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDocument {
    pub id: String,
    pub title: LocalizedText,
    pub description: LocalizedText,
    #[serde(default)]
    pub features: Localized<Vec<String>>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default = "default_icon")]
    pub icon: String,
    pub category: ServiceCategory,
    #[serde(default)]
    pub order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub how_we_work: Option<Localized<Vec<HowWeWorkStep>>>,
}

fn default_icon() -> String {
    "Code".to_string()
}

/// A team member as served to the site and as found in `team.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberDocument {
    pub id: String,
    pub name: LocalizedText,
    pub role: LocalizedText,
    #[serde(default)]
    pub bio: LocalizedText,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// `services.json` root.
#[derive(Debug, Clone, Deserialize)]
pub struct ServicesFile {
    pub services: Vec<ServiceDocument>,
}

/// `team.json` root.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamFile {
    pub members: Vec<TeamMemberDocument>,
}

// ---------------------------------------------------------------------------
// File-backed documents
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioClient {
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
}

/// A portfolio case study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItem {
    pub id: String,
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub category: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<PortfolioClient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `portfolio/items.json` root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioFile {
    pub items: Vec<PortfolioItem>,
}

/// Company profile shown on the about page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<LocalizedText>,
    pub description: LocalizedText,
    #[serde(default)]
    pub history: LocalizedText,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SocialMedia {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
}

/// Site-wide settings (contact details, social links, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    #[serde(default)]
    pub social_media: SocialMedia,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Content directory
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ContentFileError {
    #[error("Content file not found: {0}")]
    Missing(String),

    #[error("Failed to read content file {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed content file {file}: {source}")]
    Malformed {
        file: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Read-only access to the JSON content directory.
#[derive(Debug, Clone)]
pub struct ContentDir {
    root: PathBuf,
}

impl ContentDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read and parse `relative` (one of the `*_FILE` constants).
    pub async fn read<T: DeserializeOwned>(&self, relative: &str) -> Result<T, ContentFileError> {
        let path = self.root.join(relative);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ContentFileError::Missing(relative.to_string()));
            }
            Err(source) => {
                return Err(ContentFileError::Io {
                    file: relative.to_string(),
                    source,
                });
            }
        };
        serde_json::from_slice(&bytes).map_err(|source| ContentFileError::Malformed {
            file: relative.to_string(),
            source,
        })
    }

    pub async fn portfolio(&self) -> Result<Vec<PortfolioItem>, ContentFileError> {
        Ok(self.read::<PortfolioFile>(PORTFOLIO_FILE).await?.items)
    }

    pub async fn company(&self) -> Result<CompanyInfo, ContentFileError> {
        self.read(COMPANY_FILE).await
    }

    pub async fn site_config(&self) -> Result<SiteConfig, ContentFileError> {
        self.read(SITE_CONFIG_FILE).await
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    async fn write(dir: &Path, relative: &str, value: &Value) {
        let path = dir.join(relative);
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(path, serde_json::to_vec(value).unwrap())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn reads_portfolio_and_keeps_unknown_keys() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            PORTFOLIO_FILE,
            &json!({"items": [{
                "id": "shop-app",
                "title": {"th": "แอปร้านค้า", "en": "Shop app"},
                "description": {"th": "ค", "en": "d"},
                "category": "mobile",
                "images": ["/images/portfolio/shop.jpg"],
                "demoUrl": "https://demo.example.com",
                "testimonial": {"author": "K. Somsak"}
            }]}),
        )
        .await;

        let items = ContentDir::new(tmp.path()).portfolio().await.unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0].is_active);
        assert_eq!(items[0].demo_url.as_deref(), Some("https://demo.example.com"));
        assert!(items[0].extra.contains_key("testimonial"));

        let round_trip = serde_json::to_value(&items[0]).unwrap();
        assert_eq!(round_trip["testimonial"]["author"], "K. Somsak");
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let result = ContentDir::new(tmp.path()).company().await;
        assert_matches!(result, Err(ContentFileError::Missing(f)) if f == COMPANY_FILE);
    }

    #[tokio::test]
    async fn malformed_file_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), SITE_CONFIG_FILE, &json!({"socialMedia": 42})).await;
        let result = ContentDir::new(tmp.path()).site_config().await;
        assert_matches!(result, Err(ContentFileError::Malformed { .. }));
    }

    #[test]
    fn service_document_defaults() {
        let doc: ServiceDocument = serde_json::from_value(json!({
            "id": "web-development",
            "title": {"th": "พัฒนาเว็บ", "en": "Web development"},
            "description": {"th": "ท", "en": "d"},
            "category": "web"
        }))
        .unwrap();
        assert_eq!(doc.icon, "Code");
        assert!(doc.is_active);
        assert!(doc.how_we_work.is_none());
        assert!(doc.features.en.is_empty());
    }
}
