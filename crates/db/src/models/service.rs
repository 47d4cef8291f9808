//! Services (`services`).

use logicton_core::content::ServiceDocument;
use logicton_core::locale::{Localized, LocalizedText};
use logicton_core::service::{HowWeWorkStep, ServiceCategory};
use logicton_core::types::Timestamp;
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `services` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Service {
    pub id: String,
    pub title_th: String,
    pub title_en: String,
    pub description_th: String,
    pub description_en: String,
    pub features_th: Json<Vec<String>>,
    pub features_en: Json<Vec<String>>,
    pub how_we_work_th: Option<Json<Vec<HowWeWorkStep>>>,
    pub how_we_work_en: Option<Json<Vec<HowWeWorkStep>>>,
    pub technologies: Json<Vec<String>>,
    pub icon: String,
    pub category: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Service> for ServiceDocument {
    fn from(row: Service) -> Self {
        let how_we_work = match (row.how_we_work_th, row.how_we_work_en) {
            (None, None) => None,
            (th, en) => Some(Localized {
                th: th.map(|j| j.0).unwrap_or_default(),
                en: en.map(|j| j.0).unwrap_or_default(),
            }),
        };

        Self {
            id: row.id,
            title: LocalizedText {
                th: row.title_th,
                en: row.title_en,
            },
            description: LocalizedText {
                th: row.description_th,
                en: row.description_en,
            },
            features: Localized {
                th: row.features_th.0,
                en: row.features_en.0,
            },
            technologies: row.technologies.0,
            icon: row.icon,
            // Guarded by the ck_services_category constraint.
            category: ServiceCategory::parse(&row.category).unwrap_or(ServiceCategory::Web),
            order: row.sort_order,
            is_active: row.is_active,
            how_we_work,
        }
    }
}
