//! Team members (`team_members`).

use logicton_core::content::TeamMemberDocument;
use logicton_core::locale::LocalizedText;
use logicton_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `team_members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TeamMember {
    pub id: String,
    pub name_th: String,
    pub name_en: String,
    pub role_th: String,
    pub role_en: String,
    pub bio_th: String,
    pub bio_en: String,
    pub photo: Option<String>,
    pub email: Option<String>,
    pub linkedin: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<TeamMember> for TeamMemberDocument {
    fn from(row: TeamMember) -> Self {
        Self {
            id: row.id,
            name: LocalizedText {
                th: row.name_th,
                en: row.name_en,
            },
            role: LocalizedText {
                th: row.role_th,
                en: row.role_en,
            },
            bio: LocalizedText {
                th: row.bio_th,
                en: row.bio_en,
            },
            photo: row.photo,
            email: row.email,
            linkedin: row.linkedin,
            order: row.sort_order,
            is_active: row.is_active,
        }
    }
}
