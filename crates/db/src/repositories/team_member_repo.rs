//! Repository for the `team_members` table.

use logicton_core::content::TeamMemberDocument;
use sqlx::PgPool;

use crate::models::team_member::TeamMember;

/// Column list for `team_members` queries.
const COLUMNS: &str = "\
    id, name_th, name_en, role_th, role_en, bio_th, bio_en, \
    photo, email, linkedin, sort_order, is_active, created_at, updated_at";

/// Provides data access for team members.
pub struct TeamMemberRepo;

impl TeamMemberRepo {
    /// Active members in display order.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<TeamMember>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM team_members WHERE is_active = TRUE \
             ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, TeamMember>(&query)
            .fetch_all(pool)
            .await
    }

    /// Insert or fully replace a member by id.
    pub async fn upsert(
        pool: &PgPool,
        doc: &TeamMemberDocument,
    ) -> Result<TeamMember, sqlx::Error> {
        let query = format!(
            "INSERT INTO team_members \
                 (id, name_th, name_en, role_th, role_en, bio_th, bio_en, \
                  photo, email, linkedin, sort_order, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             ON CONFLICT (id) DO UPDATE SET \
                 name_th = EXCLUDED.name_th, \
                 name_en = EXCLUDED.name_en, \
                 role_th = EXCLUDED.role_th, \
                 role_en = EXCLUDED.role_en, \
                 bio_th = EXCLUDED.bio_th, \
                 bio_en = EXCLUDED.bio_en, \
                 photo = EXCLUDED.photo, \
                 email = EXCLUDED.email, \
                 linkedin = EXCLUDED.linkedin, \
                 sort_order = EXCLUDED.sort_order, \
                 is_active = EXCLUDED.is_active \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TeamMember>(&query)
            .bind(&doc.id)
            .bind(&doc.name.th)
            .bind(&doc.name.en)
            .bind(&doc.role.th)
            .bind(&doc.role.en)
            .bind(&doc.bio.th)
            .bind(&doc.bio.en)
            .bind(&doc.photo)
            .bind(&doc.email)
            .bind(&doc.linkedin)
            .bind(doc.order)
            .bind(doc.is_active)
            .fetch_one(pool)
            .await
    }
}
