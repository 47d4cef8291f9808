//! Contact form inquiries (`contact_inquiries`).

use logicton_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `contact_inquiries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInquiry {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: String,
    pub message: String,
    pub language: String,
    pub status: String,
    pub ip_address: String,
    pub submitted_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert DTO.
#[derive(Debug, Clone)]
pub struct NewInquiry {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: String,
    pub message: String,
    pub language: String,
    pub ip_address: String,
}

/// Inbox counters for the admin dashboard.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryStats {
    pub total: i64,
    pub new: i64,
    pub read: i64,
    pub replied: i64,
    pub archived: i64,
    /// Submissions in the last 7 days.
    pub this_week: i64,
}
