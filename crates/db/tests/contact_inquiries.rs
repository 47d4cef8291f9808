//! Integration tests for the contact inbox.

use logicton_core::contact::InquiryStatus;
use logicton_db::models::contact_inquiry::NewInquiry;
use logicton_db::repositories::ContactInquiryRepo;
use sqlx::PgPool;

fn new_inquiry(id: &str) -> NewInquiry {
    NewInquiry {
        id: id.to_string(),
        name: "Somchai".to_string(),
        email: "somchai@example.co.th".to_string(),
        phone: None,
        company: Some("Acme".to_string()),
        subject: "Website".to_string(),
        message: "We need a new site.".to_string(),
        language: "th".to_string(),
        ip_address: "203.0.113.7".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Inbox
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_defaults_to_new(pool: PgPool) {
    let inquiry = ContactInquiryRepo::create(&pool, &new_inquiry("contact-1"))
        .await
        .unwrap();
    assert_eq!(inquiry.status, "new");
    assert_eq!(inquiry.company.as_deref(), Some("Acme"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_status_update_and_stats(pool: PgPool) {
    ContactInquiryRepo::create(&pool, &new_inquiry("contact-1"))
        .await
        .unwrap();
    ContactInquiryRepo::create(&pool, &new_inquiry("contact-2"))
        .await
        .unwrap();

    let updated = ContactInquiryRepo::update_status(&pool, "contact-1", InquiryStatus::Replied)
        .await
        .unwrap()
        .expect("inquiry exists");
    assert_eq!(updated.status, "replied");

    let stats = ContactInquiryRepo::stats(&pool).await.unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.new, 1);
    assert_eq!(stats.replied, 1);
    assert_eq!(stats.this_week, 2);

    let replied = ContactInquiryRepo::list(&pool, Some(InquiryStatus::Replied))
        .await
        .unwrap();
    assert_eq!(replied.len(), 1);
    assert_eq!(ContactInquiryRepo::list(&pool, None).await.unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_inquiry_returns_none(pool: PgPool) {
    let result = ContactInquiryRepo::update_status(&pool, "nope", InquiryStatus::Read)
        .await
        .unwrap();
    assert!(result.is_none());
    assert!(!ContactInquiryRepo::delete(&pool, "nope").await.unwrap());
}
