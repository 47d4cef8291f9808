//! Handler for `POST /api/contact`.

use axum::extract::State;
use axum::http::header::RETRY_AFTER;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::Json;
use logicton_core::contact::{validate_contact, ContactPayload};
use logicton_core::error::CoreError;
use logicton_core::naming::timestamped_id;
use logicton_core::rate_limit::RateDecision;
use logicton_db::models::contact_inquiry::NewInquiry;
use logicton_db::repositories::ContactInquiryRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::client_ip::ClientIp;
use crate::response::MessageResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SubmittedInquiry {
    pub id: String,
}

/// POST /api/contact
///
/// Order: rate limit (known IPs only), validate, persist, notify. The
/// notification fan-out never fails the request.
pub async fn submit_contact(
    State(state): State<AppState>,
    ip: ClientIp,
    Json(payload): Json<ContactPayload>,
) -> AppResult<Response> {
    if ip.is_known() {
        if let RateDecision::Limited { retry_after } = state.rate_limiter.check(&ip.0).await? {
            tracing::warn!(ip = %ip.0, "Contact form rate limit exceeded");
            let mut response = AppError::Core(CoreError::RateLimited(
                "Too many requests. Please try again later.".into(),
            ))
            .into_response();
            let secs = retry_after.as_secs().max(1);
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(secs));
            return Ok(response);
        }
    }

    let contact = validate_contact(&payload)?;

    let inquiry = ContactInquiryRepo::create(
        &state.pool,
        &NewInquiry {
            id: timestamped_id("inquiry"),
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            company: contact.company.clone(),
            subject: contact.subject.clone(),
            message: contact.message.clone(),
            language: contact.language.as_str().to_string(),
            ip_address: ip.0.clone(),
        },
    )
    .await?;
    tracing::info!(inquiry_id = %inquiry.id, language = %contact.language, "Contact inquiry saved");

    let report = state.notifier.notify(&contact).await;
    tracing::debug!(
        inquiry_id = %inquiry.id,
        delivered = report.delivered,
        failed = report.failed,
        "Contact notifications dispatched"
    );

    Ok(Json(MessageResponse::with_data(
        "Contact form submitted successfully",
        SubmittedInquiry { id: inquiry.id },
    ))
    .into_response())
}
