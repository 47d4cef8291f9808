//! Route definitions for the `/contact` resource.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{contact, inquiries};
use crate::state::AppState;

/// Routes mounted at `/contact`.
///
/// ```text
/// POST   /                          -> submit_contact
/// GET    /inquiries                 -> list_inquiries (admin)
/// PUT    /inquiries/{id}/status     -> update_inquiry_status (admin)
/// DELETE /inquiries/{id}            -> delete_inquiry (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(contact::submit_contact))
        .route("/inquiries", get(inquiries::list_inquiries))
        .route(
            "/inquiries/{id}/status",
            put(inquiries::update_inquiry_status),
        )
        .route("/inquiries/{id}", delete(inquiries::delete_inquiry))
}
