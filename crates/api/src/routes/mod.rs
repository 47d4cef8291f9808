pub mod auth;
pub mod contact;
pub mod content;
pub mod health;
pub mod pages;
pub mod upload;

use axum::Router;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                  login (public)
///
/// /content/inline-edit                         page overrides (GET), save (POST, admin)
/// /content/services                            active services (GET), create (POST, admin)
/// /content/services/inline-edit                field-level service edits (POST, admin)
/// /content/services/{id}                       get (GET), delete (DELETE, admin)
/// /content/team                                active team members
/// /content/portfolio                           active portfolio items
/// /content/portfolio/{id}                      single portfolio item
/// /content/company                             company profile
/// /content/site-config                         site settings
///
/// /pages/{page}                                page bundle (?locale=th|en)
///
/// /contact                                     submit contact form (public, rate limited)
/// /contact/inquiries                           list with stats (admin, ?status=)
/// /contact/inquiries/{id}/status               update status (PUT, admin)
/// /contact/inquiries/{id}                      delete (DELETE, admin)
///
/// /upload                                      image upload (auth required)
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/content", content::router())
        .nest("/pages", pages::router())
        .nest("/contact", contact::router())
        .nest("/upload", upload::router(config.max_upload_bytes))
}
