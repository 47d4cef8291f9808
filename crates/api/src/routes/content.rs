//! Route definitions for the `/content` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{content, inline_content, services};
use crate::state::AppState;

/// Routes mounted at `/content`.
///
/// ```text
/// GET    /inline-edit              -> get_inline_content
/// POST   /inline-edit              -> save_inline_content (admin)
/// GET    /services                 -> list_services
/// POST   /services                 -> create_service (admin)
/// POST   /services/inline-edit     -> edit_services (admin)
/// GET    /services/{id}            -> get_service
/// DELETE /services/{id}            -> delete_service (admin)
/// GET    /team                     -> list_team
/// GET    /portfolio                -> list_portfolio
/// GET    /portfolio/{id}           -> get_portfolio_item
/// GET    /company                  -> get_company
/// GET    /site-config              -> get_site_config
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/inline-edit",
            get(inline_content::get_inline_content).post(inline_content::save_inline_content),
        )
        .route(
            "/services",
            get(services::list_services).post(services::create_service),
        )
        .route("/services/inline-edit", post(services::edit_services))
        .route(
            "/services/{id}",
            get(services::get_service).delete(services::delete_service),
        )
        .route("/team", get(content::list_team))
        .route("/portfolio", get(content::list_portfolio))
        .route("/portfolio/{id}", get(content::get_portfolio_item))
        .route("/company", get(content::get_company))
        .route("/site-config", get(content::get_site_config))
}
