//! Route definitions for the `/pages` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::pages;
use crate::state::AppState;

/// Routes mounted at `/pages`.
///
/// ```text
/// GET /{page}    -> get_page (?locale=th|en)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{page}", get(pages::get_page))
}
