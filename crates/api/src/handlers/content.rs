//! Handlers for the file-backed and team content endpoints.

use axum::extract::{Path, State};
use axum::Json;
use logicton_core::content::{CompanyInfo, PortfolioItem, SiteConfig, TeamMemberDocument};
use logicton_core::error::CoreError;
use logicton_db::repositories::TeamMemberRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Active team members in display order.
pub async fn active_team(state: &AppState) -> AppResult<Vec<TeamMemberDocument>> {
    let rows = TeamMemberRepo::list_active(&state.pool).await?;
    Ok(rows.into_iter().map(TeamMemberDocument::from).collect())
}

/// Active portfolio items in file order.
pub async fn active_portfolio(state: &AppState) -> AppResult<Vec<PortfolioItem>> {
    let items = state.content.portfolio().await?;
    Ok(items.into_iter().filter(|item| item.is_active).collect())
}

/// GET /api/content/team
pub async fn list_team(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<TeamMemberDocument>>>> {
    Ok(Json(DataResponse::new(active_team(&state).await?)))
}

/// GET /api/content/portfolio
pub async fn list_portfolio(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<PortfolioItem>>>> {
    Ok(Json(DataResponse::new(active_portfolio(&state).await?)))
}

/// GET /api/content/portfolio/{id}
///
/// Inactive items are reported as not found.
pub async fn get_portfolio_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<PortfolioItem>>> {
    let item = state
        .content
        .portfolio()
        .await?
        .into_iter()
        .find(|item| item.id == id && item.is_active)
        .ok_or(CoreError::NotFound {
            entity: "Portfolio item",
            id,
        })?;
    Ok(Json(DataResponse::new(item)))
}

/// GET /api/content/company
pub async fn get_company(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<CompanyInfo>>> {
    Ok(Json(DataResponse::new(state.content.company().await?)))
}

/// GET /api/content/site-config
pub async fn get_site_config(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<SiteConfig>>> {
    Ok(Json(DataResponse::new(state.content.site_config().await?)))
}
