//! Handler for `GET /api/pages/{page}`: everything one site page renders,
//! in a single response.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::Json;
use logicton_core::content::{
    CompanyInfo, ContentFileError, PortfolioItem, ServiceDocument, SiteConfig, TeamMemberDocument,
};
use logicton_core::error::CoreError;
use logicton_core::locale::Locale;
use serde::{Deserialize, Serialize};

use super::content::{active_portfolio, active_team};
use super::inline_content::page_overrides;
use super::parse_locale;
use super::services::active_services;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Number of featured portfolio items shown on the home page.
const HOME_FEATURED_LIMIT: usize = 3;

/// Site pages with a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Home,
    About,
    Services,
    Portfolio,
    Contact,
}

impl Page {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "home" => Some(Self::Home),
            "about" => Some(Self::About),
            "services" => Some(Self::Services),
            "portfolio" => Some(Self::Portfolio),
            "contact" => Some(Self::Contact),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::About => "about",
            Self::Services => "services",
            Self::Portfolio => "portfolio",
            Self::Contact => "contact",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub locale: Option<String>,
}

/// Inline overrides plus the documents a page shows. Sections a page does
/// not use are omitted.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageBundle {
    pub page: Page,
    pub locale: Locale,
    pub content: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<ServiceDocument>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_portfolio: Option<Vec<PortfolioItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio: Option<Vec<PortfolioItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<Vec<TeamMemberDocument>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_config: Option<SiteConfig>,
}

/// A missing content file leaves its section out of the bundle; a malformed
/// one is still an error.
fn optional_file<T>(result: Result<T, AppError>) -> AppResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(AppError::Content(ContentFileError::Missing(file))) => {
            tracing::debug!(%file, "Content file missing, omitting section");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// GET /api/pages/{page}?locale=
pub async fn get_page(
    State(state): State<AppState>,
    Path(page): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<DataResponse<PageBundle>>> {
    let page = Page::parse(&page).ok_or(CoreError::NotFound { entity: "Page", id: page })?;
    let locale = parse_locale(query.locale.as_deref())?;

    let mut bundle = PageBundle {
        page,
        locale,
        content: page_overrides(&state, page.as_str(), locale).await?,
        services: None,
        featured_portfolio: None,
        portfolio: None,
        company: None,
        team: None,
        site_config: None,
    };

    match page {
        Page::Home => {
            bundle.services = Some(active_services(&state).await?);
            bundle.featured_portfolio = optional_file(active_portfolio(&state).await)?.map(|items| {
                items
                    .into_iter()
                    .filter(|item| item.featured)
                    .take(HOME_FEATURED_LIMIT)
                    .collect()
            });
        }
        Page::About => {
            bundle.company = optional_file(state.content.company().await.map_err(AppError::from))?;
            bundle.team = Some(active_team(&state).await?);
        }
        Page::Services => {
            bundle.services = Some(active_services(&state).await?);
        }
        Page::Portfolio => {
            bundle.portfolio = optional_file(active_portfolio(&state).await)?;
        }
        Page::Contact => {
            bundle.site_config =
                optional_file(state.content.site_config().await.map_err(AppError::from))?;
        }
    }

    Ok(Json(DataResponse::new(bundle)))
}
