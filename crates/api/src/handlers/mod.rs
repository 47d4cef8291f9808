pub mod auth;
pub mod contact;
pub mod content;
pub mod inline_content;
pub mod inquiries;
pub mod pages;
pub mod services;
pub mod upload;

use logicton_core::locale::Locale;

use crate::error::AppResult;

/// Parse an optional `?locale=` value, defaulting to English.
pub(crate) fn parse_locale(raw: Option<&str>) -> AppResult<Locale> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Locale::default()),
        Some(value) => Ok(value.parse()?),
    }
}
