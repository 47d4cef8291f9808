//! Dotted content paths (`page.section.field`) used as inline-edit keys.

use std::fmt;

/// A parsed content path.
///
/// `field` is empty for two-segment paths such as `about.description`.
/// Segments past the second are joined back into `field`, so
/// `portfolio.item-1.title.sub` keeps its full path on the way back out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentPath {
    pub page: String,
    pub section: String,
    pub field: String,
}

impl ContentPath {
    /// Parse a dotted path. Returns `None` for fewer than two segments or
    /// when the page or section segment is empty.
    pub fn parse(path: &str) -> Option<Self> {
        let mut parts = path.splitn(3, '.');
        let page = parts.next()?;
        let section = parts.next()?;
        let field = parts.next().unwrap_or("");

        if page.is_empty() || section.is_empty() {
            return None;
        }

        Some(Self {
            page: page.to_string(),
            section: section.to_string(),
            field: field.to_string(),
        })
    }

    /// Rebuild a path from its stored parts.
    pub fn join(page: &str, section: &str, field: &str) -> String {
        if field.is_empty() {
            format!("{page}.{section}")
        } else {
            format!("{page}.{section}.{field}")
        }
    }
}

impl fmt::Display for ContentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Self::join(&self.page, &self.section, &self.field))
    }
}
