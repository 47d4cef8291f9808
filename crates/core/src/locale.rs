//! Supported locales and bilingual text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One of the two site languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Th,
    #[default]
    En,
}

impl Locale {
    /// Database / wire representation (`th` or `en`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Th => "th",
            Self::En => "en",
        }
    }

    /// Strict parse: only the exact lowercase codes are accepted.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "th" => Some(Self::Th),
            "en" => Some(Self::En),
            _ => None,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            CoreError::Validation(format!("Invalid locale '{s}'. Must be one of: th, en"))
        })
    }
}

/// A value carried once per locale, e.g. `{"th": "...", "en": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Localized<T> {
    pub th: T,
    pub en: T,
}

/// Bilingual free text.
pub type LocalizedText = Localized<String>;

impl<T> Localized<T> {
    pub fn get(&self, locale: Locale) -> &T {
        match locale {
            Locale::Th => &self.th,
            Locale::En => &self.en,
        }
    }
}
