//! Service catalogue domain types and the typed field patch model.
//!
//! Inline edits to a service arrive as loosely typed JSON
//! (`{serviceId, field, locale, value, index?}`). [`ServicePatch::from_change`]
//! turns one such change into a closed enum so that the storage layer can pick
//! columns by `match` instead of ever interpolating user input into SQL.
//! Changes that cannot be interpreted are skipped with a [`SkipReason`].

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::locale::Locale;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Service category, matching the `services.category` check constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCategory {
    Web,
    Mobile,
    Animation,
    Framework,
}

impl ServiceCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Mobile => "mobile",
            Self::Animation => "animation",
            Self::Framework => "framework",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "web" => Some(Self::Web),
            "mobile" => Some(Self::Mobile),
            "animation" => Some(Self::Animation),
            "framework" => Some(Self::Framework),
            _ => None,
        }
    }
}

/// One step of a service's "how we work" section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HowWeWorkStep {
    pub title: String,
    pub description: String,
}

impl HowWeWorkStep {
    fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.description.trim().is_empty()
    }
}

// ---------------------------------------------------------------------------
// Incoming change
// ---------------------------------------------------------------------------

/// One service edit as posted by the inline editor.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceChange {
    pub service_id: String,
    pub field: String,
    pub locale: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub index: Option<i64>,
}

/// The closed set of editable service fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceField {
    Title,
    Description,
    Features,
    HowWeWork,
    Technologies,
    Icon,
    Category,
    Order,
    IsActive,
}

impl ServiceField {
    /// Map the wire name of a field to the enum. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "title" => Some(Self::Title),
            "description" => Some(Self::Description),
            "features" => Some(Self::Features),
            "howWeWork" => Some(Self::HowWeWork),
            "technologies" => Some(Self::Technologies),
            "icon" => Some(Self::Icon),
            "category" => Some(Self::Category),
            "order" => Some(Self::Order),
            "isActive" => Some(Self::IsActive),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Patch
// ---------------------------------------------------------------------------

/// Either a whole-array replacement or a single element replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayEdit<T> {
    Replace(Vec<T>),
    Element { index: usize, value: T },
}

/// A fully validated edit to one field of one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServicePatch {
    Title { locale: Locale, value: String },
    Description { locale: Locale, value: String },
    Features { locale: Locale, edit: ArrayEdit<String> },
    HowWeWork { locale: Locale, edit: ArrayEdit<HowWeWorkStep> },
    Technologies(Vec<String>),
    Icon(String),
    Category(ServiceCategory),
    Order(i32),
    IsActive(bool),
}

/// Why a change was not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    UnsupportedLocale(String),
    UnknownField(String),
    InvalidValue { field: &'static str, reason: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedLocale(locale) => write!(f, "unsupported locale '{locale}'"),
            Self::UnknownField(field) => write!(f, "unknown field '{field}'"),
            Self::InvalidValue { field, reason } => write!(f, "invalid value for {field}: {reason}"),
        }
    }
}

impl ServicePatch {
    /// Interpret one incoming change.
    pub fn from_change(change: &ServiceChange) -> Result<Self, SkipReason> {
        let locale = Locale::parse(&change.locale)
            .ok_or_else(|| SkipReason::UnsupportedLocale(change.locale.clone()))?;
        let field = ServiceField::from_name(&change.field)
            .ok_or_else(|| SkipReason::UnknownField(change.field.clone()))?;
        let index = parse_index(change.index, field_name(field))?;
        let value = &change.value;

        let patch = match field {
            ServiceField::Title => Self::Title {
                locale,
                value: require_string(value, "title")?,
            },
            ServiceField::Description => Self::Description {
                locale,
                value: require_string(value, "description")?,
            },
            ServiceField::Features => {
                let edit = match index {
                    Some(index) => ArrayEdit::Element {
                        index,
                        value: require_string(value, "features")?,
                    },
                    None => ArrayEdit::Replace(require_string_array(value, "features")?),
                };
                Self::Features { locale, edit }
            }
            ServiceField::HowWeWork => {
                let edit = match index {
                    Some(index) => ArrayEdit::Element {
                        index,
                        value: require_step(value)?,
                    },
                    None => ArrayEdit::Replace(require_steps(value)?),
                };
                Self::HowWeWork { locale, edit }
            }
            ServiceField::Technologies => {
                Self::Technologies(require_string_array(value, "technologies")?)
            }
            ServiceField::Icon => {
                let icon = require_string(value, "icon")?;
                if icon.trim().is_empty() {
                    return Err(invalid("icon", "must not be empty"));
                }
                Self::Icon(icon)
            }
            ServiceField::Category => {
                let raw = require_string(value, "category")?;
                let category = ServiceCategory::parse(&raw)
                    .ok_or_else(|| invalid("category", format!("unknown category '{raw}'")))?;
                Self::Category(category)
            }
            ServiceField::Order => Self::Order(
                parse_order(value).ok_or_else(|| invalid("order", "expected an integer"))?,
            ),
            ServiceField::IsActive => Self::IsActive(
                normalize_bool(value).ok_or_else(|| invalid("isActive", "expected a boolean"))?,
            ),
        };

        Ok(patch)
    }
}

fn field_name(field: ServiceField) -> &'static str {
    match field {
        ServiceField::Title => "title",
        ServiceField::Description => "description",
        ServiceField::Features => "features",
        ServiceField::HowWeWork => "howWeWork",
        ServiceField::Technologies => "technologies",
        ServiceField::Icon => "icon",
        ServiceField::Category => "category",
        ServiceField::Order => "order",
        ServiceField::IsActive => "isActive",
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> SkipReason {
    SkipReason::InvalidValue {
        field,
        reason: reason.into(),
    }
}

fn parse_index(index: Option<i64>, field: &'static str) -> Result<Option<usize>, SkipReason> {
    match index {
        None => Ok(None),
        Some(i) => usize::try_from(i)
            .map(Some)
            .map_err(|_| invalid(field, format!("negative index {i}"))),
    }
}

fn require_string(value: &Value, field: &'static str) -> Result<String, SkipReason> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| invalid(field, "expected a string"))
}

fn require_string_array(value: &Value, field: &'static str) -> Result<Vec<String>, SkipReason> {
    serde_json::from_value::<Vec<String>>(value.clone())
        .map_err(|_| invalid(field, "expected an array of strings"))
}

fn require_step(value: &Value) -> Result<HowWeWorkStep, SkipReason> {
    let step = serde_json::from_value::<HowWeWorkStep>(value.clone())
        .map_err(|_| invalid("howWeWork", "expected {title, description}"))?;
    if !step.is_complete() {
        return Err(invalid("howWeWork", "title and description are required"));
    }
    Ok(step)
}

fn require_steps(value: &Value) -> Result<Vec<HowWeWorkStep>, SkipReason> {
    let steps = serde_json::from_value::<Vec<HowWeWorkStep>>(value.clone())
        .map_err(|_| invalid("howWeWork", "expected an array of {title, description}"))?;
    if !steps.iter().all(HowWeWorkStep::is_complete) {
        return Err(invalid("howWeWork", "every step needs a title and description"));
    }
    Ok(steps)
}

/// Normalise the truthy/falsy forms the editor may send.
///
/// Accepts booleans, the numbers `1`/`0` and the strings `"true"`,
/// `"false"`, `"1"`, `"0"`. Anything else is `None`.
pub fn normalize_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Accept an integer or a numeric string that fits in `i32`.
pub fn parse_order(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    }
}
