//! Contact form validation and inquiry status values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::error::CoreError;
use crate::locale::Locale;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_EMAIL_LEN: usize = 254;
pub const MAX_PHONE_LEN: usize = 30;
pub const MAX_COMPANY_LEN: usize = 100;
pub const MAX_SUBJECT_LEN: usize = 200;
pub const MAX_MESSAGE_LEN: usize = 5000;

/// Raw contact form body. Every field is optional at the serde level so that
/// missing fields surface as per-field validation errors instead of a
/// deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub language: Option<String>,
}

/// A contact submission that passed validation. Strings are trimmed and
/// empty optional fields are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidContact {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: String,
    pub message: String,
    pub language: Locale,
}

/// Lifecycle of an inquiry in the admin inbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    New,
    Read,
    Replied,
    Archived,
}

impl InquiryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Read => "read",
            Self::Replied => "replied",
            Self::Archived => "archived",
        }
    }
}

/// Validate a contact submission.
///
/// Messages are written in the submitter's language (`language`, default
/// `en`). All failing fields are reported together.
pub fn validate_contact(payload: &ContactPayload) -> Result<ValidContact, CoreError> {
    let mut errors = BTreeMap::new();

    let language = match payload.language.as_deref().map(str::trim) {
        None | Some("") => Locale::En,
        Some(raw) => Locale::parse(raw).unwrap_or_else(|| {
            errors.insert(
                "language".to_string(),
                "Language must be one of: th, en".to_string(),
            );
            Locale::En
        }),
    };
    let msg = Messages(language);

    let name = required(&mut errors, "name", &payload.name, MAX_NAME_LEN, msg);
    let subject = required(&mut errors, "subject", &payload.subject, MAX_SUBJECT_LEN, msg);
    let message = required(&mut errors, "message", &payload.message, MAX_MESSAGE_LEN, msg);
    let phone = optional(&mut errors, "phone", &payload.phone, MAX_PHONE_LEN, msg);
    let company = optional(&mut errors, "company", &payload.company, MAX_COMPANY_LEN, msg);

    let email = required(&mut errors, "email", &payload.email, MAX_EMAIL_LEN, msg);
    if let Some(email) = &email {
        if !email.validate_email() {
            errors.insert("email".to_string(), msg.invalid_email());
        }
    }

    if !errors.is_empty() {
        return Err(CoreError::InvalidFields {
            message: msg.check_fields(),
            errors,
        });
    }

    // All required fields are present once `errors` is empty.
    match (name, email, subject, message) {
        (Some(name), Some(email), Some(subject), Some(message)) => Ok(ValidContact {
            name,
            email,
            phone,
            company,
            subject,
            message,
            language,
        }),
        _ => Err(CoreError::Internal(
            "contact validation lost a required field".into(),
        )),
    }
}

fn required(
    errors: &mut BTreeMap<String, String>,
    field: &'static str,
    value: &Option<String>,
    max: usize,
    msg: Messages,
) -> Option<String> {
    match value.as_deref().map(str::trim) {
        None | Some("") => {
            errors.insert(field.to_string(), msg.required(field));
            None
        }
        Some(v) if v.chars().count() > max => {
            errors.insert(field.to_string(), msg.too_long(max));
            None
        }
        Some(v) => Some(v.to_string()),
    }
}

fn optional(
    errors: &mut BTreeMap<String, String>,
    field: &'static str,
    value: &Option<String>,
    max: usize,
    msg: Messages,
) -> Option<String> {
    match value.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(v) if v.chars().count() > max => {
            errors.insert(field.to_string(), msg.too_long(max));
            None
        }
        Some(v) => Some(v.to_string()),
    }
}

/// Localised validation messages.
#[derive(Clone, Copy)]
struct Messages(Locale);

impl Messages {
    fn required(self, field: &str) -> String {
        let text = match (self.0, field) {
            (Locale::Th, "name") => "กรุณากรอกชื่อ",
            (Locale::Th, "email") => "กรุณากรอกอีเมล",
            (Locale::Th, "subject") => "กรุณากรอกหัวข้อ",
            (Locale::Th, "message") => "กรุณากรอกข้อความ",
            (Locale::Th, _) => "กรุณากรอกข้อมูลให้ครบถ้วน",
            (Locale::En, "name") => "Name is required",
            (Locale::En, "email") => "Email is required",
            (Locale::En, "subject") => "Subject is required",
            (Locale::En, "message") => "Message is required",
            (Locale::En, _) => "This field is required",
        };
        text.to_string()
    }

    fn invalid_email(self) -> String {
        match self.0 {
            Locale::Th => "รูปแบบอีเมลไม่ถูกต้อง".to_string(),
            Locale::En => "Please enter a valid email address".to_string(),
        }
    }

    fn too_long(self, max: usize) -> String {
        match self.0 {
            Locale::Th => format!("ความยาวต้องไม่เกิน {max} ตัวอักษร"),
            Locale::En => format!("Must be at most {max} characters"),
        }
    }

    fn check_fields(self) -> String {
        match self.0 {
            Locale::Th => "กรุณาตรวจสอบข้อมูลที่กรอก".to_string(),
            Locale::En => "Please check your input fields".to_string(),
        }
    }
}
