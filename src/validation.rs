//! Structural validation of inbound JSON payloads.
//!
//! Rules are checked in field order and the first failure is returned;
//! later fields are not inspected. Transforms (tag trimming) only happen
//! when every rule passes.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::vendors::VendorInput;

pub const NAME_MAX_CHARS: usize = 100;
pub const EMAIL_MAX_CHARS: usize = 255;
pub const TAG_MAX_CHARS: usize = 50;
pub const PASSWORD_MAX_CHARS: usize = 100;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$",
    )
    .expect("email pattern is valid")
});

/// The first violated rule, with a client-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validated login payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

pub fn validate_vendor(input: &Value) -> Result<VendorInput, ValidationError> {
    let name = required_str(input, "name")?;
    let name_len = name.chars().count();
    if name_len == 0 {
        return Err(ValidationError::new("name", "name is required"));
    }
    if name_len > NAME_MAX_CHARS {
        return Err(ValidationError::new(
            "name",
            format!("name must be at most {NAME_MAX_CHARS} characters"),
        ));
    }

    let email = validate_email(input)?;
    let tags = validate_tags(input.get("tags"))?;

    Ok(VendorInput {
        name: name.to_string(),
        email,
        tags,
    })
}

pub fn validate_login(input: &Value) -> Result<LoginInput, ValidationError> {
    let email = validate_email(input)?;

    let password = required_str(input, "password")?;
    let password_len = password.chars().count();
    if password_len == 0 {
        return Err(ValidationError::new("password", "password is required"));
    }
    if password_len > PASSWORD_MAX_CHARS {
        return Err(ValidationError::new(
            "password",
            format!("password must be at most {PASSWORD_MAX_CHARS} characters"),
        ));
    }

    Ok(LoginInput {
        email,
        password: password.to_string(),
    })
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

fn required_str<'a>(input: &'a Value, field: &'static str) -> Result<&'a str, ValidationError> {
    input
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| ValidationError::new(field, format!("{field} is required")))
}

fn validate_email(input: &Value) -> Result<String, ValidationError> {
    let email = required_str(input, "email")?;
    if !is_valid_email(email) {
        return Err(ValidationError::new(
            "email",
            "email must be a valid email address",
        ));
    }
    if email.chars().count() > EMAIL_MAX_CHARS {
        return Err(ValidationError::new(
            "email",
            format!("email must be at most {EMAIL_MAX_CHARS} characters"),
        ));
    }
    Ok(email.to_string())
}

fn validate_tags(tags: Option<&Value>) -> Result<Vec<String>, ValidationError> {
    let items = match tags {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(tags_type_error()),
    };

    let mut raw = Vec::with_capacity(items.len());
    for item in items {
        let tag = item.as_str().ok_or_else(tags_type_error)?;
        if tag.chars().count() > TAG_MAX_CHARS {
            return Err(ValidationError::new(
                "tags",
                format!("each tag must be at most {TAG_MAX_CHARS} characters"),
            ));
        }
        raw.push(tag);
    }

    Ok(raw
        .into_iter()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect())
}

fn tags_type_error() -> ValidationError {
    ValidationError::new("tags", "tags must be an array of strings")
}
