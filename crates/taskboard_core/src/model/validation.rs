//! Input validation shared by entity factories and update payloads.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid hex color regex"));

/// Rejected input for a board, column, task or sub-entity write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Name or title is blank after trim.
    BlankName { entity: &'static str },
    /// Free text (comment body, checklist item) is blank after trim.
    BlankText { entity: &'static str },
    /// Color is not in `#rrggbb` form.
    InvalidColor(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName { entity } => write!(f, "{entity} name must not be blank"),
            Self::BlankText { entity } => write!(f, "{entity} text must not be blank"),
            Self::InvalidColor(value) => {
                write!(f, "color `{value}` must be in #rrggbb form")
            }
        }
    }
}

impl Error for ValidationError {}

/// Trims a display name and rejects blank values.
pub fn normalize_name(entity: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankName { entity });
    }
    Ok(trimmed.to_string())
}

/// Rejects blank free text without altering its content.
pub fn require_text(entity: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankText { entity });
    }
    Ok(())
}

/// Normalizes a `#rrggbb` color to lowercase.
pub fn normalize_color(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if !HEX_COLOR_RE.is_match(trimmed) {
        return Err(ValidationError::InvalidColor(value.to_string()));
    }
    Ok(trimmed.to_ascii_lowercase())
}
