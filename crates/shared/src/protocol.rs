use serde::{Deserialize, Serialize};

use crate::{
    domain::{RatingField, RatingTable},
    error::ApiError,
};

/// The five comma-separated inputs of the rating form, exactly as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub beer: String,
    #[serde(default)]
    pub wine: String,
    #[serde(default)]
    pub whiskey: String,
    #[serde(default)]
    pub username: String,
}

impl RatingForm {
    pub fn field(&self, field: RatingField) -> &str {
        match field {
            RatingField::Name => &self.name,
            RatingField::Beer => &self.beer,
            RatingField::Wine => &self.wine,
            RatingField::Whiskey => &self.whiskey,
            RatingField::Username => &self.username,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A user-facing message produced while handling a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// JSON reply to a submission that was accepted (possibly with a sync warning).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub appended: usize,
    pub synced: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_error: Option<ApiError>,
    pub notices: Vec<Notice>,
    pub table: RatingTable,
}
