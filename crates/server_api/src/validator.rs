use shared::{
    domain::{Batch, ColumnLengths, RatingColumns, RatingField},
    error::{ApiError, ErrorCode},
    protocol::RatingForm,
};
use thiserror::Error;

pub const SHAPE_MISMATCH_MESSAGE: &str =
    "All input fields must have the same number of entries!";
pub const PARSE_MESSAGE: &str =
    "Please ensure all numeric fields are properly formatted (e.g., only numbers for ratings).";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} rating '{token}' is not a whole number")]
    Parse { field: RatingField, token: String },
    #[error("fields have different numbers of entries ({lengths})")]
    ShapeMismatch { lengths: ColumnLengths },
}

impl ValidationError {
    /// Message shown next to the form.
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::Parse { field, token } => {
                format!("{PARSE_MESSAGE} The {field} field contains '{token}'.")
            }
            ValidationError::ShapeMismatch { lengths } => {
                format!("{SHAPE_MISMATCH_MESSAGE} Got {lengths}.")
            }
        }
    }
}

impl From<&ValidationError> for ApiError {
    fn from(value: &ValidationError) -> Self {
        ApiError::new(ErrorCode::Validation, value.user_message())
    }
}

/// Splits a comma-separated field into trimmed, non-empty tokens.
pub fn split_field(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

fn parse_scores(field: RatingField, raw: &str) -> Result<Vec<i64>, ValidationError> {
    split_field(raw)
        .into_iter()
        .map(|token| {
            token.parse::<i64>().map_err(|_| ValidationError::Parse {
                field,
                token: token.to_string(),
            })
        })
        .collect()
}

fn parse_labels(raw: &str) -> Vec<String> {
    split_field(raw).into_iter().map(str::to_string).collect()
}

/// Turns the five raw form fields into an equal-length batch.
///
/// Rating tokens are checked before lengths, so a malformed number is reported
/// even when the fields also disagree in length.
pub fn validate(form: &RatingForm) -> Result<Batch, ValidationError> {
    let columns = RatingColumns {
        name: parse_labels(form.field(RatingField::Name)),
        beer: parse_scores(RatingField::Beer, form.field(RatingField::Beer))?,
        wine: parse_scores(RatingField::Wine, form.field(RatingField::Wine))?,
        whiskey: parse_scores(RatingField::Whiskey, form.field(RatingField::Whiskey))?,
        username: parse_labels(form.field(RatingField::Username)),
    };

    Batch::new(columns).map_err(|ragged| ValidationError::ShapeMismatch { lengths: ragged.0 })
}

#[cfg(test)]
#[path = "tests/validator_tests.rs"]
mod tests;
