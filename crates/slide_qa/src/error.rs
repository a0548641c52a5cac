//! Error types for slide_qa.
//!
//! Only loading can fail. Resolution itself declines instead of erroring.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QaError {
    #[error("Duplicate code '{0}' in knowledge tables")]
    DuplicateCode(String),

    #[error("Malformed code '{0}' (expected \"NN x\" or \"NN x y\")")]
    MalformedCode(String),

    #[error("Malformed colour entry '{0}'")]
    MalformedColor(String),

    #[error("Typical colour '{color}' for '{object}' is not in the colour vocabulary")]
    UnknownColor { object: String, color: String },

    #[error("Code '{code}' references unknown region '{region}'")]
    UnknownRegion { code: String, region: String },

    #[error("Malformed region keyword: {0}")]
    MalformedKeyword(String),

    #[error("Code '{0}' must name exactly one of region or category")]
    AmbiguousLabel(String),

    #[error("Code '{0}' has an empty question or answer")]
    EmptyEntry(String),

    #[error("Duplicate rule for unit {unit} (book {book})")]
    DuplicateUnit { unit: u32, book: String },

    #[error("Embedded knowledge tables are invalid: {0}")]
    Builtin(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl QaError {
    /// True for failures of the table contents themselves, as opposed to
    /// failures reading or parsing the file that holds them.
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            Self::Toml(_) | Self::TomlSer(_) | Self::Json(_) | Self::Io(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, QaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QaError::DuplicateCode("01 r a".to_string());
        assert_eq!(err.to_string(), "Duplicate code '01 r a' in knowledge tables");

        let err = QaError::UnknownColor {
            object: "banana".to_string(),
            color: "mauve".to_string(),
        };
        assert!(err.to_string().contains("mauve"));
    }

    #[test]
    fn test_validation_split() {
        assert!(QaError::EmptyEntry("01 r a".into()).is_validation());
        let io = QaError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(!io.is_validation());
    }
}
