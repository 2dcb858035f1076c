//! Error types with fix suggestions

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

pub type Result<T> = std::result::Result<T, CaseTreeError>;

/// All error variants are part of the public API.
///
/// Malformed persisted data and unknown stage ids have no variant:
/// both degrade to a safe default instead of failing.
#[derive(Error, Debug)]
pub enum CaseTreeError {
    // ─────────────────────────────────────────────────────────────
    // Flow model errors (CASE-001 to CASE-002)
    // ─────────────────────────────────────────────────────────────
    #[error("CASE-001: Duplicate stage id '{id}' in flow")]
    DuplicateStage { id: String },

    #[error("CASE-002: Invalid stage id '{id}' (expected snake_case token)")]
    InvalidStageId { id: String },

    // ─────────────────────────────────────────────────────────────
    // Form errors (CASE-010 to CASE-011)
    // ─────────────────────────────────────────────────────────────
    #[error("CASE-010: Missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("CASE-011: Unknown custody type '{value}'")]
    InvalidCustody { value: String },

    // ─────────────────────────────────────────────────────────────
    // Storage errors (CASE-020 to CASE-021)
    // ─────────────────────────────────────────────────────────────
    #[error("CASE-020: Storage error at {path}: {source}")]
    Storage {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CASE-021: Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl FixSuggestion for CaseTreeError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            CaseTreeError::DuplicateStage { .. } => Some("Give every stage in the flow a unique id"),
            CaseTreeError::InvalidStageId { .. } => {
                Some("Use lowercase letters, digits and underscores, starting with a letter")
            }
            CaseTreeError::MissingField { .. } => Some("Pass --name with a non-empty full name"),
            CaseTreeError::InvalidCustody { .. } => Some("Use one of: county, state, federal"),
            CaseTreeError::Storage { .. } => {
                Some("Check the data file path and permissions (see --data or CASETREE_DATA)")
            }
            CaseTreeError::Serialize(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_message_names_field() {
        let err = CaseTreeError::MissingField { field: "fullName" };
        assert_eq!(err.to_string(), "CASE-010: Missing required field 'fullName'");
        assert!(err.fix_suggestion().unwrap().contains("--name"));
    }

    #[test]
    fn storage_error_keeps_source() {
        let err = CaseTreeError::Storage {
            path: "/tmp/x.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().starts_with("CASE-020"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
