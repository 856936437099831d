//! Catalog-specific error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// Transport failure (connect, timeout, body read)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The catalog answered with a non-2xx status
    #[error("Catalog returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The body was not the expected JSON
    #[error("Malformed catalog response: {0}")]
    Parse(String),
}

impl CatalogError {
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_mentions_code() {
        let err = CatalogError::Status {
            status: 503,
            body: "maintenance".into(),
        };
        assert!(err.to_string().contains("503"));
        assert!(!err.is_parse());
    }

    #[test]
    fn test_parse_error_kind() {
        assert!(CatalogError::Parse("eof".into()).is_parse());
    }
}
