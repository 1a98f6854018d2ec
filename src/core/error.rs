//! Error taxonomy for the vault adapter, metadata index and store facade.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// A secret addressed by (namespace, account) does not exist.
    #[error("secret not found: {account}@{namespace}")]
    NotFound { namespace: String, account: String },

    /// Nothing to work with (empty export, empty or unparseable import).
    #[error("{0}")]
    EmptyInput(String),

    /// The metadata record exists but is not the expected structure.
    #[error("metadata index is corrupt: {0}")]
    Corruption(String),

    #[error("invalid name: {0}")]
    InvalidName(String),

    #[error("vault backend error: {0}")]
    Backend(String),

    #[error("serialize: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    pub fn not_found(namespace: &str, account: &str) -> Self {
        Self::NotFound {
            namespace: namespace.to_string(),
            account: account.to_string(),
        }
    }

    /// Conditions that should be reported to the user without failing the process.
    pub fn is_user_visible(&self) -> bool {
        matches!(self, Self::EmptyInput(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = StoreError::not_found("pass.github", "alice");
        assert_eq!(err.to_string(), "secret not found: alice@pass.github");
        assert!(!err.is_user_visible());
    }

    #[test]
    fn test_empty_input_is_user_visible() {
        let err = StoreError::EmptyInput("No service logins found, export cancelled".into());
        assert!(err.is_user_visible());
    }
}
