use thiserror::Error;

/// Everything that can end a profile submission before the server answers.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("User _id is undefined")]
    MissingIdentifier,
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("server answered with status {0}")]
    Status(u16),
    #[error("image upload failed: {0}")]
    Upload(String),
    #[error("local storage: {0}")]
    Storage(String),
}

impl From<Box<dyn std::error::Error>> for ProfileError {
    fn from(err: Box<dyn std::error::Error>) -> Self {
        ProfileError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_become_storage() {
        let raw: Box<dyn std::error::Error> = Box::from("database is locked");
        let err = ProfileError::from(raw);
        assert!(matches!(err, ProfileError::Storage(ref m) if m == "database is locked"));
        assert_eq!(err.to_string(), "local storage: database is locked");
    }
}
