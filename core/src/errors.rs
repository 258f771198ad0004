use riffshare_api::ApiError;
use riffshare_types::SongId;
use thiserror::Error;

/// Errors that can occur with finding the config or data directories.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Unable to find the config directory for riffshare.")]
    Config,
    #[error("Unable to find the data directory for riffshare.")]
    Data,
}

/// Errors that can occur reading or writing the local store.
#[derive(Error, Debug)]
pub enum LocalStoreError {
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
    #[error("Malformed local store: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors reported by the songs store.
///
/// These are meant to be shown to the user as-is.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Song {0} is not in the list")]
    NotFound(SongId),
    #[error("Nothing to change")]
    EmptyChangeSet,
}

/// Errors entering or leaving the admin page.
#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Admin access required, log in with `riffshare admin login <token>`")]
    AccessRequired,
    #[error("The admin token cannot be empty")]
    BlankToken,
    #[error(transparent)]
    LocalStore(#[from] LocalStoreError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_str_eq;
    use rstest::rstest;

    #[rstest]
    #[case(
        StoreError::from(ApiError::from_status(500, r#"{"message":"Error loading songs"}"#)).into(),
        "Error loading songs"
    )]
    #[case(StoreError::NotFound(SongId::new("abc")).into(), "Song abc is not in the list")]
    #[case(
        LocalStoreError::from(std::io::Error::other("disk full")).into(),
        "IO error: disk full"
    )]
    #[case(AdminError::BlankToken.into(), "The admin token cannot be empty")]
    fn test_error_messages(#[case] err: Box<dyn std::error::Error>, #[case] expected: &str) {
        assert_str_eq!(err.to_string(), expected);
    }
}
