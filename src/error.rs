//! Errors that can be returned by this crate

use crate::item::ItemId;

/// Everything that can go wrong when talking to the remote collection or patching the local list
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Client-side rejection (e.g. an empty title). Such a request never reaches the network.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The request could not be carried to the server, or the reply could not be read
    #[error("Network error: {0}")]
    Network(String),

    /// The server rejected the request, or answered with a malformed or missing payload
    #[error("Service error ({code:?}): {message}")]
    Service { code: Option<i64>, message: String },

    /// The target item does not exist (anymore) on the server
    #[error("Item {0} not found")]
    NotFound(ItemId),

    /// An owner-scoped operation has been attempted while nobody is signed in
    #[error("Not signed in")]
    NotAuthenticated,

    /// An item with the same ID is already in the local list
    #[error("Item {0} is already in the list")]
    DuplicateId(ItemId),
}

impl Error {
    pub(crate) fn service<S: ToString>(message: S) -> Self {
        Self::Service { code: None, message: message.to_string() }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::service(format!("Unable to decode the server reply: {}", err))
        } else {
            Self::Network(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
