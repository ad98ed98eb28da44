use thiserror::Error;

use crate::api::ApiError;

pub type Result<T> = std::result::Result<T, MiniAppError>;

#[derive(Debug, Error)]
pub enum MiniAppError {
    /// A launch parameter or setting the page cannot start without.
    #[error("{0} not found.")]
    MissingLaunchParam(&'static str),
    #[error(transparent)]
    Api(#[from] ApiError),
    /// Invalid user input; the request is never sent.
    #[error("{0}")]
    Validation(String),
    #[error("field `{field}` is not editable on {entity}")]
    UnknownField {
        entity: &'static str,
        field: String,
    },
    #[error("a transaction cannot be linked to itself")]
    SelfLink,
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MiniAppError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Text shown to the user in a host alert.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}
