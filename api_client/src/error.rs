use thiserror::Error;

/// Fallback text shown when neither the backend nor the transport says anything useful.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(String),
    /// The backend answered with a non-success status.
    #[error("HTTP {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status { status: u16, message: Option<String> },
    /// `ErrorCode` was present and not "00".
    #[error("{message} (code {code})")]
    Envelope { code: String, message: String },
    /// The envelope or its result was missing entirely.
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("unexpected payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

impl ApiError {
    /// Text fit for a toast: the backend's own message when there is one.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Envelope { message, .. } if !message.is_empty() => message.clone(),
            ApiError::Status {
                message: Some(m), ..
            } if !m.is_empty() => m.clone(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{message}")]
    Rejected { code: String, message: String },
    #[error("empty result")]
    EmptyResult,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AuthError {
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Rejected { message, .. } if !message.is_empty() => message.clone(),
            AuthError::Api(e) => e.user_message(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot encode session data: {0}")]
    Encode(serde_json::Error),
    #[error("stored {name} is not valid: {reason}")]
    Decode { name: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid API url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
    #[error("config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("config file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
