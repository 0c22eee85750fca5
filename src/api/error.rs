use thiserror::Error;

/// Failures surfaced by [`super::ApiClient`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("resource not found")]
    NotFound,

    /// Any non-2xx status other than 404, with the raw body.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never produced a response (refused, reset, DNS, ...).
    #[error("transport error: {0}")]
    Transport(String),

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ApiError {
    /// The human-readable message the backend put in an error body, if any.
    ///
    /// The backend answers rejections with `{"error": "..."}`; framework
    /// errors use `{"message": "..."}`.
    pub fn server_message(&self) -> Option<String> {
        let ApiError::Http { body, .. } = self else {
            return None;
        };

        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        ["error", "message"]
            .iter()
            .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
            .filter(|message| !message.trim().is_empty())
            .map(str::to_string)
    }
}
