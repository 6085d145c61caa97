//! Response normalization for QMS REST calls

use super::error::ClientError;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Error payload shape the backend may send on failure
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Sanitize response body for logging.
/// Truncates long responses and strips control characters.
pub(crate) fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| c.is_control(), "")
}

/// Pull the human-readable `message` out of an error body, if any
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
}

/// Normalize a non-success response into a [`ClientError`]
pub(crate) fn application_error(status: u16, body: &str) -> ClientError {
    ClientError::application(status, extract_error_message(body))
}

/// Decode a success body. An empty body is treated as JSON `null`.
pub(crate) fn decode_success<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ClientError> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| ClientError::decode(status, e))
}
