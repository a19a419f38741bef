//! Maps every transport and HTTP failure into the uniform
//! [`ApiError`] shape. Total: always yields a value, never panics.

use serde::de::DeserializeOwned;

use rewarddesk_api::{ApiError, ErrorBody};

const GENERIC_FAILURE: &str = "an unknown error occurred";

/// Normalize a transport-level failure (connect error, timeout, body decode).
/// No HTTP status is available on this path.
pub fn from_transport(err: reqwest::Error) -> ApiError {
    let message = err.to_string();
    if message.is_empty() {
        ApiError::new(GENERIC_FAILURE)
    } else {
        ApiError::new(message)
    }
}

/// Normalize a non-2xx response: prefer the server's structured `{message}`
/// body, fall back to the raw body text, then to a status-line message.
pub async fn from_response(resp: reqwest::Response) -> ApiError {
    let status = resp.status().as_u16();
    let text = resp.text().await.unwrap_or_default();
    if let Ok(body) = serde_json::from_str::<ErrorBody>(&text) {
        if !body.message.is_empty() {
            return ApiError::with_status(body.message, status);
        }
    }
    let trimmed = text.trim();
    if trimmed.is_empty() {
        ApiError::with_status(format!("request failed with status {status}"), status)
    } else {
        ApiError::with_status(trimmed, status)
    }
}

/// Decode a JSON success body, normalizing HTTP errors first.
pub async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    if !resp.status().is_success() {
        return Err(from_response(resp).await);
    }
    resp.json().await.map_err(from_transport)
}

/// Accept any 2xx response, discarding the body.
pub async fn read_unit(resp: reqwest::Response) -> Result<(), ApiError> {
    if !resp.status().is_success() {
        return Err(from_response(resp).await);
    }
    Ok(())
}
