use pm_core::{Error, Result, ServiceError};
use reqwest::Response;
use serde::de::DeserializeOwned;

/// Reads the `{error}` body of a failed response, if there is one.
pub(crate) async fn error_message(response: Response) -> Option<String> {
    let bytes = response.bytes().await.ok()?;
    serde_json::from_slice::<ServiceError>(&bytes).ok()?.error
}

/// Passes 2xx responses through and turns anything else into a network error.
pub(crate) async fn ensure_ok(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let detail = error_message(response).await.unwrap_or_else(|| status.to_string());
    tracing::warn!("{} failed with {}: {}", what, status, detail);
    Err(Error::Network(format!("{}: {}", what, detail)))
}

pub(crate) async fn decode<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| {
        tracing::warn!("{} returned an unexpected body: {}", what, e);
        Error::Serialization(e)
    })
}
