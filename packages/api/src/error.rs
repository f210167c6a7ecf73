use thiserror::Error;

/// Failures talking to the backend on behalf of the browser.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("backend request failed: {0}")]
    Backend(#[from] reqwest::Error),

    #[error("backend returned a non-JSON body: {0}")]
    MalformedBody(#[source] serde_json::Error),
}
