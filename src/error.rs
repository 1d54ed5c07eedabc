use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Timed out after {0:?} waiting for the page")]
    Timeout(Duration),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Snapshot io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid repository `{0}`, expected owner/repo")]
    Repository(String),

    #[error("Issue creation rejected ({status}): {message}")]
    IssueRejected {
        status: reqwest::StatusCode,
        message: String,
    },
}
