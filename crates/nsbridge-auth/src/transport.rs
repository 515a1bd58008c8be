//! Shared HTTP plumbing for the pipeline stages.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;

use crate::error::PipelineError;

/// Builds the HTTP client used for every outbound call.
pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(timeout).build()
}

/// Describes a request that never produced a response.
pub(crate) fn describe_send_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {err}")
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    }
}

/// Details of a non-success HTTP response.
pub(crate) struct RemoteFailure {
    status: StatusCode,
    body: Option<Value>,
}

impl RemoteFailure {
    /// Reads the status and body of a failed response.
    ///
    /// A JSON body is kept as-is; any other non-empty body is kept as a JSON
    /// string.
    pub(crate) async fn read(response: reqwest::Response) -> Self {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str::<Value>(&text).ok().or_else(|| {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| Value::String(trimmed.to_string()))
        });
        Self { status, body }
    }

    /// Converts into a stage error built by `make`.
    pub(crate) fn into_error(self, make: fn(String) -> PipelineError) -> PipelineError {
        let err = make(format!("HTTP {}", self.status));
        match self.body {
            Some(body) => err.with_remote_body(body),
            None => err,
        }
    }
}
