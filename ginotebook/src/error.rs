//! Error taxonomy for the GI Notebook client.

use reqwest::{Method, StatusCode};

/// Errors raised while configuring the client or resolving resource graphs.
///
/// Nothing is caught internally: any failure aborts the in-progress fetch and
/// propagates through every enclosing resolution step to the caller.
#[derive(Debug, thiserror::Error)]
pub enum NotebookError {
    /// Port outside `[0, 65535]` at construction.
    #[error("port number {0} is illegal")]
    IllegalPort(i64),

    /// The configured auth token cannot be carried in an HTTP header.
    #[error("auth token is not a valid header value")]
    InvalidAuthToken,

    /// Connection-level failure (DNS, TLS, timeout); the source error carries
    /// the URL involved.
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-200 response. `status` renders with its reason phrase.
    #[error("received status {status} when accessing {url} with method {method} and params {params:?}")]
    Http {
        url: String,
        method: Method,
        status: StatusCode,
        params: Option<Vec<(String, String)>>,
    },

    /// Body was not the JSON shape the endpoint promises.
    #[error("decoding response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The remote reported a GI type name outside the known set.
    #[error("unknown GI type {name:?} from {url}")]
    UnknownGiType { url: String, name: String },

    /// A fetched object's identity does not match the reference it was
    /// resolved from.
    #[error("expected {expected} but got {actual} for {field}")]
    Integrity {
        expected: String,
        actual: String,
        field: String,
    },
}

/// Checks that a fetched resource's URL matches the reference it was resolved
/// from. The fetch operations never raise this themselves; callers composing
/// partial graphs can use it to guard cross-references before wiring them.
pub fn check_reference(expected: &str, actual: &str, field: &str) -> Result<(), NotebookError> {
    if expected == actual {
        Ok(())
    } else {
        Err(NotebookError::Integrity {
            expected: expected.to_string(),
            actual: actual.to_string(),
            field: field.to_string(),
        })
    }
}
