//! crates/launchpad_client/src/http.rs
//!
//! Response handling shared by the HTTP adapters.

use launchpad_core::ports::{PortError, PortResult};
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

pub(crate) fn map_transport_error(error: reqwest::Error) -> PortError {
    if error.is_timeout() {
        PortError::Unavailable(format!("request timed out: {}", error))
    } else {
        PortError::Unavailable(error.to_string())
    }
}

/// Decodes a 2xx body as `T`. Any other status becomes `Rejected` with the
/// server's `message`, or `Unexpected` when the body carries none.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> PortResult<T> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|e| PortError::Unexpected(format!("malformed response body: {}", e)));
    }

    let message = response
        .json::<ErrorBody>()
        .await
        .map(|body| body.message)
        .unwrap_or_default();
    if message.trim().is_empty() {
        Err(PortError::Unexpected(format!("status {}", status.as_u16())))
    } else {
        Err(PortError::Rejected(message))
    }
}
