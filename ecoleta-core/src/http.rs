//! Small helpers shared by the HTTP adapters.

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::ports::PortError;

/// Send a request and decode its JSON body.
///
/// # Errors
///
/// Returns [`PortError::Timeout`] or [`PortError::Network`] on transport failures,
/// [`PortError::Status`] on non-success responses and [`PortError::Decode`] when
/// the body does not match `T`.
pub async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, PortError> {
    let resp = ensure_success(req.send().await?)?;
    let body = resp.bytes().await?;
    decode(&body)
}

/// Send a request and only check that it succeeded. The body is discarded.
///
/// # Errors
///
/// Same transport and status errors as [`fetch_json`].
pub async fn send_checked(req: RequestBuilder) -> Result<(), PortError> {
    ensure_success(req.send().await?).map(drop)
}

/// Decode a JSON body into `T`.
///
/// # Errors
///
/// Returns [`PortError::Decode`] when the body is not valid for `T`.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, PortError> {
    serde_json::from_slice(body).map_err(|err| {
        debug!(%err, bytes = body.len(), "response body did not decode");
        PortError::from(err)
    })
}

fn ensure_success(resp: Response) -> Result<Response, PortError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        warn!(url = %resp.url(), %status, "request rejected");
        Err(PortError::Status(status.as_u16()))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Sigla {
        sigla: String,
    }

    #[test]
    fn decode_reads_matching_body() {
        let parsed: Vec<Sigla> = decode(br#"[{"sigla":"SP"},{"sigla":"RJ"}]"#).expect("valid body");
        let codes: Vec<_> = parsed.into_iter().map(|entry| entry.sigla).collect();
        assert_eq!(codes, ["SP", "RJ"]);
    }

    #[test]
    fn decode_reports_malformed_body() {
        let result = decode::<Vec<Sigla>>(br#"{"error":"maintenance"}"#);
        assert!(
            matches!(result, Err(PortError::Decode(_))),
            "object instead of array must be a decode error"
        );
    }
}
