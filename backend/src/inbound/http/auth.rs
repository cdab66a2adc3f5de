//! Caller-credential checks for HTTP handlers.
//!
//! Every API endpoint requires a shared-secret header. The configured secret
//! is stored only as a SHA-256 digest: presented keys are digested and the
//! digests compared, which keeps the comparison free of early exits and the
//! plaintext secret out of long-lived state. A short hex fingerprint of the
//! digest is exposed for logging.

use actix_web::http::header::HeaderMap;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::domain::Error;

use super::ApiResult;

/// Header carrying the caller credential.
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Digest of the configured caller credential.
#[derive(Clone)]
pub struct ApiCredential {
    digest: [u8; 32],
    fingerprint: String,
}

impl ApiCredential {
    /// Digest a configured secret.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let digest: [u8; 32] = Sha256::digest(secret.as_bytes()).into();
        let fingerprint = hex::encode(&digest[..4]);
        Self {
            digest,
            fingerprint,
        }
    }

    /// Short hex fingerprint of the configured secret, safe to log.
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        self.fingerprint.as_str()
    }

    fn matches(&self, presented: &str) -> bool {
        let presented: [u8; 32] = Sha256::digest(presented.as_bytes()).into();
        presented == self.digest
    }
}

/// Reject the request unless it carries the configured credential.
///
/// # Errors
///
/// Returns an unauthorized [`Error`] when the header is absent, not valid
/// UTF-8, or does not match the configured secret.
pub fn require_api_key(headers: &HeaderMap, credential: &ApiCredential) -> ApiResult<()> {
    let presented = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match presented {
        Some(value) if credential.matches(value) => Ok(()),
        Some(_) => {
            debug!(
                expected_fingerprint = credential.fingerprint(),
                "api key mismatch"
            );
            Err(Error::unauthorized("invalid API key"))
        }
        None => Err(Error::unauthorized("missing X-Api-Key header")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use actix_web::http::header::HeaderValue;

    fn headers_with_key(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            actix_web::http::header::HeaderName::from_static("x-api-key"),
            HeaderValue::from_str(value).expect("ascii"),
        );
        headers
    }

    #[test]
    fn accepts_the_configured_secret() {
        let credential = ApiCredential::new("hunter2");
        let headers = headers_with_key("hunter2");
        require_api_key(&headers, &credential).expect("authorised");
    }

    #[test]
    fn rejects_a_wrong_secret() {
        let credential = ApiCredential::new("hunter2");
        let headers = headers_with_key("hunter3");
        let error = require_api_key(&headers, &credential).expect_err("unauthorised");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[test]
    fn rejects_a_missing_header() {
        let credential = ApiCredential::new("hunter2");
        let error = require_api_key(&HeaderMap::new(), &credential).expect_err("unauthorised");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[test]
    fn fingerprint_is_stable_and_short() {
        let a = ApiCredential::new("hunter2");
        let b = ApiCredential::new("hunter2");
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 8);
    }
}
