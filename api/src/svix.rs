//! Svix webhook signature verification.
//!
//! Clerk delivers webhooks through Svix. Each message carries three headers:
//! `svix-id`, `svix-timestamp` and `svix-signature`. The signature is a
//! base64 HMAC-SHA256 over `"{id}.{timestamp}.{body}"` keyed with the
//! decoded endpoint secret (`whsec_<base64>`).

use std::fmt;

use axum::http::HeaderMap;
use base64::prelude::*;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

pub const SVIX_ID: &str = "svix-id";
pub const SVIX_TIMESTAMP: &str = "svix-timestamp";
pub const SVIX_SIGNATURE: &str = "svix-signature";

const SECRET_PREFIX: &str = "whsec_";
const SIGNATURE_VERSION: &str = "v1";

/// Allowed clock skew between the sender and this server, in seconds.
pub const DEFAULT_TOLERANCE_SECS: i64 = 5 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("webhook secret is not valid base64")]
    InvalidSecret,
    #[error("svix-timestamp is not a unix timestamp")]
    InvalidTimestamp,
    #[error("message timestamp is too old")]
    TimestampTooOld,
    #[error("message timestamp is too new")]
    TimestampTooNew,
    #[error("no matching signature found")]
    NoMatchingSignature,
}

/// The three Svix headers borrowed from a request.
#[derive(Debug, Clone, Copy)]
pub struct SvixHeaders<'a> {
    pub id: &'a str,
    pub timestamp: &'a str,
    pub signature: &'a str,
}

impl<'a> SvixHeaders<'a> {
    /// Returns `None` if any header is absent, empty or not visible ASCII.
    pub fn from_header_map(headers: &'a HeaderMap) -> Option<Self> {
        let get = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
        };

        Some(Self {
            id: get(SVIX_ID)?,
            timestamp: get(SVIX_TIMESTAMP)?,
            signature: get(SVIX_SIGNATURE)?,
        })
    }
}

/// Verifier bound to one endpoint secret.
#[derive(Clone)]
pub struct Webhook {
    mac: HmacSha256,
    tolerance_secs: i64,
}

impl fmt::Debug for Webhook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Webhook")
            .field("tolerance_secs", &self.tolerance_secs)
            .finish_non_exhaustive()
    }
}

impl Webhook {
    /// Parses a `whsec_`-prefixed (or bare) base64 secret.
    pub fn new(secret: &str) -> Result<Self, SignatureError> {
        let encoded = secret.trim();
        let encoded = encoded.strip_prefix(SECRET_PREFIX).unwrap_or(encoded);
        let key = BASE64_STANDARD
            .decode(encoded)
            .map_err(|_| SignatureError::InvalidSecret)?;

        if key.is_empty() {
            return Err(SignatureError::InvalidSecret);
        }

        let mac = HmacSha256::new_from_slice(&key).map_err(|_| SignatureError::InvalidSecret)?;

        Ok(Self {
            mac,
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        })
    }

    pub fn with_tolerance_secs(mut self, tolerance_secs: i64) -> Self {
        self.tolerance_secs = tolerance_secs;
        self
    }

    /// Produces a `v1,<base64>` signature entry for the given message.
    pub fn sign(&self, msg_id: &str, timestamp: i64, payload: &[u8]) -> String {
        let mac = self.signed_content_mac(msg_id, timestamp, payload);
        format!(
            "{SIGNATURE_VERSION},{}",
            BASE64_STANDARD.encode(mac.finalize().into_bytes())
        )
    }

    /// Verifies `payload` against the headers using the current clock.
    pub fn verify(&self, payload: &[u8], headers: &SvixHeaders<'_>) -> Result<(), SignatureError> {
        self.verify_at(payload, headers, chrono::Utc::now().timestamp())
    }

    pub fn verify_at(
        &self,
        payload: &[u8],
        headers: &SvixHeaders<'_>,
        now: i64,
    ) -> Result<(), SignatureError> {
        let timestamp: i64 = headers
            .timestamp
            .trim()
            .parse()
            .map_err(|_| SignatureError::InvalidTimestamp)?;

        if now.saturating_sub(timestamp) > self.tolerance_secs {
            return Err(SignatureError::TimestampTooOld);
        }
        if timestamp.saturating_sub(now) > self.tolerance_secs {
            return Err(SignatureError::TimestampTooNew);
        }

        let expected = self.signed_content_mac(headers.id, timestamp, payload);

        let matched = headers
            .signature
            .split_whitespace()
            .filter_map(|entry| entry.split_once(','))
            .filter(|(version, _)| *version == SIGNATURE_VERSION)
            .filter_map(|(_, sig)| BASE64_STANDARD.decode(sig).ok())
            .any(|sig| expected.clone().verify_slice(&sig).is_ok());

        if matched {
            Ok(())
        } else {
            Err(SignatureError::NoMatchingSignature)
        }
    }

    fn signed_content_mac(&self, msg_id: &str, timestamp: i64, payload: &[u8]) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(msg_id.as_bytes());
        mac.update(b".");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        mac
    }
}
