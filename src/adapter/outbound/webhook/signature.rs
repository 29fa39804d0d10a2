//! HMAC-SHA256 payload signing.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::SinkError;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the payload signature.
pub const SIGNATURE_HEADER: &str = "X-Webhook-Signature";

/// Signature header value for `body`: `sha256=<hex hmac>`.
///
/// # Errors
///
/// Returns [`SinkError::Encode`] if the key is rejected by the MAC.
pub fn sign(secret: &str, body: &[u8]) -> Result<String, SinkError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| SinkError::Encode(e.to_string()))?;
    mac.update(body);
    Ok(format!("sha256={}", hex::encode(mac.finalize().into_bytes())))
}

/// Constant-time check of a received signature header against `body`.
#[must_use]
pub fn verify(secret: &str, body: &[u8], header: &str) -> bool {
    let Some(hex_sig) = header.strip_prefix("sha256=") else {
        return false;
    };
    let Ok(expected) = hex::decode(hex_sig) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}
