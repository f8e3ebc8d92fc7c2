//! GitHub webhook signature verification.
//!
//! GitHub signs each delivery with HMAC-SHA256 over the raw request body and
//! sends the hex digest in `X-Hub-Signature-256` as `sha256=<hex>`.
//! Reference: https://docs.github.com/en/webhooks/using-webhooks/validating-webhook-deliveries
//!
//! Verification must run on the exact bytes received, before any JSON parsing.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Prefix GitHub puts in front of the hex digest.
pub const SIGNATURE_PREFIX: &str = "sha256=";

/// Verify a GitHub webhook signature.
///
/// # Arguments
///
/// * `body` - The raw, unparsed request body
/// * `signature_header` - The `X-Hub-Signature-256` header value, if sent
/// * `secret` - The shared webhook secret, if configured
///
/// # Returns
///
/// `true` only if both the header and secret are present and the digest
/// matches. Malformed headers (non-hex, wrong length) are `false`.
pub fn verify_signature(body: &[u8], signature_header: Option<&str>, secret: Option<&str>) -> bool {
    let (signature, secret) = match (signature_header, secret) {
        (Some(sig), Some(secret)) => (sig, secret),
        _ => {
            warn!(
                has_signature = signature_header.is_some(),
                has_secret = secret.is_some(),
                "github_signature_missing_fields"
            );
            return false;
        }
    };

    let hex_digest = signature.strip_prefix(SIGNATURE_PREFIX).unwrap_or(signature);

    let provided = match hex::decode(hex_digest) {
        Ok(bytes) => bytes,
        Err(_) => {
            warn!(signature_length = signature.len(), "github_signature_not_hex");
            return false;
        }
    };

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            warn!("github_signature_invalid_key");
            return false;
        }
    };

    mac.update(body);

    // verify_slice compares in constant time and rejects length mismatches
    let valid = mac.verify_slice(&provided).is_ok();

    if !valid {
        warn!(
            provided_length = provided.len(),
            body_length = body.len(),
            "github_signature_mismatch"
        );
    }

    valid
}

/// Check if signature verification is enabled.
pub fn is_signature_verification_enabled(secret: &Option<String>) -> bool {
    secret
        .as_ref()
        .map(|k| !k.trim().is_empty())
        .unwrap_or(false)
}

/// Compute the header value GitHub would send for `body`.
#[cfg(test)]
pub(crate) fn sign(body: &[u8], secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(body);
    format!("{}{}", SIGNATURE_PREFIX, hex::encode(mac.finalize().into_bytes()))
}
