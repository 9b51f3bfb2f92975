//! # Signature Verifier
//!
//! Validates a presented authentication code against a chip's pre-shared
//! secret. The signed message is the tag identifier and the raw counter
//! string joined by a fixed separator; the MAC is HMAC-SHA256.
//!
//! ## Security Notes
//!
//! - Comparison uses `subtle::ConstantTimeEq`; the position of the first
//!   mismatching byte never shapes timing.
//! - Malformed hex in the presented signature fails closed to a non-match
//!   rather than surfacing an error to the scanner.
//! - Secretless chips are only verifiable in the `Development` variant,
//!   selected explicitly at startup. The variant compares the presented
//!   code against a single operator-configured bypass value and MUST NOT
//!   be deployed with real chips.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use shared_types::{ChipSecret, TagId};
use subtle::ConstantTimeEq;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Separator between the tag identifier and the counter in the signed
/// message. Chip firmware signs `"{tag_id}:{counter}"`.
pub const MESSAGE_SEPARATOR: char = ':';

/// Startup-resolved verifier variant.
///
/// The variant is configuration, not a runtime branch: `Production` is the
/// only supported mode for real chips, and `Development` exists solely for
/// unit/dev chips that carry no secret.
#[derive(Debug, Clone)]
pub enum SignatureVerifier {
    /// Chips without a secret always fail verification.
    Production,
    /// Secretless chips compare the presented code against the operator
    /// bypass value. Known design hazard, never a supported production mode.
    Development {
        /// Operator-configured bypass value for secretless chips.
        bypass_code: String,
    },
}

impl SignatureVerifier {
    /// Decide whether `presented_hex` authenticates `counter_raw` for the
    /// chip identified by `tag_id`.
    ///
    /// Returns a plain boolean: a failed signature is an authenticity
    /// outcome, not an error.
    #[must_use]
    pub fn verify(
        &self,
        secret: Option<&ChipSecret>,
        tag_id: &TagId,
        counter_raw: &str,
        presented_hex: &str,
    ) -> bool {
        match (secret, self) {
            (Some(secret), _) => {
                let message = scan_message(tag_id, counter_raw);
                verify_hmac(secret, message.as_bytes(), presented_hex)
            }
            (None, SignatureVerifier::Development { bypass_code }) => {
                warn!(tag = %tag_id, "secretless chip verified via development bypass");
                constant_time_compare(presented_hex, bypass_code)
            }
            (None, SignatureVerifier::Production) => false,
        }
    }
}

/// The message a chip signs for one scan.
fn scan_message(tag_id: &TagId, counter_raw: &str) -> String {
    format!("{}{}{}", tag_id.as_str(), MESSAGE_SEPARATOR, counter_raw)
}

/// Compute the expected hex signature for a scan.
///
/// Used by provisioning tooling and test fixtures; the verification path
/// never exposes computed MACs.
#[must_use]
pub fn compute_signature(secret: &ChipSecret, tag_id: &TagId, counter_raw: &str) -> String {
    let message = scan_message(tag_id, counter_raw);
    match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mut mac) => {
            mac.update(message.as_bytes());
            hex::encode(mac.finalize().into_bytes())
        }
        // HMAC accepts keys of any length; unreachable in practice.
        Err(_) => String::new(),
    }
}

/// HMAC-SHA256 the message and compare against the presented hex code.
fn verify_hmac(secret: &ChipSecret, message: &[u8], presented_hex: &str) -> bool {
    // Lenient about case, closed on malformed hex.
    let Ok(presented) = hex::decode(presented_hex) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(message);
    let computed = mac.finalize().into_bytes();

    // `ct_eq` on slices resolves to false for unequal lengths without
    // revealing where the contents diverge.
    computed.ct_eq(presented.as_slice()).into()
}

/// Constant-time string comparison to prevent timing attacks.
///
/// SECURITY: This function takes the same amount of time regardless of how
/// many characters match, preventing timing side-channel attacks.
///
/// IMPORTANT: We use `subtle::ConstantTimeEq` for proper constant-time comparison.
/// The naive XOR approach can still be optimized by the compiler.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    // Pad shorter string to match length (prevents length oracle)
    // We compare both padded to the MAX of both lengths
    let max_len = std::cmp::max(a.len(), b.len());

    // Create padded versions - pad with different bytes to ensure inequality
    let mut a_padded = vec![0u8; max_len];
    let mut b_padded = vec![0xFFu8; max_len]; // Different pad value ensures mismatch if lengths differ

    a_padded[..a.len()].copy_from_slice(a.as_bytes());
    b_padded[..b.len()].copy_from_slice(b.as_bytes());

    // Use subtle crate for true constant-time comparison
    // AND check that lengths match (also in constant time)
    let lengths_equal = a.len().ct_eq(&b.len());
    let contents_equal = a_padded.ct_eq(&b_padded);

    // Both conditions must be true
    (lengths_equal & contents_equal).into()
}
