//! Keyed message signatures.

use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

/// A keyed signature function with a fixed output length.
///
/// Deterministic and side-effect free. The fixed [`length`](Signature::length)
/// lets callers split signed payloads without a length prefix, and
/// [`name`](Signature::name) doubles as the JWT `alg` field.
pub trait Signature: Send + Sync {
    /// Signs `data`, returning exactly [`length`](Signature::length) bytes.
    fn sign(&self, data: &[u8]) -> Vec<u8>;

    /// The algorithm name (`HS256`, `HS384`, `HS512`).
    fn name(&self) -> &'static str;

    /// The byte length of the signature output.
    fn length(&self) -> usize;
}

/// The SHA-2 family member an [`HmacSignature`] is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaBits {
    /// HMAC-SHA-256, 32-byte output.
    Sha256,
    /// HMAC-SHA-384, 48-byte output.
    Sha384,
    /// HMAC-SHA-512, 64-byte output.
    Sha512,
}

/// An HMAC signature over one of the SHA-2 hashes.
#[derive(Clone)]
pub struct HmacSignature {
    key: Vec<u8>,
    bits: ShaBits,
}

impl HmacSignature {
    /// Creates an HMAC signature with the given key and hash width.
    #[must_use]
    pub fn new(key: impl Into<Vec<u8>>, bits: ShaBits) -> Self {
        Self {
            key: key.into(),
            bits,
        }
    }

    /// An HMAC-SHA-256 signature.
    #[must_use]
    pub fn sha256(key: impl Into<Vec<u8>>) -> Self {
        Self::new(key, ShaBits::Sha256)
    }
}

impl Signature for HmacSignature {
    fn sign(&self, data: &[u8]) -> Vec<u8> {
        match self.bits {
            ShaBits::Sha256 => {
                let mut mac = Hmac::<Sha256>::new_from_slice(&self.key)
                    .expect("HMAC accepts keys of any length");
                mac.update(data);
                mac.finalize().into_bytes().to_vec()
            }
            ShaBits::Sha384 => {
                let mut mac = Hmac::<Sha384>::new_from_slice(&self.key)
                    .expect("HMAC accepts keys of any length");
                mac.update(data);
                mac.finalize().into_bytes().to_vec()
            }
            ShaBits::Sha512 => {
                let mut mac = Hmac::<Sha512>::new_from_slice(&self.key)
                    .expect("HMAC accepts keys of any length");
                mac.update(data);
                mac.finalize().into_bytes().to_vec()
            }
        }
    }

    fn name(&self) -> &'static str {
        match self.bits {
            ShaBits::Sha256 => "HS256",
            ShaBits::Sha384 => "HS384",
            ShaBits::Sha512 => "HS512",
        }
    }

    fn length(&self) -> usize {
        match self.bits {
            ShaBits::Sha256 => 32,
            ShaBits::Sha384 => 48,
            ShaBits::Sha512 => 64,
        }
    }
}

impl std::fmt::Debug for HmacSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Key material stays out of debug output.
        f.debug_struct("HmacSignature")
            .field("bits", &self.bits)
            .finish_non_exhaustive()
    }
}
