//! Identity codecs.
//!
//! A [`Codec`] turns an [`Identity`] into an opaque byte string and back.
//! [`PlainCodec`] is the readable percent-encoded form; [`SignedCodec`]
//! wraps any codec with a trailing signature block so tampering is
//! detected without blocking the request. A bad signature decodes to the
//! anonymous identity, not an error, keeping "garbage input" and "not
//! authenticated" distinguishable outcomes.

use crate::{Identity, Signature};
use palisade_core::{Error, Result};
use percent_encoding::{percent_decode, utf8_percent_encode, NON_ALPHANUMERIC};
use std::collections::BTreeMap;

/// Stateless identity ⇄ bytes transformation.
pub trait Codec: Send + Sync {
    /// Encodes an identity to an opaque byte string.
    fn encode(&self, identity: &Identity) -> Vec<u8>;

    /// Decodes an identity back from bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] when the input cannot be parsed at
    /// all. "Valid shape, untrusted content" is not an error; see
    /// [`SignedCodec`].
    fn decode(&self, raw: &[u8]) -> Result<Identity>;
}

/// Percent-encoded plain-text codec.
///
/// Wire format: `percent(urn)` followed by `;key=percent(value)` for each
/// property. Keys are expected to be plain tokens and travel unescaped.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCodec;

impl PlainCodec {
    /// Creates the plain codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Codec for PlainCodec {
    fn encode(&self, identity: &Identity) -> Vec<u8> {
        let mut out = utf8_percent_encode(identity.urn(), NON_ALPHANUMERIC).to_string();
        for (key, value) in identity.properties() {
            out.push(';');
            out.push_str(key);
            out.push('=');
            out.push_str(&utf8_percent_encode(value, NON_ALPHANUMERIC).to_string());
        }
        out.into_bytes()
    }

    fn decode(&self, raw: &[u8]) -> Result<Identity> {
        let text = std::str::from_utf8(raw)
            .map_err(|e| Error::malformed("identity", e.to_string()))?;
        let mut parts = text.split(';');
        let urn = decode_component(parts.next().unwrap_or(""))?;
        let mut properties = BTreeMap::new();
        for part in parts {
            let (key, value) = part.split_once('=').ok_or_else(|| {
                Error::malformed("identity", format!("property without '=': {part:?}"))
            })?;
            properties.insert(key.to_string(), decode_component(value)?);
        }
        let mut identity = Identity::new(urn);
        for (key, value) in properties {
            identity = identity.with_property(key, value);
        }
        Ok(identity)
    }
}

fn decode_component(raw: &str) -> Result<String> {
    percent_decode(raw.as_bytes())
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|e| Error::malformed("identity", e.to_string()))
}

/// A codec protected by a trailing signature block.
///
/// `encode` appends `sign(inner)` to the inner encoding; `decode` splits
/// the fixed-length suffix, re-signs the prefix and only delegates to the
/// inner codec when the two match byte for byte. A mismatch yields the
/// anonymous identity.
#[derive(Debug, Clone)]
pub struct SignedCodec<C, S> {
    origin: C,
    signature: S,
}

impl<C: Codec, S: Signature> SignedCodec<C, S> {
    /// Wraps `origin` with `signature`.
    #[must_use]
    pub const fn new(origin: C, signature: S) -> Self {
        Self { origin, signature }
    }
}

impl<C: Codec, S: Signature> Codec for SignedCodec<C, S> {
    fn encode(&self, identity: &Identity) -> Vec<u8> {
        let mut raw = self.origin.encode(identity);
        let mut sig = self.signature.sign(&raw);
        raw.append(&mut sig);
        raw
    }

    fn decode(&self, raw: &[u8]) -> Result<Identity> {
        let length = self.signature.length();
        if raw.len() < length {
            return Err(Error::malformed(
                "signed identity",
                format!("{} bytes is shorter than the signature block", raw.len()),
            ));
        }
        let (payload, claimed) = raw.split_at(raw.len() - length);
        if claimed == self.signature.sign(payload).as_slice() {
            self.origin.decode(payload)
        } else {
            Ok(Identity::anonymous())
        }
    }
}
