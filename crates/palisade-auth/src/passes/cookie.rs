//! Cookie-backed pass.

use crate::{cookies_of, Codec, Identity, Pass};
use palisade_core::{BoxFuture, Request, Response, Result};
use percent_encoding::{percent_decode_str, percent_encode, NON_ALPHANUMERIC};
use std::time::{Duration, SystemTime};

/// Default cookie lifetime in days.
pub const DEFAULT_COOKIE_DAYS: u64 = 30;

/// Resolves the identity from a named cookie and refreshes it on the way
/// out.
///
/// An absent cookie resolves to anonymous. On exit, an anonymous identity
/// clears the cookie (empty value); any other identity is re-encoded and
/// set with `Path=/`, `HttpOnly` and an `Expires` attribute computed from
/// the configured day count.
///
/// The codec output is raw bytes (a signed codec ends in a binary
/// signature block), so the cookie value is percent-encoded for transport
/// and percent-decoded before the codec sees it again.
pub struct CookiePass<C> {
    codec: C,
    name: String,
    days: u64,
}

impl<C: Codec> CookiePass<C> {
    /// A cookie pass over `codec`, reading and writing the cookie `name`.
    #[must_use]
    pub fn new(codec: C, name: impl Into<String>) -> Self {
        Self {
            codec,
            name: name.into(),
            days: DEFAULT_COOKIE_DAYS,
        }
    }

    /// Sets the cookie lifetime in days.
    #[must_use]
    pub fn with_days(mut self, days: u64) -> Self {
        self.days = days;
        self
    }

    fn expires(&self) -> String {
        let at = SystemTime::now() + Duration::from_secs(self.days * 86_400);
        httpdate::fmt_http_date(at)
    }
}

impl<C: Codec> Pass for CookiePass<C> {
    fn enter<'a>(&'a self, request: &'a Request) -> BoxFuture<'a, Result<Identity>> {
        Box::pin(async move {
            match cookies_of(request).get(&self.name) {
                Some(value) => {
                    let raw: Vec<u8> = percent_decode_str(value).collect();
                    self.codec.decode(&raw)
                }
                None => Ok(Identity::anonymous()),
            }
        })
    }

    fn exit<'a>(
        &'a self,
        response: Response,
        identity: &'a Identity,
    ) -> BoxFuture<'a, Result<Response>> {
        Box::pin(async move {
            let value = if identity.is_anonymous() {
                String::new()
            } else {
                percent_encode(&self.codec.encode(identity), NON_ALPHANUMERIC).to_string()
            };
            let expires = format!("Expires={}", self.expires());
            response.with_cookie(&self.name, &value, &["Path=/", "HttpOnly", &expires])
        })
    }
}
