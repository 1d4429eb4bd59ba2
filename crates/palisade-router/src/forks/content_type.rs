//! Fork by request content type.

use crate::{Fork, RouteTarget};
use http::header::CONTENT_TYPE;
use palisade_core::{Handler, Request, Result};
use std::sync::Arc;

/// Selects its handler when the request `Content-Type` matches one of the
/// configured media types.
///
/// Matching compares the media type essence (parameters after `;` are
/// ignored), case-insensitively. A configured `*/*` accepts anything,
/// including requests without a `Content-Type` at all.
pub struct ContentTypeFork {
    types: Vec<String>,
    handler: Arc<dyn Handler>,
}

impl ContentTypeFork {
    /// A fork accepting the given media types.
    #[must_use]
    pub fn new(
        types: impl IntoIterator<Item = impl Into<String>>,
        target: impl Into<RouteTarget>,
    ) -> Self {
        Self {
            types: types
                .into_iter()
                .map(|t| t.into().to_ascii_lowercase())
                .collect(),
            handler: target.into().into_handler(),
        }
    }

    fn accepts_any(&self) -> bool {
        self.types.iter().any(|t| t == "*/*")
    }
}

impl Fork for ContentTypeFork {
    fn route(&self, request: &Request) -> Result<Option<Arc<dyn Handler>>> {
        let essence = request
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| {
                v.split(';')
                    .next()
                    .unwrap_or("")
                    .trim()
                    .to_ascii_lowercase()
            });
        let matched = match essence {
            Some(essence) => {
                self.accepts_any() || self.types.iter().any(|t| t == &essence)
            }
            None => self.accepts_any(),
        };
        if matched {
            Ok(Some(Arc::clone(&self.handler)))
        } else {
            Ok(None)
        }
    }
}
