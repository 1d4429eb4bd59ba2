//! Fork by query parameter.

use crate::{Fork, RouteTarget};
use palisade_core::{Error, Handler, Request, Result};
use regex::Regex;
use std::sync::Arc;

/// Selects its handler when a query parameter's value matches a pattern.
///
/// Every occurrence of the parameter is tried; one matching value is
/// enough.
pub struct ParamFork {
    param: String,
    pattern: Regex,
    handler: Arc<dyn Handler>,
}

impl ParamFork {
    /// A fork matching `pattern` against values of the `param` query key.
    #[must_use]
    pub fn new(
        param: impl Into<String>,
        pattern: Regex,
        target: impl Into<RouteTarget>,
    ) -> Self {
        Self {
            param: param.into(),
            pattern,
            handler: target.into().into_handler(),
        }
    }
}

impl Fork for ParamFork {
    fn route(&self, request: &Request) -> Result<Option<Arc<dyn Handler>>> {
        let Some(query) = request.uri().query() else {
            return Ok(None);
        };
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)
            .map_err(|e| Error::malformed("query string", e.to_string()))?;
        let matched = pairs.iter().any(|(key, value)| {
            key == &self.param
                && self.pattern.find(value).is_some_and(|m| m.start() == 0)
        });
        if matched {
            Ok(Some(Arc::clone(&self.handler)))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, Uri};

    #[test]
    fn matches_a_parameter_value() {
        let fork = ParamFork::new("format", Regex::new("json").unwrap(), "ok");
        let hit = Request::new(Method::GET, Uri::from_static("/list?format=json&page=2"));
        let miss = Request::new(Method::GET, Uri::from_static("/list?format=xml"));
        let absent = Request::new(Method::GET, Uri::from_static("/list"));
        assert!(fork.route(&hit).unwrap().is_some());
        assert!(fork.route(&miss).unwrap().is_none());
        assert!(fork.route(&absent).unwrap().is_none());
    }

    #[test]
    fn any_occurrence_may_match() {
        let fork = ParamFork::new("tag", Regex::new("^b$").unwrap(), "ok");
        let request = Request::new(Method::GET, Uri::from_static("/list?tag=a&tag=b"));
        assert!(fork.route(&request).unwrap().is_some());
    }
}
