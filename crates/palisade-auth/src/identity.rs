//! Resolved principal for a request.

use std::collections::BTreeMap;
use std::fmt;

/// The principal resolved for a request: a URN plus free-form properties.
///
/// An identity with an empty URN and no properties is *anonymous* and
/// represents "no authenticated principal". Equality to the anonymous
/// identity is the sole test for "unauthenticated"; authentication
/// strategies that fail softly resolve to it rather than erroring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    urn: String,
    properties: BTreeMap<String, String>,
}

impl Identity {
    /// Creates an identity for `urn` with no properties.
    #[must_use]
    pub fn new(urn: impl Into<String>) -> Self {
        Self {
            urn: urn.into(),
            properties: BTreeMap::new(),
        }
    }

    /// The anonymous identity.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Returns a new identity with `key` set to `value`.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Whether this is the anonymous identity.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.urn.is_empty() && self.properties.is_empty()
    }

    /// The identity URN.
    #[must_use]
    pub fn urn(&self) -> &str {
        &self.urn
    }

    /// All properties, in stable key order.
    #[must_use]
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// A single property value.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_anonymous() {
            f.write_str("anonymous")
        } else {
            f.write_str(&self.urn)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_has_empty_urn_and_properties() {
        let idt = Identity::anonymous();
        assert!(idt.is_anonymous());
        assert_eq!(idt.urn(), "");
        assert!(idt.properties().is_empty());
    }

    #[test]
    fn equality_is_structural() {
        let a = Identity::new("urn:users:alice").with_property("role", "admin");
        let b = Identity::new("urn:users:alice").with_property("role", "admin");
        let c = Identity::new("urn:users:alice");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn identified_is_not_anonymous() {
        assert!(!Identity::new("urn:users:bob").is_anonymous());
    }

    #[test]
    fn display_names_the_principal() {
        assert_eq!(Identity::anonymous().to_string(), "anonymous");
        assert_eq!(Identity::new("urn:users:bob").to_string(), "urn:users:bob");
    }
}
