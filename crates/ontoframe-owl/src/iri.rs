//! IRIs and vocabulary constants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An absolute IRI, stored as a plain string.
///
/// Equality and hashing are on the full string; `local_name` is only a
/// display convenience and never participates in identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Iri(String);

impl Iri {
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fragment after the last `#` or `/`, or the whole IRI if neither occurs.
    pub fn local_name(&self) -> &str {
        self.0
            .rsplit(['#', '/'])
            .next()
            .unwrap_or(self.0.as_str())
    }

    /// Derive a new IRI by appending a suffix to this one.
    ///
    /// Used for the deterministic non-root individual names inside one
    /// rendered group (`<root>-n3`, `<root>-n4`, ...).
    pub fn with_suffix(&self, suffix: &str) -> Iri {
        Iri(format!("{}{}", self.0, suffix))
    }

    /// Mint an IRI inside a namespace from an externally supplied local name.
    ///
    /// The local name is sanitized to IRI-safe characters so arbitrary store
    /// identities produce valid, stable IRIs.
    pub fn in_namespace(namespace: &str, local: &str) -> Iri {
        let sanitized: String = local
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        if namespace.ends_with('#') || namespace.ends_with('/') {
            Iri(format!("{namespace}{sanitized}"))
        } else {
            Iri(format!("{namespace}#{sanitized}"))
        }
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Iri {
    fn from(value: &str) -> Self {
        Iri::new(value)
    }
}

/// Standard namespace vocabulary used by the renderers.
pub mod vocab {
    /// XML Schema datatypes.
    pub mod xsd {
        pub const NS: &str = "http://www.w3.org/2001/XMLSchema#";

        pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
        pub const LONG: &str = "http://www.w3.org/2001/XMLSchema#long";
        pub const FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";
        pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
        pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
        pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    }

    /// OWL built-ins.
    pub mod owl {
        pub const NS: &str = "http://www.w3.org/2002/07/owl#";

        pub const THING: &str = "http://www.w3.org/2002/07/owl#Thing";
        pub const NOTHING: &str = "http://www.w3.org/2002/07/owl#Nothing";
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_name_strips_hash_and_slash() {
        assert_eq!(Iri::new("http://ex.org/onto#Patient").local_name(), "Patient");
        assert_eq!(Iri::new("http://ex.org/onto/Patient").local_name(), "Patient");
        assert_eq!(Iri::new("Patient").local_name(), "Patient");
    }

    #[test]
    fn namespace_minting_sanitizes_local_names() {
        let iri = Iri::in_namespace("http://ex.org/instances#", "case 12/b");
        assert_eq!(iri.as_str(), "http://ex.org/instances#case_12_b");

        let bare = Iri::in_namespace("http://ex.org/instances", "p1");
        assert_eq!(bare.as_str(), "http://ex.org/instances#p1");
    }
}
