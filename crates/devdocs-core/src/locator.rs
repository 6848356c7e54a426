//! Entry locators: a document path with an optional `#fragment`.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Path within a docset, optionally narrowed to one section.
///
/// Parsing splits on the first `#`; everything after it, including further
/// `#` characters, is the fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryLocator {
    /// Document path.
    pub path: String,
    /// Section identifier; empty when absent.
    #[serde(default)]
    pub fragment: String,
}

impl EntryLocator {
    /// Split `raw` on its first `#`. Never fails.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('#') {
            Some((path, fragment)) => Self {
                path: path.to_string(),
                fragment: fragment.to_string(),
            },
            None => Self {
                path: raw.to_string(),
                fragment: String::new(),
            },
        }
    }

    /// Whether a non-empty fragment is present.
    #[must_use]
    pub fn has_fragment(&self) -> bool {
        !self.fragment.is_empty()
    }

    /// Same locator with `/index` appended to the path.
    #[must_use]
    pub fn with_index_suffix(&self) -> Self {
        Self {
            path: format!("{}/index", self.path),
            fragment: self.fragment.clone(),
        }
    }

    /// Same path, different fragment.
    #[must_use]
    pub fn with_fragment(&self, fragment: impl Into<String>) -> Self {
        Self {
            path: self.path.clone(),
            fragment: fragment.into(),
        }
    }
}

impl FromStr for EntryLocator {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for EntryLocator {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl fmt::Display for EntryLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_fragment() {
            write!(f, "{}#{}", self.path, self.fragment)
        } else {
            f.write_str(&self.path)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_without_fragment() {
        let loc = EntryLocator::parse("net/http/index");
        assert_eq!(loc.path, "net/http/index");
        assert_eq!(loc.fragment, "");
        assert!(!loc.has_fragment());
        assert_eq!(loc.to_string(), "net/http/index");
    }

    #[test]
    fn test_parse_splits_on_first_hash() {
        let loc = EntryLocator::parse("doc#a#b");
        assert_eq!(loc.path, "doc");
        assert_eq!(loc.fragment, "a#b");
        assert_eq!(loc.to_string(), "doc#a#b");
    }

    #[test]
    fn test_trailing_hash_has_no_fragment() {
        let loc = EntryLocator::parse("doc#");
        assert_eq!(loc.path, "doc");
        assert!(!loc.has_fragment());
        assert_eq!(loc.to_string(), "doc");
    }

    #[test]
    fn test_index_suffix_keeps_fragment() {
        let loc = EntryLocator::parse("array#length").with_index_suffix();
        assert_eq!(loc.path, "array/index");
        assert_eq!(loc.to_string(), "array/index#length");
    }

    #[test]
    fn test_serde_shape() {
        let loc = EntryLocator::parse("doc#beta");
        let json = serde_json::to_value(&loc).unwrap();
        assert_eq!(json, serde_json::json!({"path": "doc", "fragment": "beta"}));

        let back: EntryLocator = serde_json::from_value(serde_json::json!({"path": "x"})).unwrap();
        assert_eq!(back, EntryLocator::parse("x"));
    }

    proptest! {
        #[test]
        fn prop_display_inverts_parse(path in "[^#]{0,20}", fragment in "[^#]{1,20}") {
            let raw = format!("{path}#{fragment}");
            let loc: EntryLocator = raw.parse().unwrap();
            prop_assert_eq!(loc.to_string(), raw);
        }
    }
}
