//! Node names.

use std::fmt;

use convert_case::{Case, Casing};

use crate::error::{Error, Result};

/// Lowercase ASCII letters, digits and underscores.
fn key_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'
}

/// Is `s` usable as a settings key or node name?
pub fn valid_key(s: &str) -> bool {
    !s.is_empty() && s.chars().all(key_char)
}

/// The snake_case name of a widget type. Settings maps use it as the key for
/// type-specific overrides, e.g. `text_area` for `TextArea`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeName(String);

impl NodeName {
    /// Derive a name from a type name or phrase: snake_case it and drop
    /// anything that is not a key character. Falls back to `node`.
    pub fn convert(name: &str) -> Self {
        let name: String = name
            .to_case(Case::Snake)
            .chars()
            .filter(|c| key_char(*c))
            .collect();
        if name.is_empty() {
            Self("node".into())
        } else {
            Self(name)
        }
    }

    /// Accept a name that is already in key form.
    pub fn parse(name: &str) -> Result<Self> {
        if valid_key(name) {
            Ok(Self(name.into()))
        } else {
            Err(Error::Config(format!("invalid name: {name:?}")))
        }
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for NodeName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys() {
        assert!(valid_key("text_area"));
        assert!(valid_key("h2"));
        assert!(!valid_key(""));
        assert!(!valid_key("Margin"));
        assert!(!valid_key("bar-color"));
    }

    #[test]
    fn names() -> Result<()> {
        assert_eq!(NodeName::parse("panel")?, "panel");
        assert!(NodeName::parse("Panel").is_err());
        assert_eq!(NodeName::convert("TextArea"), "text_area");
        assert_eq!(NodeName::convert("ScrollBar"), "scroll_bar");
        assert_eq!(NodeName::convert("!!!"), "node");
        assert_eq!(NodeName::convert("").to_string(), "node");
        Ok(())
    }
}
