//! Newtype wrappers for enhanced type safety

use crate::errors::{Error, Result, Validate};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt::{self, Display};
use std::ops::Deref;
use std::str::FromStr;

/// A validated resource name: never empty, no surrounding whitespace.
///
/// Names are the keys under which acquired handles are exposed to a unit of
/// work, so two resources in one group must never share a name. A name is
/// never rewritten; one that would need trimming is rejected so the key a
/// caller looks up is always the name they gave.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceName(String);

impl ResourceName {
    /// Create a new ResourceName with validation
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        Validate::not_empty(&name, "resource_name")?;
        let name = Validate::with_predicate(
            name,
            |n| n.trim() == n,
            "resource_name",
            "must not start or end with whitespace",
        )?;
        let name = Validate::with_predicate(
            name,
            |n| !n.chars().any(char::is_control),
            "resource_name",
            "must not contain control characters",
        )?;
        Ok(ResourceName(name))
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to String
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Deref for ResourceName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for ResourceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ResourceName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl FromStr for ResourceName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<&str> for ResourceName {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for ResourceName {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::new(s)
    }
}

impl From<ResourceName> for String {
    fn from(name: ResourceName) -> Self {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_resource_name_is_kept_verbatim() {
        let name = ResourceName::new("Main DB").unwrap();
        assert_eq!(name.as_str(), "Main DB");
        assert_eq!(name.to_string(), "Main DB");
    }

    #[test]
    fn test_resource_name_rejects_surrounding_whitespace() {
        let err = ResourceName::new(" db ").unwrap_err();
        assert!(err.to_string().contains("whitespace"));
        assert!(ResourceName::new("cache\t").is_err());
    }

    #[test]
    fn test_resource_name_rejects_empty() {
        assert!(ResourceName::new("").is_err());
        assert!(ResourceName::new("   ").is_err());
        assert!(ResourceName::new("db\n2").is_err());
    }

    #[test]
    fn test_resource_name_serde_validates() {
        let name: ResourceName = serde_json::from_str("\"MainDB\"").unwrap();
        assert_eq!(&*name, "MainDB");
        assert!(serde_json::from_str::<ResourceName>("\"\"").is_err());
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"MainDB\"");
    }

    proptest! {
        #[test]
        fn prop_valid_names_roundtrip_through_from_str(s in "[A-Za-z0-9_.-]{1,32}") {
            let name: ResourceName = s.parse().unwrap();
            prop_assert_eq!(name.as_str(), s.as_str());
        }
    }
}
