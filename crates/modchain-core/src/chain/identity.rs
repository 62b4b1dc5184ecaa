//! Component identities.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Coordinates of a published module version.
///
/// Serialized as its `group:name:version` string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleComponentId {
    pub group: String,
    pub name: String,
    pub version: String,
}

impl ModuleComponentId {
    /// Create a module identity from its coordinates.
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for ModuleComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}

impl FromStr for ModuleComponentId {
    type Err = IdentityParseError;

    /// Parse `group:name:version`. Every segment must be non-empty.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        match parts.as_slice() {
            [group, name, version]
                if !group.is_empty() && !name.is_empty() && !version.is_empty() =>
            {
                Ok(Self::new(*group, *name, *version))
            }
            _ => Err(IdentityParseError {
                input: s.to_string(),
            }),
        }
    }
}

impl Serialize for ModuleComponentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ModuleComponentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Identity of anything a build can depend on.
///
/// Only [`ComponentIdentifier::Module`] can be resolved against a repository
/// chain. Project components live in the build itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentIdentifier {
    Module(ModuleComponentId),
    Project(String),
}

impl ComponentIdentifier {
    /// Shorthand for a module identity.
    pub fn module(
        group: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self::Module(ModuleComponentId::new(group, name, version))
    }

    /// Shorthand for a build-local project identity.
    pub fn project(path: impl Into<String>) -> Self {
        Self::Project(path.into())
    }

    /// The module coordinates, if this identity is module-shaped.
    #[must_use]
    pub fn as_module(&self) -> Option<&ModuleComponentId> {
        match self {
            Self::Module(id) => Some(id),
            Self::Project(_) => None,
        }
    }
}

impl From<ModuleComponentId> for ComponentIdentifier {
    fn from(id: ModuleComponentId) -> Self {
        Self::Module(id)
    }
}

impl fmt::Display for ComponentIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module(id) => id.fmt(f),
            Self::Project(path) => write!(f, "project {path}"),
        }
    }
}

impl FromStr for ComponentIdentifier {
    type Err = IdentityParseError;

    /// Parse `group:name:version` or `project <path>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(path) = trimmed.strip_prefix("project ") {
            let path = path.trim();
            if path.is_empty() {
                return Err(IdentityParseError {
                    input: s.to_string(),
                });
            }
            return Ok(Self::Project(path.to_string()));
        }
        trimmed.parse().map(Self::Module)
    }
}

/// A string could not be parsed as a component identity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid component identity '{input}': expected 'group:name:version' or 'project <path>'")]
pub struct IdentityParseError {
    pub input: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_module() {
        let id: ComponentIdentifier = "org.example:lib:1.2.3".parse().unwrap();
        assert_eq!(id, ComponentIdentifier::module("org.example", "lib", "1.2.3"));
        assert_eq!(id.to_string(), "org.example:lib:1.2.3");
    }

    #[test]
    fn test_parse_project() {
        let id: ComponentIdentifier = "project :app".parse().unwrap();
        assert_eq!(id, ComponentIdentifier::project(":app"));
        assert!(id.as_module().is_none());
        assert_eq!(id.to_string(), "project :app");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in ["", "a:b", "a:b:c:d", "a::c", ":b:c", "project ", "project"] {
            assert!(
                input.parse::<ComponentIdentifier>().is_err(),
                "'{input}' should not parse"
            );
        }
    }

    #[test]
    fn test_module_serializes_as_coordinates() {
        let id = ModuleComponentId::new("org.example", "lib", "1.0");
        let value = serde_json::to_value(&id).unwrap();
        assert_eq!(value, serde_json::json!("org.example:lib:1.0"));

        let back: ModuleComponentId = serde_json::from_value(value).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<ModuleComponentId>("\"a:b\"").is_err());
    }

    #[test]
    fn test_module_ordering_is_by_coordinates() {
        let a = ModuleComponentId::new("a", "x", "2");
        let b = ModuleComponentId::new("b", "a", "1");
        assert!(a < b);
    }
}
