//! Component selection rules applied to metadata a repository resolved.

use super::identity::ModuleComponentId;
use super::metadata::ModuleMetadata;

/// Decides whether a resolved candidate is acceptable.
///
/// A rejected candidate is treated as if the repository had not found it.
pub trait ComponentChooser: Send + Sync {
    fn is_rejected(&self, id: &ModuleComponentId, metadata: &ModuleMetadata) -> bool;
}

/// Accepts every candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl ComponentChooser for AcceptAll {
    fn is_rejected(&self, _id: &ModuleComponentId, _metadata: &ModuleMetadata) -> bool {
        false
    }
}

/// One `group:name:version` pattern. `*` matches any segment value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectRule {
    group: String,
    name: String,
    version: String,
}

impl RejectRule {
    /// Parse a rule. Returns `None` unless there are exactly three non-empty
    /// segments.
    #[must_use]
    pub fn parse(pattern: &str) -> Option<Self> {
        let parts: Vec<&str> = pattern.trim().split(':').collect();
        match parts.as_slice() {
            [group, name, version]
                if !group.is_empty() && !name.is_empty() && !version.is_empty() =>
            {
                Some(Self {
                    group: (*group).to_string(),
                    name: (*name).to_string(),
                    version: (*version).to_string(),
                })
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn matches(&self, id: &ModuleComponentId) -> bool {
        segment_matches(&self.group, &id.group)
            && segment_matches(&self.name, &id.name)
            && segment_matches(&self.version, &id.version)
    }
}

fn segment_matches(pattern: &str, value: &str) -> bool {
    pattern == "*" || pattern == value
}

/// Rejects candidates matching any configured rule.
#[derive(Debug, Clone, Default)]
pub struct RejectRules {
    rules: Vec<RejectRule>,
}

impl RejectRules {
    #[must_use]
    pub fn new(rules: Vec<RejectRule>) -> Self {
        Self { rules }
    }
}

impl ComponentChooser for RejectRules {
    fn is_rejected(&self, id: &ModuleComponentId, _metadata: &ModuleMetadata) -> bool {
        self.rules.iter().any(|rule| rule.matches(id))
    }
}
