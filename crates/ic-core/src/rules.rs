//! Containment rules: which resource types may nest inside which.
//!
//! The core only evaluates rules; it never declares them. Any
//! `Fn(&str, &str) -> bool` works, and [`RuleTable`] covers the common
//! data-driven case of a `parent_type -> [child_type]` table.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub trait ContainmentRules {
    /// Whether a resource of `child_type` may be placed directly inside a
    /// resource of `parent_type`.
    fn can_contain(&self, parent_type: &str, child_type: &str) -> bool;

    /// Whether `child_type` must always live inside some container.
    fn requires_parent(&self, _child_type: &str) -> bool {
        false
    }
}

impl<F> ContainmentRules for F
where
    F: Fn(&str, &str) -> bool,
{
    fn can_contain(&self, parent_type: &str, child_type: &str) -> bool {
        self(parent_type, child_type)
    }
}

/// Table-driven rules, loadable from JSON:
///
/// ```json
/// {
///   "contains": { "aws_vpc": ["aws_subnet"], "aws_subnet": ["aws_instance"] },
///   "requiresParent": ["aws_instance"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleTable {
    #[serde(default)]
    pub contains: BTreeMap<String, BTreeSet<String>>,
    #[serde(default)]
    pub requires_parent: BTreeSet<String>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `parent_type` to contain each of `child_types`.
    pub fn allow(mut self, parent_type: &str, child_types: &[&str]) -> Self {
        let entry = self.contains.entry(parent_type.to_string()).or_default();
        entry.extend(child_types.iter().map(|c| c.to_string()));
        self
    }

    pub fn require_parent(mut self, child_type: &str) -> Self {
        self.requires_parent.insert(child_type.to_string());
        self
    }

    /// Parent types that accept `child_type`, sorted.
    pub fn valid_parent_types(&self, child_type: &str) -> Vec<&str> {
        self.contains
            .iter()
            .filter(|(_, children)| children.contains(child_type))
            .map(|(parent, _)| parent.as_str())
            .collect()
    }

    /// Types that accept at least one child type.
    pub fn container_types(&self) -> impl Iterator<Item = &str> {
        self.contains
            .iter()
            .filter(|(_, children)| !children.is_empty())
            .map(|(parent, _)| parent.as_str())
    }
}

impl ContainmentRules for RuleTable {
    fn can_contain(&self, parent_type: &str, child_type: &str) -> bool {
        self.contains
            .get(parent_type)
            .is_some_and(|children| children.contains(child_type))
    }

    fn requires_parent(&self, child_type: &str) -> bool {
        self.requires_parent.contains(child_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn aws() -> RuleTable {
        RuleTable::new()
            .allow("aws_account", &["aws_vpc", "aws_s3_bucket"])
            .allow("aws_vpc", &["aws_subnet", "aws_security_group"])
            .allow("aws_subnet", &["aws_instance", "aws_db_instance"])
            .allow("aws_autoscaling_group", &["aws_instance"])
            .require_parent("aws_instance")
    }

    #[test]
    fn table_lookup() {
        let rules = aws();
        assert!(rules.can_contain("aws_vpc", "aws_subnet"));
        assert!(rules.can_contain("aws_subnet", "aws_instance"));
        assert!(!rules.can_contain("aws_vpc", "aws_instance"));
        assert!(!rules.can_contain("unknown", "aws_instance"));
        assert!(rules.requires_parent("aws_instance"));
        assert!(!rules.requires_parent("aws_vpc"));
    }

    #[test]
    fn valid_parents_are_sorted() {
        assert_eq!(
            aws().valid_parent_types("aws_instance"),
            vec!["aws_autoscaling_group", "aws_subnet"]
        );
    }

    #[test]
    fn closures_are_rules() {
        let only_self = |p: &str, c: &str| p == c;
        assert!(only_self.can_contain("x", "x"));
        assert!(!only_self.can_contain("x", "y"));
        assert!(!only_self.requires_parent("x"));
    }

    #[test]
    fn table_from_json() {
        let json = r#"{"contains": {"aws_vpc": ["aws_subnet"]}, "requiresParent": ["aws_subnet"]}"#;
        let rules: RuleTable = serde_json::from_str(json).unwrap();
        assert!(rules.can_contain("aws_vpc", "aws_subnet"));
        assert!(rules.requires_parent("aws_subnet"));
        assert_eq!(rules.container_types().collect::<Vec<_>>(), vec!["aws_vpc"]);
    }
}
