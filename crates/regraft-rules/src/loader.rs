//! YAML rule definitions
//!
//! Rules can be authored declaratively and loaded at runtime from strings,
//! files, or directories:
//!
//! ```yaml
//! name: checkbox_to_switch
//! ranking: 4
//! patterns:
//!   - name: checkbox
//!     type: cq:Widget
//!     properties:
//!       xtype: checkbox
//! replacement:
//!   properties:
//!     cq:rewriteCommonAttrs: true
//!   children:
//!     - name: switch
//!       type: granite/ui/components/coral/foundation/form/switch
//!       properties:
//!         name: "${./name}"
//!         checked: "${./checked:false}"
//! ```
//!
//! The node-spec form doubles as a convenient way to build fixture trees
//! in tests (see [`node_from_yaml`]).

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use regraft_core::{Property, Value, ValueKind, DEFAULT_NODE_TYPE};

use crate::def::DefNode;
use crate::markers;
use crate::rule::RewriteRule;

/// Errors that can occur when loading rule definitions.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid rule: {0}")]
    Validation(String),
}

/// A complete YAML-defined rewrite rule.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleSpec {
    pub name: String,

    /// Human-readable description, informational only.
    #[serde(default)]
    pub description: String,

    /// Ordering rank; omitted means lowest priority.
    #[serde(default)]
    pub ranking: Option<i64>,

    /// Pattern alternatives; the rule matches if any alternative matches.
    #[serde(default)]
    pub patterns: Vec<NodeSpec>,

    /// Replacement container; absent means the rule cannot be applied.
    #[serde(default)]
    pub replacement: Option<ReplacementSpec>,
}

/// One node of a pattern or template subtree.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeSpec {
    pub name: String,

    #[serde(rename = "type", default = "default_node_type")]
    pub node_type: String,

    #[serde(default)]
    pub properties: BTreeMap<String, PropertySpec>,

    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

fn default_node_type() -> String {
    DEFAULT_NODE_TYPE.to_string()
}

/// Replacement container: marker properties plus at most one template.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplacementSpec {
    #[serde(default)]
    pub properties: BTreeMap<String, PropertySpec>,

    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

/// A scalar or a sequence of scalars.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PropertySpec {
    Single(Value),
    Multi(Vec<Value>),
}

impl PropertySpec {
    fn into_property(self) -> Property {
        match self {
            PropertySpec::Single(value) => Property::single(value),
            PropertySpec::Multi(values) => {
                let kind = values.first().map(Value::kind).unwrap_or(ValueKind::String);
                Property::multi(kind, values)
            }
        }
    }
}

impl NodeSpec {
    pub fn into_def(self) -> DefNode {
        let mut node = DefNode::new(self.name, self.node_type);
        for (name, spec) in self.properties {
            node = node.with_property(name, spec.into_property());
        }
        for child in self.children {
            node = node.with_child(child.into_def());
        }
        node
    }
}

impl RuleSpec {
    /// Validate the rule structure.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("rule name is required".to_string());
        }
        if let Some(replacement) = &self.replacement {
            if replacement.children.len() > 1 {
                return Err(format!(
                    "rule `{}` must define at most one replacement template",
                    self.name
                ));
            }
        }
        Ok(())
    }

    /// Build the definition tree and wrap it as a [`RewriteRule`].
    pub fn into_rule(self) -> RewriteRule {
        let mut def = DefNode::new(self.name, DEFAULT_NODE_TYPE);
        if let Some(ranking) = self.ranking {
            def = def.with_property(markers::PROP_RANKING, Property::long(ranking));
        }

        let mut patterns = DefNode::new(markers::NN_PATTERNS, DEFAULT_NODE_TYPE);
        for pattern in self.patterns {
            patterns = patterns.with_child(pattern.into_def());
        }
        def = def.with_child(patterns);

        if let Some(replacement) = self.replacement {
            let mut container = DefNode::new(markers::NN_REPLACEMENT, DEFAULT_NODE_TYPE);
            for (name, spec) in replacement.properties {
                container = container.with_property(name, spec.into_property());
            }
            for child in replacement.children {
                container = container.with_child(child.into_def());
            }
            def = def.with_child(container);
        }

        RewriteRule::new(def)
    }
}

/// Load rules from a YAML string holding a single rule or a list of rules.
pub fn load_rules_from_string(yaml: &str) -> Result<Vec<RewriteRule>, LoadError> {
    // try a single rule first
    if let Ok(spec) = serde_yaml::from_str::<RuleSpec>(yaml) {
        spec.validate().map_err(LoadError::Validation)?;
        return Ok(vec![spec.into_rule()]);
    }

    let specs: Vec<RuleSpec> = serde_yaml::from_str(yaml)?;
    let mut rules = Vec::with_capacity(specs.len());
    for spec in specs {
        spec.validate().map_err(LoadError::Validation)?;
        rules.push(spec.into_rule());
    }
    Ok(rules)
}

/// Load rules from a YAML file.
pub fn load_rules_from_file(path: &Path) -> Result<Vec<RewriteRule>, LoadError> {
    let content = fs::read_to_string(path)?;
    load_rules_from_string(&content)
}

/// Load all `.yaml`/`.yml` rules under a directory, recursively. Files
/// that fail to load are skipped with a warning.
pub fn load_rules_from_dir(dir: &Path) -> Result<Vec<RewriteRule>, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("directory not found: {}", dir.display()),
        )));
    }
    let mut rules = Vec::new();
    walk_dir(dir, &mut rules)?;
    Ok(rules)
}

fn walk_dir(dir: &Path, rules: &mut Vec<RewriteRule>) -> Result<(), LoadError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk_dir(&path, rules)?;
        } else if let Some(ext) = path.extension() {
            if ext == "yaml" || ext == "yml" {
                match load_rules_from_file(&path) {
                    Ok(loaded) => rules.extend(loaded),
                    Err(err) => {
                        warn!(path = %path.display(), %err, "skipping unloadable rule file");
                    }
                }
            }
        }
    }
    Ok(())
}

/// Parse a single node spec, handy for building fixture subtrees via
/// [`DefNode::instantiate`].
pub fn node_from_yaml(yaml: &str) -> Result<DefNode, LoadError> {
    let spec: NodeSpec = serde_yaml::from_str(yaml)?;
    Ok(spec.into_def())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    const CHECKBOX_RULE: &str = r#"
name: checkbox_to_switch
ranking: 4
patterns:
  - name: checkbox
    type: cq:Widget
    properties:
      xtype: checkbox
replacement:
  properties:
    cq:rewriteFinal: true
  children:
    - name: switch
      type: granite/ui/components/coral/foundation/form/switch
      properties:
        name: "${./name}"
        checked: "${./checked:false}"
"#;

    #[test]
    fn test_load_single_rule() {
        let rules = load_rules_from_string(CHECKBOX_RULE).unwrap();
        assert_eq!(rules.len(), 1);
        let rule = &rules[0];
        assert_eq!(rule.name(), "checkbox_to_switch");
        assert_eq!(rule.ranking(), 4);
        let replacement = rule.definition().child(markers::NN_REPLACEMENT).unwrap();
        assert_eq!(
            replacement.property(markers::PROP_FINAL),
            Some(&Property::bool(true))
        );
        assert_eq!(replacement.children().len(), 1);
    }

    #[test]
    fn test_load_rule_list() {
        let yaml = r#"
- name: rule_one
  patterns:
    - name: a
      type: cq:Widget
  replacement:
    children:
      - name: b
- name: rule_two
  patterns: []
  replacement: {}
"#;
        let rules = load_rules_from_string(yaml).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].name(), "rule_one");
        assert_eq!(rules[1].ranking(), i64::MAX);
    }

    #[test]
    fn test_property_kinds() {
        let yaml = r#"
name: fixture
type: cq:Widget
properties:
  title: Hi
  count: 3
  hidden: false
  pair: [a, b]
"#;
        let def = node_from_yaml(yaml).unwrap();
        assert_eq!(def.property("title"), Some(&Property::string("Hi")));
        assert_eq!(def.property("count"), Some(&Property::long(3)));
        assert_eq!(def.property("hidden"), Some(&Property::bool(false)));
        assert_eq!(def.property("pair"), Some(&Property::strings(["a", "b"])));
    }

    #[test]
    fn test_validation_rejects_empty_name() {
        let yaml = r#"
name: ""
patterns: []
"#;
        assert!(matches!(
            load_rules_from_string(yaml),
            Err(LoadError::Validation(_))
        ));
    }

    #[test]
    fn test_validation_rejects_multiple_templates() {
        let yaml = r#"
name: two_templates
replacement:
  children:
    - name: a
    - name: b
"#;
        assert!(matches!(
            load_rules_from_string(yaml),
            Err(LoadError::Validation(_))
        ));
    }

    #[test]
    fn test_load_from_dir_skips_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("good.yaml"), CHECKBOX_RULE).unwrap();
        let mut bad = fs::File::create(dir.path().join("bad.yaml")).unwrap();
        writeln!(bad, "name: [unterminated").unwrap();
        fs::write(dir.path().join("ignored.txt"), "not yaml").unwrap();

        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("also_good.yml"), CHECKBOX_RULE).unwrap();

        let rules = load_rules_from_dir(dir.path()).unwrap();
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn test_missing_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            load_rules_from_dir(&missing),
            Err(LoadError::Io(_))
        ));
    }
}
