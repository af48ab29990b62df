//! Node-based rewrite rules: matching and substitution
//!
//! A rule definition is itself a small tree:
//!
//! ```text
//! rule
//!   - cq:rewriteRanking = 4
//!   + patterns
//!     + foo        (alternative pattern subtrees)
//!     + foo1
//!   + replacement
//!     - cq:rewriteFinal = true        (markers live on the container)
//!     + bar        (the template substituted for a match)
//! ```
//!
//! `matches` checks the subject against the pattern alternatives;
//! `apply_to` substitutes the template for the subject, resolving mapped
//! properties, common attributes, render conditions, children mappings,
//! and string-rewrite directives along the way.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regraft_core::{preorder, NodeId, Property, TreeStore};
use thiserror::Error;
use tracing::{debug, warn};

use crate::def::DefNode;
use crate::{attrs, expr, markers, matcher, rewrite};

/// Configuration errors surfaced by [`RewriteRule::apply_to`]. Everything
/// else that can go missing mid-application (mapping targets, optional
/// children, render conditions) is skipped, not raised.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("rewrite rule `{0}` does not define a replacement")]
    MissingReplacement(String),

    #[error("cannot rewrite `{0}`: the node has no parent to reattach under")]
    RootSubject(String),
}

/// Result of a successful application.
#[derive(Debug, Clone)]
pub struct RewriteOutcome {
    /// Root of the substituted subtree, occupying the subject's former
    /// name and position; `None` when the subject was erased.
    pub root: Option<NodeId>,
    /// Nodes excluded from further rule processing, in pre-order.
    pub final_nodes: Vec<NodeId>,
}

/// A rewrite rule backed by a pattern/replacement definition tree.
pub struct RewriteRule {
    def: DefNode,
    ranking: OnceLock<i64>,
}

impl RewriteRule {
    pub fn new(def: DefNode) -> Self {
        RewriteRule {
            def,
            ranking: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.def.name()
    }

    pub fn definition(&self) -> &DefNode {
        &self.def
    }

    /// Ordering rank for the host driver; lower ranks apply first.
    /// Read lazily from the rule root and cached. Rules without a ranking
    /// sort last; an unreadable ranking property is recoverable and falls
    /// back to the default.
    pub fn ranking(&self) -> i64 {
        *self.ranking.get_or_init(|| {
            match self.def.property(markers::PROP_RANKING) {
                None => i64::MAX,
                Some(property) => match property.as_long() {
                    Some(ranking) => ranking,
                    None => {
                        warn!(
                            rule = self.def.name(),
                            property = markers::PROP_RANKING,
                            "unreadable ranking property, using default"
                        );
                        i64::MAX
                    }
                },
            }
        })
    }

    /// Whether any pattern alternative matches the subtree rooted at
    /// `subject`. Read-only and deterministic; a rule without patterns
    /// matches nothing.
    pub fn matches<S: TreeStore>(&self, store: &S, subject: NodeId) -> bool {
        let Some(patterns) = self.def.child(markers::NN_PATTERNS) else {
            return false;
        };
        patterns
            .children()
            .iter()
            .any(|pattern| matcher::matches_pattern(store, subject, pattern))
    }

    /// Substitute the replacement template for the subject subtree.
    ///
    /// The subject is renamed aside, the template is instantiated under
    /// the subject's former parent, name, and position, and the original
    /// is deleted only as the final step. The caller must have
    /// established a match; concurrent mutation of the same tree is the
    /// host's problem, not handled here.
    pub fn apply_to<S: TreeStore>(
        &self,
        store: &mut S,
        subject: NodeId,
    ) -> Result<RewriteOutcome, RewriteError> {
        let Some(replacement) = self.def.child(markers::NN_REPLACEMENT) else {
            return Err(RewriteError::MissingReplacement(self.def.name().to_string()));
        };

        // an empty replacement erases the subject
        if replacement.children().is_empty() {
            store.remove_subtree(subject);
            return Ok(RewriteOutcome {
                root: None,
                final_nodes: Vec::new(),
            });
        }

        let tree_is_final = replacement
            .property(markers::PROP_FINAL)
            .and_then(|p| p.as_bool())
            .unwrap_or(false);

        let Some(parent) = store.parent(subject) else {
            return Err(RewriteError::RootSubject(
                store.node_name(subject).to_string(),
            ));
        };
        let subject_name = store.node_name(subject).to_string();
        let position = store
            .children(parent)
            .iter()
            .position(|&child| child == subject);

        debug!(rule = self.def.name(), subject = %subject_name, "applying replacement template");

        // three-phase protocol: detach the subject, build up the copy,
        // delete the original last
        store.rename(subject, &format!("{subject_name}_tmp"));

        let template = &replacement.children()[0];
        let copy = template.instantiate(store, parent, &subject_name);
        if let Some(position) = position {
            store.reorder_child(copy, position);
        }

        if replacement.property(markers::PROP_COMMON_ATTRS).is_some() {
            attrs::add_common_attr_mappings(store, subject, copy);
        }

        if replacement.property(markers::PROP_RENDER_CONDITION).is_some() {
            self.copy_render_condition(store, subject, copy);
        }

        // main pass over the copy: consume markers, resolve mapped
        // properties, chain rewrite directives
        let mut child_mappings: BTreeMap<String, NodeId> = BTreeMap::new();
        let mut final_nodes: Vec<NodeId> = Vec::new();
        let mut stack = vec![copy];
        while let Some(node) = stack.pop() {
            let directives = store.child(node, markers::NN_REWRITE_PROPERTIES);

            for name in store.property_names(node) {
                let Some(property) = store.property(node, &name) else {
                    continue;
                };
                if property.is_protected() {
                    continue;
                }
                if name == markers::PROP_MAP_CHILDREN {
                    if let Some(path) = property.as_str() {
                        // keyed by source path: a later node mapping the
                        // same path wins
                        child_mappings.insert(path.to_string(), node);
                    }
                    store.remove_property(node, &name);
                    continue;
                }
                if name == markers::PROP_FINAL {
                    if !tree_is_final {
                        final_nodes.push(node);
                    }
                    store.remove_property(node, &name);
                    continue;
                }
                if expr::map_property(store, subject, node, &name).is_some() {
                    if let Some(directives) = directives {
                        if let Some(directive) = store.property(directives, &name).cloned() {
                            rewrite::rewrite_property(store, node, &name, &directive);
                        }
                    }
                }
            }

            // drop the directives holder before descending so its own
            // properties are never treated as mapped
            if let Some(directives) = directives {
                store.remove_subtree(directives);
            }

            let mut children = store.children(node).to_vec();
            children.reverse();
            stack.extend(children);
        }

        for (path, destination) in &child_mappings {
            let Some(source) = store.resolve_node(subject, path) else {
                continue;
            };
            for child in store.children(source).to_vec() {
                let child_name = store.node_name(child).to_string();
                store.copy_subtree(child, *destination, &child_name);
            }
        }

        if tree_is_final {
            final_nodes = preorder(store, copy);
        }

        store.remove_subtree(subject);
        Ok(RewriteOutcome {
            root: Some(copy),
            final_nodes,
        })
    }

    /// Carry over a render-condition child of the subject under the
    /// canonical name, upgrading legacy resource types in the copied
    /// subtree.
    fn copy_render_condition<S: TreeStore>(&self, store: &mut S, subject: NodeId, copy: NodeId) {
        let source = store
            .child(subject, markers::NN_GRANITE_RENDER_CONDITION)
            .or_else(|| store.child(subject, markers::NN_RENDER_CONDITION));
        let Some(source) = source else {
            return;
        };
        let condition = store.copy_subtree(source, copy, markers::NN_GRANITE_RENDER_CONDITION);
        for node in preorder(store, condition) {
            let resource_type = store
                .property(node, markers::PROP_RESOURCE_TYPE)
                .and_then(|p| p.as_str())
                .map(str::to_string);
            let Some(resource_type) = resource_type else {
                continue;
            };
            if let Some(rest) = resource_type.strip_prefix(markers::RENDER_CONDITION_CORAL2_PREFIX)
            {
                let upgraded = format!("{}{rest}", markers::RENDER_CONDITION_CORAL3_PREFIX);
                store.set_property(node, markers::PROP_RESOURCE_TYPE, Property::string(upgraded));
            }
        }
    }
}
