//! Structural pattern matching against a subject subtree
//!
//! A pattern node matches a subject node when the type tags are equal,
//! every non-protected pattern property (other than the optional marker)
//! exists on the subject with an equal value, and every non-optional
//! pattern child is present by name. Recursion then descends into the
//! first pattern child that is not an absent optional: only that child's
//! subtree is checked in depth, while the later children have only been
//! presence-checked. External rule definitions rely on this exact
//! behavior, so it is preserved as-is.

use regraft_core::{NodeId, TreeStore};

use crate::def::DefNode;
use crate::markers;

/// Whether `pattern` structurally matches the subtree rooted at `subject`.
/// Read-only: the subject is never mutated.
pub(crate) fn matches_pattern<S: TreeStore>(
    store: &S,
    subject: NodeId,
    pattern: &DefNode,
) -> bool {
    if store.node_type(subject) != pattern.node_type() {
        return false;
    }

    for (name, property) in pattern.properties() {
        if property.is_protected() || name == markers::PROP_OPTIONAL {
            continue;
        }
        match store.property(subject, name) {
            Some(subject_property) if subject_property.value_eq(property) => {}
            _ => return false,
        }
    }

    // every mandatory pattern child must be present before recursing
    for child in pattern.children() {
        if is_optional(child) {
            continue;
        }
        if store.child(subject, child.name()).is_none() {
            return false;
        }
    }

    for child in pattern.children() {
        let subject_child = store.child(subject, child.name());
        if is_optional(child) && subject_child.is_none() {
            continue;
        }
        return match subject_child {
            Some(subject_child) => matches_pattern(store, subject_child, child),
            None => false,
        };
    }

    // leaf pattern
    true
}

fn is_optional(node: &DefNode) -> bool {
    node.property(markers::PROP_OPTIONAL)
        .and_then(|p| p.as_bool())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regraft_core::{Property, Tree, DEFAULT_NODE_TYPE};

    fn subject() -> (Tree, NodeId) {
        let mut tree = Tree::new();
        let root = tree.root();
        let widget = tree.create_child(root, "widget", "cq:Widget");
        tree.set_property(widget, "xtype", Property::string("checkbox"));
        let items = tree.create_child(widget, "items", DEFAULT_NODE_TYPE);
        tree.set_property(items, "kind", Property::string("plain"));
        (tree, widget)
    }

    fn pattern() -> DefNode {
        DefNode::new("p", "cq:Widget").with_property("xtype", Property::string("checkbox"))
    }

    #[test]
    fn test_type_tag_mismatch() {
        let (tree, widget) = subject();
        let p = DefNode::new("p", "cq:Other");
        assert!(!matches_pattern(&tree, widget, &p));
    }

    #[test]
    fn test_property_must_be_equal() {
        let (tree, widget) = subject();
        assert!(matches_pattern(&tree, widget, &pattern()));
        let wrong = DefNode::new("p", "cq:Widget")
            .with_property("xtype", Property::string("datefield"));
        assert!(!matches_pattern(&tree, widget, &wrong));
        let missing = pattern().with_property("other", Property::string("x"));
        assert!(!matches_pattern(&tree, widget, &missing));
    }

    #[test]
    fn test_protected_and_optional_marker_properties_skipped() {
        let (tree, widget) = subject();
        let p = pattern()
            .with_property("system", Property::string("ignored").protect())
            .with_property(markers::PROP_OPTIONAL, Property::bool(true));
        assert!(matches_pattern(&tree, widget, &p));
    }

    #[test]
    fn test_mandatory_child_presence() {
        let (tree, widget) = subject();
        let p = pattern().with_child(DefNode::new("items", DEFAULT_NODE_TYPE));
        assert!(matches_pattern(&tree, widget, &p));
        let p = pattern().with_child(DefNode::new("absent", DEFAULT_NODE_TYPE));
        assert!(!matches_pattern(&tree, widget, &p));
    }

    #[test]
    fn test_optional_child_symmetry() {
        let (tree, widget) = subject();
        let optional_absent = pattern().with_child(
            DefNode::new("absent", DEFAULT_NODE_TYPE)
                .with_property(markers::PROP_OPTIONAL, Property::bool(true)),
        );
        assert!(matches_pattern(&tree, widget, &optional_absent));

        // present optional children are matched in full
        let optional_present_ok = pattern().with_child(
            DefNode::new("items", DEFAULT_NODE_TYPE)
                .with_property(markers::PROP_OPTIONAL, Property::bool(true)),
        );
        assert!(matches_pattern(&tree, widget, &optional_present_ok));
        let optional_present_violated = pattern().with_child(
            DefNode::new("items", DEFAULT_NODE_TYPE)
                .with_property(markers::PROP_OPTIONAL, Property::bool(true))
                .with_property("kind", Property::string("fancy")),
        );
        assert!(!matches_pattern(&tree, widget, &optional_present_violated));
    }

    #[test]
    fn test_optional_marker_false_means_mandatory() {
        let (tree, widget) = subject();
        let p = pattern().with_child(
            DefNode::new("absent", DEFAULT_NODE_TYPE)
                .with_property(markers::PROP_OPTIONAL, Property::bool(false)),
        );
        assert!(!matches_pattern(&tree, widget, &p));
    }

    #[test]
    fn test_recursion_stops_after_first_child() {
        let (mut tree, widget) = subject();
        let extra = tree.create_child(widget, "extra", DEFAULT_NODE_TYPE);
        tree.set_property(extra, "kind", Property::string("plain"));

        // the second child's property constraint is violated on the
        // subject, but only its presence is checked
        let p = pattern()
            .with_child(DefNode::new("items", DEFAULT_NODE_TYPE))
            .with_child(
                DefNode::new("extra", DEFAULT_NODE_TYPE)
                    .with_property("kind", Property::string("fancy")),
            );
        assert!(matches_pattern(&tree, widget, &p));
    }

    #[test]
    fn test_absent_optional_first_child_defers_to_next() {
        let (tree, widget) = subject();
        let p = pattern()
            .with_child(
                DefNode::new("absent", DEFAULT_NODE_TYPE)
                    .with_property(markers::PROP_OPTIONAL, Property::bool(true)),
            )
            .with_child(
                DefNode::new("items", DEFAULT_NODE_TYPE)
                    .with_property("kind", Property::string("plain")),
            );
        assert!(matches_pattern(&tree, widget, &p));

        let violated = pattern()
            .with_child(
                DefNode::new("absent", DEFAULT_NODE_TYPE)
                    .with_property(markers::PROP_OPTIONAL, Property::bool(true)),
            )
            .with_child(
                DefNode::new("items", DEFAULT_NODE_TYPE)
                    .with_property("kind", Property::string("fancy")),
            );
        assert!(!matches_pattern(&tree, widget, &violated));
    }
}
