//! Dot-relative path resolution (`./some/child/prop`)
//!
//! Paths are relative to a base node and walk downward only. A leading
//! `./` is optional. Empty, absolute, and `.`/`..` segments are rejected.

use crate::tree::{NodeId, TreeStore};

fn segments(rel_path: &str) -> Option<Vec<&str>> {
    let rel = rel_path.strip_prefix("./").unwrap_or(rel_path);
    if rel.is_empty() || rel.starts_with('/') {
        return None;
    }
    let segments: Vec<&str> = rel.split('/').collect();
    if segments
        .iter()
        .any(|s| s.is_empty() || *s == "." || *s == "..")
    {
        return None;
    }
    Some(segments)
}

pub(crate) fn resolve_node<S: TreeStore + ?Sized>(
    store: &S,
    base: NodeId,
    rel_path: &str,
) -> Option<NodeId> {
    let mut node = base;
    for segment in segments(rel_path)? {
        node = store.child(node, segment)?;
    }
    Some(node)
}

pub(crate) fn resolve_property<S: TreeStore + ?Sized>(
    store: &S,
    base: NodeId,
    rel_path: &str,
) -> Option<(NodeId, String)> {
    let mut segments = segments(rel_path)?;
    let name = segments.pop()?;
    let mut node = base;
    for segment in segments {
        node = store.child(node, segment)?;
    }
    store.property(node, name)?;
    Some((node, name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Tree, DEFAULT_NODE_TYPE};
    use crate::value::Property;

    #[test]
    fn test_malformed_paths() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = tree.create_child(root, "a", DEFAULT_NODE_TYPE);
        tree.set_property(a, "p", Property::string("v"));
        for path in ["", "./", "/a", "a//p", "../a", "./a/./p"] {
            assert!(resolve_property(&tree, root, path).is_none(), "{path:?}");
        }
    }

    #[test]
    fn test_property_with_colon_in_name() {
        let mut tree = Tree::new();
        let root = tree.root();
        tree.set_property(root, "granite:id", Property::string("v"));
        let (node, name) = resolve_property(&tree, root, "./granite:id").unwrap();
        assert_eq!(node, root);
        assert_eq!(name, "granite:id");
    }
}
