//! Pre-order traversal over a tree store

use crate::tree::{NodeId, TreeStore};

/// Depth-first pre-order enumeration of the subtree rooted at `root`,
/// root first, children in order.
pub fn preorder<S: TreeStore + ?Sized>(store: &S, root: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        out.push(node);
        let mut children = store.children(node).to_vec();
        children.reverse();
        stack.extend(children);
    }
    out
}
