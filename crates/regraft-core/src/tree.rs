//! The tree store capability and the in-memory reference implementation

use std::collections::BTreeMap;

use crate::path;
use crate::value::Property;

/// Node type used when no explicit type tag is given.
pub const DEFAULT_NODE_TYPE: &str = "nt:unstructured";

/// Handle to a node inside a [`TreeStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Storage capability the rewrite engine runs against.
///
/// Hosts bring their own hierarchical store; [`Tree`] is the in-memory
/// reference implementation. Named lookups return `None` rather than
/// erroring; callers check existence before access. Handles to removed
/// nodes are invalid and must not be used again.
pub trait TreeStore {
    /// Node name, unique among its siblings.
    fn node_name(&self, node: NodeId) -> &str;

    /// Free-form type tag of the node.
    fn node_type(&self, node: NodeId) -> &str;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Child nodes in order.
    fn children(&self, node: NodeId) -> &[NodeId];

    fn child(&self, node: NodeId, name: &str) -> Option<NodeId>;

    fn property(&self, node: NodeId, name: &str) -> Option<&Property>;

    /// Snapshot of the node's property names.
    fn property_names(&self, node: NodeId) -> Vec<String>;

    /// Append a new child. A taken name is adjusted with a numeric suffix;
    /// the actual name is readable through [`TreeStore::node_name`].
    fn create_child(&mut self, parent: NodeId, name: &str, node_type: &str) -> NodeId;

    fn set_property(&mut self, node: NodeId, name: &str, property: Property);

    fn remove_property(&mut self, node: NodeId, name: &str) -> Option<Property>;

    /// Rename in place, adjusting to a unique sibling name when taken.
    fn rename(&mut self, node: NodeId, new_name: &str);

    /// Move a node to the given index among its siblings.
    fn reorder_child(&mut self, node: NodeId, index: usize);

    /// Deep structural clone of `src` appended under `new_parent`,
    /// independent of the source. Shares the create-child collision policy.
    fn copy_subtree(&mut self, src: NodeId, new_parent: NodeId, name: &str) -> NodeId;

    /// Detach and delete a whole subtree. All handles into it become stale.
    fn remove_subtree(&mut self, node: NodeId);

    /// Property names starting with `prefix`.
    fn property_names_with_prefix(&self, node: NodeId, prefix: &str) -> Vec<String> {
        let mut names = self.property_names(node);
        names.retain(|name| name.starts_with(prefix));
        names
    }

    /// Resolve a dot-relative node path (`./a/b`) against a base node.
    fn resolve_node(&self, base: NodeId, rel_path: &str) -> Option<NodeId>
    where
        Self: Sized,
    {
        path::resolve_node(self, base, rel_path)
    }

    /// Resolve a dot-relative property path (`./a/prop`) against a base
    /// node. The final segment names the property; the property must exist.
    fn resolve_property(&self, base: NodeId, rel_path: &str) -> Option<(NodeId, String)>
    where
        Self: Sized,
    {
        path::resolve_property(self, base, rel_path)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct NodeData {
    name: String,
    node_type: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    properties: BTreeMap<String, Property>,
}

/// In-memory tree: a slab of nodes addressed by [`NodeId`]. Removal
/// tombstones the slot so stale handles fail loudly instead of aliasing.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Vec<Option<NodeData>>,
    root: NodeId,
}

impl Tree {
    pub fn new() -> Self {
        let root = NodeData {
            name: String::new(),
            node_type: DEFAULT_NODE_TYPE.to_string(),
            parent: None,
            children: Vec::new(),
            properties: BTreeMap::new(),
        };
        Tree {
            nodes: vec![Some(root)],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Whether the handle still refers to a live node.
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes
            .get(node.index())
            .is_some_and(|slot| slot.is_some())
    }

    fn data(&self, node: NodeId) -> &NodeData {
        self.nodes[node.index()]
            .as_ref()
            .expect("stale node handle")
    }

    fn data_mut(&mut self, node: NodeId) -> &mut NodeData {
        self.nodes[node.index()]
            .as_mut()
            .expect("stale node handle")
    }

    fn unique_sibling_name(&self, parent: NodeId, want: &str, exclude: Option<NodeId>) -> String {
        let taken = |name: &str| {
            self.data(parent)
                .children
                .iter()
                .any(|&c| Some(c) != exclude && self.data(c).name == name)
        };
        if !taken(want) {
            return want.to_string();
        }
        let mut n = 1;
        loop {
            let candidate = format!("{want}_{n}");
            if !taken(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    fn is_in_subtree(&self, node: NodeId, root: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == root {
                return true;
            }
            current = self.data(n).parent;
        }
        false
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeStore for Tree {
    fn node_name(&self, node: NodeId) -> &str {
        &self.data(node).name
    }

    fn node_type(&self, node: NodeId) -> &str {
        &self.data(node).node_type
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.data(node).parent
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        &self.data(node).children
    }

    fn child(&self, node: NodeId, name: &str) -> Option<NodeId> {
        self.data(node)
            .children
            .iter()
            .copied()
            .find(|&c| self.data(c).name == name)
    }

    fn property(&self, node: NodeId, name: &str) -> Option<&Property> {
        self.data(node).properties.get(name)
    }

    fn property_names(&self, node: NodeId) -> Vec<String> {
        self.data(node).properties.keys().cloned().collect()
    }

    fn create_child(&mut self, parent: NodeId, name: &str, node_type: &str) -> NodeId {
        let name = self.unique_sibling_name(parent, name, None);
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(NodeData {
            name,
            node_type: node_type.to_string(),
            parent: Some(parent),
            children: Vec::new(),
            properties: BTreeMap::new(),
        }));
        self.data_mut(parent).children.push(id);
        id
    }

    fn set_property(&mut self, node: NodeId, name: &str, property: Property) {
        self.data_mut(node).properties.insert(name.to_string(), property);
    }

    fn remove_property(&mut self, node: NodeId, name: &str) -> Option<Property> {
        self.data_mut(node).properties.remove(name)
    }

    fn rename(&mut self, node: NodeId, new_name: &str) {
        let unique = match self.data(node).parent {
            Some(parent) => self.unique_sibling_name(parent, new_name, Some(node)),
            None => new_name.to_string(),
        };
        self.data_mut(node).name = unique;
    }

    fn reorder_child(&mut self, node: NodeId, index: usize) {
        let Some(parent) = self.data(node).parent else {
            return;
        };
        let children = &mut self.data_mut(parent).children;
        children.retain(|&c| c != node);
        let index = index.min(children.len());
        children.insert(index, node);
    }

    fn copy_subtree(&mut self, src: NodeId, new_parent: NodeId, name: &str) -> NodeId {
        assert!(
            !self.is_in_subtree(new_parent, src),
            "cannot copy a subtree into itself"
        );
        let node_type = self.data(src).node_type.clone();
        let properties = self.data(src).properties.clone();
        let copy = self.create_child(new_parent, name, &node_type);
        self.data_mut(copy).properties = properties;
        for child in self.data(src).children.clone() {
            let child_name = self.data(child).name.clone();
            self.copy_subtree(child, copy, &child_name);
        }
        copy
    }

    fn remove_subtree(&mut self, node: NodeId) {
        if let Some(parent) = self.data(node).parent {
            self.data_mut(parent).children.retain(|&c| c != node);
        }
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            if let Some(data) = self.nodes[n.index()].take() {
                stack.extend(data.children);
            }
        }
    }
}
