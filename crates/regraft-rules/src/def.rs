//! Definition trees for rule patterns and replacement templates
//!
//! A [`DefNode`] is a plain owned tree (name, type tag, ordered properties,
//! ordered children) describing a pattern or replacement subtree. Keeping
//! definitions decoupled from the live store keeps matching free of store
//! concerns and makes rules cheap to construct in tests and loaders.

use regraft_core::{NodeId, Property, TreeStore};

/// One node of a pattern or replacement definition tree.
#[derive(Debug, Clone, PartialEq)]
pub struct DefNode {
    name: String,
    node_type: String,
    properties: Vec<(String, Property)>,
    children: Vec<DefNode>,
}

impl DefNode {
    pub fn new(name: impl Into<String>, node_type: impl Into<String>) -> Self {
        DefNode {
            name: name.into(),
            node_type: node_type.into(),
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add or replace a property, builder style.
    pub fn with_property(mut self, name: impl Into<String>, property: Property) -> Self {
        let name = name.into();
        match self.properties.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = property,
            None => self.properties.push((name, property)),
        }
        self
    }

    /// Append a child, builder style. Child names are expected to be
    /// unique; the last child of a repeated name wins on lookup by name.
    pub fn with_child(mut self, child: DefNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &Property)> {
        self.properties.iter().map(|(n, p)| (n.as_str(), p))
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p)
    }

    pub fn children(&self) -> &[DefNode] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&DefNode> {
        self.children.iter().rev().find(|c| c.name == name)
    }

    /// Materialize this definition subtree into a store under `parent`,
    /// with the root taking `name` instead of its defined name.
    pub fn instantiate<S: TreeStore>(&self, store: &mut S, parent: NodeId, name: &str) -> NodeId {
        let node = store.create_child(parent, name, &self.node_type);
        for (prop_name, property) in &self.properties {
            store.set_property(node, prop_name, property.clone());
        }
        for child in &self.children {
            child.instantiate(store, node, &child.name);
        }
        node
    }
}
