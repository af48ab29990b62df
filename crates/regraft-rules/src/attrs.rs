//! Common-attribute and data-property mappings
//!
//! When a replacement container carries the common-attributes marker, the
//! copy root receives `granite:`-prefixed equivalents of the subject's
//! common UI attributes, resolved immediately through the expression
//! evaluator, and the subject's `data-*` properties land on a
//! `granite:data` child with the prefix stripped.

use regraft_core::{NodeId, Property, TreeStore, DEFAULT_NODE_TYPE};

use crate::expr;
use crate::markers;

/// Synthesize and resolve common-attribute mappings from `subject` onto
/// the copy root.
pub(crate) fn add_common_attr_mappings<S: TreeStore>(
    store: &mut S,
    subject: NodeId,
    copy: NodeId,
) {
    for attr in markers::COMMON_ATTRIBUTES {
        let name = format!("granite:{attr}");
        // prefer the plain attribute, fall back to an already-namespaced one
        let expressions = Property::strings([
            format!("${{./{attr}}}"),
            format!("${{'./granite:{attr}'}}"),
        ]);
        store.set_property(copy, &name, expressions);
        expr::map_property(store, subject, copy, &name);
    }

    // the subject may already carry a data holder; bring it over first
    if let Some(data) = store.child(subject, markers::NN_GRANITE_DATA) {
        store.copy_subtree(data, copy, markers::NN_GRANITE_DATA);
    }

    for name in store.property_names_with_prefix(subject, markers::DATA_PREFIX) {
        if store
            .property(subject, &name)
            .is_some_and(|p| p.is_protected())
        {
            continue;
        }
        let data = match store.child(copy, markers::NN_GRANITE_DATA) {
            Some(node) => node,
            None => store.create_child(copy, markers::NN_GRANITE_DATA, DEFAULT_NODE_TYPE),
        };
        let stripped = &name[markers::DATA_PREFIX.len()..];
        store.set_property(data, stripped, Property::string(format!("${{./{name}}}")));
        expr::map_property(store, subject, data, stripped);
    }
}
