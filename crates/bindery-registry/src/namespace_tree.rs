//! Namespace tree - hierarchical storage for rendered attributes.
//!
//! Uses `petgraph::DiGraph` with:
//! - Nodes: `NamespaceData` (the attributes bound at that level)
//! - Edges: `Contains(name)` for hierarchy

use bindery_core::Value;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;

/// Edge type in the namespace graph: parent contains child, the String is
/// the child's simple name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contains(pub String);

/// Data stored in each namespace node.
#[derive(Debug, Default)]
pub struct NamespaceData {
    /// Attributes bound in this namespace by simple name.
    pub attrs: FxHashMap<String, Value>,
}

impl NamespaceData {
    pub fn new() -> Self {
        Self::default()
    }
}

/// The namespace graph.
///
/// Namespaces are created on demand as dotted paths are walked; every node
/// holds a flat attribute map the patcher and the object renderers write
/// into.
pub struct NamespaceTree {
    graph: DiGraph<NamespaceData, Contains>,
    root: NodeIndex,
}

impl Default for NamespaceTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceTree {
    /// Create a new namespace tree with an empty root.
    pub fn new() -> Self {
        let mut graph = DiGraph::new();
        let root = graph.add_node(NamespaceData::new());
        Self { graph, root }
    }

    /// Get the root namespace node index.
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Get a namespace node's data.
    pub fn get_namespace(&self, node: NodeIndex) -> Option<&NamespaceData> {
        self.graph.node_weight(node)
    }

    /// Get a mutable reference to a namespace node's data.
    pub fn get_namespace_mut(&mut self, node: NodeIndex) -> Option<&mut NamespaceData> {
        self.graph.node_weight_mut(node)
    }

    /// Find a child namespace by name.
    pub fn find_child(&self, parent: NodeIndex, name: &str) -> Option<NodeIndex> {
        for edge in self.graph.edges(parent) {
            if edge.weight().0 == name {
                return Some(edge.target());
            }
        }
        None
    }

    /// Get or create a child namespace.
    pub fn get_or_create_child(&mut self, parent: NodeIndex, name: &str) -> NodeIndex {
        if let Some(child) = self.find_child(parent, name) {
            return child;
        }
        let child = self.graph.add_node(NamespaceData::new());
        self.graph
            .add_edge(parent, child, Contains(name.to_string()));
        child
    }

    /// Get or create a namespace path from root.
    pub fn get_or_create_path<S: AsRef<str>>(&mut self, path: &[S]) -> NodeIndex {
        let mut current = self.root;
        for segment in path {
            current = self.get_or_create_child(current, segment.as_ref());
        }
        current
    }

    /// Get an existing namespace by path, or None if it doesn't exist.
    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> Option<NodeIndex> {
        let mut current = self.root;
        for segment in path {
            current = self.find_child(current, segment.as_ref())?;
        }
        Some(current)
    }

    /// Find the parent namespace of a node.
    pub fn find_parent(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .edges_directed(node, Direction::Incoming)
            .next()
            .map(|edge| edge.source())
    }

    /// Get the simple name of a namespace node.
    pub fn get_namespace_name(&self, node: NodeIndex) -> Option<&str> {
        if node == self.root {
            return None;
        }
        self.graph
            .edges_directed(node, Direction::Incoming)
            .next()
            .map(|edge| edge.weight().0.as_str())
    }

    /// Get the full namespace path for a node.
    pub fn get_namespace_path(&self, node: NodeIndex) -> Vec<String> {
        let mut path = Vec::new();
        let mut current = node;

        while current != self.root {
            if let Some(name) = self.get_namespace_name(current) {
                path.push(name.to_string());
            }
            match self.find_parent(current) {
                Some(parent) => current = parent,
                None => break,
            }
        }

        path.reverse();
        path
    }

    /// Get the dotted name string for an attribute in a namespace.
    pub fn qualified_name(&self, ns_node: NodeIndex, simple_name: &str) -> String {
        let path = self.get_namespace_path(ns_node);
        if path.is_empty() {
            simple_name.to_string()
        } else {
            format!("{}.{}", path.join("."), simple_name)
        }
    }

    /// Bind an attribute in a namespace, replacing any previous binding.
    pub fn set_attr(&mut self, node: NodeIndex, name: &str, value: Value) {
        if let Some(data) = self.graph.node_weight_mut(node) {
            data.attrs.insert(name.to_string(), value);
        }
    }

    /// Look up an attribute in a namespace.
    pub fn get_attr(&self, node: NodeIndex, name: &str) -> Option<&Value> {
        self.graph.node_weight(node)?.attrs.get(name)
    }

    /// Every namespace node in the tree, root included.
    pub fn all_namespaces(&self) -> Vec<NodeIndex> {
        self.graph.node_indices().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_namespace_path() {
        let mut tree = NamespaceTree::new();
        let node = tree.get_or_create_path(&["simulation", "thermo"]);

        let path = tree.get_namespace_path(node);
        assert_eq!(path, vec!["simulation", "thermo"]);
    }

    #[test]
    fn find_existing_path() {
        let mut tree = NamespaceTree::new();
        tree.get_or_create_path(&["simulation", "thermo"]);

        assert!(tree.get_path(&["simulation", "thermo"]).is_some());
        assert!(tree.get_path(&["other"]).is_none());
    }

    #[test]
    fn qualified_name_joins_with_dots() {
        let mut tree = NamespaceTree::new();
        let node = tree.get_or_create_path(&["simulation", "thermo"]);
        assert_eq!(
            tree.qualified_name(node, "Model"),
            "simulation.thermo.Model"
        );
        assert_eq!(tree.qualified_name(tree.root(), "Model"), "Model");
    }

    #[test]
    fn attributes_replace_previous_bindings() {
        let mut tree = NamespaceTree::new();
        let node = tree.get_or_create_path(&["pkg"]);

        tree.set_attr(node, "answer", Value::Int(41));
        tree.set_attr(node, "answer", Value::Int(42));
        assert_eq!(tree.get_attr(node, "answer"), Some(&Value::Int(42)));
        assert!(tree.get_attr(node, "missing").is_none());
    }

    #[test]
    fn get_or_create_child_returns_same_node_if_exists() {
        let mut tree = NamespaceTree::new();
        let root = tree.root();

        let a = tree.get_or_create_child(root, "pkg");
        let b = tree.get_or_create_child(root, "pkg");
        assert_eq!(a, b);
    }

    #[test]
    fn find_parent_returns_correct_parent() {
        let mut tree = NamespaceTree::new();
        let pkg = tree.get_or_create_path(&["pkg"]);
        let inner = tree.get_or_create_path(&["pkg", "inner"]);

        assert_eq!(tree.find_parent(inner), Some(pkg));
        assert_eq!(tree.find_parent(pkg), Some(tree.root()));
        assert_eq!(tree.find_parent(tree.root()), None);
    }

    #[test]
    fn empty_path_returns_root() {
        let mut tree = NamespaceTree::new();
        let node = tree.get_or_create_path::<&str>(&[]);
        assert_eq!(node, tree.root());
    }

    #[test]
    fn all_namespaces_includes_root_and_children() {
        let mut tree = NamespaceTree::new();
        tree.get_or_create_path(&["a", "b"]);
        assert_eq!(tree.all_namespaces().len(), 3);
    }
}
