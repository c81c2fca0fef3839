//! Phylogenetic tree topology.
//!
//! Trees are represented with the arena pattern: all nodes live in a
//! contiguous vector and reference each other by [`NodeIndex`]. Node
//! names are stable and unique; they are the keys that tie the topology
//! to externally supplied per-site codon maps and to every map the
//! engine produces.
//!
//! The topology carries no per-site state. Substitution records for a
//! site pass live in a separate name-keyed map (see [`crate::labeler`]),
//! so several site passes can share one tree without mutating it.

use std::collections::HashMap;

use thiserror::Error;

/// Index of a node in a tree arena.
pub type NodeIndex = usize;

/// Errors that can occur while building or querying a tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Node name '{0}' is already present in the tree")]
    DuplicateName(String),

    #[error("Unknown node index {0}")]
    UnknownNode(NodeIndex),
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;

/// A single tree node: stable name plus parent/children links.
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    parent: Option<NodeIndex>,
    children: Vec<NodeIndex>,
}

impl Node {
    /// The node's stable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index of the parent, `None` for the root.
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    /// Indices of the children, in insertion order.
    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    /// True if the node has at least one child.
    pub fn is_internal(&self) -> bool {
        !self.children.is_empty()
    }
}

/// A rooted tree with uniquely named nodes, stored as an arena.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    index_by_name: HashMap<String, NodeIndex>,
}

impl Tree {
    /// Creates a tree containing only the root node.
    pub fn new(root_name: impl Into<String>) -> Self {
        let root_name = root_name.into();
        let mut index_by_name = HashMap::new();
        index_by_name.insert(root_name.clone(), 0);

        Self {
            nodes: vec![Node {
                name: root_name,
                parent: None,
                children: Vec::new(),
            }],
            index_by_name,
        }
    }

    /// Adds a child under `parent` and returns its index.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownNode`] if `parent` is out of range and
    /// [`TreeError::DuplicateName`] if the name is already taken; node
    /// names key every downstream map, so they must stay unique.
    pub fn add_child(
        &mut self,
        parent: NodeIndex,
        name: impl Into<String>,
    ) -> TreeResult<NodeIndex> {
        if parent >= self.nodes.len() {
            return Err(TreeError::UnknownNode(parent));
        }

        let name = name.into();
        if self.index_by_name.contains_key(&name) {
            return Err(TreeError::DuplicateName(name));
        }

        let index = self.nodes.len();
        self.index_by_name.insert(name.clone(), index);
        self.nodes.push(Node {
            name,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(index);

        Ok(index)
    }

    /// Index of the root node.
    pub fn root(&self) -> NodeIndex {
        0
    }

    /// The node at `index`.
    pub fn node(&self, index: NodeIndex) -> TreeResult<&Node> {
        self.nodes.get(index).ok_or(TreeError::UnknownNode(index))
    }

    /// Looks up a node index by name.
    pub fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.index_by_name.get(name).copied()
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the tree holds only the root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Returns an iterator over the tree in pre-order (parents before
    /// children), so a node's parent is always visited before the node.
    pub fn preorder(&self) -> PreOrderIter<'_> {
        PreOrderIter {
            tree: self,
            stack: vec![self.root()],
        }
    }
}

/// Iterator for pre-order traversal (parents before children).
///
/// Stack-based, no recursion. Children are pushed in reverse so they are
/// visited in insertion order.
pub struct PreOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<NodeIndex>,
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = (NodeIndex, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let node = &self.tree.nodes[index];

        for &child in node.children.iter().rev() {
            self.stack.push(child);
        }

        Some((index, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Tree {
        // root -> (inner -> (a, b), c)
        let mut tree = Tree::new("root");
        let inner = tree.add_child(tree.root(), "inner").unwrap();
        tree.add_child(inner, "a").unwrap();
        tree.add_child(inner, "b").unwrap();
        tree.add_child(tree.root(), "c").unwrap();
        tree
    }

    #[test]
    fn test_preorder_visits_parents_first() {
        let tree = sample_tree();
        let names: Vec<&str> = tree.preorder().map(|(_, n)| n.name()).collect();
        assert_eq!(names, vec!["root", "inner", "a", "b", "c"]);
    }

    #[test]
    fn test_parent_links() {
        let tree = sample_tree();
        let inner = tree.index_of("inner").unwrap();
        let a = tree.index_of("a").unwrap();

        assert_eq!(tree.node(tree.root()).unwrap().parent(), None);
        assert_eq!(tree.node(inner).unwrap().parent(), Some(tree.root()));
        assert_eq!(tree.node(a).unwrap().parent(), Some(inner));
    }

    #[test]
    fn test_is_internal() {
        let tree = sample_tree();
        assert!(tree.node(tree.root()).unwrap().is_internal());
        assert!(tree.node(tree.index_of("inner").unwrap()).unwrap().is_internal());
        assert!(!tree.node(tree.index_of("a").unwrap()).unwrap().is_internal());
        assert!(!tree.node(tree.index_of("c").unwrap()).unwrap().is_internal());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut tree = sample_tree();
        assert_eq!(
            tree.add_child(tree.root(), "a"),
            Err(TreeError::DuplicateName("a".to_string()))
        );
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let mut tree = sample_tree();
        assert_eq!(
            tree.add_child(99, "x"),
            Err(TreeError::UnknownNode(99))
        );
    }
}
