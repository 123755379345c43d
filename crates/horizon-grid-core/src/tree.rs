//! Component tree for Horizon Grid.
//!
//! Provides the hierarchy every view is built from:
//! - Stable component identifiers via arena-based storage
//! - Parent-child relationships with duplicate and cycle validation
//! - Children kept sorted by [`Priority`], stable on ties
//! - Pre-order traversal used to fan lifecycle callbacks across a tree
//!
//! The tree is generic over its node payload so that the runtime crate can
//! store boxed components while this crate stays free of session state.
//!
//! # Cycle validation
//!
//! [`ComponentTree::add_child`] rejects a child that already appears
//! *anywhere* in the tree rooted at the parent's root ancestor, not only in
//! the parent's own subtree. Moving a node between two branches of the same
//! tree therefore requires an explicit [`remove_child`](ComponentTree::remove_child)
//! first.

use std::any::Any;
use std::collections::HashSet;

use slotmap::{new_key_type, SlotMap};

use crate::error::{TreeError, TreeResult};

new_key_type! {
    /// A unique identifier for a component in a [`ComponentTree`].
    ///
    /// IDs stay valid while the tree changes shape and survive cloning the
    /// tree, so an ID taken from a template tree addresses the same node in
    /// every copy.
    pub struct ComponentId;
}

/// Ordering priority of a component among its siblings.
///
/// Children are sorted ascending, so `Highest` components are visited first
/// and `Monitor` components last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    Highest,
    High,
    #[default]
    Medium,
    Low,
    Lowest,
    /// Observes the results of every other component.
    Monitor,
}

/// A payload that can live in a [`ComponentTree`].
pub trait TreeNode: Send + 'static {
    /// The static priority of this node's type.
    fn priority(&self) -> Priority {
        Priority::Medium
    }

    /// Access the concrete node for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Mutable access to the concrete node for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Type name for debugging output.
    fn type_name(&self) -> &'static str;
}

/// Internal data stored for each component.
#[derive(Debug, Clone)]
struct NodeData<N> {
    /// The payload. `None` while taken out for a callback.
    node: Option<N>,
    /// Human-readable name for debugging and lookup.
    name: String,
    type_name: &'static str,
    /// Static priority captured on insertion.
    priority: Priority,
    /// Explicit priority override.
    priority_override: Option<Priority>,
    parent: Option<ComponentId>,
    /// Children, sorted by effective priority.
    children: Vec<ComponentId>,
}

impl<N> NodeData<N> {
    fn effective_priority(&self) -> Priority {
        self.priority_override.unwrap_or(self.priority)
    }
}

/// Arena-backed component hierarchy.
#[derive(Debug, Clone)]
pub struct ComponentTree<N> {
    nodes: SlotMap<ComponentId, NodeData<N>>,
}

impl<N: TreeNode> ComponentTree<N> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    /// Insert a detached component and return its ID.
    pub fn insert(&mut self, node: N) -> ComponentId {
        let data = NodeData {
            priority: node.priority(),
            type_name: node.type_name(),
            node: Some(node),
            name: String::new(),
            priority_override: None,
            parent: None,
            children: Vec::new(),
        };
        let id = self.nodes.insert(data);
        tracing::trace!(target: "horizon_grid_core::tree", ?id, "inserted component");
        id
    }

    /// Remove a component and its whole subtree.
    #[tracing::instrument(skip(self), target = "horizon_grid_core::tree", level = "trace")]
    pub fn remove(&mut self, id: ComponentId) -> TreeResult<()> {
        let descendants = self.depth_first_preorder(id)?;

        if let Some(parent_id) = self.nodes.get(id).and_then(|d| d.parent) {
            if let Some(parent) = self.nodes.get_mut(parent_id) {
                parent.children.retain(|&child| child != id);
            }
        }

        for descendant in descendants {
            self.nodes.remove(descendant);
        }
        Ok(())
    }

    /// Check if a component exists.
    pub fn contains(&self, id: ComponentId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of components in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn data(&self, id: ComponentId) -> TreeResult<&NodeData<N>> {
        self.nodes.get(id).ok_or(TreeError::InvalidComponentId(id))
    }

    fn data_mut(&mut self, id: ComponentId) -> TreeResult<&mut NodeData<N>> {
        self.nodes.get_mut(id).ok_or(TreeError::InvalidComponentId(id))
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Attach `child` under `parent`.
    ///
    /// Fails with [`TreeError::DuplicateChild`] if `child` is already a direct
    /// child of `parent`, and with [`TreeError::ComponentCycle`] if `child`
    /// appears anywhere in the tree rooted at `parent`'s root ancestor. A
    /// child that still belongs to another tree is detached from it first.
    pub fn add_child(&mut self, parent: ComponentId, child: ComponentId) -> TreeResult<()> {
        self.data(child)?;
        if self.data(parent)?.children.contains(&child) {
            return Err(TreeError::DuplicateChild { parent, child });
        }

        let root = self.root_ancestor(parent)?;
        if self.depth_first_preorder(root)?.contains(&child) {
            return Err(TreeError::ComponentCycle { parent, child });
        }

        if let Some(old_parent) = self.data(child)?.parent {
            if let Some(old) = self.nodes.get_mut(old_parent) {
                old.children.retain(|&c| c != child);
            }
        }

        self.data_mut(child)?.parent = Some(parent);
        self.data_mut(parent)?.children.push(child);
        self.sort_children(parent);
        tracing::trace!(target: "horizon_grid_core::tree", ?parent, ?child, "attached component");
        Ok(())
    }

    /// Detach `child` from `parent`.
    pub fn remove_child(&mut self, parent: ComponentId, child: ComponentId) -> TreeResult<()> {
        let parent_data = self.data_mut(parent)?;
        let Some(position) = parent_data.children.iter().position(|&c| c == child) else {
            return Err(TreeError::NotAChild { parent, child });
        };
        parent_data.children.remove(position);
        self.sort_children(parent);

        if let Some(child_data) = self.nodes.get_mut(child) {
            child_data.parent = None;
        }
        tracing::trace!(target: "horizon_grid_core::tree", ?parent, ?child, "detached component");
        Ok(())
    }

    /// Re-sort a parent's children by effective priority, keeping insertion
    /// order among equal priorities.
    fn sort_children(&mut self, parent: ComponentId) {
        let Some(data) = self.nodes.get_mut(parent) else {
            return;
        };
        let mut children = std::mem::take(&mut data.children);
        children.sort_by_cached_key(|&child| {
            self.nodes
                .get(child)
                .map(NodeData::effective_priority)
                .unwrap_or_default()
        });
        if let Some(data) = self.nodes.get_mut(parent) {
            data.children = children;
        }
    }

    /// Get the parent of a component.
    pub fn parent(&self, id: ComponentId) -> TreeResult<Option<ComponentId>> {
        self.data(id).map(|d| d.parent)
    }

    /// Get the children of a component, in priority order.
    pub fn children(&self, id: ComponentId) -> TreeResult<&[ComponentId]> {
        self.data(id).map(|d| d.children.as_slice())
    }

    /// Walk parent links to the top of the tree.
    pub fn root_ancestor(&self, id: ComponentId) -> TreeResult<ComponentId> {
        let mut current = id;
        while let Some(parent) = self.data(current)?.parent {
            current = parent;
        }
        Ok(current)
    }

    // =========================================================================
    // Naming and priority
    // =========================================================================

    pub fn name(&self, id: ComponentId) -> TreeResult<&str> {
        self.data(id).map(|d| d.name.as_str())
    }

    pub fn set_name(&mut self, id: ComponentId, name: impl Into<String>) -> TreeResult<()> {
        self.data_mut(id)?.name = name.into();
        Ok(())
    }

    /// Type name recorded when the component was inserted.
    pub fn type_name(&self, id: ComponentId) -> TreeResult<&'static str> {
        self.data(id).map(|d| d.type_name)
    }

    /// The effective priority: the override if set, otherwise the static one.
    pub fn priority(&self, id: ComponentId) -> TreeResult<Priority> {
        self.data(id).map(NodeData::effective_priority)
    }

    /// Override (or with `None`, clear the override of) a component's priority.
    pub fn set_priority(&mut self, id: ComponentId, priority: Option<Priority>) -> TreeResult<()> {
        let data = self.data_mut(id)?;
        data.priority_override = priority;
        if let Some(parent) = data.parent {
            self.sort_children(parent);
        }
        Ok(())
    }

    /// Find a component by name anywhere below (and including) `id`.
    pub fn find_by_name(&self, id: ComponentId, name: &str) -> TreeResult<Option<ComponentId>> {
        Ok(self
            .depth_first_preorder(id)?
            .into_iter()
            .find(|&c| self.nodes.get(c).is_some_and(|d| d.name == name)))
    }

    // =========================================================================
    // Node access
    // =========================================================================

    /// Borrow a node's payload. `None` if absent or currently taken.
    pub fn get(&self, id: ComponentId) -> Option<&N> {
        self.nodes.get(id).and_then(|d| d.node.as_ref())
    }

    /// Mutably borrow a node's payload.
    pub fn get_mut(&mut self, id: ComponentId) -> Option<&mut N> {
        self.nodes.get_mut(id).and_then(|d| d.node.as_mut())
    }

    /// Borrow a node as its concrete type.
    pub fn downcast<T: 'static>(&self, id: ComponentId) -> Option<&T> {
        self.get(id).and_then(|n| n.as_any().downcast_ref::<T>())
    }

    /// Mutably borrow a node as its concrete type.
    pub fn downcast_mut<T: 'static>(&mut self, id: ComponentId) -> Option<&mut T> {
        self.get_mut(id).and_then(|n| n.as_any_mut().downcast_mut::<T>())
    }

    /// Take a node's payload out, leaving the structure in place.
    ///
    /// Used to run a callback on one node while the rest of the tree stays
    /// readable. Pair with [`restore`](Self::restore).
    pub fn take(&mut self, id: ComponentId) -> Option<N> {
        self.nodes.get_mut(id).and_then(|d| d.node.take())
    }

    /// Put a previously taken payload back.
    pub fn restore(&mut self, id: ComponentId, node: N) {
        if let Some(data) = self.nodes.get_mut(id) {
            data.node = Some(node);
        }
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Component IDs in depth-first pre-order: the node, then each child
    /// subtree in priority order.
    pub fn depth_first_preorder(&self, id: ComponentId) -> TreeResult<Vec<ComponentId>> {
        let mut result = Vec::new();
        self.preorder_recursive(id, &mut result)?;
        Ok(result)
    }

    fn preorder_recursive(&self, id: ComponentId, result: &mut Vec<ComponentId>) -> TreeResult<()> {
        let data = self.data(id)?;
        result.push(id);
        for &child in &data.children {
            self.preorder_recursive(child, result)?;
        }
        Ok(())
    }

    /// Apply `visit` to `root` and then, recursively, to every descendant in
    /// pre-order.
    pub fn traverse<F>(&self, root: ComponentId, mut visit: F) -> TreeResult<()>
    where
        F: FnMut(ComponentId, &N),
    {
        for id in self.depth_first_preorder(root)? {
            if let Some(node) = self.get(id) {
                visit(id, node);
            }
        }
        Ok(())
    }

    /// Mutable variant of [`traverse`](Self::traverse).
    pub fn traverse_mut<F>(&mut self, root: ComponentId, mut visit: F) -> TreeResult<()>
    where
        F: FnMut(ComponentId, &mut N),
    {
        for id in self.depth_first_preorder(root)? {
            if let Some(node) = self.get_mut(id) {
                visit(id, node);
            }
        }
        Ok(())
    }

    /// All components of type `T` in the tree containing `id`, in traversal
    /// order.
    pub fn find_all<T: 'static>(&self, id: ComponentId) -> TreeResult<Vec<ComponentId>> {
        let root = self.root_ancestor(id)?;
        let mut seen = HashSet::new();
        Ok(self
            .depth_first_preorder(root)?
            .into_iter()
            .filter(|&c| self.get(c).is_some_and(|n| n.as_any().is::<T>()))
            .filter(|&c| seen.insert(c))
            .collect())
    }

    /// The first component of type `T` in the tree containing `id`.
    pub fn find_first<T: 'static>(&self, id: ComponentId) -> TreeResult<Option<ComponentId>> {
        let root = self.root_ancestor(id)?;
        Ok(self
            .depth_first_preorder(root)?
            .into_iter()
            .find(|&c| self.get(c).is_some_and(|n| n.as_any().is::<T>())))
    }
}

impl<N: TreeNode> Default for ComponentTree<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    pub(crate) struct Label {
        pub text: &'static str,
        pub priority: Priority,
    }

    impl Label {
        pub(crate) fn new(text: &'static str) -> Self {
            Self {
                text,
                priority: Priority::Medium,
            }
        }

        pub(crate) fn with_priority(text: &'static str, priority: Priority) -> Self {
            Self { text, priority }
        }
    }

    impl TreeNode for Label {
        fn priority(&self) -> Priority {
            self.priority
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }

        fn type_name(&self) -> &'static str {
            "Label"
        }
    }

    #[derive(Debug, Clone)]
    struct Marker;

    impl TreeNode for Marker {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }

        fn type_name(&self) -> &'static str {
            "Marker"
        }
    }

    fn texts(tree: &ComponentTree<Label>, ids: &[ComponentId]) -> Vec<&'static str> {
        ids.iter().map(|&id| tree.get(id).unwrap().text).collect()
    }

    #[test]
    fn test_add_and_remove_child() {
        let mut tree = ComponentTree::new();
        let root = tree.insert(Label::new("root"));
        let child = tree.insert(Label::new("child"));

        tree.add_child(root, child).unwrap();
        assert_eq!(tree.parent(child).unwrap(), Some(root));
        assert_eq!(tree.children(root).unwrap(), &[child]);

        tree.remove_child(root, child).unwrap();
        assert_eq!(tree.parent(child).unwrap(), None);
        assert!(tree.children(root).unwrap().is_empty());
        assert_eq!(
            tree.remove_child(root, child),
            Err(TreeError::NotAChild { parent: root, child })
        );
    }

    #[test]
    fn test_duplicate_child_rejected() {
        let mut tree = ComponentTree::new();
        let root = tree.insert(Label::new("root"));
        let child = tree.insert(Label::new("child"));
        tree.add_child(root, child).unwrap();
        assert_eq!(
            tree.add_child(root, child),
            Err(TreeError::DuplicateChild { parent: root, child })
        );
    }

    #[test]
    fn test_cycle_rejected() {
        let mut tree = ComponentTree::new();
        let root = tree.insert(Label::new("root"));
        let child = tree.insert(Label::new("child"));
        let grandchild = tree.insert(Label::new("grandchild"));
        tree.add_child(root, child).unwrap();
        tree.add_child(child, grandchild).unwrap();

        assert!(matches!(
            tree.add_child(grandchild, root),
            Err(TreeError::ComponentCycle { .. })
        ));
        assert!(matches!(
            tree.add_child(root, root),
            Err(TreeError::ComponentCycle { .. })
        ));
    }

    #[test]
    fn test_cycle_check_is_global() {
        // Re-attaching a node from a sibling branch fails even though it is
        // not an ancestor of the new parent.
        let mut tree = ComponentTree::new();
        let root = tree.insert(Label::new("root"));
        let left = tree.insert(Label::new("left"));
        let right = tree.insert(Label::new("right"));
        let leaf = tree.insert(Label::new("leaf"));
        tree.add_child(root, left).unwrap();
        tree.add_child(root, right).unwrap();
        tree.add_child(left, leaf).unwrap();

        assert!(matches!(
            tree.add_child(right, leaf),
            Err(TreeError::ComponentCycle { .. })
        ));

        tree.remove_child(left, leaf).unwrap();
        tree.add_child(right, leaf).unwrap();
        assert_eq!(tree.parent(leaf).unwrap(), Some(right));
    }

    #[test]
    fn test_attach_from_other_tree_detaches() {
        let mut tree = ComponentTree::new();
        let first = tree.insert(Label::new("first"));
        let second = tree.insert(Label::new("second"));
        let node = tree.insert(Label::new("node"));
        tree.add_child(first, node).unwrap();

        tree.add_child(second, node).unwrap();
        assert!(tree.children(first).unwrap().is_empty());
        assert_eq!(tree.parent(node).unwrap(), Some(second));
    }

    #[test]
    fn test_children_sorted_by_priority_stable() {
        let mut tree = ComponentTree::new();
        let root = tree.insert(Label::new("root"));
        let specs = [
            ("low-a", Priority::Low),
            ("medium-a", Priority::Medium),
            ("highest", Priority::Highest),
            ("low-b", Priority::Low),
            ("medium-b", Priority::Medium),
            ("monitor", Priority::Monitor),
        ];
        for (text, priority) in specs {
            let id = tree.insert(Label::with_priority(text, priority));
            tree.add_child(root, id).unwrap();
        }

        let order = texts(&tree, tree.children(root).unwrap());
        assert_eq!(
            order,
            vec!["highest", "medium-a", "medium-b", "low-a", "low-b", "monitor"]
        );
    }

    #[test]
    fn test_priority_override_resorts() {
        let mut tree = ComponentTree::new();
        let root = tree.insert(Label::new("root"));
        let a = tree.insert(Label::new("a"));
        let b = tree.insert(Label::new("b"));
        tree.add_child(root, a).unwrap();
        tree.add_child(root, b).unwrap();

        tree.set_priority(b, Some(Priority::High)).unwrap();
        assert_eq!(tree.children(root).unwrap(), &[b, a]);
        assert_eq!(tree.priority(b).unwrap(), Priority::High);

        tree.set_priority(b, None).unwrap();
        assert_eq!(tree.priority(b).unwrap(), Priority::Medium);
    }

    #[test]
    fn test_preorder_traversal() {
        let mut tree = ComponentTree::new();
        let root = tree.insert(Label::new("root"));
        let a = tree.insert(Label::new("a"));
        let a1 = tree.insert(Label::new("a1"));
        let b = tree.insert(Label::new("b"));
        tree.add_child(root, a).unwrap();
        tree.add_child(a, a1).unwrap();
        tree.add_child(root, b).unwrap();

        let mut visited = Vec::new();
        tree.traverse(root, |_, node| visited.push(node.text)).unwrap();
        assert_eq!(visited, vec!["root", "a", "a1", "b"]);
    }

    #[test]
    fn test_root_ancestor() {
        let mut tree = ComponentTree::new();
        let root = tree.insert(Label::new("root"));
        let a = tree.insert(Label::new("a"));
        let a1 = tree.insert(Label::new("a1"));
        tree.add_child(root, a).unwrap();
        tree.add_child(a, a1).unwrap();
        assert_eq!(tree.root_ancestor(a1).unwrap(), root);
        assert_eq!(tree.root_ancestor(root).unwrap(), root);
    }

    #[test]
    fn test_remove_subtree() {
        let mut tree = ComponentTree::new();
        let root = tree.insert(Label::new("root"));
        let a = tree.insert(Label::new("a"));
        let a1 = tree.insert(Label::new("a1"));
        tree.add_child(root, a).unwrap();
        tree.add_child(a, a1).unwrap();

        tree.remove(a).unwrap();
        assert!(!tree.contains(a));
        assert!(!tree.contains(a1));
        assert!(tree.children(root).unwrap().is_empty());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_take_and_restore() {
        let mut tree = ComponentTree::new();
        let root = tree.insert(Label::new("root"));
        let node = tree.take(root).unwrap();
        assert!(tree.get(root).is_none());
        assert!(tree.contains(root));
        tree.restore(root, node);
        assert_eq!(tree.get(root).unwrap().text, "root");
    }

    #[test]
    fn test_clone_preserves_ids() {
        let mut tree = ComponentTree::new();
        let root = tree.insert(Label::new("root"));
        let child = tree.insert(Label::new("child"));
        tree.add_child(root, child).unwrap();

        let copy = tree.clone();
        assert_eq!(copy.children(root).unwrap(), &[child]);
        assert_eq!(copy.get(child).unwrap().text, "child");
    }

    #[test]
    fn test_find_by_name() {
        let mut tree = ComponentTree::new();
        let root = tree.insert(Label::new("root"));
        let child = tree.insert(Label::new("child"));
        tree.add_child(root, child).unwrap();
        tree.set_name(child, "footer").unwrap();

        assert_eq!(tree.find_by_name(root, "footer").unwrap(), Some(child));
        assert_eq!(tree.find_by_name(root, "header").unwrap(), None);
    }

    #[test]
    fn test_invalid_id() {
        let mut tree = ComponentTree::new();
        let id = tree.insert(Label::new("gone"));
        tree.remove(id).unwrap();
        assert_eq!(tree.parent(id), Err(TreeError::InvalidComponentId(id)));
    }

    #[test]
    fn test_find_by_type_uses_root_ancestor() {
        let mut tree: ComponentTree<Box<dyn TreeNode>> = ComponentTree::new();
        let root = tree.insert(Box::new(Label::new("root")));
        let marker_a = tree.insert(Box::new(Marker));
        let branch = tree.insert(Box::new(Label::new("branch")));
        let marker_b = tree.insert(Box::new(Marker));
        tree.add_child(root, marker_a).unwrap();
        tree.add_child(root, branch).unwrap();
        tree.add_child(branch, marker_b).unwrap();

        // Searching from deep inside still covers the whole tree.
        assert_eq!(tree.find_all::<Marker>(marker_b).unwrap(), vec![marker_a, marker_b]);
        assert_eq!(tree.find_first::<Marker>(branch).unwrap(), Some(marker_a));
        assert_eq!(tree.find_all::<Label>(root).unwrap(), vec![root, branch]);
    }

    impl TreeNode for Box<dyn TreeNode> {
        fn priority(&self) -> Priority {
            (**self).priority()
        }

        fn as_any(&self) -> &dyn Any {
            (**self).as_any()
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            (**self).as_any_mut()
        }

        fn type_name(&self) -> &'static str {
            (**self).type_name()
        }
    }
}
