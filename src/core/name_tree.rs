//! Name Index: a component-keyed tree over [`Name`]s.
//!
//! Nodes live in an arena and are addressed by [`NodeId`] handles carrying a
//! generation, so a handle to an erased node is reported absent even after its
//! slot is reused. The root node always exists.

use crate::core::name::{Component, Name};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

#[derive(Debug)]
struct Node<T> {
    prefix: Name,
    parent: Option<NodeId>,
    children: FxHashMap<Component, NodeId>,
    payload: Option<T>,
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    node: Option<Node<T>>,
}

#[derive(Debug)]
pub struct NameTree<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    live: usize,
}

impl<T> Default for NameTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NameTree<T> {
    pub fn new() -> Self {
        let root = Node {
            prefix: Name::root(),
            parent: None,
            children: FxHashMap::default(),
            payload: None,
        };
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(root),
            }],
            free: Vec::new(),
            live: 1,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId {
            index: 0,
            generation: 0,
        }
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Always false: the root node is created with the tree and never erased.
    pub fn is_empty(&self) -> bool {
        false
    }

    fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    fn allocate(&mut self, node: Node<T>) -> NodeId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                index: self.slots.len() - 1,
                generation: 0,
            }
        }
    }

    fn child(&self, id: NodeId, component: &Component) -> Option<NodeId> {
        self.node(id)
            .and_then(|node| node.children.get(component).copied())
    }

    /// Locates the node for `prefix`, creating it and any missing ancestors.
    pub fn insert(&mut self, prefix: &Name) -> NodeId {
        let mut current = self.root();
        for (depth, component) in prefix.components().iter().enumerate() {
            current = match self.child(current, component) {
                Some(next) => next,
                None => {
                    let next = self.allocate(Node {
                        prefix: prefix.prefix(depth + 1),
                        parent: Some(current),
                        children: FxHashMap::default(),
                        payload: None,
                    });
                    if let Some(parent) = self.node_mut(current) {
                        parent.children.insert(component.clone(), next);
                    }
                    next
                }
            };
        }
        current
    }

    pub fn find(&self, prefix: &Name) -> Option<NodeId> {
        let mut current = self.root();
        for component in prefix.components() {
            current = self.child(current, component)?;
        }
        Some(current)
    }

    /// Deepest existing node whose prefix is an ancestor-or-self of `name`.
    pub fn find_longest_prefix_match(&self, name: &Name) -> NodeId {
        self.find_longest_prefix_match_with(name, |_| true)
            .unwrap_or_else(|| self.root())
    }

    /// Deepest existing ancestor-or-self of `name` whose payload satisfies `pred`.
    pub fn find_longest_prefix_match_with<F>(&self, name: &Name, pred: F) -> Option<NodeId>
    where
        F: Fn(Option<&T>) -> bool,
    {
        let mut current = self.root();
        let mut best = self
            .node(current)
            .filter(|node| pred(node.payload.as_ref()))
            .map(|_| current);
        for component in name.components() {
            match self.child(current, component) {
                Some(next) => current = next,
                None => break,
            }
            if self.node(current).is_some_and(|node| pred(node.payload.as_ref())) {
                best = Some(current);
            }
        }
        best
    }

    pub fn prefix(&self, id: NodeId) -> Option<&Name> {
        self.node(id).map(|node| &node.prefix)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .map(|node| node.children.values().copied().collect())
            .unwrap_or_default()
    }

    /// Pre-order walk of the subtree rooted at `id`, `id` first.
    ///
    /// `descend` decides whether the walk continues below a visited node; the node
    /// itself is always yielded.
    pub fn descendants_where<F>(&self, id: NodeId, descend: F) -> Vec<NodeId>
    where
        F: Fn(NodeId, Option<&T>) -> bool,
    {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.node(current) else {
                continue;
            };
            out.push(current);
            if current == id || descend(current, node.payload.as_ref()) {
                stack.extend(node.children.values().copied());
            }
        }
        out
    }

    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        self.descendants_where(id, |_, _| true)
    }

    pub fn payload(&self, id: NodeId) -> Option<&T> {
        self.node(id).and_then(|node| node.payload.as_ref())
    }

    pub fn payload_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.node_mut(id).and_then(|node| node.payload.as_mut())
    }

    /// Replaces the payload at `id`, returning the previous one.
    pub fn set_payload(&mut self, id: NodeId, payload: T) -> Option<T> {
        self.node_mut(id)
            .and_then(|node| node.payload.replace(payload))
    }

    pub fn take_payload(&mut self, id: NodeId) -> Option<T> {
        self.node_mut(id).and_then(|node| node.payload.take())
    }

    /// Removes `id` if it is a payload-free leaf, then repeats on its parent.
    ///
    /// Returns the number of nodes removed. The root is never removed; nodes that
    /// still hold a payload or have children are left in place.
    pub fn erase_if_empty(&mut self, id: NodeId) -> usize {
        let mut removed = 0;
        let mut current = id;
        loop {
            let Some(node) = self.node(current) else {
                break;
            };
            let Some(parent) = node.parent else {
                break;
            };
            if node.payload.is_some() || !node.children.is_empty() {
                break;
            }
            let component = node.prefix.components().last().cloned();
            let slot = &mut self.slots[current.index];
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(current.index);
            self.live -= 1;
            removed += 1;
            if let (Some(parent_node), Some(component)) = (self.node_mut(parent), component) {
                parent_node.children.remove(&component);
            }
            current = parent;
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(uri: &str) -> Name {
        uri.parse().unwrap()
    }

    #[test]
    fn test_insert_creates_ancestors() {
        let mut tree: NameTree<u32> = NameTree::new();
        let abc = tree.insert(&name("/a/b/c"));
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.prefix(abc), Some(&name("/a/b/c")));
        let ab = tree.parent(abc).unwrap();
        assert_eq!(tree.prefix(ab), Some(&name("/a/b")));
        assert_eq!(tree.insert(&name("/a/b/c")), abc);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_find_and_longest_prefix_match() {
        let mut tree: NameTree<u32> = NameTree::new();
        let ab = tree.insert(&name("/a/b"));
        assert_eq!(tree.find(&name("/a/b")), Some(ab));
        assert_eq!(tree.find(&name("/a/b/c")), None);
        assert_eq!(tree.find_longest_prefix_match(&name("/a/b/c/d")), ab);
        assert_eq!(tree.find_longest_prefix_match(&name("/x")), tree.root());
    }

    #[test]
    fn test_longest_prefix_match_with_payload() {
        let mut tree: NameTree<u32> = NameTree::new();
        let a = tree.insert(&name("/a"));
        tree.set_payload(a, 1);
        tree.insert(&name("/a/b/c"));
        let hit = tree
            .find_longest_prefix_match_with(&name("/a/b/c/d"), |p| p.is_some())
            .unwrap();
        assert_eq!(hit, a);
        assert!(
            tree.find_longest_prefix_match_with(&name("/z"), |p| p.is_some())
                .is_none()
        );
    }

    #[test]
    fn test_erase_compacts_bottom_up() {
        let mut tree: NameTree<u32> = NameTree::new();
        let a = tree.insert(&name("/a"));
        tree.set_payload(a, 1);
        let abc = tree.insert(&name("/a/b/c"));
        assert_eq!(tree.erase_if_empty(abc), 2);
        assert!(!tree.contains(abc));
        assert!(tree.contains(a));
        assert_eq!(tree.len(), 2);
        // Node with payload survives.
        assert_eq!(tree.erase_if_empty(a), 0);
        tree.take_payload(a);
        assert_eq!(tree.erase_if_empty(a), 1);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.erase_if_empty(tree.root()), 0);
        assert!(!tree.is_empty());
    }

    #[test]
    fn test_non_leaf_not_erased() {
        let mut tree: NameTree<u32> = NameTree::new();
        let a = tree.insert(&name("/a"));
        let ab = tree.insert(&name("/a/b"));
        tree.set_payload(ab, 2);
        assert_eq!(tree.erase_if_empty(a), 0);
        assert!(tree.contains(a));
    }

    #[test]
    fn test_stale_handle_after_slot_reuse() {
        let mut tree: NameTree<u32> = NameTree::new();
        let x = tree.insert(&name("/x"));
        tree.erase_if_empty(x);
        let y = tree.insert(&name("/y"));
        assert!(!tree.contains(x));
        assert!(tree.contains(y));
        assert_eq!(tree.prefix(x), None);
        assert_eq!(tree.set_payload(x, 5), None);
        assert_eq!(tree.payload(y), None);
    }

    #[test]
    fn test_descendants_where_stops_below_boundary() {
        let mut tree: NameTree<u32> = NameTree::new();
        let a = tree.insert(&name("/a"));
        let ab = tree.insert(&name("/a/b"));
        tree.set_payload(ab, 9);
        tree.insert(&name("/a/b/c"));
        tree.insert(&name("/a/d"));
        assert_eq!(tree.descendants(a).len(), 4);
        let walk = tree.descendants_where(a, |_, payload| payload.is_none());
        assert_eq!(walk.len(), 3);
        assert!(walk.contains(&ab));
        assert!(!walk.contains(&tree.find(&name("/a/b/c")).unwrap()));
    }
}
