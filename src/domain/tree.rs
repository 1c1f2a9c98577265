//! Arena-backed shape tree: leaves and composites behind one handle type.

use std::fmt;

use generational_arena::{Arena, Index};
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::point::Point;
use crate::domain::shape::{Circle, Rectangle, Shape};

/// Stable handle to one node of a [`ShapeTree`].
///
/// Identity is the handle, not the shape's value: two equal circles inserted
/// separately get different ids. Handles of destroyed nodes never resolve again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeId(Index);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "shape#{}.{}", slot, generation)
    }
}

/// Payload of a tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Circle(Circle),
    Rectangle(Rectangle),
    Composite,
}

impl ShapeKind {
    pub fn is_composite(&self) -> bool {
        matches!(self, ShapeKind::Composite)
    }
}

/// Tree node in the arena.
#[derive(Debug)]
pub struct ShapeNode {
    kind: ShapeKind,
    /// Owning composite, None for detached nodes
    parent: Option<ShapeId>,
    /// Children in insertion order (always empty for leaves)
    children: Vec<ShapeId>,
}

impl ShapeNode {
    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<ShapeId> {
        self.parent
    }

    pub fn children(&self) -> &[ShapeId] {
        &self.children
    }
}

/// Owner of every shape node.
///
/// Each node has at most one parent, so the structure is a forest of
/// exclusively owned subtrees. `add_child` refuses edges that would share a
/// child or close a cycle. No internal synchronization.
#[derive(Debug)]
pub struct ShapeTree {
    arena: Arena<ShapeNode>,
}

impl Default for ShapeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    /// Insert a detached node and return its handle.
    #[instrument(level = "trace", skip(self))]
    pub fn insert(&mut self, kind: ShapeKind) -> ShapeId {
        let node = ShapeNode {
            kind,
            parent: None,
            children: Vec::new(),
        };
        ShapeId(self.arena.insert(node))
    }

    pub fn insert_circle(&mut self, center: Point, radius: f64) -> DomainResult<ShapeId> {
        Ok(self.insert(ShapeKind::Circle(Circle::new(center, radius)?)))
    }

    pub fn insert_rectangle(&mut self, center: Point, half_extent: Point) -> DomainResult<ShapeId> {
        Ok(self.insert(ShapeKind::Rectangle(Rectangle::new(center, half_extent)?)))
    }

    pub fn insert_composite(&mut self) -> ShapeId {
        self.insert(ShapeKind::Composite)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn node(&self, id: ShapeId) -> Option<&ShapeNode> {
        self.arena.get(id.0)
    }

    /// Read-only view of a node implementing [`Shape`].
    pub fn get(&self, id: ShapeId) -> Option<ShapeRef<'_>> {
        self.node(id).map(|node| ShapeRef {
            tree: self,
            id,
            node,
        })
    }

    pub fn parent(&self, id: ShapeId) -> Option<ShapeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Children of `id` in insertion order; empty for leaves and unknown ids.
    pub fn children(&self, id: ShapeId) -> &[ShapeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Nodes without a parent.
    pub fn roots(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.arena
            .iter()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(idx, _)| ShapeId(idx))
    }

    /// True if `ancestor` is `id` itself or lies on the parent chain above it.
    pub fn is_ancestor_or_self(&self, ancestor: ShapeId, id: ShapeId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.parent(c);
        }
        false
    }

    fn require(&self, id: ShapeId) -> DomainResult<&ShapeNode> {
        self.node(id).ok_or(DomainError::UnknownShape(id))
    }

    /// Attach `child` to the composite `parent`.
    ///
    /// Re-adding an existing child is a no-op.
    #[instrument(level = "debug", skip(self))]
    pub fn add_child(&mut self, parent: ShapeId, child: ShapeId) -> DomainResult<()> {
        let parent_node = self.require(parent)?;
        if !parent_node.kind.is_composite() {
            return Err(DomainError::NotComposite(parent));
        }
        let child_node = self.require(child)?;
        match child_node.parent {
            Some(owner) if owner == parent => {
                debug!("add_child: {} already a child of {}", child, parent);
                return Ok(());
            }
            Some(owner) => return Err(DomainError::AlreadyOwned { child, owner }),
            None => {}
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(DomainError::CycleDetected { parent, child });
        }

        if let Some(node) = self.arena.get_mut(child.0) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.arena.get_mut(parent.0) {
            node.children.push(child);
        }
        Ok(())
    }

    /// Detach `child` from `parent`. Returns false if it was not a child.
    ///
    /// The detached node stays alive and can be reattached or destroyed.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_child(&mut self, parent: ShapeId, child: ShapeId) -> DomainResult<bool> {
        let parent_node = self
            .arena
            .get_mut(parent.0)
            .ok_or(DomainError::UnknownShape(parent))?;
        let Some(pos) = parent_node.children.iter().position(|&c| c == child) else {
            return Ok(false);
        };
        parent_node.children.remove(pos);
        if let Some(node) = self.arena.get_mut(child.0) {
            node.parent = None;
        }
        Ok(true)
    }

    /// Destroy `id` together with the subtree it owns.
    ///
    /// Returns the number of nodes destroyed.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, id: ShapeId) -> DomainResult<usize> {
        let parent = self.require(id)?.parent;
        if let Some(parent) = parent {
            self.remove_child(parent, id)?;
        }
        let doomed: Vec<ShapeId> = self.iter(id).map(|(sid, _)| sid).collect();
        for sid in &doomed {
            self.arena.remove(sid.0);
        }
        debug!("remove: destroyed {} nodes below {}", doomed.len(), id);
        Ok(doomed.len())
    }

    /// Preorder traversal of the subtree rooted at `id`.
    pub fn iter(&self, id: ShapeId) -> TreeIterator<'_> {
        TreeIterator::new(self, id)
    }

    /// Number of levels in the subtree at `id`; 0 for unknown ids.
    #[instrument(level = "trace", skip(self))]
    pub fn depth(&self, id: ShapeId) -> usize {
        match self.node(id) {
            Some(node) => {
                1 + node
                    .children
                    .iter()
                    .map(|&child| self.depth(child))
                    .max()
                    .unwrap_or(0)
            }
            None => 0,
        }
    }

    /// Number of circles and rectangles in the subtree at `id`.
    pub fn leaf_count(&self, id: ShapeId) -> usize {
        self.iter(id)
            .filter(|(_, node)| !node.kind.is_composite())
            .count()
    }
}

/// Borrowed view of one node; dispatches the [`Shape`] contract by kind.
#[derive(Debug, Clone, Copy)]
pub struct ShapeRef<'a> {
    tree: &'a ShapeTree,
    id: ShapeId,
    node: &'a ShapeNode,
}

impl<'a> ShapeRef<'a> {
    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn kind(&self) -> &'a ShapeKind {
        &self.node.kind
    }

    pub fn children(&self) -> impl Iterator<Item = ShapeRef<'a>> + 'a {
        let (tree, node) = (self.tree, self.node);
        node.children.iter().filter_map(move |&c| tree.get(c))
    }
}

impl Shape for ShapeRef<'_> {
    fn contains(&self, p: Point) -> bool {
        match &self.node.kind {
            ShapeKind::Circle(c) => c.contains(p),
            ShapeKind::Rectangle(r) => r.contains(p),
            ShapeKind::Composite => self.children().any(|child| child.contains(p)),
        }
    }

    /// Leaves describe themselves; composites list their descendants one per
    /// line in insertion order, skipping empty composites.
    fn describe(&self) -> String {
        match &self.node.kind {
            ShapeKind::Circle(c) => c.describe(),
            ShapeKind::Rectangle(r) => r.describe(),
            ShapeKind::Composite => self
                .children()
                .map(|child| child.describe())
                .filter(|text| !text.is_empty())
                .join("\n"),
        }
    }
}

pub struct TreeIterator<'a> {
    tree: &'a ShapeTree,
    stack: Vec<ShapeId>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a ShapeTree, start: ShapeId) -> Self {
        let mut stack = Vec::new();
        if tree.node(start).is_some() {
            stack.push(start);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (ShapeId, &'a ShapeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.tree.node(current) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_circle(tree: &mut ShapeTree) -> ShapeId {
        tree.insert_circle(Point::ORIGIN, 1.0).unwrap()
    }

    #[test]
    fn given_nested_composites_when_iterating_then_visits_preorder() {
        let mut tree = ShapeTree::new();
        let root = tree.insert_composite();
        let inner = tree.insert_composite();
        let a = unit_circle(&mut tree);
        let b = unit_circle(&mut tree);
        tree.add_child(root, inner).unwrap();
        tree.add_child(inner, a).unwrap();
        tree.add_child(root, b).unwrap();

        let order: Vec<ShapeId> = tree.iter(root).map(|(id, _)| id).collect();
        assert_eq!(order, vec![root, inner, a, b]);
        assert_eq!(tree.depth(root), 3);
        assert_eq!(tree.leaf_count(root), 2);
    }

    #[test]
    fn given_leaf_parent_when_adding_child_then_not_composite() {
        let mut tree = ShapeTree::new();
        let leaf = unit_circle(&mut tree);
        let other = unit_circle(&mut tree);
        assert_eq!(
            tree.add_child(leaf, other),
            Err(DomainError::NotComposite(leaf))
        );
    }

    #[test]
    fn given_removed_subtree_when_looking_up_then_handles_are_stale() {
        let mut tree = ShapeTree::new();
        let root = tree.insert_composite();
        let inner = tree.insert_composite();
        let leaf = unit_circle(&mut tree);
        tree.add_child(root, inner).unwrap();
        tree.add_child(inner, leaf).unwrap();

        assert_eq!(tree.remove(inner).unwrap(), 2);
        assert!(tree.get(inner).is_none());
        assert!(tree.get(leaf).is_none());
        assert!(tree.children(root).is_empty());
        assert_eq!(tree.len(), 1);
        assert_eq!(
            tree.add_child(root, leaf),
            Err(DomainError::UnknownShape(leaf))
        );
    }

    #[test]
    fn given_detached_nodes_when_listing_roots_then_excludes_owned_children() {
        let mut tree = ShapeTree::new();
        let root = tree.insert_composite();
        let leaf = unit_circle(&mut tree);
        let loose = unit_circle(&mut tree);
        tree.add_child(root, leaf).unwrap();

        let mut roots: Vec<ShapeId> = tree.roots().collect();
        roots.sort_by_key(|id| id.to_string());
        let mut expected = vec![root, loose];
        expected.sort_by_key(|id| id.to_string());
        assert_eq!(roots, expected);
    }

    #[test]
    fn given_attached_nodes_when_reading_node_then_reports_kind_and_links() {
        let mut tree = ShapeTree::new();
        let root = tree.insert_composite();
        let leaf = unit_circle(&mut tree);
        tree.add_child(root, leaf).unwrap();

        let root_node = tree.node(root).unwrap();
        assert!(root_node.kind().is_composite());
        assert_eq!(root_node.parent(), None);
        assert_eq!(root_node.children(), &[leaf]);

        let leaf_node = tree.node(leaf).unwrap();
        assert!(matches!(leaf_node.kind(), ShapeKind::Circle(c) if c.radius() == 1.0));
        assert_eq!(leaf_node.parent(), Some(root));
        assert!(leaf_node.children().is_empty());
    }
}
