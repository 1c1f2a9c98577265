/*
Tree rendering lives in a trait so the shape views stay free of termtree types.
 */
use termtree::Tree;
use tracing::instrument;

use crate::domain::shape::Shape;
use crate::domain::tree::{ShapeId, ShapeKind, ShapeRef, ShapeTree};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

fn label(shape: &ShapeRef<'_>) -> String {
    match shape.kind() {
        ShapeKind::Composite => format!("Composite[{}]", shape.children().count()),
        _ => shape.describe(),
    }
}

impl TreeNodeConvert for ShapeRef<'_> {
    #[instrument(level = "debug", skip(self), fields(id = %self.id()))]
    fn to_tree_string(&self) -> Tree<String> {
        // Recursively construct the children
        let leaves: Vec<_> = self.children().map(|c| c.to_tree_string()).collect();
        Tree::new(label(self)).with_leaves(leaves)
    }
}

impl ShapeTree {
    /// Render the subtree at `id`, or a placeholder for unknown ids.
    pub fn to_tree_string(&self, id: ShapeId) -> Tree<String> {
        match self.get(id) {
            Some(shape) => shape.to_tree_string(),
            None => Tree::new("Empty tree".to_string()),
        }
    }
}
