//! Scene service
//!
//! Builds a shape tree from a TOML scene description, or the built-in demo scene.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{DomainResult, Point, Shape, ShapeId, ShapeTree};

/// One entry of a scene file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeSpec {
    Circle {
        center: [f64; 2],
        radius: f64,
    },
    Rectangle {
        center: [f64; 2],
        halfsize: [f64; 2],
    },
    Composite {
        #[serde(default)]
        children: Vec<ShapeSpec>,
    },
}

/// Top level of a scene file: the children of an implicit root composite.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct SceneFile {
    pub shapes: Vec<ShapeSpec>,
}

/// A built shape tree together with its root composite.
#[derive(Debug)]
pub struct Scene {
    pub tree: ShapeTree,
    pub root: ShapeId,
}

impl Scene {
    pub fn contains(&self, p: Point) -> bool {
        self.tree.get(self.root).is_some_and(|root| root.contains(p))
    }

    pub fn describe(&self) -> String {
        self.tree
            .get(self.root)
            .map(|root| root.describe())
            .unwrap_or_default()
    }

    pub fn render(&self) -> Tree<String> {
        self.tree.to_tree_string(self.root)
    }
}

/// Service for loading scenes.
#[derive(Debug, Default)]
pub struct SceneService;

impl SceneService {
    pub fn new() -> Self {
        Self
    }

    /// Circle at (1, 0) with radius 1 next to a 1x1 square at the origin.
    pub fn demo(&self) -> ApplicationResult<Scene> {
        let file = SceneFile {
            shapes: vec![
                ShapeSpec::Circle {
                    center: [1.0, 0.0],
                    radius: 1.0,
                },
                ShapeSpec::Rectangle {
                    center: [0.0, 0.0],
                    halfsize: [0.5, 0.5],
                },
            ],
        };
        Ok(Self::assemble(&file)?)
    }

    /// Load `path`, or the demo scene if `None`.
    pub fn load_or_demo(&self, path: Option<&Path>) -> ApplicationResult<Scene> {
        match path {
            Some(p) => self.load(p),
            None => self.demo(),
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<Scene> {
        let content = std::fs::read_to_string(path).with_path_context("read scene", path)?;
        self.parse(&content, path)
    }

    /// Parse scene TOML; `origin` is only used for error messages.
    pub fn parse(&self, content: &str, origin: &Path) -> ApplicationResult<Scene> {
        let file: SceneFile = toml::from_str(content).map_err(|e| ApplicationError::Scene {
            path: PathBuf::from(origin),
            message: e.message().to_string(),
        })?;
        debug!("parse: {} top-level shapes", file.shapes.len());
        Ok(Self::assemble(&file)?)
    }

    fn assemble(file: &SceneFile) -> DomainResult<Scene> {
        let mut tree = ShapeTree::new();
        let root = tree.insert_composite();
        for spec in &file.shapes {
            let child = Self::build(&mut tree, spec)?;
            tree.add_child(root, child)?;
        }
        Ok(Scene { tree, root })
    }

    fn build(tree: &mut ShapeTree, spec: &ShapeSpec) -> DomainResult<ShapeId> {
        match spec {
            ShapeSpec::Circle { center, radius } => {
                tree.insert_circle(Point::from(*center), *radius)
            }
            ShapeSpec::Rectangle { center, halfsize } => {
                tree.insert_rectangle(Point::from(*center), Point::from(*halfsize))
            }
            ShapeSpec::Composite { children } => {
                let id = tree.insert_composite();
                for child in children {
                    let child_id = Self::build(tree, child)?;
                    tree.add_child(id, child_id)?;
                }
                Ok(id)
            }
        }
    }
}
