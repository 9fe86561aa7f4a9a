//! Tree plus the id source that mutates it.

use crate::model::id::IdGenerator;
use crate::model::tree::BoardTree;

/// Everything one session mutates.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    pub tree: BoardTree,
    pub ids: IdGenerator,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a loaded tree; new ids start above every id already present.
    pub fn from_tree(tree: BoardTree) -> Self {
        let ids = IdGenerator::starting_after(tree.max_entity_id());
        Self { tree, ids }
    }
}
