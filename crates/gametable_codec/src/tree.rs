//! Table schemas.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::edge::Edge;
use crate::error::{CodecError, CodecResult};
use crate::node::RecordNode;

/// The schema of one table type: a named root record.
///
/// A tree is immutable once built and can be shared freely between threads.
/// Sub-trees referenced from it may still be attached later; check
/// [`is_complete`](Self::is_complete) before handing it to a reader or writer
/// if that matters to the caller.
#[derive(Clone)]
pub struct Tree {
    name: String,
    root: Arc<RecordNode>,
}

impl Tree {
    /// Creates a tree rooted at `root`.
    pub fn new(name: impl Into<String>, root: RecordNode) -> Self {
        Self {
            name: name.into(),
            root: Arc::new(root),
        }
    }

    /// Name of the table type.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The root record.
    pub fn root(&self) -> &Arc<RecordNode> {
        &self.root
    }

    /// Edges of the root record, in on-disk order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.root.fields().iter().map(|f| f.edge())
    }

    /// Size of the root record's fixed region.
    pub fn fixed_size(&self) -> u32 {
        self.root.size()
    }

    /// Names of referenced sub-trees that have not been attached yet.
    pub fn unresolved(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.root.collect_unresolved(&mut out);
        out
    }

    /// Whether every referenced sub-tree is attached.
    pub fn is_complete(&self) -> bool {
        self.unresolved().is_empty()
    }

    /// Whether instances of `T` can be read or written with this tree.
    pub fn accepts<T: Any>(&self) -> bool {
        RecordNode::type_id(&self.root) == TypeId::of::<T>()
    }

    /// Fails with `InvalidArgument` unless the root record is of type `T`.
    pub(crate) fn check_root<T: Any>(&self) -> CodecResult<()> {
        if self.accepts::<T>() {
            Ok(())
        } else {
            Err(CodecError::invalid_argument(format!(
                "tree '{}' describes {}, not {}",
                self.name,
                self.root.type_name(),
                std::any::type_name::<T>()
            )))
        }
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("name", &self.name)
            .field("root", &self.root)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Node, SubTree};

    #[derive(Debug, Clone, Default)]
    struct Line {
        speaker: u32,
    }

    #[derive(Debug, Clone, Default)]
    struct Dialog {
        version: u32,
        lines: Vec<Line>,
    }

    crate::record_value!(Line);

    fn dialog_tree(lines: &SubTree) -> Tree {
        let root = RecordNode::builder::<Dialog>()
            .field("version", Node::U32, |d: &Dialog| d.version, |d, v| d.version = v)
            .field(
                "lines",
                Node::list(Node::subtree(lines)).unwrap(),
                |d: &Dialog| d.lines.clone(),
                |d, v| d.lines = v,
            )
            .build()
            .unwrap();
        Tree::new("dialog", root)
    }

    #[test]
    fn edges_and_size() {
        let lines = SubTree::new::<Line>("line");
        let tree = dialog_tree(&lines);
        let names: Vec<&str> = tree.edges().map(Edge::name).collect();
        assert_eq!(names, vec!["version", "lines"]);
        assert_eq!(tree.fixed_size(), 12);
        assert_eq!(tree.name(), "dialog");
    }

    #[test]
    fn unresolved_until_attached() {
        let lines = SubTree::new::<Line>("line");
        let tree = dialog_tree(&lines);
        assert_eq!(tree.unresolved(), vec!["line".to_string()]);
        assert!(!tree.is_complete());

        lines
            .attach(
                RecordNode::builder::<Line>()
                    .field("speaker", Node::U32, |l: &Line| l.speaker, |l, v| l.speaker = v)
                    .build()
                    .unwrap(),
            )
            .unwrap();
        assert!(tree.is_complete());
    }

    #[test]
    fn accepts_the_root_record_type() {
        let tree = dialog_tree(&SubTree::new::<Line>("line"));
        assert!(tree.accepts::<Dialog>());
        assert!(!tree.accepts::<Arc<RecordNode>>());
        assert!(!tree.accepts::<Line>());

        let shared = tree.clone();
        assert!(shared.check_root::<Dialog>().is_ok());
    }

    #[test]
    fn root_type_check() {
        let tree = dialog_tree(&SubTree::new::<Line>("line"));
        assert!(tree.accepts::<Dialog>());
        assert!(tree.check_root::<Dialog>().is_ok());
        assert!(matches!(
            tree.check_root::<Line>(),
            Err(CodecError::InvalidArgument { .. })
        ));
    }
}
