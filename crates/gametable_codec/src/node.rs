//! Schema nodes.
//!
//! A [`Node`] describes one unit of a table's on-disk shape. Nodes carry no
//! behavior of their own; the reader and writer match on them exhaustively.
//!
//! Fixed sizes are known when a node is built, with one exception: a
//! [`SubTree`] is a record attached after the schema that references it, so
//! it may only sit behind an offset (as a list element), never inline.

use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock};

use crate::edge::Edge;
use crate::error::{CodecError, CodecResult};
use crate::value::{FieldShape, FieldValue};

/// Width in bytes of an offset placeholder.
pub const OFFSET_WIDTH: u32 = 4;

/// Fixed-width scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// 32-bit signed integer.
    I32,
    /// 32-bit unsigned integer.
    U32,
    /// 64-bit signed integer.
    I64,
    /// 32-bit IEEE-754 float.
    F32,
    /// 4-character packed identifier.
    Identifier,
}

impl ScalarKind {
    /// Encoded width in bytes.
    pub const fn width(self) -> u32 {
        match self {
            ScalarKind::I64 => 8,
            ScalarKind::I32 | ScalarKind::U32 | ScalarKind::F32 | ScalarKind::Identifier => 4,
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScalarKind::I32 => "i32",
            ScalarKind::U32 => "u32",
            ScalarKind::I64 => "i64",
            ScalarKind::F32 => "f32",
            ScalarKind::Identifier => "identifier",
        })
    }
}

/// Width of a list's element count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountWidth {
    /// 1-byte count.
    U8,
    /// 2-byte count.
    U16,
    /// 4-byte count.
    #[default]
    U32,
}

impl CountWidth {
    /// Encoded width in bytes.
    pub const fn width(self) -> u32 {
        match self {
            CountWidth::U8 => 1,
            CountWidth::U16 => 2,
            CountWidth::U32 => 4,
        }
    }

    /// Largest count this width can hold.
    pub const fn max_count(self) -> u32 {
        match self {
            CountWidth::U8 => u8::MAX as u32,
            CountWidth::U16 => u16::MAX as u32,
            CountWidth::U32 => u32::MAX,
        }
    }
}

/// One node of a schema.
#[derive(Clone)]
pub enum Node {
    /// A fixed-width scalar.
    Scalar(ScalarKind),
    /// A fixed-size record embedded inline.
    Record(Arc<RecordNode>),
    /// Inline count followed by an offset to contiguous elements.
    List(ListNode),
    /// An offset to a variable-length payload.
    Payload(PayloadNode),
    /// A record attached after schema construction.
    SubTree(SubTree),
}

/// Element description shared by inline lists and list payloads.
#[derive(Clone)]
pub struct ListNode {
    element: Box<Node>,
    count_width: CountWidth,
}

impl ListNode {
    /// The element node.
    pub fn element(&self) -> &Node {
        &self.element
    }

    /// Width of the element count.
    pub fn count_width(&self) -> CountWidth {
        self.count_width
    }
}

/// Payloads stored outside the fixed region.
#[derive(Clone)]
pub enum PayloadNode {
    /// `length:1 bytes:length terminator:1`.
    String,
    /// `count:count_width` followed by contiguous elements.
    List(ListNode),
}

impl Node {
    /// 32-bit signed integer.
    pub const I32: Node = Node::Scalar(ScalarKind::I32);
    /// 32-bit unsigned integer.
    pub const U32: Node = Node::Scalar(ScalarKind::U32);
    /// 64-bit signed integer.
    pub const I64: Node = Node::Scalar(ScalarKind::I64);
    /// 32-bit float.
    pub const F32: Node = Node::Scalar(ScalarKind::F32);
    /// Packed identifier.
    pub const IDENTIFIER: Node = Node::Scalar(ScalarKind::Identifier);
    /// Offset-referenced ASCII string.
    pub const STRING: Node = Node::Payload(PayloadNode::String);

    /// An inline record.
    pub fn record(record: RecordNode) -> Node {
        Node::Record(Arc::new(record))
    }

    /// An inline list with a 4-byte count.
    pub fn list(element: Node) -> CodecResult<Node> {
        Self::list_with_width(element, CountWidth::U32)
    }

    /// An inline list with the given count width.
    pub fn list_with_width(element: Node, count_width: CountWidth) -> CodecResult<Node> {
        Ok(Node::List(ListNode::new(element, count_width)?))
    }

    /// A list stored entirely at an offset, count included.
    pub fn list_at_offset(element: Node) -> CodecResult<Node> {
        Self::list_at_offset_with_width(element, CountWidth::U32)
    }

    /// A list stored entirely at an offset with the given count width.
    pub fn list_at_offset_with_width(element: Node, count_width: CountWidth) -> CodecResult<Node> {
        Ok(Node::Payload(PayloadNode::List(ListNode::new(
            element,
            count_width,
        )?)))
    }

    /// A reference to a late-bound sub-tree.
    pub fn subtree(subtree: &SubTree) -> Node {
        Node::SubTree(subtree.clone())
    }

    /// Bytes this node takes in its parent's fixed region.
    ///
    /// Fails for a sub-tree, whose size is unknown until it is attached.
    pub fn inline_size(&self) -> CodecResult<u32> {
        match self {
            Node::Scalar(kind) => Ok(kind.width()),
            Node::Record(record) => Ok(record.size()),
            Node::List(list) => Ok(list.count_width.width() + OFFSET_WIDTH),
            Node::Payload(_) => Ok(OFFSET_WIDTH),
            Node::SubTree(subtree) => Err(CodecError::invalid_schema(format!(
                "sub-tree '{}' must sit behind an offset, not inline",
                subtree.name()
            ))),
        }
    }

    /// Bytes one element of this kind occupies when stored contiguously.
    ///
    /// Resolves attached sub-trees; fails for unattached ones.
    pub fn stride(&self) -> CodecResult<u32> {
        match self {
            Node::SubTree(subtree) => Ok(subtree.resolved()?.size()),
            other => other.inline_size(),
        }
    }

    /// The shape of values this node carries.
    pub fn shape(&self) -> FieldShape {
        match self {
            Node::Scalar(kind) => FieldShape::Scalar(*kind),
            Node::Record(record) => record.shape(),
            Node::List(list) | Node::Payload(PayloadNode::List(list)) => {
                FieldShape::List(Box::new(list.element.shape()))
            }
            Node::Payload(PayloadNode::String) => FieldShape::Str,
            Node::SubTree(subtree) => FieldShape::Record {
                type_id: subtree.slot.type_id,
                type_name: subtree.slot.type_name,
            },
        }
    }

    /// Whether `target` is reachable from this node.
    fn reaches(&self, target: &Arc<SubTreeSlot>) -> bool {
        match self {
            Node::Scalar(_) | Node::Payload(PayloadNode::String) => false,
            Node::Record(record) => record.reaches(target),
            Node::List(list) | Node::Payload(PayloadNode::List(list)) => {
                list.element.reaches(target)
            }
            Node::SubTree(subtree) => {
                Arc::ptr_eq(&subtree.slot, target)
                    || subtree
                        .slot
                        .node
                        .get()
                        .is_some_and(|record| record.reaches(target))
            }
        }
    }

    /// Collects the names of unattached sub-trees reachable from this node.
    pub(crate) fn collect_unresolved(&self, out: &mut Vec<String>) {
        match self {
            Node::Scalar(_) | Node::Payload(PayloadNode::String) => {}
            Node::Record(record) => record.collect_unresolved(out),
            Node::List(list) | Node::Payload(PayloadNode::List(list)) => {
                list.element.collect_unresolved(out);
            }
            Node::SubTree(subtree) => match subtree.slot.node.get() {
                Some(record) => record.collect_unresolved(out),
                None => {
                    if !out.iter().any(|name| name == subtree.name()) {
                        out.push(subtree.name().to_string());
                    }
                }
            },
        }
    }
}

impl ListNode {
    fn new(element: Node, count_width: CountWidth) -> CodecResult<Self> {
        // Sub-tree strides are checked when the sub-tree is attached
        if !matches!(element, Node::SubTree(_)) && element.inline_size()? == 0 {
            return Err(CodecError::invalid_schema(
                "list elements must have a non-zero fixed size",
            ));
        }
        Ok(Self {
            element: Box::new(element),
            count_width,
        })
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Scalar(kind) => write!(f, "Scalar({kind})"),
            Node::Record(record) => fmt::Debug::fmt(record, f),
            Node::List(list) => f
                .debug_struct("List")
                .field("element", &list.element)
                .field("count_width", &list.count_width)
                .finish(),
            Node::Payload(PayloadNode::String) => f.write_str("String"),
            Node::Payload(PayloadNode::List(list)) => f
                .debug_struct("ListAtOffset")
                .field("element", &list.element)
                .field("count_width", &list.count_width)
                .finish(),
            Node::SubTree(subtree) => write!(f, "SubTree({})", subtree.name()),
        }
    }
}

/// A field of a record: its edge and its byte offset inside the record.
#[derive(Clone)]
pub struct Field {
    edge: Edge,
    offset: u32,
}

impl Field {
    /// The edge binding the field to its node.
    pub fn edge(&self) -> &Edge {
        &self.edge
    }

    /// Offset of the field from the start of the record.
    pub fn offset(&self) -> u32 {
        self.offset
    }
}

/// A fixed-size record bound to a Rust type.
pub struct RecordNode {
    type_name: &'static str,
    type_id: TypeId,
    new_instance: fn() -> Box<dyn Any + Send>,
    fields: Vec<Field>,
    size: u32,
}

impl RecordNode {
    /// Starts building a record node for type `T`.
    pub fn builder<T: Default + Send + 'static>() -> RecordBuilder<T> {
        RecordBuilder {
            fields: Vec::new(),
            size: 0,
            error: None,
            _marker: PhantomData,
        }
    }

    /// Name of the record's Rust type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// `TypeId` of the record's Rust type.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fields in on-disk order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Fixed size of the record in bytes.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Allocates a blank instance of the record's type.
    pub fn new_instance(&self) -> Box<dyn Any + Send> {
        (self.new_instance)()
    }

    fn shape(&self) -> FieldShape {
        FieldShape::Record {
            type_id: self.type_id,
            type_name: self.type_name,
        }
    }

    fn reaches(&self, target: &Arc<SubTreeSlot>) -> bool {
        self.fields.iter().any(|f| f.edge.node().reaches(target))
    }

    pub(crate) fn collect_unresolved(&self, out: &mut Vec<String>) {
        for field in &self.fields {
            field.edge.node().collect_unresolved(out);
        }
    }
}

impl fmt::Debug for RecordNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.type_name);
        for field in &self.fields {
            s.field(field.edge.name(), field.edge.node());
        }
        s.finish()
    }
}

/// Builder for [`RecordNode`].
///
/// Fields are laid out in the order they are added. The first invalid field
/// is remembered and reported by [`build`](Self::build).
pub struct RecordBuilder<T> {
    fields: Vec<Field>,
    size: u32,
    error: Option<CodecError>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Default + Send + 'static> RecordBuilder<T> {
    /// Appends a field.
    ///
    /// `get` and `set` must round-trip: `set(p, get(p))` leaves `p`
    /// unchanged.
    #[must_use]
    pub fn field<V, G, S>(mut self, name: &'static str, node: Node, get: G, set: S) -> Self
    where
        V: FieldValue,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        if self.error.is_none() {
            if let Err(e) = self.push_field(name, node, get, set) {
                self.error = Some(e);
            }
        }
        self
    }

    fn push_field<V, G, S>(&mut self, name: &'static str, node: Node, get: G, set: S) -> CodecResult<()>
    where
        V: FieldValue,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        if self.fields.iter().any(|f| f.edge.name() == name) {
            return Err(CodecError::invalid_schema(format!(
                "{}: duplicate field '{name}'",
                std::any::type_name::<T>()
            )));
        }
        let width = node.inline_size()?;
        let edge = Edge::new(name, node, get, set)?;
        let offset = self.size;
        self.size = offset.checked_add(width).ok_or_else(|| {
            CodecError::invalid_schema(format!(
                "{}: record size exceeds the 4 GiB addressable range",
                std::any::type_name::<T>()
            ))
        })?;
        self.fields.push(Field { edge, offset });
        Ok(())
    }

    /// Finishes the record.
    pub fn build(self) -> CodecResult<RecordNode> {
        if let Some(e) = self.error {
            return Err(e);
        }
        Ok(RecordNode {
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
            new_instance: || -> Box<dyn Any + Send> { Box::new(T::default()) },
            fields: self.fields,
            size: self.size,
        })
    }
}

struct SubTreeSlot {
    name: String,
    type_id: TypeId,
    type_name: &'static str,
    node: OnceLock<Arc<RecordNode>>,
}

/// A record schema that can be referenced before it is built.
///
/// Create the handle, use [`Node::subtree`] wherever the record appears as a
/// list element, then [`attach`](Self::attach) the finished record once.
/// Clones share the same slot.
#[derive(Clone)]
pub struct SubTree {
    slot: Arc<SubTreeSlot>,
}

impl SubTree {
    /// Creates an unattached sub-tree for record type `T`.
    pub fn new<T: Any>(name: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(SubTreeSlot {
                name: name.into(),
                type_id: TypeId::of::<T>(),
                type_name: std::any::type_name::<T>(),
                node: OnceLock::new(),
            }),
        }
    }

    /// Name given at creation.
    pub fn name(&self) -> &str {
        &self.slot.name
    }

    /// Whether a record has been attached.
    pub fn is_attached(&self) -> bool {
        self.slot.node.get().is_some()
    }

    /// Attaches the record schema.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidSchema` if the record is for another type, has a
    /// zero size, reaches this sub-tree (a cycle), or if a record was
    /// already attached.
    pub fn attach(&self, record: RecordNode) -> CodecResult<()> {
        if record.type_id != self.slot.type_id {
            return Err(CodecError::invalid_schema(format!(
                "sub-tree '{}' expects {}, got {}",
                self.slot.name, self.slot.type_name, record.type_name
            )));
        }
        if record.size == 0 {
            return Err(CodecError::invalid_schema(format!(
                "sub-tree '{}' is used as a list element and needs a non-zero size",
                self.slot.name
            )));
        }
        if record.reaches(&self.slot) {
            return Err(CodecError::invalid_schema(format!(
                "sub-tree '{}' would contain itself",
                self.slot.name
            )));
        }
        self.slot.node.set(Arc::new(record)).map_err(|_| {
            CodecError::invalid_schema(format!("sub-tree '{}' is already attached", self.slot.name))
        })?;
        tracing::debug!(name = %self.slot.name, "attached sub-tree");
        Ok(())
    }

    /// The attached record.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidArgument` if nothing is attached yet.
    pub fn resolved(&self) -> CodecResult<&Arc<RecordNode>> {
        self.slot.node.get().ok_or_else(|| {
            CodecError::invalid_argument(format!("sub-tree '{}' is not attached", self.slot.name))
        })
    }
}

impl fmt::Debug for SubTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubTree")
            .field("name", &self.slot.name)
            .field("attached", &self.is_attached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Point {
        x: f32,
        y: f32,
    }

    #[derive(Debug, Clone, Default)]
    struct Path {
        id: u32,
        points: Vec<Point>,
        label: String,
    }

    #[derive(Debug, Clone, Default)]
    struct Empty;

    #[derive(Debug, Clone, Default)]
    struct Folder {
        children: Vec<Folder>,
    }

    crate::record_value!(Point, Empty, Folder);

    fn point_node() -> RecordNode {
        RecordNode::builder::<Point>()
            .field("x", Node::F32, |p: &Point| p.x, |p, v| p.x = v)
            .field("y", Node::F32, |p: &Point| p.y, |p, v| p.y = v)
            .build()
            .unwrap()
    }

    #[test]
    fn record_offsets_and_size() {
        let path = RecordNode::builder::<Path>()
            .field("id", Node::U32, |p: &Path| p.id, |p, v| p.id = v)
            .field(
                "points",
                Node::list(Node::record(point_node())).unwrap(),
                |p: &Path| p.points.clone(),
                |p, v| p.points = v,
            )
            .field("label", Node::STRING, |p: &Path| p.label.clone(), |p, v| p.label = v)
            .build()
            .unwrap();

        let offsets: Vec<u32> = path.fields().iter().map(Field::offset).collect();
        assert_eq!(offsets, vec![0, 4, 12]);
        assert_eq!(path.size(), 16);
    }

    #[test]
    fn count_width_changes_inline_size() {
        let narrow = Node::list_with_width(Node::I32, CountWidth::U8).unwrap();
        assert_eq!(narrow.inline_size().unwrap(), 5);
        assert_eq!(Node::list_at_offset(Node::I32).unwrap().inline_size().unwrap(), 4);
        assert_eq!(Node::I64.inline_size().unwrap(), 8);
    }

    #[test]
    fn mismatched_field_type_is_rejected() {
        let result = RecordNode::builder::<Path>()
            .field("id", Node::I32, |p: &Path| p.id, |p, v| p.id = v)
            .build();
        assert!(matches!(result, Err(CodecError::InvalidSchema { .. })));
    }

    #[test]
    fn duplicate_field_is_rejected() {
        let result = RecordNode::builder::<Path>()
            .field("id", Node::U32, |p: &Path| p.id, |p, v| p.id = v)
            .field("id", Node::U32, |p: &Path| p.id, |p, v| p.id = v)
            .build();
        assert!(matches!(result, Err(CodecError::InvalidSchema { .. })));
    }

    #[test]
    fn zero_sized_elements_are_rejected() {
        let empty = RecordNode::builder::<Empty>().build().unwrap();
        assert!(matches!(
            Node::list(Node::record(empty)),
            Err(CodecError::InvalidSchema { .. })
        ));
    }

    #[test]
    fn subtree_cannot_be_inline() {
        let subtree = SubTree::new::<Point>("point");
        let result = RecordNode::builder::<Path>()
            .field("label", Node::subtree(&subtree), |_: &Path| Point::default(), |_, _: Point| {})
            .build();
        assert!(matches!(result, Err(CodecError::InvalidSchema { .. })));
    }

    #[test]
    fn subtree_attach_once() {
        let subtree = SubTree::new::<Point>("point");
        assert!(!subtree.is_attached());
        assert!(matches!(subtree.resolved(), Err(CodecError::InvalidArgument { .. })));

        subtree.attach(point_node()).unwrap();
        assert!(subtree.is_attached());
        assert_eq!(Node::subtree(&subtree).stride().unwrap(), 8);

        assert!(matches!(
            subtree.attach(point_node()),
            Err(CodecError::InvalidSchema { .. })
        ));
    }

    #[test]
    fn subtree_rejects_other_type() {
        let subtree = SubTree::new::<Path>("path");
        assert!(matches!(
            subtree.attach(point_node()),
            Err(CodecError::InvalidSchema { .. })
        ));
    }

    #[test]
    fn subtree_rejects_cycle() {
        let folder = SubTree::new::<Folder>("folder");
        let record = RecordNode::builder::<Folder>()
            .field(
                "children",
                Node::list(Node::subtree(&folder)).unwrap(),
                |f: &Folder| f.children.clone(),
                |f, v| f.children = v,
            )
            .build()
            .unwrap();

        assert!(matches!(
            folder.attach(record),
            Err(CodecError::InvalidSchema { .. })
        ));
        assert!(!folder.is_attached());
    }

    #[test]
    fn unresolved_names_are_collected_once() {
        let point = SubTree::new::<Point>("point");
        let list = Node::list(Node::subtree(&point)).unwrap();
        let mut out = Vec::new();
        list.collect_unresolved(&mut out);
        list.collect_unresolved(&mut out);
        assert_eq!(out, vec!["point".to_string()]);

        point.attach(point_node()).unwrap();
        out.clear();
        list.collect_unresolved(&mut out);
        assert!(out.is_empty());
    }
}
