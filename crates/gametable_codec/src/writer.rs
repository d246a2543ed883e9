//! Table writer.
//!
//! Writing happens in two passes over a staging buffer. The fixed region is
//! written first, with a zero placeholder wherever a list or payload lives
//! elsewhere; each placeholder queues a deferred payload. Queued payloads are
//! then emitted strictly first-in first-out, and each one may queue more.
//! Once a payload is emitted its placeholder is patched with the absolute
//! position where it starts.
//!
//! Null lists and strings get a zero offset and queue nothing.

use std::any::Any;
use std::collections::VecDeque;

use gametable_stream::ByteStream;

use crate::error::{CodecError, CodecResult};
use crate::node::{CountWidth, ListNode, Node, PayloadNode, RecordNode, ScalarKind};
use crate::primitive::ByteWriter;
use crate::value::Value;

/// Longest string a 1-byte length prefix can describe.
pub const MAX_STRING_LEN: usize = u8::MAX as usize;

type EmitFn<'t> = Box<dyn FnOnce(&mut TableWriter<'t>) -> CodecResult<()> + 't>;

struct Backpatch<'t> {
    placeholder: usize,
    emit: EmitFn<'t>,
}

/// Encodes values of a tree into a staging buffer.
///
/// `'t` is the lifetime of the tree being written.
pub struct TableWriter<'t> {
    out: ByteWriter,
    base: u64,
    pending: VecDeque<Backpatch<'t>>,
}

impl<'t> TableWriter<'t> {
    /// Creates a writer whose offsets start counting at `base`, the stream
    /// position the staged bytes will be written to.
    pub fn new(base: u64) -> Self {
        Self {
            out: ByteWriter::new(),
            base,
            pending: VecDeque::new(),
        }
    }

    /// Writes a record's fixed region.
    pub fn write_record(&mut self, record: &'t RecordNode, instance: &dyn Any) -> CodecResult<()> {
        for field in record.fields() {
            let edge = field.edge();
            let value = edge.get(instance)?;
            self.write_node(edge.node(), value)?;
        }
        Ok(())
    }

    /// Writes one node's inline bytes, queueing any payload it references.
    pub fn write_node(&mut self, node: &'t Node, value: Value) -> CodecResult<()> {
        match node {
            Node::Scalar(kind) => self.write_scalar(*kind, value),
            Node::Record(record) => self.write_record_value(record, value),
            Node::List(list) => match value.into_list()? {
                None => {
                    self.write_count(list.count_width(), 0)?;
                    self.out.write_u32(0);
                    Ok(())
                }
                Some(items) => {
                    let count = count_for(list, &items)?;
                    self.write_count(list.count_width(), count)?;
                    self.defer(move |w| w.write_elements(list.element(), items));
                    Ok(())
                }
            },
            Node::Payload(PayloadNode::String) => match value.into_str()? {
                None => {
                    self.out.write_u32(0);
                    Ok(())
                }
                Some(text) => {
                    check_string(&text)?;
                    self.defer(move |w| w.write_string(&text));
                    Ok(())
                }
            },
            Node::Payload(PayloadNode::List(list)) => match value.into_list()? {
                None => {
                    self.out.write_u32(0);
                    Ok(())
                }
                Some(items) => {
                    let count = count_for(list, &items)?;
                    self.defer(move |w| {
                        w.write_count(list.count_width(), count)?;
                        w.write_elements(list.element(), items)
                    });
                    Ok(())
                }
            },
            Node::SubTree(subtree) => {
                let record = subtree.resolved()?;
                self.write_record_value(record, value)
            }
        }
    }

    /// Emits every queued payload and patches its placeholder.
    pub fn finish(mut self) -> CodecResult<Vec<u8>> {
        while let Some(entry) = self.pending.pop_front() {
            let target = self.absolute(self.out.position())?;
            (entry.emit)(&mut self)?;
            tracing::trace!(placeholder = entry.placeholder, target, "backpatch");
            self.out.patch_u32(entry.placeholder, target);
        }
        Ok(self.out.into_bytes())
    }

    fn write_record_value(&mut self, record: &'t RecordNode, value: Value) -> CodecResult<()> {
        let instance = value.into_record_box()?;
        let instance: &dyn Any = &*instance;
        if Any::type_id(instance) != RecordNode::type_id(record) {
            return Err(CodecError::invalid_argument(format!(
                "record value is not a {}",
                record.type_name()
            )));
        }
        self.write_record(record, instance)
    }

    fn write_scalar(&mut self, kind: ScalarKind, value: Value) -> CodecResult<()> {
        match (kind, value) {
            (ScalarKind::I32, Value::I32(v)) => self.out.write_i32(v),
            (ScalarKind::U32, Value::U32(v)) => self.out.write_u32(v),
            (ScalarKind::I64, Value::I64(v)) => self.out.write_i64(v),
            (ScalarKind::F32, Value::F32(v)) => self.out.write_f32(v),
            (ScalarKind::Identifier, Value::Identifier(v)) => self.out.write_identifier(v),
            (kind, other) => {
                return Err(CodecError::invalid_argument(format!(
                    "expected a {kind} value, found {}",
                    other.kind_name()
                )))
            }
        }
        Ok(())
    }

    fn write_count(&mut self, width: CountWidth, count: u32) -> CodecResult<()> {
        let too_wide = || CodecError::encoding_failed(format!("count {count} does not fit {width:?}"));
        match width {
            CountWidth::U8 => self.out.write_u8(u8::try_from(count).map_err(|_| too_wide())?),
            CountWidth::U16 => self.out.write_u16(u16::try_from(count).map_err(|_| too_wide())?),
            CountWidth::U32 => self.out.write_u32(count),
        }
        Ok(())
    }

    fn write_elements(&mut self, element: &'t Node, items: Vec<Value>) -> CodecResult<()> {
        for item in items {
            self.write_node(element, item)?;
        }
        Ok(())
    }

    fn write_string(&mut self, text: &str) -> CodecResult<()> {
        // length and charset were checked when the payload was queued
        self.out.write_u8(text.len() as u8);
        self.out.write_bytes(text.as_bytes());
        self.out.write_u8(0);
        Ok(())
    }

    /// Writes a zero placeholder and queues the payload that will fill it.
    fn defer(&mut self, emit: impl FnOnce(&mut TableWriter<'t>) -> CodecResult<()> + 't) {
        let placeholder = self.out.position();
        self.out.write_u32(0);
        self.pending.push_back(Backpatch {
            placeholder,
            emit: Box::new(emit),
        });
    }

    fn absolute(&self, position: usize) -> CodecResult<u32> {
        u32::try_from(self.base + position as u64).map_err(|_| {
            CodecError::encoding_failed("table extends past the 4 GiB offset range")
        })
    }
}

fn count_for(list: &ListNode, items: &[Value]) -> CodecResult<u32> {
    let max = list.count_width().max_count();
    match u32::try_from(items.len()) {
        Ok(count) if count <= max => Ok(count),
        _ => Err(CodecError::encoding_failed(format!(
            "list of {} elements exceeds the {:?} count limit of {max}",
            items.len(),
            list.count_width()
        ))),
    }
}

fn check_string(text: &str) -> CodecResult<()> {
    if text.len() > MAX_STRING_LEN {
        return Err(CodecError::encoding_failed(format!(
            "string of {} bytes exceeds the {MAX_STRING_LEN}-byte limit",
            text.len()
        )));
    }
    if !text.is_ascii() {
        return Err(CodecError::encoding_failed(format!(
            "string {text:?} is not 7-bit ASCII"
        )));
    }
    Ok(())
}

/// Writes `bytes` to `stream` in one call.
pub(crate) fn flush_to<S: ByteStream + ?Sized>(stream: &mut S, bytes: &[u8]) -> CodecResult<()> {
    stream.write_all(bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::CountWidth;

    #[derive(Debug, Clone, Default)]
    struct Pair {
        a: u32,
        b: Vec<i32>,
    }

    #[derive(Debug, Clone, Default)]
    struct Doc {
        name: Option<String>,
        pairs: Vec<Pair>,
        notes: Option<Vec<i32>>,
    }

    crate::record_value!(Pair);

    fn doc_node() -> RecordNode {
        let pair = RecordNode::builder::<Pair>()
            .field("a", Node::U32, |p: &Pair| p.a, |p, v| p.a = v)
            .field(
                "b",
                Node::list_with_width(Node::I32, CountWidth::U8).unwrap(),
                |p: &Pair| p.b.clone(),
                |p, v| p.b = v,
            )
            .build()
            .unwrap();
        RecordNode::builder::<Doc>()
            .field("name", Node::STRING, |d: &Doc| d.name.clone(), |d, v| d.name = v)
            .field(
                "pairs",
                Node::list(Node::record(pair)).unwrap(),
                |d: &Doc| d.pairs.clone(),
                |d, v| d.pairs = v,
            )
            .field(
                "notes",
                Node::list_at_offset(Node::I32).unwrap(),
                |d: &Doc| d.notes.clone(),
                |d, v| d.notes = v,
            )
            .build()
            .unwrap()
    }

    fn encode(doc: &Doc, base: u64) -> CodecResult<Vec<u8>> {
        let node = doc_node();
        let mut writer = TableWriter::new(base);
        writer.write_record(&node, doc)?;
        writer.finish()
    }

    fn u32_at(bytes: &[u8], at: usize) -> u32 {
        u32::from_le_bytes(bytes[at..at + 4].try_into().unwrap())
    }

    #[test]
    fn payloads_follow_fixed_region_in_queue_order() {
        let doc = Doc {
            name: Some("ab".into()),
            pairs: vec![Pair { a: 7, b: vec![5] }],
            notes: Some(vec![1, 2]),
        };
        let bytes = encode(&doc, 0).unwrap();

        // fixed region: name(4) pairs(8) notes(4)
        assert_eq!(u32_at(&bytes, 0), 16);
        assert_eq!(&bytes[16..20], &[2, b'a', b'b', 0]);
        assert_eq!(u32_at(&bytes, 4), 1);
        assert_eq!(u32_at(&bytes, 8), 20);
        assert_eq!(u32_at(&bytes, 12), 29);

        // pair element: a(4) b count(1) b offset(4)
        assert_eq!(u32_at(&bytes, 20), 7);
        assert_eq!(bytes[24], 1);
        // b's payload is queued after notes, so it lands last
        assert_eq!(u32_at(&bytes, 25), 41);
        assert_eq!(u32_at(&bytes, 29), 2);
        assert_eq!(u32_at(&bytes, 33), 1);
        assert_eq!(u32_at(&bytes, 37), 2);
        assert_eq!(u32_at(&bytes, 41), 5);
        assert_eq!(bytes.len(), 45);
    }

    #[test]
    fn null_payloads_write_zero_offsets() {
        let bytes = encode(&Doc::default(), 0).unwrap();
        assert_eq!(bytes.len(), 16);
        assert_eq!(u32_at(&bytes, 0), 0);
        // an empty Vec is present: count 0, offset to the end of the data
        assert_eq!(u32_at(&bytes, 4), 0);
        assert_eq!(u32_at(&bytes, 8), 16);
        assert_eq!(u32_at(&bytes, 12), 0);
    }

    #[test]
    fn offsets_include_base() {
        let doc = Doc {
            name: Some(String::new()),
            ..Doc::default()
        };
        let bytes = encode(&doc, 100).unwrap();
        assert_eq!(u32_at(&bytes, 0), 116);
        assert_eq!(&bytes[16..18], &[0, 0]);
    }

    #[test]
    fn offsets_past_u32_fail() {
        let doc = Doc {
            name: Some("x".into()),
            ..Doc::default()
        };
        let err = encode(&doc, u64::from(u32::MAX)).unwrap_err();
        assert!(matches!(err, CodecError::EncodingFailed { .. }));
    }

    #[test]
    fn long_or_non_ascii_strings_fail() {
        let doc = Doc {
            name: Some("x".repeat(256)),
            ..Doc::default()
        };
        assert!(matches!(encode(&doc, 0), Err(CodecError::EncodingFailed { .. })));

        let doc = Doc {
            name: Some("café".into()),
            ..Doc::default()
        };
        assert!(matches!(encode(&doc, 0), Err(CodecError::EncodingFailed { .. })));

        let doc = Doc {
            name: Some("y".repeat(255)),
            ..Doc::default()
        };
        assert!(encode(&doc, 0).is_ok());
    }

    #[test]
    fn count_must_fit_its_width() {
        let doc = Doc {
            pairs: vec![Pair {
                a: 0,
                b: vec![0; 256],
            }],
            ..Doc::default()
        };
        assert!(matches!(encode(&doc, 0), Err(CodecError::EncodingFailed { .. })));
    }
}
