//! Table reader.
//!
//! The reader walks a tree in field order, consuming the fixed region at the
//! current cursor. Every offset it meets is followed with a seek; the cursor
//! is put back afterwards, so a finished read always leaves the stream right
//! after the fixed region it started on.

use std::any::Any;

use gametable_stream::ByteStream;

use crate::config::CodecConfig;
use crate::error::{CodecError, CodecResult};
use crate::node::{CountWidth, ListNode, Node, PayloadNode, RecordNode, ScalarKind};
use crate::primitive::ReadExt;
use crate::value::Value;

/// Decodes values of a tree from a stream.
pub struct TableReader<'a, S: ByteStream + ?Sized> {
    stream: &'a mut S,
    config: CodecConfig,
    stream_len: u64,
}

impl<'a, S: ByteStream + ?Sized> TableReader<'a, S> {
    /// Creates a reader over `stream`, starting at its current position.
    pub fn new(stream: &'a mut S, config: CodecConfig) -> CodecResult<Self> {
        let stream_len = stream.len()?;
        Ok(Self {
            stream,
            config,
            stream_len,
        })
    }

    /// Reads one record instance.
    pub fn read_record(&mut self, record: &RecordNode) -> CodecResult<Box<dyn Any + Send>> {
        let mut instance = record.new_instance();
        for field in record.fields() {
            let edge = field.edge();
            let value = self.read_node(edge.node())?;
            edge.set(&mut *instance, value)?;
        }
        Ok(instance)
    }

    /// Reads the value of one node at the current cursor.
    pub fn read_node(&mut self, node: &Node) -> CodecResult<Value> {
        match node {
            Node::Scalar(kind) => self.read_scalar(*kind),
            Node::Record(record) => Ok(Value::Record(self.read_record(record)?)),
            Node::List(list) => {
                let count = self.read_count(list.count_width())?;
                let offset = self.stream.read_u32()?;
                self.read_inline_list(list, count, offset)
            }
            Node::Payload(PayloadNode::String) => {
                let offset = self.stream.read_u32()?;
                self.read_string_payload(offset)
            }
            Node::Payload(PayloadNode::List(list)) => {
                let offset = self.stream.read_u32()?;
                self.read_list_payload(list, offset)
            }
            Node::SubTree(subtree) => {
                let record = subtree.resolved()?;
                Ok(Value::Record(self.read_record(record)?))
            }
        }
    }

    fn read_scalar(&mut self, kind: ScalarKind) -> CodecResult<Value> {
        Ok(match kind {
            ScalarKind::I32 => Value::I32(self.stream.read_i32()?),
            ScalarKind::U32 => Value::U32(self.stream.read_u32()?),
            ScalarKind::I64 => Value::I64(self.stream.read_i64()?),
            ScalarKind::F32 => Value::F32(self.stream.read_f32()?),
            ScalarKind::Identifier => Value::Identifier(self.stream.read_identifier()?),
        })
    }

    fn read_count(&mut self, width: CountWidth) -> CodecResult<u32> {
        Ok(match width {
            CountWidth::U8 => u32::from(self.stream.read_u8()?),
            CountWidth::U16 => u32::from(self.stream.read_u16()?),
            CountWidth::U32 => self.stream.read_u32()?,
        })
    }

    /// Offset 0 is a null list; it is only valid with a zero count.
    fn read_inline_list(&mut self, list: &ListNode, count: u32, offset: u32) -> CodecResult<Value> {
        if offset == 0 {
            if count == 0 {
                return Ok(Value::List(None));
            }
            return Err(self.invalid_offset(offset, count));
        }
        self.check_count(count)?;
        let stride = list.element().stride()?;
        self.check_extent(offset, count, u64::from(offset), stride)?;
        if count == 0 {
            return Ok(Value::List(Some(Vec::new())));
        }
        self.at(offset, |r| r.read_elements(list.element(), count))
            .map(|items| Value::List(Some(items)))
    }

    fn read_list_payload(&mut self, list: &ListNode, offset: u32) -> CodecResult<Value> {
        if offset == 0 {
            return Ok(Value::List(None));
        }
        if u64::from(offset) >= self.stream_len {
            return Err(self.invalid_offset(offset, 0));
        }
        let stride = list.element().stride()?;
        self.at(offset, |r| {
            let count = r.read_count(list.count_width())?;
            r.check_count(count)?;
            let start = r.stream.position();
            r.check_extent(offset, count, start, stride)?;
            r.read_elements(list.element(), count)
        })
        .map(|items| Value::List(Some(items)))
    }

    fn read_string_payload(&mut self, offset: u32) -> CodecResult<Value> {
        if offset == 0 {
            return Ok(Value::Str(None));
        }
        if u64::from(offset) >= self.stream_len {
            return Err(self.invalid_offset(offset, 0));
        }
        let strict = self.config.strict_terminators;
        self.at(offset, |r| {
            let len = r.stream.read_u8()?;
            let text = r.stream.read_ascii(usize::from(len))?;
            let terminator_at = r.stream.position();
            let terminator = r.stream.read_u8()?;
            if strict && terminator != 0 {
                return Err(CodecError::invalid_string(
                    terminator_at,
                    format!("terminator is {terminator:#04x}, expected 0"),
                ));
            }
            Ok(Value::Str(Some(text)))
        })
    }

    fn read_elements(&mut self, element: &Node, count: u32) -> CodecResult<Vec<Value>> {
        // count and extent are already bounded by the stream length
        let mut items = Vec::with_capacity(count as usize);
        for _ in 0..count {
            items.push(self.read_node(element)?);
        }
        Ok(items)
    }

    /// Runs `f` with the cursor at `offset`, then restores the cursor.
    fn at<T>(&mut self, offset: u32, f: impl FnOnce(&mut Self) -> CodecResult<T>) -> CodecResult<T> {
        let saved = self.stream.position();
        tracing::trace!(offset, saved, "seek to payload");
        self.stream.seek(u64::from(offset))?;
        let result = f(self);
        let restored = self.stream.seek(saved);
        let value = result?;
        restored?;
        Ok(value)
    }

    fn check_count(&self, count: u32) -> CodecResult<()> {
        if count > self.config.max_list_elements {
            return Err(CodecError::ListTooLong {
                count,
                max: self.config.max_list_elements,
            });
        }
        Ok(())
    }

    /// Elements must lie entirely inside the stream.
    fn check_extent(&self, offset: u32, count: u32, start: u64, stride: u32) -> CodecResult<()> {
        let end = start + u64::from(count) * u64::from(stride);
        if u64::from(offset) > self.stream_len || end > self.stream_len {
            return Err(self.invalid_offset(offset, count));
        }
        Ok(())
    }

    fn invalid_offset(&self, offset: u32, count: u32) -> CodecError {
        CodecError::InvalidOffset {
            offset,
            count,
            stream_len: self.stream_len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::Identifier;
    use gametable_stream::MemoryStream;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Tag {
        code: Identifier,
        weight: u32,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Entry {
        id: i32,
        tags: Vec<Tag>,
        label: Option<String>,
        extra: Option<Vec<i64>>,
    }

    crate::record_value!(Tag);

    fn entry_node() -> RecordNode {
        let tag = RecordNode::builder::<Tag>()
            .field("code", Node::IDENTIFIER, |t: &Tag| t.code, |t, v| t.code = v)
            .field("weight", Node::U32, |t: &Tag| t.weight, |t, v| t.weight = v)
            .build()
            .unwrap();
        RecordNode::builder::<Entry>()
            .field("id", Node::I32, |e: &Entry| e.id, |e, v| e.id = v)
            .field(
                "tags",
                Node::list(Node::record(tag)).unwrap(),
                |e: &Entry| e.tags.clone(),
                |e, v| e.tags = v,
            )
            .field("label", Node::STRING, |e: &Entry| e.label.clone(), |e, v| e.label = v)
            .field(
                "extra",
                Node::list_at_offset(Node::I64).unwrap(),
                |e: &Entry| e.extra.clone(),
                |e, v| e.extra = v,
            )
            .build()
            .unwrap()
    }

    fn read_entry(bytes: Vec<u8>, config: CodecConfig) -> CodecResult<(Entry, u64)> {
        let mut stream = MemoryStream::with_data(bytes);
        let mut reader = TableReader::new(&mut stream, config)?;
        let entry = *reader
            .read_record(&entry_node())?
            .downcast::<Entry>()
            .unwrap();
        Ok((entry, stream.position()))
    }

    /// id, tags(count, offset), label offset, extra offset
    fn fixed(id: i32, count: u32, tags_at: u32, label_at: u32, extra_at: u32) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&id.to_le_bytes());
        out.extend_from_slice(&count.to_le_bytes());
        out.extend_from_slice(&tags_at.to_le_bytes());
        out.extend_from_slice(&label_at.to_le_bytes());
        out.extend_from_slice(&extra_at.to_le_bytes());
        out
    }

    #[test]
    fn reads_payloads_and_restores_cursor() {
        let mut bytes = fixed(-7, 1, 20, 28, 32);
        bytes.extend_from_slice(b"ABCD");
        bytes.extend_from_slice(&9u32.to_le_bytes());
        bytes.extend_from_slice(&[2, b'h', b'i', 0]);
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&(-1i64).to_le_bytes());

        let (entry, position) = read_entry(bytes, CodecConfig::default()).unwrap();
        assert_eq!(position, 20);
        assert_eq!(entry.id, -7);
        assert_eq!(
            entry.tags,
            vec![Tag {
                code: Identifier::from_chars('A', 'B', 'C', 'D'),
                weight: 9
            }]
        );
        assert_eq!(entry.label.as_deref(), Some("hi"));
        assert_eq!(entry.extra, Some(vec![-1]));
    }

    #[test]
    fn zero_offsets_are_null() {
        let (entry, position) = read_entry(fixed(1, 0, 0, 0, 0), CodecConfig::default()).unwrap();
        assert_eq!(position, 20);
        assert!(entry.tags.is_empty());
        assert_eq!(entry.label, None);
        assert_eq!(entry.extra, None);
    }

    #[test]
    fn empty_list_with_offset_is_present() {
        let mut bytes = fixed(1, 0, 20, 0, 20);
        bytes.extend_from_slice(&0u32.to_le_bytes());
        let (entry, _) = read_entry(bytes, CodecConfig::default()).unwrap();
        assert_eq!(entry.extra, Some(Vec::new()));
    }

    #[test]
    fn zero_offset_with_count_is_invalid() {
        let err = read_entry(fixed(1, 3, 0, 0, 0), CodecConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidOffset {
                offset: 0,
                count: 3,
                ..
            }
        ));
    }

    #[test]
    fn offset_past_end_is_invalid() {
        let err = read_entry(fixed(1, 1, 400, 0, 0), CodecConfig::default()).unwrap_err();
        assert!(matches!(err, CodecError::InvalidOffset { offset: 400, .. }));

        let err = read_entry(fixed(1, 0, 0, 20, 0), CodecConfig::default()).unwrap_err();
        assert!(matches!(err, CodecError::InvalidOffset { offset: 20, .. }));
    }

    #[test]
    fn list_limit_is_enforced() {
        let mut bytes = fixed(1, 2, 20, 0, 0);
        bytes.extend_from_slice(&[0; 16]);
        let err = read_entry(bytes, CodecConfig::new().max_list_elements(1)).unwrap_err();
        assert!(matches!(err, CodecError::ListTooLong { count: 2, max: 1 }));
    }

    #[test]
    fn truncated_fixed_region() {
        let mut bytes = fixed(1, 0, 0, 0, 0);
        bytes.truncate(10);
        let err = read_entry(bytes, CodecConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            CodecError::TruncatedInput {
                offset: 8,
                need: 4,
                have: 2
            }
        ));
    }

    #[test]
    fn truncated_string_payload() {
        let mut bytes = fixed(1, 0, 0, 20, 0);
        bytes.extend_from_slice(&[5, b'a', b'b']);
        let err = read_entry(bytes, CodecConfig::default()).unwrap_err();
        assert!(matches!(err, CodecError::TruncatedInput { need: 5, have: 2, .. }));
    }

    #[test]
    fn terminator_checked_only_when_strict() {
        let mut bytes = fixed(1, 0, 0, 20, 0);
        bytes.extend_from_slice(&[1, b'x', 0xFF]);

        let (entry, _) = read_entry(bytes.clone(), CodecConfig::default()).unwrap();
        assert_eq!(entry.label.as_deref(), Some("x"));

        let err = read_entry(bytes, CodecConfig::new().strict_terminators(true)).unwrap_err();
        assert!(matches!(err, CodecError::InvalidString { offset: 22, .. }));
    }

    #[test]
    fn non_ascii_string_is_rejected() {
        let mut bytes = fixed(1, 0, 0, 20, 0);
        bytes.extend_from_slice(&[1, 0xE9, 0]);
        let err = read_entry(bytes, CodecConfig::default()).unwrap_err();
        assert!(matches!(err, CodecError::InvalidString { .. }));
    }
}
