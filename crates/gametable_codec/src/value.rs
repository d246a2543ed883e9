//! Dynamic values passed between edges and the reader/writer.

use std::any::{Any, TypeId};
use std::fmt;

use crate::error::{CodecError, CodecResult};
use crate::identifier::Identifier;
use crate::node::ScalarKind;

/// A decoded or to-be-encoded field value.
///
/// Records travel as boxed instances of their Rust type; the edges of the
/// record's node know how to downcast them.
pub enum Value {
    /// 32-bit signed integer.
    I32(i32),
    /// 32-bit unsigned integer.
    U32(u32),
    /// 64-bit signed integer.
    I64(i64),
    /// 32-bit IEEE-754 float.
    F32(f32),
    /// Packed 4-character code.
    Identifier(Identifier),
    /// Offset-referenced ASCII string; `None` is a null string.
    Str(Option<String>),
    /// List elements; `None` is a null list, distinct from an empty one.
    List(Option<Vec<Value>>),
    /// A record instance.
    Record(Box<dyn Any + Send>),
}

impl Value {
    /// Short name of this value's kind, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::I32(_) => "i32",
            Value::U32(_) => "u32",
            Value::I64(_) => "i64",
            Value::F32(_) => "f32",
            Value::Identifier(_) => "identifier",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Record(_) => "record",
        }
    }

    /// Unwraps a string value.
    pub fn into_str(self) -> CodecResult<Option<String>> {
        match self {
            Value::Str(s) => Ok(s),
            other => Err(mismatch("string", &other)),
        }
    }

    /// Unwraps a list value.
    pub fn into_list(self) -> CodecResult<Option<Vec<Value>>> {
        match self {
            Value::List(items) => Ok(items),
            other => Err(mismatch("list", &other)),
        }
    }

    /// Unwraps a record value without checking its type.
    pub fn into_record_box(self) -> CodecResult<Box<dyn Any + Send>> {
        match self {
            Value::Record(instance) => Ok(instance),
            other => Err(mismatch("record", &other)),
        }
    }

    /// Unwraps a record value of type `T`.
    pub fn into_record<T: Any>(self) -> CodecResult<T> {
        self.into_record_box()?
            .downcast::<T>()
            .map(|instance| *instance)
            .map_err(|_| {
                CodecError::invalid_argument(format!(
                    "record is not a {}",
                    std::any::type_name::<T>()
                ))
            })
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::I32(v) => f.debug_tuple("I32").field(v).finish(),
            Value::U32(v) => f.debug_tuple("U32").field(v).finish(),
            Value::I64(v) => f.debug_tuple("I64").field(v).finish(),
            Value::F32(v) => f.debug_tuple("F32").field(v).finish(),
            Value::Identifier(v) => f.debug_tuple("Identifier").field(v).finish(),
            Value::Str(v) => f.debug_tuple("Str").field(v).finish(),
            Value::List(v) => f.debug_tuple("List").field(v).finish(),
            Value::Record(_) => f.write_str("Record(..)"),
        }
    }
}

fn mismatch(expected: &str, found: &Value) -> CodecError {
    CodecError::invalid_argument(format!(
        "expected a {expected} value, found {}",
        found.kind_name()
    ))
}

/// The shape a field type or node has, used to match edges against nodes
/// when a schema is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldShape {
    /// A fixed-width scalar.
    Scalar(ScalarKind),
    /// An offset-referenced string.
    Str,
    /// A list (inline or at an offset) of the given element shape.
    List(Box<FieldShape>),
    /// A record of the given Rust type.
    Record {
        /// Type of the record.
        type_id: TypeId,
        /// Name of the record type.
        type_name: &'static str,
    },
}

impl FieldShape {
    /// The shape of record type `T`.
    pub fn record<T: Any>() -> Self {
        FieldShape::Record {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }
}

impl fmt::Display for FieldShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldShape::Scalar(kind) => write!(f, "{kind}"),
            FieldShape::Str => f.write_str("string"),
            FieldShape::List(element) => write!(f, "list of {element}"),
            FieldShape::Record { type_name, .. } => write!(f, "record {type_name}"),
        }
    }
}

/// A Rust type that can sit behind an edge.
///
/// Implemented for the scalar types, `Identifier`, `String`,
/// `Option<String>`, `Vec<T>` and `Option<Vec<T>>`. Record types implement it
/// through [`record_value!`](crate::record_value).
pub trait FieldValue: Sized + Send + 'static {
    /// Shape a node must have to carry this type.
    fn shape() -> FieldShape;

    /// Converts into a dynamic value.
    fn into_value(self) -> Value;

    /// Converts back from a dynamic value.
    fn from_value(value: Value) -> CodecResult<Self>;
}

macro_rules! scalar_field_value {
    ($($ty:ty => $variant:ident),+ $(,)?) => {$(
        impl FieldValue for $ty {
            fn shape() -> FieldShape {
                FieldShape::Scalar(ScalarKind::$variant)
            }

            fn into_value(self) -> Value {
                Value::$variant(self)
            }

            fn from_value(value: Value) -> CodecResult<Self> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(mismatch(stringify!($ty), &other)),
                }
            }
        }
    )+};
}

scalar_field_value! {
    i32 => I32,
    u32 => U32,
    i64 => I64,
    f32 => F32,
    Identifier => Identifier,
}

/// A null string reads back as an empty `String`.
impl FieldValue for String {
    fn shape() -> FieldShape {
        FieldShape::Str
    }

    fn into_value(self) -> Value {
        Value::Str(Some(self))
    }

    fn from_value(value: Value) -> CodecResult<Self> {
        Ok(value.into_str()?.unwrap_or_default())
    }
}

impl FieldValue for Option<String> {
    fn shape() -> FieldShape {
        FieldShape::Str
    }

    fn into_value(self) -> Value {
        Value::Str(self)
    }

    fn from_value(value: Value) -> CodecResult<Self> {
        value.into_str()
    }
}

/// A null list reads back as an empty `Vec`.
impl<T: FieldValue> FieldValue for Vec<T> {
    fn shape() -> FieldShape {
        FieldShape::List(Box::new(T::shape()))
    }

    fn into_value(self) -> Value {
        Value::List(Some(self.into_iter().map(FieldValue::into_value).collect()))
    }

    fn from_value(value: Value) -> CodecResult<Self> {
        match value.into_list()? {
            Some(items) => items.into_iter().map(T::from_value).collect(),
            None => Ok(Vec::new()),
        }
    }
}

impl<T: FieldValue> FieldValue for Option<Vec<T>> {
    fn shape() -> FieldShape {
        FieldShape::List(Box::new(T::shape()))
    }

    fn into_value(self) -> Value {
        Value::List(self.map(|items| items.into_iter().map(FieldValue::into_value).collect()))
    }

    fn from_value(value: Value) -> CodecResult<Self> {
        value
            .into_list()?
            .map(|items| {
                items
                    .into_iter()
                    .map(T::from_value)
                    .collect::<CodecResult<Vec<T>>>()
            })
            .transpose()
    }
}

/// Implements [`FieldValue`] for record types so they can be nested inside
/// other records or used as list elements.
///
/// ```
/// use gametable_codec::record_value;
///
/// #[derive(Debug, Clone, Default)]
/// struct Waypoint {
///     x: f32,
///     y: f32,
/// }
///
/// record_value!(Waypoint);
/// ```
#[macro_export]
macro_rules! record_value {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::FieldValue for $ty {
            fn shape() -> $crate::FieldShape {
                $crate::FieldShape::record::<$ty>()
            }

            fn into_value(self) -> $crate::Value {
                $crate::Value::Record(::std::boxed::Box::new(self))
            }

            fn from_value(value: $crate::Value) -> $crate::CodecResult<Self> {
                value.into_record::<$ty>()
            }
        }
    )+};
}
