//! Edges bind a parent record's field to its child node.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::{CodecError, CodecResult};
use crate::node::Node;
use crate::value::{FieldValue, Value};

type Getter = Arc<dyn Fn(&dyn Any) -> CodecResult<Value> + Send + Sync>;
type Setter = Arc<dyn Fn(&mut dyn Any, Value) -> CodecResult<()> + Send + Sync>;

/// A field name, its child node and the accessor pair that moves values
/// between a parent instance and the codec.
#[derive(Clone)]
pub struct Edge {
    name: &'static str,
    node: Node,
    get: Getter,
    set: Setter,
}

impl Edge {
    /// Creates an edge from typed accessors on parent type `P`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSchema` if `node` cannot carry values of type `V`.
    pub fn new<P, V, G, S>(name: &'static str, node: Node, get: G, set: S) -> CodecResult<Self>
    where
        P: Any,
        V: FieldValue,
        G: Fn(&P) -> V + Send + Sync + 'static,
        S: Fn(&mut P, V) + Send + Sync + 'static,
    {
        let expected = V::shape();
        let actual = node.shape();
        if expected != actual {
            return Err(CodecError::invalid_schema(format!(
                "{}.{name}: field holds {expected} but node is {actual}",
                std::any::type_name::<P>()
            )));
        }

        let get: Getter = Arc::new(move |parent: &dyn Any| {
            let parent = parent
                .downcast_ref::<P>()
                .ok_or_else(|| wrong_parent::<P>(name))?;
            Ok(get(parent).into_value())
        });
        let set: Setter = Arc::new(move |parent: &mut dyn Any, value: Value| {
            let parent = parent
                .downcast_mut::<P>()
                .ok_or_else(|| wrong_parent::<P>(name))?;
            set(parent, V::from_value(value)?);
            Ok(())
        });

        Ok(Self {
            name,
            node,
            get,
            set,
        })
    }

    /// The field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The child node.
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Reads the field from `parent`.
    pub fn get(&self, parent: &dyn Any) -> CodecResult<Value> {
        (self.get)(parent)
    }

    /// Stores `value` into the field of `parent`.
    pub fn set(&self, parent: &mut dyn Any, value: Value) -> CodecResult<()> {
        (self.set)(parent, value)
    }
}

fn wrong_parent<P: Any>(field: &str) -> CodecError {
    CodecError::invalid_argument(format!(
        "edge '{field}' expects a {} instance",
        std::any::type_name::<P>()
    ))
}

impl fmt::Debug for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Edge")
            .field("name", &self.name)
            .field("node", &self.node)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::Identifier;

    #[derive(Debug, Default, PartialEq)]
    struct Actor {
        id: Identifier,
        name: String,
    }

    fn name_edge() -> Edge {
        Edge::new(
            "name",
            Node::STRING,
            |a: &Actor| a.name.clone(),
            |a, v| a.name = v,
        )
        .unwrap()
    }

    #[test]
    fn get_then_set_round_trips() {
        let edge = name_edge();
        let mut actor = Actor {
            id: Identifier::from_int(1),
            name: "Bastila".into(),
        };

        let value = edge.get(&actor).unwrap();
        edge.set(&mut actor, value).unwrap();
        assert_eq!(actor.name, "Bastila");
        assert_eq!(actor.id, Identifier::from_int(1));
    }

    #[test]
    fn wrong_parent_type_is_invalid_argument() {
        let edge = name_edge();
        let err = edge.get(&42u32).unwrap_err();
        assert!(matches!(err, CodecError::InvalidArgument { .. }));
    }

    #[test]
    fn wrong_value_kind_is_invalid_argument() {
        let edge = name_edge();
        let mut actor = Actor::default();
        let err = edge.set(&mut actor, Value::U32(3)).unwrap_err();
        assert!(matches!(err, CodecError::InvalidArgument { .. }));
    }

    #[test]
    fn node_shape_must_match_field_type() {
        let err = Edge::new("id", Node::U32, |a: &Actor| a.id, |a, v| a.id = v).unwrap_err();
        assert!(matches!(err, CodecError::InvalidSchema { .. }));
        assert!(err.to_string().contains("identifier"));
    }
}
