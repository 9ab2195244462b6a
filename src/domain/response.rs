//! Response tree as delivered by the query collaborator.
//!
//! The navigator only reads these types. They carry serde derives so a
//! response can be loaded from a JSON dump and re-serialized for display;
//! field order below is the serialization order.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Query response: the top-level result nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub n: Vec<Node>,
}

/// One node of the response tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Role of this node under its parent, e.g. "follows"
    #[serde(default)]
    pub attribute: String,
    /// Numeric identifier, if the query asked for it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<u64>,
    /// External identifier string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xid: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Property>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

/// Named scalar attached to a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub prop: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Typed scalar. Exactly one variant is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Untyped value, stored as its string form
    #[serde(rename = "default_val")]
    Default(String),
    #[serde(rename = "str_val")]
    Str(String),
    #[serde(rename = "bytes_val", with = "base64_bytes")]
    Bytes(Vec<u8>),
    #[serde(rename = "int_val")]
    Int(i64),
    #[serde(rename = "bool_val")]
    Bool(bool),
    /// NaN and infinities travel as strings, like the protobuf JSON mapping
    #[serde(rename = "double_val", with = "double")]
    Double(f64),
    /// Well-Known-Binary geometry
    #[serde(rename = "geo_val", with = "base64_bytes")]
    Geo(Vec<u8>),
    /// Binary timestamp, see [`crate::domain::timestamp`]
    #[serde(rename = "date_val", with = "base64_bytes")]
    Date(Vec<u8>),
    #[serde(rename = "datetime_val", with = "base64_bytes")]
    DateTime(Vec<u8>),
    #[serde(rename = "password_val")]
    Password(String),
    #[serde(rename = "uid_val")]
    Uid(u64),
}

impl Value {
    /// Variant name as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Default(_) => "default_val",
            Value::Str(_) => "str_val",
            Value::Bytes(_) => "bytes_val",
            Value::Int(_) => "int_val",
            Value::Bool(_) => "bool_val",
            Value::Double(_) => "double_val",
            Value::Geo(_) => "geo_val",
            Value::Date(_) => "date_val",
            Value::DateTime(_) => "datetime_val",
            Value::Password(_) => "password_val",
            Value::Uid(_) => "uid_val",
        }
    }
}

impl Node {
    /// First property named `name`.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.prop == name)
    }

    #[instrument(level = "trace", skip(self), fields(attribute = %self.attribute))]
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|child| child.depth())
            .max()
            .unwrap_or(0)
    }

    /// Pre-order, left-to-right walk over this node and its descendants.
    pub fn iter(&self) -> NodeIter<'_> {
        NodeIter { stack: vec![self] }
    }
}

pub struct NodeIter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        for child in current.children.iter().rev() {
            self.stack.push(child);
        }
        Some(current)
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

mod double {
    use serde::{Deserialize, Deserializer, Serializer};

    const NAN: &str = "NaN";
    const INFINITY: &str = "Infinity";
    const NEG_INFINITY: &str = "-Infinity";

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str(NAN)
        } else if value.is_sign_positive() {
            serializer.serialize_str(INFINITY)
        } else {
            serializer.serialize_str(NEG_INFINITY)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Ok(n),
            Repr::Text(t) => match t.as_str() {
                NAN => Ok(f64::NAN),
                INFINITY => Ok(f64::INFINITY),
                NEG_INFINITY => Ok(f64::NEG_INFINITY),
                other => Err(serde::de::Error::custom(format!(
                    "invalid double_val '{other}'"
                ))),
            },
        }
    }
}
