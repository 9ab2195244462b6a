//! Fluent construction of response trees.

use chrono::{DateTime, FixedOffset};

use crate::domain::response::{Node, Property, Response, Value};
use crate::domain::timestamp;

#[derive(Debug, Clone, Default)]
pub struct NodeBuilder {
    node: Node,
}

impl NodeBuilder {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            node: Node {
                attribute: attribute.into(),
                ..Default::default()
            },
        }
    }

    pub fn uid(mut self, uid: u64) -> Self {
        self.node.uid = Some(uid);
        self
    }

    pub fn xid(mut self, xid: impl Into<String>) -> Self {
        self.node.xid = Some(xid.into());
        self
    }

    /// Adds a property; `None` records the name without a value.
    pub fn value(mut self, prop: impl Into<String>, value: Option<Value>) -> Self {
        self.node.properties.push(Property {
            prop: prop.into(),
            value,
        });
        self
    }

    pub fn str(self, prop: impl Into<String>, v: impl Into<String>) -> Self {
        self.value(prop, Some(Value::Str(v.into())))
    }

    pub fn default_value(self, prop: impl Into<String>, v: impl Into<String>) -> Self {
        self.value(prop, Some(Value::Default(v.into())))
    }

    pub fn bytes(self, prop: impl Into<String>, v: impl Into<Vec<u8>>) -> Self {
        self.value(prop, Some(Value::Bytes(v.into())))
    }

    pub fn int(self, prop: impl Into<String>, v: i64) -> Self {
        self.value(prop, Some(Value::Int(v)))
    }

    pub fn bool(self, prop: impl Into<String>, v: bool) -> Self {
        self.value(prop, Some(Value::Bool(v)))
    }

    pub fn float(self, prop: impl Into<String>, v: f64) -> Self {
        self.value(prop, Some(Value::Double(v)))
    }

    /// Geometry as Well-Known-Binary.
    pub fn geo(self, prop: impl Into<String>, wkb: impl Into<Vec<u8>>) -> Self {
        self.value(prop, Some(Value::Geo(wkb.into())))
    }

    pub fn date(self, prop: impl Into<String>, v: &DateTime<FixedOffset>) -> Self {
        self.value(prop, Some(Value::Date(timestamp::encode(v))))
    }

    pub fn datetime(self, prop: impl Into<String>, v: &DateTime<FixedOffset>) -> Self {
        self.value(prop, Some(Value::DateTime(timestamp::encode(v))))
    }

    pub fn password(self, prop: impl Into<String>, v: impl Into<String>) -> Self {
        self.value(prop, Some(Value::Password(v.into())))
    }

    pub fn uid_value(self, prop: impl Into<String>, v: u64) -> Self {
        self.value(prop, Some(Value::Uid(v)))
    }

    pub fn child(mut self, child: NodeBuilder) -> Self {
        self.node.children.push(child.build());
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = NodeBuilder>) -> Self {
        self.node
            .children
            .extend(children.into_iter().map(NodeBuilder::build));
        self
    }

    pub fn build(self) -> Node {
        self.node
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResponseBuilder {
    nodes: Vec<Node>,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(mut self, node: NodeBuilder) -> Self {
        self.nodes.push(node.build());
        self
    }

    pub fn build(self) -> Response {
        Response { n: self.nodes }
    }
}
