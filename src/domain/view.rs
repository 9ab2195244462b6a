use std::fmt;
use std::{iter, slice};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::{instrument, trace, warn};

use crate::domain::response::{Node, Response};
use crate::domain::scalar::ScalarView;

const DEFAULT_INDENT: usize = 4;

/// Immutable view over zero or more nodes of a response tree (the focus).
///
/// Every navigation step returns a new view; nothing is ever mutated and
/// "not found" is an empty view rather than an error.
///
/// Two traversal modes coexist:
/// - first-only: [`first`](Self::first), [`property`](Self::property),
///   [`uid`](Self::uid) and [`xid`](Self::xid) look at the first focused node
/// - fan-out: [`attribute`](Self::attribute), [`properties`](Self::properties),
///   [`each`](Self::each) and [`iter`](Self::iter) cover every focused node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeView<'a> {
    nodes: Vec<&'a Node>,
}

impl<'a> NodeView<'a> {
    /// View over the first top-level node; empty if the response has none.
    #[instrument(level = "trace", skip(response), fields(top_level = response.n.len()))]
    pub fn from_root(response: &'a Response) -> Self {
        match response.n.first() {
            Some(root) => Self { nodes: vec![root] },
            None => {
                warn!("response has no top-level nodes");
                Self::default()
            }
        }
    }

    pub fn from_nodes(nodes: Vec<&'a Node>) -> Self {
        Self { nodes }
    }

    fn single(node: &'a Node) -> Self {
        Self { nodes: vec![node] }
    }

    /// First child of the first focused node.
    pub fn first(&self) -> Self {
        self.nodes
            .first()
            .copied()
            .and_then(|n| n.children.first())
            .map(Self::single)
            .unwrap_or_default()
    }

    /// All children named `name`, across every focused node, in focus order
    /// then child order.
    #[instrument(level = "trace", skip(self), fields(focus = self.nodes.len()))]
    pub fn attribute(&self, name: &str) -> Self {
        let nodes: Vec<&'a Node> = self
            .nodes
            .iter()
            .copied()
            .flat_map(|n| n.children.iter().filter(move |c| c.attribute == name))
            .collect();
        trace!(matched = nodes.len());
        Self { nodes }
    }

    /// First property named `name` on the first focused node.
    pub fn property(&self, name: &str) -> ScalarView<'a> {
        self.nodes
            .first()
            .copied()
            .and_then(|n| n.property(name))
            .map(|p| ScalarView::new(p.value.as_ref()))
            .unwrap_or_default()
    }

    /// Property named `name` from every focused node that has one.
    pub fn properties(&self, name: &str) -> Vec<ScalarView<'a>> {
        self.nodes
            .iter()
            .copied()
            .filter_map(|n| n.property(name))
            .map(|p| ScalarView::new(p.value.as_ref()))
            .collect()
    }

    /// Calls `visit` with a single-node view for each focused node, in order.
    pub fn each<F>(&self, mut visit: F)
    where
        F: FnMut(NodeView<'a>),
    {
        for &node in &self.nodes {
            visit(Self::single(node));
        }
    }

    /// Like [`each`](Self::each), stopping at the first error and returning it.
    pub fn try_each<F, E>(&self, mut visit: F) -> Result<(), E>
    where
        F: FnMut(NodeView<'a>) -> Result<(), E>,
    {
        for &node in &self.nodes {
            visit(Self::single(node))?;
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeView<'a>> + '_ {
        self.nodes.iter().copied().map(Self::single)
    }

    pub fn is_absent(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.is_absent()
    }

    pub fn nodes(&self) -> &[&'a Node] {
        &self.nodes
    }

    pub fn uid(&self) -> Option<u64> {
        self.nodes.first().and_then(|n| n.uid)
    }

    pub fn xid(&self) -> Option<&'a str> {
        self.nodes.first().copied().and_then(|n| n.xid.as_deref())
    }

    /// Focus as pretty-printed JSON; empty string for an empty focus.
    pub fn to_json(&self) -> String {
        self.to_json_with_indent(DEFAULT_INDENT)
    }

    pub fn to_json_with_indent(&self, indent: usize) -> String {
        if self.nodes.is_empty() {
            return String::new();
        }
        let indent = " ".repeat(indent);
        let mut out = Vec::new();
        let mut serializer =
            Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(indent.as_bytes()));
        match self.nodes.serialize(&mut serializer) {
            Ok(()) => String::from_utf8(out).unwrap_or_default(),
            Err(e) => {
                warn!("cannot serialize focus: {e}");
                String::new()
            }
        }
    }
}

impl<'a, 'v> IntoIterator for &'v NodeView<'a> {
    type Item = NodeView<'a>;
    type IntoIter =
        iter::Map<iter::Copied<slice::Iter<'v, &'a Node>>, fn(&'a Node) -> NodeView<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes
            .iter()
            .copied()
            .map(NodeView::single as fn(&'a Node) -> NodeView<'a>)
    }
}

impl fmt::Display for NodeView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::builder::{NodeBuilder, ResponseBuilder};

    fn clara() -> Response {
        ResponseBuilder::new()
            .node(
                NodeBuilder::new("_root_").child(
                    NodeBuilder::new("me")
                        .uid(0x1)
                        .str("name", "Clara")
                        .child(NodeBuilder::new("follows").uid(0x2).str("name", "Bob"))
                        .child(NodeBuilder::new("follows").uid(0x3).str("name", "Eve")),
                ),
            )
            .build()
    }

    #[test]
    fn test_empty_response_is_absent() {
        let response = Response::default();
        let view = NodeView::from_root(&response);
        assert!(view.is_absent());
        assert!(view.first().is_absent());
        assert!(view.attribute("me").is_absent());
        assert!(view.property("name").is_absent());
        assert!(view.properties("name").is_empty());
        assert_eq!(view.uid(), None);
        assert_eq!(view.to_json(), "");
    }

    #[test]
    fn test_first_only_looks_at_first_node() {
        let response = clara();
        let root = NodeView::from_root(&response);
        let follows = root.first().attribute("follows");
        assert_eq!(follows.len(), 2);
        assert_eq!(follows.property("name").to_string_value(), "Bob");
        assert_eq!(follows.uid(), Some(0x2));
        assert!(follows.first().is_absent());
    }

    #[test]
    fn test_iter_matches_each() {
        let response = clara();
        let follows = NodeView::from_root(&response).first().attribute("follows");
        let mut visited = Vec::new();
        follows.each(|v| visited.push(v.uid()));
        let iterated: Vec<_> = follows.iter().map(|v| v.uid()).collect();
        assert_eq!(visited, iterated);
        assert_eq!(visited, vec![Some(0x2), Some(0x3)]);
        assert_eq!((&follows).into_iter().count(), 2);
    }

    #[test]
    fn test_try_each_stops_on_error() {
        let response = clara();
        let follows = NodeView::from_root(&response).first().attribute("follows");
        let mut seen = 0;
        let result: Result<(), String> = follows.try_each(|v| {
            seen += 1;
            Err(v.property("name").to_string_value())
        });
        assert_eq!(result, Err("Bob".to_string()));
        assert_eq!(seen, 1);
    }

    #[test]
    fn test_json_indent() {
        let response = clara();
        let me = NodeView::from_root(&response).first();
        let json = me.to_json();
        assert!(json.starts_with("[\n    {\n        \"attribute\": \"me\""));
        let compact = me.to_json_with_indent(2);
        assert!(compact.starts_with("[\n  {\n    \"attribute\""));
        assert_eq!(me.to_string(), json);
    }

    #[test]
    fn test_json_round_trips_non_finite_doubles() {
        let response = ResponseBuilder::new()
            .node(
                NodeBuilder::new("_root_").child(
                    NodeBuilder::new("me")
                        .float("score", f64::NAN)
                        .float("ceiling", f64::INFINITY),
                ),
            )
            .build();
        let me = NodeView::from_root(&response).first();

        let json = me.to_json();
        assert!(json.contains(r#""double_val": "NaN""#));
        let back: Vec<Node> = serde_json::from_str(&json).unwrap();
        let view = NodeView::from_nodes(back.iter().collect());
        assert!(view.property("score").to_float().is_nan());
        assert_eq!(view.property("ceiling").to_float(), f64::INFINITY);
    }
}
