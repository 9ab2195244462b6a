use termtree::Tree;
use tracing::instrument;

use crate::domain::{Node, NodeView, ScalarView, Value};

/// Rendering as a `termtree` for terminal display.
pub trait TreeDisplay {
    /// `label_props` names the properties shown next to each node.
    fn to_tree_string(&self, label_props: &[String]) -> Tree<String>;
}

impl TreeDisplay for Node {
    #[instrument(level = "trace", skip_all, fields(attribute = %self.attribute))]
    fn to_tree_string(&self, label_props: &[String]) -> Tree<String> {
        let leaves: Vec<_> = self
            .children
            .iter()
            .map(|c| c.to_tree_string(label_props))
            .collect();

        Tree::new(node_label(self, label_props)).with_leaves(leaves)
    }
}

impl TreeDisplay for NodeView<'_> {
    fn to_tree_string(&self, label_props: &[String]) -> Tree<String> {
        if self.is_absent() {
            return Tree::new("<absent>".to_string());
        }
        let leaves: Vec<_> = self
            .nodes()
            .iter()
            .map(|n| n.to_tree_string(label_props))
            .collect();
        Tree::new(format!("<focus: {}>", self.len())).with_leaves(leaves)
    }
}

fn node_label(node: &Node, label_props: &[String]) -> String {
    let mut label = node.attribute.clone();
    if let Some(uid) = node.uid {
        label.push_str(&format!(" <{uid:#x}>"));
    }
    for name in label_props {
        if let Some(p) = node.property(name) {
            let value = ScalarView::new(p.value.as_ref());
            label.push_str(&format!(" {name}={}", short_value(&value)));
        }
    }
    label
}

fn short_value(value: &ScalarView<'_>) -> String {
    match value.value() {
        None => "-".to_string(),
        Some(Value::Str(_) | Value::Default(_)) => value.to_string_value(),
        Some(Value::Int(i)) => i.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Double(d)) => d.to_string(),
        Some(Value::Uid(u)) => format!("{u:#x}"),
        Some(Value::Date(_)) => value.to_date().to_rfc3339(),
        Some(Value::DateTime(_)) => value.to_datetime().to_rfc3339(),
        Some(Value::Geo(_)) => value
            .to_geometry()
            .map(|g| g.to_string())
            .unwrap_or_else(|| "<invalid geo>".to_string()),
        Some(Value::Password(_)) => "***".to_string(),
        Some(Value::Bytes(b)) => format!("<{} bytes>", b.len()),
    }
}
