//! Slash-separated navigation paths, e.g. `me/follows` or `*/follows/plays`.
//!
//! `*` steps to the first child ([`NodeView::first`]); any other segment is
//! an attribute name ([`NodeView::attribute`]).

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use itertools::Itertools;
use regex::Regex;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{NodeView, Response};

const FIRST: &str = "*";

fn segment_regex() -> &'static Regex {
    static SEGMENT: OnceLock<Regex> = OnceLock::new();
    SEGMENT.get_or_init(|| Regex::new(r"^[^\s/*]+$").expect("segment pattern is valid"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    First,
    Attribute(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePath {
    steps: Vec<Step>,
}

impl NodePath {
    /// An empty or all-slash input is the root path.
    pub fn parse(input: &str) -> ApplicationResult<Self> {
        let trimmed = input.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        let steps = trimmed
            .split('/')
            .map(|segment| {
                if segment == FIRST {
                    Ok(Step::First)
                } else if segment_regex().is_match(segment) {
                    Ok(Step::Attribute(segment.to_string()))
                } else {
                    Err(ApplicationError::InvalidPath {
                        path: input.to_string(),
                        reason: format!("invalid segment '{segment}'"),
                    })
                }
            })
            .collect::<ApplicationResult<Vec<_>>>()?;
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Apply every step to `view`.
    pub fn apply<'a>(&self, view: NodeView<'a>) -> NodeView<'a> {
        self.steps.iter().fold(view, |current, step| match step {
            Step::First => current.first(),
            Step::Attribute(name) => current.attribute(name),
        })
    }

    /// Navigate from the response root.
    #[instrument(level = "debug", skip(response), fields(path = %self))]
    pub fn resolve<'a>(&self, response: &'a Response) -> NodeView<'a> {
        let view = self.apply(NodeView::from_root(response));
        debug!(focus = view.len(), "resolved");
        view
    }
}

impl FromStr for NodePath {
    type Err = ApplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .steps
            .iter()
            .map(|step| match step {
                Step::First => FIRST,
                Step::Attribute(name) => name.as_str(),
            })
            .join("/");
        write!(f, "/{rendered}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NodeBuilder, ResponseBuilder};
    use rstest::rstest;

    #[rstest]
    #[case("", vec![])]
    #[case("/", vec![])]
    #[case("me", vec![Step::Attribute("me".into())])]
    #[case("/me/follows/", vec![Step::Attribute("me".into()), Step::Attribute("follows".into())])]
    #[case("*/dgraph.type", vec![Step::First, Step::Attribute("dgraph.type".into())])]
    fn test_parse(#[case] input: &str, #[case] expected: Vec<Step>) {
        assert_eq!(NodePath::parse(input).unwrap().steps(), expected.as_slice());
    }

    #[rstest]
    #[case("me//follows")]
    #[case("me/fol lows")]
    #[case("me/**")]
    fn test_parse_rejects(#[case] input: &str) {
        assert!(matches!(
            NodePath::parse(input),
            Err(ApplicationError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_display() {
        let path: NodePath = "me/*/plays".parse().unwrap();
        assert_eq!(path.to_string(), "/me/*/plays");
        assert_eq!(NodePath::default().to_string(), "/");
    }

    #[test]
    fn test_resolve() {
        let response = ResponseBuilder::new()
            .node(
                NodeBuilder::new("_root_").child(
                    NodeBuilder::new("me")
                        .child(NodeBuilder::new("follows").str("name", "Bob"))
                        .child(NodeBuilder::new("follows").str("name", "Eve")),
                ),
            )
            .build();

        let follows = NodePath::parse("me/follows").unwrap().resolve(&response);
        assert_eq!(follows.len(), 2);
        let first = NodePath::parse("*/*").unwrap().resolve(&response);
        assert_eq!(first.property("name").to_string_value(), "Bob");
        assert!(NodePath::parse("me/address").unwrap().resolve(&response).is_absent());
    }
}
