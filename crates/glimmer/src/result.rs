use std::sync::Arc;

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::{compile::Grammar, compile::RuleId, error::HighlightError, tree::Scope};

/// Why a scan gave up on classifying its input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IllegalBy {
    pub message: String,
    /// Up to 100 bytes of input on either side of the offending position.
    pub context: String,
    /// Scope of the rule which was active, if it had one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

/// An open rule of a scan.
#[derive(Clone, Debug)]
pub(crate) struct Frame {
    pub rule: RuleId,
    /// Set for rules which end on their own begin lexeme.
    pub end_override: Option<Regex>,
    /// First capture group of the begin match, when the end is guarded by it.
    pub begin_capture: Option<String>,
}

impl Frame {
    pub fn new(rule: RuleId) -> Frame {
        Frame {
            rule,
            end_override: None,
            begin_capture: None,
        }
    }
}

/// The rule stack a scan ended in. Passing it to the next scan of the same
/// language continues inside whatever was left open.
#[derive(Clone, Debug)]
pub struct Continuation {
    pub(crate) grammar: Arc<Grammar>,
    pub(crate) frames: Vec<Frame>,
}

impl Continuation {
    pub fn language(&self) -> &str {
        &self.grammar.name
    }

    /// Number of rules open, not counting the language's top level.
    pub fn depth(&self) -> usize {
        self.frames.len().saturating_sub(1)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct HighlightResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub relevance: u32,
    /// The rendered markup.
    pub value: String,
    pub illegal: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub illegal_by: Option<IllegalBy>,
    /// Internal fault swallowed in safe mode.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_error"
    )]
    pub error_raised: Option<HighlightError>,
    pub tree: Scope,
    #[serde(skip)]
    pub top: Option<Continuation>,
    /// Runner up of auto-detection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_best: Option<Box<HighlightResult>>,
}

impl HighlightResult {
    /// The whole input as a single unclassified leaf.
    pub(crate) fn plain(code: &str, language: Option<String>) -> HighlightResult {
        HighlightResult {
            language,
            relevance: 0,
            value: crate::render::escape_html(code),
            illegal: false,
            illegal_by: None,
            error_raised: None,
            tree: Scope::text_leaf(code),
            top: None,
            second_best: None,
        }
    }

    pub fn second_best(&self) -> Option<&HighlightResult> {
        self.second_best.as_deref()
    }
}

fn serialize_error<S: Serializer>(
    error: &Option<HighlightError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match error {
        Some(error) => serializer.serialize_str(&error.to_string()),
        None => serializer.serialize_none(),
    }
}
