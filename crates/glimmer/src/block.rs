//! Highlighting of markup blocks, such as the contents of a `<pre><code>`
//! element, without needing a DOM.

use lazy_static::lazy_static;
use log::warn;
use regex::Regex;
use serde::Serialize;

use crate::{
    error::HighlightError,
    highlighter::Highlighter,
    merge::{merge_streams, NodeStream},
    plugin::BlockContext,
    render::fix_markup,
};

lazy_static! {
    static ref BR_TAG: Regex = Regex::new(r"<br[ /]*>").unwrap();
    static ref HLJS_CLASS: Regex = Regex::new(r"\bhljs\b").unwrap();
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Guess {
    pub language: Option<String>,
    pub relevance: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct HighlightedBlock {
    /// New inner markup of the block.
    pub value: String,
    /// New class attribute of the block.
    pub class_name: String,
    pub language: Option<String>,
    pub relevance: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_best: Option<Guess>,
}

impl Highlighter {
    /// The language a block asks for through its classes, or the classes of
    /// its parent element.
    pub fn block_language(
        &self,
        class_name: &str,
        parent_class_name: Option<&str>,
    ) -> Option<String> {
        let classes = format!("{class_name} {}", parent_class_name.unwrap_or_default());

        if let Some(captures) = self.options().language_detect.captures(&classes) {
            let name = &captures[1];
            if self.get_language(name).is_some() {
                return Some(name.to_owned());
            }
            warn!(
                "could not find the language `{name}`, \
                 falling back to no-highlight mode for this block"
            );
            return Some("no-highlight".to_owned());
        }

        classes
            .split_whitespace()
            .find(|class| {
                self.options().is_no_highlight(class) || self.get_language(class).is_some()
            })
            .map(str::to_owned)
    }

    /// Highlights a block given its class attribute and inner markup. Markup
    /// already present is kept, highlighted spans are split around it.
    ///
    /// Returns `None` for blocks which opt out of highlighting.
    pub fn highlight_block(
        &self,
        class_name: &str,
        parent_class_name: Option<&str>,
        inner_markup: &str,
    ) -> Result<Option<HighlightedBlock>, HighlightError> {
        let options = self.options();
        let language = self.block_language(class_name, parent_class_name);
        if language.as_deref().is_some_and(|l| options.is_no_highlight(l)) {
            return Ok(None);
        }

        let context = BlockContext {
            class_name,
            language: language.as_deref(),
        };
        for plugin in self.plugins() {
            plugin.before_highlight_block(&context);
        }

        let markup = match options.use_br {
            true => BR_TAG.replace_all(&inner_markup.replace('\n', ""), "\n").into_owned(),
            false => inner_markup.to_owned(),
        };
        let (text, original) = NodeStream::from_markup(&markup);

        let result = match &language {
            Some(language) => self.highlight(&text, language, true)?,
            None => self.highlight_auto(&text, None),
        };

        let mut value = result.value.clone();
        if !original.is_empty() {
            let highlighted = NodeStream::from_tree(&result.tree, &options.class_prefix);
            value = merge_streams(&original, &highlighted, &text);
        }
        let value = fix_markup(&value, options.tab_replace.as_deref(), options.use_br);

        let shown = match &language {
            Some(language) => self.canonical_name(language).map(str::to_owned),
            None => result.language.clone(),
        };

        let mut block = HighlightedBlock {
            value,
            class_name: block_class_name(class_name, shown.as_deref()),
            language: result.language.clone(),
            relevance: result.relevance,
            second_best: result.second_best.as_ref().map(|second| Guess {
                language: second.language.clone(),
                relevance: second.relevance,
            }),
        };
        for plugin in self.plugins() {
            plugin.after_highlight_block(&mut block);
        }
        Ok(Some(block))
    }
}

fn block_class_name(current: &str, language: Option<&str>) -> String {
    let mut classes = vec![current.trim()];
    if !HLJS_CLASS.is_match(current) {
        classes.push("hljs");
    }
    if let Some(language) = language {
        if !current.contains(language) {
            classes.push(language);
        }
    }
    classes.join(" ").trim().to_owned()
}

#[test]
fn test_block_class_name() {
    assert_eq!(block_class_name("", Some("cpp")), "hljs cpp");
    assert_eq!(block_class_name("lang-cpp", Some("cpp")), "lang-cpp hljs");
    assert_eq!(block_class_name(" hljs x ", None), "hljs x");
}
