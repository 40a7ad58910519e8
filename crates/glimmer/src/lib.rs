//! A syntax highlighting engine driven by declarative, regex based language
//! definitions.
//!
//! A [`LanguageDef`] describes a language as a tree of modes, each with a
//! begin and end pattern, a classification and nested modes. Registering it
//! with a [`Highlighter`] compiles it into a [`Grammar`], which highlighting
//! then scans source text with to produce a token tree and its HTML rendering.
//!
//! ```
//! use glimmer::{Highlighter, LanguageDef, ModeDef};
//!
//! let mut def = LanguageDef::new("Greeting");
//! let string = def.add(ModeDef::span("string", "\"", "\""));
//! def.root_mut().keywords = Some("hello".into());
//! def.root_mut().contains.push(string.into());
//!
//! let mut highlighter = Highlighter::new();
//! highlighter.register_language("greeting", def).unwrap();
//!
//! let result = highlighter.highlight("hello \"world\"", "greeting", false).unwrap();
//! assert_eq!(
//!     result.value,
//!     "<span class=\"hljs-keyword\">hello</span> \
//!      <span class=\"hljs-string\">&quot;world&quot;</span>"
//! );
//! ```

pub mod block;
pub mod compile;
pub mod def;
pub mod error;
pub mod global;
pub mod highlighter;
pub mod keywords;
pub mod matcher;
pub mod merge;
pub mod modes;
pub mod options;
pub mod plugin;
pub mod render;
pub mod result;
mod scan;
pub mod tree;

pub use block::HighlightedBlock;
pub use compile::Grammar;
pub use def::{
    Begin, BeginGuard, Child, End, EndGuard, Flags, Keywords, LanguageDef, ModeDef, ModeRef,
    SubLanguage,
};
pub use error::{CompileError, HighlightError};
pub use highlighter::Highlighter;
pub use options::Options;
pub use plugin::Plugin;
pub use result::{Continuation, HighlightResult, IllegalBy};
pub use tree::{Node, Scope};

#[cfg(test)]
mod tests;
