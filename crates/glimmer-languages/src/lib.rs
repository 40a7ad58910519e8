//! Language definitions bundled with glimmer.
//!
//! Every language is exposed as a function building its [`LanguageDef`], use
//! [`register_all`] or [`highlighter`] to get all of them at once.

mod bash;
mod c_like;
mod cmake;
mod css;
mod diff;
mod http;
mod ini;
mod javascript;
mod json;
mod markdown;
mod makefile;
mod nginx;
mod python;
mod shell;
mod sql;
mod xml;
mod yaml;

use glimmer::{def::plaintext as plaintext_def, CompileError, Highlighter, LanguageDef};

pub use bash::bash;
pub use c_like::{c, cpp};
pub use cmake::cmake;
pub use css::css;
pub use diff::diff;
pub use http::http;
pub use ini::ini;
pub use javascript::javascript;
pub use json::json;
pub use markdown::markdown;
pub use makefile::makefile;
pub use nginx::nginx;
pub use python::python;
pub use shell::shell;
pub use sql::sql;
pub use xml::xml;
pub use yaml::yaml;

pub fn plaintext() -> LanguageDef {
    plaintext_def()
}

/// Registry names and constructors, in registration order.
pub const LANGUAGES: &[(&str, fn() -> LanguageDef)] = &[
    ("xml", xml),
    ("cpp", cpp),
    ("http", http),
    ("json", json),
    ("c", c),
    ("nginx", nginx),
    ("diff", diff),
    ("sql", sql),
    ("css", css),
    ("makefile", makefile),
    ("cmake", cmake),
    ("plaintext", plaintext),
    ("python", python),
    ("bash", bash),
    ("shell", shell),
    ("ini", ini),
    ("yaml", yaml),
    ("javascript", javascript),
    ("markdown", markdown),
];

/// Registers every bundled language, stopping at the first one which fails
/// to compile.
pub fn register_all(highlighter: &mut Highlighter) -> Result<(), CompileError> {
    for (name, def) in LANGUAGES {
        highlighter.register_language(name, def())?;
    }
    Ok(())
}

/// A highlighter with default options and every bundled language.
pub fn highlighter() -> Result<Highlighter, CompileError> {
    let mut highlighter = Highlighter::new();
    register_all(&mut highlighter)?;
    Ok(highlighter)
}
