//! A process wide highlighter.
//!
//! Populate it once at startup, after that every thread may highlight with it
//! concurrently.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use lazy_static::lazy_static;

use crate::{
    def::LanguageDef,
    error::{CompileError, HighlightError},
    highlighter::Highlighter,
    options::Options,
    result::HighlightResult,
};

lazy_static! {
    static ref GLOBAL: RwLock<Highlighter> = RwLock::new(Highlighter::new());
}

pub fn read() -> RwLockReadGuard<'static, Highlighter> {
    // highlighting never leaves the registry half updated
    GLOBAL.read().unwrap_or_else(PoisonError::into_inner)
}

pub fn write() -> RwLockWriteGuard<'static, Highlighter> {
    GLOBAL.write().unwrap_or_else(PoisonError::into_inner)
}

pub fn register_language(name: &str, def: LanguageDef) -> Result<(), CompileError> {
    write().register_language(name, def)
}

pub fn configure(options: Options) {
    write().configure(options);
}

pub fn highlight(
    code: &str,
    language: &str,
    ignore_illegals: bool,
) -> Result<HighlightResult, HighlightError> {
    read().highlight(code, language, ignore_illegals)
}

pub fn highlight_auto(code: &str, subset: Option<&[String]>) -> HighlightResult {
    read().highlight_auto(code, subset)
}

#[test]
fn test_global_registry() {
    let mut def = LanguageDef::new("Global test");
    def.root_mut().keywords = Some("marker".into());
    register_language("global-test", def).unwrap();

    let result = highlight("marker", "Global-Test", false).unwrap();
    assert_eq!(result.relevance, 1);
    assert!(read().list_languages().any(|l| l == "global-test"));
}
