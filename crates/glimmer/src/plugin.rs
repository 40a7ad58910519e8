use crate::{block::HighlightedBlock, result::HighlightResult};

/// Input of a `highlight` call as plugins see it.
#[derive(Debug)]
pub struct BeforeHighlight {
    pub code: String,
    pub language: String,
    /// Setting this skips the scan entirely.
    pub result: Option<HighlightResult>,
}

#[derive(Debug, Clone, Copy)]
pub struct BlockContext<'a> {
    pub class_name: &'a str,
    pub language: Option<&'a str>,
}

/// Hooks run around highlighting, in registration order.
pub trait Plugin: Send + Sync {
    fn before_highlight(&self, _context: &mut BeforeHighlight) {}
    fn after_highlight(&self, _result: &mut HighlightResult) {}
    fn before_highlight_block(&self, _block: &BlockContext<'_>) {}
    fn after_highlight_block(&self, _block: &mut HighlightedBlock) {}
}
