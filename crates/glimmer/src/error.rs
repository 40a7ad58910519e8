use thiserror::Error;

/// Raised while turning a [`LanguageDef`](crate::def::LanguageDef) into a grammar,
/// always at registration time.
#[derive(Debug, Clone, Error)]
pub enum CompileError {
    #[error(
        "language `{language}`: contains `self` is not supported at the top level of a language"
    )]
    SelfAtTopLevel { language: String },
    #[error("language `{language}`: invalid pattern `{pattern}`\n  {source}")]
    InvalidPattern {
        language: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("language `{language}`: modes nest deeper than {limit} levels")]
    TooDeep { language: String, limit: usize },
}

#[derive(Debug, Clone, Error)]
pub enum HighlightError {
    #[error("could not find the language `{0}`, did you forget to register it?")]
    UnknownLanguage(String),
    #[error("illegal lexeme \"{lexeme}\" for mode \"{mode}\" at offset {offset}")]
    Illegal {
        language: String,
        lexeme: String,
        mode: String,
        offset: usize,
        context: String,
    },
    #[error("0 width match regex in language `{language}` at offset {offset}")]
    ZeroWidthMatch { language: String, offset: usize },
    #[error(
        "potential infinite loop in language `{language}`, \
         way more iterations ({iterations}) than matches"
    )]
    InfiniteLoop { language: String, iterations: usize },
    #[error("rules nest deeper than {limit} levels in language `{language}`")]
    NestingTooDeep { language: String, limit: usize },
    #[error(transparent)]
    Regex(#[from] regex::Error),
    #[error(transparent)]
    Compile(#[from] CompileError),
}

impl HighlightError {
    pub fn is_illegal(&self) -> bool {
        matches!(self, HighlightError::Illegal { .. })
    }
}
