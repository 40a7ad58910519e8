//! Declarative language definitions.
//!
//! A [`LanguageDef`] owns every mode it uses in an arena, modes point at each
//! other through [`ModeRef`] handles. This lets one mode be shared between many
//! parents and lets modes be mutually recursive without any reference cycles.

use std::collections::HashMap;

use cranelift_entity::{entity_impl, PrimaryMap};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ModeRef(u32);

entity_impl! { ModeRef }

/// How a mode starts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Begin {
    /// Zero width, matches anywhere. Used by purely structural modes.
    #[default]
    Always,
    Pattern(String),
    /// Space separated list of words, the mode starts on any of them.
    /// The words also become the mode's keywords unless it declares its own.
    Keywords(String),
}

/// How a mode ends.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum End {
    /// The mode is a single token, it closes right after its begin match.
    #[default]
    SelfClosing,
    Pattern(String),
    /// The mode has no end of its own and closes together with its parent.
    WithParent,
    /// Closes on its own pattern or whenever the parent would.
    PatternOrParent(String),
    /// Ends on the exact text its begin pattern matched.
    SameAsBegin,
}

impl End {
    pub fn ends_with_parent(&self) -> bool {
        matches!(self, End::WithParent | End::PatternOrParent(_))
    }
}

/// An entry in a mode's `contains` list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Child {
    Mode(ModeRef),
    /// The mode containing this entry, used for balanced constructs.
    SelfRef,
}

impl From<ModeRef> for Child {
    fn from(value: ModeRef) -> Self {
        Child::Mode(value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubLanguage {
    /// Delegate to one language, continuing where the previous chunk left off.
    Single(String),
    /// Auto-detect among these languages, an empty list means all of them.
    Auto(Vec<String>),
}

/// Extra checks performed on a begin match before the mode is entered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BeginGuard {
    /// Ignore the match if it is a member access, `foo.if` or `if.foo`.
    NotAroundDot,
    /// Only match at the very start of the input.
    InputStart,
}

/// Extra checks performed on an end match before the mode is closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndGuard {
    /// The first capture group of the end match must equal the first capture
    /// group of the begin match, used for heredocs and raw strings.
    SameCaptureAsBegin,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Flags {
    /// Matched text stays in the parent and no scope is opened.
    pub skip: bool,
    pub exclude_begin: bool,
    pub exclude_end: bool,
    /// The begin lexeme is scanned again as content of the mode.
    pub return_begin: bool,
    /// The end lexeme is scanned again as content of the parent.
    pub return_end: bool,
    /// Ending this mode also ends its parent.
    pub ends_parent: bool,
}

/// Keyword shorthand, every category maps to a space separated word list.
/// A word may carry its own relevance as `word|10`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Keywords {
    /// The pattern used to split text into candidate words, `\w+` by default.
    pub pattern: Option<String>,
    pub categories: Vec<(String, String)>,
}

impl Keywords {
    pub fn new() -> Keywords {
        Keywords::default()
    }
    pub fn pattern(mut self, pattern: impl Into<String>) -> Keywords {
        self.pattern = Some(pattern.into());
        self
    }
    pub fn category(mut self, scope: impl Into<String>, words: impl Into<String>) -> Keywords {
        self.categories.push((scope.into(), words.into()));
        self
    }
}

impl From<&str> for Keywords {
    fn from(value: &str) -> Self {
        Keywords::new().category("keyword", value)
    }
}

/// One lexical construct.
///
/// Variants are complete modes, write them with struct update syntax on top of
/// a base mode to share fields.
#[derive(Clone, Debug, Default)]
pub struct ModeDef {
    pub scope: Option<String>,
    pub begin: Begin,
    pub end: End,
    pub illegal: Option<String>,
    /// Defaults to 1.
    pub relevance: Option<u32>,
    pub keywords: Option<Keywords>,
    pub contains: Vec<Child>,
    pub variants: Vec<ModeDef>,
    pub starts: Option<ModeRef>,
    pub sub_language: Option<SubLanguage>,
    pub flags: Flags,
    pub begin_guard: Option<BeginGuard>,
    pub end_guard: Option<EndGuard>,
}

impl ModeDef {
    pub fn new() -> ModeDef {
        ModeDef::default()
    }
    /// Single token mode.
    pub fn token(scope: &str, begin: &str) -> ModeDef {
        ModeDef {
            scope: Some(scope.to_owned()),
            begin: Begin::Pattern(begin.to_owned()),
            ..Default::default()
        }
    }
    pub fn span(scope: &str, begin: &str, end: &str) -> ModeDef {
        ModeDef {
            scope: Some(scope.to_owned()),
            begin: Begin::Pattern(begin.to_owned()),
            end: End::Pattern(end.to_owned()),
            ..Default::default()
        }
    }
    pub fn scope(mut self, scope: &str) -> ModeDef {
        self.scope = Some(scope.to_owned());
        self
    }
    pub fn begin(mut self, begin: &str) -> ModeDef {
        self.begin = Begin::Pattern(begin.to_owned());
        self
    }
    pub fn end(mut self, end: &str) -> ModeDef {
        self.end = End::Pattern(end.to_owned());
        self
    }
    pub fn relevance(mut self, relevance: u32) -> ModeDef {
        self.relevance = Some(relevance);
        self
    }
    pub fn illegal(mut self, illegal: &str) -> ModeDef {
        self.illegal = Some(illegal.to_owned());
        self
    }
    pub fn keywords(mut self, keywords: impl Into<Keywords>) -> ModeDef {
        self.keywords = Some(keywords.into());
        self
    }
    pub fn contains<C: Into<Child>>(mut self, children: impl IntoIterator<Item = C>) -> ModeDef {
        self.contains.extend(children.into_iter().map(Into::into));
        self
    }
    pub fn variants(mut self, variants: Vec<ModeDef>) -> ModeDef {
        self.variants = variants;
        self
    }
    pub fn starts(mut self, starts: ModeRef) -> ModeDef {
        self.starts = Some(starts);
        self
    }
    pub fn sub_language(mut self, language: &str) -> ModeDef {
        self.sub_language = Some(SubLanguage::Single(language.to_owned()));
        self
    }
    pub fn ends_with_parent(mut self) -> ModeDef {
        self.end = match self.end {
            End::Pattern(p) | End::PatternOrParent(p) => End::PatternOrParent(p),
            _ => End::WithParent,
        };
        self
    }
    pub fn flags(mut self, f: impl FnOnce(&mut Flags)) -> ModeDef {
        f(&mut self.flags);
        self
    }
}

/// A language before compilation.
#[derive(Clone, Debug)]
pub struct LanguageDef {
    /// Human readable name, the registry key is given at registration.
    pub name: String,
    pub aliases: Vec<String>,
    pub case_insensitive: bool,
    pub disable_autodetect: bool,
    /// Name of a language this one is a superset of, preferred less on ties.
    pub superset_of: Option<String>,
    pub class_name_aliases: HashMap<String, String>,
    pub(crate) modes: PrimaryMap<ModeRef, ModeDef>,
    pub(crate) root: ModeRef,
}

impl LanguageDef {
    pub fn new(name: impl Into<String>) -> LanguageDef {
        let mut modes = PrimaryMap::new();
        let root = modes.push(ModeDef::default());
        LanguageDef {
            name: name.into(),
            aliases: Vec::new(),
            case_insensitive: false,
            disable_autodetect: false,
            superset_of: None,
            class_name_aliases: HashMap::new(),
            modes,
            root,
        }
    }

    pub fn add(&mut self, mode: ModeDef) -> ModeRef {
        self.modes.push(mode)
    }

    pub fn root(&self) -> &ModeDef {
        &self.modes[self.root]
    }

    /// The top level mode. Only `keywords`, `illegal` and `contains` are meaningful on it.
    pub fn root_mut(&mut self) -> &mut ModeDef {
        &mut self.modes[self.root]
    }

    pub fn mode(&self, handle: ModeRef) -> &ModeDef {
        &self.modes[handle]
    }

    pub fn mode_mut(&mut self, handle: ModeRef) -> &mut ModeDef {
        &mut self.modes[handle]
    }

    pub fn root_ref(&self) -> ModeRef {
        self.root
    }

    pub fn aliases(mut self, aliases: &[&str]) -> LanguageDef {
        self.aliases = aliases.iter().map(|a| (*a).to_owned()).collect();
        self
    }
}

/// A definition with no rules at all, also used as the fallback for languages
/// which failed to compile.
pub fn plaintext() -> LanguageDef {
    let mut def = LanguageDef::new("Plain text").aliases(&["text", "txt"]);
    def.disable_autodetect = true;
    def
}
