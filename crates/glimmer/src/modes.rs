//! Building blocks shared by many language definitions.

use crate::def::{Begin, BeginGuard, Child, End, LanguageDef, ModeDef, ModeRef};

pub const IDENT_RE: &str = r"[a-zA-Z]\w*";
pub const UNDERSCORE_IDENT_RE: &str = r"[a-zA-Z_]\w*";
pub const NUMBER_RE: &str = r"\b\d+(\.\d+)?";
/// Hex, decimal and floating point numbers with an optional sign.
pub const C_NUMBER_RE: &str = r"(-?)(\b0[xX][a-fA-F0-9]+|(\b\d+(\.\d*)?|\.\d+)([eE][-+]?\d+)?)";
pub const BINARY_NUMBER_RE: &str = r"\b(0b[01]+)";
pub const RE_STARTERS_RE: &str = concat!(
    r"!|!=|!==|%|%=|&|&&|&=|\*|\*=|\+|\+=|,|-|-=|/=|/|:|;|<<|<<=|<=|<|===|==|=|",
    r">>>=|>>=|>=|>>>|>>|>|\?|\[|\{|\(|\^|\^=|\||\|=|\|\||~",
);

const PHRASAL_WORDS: &str = concat!(
    r"\b(a|an|the|are|I'm|isn't|don't|doesn't|won't|but|just|should|pretty|simply|enough|",
    r"gonna|going|wtf|so|such|will|you|your|they|like|more)\b",
);
const CSS_UNITS: &str = concat!(
    "(%|em|ex|ch|rem|vw|vh|vmin|vmax|cm|mm|in|pt|pc|px|",
    "deg|grad|rad|turn|s|ms|Hz|kHz|dpi|dpcm|dppx)?",
);

/// Handles of the shared modes within one language definition.
#[derive(Clone, Copy, Debug)]
pub struct Common {
    pub backslash_escape: ModeRef,
    pub apos_string: ModeRef,
    pub quote_string: ModeRef,
    /// Common English words, lets comments win over prose in auto-detection.
    pub phrasal_words: ModeRef,
    pub doctag: ModeRef,
    pub c_line_comment: ModeRef,
    pub c_block_comment: ModeRef,
    pub hash_comment: ModeRef,
    pub number: ModeRef,
    pub c_number: ModeRef,
    pub binary_number: ModeRef,
    pub css_number: ModeRef,
    pub title: ModeRef,
    pub underscore_title: ModeRef,
    pub method_guard: ModeRef,
}

impl Common {
    pub fn add_to(def: &mut LanguageDef) -> Common {
        let backslash_escape = def.add(ModeDef::new().begin(r"\\[\s\S]").relevance(0));
        let apos_string = def.add(
            ModeDef::span("string", "'", "'")
                .illegal(r"\n")
                .contains([backslash_escape]),
        );
        let quote_string = def.add(
            ModeDef::span("string", "\"", "\"")
                .illegal(r"\n")
                .contains([backslash_escape]),
        );
        let phrasal_words = def.add(ModeDef::new().begin(PHRASAL_WORDS));
        let doctag = def.add(
            ModeDef::token("doctag", "(?:TODO|FIXME|NOTE|BUG|OPTIMIZE|HACK|XXX):").relevance(0),
        );

        let mut common = Common {
            backslash_escape,
            apos_string,
            quote_string,
            phrasal_words,
            doctag,
            c_line_comment: phrasal_words,
            c_block_comment: phrasal_words,
            hash_comment: phrasal_words,
            number: def.add(ModeDef::token("number", NUMBER_RE).relevance(0)),
            c_number: def.add(ModeDef::token("number", C_NUMBER_RE).relevance(0)),
            binary_number: def.add(ModeDef::token("number", BINARY_NUMBER_RE).relevance(0)),
            css_number: def.add(
                ModeDef::token("number", &format!("{NUMBER_RE}{CSS_UNITS}")).relevance(0),
            ),
            title: def.add(ModeDef::token("title", IDENT_RE).relevance(0)),
            underscore_title: def.add(ModeDef::token("title", UNDERSCORE_IDENT_RE).relevance(0)),
            method_guard: def.add(ModeDef::new().begin(r"\.\s*[a-zA-Z_]\w*").relevance(0)),
        };
        common.c_line_comment = def.add(common.comment("//", "$"));
        common.c_block_comment = def.add(common.comment(r"/\*", r"\*/"));
        common.hash_comment = def.add(common.comment("#", "$"));
        common
    }

    /// A comment mode, prose inside it is recognized but never classified.
    pub fn comment(&self, begin: &str, end: &str) -> ModeDef {
        ModeDef::span("comment", begin, end).contains([self.phrasal_words, self.doctag])
    }

    /// Like [`Common::comment`] with extra children before the shared ones.
    pub fn comment_with<C: Into<Child>>(
        &self,
        begin: &str,
        end: &str,
        children: impl IntoIterator<Item = C>,
    ) -> ModeDef {
        let mut mode = ModeDef::span("comment", begin, end).contains(children);
        mode.contains.push(self.phrasal_words.into());
        mode.contains.push(self.doctag.into());
        mode
    }
}

/// `#!/usr/bin/env binary` on the first line of the input.
pub fn shebang(binary: Option<&str>) -> ModeDef {
    let begin = match binary {
        Some(binary) => format!(r"^#![ ]*/.*\b{binary}\b.*"),
        None => r"^#![ ]*/".to_owned(),
    };
    ModeDef {
        scope: Some("meta".to_owned()),
        begin: Begin::Pattern(begin),
        end: End::Pattern("$".to_owned()),
        relevance: Some(0),
        begin_guard: Some(BeginGuard::InputStart),
        ..Default::default()
    }
}

/// Mode ending on the very text it started with, such as a custom delimiter.
pub fn end_same_as_begin(mode: ModeDef) -> ModeDef {
    ModeDef {
        end: End::SameAsBegin,
        ..mode
    }
}

/// Wraps words into a `\b(?:...)\b` alternation.
pub fn either_word(words: &[&str]) -> String {
    format!(r"\b(?:{})\b", words.join("|"))
}

#[test]
fn test_common_modes_compile() {
    use crate::compile::Grammar;

    let mut def = LanguageDef::new("common");
    let common = Common::add_to(&mut def);
    def.root_mut().contains = vec![
        common.apos_string.into(),
        common.quote_string.into(),
        common.c_line_comment.into(),
        common.c_block_comment.into(),
        common.hash_comment.into(),
        common.c_number.into(),
        common.binary_number.into(),
        common.css_number.into(),
        common.title.into(),
        common.method_guard.into(),
    ];
    let shebang = def.add(shebang(Some("bash")));
    def.root_mut().contains.insert(0, shebang.into());
    let grammar = Grammar::new(&def).unwrap();
    assert!(grammar.len() > 10);
}
