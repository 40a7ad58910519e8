use glimmer::{
    def::{Begin, Child, Keywords, LanguageDef, ModeDef, ModeRef},
    modes::Common,
};

const KEYWORDS: &str = "and as assert async await break class continue def del elif else except \
    finally for from global if import in is lambda nonlocal|10 not or pass raise return try while \
    with yield";

const BUILT_INS: &str = "__import__ abs all any ascii bin bool breakpoint bytearray bytes callable \
    chr classmethod compile complex delattr dict dir divmod enumerate eval exec filter float \
    format frozenset getattr globals hasattr hash help hex id input int isinstance issubclass iter \
    len list locals map max memoryview min next object oct open ord pow print property range repr \
    reversed round set setattr slice sorted staticmethod str sum super tuple type vars zip";

const DIGITS: &str = "[0-9](_?[0-9])*";

fn keywords() -> Keywords {
    Keywords::new()
        .category("keyword", KEYWORDS)
        .category("built_in", BUILT_INS)
        .category("literal", "__debug__ Ellipsis False None NotImplemented True")
}

fn number() -> ModeDef {
    let point_float = format!(r"(\b({DIGITS}))?\.({DIGITS})|\b({DIGITS})\.");
    let base = ModeDef::new().scope("number").relevance(0);
    base.clone().variants(vec![
        base.clone().begin(&format!(r"(\b({DIGITS})|({point_float}))[eE][+-]?({DIGITS})[jJ]?\b")),
        base.clone().begin(&format!("({point_float})[jJ]?")),
        base.clone().begin(r"\b([1-9](_?[0-9])*|0+(_?0)*)[lLjJ]?\b"),
        base.clone().begin(r"\b0[bB](_?[01])+[lL]?\b"),
        base.clone().begin(r"\b0[oO](_?[0-7])+[lL]?\b"),
        base.clone().begin(r"\b0[xX](_?[0-9a-fA-F])+[lL]?\b"),
        base.clone().begin(&format!(r"\b({DIGITS})[jJ]\b")),
    ])
}

fn strings(escape: ModeRef, prompt: ModeRef, doubled_brace: ModeRef, subst: ModeRef) -> ModeDef {
    const PLAIN: &str = "([uU]|[bB]|[rR]|[bB][rR]|[rR][bB])?";
    const FORMAT: &str = "([fF][rR]|[rR][fF]|[fF])";
    const UNICODE: &str = "([uU]|[rR])";
    const BYTES: &str = "([bB]|[bB][rR]|[rR][bB])";

    let base = ModeDef::new().scope("string");
    let quoted = |prefix: &str, quote: &str, children: &[ModeRef]| {
        base.clone()
            .begin(&format!("{prefix}{quote}"))
            .end(quote)
            .contains(children.iter().copied())
    };

    base.clone().variants(vec![
        quoted(PLAIN, "'''", &[escape, prompt]).relevance(10),
        quoted(PLAIN, "\"\"\"", &[escape, prompt]).relevance(10),
        quoted(FORMAT, "'''", &[escape, prompt, doubled_brace, subst]),
        quoted(FORMAT, "\"\"\"", &[escape, prompt, doubled_brace, subst]),
        quoted(UNICODE, "'", &[escape]).relevance(10),
        quoted(UNICODE, "\"", &[escape]).relevance(10),
        quoted(BYTES, "'", &[escape]),
        quoted(BYTES, "\"", &[escape]),
        quoted(FORMAT, "'", &[escape, doubled_brace, subst]),
        quoted(FORMAT, "\"", &[escape, doubled_brace, subst]),
        quoted("", "'", &[escape]).illegal(r"\n"),
        quoted("", "\"", &[escape]).illegal(r"\n"),
    ])
}

pub fn python() -> LanguageDef {
    let mut def = LanguageDef::new("Python").aliases(&["py", "gyp", "ipython"]);
    let common = Common::add_to(&mut def);

    let prompt = def.add(ModeDef::token("meta", r"^(>>>|\.\.\.) "));
    let subst = def.add(ModeDef::span("subst", r"\{", r"\}").keywords(keywords()).illegal("#"));
    let doubled_brace = def.add(ModeDef::new().begin(r"\{\{").relevance(0));
    let string = def.add(strings(common.backslash_escape, prompt, doubled_brace, subst));
    let number = def.add(number());
    def.mode_mut(subst).contains = vec![string.into(), number.into(), prompt.into()];

    let params = def.add(ModeDef::new().scope("params").variants(vec![
        ModeDef::new().begin(r"\(\s*\)").flags(|f| f.skip = true),
        ModeDef::span("params", r"\(", r"\)")
            .flags(|f| {
                f.exclude_begin = true;
                f.exclude_end = true;
            })
            .keywords(keywords())
            .contains([
                Child::SelfRef,
                prompt.into(),
                number.into(),
                string.into(),
                common.hash_comment.into(),
            ]),
    ]));

    let return_type = def.add(ModeDef::new().begin("->").ends_with_parent().keywords("None"));
    let definition = ModeDef::new()
        .end(":")
        .illegal(r"[${=;\n,]")
        .contains([common.underscore_title, params, return_type]);
    let definition = def.add(definition.clone().variants(vec![
        ModeDef {
            begin: Begin::Keywords("def".to_owned()),
            ..definition.clone().scope("function")
        },
        ModeDef {
            begin: Begin::Keywords("class".to_owned()),
            ..definition.clone().scope("class")
        },
    ]));

    // a trailing comment is left for the top level to pick up
    let decorator = def.add(
        ModeDef::span("meta", r"^[\t ]*@", "#|$")
            .flags(|f| f.return_end = true)
            .contains([number, params, string]),
    );

    let self_ref = def.add(ModeDef::new().begin(r"\bself\b"));
    let conditional = def.add(ModeDef {
        begin: Begin::Keywords("if".to_owned()),
        relevance: Some(0),
        ..Default::default()
    });
    let call = def.add(ModeDef::new().begin(r"\b(print|exec)\("));

    let root = def.root_mut();
    root.keywords = Some(keywords());
    root.illegal = Some(r"(</|->|\?)|=>".to_owned());
    root.contains = [
        prompt,
        number,
        self_ref,
        conditional,
        string,
        common.hash_comment,
        definition,
        decorator,
        call,
    ]
    .map(Child::from)
    .to_vec();
    def
}
