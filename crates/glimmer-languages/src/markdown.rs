use glimmer::def::{Child, LanguageDef, ModeDef, ModeRef};

fn links(def: &mut LanguageDef) -> ModeRef {
    let text = def.add(
        ModeDef::span("string", r"\[", r"\]")
            .relevance(0)
            .flags(|f| {
                f.exclude_begin = true;
                f.return_end = true;
            }),
    );
    let target = def.add(ModeDef::span("link", r"\]\(", r"\)").relevance(0).flags(|f| {
        f.exclude_begin = true;
        f.exclude_end = true;
    }));
    let reference = def.add(ModeDef::span("symbol", r"\]\[", r"\]").relevance(0).flags(|f| {
        f.exclude_begin = true;
        f.exclude_end = true;
    }));

    let base = ModeDef::new()
        .flags(|f| f.return_begin = true)
        .contains([text, target, reference]);
    def.add(base.clone().variants(vec![
        base.clone().begin(r"\[.+?\]\[.*?\]").relevance(0),
        base.clone()
            .begin(r"\[.+?\]\(((data|javascript|mailto):|(?:http|ftp)s?://).*?\)")
            .relevance(2),
        base.clone().begin(r"\[.+?\]\([A-Za-z][A-Za-z0-9+.-]*://.*?\)").relevance(2),
        base.clone().begin(r"\[.+?\]\([./?&#].*?\)").relevance(1),
        base.clone().begin(r"\[.+?\]\(.*?\)").relevance(0),
    ]))
}

pub fn markdown() -> LanguageDef {
    let mut def = LanguageDef::new("Markdown").aliases(&["md", "mkdown", "mkd"]);

    let inline_html = def.add(
        ModeDef::new()
            .begin("</?[A-Za-z_]")
            .end(">")
            .sub_language("xml")
            .relevance(0),
    );
    let link = links(&mut def);

    // emphasis nests in both directions, the children are filled in below
    let strong = ModeDef::new().scope("strong");
    let strong = def.add(strong.clone().variants(vec![
        strong.clone().begin("_{2}").end("_{2}"),
        strong.clone().begin(r"\*{2}").end(r"\*{2}"),
    ]));
    // a double marker is always taken for `strong` first
    let emphasis = ModeDef::new().scope("emphasis");
    let emphasis = def.add(emphasis.clone().variants(vec![
        emphasis.clone().begin(r"\*").end(r"\*"),
        emphasis.clone().begin("_").end("_").relevance(0),
    ]));
    let inline: Vec<Child> = [inline_html, link, strong, emphasis].map(Child::from).to_vec();
    for (mode, other) in [(strong, emphasis), (emphasis, strong)] {
        let variants = &mut def.mode_mut(mode).variants;
        for variant in variants {
            variant.contains = vec![other.into(), inline_html.into(), link.into()];
        }
    }

    let atx_header = ModeDef::span("section", "^#{1,6}", "$").contains(inline.iter().copied());
    let underline = def.add(ModeDef::new().begin("^[=-]{2,}$"));
    let header_line = def.add(
        ModeDef::new()
            .begin("^.")
            .end(r"\n")
            .flags(|f| f.return_begin = true)
            .contains(inline.iter().copied()),
    );
    let setext_header = ModeDef::span("section", r"^.+\n[=-]{2,}$", "$")
        .flags(|f| f.return_begin = true)
        .contains([underline, header_line]);
    let header = def.add(ModeDef::new().scope("section").variants(vec![atx_header, setext_header]));

    // the whitespace after the marker stays outside of the bullet
    let bullet = def.add(ModeDef::token("bullet", r"[ \t]*([*+-]|\d+\.)"));
    let list = def.add(
        ModeDef::new()
            .begin(r"^[ \t]*([*+-]|\d+\.)\s")
            .end(r"\s")
            .flags(|f| f.return_begin = true)
            .contains([bullet]),
    );

    let quote = def.add(ModeDef::span("quote", r"^>\s+", "$").contains(inline.iter().copied()));

    let code = ModeDef::new().scope("code");
    let code = def.add(code.clone().variants(vec![
        code.clone().begin("```").end("```+[ ]*$"),
        code.clone().begin("~~~").end("~~~+[ ]*$"),
        code.clone().begin("`.+?`"),
        code.clone().begin("^( {4}|\t)").end("$").relevance(0),
    ]));

    let horizontal_rule = def.add(ModeDef::new().begin(r"^[-\*]{3,}").end("$"));

    let link_label = def.add(ModeDef::span("symbol", r"\[", r"\]").flags(|f| {
        f.exclude_begin = true;
        f.exclude_end = true;
    }));
    let link_url = def.add(ModeDef::span("link", r":\s*", "$").flags(|f| f.exclude_begin = true));
    let link_reference = def.add(
        ModeDef::new()
            .begin(r"^\[[^\n]+\]:")
            .flags(|f| f.return_begin = true)
            .contains([link_label, link_url]),
    );

    def.root_mut().contains = [
        header,
        inline_html,
        list,
        strong,
        emphasis,
        quote,
        code,
        horizontal_rule,
        link,
        link_reference,
    ]
    .map(Child::from)
    .to_vec();
    def
}
