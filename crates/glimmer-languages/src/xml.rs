use glimmer::{
    def::{End, Keywords, LanguageDef, ModeDef, SubLanguage},
    modes::Common,
};

const NAME_RE: &str = r"[A-Z_]([A-Z0-9_.-]+:)?[A-Z0-9_.-]*";

fn embedded(tag: &str, languages: &[&str]) -> ModeDef {
    ModeDef {
        end: End::Pattern(format!("</{tag}>")),
        sub_language: Some(SubLanguage::Auto(languages.iter().map(|l| (*l).to_owned()).collect())),
        ..Default::default()
    }
    .flags(|f| f.return_end = true)
}

pub fn xml() -> LanguageDef {
    let mut def = LanguageDef::new("HTML, XML").aliases(&[
        "html", "xhtml", "rss", "atom", "xjb", "xsd", "xsl", "plist", "wsf", "svg",
    ]);
    def.case_insensitive = true;
    let common = Common::add_to(&mut def);

    let entity = def.add(ModeDef::token("symbol", r"&[a-z]+;|&#[0-9]+;|&#x[a-f0-9]+;"));

    let meta_keyword =
        def.add(ModeDef::token("meta-keyword", r"#?[a-z_][a-z1-9_-]+").illegal(r"\n"));
    let meta_space = def.add(ModeDef::new().begin(r"\s").contains([meta_keyword]));
    let meta_parens = def.add(ModeDef::new().begin(r"\(").end(r"\)").contains([meta_keyword]));
    let meta_apos = def.mode(common.apos_string).clone().scope("meta-string");
    let meta_apos = def.add(meta_apos);
    let meta_quote = def.mode(common.quote_string).clone().scope("meta-string");
    let meta_quote = def.add(meta_quote);

    let attr = def.add(ModeDef::token("attr", r"[A-Za-z0-9._:-]+").relevance(0));
    let string = ModeDef::new().scope("string").flags(|f| f.ends_parent = true);
    let value = def.add(string.clone().variants(vec![
        string.clone().begin("\"").end("\"").contains([entity]),
        string.clone().begin("'").end("'").contains([entity]),
        string.clone().begin(r#"[^\s"'=<>`]+"#),
    ]));
    let assign = def.add(ModeDef::new().begin(r"=\s*").relevance(0).contains([value]));
    let attributes = def.add(
        ModeDef::new()
            .ends_with_parent()
            .illegal("<")
            .relevance(0)
            .contains([attr, assign]),
    );

    let nested_doctype = def.add(
        ModeDef::span("meta", "<![a-z]", ">")
            .contains([meta_space, meta_parens, meta_quote, meta_apos]),
    );
    let doctype_subset = def.add(ModeDef::new().begin(r"\[").end(r"\]").contains([nested_doctype]));
    let doctype = def.add(
        ModeDef::span("meta", "<![a-z]", ">")
            .relevance(10)
            .contains([meta_space, meta_quote, meta_apos, meta_parens, doctype_subset]),
    );
    let comment = def.add(common.comment("<!--", "-->").relevance(10));
    let cdata = def.add(ModeDef::new().begin(r"<!\[CDATA\[").end(r"\]\]>").relevance(10));
    let declaration = def.add(ModeDef::span("meta", r"<\?xml", r"\?>").relevance(10));

    let style_body = def.add(embedded("style", &["css", "xml"]));
    let style = def.add(
        ModeDef::span("tag", r"<style\b", ">")
            .keywords(Keywords::new().category("name", "style"))
            .contains([attributes])
            .starts(style_body),
    );
    let script_body = def.add(embedded("script", &["javascript", "handlebars", "xml"]));
    let script = def.add(
        ModeDef::span("tag", r"<script\b", ">")
            .keywords(Keywords::new().category("name", "script"))
            .contains([attributes])
            .starts(script_body),
    );

    let empty_tag = def.add(ModeDef::token("tag", "<>|</>"));
    let open_name = def.add(ModeDef::token("name", NAME_RE).relevance(0).starts(attributes));
    let open_tag = def.add(
        ModeDef::span("tag", &format!(r"<{NAME_RE}(?:/>|>|\s)"), "/?>")
            .flags(|f| f.return_begin = true)
            .contains([open_name]),
    );
    let close_name = def.add(ModeDef::token("name", NAME_RE).relevance(0));
    let close_tag = def.add(ModeDef::span("tag", "</", ">").contains([close_name]));

    def.root_mut().contains = vec![
        doctype.into(),
        comment.into(),
        cdata.into(),
        entity.into(),
        declaration.into(),
        style.into(),
        script.into(),
        empty_tag.into(),
        open_tag.into(),
        close_tag.into(),
    ];
    def
}
