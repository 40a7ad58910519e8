use glimmer::{
    def::{Keywords, LanguageDef, ModeDef},
    modes::{Common, UNDERSCORE_IDENT_RE},
};

const LITERALS: &str = "on off yes no true false none blocked debug info notice warn error crit \
    select break last permanent redirect kqueue rtsig epoll poll /dev/poll";

pub fn nginx() -> LanguageDef {
    let mut def = LanguageDef::new("Nginx config").aliases(&["nginxconf"]);
    let common = Common::add_to(&mut def);

    let variable_base = ModeDef::new().scope("variable");
    let variable = def.add(variable_base.clone().variants(vec![
        variable_base.clone().begin(r"\$\d+"),
        variable_base.clone().begin(r"\$\{").end(r"\}"),
        variable_base.clone().begin(&format!("[$@]{UNDERSCORE_IDENT_RE}")),
    ]));

    let string_base = ModeDef::new()
        .scope("string")
        .contains([common.backslash_escape, variable]);
    let string = def.add(string_base.clone().variants(vec![
        string_base.clone().begin("\"").end("\""),
        string_base.clone().begin("'").end("'"),
    ]));
    let url = def.add(
        ModeDef::new()
            .begin("([a-z]+):/")
            .end(r"\s")
            .ends_with_parent()
            .flags(|f| f.exclude_end = true)
            .contains([variable]),
    );
    let regexp_base = ModeDef::new()
        .scope("regexp")
        .contains([common.backslash_escape, variable]);
    let regexp = def.add(regexp_base.clone().variants(vec![
        regexp_base
            .clone()
            .begin(r"\s\^")
            .end(r"\s|\{|;")
            .flags(|f| f.return_end = true),
        regexp_base
            .clone()
            .begin(r"~\*?\s+")
            .end(r"\s|\{|;")
            .flags(|f| f.return_end = true),
        regexp_base.clone().begin(r"\*(\.[a-z\-]+)+"),
        regexp_base.clone().begin(r"([a-z\-]+\.)+\*"),
    ]));
    let address = def.add(ModeDef::token(
        "number",
        r"\b\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}(:\d{1,5})?\b",
    ));
    let size = def.add(ModeDef::token("number", r"\b\d+[kKmMgGdshdwy]*\b").relevance(0));

    let params = def.add(
        ModeDef::new()
            .ends_with_parent()
            .keywords(Keywords::new().pattern("[a-z/_]+").category("literal", LITERALS))
            .relevance(0)
            .illegal("=>")
            .contains([common.hash_comment, string, url, regexp, address, size, variable]),
    );

    let section_name = def.add(ModeDef::token("section", UNDERSCORE_IDENT_RE));
    let section = def.add(
        ModeDef::new()
            .begin(&format!(r"{UNDERSCORE_IDENT_RE}\s+\{{"))
            .end(r"\{")
            .flags(|f| f.return_begin = true)
            .relevance(0)
            .contains([section_name]),
    );
    let attribute = def.add(ModeDef::token("attribute", UNDERSCORE_IDENT_RE).starts(params));
    let directive = def.add(
        ModeDef::new()
            .begin(&format!(r"{UNDERSCORE_IDENT_RE}\s"))
            .end(r";|\{")
            .flags(|f| f.return_begin = true)
            .relevance(0)
            .contains([attribute]),
    );

    let root = def.root_mut();
    root.illegal = Some(r"[^\s\}]".to_owned());
    root.contains = vec![common.hash_comment.into(), section.into(), directive.into()];
    def
}
