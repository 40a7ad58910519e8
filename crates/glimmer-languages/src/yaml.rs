use glimmer::{
    def::{Begin, Child, Keywords, LanguageDef, ModeDef, ModeRef, SubLanguage},
    modes::{Common, C_NUMBER_RE, UNDERSCORE_IDENT_RE},
};

const LITERALS: &str = "true false yes no null";
const URI_CHARS: &str = r"[\w#;/?:@&=+$,.~*'()\[\]]+";
const TIMESTAMP_RE: &str = concat!(
    r"\b[0-9]{4}(-[0-9][0-9]){0,2}([Tt \t][0-9][0-9]?(:[0-9][0-9]){2})?",
    r"(\.[0-9]*)?([ \t])*(Z|[-+][0-9][0-9]?(:[0-9][0-9])?)?\b",
);

fn string(escape: ModeRef, template: ModeRef, plain: &str) -> ModeDef {
    let base = ModeDef::new()
        .scope("string")
        .relevance(0)
        .contains([escape, template]);
    base.clone().variants(vec![
        base.clone().begin("'").end("'"),
        base.clone().begin("\"").end("\""),
        base.clone().begin(plain),
    ])
}

pub fn yaml() -> LanguageDef {
    let mut def = LanguageDef::new("YAML").aliases(&["yml", "YAML"]);
    def.case_insensitive = true;
    let common = Common::add_to(&mut def);

    let template = ModeDef::new().scope("template-variable");
    let template = def.add(template.clone().variants(vec![
        template.clone().begin(r"\{\{").end(r"\}\}"),
        template.clone().begin(r"%\{").end(r"\}"),
    ]));
    let block_string = def.add(string(common.backslash_escape, template, r"\S+"));
    let flow_string = def.add(string(common.backslash_escape, template, r"[^\s,{}\[\]]+"));

    // keys take the separator after the colon with them
    let key = ModeDef::new().scope("attr");
    let key = def.add(key.clone().variants(vec![
        key.clone().begin(r"\w[\w :/.-]*:(?:[ \t]|$)"),
        key.clone().begin(r#""\w[\w :/.-]*":(?:[ \t]|$)"#),
        key.clone().begin(r"'\w[\w :/.-]*':(?:[ \t]|$)"),
    ]));
    let document_start = def.add(ModeDef::token("meta", r"^---\s*$").relevance(10));
    let block_scalar = def.add(ModeDef::token(
        "string",
        r"[\|>]([1-9]?[+-])?[ ]*\n( +)[^ ][^\n]*\n( +[^\n]+\n?)*",
    ));
    let template_code = def.add(
        ModeDef {
            sub_language: Some(SubLanguage::Single("ruby".to_owned())),
            ..ModeDef::new().begin("<%[%=-]?").end("[%-]?%>").relevance(0)
        }
        .flags(|f| {
            f.exclude_begin = true;
            f.exclude_end = true;
        }),
    );
    let local_tag = def.add(ModeDef::token("type", &format!("!\\w+!{URI_CHARS}")));
    let verbatim_tag = def.add(ModeDef::token("type", &format!("!<{URI_CHARS}>")));
    let primary_tag = def.add(ModeDef::token("type", &format!("!{URI_CHARS}")));
    let secondary_tag = def.add(ModeDef::token("type", &format!("!!{URI_CHARS}")));
    let anchor = def.add(ModeDef::token("meta", &format!("&{UNDERSCORE_IDENT_RE}$")));
    let alias = def.add(ModeDef::token("meta", &format!(r"\*{UNDERSCORE_IDENT_RE}$")));
    let bullet = def.add(ModeDef::token("bullet", "-(?: |$)").relevance(0));
    let literal = def.add(ModeDef {
        begin: Begin::Keywords(LITERALS.to_owned()),
        keywords: Some(Keywords::new().category("literal", LITERALS)),
        ..Default::default()
    });
    let timestamp = def.add(ModeDef::token("number", TIMESTAMP_RE));
    let number = def.add(ModeDef::token("number", &format!(r"{C_NUMBER_RE}\b")).relevance(0));

    let flow_value = def.add(
        ModeDef::new()
            .end(",")
            .ends_with_parent()
            .flags(|f| f.exclude_end = true)
            .keywords(LITERALS)
            .relevance(0),
    );
    let flow_mapping = def.add(
        ModeDef::new()
            .begin(r"\{")
            .end(r"\}")
            .illegal(r"\n")
            .relevance(0)
            .contains([flow_value]),
    );
    let flow_sequence = def.add(
        ModeDef::new()
            .begin(r"\[")
            .end(r"\]")
            .illegal(r"\n")
            .relevance(0)
            .contains([flow_value]),
    );

    let shared = [
        key,
        document_start,
        block_scalar,
        template_code,
        local_tag,
        verbatim_tag,
        primary_tag,
        secondary_tag,
        anchor,
        alias,
        bullet,
        common.hash_comment,
        literal,
        timestamp,
        number,
        flow_mapping,
        flow_sequence,
    ];
    // inside flow collections plain scalars stop at separators
    def.mode_mut(flow_value).contains =
        shared.into_iter().chain([flow_string]).map(Child::from).collect();
    def.root_mut().contains = shared.into_iter().chain([block_string]).map(Child::from).collect();
    def
}
