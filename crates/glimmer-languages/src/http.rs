use glimmer::def::{End, LanguageDef, ModeDef, SubLanguage};

const VERSION_RE: &str = r"HTTP/[0-9\.]+";

pub fn http() -> LanguageDef {
    let mut def = LanguageDef::new("HTTP").aliases(&["https"]);

    let status_code = def.add(ModeDef::token("number", r"\b\d{3}\b"));
    let status_line = def.add(
        ModeDef::new()
            .begin(&format!("^{VERSION_RE}"))
            .end("$")
            .contains([status_code]),
    );

    let path = def.add(ModeDef::span("string", " ", " ").flags(|f| {
        f.exclude_begin = true;
        f.exclude_end = true;
    }));
    let version = def.add(ModeDef::new().begin(VERSION_RE));
    let method = def.add(ModeDef::token("keyword", "[A-Z]+"));
    let request_line = def.add(
        ModeDef::new()
            .begin(&format!("^[A-Z]+ (.*?) {VERSION_RE}$"))
            .end("$")
            .flags(|f| f.return_begin = true)
            .contains([path, version, method]),
    );

    let header_value = def.add(ModeDef::new().end("$").relevance(0));
    let header = def.add(
        ModeDef::span("attribute", r"^\w", ": ")
            .flags(|f| f.exclude_end = true)
            .illegal(r"\n|\s|=")
            .starts(header_value),
    );

    // everything after the headers is the body, in whatever language fits
    let body_content = def.add(ModeDef {
        end: End::WithParent,
        sub_language: Some(SubLanguage::Auto(Vec::new())),
        ..Default::default()
    });
    let body = def.add(ModeDef::new().begin(r"\n\n").starts(body_content));

    let root = def.root_mut();
    root.illegal = Some(r"\S".to_owned());
    root.contains = vec![status_line.into(), request_line.into(), header.into(), body.into()];
    def
}
