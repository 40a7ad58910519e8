use glimmer::{
    def::{Keywords, LanguageDef, ModeDef},
    modes::Common,
};

const IDENT_RE: &str = r"[a-zA-Z-][a-zA-Z0-9_-]*";

pub fn css() -> LanguageDef {
    let mut def = LanguageDef::new("CSS");
    def.case_insensitive = true;
    let common = Common::add_to(&mut def);

    let function_name = def.add(ModeDef::token("built_in", r"[\w-]+"));
    let arguments = def.add(
        ModeDef::new()
            .begin(r"\(")
            .end(r"\)")
            .contains([common.apos_string, common.quote_string, common.css_number]),
    );
    let function = def.add(
        ModeDef::new()
            .begin(r"[\w-]+\(")
            .flags(|f| f.return_begin = true)
            .contains([function_name, arguments]),
    );
    let hex_color = def.add(ModeDef::token("number", "#[0-9A-Fa-f]+"));
    let important = def.add(ModeDef::token("meta", "!important"));
    let value = def.add(
        ModeDef::new()
            .ends_with_parent()
            .flags(|f| f.exclude_end = true)
            .contains([
                function,
                common.css_number,
                common.quote_string,
                common.apos_string,
                common.c_block_comment,
                hex_color,
                important,
            ]),
    );
    let property = def.add(
        ModeDef::span("attribute", r"\S", ":")
            .flags(|f| f.exclude_end = true)
            .starts(value),
    );
    let declaration = def.add(
        ModeDef::new()
            .begin(r"([*]\s?)?(?:[A-Z_.\-\\]+|--[a-zA-Z0-9_-]+)\s*(/\*\*/)?:")
            .end(";")
            .ends_with_parent()
            .flags(|f| f.return_begin = true)
            .contains([property]),
    );

    let id = def.add(ModeDef::token("selector-id", "#[A-Za-z0-9_-]+"));
    let class = def.add(ModeDef::token("selector-class", &format!(r"\.{IDENT_RE}")));
    let attribute_selector = def.add(
        ModeDef::span("selector-attr", r"\[", r"\]")
            .illegal("$")
            .contains([common.apos_string, common.quote_string]),
    );
    let pseudo = def.add(ModeDef::token("selector-pseudo", r#":(:)?[a-zA-Z0-9_+()"'.-]+"#));
    let page_rule = def.add(
        ModeDef::new()
            .begin("@(page|font-face)")
            .keywords(Keywords::new().pattern("@[a-z-]+").category("keyword", "@page @font-face")),
    );

    let at_keyword = def.add(ModeDef::token("keyword", r"@-?\w[\w]*(-\w+)*"));
    let media_feature = def.add(ModeDef::token("attribute", "[a-z-]+:"));
    let at_rule_params = def.add(
        ModeDef::new()
            .begin(r"\s")
            .ends_with_parent()
            .flags(|f| f.exclude_end = true)
            .relevance(0)
            .keywords("and or not only")
            .contains([media_feature, common.apos_string, common.quote_string, common.css_number]),
    );
    let at_rule = def.add(
        ModeDef::new()
            .begin("@")
            .end("[{;]")
            .illegal(":")
            .flags(|f| f.return_begin = true)
            .contains([at_keyword, at_rule_params]),
    );

    let tag = def.add(ModeDef::token("selector-tag", IDENT_RE).relevance(0));
    let semicolon = def.add(ModeDef::new().begin(";"));
    let block = def.add(
        ModeDef::new()
            .begin(r"\{")
            .end(r"\}")
            .illegal(r"\S")
            .contains([common.c_block_comment, semicolon, declaration]),
    );

    let root = def.root_mut();
    root.illegal = Some(r"[=|'\$]".to_owned());
    root.contains = vec![
        common.c_block_comment.into(),
        id.into(),
        class.into(),
        attribute_selector.into(),
        pseudo.into(),
        page_rule.into(),
        at_rule.into(),
        tag.into(),
        block.into(),
    ];
    def
}
