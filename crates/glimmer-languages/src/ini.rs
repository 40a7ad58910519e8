use glimmer::{
    def::{Child, LanguageDef, ModeDef},
    modes::{Common, NUMBER_RE},
};

const KEY_RE: &str = r#"([A-Za-z0-9_-]+|"(\\"|[^"])*"|'[^']*')"#;

pub fn ini() -> LanguageDef {
    let mut def = LanguageDef::new("TOML, also INI").aliases(&["toml"]);
    def.case_insensitive = true;
    let common = Common::add_to(&mut def);

    let number = ModeDef::new().scope("number").relevance(0);
    let number = def.add(number.clone().variants(vec![
        number.clone().begin(r"([+-]+)?[\d]+_[\d_]+"),
        number.clone().begin(NUMBER_RE),
    ]));
    let comment = def.add(ModeDef::new().variants(vec![
        common.comment(";", "$"),
        common.comment("#", "$"),
    ]));
    let variable = ModeDef::new().scope("variable");
    let variable = def.add(variable.clone().variants(vec![
        variable.clone().begin(r#"\$[\w\d"][\w\d_]*"#),
        variable.clone().begin(r"\$\{(.*?)\}"),
    ]));
    let literal = def.add(ModeDef::token("literal", r"\bon|off|true|false|yes|no\b"));
    let string = ModeDef::new().scope("string").contains([common.backslash_escape]);
    let string = def.add(string.clone().variants(vec![
        string.clone().begin("'''").end("'''").relevance(10),
        string.clone().begin("\"\"\"").end("\"\"\"").relevance(10),
        string.clone().begin("\"").end("\""),
        string.clone().begin("'").end("'"),
    ]));
    let array = def.add(
        ModeDef::new()
            .begin(r"\[")
            .end(r"\]")
            .relevance(0)
            .contains(
                [comment, literal, variable, string, number]
                    .map(Child::from)
                    .into_iter()
                    .chain([Child::SelfRef]),
            ),
    );

    let section = def.add(ModeDef::span("section", r"\[+", r"\]+"));

    let value = def.add(
        ModeDef::new()
            .end("$")
            .contains([comment, array, literal, variable, string, number]),
    );
    let key = def.add(
        ModeDef::token("attr", &format!(r"{KEY_RE}(\s*\.\s*{KEY_RE})*")).starts(value),
    );
    // only a key followed by `=` and a value starts an assignment
    let assignment = def.add(
        ModeDef::new()
            .begin(&format!(r"{KEY_RE}(\s*\.\s*{KEY_RE})*\s*=\s*[^#\s]"))
            .end("$")
            .flags(|f| f.return_begin = true)
            .relevance(0)
            .contains([key]),
    );

    let root = def.root_mut();
    root.illegal = Some(r"\S".to_owned());
    root.contains = vec![comment.into(), section.into(), assignment.into()];
    def
}
