use glimmer::{
    def::{Child, Keywords, LanguageDef, ModeDef},
    modes::Common,
};

fn literals() -> Keywords {
    Keywords::new().category("literal", "true false null")
}

pub fn json() -> LanguageDef {
    let mut def = LanguageDef::new("JSON");
    let common = Common::add_to(&mut def);

    // objects and arrays nest, their handles are filled in below
    let object = def.add(ModeDef::new());
    let array = def.add(ModeDef::new());

    let comments = [common.c_line_comment, common.c_block_comment];
    let values: Vec<Child> = [common.quote_string, common.c_number, object, array]
        .into_iter()
        .chain(comments)
        .map(Child::from)
        .collect();

    let value = ModeDef::new()
        .end(",")
        .ends_with_parent()
        .flags(|f| f.exclude_end = true)
        .keywords(literals())
        .contains(values.iter().copied());
    let member_value = def.add(value.clone().begin(":"));
    let element = def.add(value);

    let key = def.add(
        ModeDef::span("attr", "\"", "\"")
            .contains([common.backslash_escape])
            .illegal(r"\n"),
    );

    *def.mode_mut(object) = ModeDef::new()
        .begin(r"\{")
        .end(r"\}")
        .contains([key, member_value])
        .contains(comments)
        .illegal(r"\S");
    *def.mode_mut(array) = ModeDef::new()
        .begin(r"\[")
        .end(r"\]")
        .contains([element])
        .illegal(r"\S");

    let root = def.root_mut();
    root.keywords = Some(literals());
    root.illegal = Some(r"\S".to_owned());
    root.contains = values;
    def
}
