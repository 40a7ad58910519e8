use glimmer::{
    def::{Keywords, LanguageDef, ModeDef},
    modes::{Common, UNDERSCORE_IDENT_RE},
};

const FUNCTIONS: &str = "subst patsubst strip findstring filter filter-out sort word wordlist \
    firstword lastword dir notdir suffix basename addsuffix addprefix join wildcard realpath \
    abspath error warning shell origin flavor foreach if or and call eval file value";

const DIRECTIVES: &str = "define endef undefine ifdef ifndef ifeq ifneq else endif include \
    -include sinclude override export unexport private vpath";

pub fn makefile() -> LanguageDef {
    let mut def = LanguageDef::new("Makefile").aliases(&["mk", "mak"]);
    let common = Common::add_to(&mut def);

    let variable = ModeDef::new().scope("variable");
    let variable = def.add(variable.clone().variants(vec![
        variable
            .clone()
            .begin(&format!(r"\$\({UNDERSCORE_IDENT_RE}\)"))
            .contains([common.backslash_escape]),
        variable.clone().begin(r"\$[@%<?\^\+\*]"),
    ]));
    let string = def.add(
        ModeDef::span("string", "\"", "\"").contains([common.backslash_escape, variable]),
    );
    let function = def.add(
        ModeDef::span("variable", r"\$\([\w-]+\s", r"\)")
            .keywords(Keywords::new().category("built_in", FUNCTIONS))
            .contains([variable]),
    );
    // the assigned name is not a directive even when it spells one
    let assignment = def.add(ModeDef::new().begin(&format!(r"^{UNDERSCORE_IDENT_RE}\s*[:+?]?=")));
    let phony = def.add(
        ModeDef::span("meta", r"^\.PHONY:", "$")
            .keywords(Keywords::new().pattern(r"[\.\w]+").category("meta-keyword", ".PHONY")),
    );
    let target = def.add(ModeDef::span("section", r"^[^\s]+:", "$").contains([variable]));

    let root = def.root_mut();
    root.keywords = Some(Keywords::new().pattern(r"[\w-]+").category("keyword", DIRECTIVES));
    root.contains = vec![
        common.hash_comment.into(),
        variable.into(),
        string.into(),
        function.into(),
        assignment.into(),
        phony.into(),
        target.into(),
    ];
    def
}
