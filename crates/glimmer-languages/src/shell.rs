use glimmer::def::{LanguageDef, ModeDef};

/// An interactive session, prompts are classified and commands highlighted as bash.
pub fn shell() -> LanguageDef {
    let mut def = LanguageDef::new("Shell Session").aliases(&["console"]);

    // a trailing backslash continues the command on the next line
    let command = def.add(ModeDef::new().end(r"[^\\][ \t]*$").sub_language("bash"));
    let prompt = def.add(
        ModeDef::token("meta", r"^\s{0,3}[/~\w\d\[\]()@-]*[>%$#]").starts(command),
    );

    def.root_mut().contains = vec![prompt.into()];
    def
}
