use glimmer::def::{LanguageDef, ModeDef};

pub fn diff() -> LanguageDef {
    let mut def = LanguageDef::new("Diff").aliases(&["patch"]);

    let hunk = ModeDef::new().scope("meta").relevance(10);
    let hunk = def.add(hunk.clone().variants(vec![
        hunk.clone().begin(r"^@@ +-\d+,\d+ +\+\d+,\d+ +@@"),
        hunk.clone().begin(r"^\*\*\* +\d+,\d+ +\*\*\*\*$"),
        hunk.clone().begin(r"^--- +\d+,\d+ +----$"),
    ]));

    let header = ModeDef::new().scope("comment");
    let header = def.add(header.clone().variants(vec![
        header.clone().begin("Index: ").end("$"),
        header.clone().begin("^index").end("$"),
        header.clone().begin("={3,}").end("$"),
        header.clone().begin("^-{3}").end("$"),
        header.clone().begin(r"^\*{3} ").end("$"),
        header.clone().begin(r"^\+{3}").end("$"),
        header.clone().begin(r"^\*{15}$"),
        header.clone().begin("^diff --git").end("$"),
    ]));

    let addition = def.add(ModeDef::span("addition", r"^\+", "$"));
    let deletion = def.add(ModeDef::span("deletion", "^-", "$"));
    let change = def.add(ModeDef::span("addition", "^!", "$"));

    def.root_mut().contains = vec![
        hunk.into(),
        header.into(),
        addition.into(),
        deletion.into(),
        change.into(),
    ];
    def
}
