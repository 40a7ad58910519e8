use proptest::prelude::*;

use crate::{
    def::{Begin, Child, End, EndGuard, Keywords, LanguageDef, ModeDef, SubLanguage},
    error::HighlightError,
    highlighter::Highlighter,
    modes::Common,
    options::Options,
    plugin::{BeforeHighlight, Plugin},
    result::HighlightResult,
    tree::{Node, Scope},
};

fn strict() -> Highlighter {
    Highlighter::with_options(Options {
        safe_mode: false,
        ..Default::default()
    })
}

fn single(name: &str, def: LanguageDef) -> Highlighter {
    let mut highlighter = Highlighter::new();
    highlighter.register_language(name, def).unwrap();
    highlighter
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(a, b)| ((*a).to_owned(), (*b).to_owned()))
        .collect()
}

/// A small C-like language touching most rule features.
fn toy() -> LanguageDef {
    let mut def = LanguageDef::new("Toy").aliases(&["ty"]);
    let common = Common::add_to(&mut def);
    let params = def.add(
        ModeDef::span("params", r"\(", r"\)")
            .contains([Child::SelfRef, common.quote_string.into()]),
    );
    let block = def.add(
        ModeDef::span("block", r"\{", r"\}")
            .contains([Child::SelfRef, common.c_line_comment.into(), params.into()])
            .illegal("@"),
    );
    let root = def.root_mut();
    root.keywords = Some(
        Keywords::new()
            .category("keyword", "fn let|2 if")
            .category("literal", "true false"),
    );
    root.illegal = Some("@".to_owned());
    root.contains = vec![
        common.c_line_comment.into(),
        common.c_block_comment.into(),
        common.quote_string.into(),
        common.c_number.into(),
        params.into(),
        block.into(),
    ];
    def
}

fn nested_scope(tree: &Scope, index: usize) -> &Scope {
    match &tree.children[index] {
        Node::Scope(scope) => scope,
        Node::Text(text) => panic!("expected a scope, found text {text:?}"),
    }
}

proptest! {
    #[test]
    fn leaves_reproduce_input(input in r#"[a-z0-9(){}"'/*@ \n\\.é]{0,64}"#) {
        let highlighter = single("toy", toy());
        for ignore_illegals in [false, true] {
            let result = highlighter.highlight(&input, "toy", ignore_illegals).unwrap();
            prop_assert_eq!(result.tree.text(), input.clone());
        }
        let auto = highlighter.highlight_auto(&input, None);
        prop_assert_eq!(auto.tree.text(), input.clone());
    }

    #[test]
    fn leaves_reproduce_any_input(input in ".{0,64}") {
        let highlighter = single("toy", toy());
        let result = highlighter.highlight(&input, "toy", true).unwrap();
        prop_assert_eq!(result.tree.text(), input);
    }
}

#[test]
fn test_determinism() {
    let highlighter = single("toy", toy());
    let code = "fn main(a, \"b\") { let x = 0x1f; // done\n if (true) { y } }";
    let first = highlighter.highlight(code, "toy", false).unwrap();
    let second = highlighter.highlight(code, "toy", false).unwrap();
    assert_eq!(first.value, second.value);
    assert_eq!(first.relevance, second.relevance);
    assert_eq!(first.tree, second.tree);
    assert!(!first.illegal);
}

#[test]
fn test_earlier_rule_wins_tie() {
    let build = |first_wins: bool| {
        let mut def = LanguageDef::new("tie");
        let first = def.add(ModeDef::token("first", "ab"));
        let second = def.add(ModeDef::token("second", r"a\w"));
        def.root_mut().contains = match first_wins {
            true => vec![first.into(), second.into()],
            false => vec![second.into(), first.into()],
        };
        single("tie", def)
    };

    let result = build(true).highlight("ab", "tie", false).unwrap();
    assert_eq!(result.tree.classified(), pairs(&[("first", "ab")]));
    let result = build(false).highlight("ab", "tie", false).unwrap();
    assert_eq!(result.tree.classified(), pairs(&[("second", "ab")]));
}

#[test]
fn test_superset_loses_tie() {
    let language = |name: &str, superset_of: Option<&str>| {
        let mut def = LanguageDef::new(name);
        def.superset_of = superset_of.map(str::to_owned);
        def.root_mut().keywords = Some("shared".into());
        def
    };

    let mut highlighter = Highlighter::new();
    highlighter.register_language("plus", language("Plus", Some("base"))).unwrap();
    highlighter.register_language("base", language("Base", None)).unwrap();
    highlighter.register_language("other", language("Other", None)).unwrap();

    let result = highlighter.highlight_auto("shared", None);
    assert_eq!(result.relevance, 1);
    assert_eq!(result.language.as_deref(), Some("base"));
    assert_eq!(result.second_best().unwrap().language.as_deref(), Some("plus"));

    // without a superset relation registration order decides
    let subset = ["other".to_owned(), "base".to_owned()];
    let result = highlighter.highlight_auto("shared", Some(&subset));
    assert_eq!(result.language.as_deref(), Some("other"));
}

#[test]
fn test_superset_named_by_alias() {
    let language = |name: &str, alias: &str, superset_of: Option<&str>| {
        let mut def = LanguageDef::new(name).aliases(&[alias]);
        def.superset_of = superset_of.map(str::to_owned);
        def.root_mut().keywords = Some("shared".into());
        def
    };

    let mut highlighter = Highlighter::new();
    highlighter.register_language("plus", language("Plus", "p", Some("B"))).unwrap();
    highlighter.register_language("base", language("Base", "b", None)).unwrap();

    let subset = ["P".to_owned(), "b".to_owned(), "plus".to_owned()];
    let result = highlighter.highlight_auto("shared", Some(&subset));
    assert_eq!(result.relevance, 1);
    assert_eq!(result.language.as_deref(), Some("base"));
    let second = result.second_best().unwrap();
    assert_eq!(second.language.as_deref(), Some("plus"));
}

#[test]
fn test_reregistering_replaces_aliases() {
    let mut highlighter = single("toy", toy());
    highlighter.register_aliases(&["mine"], "toy");
    assert_eq!(highlighter.canonical_name("TY"), Some("toy"));

    highlighter.register_language("toy", toy().aliases(&["tz"])).unwrap();
    assert_eq!(highlighter.canonical_name("ty"), None);
    assert_eq!(highlighter.canonical_name("tz"), Some("toy"));
    // aliases added by hand stay
    assert_eq!(highlighter.canonical_name("mine"), Some("toy"));
    assert_eq!(highlighter.list_languages().collect::<Vec<_>>(), ["toy"]);
}

#[test]
fn test_safe_mode_never_throws() {
    let mut def = LanguageDef::new("minimal");
    def.root_mut().illegal = Some("@".to_owned());

    let highlighter = single("minimal", def.clone());
    let result = highlighter.highlight("a @ b", "minimal", false).unwrap();
    assert!(result.illegal);
    assert_eq!(result.relevance, 0);
    assert_eq!(result.tree.text(), "a @ b");
    let by = result.illegal_by.unwrap();
    assert_eq!(by.context, "a @ b");
    assert!(by.message.contains("\"@\""));

    let result = highlighter.highlight("a @ b", "minimal", true).unwrap();
    assert!(!result.illegal);
    assert_eq!(result.value, "a @ b");

    let mut strict = strict();
    strict.register_language("minimal", def).unwrap();
    match strict.highlight("a @ b", "minimal", false) {
        Err(HighlightError::Illegal { lexeme, mode, offset, .. }) => {
            assert_eq!(lexeme, "@");
            assert_eq!(mode, "<unnamed>");
            assert_eq!(offset, 2);
        }
        other => panic!("expected an illegal lexeme error, got {other:?}"),
    }
}

#[test]
fn test_keyword_relevance() {
    let mut def = LanguageDef::new("kw");
    def.root_mut().keywords = Some(Keywords::new().pattern(r"\w+").category("keyword", "foo|5"));
    let highlighter = single("kw", def);

    let result = highlighter.highlight("foo bar", "kw", false).unwrap();
    assert!(result.relevance >= 5);
    assert_eq!(result.tree.classified(), pairs(&[("keyword", "foo")]));
    assert_eq!(result.value, "<span class=\"hljs-keyword\">foo</span> bar");
}

#[test]
fn test_case_insensitive_keywords() {
    let mut def = LanguageDef::new("ci");
    def.case_insensitive = true;
    def.root_mut().keywords = Some("select from".into());
    let highlighter = single("ci", def);

    let result = highlighter.highlight("SELECT a From b", "ci", false).unwrap();
    assert_eq!(result.relevance, 2);
    assert_eq!(result.tree.classified(), pairs(&[("keyword", "SELECT"), ("keyword", "From")]));
}

#[test]
fn test_self_referential_nesting() {
    let mut def = LanguageDef::new("parens");
    let parens = def.add(ModeDef::span("paren", r"\(", r"\)").contains([Child::SelfRef]));
    def.root_mut().contains = vec![parens.into()];
    let highlighter = single("parens", def);

    let result = highlighter.highlight("(a(b)c)", "parens", false).unwrap();
    let tree = &result.tree;
    assert_eq!(tree.depth(), 2);
    let outer = nested_scope(tree, 0);
    assert_eq!(outer.kind.as_deref(), Some("paren"));
    assert_eq!(outer.children[0], Node::Text("(a".to_owned()));
    let inner = nested_scope(outer, 1);
    assert_eq!(inner.children, [Node::Text("(b)".to_owned())]);
    assert_eq!(outer.children[2], Node::Text("c)".to_owned()));
    assert_eq!(result.relevance, 2);

    let deep = "(".repeat(200) + &")".repeat(200);
    let result = highlighter.highlight(&deep, "parens", false).unwrap();
    assert_eq!(result.tree.depth(), 200);
}

#[test]
fn test_sub_language_delegation() {
    let mut inner = LanguageDef::new("Inner");
    inner.root_mut().keywords = Some("int".into());

    let mut outer = LanguageDef::new("Outer");
    let embedded = outer.add(ModeDef {
        begin: Begin::Pattern("<<".into()),
        end: End::Pattern(">>".into()),
        sub_language: Some(SubLanguage::Single("inner".into())),
        ..Default::default()
    }
    .flags(|f| {
        f.exclude_begin = true;
        f.exclude_end = true;
    }));
    outer.root_mut().contains = vec![embedded.into()];

    let mut highlighter = Highlighter::new();
    highlighter.register_language("inner", inner).unwrap();
    highlighter.register_language("outer", outer).unwrap();

    let result = highlighter.highlight("<<int x>>", "outer", false).unwrap();
    let direct = highlighter.highlight("int x", "inner", false).unwrap();

    let sub = nested_scope(&result.tree, 1);
    assert!(sub.sublanguage);
    assert_eq!(sub.kind.as_deref(), Some("inner"));
    assert_eq!(sub.children, direct.tree.children);
    assert_eq!(result.relevance, direct.relevance);
    assert_eq!(
        result.value,
        "&lt;&lt;<span class=\"inner\"><span class=\"hljs-keyword\">int</span> x</span>&gt;&gt;"
    );
}

#[test]
fn test_auto_sub_language() {
    let mut inner = LanguageDef::new("Inner");
    inner.root_mut().keywords = Some("int".into());

    let mut outer = LanguageDef::new("Outer");
    outer.disable_autodetect = true;
    let embedded = outer.add(ModeDef {
        begin: Begin::Pattern("<<".into()),
        end: End::Pattern(">>".into()),
        sub_language: Some(SubLanguage::Auto(Vec::new())),
        relevance: Some(0),
        ..Default::default()
    });
    outer.root_mut().contains = vec![embedded.into()];

    let mut highlighter = Highlighter::new();
    highlighter.register_language("inner", inner).unwrap();
    highlighter.register_language("outer", outer).unwrap();

    let result = highlighter.highlight("<<int>><<?>>", "outer", false).unwrap();
    // zero relevance delegations do not count
    assert_eq!(result.relevance, 0);
    let detected = nested_scope(&result.tree, 0);
    assert_eq!(detected.kind.as_deref(), Some("inner"));
    let undetected = nested_scope(&result.tree, 1);
    assert_eq!(undetected.kind, None);
    assert!(result.value.ends_with("&lt;&lt;?&gt;&gt;"));
}

#[test]
fn test_unknown_language() {
    let highlighter = Highlighter::new();
    assert!(matches!(
        highlighter.highlight("x", "nope", false),
        Err(HighlightError::UnknownLanguage(name)) if name == "nope"
    ));
}

#[test]
fn test_aliases_and_case() {
    let highlighter = single("Toy", toy());
    assert_eq!(highlighter.list_languages().collect::<Vec<_>>(), ["toy"]);
    assert_eq!(highlighter.canonical_name("TY"), Some("toy"));
    let result = highlighter.highlight("fn", "Ty", false).unwrap();
    assert_eq!(result.language.as_deref(), Some("Ty"));
    assert_eq!(result.relevance, 1);
    assert!(highlighter.auto_detection("toy"));
}

#[test]
fn test_flags() {
    let mut def = LanguageDef::new("flags");
    let excluded = def.add(ModeDef::span("string", "<", ">").flags(|f| {
        f.exclude_begin = true;
        f.exclude_end = true;
    }));
    let name = def.add(ModeDef::token("name", r"\[\w+"));
    let returned = def.add(
        ModeDef::span("tag", r"\[", r"\]")
            .flags(|f| f.return_begin = true)
            .contains([name]),
    );
    let skipped = def.add(ModeDef::new().begin(r"\|").end(r"\|").flags(|f| f.skip = true));
    def.root_mut().contains = vec![excluded.into(), returned.into(), skipped.into()];
    let highlighter = single("flags", def);

    let result = highlighter.highlight("<x>[div]|y|", "flags", false).unwrap();
    assert_eq!(
        result.tree.classified(),
        pairs(&[("string", "x"), ("name", "[div"), ("tag", "]")])
    );
    assert_eq!(result.tree.text(), "<x>[div]|y|");
}

#[test]
fn test_ends_parent() {
    let mut def = LanguageDef::new("ends");
    let inner = def.add(ModeDef::span("inner", "=", ";").flags(|f| f.ends_parent = true));
    let outer = def.add(ModeDef::span("outer", r"\[", r"\]").contains([inner]));
    def.root_mut().contains = vec![outer.into()];
    let highlighter = single("ends", def);

    let result = highlighter.highlight("[=a;b]", "ends", false).unwrap();
    assert_eq!(result.tree.classified(), pairs(&[("outer", "["), ("inner", "=a;")]));
    assert_eq!(result.tree.children.last(), Some(&Node::Text("b]".to_owned())));
}

#[test]
fn test_ends_with_parent() {
    let mut def = LanguageDef::new("ewp");
    let value = def.add(ModeDef::token("value", "=").ends_with_parent());
    let attr = def.add(ModeDef::span("attr", "<", ">").contains([value]));
    def.root_mut().contains = vec![attr.into()];
    let highlighter = single("ewp", def);

    let result = highlighter.highlight("<a=b>c", "ewp", false).unwrap();
    assert_eq!(result.tree.classified(), pairs(&[("attr", "<a"), ("value", "=b>")]));
}

#[test]
fn test_starts() {
    let mut def = LanguageDef::new("starts");
    let value = def.add(ModeDef {
        scope: Some("string".into()),
        end: End::Pattern("$".into()),
        ..Default::default()
    });
    let key = def.add(ModeDef::token("attr", r"\w+:").starts(value));
    def.root_mut().contains = vec![key.into()];
    let highlighter = single("starts", def);

    let result = highlighter.highlight("name: value\nx", "starts", false).unwrap();
    assert_eq!(result.tree.classified(), pairs(&[("attr", "name:"), ("string", " value")]));
}

#[test]
fn test_end_same_as_begin() {
    let mut def = LanguageDef::new("same");
    let delimited = def.add(ModeDef {
        scope: Some("string".into()),
        begin: Begin::Pattern("~+".into()),
        end: End::SameAsBegin,
        ..Default::default()
    });
    def.root_mut().contains = vec![delimited.into()];
    let highlighter = single("same", def);

    let result = highlighter.highlight("~~a~b~~c", "same", false).unwrap();
    assert_eq!(result.tree.classified(), pairs(&[("string", "~~a~b~~")]));
}

#[test]
fn test_end_guarded_by_capture() {
    let mut def = LanguageDef::new("heredoc");
    let heredoc = def.add(ModeDef {
        scope: Some("string".into()),
        begin: Begin::Pattern(r"<<(\w+)".into()),
        end: End::Pattern(r"^(\w+)$".into()),
        end_guard: Some(EndGuard::SameCaptureAsBegin),
        ..Default::default()
    });
    def.root_mut().contains = vec![heredoc.into()];
    let highlighter = single("heredoc", def);

    let result = highlighter.highlight("<<EOF\nfoo\nEOF\nbar", "heredoc", false).unwrap();
    assert_eq!(result.tree.classified(), pairs(&[("string", "<<EOF\nfoo\nEOF")]));
}

#[test]
fn test_begin_keywords_ignore_member_access() {
    let mut def = LanguageDef::new("member");
    let kw = def.add(ModeDef {
        scope: Some("statement".into()),
        begin: Begin::Keywords("if".into()),
        ..Default::default()
    });
    let ident = def.add(ModeDef::token("ident", r"\w+"));
    def.root_mut().contains = vec![kw.into(), ident.into()];
    let highlighter = single("member", def);

    let result = highlighter.highlight("x.if if", "member", false).unwrap();
    assert_eq!(
        result.tree.classified(),
        pairs(&[("ident", "x"), ("ident", "if"), ("keyword", "if")])
    );
}

#[test]
fn test_zero_width_collision() {
    let mut def = LanguageDef::new("zero");
    let structural = def.add(ModeDef::new());
    def.root_mut().contains = vec![structural.into()];

    let highlighter = single("zero", def.clone());
    let result = highlighter.highlight("ab", "zero", false).unwrap();
    assert!(!result.illegal);
    assert_eq!(result.tree.text(), "ab");

    let mut strict = strict();
    strict.register_language("zero", def).unwrap();
    assert!(matches!(
        strict.highlight("ab", "zero", false),
        Err(HighlightError::ZeroWidthMatch { offset: 0, .. })
    ));
}

#[test]
fn test_runaway_scan_is_caught() {
    let mut def = LanguageDef::new("runaway");
    let stuck = def.add(ModeDef {
        scope: Some("x".into()),
        begin: Begin::Pattern("(x)".into()),
        end: End::Pattern("()".into()),
        end_guard: Some(EndGuard::SameCaptureAsBegin),
        ..Default::default()
    });
    def.root_mut().contains = vec![stuck.into()];
    let highlighter = single("runaway", def);

    let result = highlighter.highlight("xy", "runaway", false).unwrap();
    assert!(result.illegal);
    assert!(matches!(result.error_raised, Some(HighlightError::InfiniteLoop { .. })));
    assert_eq!(result.tree.text(), "xy");
}

#[test]
fn test_zero_width_begin_inside_itself() {
    // every open rule matches its own empty begin again before anything else
    let mut def = LanguageDef::new("recurse");
    let nest = def.add(ModeDef::new().scope("x").end("z").contains([Child::SelfRef]));
    def.root_mut().contains = vec![nest.into()];

    let highlighter = single("recurse", def.clone());
    let result = highlighter.highlight("ab", "recurse", false).unwrap();
    assert!(!result.illegal);
    assert!(result.error_raised.is_none());
    assert_eq!(result.tree.text(), "ab");
    assert_eq!(result.tree.depth(), 3);

    let mut strict = strict();
    strict.register_language("recurse", def).unwrap();
    assert!(matches!(
        strict.highlight("ab", "recurse", false),
        Err(HighlightError::ZeroWidthMatch { offset: 0, .. })
    ));
}

#[test]
fn test_nesting_is_capped() {
    let code = "(".repeat(200_000);

    let highlighter = single("toy", toy());
    let result = highlighter.highlight(&code, "toy", false).unwrap();
    assert!(result.illegal);
    assert!(result.illegal_by.is_none());
    assert!(matches!(
        result.error_raised,
        Some(HighlightError::NestingTooDeep { limit: 1_000, .. })
    ));
    assert_eq!(result.relevance, 0);
    assert_eq!(result.tree.text(), code);

    let mut strict = strict();
    strict.register_language("toy", toy()).unwrap();
    assert!(matches!(
        strict.highlight(&code, "toy", false),
        Err(HighlightError::NestingTooDeep { .. })
    ));

    // just below the cap still highlights
    let shallow = "(".repeat(998) + &")".repeat(998);
    let result = highlighter.highlight(&shallow, "toy", false).unwrap();
    assert!(!result.illegal);
    assert_eq!(result.tree.depth(), 998);
}

#[test]
fn test_continuation() {
    let highlighter = single("toy", toy());
    let first = highlighter.highlight("x /* abc", "toy", false).unwrap();
    let top = first.top.as_ref().unwrap();
    assert_eq!(top.depth(), 1);
    assert_eq!(top.language(), "Toy");

    let second = highlighter
        .highlight_with_continuation("def */ x", "toy", false, Some(top))
        .unwrap();
    assert_eq!(second.tree.classified(), pairs(&[("comment", "def */")]));
    assert!(second.value.starts_with("<span class=\"hljs-comment\">def */</span>"));
}

#[test]
fn test_failed_registration() {
    let mut def = LanguageDef::new("Broken");
    let bad = def.add(ModeDef::token("x", "("));
    def.root_mut().contains = vec![bad.into()];

    let mut safe = Highlighter::new();
    assert!(safe.register_language("broken", def.clone()).is_err());
    let result = safe.highlight("a < b", "broken", false).unwrap();
    assert_eq!(result.value, "a &lt; b");
    assert!(!safe.auto_detection("broken"));

    let mut strict = strict();
    assert!(strict.register_language("broken", def).is_err());
    assert!(strict.get_language("broken").is_none());
}

#[test]
fn test_auto_baseline() {
    let highlighter = single("toy", toy());
    let result = highlighter.highlight_auto("nothing here", None);
    assert_eq!(result.language, None);
    assert_eq!(result.relevance, 0);
    assert_eq!(result.second_best().unwrap().language.as_deref(), Some("toy"));

    let result = highlighter.highlight_auto("fn x() { let y }", None);
    assert_eq!(result.language.as_deref(), Some("toy"));
    assert!(result.relevance >= 3);
    assert_eq!(result.second_best().unwrap().language, None);
}

#[test]
fn test_auto_skips_illegal_candidates() {
    let mut strict = strict();
    strict.register_language("toy", toy()).unwrap();
    let result = strict.highlight_auto("fn @", None);
    assert_eq!(result.language, None);
    let second = result.second_best().unwrap();
    assert!(second.illegal);
    assert_eq!(second.relevance, 0);
}

struct Canned;

impl Plugin for Canned {
    fn before_highlight(&self, context: &mut BeforeHighlight) {
        if context.code == "canned" {
            context.result = Some(HighlightResult::plain("canned", Some("none".into())));
        }
        context.code = context.code.replace("FN", "fn");
    }
    fn after_highlight(&self, result: &mut HighlightResult) {
        result.value.push_str("<!-- seen -->");
    }
}

#[test]
fn test_plugins() {
    let mut highlighter = single("toy", toy());
    highlighter.add_plugin(Canned);

    let result = highlighter.highlight("canned", "toy", false).unwrap();
    assert_eq!(result.language.as_deref(), Some("none"));
    assert_eq!(result.value, "canned<!-- seen -->");

    let result = highlighter.highlight("FN", "toy", false).unwrap();
    assert_eq!(result.value, "<span class=\"hljs-keyword\">fn</span><!-- seen -->");
}

#[test]
fn test_highlight_block() {
    let highlighter = single("toy", toy());

    let block = highlighter
        .highlight_block("language-toy", None, "fn <b>x</b> &amp; 1")
        .unwrap()
        .unwrap();
    assert_eq!(
        block.value,
        "<span class=\"hljs-keyword\">fn</span> <b>x</b> &amp; <span class=\"hljs-number\">1</span>"
    );
    assert_eq!(block.class_name, "language-toy hljs");
    assert_eq!(block.language.as_deref(), Some("toy"));

    let block = highlighter.highlight_block("", Some("ty"), "let").unwrap().unwrap();
    assert_eq!(block.class_name, "hljs toy");
    assert_eq!(block.relevance, 2);

    assert!(highlighter.highlight_block("nohighlight", None, "fn").unwrap().is_none());
    assert!(highlighter.highlight_block("lang-missing", None, "fn").unwrap().is_none());

    let block = highlighter.highlight_block("", None, "fn if").unwrap().unwrap();
    assert_eq!(block.language.as_deref(), Some("toy"));
    assert_eq!(block.second_best.unwrap().language, None);
}

#[test]
fn test_highlight_block_options() {
    let mut highlighter = Highlighter::with_options(Options {
        tab_replace: Some("  ".into()),
        use_br: true,
        class_prefix: "c-".into(),
        ..Default::default()
    });
    highlighter.register_language("toy", toy()).unwrap();

    let block = highlighter
        .highlight_block("toy", None, "fn<br>\tlet")
        .unwrap()
        .unwrap();
    assert_eq!(
        block.value,
        "<span class=\"c-keyword\">fn</span><br>  <span class=\"c-keyword\">let</span>"
    );
}

#[test]
fn test_result_json() {
    let highlighter = single("toy", toy());
    let result = highlighter.highlight("fn 1", "toy", false).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["language"], "toy");
    assert_eq!(json["relevance"], 1);
    assert_eq!(json["illegal"], false);
    assert_eq!(json["tree"]["children"][0]["kind"], "keyword");
    assert!(json.get("top").is_none());
    assert!(json.get("illegal_by").is_none());
}
