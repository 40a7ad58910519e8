use glimmer::{
    def::{Begin, Child, Keywords, LanguageDef, ModeDef, ModeRef},
    modes::{shebang, Common, RE_STARTERS_RE, UNDERSCORE_IDENT_RE},
};

const IDENT_RE: &str = r"[A-Za-z$_][0-9A-Za-z$_]*";

const KEYWORDS: &str = "as in of if for while finally var new function do return void else break \
    catch instanceof with throw case default try switch continue typeof delete let yield const \
    class debugger async await static import from export extends";

const TYPES: &str = "Intl DataView Number Math Date String RegExp Object Function Boolean Error \
    Symbol Set Map WeakSet WeakMap Proxy Reflect JSON Promise Float64Array Int16Array Int32Array \
    Int8Array Uint16Array Uint32Array Float32Array Array Uint8Array Uint8ClampedArray ArrayBuffer \
    BigInt64Array BigUint64Array BigInt EvalError InternalError RangeError ReferenceError \
    SyntaxError TypeError URIError";

const BUILT_INS: &str = "setInterval setTimeout clearInterval clearTimeout require exports eval \
    isFinite isNaN parseFloat parseInt decodeURI decodeURIComponent encodeURI encodeURIComponent \
    escape unescape arguments this super console window document localStorage module global";

const DECIMAL_DIGITS: &str = "[0-9](_?[0-9])*";
const DECIMAL_INTEGER: &str = "0|[1-9](_?[0-9])*|0[0-7]*[89][0-9]*";

fn keywords() -> Keywords {
    Keywords::new()
        .pattern(IDENT_RE)
        .category("keyword", KEYWORDS)
        .category("literal", "true false null undefined NaN Infinity")
        .category("built_in", format!("{TYPES} {BUILT_INS}"))
}

fn number() -> ModeDef {
    let frac = format!(r"\.({DECIMAL_DIGITS})");
    let base = ModeDef::new().scope("number").relevance(0);
    base.clone().variants(vec![
        base.clone().begin(&format!(
            r"(\b({DECIMAL_INTEGER})(({frac})|\.)?|({frac}))[eE][+-]?({DECIMAL_DIGITS})\b"
        )),
        base.clone().begin(&format!(r"\b({DECIMAL_INTEGER})\b(({frac})\b|\.)?|({frac})\b")),
        base.clone().begin(r"\b(0|[1-9](_?[0-9])*)n\b"),
        base.clone().begin(r"\b0[xX][0-9a-fA-F](_?[0-9a-fA-F])*n?\b"),
        base.clone().begin(r"\b0[bB][0-1](_?[0-1])*n?\b"),
        base.clone().begin(r"\b0[oO][0-7](_?[0-7])*n?\b"),
        base.clone().begin(r"\b0[0-7]+n?\b"),
    ])
}

/// A tagged template literal whose body is highlighted as `language`.
fn tagged_template(
    def: &mut LanguageDef,
    tag: &str,
    language: &str,
    children: [ModeRef; 2],
) -> ModeRef {
    let body = def.add(
        ModeDef::new()
            .end("`")
            .sub_language(language)
            .contains(children),
    );
    def.add(ModeDef::new().begin(&format!("{tag}`")).starts(body))
}

pub fn javascript() -> LanguageDef {
    let mut def = LanguageDef::new("JavaScript").aliases(&["js", "jsx", "mjs", "cjs"]);
    let common = Common::add_to(&mut def);
    let escape = common.backslash_escape;

    let number = def.add(number());
    let subst = def.add(ModeDef::span("subst", r"\$\{", r"\}").keywords(keywords()));
    let html_template = tagged_template(&mut def, "html", "xml", [escape, subst]);
    let css_template = tagged_template(&mut def, "css", "css", [escape, subst]);
    let template_string = def.add(ModeDef::span("string", "`", "`").contains([escape, subst]));

    let regexp_class = def.add(
        ModeDef::new()
            .begin(r"\[")
            .end(r"\]")
            .relevance(0)
            .contains([escape]),
    );
    let regexp = def.add(
        ModeDef::span("regexp", "/", "/[gimsuy]*")
            .illegal(r"\n")
            .contains([escape, regexp_class]),
    );

    let doc_type = def.add(ModeDef::span("type", r"\{", r"\}").relevance(0));
    let doc_variable = def.add(
        ModeDef::token("variable", &format!(r"{IDENT_RE}(\.{IDENT_RE})*"))
            .relevance(0)
            .flags(|f| f.ends_parent = true),
    );
    let doc_space = def.add(ModeDef::new().begin("[ \t]").relevance(0));
    let doc_tag = def.add(
        ModeDef::token("doctag", "@[A-Za-z]+")
            .relevance(0)
            .contains([doc_type, doc_variable, doc_space]),
    );
    let empty_block_comment = def.add(ModeDef::token("comment", r"/\*\*/").relevance(0));
    let jsdoc = def.add(common.comment_with(r"/\*\*", r"\*/", [doc_tag]).relevance(0));
    let comments = [empty_block_comment, jsdoc, common.c_block_comment, common.c_line_comment];

    let values = [
        common.apos_string,
        common.quote_string,
        html_template,
        css_template,
        template_string,
        number,
    ];
    let mut subst_contains = values.map(Child::from).to_vec();
    subst_contains.push(regexp.into());
    def.mode_mut(subst).contains = subst_contains;

    // comments go before regular expressions so `//` is never taken for one
    let mut params_contains = values
        .iter()
        .chain(&comments)
        .chain([&regexp])
        .copied()
        .map(Child::from)
        .collect::<Vec<_>>();
    let nested_parens = def.add(
        ModeDef::new()
            .begin(r"\(")
            .end(r"\)")
            .keywords(keywords())
            .contains([Child::SelfRef].into_iter().chain(params_contains.iter().copied())),
    );
    params_contains.push(nested_parens.into());

    let params = def.add(
        ModeDef::span("params", r"\(", r"\)")
            .flags(|f| {
                f.exclude_begin = true;
                f.exclude_end = true;
            })
            .keywords(keywords())
            .contains(params_contains.iter().copied()),
    );
    let arrow_params = def.add(ModeDef::new().scope("params").variants(vec![
        ModeDef::token("params", UNDERSCORE_IDENT_RE),
        ModeDef::new().begin(r"\(\s*\)").flags(|f| f.skip = true),
        ModeDef::span("params", r"\(", r"\)")
            .flags(|f| {
                f.exclude_begin = true;
                f.exclude_end = true;
            })
            .keywords(keywords())
            .contains(params_contains.iter().copied()),
    ]));
    let arrow_function = def.add(
        ModeDef::new()
            .scope("function")
            .begin(&format!(
                r"(\([^()]*(\([^()]*(\([^()]*\))*[^()]*\))*[^()]*\)|{UNDERSCORE_IDENT_RE})\s*=>"
            ))
            .end(r"\s*=>")
            .flags(|f| f.return_begin = true)
            .contains([arrow_params]),
    );

    // the places a `/` starts a regular expression rather than a division
    let mut value_contains = comments.map(Child::from).to_vec();
    value_contains.extend([regexp, arrow_function].map(Child::from));
    let value_start = def.add(ModeDef {
        begin: Begin::Pattern(format!(r"(?:{RE_STARTERS_RE}|\b(?:case|return|throw)\b)\s*")),
        keywords: Some("return throw case".into()),
        relevance: Some(0),
        contains: value_contains,
        ..Default::default()
    });

    let title = def.add(ModeDef::token("title", IDENT_RE).relevance(0));
    let function = def.add(
        ModeDef {
            scope: Some("function".to_owned()),
            begin: Begin::Keywords("function".to_owned()),
            ..Default::default()
        }
        .end("[{;]")
        .flags(|f| f.exclude_end = true)
        .keywords(keywords())
        .illegal("%")
        .contains([Child::SelfRef, title.into(), params.into()]),
    );
    let extends = def.add(ModeDef {
        begin: Begin::Keywords("extends".to_owned()),
        ..Default::default()
    });
    let class = def.add(
        ModeDef {
            scope: Some("class".to_owned()),
            begin: Begin::Keywords("class".to_owned()),
            ..Default::default()
        }
        .end("[{;=]")
        .flags(|f| f.exclude_end = true)
        .illegal(r#"[:"\[\]]"#)
        .contains([extends, common.underscore_title]),
    );
    let constructor = def.add(
        ModeDef::new()
            .begin(r"\bconstructor\b")
            .end("[{;]")
            .flags(|f| {
                f.return_begin = true;
                f.exclude_end = true;
            })
            .contains([title, params]),
    );
    let get_set = def.add(ModeDef {
        begin: Begin::Keywords("get set".to_owned()),
        ..Default::default()
    });
    let accessor = def.add(
        ModeDef::new()
            .begin(&format!(r"\b(get|set)\s+{IDENT_RE}\("))
            .end(r"\{")
            .flags(|f| f.return_begin = true)
            .contains([get_set, title, params]),
    );

    let attr = def.add(ModeDef::token("attr", IDENT_RE).relevance(0));
    let object_key = def.add(
        ModeDef::new()
            .begin(&format!(r"[{{,\n]\s*{IDENT_RE}\s*:"))
            .end(":")
            .relevance(0)
            .flags(|f| f.return_begin = true)
            .contains([attr]),
    );

    let use_strict = def.add(
        ModeDef::token("meta", r#"^\s*['"]use (strict|asm)['"]"#).relevance(10),
    );
    let node_shebang = def.add(shebang(Some("node")).relevance(5));
    let jquery = def.add(ModeDef::new().begin(r"\$[(.]"));
    let member = def.add(ModeDef::new().begin(&format!(r"\.\s*{IDENT_RE}")).relevance(0));

    let root = def.root_mut();
    root.keywords = Some(keywords());
    root.illegal = Some("#(?:[^$_A-Za-z]|$)".to_owned());
    root.contains = [node_shebang, use_strict]
        .into_iter()
        .chain(values)
        .chain(comments)
        .chain([object_key, value_start, function, class])
        .chain([constructor, accessor, jquery, member])
        .map(Child::from)
        .collect();
    def
}
