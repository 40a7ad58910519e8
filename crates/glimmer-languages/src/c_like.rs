use glimmer::{
    def::{Begin, Child, EndGuard, Keywords, LanguageDef, ModeDef},
    modes::{Common, IDENT_RE},
};

const NAMESPACE_RE: &str = r"[a-zA-Z_]\w*::";

const KEYWORDS: &str = "int float while private char char8_t char16_t char32_t catch import module \
    export virtual operator sizeof dynamic_cast|10 typedef const_cast|10 const for static_cast|10 \
    union namespace unsigned long volatile static protected bool template mutable if public friend \
    do goto auto void enum else break extern using asm case typeid wchar_t short \
    reinterpret_cast|10 default double register explicit signed typename try this switch continue \
    inline delete alignas alignof constexpr consteval constinit decltype concept co_await \
    co_return co_yield requires noexcept static_assert thread_local restrict final override \
    atomic_bool atomic_char atomic_schar atomic_uchar atomic_short atomic_ushort atomic_int \
    atomic_uint atomic_long atomic_ulong atomic_llong atomic_ullong new throw return and and_eq \
    bitand bitor compl not not_eq or or_eq xor xor_eq";

const BUILT_INS: &str = "std string wstring cin cout cerr clog stdin stdout stderr stringstream \
    istringstream ostringstream auto_ptr deque list queue stack vector map set pair bitset \
    multiset multimap unordered_set unordered_map unordered_multiset unordered_multimap \
    priority_queue make_pair array shared_ptr abort terminate abs acos asin atan2 atan calloc ceil \
    cosh cos exit exp fabs floor fmod fprintf fputs free frexp fscanf future isalnum isalpha \
    iscntrl isdigit isgraph islower isprint ispunct isspace isupper isxdigit tolower toupper labs \
    ldexp log10 log malloc realloc memchr memcmp memcpy memset modf pow printf putchar puts scanf \
    sinh sin snprintf sprintf sqrt sscanf strcat strchr strcmp strcpy strcspn strlen strncat \
    strncmp strncpy strpbrk strrchr strspn strstr tanh tan vfprintf vprintf vsprintf endl \
    initializer_list unique_ptr _Bool complex _Complex imaginary _Imaginary";

const CONTAINERS: &str = concat!(
    r"\b(deque|list|queue|priority_queue|pair|stack|vector|map|set|bitset|multiset|multimap|",
    r"unordered_map|unordered_set|unordered_multiset|unordered_multimap|array)\s*<",
);

fn keywords() -> Keywords {
    Keywords::new()
        .category("keyword", KEYWORDS)
        .category("built_in", BUILT_INS)
        .category("literal", "true false nullptr NULL")
}

/// String and character literals, `scope` is applied to every variant.
fn strings(escape: Child, scope: &str) -> ModeDef {
    let base = ModeDef::new().scope(scope);
    base.clone().variants(vec![
        base.clone().begin(r#"(u8?|U|L)?""#).end("\"").illegal(r"\n").contains([escape]),
        base.clone()
            .begin(r"(u8?|U|L)?'(\\(x[0-9A-Fa-f]{2}|u[0-9A-Fa-f]{4,8}|[0-7]{3}|\S)|.)")
            .end("'")
            .illegal("."),
        ModeDef {
            end_guard: Some(EndGuard::SameCaptureAsBegin),
            ..base
                .clone()
                .begin(r#"(?:u8?|U|L)?R"([^()\\ ]{0,16})\("#)
                .end(r#"\)([^()\\ ]{0,16})""#)
        },
    ])
}

/// The grammar shared by C and C++.
fn c_family(name: &str) -> LanguageDef {
    let mut def = LanguageDef::new(name);
    let common = Common::add_to(&mut def);
    let optional_namespace = format!("({NAMESPACE_RE})?");

    let line_continuation = def.add(ModeDef::new().begin(r"\\\n"));
    let line_comment = def.add(common.comment_with("//", "$", [line_continuation]));
    let block_comment = common.c_block_comment;
    let sized_type = def.add(ModeDef::token("keyword", r"\b[a-z\d_]*_t\b"));
    let string = def.add(strings(common.backslash_escape.into(), "string"));
    let number = def.add(ModeDef::new().scope("number").relevance(0).variants(vec![
        ModeDef::token("number", r"\b(0b[01']+)").relevance(0),
        ModeDef::token(
            "number",
            r"(-?)\b([\d']+(\.[\d']*)?|\.[\d']+)(u|U|l|L|ul|UL|f|F|b|B)",
        )
        .relevance(0),
        ModeDef::token(
            "number",
            r"(-?)(\b0[xX][a-fA-F0-9']+|(\b[\d']+(\.[\d']*)?|\.[\d']+)([eE][-+]?[\d']+)?)",
        )
        .relevance(0),
    ]));

    let escaped_newline = def.add(ModeDef::new().begin(r"\\\n").relevance(0));
    let meta_string = def.add(strings(common.backslash_escape.into(), "meta-string"));
    let include_path = def.add(ModeDef::span("meta-string", "<.*?>", "$").illegal(r"\n"));
    let preprocessor = def.add(
        ModeDef::span("meta", r"#\s*[a-z]+\b", "$")
            .keywords(Keywords::new().category(
                "meta-keyword",
                "if else elif endif define undef warning error line pragma _Pragma ifdef ifndef \
                 include",
            ))
            .contains([escaped_newline, meta_string, include_path, line_comment, block_comment]),
    );

    let title = def.add(
        ModeDef::token("title", &format!("{optional_namespace}{IDENT_RE}")).relevance(0),
    );
    let function_title_re = format!(r"{optional_namespace}{IDENT_RE}\s*\(");
    let return_type_re = format!(r"(decltype\(auto\)|{optional_namespace}[a-zA-Z_]\w*(<[^<>]+>)?)");

    let common_children = [preprocessor, sized_type, line_comment, block_comment, number, string];

    let nested_parens = def.add(
        ModeDef::new()
            .begin(r"\(")
            .end(r"\)")
            .keywords(keywords())
            .relevance(0)
            .contains(common_children.map(Child::from).into_iter().chain([Child::SelfRef])),
    );
    let expression_base = ModeDef::new().keywords(keywords()).relevance(0);
    let expression_base = expression_base
        .contains(common_children)
        .contains([nested_parens]);
    let expression = def.add(expression_base.clone().variants(vec![
        expression_base.clone().begin("=").end(";"),
        expression_base.clone().begin(r"\(").end(r"\)"),
        ModeDef {
            begin: Begin::Keywords("new throw return else".to_owned()),
            ..expression_base.clone().end(";")
        },
    ]));

    let decltype_auto = def.add(
        ModeDef::new()
            .begin(r"decltype\(auto\)")
            .keywords(keywords())
            .relevance(0),
    );
    let function_name = def.add(
        ModeDef::new()
            .begin(&function_title_re)
            .flags(|f| f.return_begin = true)
            .relevance(0)
            .contains([title]),
    );
    let inner_params = def.add(
        ModeDef::new()
            .begin(r"\(")
            .end(r"\)")
            .keywords(keywords())
            .relevance(0)
            .contains([Child::SelfRef])
            .contains([line_comment, block_comment, string, number, sized_type]),
    );
    let params = def.add(
        ModeDef::span("params", r"\(", r"\)")
            .keywords(keywords())
            .relevance(0)
            .contains([line_comment, block_comment, string, number, sized_type, inner_params]),
    );
    let function_begin = format!(r"({return_type_re}[\*&\s]+)+{function_title_re}");
    let function = def.add(
        ModeDef::span("function", &function_begin, "[{;=]")
            .flags(|f| {
                f.return_begin = true;
                f.exclude_end = true;
            })
            .keywords(keywords())
            .illegal(r"[^\w\s\*&:<>]")
            .contains([
                decltype_auto,
                function_name,
                params,
                sized_type,
                line_comment,
                block_comment,
                preprocessor,
            ]),
    );

    let template = def.add(
        ModeDef::new()
            .begin(CONTAINERS)
            .end(">")
            .keywords(keywords())
            .contains([Child::SelfRef, sized_type.into()]),
    );
    let qualified = def.add(ModeDef::new().begin(&format!("{IDENT_RE}::")).keywords(keywords()));
    let class_modifier = def.add(ModeDef {
        begin: Begin::Keywords("final class struct".to_owned()),
        ..Default::default()
    });
    let class = def.add(
        ModeDef {
            begin: Begin::Keywords("enum class struct union".to_owned()),
            ..ModeDef::new().scope("class").end("[{;:<>=]")
        }
        .contains([class_modifier, common.title]),
    );

    let root = def.root_mut();
    root.keywords = Some(keywords());
    root.illegal = Some("</".to_owned());
    root.contains = [expression, function]
        .into_iter()
        .chain(common_children)
        .chain([preprocessor, template, qualified, class])
        .map(Child::from)
        .collect();
    def
}

pub fn cpp() -> LanguageDef {
    c_family("C++").aliases(&["cc", "c++", "h++", "hpp", "hh", "hxx", "cxx"])
}

/// C shares the C++ grammar but never takes part in auto-detection.
pub fn c() -> LanguageDef {
    let mut def = c_family("C").aliases(&["c", "h"]);
    def.disable_autodetect = true;
    def
}
