use glimmer::{Highlighter, Node, Options, Scope};
use glimmer_languages::{highlighter, register_all, LANGUAGES};

fn strict() -> Highlighter {
    let mut highlighter = Highlighter::with_options(Options {
        safe_mode: false,
        ..Default::default()
    });
    register_all(&mut highlighter).unwrap();
    highlighter
}

fn classify(language: &str, code: &str) -> Vec<(String, String)> {
    let result = strict().highlight(code, language, false).unwrap();
    assert!(!result.illegal, "{language} flagged {code:?} as illegal");
    assert_eq!(result.tree.text(), code);
    result.tree.classified()
}

#[track_caller]
fn assert_classified(language: &str, code: &str, expected: &[(&str, &str)]) {
    let classified = classify(language, code);
    for (kind, text) in expected {
        assert!(
            classified.iter().any(|(k, t)| k == kind && t == text),
            "{language}: expected {kind} {text:?} in {classified:?}"
        );
    }
}

fn sublanguages(scope: &Scope) -> Vec<Option<String>> {
    let mut found = Vec::new();
    for child in &scope.children {
        if let Node::Scope(child) = child {
            if child.sublanguage {
                found.push(child.kind.clone());
            }
            found.extend(sublanguages(child));
        }
    }
    found
}

#[test]
fn test_all_languages_register() {
    let highlighter = strict();
    let names = highlighter.list_languages().collect::<Vec<_>>();
    assert_eq!(names.len(), LANGUAGES.len());
    assert_eq!(names[0], "xml");

    assert_eq!(highlighter.canonical_name("html"), Some("xml"));
    assert_eq!(highlighter.canonical_name("H"), Some("c"));
    assert_eq!(highlighter.canonical_name("hpp"), Some("cpp"));
    assert_eq!(highlighter.canonical_name("YML"), Some("yaml"));
    assert_eq!(highlighter.canonical_name("console"), Some("shell"));

    assert!(!highlighter.auto_detection("c"));
    assert!(!highlighter.auto_detection("plaintext"));
    assert!(highlighter.auto_detection("cpp"));
}

#[test]
fn test_json() {
    assert_classified(
        "json",
        "{\"a\": [1, true, null]}",
        &[("attr", "\"a\""), ("number", "1"), ("literal", "true"), ("literal", "null")],
    );
}

#[test]
fn test_python() {
    assert_classified(
        "python",
        "def f(x):\n    return 1\n",
        &[
            ("keyword", "def"),
            ("title", "f"),
            ("params", "x"),
            ("keyword", "return"),
            ("number", "1"),
        ],
    );
}

#[test]
fn test_python_decorator_leaves_comment() {
    assert_classified("python", "@cache # memo\n", &[("meta", "@cache "), ("comment", "# memo")]);
}

#[test]
fn test_bash() {
    assert_classified(
        "bash",
        "#!/bin/bash\necho \"$HOME\"\n",
        &[
            ("meta", "#!/bin/bash"),
            ("built_in", "echo"),
            ("variable", "$HOME"),
        ],
    );
}

#[test]
fn test_bash_heredoc() {
    let code = "cat <<EOF\nfi done\nEOF\nls";
    assert_classified("bash", code, &[("string", "EOF\nfi done\nEOF")]);
}

#[test]
fn test_xml() {
    assert_classified(
        "xml",
        "<a href=\"x\">t</a>",
        &[("name", "a"), ("attr", "href"), ("string", "\"x\"")],
    );
    let classified = classify("xml", "<a href=\"x\">t</a>");
    assert_eq!(classified.iter().filter(|(k, _)| k == "name").count(), 2);
}

#[test]
fn test_xml_embedded_css() {
    let highlighter = highlighter().unwrap();
    let result = highlighter
        .highlight("<style>a { color: red; }</style>", "xml", false)
        .unwrap();
    assert!(!result.illegal);
    assert_eq!(sublanguages(&result.tree), [Some("css".to_owned())]);
    assert!(result.tree.classified().contains(&("attribute".to_owned(), "color".to_owned())));
}

#[test]
fn test_xml_embedded_javascript() {
    let highlighter = highlighter().unwrap();
    let result = highlighter
        .highlight("<script>let x = 1;</script>", "xml", false)
        .unwrap();
    assert!(!result.illegal);
    assert_eq!(sublanguages(&result.tree), [Some("javascript".to_owned())]);
    let classified = result.tree.classified();
    assert!(classified.contains(&("keyword".to_owned(), "let".to_owned())));
    assert!(classified.contains(&("name".to_owned(), "script".to_owned())));
}

#[test]
fn test_javascript() {
    let code = "function add(a, b) {\n  return a + b; // sum\n}\nconst f = (x) => `${x}`;\n";
    assert_classified(
        "javascript",
        code,
        &[
            ("keyword", "function"),
            ("title", "add"),
            ("params", "a, b"),
            ("keyword", "return"),
            ("comment", "// sum"),
            ("keyword", "const"),
            ("params", "x"),
            ("subst", "${x}"),
        ],
    );
}

#[test]
fn test_javascript_regex_and_division() {
    let classified = classify("javascript", "let r = /a[/]b/g;\nlet q = a / b / c;\n");
    let regexps = classified.iter().filter(|(k, _)| k == "regexp").collect::<Vec<_>>();
    assert_eq!(regexps.len(), 1, "{classified:?}");
    assert_eq!(regexps[0].1, "/a[/]b/g");
}

#[test]
fn test_javascript_jsdoc() {
    assert_classified(
        "javascript",
        "/**\n * @param {number} count\n */\nlet o = { size: 1 };\n",
        &[
            ("doctag", "@param "),
            ("type", "{number}"),
            ("variable", "count"),
            ("attr", "size"),
            ("number", "1"),
        ],
    );
}

#[test]
fn test_markdown() {
    let code = "# Title\n\n- item with **bold** and [link](http://x.io)\n";
    assert_classified(
        "markdown",
        code,
        &[
            ("section", "# Title"),
            ("bullet", "-"),
            ("strong", "**bold**"),
            ("string", "link"),
            ("link", "http://x.io"),
        ],
    );
}

#[test]
fn test_markdown_blocks() {
    let code = "Title\n=====\n\n> quoted\n\n```\nfn main() {}\n```\n\n[ref]: http://x.io\n";
    assert_classified(
        "markdown",
        code,
        &[
            ("section", "Title\n====="),
            ("quote", "> quoted"),
            ("code", "```\nfn main() {}\n```"),
            ("symbol", "ref"),
            ("link", "http://x.io"),
        ],
    );
}

#[test]
fn test_css() {
    assert_classified(
        "css",
        "a { color: red; }",
        &[("selector-tag", "a"), ("attribute", "color")],
    );
}

#[test]
fn test_sql() {
    assert_classified("sql", "SELECT * FROM t;", &[("keyword", "SELECT"), ("keyword", "FROM")]);
}

#[test]
fn test_diff() {
    assert_classified(
        "diff",
        "--- a\n+++ b\n@@ -1,2 +1,2 @@\n-old\n+new\n",
        &[
            ("comment", "--- a"),
            ("comment", "+++ b"),
            ("meta", "@@ -1,2 +1,2 @@"),
            ("deletion", "-old"),
            ("addition", "+new"),
        ],
    );
}

#[test]
fn test_http() {
    let code = "GET /index.html HTTP/1.1\nHost: example.com\n\n{\"a\": 1}";
    assert_classified(
        "http",
        code,
        &[("keyword", "GET"), ("string", "/index.html"), ("attribute", "Host")],
    );
    let result = strict().highlight(code, "http", false).unwrap();
    assert_eq!(sublanguages(&result.tree).len(), 1);
}

#[test]
fn test_nginx() {
    assert_classified(
        "nginx",
        "server {\n  listen 80;\n}\n",
        &[("section", "server"), ("attribute", "listen"), ("number", "80")],
    );
}

#[test]
fn test_makefile() {
    assert_classified(
        "makefile",
        "CC := gcc\nall: main.o\n\t$(CC) -o $@\n",
        &[("section", "all: main.o"), ("variable", "$(CC)"), ("variable", "$@")],
    );
}

#[test]
fn test_cmake() {
    assert_classified(
        "cmake",
        "set(FOO ${BAR}) # note",
        &[("keyword", "set"), ("variable", "${BAR}"), ("comment", "# note")],
    );
}

#[test]
fn test_ini() {
    assert_classified(
        "ini",
        "[section]\nkey = \"value\"\n",
        &[("section", "[section]"), ("attr", "key"), ("string", "\"value\"")],
    );
}

#[test]
fn test_yaml() {
    assert_classified(
        "yaml",
        "name: demo\nlist:\n  - 1\n",
        &[("attr", "name: "), ("string", "demo"), ("attr", "list:"), ("number", "1")],
    );
}

#[test]
fn test_cpp_and_c() {
    let code = "int main() { return 0; }";
    for language in ["cpp", "c"] {
        assert_classified(
            language,
            code,
            &[("keyword", "int"), ("title", "main"), ("keyword", "return"), ("number", "0")],
        );
    }
}

#[test]
fn test_cpp_raw_string() {
    assert_classified("cpp", "auto s = R\"x(a)\" b)x\";", &[("string", "R\"x(a)\" b)x\"")]);
}

#[test]
fn test_shell_session() {
    assert_classified("shell", "$ echo hi\n", &[("meta", "$"), ("built_in", "echo")]);
}

#[test]
fn test_plaintext() {
    let classified = classify("plaintext", "fn main() {}");
    assert!(classified.is_empty());
}

#[test]
fn test_auto_detect() {
    let highlighter = highlighter().unwrap();
    let cases = [
        ("#!/usr/bin/env bash\necho hi\n", "bash"),
        ("<?xml version=\"1.0\"?>\n<root attr=\"1\"></root>\n", "xml"),
        ("@@ -1,2 +1,2 @@\n-old\n+new\n", "diff"),
    ];
    for (code, expected) in cases {
        let result = highlighter.highlight_auto(code, None);
        assert_eq!(result.language.as_deref(), Some(expected), "for {code:?}");
        assert!(result.second_best().is_some());
    }
}
