use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Text(String),
    Scope(Scope),
}

/// An interior node of the token tree.
///
/// `kind` is the classification, the root and nodes of sub-languages which
/// failed to detect have none.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// The node holds the output of another language, `kind` is then its name.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub sublanguage: bool,
    pub children: Vec<Node>,
}

impl Scope {
    pub fn new(kind: Option<String>) -> Scope {
        Scope {
            kind,
            sublanguage: false,
            children: Vec::new(),
        }
    }

    pub fn text_leaf(text: &str) -> Scope {
        let mut scope = Scope::default();
        if !text.is_empty() {
            scope.children.push(Node::Text(text.to_owned()));
        }
        scope
    }

    pub fn walk<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        renderer.open_node(self);
        for child in &self.children {
            match child {
                Node::Text(text) => renderer.add_text(text),
                Node::Scope(scope) => scope.walk(renderer),
            }
        }
        renderer.close_node(self);
    }

    /// All leaves concatenated.
    pub fn text(&self) -> String {
        let mut buf = String::new();
        self.text_into(&mut buf);
        buf
    }

    fn text_into(&self, buf: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => buf.push_str(text),
                Node::Scope(scope) => scope.text_into(buf),
            }
        }
    }

    /// Depth of the deepest scope, the root counts as zero.
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|c| match c {
                Node::Text(_) => 0,
                Node::Scope(s) => 1 + s.depth(),
            })
            .max()
            .unwrap_or(0)
    }

    /// Every classified leaf as `(kind, text)`, innermost classification wins.
    pub fn classified(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        self.classified_into(None, &mut out);
        out
    }

    fn classified_into(&self, parent: Option<&str>, out: &mut Vec<(String, String)>) {
        let kind = self.kind.as_deref().or(parent);
        for child in &self.children {
            match child {
                Node::Text(text) => {
                    if let Some(kind) = kind {
                        out.push((kind.to_owned(), text.clone()));
                    }
                }
                Node::Scope(scope) => scope.classified_into(kind, out),
            }
        }
    }

    pub fn display_into(&self, buf: &mut dyn fmt::Write) -> fmt::Result {
        self.display_impl(buf, 0)
    }

    fn display_impl(&self, buf: &mut dyn fmt::Write, depth: usize) -> fmt::Result {
        for child in &self.children {
            for _ in 0..depth {
                buf.write_str("  ")?;
            }
            match child {
                Node::Text(text) => writeln!(buf, "{text:?}")?,
                Node::Scope(scope) => {
                    match (&scope.kind, scope.sublanguage) {
                        (Some(kind), true) => writeln!(buf, "[{kind}]")?,
                        (Some(kind), false) => writeln!(buf, "{kind}")?,
                        (None, _) => writeln!(buf, "<scope>")?,
                    }
                    scope.display_impl(buf, depth + 1)?;
                }
            }
        }
        Ok(())
    }
}

/// Receives a depth first walk of a token tree.
pub trait Renderer {
    fn add_text(&mut self, text: &str);
    fn open_node(&mut self, node: &Scope);
    fn close_node(&mut self, node: &Scope);
}

/// Builds a token tree from a stream of open, text and close calls.
#[derive(Debug)]
pub struct TokenTree {
    stack: Vec<Scope>,
}

impl Default for TokenTree {
    fn default() -> Self {
        TokenTree::new()
    }
}

impl TokenTree {
    pub fn new() -> TokenTree {
        TokenTree {
            stack: vec![Scope::default()],
        }
    }

    fn top(&mut self) -> &mut Scope {
        // the root is never popped
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    pub fn add_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        // merge with a preceding leaf so equal inputs give equal trees
        // regardless of how the scanner chunked them
        if let Some(Node::Text(prev)) = self.top().children.last_mut() {
            prev.push_str(text);
            return;
        }
        self.top().children.push(Node::Text(text.to_owned()));
    }

    pub fn add_keyword(&mut self, text: &str, kind: &str) {
        if text.is_empty() {
            return;
        }
        self.open_node(kind);
        self.add_text(text);
        self.close_node();
    }

    pub fn add_sublanguage(&mut self, mut tree: Scope, language: Option<&str>) {
        tree.kind = language.map(str::to_owned);
        tree.sublanguage = true;
        self.top().children.push(Node::Scope(tree));
    }

    pub fn open_node(&mut self, kind: &str) {
        self.stack.push(Scope::new(Some(kind.to_owned())));
    }

    pub fn close_node(&mut self) {
        if self.stack.len() > 1 {
            if let Some(node) = self.stack.pop() {
                self.top().children.push(Node::Scope(node));
            }
        }
    }

    pub fn close_all_nodes(&mut self) {
        while self.stack.len() > 1 {
            self.close_node();
        }
    }

    pub fn finish(mut self) -> Scope {
        self.close_all_nodes();
        self.stack.pop().unwrap_or_default()
    }
}

#[test]
fn test_builder_nesting() {
    let mut tree = TokenTree::new();
    tree.add_text("a ");
    tree.open_node("string");
    tree.add_text("\"b");
    tree.add_keyword("c", "subst");
    tree.add_text("\"");
    tree.close_node();
    tree.add_text("");
    tree.open_node("comment");
    tree.add_text("// d");
    let root = tree.finish();

    assert_eq!(root.text(), "a \"bc\"// d");
    assert_eq!(root.depth(), 2);
    assert_eq!(
        root.classified(),
        [
            ("string".to_owned(), "\"b".to_owned()),
            ("subst".to_owned(), "c".to_owned()),
            ("string".to_owned(), "\"".to_owned()),
            ("comment".to_owned(), "// d".to_owned()),
        ]
    );
}

#[test]
fn test_json_shape() {
    let mut tree = TokenTree::new();
    tree.add_keyword("if", "keyword");
    tree.add_text(" x");
    tree.add_sublanguage(Scope::text_leaf("y"), Some("css"));
    let root = tree.finish();

    let json = serde_json::to_value(&root).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "children": [
                { "kind": "keyword", "children": ["if"] },
                " x",
                { "kind": "css", "sublanguage": true, "children": ["y"] },
            ]
        })
    );
    let back: Scope = serde_json::from_value(json).unwrap();
    assert_eq!(back, root);
}

#[test]
fn test_display() {
    let mut tree = TokenTree::new();
    tree.open_node("string");
    tree.add_text("'a'");
    let root = tree.finish();
    let mut buf = String::new();
    root.display_into(&mut buf).unwrap();
    assert_eq!(buf, "string\n  \"'a'\"\n");
}
