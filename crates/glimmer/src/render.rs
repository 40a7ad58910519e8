use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::tree::{Renderer, Scope};

lazy_static! {
    static ref FIX_MARKUP: Regex = Regex::new(r"(?m)\n|^(?:<[^>]+>|\t)*").unwrap();
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_html_into(text, &mut out);
    out
}

pub fn escape_html_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
}

/// Class attribute for a scope, `None` when the scope renders nothing.
pub fn class_for(node: &Scope, class_prefix: &str) -> Option<String> {
    let kind = node.kind.as_deref()?;
    match node.sublanguage {
        true => Some(kind.to_owned()),
        false => Some(format!("{class_prefix}{kind}")),
    }
}

pub struct HtmlRenderer<'a> {
    buffer: String,
    class_prefix: &'a str,
}

impl<'a> HtmlRenderer<'a> {
    pub fn new(class_prefix: &'a str) -> HtmlRenderer<'a> {
        HtmlRenderer {
            buffer: String::new(),
            class_prefix,
        }
    }

    pub fn render(tree: &Scope, class_prefix: &str) -> String {
        let mut renderer = HtmlRenderer::new(class_prefix);
        tree.walk(&mut renderer);
        renderer.finish()
    }

    pub fn finish(self) -> String {
        self.buffer
    }
}

impl Renderer for HtmlRenderer<'_> {
    fn add_text(&mut self, text: &str) {
        escape_html_into(text, &mut self.buffer);
    }

    fn open_node(&mut self, node: &Scope) {
        if let Some(class) = class_for(node, self.class_prefix) {
            self.buffer.push_str("<span class=\"");
            self.buffer.push_str(&class);
            self.buffer.push_str("\">");
        }
    }

    fn close_node(&mut self, node: &Scope) {
        if node.kind.is_some() {
            self.buffer.push_str("</span>");
        }
    }
}

/// Post-processes rendered markup, expanding tabs at the start of lines and
/// turning newlines into `<br>`.
pub fn fix_markup(value: &str, tab_replace: Option<&str>, use_br: bool) -> String {
    if tab_replace.is_none() && !use_br {
        return value.to_owned();
    }
    FIX_MARKUP
        .replace_all(value, |caps: &Captures| {
            let matched = &caps[0];
            if matched == "\n" {
                return match use_br {
                    true => "<br>".to_owned(),
                    false => matched.to_owned(),
                };
            }
            match tab_replace {
                Some(replacement) => matched.replace('\t', replacement),
                None => matched.to_owned(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TokenTree;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_render() {
        let mut tree = TokenTree::new();
        tree.add_keyword("int", "type");
        tree.add_text(" a < b");
        tree.add_sublanguage(Scope::text_leaf("x"), Some("css"));
        tree.add_sublanguage(Scope::text_leaf("y"), None);
        let root = tree.finish();
        assert_eq!(
            HtmlRenderer::render(&root, "hljs-"),
            r#"<span class="hljs-type">int</span> a &lt; b<span class="css">x</span>y"#
        );
    }

    #[test]
    fn test_fix_markup() {
        let value = "\t<span>\tx\ty</span>\n\tz";
        assert_eq!(fix_markup(value, None, false), value);
        assert_eq!(
            fix_markup(value, Some("  "), false),
            "  <span>  x\ty</span>\n  z"
        );
        assert_eq!(
            fix_markup(value, Some("  "), true),
            "  <span>  x\ty</span><br>  z"
        );
        assert_eq!(fix_markup("a\n\nb", None, true), "a<br><br>b");
    }
}
