//! Re-inserting markup the input already carried into highlighted output.
//!
//! Both the original markup and the token tree are flattened into streams of
//! element start and stop events keyed by text offset, then interleaved. Where
//! the two disagree about nesting the highlighted elements are closed and
//! reopened around the original ones.

use std::collections::VecDeque;

use crate::{
    render::{class_for, escape_html, escape_html_into},
    tree::{Node, Scope},
};

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
}

impl Element {
    pub fn span(class: String) -> Element {
        Element {
            name: "span".to_owned(),
            attributes: vec![("class".to_owned(), class)],
        }
    }

    fn open_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            escape_html_into(value, out);
            out.push('"');
        }
        out.push('>');
    }

    fn close_into(&self, out: &mut String) {
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Start,
    Stop,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    /// Byte offset into the plain text.
    pub offset: usize,
    /// Index into [`NodeStream::elements`].
    pub element: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeStream {
    pub elements: Vec<Element>,
    pub events: Vec<Event>,
}

impl NodeStream {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn start(&mut self, element: Element, offset: usize) -> usize {
        let index = self.elements.len();
        self.elements.push(element);
        self.events.push(Event {
            kind: EventKind::Start,
            offset,
            element: index,
        });
        index
    }

    fn stop(&mut self, element: usize, offset: usize) {
        self.events.push(Event {
            kind: EventKind::Stop,
            offset,
            element,
        });
    }

    /// The elements a rendered token tree would produce.
    pub fn from_tree(tree: &Scope, class_prefix: &str) -> NodeStream {
        let mut stream = NodeStream::default();
        let mut offset = 0;
        stream.collect_tree(tree, class_prefix, &mut offset);
        stream
    }

    fn collect_tree(&mut self, node: &Scope, class_prefix: &str, offset: &mut usize) {
        let element = class_for(node, class_prefix).map(|c| self.start(Element::span(c), *offset));
        for child in &node.children {
            match child {
                Node::Text(text) => *offset += text.len(),
                Node::Scope(scope) => self.collect_tree(scope, class_prefix, offset),
            }
        }
        if let Some(element) = element {
            self.stop(element, *offset);
        }
    }

    /// Splits an HTML fragment into its text content and its elements.
    ///
    /// This is not a validating parser, it understands tags, comments and
    /// character references which is all highlighted blocks contain.
    pub fn from_markup(markup: &str) -> (String, NodeStream) {
        let mut text = String::new();
        let mut stream = NodeStream::default();
        let mut open: Vec<usize> = Vec::new();
        let mut rest = markup;

        while !rest.is_empty() {
            let Some(lt) = rest.find('<') else {
                decode_entities_into(rest, &mut text);
                break;
            };
            decode_entities_into(&rest[..lt], &mut text);
            rest = &rest[lt..];

            if let Some(comment) = rest.strip_prefix("<!--") {
                rest = match comment.find("-->") {
                    Some(end) => &comment[end + 3..],
                    None => "",
                };
                continue;
            }

            let Some(gt) = rest.find('>') else {
                // a stray `<` is text
                decode_entities_into(rest, &mut text);
                break;
            };
            let tag = &rest[1..gt];
            rest = &rest[gt + 1..];

            if let Some(name) = tag.strip_prefix('/') {
                let name = name.trim().to_ascii_lowercase();
                // close the innermost element with that name, and everything opened inside it
                if let Some(pos) = open.iter().rposition(|&e| stream.elements[e].name == name) {
                    while open.len() > pos {
                        if let Some(element) = open.pop() {
                            stream.stop(element, text.len());
                        }
                    }
                }
                continue;
            }

            let self_closing = tag.ends_with('/');
            let tag = tag.trim_end_matches('/');
            let Some(element) = parse_tag(tag) else {
                decode_entities_into(&format!("<{tag}>"), &mut text);
                continue;
            };
            let void = VOID_ELEMENTS.contains(&element.name.as_str());
            let index = stream.start(element, text.len());
            if self_closing && !void {
                stream.stop(index, text.len());
            } else if !void {
                open.push(index);
            }
        }

        while let Some(element) = open.pop() {
            stream.stop(element, text.len());
        }

        (text, stream)
    }
}

fn parse_tag(tag: &str) -> Option<Element> {
    let name_end = tag.find(|c: char| c.is_whitespace()).unwrap_or(tag.len());
    let name = &tag[..name_end];
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == ':') {
        return None;
    }

    let mut attributes = Vec::new();
    let mut rest = tag[name_end..].trim_start();
    while !rest.is_empty() {
        let key_end = rest
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(rest.len());
        let key = rest[..key_end].to_ascii_lowercase();
        rest = rest[key_end..].trim_start();

        let mut value = String::new();
        if let Some(after) = rest.strip_prefix('=') {
            let after = after.trim_start();
            let (raw, remaining) = match after.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let inner = &after[1..];
                    match inner.find(quote) {
                        Some(end) => (&inner[..end], &inner[end + 1..]),
                        None => (inner, ""),
                    }
                }
                _ => {
                    let end = after.find(char::is_whitespace).unwrap_or(after.len());
                    (&after[..end], &after[end..])
                }
            };
            decode_entities_into(raw, &mut value);
            rest = remaining.trim_start();
        }
        if !key.is_empty() {
            attributes.push((key, value));
        }
    }

    Some(Element {
        name: name.to_ascii_lowercase(),
        attributes,
    })
}

pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    decode_entities_into(text, &mut out);
    out
}

fn decode_entities_into(mut text: &str, out: &mut String) {
    while let Some(amp) = text.find('&') {
        out.push_str(&text[..amp]);
        text = &text[amp..];
        let decoded = text[1..].find(';').filter(|&end| end <= 10).and_then(|end| {
            let name = &text[1..end + 1];
            let c = match name {
                "amp" => '&',
                "lt" => '<',
                "gt" => '>',
                "quot" => '"',
                "apos" => '\'',
                "nbsp" => '\u{a0}',
                _ => {
                    let number = name.strip_prefix('#')?;
                    let code = match number.strip_prefix('x').or_else(|| number.strip_prefix('X')) {
                        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                        None => number.parse().ok()?,
                    };
                    char::from_u32(code)?
                }
            };
            Some((c, end + 2))
        });
        match decoded {
            Some((c, len)) => {
                out.push(c);
                text = &text[len..];
            }
            None => {
                out.push('&');
                text = &text[1..];
            }
        }
    }
    out.push_str(text);
}

/// Interleaves two event streams over the same text into markup.
pub fn merge_streams(original: &NodeStream, highlighted: &NodeStream, text: &str) -> String {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Side {
        Original,
        Highlighted,
    }

    let mut queues = [
        original.events.iter().copied().collect::<VecDeque<_>>(),
        highlighted.events.iter().copied().collect::<VecDeque<_>>(),
    ];
    let streams = [original, highlighted];

    // which stream has the next event, closing tags of the highlighted stream
    // go before anything the original opens at the same offset
    let select = |queues: &[VecDeque<Event>; 2]| -> Side {
        match (queues[0].front(), queues[1].front()) {
            (Some(o), Some(h)) if o.offset != h.offset => match o.offset < h.offset {
                true => Side::Original,
                false => Side::Highlighted,
            },
            (Some(_), Some(h)) => match h.kind {
                EventKind::Start => Side::Original,
                EventKind::Stop => Side::Highlighted,
            },
            (Some(_), None) => Side::Original,
            _ => Side::Highlighted,
        }
    };

    let render = |event: Event, side: Side, out: &mut String| {
        let element = &streams[side as usize].elements[event.element];
        match event.kind {
            EventKind::Start => element.open_into(out),
            EventKind::Stop => element.close_into(out),
        }
    };

    let mut result = String::new();
    let mut processed = 0;
    // highlighted elements currently open
    let mut node_stack: Vec<usize> = Vec::new();

    while !queues[0].is_empty() || !queues[1].is_empty() {
        let mut side = select(&queues);
        let Some(offset) = queues[side as usize].front().map(|e| e.offset) else {
            break;
        };
        let offset = offset.clamp(processed, text.len());
        escape_html_into(&text[processed..offset], &mut result);
        processed = offset;

        match side {
            Side::Original => {
                for &element in node_stack.iter().rev() {
                    highlighted.elements[element].close_into(&mut result);
                }
                loop {
                    if let Some(event) = queues[0].pop_front() {
                        render(event, Side::Original, &mut result);
                    }
                    side = select(&queues);
                    let next_here = queues[0].front().is_some_and(|e| e.offset == processed);
                    if side != Side::Original || !next_here {
                        break;
                    }
                }
                for &element in &node_stack {
                    highlighted.elements[element].open_into(&mut result);
                }
            }
            Side::Highlighted => {
                if let Some(event) = queues[1].pop_front() {
                    match event.kind {
                        EventKind::Start => node_stack.push(event.element),
                        EventKind::Stop => {
                            node_stack.pop();
                        }
                    }
                    render(event, Side::Highlighted, &mut result);
                }
            }
        }
    }

    result.push_str(&escape_html(text.get(processed..).unwrap_or_default()));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TokenTree;

    #[test]
    fn test_from_markup() {
        let markup = r#"a<b class="x &amp; y">b &lt;c</b><br/>d<!-- no -->&#x41;&#66;&bogus;"#;
        let (text, stream) = NodeStream::from_markup(markup);
        assert_eq!(text, "ab <cdAB&bogus;");
        assert_eq!(stream.elements.len(), 2);
        assert_eq!(stream.elements[0].name, "b");
        assert_eq!(stream.elements[0].attributes, [("class".to_owned(), "x & y".to_owned())]);
        assert_eq!(stream.elements[1].name, "br");
        let events = stream
            .events
            .iter()
            .map(|e| (e.kind, e.offset, e.element))
            .collect::<Vec<_>>();
        assert_eq!(
            events,
            [
                (EventKind::Start, 1, 0),
                (EventKind::Stop, 5, 0),
                (EventKind::Start, 5, 1),
            ]
        );
    }

    #[test]
    fn test_merge_splits_highlighted_spans() {
        // "int x" with `int` highlighted and the original marking "nt x" bold
        let text = "int x";
        let mut tree = TokenTree::new();
        tree.add_keyword("int", "keyword");
        tree.add_text(" x");
        let highlighted = NodeStream::from_tree(&tree.finish(), "hljs-");
        let (plain, original) = NodeStream::from_markup("i<b>nt x</b>");
        assert_eq!(plain, text);

        assert_eq!(
            merge_streams(&original, &highlighted, text),
            r#"<span class="hljs-keyword">i</span><b><span class="hljs-keyword">nt</span> x</b>"#
        );
    }

    #[test]
    fn test_merge_close_before_open() {
        let text = "ab";
        let mut tree = TokenTree::new();
        tree.add_keyword("a", "keyword");
        tree.add_text("b");
        let highlighted = NodeStream::from_tree(&tree.finish(), "hljs-");
        let (_, original) = NodeStream::from_markup("a<i>b</i>");

        assert_eq!(
            merge_streams(&original, &highlighted, text),
            r#"<span class="hljs-keyword">a</span><i>b</i>"#
        );
    }

    #[test]
    fn test_merge_without_original() {
        let mut tree = TokenTree::new();
        tree.add_keyword("x", "number");
        tree.add_text("<");
        let highlighted = NodeStream::from_tree(&tree.finish(), "p-");
        assert_eq!(
            merge_streams(&NodeStream::default(), &highlighted, "x<"),
            r#"<span class="p-number">x</span>&lt;"#
        );
    }
}
