//! Lenient markup parser and serializer helpers
//!
//! The parser never fails: unmatched close tags are dropped, unclosed
//! elements are closed at end of input, and a `<` that does not start a
//! tag is kept as text. This mirrors how `innerHTML` assignment behaves.
//!
//! There are no implied end tags: `<p>a<p>b` nests the second paragraph
//! inside the first instead of closing it, and the same holds for `li`,
//! `td` and other elements whose end tag HTML lets authors omit.

use std::borrow::Cow;

use super::node::{is_void_element, Attribute};

/// Parsed markup tree, detached from any document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    Element {
        tag: String,
        attributes: Vec<Attribute>,
        children: Vec<MarkupNode>,
    },
    Text(String),
    Comment(String),
}

/// Elements whose content is raw text up to the matching close tag
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

pub fn is_raw_text_element(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&tag)
}

struct OpenElement {
    tag: String,
    attributes: Vec<Attribute>,
    children: Vec<MarkupNode>,
}

impl OpenElement {
    fn finish(self) -> MarkupNode {
        MarkupNode::Element {
            tag: self.tag,
            attributes: self.attributes,
            children: self.children,
        }
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    root: Vec<MarkupNode>,
    open: Vec<OpenElement>,
}

/// Parse a markup fragment into a node list
pub fn parse_fragment(input: &str) -> Vec<MarkupNode> {
    let mut parser = Parser {
        src: input,
        pos: 0,
        root: Vec::new(),
        open: Vec::new(),
    };
    parser.run();
    parser.root
}

impl<'a> Parser<'a> {
    fn run(&mut self) {
        while self.pos < self.src.len() {
            let rest = self.rest();
            if rest.starts_with("<!--") {
                self.comment();
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                // doctype or processing instruction
                self.skip_past('>');
            } else if rest.starts_with("</") {
                self.close_tag();
            } else if rest.starts_with('<')
                && rest[1..].starts_with(|c: char| c.is_ascii_alphabetic())
            {
                self.start_tag();
            } else {
                self.text();
            }
        }

        while let Some(open) = self.open.pop() {
            self.push(open.finish());
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn read_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.src[start..self.pos]
    }

    fn skip_whitespace(&mut self) {
        self.read_while(char::is_whitespace);
    }

    fn skip_past(&mut self, ch: char) {
        self.pos = match self.rest().find(ch) {
            Some(i) => self.pos + i + ch.len_utf8(),
            None => self.src.len(),
        };
    }

    fn push(&mut self, node: MarkupNode) {
        let siblings = match self.open.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut self.root,
        };
        // Adjacent text merges into one node, as in a DOM parser
        if let (MarkupNode::Text(new), Some(MarkupNode::Text(prev))) = (&node, siblings.last_mut()) {
            prev.push_str(new);
            return;
        }
        siblings.push(node);
    }

    fn comment(&mut self) {
        let body_start = self.pos + 4;
        let (body, next) = match self.src[body_start..].find("-->") {
            Some(i) => (&self.src[body_start..body_start + i], body_start + i + 3),
            None => (&self.src[body_start..], self.src.len()),
        };
        self.push(MarkupNode::Comment(body.to_string()));
        self.pos = next;
    }

    fn text(&mut self) {
        // A lone '<' at the cursor is text; scan from the next char
        let first = self.peek().map_or(0, char::len_utf8);
        let end = match self.rest()[first..].find('<') {
            Some(i) => self.pos + first + i,
            None => self.src.len(),
        };
        let raw = &self.src[self.pos..end];
        self.pos = end;
        self.push(MarkupNode::Text(decode_entities(raw).into_owned()));
    }

    fn close_tag(&mut self) {
        self.pos += 2;
        let name = self
            .read_while(|c| c.is_ascii_alphanumeric() || c == '-')
            .to_ascii_lowercase();
        self.skip_past('>');
        if name.is_empty() {
            return;
        }
        let Some(depth) = self.open.iter().rposition(|open| open.tag == name) else {
            return;
        };
        while self.open.len() > depth {
            if let Some(open) = self.open.pop() {
                self.push(open.finish());
            }
        }
    }

    fn start_tag(&mut self) {
        self.pos += 1;
        let tag = self
            .read_while(|c| !c.is_whitespace() && c != '>' && c != '/')
            .to_ascii_lowercase();
        let mut attributes: Vec<Attribute> = Vec::new();
        let mut self_closing = false;

        loop {
            self.skip_whitespace();
            match self.peek() {
                None => break,
                Some('>') => {
                    self.bump();
                    break;
                }
                Some('/') => {
                    self.bump();
                    if self.peek() == Some('>') {
                        self.bump();
                        self_closing = true;
                        break;
                    }
                }
                Some(_) => {
                    let name =
                        self.read_while(|c| !c.is_whitespace() && c != '=' && c != '>' && c != '/');
                    if name.is_empty() {
                        // stray '=' and friends
                        self.bump();
                        continue;
                    }
                    self.skip_whitespace();
                    let value = if self.peek() == Some('=') {
                        self.bump();
                        self.skip_whitespace();
                        self.attribute_value()
                    } else {
                        ""
                    };
                    // First occurrence wins
                    if !attributes.iter().any(|a| a.name == name) {
                        attributes.push(Attribute::new(name, decode_entities(value)));
                    }
                }
            }
        }

        if is_void_element(&tag) || self_closing {
            self.push(MarkupNode::Element {
                tag,
                attributes,
                children: Vec::new(),
            });
        } else if is_raw_text_element(&tag) {
            let body = self.raw_text(&tag);
            let children = if body.is_empty() {
                Vec::new()
            } else {
                vec![MarkupNode::Text(body.to_string())]
            };
            self.push(MarkupNode::Element {
                tag,
                attributes,
                children,
            });
        } else {
            self.open.push(OpenElement {
                tag,
                attributes,
                children: Vec::new(),
            });
        }
    }

    fn attribute_value(&mut self) -> &'a str {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                let value = self.read_while(|c| c != quote);
                self.bump();
                value
            }
            _ => self.read_while(|c| !c.is_whitespace() && c != '>'),
        }
    }

    fn raw_text(&mut self, tag: &str) -> &'a str {
        let rest = self.rest();
        let closing = format!("</{tag}");
        // ASCII lowercasing keeps byte offsets stable
        match rest.to_ascii_lowercase().find(&closing) {
            Some(i) => {
                let body = &rest[..i];
                self.pos += i;
                self.skip_past('>');
                body
            }
            None => {
                self.pos = self.src.len();
                rest
            }
        }
    }
}

/// Decode character references in text or attribute values
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        if let Some(semi) = tail.find(';').filter(|&i| i <= 10) {
            if let Some(ch) = decode_entity(&tail[1..semi]) {
                out.push(ch);
                rest = &tail[semi + 1..];
                continue;
            }
        }
        out.push('&');
        rest = &tail[1..];
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Escape text content for serialization
pub fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Escape an attribute value for serialization inside double quotes
pub fn escape_attribute(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '"']) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 8);
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}
