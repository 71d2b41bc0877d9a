//! CSS-style selectors for locating host elements
//!
//! Supported: `tag`, `*`, `#id`, `.class`, `[attr]`, `[attr=value]`,
//! the descendant (whitespace) and child (`>`) combinators, and `,` lists.

use std::iter::Peekable;
use std::str::Chars;

use super::{Document, NodeId};
use crate::error::{KvueError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList(Vec<ComplexSelector>);

#[derive(Debug, Clone, PartialEq, Eq)]
struct ComplexSelector {
    /// Compounds left to right; the combinator relates each to the previous one
    parts: Vec<(Combinator, CompoundSelector)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CompoundSelector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeSelector>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeSelector {
    name: String,
    value: Option<String>,
}

impl SelectorList {
    pub fn parse(input: &str) -> Result<Self> {
        let mut parser = SelectorParser {
            input,
            chars: input.chars().peekable(),
        };
        parser.list().map(Self)
    }

    pub fn matches(&self, document: &Document, node: NodeId) -> bool {
        self.0.iter().any(|complex| complex.matches(document, node))
    }
}

impl ComplexSelector {
    fn matches(&self, document: &Document, node: NodeId) -> bool {
        self.match_from(document, self.parts.len() - 1, node)
    }

    fn match_from(&self, document: &Document, idx: usize, node: NodeId) -> bool {
        let (combinator, compound) = &self.parts[idx];
        if !compound.matches(document, node) {
            return false;
        }
        if idx == 0 {
            return true;
        }
        match combinator {
            Combinator::Child => document
                .parent(node)
                .is_some_and(|parent| self.match_from(document, idx - 1, parent)),
            Combinator::Descendant => {
                let mut current = document.parent(node);
                while let Some(ancestor) = current {
                    if self.match_from(document, idx - 1, ancestor) {
                        return true;
                    }
                    current = document.parent(ancestor);
                }
                false
            }
        }
    }
}

impl CompoundSelector {
    fn matches(&self, document: &Document, node: NodeId) -> bool {
        let Some(tag) = document.tag_name(node) else {
            return false;
        };
        if self.tag.as_ref().is_some_and(|t| *t != tag) {
            return false;
        }
        if let Some(id) = &self.id {
            if document.get_attribute(node, "id").as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.is_empty() {
            let class_attr = document.get_attribute(node, "class").unwrap_or_default();
            let classes: Vec<&str> = class_attr.split_whitespace().collect();
            if !self.classes.iter().all(|c| classes.contains(&c.as_str())) {
                return false;
            }
        }
        self.attributes.iter().all(|sel| {
            match (document.get_attribute(node, &sel.name), &sel.value) {
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == *expected,
                (None, _) => false,
            }
        })
    }
}

struct SelectorParser<'a> {
    input: &'a str,
    chars: Peekable<Chars<'a>>,
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

impl SelectorParser<'_> {
    fn error(&self, details: impl Into<String>) -> KvueError {
        KvueError::InvalidSelector {
            selector: self.input.to_string(),
            details: details.into(),
        }
    }

    fn skip_whitespace(&mut self) -> bool {
        let mut skipped = false;
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.chars.next();
            skipped = true;
        }
        skipped
    }

    fn ident(&mut self) -> String {
        let mut out = String::new();
        while let Some(&c) = self.chars.peek() {
            if !is_ident_char(c) {
                break;
            }
            out.push(c);
            self.chars.next();
        }
        out
    }

    fn list(&mut self) -> Result<Vec<ComplexSelector>> {
        let mut list = Vec::new();
        loop {
            self.skip_whitespace();
            list.push(self.complex()?);
            self.skip_whitespace();
            match self.chars.next() {
                None => break,
                Some(',') => continue,
                Some(c) => return Err(self.error(format!("unexpected '{c}'"))),
            }
        }
        Ok(list)
    }

    fn complex(&mut self) -> Result<ComplexSelector> {
        let mut parts = Vec::new();
        let mut combinator = Combinator::Descendant;
        let mut dangling = false;

        loop {
            match self.compound()? {
                Some(compound) => parts.push((combinator, compound)),
                None if parts.is_empty() => return Err(self.error("expected a selector")),
                None if dangling => return Err(self.error("combinator without a right-hand side")),
                None => break,
            }
            dangling = false;

            let had_whitespace = self.skip_whitespace();
            match self.chars.peek() {
                Some('>') => {
                    self.chars.next();
                    self.skip_whitespace();
                    combinator = Combinator::Child;
                    dangling = true;
                }
                Some(',') | None => break,
                Some(_) if had_whitespace => combinator = Combinator::Descendant,
                Some(&c) => return Err(self.error(format!("unexpected '{c}'"))),
            }
        }

        Ok(ComplexSelector { parts })
    }

    fn compound(&mut self) -> Result<Option<CompoundSelector>> {
        let mut compound = CompoundSelector::default();
        let mut any = false;

        match self.chars.peek() {
            Some('*') => {
                self.chars.next();
                any = true;
            }
            Some(&c) if is_ident_char(c) => {
                compound.tag = Some(self.ident().to_ascii_lowercase());
                any = true;
            }
            _ => {}
        }

        loop {
            match self.chars.peek() {
                Some('#') => {
                    self.chars.next();
                    let id = self.ident();
                    if id.is_empty() {
                        return Err(self.error("empty id"));
                    }
                    compound.id = Some(id);
                }
                Some('.') => {
                    self.chars.next();
                    let class = self.ident();
                    if class.is_empty() {
                        return Err(self.error("empty class"));
                    }
                    compound.classes.push(class);
                }
                Some('[') => {
                    self.chars.next();
                    let attribute = self.attribute()?;
                    compound.attributes.push(attribute);
                }
                _ => break,
            }
            any = true;
        }

        Ok(any.then_some(compound))
    }

    fn attribute(&mut self) -> Result<AttributeSelector> {
        self.skip_whitespace();
        let name = self.ident();
        if name.is_empty() {
            return Err(self.error("empty attribute name"));
        }
        self.skip_whitespace();

        let value = if self.chars.peek() == Some(&'=') {
            self.chars.next();
            self.skip_whitespace();
            let value = match self.chars.peek().copied() {
                Some(quote @ ('"' | '\'')) => {
                    self.chars.next();
                    let mut value = String::new();
                    loop {
                        match self.chars.next() {
                            Some(c) if c == quote => break,
                            Some(c) => value.push(c),
                            None => return Err(self.error("unterminated string")),
                        }
                    }
                    value
                }
                _ => self.ident(),
            };
            self.skip_whitespace();
            Some(value)
        } else {
            None
        };

        match self.chars.next() {
            Some(']') => Ok(AttributeSelector { name, value }),
            _ => Err(self.error("expected ']'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document::from_markup(
            r#"<div id="app" class="main wide"><ul><li class="item">a</li><li class="item active" data-id="2">b</li></ul></div><p id="other"></p>"#,
        )
    }

    fn tags(document: &Document, selector: &str) -> Vec<String> {
        document
            .query_selector_all(selector)
            .unwrap()
            .into_iter()
            .map(|n| document.text_content(n))
            .collect()
    }

    #[test]
    fn id_selector() {
        let document = doc();
        let app = document.query_selector("#app").unwrap().unwrap();
        assert_eq!(document.tag_name(app).as_deref(), Some("div"));
        assert!(document.query_selector("#missing").unwrap().is_none());
    }

    #[test]
    fn compound_selectors() {
        let document = doc();
        assert!(document.query_selector("div#app.main.wide").unwrap().is_some());
        assert!(document.query_selector("p#app").unwrap().is_none());
        assert_eq!(tags(&document, "li.item"), vec!["a", "b"]);
        assert_eq!(tags(&document, "li.active"), vec!["b"]);
        assert_eq!(tags(&document, "[data-id]"), vec!["b"]);
        assert_eq!(tags(&document, "li[data-id='2']"), vec!["b"]);
        assert_eq!(tags(&document, "li[data-id=3]"), Vec::<String>::new());
    }

    #[test]
    fn combinators() {
        let document = doc();
        assert_eq!(tags(&document, "#app li"), vec!["a", "b"]);
        assert_eq!(tags(&document, "#app > ul > li.active"), vec!["b"]);
        assert!(document.query_selector("#app > li").unwrap().is_none());
    }

    #[test]
    fn selector_lists_keep_document_order() {
        let document = doc();
        let found = document.query_selector_all("#other, #app").unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(document.get_attribute(found[0], "id").as_deref(), Some("app"));
    }

    #[test]
    fn malformed_selectors_are_errors() {
        for bad in ["", "#", ".", "div >", "[x", "a,", "div!"] {
            let err = SelectorList::parse(bad).unwrap_err();
            assert_eq!(err.code(), "KVUE-001", "{bad:?} should be rejected");
        }
    }
}
