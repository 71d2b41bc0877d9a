//! Directive kinds and attribute classification

use std::fmt;

use serde::Serialize;

use crate::config::CompilerConfig;
use crate::dom::handler_property;

/// Closed set of structural directives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectiveKind {
    /// `k-text` - text content
    Text,
    /// `k-html` - inner markup
    Html,
    /// `k-model` - two-way form value
    Model,
}

impl DirectiveKind {
    pub const ALL: [DirectiveKind; 3] = [Self::Text, Self::Html, Self::Model];

    /// Name as written after the directive prefix
    pub fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Html => "html",
            Self::Model => "model",
        }
    }

    /// Case-sensitive lookup; unknown names are `None`
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeClass<'a> {
    /// Directive attribute; holds the name after the prefix (maybe unknown)
    Directive(&'a str),
    /// Event binding; holds the handler property (`@click` → `onclick`)
    Event(String),
    Plain,
}

pub fn classify_attribute<'a>(name: &'a str, config: &CompilerConfig) -> AttributeClass<'a> {
    if let Some(directive) = name.strip_prefix(config.directive_prefix.as_str()) {
        AttributeClass::Directive(directive)
    } else if let Some(event) = name.strip_prefix(config.event_prefix.as_str()) {
        AttributeClass::Event(handler_property(event))
    } else {
        AttributeClass::Plain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_are_case_sensitive() {
        assert_eq!(DirectiveKind::from_name("text"), Some(DirectiveKind::Text));
        assert_eq!(DirectiveKind::from_name("model"), Some(DirectiveKind::Model));
        assert_eq!(DirectiveKind::from_name("Text"), None);
        assert_eq!(DirectiveKind::from_name("show"), None);
    }

    #[test]
    fn classifies_attributes() {
        let config = CompilerConfig::default();
        assert_eq!(
            classify_attribute("k-text", &config),
            AttributeClass::Directive("text")
        );
        assert_eq!(
            classify_attribute("k-unknown", &config),
            AttributeClass::Directive("unknown")
        );
        assert_eq!(
            classify_attribute("@click", &config),
            AttributeClass::Event("onclick".to_string())
        );
        assert_eq!(classify_attribute("class", &config), AttributeClass::Plain);
        assert_eq!(classify_attribute("K-text", &config), AttributeClass::Plain);
    }

    #[test]
    fn custom_prefixes() {
        let config = CompilerConfig {
            directive_prefix: "v-".into(),
            event_prefix: "on:".into(),
            ..CompilerConfig::default()
        };
        assert_eq!(
            classify_attribute("v-html", &config),
            AttributeClass::Directive("html")
        );
        assert_eq!(
            classify_attribute("on:input", &config),
            AttributeClass::Event("oninput".to_string())
        );
        assert_eq!(classify_attribute("k-text", &config), AttributeClass::Plain);
    }
}
