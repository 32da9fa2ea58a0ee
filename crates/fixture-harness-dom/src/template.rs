// crates/fixture-harness-dom/src/template.rs
// ============================================================================
// Module: Template Descriptors
// Description: Single-element template parsing and directive name matching.
// Purpose: Turn template text into a tag, attributes, and directive names.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A template is one element written as `<tag attr name="value"></tag>` or
//! `<tag attr/>`, optionally with plain text between the tags. Attribute and
//! tag names are matched against directives after normalization: `data-` and
//! `x-` prefixes are stripped and `-`, `:`, or `_` separated words are joined
//! in camel case, so `heavy-load` and `data-heavy-load` both select
//! `heavyLoad`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Serialize;

use crate::error::DomError;

// ============================================================================
// SECTION: Descriptor
// ============================================================================

/// A parsed single-element template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateDescriptor {
    /// Element tag name, lowercased.
    tag: String,
    /// Attributes as written, keyed by lowercased name.
    attributes: BTreeMap<String, String>,
    /// Text between the opening and closing tags.
    text: String,
}

impl TemplateDescriptor {
    /// Returns the element tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the raw attributes.
    #[must_use]
    pub const fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Returns the inner text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns normalized candidate directive names, tag first.
    #[must_use]
    pub fn directive_names(&self) -> Vec<String> {
        let mut names = vec![normalize_directive_name(&self.tag)];
        for name in self.attributes.keys() {
            let normalized = normalize_directive_name(name);
            if !names.contains(&normalized) {
                names.push(normalized);
            }
        }
        names
    }

    /// Returns attributes keyed by normalized name.
    #[must_use]
    pub fn normalized_attributes(&self) -> BTreeMap<String, String> {
        self.attributes
            .iter()
            .map(|(name, value)| (normalize_directive_name(name), value.clone()))
            .collect()
    }
}

impl FromStr for TemplateDescriptor {
    type Err = DomError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Cursor::new(input.trim()).parse()
    }
}

// ============================================================================
// SECTION: Name Normalization
// ============================================================================

/// Normalizes an attribute or tag name into its directive name.
#[must_use]
pub fn normalize_directive_name(name: &str) -> String {
    let lowered = name.to_ascii_lowercase();
    let stripped = lowered
        .strip_prefix("data-")
        .or_else(|| lowered.strip_prefix("x-"))
        .unwrap_or(&lowered);
    let mut normalized = String::with_capacity(stripped.len());
    let mut upper_next = false;
    for ch in stripped.chars() {
        if matches!(ch, '-' | ':' | '_') {
            upper_next = !normalized.is_empty();
        } else if upper_next {
            normalized.push(ch.to_ascii_uppercase());
            upper_next = false;
        } else {
            normalized.push(ch);
        }
    }
    normalized
}

// ============================================================================
// SECTION: Parser
// ============================================================================

/// Byte cursor over template text.
struct Cursor<'a> {
    /// Template text.
    input: &'a str,
    /// Current byte offset.
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the start of `input`.
    const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
        }
    }

    /// Returns the unread remainder.
    fn rest(&self) -> &'a str {
        self.input.get(self.pos ..).unwrap_or("")
    }

    /// Consumes `token` when the remainder starts with it.
    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    /// Consumes characters while `predicate` holds and returns them.
    fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest.find(|ch| !predicate(ch)).unwrap_or(rest.len());
        self.pos += len;
        rest.get(.. len).unwrap_or("")
    }

    /// Skips whitespace.
    fn skip_whitespace(&mut self) {
        self.take_while(char::is_whitespace);
    }

    /// Builds a template error at the current position.
    fn error(&self, message: &str) -> DomError {
        DomError::Template(format!("{message} at offset {}", self.pos))
    }

    /// Parses one element.
    fn parse(mut self) -> Result<TemplateDescriptor, DomError> {
        if !self.eat("<") {
            return Err(self.error("expected '<'"));
        }
        let tag = self.take_while(is_name_char).to_ascii_lowercase();
        if tag.is_empty() {
            return Err(self.error("expected a tag name"));
        }
        let mut attributes = BTreeMap::new();
        loop {
            self.skip_whitespace();
            if self.eat("/>") {
                return self.finish(tag, attributes, String::new());
            }
            if self.eat(">") {
                break;
            }
            let name = self.take_while(is_name_char).to_ascii_lowercase();
            if name.is_empty() {
                return Err(self.error("expected an attribute name"));
            }
            let value = self.attribute_value()?;
            if attributes.insert(name.clone(), value).is_some() {
                return Err(DomError::Template(format!("duplicate attribute: {name}")));
            }
        }
        let text = self.take_while(|ch| ch != '<').trim().to_string();
        if !self.eat("</") {
            return Err(self.error("expected a closing tag"));
        }
        let closing = self.take_while(is_name_char).to_ascii_lowercase();
        if closing != tag {
            return Err(DomError::Template(format!(
                "closing tag </{closing}> does not match <{tag}>"
            )));
        }
        self.skip_whitespace();
        if !self.eat(">") {
            return Err(self.error("expected '>'"));
        }
        self.finish(tag, attributes, text)
    }

    /// Parses an optional `=value` suffix.
    fn attribute_value(&mut self) -> Result<String, DomError> {
        self.skip_whitespace();
        if !self.eat("=") {
            return Ok(String::new());
        }
        self.skip_whitespace();
        for quote in ['"', '\''] {
            let mut buf = [0_u8; 4];
            let quote_str = quote.encode_utf8(&mut buf);
            if self.eat(quote_str) {
                let value = self.take_while(|ch| ch != quote).to_string();
                if !self.eat(quote_str) {
                    return Err(self.error("unterminated attribute value"));
                }
                return Ok(value);
            }
        }
        let value = self.take_while(|ch| !ch.is_whitespace() && ch != '>' && ch != '/');
        if value.is_empty() {
            return Err(self.error("expected an attribute value"));
        }
        Ok(value.to_string())
    }

    /// Rejects trailing input and builds the descriptor.
    fn finish(
        self,
        tag: String,
        attributes: BTreeMap<String, String>,
        text: String,
    ) -> Result<TemplateDescriptor, DomError> {
        if !self.rest().trim().is_empty() {
            return Err(self.error("unexpected trailing content"));
        }
        Ok(TemplateDescriptor {
            tag,
            attributes,
            text,
        })
    }
}

/// Returns true for characters allowed in tag and attribute names.
fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '-' | ':' | '_' | '.')
}

// ============================================================================
// SECTION: Tests
// ============================================================================
