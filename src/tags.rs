//! Tag parsing: tokenizing an invocation and building an [`StwImageNode`]
//!
//! Two tags are provided:
//!
//! - `shrinkthewebimage url size alt` - the original tag using only the basic
//!   service features. `size` is one of the service size names such as `"mcr"`,
//!   `"tny"`, `"vsm"`, `"sm"`, `"lg"` or `"xlg"`.
//! - `stwimage url alt [stwkey=value ...]` - keyword based, supporting every
//!   service option, e.g. `stwimage author.url author.description stwinside=1
//!   stwdelay=5 stwsize=lrg`.
//!
//! `url` and `alt` are either quoted strings or variables resolved from the
//! render context.

use std::collections::BTreeMap;
use std::fmt;

use log::debug;

use crate::context::{strip_quotes, Context};
use crate::node::StwImageNode;
use crate::options::{OptionValue, Options, SIZE, STW_PREFIX};
use crate::{Error, Result, StwConfig};

pub const SHRINKTHEWEBIMAGE: &str = "shrinkthewebimage";
pub const STWIMAGE: &str = "stwimage";

/// Signature shared by every tag parser
pub type TagParser = fn(&StwConfig, &[String]) -> Result<StwImageNode>;

/// Split a tag invocation into whitespace separated bits.
///
/// Quoted runs are kept whole, quotes included, and may sit inside a bit
/// (`stwdelay="5"`). A backslash escapes the next character inside quotes.
/// Surrounding `{%` / `%}` delimiters are optional.
pub fn split_contents(invocation: &str) -> Result<Vec<String>> {
    let mut body = invocation.trim();
    if let Some(inner) = body.strip_prefix("{%").and_then(|b| b.strip_suffix("%}")) {
        body = inner.trim();
    }

    let mut bits = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) => {
                current.push(c);
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        current.push(escaped);
                    }
                } else if c == q {
                    quote = None;
                }
            }
            None if c.is_whitespace() => {
                if !current.is_empty() {
                    bits.push(std::mem::take(&mut current));
                }
            }
            None => {
                if c == '"' || c == '\'' {
                    quote = Some(c);
                }
                current.push(c);
            }
        }
    }

    if quote.is_some() {
        return Err(Error::SyntaxError(format!(
            "unterminated quote in tag: {}",
            invocation.trim()
        )));
    }
    if !current.is_empty() {
        bits.push(current);
    }
    Ok(bits)
}

fn tag_name<S: AsRef<str>>(bits: &[S], fallback: &str) -> String {
    bits.first()
        .map(|b| b.as_ref().to_string())
        .unwrap_or_else(|| fallback.to_string())
}

/// Parse `shrinkthewebimage url size alt`.
///
/// The size is always sent as `stwsize`; quotes around it are stripped but it
/// is never looked up in the context.
pub fn parse_shrinkthewebimage<S: AsRef<str>>(
    config: &StwConfig,
    bits: &[S],
) -> Result<StwImageNode> {
    if bits.len() != 4 {
        return Err(Error::SyntaxError(format!(
            "'{}' tag takes exactly 3 arguments",
            tag_name(bits, SHRINKTHEWEBIMAGE)
        )));
    }
    let raw_size = bits[2].as_ref();
    let size = strip_quotes(raw_size).unwrap_or(raw_size);

    let mut options = Options::new();
    options.insert(SIZE.to_string(), OptionValue::from(size));
    Ok(StwImageNode::new(
        config,
        bits[1].as_ref(),
        bits[3].as_ref(),
        options,
    ))
}

/// Parse `stwimage url alt [stwkey=value ...]`.
///
/// Only minimal checks are made on keywords: each needs a non-empty value and
/// the `stw` prefix. A repeated keyword keeps its last value.
pub fn parse_stwimage<S: AsRef<str>>(config: &StwConfig, bits: &[S]) -> Result<StwImageNode> {
    let name = tag_name(bits, STWIMAGE);
    if bits.len() < 3 {
        return Err(Error::SyntaxError(format!(
            "'{}' tag takes at least 2 arguments",
            name
        )));
    }

    let mut options = Options::new();
    for bit in &bits[3..] {
        let bit = bit.as_ref();
        let (key, value) = bit.split_once('=').ok_or_else(|| {
            Error::SyntaxError(format!(
                "'{}' tag keyword: {} is not of the form key=value",
                name, bit
            ))
        })?;
        if value.is_empty() {
            return Err(Error::SyntaxError(format!(
                "'{}' tag keyword: {} has no argument",
                name, key
            )));
        }
        if !key.starts_with(STW_PREFIX) {
            return Err(Error::SyntaxError(format!(
                "'{}' tag keyword: {} is not a valid STW keyword",
                name, key
            )));
        }
        options.insert(key.to_string(), OptionValue::from(value));
    }

    Ok(StwImageNode::new(
        config,
        bits[1].as_ref(),
        bits[2].as_ref(),
        options,
    ))
}

/// Tag registry: maps tag names to parsers and carries the site-wide config.
#[derive(Clone)]
pub struct TagLibrary {
    config: StwConfig,
    tags: BTreeMap<String, TagParser>,
}

impl fmt::Debug for TagLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagLibrary")
            .field("config", &self.config)
            .field("tags", &self.tags.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl TagLibrary {
    /// A library with both STW tags registered under their usual names
    pub fn new(config: StwConfig) -> Self {
        let mut lib = Self::empty(config);
        lib.register(SHRINKTHEWEBIMAGE, parse_shrinkthewebimage::<String>);
        lib.register(STWIMAGE, parse_stwimage::<String>);
        lib
    }

    /// A library with no tags registered
    pub fn empty(config: StwConfig) -> Self {
        Self {
            config,
            tags: BTreeMap::new(),
        }
    }

    /// Register `parser` under `name`, replacing any previous registration.
    pub fn register(&mut self, name: &str, parser: TagParser) {
        self.tags.insert(name.to_string(), parser);
    }

    pub fn config(&self) -> &StwConfig {
        &self.config
    }

    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    /// Tokenize `invocation` and hand it to the parser registered for its tag.
    pub fn parse(&self, invocation: &str) -> Result<StwImageNode> {
        let bits = split_contents(invocation)?;
        let name = bits
            .first()
            .ok_or_else(|| Error::SyntaxError("empty tag".to_string()))?;
        let parser = self
            .tags
            .get(name)
            .ok_or_else(|| Error::SyntaxError(format!("invalid tag: '{}'", name)))?;
        debug!("parsing '{}' tag with {} argument(s)", name, bits.len() - 1);
        parser(&self.config, &bits)
    }

    /// Parse `invocation` and render it against `context`.
    pub fn render<C: Context + ?Sized>(&self, invocation: &str, context: &C) -> Result<String> {
        self.parse(invocation)?.render(context)
    }
}
