//! STW option sets: merging, validation and query encoding
//!
//! Every option understood by the rendering service is namespaced with the
//! `stw` prefix. An option set is built by overlaying call-site options on
//! top of the site-wide defaults, then validated once per render.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::{Error, Result};

/// Namespace prefix every STW keyword must carry
pub const STW_PREFIX: &str = "stw";

pub const ACCESS_KEY: &str = "stwaccesskeyid";
pub const EMBED: &str = "stwembed";
pub const SIZE: &str = "stwsize";
pub const XMAX: &str = "stwxmax";
pub const YMAX: &str = "stwymax";
pub const FULL: &str = "stwfull";

/// Embed mode used when none is given: return the image itself
pub const DEFAULT_EMBED: i64 = 1;

/// A scalar option value as accepted by the rendering service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Int(i64),
    Str(String),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Int(i) => write!(f, "{}", i),
            OptionValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Str(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Str(s)
    }
}

impl From<i64> for OptionValue {
    fn from(i: i64) -> Self {
        OptionValue::Int(i)
    }
}

/// Option name to value. Ordered so encoded queries are stable.
pub type Options = BTreeMap<String, OptionValue>;

/// Overlay `overrides` on top of `defaults`; overrides win on collision.
pub fn merge(defaults: &Options, overrides: Options) -> Options {
    let mut merged = defaults.clone();
    merged.extend(overrides);
    merged
}

/// Fill in the embed default and check the option set is usable.
///
/// Fails with [`Error::ConfigError`] when the access key is missing and with
/// [`Error::SyntaxError`] unless exactly one sizing mode is chosen: `stwsize`,
/// max dimensions (`stwxmax` and/or `stwymax`), or `stwfull`.
pub fn build_url_params(mut options: Options) -> Result<Options> {
    options
        .entry(EMBED.to_string())
        .or_insert(OptionValue::Int(DEFAULT_EMBED));

    if !options.contains_key(ACCESS_KEY) {
        return Err(Error::ConfigError(format!(
            "'{}' must be defined in the site-wide STW settings",
            ACCESS_KEY
        )));
    }

    let has_size = options.contains_key(SIZE);
    let has_dim_bound = options.contains_key(XMAX) || options.contains_key(YMAX);
    let has_full = options.contains_key(FULL);

    if has_size && (has_dim_bound || has_full) {
        return Err(Error::SyntaxError(format!(
            "'stwimage' tag does not allow '{}' and ('{}' or ('{}' and/or '{}')) keyword(s)",
            SIZE, FULL, XMAX, YMAX
        )));
    }
    if !has_size && !has_dim_bound && !has_full {
        return Err(Error::SyntaxError(format!(
            "'stwimage' tag requires '{}' or ('{}' or ('{}' and/or '{}')) keyword(s)",
            SIZE, FULL, XMAX, YMAX
        )));
    }

    Ok(options)
}

/// Encode options as `application/x-www-form-urlencoded` pairs joined by `&`.
pub fn encode_query(options: &Options) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in options {
        serializer.append_pair(key, &value.to_string());
    }
    serializer.finish()
}

/// Percent-encode a single value the same way `encode_query` does.
pub fn encode_value(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
