//! STW Tags
//!
//! Template tags that render an `<img>` element pointing at the ShrinkTheWeb
//! screenshot service. A tag invocation is parsed once into an
//! [`StwImageNode`], which merges the site-wide default options with the
//! options given on the tag and renders against a per-request context.
//!
//! # Example
//!
//! ```
//! use stwtags::{StwConfig, TagLibrary};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let library = TagLibrary::new(StwConfig::with_access_key("abc123"));
//! let context = json!({"author": {"url": "example.com"}});
//!
//! let html = library.render("{% stwimage author.url 'Example' stwsize=lg %}", &context)?;
//! assert_eq!(
//!     html,
//!     r#"<img src="http://images.shrinktheweb.com/xino.php?stwaccesskeyid=abc123&stwembed=1&stwsize=lg&stwurl=example.com" alt="Example"/>"#
//! );
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod context;
pub mod node;
pub mod options;
pub mod tags;

pub use context::{Argument, Context, EmptyContext};
pub use node::StwImageNode;
pub use options::{OptionValue, Options};
pub use tags::{parse_shrinkthewebimage, parse_stwimage, split_contents, TagLibrary};

/// Site-wide STW settings
///
/// Holds the default options applied to every tag, typically at least the
/// `stwaccesskeyid`. Build it once at startup and share it read-only; nodes
/// copy what they need when they are created.
///
/// Serialized as a flat object of option names to values:
///
/// ```
/// let cfg: stwtags::StwConfig =
///     serde_json::from_str(r#"{"stwaccesskeyid": "abc", "stwembed": 0}"#).unwrap();
/// assert_eq!(cfg.defaults.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StwConfig {
    /// Options applied before the tag's own options
    pub defaults: Options,
}

impl StwConfig {
    pub fn new(defaults: Options) -> Self {
        Self { defaults }
    }

    /// Settings holding only the access key
    pub fn with_access_key(key: impl Into<String>) -> Self {
        let mut defaults = Options::new();
        defaults.insert(
            options::ACCESS_KEY.to_string(),
            OptionValue::Str(key.into()),
        );
        Self { defaults }
    }
}
