//! The `<img>` renderer behind both STW tags

use log::debug;

use crate::context::{Argument, Context};
use crate::options::{self, Options};
use crate::{Result, StwConfig};

/// Endpoint serving the rendered screenshots
pub const STW_ENDPOINT: &str = "http://images.shrinktheweb.com/xino.php";

/// Name of the query parameter carrying the target URL
pub const URL_PARAM: &str = "stwurl";

/// A configured STW image tag, ready to render against any context.
///
/// Built once per tag occurrence when a template is parsed; `render` may be
/// called any number of times and from several threads.
#[derive(Debug, Clone, PartialEq)]
pub struct StwImageNode {
    url: Argument,
    alt: Argument,
    options: Options,
}

impl StwImageNode {
    /// Create a node from raw `url` and `alt` tokens. Site-wide defaults from
    /// `config` are applied first, then `options` on top.
    pub fn new(config: &StwConfig, url: &str, alt: &str, options: Options) -> Self {
        Self {
            url: Argument::parse(url),
            alt: Argument::parse(alt),
            options: options::merge(&config.defaults, options),
        }
    }

    pub fn url(&self) -> &Argument {
        &self.url
    }

    pub fn alt(&self) -> &Argument {
        &self.alt
    }

    /// Merged options, before validation
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Validated query parameters for this node
    pub fn url_params(&self) -> Result<Options> {
        options::build_url_params(self.options.clone())
    }

    /// Render the `<img>` element.
    ///
    /// `alt` and the resolved URL are not HTML-escaped; callers must sanitize
    /// untrusted values before they reach the context.
    pub fn render<C: Context + ?Sized>(&self, context: &C) -> Result<String> {
        let url = self.url.resolve(context)?;
        let alt = self.alt.resolve(context)?;
        let params = self.url_params()?;
        let html = format_img(&options::encode_query(&params), &url, &alt);
        debug!("rendered STW image for {}", url);
        Ok(html)
    }
}

/// Build the `<img>` element from an already-encoded query string.
pub fn format_img(encoded: &str, url: &str, alt: &str) -> String {
    let sep = if encoded.is_empty() { "" } else { "&" };
    format!(
        r#"<img src="{}?{}{}{}={}" alt="{}"/>"#,
        STW_ENDPOINT,
        encoded,
        sep,
        URL_PARAM,
        options::encode_value(url),
        alt
    )
}
