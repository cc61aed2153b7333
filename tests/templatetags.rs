//! Integration tests for the STW template tags

use std::collections::HashMap;

use serde_json::json;
use stwtags::{
    parse_shrinkthewebimage, parse_stwimage, Argument, EmptyContext, Error, OptionValue,
    StwConfig, StwImageNode, TagLibrary,
};

fn settings() -> StwConfig {
    StwConfig::with_access_key("key")
}

#[test]
fn render_literal_url_and_alt() {
    let lib = TagLibrary::new(settings());
    let html = lib
        .render("{% shrinkthewebimage 'http://example.com' 'sm' 'Example' %}", &EmptyContext)
        .unwrap();
    assert_eq!(
        html,
        r#"<img src="http://images.shrinktheweb.com/xino.php?stwaccesskeyid=key&stwembed=1&stwsize=sm&stwurl=http%3A%2F%2Fexample.com" alt="Example"/>"#
    );
}

#[test]
fn render_from_json_context() {
    let lib = TagLibrary::new(settings());
    let ctx = json!({"author": {"url": "example.com", "description": "An author"}});
    let html = lib
        .render(
            "{% stwimage author.url author.description stwinside=1 stwdelay=5 stwxmax=320 %}",
            &ctx,
        )
        .unwrap();
    assert_eq!(
        html,
        r#"<img src="http://images.shrinktheweb.com/xino.php?stwaccesskeyid=key&stwdelay=5&stwembed=1&stwinside=1&stwxmax=320&stwurl=example.com" alt="An author"/>"#
    );
}

#[test]
fn render_unknown_variable_fails() {
    let lib = TagLibrary::new(settings());
    let err = lib
        .render("{% stwimage author.url 'alt' stwsize=lg %}", &HashMap::<String, String>::new())
        .unwrap_err();
    assert!(matches!(err, Error::ContextResolutionError(_)));
}

#[test]
fn missing_access_key_is_reported_as_config_error() {
    let lib = TagLibrary::new(StwConfig::default());
    let err = lib
        .render("{% stwimage 'u' 'a' stwsize=lg %}", &EmptyContext)
        .unwrap_err();
    assert!(matches!(err, Error::ConfigError(_)));
    assert!(err.is_syntax_error());
}

#[test]
fn access_key_on_the_tag_overrides_settings() {
    let lib = TagLibrary::new(settings());
    let node = lib.parse("stwimage 'u' 'a' stwaccesskeyid=other stwfull=1").unwrap();
    assert_eq!(node.options()["stwaccesskeyid"], OptionValue::from("other"));
}

#[test]
fn conflicting_sizing_fails_at_render() {
    let lib = TagLibrary::new(settings());
    // parsing accepts it, the conflict is caught before formatting
    let node = lib.parse("stwimage 'u' 'a' stwsize=lg stwfull=1").unwrap();
    assert!(matches!(node.render(&EmptyContext), Err(Error::SyntaxError(_))));
}

#[test]
fn shrinkthewebimage_parser_builds_sized_node() {
    let node = parse_shrinkthewebimage(&settings(), &["tag", "author.url", "sm", "alt"]).unwrap();
    assert_eq!(node.url(), &Argument::Reference("author.url".into()));
    assert_eq!(node.alt(), &Argument::Reference("alt".into()));
    assert_eq!(node.options()["stwsize"], OptionValue::from("sm"));
}

#[test]
fn stwimage_parser_builds_keyword_node() {
    let node = parse_stwimage(&settings(), &["tag", "url", "alt", "stwsize=lrg"]).unwrap();
    assert_eq!(node.options()["stwsize"], OptionValue::from("lrg"));
    assert!(matches!(
        parse_stwimage(&settings(), &["tag", "url", "alt", "size=lrg"]),
        Err(Error::SyntaxError(_))
    ));
}

#[test]
fn nodes_render_independently_across_threads() {
    let mut opts = stwtags::Options::new();
    opts.insert("stwsize".into(), "sm".into());
    let node = std::sync::Arc::new(StwImageNode::new(&settings(), "url", "'alt'", opts));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let node = node.clone();
            std::thread::spawn(move || {
                let ctx = json!({ "url": format!("site{}.com", i) });
                node.render(&ctx).unwrap()
            })
        })
        .collect();

    for (i, h) in handles.into_iter().enumerate() {
        let html = h.join().unwrap();
        assert!(html.ends_with(&format!("stwurl=site{}.com\" alt=\"alt\"/>", i)));
    }
}
