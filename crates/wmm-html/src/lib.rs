//! wmm HTML Minifier
//!
//! Streaming HTML/XHTML minification: a single forward pass over the
//! source through a pull tokenizer, rendered back out by a policy-driven
//! engine. Whitespace handling, comment stripping, attribute rewriting
//! and embedded CSS/JS delegation are all governed by
//! [`HtmlMinificationSettings`].

pub mod doctype;
pub mod elements;
pub mod engine;
pub mod frameworks;
pub mod knockout;
pub mod settings;
pub mod tokenizer;

pub use engine::{HtmlMinificationEngine, HtmlPolicy, MarkupPolicy, XhtmlPolicy};
pub use settings::{HtmlMinificationSettings, WhitespaceMinificationMode, XhtmlMinificationSettings};
pub use tokenizer::{HtmlEvent, HtmlTokenizer};

use wmm_core::{CssMinifier, JsMinifier, MarkupMinificationResult, MinificationLogger};

/// HTML5 minifier
#[derive(Debug, Default)]
pub struct HtmlMinifier {
    settings: HtmlMinificationSettings,
}

impl HtmlMinifier {
    pub fn new(settings: HtmlMinificationSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &HtmlMinificationSettings {
        &self.settings
    }

    /// Minify a document with pass-through CSS/JS backends
    pub fn minify(&self, source: &str, generate_statistics: bool) -> MarkupMinificationResult {
        HtmlMinificationEngine::new(&self.settings, HtmlPolicy).minify(source, generate_statistics)
    }

    /// Minify a document with explicit backends and logger
    pub fn minify_with(
        &self,
        source: &str,
        css: &dyn CssMinifier,
        js: &dyn JsMinifier,
        logger: &dyn MinificationLogger,
        generate_statistics: bool,
    ) -> MarkupMinificationResult {
        HtmlMinificationEngine::new(&self.settings, HtmlPolicy)
            .with_css_minifier(css)
            .with_js_minifier(js)
            .with_logger(logger)
            .minify(source, generate_statistics)
    }
}

/// XHTML minifier
///
/// Shares the HTML engine; rendering keeps XML well-formedness (explicit
/// attribute values, ` />` on void elements).
#[derive(Debug, Default)]
pub struct XhtmlMinifier {
    settings: XhtmlMinificationSettings,
}

impl XhtmlMinifier {
    pub fn new(settings: XhtmlMinificationSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &XhtmlMinificationSettings {
        &self.settings
    }

    pub fn minify(&self, source: &str, generate_statistics: bool) -> MarkupMinificationResult {
        HtmlMinificationEngine::new(&self.settings, XhtmlPolicy).minify(source, generate_statistics)
    }

    pub fn minify_with(
        &self,
        source: &str,
        css: &dyn CssMinifier,
        js: &dyn JsMinifier,
        logger: &dyn MinificationLogger,
        generate_statistics: bool,
    ) -> MarkupMinificationResult {
        HtmlMinificationEngine::new(&self.settings, XhtmlPolicy)
            .with_css_minifier(css)
            .with_js_minifier(js)
            .with_logger(logger)
            .minify(source, generate_statistics)
    }
}
