//! wmm
//!
//! A streaming markup minifier: HTML, XHTML and XML front ends over shared
//! forward-only tokenizers, with pluggable CSS/JS backends for embedded
//! code.
//!
//! # Example
//! ```
//! use wmm::HtmlMinificationSettings;
//!
//! let result = wmm::minify_html("<p>Hello   world</p>", &HtmlMinificationSettings::default());
//! assert_eq!(result.minified_content, "<p>Hello world</p>");
//! assert!(result.is_ok());
//! ```

pub use wmm_core::{
    Attribute, AttrQuote, CssMinifier, JsMinifier, MarkupMinificationResult,
    MinificationErrorInfo, MinificationLogger, MinificationStatistics, MinifiedCode, NullCssMinifier,
    NullJsMinifier, NullLogger, ParseEvent, SourceCoordinates, TracingLogger,
};
pub use wmm_html::{
    HtmlMinificationSettings, HtmlMinifier, WhitespaceMinificationMode, XhtmlMinificationSettings,
    XhtmlMinifier,
};
pub use wmm_js::CrockfordJsMinifier;
pub use wmm_xml::{XmlMinificationSettings, XmlMinifier};

// Re-export sub-crates for advanced usage
pub use wmm_core as core;
pub use wmm_html as html;
pub use wmm_js as js;
pub use wmm_xml as xml;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Minify an HTML document with default backends
///
/// Embedded/inline scripts go through the bundled Crockford-style JS
/// minifier; CSS passes through unchanged.
pub fn minify_html(source: &str, settings: &HtmlMinificationSettings) -> MarkupMinificationResult {
    HtmlMinifier::new(settings.clone()).minify_with(
        source,
        &NullCssMinifier,
        &CrockfordJsMinifier,
        &TracingLogger,
        false,
    )
}

/// Minify an HTML document with explicit backends
pub fn minify_html_with(
    source: &str,
    settings: &HtmlMinificationSettings,
    css: &dyn CssMinifier,
    js: &dyn JsMinifier,
    generate_statistics: bool,
) -> MarkupMinificationResult {
    HtmlMinifier::new(settings.clone()).minify_with(
        source,
        css,
        js,
        &TracingLogger,
        generate_statistics,
    )
}

/// Minify an XHTML document with default backends
pub fn minify_xhtml(
    source: &str,
    settings: &XhtmlMinificationSettings,
) -> MarkupMinificationResult {
    XhtmlMinifier::new(settings.clone()).minify_with(
        source,
        &NullCssMinifier,
        &CrockfordJsMinifier,
        &TracingLogger,
        false,
    )
}

/// Minify an XHTML document with explicit backends
pub fn minify_xhtml_with(
    source: &str,
    settings: &XhtmlMinificationSettings,
    css: &dyn CssMinifier,
    js: &dyn JsMinifier,
    generate_statistics: bool,
) -> MarkupMinificationResult {
    XhtmlMinifier::new(settings.clone()).minify_with(
        source,
        css,
        js,
        &TracingLogger,
        generate_statistics,
    )
}

/// Minify an XML document
pub fn minify_xml(source: &str, settings: &XmlMinificationSettings) -> MarkupMinificationResult {
    XmlMinifier::new(settings.clone()).minify(source, false)
}

/// Minify an XML document, optionally collecting size statistics
pub fn minify_xml_with(
    source: &str,
    settings: &XmlMinificationSettings,
    generate_statistics: bool,
) -> MarkupMinificationResult {
    XmlMinifier::new(settings.clone()).minify(source, generate_statistics)
}
