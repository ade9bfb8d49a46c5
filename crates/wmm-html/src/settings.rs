//! Minification settings
//!
//! A flat set of independently toggleable options, immutable for the
//! duration of one minify call. The defaults match what is safe on almost
//! any document: collapse whitespace, drop comments, keep everything that
//! could change rendering or script behavior.

use serde::{Deserialize, Serialize};

/// How aggressively inter-element whitespace is rewritten
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum WhitespaceMinificationMode {
    /// Leave whitespace verbatim
    None,
    /// Collapse runs of whitespace to one space
    #[default]
    Safe,
    /// Also trim whitespace just inside block-level elements
    Medium,
    /// Also remove whitespace between adjacent block-level tags
    Aggressive,
}

/// Settings for the HTML minifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HtmlMinificationSettings {
    pub whitespace_mode: WhitespaceMinificationMode,
    /// Drop HTML comments (framework markers are always kept)
    pub remove_html_comments: bool,
    /// Strip `<!--`/`-->` wrappers inside `<script>`/`<style>` bodies
    pub remove_html_comments_from_scripts_and_styles: bool,
    /// Rewrite `checked="checked"` to `checked`
    pub collapse_boolean_attributes: bool,
    /// Drop attribute/value pairs that restate defaults
    pub remove_redundant_attributes: bool,
    pub remove_http_protocol_from_attributes: bool,
    pub remove_https_protocol_from_attributes: bool,
    /// Drop elements with no attributes and no content
    pub remove_tags_without_content: bool,
    /// Rewrite any recognized doctype to `<!DOCTYPE html>`
    pub use_short_doctype: bool,
    /// Keep tag/attribute name case instead of lowercasing
    pub preserve_case: bool,
    pub minify_embedded_css_code: bool,
    pub minify_inline_css_code: bool,
    pub minify_embedded_js_code: bool,
    pub minify_inline_js_code: bool,
    pub minify_knockout_binding_expressions: bool,
    pub minify_angular_binding_expressions: bool,
    /// Extra directive names treated as Angular binding expressions
    pub custom_angular_directive_list: Vec<String>,
    /// Attribute names whose values are never rewritten
    pub preservable_attribute_list: Vec<String>,
    /// Comment substrings that exempt a comment from removal
    pub preservable_html_comment_list: Vec<String>,
}

impl Default for HtmlMinificationSettings {
    fn default() -> Self {
        Self {
            whitespace_mode: WhitespaceMinificationMode::Safe,
            remove_html_comments: true,
            remove_html_comments_from_scripts_and_styles: true,
            collapse_boolean_attributes: true,
            remove_redundant_attributes: false,
            remove_http_protocol_from_attributes: false,
            remove_https_protocol_from_attributes: false,
            remove_tags_without_content: false,
            use_short_doctype: true,
            preserve_case: false,
            minify_embedded_css_code: true,
            minify_inline_css_code: true,
            minify_embedded_js_code: true,
            minify_inline_js_code: true,
            minify_knockout_binding_expressions: false,
            minify_angular_binding_expressions: false,
            custom_angular_directive_list: Vec::new(),
            preservable_attribute_list: Vec::new(),
            preservable_html_comment_list: Vec::new(),
        }
    }
}

/// Settings for the XHTML minifier
///
/// Same surface as HTML; the differences (empty-attribute rendering,
/// `<br />` style self-closing) live in the markup policy, not here.
pub type XhtmlMinificationSettings = HtmlMinificationSettings;
