//! XML minification settings

use serde::{Deserialize, Serialize};

/// Knobs of the XML minifier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct XmlMinificationSettings {
    /// Drop whitespace-only text nodes and collapse runs inside mixed ones
    pub minify_whitespace: bool,
    /// Strip `<!-- -->` comments (ignore-region markers are always honored)
    pub remove_xml_comments: bool,
    /// Rewrite `<a></a>` as a self-closing tag
    pub collapse_tags_without_content: bool,
    /// Render self-closing tags as `<a />` rather than `<a/>`
    pub render_empty_tags_with_space: bool,
}

impl Default for XmlMinificationSettings {
    fn default() -> Self {
        Self {
            minify_whitespace: true,
            remove_xml_comments: true,
            collapse_tags_without_content: false,
            render_empty_tags_with_space: false,
        }
    }
}
