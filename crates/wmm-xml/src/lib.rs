//! wmm XML Minifier
//!
//! Streaming XML minification: inter-element whitespace removal, comment
//! stripping, empty-tag collapse and byte-exact ignore regions.

pub mod minifier;
pub mod settings;
pub mod tokenizer;

pub use minifier::XmlMinificationEngine;
pub use settings::XmlMinificationSettings;
pub use tokenizer::{XmlEvent, XmlTokenizer};

use wmm_core::{MarkupMinificationResult, MinificationLogger};

/// XML minifier
#[derive(Debug, Default)]
pub struct XmlMinifier {
    settings: XmlMinificationSettings,
}

impl XmlMinifier {
    pub fn new(settings: XmlMinificationSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &XmlMinificationSettings {
        &self.settings
    }

    pub fn minify(&self, source: &str, generate_statistics: bool) -> MarkupMinificationResult {
        XmlMinificationEngine::new(&self.settings).minify(source, generate_statistics)
    }

    pub fn minify_with(
        &self,
        source: &str,
        logger: &dyn MinificationLogger,
        generate_statistics: bool,
    ) -> MarkupMinificationResult {
        XmlMinificationEngine::new(&self.settings)
            .with_logger(logger)
            .minify(source, generate_statistics)
    }
}
