//! Minification result

use crate::error::MinificationErrorInfo;

/// Byte accounting for one minify call
///
/// Only populated when the caller asked for statistics; the engines skip
/// the bookkeeping entirely otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinificationStatistics {
    pub original_size: usize,
    pub minified_size: usize,
    /// Bytes of embedded/inline CSS seen in the original
    pub original_css_size: usize,
    pub minified_css_size: usize,
    /// Bytes of embedded/inline JS seen in the original
    pub original_js_size: usize,
    pub minified_js_size: usize,
}

impl MinificationStatistics {
    pub fn saved_bytes(&self) -> usize {
        self.original_size.saturating_sub(self.minified_size)
    }

    /// Relative savings, 0.0 to 100.0
    pub fn saved_percent(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        self.saved_bytes() as f64 * 100.0 / self.original_size as f64
    }
}

/// The outcome of one minify call
///
/// Malformed markup never aborts the call: best-effort minified content is
/// returned alongside the accumulated errors and warnings.
#[derive(Debug, Clone, Default)]
pub struct MarkupMinificationResult {
    pub minified_content: String,
    pub errors: Vec<MinificationErrorInfo>,
    pub warnings: Vec<MinificationErrorInfo>,
    pub statistics: Option<MinificationStatistics>,
}

impl MarkupMinificationResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}
