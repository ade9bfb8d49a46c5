//! Collaborator traits
//!
//! The markup engines delegate embedded `<style>`/`<script>` bodies and
//! inline style/event attributes to pluggable CSS/JS backends, and report
//! diagnostics through a logger seam. All three are supplied per call;
//! nothing here is process-global.

use crate::coords::SourceCoordinates;
use crate::error::MinificationErrorInfo;

/// Output of a CSS/JS backend for one code fragment
#[derive(Debug, Clone, Default)]
pub struct MinifiedCode {
    pub code: String,
    pub errors: Vec<MinificationErrorInfo>,
    pub warnings: Vec<MinificationErrorInfo>,
}

impl MinifiedCode {
    /// A successful result with no diagnostics
    pub fn clean(code: String) -> Self {
        Self {
            code,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// A pluggable CSS minifier backend
pub trait CssMinifier {
    /// Minify one fragment of CSS
    ///
    /// `is_inline` is true for `style="…"` attribute values, false for
    /// `<style>` element bodies.
    fn minify_css(&self, code: &str, is_inline: bool) -> MinifiedCode;
}

/// A pluggable JS minifier backend
pub trait JsMinifier {
    /// Minify one fragment of JavaScript
    ///
    /// `is_inline` is true for event-handler attribute values, false for
    /// `<script>` element bodies.
    fn minify_js(&self, code: &str, is_inline: bool) -> MinifiedCode;
}

/// CSS backend that returns its input untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCssMinifier;

impl CssMinifier for NullCssMinifier {
    fn minify_css(&self, code: &str, _is_inline: bool) -> MinifiedCode {
        MinifiedCode::clean(code.to_string())
    }
}

/// JS backend that returns its input untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct NullJsMinifier;

impl JsMinifier for NullJsMinifier {
    fn minify_js(&self, code: &str, _is_inline: bool) -> MinifiedCode {
        MinifiedCode::clean(code.to_string())
    }
}

/// Host-facing diagnostic channel
///
/// Purely informational; the engines record every problem on the result
/// regardless of what the logger does with it.
pub trait MinificationLogger {
    fn error(&self, category: &str, message: &str, coords: Option<SourceCoordinates>, fragment: &str);
    fn warn(&self, category: &str, message: &str, coords: Option<SourceCoordinates>, fragment: &str);
    fn info(&self, category: &str, message: &str);
    fn debug(&self, category: &str, message: &str);
}

/// Logger that forwards to the `tracing` ecosystem
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl MinificationLogger for TracingLogger {
    fn error(&self, category: &str, message: &str, coords: Option<SourceCoordinates>, fragment: &str) {
        match coords {
            Some(c) => tracing::error!(category, line = c.line, column = c.column, fragment, "{message}"),
            None => tracing::error!(category, "{message}"),
        }
    }

    fn warn(&self, category: &str, message: &str, coords: Option<SourceCoordinates>, fragment: &str) {
        match coords {
            Some(c) => tracing::warn!(category, line = c.line, column = c.column, fragment, "{message}"),
            None => tracing::warn!(category, "{message}"),
        }
    }

    fn info(&self, category: &str, message: &str) {
        tracing::info!(category, "{message}");
    }

    fn debug(&self, category: &str, message: &str) {
        tracing::debug!(category, "{message}");
    }
}

/// Logger that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl MinificationLogger for NullLogger {
    fn error(&self, _: &str, _: &str, _: Option<SourceCoordinates>, _: &str) {}
    fn warn(&self, _: &str, _: &str, _: Option<SourceCoordinates>, _: &str) {}
    fn info(&self, _: &str, _: &str) {}
    fn debug(&self, _: &str, _: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_backends_pass_through() {
        let css = NullCssMinifier.minify_css("a { color: red }", false);
        assert_eq!(css.code, "a { color: red }");
        assert!(css.errors.is_empty());

        let js = NullJsMinifier.minify_js("var a = 1;", true);
        assert_eq!(js.code, "var a = 1;");
        assert!(js.warnings.is_empty());
    }
}
