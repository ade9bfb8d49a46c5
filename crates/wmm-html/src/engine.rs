//! HTML/XHTML minification engine
//!
//! One engine drives both markup kinds; the differences (empty-attribute
//! rendering, void-element close style) hang off a small `MarkupPolicy`.
//! Parser events are rendered straight into the output buffer; the only
//! retained state is the open-element stack and a little whitespace
//! bookkeeping. Parse errors end the event stream, are recorded on the
//! result, and leave the output produced so far intact.

use wmm_core::{
    AttrQuote, Attribute, CssMinifier, JsMinifier, MinificationErrorInfo, MinificationLogger,
    MinificationStatistics, MarkupMinificationResult, MinifiedCode, NullCssMinifier,
    NullJsMinifier, ParseEvent, SourceCoordinates, TracingLogger,
};

use crate::doctype::Doctype;
use crate::elements;
use crate::frameworks::{self, KnockoutComment};
use crate::knockout;
use crate::settings::{HtmlMinificationSettings, WhitespaceMinificationMode};
use crate::tokenizer::{HtmlEvent, HtmlTokenizer};

/// The diagnostic category reported to the logger
const LOG_CATEGORY: &str = "wmm-html";

/// Markup-kind-specific rendering decisions
pub trait MarkupPolicy {
    /// Render an attribute that keeps no value
    fn render_bare_attribute(&self, out: &mut String, name: &str);
    /// Delimiter closing a void element tag
    fn void_close(&self) -> &'static str;
}

/// HTML5 rendering: bare boolean attributes, `<br>` voids
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlPolicy;

impl MarkupPolicy for HtmlPolicy {
    fn render_bare_attribute(&self, out: &mut String, name: &str) {
        out.push_str(name);
    }

    fn void_close(&self) -> &'static str {
        ">"
    }
}

/// XHTML rendering: XML well-formedness requires `name=""` and `<br />`
#[derive(Debug, Clone, Copy, Default)]
pub struct XhtmlPolicy;

impl MarkupPolicy for XhtmlPolicy {
    fn render_bare_attribute(&self, out: &mut String, name: &str) {
        out.push_str(name);
        out.push_str("=\"\"");
    }

    fn void_close(&self) -> &'static str {
        " />"
    }
}

/// What the previously emitted token was, for the trimming rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prev {
    DocumentStart,
    /// A block-level start tag (or the doctype)
    BlockStart,
    /// A block-level end tag
    BlockEnd,
    Other,
}

/// An element still open on the stack
struct OpenElement {
    lower: String,
    display: String,
    is_block: bool,
    is_foreign_root: bool,
    /// Output length just before the start tag, when the element is a
    /// removal candidate
    removable_mark: Option<usize>,
    /// Output length just after the start tag
    content_mark: usize,
}

/// Raw-text element whose body is pending
struct RawTextState {
    lower: String,
    type_attr: Option<String>,
}

pub struct HtmlMinificationEngine<'a, P: MarkupPolicy> {
    settings: &'a HtmlMinificationSettings,
    policy: P,
    css: &'a dyn CssMinifier,
    js: &'a dyn JsMinifier,
    logger: &'a dyn MinificationLogger,
}

struct Run {
    out: String,
    errors: Vec<MinificationErrorInfo>,
    warnings: Vec<MinificationErrorInfo>,
    stack: Vec<OpenElement>,
    raw_text: Option<RawTextState>,
    preserve_depth: usize,
    foreign_depth: usize,
    prev: Prev,
    /// Trailing whitespace bytes of `out` contributed by collapsed text
    trailing_ws: usize,
    stats: Option<MinificationStatistics>,
}

impl<'a, P: MarkupPolicy> HtmlMinificationEngine<'a, P> {
    pub fn new(settings: &'a HtmlMinificationSettings, policy: P) -> Self {
        const NULL_CSS: NullCssMinifier = NullCssMinifier;
        const NULL_JS: NullJsMinifier = NullJsMinifier;
        const LOGGER: TracingLogger = TracingLogger;
        Self {
            settings,
            policy,
            css: &NULL_CSS,
            js: &NULL_JS,
            logger: &LOGGER,
        }
    }

    pub fn with_css_minifier(mut self, css: &'a dyn CssMinifier) -> Self {
        self.css = css;
        self
    }

    pub fn with_js_minifier(mut self, js: &'a dyn JsMinifier) -> Self {
        self.js = js;
        self
    }

    pub fn with_logger(mut self, logger: &'a dyn MinificationLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Minify one document
    pub fn minify(&self, source: &str, generate_statistics: bool) -> MarkupMinificationResult {
        let mut run = Run {
            out: String::with_capacity(source.len()),
            errors: Vec::new(),
            warnings: Vec::new(),
            stack: Vec::new(),
            raw_text: None,
            preserve_depth: 0,
            foreign_depth: 0,
            prev: Prev::DocumentStart,
            trailing_ws: 0,
            stats: generate_statistics.then(MinificationStatistics::default),
        };

        tracing::debug!(len = source.len(), mode = ?self.mode(), "minifying markup document");

        let mut tokenizer = HtmlTokenizer::new(source);
        loop {
            match tokenizer.next_event() {
                Ok(Some(event)) => self.handle_event(&mut run, event),
                Ok(None) => break,
                Err(err) => {
                    self.logger.error(
                        LOG_CATEGORY,
                        &err.kind.to_string(),
                        Some(err.coords),
                        &err.source_fragment,
                    );
                    run.errors.push(err.into());
                    break;
                }
            }
        }

        if self.mode() >= WhitespaceMinificationMode::Medium {
            self.trim_trailing(&mut run);
        }

        if let Some(stats) = &mut run.stats {
            stats.original_size = source.len();
            stats.minified_size = run.out.len();
        }

        tracing::debug!(
            out_len = run.out.len(),
            errors = run.errors.len(),
            warnings = run.warnings.len(),
            "minification finished"
        );

        MarkupMinificationResult {
            minified_content: run.out,
            errors: run.errors,
            warnings: run.warnings,
            statistics: run.stats,
        }
    }

    fn mode(&self) -> WhitespaceMinificationMode {
        self.settings.whitespace_mode
    }

    fn warn(&self, run: &mut Run, message: String, coords: SourceCoordinates, fragment: &str) {
        self.logger
            .warn(LOG_CATEGORY, &message, Some(coords), fragment);
        run.warnings.push(MinificationErrorInfo::new(
            message,
            coords.line,
            coords.column,
            fragment.to_string(),
        ));
    }

    fn trim_trailing(&self, run: &mut Run) {
        if run.trailing_ws > 0 {
            let keep = run.out.len() - run.trailing_ws;
            run.out.truncate(keep);
            run.trailing_ws = 0;
        }
    }

    fn handle_event(&self, run: &mut Run, event: HtmlEvent) {
        match event {
            ParseEvent::StartTag {
                name,
                attributes,
                self_closing,
                ..
            } => self.handle_start_tag(run, name, attributes, self_closing),
            ParseEvent::EndTag { name, coords } => self.handle_end_tag(run, name, coords),
            ParseEvent::Text { raw, coords } => self.handle_text(run, raw, coords),
            ParseEvent::Comment { raw, coords } => self.handle_comment(run, raw, coords),
            ParseEvent::Cdata { raw, .. } => {
                run.out.push_str("<![CDATA[");
                run.out.push_str(&raw);
                run.out.push_str("]]>");
                run.trailing_ws = 0;
                run.prev = Prev::Other;
            }
            ParseEvent::ProcessingInstruction {
                target, content, ..
            } => {
                run.out.push_str("<?");
                run.out.push_str(&target);
                run.out.push_str(&content);
                run.out.push_str("?>");
                run.trailing_ws = 0;
                run.prev = Prev::Other;
            }
            ParseEvent::Doctype { doctype, .. } => self.handle_doctype(run, &doctype),
        }
    }

    fn handle_doctype(&self, run: &mut Run, doctype: &Doctype) {
        self.trim_trailing(run);
        if self.settings.use_short_doctype {
            run.out.push_str("<!DOCTYPE html>");
        } else {
            doctype.render(&mut run.out);
        }
        run.trailing_ws = 0;
        run.prev = Prev::BlockStart;
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    fn handle_text(&self, run: &mut Run, raw: String, coords: SourceCoordinates) {
        if let Some(raw_text) = run.raw_text.take() {
            self.handle_raw_text(run, &raw_text, raw, coords);
            run.raw_text = Some(raw_text);
            return;
        }

        let mode = self.mode();
        if mode == WhitespaceMinificationMode::None
            || run.preserve_depth > 0
            || frameworks::has_interpolation(&raw)
        {
            if !raw.is_empty() {
                run.out.push_str(&raw);
                run.trailing_ws = 0;
                run.prev = Prev::Other;
            }
            return;
        }

        let mut text = collapse_whitespace(&raw);

        let trim_left = match run.prev {
            Prev::DocumentStart | Prev::BlockStart => mode >= WhitespaceMinificationMode::Medium,
            Prev::BlockEnd => mode >= WhitespaceMinificationMode::Aggressive,
            Prev::Other => false,
        };
        if trim_left {
            text = text.trim_start_matches(' ').to_string();
        }

        if text.is_empty() {
            return;
        }

        // Avoid doubling separators when an adjacent construct was dropped.
        if text.starts_with(' ') && run.out.ends_with(' ') {
            text.remove(0);
            if text.is_empty() {
                return;
            }
        }

        run.trailing_ws = if text.ends_with(' ') { 1 } else { 0 };
        run.out.push_str(&text);
        run.prev = Prev::Other;
    }

    /// Body of a script/style/textarea/title element
    fn handle_raw_text(
        &self,
        run: &mut Run,
        raw_text: &RawTextState,
        raw: String,
        coords: SourceCoordinates,
    ) {
        match raw_text.lower.as_str() {
            "script" => self.emit_script_body(run, raw_text, raw, coords),
            "style" => self.emit_style_body(run, raw_text, raw, coords),
            "title" => {
                let text = if self.mode() == WhitespaceMinificationMode::None {
                    raw
                } else if self.mode() >= WhitespaceMinificationMode::Medium {
                    collapse_whitespace(&raw).trim_matches(' ').to_string()
                } else {
                    collapse_whitespace(&raw)
                };
                run.out.push_str(&text);
            }
            // textarea: author content, byte-for-byte
            _ => run.out.push_str(&raw),
        }
        run.trailing_ws = 0;
        run.prev = Prev::Other;
    }

    fn emit_script_body(
        &self,
        run: &mut Run,
        raw_text: &RawTextState,
        raw: String,
        coords: SourceCoordinates,
    ) {
        let original_len = raw.len();
        let mut content = raw;

        if self.settings.remove_html_comments_from_scripts_and_styles {
            content = strip_html_comment_wrapper(&content);
        }

        if self.settings.minify_embedded_js_code
            && elements::is_js_type(raw_text.type_attr.as_deref())
        {
            content = self.delegate(run, self.js.minify_js(&content, false), content, coords);
        }

        if let Some(stats) = &mut run.stats {
            stats.original_js_size += original_len;
            stats.minified_js_size += content.len();
        }
        run.out.push_str(&content);
    }

    fn emit_style_body(
        &self,
        run: &mut Run,
        raw_text: &RawTextState,
        raw: String,
        coords: SourceCoordinates,
    ) {
        let original_len = raw.len();
        let mut content = raw;

        if self.settings.remove_html_comments_from_scripts_and_styles {
            content = strip_html_comment_wrapper(&content);
        }

        if self.settings.minify_embedded_css_code
            && elements::is_css_type(raw_text.type_attr.as_deref())
        {
            content = self.delegate(run, self.css.minify_css(&content, false), content, coords);
        }

        if let Some(stats) = &mut run.stats {
            stats.original_css_size += original_len;
            stats.minified_css_size += content.len();
        }
        run.out.push_str(&content);
    }

    /// Apply a backend result, degrading to the original text on failure
    fn delegate(
        &self,
        run: &mut Run,
        result: MinifiedCode,
        original: String,
        coords: SourceCoordinates,
    ) -> String {
        for warning in &result.warnings {
            let (line, column) = offset_into(coords, warning.line, warning.column);
            self.warn(run, warning.message.clone(), SourceCoordinates::new(0, line, column), &warning.source_fragment);
        }
        if result.errors.is_empty() {
            result.code
        } else {
            for error in &result.errors {
                let (line, column) = offset_into(coords, error.line, error.column);
                self.warn(
                    run,
                    format!("code left unminified: {}", error.message),
                    SourceCoordinates::new(0, line, column),
                    &error.source_fragment,
                );
            }
            original
        }
    }

    // ------------------------------------------------------------------
    // Comments
    // ------------------------------------------------------------------

    fn handle_comment(&self, run: &mut Run, raw: String, coords: SourceCoordinates) {
        if frameworks::is_marker_comment(&raw) {
            run.out.push_str("<!--");
            run.out.push_str(&raw);
            run.out.push_str("-->");
            run.trailing_ws = 0;
            run.prev = Prev::Other;
            return;
        }

        match frameworks::parse_knockout_comment(&raw) {
            Some(KnockoutComment::Start { expression }) => {
                let expression = if self.settings.minify_knockout_binding_expressions {
                    match knockout::minify_binding_expression(&expression) {
                        Ok(minified) => minified,
                        Err(err) => {
                            self.warn(run, err.to_string(), coords, &expression);
                            expression
                        }
                    }
                } else {
                    expression
                };
                run.out.push_str("<!--ko ");
                run.out.push_str(&expression);
                run.out.push_str("-->");
                run.trailing_ws = 0;
                run.prev = Prev::Other;
                return;
            }
            Some(KnockoutComment::End) => {
                run.out.push_str("<!--/ko-->");
                run.trailing_ws = 0;
                run.prev = Prev::Other;
                return;
            }
            None => {}
        }

        let preserved = self
            .settings
            .preservable_html_comment_list
            .iter()
            .any(|pattern| raw.contains(pattern.as_str()));

        if self.settings.remove_html_comments && !preserved {
            return;
        }

        run.out.push_str("<!--");
        run.out.push_str(&raw);
        run.out.push_str("-->");
        run.trailing_ws = 0;
        run.prev = Prev::Other;
    }

    // ------------------------------------------------------------------
    // Tags
    // ------------------------------------------------------------------

    fn handle_start_tag(
        &self,
        run: &mut Run,
        name: String,
        attributes: Vec<Attribute>,
        self_closing: bool,
    ) {
        let lower = name.to_ascii_lowercase();
        let in_foreign = run.foreign_depth > 0 || elements::is_foreign_element(&lower);
        let display = if self.settings.preserve_case || in_foreign {
            name.clone()
        } else {
            lower.clone()
        };

        let is_block = !in_foreign && elements::is_block_element(&lower);
        if is_block && self.mode() >= WhitespaceMinificationMode::Aggressive {
            self.trim_trailing(run);
        }

        let removable = self.settings.remove_tags_without_content
            && !in_foreign
            && attributes.is_empty()
            && !self_closing
            && !elements::is_void_element(&lower)
            && !elements::is_raw_text_element(&lower)
            && !elements::is_whitespace_preserving_element(&lower);
        let start_mark = run.out.len();

        run.out.push('<');
        run.out.push_str(&display);

        let type_attr = attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case("type"))
            .and_then(|a| a.value.clone());

        for attribute in &attributes {
            self.render_attribute(run, &lower, attribute, in_foreign);
        }

        let is_void = !in_foreign && elements::is_void_element(&lower);
        if is_void {
            run.out.push_str(self.policy.void_close());
        } else if self_closing && in_foreign {
            run.out.push_str("/>");
        } else {
            run.out.push('>');
        }

        run.trailing_ws = 0;
        run.prev = if is_block { Prev::BlockStart } else { Prev::Other };

        if is_void || (self_closing && in_foreign) {
            return;
        }

        let opens_foreign = elements::is_foreign_element(&lower);
        if opens_foreign {
            run.foreign_depth += 1;
        }
        if !in_foreign && elements::is_whitespace_preserving_element(&lower) {
            run.preserve_depth += 1;
        }
        if !in_foreign && elements::is_raw_text_element(&lower) {
            run.raw_text = Some(RawTextState {
                lower: lower.clone(),
                type_attr,
            });
        }

        run.stack.push(OpenElement {
            lower,
            display,
            is_block,
            is_foreign_root: opens_foreign,
            removable_mark: removable.then_some(start_mark),
            content_mark: run.out.len(),
        });
    }

    fn handle_end_tag(&self, run: &mut Run, name: String, coords: SourceCoordinates) {
        let lower = name.to_ascii_lowercase();

        if let Some(raw_text) = &run.raw_text {
            if raw_text.lower == lower {
                run.raw_text = None;
            }
        }

        let matched = run.stack.iter().rposition(|open| open.lower == lower);
        let Some(index) = matched else {
            // Stray close tag: keep it, the author probably meant something.
            self.warn(
                run,
                format!("end tag </{name}> has no matching start tag"),
                coords,
                "",
            );
            run.out.push_str("</");
            run.out.push_str(&name);
            run.out.push('>');
            run.trailing_ws = 0;
            run.prev = Prev::Other;
            return;
        };

        // Pop implicitly closed elements above the match.
        for abandoned in run.stack.drain(index + 1..) {
            if abandoned.is_foreign_root {
                run.foreign_depth = run.foreign_depth.saturating_sub(1);
            }
            if elements::is_whitespace_preserving_element(&abandoned.lower) {
                run.preserve_depth = run.preserve_depth.saturating_sub(1);
            }
        }
        let Some(open) = run.stack.pop() else {
            return;
        };

        if open.is_foreign_root {
            run.foreign_depth = run.foreign_depth.saturating_sub(1);
        }
        if run.foreign_depth == 0 && elements::is_whitespace_preserving_element(&open.lower) {
            run.preserve_depth = run.preserve_depth.saturating_sub(1);
        }

        if open.is_block && self.mode() >= WhitespaceMinificationMode::Medium {
            self.trim_trailing(run);
        }

        if let Some(start_mark) = open.removable_mark {
            let content = &run.out[open.content_mark.min(run.out.len())..];
            if run.out.len() >= open.content_mark
                && content.chars().all(|c| c.is_ascii_whitespace())
            {
                run.out.truncate(start_mark);
                run.trailing_ws = 0;
                run.prev = Prev::Other;
                return;
            }
        }

        run.out.push_str("</");
        run.out.push_str(&open.display);
        run.out.push('>');
        run.trailing_ws = 0;
        run.prev = if open.is_block {
            Prev::BlockEnd
        } else {
            Prev::Other
        };
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    fn render_attribute(
        &self,
        run: &mut Run,
        tag_lower: &str,
        attribute: &Attribute,
        in_foreign: bool,
    ) {
        let lower_name = attribute.name.to_ascii_lowercase();
        let display_name = if self.settings.preserve_case || in_foreign {
            attribute.name.clone()
        } else {
            lower_name.clone()
        };

        let preserved = self
            .settings
            .preservable_attribute_list
            .iter()
            .any(|p| p.eq_ignore_ascii_case(&lower_name));

        let value = attribute.value.clone();

        // Angular directive values are binding expressions of their own.
        if !preserved
            && self.settings.minify_angular_binding_expressions
            && frameworks::is_angular_directive(
                &attribute.name,
                &self.settings.custom_angular_directive_list,
            )
        {
            let value = match value {
                Some(v) => match knockout::minify_binding_expression(&v) {
                    Ok(minified) => Some(minified),
                    Err(err) => {
                        self.warn(run, err.to_string(), attribute.coords, &v);
                        Some(v)
                    }
                },
                None => None,
            };
            self.emit_attribute(run, &display_name, value.as_deref(), attribute.quote, in_foreign);
            return;
        }

        // Binding attributes are opaque: emit exactly as written.
        if !preserved && frameworks::is_binding_attribute(&attribute.name, value.as_deref().unwrap_or("")) {
            self.emit_attribute(run, &display_name, value.as_deref(), attribute.quote, in_foreign);
            return;
        }

        if preserved {
            self.emit_attribute(run, &display_name, value.as_deref(), attribute.quote, in_foreign);
            return;
        }

        let Some(mut value) = value else {
            // Attribute written without a value.
            run.out.push(' ');
            if in_foreign {
                run.out.push_str(&display_name);
                run.out.push_str("=\"\"");
            } else {
                self.policy.render_bare_attribute(&mut run.out, &display_name);
            }
            return;
        };

        if !in_foreign {
            if self.settings.remove_redundant_attributes
                && elements::is_redundant_attribute(tag_lower, &lower_name, &value)
            {
                return;
            }

            if self.settings.collapse_boolean_attributes
                && elements::is_boolean_attribute(&lower_name)
            {
                run.out.push(' ');
                self.policy.render_bare_attribute(&mut run.out, &display_name);
                return;
            }

            if lower_name == "class" && self.mode() != WhitespaceMinificationMode::None {
                value = collapse_whitespace(&value).trim_matches(' ').to_string();
            }

            if elements::is_uri_attribute(&lower_name) {
                if self.mode() != WhitespaceMinificationMode::None {
                    value = value.trim().to_string();
                }
                value = self.strip_protocol(value);
            }

            if lower_name == "style" && self.settings.minify_inline_css_code {
                let original_len = value.len();
                value = self.delegate(
                    run,
                    self.css.minify_css(&value, true),
                    value,
                    attribute.coords,
                );
                if let Some(stats) = &mut run.stats {
                    stats.original_css_size += original_len;
                    stats.minified_css_size += value.len();
                }
            }

            if elements::is_event_attribute(&lower_name) && self.settings.minify_inline_js_code {
                let original_len = value.len();
                value = self.delegate(
                    run,
                    self.js.minify_js(&value, true),
                    value,
                    attribute.coords,
                );
                if let Some(stats) = &mut run.stats {
                    stats.original_js_size += original_len;
                    stats.minified_js_size += value.len();
                }
            }

            if lower_name == "data-bind" && self.settings.minify_knockout_binding_expressions {
                match knockout::minify_binding_expression(&value) {
                    Ok(minified) => value = minified,
                    Err(err) => self.warn(run, err.to_string(), attribute.coords, &value),
                }
            }
        }

        self.emit_attribute(run, &display_name, Some(&value), attribute.quote, in_foreign);
    }

    fn emit_attribute(
        &self,
        run: &mut Run,
        name: &str,
        value: Option<&str>,
        quote: AttrQuote,
        in_foreign: bool,
    ) {
        run.out.push(' ');
        let Some(value) = value else {
            if in_foreign {
                run.out.push_str(name);
                run.out.push_str("=\"\"");
            } else {
                self.policy.render_bare_attribute(&mut run.out, name);
            }
            return;
        };

        run.out.push_str(name);
        run.out.push('=');
        let quote_char = pick_quote(value, quote);
        run.out.push(quote_char);
        if value.contains(quote_char) {
            let escaped = match quote_char {
                '"' => value.replace('"', "&quot;"),
                _ => value.replace('\'', "&#39;"),
            };
            run.out.push_str(&escaped);
        } else {
            run.out.push_str(value);
        }
        run.out.push(quote_char);
    }

    fn strip_protocol(&self, value: String) -> String {
        let trimmed = value.trim_start();
        if self.settings.remove_http_protocol_from_attributes
            && trimmed.len() >= 7
            && trimmed[..7].eq_ignore_ascii_case("http://")
        {
            return trimmed[5..].to_string();
        }
        if self.settings.remove_https_protocol_from_attributes
            && trimmed.len() >= 8
            && trimmed[..8].eq_ignore_ascii_case("https://")
        {
            return trimmed[6..].to_string();
        }
        value
    }
}

/// Choose the quote character, preferring the author's original style
fn pick_quote(value: &str, original: AttrQuote) -> char {
    let preferred = original.char();
    if value.contains(preferred) {
        let other = if preferred == '"' { '\'' } else { '"' };
        if !value.contains(other) {
            return other;
        }
    }
    preferred
}

/// Collapse runs of ASCII whitespace to single spaces
///
/// Non-ASCII whitespace (for instance U+00A0) is content and is kept.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_ws = false;
    for c in text.chars() {
        if c.is_ascii_whitespace() {
            if !in_ws {
                out.push(' ');
                in_ws = true;
            }
        } else {
            out.push(c);
            in_ws = false;
        }
    }
    out
}

/// Strip legacy `<!-- … -->` hiding wrappers from a script/style body
fn strip_html_comment_wrapper(content: &str) -> String {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("<!--") else {
        return content.to_string();
    };
    let inner = inner
        .strip_suffix("-->")
        .map(|rest| rest.trim_end().strip_suffix("//").unwrap_or(rest))
        .unwrap_or(inner);
    format!("\n{}\n", inner.trim())
}

/// Map a backend diagnostic position into document coordinates
fn offset_into(base: SourceCoordinates, line: u32, column: u32) -> (u32, u32) {
    if line <= 1 {
        (base.line, base.column + column.saturating_sub(1))
    } else {
        (base.line + line - 1, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::HtmlMinificationSettings;

    fn minify(source: &str) -> MarkupMinificationResult {
        let settings = HtmlMinificationSettings::default();
        HtmlMinificationEngine::new(&settings, HtmlPolicy).minify(source, false)
    }

    fn minify_with(
        source: &str,
        settings: &HtmlMinificationSettings,
    ) -> MarkupMinificationResult {
        HtmlMinificationEngine::new(settings, HtmlPolicy).minify(source, false)
    }

    #[test]
    fn test_safe_whitespace_collapse() {
        let result = minify("<p>Hello   \n  world</p>");
        assert_eq!(result.minified_content, "<p>Hello world</p>");
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_medium_trims_inside_blocks() {
        let mut settings = HtmlMinificationSettings::default();
        settings.whitespace_mode = WhitespaceMinificationMode::Medium;
        let result = minify_with("<div>  text  </div>", &settings);
        assert_eq!(result.minified_content, "<div>text</div>");
    }

    #[test]
    fn test_medium_keeps_space_between_blocks() {
        let mut settings = HtmlMinificationSettings::default();
        settings.whitespace_mode = WhitespaceMinificationMode::Medium;
        let result = minify_with("<p>a</p>  <p>b</p>", &settings);
        assert_eq!(result.minified_content, "<p>a</p> <p>b</p>");
    }

    #[test]
    fn test_aggressive_removes_space_between_blocks() {
        let mut settings = HtmlMinificationSettings::default();
        settings.whitespace_mode = WhitespaceMinificationMode::Aggressive;
        let result = minify_with("<p>a</p>  <p>b</p>", &settings);
        assert_eq!(result.minified_content, "<p>a</p><p>b</p>");
    }

    #[test]
    fn test_inline_elements_keep_separating_space() {
        let result = minify("<span>a</span> <span>b</span>");
        assert_eq!(result.minified_content, "<span>a</span> <span>b</span>");
        let mut settings = HtmlMinificationSettings::default();
        settings.whitespace_mode = WhitespaceMinificationMode::Aggressive;
        let result = minify_with("<span>a</span> <span>b</span>", &settings);
        assert_eq!(result.minified_content, "<span>a</span> <span>b</span>");
    }

    #[test]
    fn test_pre_content_untouched() {
        let result = minify("<pre>  two\n   lines  </pre>");
        assert_eq!(result.minified_content, "<pre>  two\n   lines  </pre>");
    }

    #[test]
    fn test_comment_removed() {
        let result = minify("a<!-- note -->b");
        assert_eq!(result.minified_content, "ab");
    }

    #[test]
    fn test_preservable_comment_kept() {
        let mut settings = HtmlMinificationSettings::default();
        settings.preservable_html_comment_list = vec!["keep me".to_string()];
        let result = minify_with("<!-- keep me please --><!-- drop -->", &settings);
        assert_eq!(result.minified_content, "<!-- keep me please -->");
    }

    #[test]
    fn test_blazor_marker_survives_comment_removal() {
        let marker = "<!--Blazor:{\"sequence\":0,\"type\":\"server\"}-->";
        let result = minify(marker);
        assert_eq!(result.minified_content, marker);
    }

    #[test]
    fn test_react_marker_survives_comment_removal() {
        let result = minify("<div><!-- react-empty: 1 --></div>");
        assert_eq!(result.minified_content, "<div><!-- react-empty: 1 --></div>");
    }

    #[test]
    fn test_knockout_containerless_pair() {
        let result = minify("<!-- ko if: visible -->x<!-- /ko -->");
        assert_eq!(result.minified_content, "<!--ko if: visible-->x<!--/ko-->");
    }

    #[test]
    fn test_knockout_expression_minified() {
        let mut settings = HtmlMinificationSettings::default();
        settings.minify_knockout_binding_expressions = true;
        let result = minify_with("<!-- ko foreach: { data: items } -->y<!-- /ko -->", &settings);
        assert_eq!(
            result.minified_content,
            "<!--ko foreach:{data:items}-->y<!--/ko-->"
        );
    }

    #[test]
    fn test_boolean_attribute_collapse_html() {
        let result = minify("<input checked=\"checked\" disabled=\"disabled\">");
        assert_eq!(result.minified_content, "<input checked disabled>");
    }

    #[test]
    fn test_bare_custom_attribute_html() {
        let result = minify("<div custom-attribute></div>");
        assert_eq!(result.minified_content, "<div custom-attribute></div>");
    }

    #[test]
    fn test_bare_custom_attribute_xhtml() {
        let settings = HtmlMinificationSettings::default();
        let result = HtmlMinificationEngine::new(&settings, XhtmlPolicy)
            .minify("<div custom-attribute></div>", false);
        assert_eq!(result.minified_content, "<div custom-attribute=\"\"></div>");
    }

    #[test]
    fn test_void_element_xhtml_style() {
        let settings = HtmlMinificationSettings::default();
        let result =
            HtmlMinificationEngine::new(&settings, XhtmlPolicy).minify("<br/><hr>", false);
        assert_eq!(result.minified_content, "<br /><hr />");
    }

    #[test]
    fn test_short_doctype() {
        let result = minify(
            "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\" \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd\"><html></html>",
        );
        assert!(result.minified_content.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_full_doctype_single_spaced() {
        let mut settings = HtmlMinificationSettings::default();
        settings.use_short_doctype = false;
        let result = minify_with(
            "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\"\n    \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd\">",
            &settings,
        );
        assert_eq!(
            result.minified_content,
            "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\" \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd\">"
        );
    }

    #[test]
    fn test_redundant_attribute_removed() {
        let mut settings = HtmlMinificationSettings::default();
        settings.remove_redundant_attributes = true;
        let result = minify_with("<form method=\"get\" action=\"/go\"></form>", &settings);
        assert_eq!(result.minified_content, "<form action=\"/go\"></form>");
    }

    #[test]
    fn test_protocol_stripping() {
        let mut settings = HtmlMinificationSettings::default();
        settings.remove_http_protocol_from_attributes = true;
        settings.remove_https_protocol_from_attributes = true;
        let result = minify_with(
            "<a href=\"http://example.com/\"><img src=\"https://example.com/x.png\"></a>",
            &settings,
        );
        assert_eq!(
            result.minified_content,
            "<a href=\"//example.com/\"><img src=\"//example.com/x.png\"></a>"
        );
    }

    #[test]
    fn test_remove_tags_without_content() {
        let mut settings = HtmlMinificationSettings::default();
        settings.remove_tags_without_content = true;
        let result = minify_with("<div><span></span></div><p>keep</p>", &settings);
        assert_eq!(result.minified_content, "<p>keep</p>");
    }

    #[test]
    fn test_tags_with_attributes_not_removed() {
        let mut settings = HtmlMinificationSettings::default();
        settings.remove_tags_without_content = true;
        let result = minify_with("<div id=\"x\"></div>", &settings);
        assert_eq!(result.minified_content, "<div id=\"x\"></div>");
    }

    #[test]
    fn test_error_localization_stray_quote() {
        let result = minify("<img src=\"/x.gif\" width=80\" height=\"60\">");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].line, 1);
        assert_eq!(result.errors[0].column, 27);
    }

    #[test]
    fn test_mismatched_end_tag_warns_and_keeps() {
        let result = minify("<div>a</span>b</div>");
        assert_eq!(result.minified_content, "<div>a</span>b</div>");
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_angular_binding_attribute_untouched() {
        let result = minify("<p [hidden]=\" a && b \" (click)=\" go() \">x</p>");
        assert_eq!(
            result.minified_content,
            "<p [hidden]=\" a && b \" (click)=\" go() \">x</p>"
        );
    }

    #[test]
    fn test_angular_directive_expression_minified() {
        let mut settings = HtmlMinificationSettings::default();
        settings.minify_angular_binding_expressions = true;
        let result = minify_with("<p ng-click=\"go( 1 )\">x</p>", &settings);
        assert_eq!(result.minified_content, "<p ng-click=\"go(1)\">x</p>");
    }

    #[test]
    fn test_custom_angular_directive_list() {
        let mut settings = HtmlMinificationSettings::default();
        settings.minify_angular_binding_expressions = true;
        settings.custom_angular_directive_list = vec!["my-widget".to_string()];
        let result = minify_with("<div my-widget=\"opts( a , b )\"></div>", &settings);
        assert_eq!(result.minified_content, "<div my-widget=\"opts(a,b)\"></div>");
    }

    #[test]
    fn test_angular_directive_untouched_without_toggle() {
        let result = minify("<p ng-click=\"go( 1 )\">x</p>");
        assert_eq!(result.minified_content, "<p ng-click=\"go( 1 )\">x</p>");
    }

    #[test]
    fn test_interpolation_text_untouched() {
        let result = minify("<p>{{  user.name  }}</p>");
        assert_eq!(result.minified_content, "<p>{{  user.name  }}</p>");
    }

    #[test]
    fn test_foreign_svg_case_preserved() {
        let result = minify("<svg viewBox=\"0 0 1 1\"><circle cx=\"0\"/></svg>");
        assert_eq!(
            result.minified_content,
            "<svg viewBox=\"0 0 1 1\"><circle cx=\"0\"/></svg>"
        );
    }

    #[test]
    fn test_class_attribute_collapsed() {
        let result = minify("<p class=\"  a   b  \">x</p>");
        assert_eq!(result.minified_content, "<p class=\"a b\">x</p>");
    }

    #[test]
    fn test_preservable_attribute_value_verbatim() {
        let mut settings = HtmlMinificationSettings::default();
        settings.preservable_attribute_list = vec!["class".to_string()];
        let result = minify_with("<p class=\"  a   b  \">x</p>", &settings);
        assert_eq!(result.minified_content, "<p class=\"  a   b  \">x</p>");
    }

    #[test]
    fn test_preservable_attribute_skips_boolean_collapse() {
        let mut settings = HtmlMinificationSettings::default();
        settings.preservable_attribute_list = vec!["checked".to_string()];
        let result = minify_with("<input checked=\"checked\">", &settings);
        assert_eq!(result.minified_content, "<input checked=\"checked\">");
    }

    #[test]
    fn test_script_comment_wrapper_stripped() {
        let result = minify("<script><!--\nvar a = 1;\n//--></script>");
        assert_eq!(result.minified_content, "<script>\nvar a = 1;\n</script>");
        let result = minify("<script>\n<!--\nalert(1);\n-->\n</script>");
        assert_eq!(result.minified_content, "<script>\nalert(1);\n</script>");
    }

    #[test]
    fn test_script_wrapper_kept_when_disabled() {
        let mut settings = HtmlMinificationSettings::default();
        settings.remove_html_comments_from_scripts_and_styles = false;
        let result = minify_with("<script><!--\nvar a = 1;\n//--></script>", &settings);
        assert_eq!(
            result.minified_content,
            "<script><!--\nvar a = 1;\n//--></script>"
        );
    }

    #[test]
    fn test_title_safe_mode_collapses_without_trim() {
        let result = minify("<title>  Page   name  </title>");
        assert_eq!(result.minified_content, "<title> Page name </title>");
        let mut settings = HtmlMinificationSettings::default();
        settings.whitespace_mode = WhitespaceMinificationMode::Medium;
        let result = minify_with("<title>  Page   name  </title>", &settings);
        assert_eq!(result.minified_content, "<title>Page name</title>");
    }

    #[test]
    fn test_statistics_populated_on_request() {
        let settings = HtmlMinificationSettings::default();
        let result = HtmlMinificationEngine::new(&settings, HtmlPolicy)
            .minify("<p>  a  </p>", true);
        let stats = result.statistics.unwrap();
        assert_eq!(stats.original_size, 12);
        assert_eq!(stats.minified_size, result.minified_content.len());
    }

    #[test]
    fn test_embedded_script_through_backend() {
        let settings = HtmlMinificationSettings::default();
        let js = wmm_js::CrockfordJsMinifier::new();
        let result = HtmlMinificationEngine::new(&settings, HtmlPolicy)
            .with_js_minifier(&js)
            .minify("<script>var a  =  1;\nvar b = 2;</script>", false);
        assert_eq!(result.minified_content, "<script>var a=1;var b=2;</script>");
    }

    #[test]
    fn test_non_js_script_type_left_alone() {
        let settings = HtmlMinificationSettings::default();
        let js = wmm_js::CrockfordJsMinifier::new();
        let result = HtmlMinificationEngine::new(&settings, HtmlPolicy)
            .with_js_minifier(&js)
            .minify(
                "<script type=\"text/template\"><p>  {{ name }}  </p></script>",
                false,
            );
        assert_eq!(
            result.minified_content,
            "<script type=\"text/template\"><p>  {{ name }}  </p></script>"
        );
    }

    #[test]
    fn test_textarea_content_untouched() {
        let result = minify("<textarea>  keep\n  this  </textarea>");
        assert_eq!(result.minified_content, "<textarea>  keep\n  this  </textarea>");
    }
}
