//! XML minifier
//!
//! Event loop over the XML tokenizer. Two behaviors have no HTML
//! counterpart: ignore regions (`<!--wmm:ignore-->` … `<!--/wmm:ignore-->`)
//! whose interior passes through byte-for-byte with the markers removed,
//! and empty-tag collapse into self-closing form. An unmatched ignore
//! marker invalidates the whole pass: the result carries one error and the
//! original content unchanged.

use wmm_core::{
    MarkupMinificationResult, MinificationErrorInfo, MinificationLogger, MinificationStatistics,
    ParseEvent, ParseError, ParseErrorKind, TracingLogger,
};

use crate::settings::XmlMinificationSettings;
use crate::tokenizer::{XmlEvent, XmlTokenizer};

const LOG_CATEGORY: &str = "wmm-xml";

/// Opening ignore-region marker, as comment payload
const IGNORE_OPEN_PAYLOAD: &str = "wmm:ignore";
/// Closing ignore-region marker, as comment payload
const IGNORE_CLOSE_PAYLOAD: &str = "/wmm:ignore";

/// An element awaiting its end tag
struct OpenElement {
    name: String,
    /// Output length just past the start tag's `>`
    content_mark: usize,
}

pub struct XmlMinificationEngine<'a> {
    settings: &'a XmlMinificationSettings,
    logger: &'a dyn MinificationLogger,
}

impl<'a> XmlMinificationEngine<'a> {
    pub fn new(settings: &'a XmlMinificationSettings) -> Self {
        const LOGGER: TracingLogger = TracingLogger;
        Self {
            settings,
            logger: &LOGGER,
        }
    }

    pub fn with_logger(mut self, logger: &'a dyn MinificationLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn minify(&self, source: &str, generate_statistics: bool) -> MarkupMinificationResult {
        let mut out = String::with_capacity(source.len());
        let mut errors: Vec<MinificationErrorInfo> = Vec::new();
        let mut warnings: Vec<MinificationErrorInfo> = Vec::new();
        let mut stack: Vec<OpenElement> = Vec::new();

        tracing::debug!(len = source.len(), "minifying xml document");

        // A whitespace-only text node is held back one event: it is dropped
        // unless it turns out to border an ignore region, whose surrounding
        // whitespace stays as written.
        let mut pending_ws: Option<String> = None;
        let mut keep_next_ws = false;

        let mut tokenizer = XmlTokenizer::new(source);
        loop {
            match tokenizer.next_event() {
                Ok(Some(event)) => {
                    if self.settings.minify_whitespace {
                        if let ParseEvent::Text { raw, .. } = &event {
                            if raw.chars().all(|c| c.is_ascii_whitespace()) {
                                if keep_next_ws {
                                    out.push_str(raw);
                                } else {
                                    pending_ws = Some(raw.clone());
                                }
                                keep_next_ws = false;
                                continue;
                            }
                        }
                    }
                    keep_next_ws = false;
                    let opens_ignore = matches!(
                        &event,
                        ParseEvent::Comment { raw, .. } if raw == IGNORE_OPEN_PAYLOAD
                    );
                    if opens_ignore {
                        if let Some(ws) = pending_ws.take() {
                            out.push_str(&ws);
                        }
                    }
                    pending_ws = None;
                    match self.handle_event(&mut tokenizer, &mut out, &mut warnings, &mut stack, event)
                    {
                        Ok(()) => {
                            if opens_ignore {
                                keep_next_ws = true;
                            }
                        }
                        Err(err) => {
                            // Ignore-marker violations poison the whole output.
                            self.log_error(&err);
                            errors.push(err.into());
                            out = source.to_string();
                            break;
                        }
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    self.log_error(&err);
                    errors.push(err.into());
                    break;
                }
            }
        }

        let statistics = generate_statistics.then(|| MinificationStatistics {
            original_size: source.len(),
            minified_size: out.len(),
            ..Default::default()
        });

        MarkupMinificationResult {
            minified_content: out,
            errors,
            warnings,
            statistics,
        }
    }

    fn log_error(&self, err: &ParseError) {
        self.logger.error(
            LOG_CATEGORY,
            &err.kind.to_string(),
            Some(err.coords),
            &err.source_fragment,
        );
    }

    fn handle_event(
        &self,
        tokenizer: &mut XmlTokenizer<'_>,
        out: &mut String,
        warnings: &mut Vec<MinificationErrorInfo>,
        stack: &mut Vec<OpenElement>,
        event: XmlEvent,
    ) -> Result<(), ParseError> {
        match event {
            ParseEvent::Comment { raw, coords } => {
                if raw == IGNORE_OPEN_PAYLOAD {
                    let interior = tokenizer.take_ignore_region(coords)?;
                    out.push_str(&interior);
                    return Ok(());
                }
                if raw == IGNORE_CLOSE_PAYLOAD {
                    return Err(ParseError::new(
                        ParseErrorKind::UnmatchedIgnoreMarker(IGNORE_CLOSE_PAYLOAD.to_string()),
                        coords,
                        String::new(),
                    ));
                }
                if !self.settings.remove_xml_comments {
                    out.push_str("<!--");
                    out.push_str(&raw);
                    out.push_str("-->");
                }
            }
            ParseEvent::Text { raw, .. } => {
                // Whitespace-only nodes were already filtered by the caller.
                if self.settings.minify_whitespace {
                    push_collapsed(out, &raw);
                } else {
                    out.push_str(&raw);
                }
            }
            ParseEvent::Cdata { raw, .. } => {
                out.push_str("<![CDATA[");
                out.push_str(&raw);
                out.push_str("]]>");
            }
            ParseEvent::ProcessingInstruction {
                target, content, ..
            } => {
                out.push_str("<?");
                out.push_str(&target);
                out.push_str(&content);
                out.push_str("?>");
            }
            ParseEvent::Doctype { doctype, .. } => {
                out.push_str(&doctype);
            }
            ParseEvent::StartTag {
                name,
                attributes,
                self_closing,
                ..
            } => {
                out.push('<');
                out.push_str(&name);
                for attribute in &attributes {
                    out.push(' ');
                    out.push_str(&attribute.name);
                    out.push('=');
                    let q = attribute.quote.char();
                    out.push(q);
                    out.push_str(attribute.value.as_deref().unwrap_or(""));
                    out.push(q);
                }
                if self_closing {
                    out.push_str(self.empty_close());
                } else {
                    out.push('>');
                    stack.push(OpenElement {
                        name,
                        content_mark: out.len(),
                    });
                }
            }
            ParseEvent::EndTag { name, coords } => {
                let matched = stack.iter().rposition(|open| open.name == name);
                let Some(index) = matched else {
                    let message = format!("end tag </{name}> has no matching start tag");
                    self.logger.warn(LOG_CATEGORY, &message, Some(coords), "");
                    warnings.push(MinificationErrorInfo::new(
                        message,
                        coords.line,
                        coords.column,
                        String::new(),
                    ));
                    out.push_str("</");
                    out.push_str(&name);
                    out.push('>');
                    return Ok(());
                };
                stack.truncate(index + 1);
                let open = stack.pop().ok_or_else(|| {
                    ParseError::new(
                        ParseErrorKind::MalformedEndTag(name.clone()),
                        coords,
                        String::new(),
                    )
                })?;

                if self.settings.collapse_tags_without_content && out.len() == open.content_mark {
                    // Nothing between the tags: fold into self-closing form.
                    out.truncate(out.len() - 1);
                    out.push_str(self.empty_close());
                } else {
                    out.push_str("</");
                    out.push_str(&open.name);
                    out.push('>');
                }
            }
        }
        Ok(())
    }

    fn empty_close(&self) -> &'static str {
        if self.settings.render_empty_tags_with_space {
            " />"
        } else {
            "/>"
        }
    }
}

/// Collapse ASCII whitespace runs in mixed content to single spaces
fn push_collapsed(out: &mut String, text: &str) {
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
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minify(source: &str) -> MarkupMinificationResult {
        let settings = XmlMinificationSettings::default();
        XmlMinificationEngine::new(&settings).minify(source, false)
    }

    fn minify_with(source: &str, settings: &XmlMinificationSettings) -> MarkupMinificationResult {
        XmlMinificationEngine::new(settings).minify(source, false)
    }

    #[test]
    fn test_interelement_whitespace_removed() {
        let result = minify("<root>\n  <a>1</a>\n  <b>2</b>\n</root>");
        assert_eq!(result.minified_content, "<root><a>1</a><b>2</b></root>");
        assert!(result.is_ok());
    }

    #[test]
    fn test_mixed_content_collapsed_not_trimmed() {
        let result = minify("<p>some   text <b>bold</b> tail</p>");
        assert_eq!(result.minified_content, "<p>some text <b>bold</b> tail</p>");
    }

    #[test]
    fn test_comment_removed() {
        let result = minify("<a><!-- note --></a>");
        assert_eq!(result.minified_content, "<a></a>");
    }

    #[test]
    fn test_comment_kept_when_disabled() {
        let mut settings = XmlMinificationSettings::default();
        settings.remove_xml_comments = false;
        let result = minify_with("<a><!-- note --></a>", &settings);
        assert_eq!(result.minified_content, "<a><!-- note --></a>");
    }

    #[test]
    fn test_collapse_empty_tags() {
        let mut settings = XmlMinificationSettings::default();
        settings.collapse_tags_without_content = true;
        let result = minify_with("<root><a b=\"1\"></a><c>x</c></root>", &settings);
        assert_eq!(result.minified_content, "<root><a b=\"1\"/><c>x</c></root>");
    }

    #[test]
    fn test_empty_tags_with_space() {
        let mut settings = XmlMinificationSettings::default();
        settings.collapse_tags_without_content = true;
        settings.render_empty_tags_with_space = true;
        let result = minify_with("<a></a>", &settings);
        assert_eq!(result.minified_content, "<a />");
    }

    #[test]
    fn test_declaration_and_doctype_pass_through() {
        let src = "<?xml version=\"1.0\"?><!DOCTYPE note SYSTEM \"note.dtd\"><note/>";
        let result = minify(src);
        assert_eq!(
            result.minified_content,
            "<?xml version=\"1.0\"?><!DOCTYPE note SYSTEM \"note.dtd\"><note/>"
        );
    }

    #[test]
    fn test_cdata_preserved() {
        let result = minify("<a>  <![CDATA[  spaces  kept  ]]>  </a>");
        assert_eq!(result.minified_content, "<a><![CDATA[  spaces  kept  ]]></a>");
    }

    #[test]
    fn test_ignore_region_exact_bytes() {
        let src = "<root>  <!--wmm:ignore-->  <a>   raw   </a>  <!--/wmm:ignore-->  </root>";
        let result = minify(src);
        assert_eq!(
            result.minified_content,
            "<root>    <a>   raw   </a>    </root>"
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_ignore_region_keeps_surrounding_whitespace() {
        let result = minify("<a>  <!--wmm:ignore-->X<!--/wmm:ignore-->  </a>");
        assert_eq!(result.minified_content, "<a>  X  </a>");
    }

    #[test]
    fn test_whitespace_away_from_ignore_region_still_removed() {
        let result = minify("<r>\n  <a><!--wmm:ignore-->X<!--/wmm:ignore--></a>\n  <b/>\n</r>");
        assert_eq!(result.minified_content, "<r><a>X</a><b/></r>");
    }

    #[test]
    fn test_unclosed_ignore_region_returns_original() {
        let src = "<root><!--wmm:ignore--><a/></root>";
        let result = minify(src);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.minified_content, src);
    }

    #[test]
    fn test_stray_close_marker_returns_original() {
        let src = "<root><a/><!--/wmm:ignore--></root>";
        let result = minify(src);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.minified_content, src);
        assert!(result.errors[0].message.contains("/wmm:ignore"));
    }

    #[test]
    fn test_implicitly_closed_elements_tolerated() {
        let result = minify("<a><b></a>");
        assert_eq!(result.warnings.len(), 0);
        assert_eq!(result.minified_content, "<a><b></a>");
    }

    #[test]
    fn test_unmatched_close_warns() {
        let result = minify("<a></b></a>");
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.minified_content, "<a></b></a>");
    }

    #[test]
    fn test_statistics() {
        let settings = XmlMinificationSettings::default();
        let result = XmlMinificationEngine::new(&settings).minify("<a> <b/> </a>", true);
        let stats = result.statistics.unwrap();
        assert_eq!(stats.original_size, 13);
        assert_eq!(stats.minified_size, result.minified_content.len());
    }
}
