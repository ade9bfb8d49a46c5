//! HTML tokenizer
//!
//! A forward-only pull tokenizer: one cursor pass over the source, one
//! structural event per `next_event` call. The first parse error ends the
//! stream; the engine reports it and keeps whatever output was produced.
//!
//! Two sub-modes depart from normal dispatch:
//! - raw-text elements (`script`, `style`, `textarea`, `title`) swallow
//!   everything up to their matching close tag as one text event;
//! - foreign subtrees (`svg`, `math`) are tokenized case-sensitively and
//!   admit CDATA sections, since their content is XML, not HTML.

use memchr::memmem;
use wmm_core::{
    AttrQuote, Attribute, ParseError, ParseErrorKind, ParseEvent, ParsingContext,
    SourceCoordinates,
};

use crate::doctype::{self, Doctype};
use crate::elements;

/// Event type produced by the HTML tokenizer
pub type HtmlEvent = ParseEvent<Doctype>;

pub struct HtmlTokenizer<'src> {
    ctx: ParsingContext<'src>,
    /// Element whose raw-text content is pending, lowercased
    raw_text_element: Option<String>,
    /// Nesting depth of svg/math subtrees
    foreign_depth: usize,
    done: bool,
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '.' | '-')
}

/// Characters allowed in an attribute name
///
/// Wide on purpose: template engines use names like `[prop]`, `(event)`,
/// `*ngIf`, `value.bind` and `attr$`.
fn is_attr_name_char(c: char) -> bool {
    !c.is_ascii_whitespace() && !matches!(c, '=' | '>' | '/' | '"' | '\'' | '<' | '`')
}

impl<'src> HtmlTokenizer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            ctx: ParsingContext::new(source),
            raw_text_element: None,
            foreign_depth: 0,
            done: false,
        }
    }

    /// Whether the cursor is inside an svg/math subtree
    pub fn in_foreign_content(&self) -> bool {
        self.foreign_depth > 0
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.ctx.coordinates(), self.ctx.fragment())
    }

    fn error_at(&self, kind: ParseErrorKind, coords: SourceCoordinates) -> ParseError {
        ParseError::new(kind, coords, self.ctx.fragment())
    }

    /// Pull the next structural event
    ///
    /// Returns `Ok(None)` at end of input. After an `Err` the stream is
    /// finished; further calls return `Ok(None)`.
    pub fn next_event(&mut self) -> Result<Option<HtmlEvent>, ParseError> {
        if self.done {
            return Ok(None);
        }
        match self.dispatch() {
            Ok(None) => {
                self.done = true;
                Ok(None)
            }
            Ok(event) => Ok(event),
            Err(err) => {
                self.done = true;
                Err(err)
            }
        }
    }

    fn dispatch(&mut self) -> Result<Option<HtmlEvent>, ParseError> {
        if self.ctx.is_eof() {
            return Ok(None);
        }

        if let Some(element) = self.raw_text_element.take() {
            let event = self.scan_raw_text(&element);
            // An empty body (e.g. <script></script>) produces no text event.
            if !matches!(&event, ParseEvent::Text { raw, .. } if raw.is_empty()) {
                return Ok(Some(event));
            }
        }

        let coords = self.ctx.coordinates();

        if self.ctx.starts_with("<!--") {
            return self.scan_comment(coords).map(Some);
        }
        if doctype::at_doctype(&self.ctx) {
            let doctype = doctype::parse(&mut self.ctx)?;
            return Ok(Some(ParseEvent::Doctype { doctype, coords }));
        }
        if self.ctx.starts_with("<![CDATA[") {
            return self.scan_cdata(coords).map(Some);
        }
        if self.ctx.starts_with("<?") {
            return self.scan_processing_instruction(coords).map(Some);
        }
        if self.ctx.starts_with("</") {
            return self.scan_end_tag(coords).map(Some);
        }
        if self.ctx.peek() == Some('<') && self.ctx.peek_at(1).is_some_and(is_name_start) {
            return self.scan_start_tag(coords).map(Some);
        }

        Ok(Some(self.scan_text(coords)))
    }

    fn scan_comment(&mut self, coords: SourceCoordinates) -> Result<HtmlEvent, ParseError> {
        self.ctx.advance_by(4); // <!--
        let rest = self.ctx.remaining();
        let Some(end) = memmem::find(rest.as_bytes(), b"-->") else {
            return Err(self.error_at(ParseErrorKind::UnterminatedComment, coords));
        };
        let raw = rest[..end].to_string();
        self.ctx.advance_bytes(end + 3);
        Ok(ParseEvent::Comment { raw, coords })
    }

    fn scan_cdata(&mut self, coords: SourceCoordinates) -> Result<HtmlEvent, ParseError> {
        self.ctx.advance_by(9); // <![CDATA[
        let rest = self.ctx.remaining();
        let Some(end) = memmem::find(rest.as_bytes(), b"]]>") else {
            return Err(self.error_at(ParseErrorKind::UnterminatedCdata, coords));
        };
        let raw = rest[..end].to_string();
        self.ctx.advance_bytes(end + 3);
        Ok(ParseEvent::Cdata { raw, coords })
    }

    fn scan_processing_instruction(
        &mut self,
        coords: SourceCoordinates,
    ) -> Result<HtmlEvent, ParseError> {
        self.ctx.advance_by(2); // <?
        let target = self.ctx.take_while(is_attr_name_char).to_string();
        let rest = self.ctx.remaining();
        let Some(end) = memmem::find(rest.as_bytes(), b"?>") else {
            return Err(self.error_at(
                ParseErrorKind::UnterminatedProcessingInstruction,
                coords,
            ));
        };
        let content = rest[..end].to_string();
        self.ctx.advance_bytes(end + 2);
        Ok(ParseEvent::ProcessingInstruction {
            target,
            content,
            coords,
        })
    }

    fn scan_end_tag(&mut self, coords: SourceCoordinates) -> Result<HtmlEvent, ParseError> {
        self.ctx.advance_by(2); // </
        if !self.ctx.peek().is_some_and(is_name_start) {
            return Err(self.error_at(
                ParseErrorKind::MalformedEndTag(self.ctx.peek().map_or_else(
                    String::new,
                    |c| c.to_string(),
                )),
                coords,
            ));
        }
        let name = self.ctx.take_while(is_name_char).to_string();
        self.ctx.skip_whitespace();
        if self.ctx.peek() != Some('>') {
            return Err(self.error(ParseErrorKind::MalformedEndTag(name)));
        }
        self.ctx.advance();

        if self.foreign_depth > 0 && elements::is_foreign_element(&name.to_ascii_lowercase()) {
            self.foreign_depth -= 1;
        }

        Ok(ParseEvent::EndTag { name, coords })
    }

    fn scan_start_tag(&mut self, coords: SourceCoordinates) -> Result<HtmlEvent, ParseError> {
        self.ctx.advance(); // <
        let name = self.ctx.take_while(is_name_char).to_string();
        let lower = name.to_ascii_lowercase();

        let mut attributes = Vec::new();
        let mut self_closing = false;

        loop {
            self.ctx.skip_whitespace();
            match self.ctx.peek() {
                None => return Err(self.error_at(ParseErrorKind::UnterminatedTag, coords)),
                Some('>') => {
                    self.ctx.advance();
                    break;
                }
                Some('/') if self.ctx.peek_at(1) == Some('>') => {
                    self.ctx.advance_by(2);
                    self_closing = true;
                    break;
                }
                Some(c) if is_attr_name_char(c) => {
                    attributes.push(self.scan_attribute()?);
                }
                Some(c) => {
                    return Err(self.error(ParseErrorKind::InvalidAttributeSyntax(c)));
                }
            }
        }

        if self.foreign_depth > 0 || elements::is_foreign_element(&lower) {
            if elements::is_foreign_element(&lower) && !self_closing {
                self.foreign_depth += 1;
            }
        } else if !self_closing
            && elements::is_raw_text_element(&lower)
            && !elements::is_void_element(&lower)
        {
            self.raw_text_element = Some(lower);
        }

        Ok(ParseEvent::StartTag {
            name,
            attributes,
            self_closing,
            coords,
        })
    }

    fn scan_attribute(&mut self) -> Result<Attribute, ParseError> {
        let coords = self.ctx.coordinates();
        let name = self.ctx.take_while(is_attr_name_char).to_string();
        self.ctx.skip_whitespace();

        if self.ctx.peek() != Some('=') {
            return Ok(Attribute {
                name,
                value: None,
                quote: AttrQuote::None,
                coords,
            });
        }
        self.ctx.advance();
        self.ctx.skip_whitespace();

        match self.ctx.peek() {
            Some(q @ ('"' | '\'')) => {
                self.ctx.advance();
                let value = self.ctx.take_while(|c| c != q).to_string();
                if self.ctx.is_eof() {
                    return Err(self.error(ParseErrorKind::UnterminatedTag));
                }
                self.ctx.advance();
                Ok(Attribute {
                    name,
                    value: Some(value),
                    quote: if q == '"' {
                        AttrQuote::Double
                    } else {
                        AttrQuote::Single
                    },
                    coords,
                })
            }
            _ => {
                // Unquoted value: runs to whitespace or `>`. A quote or a
                // raw angle bracket inside it is an author mistake and is
                // reported at its exact column.
                let mut value = String::new();
                loop {
                    match self.ctx.peek() {
                        None => return Err(self.error(ParseErrorKind::UnterminatedTag)),
                        Some(c) if c.is_ascii_whitespace() => break,
                        Some('>') => break,
                        Some(c @ ('"' | '\'' | '<' | '`')) => {
                            return Err(self.error(ParseErrorKind::InvalidAttributeSyntax(c)));
                        }
                        Some(c) => {
                            value.push(c);
                            self.ctx.advance();
                        }
                    }
                }
                Ok(Attribute {
                    name,
                    value: Some(value),
                    quote: AttrQuote::None,
                    coords,
                })
            }
        }
    }

    /// Scan the body of a raw-text element up to its matching close tag
    fn scan_raw_text(&mut self, element: &str) -> HtmlEvent {
        let coords = self.ctx.coordinates();
        let rest = self.ctx.remaining();
        let bytes = rest.as_bytes();

        let mut search_from = 0;
        let end = loop {
            match memchr::memchr(b'<', &bytes[search_from..]) {
                None => break rest.len(),
                Some(offset) => {
                    let at = search_from + offset;
                    let candidate = &rest[at..];
                    if candidate.len() > element.len() + 2
                        && candidate.starts_with("</")
                        && candidate[2..2 + element.len()].eq_ignore_ascii_case(element)
                        && candidate[2 + element.len()..]
                            .chars()
                            .next()
                            .is_some_and(|c| c == '>' || c == '/' || c.is_ascii_whitespace())
                    {
                        break at;
                    }
                    search_from = at + 1;
                }
            }
        };

        let raw = rest[..end].to_string();
        self.ctx.advance_bytes(end);
        ParseEvent::Text { raw, coords }
    }

    /// Scan a text run up to the next markup construct
    fn scan_text(&mut self, coords: SourceCoordinates) -> HtmlEvent {
        let rest = self.ctx.remaining();
        let bytes = rest.as_bytes();

        // The cursor may sit on a bare `<` that is ordinary text.
        let mut search_from = 1.min(rest.len());
        let end = loop {
            match memchr::memchr(b'<', &bytes[search_from..]) {
                None => break rest.len(),
                Some(offset) => {
                    let at = search_from + offset;
                    let next = rest[at + 1..].chars().next();
                    if next.is_some_and(|c| {
                        is_name_start(c) || c == '/' || c == '!' || c == '?'
                    }) {
                        break at;
                    }
                    search_from = at + 1;
                }
            }
        };

        let raw = rest[..end].to_string();
        self.ctx.advance_bytes(end);
        ParseEvent::Text { raw, coords }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(src: &str) -> Vec<HtmlEvent> {
        let mut tok = HtmlTokenizer::new(src);
        let mut out = Vec::new();
        while let Some(event) = tok.next_event().unwrap() {
            out.push(event);
        }
        out
    }

    fn first_error(src: &str) -> ParseError {
        let mut tok = HtmlTokenizer::new(src);
        loop {
            match tok.next_event() {
                Ok(Some(_)) => continue,
                Ok(None) => panic!("no error produced"),
                Err(err) => return err,
            }
        }
    }

    #[test]
    fn test_simple_document() {
        let evs = events("<p class=\"a\">hi</p>");
        assert_eq!(evs.len(), 3);
        match &evs[0] {
            ParseEvent::StartTag { name, attributes, .. } => {
                assert_eq!(name, "p");
                assert_eq!(attributes[0].name, "class");
                assert_eq!(attributes[0].value.as_deref(), Some("a"));
            }
            other => panic!("expected start tag, got {other:?}"),
        }
        assert!(matches!(&evs[1], ParseEvent::Text { raw, .. } if raw == "hi"));
        assert!(matches!(&evs[2], ParseEvent::EndTag { name, .. } if name == "p"));
    }

    #[test]
    fn test_bare_and_unquoted_attributes() {
        let evs = events("<input disabled value=abc>");
        let ParseEvent::StartTag { attributes, .. } = &evs[0] else {
            panic!("expected start tag");
        };
        assert_eq!(attributes[0].name, "disabled");
        assert_eq!(attributes[0].value, None);
        assert_eq!(attributes[1].value.as_deref(), Some("abc"));
        assert_eq!(attributes[1].quote, AttrQuote::None);
    }

    #[test]
    fn test_stray_quote_in_unquoted_value() {
        let err = first_error("<img src=\"/x.gif\" width=80\" height=\"60\">");
        assert_eq!(err.kind, ParseErrorKind::InvalidAttributeSyntax('"'));
        assert_eq!(err.coords.line, 1);
        // Column of the stray quote itself.
        assert_eq!(err.coords.column, 27);
    }

    #[test]
    fn test_unterminated_comment_is_fatal() {
        let err = first_error("a<!-- never closed");
        assert_eq!(err.kind, ParseErrorKind::UnterminatedComment);
        assert_eq!(err.coords.column, 2);
    }

    #[test]
    fn test_comment_and_doctype() {
        let evs = events("<!DOCTYPE html><!-- note -->");
        assert!(matches!(&evs[0], ParseEvent::Doctype { .. }));
        assert!(matches!(&evs[1], ParseEvent::Comment { raw, .. } if raw == " note "));
    }

    #[test]
    fn test_raw_text_script() {
        let evs = events("<script>if (a < b) { x(); }</script>");
        assert_eq!(evs.len(), 3);
        assert!(
            matches!(&evs[1], ParseEvent::Text { raw, .. } if raw == "if (a < b) { x(); }")
        );
    }

    #[test]
    fn test_raw_text_ignores_other_close_tags() {
        let evs = events("<script>var s = '</div>';</script>");
        assert!(matches!(&evs[1], ParseEvent::Text { raw, .. } if raw == "var s = '</div>';"));
    }

    #[test]
    fn test_bare_less_than_is_text() {
        let evs = events("<p>a < b</p>");
        assert!(matches!(&evs[1], ParseEvent::Text { raw, .. } if raw == "a < b"));
    }

    #[test]
    fn test_foreign_content_cdata() {
        let evs = events("<svg><![CDATA[x < y]]></svg>");
        assert!(matches!(&evs[1], ParseEvent::Cdata { raw, .. } if raw == "x < y"));
    }

    #[test]
    fn test_self_closing() {
        let evs = events("<br/><img src=\"a.png\" />");
        assert!(matches!(
            &evs[0],
            ParseEvent::StartTag { self_closing: true, .. }
        ));
        assert!(matches!(
            &evs[1],
            ParseEvent::StartTag { self_closing: true, .. }
        ));
    }

    #[test]
    fn test_processing_instruction() {
        let evs = events("<?xml version=\"1.0\"?><r></r>");
        match &evs[0] {
            ParseEvent::ProcessingInstruction { target, content, .. } => {
                assert_eq!(target, "xml");
                assert_eq!(content, " version=\"1.0\"");
            }
            other => panic!("expected PI, got {other:?}"),
        }
    }

    #[test]
    fn test_coordinates_track_lines() {
        let evs = events("<div>\n  <span>x</span>\n</div>");
        let ParseEvent::StartTag { coords, .. } = &evs[2] else {
            panic!("expected span start");
        };
        assert_eq!(coords.line, 2);
        assert_eq!(coords.column, 3);
    }

    #[test]
    fn test_stream_fused_after_error() {
        let mut tok = HtmlTokenizer::new("<!-- open");
        assert!(tok.next_event().is_err());
        assert!(matches!(tok.next_event(), Ok(None)));
    }
}
