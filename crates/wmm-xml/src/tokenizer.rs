//! XML tokenizer
//!
//! Same pull model as the HTML tokenizer, with XML rules: names are
//! case-sensitive and may carry namespace prefixes, attribute values must
//! be quoted, CDATA sections appear anywhere, and the doctype declaration
//! is carried verbatim rather than decomposed.

use memchr::memmem;
use wmm_core::{
    AttrQuote, Attribute, ParseError, ParseErrorKind, ParseEvent, ParsingContext,
    SourceCoordinates,
};

/// Event type produced by the XML tokenizer
///
/// The doctype payload is the raw declaration text; XML minification never
/// rewrites it.
pub type XmlEvent = ParseEvent<String>;

/// Closing marker of a minification ignore region
pub const IGNORE_CLOSE: &str = "<!--/wmm:ignore-->";

pub struct XmlTokenizer<'src> {
    ctx: ParsingContext<'src>,
    done: bool,
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '.' | '-')
}

impl<'src> XmlTokenizer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            ctx: ParsingContext::new(source),
            done: false,
        }
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.ctx.coordinates(), self.ctx.fragment())
    }

    fn error_at(&self, kind: ParseErrorKind, coords: SourceCoordinates) -> ParseError {
        ParseError::new(kind, coords, self.ctx.fragment())
    }

    /// Pull the next event; `Ok(None)` at end of input, fused after an error
    pub fn next_event(&mut self) -> Result<Option<XmlEvent>, ParseError> {
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

    /// Consume an ignore region's interior, up to past its closing marker
    ///
    /// Called by the minifier right after the opening marker comment was
    /// pulled. The interior is returned byte-for-byte; coordinates advance
    /// over it as usual.
    pub fn take_ignore_region(
        &mut self,
        open_coords: SourceCoordinates,
    ) -> Result<String, ParseError> {
        let rest = self.ctx.remaining();
        let Some(end) = memmem::find(rest.as_bytes(), IGNORE_CLOSE.as_bytes()) else {
            self.done = true;
            return Err(self.error_at(
                ParseErrorKind::UnmatchedIgnoreMarker("wmm:ignore".to_string()),
                open_coords,
            ));
        };
        let interior = rest[..end].to_string();
        self.ctx.advance_bytes(end + IGNORE_CLOSE.len());
        Ok(interior)
    }

    fn dispatch(&mut self) -> Result<Option<XmlEvent>, ParseError> {
        if self.ctx.is_eof() {
            return Ok(None);
        }

        let coords = self.ctx.coordinates();

        if self.ctx.starts_with("<!--") {
            return self.scan_comment(coords).map(Some);
        }
        if self.ctx.starts_with("<![CDATA[") {
            return self.scan_cdata(coords).map(Some);
        }
        if self.ctx.starts_with_ignore_case("<!DOCTYPE") {
            return self.scan_doctype(coords).map(Some);
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

    fn scan_comment(&mut self, coords: SourceCoordinates) -> Result<XmlEvent, ParseError> {
        self.ctx.advance_by(4);
        let rest = self.ctx.remaining();
        let Some(end) = memmem::find(rest.as_bytes(), b"-->") else {
            return Err(self.error_at(ParseErrorKind::UnterminatedComment, coords));
        };
        let raw = rest[..end].to_string();
        self.ctx.advance_bytes(end + 3);
        Ok(ParseEvent::Comment { raw, coords })
    }

    fn scan_cdata(&mut self, coords: SourceCoordinates) -> Result<XmlEvent, ParseError> {
        self.ctx.advance_by(9);
        let rest = self.ctx.remaining();
        let Some(end) = memmem::find(rest.as_bytes(), b"]]>") else {
            return Err(self.error_at(ParseErrorKind::UnterminatedCdata, coords));
        };
        let raw = rest[..end].to_string();
        self.ctx.advance_bytes(end + 3);
        Ok(ParseEvent::Cdata { raw, coords })
    }

    /// Consume the whole declaration, internal subset included
    fn scan_doctype(&mut self, coords: SourceCoordinates) -> Result<XmlEvent, ParseError> {
        let rest = self.ctx.remaining();
        let mut in_subset = false;
        let mut quote: Option<char> = None;
        let mut end = None;
        for (i, c) in rest.char_indices() {
            match (quote, c) {
                (Some(q), _) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') => quote = Some(c),
                (None, '[') => in_subset = true,
                (None, ']') => in_subset = false,
                (None, '>') if !in_subset => {
                    end = Some(i);
                    break;
                }
                _ => {}
            }
        }
        let Some(end) = end else {
            return Err(self.error_at(ParseErrorKind::UnterminatedTag, coords));
        };
        let raw = rest[..end + 1].to_string();
        self.ctx.advance_bytes(end + 1);
        Ok(ParseEvent::Doctype { doctype: raw, coords })
    }

    fn scan_processing_instruction(
        &mut self,
        coords: SourceCoordinates,
    ) -> Result<XmlEvent, ParseError> {
        self.ctx.advance_by(2);
        let target = self.ctx.take_while(is_name_char).to_string();
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

    fn scan_end_tag(&mut self, coords: SourceCoordinates) -> Result<XmlEvent, ParseError> {
        self.ctx.advance_by(2);
        if !self.ctx.peek().is_some_and(is_name_start) {
            return Err(self.error_at(
                ParseErrorKind::MalformedEndTag(
                    self.ctx.peek().map_or_else(String::new, |c| c.to_string()),
                ),
                coords,
            ));
        }
        let name = self.ctx.take_while(is_name_char).to_string();
        self.ctx.skip_whitespace();
        if self.ctx.peek() != Some('>') {
            return Err(self.error(ParseErrorKind::MalformedEndTag(name)));
        }
        self.ctx.advance();
        Ok(ParseEvent::EndTag { name, coords })
    }

    fn scan_start_tag(&mut self, coords: SourceCoordinates) -> Result<XmlEvent, ParseError> {
        self.ctx.advance();
        let name = self.ctx.take_while(is_name_char).to_string();

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
                Some(c) if is_name_start(c) => {
                    attributes.push(self.scan_attribute()?);
                }
                Some(c) => {
                    return Err(self.error(ParseErrorKind::InvalidAttributeSyntax(c)));
                }
            }
        }

        Ok(ParseEvent::StartTag {
            name,
            attributes,
            self_closing,
            coords,
        })
    }

    /// One attribute; XML requires `name="value"` with a quoted value
    fn scan_attribute(&mut self) -> Result<Attribute, ParseError> {
        let coords = self.ctx.coordinates();
        let name = self.ctx.take_while(is_name_char).to_string();
        self.ctx.skip_whitespace();

        if self.ctx.peek() != Some('=') {
            return Err(self.error(ParseErrorKind::InvalidAttributeSyntax(
                self.ctx.peek().unwrap_or(' '),
            )));
        }
        self.ctx.advance();
        self.ctx.skip_whitespace();

        let Some(q @ ('"' | '\'')) = self.ctx.peek() else {
            return Err(self.error(ParseErrorKind::InvalidAttributeSyntax(
                self.ctx.peek().unwrap_or(' '),
            )));
        };
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

    fn scan_text(&mut self, coords: SourceCoordinates) -> XmlEvent {
        let rest = self.ctx.remaining();
        let bytes = rest.as_bytes();

        // A `<` that opens no recognizable construct stays text, so the
        // cursor can always make progress.
        let mut search_from = 1.min(rest.len());
        let end = loop {
            match memchr::memchr(b'<', &bytes[search_from..]) {
                None => break rest.len(),
                Some(offset) => {
                    let at = search_from + offset;
                    let next = rest[at + 1..].chars().next();
                    if next.is_some_and(|c| is_name_start(c) || c == '/' || c == '!' || c == '?') {
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

    fn events(src: &str) -> Vec<XmlEvent> {
        let mut tok = XmlTokenizer::new(src);
        let mut out = Vec::new();
        while let Some(event) = tok.next_event().unwrap() {
            out.push(event);
        }
        out
    }

    #[test]
    fn test_declaration_and_root() {
        let evs = events("<?xml version=\"1.0\" encoding=\"utf-8\"?><root/>");
        match &evs[0] {
            ParseEvent::ProcessingInstruction { target, .. } => assert_eq!(target, "xml"),
            other => panic!("expected declaration, got {other:?}"),
        }
        assert!(matches!(
            &evs[1],
            ParseEvent::StartTag { name, self_closing: true, .. } if name == "root"
        ));
    }

    #[test]
    fn test_namespaced_names() {
        let evs = events("<soap:Envelope xmlns:soap=\"http://x\"></soap:Envelope>");
        let ParseEvent::StartTag { name, attributes, .. } = &evs[0] else {
            panic!("expected start tag");
        };
        assert_eq!(name, "soap:Envelope");
        assert_eq!(attributes[0].name, "xmlns:soap");
    }

    #[test]
    fn test_case_sensitive_names_kept() {
        let evs = events("<Item><item/></Item>");
        assert!(matches!(&evs[0], ParseEvent::StartTag { name, .. } if name == "Item"));
        assert!(matches!(&evs[1], ParseEvent::StartTag { name, .. } if name == "item"));
    }

    #[test]
    fn test_doctype_verbatim() {
        let src = "<!DOCTYPE note [ <!ELEMENT note (#PCDATA)> ]><note/>";
        let evs = events(src);
        let ParseEvent::Doctype { doctype, .. } = &evs[0] else {
            panic!("expected doctype");
        };
        assert_eq!(doctype, "<!DOCTYPE note [ <!ELEMENT note (#PCDATA)> ]>");
    }

    #[test]
    fn test_cdata_section() {
        let evs = events("<a><![CDATA[1 < 2 && 3 > 2]]></a>");
        assert!(matches!(&evs[1], ParseEvent::Cdata { raw, .. } if raw == "1 < 2 && 3 > 2"));
    }

    #[test]
    fn test_unquoted_attribute_rejected() {
        let mut tok = XmlTokenizer::new("<a b=c/>");
        let err = loop {
            match tok.next_event() {
                Ok(Some(_)) => continue,
                Ok(None) => panic!("no error produced"),
                Err(err) => break err,
            }
        };
        assert_eq!(err.kind, ParseErrorKind::InvalidAttributeSyntax('c'));
    }

    #[test]
    fn test_ignore_region_interior() {
        let src = "<!--wmm:ignore-->  <raw>   kept   </raw>  <!--/wmm:ignore--><b/>";
        let mut tok = XmlTokenizer::new(src);
        let Ok(Some(ParseEvent::Comment { raw, coords })) = tok.next_event() else {
            panic!("expected opening marker comment");
        };
        assert_eq!(raw, "wmm:ignore");
        let interior = tok.take_ignore_region(coords).unwrap();
        assert_eq!(interior, "  <raw>   kept   </raw>  ");
        assert!(matches!(
            tok.next_event().unwrap(),
            Some(ParseEvent::StartTag { .. })
        ));
    }

    #[test]
    fn test_ignore_region_unclosed() {
        let mut tok = XmlTokenizer::new("<!--wmm:ignore--><a/>");
        let Ok(Some(ParseEvent::Comment { coords, .. })) = tok.next_event() else {
            panic!("expected opening marker comment");
        };
        let err = tok.take_ignore_region(coords).unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::UnmatchedIgnoreMarker("wmm:ignore".to_string())
        );
        assert_eq!(err.coords.column, 1);
    }

    #[test]
    fn test_unterminated_cdata() {
        let mut tok = XmlTokenizer::new("<a><![CDATA[open");
        tok.next_event().unwrap();
        let err = tok.next_event().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnterminatedCdata);
    }
}
