//! Doctype grammar
//!
//! Decomposes `<!DOCTYPE …>` declarations, including PUBLIC/SYSTEM
//! declarations with a structured formal public identifier. The tokenizer
//! delegates here when it sees the literal; all failures carry the exact
//! coordinates of the offending token.
//!
//! One deliberate quirk is kept from the legacy grammar: missing whitespace
//! before the root element is only an error once a PUBLIC/SYSTEM keyword is
//! found later. A bare `<!DOCTYPEhtml>` parses without that error.

use wmm_core::{ParseError, ParseErrorKind, ParsingContext};

/// The structured `-//Org//Type Label//Lang[//Version]` identifier of a
/// PUBLIC doctype
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormalPublicId {
    /// `-`, `+`, or an `ISO …` registration
    pub registration: String,
    pub organization: String,
    /// The class keyword, e.g. `DTD`
    pub kind: String,
    pub name: String,
    pub language: String,
    pub version: Option<String>,
    pub quote: char,
}

impl FormalPublicId {
    /// Reassemble the identifier text inside its quotes
    pub fn to_identifier(&self) -> String {
        let mut id = format!(
            "{}//{}//{} {}//{}",
            self.registration, self.organization, self.kind, self.name, self.language
        );
        if let Some(version) = &self.version {
            id.push_str("//");
            id.push_str(version);
        }
        id
    }
}

/// A quoted system identifier (DTD location)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemId {
    pub url: String,
    pub quote: char,
}

/// A parsed doctype declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doctype {
    /// The instruction keyword as written, e.g. `DOCTYPE` or `doctype`
    pub instruction: String,
    pub space_before_root: bool,
    pub root_element: String,
    /// `PUBLIC` or `SYSTEM` as written
    pub publicity: Option<String>,
    pub formal_public_id: Option<FormalPublicId>,
    pub system_id: Option<SystemId>,
}

impl Doctype {
    /// Re-serialize with single-space separators, preserving quote styles
    pub fn render(&self, out: &mut String) {
        out.push_str("<!");
        out.push_str(&self.instruction);
        out.push(' ');
        out.push_str(&self.root_element);
        if let Some(publicity) = &self.publicity {
            out.push(' ');
            out.push_str(publicity);
            if let Some(fpi) = &self.formal_public_id {
                out.push(' ');
                out.push(fpi.quote);
                out.push_str(&fpi.to_identifier());
                out.push(fpi.quote);
            }
            if let Some(system_id) = &self.system_id {
                out.push(' ');
                out.push(system_id.quote);
                out.push_str(&system_id.url);
                out.push(system_id.quote);
            }
        }
        out.push('>');
    }
}

/// Whether the cursor sits on a doctype declaration
pub fn at_doctype(ctx: &ParsingContext<'_>) -> bool {
    ctx.starts_with_ignore_case("<!doctype")
}

fn error(ctx: &ParsingContext<'_>, kind: ParseErrorKind) -> ParseError {
    ParseError::new(kind, ctx.coordinates(), ctx.fragment())
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '.' | '-')
}

/// Parse a doctype declaration, consuming through the closing `>`
///
/// The cursor must sit on `<!DOCTYPE` (any case); call `at_doctype` first.
pub fn parse(ctx: &mut ParsingContext<'_>) -> Result<Doctype, ParseError> {
    debug_assert!(at_doctype(ctx));

    ctx.advance_by(2); // <!
    let mut instruction = String::with_capacity(7);
    for _ in 0.."DOCTYPE".len() {
        if let Some(c) = ctx.advance() {
            instruction.push(c);
        }
    }

    let space_before_root = !ctx.skip_whitespace().is_empty();

    let root_coords = ctx.coordinates();
    if !ctx.peek().is_some_and(is_name_start) {
        return Err(error(ctx, ParseErrorKind::DoctypeNotContainRootElement));
    }
    let root_element = ctx.take_while(is_name_char).to_string();

    let mut doctype = Doctype {
        instruction,
        space_before_root,
        root_element,
        publicity: None,
        formal_public_id: None,
        system_id: None,
    };

    ctx.skip_whitespace();
    if ctx.peek() == Some('>') {
        ctx.advance();
        return Ok(doctype);
    }

    let publicity_upper = if ctx.starts_with_ignore_case("PUBLIC") {
        "PUBLIC"
    } else if ctx.starts_with_ignore_case("SYSTEM") {
        "SYSTEM"
    } else {
        return Err(error(ctx, ParseErrorKind::BogusDoctype));
    };

    // The missing-space check is retroactive: it only fires once a publicity
    // keyword is known to follow the root element.
    if !doctype.space_before_root {
        return Err(ParseError::new(
            ParseErrorKind::MissingSpaceBeforeDoctypeRootElement,
            root_coords,
            ctx.fragment(),
        ));
    }

    doctype.publicity = Some(ctx.remaining()[..6].to_string());
    ctx.advance_by(6);

    if publicity_upper == "PUBLIC" {
        ctx.skip_whitespace();
        doctype.formal_public_id = Some(parse_formal_public_id(ctx)?);
        ctx.skip_whitespace();
        if matches!(ctx.peek(), Some('"') | Some('\'')) {
            doctype.system_id = Some(parse_system_id(ctx)?);
        }
    } else {
        ctx.skip_whitespace();
        if !matches!(ctx.peek(), Some('"') | Some('\'')) {
            return Err(error(ctx, ParseErrorKind::SystemIdNotFound));
        }
        doctype.system_id = Some(parse_system_id(ctx)?);
    }

    ctx.skip_whitespace();
    if ctx.peek() != Some('>') {
        return Err(error(ctx, ParseErrorKind::BogusDoctype));
    }
    ctx.advance();

    Ok(doctype)
}

fn parse_quoted(ctx: &mut ParsingContext<'_>) -> Result<(String, char), ParseError> {
    let quote = match ctx.peek() {
        Some(q @ ('"' | '\'')) => q,
        _ => return Err(error(ctx, ParseErrorKind::BogusDoctype)),
    };
    ctx.advance();
    let value = ctx.take_while(|c| c != quote && c != '>').to_string();
    if ctx.peek() != Some(quote) {
        return Err(error(ctx, ParseErrorKind::BogusDoctype));
    }
    ctx.advance();
    Ok((value, quote))
}

fn parse_formal_public_id(ctx: &mut ParsingContext<'_>) -> Result<FormalPublicId, ParseError> {
    let start_coords = ctx.coordinates();
    let start_fragment = ctx.fragment();
    let (value, quote) = parse_quoted(ctx)?;

    if value.is_empty() {
        return Err(ParseError::new(
            ParseErrorKind::EmptyFormalPublicId,
            start_coords,
            start_fragment,
        ));
    }

    match decompose_formal_public_id(&value, quote) {
        Some(fpi) => Ok(fpi),
        None => Err(ParseError::new(
            ParseErrorKind::InvalidFormalPublicId(value),
            start_coords,
            start_fragment,
        )),
    }
}

/// Split an FPI into its `//`-separated fields
///
/// Grammar: `registration//organization//kind name//language[//version]`
/// where registration is `-`, `+`, or `ISO <digits>`.
fn decompose_formal_public_id(value: &str, quote: char) -> Option<FormalPublicId> {
    let fields: Vec<&str> = value.split("//").collect();
    if fields.len() < 4 || fields.len() > 5 {
        return None;
    }

    let registration = fields[0];
    let valid_registration = registration == "-"
        || registration == "+"
        || (registration.starts_with("ISO")
            && registration[3..].trim().chars().all(|c| c.is_ascii_digit())
            && !registration[3..].trim().is_empty());
    if !valid_registration {
        return None;
    }

    let organization = fields[1];
    if organization.is_empty() {
        return None;
    }

    // The third field is "<kind> <text name>", e.g. "DTD XHTML 1.0 Strict".
    let (kind, name) = fields[2].split_once(' ')?;
    if kind.is_empty() || !kind.chars().all(|c| c.is_ascii_uppercase()) || name.is_empty() {
        return None;
    }

    let language = fields[3];
    if language.is_empty() || !language.chars().take(2).all(|c| c.is_ascii_uppercase()) {
        return None;
    }

    let version = fields.get(4).map(|v| (*v).to_string());

    Some(FormalPublicId {
        registration: registration.to_string(),
        organization: organization.to_string(),
        kind: kind.to_string(),
        name: name.to_string(),
        language: language.to_string(),
        version,
        quote,
    })
}

fn parse_system_id(ctx: &mut ParsingContext<'_>) -> Result<SystemId, ParseError> {
    let start_coords = ctx.coordinates();
    let start_fragment = ctx.fragment();
    let (url, quote) = parse_quoted(ctx)?;

    if url.is_empty() {
        return Err(ParseError::new(
            ParseErrorKind::EmptySystemId,
            start_coords,
            start_fragment,
        ));
    }
    if !is_absolute_uri(&url) {
        return Err(ParseError::new(
            ParseErrorKind::InvalidSystemId(url),
            start_coords,
            start_fragment,
        ));
    }

    Ok(SystemId { url, quote })
}

/// Absolute-URI test: an ASCII-alpha scheme followed by `:`
fn is_absolute_uri(url: &str) -> bool {
    let Some(colon) = url.find(':') else {
        return false;
    };
    let scheme = &url[..colon];
    !scheme.is_empty()
        && scheme.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        && !url.contains(char::is_whitespace)
}
