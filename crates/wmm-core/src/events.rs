//! Parse events
//!
//! The structural events a tokenizer hands to a minification engine, one at
//! a time. Events are produced lazily from a pull loop; no tree is built.

use crate::coords::SourceCoordinates;

/// Quote style of an attribute value as written in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttrQuote {
    #[default]
    Double,
    Single,
    /// Unquoted value
    None,
}

impl AttrQuote {
    /// The character to emit around a value, preferring the original style
    pub fn char(self) -> char {
        match self {
            AttrQuote::Single => '\'',
            AttrQuote::Double | AttrQuote::None => '"',
        }
    }
}

/// A single attribute inside a start tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    /// `None` for a bare attribute written without `=`
    pub value: Option<String>,
    pub quote: AttrQuote,
    pub coords: SourceCoordinates,
}

impl Attribute {
    /// The value, treating a bare attribute as empty
    pub fn value_str(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

/// One structural event from a markup tokenizer
#[derive(Debug, Clone, PartialEq)]
pub enum ParseEvent<D> {
    StartTag {
        name: String,
        attributes: Vec<Attribute>,
        self_closing: bool,
        coords: SourceCoordinates,
    },
    EndTag {
        name: String,
        coords: SourceCoordinates,
    },
    Text {
        raw: String,
        coords: SourceCoordinates,
    },
    Comment {
        raw: String,
        coords: SourceCoordinates,
    },
    Cdata {
        raw: String,
        coords: SourceCoordinates,
    },
    ProcessingInstruction {
        target: String,
        content: String,
        coords: SourceCoordinates,
    },
    Doctype {
        doctype: D,
        coords: SourceCoordinates,
    },
}

impl<D> ParseEvent<D> {
    /// The coordinates where this event started in the source
    pub fn coords(&self) -> SourceCoordinates {
        match self {
            ParseEvent::StartTag { coords, .. }
            | ParseEvent::EndTag { coords, .. }
            | ParseEvent::Text { coords, .. }
            | ParseEvent::Comment { coords, .. }
            | ParseEvent::Cdata { coords, .. }
            | ParseEvent::ProcessingInstruction { coords, .. }
            | ParseEvent::Doctype { coords, .. } => *coords,
        }
    }
}
