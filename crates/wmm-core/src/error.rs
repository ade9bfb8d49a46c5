//! Error types
//!
//! Parse failures travel as `ParseError` values inside the tokenizers and
//! engines. They never escape a minify call: the engine converts them into
//! `MinificationErrorInfo` entries on the result.

use crate::coords::SourceCoordinates;

/// What went wrong while parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("doctype declaration does not contain a root element")]
    DoctypeNotContainRootElement,
    #[error("missing whitespace before the doctype root element")]
    MissingSpaceBeforeDoctypeRootElement,
    #[error("invalid formal public identifier {0:?}")]
    InvalidFormalPublicId(String),
    #[error("formal public identifier is empty")]
    EmptyFormalPublicId,
    #[error("invalid system identifier {0:?}")]
    InvalidSystemId(String),
    #[error("system identifier is empty")]
    EmptySystemId,
    #[error("system identifier expected after the SYSTEM keyword")]
    SystemIdNotFound,
    #[error("bogus content in doctype declaration")]
    BogusDoctype,
    #[error("comment is not terminated")]
    UnterminatedComment,
    #[error("CDATA section is not terminated")]
    UnterminatedCdata,
    #[error("processing instruction is not terminated")]
    UnterminatedProcessingInstruction,
    #[error("tag is not terminated")]
    UnterminatedTag,
    #[error("invalid character {0:?} in attribute syntax")]
    InvalidAttributeSyntax(char),
    #[error("end tag {0:?} is malformed")]
    MalformedEndTag(String),
    #[error("ignore region marker {0:?} has no matching counterpart")]
    UnmatchedIgnoreMarker(String),
}

/// A structured parse failure with its location and surrounding source
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} (line {} column {})", .coords.line, .coords.column)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub coords: SourceCoordinates,
    pub source_fragment: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, coords: SourceCoordinates, source_fragment: String) -> Self {
        Self {
            kind,
            coords,
            source_fragment,
        }
    }
}

/// An error or warning entry on a minification result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinificationErrorInfo {
    pub message: String,
    pub line: u32,
    pub column: u32,
    pub source_fragment: String,
}

impl MinificationErrorInfo {
    pub fn new(message: String, line: u32, column: u32, source_fragment: String) -> Self {
        Self {
            message,
            line,
            column,
            source_fragment,
        }
    }

    /// An entry with no position information
    pub fn message_only(message: String) -> Self {
        Self::new(message, 0, 0, String::new())
    }
}

impl From<ParseError> for MinificationErrorInfo {
    fn from(err: ParseError) -> Self {
        Self {
            message: err.kind.to_string(),
            line: err.coords.line,
            column: err.coords.column,
            source_fragment: err.source_fragment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display_carries_position() {
        let err = ParseError::new(
            ParseErrorKind::UnterminatedComment,
            SourceCoordinates::new(10, 2, 5),
            "<!-- oops".to_string(),
        );
        let text = err.to_string();
        assert!(text.contains("line 2"), "{text}");
        assert!(text.contains("column 5"), "{text}");
    }

    #[test]
    fn test_error_info_from_parse_error() {
        let err = ParseError::new(
            ParseErrorKind::EmptySystemId,
            SourceCoordinates::new(0, 1, 3),
            String::new(),
        );
        let info = MinificationErrorInfo::from(err);
        assert_eq!(info.line, 1);
        assert_eq!(info.column, 3);
    }
}
