//! Source coordinates
//!
//! Line/column bookkeeping for diagnostics. The parsing cursor maintains
//! coordinates incrementally; the free functions here recompute from scratch
//! and are only used when building an error message.

/// A position in the source text
///
/// Line and column are 1-based; `position` is the byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceCoordinates {
    pub position: usize,
    pub line: u32,
    pub column: u32,
}

impl SourceCoordinates {
    /// Coordinates for the start of input
    pub const START: SourceCoordinates = SourceCoordinates {
        position: 0,
        line: 1,
        column: 1,
    };

    pub fn new(position: usize, line: u32, column: u32) -> Self {
        Self {
            position,
            line,
            column,
        }
    }
}

impl Default for SourceCoordinates {
    fn default() -> Self {
        Self::START
    }
}

/// Compute the coordinates of a byte offset by scanning the source
///
/// Counts newlines up to `offset`; the column is measured in characters from
/// the last newline. Offsets past the end clamp to the end of input.
pub fn coordinates_at(source: &str, offset: usize) -> SourceCoordinates {
    let offset = offset.min(source.len());
    let before = &source[..offset];

    let mut line = 1u32;
    let mut line_start = 0usize;
    for (i, b) in before.bytes().enumerate() {
        if b == b'\n' {
            line += 1;
            line_start = i + 1;
        }
    }

    let column = before[line_start..].chars().count() as u32 + 1;
    SourceCoordinates::new(offset, line, column)
}

/// Extract the text surrounding a position, for error messages
///
/// Returns up to `radius` characters on either side of the position, cut at
/// line boundaries so a fragment never spans more than the offending line's
/// neighborhood.
pub fn fragment_around(source: &str, coords: SourceCoordinates, radius: usize) -> String {
    let pos = coords.position.min(source.len());

    let start = source[..pos]
        .char_indices()
        .rev()
        .take(radius)
        .take_while(|&(_, c)| c != '\n')
        .last()
        .map_or(pos, |(i, _)| i);

    let mut end = pos;
    for (i, c) in source[pos..].char_indices().take(radius) {
        if c == '\n' {
            break;
        }
        end = pos + i + c.len_utf8();
    }

    source[start..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_start() {
        let coords = coordinates_at("hello", 0);
        assert_eq!(coords, SourceCoordinates::new(0, 1, 1));
    }

    #[test]
    fn test_coordinates_multiline() {
        let src = "one\ntwo\nthree";
        let coords = coordinates_at(src, src.find("three").unwrap());
        assert_eq!(coords.line, 3);
        assert_eq!(coords.column, 1);

        let coords = coordinates_at(src, src.find("wo").unwrap());
        assert_eq!(coords.line, 2);
        assert_eq!(coords.column, 2);
    }

    #[test]
    fn test_coordinates_clamp_past_end() {
        let coords = coordinates_at("ab", 99);
        assert_eq!(coords.position, 2);
        assert_eq!(coords.column, 3);
    }

    #[test]
    fn test_fragment_stays_on_line() {
        let src = "first line\nsecond line\nthird line";
        let coords = coordinates_at(src, src.find("second").unwrap() + 3);
        let frag = fragment_around(src, coords, 100);
        assert_eq!(frag, "second line");
    }

    #[test]
    fn test_fragment_radius() {
        let src = "abcdefghij";
        let coords = coordinates_at(src, 5);
        let frag = fragment_around(src, coords, 2);
        assert_eq!(frag, "defg");
    }
}
