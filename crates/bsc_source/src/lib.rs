//! Source positions and ranges for the bsc analyzer.
//!
//! Positions are zero-based line/character pairs, matching the protocol
//! surface most hosts speak. Nodes synthesized by the analyzer (rather
//! than read from source text) carry the *interpolated* sentinel range,
//! whose line and character are both `-1`.

use std::fmt;

/// A zero-based line/character position in a source file.
///
/// The ordering is line-major: a position on an earlier line compares
/// less than any position on a later line.
///
/// # Examples
///
/// ```
/// use bsc_source::Position;
///
/// let a = Position::new(1, 4);
/// let b = Position::new(2, 0);
/// assert!(a < b);
/// assert!(!a.is_interpolated());
/// assert!(Position::INTERPOLATED.is_interpolated());
/// ```
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub line: i32,
    pub character: i32,
}

impl Position {
    /// The sentinel position of programmatically synthesized nodes.
    pub const INTERPOLATED: Position = Position {
        line: -1,
        character: -1,
    };

    #[must_use]
    pub const fn new(line: i32, character: i32) -> Self {
        Self { line, character }
    }

    #[must_use]
    pub const fn is_interpolated(self) -> bool {
        self.line == -1 && self.character == -1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.character)
    }
}

/// A half-open-ended span between two [`Position`]s.
///
/// `contains` treats the end position as inclusive, which is what
/// hit-testing a cursor position against a declaration expects.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceRange {
    pub start: Position,
    pub end: Position,
}

impl SourceRange {
    /// The sentinel range of programmatically synthesized nodes.
    pub const INTERPOLATED: SourceRange = SourceRange {
        start: Position::INTERPOLATED,
        end: Position::INTERPOLATED,
    };

    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Shorthand for a range given as four coordinates.
    ///
    /// # Examples
    ///
    /// ```
    /// use bsc_source::{Position, SourceRange};
    ///
    /// let range = SourceRange::span(0, 4, 0, 9);
    /// assert_eq!(range.start, Position::new(0, 4));
    /// assert_eq!(range.end, Position::new(0, 9));
    /// ```
    #[must_use]
    pub const fn span(
        start_line: i32,
        start_character: i32,
        end_line: i32,
        end_character: i32,
    ) -> Self {
        Self {
            start: Position::new(start_line, start_character),
            end: Position::new(end_line, end_character),
        }
    }

    #[must_use]
    pub const fn is_interpolated(self) -> bool {
        self.start.is_interpolated() && self.end.is_interpolated()
    }

    /// Whether `position` falls within this range (end inclusive).
    #[must_use]
    pub fn contains(self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Types that are anchored to a region of source text.
pub trait Ranged {
    fn range(&self) -> SourceRange;
}

impl Ranged for SourceRange {
    fn range(&self) -> SourceRange {
        *self
    }
}

impl<T> Ranged for &T
where
    T: Ranged,
{
    fn range(&self) -> SourceRange {
        T::range(self)
    }
}
