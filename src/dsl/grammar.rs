//! Line shapes of the structure DSL.
//!
//! Every line of a definition is one of: blank, comment, section header, node
//! record, load record or bar record. The matchers in this module are the only
//! place those shapes are described. The [`Parser`](super::Parser) applies them
//! strictly, according to the section it is in, while the highlighter in
//! [`lexer`](super::lexer) tries all of them regardless of context.
//!
//! Record matchers are anchored at both ends of the line and return the byte
//! ranges of the interesting fields, so callers can slice values out of the
//! line or color them in place.

use std::fmt;
use std::ops::Range;

/// A section of the definition, introduced by a header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// `nodes` section
    Nodes,
    /// `loads` section
    Loads,
    /// `bars` section
    Bars,
}

impl Section {
    /// Header keyword for this section.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Nodes => "nodes",
            Self::Loads => "loads",
            Self::Bars => "bars",
        }
    }

    /// Parse a section from its header keyword (case-insensitive).
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        [Self::Nodes, Self::Loads, Self::Bars]
            .into_iter()
            .find(|section| section.keyword().eq_ignore_ascii_case(keyword))
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Comment indicator.
pub const COMMENT_INDICATOR: char = '#';

/// Check whether a line holds nothing but whitespace.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Check whether a line is a comment: `#` optionally preceded by whitespace.
pub fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with(COMMENT_INDICATOR)
}

/// Match a section header: exactly one keyword, optionally surrounded by
/// whitespace.
pub fn header(line: &str) -> Option<Section> {
    Section::from_keyword(line.trim())
}

/// A line matching the node record shape `<id> : ( <x> , <y> ) ( <flags> )`.
///
/// The constraint group may be omitted entirely, which reads as a free node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeShape<'a> {
    line: &'a str,
    pub(crate) id: Range<usize>,
    pub(crate) x: Range<usize>,
    pub(crate) y: Range<usize>,
    pub(crate) flags: Range<usize>,
}

impl<'a> NodeShape<'a> {
    /// Node identifier text.
    pub fn id(&self) -> &'a str {
        &self.line[self.id.clone()]
    }

    /// X coordinate text.
    pub fn x(&self) -> &'a str {
        &self.line[self.x.clone()]
    }

    /// Y coordinate text.
    pub fn y(&self) -> &'a str {
        &self.line[self.y.clone()]
    }

    /// Constraint letters (a run of `x`/`y`, possibly empty).
    pub fn flags(&self) -> &'a str {
        &self.line[self.flags.clone()]
    }
}

/// A line matching the load record shape `<nodeId> -> ( <fx> , <fy> )`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadShape<'a> {
    line: &'a str,
    pub(crate) node_id: Range<usize>,
    pub(crate) fx: Range<usize>,
    pub(crate) fy: Range<usize>,
}

impl<'a> LoadShape<'a> {
    /// Identifier of the loaded node.
    pub fn node_id(&self) -> &'a str {
        &self.line[self.node_id.clone()]
    }

    /// Force x component text.
    pub fn fx(&self) -> &'a str {
        &self.line[self.fx.clone()]
    }

    /// Force y component text.
    pub fn fy(&self) -> &'a str {
        &self.line[self.fy.clone()]
    }
}

/// A line matching the bar record shape
/// `<id> : ( <startId> -> <endId> ) <section> <young>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarShape<'a> {
    line: &'a str,
    pub(crate) id: Range<usize>,
    pub(crate) start_id: Range<usize>,
    pub(crate) end_id: Range<usize>,
    pub(crate) section: Range<usize>,
    pub(crate) young: Range<usize>,
}

impl<'a> BarShape<'a> {
    /// Bar identifier text.
    pub fn id(&self) -> &'a str {
        &self.line[self.id.clone()]
    }

    /// Start node identifier text.
    pub fn start_id(&self) -> &'a str {
        &self.line[self.start_id.clone()]
    }

    /// End node identifier text.
    pub fn end_id(&self) -> &'a str {
        &self.line[self.end_id.clone()]
    }

    /// Cross section text.
    pub fn section(&self) -> &'a str {
        &self.line[self.section.clone()]
    }

    /// Young modulus text.
    pub fn young(&self) -> &'a str {
        &self.line[self.young.clone()]
    }
}

/// Match a node record.
pub fn match_node(line: &str) -> Option<NodeShape<'_>> {
    let mut cursor = Cursor::new(line);
    let id = cursor.identifier()?;
    cursor.punct(":")?;
    let (x, y) = cursor.pair()?;

    cursor.punct("(")?;
    cursor.skip_whitespace();
    let flags = cursor.flags();
    cursor.punct(")")?;
    cursor.finish()?;

    Some(NodeShape {
        line,
        id,
        x,
        y,
        flags,
    })
}

/// Match a load record.
pub fn match_load(line: &str) -> Option<LoadShape<'_>> {
    let mut cursor = Cursor::new(line);
    let node_id = cursor.identifier()?;
    cursor.punct("->")?;
    let (fx, fy) = cursor.pair()?;
    cursor.finish()?;

    Some(LoadShape {
        line,
        node_id,
        fx,
        fy,
    })
}

/// Match a bar record.
pub fn match_bar(line: &str) -> Option<BarShape<'_>> {
    let mut cursor = Cursor::new(line);
    let id = cursor.identifier()?;
    cursor.punct(":")?;
    cursor.punct("(")?;
    let start_id = cursor.identifier()?;
    cursor.punct("->")?;
    let end_id = cursor.identifier()?;
    cursor.punct(")")?;
    let section = cursor.number()?;
    // Two numbers in a row need something between them
    if !cursor.skip_whitespace() {
        return None;
    }
    let young = cursor.number()?;
    cursor.finish()?;

    Some(BarShape {
        line,
        id,
        start_id,
        end_id,
        section,
        young,
    })
}

/// Parse a numeric field already accepted by one of the matchers.
pub fn parse_number(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Scanner over a single line.
///
/// Every method that reads a token skips the whitespace in front of it; a
/// failed read returns `None` and the caller abandons the whole line.
struct Cursor<'a> {
    line: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(line: &'a str) -> Self {
        Self { line, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.line[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Skip whitespace, returning whether anything was skipped.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
            self.advance();
        }
        self.pos > start
    }

    fn punct(&mut self, expected: &str) -> Option<()> {
        self.skip_whitespace();
        if self.rest().starts_with(expected) {
            self.pos += expected.len();
            Some(())
        } else {
            None
        }
    }

    fn digits(&mut self) -> Option<Range<usize>> {
        let start = self.pos;
        while matches!(self.peek(), Some(ch) if ch.is_ascii_digit()) {
            self.advance();
        }
        (self.pos > start).then_some(start..self.pos)
    }

    fn identifier(&mut self) -> Option<Range<usize>> {
        self.skip_whitespace();
        self.digits()
    }

    /// `[+-]? digit+ ('.' digit+)?`
    fn number(&mut self) -> Option<Range<usize>> {
        self.skip_whitespace();
        let start = self.pos;
        if matches!(self.peek(), Some('+' | '-')) {
            self.advance();
        }
        self.digits()?;
        if self.peek() == Some('.') && matches!(self.peek_second(), Some(ch) if ch.is_ascii_digit())
        {
            self.advance();
            self.digits()?;
        }
        Some(start..self.pos)
    }

    /// `( <number> , <number> )`
    fn pair(&mut self) -> Option<(Range<usize>, Range<usize>)> {
        self.punct("(")?;
        let first = self.number()?;
        self.punct(",")?;
        let second = self.number()?;
        self.punct(")")?;
        Some((first, second))
    }

    fn flags(&mut self) -> Range<usize> {
        let start = self.pos;
        while matches!(self.peek(), Some('x' | 'y')) {
            self.advance();
        }
        start..self.pos
    }

    fn finish(&mut self) -> Option<()> {
        self.skip_whitespace();
        self.rest().is_empty().then_some(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_is_whole_line_keyword() {
        assert_eq!(header("nodes"), Some(Section::Nodes));
        assert_eq!(header("  LOADS \t"), Some(Section::Loads));
        assert_eq!(header("Bars"), Some(Section::Bars));
        assert_eq!(header("nodes and bars"), None);
        assert_eq!(header("xnodes"), None);
        assert_eq!(header("bars:"), None);
    }

    #[test]
    fn test_comment_and_blank() {
        assert!(is_comment("# a comment"));
        assert!(is_comment("   #indented"));
        assert!(!is_comment("1: (0, 0) () # trailing"));
        assert!(is_blank(" \t "));
        assert!(is_blank(""));
        assert!(!is_blank(" x "));
    }

    #[test]
    fn test_match_node() {
        let shape = match_node("  1: (0, -2.5) (xy)").unwrap();
        assert_eq!(shape.id(), "1");
        assert_eq!(shape.x(), "0");
        assert_eq!(shape.y(), "-2.5");
        assert_eq!(shape.flags(), "xy");

        let shape = match_node("12:(4,0)()").unwrap();
        assert_eq!(shape.id(), "12");
        assert_eq!(shape.flags(), "");

        let shape = match_node("3 : ( 1 , 2 ) ( y )").unwrap();
        assert_eq!(shape.flags(), "y");
    }

    #[test]
    fn test_match_node_requires_constraint_group() {
        assert!(match_node("4: (1, 1)").is_none());
        assert!(match_node("4: (1, 1) (").is_none());
        let shape = match_node("4: (1, 1) ( )").unwrap();
        assert_eq!(shape.flags(), "");
    }

    #[test]
    fn test_match_node_rejects_malformed() {
        assert!(match_node("1: (0, 0) (xz)").is_none());
        assert!(match_node("1: (0, 0) (xy) extra").is_none());
        assert!(match_node("1: (0., 0) ()").is_none());
        assert!(match_node("1: (.5, 0) ()").is_none());
        assert!(match_node("a: (0, 0) ()").is_none());
        assert!(match_node("1: (0 0) ()").is_none());
        assert!(match_node("1 -> (0, 0)").is_none());
    }

    #[test]
    fn test_match_load() {
        let shape = match_load("2 -> (0, -10)").unwrap();
        assert_eq!(shape.node_id(), "2");
        assert_eq!(shape.fx(), "0");
        assert_eq!(shape.fy(), "-10");

        assert!(match_load("2->(+1.5,2)").is_some());
        assert!(match_load("2 -> (1, 2) ()").is_none());
        assert!(match_load("2 - > (1, 2)").is_none());
    }

    #[test]
    fn test_match_bar() {
        let shape = match_bar("1: (1 -> 2) 1.0 200000").unwrap();
        assert_eq!(shape.id(), "1");
        assert_eq!(shape.start_id(), "1");
        assert_eq!(shape.end_id(), "2");
        assert_eq!(shape.section(), "1.0");
        assert_eq!(shape.young(), "200000");

        // Sign is part of the shape; positivity is checked by the parser
        assert!(match_bar("1: (1 -> 2) -1 200").is_some());
    }

    #[test]
    fn test_match_bar_requires_separated_numbers() {
        assert!(match_bar("1: (1 -> 2) 1.0").is_none());
        assert!(match_bar("1: (1 -> 2) 1.0-200").is_none());
        assert!(match_bar("1: (1 -> 2)5 20").is_some());
    }

    #[test]
    fn test_shapes_are_disjoint() {
        let node = "1: (0, 0) (xy)";
        let load = "1 -> (0, 0)";
        let bar = "1: (1 -> 2) 1 2";
        assert!(match_load(node).is_none() && match_bar(node).is_none());
        assert!(match_node(load).is_none() && match_bar(load).is_none());
        assert!(match_node(bar).is_none() && match_load(bar).is_none());
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("+1.5"), Some(1.5));
        assert_eq!(parse_number("-10"), Some(-10.0));
        assert_eq!(parse_number("abc"), None);
    }
}
