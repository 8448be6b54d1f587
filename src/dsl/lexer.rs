//! Line tokenizer for syntax highlighting.
//!
//! Highlighting works on one line at a time and never fails: a line is split
//! into [`Span`]s whose texts, concatenated, give back the line exactly. Lines
//! that match no known shape become a single untyped span.

use std::fmt;
use std::ops::Range;

use serde::Serialize;

use super::grammar;

/// Display role of a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanKind {
    /// A whole comment line
    Comment,
    /// A whole section header line
    Header,
    /// Whitespace and punctuation inside a record
    Text,
    /// A node or bar identifier
    Id,
    /// First value of a coordinate or force pair
    Xdir,
    /// Second value of a coordinate or force pair
    Ydir,
    /// Content that matches no known shape
    Plain,
}

impl SpanKind {
    /// CSS class used for the span, if any.
    pub fn css_class(&self) -> Option<&'static str> {
        match self {
            Self::Comment => Some("comment"),
            Self::Header => Some("header"),
            Self::Text => Some("text"),
            Self::Id => Some("id"),
            Self::Xdir => Some("xdir"),
            Self::Ydir => Some("ydir"),
            Self::Plain => None,
        }
    }
}

/// A piece of a highlighted line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    /// Display role
    pub kind: SpanKind,
    /// The span's text
    pub text: String,
}

impl Span {
    fn new(kind: SpanKind, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
        }
    }
}

/// A highlighted line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkedLine {
    /// Spans in line order
    pub spans: Vec<Span>,
}

impl MarkedLine {
    /// The original line text.
    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    /// Render as HTML, one `<span class="codeh ...">` per span.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for span in &self.spans {
            html.push_str("<span class=\"codeh");
            if let Some(class) = span.kind.css_class() {
                html.push(' ');
                html.push_str(class);
            }
            html.push_str("\">");
            push_escaped(&mut html, &span.text);
            html.push_str("</span>");
        }
        html
    }
}

impl fmt::Display for MarkedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for span in &self.spans {
            f.write_str(&span.text)?;
        }
        Ok(())
    }
}

/// Highlight every line of a definition.
pub fn highlight<I, S>(lines: I) -> Vec<MarkedLine>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .map(|line| highlight_line(line.as_ref()))
        .collect()
}

/// Highlight a single line.
pub fn highlight_line(line: &str) -> MarkedLine {
    if grammar::is_comment(line) {
        return whole(SpanKind::Comment, line);
    }

    if grammar::header(line).is_some() {
        return whole(SpanKind::Header, line);
    }

    match record_marks(line) {
        Some(marks) => split(line, &marks),
        None => whole(SpanKind::Plain, line),
    }
}

fn whole(kind: SpanKind, line: &str) -> MarkedLine {
    MarkedLine {
        spans: vec![Span::new(kind, line)],
    }
}

/// Typed fields of the first record shape the line matches, in line order.
///
/// Unlike the parser, which only accepts the record kind of the current
/// section, all three shapes are tried.
fn record_marks(line: &str) -> Option<[(SpanKind, Range<usize>); 3]> {
    if let Some(node) = grammar::match_node(line) {
        return Some([
            (SpanKind::Id, node.id),
            (SpanKind::Xdir, node.x),
            (SpanKind::Ydir, node.y),
        ]);
    }

    if let Some(load) = grammar::match_load(line) {
        return Some([
            (SpanKind::Id, load.node_id),
            (SpanKind::Xdir, load.fx),
            (SpanKind::Ydir, load.fy),
        ]);
    }

    grammar::match_bar(line).map(|bar| {
        [
            (SpanKind::Id, bar.id),
            (SpanKind::Id, bar.start_id),
            (SpanKind::Id, bar.end_id),
        ]
    })
}

/// Cut the line around the marked fields, keeping every gap as a text span.
fn split(line: &str, marks: &[(SpanKind, Range<usize>)]) -> MarkedLine {
    let mut spans = Vec::with_capacity(marks.len() * 2 + 1);
    let mut cursor = 0;

    for (kind, range) in marks {
        if range.start > cursor {
            spans.push(Span::new(SpanKind::Text, &line[cursor..range.start]));
        }
        spans.push(Span::new(*kind, &line[range.clone()]));
        cursor = range.end;
    }
    if cursor < line.len() {
        spans.push(Span::new(SpanKind::Text, &line[cursor..]));
    }

    MarkedLine { spans }
}

fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
