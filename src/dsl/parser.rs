//! Parser for the structure DSL.
//!
//! The parser never gives up on a definition: every line that cannot be read
//! becomes a [`ParseError`] and is left out of the model, and the remaining
//! lines are still parsed.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, trace};

use super::ast::*;
use super::grammar::{self, parse_number, Section};

/// Result of parsing a definition: the model built from the valid lines and
/// the errors found on the others, in line order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseOutcome {
    /// The structure
    pub structure: StructuralModel,
    /// Line errors
    pub errors: Vec<ParseError>,
}

impl ParseOutcome {
    /// Check whether the definition parsed without errors.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parser for structure definitions.
#[derive(Debug, Default)]
pub struct Parser {
    section: Option<Section>,
    nodes: Vec<Node>,
    node_ids: HashSet<String>,
    bars: Vec<(usize, Bar)>,
    bar_ids: HashSet<String>,
    loads: Vec<PendingLoad>,
    errors: Vec<ParseError>,
}

impl Parser {
    /// Create a new parser, outside of any section.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the given definition lines.
    pub fn parse<I, S>(mut self, lines: I) -> ParseOutcome
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (index, line) in lines.into_iter().enumerate() {
            self.parse_line(index + 1, line.as_ref());
        }
        self.finish()
    }

    fn parse_line(&mut self, line_num: usize, line: &str) {
        if grammar::is_blank(line) || grammar::is_comment(line) {
            return;
        }

        if let Some(section) = grammar::header(line) {
            trace!(line = line_num, %section, "entering section");
            self.section = Some(section);
            return;
        }

        let result = match self.section {
            None => Err(format!(
                "Can't parse \"{}\" outside of a section ('nodes', 'loads', or 'bars')",
                line
            )),
            Some(Section::Nodes) => self.parse_node(line),
            Some(Section::Loads) => self.parse_load(line, line_num),
            Some(Section::Bars) => self.parse_bar(line, line_num),
        };

        if let Err(message) = result {
            self.errors.push(ParseError::new(line_num, message));
        }
    }

    fn parse_node(&mut self, line: &str) -> Result<(), String> {
        let unparseable = || format!("Can't parse node of: \"{}\"", line);
        let shape = grammar::match_node(line).ok_or_else(unparseable)?;
        let x = parse_number(shape.x()).ok_or_else(unparseable)?;
        let y = parse_number(shape.y()).ok_or_else(unparseable)?;

        let id = shape.id();
        if !self.node_ids.insert(id.to_string()) {
            return Err(format!("Node with id {} is already defined", id));
        }

        self.nodes.push(Node::new(
            id,
            Point::new(x, y),
            Constraint::from_flags(shape.flags()),
        ));
        Ok(())
    }

    fn parse_load(&mut self, line: &str, line_num: usize) -> Result<(), String> {
        let unparseable = || format!("Can't parse load of: \"{}\"", line);
        let shape = grammar::match_load(line).ok_or_else(unparseable)?;
        let fx = parse_number(shape.fx()).ok_or_else(unparseable)?;
        let fy = parse_number(shape.fy()).ok_or_else(unparseable)?;

        self.loads.push(PendingLoad {
            node_id: shape.node_id().to_string(),
            load: Load { fx, fy },
            line: line_num,
        });
        Ok(())
    }

    fn parse_bar(&mut self, line: &str, line_num: usize) -> Result<(), String> {
        let unparseable = || format!("Can't parse bar of: \"{}\"", line);
        let shape = grammar::match_bar(line).ok_or_else(unparseable)?;
        let section = parse_number(shape.section()).ok_or_else(unparseable)?;
        let young = parse_number(shape.young()).ok_or_else(unparseable)?;

        let id = shape.id();
        if section <= 0.0 {
            return Err(format!("Bar {} must have a positive section", id));
        }
        if young <= 0.0 {
            return Err(format!("Bar {} must have a positive young modulus", id));
        }
        if !self.bar_ids.insert(id.to_string()) {
            return Err(format!("Bar with id {} is already defined", id));
        }

        self.bars.push((
            line_num,
            Bar {
                id: id.to_string(),
                start_node_id: shape.start_id().to_string(),
                end_node_id: shape.end_id().to_string(),
                section,
                young,
            },
        ));
        Ok(())
    }

    /// Resolve references once every line has been read.
    ///
    /// Loads and bars may name nodes declared anywhere in the definition, so
    /// they are checked against the complete node list here.
    fn finish(self) -> ParseOutcome {
        let Parser {
            mut nodes,
            bars,
            loads,
            mut errors,
            ..
        } = self;

        let nodes_by_id: HashMap<String, usize> = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.clone(), index))
            .collect();

        for pending in loads {
            match nodes_by_id.get(&pending.node_id) {
                Some(&index) => nodes[index].loads.push(pending.load),
                None => errors.push(ParseError::new(
                    pending.line,
                    format!("Node with id {} doesn't exist", pending.node_id),
                )),
            }
        }

        let mut valid_bars = Vec::with_capacity(bars.len());
        for (line_num, bar) in bars {
            let missing = [&bar.start_node_id, &bar.end_node_id]
                .into_iter()
                .find(|id| !nodes_by_id.contains_key(id.as_str()))
                .cloned();
            match missing {
                Some(id) => errors.push(ParseError::new(
                    line_num,
                    format!("Node with id {} doesn't exist", id),
                )),
                None => valid_bars.push(bar),
            }
        }

        // Reference errors are found late; keep the list in line order
        errors.sort_by_key(|err| err.line);

        let structure = StructuralModel::new(nodes, valid_bars);
        debug!(
            nodes = structure.nodes().len(),
            bars = structure.bars().len(),
            errors = errors.len(),
            "parsed structure definition"
        );

        ParseOutcome { structure, errors }
    }
}
