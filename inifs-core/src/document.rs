//! INI document model and parser.
//!
//! A document is a flat sequence of nodes:
//! - `Section` opens a section; its entries are the `Key, Value` pairs that
//!   follow it up to the next `Section` or the end of the sequence.
//! - `Key` at index `i` is always followed by its `Value` at `i + 1`.
//! - Pairs before the first `Section` belong to the unnamed section.
//!
//! Indices shift on every insert or erase, so positions must not be held
//! across a mutation.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{IniResult, ParseError};

/// Node tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Section,
    Key,
    Value,
}

/// One unit of the flat encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    pub text: String,
}

impl Node {
    pub fn section(name: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Section,
            text: name.into(),
        }
    }

    pub fn key(text: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Key,
            text: text.into(),
        }
    }

    pub fn value(text: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Value,
            text: text.into(),
        }
    }

    pub fn is_section(&self) -> bool {
        self.kind == NodeKind::Section
    }
}

/// Parsed INI document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse document text.
    ///
    /// Whitespace between entries is skipped. `[name]` opens a section,
    /// anything else must be `key=value` with the value running to the end
    /// of the line (or the end of input). A `\r` before the line feed is
    /// not part of the value.
    ///
    /// # Examples
    /// ```
    /// use inifs_core::{Document, NodeKind};
    /// let doc = Document::parse("[a]\nx=1\n").unwrap();
    /// let kinds: Vec<_> = doc.nodes().iter().map(|n| n.kind).collect();
    /// assert_eq!(kinds, [NodeKind::Section, NodeKind::Key, NodeKind::Value]);
    /// ```
    pub fn parse(content: &str) -> Result<Self, ParseError> {
        let mut nodes = Vec::new();
        let mut rest = content;
        let mut line = 1;

        loop {
            let trimmed = rest.trim_start();
            line += count_lines(&rest[..rest.len() - trimmed.len()]);
            rest = trimmed;

            if rest.is_empty() {
                break;
            }

            if let Some(after) = rest.strip_prefix('[') {
                let end = match after.find(|c: char| c == ']' || c == '\n') {
                    Some(i) if after.as_bytes()[i] == b']' => i,
                    _ => return Err(ParseError::UnterminatedSection { line }),
                };
                let name = &after[..end];
                check_name(name, line)?;
                tracing::trace!(line, name, "section");
                nodes.push(Node::section(name));
                rest = &after[end + 1..];
            } else {
                let eq = match rest.find(|c: char| c == '=' || c == '\n') {
                    Some(i) if rest.as_bytes()[i] == b'=' => i,
                    _ => return Err(ParseError::MissingAssignment { line }),
                };
                let key = &rest[..eq];
                check_name(key, line)?;

                let after = &rest[eq + 1..];
                let (value, remainder) = match after.find('\n') {
                    Some(i) => {
                        line += 1;
                        (&after[..i], &after[i + 1..])
                    }
                    // Final line without a terminator.
                    None => (after, ""),
                };
                let value = value.strip_suffix('\r').unwrap_or(value);

                tracing::trace!(line, key, "entry");
                nodes.push(Node::key(key));
                nodes.push(Node::value(value));
                rest = remainder;
            }
        }

        Ok(Self { nodes })
    }

    /// Read and parse a document from disk.
    pub fn from_file(path: impl AsRef<Path>) -> IniResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(&content)?)
    }

    /// Build a document directly from nodes.
    ///
    /// Returns `None` if the sequence breaks the key/value pairing.
    pub fn from_nodes(nodes: Vec<Node>) -> Option<Self> {
        let doc = Self { nodes };
        doc.is_well_formed().then_some(doc)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every `Key` is immediately followed by a `Value`, and every `Value`
    /// is immediately preceded by a `Key`.
    pub fn is_well_formed(&self) -> bool {
        self.nodes.iter().enumerate().all(|(i, node)| match node.kind {
            NodeKind::Section => true,
            NodeKind::Key => self
                .nodes
                .get(i + 1)
                .is_some_and(|n| n.kind == NodeKind::Value),
            NodeKind::Value => i > 0 && self.nodes[i - 1].kind == NodeKind::Key,
        })
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut Vec<Node> {
        &mut self.nodes
    }
}

impl FromStr for Document {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Canonical form: one `[name]` or `key=value` per line.
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            match node.kind {
                NodeKind::Section => writeln!(f, "[{}]", node.text)?,
                NodeKind::Key => write!(f, "{}=", node.text)?,
                NodeKind::Value => writeln!(f, "{}", node.text)?,
            }
        }
        Ok(())
    }
}

/// Names become path segments, so they must be non-empty and slash-free.
fn check_name(name: &str, line: usize) -> Result<(), ParseError> {
    if name.is_empty() {
        return Err(ParseError::EmptyName { line });
    }
    if name.contains('/') {
        return Err(ParseError::SeparatorInName { line });
    }
    Ok(())
}

fn count_lines(s: &str) -> usize {
    s.bytes().filter(|&b| b == b'\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sections_and_entries() {
        let doc = Document::parse("[a]\nx=1\ny=2\n[b]\nz=3\n").unwrap();
        assert_eq!(
            doc.nodes(),
            &[
                Node::section("a"),
                Node::key("x"),
                Node::value("1"),
                Node::key("y"),
                Node::value("2"),
                Node::section("b"),
                Node::key("z"),
                Node::value("3"),
            ]
        );
    }

    #[test]
    fn test_parse_sectionless_prefix() {
        let doc = Document::parse("name=demo\n\n[a]\nx=1\n").unwrap();
        assert_eq!(doc.nodes()[0], Node::key("name"));
        assert_eq!(doc.nodes()[1], Node::value("demo"));
        assert_eq!(doc.nodes()[2], Node::section("a"));
    }

    #[test]
    fn test_parse_final_line_without_newline() {
        let doc = Document::parse("[a]\nx=last").unwrap();
        assert_eq!(doc.nodes()[2], Node::value("last"));
    }

    #[test]
    fn test_parse_value_keeps_inner_equals_and_spaces() {
        let doc = Document::parse("url = a=b \n").unwrap();
        assert_eq!(doc.nodes()[0], Node::key("url "));
        assert_eq!(doc.nodes()[1], Node::value(" a=b "));
    }

    #[test]
    fn test_parse_crlf() {
        let doc = Document::parse("[a]\r\nx=1\r\n").unwrap();
        assert_eq!(doc.nodes()[2], Node::value("1"));
    }

    #[test]
    fn test_parse_empty_value() {
        let doc = Document::parse("x=\ny=2\n").unwrap();
        assert_eq!(doc.nodes()[1], Node::value(""));
        assert_eq!(doc.len(), 4);
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(Document::parse("").unwrap().is_empty());
        assert!(Document::parse(" \n\t\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_unterminated_section() {
        assert_eq!(
            Document::parse("x=1\n[abc\ny=2\n"),
            Err(ParseError::UnterminatedSection { line: 2 })
        );
        assert_eq!(
            Document::parse("[abc"),
            Err(ParseError::UnterminatedSection { line: 1 })
        );
    }

    #[test]
    fn test_parse_missing_assignment() {
        assert_eq!(
            Document::parse("[a]\n\njunk\nx=1\n"),
            Err(ParseError::MissingAssignment { line: 3 })
        );
    }

    #[test]
    fn test_parse_empty_names() {
        assert_eq!(
            Document::parse("[]\n"),
            Err(ParseError::EmptyName { line: 1 })
        );
        assert_eq!(
            Document::parse("[a]\n=1\n"),
            Err(ParseError::EmptyName { line: 2 })
        );
    }

    #[test]
    fn test_parse_rejects_separator_in_names() {
        assert_eq!(
            Document::parse("[a/b]\n"),
            Err(ParseError::SeparatorInName { line: 1 })
        );
        assert_eq!(
            Document::parse("[a]\nx=1\nsub/key=2\n"),
            Err(ParseError::SeparatorInName { line: 3 })
        );
        // Slashes in values are just text.
        let doc = Document::parse("path=/usr/lib\n").unwrap();
        assert_eq!(doc.nodes()[1], Node::value("/usr/lib"));
    }

    #[test]
    fn test_display_round_trip() {
        let text = "top=1\n  [a]\nx = 1\ny=\n\n[b]\r\nz=3";
        let doc = Document::parse(text).unwrap();
        let canonical = doc.to_string();
        assert_eq!(canonical, "top=1\n[a]\nx = 1\ny=\n[b]\nz=3\n");
        assert_eq!(Document::parse(&canonical).unwrap(), doc);
    }

    #[test]
    fn test_is_well_formed() {
        assert!(Document::parse("[a]\nx=1\n").unwrap().is_well_formed());
        assert!(Document::from_nodes(vec![Node::key("x"), Node::section("a")]).is_none());
        assert!(Document::from_nodes(vec![Node::value("x")]).is_none());
        assert!(Document::from_nodes(vec![Node::section("a")]).is_some());
    }

    #[test]
    fn test_from_str() {
        let doc: Document = "[a]".parse().unwrap();
        assert_eq!(doc.nodes(), &[Node::section("a")]);
    }

    #[test]
    fn test_node_serializes_lowercase_kind() {
        let json = serde_json::to_string(&Node::section("a")).unwrap();
        assert_eq!(json, r#"{"kind":"section","text":"a"}"#);
    }
}
