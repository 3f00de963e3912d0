//! Lazy traversal over a document's node sequence.
//!
//! Both iterators borrow the document, so the borrow checker keeps them
//! from outliving a mutation. Each call builds a fresh iterator.

use std::iter::FusedIterator;
use std::ptr;

use crate::document::{Document, Node, NodeKind};

/// Section names in document order.
#[derive(Debug, Clone)]
pub struct Sections<'a> {
    nodes: &'a [Node],
    pos: usize,
}

impl Sections<'_> {
    /// Index of the next node to inspect, or `None` once exhausted.
    pub fn position(&self) -> Option<usize> {
        (self.pos < self.nodes.len()).then_some(self.pos)
    }
}

impl<'a> Iterator for Sections<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.nodes.get(self.pos) {
            self.pos += 1;
            if node.is_section() {
                return Some(&node.text);
            }
        }
        None
    }
}

impl FusedIterator for Sections<'_> {}

/// Positions are equal when they walk the same document and sit at the
/// same place; all exhausted iterators over one document compare equal.
impl PartialEq for Sections<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.nodes, other.nodes) && self.position() == other.position()
    }
}

/// One key/value pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

/// Key/value pairs of one section, in document order.
#[derive(Debug, Clone)]
pub struct Entries<'a> {
    nodes: &'a [Node],
    pos: usize,
}

impl Entries<'_> {
    /// Index of the next `Key` node, or `None` once exhausted.
    pub fn position(&self) -> Option<usize> {
        match self.nodes.get(self.pos) {
            Some(node) if node.kind == NodeKind::Key => Some(self.pos),
            _ => None,
        }
    }
}

impl<'a> Iterator for Entries<'a> {
    type Item = Entry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match (self.nodes.get(self.pos), self.nodes.get(self.pos + 1)) {
            (Some(key), Some(value))
                if key.kind == NodeKind::Key && value.kind == NodeKind::Value =>
            {
                self.pos += 2;
                Some(Entry {
                    key: &key.text,
                    value: &value.text,
                })
            }
            _ => {
                self.pos = self.nodes.len();
                None
            }
        }
    }
}

impl FusedIterator for Entries<'_> {}

impl PartialEq for Entries<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.nodes, other.nodes) && self.position() == other.position()
    }
}

impl Document {
    /// Iterate over section names.
    pub fn sections(&self) -> Sections<'_> {
        Sections {
            nodes: self.nodes(),
            pos: 0,
        }
    }

    /// Iterate over the entries of `section`.
    ///
    /// The empty name addresses the entries before the first section header,
    /// which is always `Some` (possibly yielding nothing). Named sections
    /// resolve to the first matching header; `None` if there is none.
    pub fn entries(&self, section: &str) -> Option<Entries<'_>> {
        let pos = if section.is_empty() {
            0
        } else {
            self.find_section(section)? + 1
        };
        Some(Entries {
            nodes: self.nodes(),
            pos,
        })
    }

    /// Index of the first `Section` node named `name`.
    pub fn find_section(&self, name: &str) -> Option<usize> {
        self.nodes()
            .iter()
            .position(|n| n.is_section() && n.text == name)
    }

    pub fn has_section(&self, name: &str) -> bool {
        !name.is_empty() && self.find_section(name).is_some()
    }

    /// Look up `key` inside `section` (empty for the unnamed section).
    pub fn find_entry(&self, section: &str, key: &str) -> Option<Entry<'_>> {
        self.entries(section)?.find(|entry| entry.key == key)
    }

    /// A section with no entries: the node after its header is another
    /// header, or there is none.
    pub(crate) fn section_is_empty(&self, index: usize) -> bool {
        self.nodes().get(index + 1).map_or(true, Node::is_section)
    }
}
