//! Structural edits on the node sequence.
//!
//! Only top-level directories (sections) can be created, removed or
//! renamed. Every edit leaves the key/value pairing intact.

use super::path_fs::RenameFlags;
use super::resolve::PathShape;
use crate::document::{Document, Node};
use crate::error::{IniError, IniResult};

/// Characters a section name may not contain.
const RESERVED: &[char] = &['/', '[', ']', '\n', '\r'];

/// Append an empty section named after `path`.
pub fn mkdir(doc: &mut Document, path: &str) -> IniResult<()> {
    let name = match PathShape::of(path) {
        PathShape::Top(name) => name,
        _ => return Err(IniError::InvalidArgument(path.to_string())),
    };
    validate_name(name, path)?;
    if doc.has_section(name) || doc.find_entry("", name).is_some() {
        return Err(IniError::AlreadyExists(path.to_string()));
    }

    doc.nodes_mut().push(Node::section(name));
    debug_assert!(doc.is_well_formed());
    Ok(())
}

/// Erase the first section named after `path` if it has no entries.
pub fn rmdir(doc: &mut Document, path: &str) -> IniResult<()> {
    let name = match PathShape::of(path) {
        PathShape::Top(name) => name,
        PathShape::Root => return Err(IniError::InvalidArgument(path.to_string())),
        _ => return Err(IniError::Unsupported(path.to_string())),
    };
    let index = doc
        .find_section(name)
        .ok_or_else(|| IniError::NotADirectory(path.to_string()))?;
    if !doc.section_is_empty(index) {
        return Err(IniError::NotEmpty(path.to_string()));
    }

    doc.nodes_mut().remove(index);
    debug_assert!(doc.is_well_formed());
    Ok(())
}

/// Rename or exchange two top-level sections.
pub fn rename(doc: &mut Document, from: &str, to: &str, flags: RenameFlags) -> IniResult<()> {
    let (PathShape::Top(src), PathShape::Top(dst)) = (PathShape::of(from), PathShape::of(to))
    else {
        return Err(IniError::Unsupported(format!("{from} -> {to}")));
    };
    validate_name(dst, to)?;

    let src_index = doc.find_section(src);
    let dst_index = doc.find_section(dst);
    // A section shadows an unnamed-section key of the same name.
    let dst_is_key = dst_index.is_none() && doc.find_entry("", dst).is_some();

    if flags == RenameFlags::Exchange {
        let src_index = src_index.ok_or_else(|| IniError::AlreadyExists(from.to_string()))?;
        if dst_is_key {
            return Err(IniError::NotADirectory(to.to_string()));
        }
        let dst_index = dst_index.ok_or_else(|| IniError::NotFound(to.to_string()))?;
        let nodes = doc.nodes_mut();
        nodes[src_index].text = dst.to_string();
        nodes[dst_index].text = src.to_string();
        debug_assert!(doc.is_well_formed());
        return Ok(());
    }

    if flags == RenameFlags::NoReplace && (dst_index.is_some() || dst_is_key) {
        return Err(IniError::AlreadyExists(to.to_string()));
    }

    // A missing source is reported as an existing destination.
    let src_index = src_index.ok_or_else(|| IniError::AlreadyExists(from.to_string()))?;
    if src == dst {
        return Ok(());
    }
    if dst_is_key {
        return Err(IniError::NotADirectory(to.to_string()));
    }

    let src_index = match dst_index {
        Some(dst_index) if !doc.section_is_empty(dst_index) => {
            return Err(IniError::NotEmpty(to.to_string()));
        }
        Some(dst_index) => {
            doc.nodes_mut().remove(dst_index);
            if dst_index < src_index {
                src_index - 1
            } else {
                src_index
            }
        }
        None => src_index,
    };

    doc.nodes_mut()[src_index].text = dst.to_string();
    debug_assert!(doc.is_well_formed());
    Ok(())
}

fn validate_name(name: &str, path: &str) -> IniResult<()> {
    if name.is_empty() || name.contains(RESERVED) {
        return Err(IniError::InvalidArgument(path.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document::parse("top=0\n[a]\nx=1\ny=2\n[b]\nz=3\n").unwrap()
    }

    fn sections(doc: &Document) -> Vec<&str> {
        doc.sections().collect()
    }

    #[test]
    fn test_mkdir_appends_section() {
        let mut doc = sample();
        mkdir(&mut doc, "/c").unwrap();
        assert_eq!(doc.nodes().last(), Some(&Node::section("c")));
        assert_eq!(doc.entries("c").unwrap().count(), 0);
    }

    #[test]
    fn test_mkdir_rejects_bad_names() {
        let mut doc = sample();
        for path in ["/", "/a/b", "/[x", "/x]", "/a\nb"] {
            assert!(
                matches!(mkdir(&mut doc, path), Err(IniError::InvalidArgument(_))),
                "{path:?}"
            );
        }
        assert_eq!(doc, sample());
    }

    #[test]
    fn test_mkdir_existing() {
        let mut doc = sample();
        assert!(matches!(mkdir(&mut doc, "/a"), Err(IniError::AlreadyExists(_))));
        assert!(matches!(mkdir(&mut doc, "/top"), Err(IniError::AlreadyExists(_))));
    }

    #[test]
    fn test_mkdir_then_rmdir_restores() {
        let mut doc = sample();
        mkdir(&mut doc, "/c").unwrap();
        rmdir(&mut doc, "/c").unwrap();
        assert_eq!(doc, sample());
    }

    #[test]
    fn test_rmdir() {
        let mut doc = Document::parse("[a]\nx=1\n[e]\n[b]\n").unwrap();
        assert!(matches!(rmdir(&mut doc, "/a"), Err(IniError::NotEmpty(_))));
        rmdir(&mut doc, "/e").unwrap();
        rmdir(&mut doc, "/b").unwrap();
        assert_eq!(sections(&doc), ["a"]);
    }

    #[test]
    fn test_rmdir_errors() {
        let mut doc = sample();
        assert!(matches!(rmdir(&mut doc, "/"), Err(IniError::InvalidArgument(_))));
        assert!(matches!(rmdir(&mut doc, "/a/x"), Err(IniError::Unsupported(_))));
        assert!(matches!(rmdir(&mut doc, "/nope"), Err(IniError::NotADirectory(_))));
        assert!(matches!(rmdir(&mut doc, "/top"), Err(IniError::NotADirectory(_))));
    }

    #[test]
    fn test_rename_to_new_name() {
        let mut doc = sample();
        rename(&mut doc, "/a", "/c", RenameFlags::Replace).unwrap();
        assert_eq!(sections(&doc), ["c", "b"]);
        assert_eq!(doc.find_entry("c", "x").map(|e| e.value), Some("1"));
    }

    #[test]
    fn test_rename_no_replace() {
        let mut doc = sample();
        rename(&mut doc, "/a", "/c", RenameFlags::NoReplace).unwrap();
        assert!(matches!(
            rename(&mut doc, "/c", "/b", RenameFlags::NoReplace),
            Err(IniError::AlreadyExists(_))
        ));
        assert_eq!(sections(&doc), ["c", "b"]);
    }

    #[test]
    fn test_rename_over_empty_destination() {
        let mut doc = Document::parse("[e]\n[a]\nx=1\n").unwrap();
        rename(&mut doc, "/a", "/e", RenameFlags::Replace).unwrap();
        assert_eq!(doc.to_string(), "[e]\nx=1\n");

        let mut doc = Document::parse("[a]\nx=1\n[e]\n").unwrap();
        rename(&mut doc, "/a", "/e", RenameFlags::Replace).unwrap();
        assert_eq!(doc.to_string(), "[e]\nx=1\n");
    }

    #[test]
    fn test_rename_over_non_empty_destination() {
        let mut doc = sample();
        assert!(matches!(
            rename(&mut doc, "/a", "/b", RenameFlags::Replace),
            Err(IniError::NotEmpty(_))
        ));
        assert_eq!(doc, sample());
    }

    #[test]
    fn test_rename_missing_source() {
        let mut doc = sample();
        assert!(matches!(
            rename(&mut doc, "/nope", "/c", RenameFlags::Replace),
            Err(IniError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_rename_onto_itself() {
        let mut doc = sample();
        rename(&mut doc, "/a", "/a", RenameFlags::Replace).unwrap();
        assert_eq!(doc, sample());
    }

    #[test]
    fn test_rename_nested_unsupported() {
        let mut doc = sample();
        assert!(matches!(
            rename(&mut doc, "/a/x", "/a/w", RenameFlags::Replace),
            Err(IniError::Unsupported(_))
        ));
        assert!(matches!(
            rename(&mut doc, "/a", "/b/a", RenameFlags::Replace),
            Err(IniError::Unsupported(_))
        ));
    }

    #[test]
    fn test_rename_invalid_destination() {
        let mut doc = sample();
        assert!(matches!(
            rename(&mut doc, "/a", "/[a]", RenameFlags::Replace),
            Err(IniError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_rename_onto_unnamed_section_key() {
        let original = Document::parse("top=secret\n[a]\nx=1\n").unwrap();
        let mut doc = original.clone();
        assert!(matches!(
            rename(&mut doc, "/a", "/top", RenameFlags::NoReplace),
            Err(IniError::AlreadyExists(_))
        ));
        assert!(matches!(
            rename(&mut doc, "/a", "/top", RenameFlags::Replace),
            Err(IniError::NotADirectory(_))
        ));
        assert!(matches!(
            rename(&mut doc, "/a", "/top", RenameFlags::Exchange),
            Err(IniError::NotADirectory(_))
        ));
        assert_eq!(doc, original);
        assert_eq!(doc.find_entry("", "top").map(|e| e.value), Some("secret"));
    }

    #[test]
    fn test_exchange() {
        let mut doc = sample();
        rename(&mut doc, "/a", "/b", RenameFlags::Exchange).unwrap();
        assert_eq!(sections(&doc), ["b", "a"]);
        assert_eq!(doc.find_entry("b", "x").map(|e| e.value), Some("1"));
        assert_eq!(doc.find_entry("a", "z").map(|e| e.value), Some("3"));
        assert_eq!(doc.len(), sample().len());

        rename(&mut doc, "/a", "/b", RenameFlags::Exchange).unwrap();
        assert_eq!(doc, sample());
    }

    #[test]
    fn test_exchange_missing_endpoint() {
        let mut doc = sample();
        assert!(matches!(
            rename(&mut doc, "/a", "/c", RenameFlags::Exchange),
            Err(IniError::NotFound(_))
        ));
        assert!(matches!(
            rename(&mut doc, "/c", "/a", RenameFlags::Exchange),
            Err(IniError::AlreadyExists(_))
        ));
    }
}
