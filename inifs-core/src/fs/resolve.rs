//! Path resolution and read-side operations.

use super::path_fs::{AccessMode, Attr, DirEntry, EntryKind};
use crate::document::Document;
use crate::error::{IniError, IniResult};

/// Shape of a filesystem path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathShape<'p> {
    /// `/`
    Root,
    /// `/name`: a section or an unnamed-section key.
    Top(&'p str),
    /// `/section/key`
    Nested { section: &'p str, key: &'p str },
    /// More than one interior separator; nothing lives there.
    Deep,
}

impl<'p> PathShape<'p> {
    pub fn of(path: &'p str) -> Self {
        let rel = path.strip_prefix('/').unwrap_or(path);
        if rel.is_empty() {
            return Self::Root;
        }
        match rel.split_once('/') {
            None => Self::Top(rel),
            Some((_, key)) if key.contains('/') => Self::Deep,
            Some((section, key)) => Self::Nested { section, key },
        }
    }
}

/// Value text of the key at `path`.
pub fn lookup_value<'d>(doc: &'d Document, path: &str) -> Option<&'d str> {
    let entry = match PathShape::of(path) {
        PathShape::Nested { section, key } if !section.is_empty() => {
            doc.find_entry(section, key)?
        }
        PathShape::Top(name) if !doc.has_section(name) => doc.find_entry("", name)?,
        _ => return None,
    };
    Some(entry.value)
}

pub fn getattr(doc: &Document, path: &str) -> IniResult<Attr> {
    match PathShape::of(path) {
        PathShape::Root => Ok(Attr::directory()),
        PathShape::Top(name) if doc.has_section(name) => Ok(Attr::directory()),
        _ => lookup_value(doc, path)
            .map(|value| Attr::file(value.len()))
            .ok_or_else(|| IniError::NotFound(path.to_string())),
    }
}

pub fn readdir(doc: &Document, path: &str) -> IniResult<Vec<DirEntry>> {
    let files = |section: &str| -> Vec<DirEntry> {
        doc.entries(section)
            .into_iter()
            .flatten()
            .map(|entry| DirEntry {
                name: entry.key.to_string(),
                kind: EntryKind::File,
            })
            .collect()
    };

    match PathShape::of(path) {
        PathShape::Root => {
            let mut listing: Vec<DirEntry> = doc
                .sections()
                .map(|name| DirEntry {
                    name: name.to_string(),
                    kind: EntryKind::Directory,
                })
                .collect();
            listing.extend(files(""));
            Ok(listing)
        }
        PathShape::Top(name) if doc.has_section(name) => Ok(files(name)),
        PathShape::Top(_) => Err(IniError::NotADirectory(path.to_string())),
        _ if lookup_value(doc, path).is_some() => Err(IniError::NotADirectory(path.to_string())),
        _ => Err(IniError::NotFound(path.to_string())),
    }
}

pub fn open(doc: &Document, path: &str, mode: AccessMode) -> IniResult<()> {
    if lookup_value(doc, path).is_none() {
        return Err(IniError::NotFound(path.to_string()));
    }
    if mode != AccessMode::ReadOnly {
        return Err(IniError::PermissionDenied(path.to_string()));
    }
    Ok(())
}

pub fn read(doc: &Document, path: &str, offset: u64, size: usize) -> IniResult<Vec<u8>> {
    let value = lookup_value(doc, path).ok_or_else(|| IniError::NotFound(path.to_string()))?;
    Ok(read_range(value.as_bytes(), offset, size).to_vec())
}

/// Clamp `offset..offset + size` to `data`. Past-the-end reads are empty.
pub fn read_range(data: &[u8], offset: u64, size: usize) -> &[u8] {
    let start = usize::try_from(offset).map_or(data.len(), |o| o.min(data.len()));
    let end = start.saturating_add(size).min(data.len());
    &data[start..end]
}
