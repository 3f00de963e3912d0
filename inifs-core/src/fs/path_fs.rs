//! PathFS trait - path-based filesystem interface over a document.

use crate::error::IniResult;

/// What a path resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// Attributes of a resolved path. Directories report size 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attr {
    pub kind: EntryKind,
    pub size: u64,
}

impl Attr {
    pub fn directory() -> Self {
        Self {
            kind: EntryKind::Directory,
            size: 0,
        }
    }

    pub fn file(size: usize) -> Self {
        Self {
            kind: EntryKind::File,
            size: size as u64,
        }
    }
}

/// One name in a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

/// Requested access mode for `open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

/// Rename behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenameFlags {
    /// Replace an empty destination.
    #[default]
    Replace,
    /// Fail if the destination exists.
    NoReplace,
    /// Swap source and destination.
    Exchange,
}

/// Filesystem operations addressed by absolute path (`/`, `/name`,
/// `/section/key`).
pub trait PathFS: Send + Sync {
    /// Kind and size of the entry at `path`.
    fn getattr(&self, path: &str) -> IniResult<Attr>;

    /// Directory listing, without `.` and `..`.
    fn readdir(&self, path: &str) -> IniResult<Vec<DirEntry>>;

    /// Check that `path` is a key that may be opened with `mode`.
    fn open(&self, path: &str, mode: AccessMode) -> IniResult<()>;

    /// Up to `size` bytes of the value at `path`, starting at `offset`.
    fn read(&self, path: &str, offset: u64, size: usize) -> IniResult<Vec<u8>>;

    /// Create an empty section.
    fn mkdir(&self, path: &str) -> IniResult<()>;

    /// Remove an empty section.
    fn rmdir(&self, path: &str) -> IniResult<()>;

    /// Rename or exchange top-level sections.
    fn rename(&self, from: &str, to: &str, flags: RenameFlags) -> IniResult<()>;
}
