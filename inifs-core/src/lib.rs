//! INI Filesystem Core
//!
//! This crate projects an INI document onto a directory tree:
//! - Sections become directories, keys become read-only files
//! - Keys before the first section appear at the root
//! - Directories can be created, removed (when empty) and renamed
//!
//! # Architecture
//!
//! - `Document`: flat node sequence plus parser and canonical serializer
//! - `Sections` / `Entries`: lazy traversal over the node sequence
//! - `PathFS` trait: path-based filesystem operations
//! - `SharedDocument`: thread-safe `PathFS` over one document

pub mod document;
pub mod error;
pub mod fs;
pub mod traverse;

pub use document::{Document, Node, NodeKind};
pub use error::{IniError, IniResult, ParseError};
pub use fs::{AccessMode, Attr, DirEntry, EntryKind, PathFS, RenameFlags, SharedDocument};
pub use traverse::{Entries, Entry, Sections};
