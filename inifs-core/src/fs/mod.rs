//! Filesystem projection of an INI document.
//!
//! - `PathFS`: path-based operations (getattr, readdir, open, read, mkdir,
//!   rmdir, rename)
//! - `resolve`: read-side path resolution over a `Document`
//! - `mutate`: section create/remove/rename on a `Document`
//! - `SharedDocument`: lock-protected `PathFS` implementation

pub mod mutate;
mod path_fs;
pub mod resolve;
mod shared;

pub use path_fs::{AccessMode, Attr, DirEntry, EntryKind, PathFS, RenameFlags};
pub use resolve::PathShape;
pub use shared::SharedDocument;
