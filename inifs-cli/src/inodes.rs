//! Inode numbers for document paths.
//!
//! The kernel addresses entries by inode, the document by path. Inodes are
//! handed out on first lookup and follow their entry through renames.

use std::collections::HashMap;

pub const ROOT_INO: u64 = 1;

pub struct InodeTable {
    paths: HashMap<u64, String>,
    inos: HashMap<String, u64>,
    next: u64,
}

impl Default for InodeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl InodeTable {
    pub fn new() -> Self {
        let mut table = Self {
            paths: HashMap::new(),
            inos: HashMap::new(),
            next: ROOT_INO + 1,
        };
        table.paths.insert(ROOT_INO, "/".to_string());
        table.inos.insert("/".to_string(), ROOT_INO);
        table
    }

    pub fn path(&self, ino: u64) -> Option<&str> {
        self.paths.get(&ino).map(String::as_str)
    }

    /// Inode for `path`, allocating one if needed.
    pub fn intern(&mut self, path: &str) -> u64 {
        if let Some(&ino) = self.inos.get(path) {
            return ino;
        }
        let ino = self.next;
        self.next += 1;
        self.paths.insert(ino, path.to_string());
        self.inos.insert(path.to_string(), ino);
        ino
    }

    /// Drop `path` and everything below it.
    pub fn forget(&mut self, path: &str) {
        if path == "/" {
            return;
        }
        let doomed: Vec<u64> = self
            .paths
            .iter()
            .filter(|(_, p)| relocate(p, path, path).is_some())
            .map(|(&ino, _)| ino)
            .collect();
        for ino in doomed {
            if let Some(p) = self.paths.remove(&ino) {
                self.inos.remove(&p);
            }
        }
    }

    /// Move the subtree at `from` to `to`, replacing whatever was at `to`.
    pub fn rename(&mut self, from: &str, to: &str) {
        if from == to {
            return;
        }
        self.forget(to);
        let moves = self.moves(from, to);
        self.apply(moves);
    }

    /// Swap the subtrees at `a` and `b`.
    pub fn exchange(&mut self, a: &str, b: &str) {
        let mut moves = self.moves(a, b);
        moves.extend(self.moves(b, a));
        self.apply(moves);
    }

    fn moves(&self, from: &str, to: &str) -> Vec<(u64, String)> {
        self.paths
            .iter()
            .filter_map(|(&ino, p)| relocate(p, from, to).map(|new| (ino, new)))
            .collect()
    }

    fn apply(&mut self, moves: Vec<(u64, String)>) {
        for (ino, _) in &moves {
            if let Some(old) = self.paths.get(ino) {
                self.inos.remove(old);
            }
        }
        for (ino, new) in moves {
            self.inos.insert(new.clone(), ino);
            self.paths.insert(ino, new);
        }
    }
}

/// `path` rewritten from under `from` to under `to`, if it is `from` or
/// one of its descendants.
fn relocate(path: &str, from: &str, to: &str) -> Option<String> {
    let rest = path.strip_prefix(from)?;
    (rest.is_empty() || rest.starts_with('/')).then(|| format!("{to}{rest}"))
}

/// Join a directory path and an entry name.
pub fn child_path(parent: &str, name: &str) -> String {
    if parent == "/" {
        format!("/{name}")
    } else {
        format!("{parent}/{name}")
    }
}

/// Directory containing `path`.
pub fn parent_path(path: &str) -> &str {
    match path.rsplit_once('/') {
        Some(("", _)) | None => "/",
        Some((parent, _)) => parent,
    }
}
