//! FUSE adapter: translates kernel requests into `PathFS` calls.

use std::ffi::OsStr;
use std::time::{Duration, SystemTime};

use fuser::{
    FileAttr, FileType, Filesystem, ReplyAttr, ReplyData, ReplyDirectory, ReplyEmpty, ReplyEntry,
    ReplyOpen, Request,
};
use libc::c_int;

use inifs_core::{AccessMode, Attr, EntryKind, IniError, PathFS, RenameFlags};

use crate::inodes::{child_path, parent_path, InodeTable};

/// How long the kernel may cache attributes and entries.
const TTL: Duration = Duration::from_secs(1);

// linux/fs.h
const RENAME_NOREPLACE: u32 = 1 << 0;
const RENAME_EXCHANGE: u32 = 1 << 1;

/// Errno reported to the kernel for a failed operation.
pub fn errno(err: &IniError) -> c_int {
    match err {
        IniError::NotFound(_) => libc::ENOENT,
        IniError::NotADirectory(_) => libc::ENOTDIR,
        IniError::NotEmpty(_) => libc::ENOTEMPTY,
        IniError::AlreadyExists(_) => libc::EEXIST,
        IniError::InvalidArgument(_) => libc::EINVAL,
        IniError::PermissionDenied(_) => libc::EACCES,
        IniError::Unsupported(_) => libc::ENOTSUP,
        IniError::Parse(_) | IniError::LockPoisoned | IniError::Io(_) => libc::EIO,
    }
}

/// Decode `renameat2` flags.
pub fn rename_flags(flags: u32) -> Result<RenameFlags, c_int> {
    match flags {
        0 => Ok(RenameFlags::Replace),
        RENAME_NOREPLACE => Ok(RenameFlags::NoReplace),
        RENAME_EXCHANGE => Ok(RenameFlags::Exchange),
        _ => Err(libc::EINVAL),
    }
}

/// Decode the access mode bits of `open` flags.
pub fn access_mode(flags: i32) -> AccessMode {
    match flags & libc::O_ACCMODE {
        libc::O_RDONLY => AccessMode::ReadOnly,
        libc::O_WRONLY => AccessMode::WriteOnly,
        _ => AccessMode::ReadWrite,
    }
}

fn file_type(kind: EntryKind) -> FileType {
    match kind {
        EntryKind::Directory => FileType::Directory,
        EntryKind::File => FileType::RegularFile,
    }
}

/// Mounted view of a `PathFS`.
pub struct FuseAdapter<F: PathFS> {
    fs: F,
    inodes: InodeTable,
    mounted_at: SystemTime,
}

impl<F: PathFS> FuseAdapter<F> {
    pub fn new(fs: F) -> Self {
        Self {
            fs,
            inodes: InodeTable::new(),
            mounted_at: SystemTime::now(),
        }
    }

    fn file_attr(&self, req: &Request<'_>, ino: u64, attr: Attr) -> FileAttr {
        let (perm, nlink) = match attr.kind {
            EntryKind::Directory => (0o755, 2),
            EntryKind::File => (0o444, 1),
        };
        FileAttr {
            ino,
            size: attr.size,
            blocks: attr.size.div_ceil(512),
            atime: self.mounted_at,
            mtime: self.mounted_at,
            ctime: self.mounted_at,
            crtime: self.mounted_at,
            kind: file_type(attr.kind),
            perm,
            nlink,
            uid: req.uid(),
            gid: req.gid(),
            rdev: 0,
            blksize: 512,
            flags: 0,
        }
    }

    fn path(&self, ino: u64) -> Result<String, c_int> {
        self.inodes
            .path(ino)
            .map(str::to_string)
            .ok_or(libc::ENOENT)
    }

    fn entry_path(&self, parent: u64, name: &OsStr) -> Result<String, c_int> {
        let name = name.to_str().ok_or(libc::ENOENT)?;
        Ok(child_path(&self.path(parent)?, name))
    }

    /// Resolve `path`, assign it an inode and reply with its attributes.
    fn reply_entry(&mut self, req: &Request<'_>, path: &str, reply: ReplyEntry) {
        match self.fs.getattr(path) {
            Ok(attr) => {
                let ino = self.inodes.intern(path);
                reply.entry(&TTL, &self.file_attr(req, ino, attr), 0);
            }
            Err(e) => reply.error(errno(&e)),
        }
    }
}

impl<F: PathFS> Filesystem for FuseAdapter<F> {
    fn lookup(&mut self, req: &Request<'_>, parent: u64, name: &OsStr, reply: ReplyEntry) {
        match self.entry_path(parent, name) {
            Ok(path) => self.reply_entry(req, &path, reply),
            Err(code) => reply.error(code),
        }
    }

    fn getattr(&mut self, req: &Request<'_>, ino: u64, _fh: Option<u64>, reply: ReplyAttr) {
        let path = match self.path(ino) {
            Ok(path) => path,
            Err(code) => return reply.error(code),
        };
        match self.fs.getattr(&path) {
            Ok(attr) => reply.attr(&TTL, &self.file_attr(req, ino, attr)),
            Err(e) => reply.error(errno(&e)),
        }
    }

    fn readdir(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        _fh: u64,
        offset: i64,
        mut reply: ReplyDirectory,
    ) {
        let path = match self.path(ino) {
            Ok(path) => path,
            Err(code) => return reply.error(code),
        };
        let listing = match self.fs.readdir(&path) {
            Ok(listing) => listing,
            Err(e) => return reply.error(errno(&e)),
        };

        let parent_ino = self.inodes.intern(parent_path(&path));
        let mut entries = vec![
            (ino, FileType::Directory, ".".to_string()),
            (parent_ino, FileType::Directory, "..".to_string()),
        ];
        for entry in listing {
            let child_ino = self.inodes.intern(&child_path(&path, &entry.name));
            entries.push((child_ino, file_type(entry.kind), entry.name));
        }

        let skip = usize::try_from(offset).unwrap_or(0);
        for (i, (child_ino, kind, name)) in entries.into_iter().enumerate().skip(skip) {
            // The offset handed back is where the next call resumes.
            if reply.add(child_ino, (i + 1) as i64, kind, name) {
                break;
            }
        }
        reply.ok();
    }

    fn open(&mut self, _req: &Request<'_>, ino: u64, flags: i32, reply: ReplyOpen) {
        let path = match self.path(ino) {
            Ok(path) => path,
            Err(code) => return reply.error(code),
        };
        match self.fs.open(&path, access_mode(flags)) {
            Ok(()) => reply.opened(0, 0),
            Err(e) => reply.error(errno(&e)),
        }
    }

    fn read(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        _fh: u64,
        offset: i64,
        size: u32,
        _flags: i32,
        _lock_owner: Option<u64>,
        reply: ReplyData,
    ) {
        let path = match self.path(ino) {
            Ok(path) => path,
            Err(code) => return reply.error(code),
        };
        let Ok(offset) = u64::try_from(offset) else {
            return reply.error(libc::EINVAL);
        };
        match self.fs.read(&path, offset, size as usize) {
            Ok(data) => reply.data(&data),
            Err(e) => reply.error(errno(&e)),
        }
    }

    fn mkdir(
        &mut self,
        req: &Request<'_>,
        parent: u64,
        name: &OsStr,
        _mode: u32,
        _umask: u32,
        reply: ReplyEntry,
    ) {
        let path = match self.entry_path(parent, name) {
            Ok(path) => path,
            Err(code) => return reply.error(code),
        };
        match self.fs.mkdir(&path) {
            Ok(()) => self.reply_entry(req, &path, reply),
            Err(e) => reply.error(errno(&e)),
        }
    }

    fn rmdir(&mut self, _req: &Request<'_>, parent: u64, name: &OsStr, reply: ReplyEmpty) {
        let path = match self.entry_path(parent, name) {
            Ok(path) => path,
            Err(code) => return reply.error(code),
        };
        match self.fs.rmdir(&path) {
            Ok(()) => {
                self.inodes.forget(&path);
                reply.ok();
            }
            Err(e) => reply.error(errno(&e)),
        }
    }

    fn rename(
        &mut self,
        _req: &Request<'_>,
        parent: u64,
        name: &OsStr,
        newparent: u64,
        newname: &OsStr,
        flags: u32,
        reply: ReplyEmpty,
    ) {
        let paths = self
            .entry_path(parent, name)
            .and_then(|from| Ok((from, self.entry_path(newparent, newname)?)));
        let (from, to) = match paths {
            Ok(paths) => paths,
            Err(code) => return reply.error(code),
        };
        let flags = match rename_flags(flags) {
            Ok(flags) => flags,
            Err(code) => return reply.error(code),
        };

        match self.fs.rename(&from, &to, flags) {
            Ok(()) => {
                if flags == RenameFlags::Exchange {
                    self.inodes.exchange(&from, &to);
                } else {
                    self.inodes.rename(&from, &to);
                }
                reply.ok();
            }
            Err(e) => reply.error(errno(&e)),
        }
    }
}
