//! inifs CLI - Mount an INI document as a directory tree.
//!
//! Usage:
//!   inifs --ini <FILE> <MOUNTPOINT>
//!
//! Examples:
//!   inifs --ini app.ini /mnt/app            # Mount until Ctrl-C
//!   inifs --ini app.ini -t /mnt/app         # Trace every operation
//!   inifs --ini app.ini --check             # Print parsed nodes as JSON
//!
//! Sections appear as directories, keys as read-only files. Keys before the
//! first section sit at the root. `mkdir`, `rmdir` and `mv` on top-level
//! directories edit the in-memory document; nothing is written back.

mod fuse;
mod inodes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use fuser::MountOption;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use inifs_core::{Document, SharedDocument};

use crate::fuse::FuseAdapter;

const EXIT_MOUNT_FAILED: u8 = 1;
const EXIT_USAGE: u8 = 2;
const EXIT_NO_DOCUMENT: u8 = 3;
const EXIT_BAD_DOCUMENT: u8 = 4;

/// INI filesystem
#[derive(Parser, Debug)]
#[command(name = "inifs")]
#[command(about = "Mount an INI document as a filesystem")]
struct Args {
    /// INI document to expose
    #[arg(long, value_name = "PATH")]
    ini: Option<PathBuf>,

    /// Directory to mount the document on (not needed with --check)
    mountpoint: Option<PathBuf>,

    /// Enable operation tracing
    #[arg(short, long)]
    trace: bool,

    /// Parse the document, print its nodes and exit without mounting
    #[arg(long)]
    check: bool,

    /// Let other users access the mount
    #[arg(long)]
    allow_other: bool,

    /// Unmount automatically when the process exits
    #[arg(long)]
    auto_unmount: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.trace);

    if let Err(code) = check_required(&args) {
        return ExitCode::from(code);
    }
    let Some(ini) = args.ini.as_deref() else {
        return ExitCode::from(EXIT_NO_DOCUMENT);
    };

    let doc = match Document::from_file(ini) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Failed to load {}: {}", ini.display(), e);
            return ExitCode::from(EXIT_BAD_DOCUMENT);
        }
    };
    tracing::info!(path = %ini.display(), nodes = doc.len(), "loaded document");

    if args.check {
        return match serde_json::to_string_pretty(doc.nodes()) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let Some(mountpoint) = args.mountpoint.as_deref() else {
        return ExitCode::from(EXIT_USAGE);
    };

    match serve(SharedDocument::new(doc), mountpoint, &args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(EXIT_MOUNT_FAILED)
        }
    }
}

/// Required arguments, checked in order: the document first, then the
/// mountpoint. Returns the exit code to use when one is missing.
fn check_required(args: &Args) -> Result<(), u8> {
    if args.ini.is_none() {
        eprintln!("No INI document given (use --ini <PATH>)");
        return Err(EXIT_NO_DOCUMENT);
    }
    if args.mountpoint.is_none() && !args.check {
        eprintln!("No mountpoint given");
        return Err(EXIT_USAGE);
    }
    Ok(())
}

/// Initialize tracing (respects RUST_LOG env var).
fn init_tracing(trace: bool) {
    let default = if trace {
        "inifs=debug,inifs_core=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn mount_options(args: &Args) -> Vec<MountOption> {
    let mut options = vec![
        MountOption::FSName("inifs".to_string()),
        MountOption::DefaultPermissions,
    ];
    if args.allow_other {
        options.push(MountOption::AllowOther);
    }
    if args.auto_unmount {
        options.push(MountOption::AutoUnmount);
    }
    options
}

/// Mount in a background session and serve until Ctrl-C.
async fn serve(
    doc: SharedDocument,
    mountpoint: &Path,
    args: &Args,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = fuser::spawn_mount2(FuseAdapter::new(doc), mountpoint, &mount_options(args))?;
    tracing::info!(mountpoint = %mountpoint.display(), "mounted");

    tokio::signal::ctrl_c().await?;

    tracing::info!("unmounting");
    tokio::task::spawn_blocking(move || session.join()).await?;
    Ok(())
}
