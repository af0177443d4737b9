//! Duplicate-content detection over files and directory trees.
//!
//! Every regular file is reduced to a fixed-length hex digest of its
//! contents; the digest is the key into a [`Table`] whose value is the path
//! that first produced it. A later file with the same digest is a
//! duplicate of that first path.

use crate::table::Table;
use crate::value::Value;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;
use xxhash_rust::xxh3::Xxh3;

/// Length of a digest rendered by [`content_digest`].
pub const HEX_DIGEST_LENGTH: usize = 32;

const READ_BUF: usize = 8 * 1024;

/// Stream the file at `path` and return its 128-bit XXH3 digest in hex.
pub fn content_digest(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Xxh3::new();
    let mut buf = [0u8; READ_BUF];
    loop {
        let n = match file.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:032x}", hasher.digest128()))
}

/// How a scan reports what it finds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Only count duplicates; write no per-file lines.
    pub count: bool,
    /// Write nothing and stop at the first duplicate.
    pub quiet: bool,
}

/// Walks paths, remembering each digest's first path in a [`Table`].
pub struct Scanner<W> {
    checksums: Table,
    options: ScanOptions,
    report: W,
    duplicates: usize,
    stopped: bool,
}

impl<W: Write> Scanner<W> {
    /// `report` receives one `"<path> is a duplicate of <first>"` line per
    /// duplicate unless `count` or `quiet` is set.
    pub fn new(checksums: Table, options: ScanOptions, report: W) -> Self {
        Self {
            checksums,
            options,
            report,
            duplicates: 0,
            stopped: false,
        }
    }

    /// Duplicates found so far across every checked path.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Whether a quiet scan has seen a duplicate and stopped walking.
    pub fn stopped(&self) -> bool {
        self.stopped
    }

    pub fn checksums(&self) -> &Table {
        &self.checksums
    }

    pub fn into_parts(self) -> (Table, W) {
        (self.checksums, self.report)
    }

    /// Check a file or, recursively, a directory. Returns the number of
    /// duplicates found beneath `path`.
    pub fn check_path(&mut self, path: &Path) -> io::Result<usize> {
        if path.is_dir() {
            self.check_directory(path)
        } else {
            self.check_file(path)
        }
    }

    /// Check a single file; returns 1 if it duplicates an earlier file.
    ///
    /// Unreadable files are skipped. Write errors on the report sink and
    /// allocation failures in the table are returned.
    pub fn check_file(&mut self, path: &Path) -> io::Result<usize> {
        if self.stopped {
            return Ok(0);
        }

        let digest = match content_digest(path) {
            Ok(d) => d,
            Err(e) => {
                log::warn!("Skipping {}: {e}", path.display());
                return Ok(0);
            }
        };

        if let Some(first) = self.checksums.search(&digest) {
            log::debug!("{} matches {first} ({digest})", path.display());
            self.duplicates += 1;
            if self.options.quiet {
                self.stopped = true;
            } else if !self.options.count {
                writeln!(
                    self.report,
                    "{} is a duplicate of {first}",
                    path.display()
                )?;
            }
            return Ok(1);
        }

        let value = Value::Text(path.to_string_lossy().into_owned());
        self.checksums
            .insert(&digest, value)
            .map_err(|e| io::Error::new(io::ErrorKind::OutOfMemory, e))?;
        Ok(0)
    }

    /// Check every entry under `root`, descending into subdirectories.
    ///
    /// Entries are visited in file-name order. Symbolic links are not
    /// followed into directories. An unreadable directory is skipped.
    pub fn check_directory(&mut self, root: &Path) -> io::Result<usize> {
        let listing = fs::read_dir(root).and_then(|rd| rd.collect::<io::Result<Vec<_>>>());
        let mut entries = match listing {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Skipping directory {}: {e}", root.display());
                return Ok(0);
            }
        };
        entries.sort_by_key(|e| e.file_name());

        let mut found = 0;
        for entry in entries {
            if self.stopped {
                break;
            }
            let path = entry.path();
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            found += if is_dir {
                self.check_directory(&path)?
            } else {
                self.check_file(&path)?
            };
        }
        Ok(found)
    }
}
