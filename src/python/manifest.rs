//! Requirements manifest.
//!
//! The manifest is handed to pip untouched. It is only read here to tell the
//! user how many requirements it lists; specifiers are not interpreted.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Kind of a manifest line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A requirement (`requests>=2`, a URL, a local path, ...).
    Requirement,
    /// A pip option line (`-r other.txt`, `--index-url ...`).
    Option,
}

/// A meaningful line of the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// 1-based line number.
    pub line: usize,
    /// Line text with comments and surrounding whitespace removed.
    pub text: String,
    pub kind: EntryKind,
}

/// A loaded requirements file.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Load the manifest at `path`.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.is_file() {
            return Ok(None);
        }
        let content = decode(&fs::read(path)?);
        Ok(Some(Self::parse(path, &content)))
    }

    /// Parse manifest content.
    pub fn parse(path: &Path, content: &str) -> Self {
        let entries = content
            .lines()
            .enumerate()
            .filter_map(|(i, raw)| {
                let text = strip_comment(raw).trim();
                if text.is_empty() {
                    return None;
                }
                let kind = if text.starts_with('-') {
                    EntryKind::Option
                } else {
                    EntryKind::Requirement
                };
                Some(ManifestEntry {
                    line: i + 1,
                    text: text.to_string(),
                    kind,
                })
            })
            .collect();

        Self {
            path: path.to_path_buf(),
            entries,
        }
    }

    /// File path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All meaningful lines.
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Number of requirement lines.
    pub fn requirement_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.kind == EntryKind::Requirement)
            .count()
    }
}

/// Decode manifest bytes for counting.
///
/// pip accepts UTF-8 and BOM-marked UTF-16 files, and legacy encodings such
/// as cp932 still show up on Windows. Undecodable bytes become U+FFFD; the
/// file itself is passed to pip unchanged.
fn decode(bytes: &[u8]) -> String {
    let utf16 = |rest: &[u8], from: fn([u8; 2]) -> u16| {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| from([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    };

    match bytes {
        [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8_lossy(rest).into_owned(),
        [0xFF, 0xFE, rest @ ..] => utf16(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => utf16(rest, u16::from_be_bytes),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Comments start at `#` at line start or after whitespace, matching pip.
fn strip_comment(line: &str) -> &str {
    if line.trim_start().starts_with('#') {
        return "";
    }
    match line.find(" #").or_else(|| line.find("\t#")) {
        Some(i) => &line[..i],
        None => line,
    }
}
