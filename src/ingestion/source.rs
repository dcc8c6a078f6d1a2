//! Raw input files.

use std::fmt;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::IngestionResult;

/// One uploaded file: a display name plus its raw bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Name reported in diagnostics (usually the file name).
    pub name: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk; the file name (without directories) becomes [`Self::name`].
    pub fn from_path(path: impl AsRef<Path>) -> IngestionResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        Ok(Self::new(display_name(path), bytes))
    }
}

impl fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFile")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Load every `*.csv` file under `dir` (recursively), ordered by path.
pub fn sources_from_dir(dir: impl AsRef<Path>) -> IngestionResult<Vec<SourceFile>> {
    let mut out = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        let is_csv = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if entry.file_type().is_file() && is_csv {
            out.push(SourceFile::from_path(entry.path())?);
        }
    }
    Ok(out)
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
