use std::{
    io::Write as _,
    path::{Path, PathBuf},
};

use crate::foundation::error::{FramegifError, FramegifResult};

/// Encoded bytes bound for one destination path.
#[derive(Clone, Debug)]
pub struct OutputArtifact {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

impl OutputArtifact {
    pub fn new(path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            bytes,
        }
    }

    /// Write the bytes to `path`, replacing any existing file.
    ///
    /// The data goes to a temporary file in the destination directory which is renamed over
    /// `path` only once fully written, so a failed write leaves no partial file behind.
    pub fn write(&self) -> FramegifResult<()> {
        write_atomic(&self.path, &self.bytes)
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

pub fn write_atomic(path: &Path, bytes: &[u8]) -> FramegifResult<()> {
    let err = |source| FramegifError::output_write(path, source);

    let dir = parent_dir(path);
    std::fs::create_dir_all(dir).map_err(err)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".framegif-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(err)?;
    tmp.write_all(bytes).map_err(err)?;
    tmp.as_file().sync_all().map_err(err)?;
    tmp.persist(path).map_err(|e| err(e.error))?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote output");
    Ok(())
}
