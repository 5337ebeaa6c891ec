//! Reading and writing envelopes on disk.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::crypto::{Backend, OsBackend};

/// A file holding an envelope, a hash or any other passbox output.
#[derive(Debug, Clone)]
pub struct EnvelopeFile {
    path: PathBuf,
}

impl EnvelopeFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Reads the whole file.
    pub fn read(&self) -> Result<Vec<u8>> {
        fs::read(&self.path).with_context(|| format!("failed to read {}", self.path.display()))
    }

    /// Reads the file as text, dropping one trailing newline.
    pub fn read_text(&self) -> Result<String> {
        let bytes = self.read()?;
        let mut text = String::from_utf8(bytes)
            .with_context(|| format!("{} is not UTF-8 text", self.path.display()))?;

        if text.ends_with('\n') {
            text.pop();
            if text.ends_with('\r') {
                text.pop();
            }
        }
        Ok(text)
    }

    /// Replaces the file contents atomically.
    ///
    /// Data goes to a randomly named sibling first, is synced, then renamed
    /// over the target; the parent directory is synced last. A crash leaves
    /// either the old or the new file, never a partial one. Missing parent
    /// directories are created.
    pub fn write(&self, data: &[u8]) -> Result<()> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;

        let tmp_path = self.tmp_path()?;

        let mut tmp = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)
            .context("failed to create temporary file")?;
        tmp.write_all(data)?;
        tmp.sync_all()?;
        drop(tmp);

        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e).context("failed to move output into place");
        }

        // directories cannot be opened for syncing on windows
        #[cfg(unix)]
        File::open(parent)?.sync_all()?;

        debug!(path = %self.path.display(), len = data.len(), "wrote file");
        Ok(())
    }

    /// `<name>.tmp.<16 hex chars>` next to the target.
    fn tmp_path(&self) -> Result<PathBuf> {
        let mut suffix = [0u8; 8];
        OsBackend.fill_random(&mut suffix)?;

        let hex: String = suffix.iter().map(|b| format!("{b:02x}")).collect();
        let name = self
            .path
            .file_name()
            .context("output path has no file name")?
            .to_string_lossy();

        Ok(self.path.with_file_name(format!("{name}.tmp.{hex}")))
    }
}
