use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::StudioResult;

/// MIME type of exported markup.
pub const SVG_BLOB_MIME: &str = "image/svg+xml;charset=utf-8";

/// Where exported markup goes.
///
/// An export creates one blob, saves it under a file name and then revokes the
/// blob. [`export_markup`] guarantees the revoke happens whether or not the save
/// succeeded.
pub trait DownloadSink {
    type Blob;

    fn create_blob(&mut self, bytes: &[u8], mime: &str) -> StudioResult<Self::Blob>;
    fn save_as(&mut self, blob: &Self::Blob, filename: &str) -> StudioResult<()>;
    fn revoke(&mut self, blob: Self::Blob);
}

/// Export `markup` through `sink`. Returns `Ok(false)` without touching the sink when
/// there is nothing to export.
pub fn export_markup<S: DownloadSink + ?Sized>(
    sink: &mut S,
    markup: &str,
    filename: &str,
) -> StudioResult<bool> {
    if markup.is_empty() {
        return Ok(false);
    }
    let blob = sink.create_blob(markup.as_bytes(), SVG_BLOB_MIME)?;
    let saved = sink.save_as(&blob, filename);
    sink.revoke(blob);
    saved.map(|()| true)
}

/// Saves exports into a directory, staging each blob in a hidden part file first.
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    staged: usize,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            staged: 0,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn staging_path(&self) -> PathBuf {
        self.dir
            .join(format!(".blob-{}-{}.part", std::process::id(), self.staged))
    }
}

impl DownloadSink for DirectorySink {
    type Blob = PathBuf;

    fn create_blob(&mut self, bytes: &[u8], mime: &str) -> StudioResult<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.staging_path();
        self.staged += 1;
        let file = File::create(&path)?;
        stage(&path, file, bytes)?;
        debug!("Staged {} bytes of {mime} at {}", bytes.len(), path.display());
        Ok(path)
    }

    fn save_as(&mut self, blob: &PathBuf, filename: &str) -> StudioResult<()> {
        let target = self.dir.join(filename);
        fs::copy(blob, &target)?;
        debug!("Saved export to {}", target.display());
        Ok(())
    }

    fn revoke(&mut self, blob: PathBuf) {
        if let Err(err) = fs::remove_file(&blob) {
            debug!("Staged blob {} already gone: {err}", blob.display());
        }
    }
}

/// Fill a freshly created staging file, removing it again if the write fails.
fn stage<W: Write>(path: &Path, mut out: W, bytes: &[u8]) -> io::Result<()> {
    let written = out.write_all(bytes).and_then(|()| out.flush());
    if written.is_err() {
        drop(out);
        if let Err(err) = fs::remove_file(path) {
            debug!("Could not remove partial blob {}: {err}", path.display());
        }
    }
    written
}
