use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tempfile::NamedTempFile;

/// Write-then-rename wrapper, so a failed run never leaves a half-written
/// output behind.
pub struct PendingWrite {
    target: PathBuf,
    tmp: NamedTempFile,
}

pub fn open_for_write(target: &Path, force: bool) -> Result<PendingWrite> {
    if target == Path::new("-") {
        bail!("stdout is not supported; provide a real file path.");
    }
    let parent = target.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    fs::create_dir_all(parent)
        .with_context(|| format!("create dir {}", parent.display()))?;
    if !force && target.exists() {
        bail!("Refusing to overwrite existing file: {} (use --force)", target.display());
    }
    let tmp = NamedTempFile::new_in(parent).context("create temp file")?;

    Ok(PendingWrite { target: target.to_path_buf(), tmp })
}

impl Write for PendingWrite {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> { self.tmp.write(buf) }
    fn flush(&mut self) -> std::io::Result<()> { self.tmp.flush() }
}

pub fn finalize_write(pending: PendingWrite) -> Result<()> {
    let PendingWrite { target, tmp } = pending;
    tmp.as_file().sync_all().ok(); // best-effort fsync file
    tmp.persist(&target)
        .with_context(|| format!("rename to {}", target.display()))?;
    if let Some(dir) = target.parent() {
        let _ = File::open(dir).and_then(|f| f.sync_all());
    }
    Ok(())
}
