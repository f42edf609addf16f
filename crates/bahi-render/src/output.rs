//! # Output Channels
//!
//! Where rendered artifacts go.
//!
//! ## Channel Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   acquire() ──► write_all() ──► commit()      artifact is visible       │
//! │       │              │              │                                   │
//! │       └──────────────┴──────────────┴──► release()   nothing is left    │
//! │                       (any error, including a render       behind       │
//! │                        failure between acquire and write)               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`emit`] drives a channel through this lifecycle.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{RenderError, RenderResult};

/// A destination for one rendered artifact.
pub trait OutputChannel {
    /// Opens the destination for writing.
    fn acquire(&mut self) -> RenderResult<()>;

    /// Appends bytes to the acquired destination.
    fn write_all(&mut self, bytes: &[u8]) -> RenderResult<()>;

    /// Makes the written artifact visible.
    fn commit(&mut self) -> RenderResult<()>;

    /// Discards anything written since `acquire`. Must be safe to call in
    /// any state.
    fn release(&mut self);
}

/// Acquires `channel`, writes what `produce` returns and commits.
///
/// On any failure the channel is released before the error is returned.
pub fn emit<C, F>(channel: &mut C, produce: F) -> RenderResult<()>
where
    C: OutputChannel + ?Sized,
    F: FnOnce() -> RenderResult<Vec<u8>>,
{
    channel.acquire()?;

    let result = produce()
        .and_then(|bytes| channel.write_all(&bytes))
        .and_then(|()| channel.commit());

    if let Err(err) = &result {
        warn!(error = %err, "Output failed, releasing channel");
        channel.release();
    }
    result
}

// =============================================================================
// File Channel
// =============================================================================

/// Writes to a temporary file beside `target` and renames it into place on
/// commit.
#[derive(Debug)]
pub struct FileChannel {
    target: PathBuf,
    temp: Option<NamedTempFile>,
}

impl FileChannel {
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            temp: None,
        }
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    fn temp_mut(&mut self) -> RenderResult<&mut NamedTempFile> {
        self.temp
            .as_mut()
            .ok_or_else(|| RenderError::ChannelUnavailable("channel was not acquired".into()))
    }
}

impl OutputChannel for FileChannel {
    fn acquire(&mut self) -> RenderResult<()> {
        let dir = match self.target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let temp = NamedTempFile::new_in(&dir).map_err(|e| {
            RenderError::ChannelUnavailable(format!("{}: {}", dir.display(), e))
        })?;
        debug!(temp = ?temp.path(), target = ?self.target, "Acquired file channel");
        self.temp = Some(temp);
        Ok(())
    }

    fn write_all(&mut self, bytes: &[u8]) -> RenderResult<()> {
        self.temp_mut()?.as_file_mut().write_all(bytes)?;
        Ok(())
    }

    fn commit(&mut self) -> RenderResult<()> {
        let temp = self
            .temp
            .take()
            .ok_or_else(|| RenderError::ChannelUnavailable("channel was not acquired".into()))?;

        temp.as_file()
            .sync_all()
            .map_err(|e| RenderError::Finalize(e.to_string()))?;
        temp.persist(&self.target)
            .map_err(|e| RenderError::Finalize(e.error.to_string()))?;

        info!(path = ?self.target, "Wrote invoice document");
        Ok(())
    }

    fn release(&mut self) {
        if let Some(temp) = self.temp.take() {
            debug!(temp = ?temp.path(), "Discarding partial output");
            // dropping the handle deletes the file
            drop(temp);
        }
    }
}

impl Drop for FileChannel {
    fn drop(&mut self) {
        self.release();
    }
}

// =============================================================================
// Memory Channel
// =============================================================================

/// Collects the artifact in memory.
#[derive(Debug, Default)]
pub struct MemoryChannel {
    pending: Option<Vec<u8>>,
    committed: Option<Vec<u8>>,
    releases: usize,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// The committed artifact, if any.
    pub fn contents(&self) -> Option<&[u8]> {
        self.committed.as_deref()
    }

    pub fn into_contents(self) -> Option<Vec<u8>> {
        self.committed
    }

    /// Whether a write is in progress.
    pub fn is_acquired(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of times the channel was released.
    pub fn release_count(&self) -> usize {
        self.releases
    }
}

impl OutputChannel for MemoryChannel {
    fn acquire(&mut self) -> RenderResult<()> {
        if self.pending.is_some() {
            return Err(RenderError::ChannelUnavailable("already acquired".into()));
        }
        self.pending = Some(Vec::new());
        Ok(())
    }

    fn write_all(&mut self, bytes: &[u8]) -> RenderResult<()> {
        match self.pending.as_mut() {
            Some(buf) => {
                buf.extend_from_slice(bytes);
                Ok(())
            }
            None => Err(RenderError::ChannelUnavailable("channel was not acquired".into())),
        }
    }

    fn commit(&mut self) -> RenderResult<()> {
        let bytes = self
            .pending
            .take()
            .ok_or_else(|| RenderError::ChannelUnavailable("channel was not acquired".into()))?;
        self.committed = Some(bytes);
        Ok(())
    }

    fn release(&mut self) {
        self.pending = None;
        self.releases += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_channel_commit() {
        let mut channel = MemoryChannel::new();
        emit(&mut channel, || Ok(b"invoice".to_vec())).unwrap();
        assert_eq!(channel.contents(), Some(&b"invoice"[..]));
        assert!(!channel.is_acquired());
        assert_eq!(channel.release_count(), 0);
    }

    #[test]
    fn test_failure_releases_channel() {
        let mut channel = MemoryChannel::new();
        let result = emit(&mut channel, || {
            Err(RenderError::MalformedInvoice {
                invoice_number: "INV-001".into(),
                reason: "grand total mismatch".into(),
            })
        });

        assert!(matches!(result, Err(RenderError::MalformedInvoice { .. })));
        assert!(!channel.is_acquired());
        assert!(channel.contents().is_none());
        assert_eq!(channel.release_count(), 1);

        // the channel is usable again afterwards
        emit(&mut channel, || Ok(b"ok".to_vec())).unwrap();
        assert_eq!(channel.contents(), Some(&b"ok"[..]));
    }

    #[test]
    fn test_file_channel_persists_on_commit() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("INV-001.html");

        let mut channel = FileChannel::new(&target);
        emit(&mut channel, || Ok(b"<html></html>".to_vec())).unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"<html></html>");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_file_channel_leaves_nothing_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("INV-002.html");

        let mut channel = FileChannel::new(&target);
        let result = emit(&mut channel, || Err(RenderError::Config("boom".into())));

        assert!(result.is_err());
        assert!(!target.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_file_channel_unavailable_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing").join("INV-003.html");

        let mut channel = FileChannel::new(&target);
        let result = emit(&mut channel, || Ok(Vec::new()));
        assert!(matches!(result, Err(RenderError::ChannelUnavailable(_))));
    }
}
