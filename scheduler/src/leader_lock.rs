//! ABOUTME: Filesystem exclusive-create mutual exclusion for single-leader execution
//! ABOUTME: Grounded on scheduler.py's os.open(O_CREAT | O_EXCL) leader election

use schedkit_core::Result;
use std::fs::OpenOptions;
use std::path::PathBuf;
use tracing::{info, warn};

/// Coordinates leadership across potentially many scheduler instances
/// that share a lock file path. With no path configured, a scheduler
/// always considers itself the leader — the standalone case.
pub struct LeaderLock {
    path: Option<PathBuf>,
    is_leader: bool,
}

impl LeaderLock {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            is_leader: false,
        }
    }

    pub fn is_leader(&self) -> bool {
        self.is_leader
    }

    /// Attempt to become leader. Exclusive-creates the lock file;
    /// success means this instance is the leader, `AlreadyExists`
    /// means another instance holds it.
    pub fn acquire(&mut self) -> Result<bool> {
        let path = match &self.path {
            None => {
                self.is_leader = true;
                return Ok(true);
            }
            Some(path) => path,
        };

        match OpenOptions::new().create_new(true).write(true).open(path) {
            Ok(_) => {
                self.is_leader = true;
                info!(path = %path.display(), "acquired leader lock");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                self.is_leader = false;
                Ok(false)
            }
            Err(e) => Err(schedkit_core::Error::Io(e)),
        }
    }

    /// Release the lock if this instance holds it. Removing an
    /// already-missing file is not an error.
    pub fn release(&mut self) -> Result<()> {
        if !self.is_leader {
            return Ok(());
        }
        if let Some(path) = &self.path {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to remove leader lock file");
                    return Err(schedkit_core::Error::Io(e));
                }
            }
        }
        self.is_leader = false;
        Ok(())
    }
}

impl Drop for LeaderLock {
    fn drop(&mut self) {
        if self.is_leader {
            if let Err(e) = self.release() {
                warn!(error = %e, "failed to release leader lock on drop");
            }
        }
    }
}
