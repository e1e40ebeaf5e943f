//! Best-effort debug snapshots of sampled frames

use super::error::{WatchError, WatchResult};
use super::types::DebugPolicy;
use crate::capture::Frame;
use log::{debug, warn};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct DebugArtifacts {
    policy: DebugPolicy,
    dir_ready: bool,
}

impl DebugArtifacts {
    pub fn new(policy: DebugPolicy) -> Self {
        Self {
            policy,
            dir_ready: false,
        }
    }

    pub fn policy(&self) -> &DebugPolicy {
        &self.policy
    }

    /// Periodic snapshot; returns whether a file was written this tick.
    pub fn periodic(&mut self, frame: &Frame, index: u64, score: f32) -> bool {
        if !self.policy.saves_periodically() || index % self.policy.save_every_n != 0 {
            return false;
        }
        self.save_logged("frame", frame, index, score)
    }

    /// On-match snapshot, skipped when the tick already has a periodic one.
    pub fn on_match(&mut self, frame: &Frame, index: u64, score: f32, saved_this_tick: bool) -> bool {
        if !self.policy.saves_on_match() || saved_this_tick {
            return false;
        }
        self.save_logged("match", frame, index, score)
    }

    fn save_logged(&mut self, prefix: &str, frame: &Frame, index: u64, score: f32) -> bool {
        match self.save(prefix, frame, index, score) {
            Ok(path) => {
                debug!("💾 Saved {}", path.display());
                true
            }
            Err(e) => {
                warn!("⚠️ {e}");
                false
            }
        }
    }

    fn save(&mut self, prefix: &str, frame: &Frame, index: u64, score: f32) -> WatchResult<PathBuf> {
        self.ensure_dir()?;
        let path = self.policy.save_dir.join(snapshot_name(prefix, index, score));
        frame.save(&path).map_err(|source| WatchError::ArtifactWrite {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    fn ensure_dir(&mut self) -> WatchResult<()> {
        if self.dir_ready {
            return Ok(());
        }
        let dir: &Path = &self.policy.save_dir;
        std::fs::create_dir_all(dir).map_err(|source| WatchError::ArtifactDir {
            path: dir.to_path_buf(),
            source,
        })?;
        self.dir_ready = true;
        Ok(())
    }
}

/// `<prefix>_<YYYYmmdd-HHMMSS>_<index:06>_<score:.3>.png`
pub fn snapshot_name(prefix: &str, index: u64, score: f32) -> String {
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    format!("{prefix}_{stamp}_{index:06}_{score:.3}.png")
}
