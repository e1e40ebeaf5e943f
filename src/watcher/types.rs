// Watch session types
use std::path::PathBuf;
use std::time::Duration;

/// Threshold, debounce and cooldown settings of one session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertPolicy {
    pub threshold: f32,
    pub debounce_count: u32,
    pub cooldown: Duration,
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self {
            threshold: 0.9,
            debounce_count: 3,
            cooldown: Duration::from_secs(20),
        }
    }
}

/// Outcome of feeding one score to the alert state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Score below threshold; streak cleared
    Reset,
    /// Qualifying score, streak still short of the debounce count
    Accumulating { streak: u32 },
    /// Streak is long enough but the cooldown window is still open
    Suppressed { streak: u32 },
    /// Alert event; streak cleared and cooldown started
    Fire,
}

impl Decision {
    pub fn fired(self) -> bool {
        matches!(self, Decision::Fire)
    }
}

/// Derived view of the alert state at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertPhase {
    Idle,
    Accumulating,
    Cooldown,
}

/// Debug side effects of the watch loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugPolicy {
    /// Log the best score every N ticks; 0 disables
    pub print_score_every_n: u64,
    pub save_enabled: bool,
    pub save_dir: PathBuf,
    /// Save a frame every N ticks; 0 disables
    pub save_every_n: u64,
    pub save_on_match: bool,
}

impl Default for DebugPolicy {
    fn default() -> Self {
        Self {
            print_score_every_n: 0,
            save_enabled: false,
            save_dir: PathBuf::from("debug_screens"),
            save_every_n: 0,
            save_on_match: false,
        }
    }
}

impl DebugPolicy {
    pub fn saves_periodically(&self) -> bool {
        self.save_enabled && self.save_every_n > 0
    }

    pub fn saves_on_match(&self) -> bool {
        self.save_enabled && self.save_on_match
    }
}

/// Counters returned by a finished watch loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchSummary {
    pub ticks: u64,
    pub alerts: u64,
    /// Alerts no channel managed to deliver
    pub undelivered: u64,
    pub capture_failures: u64,
    pub score_failures: u64,
}
