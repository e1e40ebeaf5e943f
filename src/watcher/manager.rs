//! Switching between named template presets, one session at a time

use super::error::WatchResult;
use super::session::WatchSession;
use super::types::WatchSummary;
use crate::config::WatchConfig;
use log::info;
use tokio::time::Duration;

/// Label of the session running the base configuration
pub const DEFAULT_SESSION: &str = "default";

/// Owns at most one active session. Starting another one first stops and
/// joins the active session within `stop_timeout`.
pub struct SessionManager<F> {
    base: WatchConfig,
    stop_timeout: Duration,
    launcher: F,
    active: Option<WatchSession>,
}

impl<F> SessionManager<F>
where
    F: FnMut(&str, &WatchConfig) -> WatchResult<WatchSession>,
{
    pub fn new(base: WatchConfig, stop_timeout: Duration, launcher: F) -> Self {
        Self {
            base,
            stop_timeout,
            launcher,
            active: None,
        }
    }

    pub fn presets(&self) -> impl Iterator<Item = &str> {
        self.base.presets.keys().map(String::as_str)
    }

    pub fn active_label(&self) -> Option<&str> {
        self.active.as_ref().map(WatchSession::label)
    }

    /// Run the named preset's templates in place of the active session.
    ///
    /// An unknown preset leaves the active session untouched. If the active
    /// session does not stop in time, the new one is not started.
    pub async fn switch_to(&mut self, preset: &str) -> WatchResult<()> {
        let config = self.base.with_preset(preset)?;
        self.stop_active().await?;
        self.launch(preset, &config)
    }

    /// Run the base configuration in place of the active session.
    pub async fn start_default(&mut self) -> WatchResult<()> {
        self.stop_active().await?;
        let config = self.base.clone();
        self.launch(DEFAULT_SESSION, &config)
    }

    pub async fn stop_active(&mut self) -> WatchResult<Option<WatchSummary>> {
        let Some(session) = self.active.take() else {
            return Ok(None);
        };
        let label = session.label().to_string();
        let summary = session.stop(self.stop_timeout).await?;
        info!(
            "📊 '{label}' ran {} tick(s) with {} alert(s)",
            summary.ticks, summary.alerts
        );
        Ok(Some(summary))
    }

    fn launch(&mut self, label: &str, config: &WatchConfig) -> WatchResult<()> {
        let session = (self.launcher)(label, config)?;
        self.active = Some(session);
        Ok(())
    }
}
