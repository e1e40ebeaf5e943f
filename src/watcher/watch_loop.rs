// Watch loop: capture, score, decide and dispatch once per tick
use super::alert_state::AlertState;
use super::artifacts::DebugArtifacts;
use super::error::{WatchError, WatchResult};
use super::types::{AlertPolicy, WatchSummary};
use crate::capture::{Frame, FrameSource, Region};
use crate::config::WatchConfig;
use crate::notify::{DeliveryChannels, Dispatcher, NotificationPolicy};
use crate::template_matching::{MultiTemplateEvaluator, TemplateMatch};
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

pub struct WatchLoop<S, C> {
    label: String,
    region: Region,
    interval: Duration,
    // Shared with the blocking task that grabs and scores each frame
    source: Arc<Mutex<S>>,
    evaluator: Arc<MultiTemplateEvaluator>,
    policy: AlertPolicy,
    state: AlertState,
    notify: NotificationPolicy,
    dispatcher: Dispatcher<C>,
    artifacts: DebugArtifacts,
    print_score_every_n: u64,
    frame_index: u64,
    summary: WatchSummary,
}

// Logs the final line on every exit path, including unwinding
struct ExitLog<'a> {
    label: &'a str,
}

impl Drop for ExitLog<'_> {
    fn drop(&mut self) {
        info!("🏁 [{}] Watch loop exited", self.label);
    }
}

impl<S: FrameSource + 'static, C: DeliveryChannels> WatchLoop<S, C> {
    pub fn new(
        label: impl Into<String>,
        config: &WatchConfig,
        evaluator: MultiTemplateEvaluator,
        source: S,
        dispatcher: Dispatcher<C>,
    ) -> Self {
        Self {
            label: label.into(),
            region: config.region,
            interval: config.interval,
            source: Arc::new(Mutex::new(source)),
            evaluator: Arc::new(evaluator),
            policy: config.alert,
            state: AlertState::new(),
            notify: config.notify.clone(),
            dispatcher,
            artifacts: DebugArtifacts::new(config.debug.clone()),
            print_score_every_n: config.debug.print_score_every_n,
            frame_index: 0,
            summary: WatchSummary::default(),
        }
    }

    pub fn state(&self) -> &AlertState {
        &self.state
    }

    pub fn summary(&self) -> WatchSummary {
        self.summary
    }

    /// Tick on a fixed interval until `cancel` fires.
    ///
    /// Cancellation is observed between ticks; a tick that already started
    /// (including an in-flight dispatch) runs to completion.
    pub async fn run(mut self, cancel: CancellationToken) -> WatchSummary {
        let label = self.label.clone();
        let _exit = ExitLog { label: &label };

        info!(
            "👀 [{label}] Watching region {} every {:.2}s with {} template(s) from {}",
            self.region,
            self.interval.as_secs_f64(),
            self.evaluator.len(),
            self.source.lock().await.describe()
        );
        info!(
            "🎯 threshold={:.2} debounce={} cooldown={:.1}s",
            self.policy.threshold,
            self.policy.debounce_count,
            self.policy.cooldown.as_secs_f64()
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("🛑 [{label}] Stop requested");
                    break;
                }
                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }

        let summary = self.summary;
        info!(
            "📊 [{label}] {} tick(s), {} alert(s), {} undelivered, {} capture / {} scoring failure(s)",
            summary.ticks,
            summary.alerts,
            summary.undelivered,
            summary.capture_failures,
            summary.score_failures
        );
        summary
    }

    /// One pass: capture, evaluate, decide, dispatch. Per-tick failures are
    /// logged and counted, never propagated.
    pub async fn tick(&mut self) {
        self.summary.ticks += 1;

        let (frame, best) = match self.sample().await {
            Ok(sampled) => sampled,
            Err(WatchError::Matching(e)) => {
                warn!("⚠️ [{}] Scoring failed: {e}", self.label);
                self.summary.score_failures += 1;
                return;
            }
            Err(e) => {
                warn!("⚠️ [{}] Capture failed: {e}", self.label);
                self.summary.capture_failures += 1;
                return;
            }
        };

        self.frame_index += 1;
        let index = self.frame_index;
        let saved = self.artifacts.periodic(&frame, index, best.score);

        let decision = self.state.observe(best.score, Instant::now(), &self.policy);
        debug!("[{}] #{index} {} -> {decision:?}", self.label, best.describe());

        if decision.fired() {
            self.fire(&best).await;
            self.artifacts.on_match(&frame, index, best.score, saved);
        }

        if self.print_score_every_n > 0 && index % self.print_score_every_n == 0 {
            info!(
                "📈 [{}] score={:.4} streak={} template={}",
                self.label,
                best.score,
                self.state.hit_streak(),
                best.template_name
            );
        }
    }

    /// Grab and score one frame on the blocking pool; both can hold a
    /// thread for the whole tick.
    async fn sample(&self) -> WatchResult<(Frame, TemplateMatch)> {
        let source = Arc::clone(&self.source);
        let evaluator = Arc::clone(&self.evaluator);
        let region = self.region;

        tokio::task::spawn_blocking(move || {
            let frame = source.blocking_lock().grab(&region)?;
            let best = evaluator.evaluate(&frame)?;
            Ok((frame, best))
        })
        .await
        .unwrap_or_else(|source| Err(WatchError::Join { source }))
    }

    async fn fire(&mut self, best: &TemplateMatch) {
        self.summary.alerts += 1;
        info!("🚨 [{}] Alert: {}", self.label, best.describe());

        let message = format!("Match score {:.3} ({})", best.score, best.template_name);
        let report = self.dispatcher.dispatch(&self.notify.request(message)).await;
        if !report.delivered {
            self.summary.undelivered += 1;
        }

        if !self.policy.cooldown.is_zero() {
            info!(
                "⏳ [{}] Cooldown for {:.1}s",
                self.label,
                self.policy.cooldown.as_secs_f64()
            );
        }
    }
}
