use super::error::{WatchError, WatchResult};
use super::types::WatchSummary;
use super::watch_loop::WatchLoop;
use crate::capture::FrameSource;
use crate::config::WatchConfig;
use crate::notify::{DeliveryChannels, Dispatcher, SystemChannels};
use crate::template_matching::{MultiTemplateEvaluator, Template};
use log::{debug, info};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

/// Handle to one running watch loop with its own alert state and stop control.
///
/// Dropping the handle cancels the loop without waiting for it.
#[derive(Debug)]
pub struct WatchSession {
    label: String,
    cancel: CancellationToken,
    handle: Option<JoinHandle<WatchSummary>>,
}

impl WatchSession {
    /// Start watching the live screen with the system notification channels.
    pub fn start(label: impl Into<String>, config: &WatchConfig) -> WatchResult<Self> {
        let source = crate::capture::live_source()?;
        let channels = SystemChannels::new(config.notify.timeout)?;
        Self::start_with(label, config, source, channels)
    }

    /// Start with an explicit frame source and delivery backend.
    ///
    /// Templates are loaded and checked against the region before the loop
    /// is spawned, so a bad configuration never reaches the first tick.
    pub fn start_with<S, C>(
        label: impl Into<String>,
        config: &WatchConfig,
        source: S,
        channels: C,
    ) -> WatchResult<Self>
    where
        S: FrameSource + 'static,
        C: DeliveryChannels + 'static,
    {
        let label = label.into();
        let evaluator = load_evaluator(config)?;
        let watch_loop = WatchLoop::new(
            label.clone(),
            config,
            evaluator,
            source,
            Dispatcher::new(channels),
        );

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(watch_loop.run(cancel.clone()));
        info!("▶️ Session '{label}' started");

        Ok(Self {
            label,
            cancel,
            handle: Some(handle),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Request a stop and wait up to `timeout` for the loop to finish its
    /// cleanup.
    pub async fn stop(mut self, timeout: Duration) -> WatchResult<WatchSummary> {
        self.cancel.cancel();
        let Some(handle) = self.handle.take() else {
            return Ok(WatchSummary::default());
        };
        debug!("⏹️ Stopping session '{}'", self.label);

        match tokio::time::timeout(timeout, handle).await {
            Ok(Ok(summary)) => {
                info!("⏹️ Session '{}' stopped", self.label);
                Ok(summary)
            }
            Ok(Err(source)) => Err(WatchError::Join { source }),
            Err(_) => Err(WatchError::StopTimeout {
                label: self.label.clone(),
                timeout,
            }),
        }
    }
}

impl Drop for WatchSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Load every configured template, rejecting any larger than the region.
pub fn load_evaluator(config: &WatchConfig) -> WatchResult<MultiTemplateEvaluator> {
    let region = config.region;
    let mut templates = Vec::with_capacity(config.templates.len());
    for spec in &config.templates {
        let template = Template::load(&spec.path, spec.preprocess, spec.method)?;
        if !region.fits(template.width(), template.height()) {
            return Err(WatchError::TemplateLargerThanRegion {
                name: template.name().to_string(),
                template_width: template.width(),
                template_height: template.height(),
                region_width: region.width,
                region_height: region.height,
            });
        }
        debug!(
            "🖼️ Loaded template '{}' {}x{} ({}, {})",
            template.name(),
            template.width(),
            template.height(),
            template.preprocess(),
            template.method()
        );
        templates.push(template);
    }
    Ok(MultiTemplateEvaluator::new(templates)?)
}
