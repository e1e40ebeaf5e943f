// On-disk configuration schema and the validated runtime snapshot
use crate::capture::Region;
use crate::notify::NotificationPolicy;
use crate::template_matching::{MatchMethod, Preprocess};
use crate::watcher::{AlertPolicy, DebugPolicy};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Raw TOML document. Every section and field falls back to its default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub templates: Vec<TemplateEntry>,
    pub region: RegionSection,
    pub matching: MatchingSection,
    pub runtime: RuntimeSection,
    pub notify: NotifySection,
    pub debug: DebugSection,
    pub presets: BTreeMap<String, PresetSection>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            templates: vec![TemplateEntry::Path(PathBuf::from("assets/template.png"))],
            region: RegionSection::default(),
            matching: MatchingSection::default(),
            runtime: RuntimeSection::default(),
            notify: NotifySection::default(),
            debug: DebugSection::default(),
            presets: BTreeMap::new(),
        }
    }
}

/// A template path, optionally with its own preprocessing and method
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TemplateEntry {
    Path(PathBuf),
    Detailed {
        path: PathBuf,
        preprocess: Option<String>,
        method: Option<String>,
    },
}

impl TemplateEntry {
    pub fn path(&self) -> &PathBuf {
        match self {
            TemplateEntry::Path(path) => path,
            TemplateEntry::Detailed { path, .. } => path,
        }
    }
}

// Signed so negative values reach validation instead of failing to parse
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RegionSection {
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
}

impl Default for RegionSection {
    fn default() -> Self {
        Self {
            left: 100,
            top: 100,
            width: 400,
            height: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MatchingSection {
    pub preprocess: String,
    pub method: String,
    pub threshold: f64,
}

impl Default for MatchingSection {
    fn default() -> Self {
        Self {
            preprocess: Preprocess::default().name().to_string(),
            method: MatchMethod::default().name().to_string(),
            threshold: 0.9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RuntimeSection {
    pub interval_sec: f64,
    pub debounce_count: i64,
    pub cooldown_sec: f64,
}

impl Default for RuntimeSection {
    fn default() -> Self {
        Self {
            interval_sec: 30.0,
            debounce_count: 3,
            cooldown_sec: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NotifySection {
    pub title: String,
    pub provider: String,
    pub fallback_to_local: bool,
    pub use_toast: bool,
    pub beep_fallback: bool,
    pub http_timeout_sec: f64,
    pub pushover_app_token: String,
    pub pushover_user_key: String,
    pub telegram_bot_token: String,
    pub telegram_chat_id: String,
}

impl Default for NotifySection {
    fn default() -> Self {
        Self {
            title: "Watcher Alert".to_string(),
            provider: "local".to_string(),
            fallback_to_local: true,
            use_toast: true,
            beep_fallback: true,
            http_timeout_sec: 5.0,
            pushover_app_token: String::new(),
            pushover_user_key: String::new(),
            telegram_bot_token: String::new(),
            telegram_chat_id: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DebugSection {
    pub print_score_every_n: u64,
    pub save_enabled: bool,
    pub save_dir: PathBuf,
    pub save_every_n: u64,
    pub save_on_match: bool,
}

impl Default for DebugSection {
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

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PresetSection {
    pub templates: Vec<TemplateEntry>,
}

/// Command line values that replace file values before validation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Overrides {
    pub threshold: Option<f64>,
    pub interval_sec: Option<f64>,
    pub debounce_count: Option<i64>,
    pub cooldown_sec: Option<f64>,
}

impl Overrides {
    pub fn apply(&self, file: &mut FileConfig) {
        if let Some(threshold) = self.threshold {
            file.matching.threshold = threshold;
        }
        if let Some(interval) = self.interval_sec {
            file.runtime.interval_sec = interval;
        }
        if let Some(debounce) = self.debounce_count {
            file.runtime.debounce_count = debounce;
        }
        if let Some(cooldown) = self.cooldown_sec {
            file.runtime.cooldown_sec = cooldown;
        }
    }
}

/// A resolved template: existing file plus how to match it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSpec {
    pub path: PathBuf,
    pub preprocess: Preprocess,
    pub method: MatchMethod,
}

/// Immutable, validated snapshot for one run
#[derive(Debug, Clone, PartialEq)]
pub struct WatchConfig {
    pub config_path: PathBuf,
    pub region: Region,
    pub templates: Vec<TemplateSpec>,
    pub alert: AlertPolicy,
    pub interval: Duration,
    pub notify: NotificationPolicy,
    pub debug: DebugPolicy,
    pub presets: BTreeMap<String, Vec<TemplateSpec>>,
}
