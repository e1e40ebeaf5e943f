//! Reading, resolving and validating the configuration file

use super::error::{ConfigError, ConfigResult};
use super::types::{
    DebugSection, FileConfig, MatchingSection, NotifySection, Overrides, RegionSection,
    RuntimeSection, TemplateEntry, TemplateSpec, WatchConfig,
};
use crate::capture::Region;
use crate::notify::{NotificationPolicy, Provider, PushoverCredentials, TelegramCredentials};
use crate::template_matching::{MatchMethod, Preprocess};
use crate::watcher::{AlertPolicy, DebugPolicy};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

impl WatchConfig {
    /// Load `path`, apply `overrides` and validate everything before any
    /// screen sampling can start.
    pub fn load(path: impl AsRef<Path>, overrides: &Overrides) -> ConfigResult<Self> {
        let path = path.as_ref();
        let mut file = read_file_config(path)?;
        overrides.apply(&mut file);
        resolve(path, file)
    }

    /// Copy of this config with a preset's templates in place of the base ones.
    pub fn with_preset(&self, name: &str) -> ConfigResult<Self> {
        let templates = self
            .presets
            .get(name)
            .ok_or_else(|| ConfigError::UnknownPreset {
                name: name.to_string(),
                available: self.preset_list(),
            })?;
        Ok(Self {
            templates: templates.clone(),
            ..self.clone()
        })
    }

    fn preset_list(&self) -> String {
        if self.presets.is_empty() {
            return "none".to_string();
        }
        self.presets.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

impl RegionSection {
    /// Validate raw coordinates into a `Region`.
    pub fn to_region(&self) -> ConfigResult<Region> {
        region_from(self)
    }
}

pub(crate) fn read_text(path: &Path) -> ConfigResult<String> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_file_config(path: &Path) -> ConfigResult<FileConfig> {
    let text = read_text(path)?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Validate a parsed document; relative paths resolve against the
/// directory of `config_path`.
pub fn resolve(config_path: &Path, file: FileConfig) -> ConfigResult<WatchConfig> {
    let base_dir = config_dir(config_path);

    let region = region_from(&file.region)?;
    let (alert, interval) = runtime_from(&file.matching, &file.runtime)?;
    let notify = notify_from(&file.notify)?;

    let preprocess = parse_field::<Preprocess>("matching.preprocess", &file.matching.preprocess)?;
    let method = parse_field::<MatchMethod>("matching.method", &file.matching.method)?;

    if file.templates.is_empty() {
        return Err(ConfigError::NoTemplates);
    }
    let templates = resolve_templates("templates", &file.templates, &base_dir, preprocess, method)?;

    let mut presets = BTreeMap::new();
    for (name, preset) in &file.presets {
        if preset.templates.is_empty() {
            return Err(ConfigError::NoPresetTemplates { name: name.clone() });
        }
        let field = format!("presets.{name}.templates");
        let specs = resolve_templates(&field, &preset.templates, &base_dir, preprocess, method)?;
        presets.insert(name.clone(), specs);
    }

    let debug = debug_from(&file.debug, &base_dir);

    Ok(WatchConfig {
        config_path: config_path.to_path_buf(),
        region,
        templates,
        alert,
        interval,
        notify,
        debug,
        presets,
    })
}

fn config_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn resolve_path(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

pub(crate) fn region_from(section: &RegionSection) -> ConfigResult<Region> {
    if section.width <= 0 {
        return Err(ConfigError::invalid("region.width", section.width, "must be > 0"));
    }
    if section.height <= 0 {
        return Err(ConfigError::invalid("region.height", section.height, "must be > 0"));
    }
    if section.left < 0 {
        return Err(ConfigError::invalid("region.left", section.left, "must be >= 0"));
    }
    if section.top < 0 {
        return Err(ConfigError::invalid("region.top", section.top, "must be >= 0"));
    }
    let coordinate = |field: &str, value: i64| {
        u32::try_from(value).map_err(|_| ConfigError::invalid(field, value, "is too large"))
    };
    Ok(Region::new(
        coordinate("region.left", section.left)?,
        coordinate("region.top", section.top)?,
        coordinate("region.width", section.width)?,
        coordinate("region.height", section.height)?,
    ))
}

fn runtime_from(
    matching: &MatchingSection,
    runtime: &RuntimeSection,
) -> ConfigResult<(AlertPolicy, Duration)> {
    let threshold = matching.threshold;
    if !(0.0..=1.0).contains(&threshold) {
        return Err(ConfigError::invalid(
            "matching.threshold",
            threshold,
            "must be between 0 and 1",
        ));
    }

    let interval = positive_seconds("runtime.interval_sec", runtime.interval_sec)?;

    if runtime.debounce_count < 1 {
        return Err(ConfigError::invalid(
            "runtime.debounce_count",
            runtime.debounce_count,
            "must be >= 1",
        ));
    }
    let debounce_count = u32::try_from(runtime.debounce_count)
        .map_err(|_| ConfigError::invalid("runtime.debounce_count", runtime.debounce_count, "is too large"))?;

    let cooldown = Duration::try_from_secs_f64(runtime.cooldown_sec)
        .map_err(|_| ConfigError::invalid("runtime.cooldown_sec", runtime.cooldown_sec, "must be >= 0"))?;

    let alert = AlertPolicy {
        threshold: threshold as f32,
        debounce_count,
        cooldown,
    };
    Ok((alert, interval))
}

fn positive_seconds(field: &str, value: f64) -> ConfigResult<Duration> {
    if value.is_nan() || value <= 0.0 {
        return Err(ConfigError::invalid(field, value, "must be > 0"));
    }
    Duration::try_from_secs_f64(value).map_err(|e| ConfigError::invalid(field, value, e.to_string()))
}

fn notify_from(section: &NotifySection) -> ConfigResult<NotificationPolicy> {
    let provider = parse_field::<Provider>("notify.provider", &section.provider)?;

    let pushover = non_empty_pair(&section.pushover_app_token, &section.pushover_user_key).map(
        |(app_token, user_key)| PushoverCredentials {
            app_token,
            user_key,
        },
    );
    let telegram = non_empty_pair(&section.telegram_bot_token, &section.telegram_chat_id).map(
        |(bot_token, chat_id)| TelegramCredentials { bot_token, chat_id },
    );

    match provider {
        Provider::Pushover if pushover.is_none() => {
            return Err(ConfigError::MissingCredentials {
                provider,
                fields: "notify.pushover_app_token and notify.pushover_user_key",
            });
        }
        Provider::Telegram if telegram.is_none() => {
            return Err(ConfigError::MissingCredentials {
                provider,
                fields: "notify.telegram_bot_token and notify.telegram_chat_id",
            });
        }
        _ => {}
    }

    let timeout = positive_seconds("notify.http_timeout_sec", section.http_timeout_sec)?;

    Ok(NotificationPolicy {
        title: section.title.clone(),
        provider,
        fallback_to_local: section.fallback_to_local,
        use_toast: section.use_toast,
        beep_fallback: section.beep_fallback,
        pushover,
        telegram,
        timeout,
    })
}

fn non_empty_pair(first: &str, second: &str) -> Option<(String, String)> {
    let (first, second) = (first.trim(), second.trim());
    (!first.is_empty() && !second.is_empty()).then(|| (first.to_string(), second.to_string()))
}

fn parse_field<T>(field: &str, value: &str) -> ConfigResult<T>
where
    T: std::str::FromStr<Err = String>,
{
    value
        .parse()
        .map_err(|reason| ConfigError::invalid(field, format!("'{value}'"), reason))
}

/// Resolve paths, apply per-entry settings and require every file to exist.
fn resolve_templates(
    field: &str,
    entries: &[TemplateEntry],
    base_dir: &Path,
    preprocess: Preprocess,
    method: MatchMethod,
) -> ConfigResult<Vec<TemplateSpec>> {
    let mut specs = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let (entry_preprocess, entry_method) = match entry {
            TemplateEntry::Path(_) => (preprocess, method),
            TemplateEntry::Detailed {
                preprocess: p,
                method: m,
                ..
            } => (
                p.as_deref()
                    .map(|v| parse_field(&format!("{field}[{i}].preprocess"), v))
                    .transpose()?
                    .unwrap_or(preprocess),
                m.as_deref()
                    .map(|v| parse_field(&format!("{field}[{i}].method"), v))
                    .transpose()?
                    .unwrap_or(method),
            ),
        };
        specs.push(TemplateSpec {
            path: resolve_path(base_dir, entry.path()),
            preprocess: entry_preprocess,
            method: entry_method,
        });
    }

    let missing: Vec<String> = specs
        .iter()
        .filter(|spec| !spec.path.is_file())
        .map(|spec| spec.path.display().to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ConfigError::TemplatesNotFound {
            paths: missing.join(", "),
        });
    }
    Ok(specs)
}

fn debug_from(section: &DebugSection, base_dir: &Path) -> DebugPolicy {
    DebugPolicy {
        print_score_every_n: section.print_score_every_n,
        save_enabled: section.save_enabled,
        save_dir: resolve_path(base_dir, &section.save_dir),
        save_every_n: section.save_every_n,
        save_on_match: section.save_on_match,
    }
}
