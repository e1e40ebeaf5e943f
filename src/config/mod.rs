// Configuration module - TOML file, CLI overrides and startup validation
// A `WatchConfig` is immutable once built; running sessions never see edits.

pub mod error;
pub mod loader;
pub mod region;
pub mod types;


pub use error::{ConfigError, ConfigResult};
pub use loader::{read_file_config, resolve};
pub use region::{load_region, save_region};
pub use types::{
    DebugSection, FileConfig, MatchingSection, NotifySection, Overrides, PresetSection,
    RegionSection, RuntimeSection, TemplateEntry, TemplateSpec, WatchConfig,
};
