//! Persisting the watched region without touching the rest of the file

use super::error::{ConfigError, ConfigResult};
use super::loader::{read_file_config, read_text, region_from};
use crate::capture::Region;
use log::info;
use std::path::Path;
use toml::{Table, Value};

/// Rewrite only the `[region]` keys of `path`, creating the file if needed.
pub fn save_region(path: impl AsRef<Path>, region: &Region) -> ConfigResult<()> {
    let path = path.as_ref();
    let mut doc = if path.exists() {
        read_text(path)?
            .parse::<Table>()
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
    } else {
        Table::new()
    };

    let entry = doc
        .entry("region")
        .or_insert_with(|| Value::Table(Table::new()));
    if !entry.is_table() {
        *entry = Value::Table(Table::new());
    }
    if let Value::Table(table) = entry {
        table.insert("left".to_string(), Value::Integer(i64::from(region.left)));
        table.insert("top".to_string(), Value::Integer(i64::from(region.top)));
        table.insert("width".to_string(), Value::Integer(i64::from(region.width)));
        table.insert("height".to_string(), Value::Integer(i64::from(region.height)));
    }

    let text = toml::to_string(&doc).map_err(|source| ConfigError::Serialize { source })?;
    std::fs::write(path, text).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!("💾 Saved region {region} to {}", path.display());
    Ok(())
}

/// Read back the validated region of `path`.
pub fn load_region(path: impl AsRef<Path>) -> ConfigResult<Region> {
    let file = read_file_config(path.as_ref())?;
    region_from(&file.region)
}
