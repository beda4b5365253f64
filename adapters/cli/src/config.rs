use std::{fs, path::Path};

use anyhow::{Context, Result};
use maze_runner_world::RuntimeConfig;

/// Loads the runtime configuration, falling back to defaults without a file.
pub(crate) fn load(path: Option<&Path>) -> Result<RuntimeConfig> {
    let Some(path) = path else {
        return Ok(RuntimeConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid config file {}", path.display()))
}

fn parse(contents: &str) -> Result<RuntimeConfig> {
    let config: RuntimeConfig = toml::from_str(contents).context("failed to parse TOML")?;
    config.validate()?;
    Ok(config)
}
