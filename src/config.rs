use log::warn;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_DEBUG_INTERVAL: u64 = 0x10000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EmuConfig {
    /// Keep only this many instructions in the fault trace. Unset keeps all.
    pub trace_depth: Option<usize>,
    /// Instructions between CPU state lines when `--debug` is on.
    pub debug_interval: u64,
}

impl Default for EmuConfig {
    fn default() -> Self {
        Self {
            trace_depth: None,
            debug_interval: DEFAULT_DEBUG_INTERVAL,
        }
    }
}

pub fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("dmg-emu").join("config.toml");
        }
    }

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("dmg-emu").join("config.toml");
    }

    if let Some(home) = std::env::var_os("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join("dmg-emu")
            .join("config.toml");
    }

    PathBuf::from("config.toml")
}

pub fn load_from_file(path: &Path) -> EmuConfig {
    let text = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(_) => return EmuConfig::default(),
    };

    match toml::from_str::<EmuConfig>(&text) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(
                "Failed to parse config {}: {e}; using defaults",
                path.display()
            );
            EmuConfig::default()
        }
    }
}
