// Application settings
// Loaded from ~/.config/gridbase/settings.json

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ai::AIProvider;

/// AI-specific settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AISettings {
    /// Selected AI provider
    pub provider: AIProvider,

    /// Model identifier (provider-specific)
    pub model: String,

    /// Custom endpoint for Local provider
    pub endpoint: Option<String>,
}

impl Default for AISettings {
    fn default() -> Self {
        Self {
            provider: AIProvider::default(),
            model: String::new(),
            endpoint: None,
        }
    }
}

impl AISettings {
    /// Model to use: the configured one, or the provider default
    pub fn effective_model(&self) -> String {
        if self.model.is_empty() {
            self.provider.default_model().to_string()
        } else {
            self.model.clone()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name given to a brand-new workspace's first sheet
    pub default_sheet_name: String,

    /// Write the native file after every mutation
    pub autosave: bool,

    /// Default row height for new views: "short" | "medium" | "tall"
    pub default_row_height: String,

    pub ai: AISettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_sheet_name: "Sheet 1".to_string(),
            autosave: true,
            default_row_height: "short".to_string(),
            ai: AISettings::default(),
        }
    }
}

impl Settings {
    /// Settings file path: ~/.config/gridbase/settings.json
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("gridbase").join("settings.json"))
    }

    /// Load settings, falling back to defaults on any problem.
    /// Missing fields take their default (forward compatible).
    pub fn load() -> Self {
        Self::path()
            .and_then(|p| fs::read_to_string(p).ok())
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) -> Result<(), String> {
        let path = Settings::path().ok_or("no config directory")?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(&path, json).map_err(|e| e.to_string())
    }
}
