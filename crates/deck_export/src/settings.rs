//! Export settings
//!
//! Loaded from a JSON file; every field has a default so partial files work.

use crate::drawers::DrawOptions;
use crate::error::Result;
use crate::pdf::PdfExportOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSettings {
    #[serde(default)]
    pub pdf: PdfExportOptions,
    /// How many elements of a slide are prepared at the same time
    #[serde(default = "default_prefetch_concurrency")]
    pub prefetch_concurrency: usize,
    #[serde(default = "default_true")]
    pub draw_video_placeholders: bool,
}

fn default_prefetch_concurrency() -> usize {
    8
}

fn default_true() -> bool {
    true
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            pdf: PdfExportOptions::default(),
            prefetch_concurrency: default_prefetch_concurrency(),
            draw_video_placeholders: true,
        }
    }
}

impl ExportSettings {
    pub fn draw_options(&self) -> DrawOptions {
        DrawOptions {
            video_placeholders: self.draw_video_placeholders,
        }
    }
}

/// Settings manager for loading and saving export settings
pub struct SettingsManager {
    settings_path: PathBuf,
    current: ExportSettings,
}

impl SettingsManager {
    pub fn new(settings_path: impl Into<PathBuf>) -> Self {
        Self {
            settings_path: settings_path.into(),
            current: ExportSettings::default(),
        }
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Load settings from disk, or use defaults if the file doesn't exist
    pub fn load_sync(&mut self) -> Result<&ExportSettings> {
        if self.settings_path.exists() {
            let content = std::fs::read_to_string(&self.settings_path)?;
            match serde_json::from_str::<ExportSettings>(&content) {
                Ok(settings) => {
                    self.current = settings;
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse settings file {}, using defaults: {}",
                        self.settings_path.display(),
                        e
                    );
                    self.current = ExportSettings::default();
                }
            }
        } else {
            self.current = ExportSettings::default();
        }
        Ok(&self.current)
    }

    /// Save current settings to disk
    pub fn save_sync(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.current)?;
        std::fs::write(&self.settings_path, content)?;
        Ok(())
    }

    pub fn get(&self) -> &ExportSettings {
        &self.current
    }

    /// Replace the settings and save them
    pub fn update_sync(&mut self, settings: ExportSettings) -> Result<()> {
        self.current = settings;
        self.save_sync()
    }
}
