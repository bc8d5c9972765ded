// Copyright 2025 the Glyphweaver Authors
// SPDX-License-Identifier: Apache-2.0

//! Application settings and configuration constants.
//!
//! Fixed defaults live in the constant blocks at the top. `Settings` is the
//! runtime view, read from an optional TOML file; every field falls back to
//! the constants when it is missing.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// VIEWER SETTINGS
// ============================================================================
/// Glyphs shown per grid page
const VIEWER_PAGE_SIZE: usize = 100;

// ============================================================================
// HISTORY SETTINGS
// ============================================================================
/// Undo groups kept per font
const HISTORY_DEPTH: usize = 100;

/// Reorders closer together than this share one undo group (milliseconds).
///
/// Holding an arrow key fires a move per key repeat; without this every
/// repeat would be its own undo step.
const HISTORY_DEBOUNCE_MS: u64 = 200;

// ============================================================================
// EDITOR PANEL SETTINGS
// ============================================================================
/// The splitter never shrinks the editor panel to this width or below
const EDITOR_MIN_WIDTH: f64 = 400.0;

/// Editor panel width when first shown
const EDITOR_INITIAL_WIDTH: f64 = 600.0;

// ============================================================================
// CLIPBOARD SETTINGS
// ============================================================================
/// Units per em assumed for clipboard data that does not record one
const CLIPBOARD_FALLBACK_UNITS_PER_EM: f64 = 1024.0;

// ============================================================================
// PUBLIC API - Don't edit below this line unless you know what you're doing
// ============================================================================

/// Glyph grid defaults
pub mod viewer {
    pub const PAGE_SIZE: usize = super::VIEWER_PAGE_SIZE;
}

/// Undo history defaults
pub mod history {
    pub const DEPTH: usize = super::HISTORY_DEPTH;
    pub const DEBOUNCE_MS: u64 = super::HISTORY_DEBOUNCE_MS;
}

/// Editor panel defaults
pub mod editor {
    pub const MIN_WIDTH: f64 = super::EDITOR_MIN_WIDTH;
    pub const INITIAL_WIDTH: f64 = super::EDITOR_INITIAL_WIDTH;
}

/// Clipboard defaults
pub mod clipboard {
    pub const FALLBACK_UNITS_PER_EM: f64 = super::CLIPBOARD_FALLBACK_UNITS_PER_EM;
}

// ============================================================================
// RUNTIME SETTINGS
// ============================================================================

/// Failure reading the settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Runtime settings, loadable from TOML
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub viewer: ViewerSettings,
    pub history: HistorySettings,
    pub editor: EditorSettings,
    pub projects: ProjectSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    pub page_size: usize,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            page_size: viewer::PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    pub depth: usize,
    pub debounce_ms: u64,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            depth: history::DEPTH,
            debounce_ms: history::DEBOUNCE_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub min_width: f64,
    pub initial_width: f64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            min_width: editor::MIN_WIDTH,
            initial_width: editor::INITIAL_WIDTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSettings {
    /// Folder holding saved projects; `None` keeps projects in memory
    pub root: Option<PathBuf>,
}

impl Settings {
    /// Parse settings from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a TOML file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Read settings if a path is given, falling back to defaults on error
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::load(path) {
            Ok(settings) => {
                tracing::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                tracing::warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.viewer.page_size == 0 {
            return Err(SettingsError::Invalid(
                "viewer.page_size must be at least 1".to_string(),
            ));
        }
        if self.history.depth == 0 {
            return Err(SettingsError::Invalid(
                "history.depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn history_debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.history.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.viewer.page_size, 100);
        assert_eq!(settings.history_debounce().as_millis(), 200);
    }

    #[test]
    fn test_partial_file() {
        let settings = Settings::from_toml_str(
            r#"
            [viewer]
            page_size = 40

            [projects]
            root = "/tmp/fonts"
            "#,
        )
        .unwrap();
        assert_eq!(settings.viewer.page_size, 40);
        assert_eq!(settings.history.depth, 100);
        assert_eq!(settings.projects.root, Some(PathBuf::from("/tmp/fonts")));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = Settings::from_toml_str("[viewer]\npage_size = 0").unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load_or_default(Some(Path::new("/nonexistent/glyphweaver.toml")));
        assert_eq!(settings, Settings::default());
    }
}
