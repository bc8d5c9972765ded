// Copyright 2025 the Glyphweaver Authors
// SPDX-License-Identifier: Apache-2.0

//! Dialog settings, confirmation prompts and warnings.
//!
//! Each dialog the controller can open has a typed setting struct. Hosts
//! collect the values however they like (modal form, console prompt) and
//! hand back a validated struct; the parsing helpers here are shared so
//! every host accepts the same `$HEX` codepoint syntax.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Invalid dialog input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingError {
    #[error("start code must look like $E001, got '{0}'")]
    InvalidStartCode(String),

    #[error("'{0}' is not a valid codepoint (expected $XXXX)")]
    InvalidCodepoint(String),

    #[error("'{0}' is not a number")]
    InvalidNumber(String),
}

// ============================================================================
// GLYPH DIALOGS
// ============================================================================

/// Side bearing adjustment (`None` leaves that side alone)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdjustPosSetting {
    pub left_side_bearing: Option<f64>,
    pub right_side_bearing: Option<f64>,
}

/// Outline transform applied to every selected glyph
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustGlyphSetting {
    /// Flip upside down
    pub flip_vertical: bool,
    /// Mirror left to right
    pub mirror: bool,
    /// Uniform scale factor
    pub scale: Option<f64>,
    /// Fit the outline into the em box
    pub fit_em_box: bool,
    /// Inset used when fitting to the em box
    pub em_padding: f64,
}

impl Default for AdjustGlyphSetting {
    fn default() -> Self {
        Self {
            flip_vertical: false,
            mirror: false,
            scale: None,
            fit_em_box: false,
            em_padding: 50.0,
        }
    }
}

/// Per-glyph properties edited from the glyph settings dialog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphSetting {
    pub name: String,
    pub codepoints: Vec<char>,
    pub left_side_bearing: Option<f64>,
    pub right_side_bearing: Option<f64>,
}

/// Glyph search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindQuery {
    /// Glyphs mapped to any of these codepoints
    Unicode(Vec<char>),
    /// Glyphs whose name contains this text
    Name(String),
}

/// Sequential codepoint assignment, used by both the unicode and the
/// OSGame numbering dialogs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnicodeSetting {
    pub start: StartCode,
    pub generate_names: bool,
}

/// The OSGame dialog collects the same fields as the unicode dialog
pub type OsGameSetting = UnicodeSetting;

/// First codepoint of a sequential assignment, written as `$` + hex digits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartCode(pub u32);

impl FromStr for StartCode {
    type Err = SettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        parse_dollar_hex(s)
            .map(StartCode)
            .ok_or_else(|| SettingError::InvalidStartCode(s.to_string()))
    }
}

impl fmt::Display for StartCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:04X}", self.0)
    }
}

/// `$` followed by one or more hex digits, case-insensitive
fn parse_dollar_hex(s: &str) -> Option<u32> {
    let digits = s.strip_prefix('$')?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

/// Parse a comma-separated list such as `$41,$E001` into characters
pub fn parse_codepoint_list(s: &str) -> Result<Vec<char>, SettingError> {
    s.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            parse_dollar_hex(item)
                .and_then(char::from_u32)
                .ok_or_else(|| SettingError::InvalidCodepoint(item.to_string()))
        })
        .collect()
}

/// Format codepoints back into the `$XXXX,$YYYY` dialog syntax
pub fn format_codepoint_list(codepoints: &[char]) -> String {
    codepoints
        .iter()
        .map(|c| format!("${:04X}", *c as u32))
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse an optional number field; blank means "leave unchanged"
pub fn parse_optional_number(s: &str) -> Result<Option<f64>, SettingError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    s.parse::<f64>()
        .map(Some)
        .map_err(|_| SettingError::InvalidNumber(s.to_string()))
}

// ============================================================================
// PROJECT DIALOGS
// ============================================================================

/// Remote sync settings stored with a project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Font family name used on the remote side
    pub name: String,
    /// Endpoint to push to
    #[serde(default)]
    pub url: Option<String>,
    /// Push automatically after every save
    #[serde(default)]
    pub auto_sync: bool,
}

impl SyncConfig {
    /// Overlay the fields a user filled in onto the stored config
    pub fn merge(&mut self, update: SyncConfig) {
        if !update.name.is_empty() {
            self.name = update.name;
        }
        if update.url.is_some() {
            self.url = update.url;
        }
        self.auto_sync = update.auto_sync;
    }
}

/// What the sync dialog returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncChoice {
    /// Keep syncing with these settings
    Enable(SyncConfig),
    /// Turn sync off for the project
    Disable,
}

// ============================================================================
// PROMPTS AND WARNINGS
// ============================================================================

/// Yes/no questions the controller asks before destructive steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    /// The glyph editor has unsaved changes
    DiscardGlyphChanges,
    /// The font has unsaved changes
    DiscardProjectChanges,
    /// The glyph is compound and must be decomposed to edit it
    DecomposeCompound,
    /// A project failed to open; offer to remove it
    RemoveBrokenProject,
}

impl Prompt {
    pub fn message(self) -> &'static str {
        match self {
            Prompt::DiscardGlyphChanges => {
                "The current glyph has unsaved changes. Discard them?"
            }
            Prompt::DiscardProjectChanges => {
                "The current project has unsaved changes. Discard them?"
            }
            Prompt::DecomposeCompound => {
                "This is a compound glyph. Convert it to a simple glyph for editing? \
                 The original glyph is not changed."
            }
            Prompt::RemoveBrokenProject => {
                "The project could not be opened. Remove it from the project list?"
            }
        }
    }
}

/// Non-blocking notices shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    NoMatchingGlyph,
    DeleteProjectFailed,
    SaveFailed(String),
    SyncFailed(String),
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::NoMatchingGlyph => write!(f, "No matching glyph found"),
            Warning::DeleteProjectFailed => write!(f, "Failed to delete the project"),
            Warning::SaveFailed(reason) => write!(f, "Save failed: {reason}"),
            Warning::SyncFailed(reason) => write!(f, "Sync failed: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_code_parsing() {
        assert_eq!("$E001".parse::<StartCode>(), Ok(StartCode(0xE001)));
        assert_eq!("$21".parse::<StartCode>(), Ok(StartCode(0x21)));
        assert_eq!(" $ab ".parse::<StartCode>(), Ok(StartCode(0xAB)));
        assert!("E001".parse::<StartCode>().is_err());
        assert!("$".parse::<StartCode>().is_err());
        assert!("$G1".parse::<StartCode>().is_err());
        assert_eq!(StartCode(0xE001).to_string(), "$E001");
    }

    #[test]
    fn test_codepoint_list_round_trip() {
        let parsed = parse_codepoint_list("$41, $e001").unwrap();
        assert_eq!(parsed, vec!['A', '\u{E001}']);
        assert_eq!(format_codepoint_list(&parsed), "$0041,$E001");
        assert_eq!(parse_codepoint_list("").unwrap(), Vec::<char>::new());
        assert_eq!(
            parse_codepoint_list("$D800"),
            Err(SettingError::InvalidCodepoint("$D800".to_string()))
        );
    }

    #[test]
    fn test_optional_number() {
        assert_eq!(parse_optional_number(" "), Ok(None));
        assert_eq!(parse_optional_number("12.5"), Ok(Some(12.5)));
        assert!(parse_optional_number("wide").is_err());
    }

    #[test]
    fn test_sync_merge() {
        let mut config = SyncConfig {
            name: "Family".to_string(),
            url: Some("https://a".to_string()),
            auto_sync: false,
        };
        config.merge(SyncConfig {
            name: String::new(),
            url: None,
            auto_sync: true,
        });
        assert_eq!(config.name, "Family");
        assert_eq!(config.url.as_deref(), Some("https://a"));
        assert!(config.auto_sync);
    }
}
