use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::board::{FontSettings, FontStyle, MAX_FONT_SIZE, MIN_FONT_SIZE, TeamColors};
use crate::drawing::parse_hex_color;
use crate::formation::Formation;

pub const CONFIG_ENV_VAR: &str = "TACTICAL_BOARD_CONFIG";
#[cfg(target_arch = "wasm32")]
const STORAGE_KEY: &str = "tactical-board-config";

const DEFAULT_HOME_COLOR: &str = "#3b82f6";
const DEFAULT_AWAY_COLOR: &str = "#ef4444";
const DEFAULT_FONT_SIZE: f32 = 14.0;

/// User settings, read once at startup. Every field has a default so a
/// partial file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub home_color: String,
    pub away_color: String,
    pub font_size: f32,
    pub font_style: FontStyle,
    /// TrueType/OpenType file for labels. System fonts are probed when unset.
    pub font_path: Option<PathBuf>,
    pub home_formation: Formation,
    pub away_formation: Formation,
    /// Where PNG exports go. Defaults to the working directory.
    pub export_dir: Option<PathBuf>,
    pub ocr: OcrConfig,
    pub lineup: LineupConfig,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            home_color: DEFAULT_HOME_COLOR.to_string(),
            away_color: DEFAULT_AWAY_COLOR.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            font_style: FontStyle::Normal,
            font_path: None,
            home_formation: Formation::F442,
            away_formation: Formation::F433,
            export_dir: None,
            ocr: OcrConfig::default(),
            lineup: LineupConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Looked up on `PATH` when unset.
    pub tesseract_path: Option<PathBuf>,
    pub language: String,
    pub page_segmentation_mode: u8,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_path: None,
            language: "eng".to_string(),
            page_segmentation_mode: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineupConfig {
    /// Seed for positions of players found as number/name pairs.
    pub layout_seed: u64,
    pub overlay_names_on_reference: bool,
}

impl Default for LineupConfig {
    fn default() -> Self {
        Self {
            layout_seed: 42,
            overlay_names_on_reference: false,
        }
    }
}

impl BoardConfig {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid board configuration")
    }

    /// Reads `path`, falling back to defaults when it is missing or broken.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            log::info!("no config at {}, using defaults", path.display());
            return Self::default();
        }

        let loaded = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))
            .and_then(|json| Self::parse(&json));
        match loaded {
            Ok(config) => {
                log::info!("loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{e:#}; using defaults");
                Self::default()
            }
        }
    }

    /// `$TACTICAL_BOARD_CONFIG`, else `<config dir>/tactical-board/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("tactical-board").join("config.json"))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = web_sys::window()
            .and_then(|window| window.local_storage().ok().flatten())
            .and_then(|storage| storage.get_item(STORAGE_KEY).ok().flatten());
        match stored.map(|json| Self::parse(&json)) {
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                log::warn!("{e:#}; using defaults");
                Self::default()
            }
            None => Self::default(),
        }
    }

    pub fn team_colors(&self) -> TeamColors {
        TeamColors {
            home: color_or_default(&self.home_color, DEFAULT_HOME_COLOR),
            away: color_or_default(&self.away_color, DEFAULT_AWAY_COLOR),
        }
    }

    pub fn font_settings(&self) -> FontSettings {
        let size = if self.font_size.is_finite() {
            self.font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
        } else {
            DEFAULT_FONT_SIZE
        };
        FontSettings {
            size,
            style: self.font_style,
        }
    }
}

fn color_or_default(text: &str, default: &str) -> [f32; 4] {
    parse_hex_color(text)
        .or_else(|| {
            log::warn!("invalid colour {text:?}, using {default}");
            parse_hex_color(default)
        })
        .unwrap_or([1.0, 1.0, 1.0, 1.0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = BoardConfig::load_from(&dir.path().join("config.json"));
        assert_eq!(config, BoardConfig::default());
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        assert_eq!(BoardConfig::load_from(file.path()), BoardConfig::default());
    }

    #[test]
    fn test_partial_file_overrides_named_fields() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br##"{
                "away_color": "#22c55e",
                "font_style": "bold-italic",
                "home_formation": "3-5-2",
                "ocr": { "page_segmentation_mode": 6 },
                "lineup": { "overlay_names_on_reference": true }
            }"##,
        )
        .unwrap();

        let config = BoardConfig::load_from(file.path());
        assert_eq!(config.away_color, "#22c55e");
        assert_eq!(config.home_color, DEFAULT_HOME_COLOR);
        assert_eq!(config.font_style, FontStyle::BoldItalic);
        assert_eq!(config.home_formation, Formation::F352);
        assert_eq!(config.away_formation, Formation::F433);
        assert_eq!(config.ocr.page_segmentation_mode, 6);
        assert_eq!(config.ocr.language, "eng");
        assert!(config.lineup.overlay_names_on_reference);
        assert_eq!(config.lineup.layout_seed, 42);
    }

    #[test]
    fn test_invalid_color_falls_back_to_team_default() {
        let config = BoardConfig {
            home_color: "blue".to_string(),
            ..BoardConfig::default()
        };
        let colors = config.team_colors();
        assert_eq!(Some(colors.home), parse_hex_color(DEFAULT_HOME_COLOR));
        assert_eq!(Some(colors.away), parse_hex_color(DEFAULT_AWAY_COLOR));
    }

    #[test]
    fn test_font_size_is_clamped() {
        let config = BoardConfig {
            font_size: 60.0,
            ..BoardConfig::default()
        };
        assert_eq!(config.font_settings().size, MAX_FONT_SIZE);
    }
}
