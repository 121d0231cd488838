//! Overlay Configuration and Theme Management
//!
//! This module handles configuration settings, theme management,
//! color schemes, and OpenRouter model configuration for the command search overlay.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::host::FontStyle;
use crate::error::ConfigError;
use crate::llm::openrouter::DEFAULT_BASE_URL;

/// Environment variable overriding the configured model
pub const MODEL_ENV: &str = "KAI_SEARCH_MODEL";

/// OpenRouter model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenRouterConfig {
    pub model: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub base_url: String,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            model: "openai/gpt-4o-mini".to_string(),
            max_tokens: Some(256),
            temperature: Some(0.2),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Configuration for the command search overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub frame_color: String,
    pub text_color: String,
    pub background_color: String,
    pub theme_name: String,
    /// Rows reserved for the inline view zone, input line included
    pub zone_height: u16,
    pub shell: String,
    pub log_file: Option<PathBuf>,
    pub openrouter: OpenRouterConfig,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            frame_color: "DarkBlue".to_string(),
            text_color: "White".to_string(),
            background_color: "DarkGray".to_string(),
            theme_name: "default".to_string(),
            zone_height: 4,
            shell: "sh".to_string(),
            log_file: None,
            openrouter: OpenRouterConfig::default(),
        }
    }
}

impl OverlayConfig {
    /// Load configuration from `path`, or from the default location when it exists.
    ///
    /// A missing default file yields the defaults; an explicitly named file must exist.
    /// Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let parse_error = |source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        };
        let table: toml::Table = toml::from_str(&raw).map_err(parse_error)?;
        let mut config: Self = toml::Value::Table(table.clone())
            .try_into()
            .map_err(parse_error)?;
        config.resolve_theme(&table);
        debug!(path = %path.display(), theme = %config.theme_name, "loaded overlay configuration");
        Ok(config)
    }

    /// `$XDG_CONFIG_HOME/kai-search/config.toml` or the platform equivalent
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("kai-search").join("config.toml"))
    }

    /// Apply the named theme; colours set explicitly in the file win over it.
    fn resolve_theme(&mut self, table: &toml::Table) {
        if self.theme_name == "default" {
            return;
        }
        let explicit = |key: &str, value: &String| table.contains_key(key).then(|| value.clone());
        let frame = explicit("frame_color", &self.frame_color);
        let text = explicit("text_color", &self.text_color);
        let background = explicit("background_color", &self.background_color);

        let theme = self.theme_name.clone();
        self.apply_theme(&theme);

        if let Some(color) = frame {
            self.frame_color = color;
        }
        if let Some(color) = text {
            self.text_color = color;
        }
        if let Some(color) = background {
            self.background_color = color;
        }
    }

    /// `kai-search.log` under the platform cache directory
    pub fn default_log_path() -> Option<PathBuf> {
        dirs::cache_dir().map(|dir| dir.join("kai-search").join("kai-search.log"))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(model) = env::var(MODEL_ENV) {
            if !model.trim().is_empty() {
                self.openrouter.model = model;
            }
        }
    }

    /// Apply a theme by name
    pub fn apply_theme(&mut self, theme_name: &str) {
        match theme_name {
            "dark" => {
                self.frame_color = "Black".to_string();
                self.text_color = "Green".to_string();
                self.background_color = "Black".to_string();
            }
            "light" => {
                self.frame_color = "Gray".to_string();
                self.text_color = "Black".to_string();
                self.background_color = "White".to_string();
            }
            "ocean" => {
                self.frame_color = "Cyan".to_string();
                self.text_color = "White".to_string();
                self.background_color = "Blue".to_string();
            }
            "sunset" => {
                self.frame_color = "Magenta".to_string();
                self.text_color = "Yellow".to_string();
                self.background_color = "DarkGray".to_string();
            }
            _ => {
                self.frame_color = "DarkBlue".to_string();
                self.text_color = "White".to_string();
                self.background_color = "DarkGray".to_string();
            }
        }
        self.theme_name = theme_name.to_string();
    }

    /// Get frame color as Color
    pub fn get_frame_color(&self) -> Color {
        parse_color(&self.frame_color, Color::Blue)
    }

    /// Get text color as Color
    pub fn get_text_color(&self) -> Color {
        parse_color(&self.text_color, Color::White)
    }

    fn get_background_color(&self) -> Color {
        parse_color(&self.background_color, Color::DarkGray)
    }

    /// Style the view zone renders its suggestion and input text with
    pub fn font_style(&self) -> FontStyle {
        FontStyle {
            foreground: self.get_text_color(),
            background: self.get_background_color(),
            accent: self.get_frame_color(),
        }
    }
}

fn parse_color(name: &str, fallback: Color) -> Color {
    match name {
        "Black" => Color::Black,
        "White" => Color::White,
        "DarkBlue" | "Blue" => Color::Blue,
        "Cyan" => Color::Cyan,
        "Gray" => Color::Gray,
        "DarkGray" => Color::DarkGray,
        "Magenta" => Color::Magenta,
        "Green" => Color::Green,
        "Red" => Color::Red,
        "Yellow" => Color::Yellow,
        _ => fallback,
    }
}
