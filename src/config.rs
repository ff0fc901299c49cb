use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

/// Size of one caption line in canvas pixels. Deliberately not
/// configurable; both caption anchors assume it.
pub const CAPTION_PX: f32 = 48.0;

/// Caption outline thickness in canvas pixels.
pub const OUTLINE_PX: i32 = 2;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Configuration {
    /// Fixed drawing surface width in pixels.
    pub canvas_width: u32,
    /// Fixed drawing surface height in pixels.
    pub canvas_height: u32,
    /// Caption font selection.
    pub font: FontConfig,
    /// Speech read-back options.
    pub speech: SpeechOptions,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FontConfig {
    /// Explicit font file to use for captions. Takes precedence over
    /// `family` when set.
    pub path: Option<PathBuf>,
    /// Family name looked up in the system font database.
    pub family: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SpeechOptions {
    /// Slider level 0-100 mapped to an utterance volume multiplier.
    pub volume_level: u8,
    /// Preferred voice name; the first available voice is used when unset
    /// or not offered by the host engine.
    pub voice: Option<String>,
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(self) -> Result<Self> {
        ensure!(self.canvas_width > 0, "canvas-width must be positive");
        ensure!(self.canvas_height > 0, "canvas-height must be positive");
        ensure!(
            self.speech.volume_level <= 100,
            "speech.volume-level must be between 0 and 100"
        );
        if let Some(path) = &self.font.path {
            ensure!(
                path.is_file(),
                "font.path {} must point to a file",
                path.display()
            );
        }
        Ok(self)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 600,
            font: FontConfig::default(),
            speech: SpeechOptions::default(),
        }
    }
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: None,
            family: "Impact".to_string(),
        }
    }
}

impl Default for SpeechOptions {
    fn default() -> Self {
        Self {
            volume_level: 100,
            voice: None,
        }
    }
}

impl Configuration {
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_yaml_file(p)
                .with_context(|| format!("loading config from {}", p.display()))?
                .validated()
                .context("validating configuration"),
            None => Ok(Self::default()),
        }
    }
}
