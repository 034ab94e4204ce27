//! Tuning values for the decorative effects.
//!
//! Stored as JSON in the platform config directory. Missing fields fall back
//! to the built-in defaults, so a settings file only needs the values it
//! overrides.

use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Default file name for settings storage.
const SETTINGS_FILE_NAME: &str = "settings.json";

/// Directory name under the platform config dir.
const APP_DIR_NAME: &str = "lab-portfolio";

/// Closest lattice spacing, in pixels, a settings file may ask for.
pub const MIN_SPACING: f32 = 0.5;

/// Tuning for the stippled map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSettings {
    /// Rendered dot diameter in pixels.
    pub particle_diameter: f32,
    /// Lattice spacing as a multiple of the diameter.
    pub density: f32,
    /// Range of per-sample base opacity.
    pub opacity_range: [f32; 2],
    /// Range of per-sample phase speed (radians per 60 Hz frame).
    pub speed_range: [f32; 2],
    /// Sine values below this make a sample fully transparent.
    pub flicker_threshold: f32,
    /// Angular speed of the colour wave, radians per second.
    pub color_speed: f32,
    /// Spatial frequency of the colour wave, radians per pixel.
    pub color_spatial_scale: f32,
    /// Four palette stops walked by the colour wave.
    pub palette: [[u8; 3]; 4],
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            particle_diameter: 2.0,
            density: 2.2,
            opacity_range: [0.45, 0.80],
            speed_range: [0.01, 0.04],
            flicker_threshold: -0.3,
            color_speed: 0.6,
            color_spatial_scale: 0.004,
            palette: [
                [31, 51, 34],   // deep phosphor
                [74, 95, 77],   // moss
                [211, 84, 0],   // signal orange
                [174, 192, 174], // pale grid
            ],
        }
    }
}

impl FieldSettings {
    /// Distance between lattice points in pixels.
    pub fn spacing(&self) -> f32 {
        self.particle_diameter * self.density
    }

    /// Rejects values that would stall sampling or invert a random range.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.particle_diameter.is_finite() && self.particle_diameter > 0.0) {
            return Err(format!(
                "particle_diameter must be positive, got {}",
                self.particle_diameter
            ));
        }
        if !(self.density.is_finite() && self.density > 0.0) {
            return Err(format!("density must be positive, got {}", self.density));
        }
        if self.spacing() < MIN_SPACING {
            return Err(format!(
                "lattice spacing {} is below the {} px minimum",
                self.spacing(),
                MIN_SPACING
            ));
        }
        check_range("opacity_range", self.opacity_range)?;
        if self.opacity_range[0] < 0.0 || self.opacity_range[1] > 1.0 {
            return Err(format!(
                "opacity_range must lie within [0, 1], got {:?}",
                self.opacity_range
            ));
        }
        check_range("speed_range", self.speed_range)?;
        let scalars = [
            ("flicker_threshold", self.flicker_threshold),
            ("color_speed", self.color_speed),
            ("color_spatial_scale", self.color_spatial_scale),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(format!("{} must be finite, got {}", name, value));
            }
        }
        Ok(())
    }
}

fn check_range(name: &str, [lo, hi]: [f32; 2]) -> Result<(), String> {
    if !(lo.is_finite() && hi.is_finite()) || lo > hi {
        return Err(format!("{} must be an ordered finite pair, got [{}, {}]", name, lo, hi));
    }
    Ok(())
}

/// Timing for the scripted text reveal, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealSettings {
    /// Inclusive range of the pause after a literal character.
    pub literal_delay_ms: [u64; 2],
    /// Pause after each phonetic key.
    pub key_delay_ms: u64,
    /// Pause between the last key and the commit.
    pub settle_ms: u64,
    /// Pause after the commit.
    pub commit_ms: u64,
    /// Caret blink period.
    pub caret_period_ms: u64,
}

impl Default for RevealSettings {
    fn default() -> Self {
        Self {
            literal_delay_ms: [20, 50],
            key_delay_ms: 30,
            settle_ms: 100,
            commit_ms: 120,
            caret_period_ms: 530,
        }
    }
}

/// Resource holding all effect tuning.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FxSettings {
    pub field: FieldSettings,
    pub reveal: RevealSettings,
}

impl FxSettings {
    /// Returns the platform-specific path for the settings file.
    ///
    /// - macOS: ~/Library/Application Support/lab-portfolio/
    /// - Linux: ~/.config/lab-portfolio/
    /// - Windows: %APPDATA%/lab-portfolio/
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push(APP_DIR_NAME);
            path.push(SETTINGS_FILE_NAME);
            path
        })
    }

    /// Parses settings from JSON text and checks their values.
    pub fn from_json(contents: &str) -> Result<Self, String> {
        let settings: Self = serde_json::from_str(contents)
            .map_err(|e| format!("Failed to parse settings: {}", e))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects values that would stall the field or the reveal.
    pub fn validate(&self) -> Result<(), String> {
        self.field
            .validate()
            .map_err(|e| format!("Invalid field settings: {}", e))?;
        let [lo, hi] = self.reveal.literal_delay_ms;
        if lo > hi {
            return Err(format!(
                "Invalid reveal settings: literal_delay_ms [{}, {}] is reversed",
                lo, hi
            ));
        }
        Ok(())
    }

    /// Reads settings from a file.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read settings file {:?}: {}", path, e))?;
        Self::from_json(&contents)
    }

    /// Loads settings from `path` (or the default location), falling back to
    /// defaults when the file is absent or invalid.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let resolved = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => {
                    warn!("Could not determine config directory, using default settings");
                    return Self::default();
                }
            },
        };

        if !resolved.exists() {
            info!("No settings file at {:?}, using defaults", resolved);
            return Self::default();
        }

        match Self::load_from(&resolved) {
            Ok(settings) => {
                info!("Loaded settings from {:?}", resolved);
                settings
            }
            Err(e) => {
                error!("{}", e);
                Self::default()
            }
        }
    }
}
