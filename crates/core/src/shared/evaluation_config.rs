use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::shared::constants::DEFAULT_CORRECT_SEGMENTATION_THRESHOLD;
use crate::shared::error::{ConfigError, ValidationError};
use crate::shared::pixel_class::{Palette, PixelClass, PixelSelector};

/// Knobs of a page evaluation.
///
/// Missing keys in a config file fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Pixels counted as a region's foreground while building vertices.
    pub foreground: PixelSelector,
    /// Class counted as matching inside a ground-truth/hypothesis overlap.
    pub matching_class: PixelClass,
    /// Fraction of a ground-truth region's foreground a one-to-one match
    /// must recover to count as a correct segmentation.
    pub correct_segmentation_threshold: f64,
    pub palette: Palette,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            foreground: PixelSelector::AnyForeground,
            matching_class: PixelClass::TruePositive,
            correct_segmentation_threshold: DEFAULT_CORRECT_SEGMENTATION_THRESHOLD,
            palette: Palette::default(),
        }
    }
}

impl EvaluationConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let threshold = self.correct_segmentation_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ValidationError::InvalidConfig(format!(
                "correct segmentation threshold {threshold} is outside [0, 1]"
            )));
        }
        if self.matching_class == PixelClass::Background {
            return Err(ValidationError::InvalidConfig(
                "background cannot be the matching class".into(),
            ));
        }
        // A matching pixel must also be a foreground pixel, or true
        // positives could exceed a region's foreground.
        if let PixelSelector::Class(class) = self.foreground {
            if class != self.matching_class {
                return Err(ValidationError::InvalidConfig(format!(
                    "foreground class {class} does not include matching class {}",
                    self.matching_class
                )));
            }
        }
        if self.palette.has_duplicate_colors() {
            return Err(ValidationError::InvalidConfig(
                "palette assigns one colour to several pixel classes".into(),
            ));
        }
        Ok(())
    }

    pub fn foreground_selector(&self) -> PixelSelector {
        self.foreground
    }

    pub fn matching_selector(&self) -> PixelSelector {
        PixelSelector::Class(self.matching_class)
    }
}
