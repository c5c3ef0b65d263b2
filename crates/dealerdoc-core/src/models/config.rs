//! Configuration structures for the quotation pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::confidence::ConfidenceWeights;
use crate::error::{DealerDocError, Result};
use crate::fields::{AssetCostRules, DealerNameRules, HorsePowerRules, ModelNameRules};
use crate::vision::{SignatureConfig, StampConfig};

/// Main configuration for the dealerdoc pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DealerDocConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Field extraction rule tables.
    pub extraction: ExtractionConfig,

    /// Confidence deductions.
    pub confidence: ConfidenceWeights,

    /// Stamp and signature detector parameters.
    pub detection: DetectionConfig,

    /// Model configuration.
    pub models: ModelConfig,

    /// Result record settings.
    pub output: OutputConfig,
}

/// OCR engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Keep `[UNK]` tokens in recognized text instead of blanking them.
    pub keep_unk: bool,

    /// Drop lines whose recognition confidence is below this (0.0 - 1.0).
    pub min_line_confidence: f32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            keep_unk: false,
            min_line_confidence: 0.0, // CTC scores run low; keep everything
        }
    }
}

/// Field extraction rule tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub model: ModelNameRules,
    pub horse_power: HorsePowerRules,
    pub asset_cost: AssetCostRules,
    pub dealer: DealerNameRules,
}

/// Visual marker detection configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub stamp: StampConfig,
    pub signature: SignatureConfig,
}

/// Model file paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
        }
    }
}

/// Result record settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Flat per-document cost reported in every record.
    pub cost_estimate_usd: f64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            cost_estimate_usd: 0.002,
        }
    }
}

impl DealerDocConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings no document could satisfy.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(DealerDocError::Config(msg));

        for (name, roi) in [
            ("detection.stamp.roi", &self.detection.stamp.roi),
            ("detection.signature.roi", &self.detection.signature.roi),
        ] {
            if !roi.is_valid() {
                return invalid(format!("{} must satisfy 0 <= top < bottom <= 1 and 0 <= left < right <= 1", name));
            }
        }

        let hp = &self.extraction.horse_power;
        if hp.min > hp.max {
            return invalid(format!("extraction.horse_power: min {} > max {}", hp.min, hp.max));
        }

        let cost = &self.extraction.asset_cost;
        if cost.min_digits > cost.max_digits {
            return invalid(format!(
                "extraction.asset_cost: min_digits {} > max_digits {}",
                cost.min_digits, cost.max_digits
            ));
        }
        if cost.min_value > cost.max_value {
            return invalid(format!(
                "extraction.asset_cost: min_value {} > max_value {}",
                cost.min_value, cost.max_value
            ));
        }

        if !(0.0..=1.0).contains(&self.ocr.min_line_confidence) {
            return invalid(format!(
                "ocr.min_line_confidence must be in [0, 1], got {}",
                self.ocr.min_line_confidence
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = DealerDocConfig::default();
        assert_eq!(config.output.cost_estimate_usd, 0.002);
        assert_eq!(config.extraction.horse_power.min, 20);
        assert_eq!(config.detection.stamp.min_area, 1000.0);
        assert_eq!(config.models.model_dir, PathBuf::from("models"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: DealerDocConfig =
            serde_json::from_str(r#"{"output": {"cost_estimate_usd": 0.01}, "extraction": {"horse_power": {"max": 90}}}"#)
                .unwrap();
        assert_eq!(config.output.cost_estimate_usd, 0.01);
        assert_eq!(config.extraction.horse_power.max, 90);
        assert_eq!(config.extraction.horse_power.min, 20);
        assert_eq!(config.ocr, OcrConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = DealerDocConfig::default();
        config.ocr.keep_unk = true;
        config.save(&path).unwrap();

        assert_eq!(DealerDocConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_validate_rejects_bad_roi() {
        let mut config = DealerDocConfig::default();
        config.detection.stamp.roi.top = 1.0;
        assert!(matches!(config.validate(), Err(DealerDocError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_inverted_ranges() {
        let mut config = DealerDocConfig::default();
        config.extraction.asset_cost.min_value = 3_000_000;
        assert!(config.validate().is_err());

        let mut config = DealerDocConfig::default();
        config.extraction.horse_power.min = 200;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_rejects_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"ocr": {"min_line_confidence": 2.0}}"#).unwrap();
        assert!(DealerDocConfig::from_file(&path).is_err());

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(DealerDocConfig::from_file(&path), Err(DealerDocError::Json(_))));
    }
}
