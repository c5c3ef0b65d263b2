//! Extraction completeness score.

use serde::{Deserialize, Serialize};

use crate::models::record::{ExtractedFields, VisualMarkers};

/// Presence of each scored input for one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldPresence {
    pub dealer: bool,
    pub model: bool,
    pub horse_power: bool,
    pub asset_cost: bool,
    pub stamp: bool,
    pub signature: bool,
}

impl FieldPresence {
    pub fn new(fields: &ExtractedFields, markers: &VisualMarkers) -> Self {
        Self {
            dealer: fields.dealer_name.is_some(),
            model: fields.model_name.is_some(),
            horse_power: fields.horse_power.is_some(),
            asset_cost: fields.asset_cost.is_some(),
            stamp: markers.stamp.present(),
            signature: markers.signature.present(),
        }
    }
}

/// Deductions applied for each missing input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceWeights {
    pub dealer: f64,
    pub model: f64,
    pub asset_cost: f64,
    pub horse_power: f64,
    pub stamp: f64,
    pub signature: f64,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            dealer: 0.30,
            model: 0.30,
            asset_cost: 0.30,
            horse_power: 0.10,
            stamp: 0.15,
            signature: 0.15,
        }
    }
}

impl ConfidenceWeights {
    /// Start at 1.0, subtract the weight of every missing input, floor at
    /// 0.0 and round to two decimals.
    pub fn score(&self, presence: FieldPresence) -> f64 {
        let deductions = [
            (presence.dealer, self.dealer),
            (presence.model, self.model),
            (presence.asset_cost, self.asset_cost),
            (presence.horse_power, self.horse_power),
            (presence.stamp, self.stamp),
            (presence.signature, self.signature),
        ];

        let confidence = deductions
            .iter()
            .filter(|(present, _)| !present)
            .fold(1.0f64, |conf, (_, weight)| conf - weight);

        round2(confidence.clamp(0.0, 1.0))
    }
}

/// Score a document with the default weights.
pub fn compute_confidence(
    dealer: Option<&str>,
    model: Option<&str>,
    horse_power: Option<u32>,
    asset_cost: Option<u64>,
    stamp_present: bool,
    signature_present: bool,
) -> f64 {
    ConfidenceWeights::default().score(FieldPresence {
        dealer: dealer.is_some(),
        model: model.is_some(),
        horse_power: horse_power.is_some(),
        asset_cost: asset_cost.is_some(),
        stamp: stamp_present,
        signature: signature_present,
    })
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
