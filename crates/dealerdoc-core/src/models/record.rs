//! Result records produced for each processed document.

use serde::{Deserialize, Serialize};

/// Business fields extracted from a document's recognized lines.
///
/// Every field is independently absent when no line qualified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    /// Dealer (seller) legal name, truncated after its legal suffix.
    pub dealer_name: Option<String>,

    /// Cleaned equipment model name.
    pub model_name: Option<String>,

    /// Rated power in HP.
    pub horse_power: Option<u32>,

    /// Total asset cost in whole currency units.
    pub asset_cost: Option<u64>,
}

impl ExtractedFields {
    /// Number of fields that were found.
    pub fn found_count(&self) -> usize {
        [
            self.dealer_name.is_some(),
            self.model_name.is_some(),
            self.horse_power.is_some(),
            self.asset_cost.is_some(),
        ]
        .iter()
        .filter(|found| **found)
        .count()
    }

    /// Names of fields that were not found, in record order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.dealer_name.is_none() {
            missing.push("dealer_name");
        }
        if self.model_name.is_none() {
            missing.push("model_name");
        }
        if self.horse_power.is_none() {
            missing.push("horse_power");
        }
        if self.asset_cost.is_none() {
            missing.push("asset_cost");
        }
        missing
    }
}

/// Axis-aligned rectangle in absolute image pixel coordinates.
///
/// Serialized as `[x1, y1, x2, y2]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u32; 4]", into = "[u32; 4]")]
pub struct Rectangle {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl Rectangle {
    /// Create a rectangle, normalizing the corners so that `x2 >= x1` and `y2 >= y1`.
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    /// Rectangle from a top-left corner and a size.
    pub fn from_origin_size(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }

    /// Shift the rectangle by an offset (ROI-local to image coordinates).
    pub fn translate(&self, dx: u32, dy: u32) -> Self {
        Self {
            x1: self.x1 + dx,
            y1: self.y1 + dy,
            x2: self.x2 + dx,
            y2: self.y2 + dy,
        }
    }
}

impl From<[u32; 4]> for Rectangle {
    fn from(coords: [u32; 4]) -> Self {
        Self::new(coords[0], coords[1], coords[2], coords[3])
    }
}

impl From<Rectangle> for [u32; 4] {
    fn from(rect: Rectangle) -> Self {
        [rect.x1, rect.y1, rect.x2, rect.y2]
    }
}

/// Outcome of a visual marker detector.
///
/// A bounding box exists exactly when the marker is present; the type
/// stores only the optional box so the two can never disagree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "DetectionRecord", try_from = "DetectionRecord")]
pub struct DetectionResult {
    bbox: Option<Rectangle>,
}

impl DetectionResult {
    /// A detected marker with its bounding box.
    pub fn found(bbox: Rectangle) -> Self {
        Self { bbox: Some(bbox) }
    }

    /// No marker detected.
    pub fn not_present() -> Self {
        Self { bbox: None }
    }

    pub fn present(&self) -> bool {
        self.bbox.is_some()
    }

    pub fn bbox(&self) -> Option<Rectangle> {
        self.bbox
    }
}

impl From<Option<Rectangle>> for DetectionResult {
    fn from(bbox: Option<Rectangle>) -> Self {
        Self { bbox }
    }
}

/// Wire shape of a detection: `{ "present": bool, "bbox": [..] | null }`.
#[derive(Serialize, Deserialize)]
struct DetectionRecord {
    present: bool,
    bbox: Option<Rectangle>,
}

impl From<DetectionResult> for DetectionRecord {
    fn from(result: DetectionResult) -> Self {
        Self {
            present: result.present(),
            bbox: result.bbox,
        }
    }
}

impl TryFrom<DetectionRecord> for DetectionResult {
    type Error = String;

    fn try_from(record: DetectionRecord) -> Result<Self, Self::Error> {
        if record.present != record.bbox.is_some() {
            return Err(format!(
                "detection present={} disagrees with bbox {:?}",
                record.present, record.bbox
            ));
        }
        Ok(Self { bbox: record.bbox })
    }
}

/// Stamp and signature detections for one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualMarkers {
    pub stamp: DetectionResult,
    pub signature: DetectionResult,
}

impl VisualMarkers {
    /// Both markers absent (used when the image could not be decoded).
    pub fn none() -> Self {
        Self::default()
    }
}

/// Per-document fields block, with the marker detections alongside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordFields {
    #[serde(flatten)]
    pub extracted: ExtractedFields,
    pub signature: DetectionResult,
    pub stamp: DetectionResult,
}

/// Complete result for one processed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Document identifier (usually the image file name).
    pub doc_id: String,

    /// Extracted fields and marker detections.
    pub fields: RecordFields,

    /// Completeness score in [0, 1], two decimals.
    pub confidence: f64,

    /// Wall-clock processing time in seconds, two decimals.
    pub processing_time_sec: f64,

    /// Estimated processing cost in USD.
    pub cost_estimate_usd: f64,
}

impl ResultRecord {
    pub fn markers(&self) -> VisualMarkers {
        VisualMarkers {
            stamp: self.fields.stamp,
            signature: self.fields.signature,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rectangle_serializes_as_array() {
        let rect = Rectangle::new(10, 20, 30, 40);
        assert_eq!(serde_json::to_string(&rect).unwrap(), "[10,20,30,40]");
    }

    #[test]
    fn test_rectangle_new_normalizes_corners() {
        let rect = Rectangle::new(30, 40, 10, 20);
        assert_eq!(rect, Rectangle::new(10, 20, 30, 40));
        assert_eq!(rect.width(), 20);
        assert_eq!(rect.height(), 20);
    }

    #[test]
    fn test_detection_wire_shape() {
        let found = DetectionResult::found(Rectangle::new(1, 2, 3, 4));
        assert_eq!(
            serde_json::to_value(found).unwrap(),
            serde_json::json!({ "present": true, "bbox": [1, 2, 3, 4] })
        );

        let absent = DetectionResult::not_present();
        assert_eq!(
            serde_json::to_value(absent).unwrap(),
            serde_json::json!({ "present": false, "bbox": null })
        );
    }

    #[test]
    fn test_detection_rejects_inconsistent_record() {
        let json = r#"{ "present": true, "bbox": null }"#;
        assert!(serde_json::from_str::<DetectionResult>(json).is_err());

        let json = r#"{ "present": false, "bbox": [1, 2, 3, 4] }"#;
        assert!(serde_json::from_str::<DetectionResult>(json).is_err());
    }

    #[test]
    fn test_record_fields_layout() {
        let record = ResultRecord {
            doc_id: "quote_01.png".to_string(),
            fields: RecordFields {
                extracted: ExtractedFields {
                    dealer_name: Some("SWARAJ TRACTORS PVT LTD".to_string()),
                    model_name: None,
                    horse_power: Some(45),
                    asset_cost: Some(650000),
                },
                signature: DetectionResult::not_present(),
                stamp: DetectionResult::found(Rectangle::new(600, 700, 680, 770)),
            },
            confidence: 0.55,
            processing_time_sec: 0.12,
            cost_estimate_usd: 0.002,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["fields"]["dealer_name"], "SWARAJ TRACTORS PVT LTD");
        assert_eq!(value["fields"]["model_name"], serde_json::Value::Null);
        assert_eq!(value["fields"]["stamp"]["bbox"], serde_json::json!([600, 700, 680, 770]));
        assert_eq!(value["fields"]["signature"]["present"], false);

        let back: ResultRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_missing_fields() {
        let fields = ExtractedFields {
            dealer_name: Some("AGRO MOTORS".to_string()),
            ..Default::default()
        };
        assert_eq!(fields.found_count(), 1);
        assert_eq!(fields.missing_fields(), vec!["model_name", "horse_power", "asset_cost"]);
    }
}
