//! Per-document orchestration: fields, markers, score and record.

use std::time::Instant;

use image::DynamicImage;
use tracing::{debug, info};

use crate::confidence::{round2, ConfidenceWeights, FieldPresence};
use crate::fields::{
    AssetCostExtractor, DealerNameExtractor, FieldExtractor, HorsePowerExtractor, ModelNameCleaner,
    ModelNameExtractor,
};
use crate::models::config::DealerDocConfig;
use crate::models::record::{ExtractedFields, RecordFields, ResultRecord, VisualMarkers};
use crate::ocr::LineCorpus;
use crate::vision::{SignatureDetector, StampDetector};

/// Runs extraction, detection and scoring for one document at a time.
///
/// Holds no per-document state; one processor serves a whole batch.
#[derive(Debug, Clone)]
pub struct DocumentProcessor {
    model: ModelNameExtractor,
    cleaner: ModelNameCleaner,
    horse_power: HorsePowerExtractor,
    asset_cost: AssetCostExtractor,
    dealer: DealerNameExtractor,
    weights: ConfidenceWeights,
    stamp: StampDetector,
    signature: SignatureDetector,
    cost_estimate_usd: f64,
}

impl DocumentProcessor {
    /// Build a processor from a full configuration.
    pub fn new(config: &DealerDocConfig) -> Self {
        let extraction = &config.extraction;
        Self {
            model: ModelNameExtractor::new(&extraction.model),
            cleaner: ModelNameCleaner::new(&extraction.model),
            horse_power: HorsePowerExtractor::new(extraction.horse_power.clone()),
            asset_cost: AssetCostExtractor::new(extraction.asset_cost.clone()),
            dealer: DealerNameExtractor::new(&extraction.dealer),
            weights: config.confidence.clone(),
            stamp: StampDetector::new(config.detection.stamp.clone()),
            signature: SignatureDetector::new(config.detection.signature.clone()),
            cost_estimate_usd: config.output.cost_estimate_usd,
        }
    }

    /// Override the confidence weights.
    pub fn with_weights(mut self, weights: ConfidenceWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Override the per-document cost estimate.
    pub fn with_cost_estimate(mut self, usd: f64) -> Self {
        self.cost_estimate_usd = usd;
        self
    }

    /// Run all four field extractors; the model name is cleaned.
    pub fn extract_fields(&self, corpus: &LineCorpus) -> ExtractedFields {
        let raw_model = self.model.extract(corpus);
        let fields = ExtractedFields {
            dealer_name: self.dealer.extract(corpus),
            model_name: self.cleaner.clean(raw_model.as_deref()),
            horse_power: self.horse_power.extract(corpus),
            asset_cost: self.asset_cost.extract(corpus),
        };

        debug!(
            "Extracted {}/4 fields, missing: {:?}",
            fields.found_count(),
            fields.missing_fields()
        );

        fields
    }

    /// Run both detectors; a missing image yields no markers.
    pub fn detect_markers(&self, image: Option<&DynamicImage>) -> VisualMarkers {
        match image {
            Some(image) => VisualMarkers {
                stamp: self.stamp.detect(image),
                signature: self.signature.detect(image),
            },
            None => VisualMarkers::none(),
        }
    }

    /// Confidence for already extracted fields and detected markers.
    pub fn score(&self, fields: &ExtractedFields, markers: &VisualMarkers) -> f64 {
        self.weights.score(FieldPresence::new(fields, markers))
    }

    /// Process one document, timing from now.
    pub fn process(&self, doc_id: &str, corpus: &LineCorpus, image: Option<&DynamicImage>) -> ResultRecord {
        self.process_since(Instant::now(), doc_id, corpus, image)
    }

    /// Process one document, timing from `started` (e.g. before recognition).
    pub fn process_since(
        &self,
        started: Instant,
        doc_id: &str,
        corpus: &LineCorpus,
        image: Option<&DynamicImage>,
    ) -> ResultRecord {
        let markers = self.detect_markers(image);
        self.assemble(started, doc_id, corpus, markers)
    }

    /// Build the record from a corpus and markers detected elsewhere.
    pub fn assemble(
        &self,
        started: Instant,
        doc_id: &str,
        corpus: &LineCorpus,
        markers: VisualMarkers,
    ) -> ResultRecord {
        let extracted = self.extract_fields(corpus);
        let confidence = self.score(&extracted, &markers);
        let processing_time_sec = round2(started.elapsed().as_secs_f64());

        info!(
            "Processed {}: {} lines, confidence {:.2}, {:.2}s",
            doc_id,
            corpus.len(),
            confidence,
            processing_time_sec
        );

        ResultRecord {
            doc_id: doc_id.to_string(),
            fields: RecordFields {
                extracted,
                signature: markers.signature,
                stamp: markers.stamp,
            },
            confidence,
            processing_time_sec,
            cost_estimate_usd: self.cost_estimate_usd,
        }
    }
}

impl Default for DocumentProcessor {
    fn default() -> Self {
        Self::new(&DealerDocConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{DetectionResult, Rectangle};
    use image::{Rgb, RgbImage};
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;
    use pretty_assertions::assert_eq;

    fn quotation() -> LineCorpus {
        LineCorpus::from_texts([
            "SWARAJ TRACTORS PVT LTD, NASHIK",
            "Quotation",
            "MAHINDRA 575 DI XP PLUS TRACTOR",
            "Engine 47 HP",
            "Total: Rs. 7,45,000/-",
        ])
    }

    #[test]
    fn test_extract_fields() {
        let fields = DocumentProcessor::default().extract_fields(&quotation());
        assert_eq!(
            fields,
            ExtractedFields {
                dealer_name: Some("SWARAJ TRACTORS PVT LTD".to_string()),
                model_name: Some("MAHINDRA 575 DI XP PLUS".to_string()),
                horse_power: Some(47),
                asset_cost: Some(745_000),
            }
        );
    }

    #[test]
    fn test_process_without_image() {
        let record = DocumentProcessor::default().process("q1.png", &quotation(), None);

        assert_eq!(record.doc_id, "q1.png");
        assert_eq!(record.markers(), VisualMarkers::none());
        assert_eq!(record.confidence, 0.70);
        assert_eq!(record.cost_estimate_usd, 0.002);
        assert!(record.processing_time_sec >= 0.0);
    }

    #[test]
    fn test_process_empty_document() {
        let record = DocumentProcessor::default().process("blank", &LineCorpus::default(), None);
        assert_eq!(record.fields.extracted, ExtractedFields::default());
        assert_eq!(record.confidence, 0.0);
    }

    #[test]
    fn test_process_with_stamp() {
        let mut img = RgbImage::from_pixel(500, 500, Rgb([255, 255, 255]));
        draw_filled_rect_mut(&mut img, Rect::at(400, 400).of_size(60, 60), Rgb([0, 0, 120]));
        let img = DynamicImage::ImageRgb8(img);

        let record = DocumentProcessor::default().process("q2", &quotation(), Some(&img));

        assert_eq!(
            record.fields.stamp,
            DetectionResult::found(Rectangle::new(400, 400, 460, 460))
        );
        assert!(!record.fields.signature.present());
        assert_eq!(record.confidence, 0.85);
    }

    #[test]
    fn test_config_overrides() {
        let mut config = DealerDocConfig::default();
        config.output.cost_estimate_usd = 0.01;
        config.extraction.horse_power.max = 40;

        let record = DocumentProcessor::new(&config).process("q3", &quotation(), None);
        assert_eq!(record.fields.extracted.horse_power, None);
        assert_eq!(record.cost_estimate_usd, 0.01);
    }

    #[test]
    fn test_builder_overrides() {
        let processor = DocumentProcessor::default()
            .with_weights(ConfidenceWeights {
                stamp: 0.0,
                signature: 0.0,
                ..Default::default()
            })
            .with_cost_estimate(0.0);

        let record = processor.process("q4", &quotation(), None);
        assert_eq!(record.confidence, 1.0);
        assert_eq!(record.cost_estimate_usd, 0.0);
    }

    #[test]
    fn test_record_json_shape() {
        let record = DocumentProcessor::default().process("q5", &LineCorpus::default(), None);
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["fields"]["dealer_name"], serde_json::Value::Null);
        assert_eq!(value["fields"]["stamp"]["present"], false);
        assert_eq!(value["fields"]["stamp"]["bbox"], serde_json::Value::Null);
        assert_eq!(value["cost_estimate_usd"], 0.002);
    }
}
