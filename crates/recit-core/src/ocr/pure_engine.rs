//! Pure Rust OCR adapter using `pure-onnx-ocr`.

use std::sync::Arc;
use std::time::Instant;

use image::DynamicImage;
use tracing::{debug, info};

use crate::error::ExtractionError;
use crate::models::OcrConfig;

use super::TextExtractor;

/// Text extractor backed by `pure-onnx-ocr` (pure Rust, no external ONNX
/// Runtime). The engine is shared behind an `Arc` so recognition can run on
/// a blocking worker thread while the ingestion task suspends.
pub struct PureTextExtractor {
    engine: Arc<pure_onnx_ocr::engine::OcrEngine>,
    config: OcrConfig,
}

impl PureTextExtractor {
    /// Create an extractor from model files named in `config`.
    pub fn from_config(config: OcrConfig) -> Result<Self, ExtractionError> {
        let det_path = config.model_dir.join(&config.detection_model);
        let rec_path = config.model_dir.join(&config.recognition_model);
        let dict_path = config.model_dir.join(&config.dictionary);

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| ExtractionError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", config.model_dir.display());

        Ok(Self {
            engine: Arc::new(engine),
            config,
        })
    }

    /// Recognize one image, lines joined in reading order.
    fn recognize(
        engine: &pure_onnx_ocr::engine::OcrEngine,
        image: &DynamicImage,
        keep_unk: bool,
    ) -> Result<String, ExtractionError> {
        let results = engine
            .run_from_image(image)
            .map_err(|e| ExtractionError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        debug!("pure-onnx-ocr returned {} text regions", results.len());

        let mut lines: Vec<(i32, f32, String)> = results
            .iter()
            .map(|r| {
                let (x, y) = top_left(&r.bounding_box);
                let text = if keep_unk {
                    r.text.clone()
                } else {
                    r.text.replace("[UNK]", " ")
                };
                // Group rows by approximate vertical position
                ((y / 20.0) as i32, x, text)
            })
            .collect();

        lines.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then(a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        });

        Ok(lines
            .into_iter()
            .map(|(_, _, text)| text)
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

impl TextExtractor for PureTextExtractor {
    fn extract(
        &self,
        images: Vec<DynamicImage>,
    ) -> impl std::future::Future<Output = Result<String, ExtractionError>> + Send {
        let engine = Arc::clone(&self.engine);
        let keep_unk = self.config.keep_unk;

        async move {
            if images.is_empty() {
                return Err(ExtractionError::InvalidImage("empty image batch".to_string()));
            }

            let start = Instant::now();
            let page_count = images.len();

            let pages = tokio::task::spawn_blocking(move || {
                images
                    .iter()
                    .map(|image| Self::recognize(&engine, image, keep_unk))
                    .collect::<Result<Vec<_>, _>>()
            })
            .await
            .map_err(|e| ExtractionError::Worker(e.to_string()))??;

            info!(
                "Extracted text from {} image(s) in {}ms",
                page_count,
                start.elapsed().as_millis()
            );

            Ok(pages.join("\n"))
        }
    }
}

/// Top-left corner of a polygon's bounding box as (x, y).
fn top_left(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f32, f32) {
    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    for coord in polygon.exterior().coords() {
        min_x = min_x.min(coord.x as f32);
        min_y = min_y.min(coord.y as f32);
    }
    (min_x, min_y)
}
