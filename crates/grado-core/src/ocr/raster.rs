//! Image OCR backed by `pure-onnx-ocr`.

use std::path::Path;

use ::image::GenericImageView;
use tracing::{debug, info};

use super::TextDetector;
use crate::error::OcrError;
use crate::models::config::OcrConfig;

/// OCR engine for scanned images (pure Rust, no external ONNX Runtime).
pub struct ImageTextDetector {
    engine: pure_onnx_ocr::engine::OcrEngine,
    keep_unk: bool,
}

impl ImageTextDetector {
    /// Create a detector from model files in a directory.
    pub fn from_dir(model_dir: &Path, config: &OcrConfig) -> Result<Self, OcrError> {
        let det_path = model_dir.join("det.onnx");
        let rec_path = model_dir.join("latin_rec.onnx");
        let dict_path = model_dir.join("latin_dict.txt");

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", model_dir.display());

        Ok(Self {
            engine,
            keep_unk: config.keep_unk,
        })
    }

    /// Create a detector when `config.model_dir` is set.
    pub fn from_config(config: &OcrConfig) -> Result<Option<Self>, OcrError> {
        match &config.model_dir {
            Some(dir) => Self::from_dir(dir, config).map(Some),
            None => Ok(None),
        }
    }
}

impl TextDetector for ImageTextDetector {
    fn detect_lines(&self, data: &[u8]) -> Result<Vec<String>, OcrError> {
        let image = ::image::load_from_memory(data)
            .map_err(|e| OcrError::Detection(format!("cannot decode image: {}", e)))?;
        let (width, height) = image.dimensions();
        debug!("Running OCR on {}x{} image", width, height);

        let results = self
            .engine
            .run_from_image(&image)
            .map_err(|e| OcrError::Detection(format!("pure-onnx-ocr: {}", e)))?;

        let lines = results
            .iter()
            .map(|r| {
                if self.keep_unk {
                    r.text.clone()
                } else {
                    r.text.replace("[UNK]", " ")
                }
            })
            .collect::<Vec<_>>();

        debug!("pure-onnx-ocr returned {} text regions", lines.len());
        Ok(lines)
    }
}
