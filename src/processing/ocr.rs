use std::io::Write;

use log::{debug, warn};
use tempfile::NamedTempFile;
use tesseract::{OcrEngineMode, PageSegMode, Tesseract};

use crate::models::{RawRecognition, RecognitionCandidate};
use crate::processing::image::ImageVariant;
use crate::utils::MenuError;

/// Characters the engines are allowed to emit.
pub const CHAR_WHITELIST: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789$.,()-/&'";

/// Page segmentation / engine mode pairing for one recognizer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub id: usize,
    pub label: &'static str,
    pub psm: u32,
    pub oem: u32,
}

impl EngineConfig {
    pub fn standard_engines() -> Vec<EngineConfig> {
        vec![
            EngineConfig {
                id: 0,
                label: "general block",
                psm: 6,
                oem: 3,
            },
            EngineConfig {
                id: 1,
                label: "single uniform block",
                psm: 6,
                oem: 1,
            },
            EngineConfig {
                id: 2,
                label: "fully automatic",
                psm: 3,
                oem: 3,
            },
        ]
    }

    fn page_seg_mode(&self) -> PageSegMode {
        match self.psm {
            3 => PageSegMode::PsmAuto,
            4 => PageSegMode::PsmSingleColumn,
            6 => PageSegMode::PsmSingleBlock,
            7 => PageSegMode::PsmSingleLine,
            8 => PageSegMode::PsmSingleWord,
            11 => PageSegMode::PsmSparseText,
            _ => PageSegMode::PsmAuto,
        }
    }

    fn engine_mode(&self) -> OcrEngineMode {
        match self.oem {
            0 => OcrEngineMode::TesseractOnly,
            1 => OcrEngineMode::LstmOnly,
            2 => OcrEngineMode::TesseractLstmCombined,
            _ => OcrEngineMode::Default,
        }
    }
}

/// Anything that can turn one image variant into text under one engine configuration.
pub trait TextRecognizer: Send + Sync {
    fn recognize(
        &self,
        variant: &ImageVariant,
        engine: &EngineConfig,
    ) -> Result<RawRecognition, MenuError>;
}

/// Tesseract-backed recognizer. A fresh engine is created per call.
pub struct TesseractRecognizer {
    language: String,
    datapath: Option<String>,
}

impl TesseractRecognizer {
    pub fn new(language: &str, datapath: Option<&str>) -> Self {
        TesseractRecognizer {
            language: language.to_string(),
            datapath: datapath.map(|s| s.to_string()),
        }
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(
        &self,
        variant: &ImageVariant,
        engine: &EngineConfig,
    ) -> Result<RawRecognition, MenuError> {
        let png = variant.to_png()?;

        let mut temp_file = tempfile::Builder::new()
            .suffix(".png")
            .tempfile()
            .map_err(|e| MenuError::OcrEngineError(format!("Failed to create temp file: {}", e)))?;
        temp_file
            .write_all(&png)
            .map_err(|e| MenuError::OcrEngineError(format!("Failed to write temp file: {}", e)))?;
        let path = temp_path(&temp_file)?;

        let mut tess = Tesseract::new_with_oem(
            self.datapath.as_deref(),
            Some(&self.language),
            engine.engine_mode(),
        )
        .map_err(|e| MenuError::OcrEngineError(format!("Tesseract init error: {}", e)))?
        .set_variable("tessedit_char_whitelist", CHAR_WHITELIST)
        .map_err(|e| MenuError::OcrEngineError(format!("Tesseract set variable error: {}", e)))?
        .set_variable("preserve_interword_spaces", "1")
        .map_err(|e| MenuError::OcrEngineError(format!("Tesseract set variable error: {}", e)))?;

        tess.set_page_seg_mode(engine.page_seg_mode());

        let mut tess = tess
            .set_image(&path)
            .map_err(|e| MenuError::OcrEngineError(format!("Tesseract set image error: {}", e)))?;

        let text = tess
            .get_text()
            .map_err(|e| MenuError::OcrEngineError(format!("Tesseract error: {}", e)))?;
        let confidence = (tess.mean_text_conf() as f64 / 100.0).clamp(0.0, 1.0);

        Ok(RawRecognition { text, confidence })
    }
}

fn temp_path(file: &NamedTempFile) -> Result<String, MenuError> {
    file.path()
        .to_str()
        .map(|s| s.to_string())
        .ok_or_else(|| MenuError::OcrEngineError("Failed to convert path to string".to_string()))
}

/// Runs every (engine, variant) pair and collects the successes.
pub struct MultiEngineRecognizer {
    recognizer: Box<dyn TextRecognizer>,
    engines: Vec<EngineConfig>,
}

impl MultiEngineRecognizer {
    pub fn new(recognizer: Box<dyn TextRecognizer>) -> Self {
        Self::with_engines(recognizer, EngineConfig::standard_engines())
    }

    pub fn with_engines(recognizer: Box<dyn TextRecognizer>, engines: Vec<EngineConfig>) -> Self {
        MultiEngineRecognizer { recognizer, engines }
    }

    pub fn engines(&self) -> &[EngineConfig] {
        &self.engines
    }

    /// Single failures are logged and skipped; only a total wipeout is an error.
    pub fn recognize_all(
        &self,
        variants: &[ImageVariant],
    ) -> Result<Vec<RecognitionCandidate>, MenuError> {
        let mut candidates = Vec::new();
        let mut last_error = None;

        for engine in &self.engines {
            for variant in variants {
                match self.recognizer.recognize(variant, engine) {
                    Ok(raw) => {
                        debug!(
                            "Engine {} ({}) on variant {} ({}): {} chars, confidence {:.2}",
                            engine.id,
                            engine.label,
                            variant.id,
                            variant.profile,
                            raw.text.len(),
                            raw.confidence
                        );
                        candidates.push(RecognitionCandidate {
                            text: raw.text,
                            confidence: raw.confidence.clamp(0.0, 1.0),
                            engine_id: engine.id,
                            variant_id: variant.id,
                        });
                    }
                    Err(e) => {
                        warn!("Engine {}, variant {} failed: {}", engine.id, variant.id, e);
                        last_error = Some(e);
                    }
                }
            }
        }

        if candidates.is_empty() {
            let attempts = self.engines.len() * variants.len();
            let reason = match last_error {
                Some(e) => format!(
                    "all {} engine/variant combinations failed, last: {}",
                    attempts, e
                ),
                None => format!("no engine/variant combinations to run ({} attempts)", attempts),
            };
            return Err(MenuError::RecognitionExhaustedError(reason));
        }

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct ScriptedRecognizer {
        calls: Arc<AtomicUsize>,
        fail_engine: Option<usize>,
    }

    impl TextRecognizer for ScriptedRecognizer {
        fn recognize(
            &self,
            variant: &ImageVariant,
            engine: &EngineConfig,
        ) -> Result<RawRecognition, MenuError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_engine.map_or(true, |id| id == engine.id) {
                return Err(MenuError::OcrEngineError("boom".to_string()));
            }
            Ok(RawRecognition {
                text: format!("engine {} variant {}", engine.id, variant.id),
                confidence: 1.4,
            })
        }
    }

    fn variants(n: usize) -> Vec<ImageVariant> {
        (0..n)
            .map(|id| ImageVariant {
                id,
                profile: "test",
                image: GrayImage::from_pixel(4, 4, Luma([255])),
            })
            .collect()
    }

    #[test]
    fn test_single_engine_failure_is_skipped() {
        let calls = Arc::new(AtomicUsize::new(0));
        let recognizer = MultiEngineRecognizer::new(Box::new(ScriptedRecognizer {
            calls: calls.clone(),
            fail_engine: Some(1),
        }));

        let candidates = recognizer.recognize_all(&variants(3)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 9);
        assert_eq!(candidates.len(), 6);
        assert!(candidates.iter().all(|c| c.engine_id != 1));
        assert!(candidates.iter().all(|c| c.confidence == 1.0));
    }

    #[test]
    fn test_total_failure_is_exhausted() {
        let recognizer = MultiEngineRecognizer::new(Box::new(ScriptedRecognizer {
            calls: Arc::new(AtomicUsize::new(0)),
            fail_engine: None,
        }));

        let err = recognizer.recognize_all(&variants(3)).unwrap_err();
        assert!(matches!(err, MenuError::RecognitionExhaustedError(_)));
    }

    #[test]
    fn test_standard_engine_table() {
        let engines = EngineConfig::standard_engines();
        assert_eq!(engines.len(), 3);
        assert_eq!((engines[0].psm, engines[0].oem), (6, 3));
        assert_eq!((engines[1].psm, engines[1].oem), (6, 1));
        assert_eq!((engines[2].psm, engines[2].oem), (3, 3));
        assert!(engines.iter().enumerate().all(|(i, e)| e.id == i));
    }

    #[test]
    fn test_whitelist_has_menu_punctuation() {
        for c in "$.,()-/&'".chars() {
            assert!(CHAR_WHITELIST.contains(c));
        }
        assert!(!CHAR_WHITELIST.contains('@'));
    }
}
