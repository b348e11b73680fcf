pub mod correction;
pub mod image;
pub mod ocr;
pub mod parser;
pub mod scoring;

pub use correction::TextCorrector;
pub use image::{FilterProfile, ImageVariant, ImageVariantGenerator};
pub use ocr::{EngineConfig, MultiEngineRecognizer, TesseractRecognizer, TextRecognizer};
pub use parser::{MenuParser, ParseStrategy};
