use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use log::{error, info, warn};

use crate::cache::{content_hash, ResultCache};
use crate::config::PipelineConfig;
use crate::models::{MenuResult, Vocabulary};
use crate::processing::{
    ImageVariantGenerator, MenuParser, MultiEngineRecognizer, TesseractRecognizer,
    TextCorrector, TextRecognizer,
};
use crate::utils::MenuError;
use crate::validation::ResultValidator;

/// One progress event: percent in [0, 100] and a human readable message.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    pub percent: u8,
    pub message: String,
}

pub type ProgressCallback = Box<dyn Fn(&ProgressUpdate) + Send + Sync>;

/// Delay between retry attempts.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}

pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

pub struct NoopSleeper;

impl Sleeper for NoopSleeper {
    fn sleep(&self, _duration: Duration) {}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first failed attempt.
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: 3,
            delay: Duration::from_secs(1),
        }
    }
}

// Keeps reported percentages non-decreasing within one call.
struct ProgressTracker<'a> {
    callback: Option<&'a ProgressCallback>,
    last: u8,
}

impl<'a> ProgressTracker<'a> {
    fn new(callback: Option<&'a ProgressCallback>) -> Self {
        ProgressTracker { callback, last: 0 }
    }

    fn report(&mut self, percent: u8, message: &str) {
        let percent = percent.min(100).max(self.last);
        self.last = percent;
        if let Some(callback) = self.callback {
            callback(&ProgressUpdate {
                percent,
                message: message.to_string(),
            });
        }
    }
}

/// Orchestrates the menu recognition pipeline with caching and retries.
pub struct MenuDigitizer {
    variant_generator: ImageVariantGenerator,
    recognizer: MultiEngineRecognizer,
    corrector: TextCorrector,
    parser: MenuParser,
    cache: Arc<ResultCache>,
    retry: RetryPolicy,
    sleeper: Box<dyn Sleeper>,
    progress: Option<ProgressCallback>,
}

impl MenuDigitizer {
    /// Production pipeline backed by Tesseract.
    pub fn new(config: &PipelineConfig) -> Self {
        let recognizer = TesseractRecognizer::new(&config.language, config.tessdata.as_deref());
        MenuDigitizerBuilder::new(Box::new(recognizer))
            .cache(Arc::new(ResultCache::new(config.cache_ttl())))
            .retry_policy(RetryPolicy {
                max_retries: config.max_retries,
                delay: config.retry_delay(),
            })
            .build()
    }

    pub fn builder(recognizer: Box<dyn TextRecognizer>) -> MenuDigitizerBuilder {
        MenuDigitizerBuilder::new(recognizer)
    }

    pub fn set_progress_callback<F>(&mut self, callback: F)
    where
        F: Fn(&ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress = Some(Box::new(callback));
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn process_file<P: AsRef<Path>>(&self, image_path: P) -> Result<MenuResult, MenuError> {
        let image_data = std::fs::read(image_path.as_ref())?;
        Ok(self.process_image(&image_data))
    }

    /// Digitize one menu photograph. Never fails: after exhausting retries a
    /// fallback result carrying the last error is returned instead.
    pub fn process_image(&self, image_data: &[u8]) -> MenuResult {
        let key = content_hash(image_data);
        let mut progress = ProgressTracker::new(self.progress.as_ref());

        if let Some(cached) = self.cache.get(&key) {
            info!("Returning cached OCR result for {}", &key[..12]);
            progress.report(100, "Returning cached result...");
            return cached;
        }

        let mut attempt = 0;
        loop {
            match self.run_pipeline(image_data, &mut progress) {
                Ok(result) => {
                    if result.error.is_none() {
                        self.cache.insert(key, result.clone());
                    }
                    return result;
                }
                Err(e) if attempt < self.retry.max_retries => {
                    attempt += 1;
                    warn!(
                        "Menu processing failed ({}), retry attempt {}/{}",
                        e, attempt, self.retry.max_retries
                    );
                    self.sleeper.sleep(self.retry.delay);
                }
                Err(e) => {
                    error!("Menu processing failed after {} retries: {}", attempt, e);
                    return MenuResult::fallback(e.to_string());
                }
            }
        }
    }

    fn run_pipeline(
        &self,
        image_data: &[u8],
        progress: &mut ProgressTracker<'_>,
    ) -> Result<MenuResult, MenuError> {
        progress.report(10, "Advanced image preprocessing...");
        let variants = self.variant_generator.generate(image_data)?;

        progress.report(30, "Multi-engine text extraction...");
        let candidates = self.recognizer.recognize_all(&variants)?;
        info!("Collected {} recognition candidates", candidates.len());

        progress.report(60, "AI-powered text correction...");
        let corrected = self.corrector.correct_candidates(candidates);

        progress.report(80, "Advanced menu parsing...");
        let parsed = self.parser.parse(&corrected);

        progress.report(95, "Validation and confidence scoring...");
        let validated = ResultValidator::validate(parsed);

        progress.report(100, "Processing complete!");
        Ok(validated)
    }
}

pub struct MenuDigitizerBuilder {
    recognizer: Box<dyn TextRecognizer>,
    vocabulary: Arc<Vocabulary>,
    variant_generator: ImageVariantGenerator,
    cache: Option<Arc<ResultCache>>,
    retry: RetryPolicy,
    sleeper: Box<dyn Sleeper>,
}

impl MenuDigitizerBuilder {
    pub fn new(recognizer: Box<dyn TextRecognizer>) -> Self {
        MenuDigitizerBuilder {
            recognizer,
            vocabulary: Arc::new(Vocabulary::default()),
            variant_generator: ImageVariantGenerator::new(),
            cache: None,
            retry: RetryPolicy::default(),
            sleeper: Box::new(ThreadSleeper),
        }
    }

    pub fn vocabulary(mut self, vocabulary: Arc<Vocabulary>) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    pub fn variant_generator(mut self, generator: ImageVariantGenerator) -> Self {
        self.variant_generator = generator;
        self
    }

    pub fn cache(mut self, cache: Arc<ResultCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn sleeper(mut self, sleeper: Box<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn build(self) -> MenuDigitizer {
        let default_ttl = PipelineConfig::default().cache_ttl();
        MenuDigitizer {
            variant_generator: self.variant_generator,
            recognizer: MultiEngineRecognizer::new(self.recognizer),
            corrector: TextCorrector::new(&self.vocabulary),
            parser: MenuParser::new(self.vocabulary),
            cache: self
                .cache
                .unwrap_or_else(|| Arc::new(ResultCache::new(default_ttl))),
            retry: self.retry,
            sleeper: self.sleeper,
            progress: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_progress_is_monotonic_and_capped() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let callback: ProgressCallback = Box::new(move |u: &ProgressUpdate| {
            sink.lock().unwrap().push(u.percent);
        });

        let mut tracker = ProgressTracker::new(Some(&callback));
        tracker.report(30, "a");
        tracker.report(10, "b");
        tracker.report(120, "c");
        assert_eq!(*seen.lock().unwrap(), vec![30, 30, 100]);
    }

    #[test]
    fn test_tracker_without_callback_is_silent() {
        let mut tracker = ProgressTracker::new(None);
        tracker.report(50, "nobody listening");
        assert_eq!(tracker.last, 50);
    }
}
