// Vocabulary-driven correction of OCR artifacts
//
// Each canonical term is compiled into a case-insensitive pattern in which
// characters OCR engines commonly confuse are widened into a class.

use log::debug;
use regex::{NoExpand, Regex};

use crate::models::{CorrectedCandidate, RecognitionCandidate, Vocabulary};

/// Confusion class for a character, if it has one.
fn confusion_class(c: char) -> Option<&'static str> {
    match c.to_ascii_lowercase() {
        '0' | 'o' => Some("[0O]"),
        '1' | 'i' | 'l' => Some("[1Il]"),
        '5' | 's' => Some("[5S]"),
        '8' | 'b' => Some("[8B]"),
        'a' | '@' => Some("[a@]"),
        'e' | '3' => Some("[e3]"),
        _ => None,
    }
}

/// Build the fuzzy pattern source for one term.
pub fn fuzzy_pattern(term: &str) -> String {
    let mut pattern = String::from("(?i)");
    for c in term.chars() {
        match confusion_class(c) {
            Some(class) => pattern.push_str(class),
            None => pattern.push_str(&regex::escape(&c.to_string())),
        }
    }
    pattern
}

pub struct TextCorrector {
    rules: Vec<(Regex, String)>,
}

impl TextCorrector {
    pub fn new(vocabulary: &Vocabulary) -> Self {
        let rules = vocabulary
            .correction_terms()
            .filter_map(|term| match Regex::new(&fuzzy_pattern(term)) {
                Ok(re) => Some((re, term.clone())),
                Err(e) => {
                    debug!("Skipping vocabulary term {:?}: {}", term, e);
                    None
                }
            })
            .collect();
        TextCorrector { rules }
    }

    /// Rewrite every fuzzy occurrence of a vocabulary term to its canonical spelling.
    pub fn correct(&self, text: &str) -> String {
        let mut corrected = text.to_string();
        for (pattern, canonical) in &self.rules {
            if pattern.is_match(&corrected) {
                corrected = pattern
                    .replace_all(&corrected, NoExpand(canonical))
                    .into_owned();
            }
        }
        corrected
    }

    pub fn correct_candidates(
        &self,
        candidates: Vec<RecognitionCandidate>,
    ) -> Vec<CorrectedCandidate> {
        candidates
            .into_iter()
            .map(|candidate| {
                let corrected_text = self.correct(&candidate.text);
                CorrectedCandidate {
                    candidate,
                    corrected_text,
                }
            })
            .collect()
    }
}
