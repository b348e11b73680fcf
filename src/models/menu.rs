use serde::{Deserialize, Serialize};

/// Named region of a menu used to contextualize line-level parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MenuSection {
    RedWine,
    WhiteWine,
    Starters,
    Entrees,
    Cocktail,
    Specials,
    None,
}

/// Raw output of one engine run over one image variant.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecognition {
    pub text: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionCandidate {
    pub text: String,
    pub confidence: f64,
    pub engine_id: usize,
    pub variant_id: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectedCandidate {
    #[serde(flatten)]
    pub candidate: RecognitionCandidate,
    pub corrected_text: String,
}

impl CorrectedCandidate {
    pub fn confidence(&self) -> f64 {
        self.candidate.confidence
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WineEntry {
    pub name: String,
    pub region: String,
    pub year: String,
    pub price: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    pub name: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocktailEntry {
    pub name: String,
    pub price: String,
    pub description: String,
    pub confidence: f64,
}

/// Aggregate output of one digitization run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuResult {
    pub red_wine: Option<WineEntry>,
    pub white_wine: Option<WineEntry>,
    pub starters: Vec<FoodEntry>,
    pub entrees: Vec<FoodEntry>,
    pub cocktail: Option<CocktailEntry>,
    pub specials: Vec<String>,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MenuResult {
    /// Empty-but-valid result returned when the pipeline cannot produce a structure.
    pub fn fallback(message: impl Into<String>) -> Self {
        MenuResult {
            confidence: 0.5,
            error: Some(message.into()),
            ..MenuResult::default()
        }
    }

    /// True when none of the scored categories were populated.
    pub fn is_empty(&self) -> bool {
        self.red_wine.is_none()
            && self.white_wine.is_none()
            && self.starters.is_empty()
            && self.entrees.is_empty()
    }
}
