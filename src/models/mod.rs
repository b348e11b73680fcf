pub mod menu;
pub mod vocabulary;

pub use menu::{
    CocktailEntry, CorrectedCandidate, FoodEntry, MenuResult, MenuSection, RawRecognition,
    RecognitionCandidate, WineEntry,
};
pub use vocabulary::Vocabulary;
