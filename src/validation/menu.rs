use log::debug;

use crate::models::{CocktailEntry, FoodEntry, MenuResult, WineEntry};
use crate::processing::scoring;

pub const MIN_WINE_NAME_CHARS: usize = 3;
/// Food names must be longer than this.
pub const MIN_FOOD_NAME_CHARS: usize = 3;
/// Food entries must score above this.
pub const MIN_FOOD_CONFIDENCE: f64 = 0.7;

pub struct ResultValidator;

impl ResultValidator {
    /// Normalize fields, drop implausible entries and recompute the aggregate confidence.
    ///
    /// Fallback results (those carrying an error) keep their confidence as is.
    pub fn validate(result: MenuResult) -> MenuResult {
        let mut validated = MenuResult {
            red_wine: result.red_wine.and_then(Self::validate_wine),
            white_wine: result.white_wine.and_then(Self::validate_wine),
            starters: Self::validate_food(result.starters),
            entrees: Self::validate_food(result.entrees),
            cocktail: result.cocktail.and_then(Self::validate_cocktail),
            specials: result
                .specials
                .into_iter()
                .filter(|s| s.chars().count() > MIN_FOOD_NAME_CHARS)
                .collect(),
            confidence: result.confidence,
            error: result.error,
        };

        if validated.error.is_none() {
            validated.confidence = scoring::final_confidence(&validated);
        }
        validated.confidence = validated.confidence.clamp(0.0, 1.0);
        validated
    }

    pub fn validate_wine(mut wine: WineEntry) -> Option<WineEntry> {
        if wine.name.chars().count() < MIN_WINE_NAME_CHARS {
            debug!("Dropping wine with short name {:?}", wine.name);
            return None;
        }
        wine.price = Self::normalize_price(&wine.price);
        wine.year = Self::normalize_year(&wine.year);
        wine.confidence = wine.confidence.clamp(0.0, 1.0);
        Some(wine)
    }

    pub fn validate_cocktail(mut cocktail: CocktailEntry) -> Option<CocktailEntry> {
        if cocktail.name.chars().count() < MIN_WINE_NAME_CHARS {
            return None;
        }
        cocktail.price = Self::normalize_price(&cocktail.price);
        cocktail.confidence = cocktail.confidence.clamp(0.0, 1.0);
        Some(cocktail)
    }

    fn validate_food(items: Vec<FoodEntry>) -> Vec<FoodEntry> {
        items
            .into_iter()
            .filter(|item| {
                item.name.chars().count() > MIN_FOOD_NAME_CHARS
                    && item.confidence > MIN_FOOD_CONFIDENCE
            })
            .map(|item| FoodEntry {
                confidence: item.confidence.min(1.0),
                ..item
            })
            .collect()
    }

    /// Always `$` followed by digits only.
    pub fn normalize_price(price: &str) -> String {
        let digits: String = price.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            "$0".to_string()
        } else {
            format!("${}", digits)
        }
    }

    /// Exactly four digits, otherwise empty.
    pub fn normalize_year(year: &str) -> String {
        if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) {
            year.to_string()
        } else {
            String::new()
        }
    }
}
