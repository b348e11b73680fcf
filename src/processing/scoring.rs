// Confidence arithmetic shared by strategy selection and final validation

use crate::models::{FoodEntry, MenuResult};

pub const OCR_WEIGHT: f64 = 0.4;
pub const RED_WINE_WEIGHT: f64 = 0.2;
pub const WHITE_WINE_WEIGHT: f64 = 0.2;
pub const STARTERS_WEIGHT: f64 = 0.1;
pub const ENTREES_WEIGHT: f64 = 0.1;

pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

fn mean_food(items: &[FoodEntry]) -> Option<f64> {
    mean(items.iter().map(|item| item.confidence))
}

/// Weighted score of a candidate structure. Absent fields drop their weight.
pub fn score(candidate: &MenuResult, input_confidences: &[f64]) -> f64 {
    let components = [
        (mean(input_confidences.iter().copied()), OCR_WEIGHT),
        (candidate.red_wine.as_ref().map(|w| w.confidence), RED_WINE_WEIGHT),
        (candidate.white_wine.as_ref().map(|w| w.confidence), WHITE_WINE_WEIGHT),
        (mean_food(&candidate.starters), STARTERS_WEIGHT),
        (mean_food(&candidate.entrees), ENTREES_WEIGHT),
    ];

    let (total, weight) = components
        .iter()
        .filter_map(|(value, weight)| value.map(|v| (v * weight, *weight)))
        .fold((0.0, 0.0), |(total, weights), (v, w)| (total + v, weights + w));

    if weight > 0.0 {
        (total / weight).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Unweighted mean over the populated categories, 0 when none are.
pub fn final_confidence(result: &MenuResult) -> f64 {
    let categories = [
        result.red_wine.as_ref().map(|w| w.confidence),
        result.white_wine.as_ref().map(|w| w.confidence),
        mean_food(&result.starters),
        mean_food(&result.entrees),
    ];
    mean(categories.iter().flatten().copied())
        .unwrap_or(0.0)
        .clamp(0.0, 1.0)
}
