// Wine and food vocabularies used for OCR correction and line classification

/// Canonical term lists. Constructed once and handed to the corrector and parser.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    pub red_wines: Vec<String>,
    pub white_wines: Vec<String>,
    pub regions: Vec<String>,
    pub starters: Vec<String>,
    pub entrees: Vec<String>,
    pub cooking_methods: Vec<String>,
    red_keywords: Vec<String>,
    white_keywords: Vec<String>,
    wine_line_keywords: Vec<String>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn contains_any(line: &str, keywords: &[String]) -> bool {
    let lower = line.to_lowercase();
    keywords.iter().any(|k| lower.contains(k.as_str()))
}

impl Default for Vocabulary {
    fn default() -> Self {
        Vocabulary {
            red_wines: owned(&[
                "Pinot Noir",
                "Merlot",
                "Cabernet Sauvignon",
                "Syrah",
                "Zinfandel",
                "Malbec",
                "Sangiovese",
                "Nebbiolo",
            ]),
            white_wines: owned(&[
                "Chardonnay",
                "Sauvignon Blanc",
                "Riesling",
                "Pinot Grigio",
                "Gewürztraminer",
                "Viognier",
                "Semillon",
            ]),
            regions: owned(&[
                "Napa Valley",
                "Sonoma",
                "Bordeaux",
                "Burgundy",
                "Tuscany",
                "Piedmont",
                "Champagne",
                "Alsace",
            ]),
            starters: owned(&[
                "Charcuterie",
                "Scallops",
                "Tartare",
                "Salad",
                "Soup",
                "Cheese",
                "Mushroom",
                "Truffle",
            ]),
            entrees: owned(&[
                "Duck", "Salmon", "Beef", "Lamb", "Pork", "Chicken", "Risotto", "Pasta", "Fish",
            ]),
            cooking_methods: owned(&[
                "Seared",
                "Pan-Seared",
                "Grilled",
                "Roasted",
                "Braised",
                "Confit",
                "Sous Vide",
            ]),
            red_keywords: owned(&[
                "pinot noir",
                "merlot",
                "cabernet",
                "syrah",
                "zinfandel",
                "malbec",
                "sangiovese",
                "nebbiolo",
            ]),
            white_keywords: owned(&[
                "chardonnay",
                "sauvignon",
                "riesling",
                "pinot grigio",
                "gewürztraminer",
                "viognier",
                "semillon",
            ]),
            wine_line_keywords: owned(&[
                "pinot noir",
                "merlot",
                "cabernet",
                "chardonnay",
                "sauvignon",
                "riesling",
                "syrah",
                "zinfandel",
                "malbec",
                "sangiovese",
                "pinot grigio",
                "gewürztraminer",
            ]),
        }
    }
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every canonical term in correction order: varietals, regions, dishes, cooking methods.
    pub fn correction_terms(&self) -> impl Iterator<Item = &String> {
        self.red_wines
            .iter()
            .chain(self.white_wines.iter())
            .chain(self.regions.iter())
            .chain(self.starters.iter())
            .chain(self.entrees.iter())
            .chain(self.cooking_methods.iter())
    }

    /// Varietal test used to accept a line into a wine slot.
    pub fn is_wine_line(&self, line: &str) -> bool {
        contains_any(line, &self.wine_line_keywords)
    }

    // Red is checked before white by callers, so "Cabernet Sauvignon" lands in red.
    pub fn is_red_wine(&self, name: &str) -> bool {
        contains_any(name, &self.red_keywords)
    }

    pub fn is_white_wine(&self, name: &str) -> bool {
        contains_any(name, &self.white_keywords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_varietal_classification() {
        let vocab = Vocabulary::new();
        assert!(vocab.is_red_wine("Cabernet Sauvignon Reserve"));
        assert!(vocab.is_white_wine("Cabernet Sauvignon Reserve"));
        assert!(vocab.is_white_wine("Cloudy Bay Sauvignon Blanc"));
        assert!(!vocab.is_red_wine("Cloudy Bay Sauvignon Blanc"));
        assert!(!vocab.is_red_wine("INSIGNIA"));
    }

    #[test]
    fn test_wine_line_is_case_insensitive() {
        let vocab = Vocabulary::new();
        assert!(vocab.is_wine_line("DOMAINE SERENE PINOT NOIR 2018 $120"));
        assert!(!vocab.is_wine_line("Pan-Seared Scallops $24"));
    }

    #[test]
    fn test_correction_terms_cover_all_categories() {
        let vocab = Vocabulary::new();
        let terms: Vec<&String> = vocab.correction_terms().collect();
        assert_eq!(terms.len(), 8 + 7 + 8 + 8 + 9 + 7);
        assert_eq!(terms[0], "Pinot Noir");
        assert_eq!(terms[terms.len() - 1], "Sous Vide");
    }
}
