// Menu structure parsing
//
// Three independent strategies read the combined OCR text. Each produces a
// full candidate structure; the one with the highest aggregate score wins
// as a whole, fields are never merged across strategies.

use std::sync::Arc;

use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;

use crate::models::{
    CocktailEntry, CorrectedCandidate, FoodEntry, MenuResult, MenuSection, Vocabulary, WineEntry,
};
use crate::processing::scoring;
use crate::utils::MenuError;

/// Lines whose combined confidence falls below this are dropped.
pub const LINE_CONFIDENCE_CUTOFF: f64 = 0.7;
pub const LINE_BASE_CONFIDENCE: f64 = 0.8;
pub const PRICE_BONUS: f64 = 0.1;
pub const YEAR_BONUS: f64 = 0.05;
pub const UPPERCASE_BONUS: f64 = 0.05;

pub const WINE_SECTION_CONFIDENCE: f64 = 0.9;
pub const FOOD_SECTION_CONFIDENCE: f64 = 0.85;

pub const FULL_PATTERN_CONFIDENCE: f64 = 0.95;
pub const PRICE_PATTERN_CONFIDENCE: f64 = 0.9;

pub const SEMANTIC_WINE_CONFIDENCE: f64 = 0.95;
pub const SEMANTIC_FOOD_CONFIDENCE: f64 = 0.9;

/// Header lines are short titles.
const MAX_HEADER_WORDS: usize = 4;
/// Words that may accompany a bare section keyword in a title ("Reds by the glass").
const HEADER_FILLER: &[&str] = &[
    "wine", "wines", "by", "the", "glass", "our", "menu", "list", "and",
];

const WINE_INDICATORS: &[&str] = &[
    "vineyard", "estate", "reserve", "vintage", "chateau", "domaine",
];
const FOOD_INDICATORS: &[&str] = &["with", "served", "accompanied", "garnished", "topped"];
const STARTER_INDICATORS: &[&str] = &["starter", "appetizer", "small", "light", "beginning"];
const COCKTAIL_KEYWORDS: &[&str] = &[
    "cocktail",
    "manhattan",
    "martini",
    "margarita",
    "old fashioned",
    "negroni",
    "mojito",
];
const SPECIAL_KEYWORDS: &[&str] = &["special", "featured"];

struct SectionHeader {
    section: MenuSection,
    pattern: Regex,
    keywords: &'static [&'static str],
    confidence: f64,
}

lazy_static! {
    static ref PRICE: Regex = Regex::new(r"\$(\d+)").unwrap();
    // A 4-digit run that is not part of a price or a longer number.
    static ref YEAR: Regex = Regex::new(r"(?:^|[^\d$])(\d{4})(?:\D|$)").unwrap();
    static ref ONLY_DIGITS: Regex = Regex::new(r"^\d+$").unwrap();
    static ref BARE_PRICE: Regex = Regex::new(r"^\$\d+").unwrap();
    static ref LIST_NUMBER: Regex = Regex::new(r"^\d+\.\s*").unwrap();
    static ref WITH_CLAUSE: Regex = Regex::new(r"(?i)\bwith\b").unwrap();

    // "Name, Region, Year $Price"
    static ref FULL_WINE: Regex = Regex::new(concat!(
        r"([A-Za-z][A-Za-z'&.\-]*(?:[ \t]+[A-Za-z][A-Za-z'&.\-]*)*),",
        r"[ \t]*([^,\n$]+?),[ \t]*(\d{4})[ \t]*\$(\d+)",
    ))
    .unwrap();
    // "Name $Price"
    static ref PRICED_NAME: Regex = Regex::new(
        r"([A-Za-z][A-Za-z'&.\-]*(?:[ \t]+[A-Za-z][A-Za-z'&.\-]*)*)[ \t]*\$(\d+)"
    ).unwrap();

    static ref SECTION_HEADERS: Vec<SectionHeader> = vec![
        SectionHeader {
            section: MenuSection::RedWine,
            pattern: Regex::new(r"(?i)\bred\s+wines?\b|\bvins?\s+rouges?\b").unwrap(),
            keywords: &["red", "reds", "rouge", "tinto"],
            confidence: WINE_SECTION_CONFIDENCE,
        },
        SectionHeader {
            section: MenuSection::WhiteWine,
            pattern: Regex::new(r"(?i)\bwhite\s+wines?\b|\bvins?\s+blancs?\b").unwrap(),
            keywords: &["white", "whites", "blanco"],
            confidence: WINE_SECTION_CONFIDENCE,
        },
        SectionHeader {
            section: MenuSection::Starters,
            pattern: Regex::new(
                r"(?i)\b(starters?|appetizers?|hors\s+d'oeuvres?|small\s+plates)\b",
            )
            .unwrap(),
            keywords: &["starter", "starters", "appetizer", "appetizers", "hors"],
            confidence: FOOD_SECTION_CONFIDENCE,
        },
        SectionHeader {
            section: MenuSection::Entrees,
            pattern: Regex::new(r"(?i)\b(entr[eé]es?|main\s+courses?|mains)\b").unwrap(),
            keywords: &["entree", "entrees", "main", "mains", "course"],
            confidence: FOOD_SECTION_CONFIDENCE,
        },
        SectionHeader {
            section: MenuSection::Cocktail,
            pattern: Regex::new(r"(?i)\b(cocktails?|drinks?)\b").unwrap(),
            keywords: &["cocktail", "cocktails", "drink", "drinks"],
            confidence: FOOD_SECTION_CONFIDENCE,
        },
        SectionHeader {
            section: MenuSection::Specials,
            pattern: Regex::new(r"(?i)\b(specials?|featured)\b").unwrap(),
            keywords: &["special", "specials", "featured"],
            confidence: FOOD_SECTION_CONFIDENCE,
        },
    ];
}

fn contains_any(line: &str, words: &[&str]) -> bool {
    let lower = line.to_lowercase();
    words.iter().any(|w| lower.contains(w))
}

fn non_empty_lines(text: &str) -> Vec<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
}

pub fn find_price(line: &str) -> Option<String> {
    PRICE.captures(line).map(|c| format!("${}", &c[1]))
}

pub fn find_year(line: &str) -> Option<String> {
    YEAR.captures(line).map(|c| c[1].to_string())
}

/// Heuristic per-line confidence, capped at 1.0.
pub fn line_confidence(line: &str) -> f64 {
    let mut confidence = LINE_BASE_CONFIDENCE;
    if line.contains('$') {
        confidence += PRICE_BONUS;
    }
    if find_year(line).is_some() {
        confidence += YEAR_BONUS;
    }
    if line.chars().any(|c| c.is_ascii_uppercase()) {
        confidence += UPPERCASE_BONUS;
    }
    confidence.min(1.0)
}

/// Longer than five characters, not purely numeric, not a bare price.
pub fn is_food_line(line: &str) -> bool {
    line.chars().count() > 5 && !ONLY_DIGITS.is_match(line) && !BARE_PRICE.is_match(line)
}

pub fn clean_food_text(line: &str) -> String {
    let without_price = PRICE.replace(line, "");
    LIST_NUMBER.replace(without_price.trim(), "").trim().to_string()
}

// A bare keyword only makes a title when nothing but filler surrounds it,
// so "Red Snapper" stays a dish while "Reds by the glass" is a header.
fn is_keyword_title(words: &[String], keywords: &[&str]) -> bool {
    words.iter().any(|w| keywords.contains(&w.as_str()))
        && words
            .iter()
            .all(|w| keywords.contains(&w.as_str()) || HEADER_FILLER.contains(&w.as_str()))
}

/// Recognize a section title, returning the section and its base confidence.
pub fn detect_section(line: &str) -> Option<(MenuSection, f64)> {
    if PRICE.is_match(line) || find_year(line).is_some() {
        return None;
    }
    let words: Vec<String> = line
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect();
    if words.is_empty() || words.len() > MAX_HEADER_WORDS {
        return None;
    }

    SECTION_HEADERS
        .iter()
        .find(|header| {
            header.pattern.is_match(line) || is_keyword_title(&words, header.keywords)
        })
        .map(|header| (header.section, header.confidence))
}

/// Split a free-form wine line into name, region, year and price.
pub fn parse_wine_line(line: &str, confidence: f64) -> WineEntry {
    let price = find_price(line).unwrap_or_else(|| "$0".to_string());
    let year = find_year(line).unwrap_or_default();

    let mut name = line.to_string();
    let mut region = String::new();

    if !year.is_empty() {
        if let Some(before) = line.split(year.as_str()).next() {
            name = before.to_string();
        }
    }

    let parts: Vec<&str> = line.split(',').collect();
    if parts.len() > 1 {
        name = parts[0].to_string();
        let rest = parts[1..].join(",");
        let rest = if year.is_empty() { rest } else { rest.replacen(year.as_str(), "", 1) };
        region = PRICE
            .replace(&rest, "")
            .trim()
            .trim_matches(|c: char| c == ',' || c.is_whitespace())
            .to_string();
    }

    let name = PRICE
        .replace(&name, "")
        .trim()
        .trim_end_matches(',')
        .trim()
        .to_string();

    WineEntry {
        name,
        region,
        year,
        price,
        confidence,
    }
}

pub fn is_cocktail_line(line: &str) -> bool {
    contains_any(line, COCKTAIL_KEYWORDS) || PRICE.is_match(line)
}

/// A food-like line that announces itself as a special.
pub fn is_special_line(line: &str) -> bool {
    is_food_line(line) && contains_any(line, SPECIAL_KEYWORDS)
}

pub fn parse_cocktail_line(line: &str, confidence: f64) -> CocktailEntry {
    let price = find_price(line).unwrap_or_else(|| "$0".to_string());
    let without_price = PRICE.replace_all(line, "");
    let (name, description) = match WITH_CLAUSE.find(&without_price) {
        Some(m) => (
            without_price[..m.start()].to_string(),
            without_price[m.end()..].to_string(),
        ),
        None => (without_price.to_string(), String::new()),
    };
    CocktailEntry {
        name: name.trim().to_string(),
        price,
        description: description.trim().to_string(),
        confidence,
    }
}

fn push_unique(items: &mut Vec<FoodEntry>, entry: FoodEntry) {
    if entry.name.is_empty() {
        return;
    }
    let key = entry.name.to_lowercase();
    if !items.iter().any(|item| item.name.to_lowercase() == key) {
        items.push(entry);
    }
}

/// Slot a wine by varietal, first match per color wins.
fn place_wine(result: &mut MenuResult, wine: WineEntry, vocabulary: &Vocabulary) {
    if vocabulary.is_red_wine(&wine.name) {
        if result.red_wine.is_none() {
            result.red_wine = Some(wine);
        }
    } else if vocabulary.is_white_wine(&wine.name) && result.white_wine.is_none() {
        result.white_wine = Some(wine);
    }
}

/// One way of turning combined OCR text into a candidate structure.
pub trait ParseStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn parse(&self, text: &str, vocabulary: &Vocabulary) -> Result<MenuResult, MenuError>;
}

/// Walks lines, switching context on section headers.
pub struct SectionKeywordStrategy;

impl ParseStrategy for SectionKeywordStrategy {
    fn name(&self) -> &'static str {
        "section-keyword"
    }

    fn parse(&self, text: &str, vocabulary: &Vocabulary) -> Result<MenuResult, MenuError> {
        let lines = non_empty_lines(text);
        if lines.is_empty() {
            return Err(MenuError::ParseStrategyError("no text lines to parse".to_string()));
        }

        let mut result = MenuResult::default();
        let mut current = MenuSection::None;
        let mut section_confidence = WINE_SECTION_CONFIDENCE;

        for line in lines {
            if let Some((section, confidence)) = detect_section(line) {
                current = section;
                section_confidence = confidence;
                continue;
            }

            let combined = (section_confidence + line_confidence(line)) / 2.0;
            if combined < LINE_CONFIDENCE_CUTOFF {
                continue;
            }

            match current {
                MenuSection::RedWine => {
                    if result.red_wine.is_none() && vocabulary.is_wine_line(line) {
                        result.red_wine = Some(parse_wine_line(line, combined));
                    }
                }
                MenuSection::WhiteWine => {
                    if result.white_wine.is_none() && vocabulary.is_wine_line(line) {
                        result.white_wine = Some(parse_wine_line(line, combined));
                    }
                }
                MenuSection::Starters | MenuSection::Entrees => {
                    if is_food_line(line) {
                        let entry = FoodEntry {
                            name: clean_food_text(line),
                            confidence: combined,
                        };
                        if current == MenuSection::Starters {
                            push_unique(&mut result.starters, entry);
                        } else {
                            push_unique(&mut result.entrees, entry);
                        }
                    }
                }
                MenuSection::Cocktail => {
                    if result.cocktail.is_none() && is_cocktail_line(line) {
                        result.cocktail = Some(parse_cocktail_line(line, combined));
                    }
                }
                MenuSection::Specials => {
                    if is_special_line(line) {
                        let special = clean_food_text(line);
                        if !special.is_empty() && !result.specials.contains(&special) {
                            result.specials.push(special);
                        }
                    }
                }
                MenuSection::None => {}
            }
        }

        Ok(result)
    }
}

/// Regex extraction of priced wine entries straight from the text.
pub struct PatternExtractionStrategy;

impl PatternExtractionStrategy {
    /// All wine-shaped matches in order: full "Name, Region, Year $Price"
    /// first, then "Name $Price".
    pub fn extract_wines(text: &str) -> Vec<WineEntry> {
        let full = FULL_WINE.captures_iter(text).map(|c| WineEntry {
            name: c[1].trim().to_string(),
            region: c[2].trim().to_string(),
            year: c[3].to_string(),
            price: format!("${}", &c[4]),
            confidence: FULL_PATTERN_CONFIDENCE,
        });
        let priced = PRICED_NAME.captures_iter(text).map(|c| WineEntry {
            name: c[1].trim().to_string(),
            region: String::new(),
            year: String::new(),
            price: format!("${}", &c[2]),
            confidence: PRICE_PATTERN_CONFIDENCE,
        });
        full.chain(priced).collect()
    }
}

impl ParseStrategy for PatternExtractionStrategy {
    fn name(&self) -> &'static str {
        "pattern-extraction"
    }

    fn parse(&self, text: &str, vocabulary: &Vocabulary) -> Result<MenuResult, MenuError> {
        if non_empty_lines(text).is_empty() {
            return Err(MenuError::ParseStrategyError("no text lines to parse".to_string()));
        }

        let mut result = MenuResult::default();
        for wine in Self::extract_wines(text) {
            place_wine(&mut result, wine, vocabulary);
        }
        Ok(result)
    }
}

/// Indicator-word heuristics without section context.
pub struct SemanticStrategy;

impl SemanticStrategy {
    fn has_wine_semantics(line: &str, vocabulary: &Vocabulary) -> bool {
        contains_any(line, WINE_INDICATORS) || vocabulary.is_wine_line(line)
    }

    fn has_food_semantics(line: &str) -> bool {
        contains_any(line, FOOD_INDICATORS) || is_food_line(line)
    }

    fn is_starter(line: &str) -> bool {
        contains_any(line, STARTER_INDICATORS)
    }
}

impl ParseStrategy for SemanticStrategy {
    fn name(&self) -> &'static str {
        "semantic"
    }

    fn parse(&self, text: &str, vocabulary: &Vocabulary) -> Result<MenuResult, MenuError> {
        let lines = non_empty_lines(text);
        if lines.is_empty() {
            return Err(MenuError::ParseStrategyError("no text lines to parse".to_string()));
        }

        let mut result = MenuResult::default();
        for line in lines {
            if detect_section(line).is_some() {
                continue;
            }

            if Self::has_wine_semantics(line, vocabulary) {
                let wine = parse_wine_line(line, SEMANTIC_WINE_CONFIDENCE);
                place_wine(&mut result, wine, vocabulary);
            }
            // Indicator words alone ("Reserve ribeye") do not make a wine.
            if !vocabulary.is_wine_line(line) && Self::has_food_semantics(line) {
                let entry = FoodEntry {
                    name: clean_food_text(line),
                    confidence: SEMANTIC_FOOD_CONFIDENCE,
                };
                if Self::is_starter(line) {
                    push_unique(&mut result.starters, entry);
                } else {
                    push_unique(&mut result.entrees, entry);
                }
            }
        }
        Ok(result)
    }
}

/// Runs every strategy over the combined text and keeps the best-scoring structure.
pub struct MenuParser {
    vocabulary: Arc<Vocabulary>,
    strategies: Vec<Box<dyn ParseStrategy>>,
}

impl MenuParser {
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Self::with_strategies(
            vocabulary,
            vec![
                Box::new(SectionKeywordStrategy),
                Box::new(PatternExtractionStrategy),
                Box::new(SemanticStrategy),
            ],
        )
    }

    pub fn with_strategies(
        vocabulary: Arc<Vocabulary>,
        strategies: Vec<Box<dyn ParseStrategy>>,
    ) -> Self {
        MenuParser {
            vocabulary,
            strategies,
        }
    }

    pub fn parse(&self, candidates: &[CorrectedCandidate]) -> MenuResult {
        let combined = candidates
            .iter()
            .map(|c| c.corrected_text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let confidences: Vec<f64> = candidates.iter().map(|c| c.confidence()).collect();
        self.parse_text(&combined, &confidences)
    }

    /// Ties keep the earlier strategy. Falls back only when every strategy failed.
    pub fn parse_text(&self, text: &str, input_confidences: &[f64]) -> MenuResult {
        let mut best: Option<MenuResult> = None;

        for strategy in &self.strategies {
            match strategy.parse(text, &self.vocabulary) {
                Ok(mut candidate) => {
                    let score = scoring::score(&candidate, input_confidences);
                    debug!("Strategy {} scored {:.3}", strategy.name(), score);
                    if best.as_ref().map_or(true, |b| score > b.confidence) {
                        candidate.confidence = score;
                        best = Some(candidate);
                    }
                }
                Err(e) => warn!("Parsing strategy {} failed: {}", strategy.name(), e),
            }
        }

        best.unwrap_or_else(|| MenuResult::fallback("Advanced parsing failed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Vocabulary {
        Vocabulary::new()
    }

    const MENU: &str = "RED WINE\n\
        Pinot Noir, Willamette Valley, 2019 $65\n\
        Merlot, Columbia Valley, 2017 $48\n\
        WHITE WINE\n\
        Chardonnay, Sonoma, 2020 $52\n\
        STARTERS\n\
        Soup\n\
        Charcuterie Board $18\n\
        ENTREES\n\
        Salmon\n\
        Duck Confit with cherries $34\n\
        COCKTAILS\n\
        Old Fashioned with orange bitters $14\n\
        SPECIALS\n\
        Featured Lobster Ravioli $38\n\
        Truffle Fries $12";

    #[test]
    fn test_line_confidence() {
        assert!((line_confidence("salmon") - 0.8).abs() < 1e-9);
        assert!((line_confidence("Salmon") - 0.85).abs() < 1e-9);
        assert!((line_confidence("Salmon $30") - 0.95).abs() < 1e-9);
        assert!((line_confidence("Merlot, 2017 $48") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_food_line_length_rule() {
        assert!(!is_food_line("Soup"));
        assert!(is_food_line("Salmon"));
        assert!(!is_food_line("1234567"));
        assert!(!is_food_line("$12345"));
    }

    #[test]
    fn test_year_ignores_prices() {
        assert_eq!(find_year("Cabernet $1995"), None);
        assert_eq!(find_year("Cabernet 1995 $80"), Some("1995".to_string()));
        assert_eq!(find_year("Cabernet 19955"), None);
    }

    #[test]
    fn test_detect_section() {
        assert_eq!(detect_section("RED WINES"), Some((MenuSection::RedWine, 0.9)));
        assert_eq!(detect_section("Appetizers"), Some((MenuSection::Starters, 0.85)));
        assert_eq!(detect_section("Main Courses"), Some((MenuSection::Entrees, 0.85)));
        assert_eq!(detect_section("Tonight's Specials"), Some((MenuSection::Specials, 0.85)));
        assert_eq!(detect_section("Red wine braised short rib $36"), None);
        assert_eq!(detect_section("Grilled Salmon"), None);
    }

    #[test]
    fn test_parse_wine_line() {
        let wine = parse_wine_line("Pinot Noir, Willamette Valley, 2019 $65", 0.9);
        assert_eq!(wine.name, "Pinot Noir");
        assert_eq!(wine.region, "Willamette Valley");
        assert_eq!(wine.year, "2019");
        assert_eq!(wine.price, "$65");

        let wine = parse_wine_line("Duckhorn Merlot 2018 $72", 0.9);
        assert_eq!(wine.name, "Duckhorn Merlot");
        assert_eq!(wine.region, "");

        let wine = parse_wine_line("Meiomi Pinot Noir", 0.9);
        assert_eq!(wine.price, "$0");
        assert_eq!(wine.year, "");
    }

    #[test]
    fn test_parse_cocktail_line() {
        let cocktail = parse_cocktail_line("Old Fashioned with orange bitters $14", 0.9);
        assert_eq!(cocktail.name, "Old Fashioned");
        assert_eq!(cocktail.description, "orange bitters");
        assert_eq!(cocktail.price, "$14");
    }

    #[test]
    fn test_section_strategy() {
        let result = SectionKeywordStrategy.parse(MENU, &vocab()).unwrap();

        let red = result.red_wine.unwrap();
        assert_eq!(red.name, "Pinot Noir");
        assert!((red.confidence - 0.95).abs() < 1e-9);
        assert_eq!(result.white_wine.unwrap().name, "Chardonnay");

        let starters: Vec<&str> = result.starters.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(starters, vec!["Charcuterie Board"]);

        let entrees: Vec<&str> = result.entrees.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(entrees, vec!["Salmon", "Duck Confit with cherries"]);
        assert!((result.entrees[0].confidence - 0.85).abs() < 1e-9);

        assert_eq!(result.cocktail.unwrap().name, "Old Fashioned");
        assert_eq!(result.specials, vec!["Featured Lobster Ravioli".to_string()]);
    }

    #[test]
    fn test_special_lines_must_announce_themselves() {
        assert!(is_special_line("Chef's special risotto $29"));
        assert!(is_special_line("FEATURED: Halibut $41"));
        assert!(!is_special_line("Truffle Fries $12"));
    }

    #[test]
    fn test_keyword_needs_a_bare_title() {
        assert_eq!(detect_section("REDS"), Some((MenuSection::RedWine, 0.9)));
        assert_eq!(detect_section("Reds by the glass"), Some((MenuSection::RedWine, 0.9)));
        assert_eq!(detect_section("White"), Some((MenuSection::WhiteWine, 0.9)));
        assert_eq!(detect_section("Red Snapper"), None);
        assert_eq!(detect_section("Main Street Burger"), None);
    }

    #[test]
    fn test_dish_named_after_a_keyword_stays_in_section() {
        let text = "ENTREES\n\
                    Grilled Salmon $30\n\
                    Red Snapper\n\
                    Duck Confit with cherries $34";
        let result = SectionKeywordStrategy.parse(text, &vocab()).unwrap();
        let entrees: Vec<&str> = result.entrees.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(entrees, vec!["Grilled Salmon", "Red Snapper", "Duck Confit with cherries"]);
        assert!(result.red_wine.is_none());
    }

    #[test]
    fn test_section_strategy_first_wine_wins() {
        let text = "RED WINE\nMerlot, Napa Valley, 2015 $40\nPinot Noir, Sonoma, 2018 $55";
        let result = SectionKeywordStrategy.parse(text, &vocab()).unwrap();
        assert_eq!(result.red_wine.unwrap().name, "Merlot");
    }

    #[test]
    fn test_pattern_extraction_full_match() {
        let wines = PatternExtractionStrategy::extract_wines("INSIGNIA, NAPA VALLEY, 2014 $305");
        assert_eq!(wines.len(), 1);
        let wine = &wines[0];
        assert_eq!(wine.name, "INSIGNIA");
        assert_eq!(wine.region, "NAPA VALLEY");
        assert_eq!(wine.year, "2014");
        assert_eq!(wine.price, "$305");
        assert_eq!(wine.confidence, FULL_PATTERN_CONFIDENCE);
    }

    #[test]
    fn test_pattern_strategy_classifies_by_varietal() {
        let text = "Meiomi Pinot Noir $48\nCloudy Bay Sauvignon Blanc $52\nZinfandel $30";
        let result = PatternExtractionStrategy.parse(text, &vocab()).unwrap();
        let red = result.red_wine.unwrap();
        assert_eq!(red.name, "Meiomi Pinot Noir");
        assert_eq!(red.confidence, PRICE_PATTERN_CONFIDENCE);
        assert_eq!(result.white_wine.unwrap().name, "Cloudy Bay Sauvignon Blanc");
        assert!(result.starters.is_empty());
    }

    #[test]
    fn test_pattern_strategy_drops_wine_without_varietal() {
        let result = PatternExtractionStrategy
            .parse("INSIGNIA, NAPA VALLEY, 2014 $305", &vocab())
            .unwrap();
        assert!(result.red_wine.is_none());
        assert!(result.white_wine.is_none());
    }

    #[test]
    fn test_semantic_strategy() {
        let text = "Estate Reserve Cabernet, Napa Valley, 2016 $120\n\
                    Light burrata starter with figs $16\n\
                    Braised short rib served with polenta $38";
        let result = SemanticStrategy.parse(text, &vocab()).unwrap();
        let red = result.red_wine.unwrap();
        assert_eq!(red.name, "Estate Reserve Cabernet");
        assert_eq!(red.confidence, SEMANTIC_WINE_CONFIDENCE);
        assert_eq!(result.starters[0].name, "Light burrata starter with figs");
        assert_eq!(result.entrees[0].name, "Braised short rib served with polenta");
    }

    #[test]
    fn test_semantic_wine_indicator_in_a_dish() {
        let text = "Reserve ribeye served with frites $48\n\
                    Estate greens with vinaigrette";
        let result = SemanticStrategy.parse(text, &vocab()).unwrap();
        assert!(result.red_wine.is_none());
        assert!(result.white_wine.is_none());
        let entrees: Vec<&str> = result.entrees.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            entrees,
            vec!["Reserve ribeye served with frites", "Estate greens with vinaigrette"]
        );
    }

    #[test]
    fn test_strategies_reject_blank_text() {
        assert!(SectionKeywordStrategy.parse("  \n\n", &vocab()).is_err());
        assert!(PatternExtractionStrategy.parse("", &vocab()).is_err());
        assert!(SemanticStrategy.parse("\n", &vocab()).is_err());
    }

    struct FixedStrategy(&'static str, f64);

    impl ParseStrategy for FixedStrategy {
        fn name(&self) -> &'static str {
            self.0
        }

        fn parse(&self, _text: &str, _vocabulary: &Vocabulary) -> Result<MenuResult, MenuError> {
            Ok(MenuResult {
                red_wine: Some(WineEntry {
                    name: self.0.to_string(),
                    region: String::new(),
                    year: String::new(),
                    price: "$10".to_string(),
                    confidence: self.1,
                }),
                entrees: vec![FoodEntry {
                    name: format!("{} entree", self.0),
                    confidence: 0.9,
                }],
                ..MenuResult::default()
            })
        }
    }

    struct FailingStrategy;

    impl ParseStrategy for FailingStrategy {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn parse(&self, _text: &str, _vocabulary: &Vocabulary) -> Result<MenuResult, MenuError> {
            Err(MenuError::ParseStrategyError("broken".to_string()))
        }
    }

    #[test]
    fn test_highest_score_wins_whole_structure() {
        let parser = MenuParser::with_strategies(
            Arc::new(vocab()),
            vec![
                Box::new(FixedStrategy("first", 0.6)),
                Box::new(FailingStrategy),
                Box::new(FixedStrategy("best", 0.99)),
                Box::new(FixedStrategy("third", 0.8)),
            ],
        );
        let result = parser.parse_text("anything", &[0.7]);
        assert_eq!(result.red_wine.unwrap().name, "best");
        assert_eq!(result.entrees[0].name, "best entree");
        let expected = (0.7 * 0.4 + 0.99 * 0.2 + 0.9 * 0.1) / 0.7;
        assert!((result.confidence - expected).abs() < 1e-9);
    }

    #[test]
    fn test_all_strategies_failing_falls_back() {
        let parser = MenuParser::with_strategies(
            Arc::new(vocab()),
            vec![Box::new(FailingStrategy), Box::new(FailingStrategy)],
        );
        let result = parser.parse_text("anything", &[0.9]);
        assert_eq!(result.confidence, 0.5);
        assert!(result.error.is_some());
        assert!(result.is_empty());
    }
}
