// 🏷️ Keyword Classifier - Rules as Data
// Maps a free-text expense description to a category by keyword matching

use serde::Serialize;

use crate::categories::{
    CategoryKeywords, CATEGORY_AVERAGES, CATEGORY_KEYWORDS, DEFAULT_SUGGESTED_AMOUNT,
    OTHER_CATEGORY,
};

// ============================================================================
// CLASSIFICATION RESULT
// ============================================================================

/// Prediction for one description. Built per request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub predicted_category: &'static str,

    /// Heuristic 0-100, see [`KeywordClassifier::confidence`]
    pub confidence: u8,

    pub suggested_amount: f64,
}

// ============================================================================
// KEYWORD CLASSIFIER
// ============================================================================

/// First-match-wins keyword classifier over immutable tables.
///
/// Every operation is a total function: blank input and unknown categories
/// fall back to `Other`, 0 or the default amount instead of erroring.
#[derive(Debug, Clone, Copy)]
pub struct KeywordClassifier {
    table: &'static [CategoryKeywords],
    averages: &'static [(&'static str, f64)],
}

impl KeywordClassifier {
    /// Classifier over the built-in tables
    pub fn new() -> Self {
        Self::from_tables(CATEGORY_KEYWORDS, CATEGORY_AVERAGES)
    }

    /// Classifier over caller-supplied tables. Row order is priority order.
    pub fn from_tables(
        table: &'static [CategoryKeywords],
        averages: &'static [(&'static str, f64)],
    ) -> Self {
        KeywordClassifier { table, averages }
    }

    /// Predict a category for `description`.
    ///
    /// Categories are tried in table order and the first keyword found wins,
    /// so an earlier category beats a later one no matter how many keywords
    /// the later one matches or where they sit in the text.
    pub fn predict_category(&self, description: &str) -> &'static str {
        if description.trim().is_empty() {
            return OTHER_CATEGORY;
        }

        let text_lower = description.to_lowercase();

        for row in self.table {
            if row.keywords.iter().any(|kw| text_lower.contains(kw)) {
                return row.category;
            }
        }

        OTHER_CATEGORY
    }

    /// Heuristic confidence that `category` fits `description`.
    ///
    /// `min(100, hits * 30 + 40)` where hits counts every keyword of the
    /// category found in the text. Blank descriptions and categories without
    /// a keyword list (including `Other`) score 0. Not a probability.
    pub fn confidence(&self, description: &str, category: &str) -> u8 {
        if description.trim().is_empty() {
            return 0;
        }

        let Some(keywords) = self.keywords_for(category) else {
            return 0;
        };

        let text_lower = description.to_lowercase();
        let matches = keywords.iter().filter(|kw| text_lower.contains(*kw)).count();

        matches.saturating_mul(30).saturating_add(40).min(100) as u8
    }

    /// Static average for `category`, or the default of 100.0
    pub fn suggest_amount(&self, category: &str) -> f64 {
        self.averages
            .iter()
            .find(|(name, _)| *name == category)
            .map(|(_, amount)| *amount)
            .unwrap_or(DEFAULT_SUGGESTED_AMOUNT)
    }

    /// Predict, score and suggest in one call
    pub fn classify(&self, description: &str) -> ClassificationResult {
        let predicted_category = self.predict_category(description);

        ClassificationResult {
            predicted_category,
            confidence: self.confidence(description, predicted_category),
            suggested_amount: self.suggest_amount(predicted_category),
        }
    }

    /// Every label this classifier can return, in priority order, `Other` last
    pub fn categories(&self) -> impl Iterator<Item = &'static str> {
        self.table
            .iter()
            .map(|row| row.category)
            .chain(std::iter::once(OTHER_CATEGORY))
    }

    /// Keyword list for a category, `None` for `Other` and unknown labels
    pub fn keywords_for(&self, category: &str) -> Option<&'static [&'static str]> {
        self.table
            .iter()
            .find(|row| row.category == category)
            .map(|row| row.keywords)
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_description_is_other() {
        let classifier = KeywordClassifier::new();

        assert_eq!(classifier.predict_category(""), "Other");
        assert_eq!(classifier.predict_category("   \t\n"), "Other");
    }

    #[test]
    fn test_single_category_match() {
        let classifier = KeywordClassifier::new();

        assert_eq!(classifier.predict_category("Uber ride home"), "Transportation");
        assert_eq!(classifier.predict_category("NETFLIX subscription"), "Entertainment");
        assert_eq!(classifier.predict_category("Electricity for March"), "Bills");
        assert_eq!(classifier.predict_category("Dentist appointment"), "Healthcare");
        assert_eq!(classifier.predict_category("Udemy Rust course"), "Education");
        assert_eq!(classifier.predict_category("Two nights at Marriott"), "Hotel");
    }

    #[test]
    fn test_multi_word_keywords() {
        let classifier = KeywordClassifier::new();

        assert_eq!(classifier.predict_category("paid via Booking.com"), "Hotel");
        assert_eq!(classifier.predict_category("Fab Hotels Pune"), "Hotel");
    }

    #[test]
    fn test_no_keyword_is_other() {
        let classifier = KeywordClassifier::new();

        assert_eq!(classifier.predict_category("asdkjhasd random text"), "Other");
    }

    #[test]
    fn test_earlier_category_wins() {
        let classifier = KeywordClassifier::new();

        // Shopping keyword first in the text, Food is earlier in priority
        assert_eq!(classifier.predict_category("Amazon gift card and pizza"), "Food");

        // Three Shopping hits against a single Transportation hit
        assert_eq!(
            classifier.predict_category("clothes shoes laptop delivered by bus"),
            "Transportation"
        );

        // "mobile" is listed under Bills and Shopping
        assert_eq!(classifier.predict_category("Mobile recharge"), "Bills");
    }

    #[test]
    fn test_custom_table_priority() {
        static TABLE: &[CategoryKeywords] = &[
            CategoryKeywords { category: "Later", keywords: &["zzz"] },
            CategoryKeywords { category: "Earlier", keywords: &["aaa"] },
        ];
        static AVERAGES: &[(&str, f64)] = &[("Later", 5.0)];

        let classifier = KeywordClassifier::from_tables(TABLE, AVERAGES);

        assert_eq!(classifier.predict_category("aaa zzz"), "Later");
        assert_eq!(classifier.predict_category("aaa"), "Earlier");
        assert_eq!(classifier.suggest_amount("Later"), 5.0);
        assert_eq!(classifier.suggest_amount("Earlier"), 100.0);
    }

    #[test]
    fn test_confidence_scores() {
        let classifier = KeywordClassifier::new();

        assert_eq!(classifier.confidence("", "Food"), 0);
        assert_eq!(classifier.confidence("Uber ride home", "Transportation"), 70);
        assert_eq!(classifier.confidence("Lunch at Starbucks", "Food"), 100);
        assert_eq!(
            classifier.confidence("lunch dinner breakfast pizza", "Food"),
            100,
            "score is capped at 100"
        );
    }

    #[test]
    fn test_confidence_floor_for_known_category() {
        let classifier = KeywordClassifier::new();

        assert_eq!(classifier.confidence("Uber ride home", "Food"), 40);
    }

    #[test]
    fn test_confidence_without_keyword_list() {
        let classifier = KeywordClassifier::new();

        assert_eq!(classifier.confidence("asdkjhasd random text", "Other"), 0);
        assert_eq!(classifier.confidence("pizza", "Zorbing"), 0);
    }

    #[test]
    fn test_suggest_amount() {
        let classifier = KeywordClassifier::new();

        assert_eq!(classifier.suggest_amount("Food"), 250.0);
        assert_eq!(classifier.suggest_amount("Transportation"), 150.0);
        assert_eq!(classifier.suggest_amount("Entertainment"), 400.0);
        assert_eq!(classifier.suggest_amount("Bills"), 1200.0);
        assert_eq!(classifier.suggest_amount("Shopping"), 800.0);
        assert_eq!(classifier.suggest_amount("Healthcare"), 600.0);
        assert_eq!(classifier.suggest_amount("Education"), 1500.0);
        assert_eq!(classifier.suggest_amount("Hotel"), 2500.0);
        assert_eq!(classifier.suggest_amount("Other"), 100.0);
        assert_eq!(classifier.suggest_amount("Zorbing"), 100.0);
    }

    #[test]
    fn test_classify_lunch_scenario() {
        let result = KeywordClassifier::new().classify("Lunch at Starbucks with friends");

        assert_eq!(result.predicted_category, "Food");
        assert_eq!(result.confidence, 100);
        assert_eq!(result.suggested_amount, 250.0);
    }

    #[test]
    fn test_classify_unknown_scenario() {
        let result = KeywordClassifier::new().classify("asdkjhasd random text");

        assert_eq!(result.predicted_category, "Other");
        assert_eq!(result.confidence, 0);
        assert_eq!(result.suggested_amount, 100.0);
    }

    #[test]
    fn test_categories_in_priority_order() {
        let classifier = KeywordClassifier::new();

        assert_eq!(
            classifier.categories().collect::<Vec<_>>(),
            vec![
                "Food", "Transportation", "Entertainment", "Bills", "Shopping",
                "Healthcare", "Education", "Hotel", "Other",
            ]
        );
    }

    #[test]
    fn test_keyword_lookup() {
        let classifier = KeywordClassifier::new();

        assert_eq!(classifier.keywords_for("Other"), None);
        assert_eq!(classifier.keywords_for("food"), None);
        assert!(classifier.keywords_for("Bills").unwrap().contains(&"mobile"));
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = KeywordClassifier::new().classify("Uber ride home");
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["predictedCategory"], "Transportation");
        assert_eq!(json["confidence"], 70);
        assert_eq!(json["suggestedAmount"], 150.0);
    }
}
