// 💡 Spending Insights
// Finds the dominant category in a totals snapshot and phrases a recommendation

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Returned when there is nothing to analyze
pub const ONBOARDING_MESSAGE: &str = "Start tracking expenses to get AI insights!";

/// Share above which the top category gets a budgeting recommendation
const BUDGET_THRESHOLD_PERCENT: f64 = 40.0;

/// Below this many categories the user is nudged to categorize more finely
const MIN_DISTINCT_CATEGORIES: usize = 3;

// ============================================================================
// CATEGORY TOTALS
// ============================================================================

/// Ordered category -> total snapshot.
///
/// Keeps first-insertion order so the max tie-break and the JSON output are
/// deterministic. Serializes as a JSON object in that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTotals {
    entries: Vec<(String, f64)>,
}

impl CategoryTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate `amount` into `category`, appending it if unseen
    pub fn add(&mut self, category: &str, amount: f64) {
        match self.entries.iter_mut().find(|(name, _)| name == category) {
            Some((_, total)) => *total += amount,
            None => self.entries.push((category.to_string(), amount)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of every category total, 0.0 when empty
    pub fn grand_total(&self) -> f64 {
        self.entries.iter().fold(0.0, |acc, (_, total)| acc + total)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(name, total)| (name.as_str(), *total))
    }

    /// Largest total; ties go to the category inserted first
    pub fn top(&self) -> Option<(&str, f64)> {
        let mut best: Option<(&str, f64)> = None;

        for (name, total) in self.iter() {
            match best {
                Some((_, best_total)) if total <= best_total => {}
                _ => best = Some((name, total)),
            }
        }

        best
    }
}

impl<S: AsRef<str>> FromIterator<(S, f64)> for CategoryTotals {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut totals = CategoryTotals::new();
        for (category, amount) in iter {
            totals.add(category.as_ref(), amount);
        }
        totals
    }
}

impl Serialize for CategoryTotals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, total) in &self.entries {
            map.serialize_entry(name, total)?;
        }
        map.end()
    }
}

// ============================================================================
// INSIGHT GENERATOR
// ============================================================================

/// Structured form of an insight
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightResult {
    pub top_category: String,

    /// Percentage of the total, 0-100
    pub top_category_share: f64,

    pub message: String,
}

/// Stateless generator of templated spending insights
#[derive(Debug, Clone, Copy, Default)]
pub struct InsightGenerator;

impl InsightGenerator {
    pub fn new() -> Self {
        InsightGenerator
    }

    /// Analyze a snapshot. `None` when there is no data or the total is not
    /// positive; an all-zero snapshot counts as no data.
    pub fn analyze(&self, totals: &CategoryTotals, total_spent: f64) -> Option<InsightResult> {
        if totals.is_empty() || total_spent.is_nan() || total_spent <= 0.0 {
            return None;
        }

        let (top_category, top_amount) = totals.top()?;
        let share = (top_amount / total_spent) * 100.0;

        let mut message = format!(
            "💡 AI Insight: Your highest spending is on {} ({:.1}% of total). ",
            top_category, share
        );

        if share > BUDGET_THRESHOLD_PERCENT {
            message.push_str(&format!(
                "Consider setting a budget for {} to control spending.",
                top_category
            ));
        } else if totals.len() < MIN_DISTINCT_CATEGORIES {
            message.push_str("Try categorizing expenses more specifically for better insights.");
        } else {
            message.push_str("Your spending is well-distributed across categories. Good job! 👍");
        }

        Some(InsightResult {
            top_category: top_category.to_string(),
            top_category_share: share,
            message,
        })
    }

    /// Insight sentence for a snapshot, never empty
    pub fn generate_insight(&self, totals: &CategoryTotals, total_spent: f64) -> String {
        self.analyze(totals, total_spent)
            .map(|insight| insight.message)
            .unwrap_or_else(|| ONBOARDING_MESSAGE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(entries: &[(&str, f64)]) -> CategoryTotals {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_empty_snapshot_is_onboarding() {
        let insight = InsightGenerator::new().generate_insight(&CategoryTotals::new(), 0.0);
        assert_eq!(insight, ONBOARDING_MESSAGE);
    }

    #[test]
    fn test_zero_total_guard() {
        let generator = InsightGenerator::new();
        let snapshot = totals(&[("Food", 0.0), ("Bills", 0.0)]);

        assert_eq!(generator.generate_insight(&snapshot, 0.0), ONBOARDING_MESSAGE);
        assert_eq!(generator.generate_insight(&snapshot, -5.0), ONBOARDING_MESSAGE);
        assert_eq!(generator.generate_insight(&snapshot, f64::NAN), ONBOARDING_MESSAGE);
        assert!(generator.analyze(&snapshot, 0.0).is_none());
    }

    #[test]
    fn test_dominant_category_gets_budget_advice() {
        let snapshot = totals(&[("Food", 450.0), ("Bills", 50.0)]);
        let result = InsightGenerator::new().analyze(&snapshot, 500.0).unwrap();

        assert_eq!(result.top_category, "Food");
        assert!((result.top_category_share - 90.0).abs() < 1e-9);
        assert_eq!(
            result.message,
            "💡 AI Insight: Your highest spending is on Food (90.0% of total). \
             Consider setting a budget for Food to control spending."
        );
    }

    #[test]
    fn test_balanced_spending() {
        let snapshot = totals(&[("Food", 34.0), ("Transportation", 33.0), ("Bills", 33.0)]);
        let message = InsightGenerator::new().generate_insight(&snapshot, 100.0);

        assert!(message.contains("Food (34.0% of total)"));
        assert!(message.ends_with("Good job! 👍"));
    }

    #[test]
    fn test_few_categories_without_dominance() {
        let snapshot = totals(&[("Food", 35.0), ("Bills", 30.0)]);
        let message = InsightGenerator::new().generate_insight(&snapshot, 100.0);

        assert!(message.contains("Food (35.0% of total)"));
        assert!(message.ends_with("Try categorizing expenses more specifically for better insights."));
    }

    #[test]
    fn test_tie_goes_to_first_inserted() {
        let snapshot = totals(&[("Bills", 50.0), ("Food", 50.0), ("Hotel", 10.0)]);
        assert_eq!(snapshot.top(), Some(("Bills", 50.0)));

        let snapshot = totals(&[("Food", 50.0), ("Bills", 50.0)]);
        assert_eq!(snapshot.top(), Some(("Food", 50.0)));
    }

    #[test]
    fn test_totals_accumulate_in_first_seen_order() {
        let mut snapshot = CategoryTotals::new();
        snapshot.add("Food", 10.0);
        snapshot.add("Bills", 5.0);
        snapshot.add("Food", 2.5);

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.top(), Some(("Food", 12.5)));
        assert_eq!(snapshot.grand_total(), 17.5);

        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(json, r#"{"Food":12.5,"Bills":5.0}"#);
    }

    #[test]
    fn test_empty_grand_total_is_positive_zero() {
        let total = CategoryTotals::new().grand_total();
        assert_eq!(total, 0.0);
        assert!(total.is_sign_positive());
    }
}
