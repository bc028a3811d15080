use proptest::prelude::*;

use expense_tracker::{KeywordClassifier, CATEGORY_KEYWORDS};

// No keyword in the table can be spelled with only these letters
const FILLER: &str = "[jkqxz ]{0,24}";

fn priority(category: &str) -> usize {
    CATEGORY_KEYWORDS
        .iter()
        .position(|row| row.category == category)
        .unwrap_or(CATEGORY_KEYWORDS.len())
}

proptest! {
    #[test]
    fn prop_no_keyword_means_other(text in FILLER) {
        let classifier = KeywordClassifier::new();
        prop_assert_eq!(classifier.predict_category(&text), "Other");
    }

    #[test]
    fn prop_single_keyword_predicts_its_category(
        row in 0..CATEGORY_KEYWORDS.len(),
        pick in any::<prop::sample::Index>(),
        prefix in FILLER,
        suffix in FILLER,
        upper in any::<bool>(),
    ) {
        let classifier = KeywordClassifier::new();
        let entry = &CATEGORY_KEYWORDS[row];
        let keyword = entry.keywords[pick.index(entry.keywords.len())];

        // "mobile" is shared with an earlier category
        prop_assume!(classifier.predict_category(keyword) == entry.category);

        let keyword = if upper { keyword.to_uppercase() } else { keyword.to_string() };
        let text = format!("{} {} {}", prefix, keyword, suffix);

        prop_assert_eq!(classifier.predict_category(&text), entry.category);
        prop_assert!(classifier.confidence(&text, entry.category) >= 70);
    }

    #[test]
    fn prop_earlier_category_wins(
        first in 0..CATEGORY_KEYWORDS.len(),
        second in 0..CATEGORY_KEYWORDS.len(),
        pick_a in any::<prop::sample::Index>(),
        pick_b in any::<prop::sample::Index>(),
    ) {
        prop_assume!(first < second);

        let classifier = KeywordClassifier::new();
        let a = &CATEGORY_KEYWORDS[first];
        let b = &CATEGORY_KEYWORDS[second];
        let kw_a = a.keywords[pick_a.index(a.keywords.len())];
        let kw_b = b.keywords[pick_b.index(b.keywords.len())];

        // Some keywords embed another category's keyword ("training" holds "train")
        prop_assume!(classifier.predict_category(kw_a) == a.category);
        prop_assume!(priority(classifier.predict_category(kw_b)) >= first);

        // Later category's keyword placed first in the text
        let text = format!("{} and {}", kw_b, kw_a);

        prop_assert_eq!(classifier.predict_category(&text), a.category);
    }

    #[test]
    fn prop_confidence_is_bounded(text in ".{0,64}") {
        let classifier = KeywordClassifier::new();
        for row in CATEGORY_KEYWORDS {
            let score = classifier.confidence(&text, row.category);
            prop_assert!(score <= 100);
            prop_assert!(score == 0 || score >= 40);
        }
    }
}
