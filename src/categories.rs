// 🏷️ Category Tables - Rules as Data
// Ordered keyword and average-amount tables shared by the classifier

/// Bump whenever a keyword list, the priority order, or an average changes.
/// Predictions are only reproducible across deployments on the same version.
pub const TABLE_VERSION: u32 = 1;

/// Sentinel returned when nothing matches
pub const OTHER_CATEGORY: &str = "Other";

/// Suggested amount for categories missing from [`CATEGORY_AVERAGES`]
pub const DEFAULT_SUGGESTED_AMOUNT: f64 = 100.0;

// ============================================================================
// KEYWORD TABLE
// ============================================================================

/// One row of the keyword table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryKeywords {
    pub category: &'static str,

    /// Lowercase trigger substrings, checked in order
    pub keywords: &'static [&'static str],
}

/// Keyword table in priority order.
///
/// Position in this slice IS the tie-break: when a description contains
/// keywords of two categories, the earlier row wins. "mobile" appears under
/// both Bills and Shopping, so it always resolves to Bills.
pub static CATEGORY_KEYWORDS: &[CategoryKeywords] = &[
    CategoryKeywords {
        category: "Food",
        keywords: &[
            "restaurant", "food", "lunch", "dinner", "breakfast", "cafe", "coffee",
            "starbucks", "mcdonald", "pizza", "burger", "grocery", "supermarket",
            "swiggy", "zomato", "dominos", "kfc", "subway",
        ],
    },
    CategoryKeywords {
        category: "Transportation",
        keywords: &[
            "uber", "ola", "taxi", "bus", "metro", "train", "flight", "petrol",
            "diesel", "fuel", "parking", "toll", "auto", "rickshaw", "cab",
        ],
    },
    CategoryKeywords {
        category: "Entertainment",
        keywords: &[
            "movie", "cinema", "netflix", "spotify", "game", "concert", "theatre",
            "bowling", "party", "club", "bar", "entertainment", "fun", "hobby",
        ],
    },
    CategoryKeywords {
        category: "Bills",
        keywords: &[
            "electricity", "water", "gas", "internet", "mobile", "phone", "wifi",
            "maintenance", "rent", "emi", "loan", "insurance", "bill", "utility",
        ],
    },
    CategoryKeywords {
        category: "Shopping",
        keywords: &[
            "amazon", "flipkart", "shopping", "clothes", "shirt", "shoes", "bag",
            "electronics", "mobile", "laptop", "gift", "myntra", "ajio",
        ],
    },
    CategoryKeywords {
        category: "Healthcare",
        keywords: &[
            "doctor", "hospital", "medicine", "pharmacy", "medical", "health",
            "clinic", "dentist", "checkup", "apollo", "max", "fortis",
        ],
    },
    CategoryKeywords {
        category: "Education",
        keywords: &[
            "course", "education", "training", "certification", "udemy",
            "coursera", "school", "college", "tuition", "workshop", "seminar",
        ],
    },
    CategoryKeywords {
        category: "Hotel",
        keywords: &[
            "hotel", "accommodation", "stay", "resort", "lodge", "inn",
            "guesthouse", "airbnb", "oyo", "treebo", "fab hotels", "marriott",
            "taj", "hyatt", "hilton", "radisson", "room booking", "check-in",
            "booking.com", "makemytrip", "goibibo",
        ],
    },
];

// ============================================================================
// AVERAGE AMOUNT TABLE
// ============================================================================

/// Static per-category averages used as a suggestion, not derived from history
pub static CATEGORY_AVERAGES: &[(&str, f64)] = &[
    ("Food", 250.0),
    ("Transportation", 150.0),
    ("Entertainment", 400.0),
    ("Bills", 1200.0),
    ("Shopping", 800.0),
    ("Healthcare", 600.0),
    ("Education", 1500.0),
    ("Hotel", 2500.0),
];
