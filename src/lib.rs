// Expense Tracker - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod categories;     // Ordered keyword + average tables
pub mod classifier;     // Keyword classifier
pub mod config;
pub mod db;
pub mod insights;       // Spending insight generator
pub mod logging;

#[cfg(feature = "server")]
pub mod server;

// Re-export commonly used types
pub use categories::{
    CategoryKeywords, CATEGORY_AVERAGES, CATEGORY_KEYWORDS, DEFAULT_SUGGESTED_AMOUNT,
    OTHER_CATEGORY, TABLE_VERSION,
};
pub use classifier::{ClassificationResult, KeywordClassifier};
pub use config::AppConfig;
pub use db::{
    Expense, NewExpense, ValidationError,
    open_database, setup_database, load_csv, insert_expenses,
    get_all_expenses, get_category_totals, get_total_expenses, count_expenses,
};
pub use insights::{CategoryTotals, InsightGenerator, InsightResult, ONBOARDING_MESSAGE};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
