use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use expense_tracker::{
    db, insert_expenses, load_csv, logging, open_database, AppConfig, Expense,
    InsightGenerator, KeywordClassifier, TABLE_VERSION,
};

#[derive(Parser, Debug)]
#[command(name = "expense-tracker", version, about = "Personal expense tracker")]
struct Cli {
    /// Config file (defaults to ./expense-tracker.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database file, overrides `database.path`
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import expenses from a `category,amount,description,date` CSV
    Import {
        csv: PathBuf,
    },

    /// Predict the category of a description
    Predict {
        description: String,
    },

    /// Print totals per category and the spending insight
    Insights,

    /// Show the keyword table in priority order
    Categories,

    /// List stored expenses
    List {
        #[arg(long, value_enum, default_value_t = SortOrder::Id)]
        sort: SortOrder,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SortOrder {
    Id,
    Date,
    Amount,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(db_path) = cli.db {
        config.database.path = db_path;
    }

    logging::init(&config.logging.filter);

    match cli.command {
        Command::Import { csv } => run_import(&config, &csv)?,
        Command::Predict { description } => run_predict(&description),
        Command::Insights => run_insights(&config)?,
        Command::Categories => run_categories(),
        Command::List { sort } => run_list(&config, sort)?,
    }

    Ok(())
}

fn run_import(config: &AppConfig, csv_path: &Path) -> Result<()> {
    println!("📂 Loading {}...", csv_path.display());
    let expenses = load_csv(csv_path)?;
    println!("✓ Loaded {} expenses from CSV", expenses.len());

    let conn = open_database(&config.database.path)?;
    let inserted = insert_expenses(&conn, &expenses)?;
    let count = db::count_expenses(&conn)?;

    println!("✓ Inserted {} expenses ({} in database)", inserted, count);
    Ok(())
}

fn run_predict(description: &str) {
    let result = KeywordClassifier::new().classify(description);

    println!("Category:         {}", result.predicted_category);
    println!("Confidence:       {}", result.confidence);
    println!("Suggested amount: {:.2}", result.suggested_amount);
}

fn run_categories() {
    let classifier = KeywordClassifier::new();
    println!("Keyword table v{}", TABLE_VERSION);

    for (priority, category) in classifier.categories().enumerate() {
        let keywords = classifier.keywords_for(category).map_or(0, |kws| kws.len());
        let average = classifier.suggest_amount(category);
        println!(
            "{:>2}. {:<16} {:>3} keywords  avg {:>8.2}",
            priority + 1,
            category,
            keywords,
            average
        );
    }
}

fn run_insights(config: &AppConfig) -> Result<()> {
    let conn = open_database(&config.database.path)?;
    let totals = db::get_category_totals(&conn)?;
    let total_spent = totals.grand_total();

    for (category, amount) in totals.iter() {
        println!("{:<16} {:>12.2}", category, amount);
    }
    println!("{:<16} {:>12.2}", "Total", total_spent);
    println!();
    println!("{}", InsightGenerator::new().generate_insight(&totals, total_spent));

    Ok(())
}

fn run_list(config: &AppConfig, sort: SortOrder) -> Result<()> {
    let conn = open_database(&config.database.path)?;

    let expenses: Vec<Expense> = match sort {
        SortOrder::Id => db::get_all_expenses(&conn)?,
        SortOrder::Date => db::get_expenses_ordered_by_date(&conn)?,
        SortOrder::Amount => db::get_expenses_ordered_by_amount(&conn)?,
    };

    for e in &expenses {
        println!(
            "{:>5}  {}  {:<16} {:>10.2}  {}",
            e.id,
            e.date,
            e.category,
            e.amount,
            e.description.as_deref().unwrap_or("")
        );
    }
    println!("{} expenses, total {:.2}", expenses.len(), db::sum_amounts(&expenses));

    Ok(())
}
