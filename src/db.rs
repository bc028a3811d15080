use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use rusqlite::{params, Connection, OptionalExtension, Params, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::insights::CategoryTotals;

/// Persisted expense record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub category: String,
    pub amount: f64,
    pub description: Option<String>,

    /// Calendar date, serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
}

/// Create/update payload (everything but the store-assigned id).
/// Also the row shape of the CSV import: `category,amount,description,date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub category: String,
    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
    pub date: NaiveDate,
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Category is required")]
    MissingCategory,

    #[error("Amount must be a finite, non-negative number")]
    InvalidAmount,
}

impl NewExpense {
    pub fn new(category: &str, amount: f64, description: Option<&str>, date: NaiveDate) -> Self {
        NewExpense {
            category: category.to_string(),
            amount,
            description: description.map(str::to_string),
            date,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.category.trim().is_empty() {
            return Err(ValidationError::MissingCategory);
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(ValidationError::InvalidAmount);
        }
        Ok(())
    }
}

const EXPENSE_COLUMNS: &str = "id, category, amount, description, date";

fn row_to_expense(row: &Row) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: row.get(0)?,
        category: row.get(1)?,
        amount: row.get(2)?,
        description: row.get(3)?,
        date: row.get(4)?,
    })
}

/// Run a `SELECT <EXPENSE_COLUMNS> ... ` query tail and collect the rows
fn query_expenses<P: Params>(conn: &Connection, tail: &str, params: P) -> Result<Vec<Expense>> {
    let sql = format!("SELECT {} FROM expenses {}", EXPENSE_COLUMNS, tail);
    let mut stmt = conn.prepare(&sql)?;

    let expenses = stmt
        .query_map(params, row_to_expense)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(expenses)
}

// ============================================================================
// Setup
// ============================================================================

/// Open (or create) the database file and make sure the schema exists
pub fn open_database(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory {:?}", parent))?;
        }
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database {:?}", db_path))?;
    setup_database(&conn)?;

    tracing::debug!(path = ?db_path, "database ready");
    Ok(conn)
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS expenses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            category TEXT NOT NULL,
            amount REAL NOT NULL,
            description TEXT,
            date TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_expenses_category ON expenses(category)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date)",
        [],
    )?;

    Ok(())
}

// ============================================================================
// CSV import
// ============================================================================

/// Load and validate `category,amount,description,date` rows
pub fn load_csv(csv_path: &Path) -> Result<Vec<NewExpense>> {
    let mut rdr = csv::Reader::from_path(csv_path).context("Failed to open CSV file")?;

    let mut expenses = Vec::new();

    for (index, result) in rdr.deserialize().enumerate() {
        // Header is line 1
        let line = index + 2;
        let expense: NewExpense =
            result.with_context(|| format!("Failed to deserialize expense on line {}", line))?;

        expense
            .validate()
            .with_context(|| format!("Invalid expense on line {}", line))?;

        expenses.push(expense);
    }

    Ok(expenses)
}

/// Insert a batch atomically, returning how many rows were written
pub fn insert_expenses(conn: &Connection, expenses: &[NewExpense]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;

    for expense in expenses {
        insert_expense(&tx, expense)?;
    }

    tx.commit()?;

    tracing::info!(inserted = expenses.len(), "imported expenses");
    Ok(expenses.len())
}

// ============================================================================
// CRUD
// ============================================================================

pub fn insert_expense(conn: &Connection, expense: &NewExpense) -> Result<Expense> {
    conn.execute(
        "INSERT INTO expenses (category, amount, description, date) VALUES (?1, ?2, ?3, ?4)",
        params![expense.category, expense.amount, expense.description, expense.date],
    )?;

    let id = conn.last_insert_rowid();
    tracing::debug!(id, category = %expense.category, "expense created");

    Ok(Expense {
        id,
        category: expense.category.clone(),
        amount: expense.amount,
        description: expense.description.clone(),
        date: expense.date,
    })
}

pub fn get_expense(conn: &Connection, id: i64) -> Result<Option<Expense>> {
    let sql = format!("SELECT {} FROM expenses WHERE id = ?1", EXPENSE_COLUMNS);

    let expense = conn
        .query_row(&sql, [id], row_to_expense)
        .optional()?;

    Ok(expense)
}

pub fn get_all_expenses(conn: &Connection) -> Result<Vec<Expense>> {
    query_expenses(conn, "ORDER BY id", [])
}

/// Replace every field of an existing expense. `None` when the id is unknown.
pub fn update_expense(conn: &Connection, id: i64, expense: &NewExpense) -> Result<Option<Expense>> {
    let changed = conn.execute(
        "UPDATE expenses SET category = ?1, amount = ?2, description = ?3, date = ?4 WHERE id = ?5",
        params![expense.category, expense.amount, expense.description, expense.date, id],
    )?;

    if changed == 0 {
        return Ok(None);
    }

    tracing::debug!(id, "expense updated");
    get_expense(conn, id)
}

/// Returns false when there was nothing to delete
pub fn delete_expense(conn: &Connection, id: i64) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM expenses WHERE id = ?1", [id])?;
    if deleted > 0 {
        tracing::debug!(id, "expense deleted");
    }
    Ok(deleted > 0)
}

pub fn count_expenses(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?;

    Ok(count)
}

// ============================================================================
// Finders
// ============================================================================

pub fn get_expenses_by_category(conn: &Connection, category: &str) -> Result<Vec<Expense>> {
    query_expenses(conn, "WHERE category = ?1 ORDER BY id", [category])
}

/// Inclusive on both ends
pub fn get_expenses_by_date_range(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Expense>> {
    query_expenses(conn, "WHERE date BETWEEN ?1 AND ?2 ORDER BY id", params![start, end])
}

pub fn get_expenses_by_category_and_date_range(
    conn: &Connection,
    category: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Expense>> {
    query_expenses(
        conn,
        "WHERE category = ?1 AND date BETWEEN ?2 AND ?3 ORDER BY id",
        params![category, start, end],
    )
}

pub fn get_expenses_by_date(conn: &Connection, date: NaiveDate) -> Result<Vec<Expense>> {
    query_expenses(conn, "WHERE date = ?1 ORDER BY id", [date])
}

/// Strictly greater than `amount`
pub fn get_expenses_greater_than(conn: &Connection, amount: f64) -> Result<Vec<Expense>> {
    query_expenses(conn, "WHERE amount > ?1 ORDER BY id", [amount])
}

/// Strictly less than `amount`
pub fn get_expenses_less_than(conn: &Connection, amount: f64) -> Result<Vec<Expense>> {
    query_expenses(conn, "WHERE amount < ?1 ORDER BY id", [amount])
}

/// Inclusive on both ends
pub fn get_expenses_in_amount_range(conn: &Connection, min: f64, max: f64) -> Result<Vec<Expense>> {
    query_expenses(conn, "WHERE amount >= ?1 AND amount <= ?2 ORDER BY id", [min, max])
}

/// Case-insensitive substring match on the description
pub fn search_expenses_by_description(conn: &Connection, keyword: &str) -> Result<Vec<Expense>> {
    query_expenses(
        conn,
        "WHERE description IS NOT NULL AND instr(lower(description), lower(?1)) > 0 ORDER BY id",
        [keyword],
    )
}

/// Newest first
pub fn get_expenses_ordered_by_date(conn: &Connection) -> Result<Vec<Expense>> {
    query_expenses(conn, "ORDER BY date DESC, id DESC", [])
}

/// Highest first
pub fn get_expenses_ordered_by_amount(conn: &Connection) -> Result<Vec<Expense>> {
    query_expenses(conn, "ORDER BY amount DESC, id", [])
}

/// First and last day of a calendar month
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .with_context(|| format!("Invalid month {}-{}", year, month))?;

    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .with_context(|| format!("Month after {}-{} is out of range", year, month))?;

    let last = next_first
        .pred_opt()
        .with_context(|| format!("Invalid month {}-{}", year, month))?;

    Ok((first, last))
}

pub fn get_expenses_for_month(conn: &Connection, year: i32, month: u32) -> Result<Vec<Expense>> {
    let (start, end) = month_bounds(year, month)?;
    get_expenses_by_date_range(conn, start, end)
}

/// Expenses dated in the current local calendar month
pub fn get_current_month_expenses(conn: &Connection) -> Result<Vec<Expense>> {
    let today = Local::now().date_naive();
    get_expenses_for_month(conn, today.year(), today.month())
}

// ============================================================================
// Aggregates
// ============================================================================

pub fn get_total_expenses(conn: &Connection) -> Result<f64> {
    let total: f64 = conn.query_row("SELECT COALESCE(SUM(amount), 0.0) FROM expenses", [], |row| {
        row.get(0)
    })?;

    Ok(total)
}

/// 0.0 for a category with no expenses
pub fn get_total_amount_by_category(conn: &Connection, category: &str) -> Result<f64> {
    let total: f64 = conn.query_row(
        "SELECT COALESCE(SUM(amount), 0.0) FROM expenses WHERE category = ?1",
        [category],
        |row| row.get(0),
    )?;

    Ok(total)
}

/// Sum of amounts per category, categories in the order they first appear
pub fn get_category_totals(conn: &Connection) -> Result<CategoryTotals> {
    let mut stmt = conn.prepare(
        "SELECT category, SUM(amount)
         FROM expenses
         GROUP BY category
         ORDER BY MIN(id)",
    )?;

    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows.into_iter().collect())
}

/// Sum of `amount`; 0.0 (not -0.0) for an empty slice
pub fn sum_amounts(expenses: &[Expense]) -> f64 {
    expenses.iter().fold(0.0, |acc, e| acc + e.amount)
}
