//! JSON expense file discovery and loading.
//!
//! An expense file is either a bare JSON array of records or an object with an
//! `"expenses"` array (the shape of a browser storage export). Records are
//! validated and resolved to calendar dates on the way in; bad records are
//! logged and skipped rather than failing the whole load.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use spend_core::error::{Result, TrackerError};
use spend_core::models::{Expense, ExpenseRecord};
use spend_core::time_utils::TimezoneHandler;

/// Accepted top-level layouts of an expense file.
///
/// Entries stay untyped here so one malformed record cannot reject the file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExpenseFile {
    List(Vec<Value>),
    Wrapped { expenses: Vec<Value> },
}

impl ExpenseFile {
    fn into_entries(self) -> Vec<Value> {
        match self {
            ExpenseFile::List(entries) => entries,
            ExpenseFile::Wrapped { expenses } => expenses,
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all `.json` files recursively under `data_path`, sorted by path.
pub fn find_expense_files(data_path: &Path) -> Vec<PathBuf> {
    if !data_path.exists() {
        warn!("Data path does not exist: {}", data_path.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(data_path)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext == "json")
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Load expenses from a single file or from every `.json` file under a
/// directory.
///
/// * A single file that cannot be read or parsed is an error.
/// * Inside a directory, unreadable or malformed files are skipped.
/// * Invalid records are skipped; the first record with a given id wins.
///
/// The result is sorted by date; expenses on the same day keep file order.
pub fn load_expenses(path: &Path, tz: &TimezoneHandler) -> Result<Vec<Expense>> {
    if !path.exists() {
        return Err(TrackerError::DataPathNotFound(path.to_path_buf()));
    }

    let records = if path.is_dir() {
        let files = find_expense_files(path);
        if files.is_empty() {
            return Err(TrackerError::NoDataFiles(path.to_path_buf()));
        }

        let mut records = Vec::new();
        for file in &files {
            match read_records(file) {
                Ok(found) => records.extend(found),
                Err(e) => warn!("Skipping {}: {}", file.display(), e),
            }
        }
        records
    } else {
        read_records(path)?
    };

    let expenses = resolve_records(records, tz);
    debug!("Loaded {} expenses from {}", expenses.len(), path.display());
    Ok(expenses)
}

/// Read the raw records of one expense file.
///
/// Entries whose fields have the wrong shape (missing `id`, a string amount,
/// a null date) are skipped with a warning; the rest of the file is kept.
pub fn read_records(file_path: &Path) -> Result<Vec<ExpenseRecord>> {
    let content = std::fs::read_to_string(file_path).map_err(|source| TrackerError::FileRead {
        path: file_path.to_path_buf(),
        source,
    })?;

    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let file: ExpenseFile = serde_json::from_str(&content)?;
    let records = file
        .into_entries()
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let label = entry
                .get("id")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("#{}", index));
            match serde_json::from_value::<ExpenseRecord>(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping expense {} in {}: {}", label, file_path.display(), e);
                    None
                }
            }
        })
        .collect();

    Ok(records)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Validate, de-duplicate and date-sort raw records.
fn resolve_records(records: Vec<ExpenseRecord>, tz: &TimezoneHandler) -> Vec<Expense> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut expenses: Vec<Expense> = Vec::with_capacity(records.len());
    let mut skipped = 0usize;

    for record in records {
        if seen.contains(&record.id) {
            debug!("Duplicate expense id {} ignored", record.id);
            skipped += 1;
            continue;
        }
        let id = record.id.clone();
        match record.into_expense(tz) {
            Ok(expense) => {
                seen.insert(id);
                expenses.push(expense);
            }
            Err(e) => {
                warn!("Skipping expense {}: {}", id, e);
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        debug!("{} records skipped", skipped);
    }

    expenses.sort_by_key(|e| e.date);
    expenses
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use spend_core::models::Category;
    use std::fs;
    use tempfile::TempDir;

    fn utc() -> TimezoneHandler {
        TimezoneHandler::new("UTC")
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    const SAMPLE: &str = r#"[
        {"id": "1", "date": "2023-10-05T10:00:00.000Z", "amount": 50, "category": "Food", "description": "Lunch"},
        {"id": "2", "date": "2023-10-15T12:00:00.000Z", "amount": 150, "category": "Wearables", "description": "Clothes"},
        {"id": "3", "date": "2023-09-20", "amount": 100, "category": "Food", "description": "Dinner"}
    ]"#;

    // ── find_expense_files ────────────────────────────────────────────────────

    #[test]
    fn test_find_expense_files_recursive_and_sorted() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b.json", "[]");
        write(dir.path(), "nested/a.json", "[]");
        write(dir.path(), "notes.txt", "ignore me");

        let files = find_expense_files(dir.path());
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("b.json"));
        assert!(files[1].ends_with("nested/a.json"));
    }

    #[test]
    fn test_find_expense_files_nonexistent_path() {
        let files = find_expense_files(Path::new("/definitely/not/here"));
        assert!(files.is_empty());
    }

    // ── load_expenses: single file ────────────────────────────────────────────

    #[test]
    fn test_load_expenses_from_file_sorted_by_date() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "expenses.json", SAMPLE);

        let expenses = load_expenses(&path, &utc()).unwrap();
        let ids: Vec<&str> = expenses.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
        assert_eq!(expenses[0].date, NaiveDate::from_ymd_opt(2023, 9, 20).unwrap());
        assert_eq!(expenses[2].category, Category::Wearables);
    }

    #[test]
    fn test_load_expenses_wrapped_object() {
        let dir = TempDir::new().unwrap();
        let content = format!(r#"{{"expenses": {}}}"#, SAMPLE);
        let path = write(dir.path(), "export.json", &content);

        let expenses = load_expenses(&path, &utc()).unwrap();
        assert_eq!(expenses.len(), 3);
    }

    #[test]
    fn test_load_expenses_empty_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "expenses.json", "  \n");
        assert!(load_expenses(&path, &utc()).unwrap().is_empty());
    }

    #[test]
    fn test_load_expenses_malformed_single_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "expenses.json", "{not json");
        let err = load_expenses(&path, &utc()).unwrap_err();
        assert!(matches!(err, TrackerError::JsonParse(_)));
    }

    #[test]
    fn test_load_expenses_missing_path() {
        let err = load_expenses(Path::new("/no/such/expenses.json"), &utc()).unwrap_err();
        assert!(matches!(err, TrackerError::DataPathNotFound(_)));
    }

    #[test]
    fn test_load_expenses_skips_invalid_records() {
        let dir = TempDir::new().unwrap();
        let content = r#"[
            {"id": "ok", "date": "2023-10-01", "amount": 10, "category": "Food", "description": "Fine"},
            {"id": "tiny", "date": "2023-10-01", "amount": 0.01, "category": "Food", "description": "Too small"},
            {"id": "cat", "date": "2023-10-01", "amount": 10, "category": "Yachts", "description": "Unknown"},
            {"id": "date", "date": "someday", "amount": 10, "category": "Food", "description": "Bad date"},
            {"id": "desc", "date": "2023-10-01", "amount": 10, "category": "Food", "description": ""}
        ]"#;
        let path = write(dir.path(), "expenses.json", content);

        let expenses = load_expenses(&path, &utc()).unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].id, "ok");
    }

    #[test]
    fn test_load_expenses_deduplicates_by_id() {
        let dir = TempDir::new().unwrap();
        let content = r#"[
            {"id": "1", "date": "2023-10-01", "amount": 10, "category": "Food", "description": "First"},
            {"id": "1", "date": "2023-10-02", "amount": 99, "category": "Bills", "description": "Second"}
        ]"#;
        let path = write(dir.path(), "expenses.json", content);

        let expenses = load_expenses(&path, &utc()).unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].description, "First");
    }

    #[test]
    fn test_load_expenses_invalid_record_does_not_claim_id() {
        let dir = TempDir::new().unwrap();
        let content = r#"[
            {"id": "1", "date": "2023-10-01", "amount": 0.0, "category": "Food", "description": "Bad"},
            {"id": "1", "date": "2023-10-02", "amount": 5, "category": "Food", "description": "Good"}
        ]"#;
        let path = write(dir.path(), "expenses.json", content);

        let expenses = load_expenses(&path, &utc()).unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].description, "Good");
    }

    #[test]
    fn test_load_expenses_uses_timezone_for_timestamps() {
        let dir = TempDir::new().unwrap();
        let content = r#"[
            {"id": "1", "date": "2023-11-01T02:00:00.000Z", "amount": 10, "category": "Food", "description": "Late dinner"}
        ]"#;
        let path = write(dir.path(), "expenses.json", content);

        let ny = TimezoneHandler::new("America/New_York");
        let expenses = load_expenses(&path, &ny).unwrap();
        assert_eq!(expenses[0].date, NaiveDate::from_ymd_opt(2023, 10, 31).unwrap());
    }

    #[test]
    fn test_load_expenses_skips_badly_typed_records() {
        let dir = TempDir::new().unwrap();
        let content = r#"[
            {"id": "1", "date": "2023-10-05", "amount": 50, "category": "Food", "description": "Lunch"},
            {"id": "2", "date": "2023-10-06", "amount": "12", "category": "Food", "description": "String amount"},
            {"date": "2023-10-07", "amount": 12, "category": "Food", "description": "No id"},
            {"id": "4", "date": null, "amount": 12, "category": "Food", "description": "Null date"}
        ]"#;
        let path = write(dir.path(), "expenses.json", content);

        let expenses = load_expenses(&path, &utc()).unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].id, "1");
    }

    #[test]
    fn test_load_expenses_directory_keeps_good_records_beside_bad_ones() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "mixed.json",
            r#"{"expenses": [
                {"id": "a", "date": "2023-10-05", "amount": 20, "category": "Food", "description": "Kept"},
                {"id": "b", "date": "2023-10-05", "amount": true, "category": "Food", "description": "Dropped"}
            ]}"#,
        );

        let expenses = load_expenses(dir.path(), &utc()).unwrap();
        let ids: Vec<&str> = expenses.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
    }

    #[test]
    fn test_read_records_rejects_non_list_document() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "expenses.json", r#"{"total": 12}"#);
        let err = read_records(&path).unwrap_err();
        assert!(matches!(err, TrackerError::JsonParse(_)));
    }

    // ── load_expenses: directory ──────────────────────────────────────────────

    #[test]
    fn test_load_expenses_from_directory_skips_bad_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.json", SAMPLE);
        write(dir.path(), "b.json", "{broken");
        write(
            dir.path(),
            "nested/c.json",
            r#"[{"id": "9", "date": "2023-10-30", "amount": 20, "category": "Transport", "description": "Taxi"}]"#,
        );

        let expenses = load_expenses(dir.path(), &utc()).unwrap();
        assert_eq!(expenses.len(), 4);
        assert_eq!(expenses.last().map(|e| e.id.as_str()), Some("9"));
    }

    #[test]
    fn test_load_expenses_empty_directory_is_error() {
        let dir = TempDir::new().unwrap();
        let err = load_expenses(dir.path(), &utc()).unwrap_err();
        assert!(matches!(err, TrackerError::NoDataFiles(_)));
    }

    // ── read_records ──────────────────────────────────────────────────────────

    #[test]
    fn test_read_records_missing_file_is_file_read_error() {
        let dir = TempDir::new().unwrap();
        let err = read_records(&dir.path().join("gone.json")).unwrap_err();
        assert!(matches!(err, TrackerError::FileRead { .. }));
    }
}
