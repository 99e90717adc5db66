// 🗂️ Account Store - line-delimited `email|password` file
//
// The file is the only state shared between accounts and between the two jobs:
// - job 1 appends a line after each successful registration
// - job 2 rewrites the file without an account once it reaches the points threshold
//
// Every mutation is a plain read-modify-write with no locking and no temp-file rename.
// A writer touching the file between our read and our write loses its change.

use crate::logging::{log, Severity};
use anyhow::{Context, Result};
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

// ============================================================================
// ACCOUNT RECORD
// ============================================================================

/// One `email|password` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    pub email: String,
    pub password: String,
}

impl AccountRecord {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        AccountRecord {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Parse a line on its first `|`; everything after it is the password, kept verbatim.
    /// Returns None for blank lines and lines without a separator.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(|c: char| c == '\r' || c == '\n');
        if line.trim().is_empty() {
            return None;
        }
        let (email, password) = line.split_once('|')?;
        Some(AccountRecord::new(email.trim(), password))
    }

    pub fn serialize(&self) -> String {
        format!("{}|{}", self.email, self.password)
    }
}

impl fmt::Display for AccountRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

/// Email part of a raw store line (the whole line when it has no `|`).
fn email_of(line: &str) -> &str {
    let line = line.trim();
    match line.split_once('|') {
        Some((email, _)) => email.trim(),
        None => line,
    }
}

// ============================================================================
// LINE FILES
// ============================================================================

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    Ok(data
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect())
}

/// Read a line-delimited file, dropping blank lines.
///
/// Never fails: a missing or unreadable file is logged and yields an empty list.
pub fn load_lines(path: impl AsRef<Path>) -> Vec<String> {
    let path = path.as_ref();
    match read_lines(path) {
        Ok(lines) => lines,
        Err(e) => {
            log(Severity::Error, format!("{:#}", e));
            Vec::new()
        }
    }
}

// ============================================================================
// ACCOUNT STORE
// ============================================================================

#[derive(Debug, Clone)]
pub struct AccountStore {
    path: PathBuf,
}

impl AccountStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        AccountStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All parseable records in file order. Read errors give an empty list.
    pub fn load_all(&self) -> Vec<AccountRecord> {
        let lines = match read_lines(&self.path) {
            Ok(lines) => lines,
            Err(e) => {
                log(
                    Severity::Error,
                    format!("Failed to read accounts file: {:#}", e),
                );
                return Vec::new();
            }
        };

        lines
            .iter()
            .filter_map(|line| {
                let record = AccountRecord::parse(line);
                if record.is_none() {
                    log(
                        Severity::Warning,
                        format!("Skipping malformed line in {}: {}", self.path.display(), line),
                    );
                }
                record
            })
            .collect()
    }

    fn try_append(&self, record: &AccountRecord) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open {} for append", self.path.display()))?;

        write!(file, "\n{}", record.serialize())
            .with_context(|| format!("Failed to append to {}", self.path.display()))?;
        Ok(())
    }

    /// Append `"\n" + record` to the file, creating it if needed.
    /// Returns whether the line was written.
    pub fn append_record(&self, record: &AccountRecord) -> bool {
        match self.try_append(record) {
            Ok(()) => true,
            Err(e) => {
                log(Severity::Error, format!("{:#}", e));
                false
            }
        }
    }

    fn write_lines(&self, lines: &[String]) -> Result<()> {
        fs::write(&self.path, lines.join("\n"))
            .with_context(|| format!("Error writing to {}", self.path.display()))
    }

    /// Drop every line whose email equals `email` and rewrite the file.
    ///
    /// Returns how many lines were removed. Nothing is rewritten when nothing matched
    /// or when the file could not be read, so a repeated call leaves the file as is.
    pub fn remove_by_email(&self, email: &str) -> usize {
        let email = email.trim();
        let lines = match read_lines(&self.path) {
            Ok(lines) => lines,
            Err(e) => {
                log(
                    Severity::Error,
                    format!("Failed to read accounts file: {:#}", e),
                );
                return 0;
            }
        };

        let before = lines.len();
        let kept: Vec<String> = lines
            .into_iter()
            .filter(|line| email_of(line) != email)
            .collect();
        let removed = before - kept.len();

        if removed == 0 {
            log(Severity::Info, format!("No account with email {} in store.", email));
            return 0;
        }

        if let Err(e) = self.write_lines(&kept) {
            log(Severity::Error, format!("{:#}", e));
            return 0;
        }

        log(Severity::Success, "Accounts file updated successfully.");
        log(
            Severity::Success,
            format!("Account with email {} deleted successfully.", email),
        );
        removed
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with(contents: &str) -> (TempDir, AccountStore) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("accounts.txt");
        fs::write(&path, contents).unwrap();
        (dir, AccountStore::new(path))
    }

    fn raw_lines(store: &AccountStore) -> usize {
        fs::read_to_string(store.path())
            .unwrap()
            .lines()
            .filter(|l| !l.trim().is_empty())
            .count()
    }

    #[test]
    fn test_parse_splits_on_first_pipe() {
        let record = AccountRecord::parse("a@x.com|pa|ss").unwrap();
        assert_eq!(record.email, "a@x.com");
        assert_eq!(record.password, "pa|ss");
        assert_eq!(record.serialize(), "a@x.com|pa|ss");
    }

    #[test]
    fn test_parse_keeps_password_whitespace() {
        let record = AccountRecord::parse("  a@x.com | pass \r").unwrap();
        assert_eq!(record.email, "a@x.com");
        assert_eq!(record.password, " pass ");
    }

    #[test]
    fn test_append_preserves_password_whitespace() {
        let dir = TempDir::new().unwrap();
        let store = AccountStore::new(dir.path().join("accounts.txt"));

        let record = AccountRecord::parse("a@x.com| pass ").unwrap();
        assert!(store.append_record(&record));
        assert_eq!(store.load_all(), vec![AccountRecord::new("a@x.com", " pass ")]);
    }

    #[test]
    fn test_parse_rejects_blank_and_unseparated() {
        assert!(AccountRecord::parse("   ").is_none());
        assert!(AccountRecord::parse("no-separator").is_none());
    }

    #[test]
    fn test_load_all_skips_blank_lines() {
        let (_dir, store) = store_with("\na@x.com|p1\n\n\nb@x.com|p2\r\n");
        let records = store.load_all();
        assert_eq!(
            records,
            vec![
                AccountRecord::new("a@x.com", "p1"),
                AccountRecord::new("b@x.com", "p2"),
            ]
        );
    }

    #[test]
    fn test_load_all_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = AccountStore::new(dir.path().join("missing.txt"));
        assert!(store.load_all().is_empty());
    }

    #[test]
    fn test_append_record_lands_last() {
        let (_dir, store) = store_with("a@x.com|p1");
        let before = raw_lines(&store);

        let bob = AccountRecord::new("bob@x.com", "secret");
        assert!(store.append_record(&bob));

        assert_eq!(raw_lines(&store), before + 1);
        assert_eq!(store.load_all().last(), Some(&bob));
        assert!(fs::read_to_string(store.path())
            .unwrap()
            .ends_with("\nbob@x.com|secret"));
    }

    #[test]
    fn test_append_record_creates_file() {
        let dir = TempDir::new().unwrap();
        let store = AccountStore::new(dir.path().join("accounts.txt"));

        assert!(store.append_record(&AccountRecord::new("bob@x.com", "secret")));
        assert_eq!(store.load_all(), vec![AccountRecord::new("bob@x.com", "secret")]);
    }

    #[test]
    fn test_remove_single_account_empties_store() {
        let (_dir, store) = store_with("a@x.com|p1");
        assert_eq!(store.remove_by_email("a@x.com"), 1);
        assert!(store.load_all().is_empty());
    }

    #[test]
    fn test_remove_keeps_relative_order() {
        let (_dir, store) = store_with("a@x.com|1\nb@x.com|2\nc@x.com|3\nb@x.com|4\nd@x.com|5");
        assert_eq!(store.remove_by_email("b@x.com"), 2);

        let emails: Vec<String> = store.load_all().into_iter().map(|r| r.email).collect();
        assert_eq!(emails, vec!["a@x.com", "c@x.com", "d@x.com"]);
    }

    #[test]
    fn test_remove_matches_whole_email_only() {
        let (_dir, store) = store_with("a@x.com|1\na@x.com.au|2");
        assert_eq!(store.remove_by_email("a@x.com"), 1);
        assert_eq!(store.load_all(), vec![AccountRecord::new("a@x.com.au", "2")]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (_dir, store) = store_with("a@x.com|1\nb@x.com|2");
        assert_eq!(store.remove_by_email("a@x.com"), 1);
        let after_first = fs::read_to_string(store.path()).unwrap();

        assert_eq!(store.remove_by_email("a@x.com"), 0);
        assert_eq!(fs::read_to_string(store.path()).unwrap(), after_first);
    }

    #[test]
    fn test_remove_on_missing_file_does_not_create_it() {
        let dir = TempDir::new().unwrap();
        let store = AccountStore::new(dir.path().join("missing.txt"));
        assert_eq!(store.remove_by_email("a@x.com"), 0);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_load_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("proxy.txt");
        fs::write(&path, "http://p1:8080\n\nhttp://p2:8080\n").unwrap();

        assert_eq!(load_lines(&path), vec!["http://p1:8080", "http://p2:8080"]);
        assert!(load_lines(dir.path().join("nope.txt")).is_empty());
    }
}
