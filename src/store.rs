// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use csv::{ReaderBuilder, StringRecord};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::models::{DateRange, Expense, Income, Record};
use crate::utils::{parse_date, parse_decimal, parse_timestamp};

/// Where the command layer fetches a user's records from.
pub trait RecordSource {
    fn expenses(&self, user_id: i64, range: &DateRange) -> Result<Vec<Expense>>;
    fn income(&self, user_id: i64, range: &DateRange) -> Result<Vec<Income>>;
}

/// Point-in-time copy of every expense and income record, read once.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub expenses: Vec<Expense>,
    pub income: Vec<Income>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub kind: &'static str,
    pub detail: String,
}

impl Snapshot {
    pub fn new(expenses: Vec<Expense>, income: Vec<Income>) -> Self {
        Self { expenses, income }
    }

    pub fn load(expenses_path: &Path, income_path: &Path) -> Result<Self> {
        Ok(Self {
            expenses: load_expenses(expenses_path)?,
            income: load_income(income_path)?,
        })
    }

    pub fn owners(&self) -> BTreeSet<i64> {
        self.expenses
            .iter()
            .map(|e| e.user_id)
            .chain(self.income.iter().map(|i| i.user_id))
            .collect()
    }

    /// The owner of every record, if there is exactly one.
    pub fn sole_user(&self) -> Option<i64> {
        let owners = self.owners();
        if owners.len() == 1 {
            owners.into_iter().next()
        } else {
            None
        }
    }

    pub fn issues(&self) -> Vec<Issue> {
        let mut issues = Vec::new();
        collect_issues(&self.expenses, "expense", &mut issues);
        collect_issues(&self.income, "income", &mut issues);
        let owners = self.owners();
        if owners.len() > 1 {
            let ids: Vec<String> = owners.iter().map(|u| u.to_string()).collect();
            issues.push(Issue {
                kind: "multiple_users",
                detail: ids.join(", "),
            });
        }
        issues
    }
}

/// Fails on the first record that breaks the data-model invariants.
pub fn ensure_valid<R: Record>(records: &[R], what: &str) -> Result<()> {
    for r in records {
        r.validate()
            .with_context(|| format!("Invalid {} record", what))?;
    }
    Ok(())
}

impl RecordSource for Snapshot {
    fn expenses(&self, user_id: i64, range: &DateRange) -> Result<Vec<Expense>> {
        Ok(owned_in_range(&self.expenses, user_id, range))
    }

    fn income(&self, user_id: i64, range: &DateRange) -> Result<Vec<Income>> {
        Ok(owned_in_range(&self.income, user_id, range))
    }
}

fn owned_in_range<R: Record + Clone>(records: &[R], user_id: i64, range: &DateRange) -> Vec<R> {
    records
        .iter()
        .filter(|r| r.user_id() == user_id && range.contains(r.date()))
        .cloned()
        .collect()
}

fn collect_issues<R: Record>(records: &[R], what: &str, issues: &mut Vec<Issue>) {
    let mut seen = HashSet::new();
    for r in records {
        if let Err(e) = r.validate() {
            issues.push(Issue {
                kind: "invalid_record",
                detail: format!("{} {}", what, e),
            });
        }
        if !seen.insert(r.id()) {
            issues.push(Issue {
                kind: "duplicate_id",
                detail: format!("{} {}", what, r.id()),
            });
        }
    }
}

enum Format {
    Csv,
    Json,
}

fn format_of(path: &Path) -> Result<Format> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("csv") => Ok(Format::Csv),
        Some("json") => Ok(Format::Json),
        _ => Err(anyhow!(
            "Unsupported snapshot file {} (use .csv or .json)",
            path.display()
        )),
    }
}

pub fn load_expenses(path: &Path) -> Result<Vec<Expense>> {
    if !path.exists() {
        warn!(path = %path.display(), "expense file not found, using no expenses");
        return Ok(Vec::new());
    }
    let records = match format_of(path)? {
        Format::Csv => read_csv(path, expense_from_row)?,
        Format::Json => read_json(path)?,
    };
    debug!(path = %path.display(), count = records.len(), "loaded expenses");
    Ok(records)
}

pub fn load_income(path: &Path) -> Result<Vec<Income>> {
    if !path.exists() {
        warn!(path = %path.display(), "income file not found, using no income");
        return Ok(Vec::new());
    }
    let records = match format_of(path)? {
        Format::Csv => read_csv(path, income_from_row)?,
        Format::Json => read_json(path)?,
    };
    debug!(path = %path.display(), count = records.len(), "loaded income");
    Ok(records)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let raw = fs::read_to_string(path).with_context(|| format!("Read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Parse JSON {}", path.display()))
}

fn read_csv<T>(path: &Path, parse: fn(&StringRecord) -> Result<T>) -> Result<Vec<T>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path.display()))?;
    let mut out = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let rec = result?;
        // header is line 1
        let record = parse(&rec).with_context(|| format!("{} line {}", path.display(), i + 2))?;
        out.push(record);
    }
    Ok(out)
}

fn field<'r>(rec: &'r StringRecord, idx: usize, name: &str) -> Result<&'r str> {
    rec.get(idx)
        .map(str::trim)
        .with_context(|| format!("{} missing", name))
}

fn optional<'r>(rec: &'r StringRecord, idx: usize) -> &'r str {
    rec.get(idx).map(str::trim).unwrap_or("")
}

fn parse_id(raw: &str, name: &str) -> Result<i64> {
    raw.parse()
        .with_context(|| format!("Invalid {} '{}'", name, raw))
}

// id,user_id,date,amount,category,description,created_at,updated_at
fn expense_from_row(rec: &StringRecord) -> Result<Expense> {
    Ok(Expense {
        id: parse_id(field(rec, 0, "id")?, "id")?,
        user_id: parse_id(field(rec, 1, "user_id")?, "user_id")?,
        date: parse_date(field(rec, 2, "date")?)?,
        amount: parse_decimal(field(rec, 3, "amount")?)?,
        category: field(rec, 4, "category")?.to_string(),
        description: optional(rec, 5).to_string(),
        created_at: parse_timestamp(optional(rec, 6))?,
        updated_at: parse_timestamp(optional(rec, 7))?,
    })
}

// id,user_id,date,amount,source,created_at,updated_at
fn income_from_row(rec: &StringRecord) -> Result<Income> {
    Ok(Income {
        id: parse_id(field(rec, 0, "id")?, "id")?,
        user_id: parse_id(field(rec, 1, "user_id")?, "user_id")?,
        date: parse_date(field(rec, 2, "date")?)?,
        amount: parse_decimal(field(rec, 3, "amount")?)?,
        source: field(rec, 4, "source")?.to_string(),
        created_at: parse_timestamp(optional(rec, 5))?,
        updated_at: parse_timestamp(optional(rec, 6))?,
    })
}
