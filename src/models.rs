// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{AggregateError, RecordError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub id: i64,
    pub user_id: i64,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,
    pub source: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Common view over expenses and income: an owned, dated amount with a
/// grouping label (category for expenses, source for income).
pub trait Record {
    /// Name of the label field, used in validation messages.
    const LABEL_FIELD: &'static str;

    fn id(&self) -> i64;
    fn user_id(&self) -> i64;
    fn amount(&self) -> Decimal;
    fn date(&self) -> NaiveDate;
    fn label(&self) -> &str;

    fn validate(&self) -> Result<(), RecordError> {
        if self.amount() <= Decimal::ZERO {
            return Err(RecordError::NonPositiveAmount { id: self.id() });
        }
        if self.label().trim().is_empty() {
            return Err(RecordError::EmptyLabel {
                id: self.id(),
                field: Self::LABEL_FIELD,
            });
        }
        Ok(())
    }
}

impl Record for Expense {
    const LABEL_FIELD: &'static str = "category";

    fn id(&self) -> i64 {
        self.id
    }
    fn user_id(&self) -> i64 {
        self.user_id
    }
    fn amount(&self) -> Decimal {
        self.amount
    }
    fn date(&self) -> NaiveDate {
        self.date
    }
    fn label(&self) -> &str {
        &self.category
    }
}

impl Record for Income {
    const LABEL_FIELD: &'static str = "source";

    fn id(&self) -> i64 {
        self.id
    }
    fn user_id(&self) -> i64 {
        self.user_id
    }
    fn amount(&self) -> Decimal {
        self.amount
    }
    fn date(&self) -> NaiveDate {
        self.date
    }
    fn label(&self) -> &str {
        &self.source
    }
}

/// Inclusive date window. A missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, AggregateError> {
        let range = Self { start, end };
        range.validate()?;
        Ok(range)
    }

    pub fn all() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<(), AggregateError> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if end < start => {
                Err(AggregateError::InvalidRange { start, end })
            }
            _ => Ok(()),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_else(|| "..".into());
        write!(f, "{} to {}", bound(self.start), bound(self.end))
    }
}

/// Default window of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Window {
    AllTime,
    /// The current calendar month plus the n-1 months before it.
    TrailingMonths(u32),
}

impl Default for Window {
    fn default() -> Self {
        Window::TrailingMonths(12)
    }
}

impl Window {
    pub fn resolve(&self, today: NaiveDate) -> DateRange {
        match *self {
            Window::AllTime => DateRange::all(),
            Window::TrailingMonths(n) => {
                let first_of_month = today.with_day(1).unwrap_or(today);
                let start = first_of_month.checked_sub_months(Months::new(n.max(1) - 1));
                DateRange {
                    start,
                    end: Some(today),
                }
            }
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Window::AllTime => write!(f, "all"),
            Window::TrailingMonths(n) => write!(f, "{}m", n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardOptions {
    pub window: Window,
    pub recent_limit: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            window: Window::default(),
            recent_limit: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyData {
    pub month: String, // YYYY-MM
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub expenses: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub income: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub net: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStat {
    pub category: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceStat {
    pub source: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseStats {
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total_amount: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub average_amount: Decimal,
    #[serde(serialize_with = "amount_map")]
    pub category_breakdown: BTreeMap<String, Decimal>,
    pub monthly_trend: Vec<MonthlyData>,
    pub top_categories: Vec<CategoryStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeStats {
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total_amount: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub average_amount: Decimal,
    #[serde(serialize_with = "amount_map")]
    pub source_breakdown: BTreeMap<String, Decimal>,
    pub monthly_trend: Vec<MonthlyData>,
    pub top_sources: Vec<SourceStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total_expenses: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total_income: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub net_amount: Decimal,
    #[serde(serialize_with = "amount_map")]
    pub expenses_by_category: BTreeMap<String, Decimal>,
    #[serde(serialize_with = "amount_map")]
    pub income_by_source: BTreeMap<String, Decimal>,
    pub monthly_trend: Vec<MonthlyData>,
    pub recent_expenses: Vec<Expense>,
    pub recent_income: Vec<Income>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total_income: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total_expenses: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub net_amount: Decimal,
    pub savings_rate: f64, // percent of income not spent
    pub expense_count: usize,
    pub income_count: usize,
    pub top_category: Option<String>,
    pub top_source: Option<String>,
}

// JSON number per label, matching the scalar amount fields.
fn amount_map<S: Serializer>(map: &BTreeMap<String, Decimal>, s: S) -> Result<S::Ok, S::Error> {
    struct Amount<'a>(&'a Decimal);

    impl Serialize for Amount<'_> {
        fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            rust_decimal::serde::float::serialize(self.0, s)
        }
    }

    s.collect_map(map.iter().map(|(k, v)| (k, Amount(v))))
}
