// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Roll-ups of a user's expense and income records: totals, per-label
//! breakdowns, ranked shares, monthly trends and dashboard views.
//!
//! Everything here works on a borrowed snapshot and never performs I/O.
//! Sums are checked; amounts too large for `Decimal` give
//! `AggregateError::Overflow` instead of a panic.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::error::AggregateError;
use crate::models::{
    CategoryStat, DashboardData, DashboardOptions, DateRange, Expense, ExpenseStats,
    FinancialSummary, Income, IncomeStats, MonthlyData, Record, SourceStat,
};

/// Stateless view over one user's records.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    expenses: &'a [Expense],
    income: &'a [Income],
}

impl<'a> Aggregator<'a> {
    pub fn new(expenses: &'a [Expense], income: &'a [Income]) -> Self {
        Self { expenses, income }
    }

    pub fn expense_stats(&self, range: &DateRange) -> Result<ExpenseStats, AggregateError> {
        range.validate()?;
        let expenses = in_range(self.expenses, range);
        let income = in_range(self.income, range);
        let total = total(&expenses)?;
        debug!(count = expenses.len(), %range, "expense stats");
        Ok(ExpenseStats {
            total_amount: total,
            average_amount: average(total, expenses.len()),
            category_breakdown: breakdown(&expenses)?,
            monthly_trend: trend(&expenses, &income)?,
            top_categories: ranked(&expenses, total)?
                .into_iter()
                .map(|s| CategoryStat {
                    category: s.label,
                    amount: s.amount,
                    count: s.count,
                    percentage: s.percentage,
                })
                .collect(),
        })
    }

    pub fn income_stats(&self, range: &DateRange) -> Result<IncomeStats, AggregateError> {
        range.validate()?;
        let expenses = in_range(self.expenses, range);
        let income = in_range(self.income, range);
        let total = total(&income)?;
        debug!(count = income.len(), %range, "income stats");
        Ok(IncomeStats {
            total_amount: total,
            average_amount: average(total, income.len()),
            source_breakdown: breakdown(&income)?,
            monthly_trend: trend(&expenses, &income)?,
            top_sources: ranked(&income, total)?
                .into_iter()
                .map(|s| SourceStat {
                    source: s.label,
                    amount: s.amount,
                    count: s.count,
                    percentage: s.percentage,
                })
                .collect(),
        })
    }

    pub fn monthly_trend(&self, range: &DateRange) -> Result<Vec<MonthlyData>, AggregateError> {
        range.validate()?;
        trend(
            &in_range(self.expenses, range),
            &in_range(self.income, range),
        )
    }

    /// Dashboard over the configured window, resolved against `today`.
    pub fn dashboard(
        &self,
        opts: &DashboardOptions,
        today: NaiveDate,
    ) -> Result<DashboardData, AggregateError> {
        self.dashboard_for(&opts.window.resolve(today), opts.recent_limit)
    }

    pub fn dashboard_for(
        &self,
        range: &DateRange,
        recent_limit: usize,
    ) -> Result<DashboardData, AggregateError> {
        range.validate()?;
        let expenses = in_range(self.expenses, range);
        let income = in_range(self.income, range);
        let total_expenses = total(&expenses)?;
        let total_income = total(&income)?;
        debug!(
            expenses = expenses.len(),
            income = income.len(),
            %range,
            "dashboard"
        );
        Ok(DashboardData {
            total_expenses,
            total_income,
            net_amount: net(total_income, total_expenses)?,
            expenses_by_category: breakdown(&expenses)?,
            income_by_source: breakdown(&income)?,
            monthly_trend: trend(&expenses, &income)?,
            recent_expenses: recent(&expenses, recent_limit),
            recent_income: recent(&income, recent_limit),
        })
    }

    pub fn summary(&self, range: &DateRange) -> Result<FinancialSummary, AggregateError> {
        range.validate()?;
        let expenses = in_range(self.expenses, range);
        let income = in_range(self.income, range);
        let total_expenses = total(&expenses)?;
        let total_income = total(&income)?;
        let net_amount = net(total_income, total_expenses)?;
        Ok(FinancialSummary {
            start: range.start,
            end: range.end,
            total_income,
            total_expenses,
            net_amount,
            savings_rate: percentage(net_amount, total_income)?,
            expense_count: expenses.len(),
            income_count: income.len(),
            top_category: ranked(&expenses, total_expenses)?
                .into_iter()
                .next()
                .map(|s| s.label),
            top_source: ranked(&income, total_income)?
                .into_iter()
                .next()
                .map(|s| s.label),
        })
    }
}

/// `part` as a percentage of `whole`, two decimals, half away from zero.
/// A zero `whole` yields 0.
pub fn percentage(part: Decimal, whole: Decimal) -> Result<f64, AggregateError> {
    if whole.is_zero() {
        return Ok(0.0);
    }
    let pct = part
        .checked_div(whole)
        .and_then(|q| q.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or(AggregateError::Overflow("percentage"))?;
    pct.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .ok_or(AggregateError::Overflow("percentage"))
}

/// Two-decimal shares of `total` that add up to exactly 100.
///
/// Every share starts at its truncated value in hundredths of a percent;
/// the hundredths still missing go to the largest remainders, earlier
/// entries first on ties. A zero `total` gives all zeros.
pub fn shares(amounts: &[Decimal], total: Decimal) -> Result<Vec<f64>, AggregateError> {
    if total.is_zero() {
        return Ok(vec![0.0; amounts.len()]);
    }
    const WHOLE: i64 = 10_000;
    let mut units = Vec::with_capacity(amounts.len());
    let mut remainders = Vec::with_capacity(amounts.len());
    for (i, amount) in amounts.iter().enumerate() {
        let exact = amount
            .checked_div(total)
            .and_then(|q| q.checked_mul(Decimal::from(WHOLE)))
            .ok_or(AggregateError::Overflow("percentage"))?;
        let floor = exact.floor();
        units.push(floor.to_i64().ok_or(AggregateError::Overflow("percentage"))?);
        remainders.push((exact - floor, i));
    }
    let mut missing = WHOLE - units.iter().sum::<i64>();
    remainders.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    for (_, i) in remainders {
        if missing <= 0 {
            break;
        }
        units[i] += 1;
        missing -= 1;
    }
    Ok(units.into_iter().map(|u| u as f64 / 100.0).collect())
}

pub fn average(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    (total / Decimal::from(count)).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn add(acc: &mut Decimal, amount: Decimal, what: &'static str) -> Result<(), AggregateError> {
    *acc = acc
        .checked_add(amount)
        .ok_or(AggregateError::Overflow(what))?;
    Ok(())
}

fn net(income: Decimal, expenses: Decimal) -> Result<Decimal, AggregateError> {
    income
        .checked_sub(expenses)
        .ok_or(AggregateError::Overflow("net amount"))
}

fn in_range<'r, R: Record>(records: &'r [R], range: &DateRange) -> Vec<&'r R> {
    records.iter().filter(|r| range.contains(r.date())).collect()
}

fn total<R: Record>(records: &[&R]) -> Result<Decimal, AggregateError> {
    let mut sum = Decimal::ZERO;
    for r in records {
        add(&mut sum, r.amount(), "total")?;
    }
    Ok(sum)
}

fn breakdown<R: Record>(records: &[&R]) -> Result<BTreeMap<String, Decimal>, AggregateError> {
    let mut map = BTreeMap::new();
    for r in records {
        add(
            map.entry(r.label().to_string()).or_insert(Decimal::ZERO),
            r.amount(),
            "breakdown",
        )?;
    }
    Ok(map)
}

struct LabelStat {
    label: String,
    amount: Decimal,
    count: usize,
    percentage: f64,
}

// Largest amount first; equal amounts in label order.
fn ranked<R: Record>(records: &[&R], total: Decimal) -> Result<Vec<LabelStat>, AggregateError> {
    let mut groups: BTreeMap<&str, (Decimal, usize)> = BTreeMap::new();
    for r in records {
        let entry = groups.entry(r.label()).or_insert((Decimal::ZERO, 0));
        add(&mut entry.0, r.amount(), "breakdown")?;
        entry.1 += 1;
    }
    let mut stats: Vec<LabelStat> = groups
        .into_iter()
        .map(|(label, (amount, count))| LabelStat {
            label: label.to_string(),
            amount,
            count,
            percentage: 0.0,
        })
        .collect();
    stats.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.label.cmp(&b.label)));
    let amounts: Vec<Decimal> = stats.iter().map(|s| s.amount).collect();
    for (stat, pct) in stats.iter_mut().zip(shares(&amounts, total)?) {
        stat.percentage = pct;
    }
    Ok(stats)
}

fn trend(expenses: &[&Expense], income: &[&Income]) -> Result<Vec<MonthlyData>, AggregateError> {
    let mut months: BTreeMap<(i32, u32), (Decimal, Decimal)> = BTreeMap::new();
    for e in expenses {
        add(&mut months.entry(month_of(e.date)).or_default().0, e.amount, "trend")?;
    }
    for i in income {
        add(&mut months.entry(month_of(i.date)).or_default().1, i.amount, "trend")?;
    }
    months
        .into_iter()
        .map(|((y, m), (spent, earned))| {
            net(earned, spent).map(|net| MonthlyData {
                month: format!("{:04}-{:02}", y, m),
                expenses: spent,
                income: earned,
                net,
            })
        })
        .collect()
}

fn month_of(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}

fn recent<R: Record + Clone>(records: &[&R], limit: usize) -> Vec<R> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| b.date().cmp(&a.date()).then_with(|| b.id().cmp(&a.id())));
    sorted.into_iter().take(limit).cloned().collect()
}
