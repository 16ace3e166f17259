// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::aggregate::Aggregator;
use crate::commands::Session;
use crate::models::{DashboardData, DashboardOptions, FinancialSummary, MonthlyData};
use crate::utils::{
    fmt_money, maybe_print_json, parse_date, parse_window, pretty_table, range_args,
};

pub fn trend(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = build_trend(session, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        print_trend(&data);
    }
    Ok(())
}

pub fn build_trend(session: &Session, sub: &clap::ArgMatches) -> Result<Vec<MonthlyData>> {
    let range = range_args(sub)?;
    let (expenses, income) = session.records(&range)?;
    Ok(Aggregator::new(&expenses, &income).monthly_trend(&range)?)
}

pub fn print_trend(trend: &[MonthlyData]) {
    let rows: Vec<Vec<String>> = trend
        .iter()
        .map(|m| {
            vec![
                m.month.clone(),
                fmt_money(&m.expenses),
                fmt_money(&m.income),
                fmt_money(&m.net),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Expenses", "Income", "Net"], rows)
    );
}

/// Dashboard options: flags first, settings otherwise.
pub fn dashboard_options(session: &Session, sub: &clap::ArgMatches) -> Result<DashboardOptions> {
    let mut opts = session.settings.dashboard_options();
    if let Some(w) = sub.get_one::<String>("window") {
        opts.window = parse_window(w)?;
    }
    if let Some(k) = sub.get_one::<usize>("recent") {
        if *k == 0 {
            return Err(anyhow!("--recent must be at least 1"));
        }
        opts.recent_limit = *k;
    }
    Ok(opts)
}

pub fn build_dashboard(session: &Session, sub: &clap::ArgMatches) -> Result<DashboardData> {
    let opts = dashboard_options(session, sub)?;
    let today = match sub.get_one::<String>("today") {
        Some(d) => parse_date(d)?,
        None => chrono::Utc::now().date_naive(),
    };
    let range = opts.window.resolve(today);
    tracing::info!(window = %opts.window, %range, "building dashboard");
    let (expenses, income) = session.records(&range)?;
    Ok(Aggregator::new(&expenses, &income).dashboard(&opts, today)?)
}

fn breakdown_rows(map: &BTreeMap<String, Decimal>) -> Vec<Vec<String>> {
    let mut items: Vec<_> = map.iter().collect();
    items.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    items
        .into_iter()
        .map(|(label, amt)| vec![label.clone(), fmt_money(amt)])
        .collect()
}

pub fn dashboard(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let data = build_dashboard(session, sub)?;
    if maybe_print_json(sub.get_flag("json"), false, &data)? {
        return Ok(());
    }
    println!(
        "{}",
        pretty_table(
            &["Expenses", "Income", "Net"],
            vec![vec![
                fmt_money(&data.total_expenses),
                fmt_money(&data.total_income),
                fmt_money(&data.net_amount),
            ]],
        )
    );
    println!(
        "{}",
        pretty_table(&["Category", "Spent"], breakdown_rows(&data.expenses_by_category))
    );
    println!(
        "{}",
        pretty_table(&["Source", "Earned"], breakdown_rows(&data.income_by_source))
    );
    print_trend(&data.monthly_trend);

    let recent = recent_rows(&data);
    println!(
        "{}",
        pretty_table(&["Date", "Kind", "Label", "Amount"], recent)
    );
    Ok(())
}

/// Recent expenses and income merged newest first. Same-day rows keep
/// expenses ahead of income, each kind by id descending.
pub fn recent_rows(data: &DashboardData) -> Vec<Vec<String>> {
    let mut keyed: Vec<(NaiveDate, u8, i64, Vec<String>)> = Vec::new();
    for e in &data.recent_expenses {
        keyed.push((
            e.date,
            0,
            e.id,
            vec![
                e.date.to_string(),
                "expense".into(),
                e.category.clone(),
                fmt_money(&-e.amount),
            ],
        ));
    }
    for i in &data.recent_income {
        keyed.push((
            i.date,
            1,
            i.id,
            vec![
                i.date.to_string(),
                "income".into(),
                i.source.clone(),
                fmt_money(&i.amount),
            ],
        ));
    }
    keyed.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| a.1.cmp(&b.1))
            .then_with(|| b.2.cmp(&a.2))
    });
    keyed.into_iter().map(|(_, _, _, row)| row).collect()
}

pub fn build_summary(session: &Session, sub: &clap::ArgMatches) -> Result<FinancialSummary> {
    let range = range_args(sub)?;
    let (expenses, income) = session.records(&range)?;
    Ok(Aggregator::new(&expenses, &income).summary(&range)?)
}

pub fn summary(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let data = build_summary(session, sub)?;
    if maybe_print_json(sub.get_flag("json"), false, &data)? {
        return Ok(());
    }
    let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());
    let rows = vec![
        vec!["Income".into(), fmt_money(&data.total_income)],
        vec!["Expenses".into(), fmt_money(&data.total_expenses)],
        vec!["Net".into(), fmt_money(&data.net_amount)],
        vec!["Savings rate".into(), format!("{:.2}%", data.savings_rate)],
        vec!["Expense records".into(), data.expense_count.to_string()],
        vec!["Income records".into(), data.income_count.to_string()],
        vec!["Top category".into(), or_dash(&data.top_category)],
        vec!["Top source".into(), or_dash(&data.top_source)],
    ];
    println!("{}", pretty_table(&["Metric", "Value"], rows));
    Ok(())
}
