// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::aggregate::Aggregator;
use crate::commands::{Session, print_help, reports::print_trend};
use crate::models::{Expense, ExpenseStats};
use crate::utils::{fmt_money, maybe_print_json, pretty_table, range_args};

pub fn handle(session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(session, sub)?,
        Some(("stats", sub)) => stats(session, sub)?,
        _ => print_help("expenses"),
    }
    Ok(())
}

fn list(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(session, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|e| {
                vec![
                    e.date.to_string(),
                    e.category.clone(),
                    fmt_money(&e.amount),
                    e.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Category", "Amount", "Description"], rows)
        );
    }
    Ok(())
}

/// Expenses in the window, newest first, optionally narrowed to one
/// category and capped by `--limit`.
pub fn query_rows(session: &Session, sub: &clap::ArgMatches) -> Result<Vec<Expense>> {
    let range = range_args(sub)?;
    range.validate()?;
    let (mut expenses, _) = session.records(&range)?;
    if let Some(cat) = sub.get_one::<String>("category") {
        expenses.retain(|e| &e.category == cat);
    }
    expenses.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        expenses.truncate(*limit);
    }
    Ok(expenses)
}

pub fn compute_stats(session: &Session, sub: &clap::ArgMatches) -> Result<ExpenseStats> {
    let range = range_args(sub)?;
    let (expenses, income) = session.records(&range)?;
    Ok(Aggregator::new(&expenses, &income).expense_stats(&range)?)
}

fn stats(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let stats = compute_stats(session, sub)?;
    if maybe_print_json(json_flag, jsonl_flag, &stats)? {
        return Ok(());
    }
    let count: usize = stats.top_categories.iter().map(|c| c.count).sum();
    println!(
        "{}",
        pretty_table(
            &["Total", "Average", "Records"],
            vec![vec![
                fmt_money(&stats.total_amount),
                fmt_money(&stats.average_amount),
                count.to_string(),
            ]],
        )
    );
    let rows: Vec<Vec<String>> = stats
        .top_categories
        .iter()
        .map(|c| {
            vec![
                c.category.clone(),
                fmt_money(&c.amount),
                c.count.to_string(),
                format!("{:.2}%", c.percentage),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "Spent", "Count", "Share"], rows)
    );
    print_trend(&stats.monthly_trend);
    Ok(())
}
