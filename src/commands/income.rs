// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::aggregate::Aggregator;
use crate::commands::{Session, print_help, reports::print_trend};
use crate::models::{Income, IncomeStats};
use crate::utils::{fmt_money, maybe_print_json, pretty_table, range_args};

pub fn handle(session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(session, sub)?,
        Some(("stats", sub)) => stats(session, sub)?,
        _ => print_help("income"),
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
            .map(|i| vec![i.date.to_string(), i.source.clone(), fmt_money(&i.amount)])
            .collect();
        println!("{}", pretty_table(&["Date", "Source", "Amount"], rows));
    }
    Ok(())
}

pub fn query_rows(session: &Session, sub: &clap::ArgMatches) -> Result<Vec<Income>> {
    let range = range_args(sub)?;
    range.validate()?;
    let (_, mut income) = session.records(&range)?;
    if let Some(source) = sub.get_one::<String>("source") {
        income.retain(|i| &i.source == source);
    }
    income.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        income.truncate(*limit);
    }
    Ok(income)
}

pub fn compute_stats(session: &Session, sub: &clap::ArgMatches) -> Result<IncomeStats> {
    let range = range_args(sub)?;
    let (expenses, income) = session.records(&range)?;
    Ok(Aggregator::new(&expenses, &income).income_stats(&range)?)
}

fn stats(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let stats = compute_stats(session, sub)?;
    if maybe_print_json(json_flag, jsonl_flag, &stats)? {
        return Ok(());
    }
    let count: usize = stats.top_sources.iter().map(|s| s.count).sum();
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
        .top_sources
        .iter()
        .map(|s| {
            vec![
                s.source.clone(),
                fmt_money(&s.amount),
                s.count.to_string(),
                format!("{:.2}%", s.percentage),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Source", "Earned", "Count", "Share"], rows)
    );
    print_trend(&stats.monthly_trend);
    Ok(())
}
