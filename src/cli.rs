// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn range_args() -> [Arg; 2] {
    [
        Arg::new("from")
            .long("from")
            .value_name("YYYY-MM-DD")
            .help("First day of the window (inclusive)"),
        Arg::new("to")
            .long("to")
            .value_name("YYYY-MM-DD")
            .help("Last day of the window (inclusive)"),
    ]
}

fn output_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON value per line"),
    ]
}

fn list_cmd(label: &'static str, help: &'static str) -> Command {
    Command::new("list")
        .about("List records, newest first")
        .args(range_args())
        .arg(Arg::new(label).long(label).help(help))
        .arg(
            Arg::new("limit")
                .long("limit")
                .value_parser(value_parser!(usize)),
        )
        .args(output_args())
}

fn stats_cmd() -> Command {
    Command::new("stats")
        .about("Totals, average, breakdown, top labels and monthly trend")
        .args(range_args())
        .args(output_args())
}

pub fn build_cli() -> Command {
    Command::new("spendlens")
        .version(crate_version!())
        .about("Expense and income statistics from your spending records")
        .arg(
            Arg::new("expenses")
                .long("expenses")
                .global(true)
                .value_name("PATH")
                .help("Expense snapshot (.csv or .json)"),
        )
        .arg(
            Arg::new("income")
                .long("income")
                .global(true)
                .value_name("PATH")
                .help("Income snapshot (.csv or .json)"),
        )
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .value_parser(value_parser!(i64))
                .help("Owner of the records to summarize"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging (RUST_LOG takes precedence)"),
        )
        .subcommand(
            Command::new("expenses")
                .about("Expense records and statistics")
                .subcommand(list_cmd("category", "Only this category"))
                .subcommand(stats_cmd()),
        )
        .subcommand(
            Command::new("income")
                .about("Income records and statistics")
                .subcommand(list_cmd("source", "Only this source"))
                .subcommand(stats_cmd()),
        )
        .subcommand(
            Command::new("trend")
                .about("Monthly expenses, income and net")
                .args(range_args())
                .args(output_args()),
        )
        .subcommand(
            Command::new("dashboard")
                .about("Totals, breakdowns, trend and recent records")
                .arg(
                    Arg::new("window")
                        .long("window")
                        .help("'all' or trailing months, e.g. '12m' (default from settings)"),
                )
                .arg(
                    Arg::new("recent")
                        .long("recent")
                        .value_parser(value_parser!(usize))
                        .help("How many recent records of each kind"),
                )
                .arg(
                    Arg::new("today")
                        .long("today")
                        .value_name("YYYY-MM-DD")
                        .help("Anchor date for the window (default: today, UTC)"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("summary")
                .about("Income, spending, savings rate and leading labels")
                .args(range_args())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("doctor").about("Check the snapshot for invalid records"))
        .subcommand(
            Command::new("config")
                .about("Settings file")
                .subcommand(Command::new("show").about("Print effective settings"))
                .subcommand(Command::new("path").about("Print the settings file location"))
                .subcommand(Command::new("init").about("Write default settings if none exist")),
        )
}

/// Rendered help of a top-level subcommand, e.g. `spendlens expenses`.
pub fn subcommand_help(name: &str) -> Option<String> {
    let mut cli = build_cli();
    cli.build();
    cli.find_subcommand_mut(name)
        .map(|sub| sub.render_help().to_string())
}
