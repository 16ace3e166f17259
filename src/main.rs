// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use spendlens::commands::{self, Session};
use spendlens::error::AggregateError;
use spendlens::store::Snapshot;
use spendlens::{cli, config};

fn init_logging(verbose: bool) {
    // RUST_LOG wins over --verbose
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr).compact())
        .init();
}

fn run(matches: &clap::ArgMatches) -> Result<()> {
    let config_path = config::config_path()?;
    let settings = config::load_from(&config_path)?;

    if let Some(("config", sub)) = matches.subcommand() {
        return commands::settings::handle(&config_path, &settings, sub);
    }

    let expenses_path = match matches.get_one::<String>("expenses") {
        Some(p) => PathBuf::from(p),
        None => config::expenses_file(&settings)?,
    };
    let income_path = match matches.get_one::<String>("income") {
        Some(p) => PathBuf::from(p),
        None => config::income_file(&settings)?,
    };
    let snapshot = Snapshot::load(&expenses_path, &income_path)?;
    let user_id = matches.get_one::<i64>("user").copied();
    let session = Session::new(snapshot, settings, user_id);

    match matches.subcommand() {
        Some(("expenses", sub)) => commands::expenses::handle(&session, sub)?,
        Some(("income", sub)) => commands::income::handle(&session, sub)?,
        Some(("trend", sub)) => commands::reports::trend(&session, sub)?,
        Some(("dashboard", sub)) => commands::reports::dashboard(&session, sub)?,
        Some(("summary", sub)) => commands::reports::summary(&session, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&session)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let matches = cli::build_cli().get_matches();
    init_logging(matches.get_flag("verbose"));

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            if err
                .downcast_ref::<AggregateError>()
                .is_some_and(AggregateError::is_client_error)
            {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
