// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::Path;

use crate::commands::print_help;
use crate::config::{self, Settings};
use crate::utils::pretty_table;

pub fn handle(path: &Path, settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => show(settings)?,
        Some(("path", _)) => println!("{}", path.display()),
        Some(("init", _)) => {
            init(path)?;
        }
        _ => print_help("config"),
    }
    Ok(())
}

fn show(settings: &Settings) -> Result<()> {
    let rows = vec![
        vec!["window".into(), settings.window.to_string()],
        vec!["recent_limit".into(), settings.recent_limit.to_string()],
        vec![
            "user_id".into(),
            settings
                .user_id
                .map(|u| u.to_string())
                .unwrap_or_else(|| "(sole owner)".into()),
        ],
        vec![
            "expenses_file".into(),
            config::expenses_file(settings)?.display().to_string(),
        ],
        vec![
            "income_file".into(),
            config::income_file(settings)?.display().to_string(),
        ],
    ];
    println!("{}", pretty_table(&["Setting", "Value"], rows));
    Ok(())
}

/// Writes defaults; an existing file is left alone.
pub fn init(path: &Path) -> Result<bool> {
    if path.exists() {
        println!("Settings already exist at {}", path.display());
        return Ok(false);
    }
    config::save_to(path, &Settings::default())?;
    println!("Settings written to {}", path.display());
    Ok(true)
}
