// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod doctor;
pub mod expenses;
pub mod income;
pub mod reports;
pub mod settings;

use anyhow::{Result, anyhow};

use crate::cli;
use crate::config::Settings;
use crate::models::{DateRange, Expense, Income};
use crate::store::{RecordSource, Snapshot, ensure_valid};

/// Everything a command needs: the loaded records, the effective settings
/// and the user picked on the command line, if any.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub snapshot: Snapshot,
    pub settings: Settings,
    pub user_id: Option<i64>,
}

impl Session {
    pub fn new(snapshot: Snapshot, settings: Settings, user_id: Option<i64>) -> Self {
        Self {
            snapshot,
            settings,
            user_id,
        }
    }

    /// `--user`, then the configured user, then the only owner in the
    /// snapshot. `None` when the snapshot holds no records at all.
    pub fn user(&self) -> Result<Option<i64>> {
        if let Some(u) = self.user_id.or(self.settings.user_id) {
            return Ok(Some(u));
        }
        let owners = self.snapshot.owners();
        match owners.len() {
            0 => Ok(None),
            1 => Ok(self.snapshot.sole_user()),
            _ => Err(anyhow!(
                "Snapshot holds records of {} users; pick one with --user",
                owners.len()
            )),
        }
    }

    /// The selected user's records inside `range`. Only those records are
    /// checked; other users' rows never block the report.
    pub fn records(&self, range: &DateRange) -> Result<(Vec<Expense>, Vec<Income>)> {
        let Some(user) = self.user()? else {
            return Ok((Vec::new(), Vec::new()));
        };
        let expenses = self.snapshot.expenses(user, range)?;
        let income = self.snapshot.income(user, range)?;
        ensure_valid(&expenses, "expense")?;
        ensure_valid(&income, "income")?;
        Ok((expenses, income))
    }
}

/// Help for a group command invoked without a known subcommand.
pub fn print_help(name: &str) {
    if let Some(help) = cli::subcommand_help(name) {
        println!("{}", help);
    }
}
