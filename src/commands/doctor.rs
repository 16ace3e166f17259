// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::Session;
use crate::utils::pretty_table;
use anyhow::Result;

pub fn handle(session: &Session) -> Result<()> {
    let rows: Vec<Vec<String>> = session
        .snapshot
        .issues()
        .into_iter()
        .map(|i| vec![i.kind.to_string(), i.detail])
        .collect();

    if rows.is_empty() {
        println!(
            "doctor: no issues found ({} expenses, {} income)",
            session.snapshot.expenses.len(),
            session.snapshot.income.len()
        );
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
