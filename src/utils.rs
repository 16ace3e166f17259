// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, NaiveDate, Utc};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;

use crate::models::{DateRange, Window};

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Empty input means "not recorded".
pub fn parse_timestamp(s: &str) -> Result<Option<DateTime<Utc>>> {
    if s.is_empty() {
        return Ok(None);
    }
    let ts = DateTime::parse_from_rfc3339(s)
        .with_context(|| format!("Invalid timestamp '{}', expected RFC 3339", s))?;
    Ok(Some(ts.with_timezone(&Utc)))
}

/// `all`, `12m` or a bare month count.
pub fn parse_window(s: &str) -> Result<Window> {
    let s = s.trim().to_lowercase();
    if s == "all" {
        return Ok(Window::AllTime);
    }
    let n: u32 = s
        .strip_suffix('m')
        .unwrap_or(s.as_str())
        .parse()
        .with_context(|| format!("Invalid window '{}', expected 'all' or e.g. '12m'", s))?;
    if n == 0 {
        return Err(anyhow!("Window must cover at least one month"));
    }
    Ok(Window::TrailingMonths(n))
}

/// Reads `--from`/`--to`. The range is not validated here; the aggregator
/// rejects an inverted one.
pub fn range_args(sub: &clap::ArgMatches) -> Result<DateRange> {
    let start = sub
        .get_one::<String>("from")
        .map(|s| parse_date(s))
        .transpose()?;
    let end = sub
        .get_one::<String>("to")
        .map(|s| parse_date(s))
        .transpose()?;
    Ok(DateRange { start, end })
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
