// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{DashboardOptions, Window};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Spendlens", "spendlens"));

pub const CONFIG_ENV: &str = "SPENDLENS_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: Window,
    pub recent_limit: usize,
    pub user_id: Option<i64>,
    pub expenses_file: Option<PathBuf>,
    pub income_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        let opts = DashboardOptions::default();
        Self {
            window: opts.window,
            recent_limit: opts.recent_limit,
            user_id: None,
            expenses_file: None,
            income_file: None,
        }
    }
}

impl Settings {
    pub fn dashboard_options(&self) -> DashboardOptions {
        DashboardOptions {
            window: self.window,
            recent_limit: self.recent_limit,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.recent_limit == 0 {
            return Err(anyhow!("recent_limit must be at least 1"));
        }
        if self.window == Window::TrailingMonths(0) {
            return Err(anyhow!("window must cover at least one month"));
        }
        Ok(())
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific config dir")
}

pub fn config_path() -> Result<PathBuf> {
    if let Ok(p) = std::env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(p));
    }
    Ok(project_dirs()?.config_dir().join("settings.json"))
}

pub fn data_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}

pub fn load() -> Result<Settings> {
    load_from(&config_path()?)
}

/// A missing file yields the defaults.
pub fn load_from(path: &Path) -> Result<Settings> {
    if !path.exists() {
        debug!(path = %path.display(), "no settings file, using defaults");
        return Ok(Settings::default());
    }
    let raw = fs::read_to_string(path).with_context(|| format!("Read {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&raw)
        .with_context(|| format!("Parse settings {}", path.display()))?;
    settings
        .validate()
        .with_context(|| format!("Invalid settings in {}", path.display()))?;
    Ok(settings)
}

pub fn save_to(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).context("Failed to create config dir")?;
    }
    fs::write(path, serde_json::to_string_pretty(settings)?)
        .with_context(|| format!("Write {}", path.display()))?;
    Ok(())
}

pub fn expenses_file(settings: &Settings) -> Result<PathBuf> {
    match &settings.expenses_file {
        Some(p) => Ok(p.clone()),
        None => Ok(data_dir()?.join("expenses.csv")),
    }
}

pub fn income_file(settings: &Settings) -> Result<PathBuf> {
    match &settings.income_file {
        Some(p) => Ok(p.clone()),
        None => Ok(data_dir()?.join("income.csv")),
    }
}
