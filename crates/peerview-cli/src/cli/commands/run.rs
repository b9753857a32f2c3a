//! `peerview run`: plays a script and prints the report as JSON.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use peerview_core::config::Config;
use tracing::info;

use crate::script::{self, Session};

pub async fn run(path: &Path, render: bool, config: &Config) -> Result<()> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read script: {}", path.display()))?;
    let steps = script::parse(&text).with_context(|| format!("parse {}", path.display()))?;
    info!(steps = steps.len(), script = %path.display(), "running script");

    let mut session = Session::new(config);
    session.play(steps).await;
    let report = session.finish(render);

    let json = serde_json::to_string_pretty(&report).context("serialize report")?;
    println!("{json}");
    Ok(())
}
