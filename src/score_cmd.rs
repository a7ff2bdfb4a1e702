//! `onpage score`: score a content file against a focus keyword.

use anyhow::Result;
use onpage_core::{score, AnalysisResult, Signal};
use std::path::Path;

use crate::config::Config;
use crate::resolve::load_snapshot;

/// Load, resolve, and score a content file.
pub fn score_file(config: &Config, path: &Path, keyword: &str) -> Result<AnalysisResult> {
    let snapshot = load_snapshot(path, config)?;
    Ok(score(&snapshot, keyword)?)
}

/// CLI entry point: scores a file and prints the breakdown to stdout.
pub fn run_score(config: &Config, path: &Path, keyword: &str, json: bool) -> Result<()> {
    let result = score_file(config, path, keyword)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("--- Analysis ---");
    println!("keyword:      {}", keyword.trim());
    println!("score:        {}/100", result.score);
    println!("status:       {}", result.status);
    println!("words:        {}", result.word_count);
    println!("computed at:  {}", result.computed_at.format("%Y-%m-%d %H:%M:%S UTC"));
    match result.keyword_density {
        Some(d) => println!("density:      {:.2}%", d),
        None => println!("density:      n/a"),
    }
    println!();

    println!("--- Signals ---");
    for signal in Signal::ALL {
        let points = result.points(signal);
        let mark = if points > 0 { "+" } else { " " };
        println!(
            "{} {:<28} {:>2}/{}",
            mark,
            signal.name(),
            points,
            signal.max_points()
        );
    }

    Ok(())
}
