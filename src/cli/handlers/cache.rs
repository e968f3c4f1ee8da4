// src/cli/handlers/cache.rs

use crate::{
    constants::SECONDS_PER_DAY,
    core::{
        cache::{ResponseCache, now_secs},
        paths,
    },
    models::{CacheRecord, Settings},
};
use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, theme::ColorfulTheme};

// --- Command Argument Parsing ---

/// Inspect or clear the response cache.
#[derive(Parser, Debug)]
#[command(no_binary_name = true)]
struct CacheArgs {
    #[command(subcommand)]
    command: CacheSubcommand,
}

#[derive(Subcommand, Debug)]
enum CacheSubcommand {
    /// Lists the cached words, oldest first.
    Show,
    /// Deletes every cached response.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// Deletes the cached responses for one word.
    Remove {
        /// The word whose responses are removed.
        word: String,
    },
}

// --- Main Handler ---

pub fn handle(args: Vec<String>, settings: &Settings) -> Result<()> {
    let cache_args = CacheArgs::try_parse_from(&args)?;

    let cache_dir = paths::cache_dir(settings.cache.dir.as_deref())?;
    let cache_path = paths::ensure_cache_file(&cache_dir)?;
    let mut cache = ResponseCache::open(&cache_path, &settings.cache)?;

    match cache_args.command {
        CacheSubcommand::Show => show_cache(&cache),
        CacheSubcommand::Clear { yes } => clear_cache(&mut cache, yes),
        CacheSubcommand::Remove { word } => remove_word(&mut cache, &word),
    }
}

// --- Subcommand Logic ---

fn show_cache(cache: &ResponseCache) -> Result<()> {
    println!("\nResponse cache at '{}'", cache.path().display().to_string().cyan());

    if cache.is_empty() {
        println!("{}", "The cache is empty.".yellow());
        return Ok(());
    }

    let now = now_secs();
    for record in cache.records() {
        println!("  {}", describe_record(record, now));
    }
    println!("\n{} cached responses.", cache.len().to_string().bold());
    Ok(())
}

fn clear_cache(cache: &mut ResponseCache, skip_confirmation: bool) -> Result<()> {
    if cache.is_empty() {
        println!("{}", "The cache is already empty.".yellow());
        return Ok(());
    }

    if !skip_confirmation
        && !Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete all {} cached responses?", cache.len()))
            .default(false)
            .interact()?
    {
        println!("\nOperation cancelled.");
        return Ok(());
    }

    let removed = cache.clear();
    cache.save()?;
    println!("{} Removed {} cached responses.", "✔".green(), removed);
    Ok(())
}

fn remove_word(cache: &mut ResponseCache, word: &str) -> Result<()> {
    let removed = cache.remove_word(word.trim());
    if removed == 0 {
        println!("{}", format!("Nothing cached for '{}'.", word).yellow());
        return Ok(());
    }

    cache.save()?;
    println!("{} Removed {} cached responses for '{}'.", "✔".green(), removed, word.cyan());
    Ok(())
}

// --- Helpers ---

/// `word  (method, age)`
fn describe_record(record: &CacheRecord, now: u64) -> String {
    format!(
        "{:<24} ({}, {})",
        record.word,
        record.method,
        describe_age(record.created, now)
    )
}

fn describe_age(created: u64, now: u64) -> String {
    let days = now.saturating_sub(created) / SECONDS_PER_DAY;
    match days {
        0 => "today".to_string(),
        1 => "1 day ago".to_string(),
        n => format!("{} days ago", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QueryMethod;

    #[test]
    fn test_subcommands_parse() {
        let args = CacheArgs::try_parse_from(["clear", "--yes"]).unwrap();
        assert!(matches!(args.command, CacheSubcommand::Clear { yes: true }));

        let args = CacheArgs::try_parse_from(["remove", "run"]).unwrap();
        assert!(matches!(args.command, CacheSubcommand::Remove { word } if word == "run"));

        assert!(CacheArgs::try_parse_from(["purge"]).is_err());
        assert!(CacheArgs::try_parse_from(Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_describe_record() {
        let record = CacheRecord::new("run", QueryMethod::Dictionary, "u", "[]".into(), 0);

        assert_eq!(
            describe_record(&record, 3 * SECONDS_PER_DAY + 5),
            format!("{:<24} (dictionary, 3 days ago)", "run")
        );
        assert_eq!(describe_age(100, 200), "today");
        assert_eq!(describe_age(0, SECONDS_PER_DAY), "1 day ago");
    }
}
