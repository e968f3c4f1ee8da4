// src/cli/handlers/search.rs

use crate::{
    constants::DEFAULT_CONSOLE_WIDTH,
    core::{
        cache::ResponseCache,
        document::Block,
        entry::EntryAssembler,
        painter::Painter,
        paths,
        query::{ResponseSource, create_query, process_query},
        styled_text::StyledText,
    },
    models::{QueryMethod, Settings, StyleSheet},
    schema::CollegiateResponse,
    system::http::HttpFetcher,
};
use anyhow::Result;
use clap::Parser;
use colored::*;
use std::env;

// --- Command Argument Parsing ---

/// Looks a word up and prints the formatted entries.
#[derive(Parser, Debug)]
#[command(no_binary_name = true)]
struct SearchArgs {
    /// The word or phrase to look up.
    #[arg(required = true, num_args = 1..)]
    word: Vec<String>,

    /// Which reference to search: `collegiate` (`c`) or `thesaurus` (`t`).
    #[arg(short, long, default_value = "collegiate", value_parser = parse_method)]
    method: QueryMethod,

    /// Console width used for rules and layout. Defaults to $COLUMNS, then 80.
    #[arg(short, long)]
    width: Option<usize>,

    /// Always fetch from the API, ignoring cached responses.
    #[arg(long)]
    no_cache: bool,
}

fn parse_method(name: &str) -> Result<QueryMethod, String> {
    QueryMethod::from_name(name).ok_or_else(|| {
        format!(
            "unknown method '{}', expected 'collegiate' (c) or 'thesaurus' (t)",
            name
        )
    })
}

// --- Main Handler ---

pub fn handle(args: Vec<String>, settings: &Settings) -> Result<()> {
    let args = SearchArgs::try_parse_from(&args)?;
    let word = args.word.join(" ");
    let query = create_query(&word, args.method, &settings.api)?;

    let cache_dir = paths::cache_dir(settings.cache.dir.as_deref())?;
    let cache_path = paths::ensure_cache_file(&cache_dir)?;
    let mut cache = ResponseCache::open(&cache_path, &settings.cache)?;
    let fetcher = HttpFetcher::new(settings.api.timeout_secs)?;

    let (response, source) = process_query(&query, &mut cache, &fetcher, !args.no_cache)?;
    log::debug!("Response for '{}' served from {:?}.", query.word, source);

    if source == ResponseSource::Network
        && let Err(e) = cache.save()
    {
        log::warn!("Could not save the response cache: {}", e);
    }

    let width = resolve_width(args.width, env::var("COLUMNS").ok());
    print!("{}", render_response(&query.word, &response, &settings.style, width)?);
    Ok(())
}

// --- Rendering ---

/// `--width`, else a positive `$COLUMNS`, else the default width.
fn resolve_width(flag: Option<usize>, columns: Option<String>) -> usize {
    flag.filter(|width| *width > 0)
        .or_else(|| {
            columns
                .and_then(|value| value.trim().parse::<usize>().ok())
                .filter(|width| *width > 0)
        })
        .unwrap_or(DEFAULT_CONSOLE_WIDTH)
}

/// The painted result panel for one response.
fn render_response(
    word: &str,
    response: &CollegiateResponse,
    styles: &StyleSheet,
    width: usize,
) -> Result<String> {
    if let CollegiateResponse::Suggestions(words) = response
        && words.is_empty()
    {
        return Ok(format!("No entries found for '{}'.\n", word.yellow()));
    }

    let mut blocks = Vec::new();
    if matches!(response, CollegiateResponse::Suggestions(_)) {
        blocks.push(Block::Text(StyledText::from(format!(
            "'{}' was not found. Did you mean:",
            word
        ))));
        blocks.push(Block::Blank);
    }
    blocks.extend(EntryAssembler::new(styles).assemble_response(response)?);

    let title = StyledText::styled(word.to_uppercase(), styles.display("searched_word"));
    let border = styles.display("panel");
    Ok(Painter::new(width).paint_panel(&title, border.as_ref(), &blocks))
}
