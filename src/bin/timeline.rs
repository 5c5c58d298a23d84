//! Timeline CLI tool
//!
//! A command-line tool for checking, displaying and editing markdown timelines.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use glob::glob;
use tracing::debug;
use tracing_subscriber::{filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use markdown_timeline::document::{self, NewEvent};
use markdown_timeline::format::format_date;
use markdown_timeline::parser::{parse_date, parse_timeline};
use markdown_timeline::render::{JsonRenderer, Renderer, TextRenderer};
use markdown_timeline::settings::{load_settings, TimelineSettings};
use markdown_timeline::view::TimelineView;
use markdown_timeline::{Error, SortOrder, TimelineEvent};

/// Timeline - Check, display and edit markdown timelines
#[derive(Parser)]
#[command(name = "timeline")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Validate every timeline note in a folder
    timeline check \"notes/*.md\"

    # Show a timeline newest first, only events mentioning Rome
    timeline show history.md --order desc --search rome

    # Add an event to the first ```timeline block of a note
    timeline add history.md --date=-44-03-15 --title \"Ides of March\" --content \"Caesar assassinated\"

    # Format a date
    timeline date 1969-07-20 --pattern \"MMMM DD, YYYY\"")]
struct Cli {
    /// Settings file (TOML) layered over the built-in defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate timeline files and report the first problem in each
    Check {
        /// Timeline files or notes. Supports glob patterns like "*.md"
        #[arg(required = true)]
        inputs: Vec<String>,
    },

    /// Display the events of a timeline
    Show {
        /// Timeline file or note containing ```timeline blocks
        input: PathBuf,

        /// Sort order: asc (oldest first) or desc (newest first)
        #[arg(long)]
        order: Option<SortOrder>,

        /// Only show events whose title or content contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Date format pattern (YYYY, MM, MMM, MMMM, DD)
        #[arg(long)]
        date_format: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Omit the order/count header
        #[arg(long)]
        no_header: bool,
    },

    /// Add an event to a timeline
    Add {
        /// Timeline file or note (created if missing)
        input: PathBuf,

        /// Date as YYYY[-MM[-DD]]; negative years are BC
        #[arg(long, allow_hyphen_values = true)]
        date: String,

        /// Event title
        #[arg(long)]
        title: String,

        /// Event content (markdown)
        #[arg(long)]
        content: String,
    },

    /// Format a single date
    Date {
        /// Date as YYYY[-MM[-DD]]
        #[arg(allow_hyphen_values = true)]
        date: String,

        /// Date format pattern; defaults to the configured format
        #[arg(short, long)]
        pattern: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = load_settings(cli.config.as_deref())
        .context("Failed to load settings")
        .and_then(|settings| match cli.command {
            Commands::Check { inputs } => cmd_check(inputs),
            Commands::Show {
                input, order, search, date_format, json, no_header,
            } => cmd_show(settings, input, order, search, date_format, json, no_header),
            Commands::Add { input, date, title, content } => cmd_add(input, date, title, content),
            Commands::Date { date, pattern } => cmd_date(&settings, &date, pattern),
        });

    match result {
        Ok(true) => {}
        // Problem already reported
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(level)
        .init();
}

/// Expand glob patterns in input paths
fn expand_globs(patterns: Vec<String>) -> markdown_timeline::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for pattern in patterns {
        // Check if pattern contains glob characters
        if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
            let entries = glob(&pattern).map_err(|e| Error::InvalidGlob(format!("{}: {}", pattern, e)))?;
            let mut matched = false;
            for entry in entries {
                match entry {
                    Ok(path) => {
                        paths.push(path);
                        matched = true;
                    }
                    Err(e) => eprintln!("Warning: glob error for {}: {}", pattern, e),
                }
            }
            if !matched {
                return Err(Error::NoFilesMatched(pattern));
            }
        } else {
            // No glob characters, treat as literal path
            paths.push(PathBuf::from(pattern));
        }
    }

    // Sort paths for consistent ordering
    paths.sort();

    Ok(paths)
}

fn read_note(path: &Path) -> markdown_timeline::Result<String> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    Ok(fs::read_to_string(path)?)
}

/// Validate timeline files
fn cmd_check(inputs: Vec<String>) -> anyhow::Result<bool> {
    let paths = expand_globs(inputs)?;
    let mut failures = 0;

    for path in &paths {
        let text = match read_note(path) {
            Ok(text) => text,
            Err(e) => {
                failures += 1;
                println!("{}: {}", path.display(), e);
                continue;
            }
        };
        match document::parse_note(&text) {
            Ok(events) => println!("{}: ok ({} events)", path.display(), events.len()),
            Err(diagnostic) => {
                failures += 1;
                println!("{}: {} error: {}", path.display(), diagnostic.kind, diagnostic);
                if let Some(details) = &diagnostic.details {
                    println!("    {}", details);
                }
            }
        }
    }

    eprintln!("Checked {} files, {} with errors", paths.len(), failures);
    Ok(failures == 0)
}

/// Display a timeline
fn cmd_show(
    mut settings: TimelineSettings,
    input: PathBuf,
    order: Option<SortOrder>,
    search: Option<String>,
    date_format: Option<String>,
    json: bool,
    no_header: bool,
) -> anyhow::Result<bool> {
    if let Some(pattern) = date_format {
        settings.date_format = pattern;
    }
    if no_header {
        settings.show_header_buttons = false;
    }

    let text = read_note(&input)?;
    let source = input.display().to_string();

    let stdout = io::stdout().lock();
    let mut renderer: Box<dyn Renderer> = if json {
        Box::new(JsonRenderer::new(stdout, &settings))
    } else {
        Box::new(TextRenderer::new(stdout, &settings))
    };

    match document::parse_note(&text) {
        Ok(events) => {
            debug!(count = events.len(), "parsed events");
            let mut view = TimelineView::from_settings(events, &settings);
            if let Some(order) = order {
                view.set_order(order);
            }
            if let Some(query) = search {
                view.set_query(query);
            }
            view.render(renderer.as_mut(), &source)?;
            Ok(true)
        }
        Err(diagnostic) => {
            renderer.render_diagnostic(&diagnostic)?;
            Ok(false)
        }
    }
}

/// Add an event to a note's first timeline block, or to a bare timeline file
fn cmd_add(input: PathBuf, date: String, title: String, content: String) -> anyhow::Result<bool> {
    let new_event = NewEvent { date, title, content };
    let source = new_event.to_source()?;

    let text = if input.exists() {
        fs::read_to_string(&input)
            .with_context(|| format!("Failed to read {}", input.display()))?
    } else {
        String::new()
    };

    let updated = if !document::find_timeline_blocks(&text).is_empty() {
        document::insert_event(&text, &source)?
    } else {
        // Bare timeline text must parse before it is extended
        if !text.trim().is_empty() {
            parse_timeline(&text).with_context(|| format!("{} is not a timeline", input.display()))?;
        }
        document::prepend_event(&text, &source)
    };

    fs::write(&input, updated).with_context(|| format!("Failed to write {}", input.display()))?;
    eprintln!("Added '{}' to {}", new_event.title.trim(), input.display());

    Ok(true)
}

/// Format a single date
fn cmd_date(settings: &TimelineSettings, date: &str, pattern: Option<String>) -> anyhow::Result<bool> {
    let parts = parse_date(date)?;
    let event = TimelineEvent {
        year: parts.year,
        month: parts.month,
        day: parts.day,
        title: String::new(),
        content: String::new(),
    };
    let pattern = pattern.unwrap_or_else(|| settings.date_format.clone());
    println!("{}", format_date(&event, &pattern));

    Ok(true)
}
