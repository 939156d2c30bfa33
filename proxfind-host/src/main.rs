//! ProxFind command-line host
//!
//! Searches text and markdown documents for places where every term occurs
//! within a few words of the others.
//!
//! Run with: cargo run -p proxfind-host -- search notes.md --terms "cache, rebuild"

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use proxfind::protocol::{HostResponse, MatchSummary};
use proxfind::{ProxFindError, ProxFinder, SearchConfiguration};
use proxfind_host::{defaults, display, logging, Session};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[derive(Parser, Debug)]
#[command(author, version, about = "Proximity search over text documents", long_about = None)]
struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Defaults file (falls back to PROXFIND_DEFAULTS, then ~/.config/proxfind/defaults.json)
    #[arg(long, global = true)]
    defaults: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search a document and print ranked matches
    Search {
        file: PathBuf,

        #[command(flatten)]
        options: SearchArgs,

        /// Print excerpts as HTML snippets
        #[arg(long)]
        html: bool,
    },
    /// Print one region with its terms marked
    Show {
        file: PathBuf,

        /// Region id as printed by `search`, e.g. prox-3
        #[arg(long)]
        id: String,

        #[command(flatten)]
        options: SearchArgs,
    },
    /// Answer JSON-lines protocol requests on stdin
    Serve { file: PathBuf },
    /// Inspect or update saved defaults
    Defaults {
        #[command(subcommand)]
        action: DefaultsAction,
    },
}

#[derive(Subcommand, Debug)]
enum DefaultsAction {
    /// Save the given options as defaults
    Save(SearchArgs),
    /// Print the current defaults
    Show,
}

/// Search options. Anything not passed comes from the saved defaults.
#[derive(Args, Debug, Clone, Default)]
struct SearchArgs {
    /// Comma-separated terms, e.g. "quick, fox"
    #[arg(short, long)]
    terms: Option<String>,

    /// Maximum number of non-term words between terms
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    max_words_between: Option<i64>,

    #[arg(long, overrides_with = "no_whole_word")]
    whole_word: bool,

    #[arg(long, overrides_with = "whole_word")]
    no_whole_word: bool,

    #[arg(long, overrides_with = "no_case_sensitive")]
    case_sensitive: bool,

    #[arg(long, overrides_with = "case_sensitive")]
    no_case_sensitive: bool,

    /// Terms must appear in the order given
    #[arg(long, overrides_with = "no_order_matters")]
    order_matters: bool,

    #[arg(long, overrides_with = "order_matters")]
    no_order_matters: bool,

    /// Mark matched terms in the document
    #[arg(long, overrides_with = "no_highlight")]
    highlight: bool,

    #[arg(long, overrides_with = "highlight")]
    no_highlight: bool,

    /// Search the document as one block instead of block by block
    #[arg(long, overrides_with = "same_block")]
    any_block: bool,

    /// Keep matches inside a single block
    #[arg(long, overrides_with = "any_block")]
    same_block: bool,
}

/// `--x` / `--no-x` pair over a saved default. The last one given wins.
fn flag(on: bool, off: bool, base: bool) -> bool {
    if on {
        true
    } else if off {
        false
    } else {
        base
    }
}

impl SearchArgs {
    fn apply(&self, base: SearchConfiguration) -> SearchConfiguration {
        SearchConfiguration {
            terms: match &self.terms {
                Some(raw) => proxfind::parse_terms(raw),
                None => base.terms,
            },
            max_words_between: self.max_words_between.unwrap_or(base.max_words_between),
            whole_word: flag(self.whole_word, self.no_whole_word, base.whole_word),
            case_sensitive: flag(self.case_sensitive, self.no_case_sensitive, base.case_sensitive),
            order_matters: flag(self.order_matters, self.no_order_matters, base.order_matters),
            highlight: flag(self.highlight, self.no_highlight, base.highlight),
            same_block: flag(self.same_block, self.any_block, base.same_block),
        }
    }
}

fn load_defaults(explicit: Option<&Path>) -> Result<SearchConfiguration> {
    let path = defaults::defaults_path(explicit)?;
    Ok(defaults::load(&path)?.unwrap_or_default())
}

fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Terminal markers: bold yellow on a tty, brackets when piped.
fn terminal_markers() -> (&'static str, &'static str) {
    if std::io::stdout().is_terminal() {
        ("\x1b[1;33m", "\x1b[0m")
    } else {
        ("[", "]")
    }
}

async fn run_search(file: &Path, config: SearchConfiguration, html: bool) -> Result<()> {
    if config.normalized_terms().is_empty() {
        println!("{}", display::NO_TERMS);
        return Ok(());
    }

    let document = read_document(file)?;
    let finder = if html {
        ProxFinder::new()
    } else {
        let (open, close) = terminal_markers();
        ProxFinder::with_markup(open.to_string(), close.to_string(), false)
    };
    let mut session = Session::with_finder(&document, finder);
    let matches = session.search(config).await?;

    if matches.is_empty() {
        println!("{}", display::NO_MATCHES);
        return Ok(());
    }

    for m in &matches {
        let summary = MatchSummary::from(m);
        println!("{}  ({})", display::meta_line(&summary), summary.element_id);
        println!("    {}", summary.snippet_html);
    }
    Ok(())
}

fn run_show(file: &Path, id: &str, config: &SearchConfiguration) -> Result<()> {
    let document = read_document(file)?;
    let session = Session::new(&document);
    let region = session
        .region(id)
        .with_context(|| format!("No region with id {} in {}", id, file.display()))?;

    let ranges = proxfind::search::highlight_ranges(&region.text, config);
    let (open, close) = terminal_markers();
    println!("{} {}", region.kind.tag(), region.id);
    println!("{}", display::mark_ranges(&region.text, &ranges, open, close));
    Ok(())
}

async fn run_serve(file: &Path) -> Result<()> {
    let document = read_document(file)?;
    let mut session = Session::new(&document);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read request")?,
            _ = tokio::signal::ctrl_c() => break,
        };
        let Some(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }

        // Dropping the in-flight request future cancels its search.
        let response = tokio::select! {
            response = session.handle_line(&line) => response,
            _ = tokio::signal::ctrl_c() => {
                tracing::warn!("request cancelled");
                HostResponse::error(ProxFindError::Cancelled)
            }
        };

        let json = response.to_json()?;
        stdout.write_all(json.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);
    let defaults_flag = cli.defaults.as_deref();

    match &cli.command {
        Command::Search { file, options, html } => {
            let config = options.apply(load_defaults(defaults_flag)?);
            run_search(file, config, *html).await
        }
        Command::Show { file, id, options } => {
            let config = options.apply(load_defaults(defaults_flag)?);
            run_show(file, id, &config)
        }
        Command::Serve { file } => run_serve(file).await,
        Command::Defaults { action } => {
            let path = defaults::defaults_path(defaults_flag)?;
            match action {
                DefaultsAction::Save(options) => {
                    let config = options.apply(defaults::load(&path)?.unwrap_or_default());
                    defaults::save(&path, &config)?;
                    println!("Saved defaults to {}", path.display());
                }
                DefaultsAction::Show => {
                    let config = defaults::load(&path)?.unwrap_or_default();
                    println!("{}", serde_json::to_string_pretty(&config)?);
                }
            }
            Ok(())
        }
    }
}
