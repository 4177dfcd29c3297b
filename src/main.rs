use clap::{ArgAction, Parser, Subcommand};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use env_logger::Builder as LoggerBuilder;
use log::LevelFilter;
use show_scout::{
    Browser, DEFAULT_BASE_URL, EpisodesOutcome, Screen, SearchOutcome, ShowCatalog, ShowId,
    ShowScoutError, TvMazeCatalog,
};
use std::env;
use std::io::{self, Write};
use std::process;

/// Input that leaves the interactive browser
const QUIT_COMMAND: &str = ":q";

/// Search a TV show catalog and browse episode lists
#[derive(Debug, Parser)]
#[command(name = "show_scout", version, about)]
struct Cli {
    /// Base URL of the TVMaze-compatible catalog service
    #[arg(long, env = "SHOW_SCOUT_CATALOG_URL", default_value = DEFAULT_BASE_URL, global = true)]
    catalog_url: String,

    /// Print normalized results as JSON instead of cards
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v, -vv, ...)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search for shows matching a query
    Search { query: String },
    /// List the episodes of a show
    Episodes { show_id: ShowId },
    /// Interactively search shows and open their episodes (default)
    Browse,
}

fn init_env_logger(log_level_filter: LevelFilter) {
    let mut logger_builder = LoggerBuilder::new();
    logger_builder.filter(None, log_level_filter);

    if let Ok(rust_log) = env::var("RUST_LOG") {
        logger_builder.parse_filters(&rust_log);
    }

    logger_builder.init();
}

fn init_env_logger_verbosity(verbosity: u8) {
    let log_level_filter = match verbosity {
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        3 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    init_env_logger(log_level_filter);
}

/// Prints the shows grid and, if visible, the episodes area
fn print_screen(out: &mut impl Write, screen: &Screen) -> io::Result<()> {
    if let Some(episodes) = &screen.episodes {
        writeln!(out, "\n=== Episodes ===\n")?;
        if episodes.is_empty() {
            writeln!(out, "No episodes found.")?;
        }
        for card in episodes {
            writeln!(out, "{card}\n")?;
        }
    } else {
        writeln!(out, "\n=== Shows ===\n")?;
        if screen.shows.is_empty() {
            writeln!(out, "No shows found.")?;
        }
        for card in &screen.shows {
            writeln!(out, "{card}\n")?;
        }
    }
    Ok(())
}

/// Prints the pending notice of a failed fetch to stderr
fn report_notice<C: ShowCatalog>(browser: &mut Browser<C>) {
    if let Some(notice) = browser.take_notice() {
        eprintln!("Error: {}", notice.message);
    }
}

fn run_search(
    browser: &mut Browser<TvMazeCatalog>,
    query: &str,
    json: bool,
) -> Result<(), ShowScoutError> {
    match browser.submit_search(query) {
        SearchOutcome::Ignored => {
            eprintln!("Nothing to search for.");
            return Ok(());
        }
        SearchOutcome::Failed(err) => return Err(err.into()),
        SearchOutcome::Shown(_) | SearchOutcome::Stale => {}
    }

    let mut out = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, browser.state().shows())?;
        writeln!(out)?;
    } else {
        print_screen(&mut out, &browser.render())?;
    }
    Ok(())
}

fn run_episodes(
    browser: &mut Browser<TvMazeCatalog>,
    show_id: ShowId,
    json: bool,
) -> Result<(), ShowScoutError> {
    if let EpisodesOutcome::Failed(err) = browser.open_episodes(show_id) {
        return Err(err.into());
    }

    let mut out = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, browser.state().episodes())?;
        writeln!(out)?;
    } else {
        print_screen(&mut out, &browser.render())?;
    }
    Ok(())
}

/// Interactive loop: prompt for a query, then let the user open show cards
fn run_browse(browser: &mut Browser<TvMazeCatalog>) -> Result<(), ShowScoutError> {
    let theme = ColorfulTheme::default();

    loop {
        let query: String = Input::with_theme(&theme)
            .with_prompt(format!("Search shows ({QUIT_COMMAND} to quit)"))
            .allow_empty(true)
            .interact_text()?;

        if query.trim() == QUIT_COMMAND {
            return Ok(());
        }

        if let SearchOutcome::Ignored = browser.submit_search(&query) {
            continue;
        }
        report_notice(browser);
        print_screen(&mut io::stdout().lock(), &browser.render())?;

        if browser.state().shows().is_empty() {
            continue;
        }

        loop {
            let mut items: Vec<String> = browser
                .state()
                .shows()
                .iter()
                .map(|show| format!("Episodes of {} [{}]", show.name, show.id))
                .collect();
            items.push("New search".to_string());

            let selection = Select::with_theme(&theme)
                .with_prompt("Open a show")
                .items(&items)
                .default(0)
                .interact_opt()?;

            let Some(show_id) = selection.and_then(|index| browser.show_id_for_card(index))
            else {
                break;
            };

            browser.open_episodes(show_id);
            report_notice(browser);
            print_screen(&mut io::stdout().lock(), &browser.render())?;
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_env_logger_verbosity(cli.verbose);

    let catalog = TvMazeCatalog::with_base_url(&cli.catalog_url);
    log::info!("Using catalog at {}", catalog.base_url());
    let mut browser = Browser::new(catalog);

    let result = match cli.command.unwrap_or(Command::Browse) {
        Command::Search { query } => run_search(&mut browser, &query, cli.json),
        Command::Episodes { show_id } => run_episodes(&mut browser, show_id, cli.json),
        Command::Browse => run_browse(&mut browser),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
