//! tablectl - Interactive server-driven data grid.
//!
//! Usage:
//!   tablectl                         # browse the job board
//!   tablectl --debounce-ms 500       # slower filter commits
//!   tablectl --state view.json       # restore a saved view
//!   tablectl --save-state view.json  # keep the view for next time
//!   tablectl --dump --page-size 5    # print one page and exit

use std::fs::File;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use tablectl::source::{DataSource, MockSource};
use tablectl::table::{
    DEFAULT_DEBOUNCE_MS, DEFAULT_PAGE_SIZE, DataTableConfig, DataTableController, InitialState,
    Pagination, UNKNOWN_PAGE_COUNT,
};
use tablectl::tui::{App, plain_table};
use tablectl::util::SystemClock;

/// Number of jobs in the demo data set.
const JOB_COUNT: usize = 57;

/// Interactive server-driven data grid.
#[derive(Parser)]
#[command(name = "tablectl", about = "Server-driven data grid", version)]
struct Args {
    /// Rows per page. Overrides the page size of --state.
    #[arg(long, value_name = "N")]
    page_size: Option<usize>,

    /// Quiet period before filter edits are committed, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_DEBOUNCE_MS)]
    debounce_ms: u64,

    /// UI tick interval in milliseconds.
    #[arg(long, default_value = "50")]
    tick_ms: u64,

    /// Start with advanced filtering on (local column filters disabled).
    #[arg(long)]
    advanced_filter: bool,

    /// JSON file with the initial view state.
    #[arg(long, value_name = "PATH")]
    state: Option<String>,

    /// Write the final view state to this file on exit, for use with --state.
    #[arg(long, value_name = "PATH")]
    save_state: Option<String>,

    /// Make the source report an unknown page count.
    #[arg(long)]
    unknown_total: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,

    /// Write logs to this file. The terminal belongs to the grid,
    /// so interactive mode only logs when this is set.
    #[arg(long, value_name = "PATH")]
    log_file: Option<String>,

    /// Fetch one page, print it and exit.
    #[arg(long)]
    dump: bool,
}

/// Where log output goes.
enum LogTarget {
    Stderr,
    File(File),
}

/// Initializes the tracing subscriber with the appropriate log level.
/// Default level is INFO. Use -q for quiet mode (errors only).
fn init_logging(verbose: u8, quiet: bool, target: LogTarget) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("tablectl={}", level).parse() {
        filter = filter.add_directive(directive);
    }

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).init(),
        LogTarget::File(file) => builder.with_writer(Mutex::new(file)).with_ansi(false).init(),
    }
}

fn main() {
    let args = Args::parse();

    if args.page_size == Some(0) {
        eprintln!("Error: --page-size must be at least 1");
        std::process::exit(1);
    }
    if args.tick_ms == 0 {
        eprintln!("Error: --tick-ms must be at least 1");
        std::process::exit(1);
    }

    let log_target = match &args.log_file {
        Some(path) => match File::create(path) {
            Ok(file) => Some(LogTarget::File(file)),
            Err(e) => {
                eprintln!("Error: cannot open log file '{}': {}", path, e);
                std::process::exit(1);
            }
        },
        None if args.dump => Some(LogTarget::Stderr),
        None => None,
    };
    if let Some(target) = log_target {
        init_logging(args.verbose, args.quiet, target);
    }

    let mut initial_state = match &args.state {
        Some(path) => match InitialState::load(path) {
            Ok(state) => state,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => InitialState::default(),
    };
    if let Some(page_size) = args.page_size {
        let page_index = initial_state
            .pagination
            .map(|p| p.page_index)
            .unwrap_or_default();
        initial_state.pagination = Some(Pagination::new(page_index, page_size));
    } else if initial_state.pagination.is_none() {
        initial_state.pagination = Some(Pagination::new(0, DEFAULT_PAGE_SIZE));
    }

    let mut source = MockSource::job_board(JOB_COUNT);
    if args.unknown_total {
        source = source.with_unknown_total();
    }

    let config = DataTableConfig::new(source.columns(), UNKNOWN_PAGE_COUNT)
        .with_initial_state(initial_state)
        .with_debounce_ms(args.debounce_ms)
        .with_advanced_filter(args.advanced_filter);
    let controller = DataTableController::new(config, Arc::new(SystemClock));

    info!(
        "tablectl {} starting: {} jobs, debounce={}ms",
        env!("CARGO_PKG_VERSION"),
        source.len(),
        args.debounce_ms
    );

    let mut app = App::new(Box::new(source), controller);

    if args.dump {
        app.refresh();
        let state = app.state();
        if let Some(err) = &state.fetch_error {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
        println!("{}", plain_table(&state.controller.model(), state.total_rows));
    } else if let Err(e) = app.run(Duration::from_millis(args.tick_ms)) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    if let Some(path) = &args.save_state {
        if let Err(e) = app.state().controller.snapshot().save(path) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        info!("view state saved to {}", path);
    }
}
