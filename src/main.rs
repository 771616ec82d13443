use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

mod columns;
mod controller;
mod domain;
mod fetch;
mod inputter;
mod model;
mod record;
mod ui;
mod view;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use controller::Controller;
use domain::{UtvConfig, UtvError};
use model::{Model, Status};
use ui::TableUI;

#[derive(Parser, Debug)]
#[command(name = "utv", about = "A tui based browser for remotely fetched user tables.")]
struct Cli {
    /// Source URL returning a JSON array of users
    #[arg(long, default_value = "https://jsonplaceholder.typicode.com/users")]
    url: String,

    /// Rows per page
    #[arg(long, default_value_t = 5)]
    page_size: usize,

    /// Fetch timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Write logs to this file; RUST_LOG controls verbosity
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    match run() {
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn run() -> Result<(), UtvError> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let cfg = UtvConfig {
        url: cli.url,
        page_size: cli.page_size,
        fetch_timeout_secs: cli.timeout,
        event_poll_time: 100,
    };
    info!("Starting utv with {cfg:?}");

    let mut model = Model::init(&cfg);

    // The one fetch of the run. A failure becomes a visible failure state,
    // not an empty table.
    match fetch::fetch_users(&cfg.url, Duration::from_secs(cfg.fetch_timeout_secs)) {
        Ok(users) => model.load(users),
        Err(e) => model.load_failed(&e),
    }

    let ui = TableUI::new(&cfg);
    let controller = Controller::new(&cfg);

    let mut terminal = ratatui::init();
    let result = event_loop(&mut model, &ui, &controller, &mut terminal);
    ratatui::restore();
    result
}

fn event_loop(
    model: &mut Model,
    ui: &TableUI,
    controller: &Controller,
    terminal: &mut ratatui::DefaultTerminal,
) -> Result<(), UtvError> {
    while model.status != Status::QUITTING {
        // Render the current view
        terminal.draw(|f| ui.draw(model, f))?;

        // Handle events and map to a Message
        if let Some(message) = controller.handle_event(model)? {
            model.update(message);
        }
    }
    Ok(())
}

fn init_logging(log_file: Option<&std::path::Path>) -> Result<(), UtvError> {
    if let Some(path) = log_file {
        let file = std::sync::Arc::new(File::create(path)?);
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(file)
            .with_ansi(false)
            .init();
    }
    Ok(())
}
