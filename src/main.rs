//! gridview - browse a JSON or CSV dataset in the terminal
//!
//! The binary is a ratatui host around the `gridview` engine: it loads a
//! dataset and an optional grid definition, then drives the grid from the
//! keyboard.

mod action;
mod app;
mod component;
mod components;
mod config;
mod modal;
mod reveal;
mod services;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::component::Component;
use crate::config::Config;
use crate::services::GridDefinition;
use crate::tui::Tui;
use anyhow::Result;
use clap::Parser;
use crossterm::event::Event;
use log::{error, LevelFilter};
use simplelog::WriteLogger;
use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "gridview",
    version,
    about = "Search, sort, page, select and export tabular data in the terminal"
)]
struct Cli {
    /// Dataset to show: a .json array of objects or a .csv with a header row.
    #[arg(value_name = "DATA")]
    data: PathBuf,
    /// Column and option definition (.yaml, .yml or .json). Without one, every
    /// field of the first row becomes a sortable column.
    #[arg(long, short = 'd', value_name = "FILE")]
    definition: Option<PathBuf>,
    /// Rows per page, overriding the definition.
    #[arg(long, value_name = "N")]
    page_size: Option<usize>,
    /// Level of detail written to gridview.log.
    #[arg(long, value_name = "LEVEL", default_value = "info", env = "GRIDVIEW_LOG")]
    log_level: LevelFilter,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // the terminal belongs to ratatui, so logs go to a file
    if let Ok(log_file) = File::create("gridview.log") {
        let _ = WriteLogger::init(cli.log_level, simplelog::Config::default(), log_file);
    }

    let rows = services::load_rows(&cli.data)?;
    let mut definition = match &cli.definition {
        Some(path) => GridDefinition::load(path)?,
        None => GridDefinition::infer(&rows),
    };
    if let Some(page_size) = cli.page_size {
        definition.options.pagination.page_size = page_size;
    }

    let mut app = App::new(cli.data, definition, rows, Config::load())?;
    app.init()?;

    let mut tui = Tui::new()?.with_tick_rate(Duration::from_millis(50));
    tui.enter()?;

    let result = run_app(&mut tui, &mut app);

    tui.exit()?;

    if let Err(err) = result {
        error!("{:#}", err);
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    Ok(())
}

fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        tui.draw(|frame| {
            let area = frame.area();
            if let Err(e) = app.draw(frame, area) {
                error!("draw error: {:#}", e);
            }
        })?;

        let action = match tui.next_event()? {
            Some(Event::Key(key)) => app.handle_key_event(key)?,
            Some(Event::Resize(w, h)) => Some(Action::Resize(w, h)),
            Some(_) => None,
            // no input within the tick rate
            None => Some(Action::Tick),
        };

        let mut current_action = action;
        while let Some(a) = current_action {
            current_action = app.update(a)?;
        }
    }

    Ok(())
}
