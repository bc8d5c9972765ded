// Copyright 2025 the Glyphweaver Authors
// SPDX-License-Identifier: Apache-2.0

//! Glyphweaver: the controller layer of a glyph-grid font editor.
//!
//! `AppState` turns viewer, project and program events into edits on
//! the open font and keeps the grid, pager and editor state in sync.
//! Anything that needs a person (dialogs, confirmations, previews) goes
//! through the `Host` trait; `console::ConsoleHost` is the bundled
//! terminal host.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

pub mod console;
pub mod data;
pub mod dialogs;
pub mod editing;
pub mod events;
pub mod host;
pub mod model;
pub mod project;
pub mod settings;

use console::ConsoleHost;
use data::AppState;
use host::Host;
use project::{FolderProjectStore, MemoryProjectStore, ProjectStore};
use settings::Settings;

/// Glyphweaver console font editor
#[derive(Parser, Debug, Default, PartialEq)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to a UFO font to open
    font: Option<PathBuf>,
}

/// Entry point for the Glyphweaver console
pub fn run() -> anyhow::Result<()> {
    // RUST_LOG overrides the default level
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("glyphweaver=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let settings = Settings::load_or_default(args.config.as_deref());
    let projects = open_project_store(&settings)?;
    let mut state = AppState::new(settings, projects);
    let stdin = std::io::stdin();
    let mut host = ConsoleHost::new(stdin.lock(), std::io::stdout());

    handle_font_arg(&mut state, &mut host, args.font);

    host.run(&mut state).context("console I/O failed")?;
    Ok(())
}

fn open_project_store(settings: &Settings) -> anyhow::Result<Box<dyn ProjectStore>> {
    match &settings.projects.root {
        Some(root) => {
            let store = FolderProjectStore::open(root)
                .with_context(|| format!("cannot open project folder {}", root.display()))?;
            tracing::info!("Projects stored in {}", root.display());
            Ok(Box::new(store))
        }
        None => {
            tracing::info!("No project folder configured, projects live in memory");
            Ok(Box::new(MemoryProjectStore::new()))
        }
    }
}

/// Load the UFO named on the command line, or fall back to the current project
fn handle_font_arg(state: &mut AppState, host: &mut dyn Host, font: Option<PathBuf>) {
    let Some(font_path) = font else {
        state.open_current_project(host);
        return;
    };

    if font_path.exists() {
        tracing::info!("Loading font from: {}", font_path.display());
        state.load_font(&font_path);
    } else {
        tracing::error!("Path does not exist: {}", font_path.display());
        tracing::error!("Usage: glyphweaver [--config settings.toml] [path/to/font.ufo]");
    }
}
