//! pagedit - Edit the marked content of a published static site.

mod activity;
mod cli;
mod config;
mod core;
mod document;
mod embed;
mod export;
mod field;
mod form;
mod loader;
mod logger;
mod net;
mod preview;
mod publish;
mod registry;
mod session;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{AdminConfig, init_config};
use net::UreqTransport;

fn main() {
    if let Err(e) = run() {
        log!("error"; "{e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = init_config(AdminConfig::load(cli)?);
    let transport = UreqTransport::new();

    match &cli.command {
        Commands::Pages => {
            cli::pages::run_pages(&config);
            Ok(())
        }
        Commands::Fields { target, json } => {
            cli::fields::run_fields(&config, &transport, target, *json)
        }
        Commands::Export {
            target,
            edits,
            output,
        } => cli::export::run_export(
            &config,
            &transport,
            target,
            &edits.edits,
            output.as_deref(),
        )
        .map(|_| ()),
        Commands::Publish {
            target,
            edits,
            message,
            token,
        } => {
            let args = cli::publish::PublishArgs {
                target,
                edits: &edits.edits,
                message: message.as_deref(),
                token: token.as_deref(),
            };
            cli::publish::run_publish(&config, &transport, &args)
        }
        Commands::Serve { .. } => {
            let server = cli::serve::bind_server(Box::new(transport))?;
            server.run()
        }
    }
}
