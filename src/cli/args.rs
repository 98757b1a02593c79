//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Content editor for marked static pages
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: pagedit.toml)
    #[arg(short = 'C', long, global = true, default_value = "pagedit.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override the site origin pages are loaded from
    #[arg(long, global = true, value_hint = clap::ValueHint::Url)]
    pub origin: Option<String>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List the configured languages and pages
    #[command(visible_alias = "ls")]
    Pages,

    /// Load a page and print its editable fields
    #[command(visible_alias = "f")]
    Fields {
        #[command(flatten)]
        target: PageArgs,

        /// Print the form model as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load a page, apply edits, and write the result to a file
    #[command(visible_alias = "e")]
    Export {
        #[command(flatten)]
        target: PageArgs,

        #[command(flatten)]
        edits: EditArgs,

        /// Output directory (default: current directory)
        #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
        output: Option<PathBuf>,
    },

    /// Load a page, apply edits, and commit it to the repository
    #[command(visible_alias = "p")]
    Publish {
        #[command(flatten)]
        target: PageArgs,

        #[command(flatten)]
        edits: EditArgs,

        /// Commit message (default: [repo] default_message)
        #[arg(short, long)]
        message: Option<String>,

        /// GitHub token (falls back to [repo] token_path)
        #[arg(long, env = "PAGEDIT_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },

    /// Start the local admin page
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// Which page to open.
#[derive(clap::Args, Debug, Clone)]
pub struct PageArgs {
    /// Language code
    #[arg(short, long, default_value = "en")]
    pub lang: String,

    /// Logical page name
    #[arg(short, long, default_value = "home")]
    pub page: String,
}

/// Field edits applied in order.
#[derive(clap::Args, Debug, Clone)]
pub struct EditArgs {
    /// Set a field: `--set hero.title="New title"` (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_edit)]
    pub edits: Vec<(String, String)>,
}

fn parse_edit(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got `{s}`")),
    }
}
