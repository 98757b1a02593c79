//! `export` command: write the edited page to a local file.

use anyhow::Result;
use chrono::Utc;
use std::path::{Path, PathBuf};

use super::common::{apply_edits, open_page};
use crate::activity::ActivityLog;
use crate::cli::args::PageArgs;
use crate::config::AdminConfig;
use crate::export::Export;
use crate::logger::status_success;
use crate::net::Transport;

pub fn run_export(
    config: &AdminConfig,
    transport: &dyn Transport,
    target: &PageArgs,
    edits: &[(String, String)],
    output: Option<&Path>,
) -> Result<PathBuf> {
    let activity = ActivityLog::echoing();
    let mut session = open_page(config, transport, target, &activity)?;
    apply_edits(&mut session, edits)?;

    let export = Export::new(&config.site.name, &session, Utc::now());
    let path = export.write_to(output.unwrap_or(Path::new(".")))?;
    status_success(&format!("Exported {}", path.display()));
    Ok(path)
}
