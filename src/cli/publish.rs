//! `publish` command: commit the edited page to the repository.

use anyhow::Result;

use super::common::{apply_edits, open_page};
use crate::activity::ActivityLog;
use crate::cli::args::PageArgs;
use crate::config::AdminConfig;
use crate::net::Transport;
use crate::publish::Publisher;

pub struct PublishArgs<'a> {
    pub target: &'a PageArgs,
    pub edits: &'a [(String, String)],
    pub message: Option<&'a str>,
    /// From `--token` or `PAGEDIT_TOKEN`.
    pub token: Option<&'a str>,
}

pub fn run_publish(
    config: &AdminConfig,
    transport: &dyn Transport,
    args: &PublishArgs<'_>,
) -> Result<()> {
    // Token problems surface before any page is fetched
    let token = resolve_token(config, args.token)?;

    let activity = ActivityLog::echoing();
    let mut session = open_page(config, transport, args.target, &activity)?;
    apply_edits(&mut session, args.edits)?;

    Publisher::new(transport, &config.repo).publish(
        &session,
        &token,
        args.message.unwrap_or_default(),
        &activity,
    )?;
    Ok(())
}

/// `--token` / `PAGEDIT_TOKEN`, then `[repo] token_path`, else empty.
fn resolve_token(config: &AdminConfig, cli_token: Option<&str>) -> Result<String> {
    if let Some(token) = cli_token.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(token.to_string());
    }
    Ok(config.repo.read_token()?.unwrap_or_default())
}
