//! Common utilities shared across CLI commands.

use anyhow::{Result, bail};

use crate::activity::ActivityLog;
use crate::cli::args::PageArgs;
use crate::config::AdminConfig;
use crate::loader::PageLoader;
use crate::net::Transport;
use crate::registry::{DEFAULT_PATH, Selection};
use crate::session::Session;
use crate::{debug, log};

/// Fetch the page named by `target` and open it for editing.
pub fn open_page(
    config: &AdminConfig,
    transport: &dyn Transport,
    target: &PageArgs,
    activity: &ActivityLog,
) -> Result<Session> {
    let selection = Selection::new(&target.lang, &target.page);
    let registry = config.registry();
    if !registry.contains(&selection) {
        log!("warn"; "{selection} is not a configured page, using {DEFAULT_PATH}");
    }

    let loader = PageLoader::new(transport, &registry, &config.markers, config.origin());
    Ok(loader.load(&selection, activity)?)
}

/// Apply `--set` edits in order.
///
/// Every key is checked before anything is applied, so a typo never leaves
/// a half-edited page behind.
pub fn apply_edits(session: &mut Session, edits: &[(String, String)]) -> Result<()> {
    let unknown: Vec<&str> = edits
        .iter()
        .map(|(key, _)| key.as_str())
        .filter(|key| session.fields.get(key).is_none())
        .collect();

    if !unknown.is_empty() {
        let available: Vec<&str> = session.fields.iter().map(|f| f.key.as_str()).collect();
        bail!(
            "unknown field(s): {}\navailable: {}",
            unknown.join(", "),
            if available.is_empty() {
                "(none)".to_string()
            } else {
                available.join(", ")
            }
        );
    }

    for (key, value) in edits {
        session.apply(key, value)?;
        debug!("edit"; "{key} = {value:?}");
    }
    Ok(())
}
