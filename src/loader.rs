//! Page loader: fetch a published page and open it for editing.

use crate::activity::ActivityLog;
use crate::field::Markers;
use crate::net::{HttpRequest, Transport, TransportError};
use crate::registry::{PageRegistry, Selection};
use crate::session::Session;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Shown when a page loads fine but has nothing marked editable.
pub const EMPTY_NOTICE: &str =
    "No editable modules found on this page (missing data-edit attributes).";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to load {path}: {status}")]
    Status { path: String, status: u16 },
    #[error("Failed to load {path}: {source}")]
    Transport {
        path: String,
        #[source]
        source: TransportError,
    },
}

/// Fetches pages from the live site.
pub struct PageLoader<'a> {
    transport: &'a dyn Transport,
    registry: &'a PageRegistry,
    markers: &'a Markers,
    origin: &'a str,
}

impl<'a> PageLoader<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        registry: &'a PageRegistry,
        markers: &'a Markers,
        origin: &'a str,
    ) -> Self {
        Self {
            transport,
            registry,
            markers,
            origin: origin.trim_end_matches('/'),
        }
    }

    /// Cache-busted URL of a site path.
    pub fn url(&self, path: &str) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        format!("{}{path}?cb={millis}", self.origin)
    }

    /// Load `selection` into a fresh session.
    ///
    /// Progress and outcome go to `log`; the error is returned as well so the
    /// caller can decide whether to keep the previous session.
    pub fn load(&self, selection: &Selection, log: &ActivityLog) -> Result<Session, LoadError> {
        let path = self.registry.resolve(selection);
        log.push(format!(
            "Loading {} / {} ({path})",
            selection.lang.to_uppercase(),
            selection.page
        ));

        let result = self.fetch(selection, path);
        match &result {
            Ok(session) => log.push(summary(session)),
            Err(e) => log.push(e.to_string()),
        }
        result
    }

    fn fetch(&self, selection: &Selection, path: &str) -> Result<Session, LoadError> {
        let request = HttpRequest::get(self.url(path))
            .header("Cache-Control", "no-cache, no-store")
            .header("Pragma", "no-cache");

        let response = self
            .transport
            .send(request)
            .map_err(|source| LoadError::Transport {
                path: path.to_string(),
                source,
            })?;

        if !response.is_success() {
            return Err(LoadError::Status {
                path: path.to_string(),
                status: response.status,
            });
        }

        crate::debug!("load"; "{} bytes from {}", response.body.len(), path);

        Ok(Session::from_html(
            selection.clone(),
            path,
            &response.body,
            self.markers,
        ))
    }
}

/// The line logged after a successful load.
pub fn summary(session: &Session) -> String {
    match session.fields.len() {
        0 => EMPTY_NOTICE.to_string(),
        n => format!("Loaded {n} module fields."),
    }
}
