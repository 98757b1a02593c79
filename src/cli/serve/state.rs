//! Shared state of the admin server.
//!
//! One [`AdminState`] lives for the whole serve session. The open page is an
//! immutable [`Session`] snapshot behind an `ArcSwapOption`: loads store a
//! new snapshot, edits derive the next one with `rcu`, and readers never see
//! a half-applied change.
//!
//! Every load is numbered. The admin page sends the number of the load it
//! is editing with each field change, so an edit still in flight when
//! another page opens is refused instead of landing on the new page.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use arc_swap::ArcSwapOption;
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use crate::activity::ActivityLog;
use crate::config::AdminConfig;
use crate::export::Export;
use crate::field::EditError;
use crate::form::{self, FormGroup};
use crate::loader::{LoadError, PageLoader};
use crate::net::Transport;
use crate::preview;
use crate::publish::{PublishError, Publisher};
use crate::registry::{PageRegistry, Selection};
use crate::session::Session;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("No page is loaded.")]
    NoDocument,
    #[error("A publish is already running.")]
    Busy,
    #[error("The page was reloaded; edit to `{0}` discarded.")]
    Stale(String),
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error(transparent)]
    Publish(#[from] PublishError),
}

/// Snapshot sent to the admin page.
#[derive(Debug, Serialize)]
pub struct StateView {
    pub selection: Option<Selection>,
    /// Load number of the open page; 0 when nothing is loaded.
    pub generation: u64,
    pub languages: Vec<String>,
    /// Page names offered for the selected language.
    pub pages: Vec<String>,
    pub groups: Vec<FormGroup>,
    /// Rendered form markup for `groups`.
    pub form: String,
    pub preview: String,
    /// The open page differs from what was fetched.
    pub edited: bool,
    pub log: String,
    pub publishing: bool,
    pub repo: String,
}

pub struct AdminState {
    config: Arc<AdminConfig>,
    registry: PageRegistry,
    transport: Box<dyn Transport>,
    session: ArcSwapOption<Session>,
    activity: ActivityLog,
    publishing: AtomicBool,
    /// Last load number handed out.
    loads: AtomicU64,
}

impl AdminState {
    pub fn new(config: Arc<AdminConfig>, transport: Box<dyn Transport>) -> Self {
        let registry = config.registry();
        Self {
            config,
            registry,
            transport,
            session: ArcSwapOption::empty(),
            activity: ActivityLog::new(),
            publishing: AtomicBool::new(false),
            loads: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &AdminConfig {
        &self.config
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    /// Preview markup for `session`, with links resolved against the site.
    pub fn preview(&self, session: &Session) -> String {
        preview::render_for_origin(session, &self.registry, self.config.origin())
    }

    /// The open page, if any.
    pub fn session(&self) -> Option<Arc<Session>> {
        self.session.load_full()
    }

    /// Fetch `selection` and make it the open page.
    ///
    /// On failure the previous page stays open; the error is already in the
    /// activity log.
    pub fn load(&self, selection: &Selection) -> Result<(), LoadError> {
        let loader = PageLoader::new(
            &*self.transport,
            &self.registry,
            &self.config.markers,
            self.config.origin(),
        );
        let mut session = loader.load(selection, &self.activity)?;
        session.generation = self.loads.fetch_add(1, Ordering::AcqRel) + 1;
        self.session.store(Some(Arc::new(session)));
        Ok(())
    }

    /// Apply one field edit to load `generation` and return the updated page.
    pub fn edit(
        &self,
        generation: u64,
        key: &str,
        value: &str,
    ) -> Result<Arc<Session>, StateError> {
        let mut outcome = Err(StateError::NoDocument);
        self.session.rcu(|current| {
            let Some(session) = current else {
                outcome = Err(StateError::NoDocument);
                return None;
            };
            if session.generation != generation {
                outcome = Err(StateError::Stale(key.to_string()));
                return Some(Arc::clone(session));
            }
            match session.with_edit(key, value) {
                Ok(next) => {
                    let next = Arc::new(next);
                    outcome = Ok(Arc::clone(&next));
                    Some(next)
                }
                Err(e) => {
                    outcome = Err(e.into());
                    Some(Arc::clone(session))
                }
            }
        });
        outcome
    }

    /// Serialize the open page for download.
    pub fn download(&self) -> Result<Export, StateError> {
        let session = self.session().ok_or(StateError::NoDocument)?;
        let export = Export::new(&self.config.site.name, &session, Utc::now());
        self.activity.push(format!("Downloaded {}", export.file_name));
        Ok(export)
    }

    /// Publish the open page. Only one publish runs at a time.
    pub fn publish(&self, token: &str, message: &str) -> Result<(), StateError> {
        let _guard = PublishGuard::acquire(&self.publishing).ok_or(StateError::Busy)?;
        let session = self.session().ok_or(StateError::NoDocument)?;

        let mut publisher = Publisher::new(&*self.transport, &self.config.repo);
        publisher.publish(&session, token, message, &self.activity)?;
        Ok(())
    }

    pub fn is_publishing(&self) -> bool {
        self.publishing.load(Ordering::Acquire)
    }

    pub fn view(&self) -> StateView {
        let session = self.session();
        let selection = session.as_ref().map(|s| s.selection.clone());
        let lang = selection
            .as_ref()
            .map_or("en", |s| s.lang.as_str())
            .to_string();

        let groups = session
            .as_ref()
            .map(|s| form::build(&s.fields))
            .unwrap_or_default();
        let preview = session
            .as_ref()
            .map(|s| self.preview(s))
            .unwrap_or_default();

        StateView {
            generation: session.as_ref().map_or(0, |s| s.generation),
            languages: self.registry.languages().map(str::to_string).collect(),
            pages: self
                .registry
                .pages(&lang)
                .map(|(name, _)| name.to_string())
                .collect(),
            form: form::render_html(&groups),
            groups,
            preview,
            edited: session.as_ref().is_some_and(|s| s.document.is_edited()),
            selection,
            log: self.activity.text(),
            publishing: self.is_publishing(),
            repo: repo_label(&self.config),
        }
    }
}

/// `owner/name@branch`, as shown in the page header.
pub fn repo_label(config: &AdminConfig) -> String {
    let repo = &config.repo;
    format!("{}/{}@{}", repo.owner, repo.name, repo.branch)
}

/// Holds the publishing flag; clears it on drop whatever the outcome.
struct PublishGuard<'a>(&'a AtomicBool);

impl<'a> PublishGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for PublishGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
