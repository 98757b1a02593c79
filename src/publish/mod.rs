//! Publish an edited page back to the site repository.
//!
//! Publishing is a two-step exchange with no retry and no rollback:
//!
//! ```text
//! Idle ─► ReadingRevision ─► WritingContent ─► Published
//!              │                   │
//!              └───────► Failed ◄──┘
//! ```
//!
//! A missing token aborts before anything is sent.

mod github;

use crate::activity::ActivityLog;
use crate::config::RepoConfig;
use crate::net::{Transport, TransportError};
use crate::registry::{Selection, encode_repo_path, repo_path};
use crate::session::Session;
use github::{ApiFailure, GithubClient};
use serde::Serialize;
use thiserror::Error;

/// Logged once the write succeeds.
pub const PUBLISHED: &str = "Published. GitHub Pages will update shortly.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishState {
    Idle,
    ReadingRevision,
    WritingContent,
    Published,
    Failed,
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Paste your GitHub token first.")]
    MissingToken,
    #[error("GitHub API error: {0}")]
    Api(String),
    #[error("Could not read current file SHA.")]
    MissingRevision,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl From<ApiFailure> for PublishError {
    fn from(failure: ApiFailure) -> Self {
        match failure {
            ApiFailure::Status(message) => Self::Api(message),
            ApiFailure::Transport(err) => Self::Transport(err),
        }
    }
}

/// `{message} ({lang}/{page})`, falling back to `default` for a blank message.
pub fn commit_message(message: &str, default: &str, selection: &Selection) -> String {
    let message = match message.trim() {
        "" => default.trim(),
        m => m,
    };
    format!("{message} ({selection})")
}

pub struct Publisher<'a> {
    transport: &'a dyn Transport,
    repo: &'a RepoConfig,
    state: PublishState,
}

impl<'a> Publisher<'a> {
    pub fn new(transport: &'a dyn Transport, repo: &'a RepoConfig) -> Self {
        Self {
            transport,
            repo,
            state: PublishState::Idle,
        }
    }

    pub const fn state(&self) -> PublishState {
        self.state
    }

    fn enter(&mut self, state: PublishState) {
        crate::debug!("publish"; "{:?} -> {:?}", self.state, state);
        self.state = state;
    }

    /// Publish the serialized session with `token`, reporting to `log`.
    pub fn publish(
        &mut self,
        session: &Session,
        token: &str,
        message: &str,
        log: &ActivityLog,
    ) -> Result<(), PublishError> {
        let token = token.trim();
        if token.is_empty() {
            let err = PublishError::MissingToken;
            log.push(err.to_string());
            return Err(err);
        }

        let result = self.run(session, token, message, log);
        match &result {
            Ok(()) => {
                self.enter(PublishState::Published);
                log.push(PUBLISHED);
            }
            Err(err) => {
                self.enter(PublishState::Failed);
                log.push(err.to_string());
            }
        }
        result
    }

    fn run(
        &mut self,
        session: &Session,
        token: &str,
        message: &str,
        log: &ActivityLog,
    ) -> Result<(), PublishError> {
        let path = repo_path(&session.path);
        let encoded = encode_repo_path(path);
        let message = commit_message(message, &self.repo.default_message, &session.selection);
        let content = session.to_html();
        let client = GithubClient::new(self.transport, self.repo, token);

        log.push(format!("Publishing {path}..."));

        self.enter(PublishState::ReadingRevision);
        let sha = client
            .current_sha(&encoded)?
            .ok_or(PublishError::MissingRevision)?;

        self.enter(PublishState::WritingContent);
        client.put_contents(&encoded, &message, &content, &sha)?;
        Ok(())
    }
}
