//! GitHub contents API client.
//!
//! Two calls are used: read a file's current blob `sha`, then write new
//! content on top of that revision.

use crate::config::RepoConfig;
use crate::net::{HttpRequest, HttpResponse, Transport, TransportError};
use crate::registry::encode_segment;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

const ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("pagedit/", env!("CARGO_PKG_VERSION"));

/// Outcome of a single API call that returned a response.
#[derive(Debug)]
pub enum ApiFailure {
    /// Non-2xx status; carries the human-readable reason.
    Status(String),
    Transport(TransportError),
}

#[derive(Debug, Deserialize)]
struct ContentsEntry {
    sha: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Body of the write request.
#[derive(Debug, Serialize)]
pub struct PutContents<'a> {
    pub message: &'a str,
    /// Base64 of the UTF-8 file content.
    pub content: String,
    pub sha: &'a str,
    pub branch: &'a str,
}

pub struct GithubClient<'a> {
    transport: &'a dyn Transport,
    repo: &'a RepoConfig,
    token: &'a str,
}

impl<'a> GithubClient<'a> {
    pub fn new(transport: &'a dyn Transport, repo: &'a RepoConfig, token: &'a str) -> Self {
        Self {
            transport,
            repo,
            token,
        }
    }

    /// `{api}/repos/{owner}/{name}/contents/{path}`; `path` must already be encoded.
    pub fn contents_url(&self, encoded_path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{encoded_path}",
            self.repo.api.trim_end_matches('/'),
            self.repo.owner,
            self.repo.name,
        )
    }

    fn with_headers(&self, request: HttpRequest) -> HttpRequest {
        request
            .header("Accept", ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("User-Agent", USER_AGENT)
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiFailure> {
        let response = self
            .transport
            .send(self.with_headers(request))
            .map_err(ApiFailure::Transport)?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(ApiFailure::Status(error_message(&response)))
        }
    }

    /// Current blob `sha` of the file on the configured branch.
    ///
    /// `Ok(None)` when the response has no usable `sha` (a directory
    /// listing, say).
    pub fn current_sha(&self, encoded_path: &str) -> Result<Option<String>, ApiFailure> {
        let url = format!(
            "{}?ref={}",
            self.contents_url(encoded_path),
            encode_segment(&self.repo.branch)
        );
        let response = self.send(HttpRequest::get(url))?;
        let sha = serde_json::from_str::<ContentsEntry>(&response.body)
            .ok()
            .and_then(|entry| entry.sha)
            .filter(|sha| !sha.is_empty());
        Ok(sha)
    }

    /// Write `content` over revision `sha`.
    pub fn put_contents(
        &self,
        encoded_path: &str,
        message: &str,
        content: &str,
        sha: &str,
    ) -> Result<(), ApiFailure> {
        let body = PutContents {
            message,
            content: STANDARD.encode(content.as_bytes()),
            sha,
            branch: &self.repo.branch,
        };
        // Serializing plain strings cannot fail
        let body = serde_json::to_string(&body).unwrap_or_default();
        self.send(HttpRequest::put(self.contents_url(encoded_path), body))?;
        Ok(())
    }
}

/// The API's `message` field, or `HTTP {status}` when there is none.
pub fn error_message(response: &HttpResponse) -> String {
    serde_json::from_str::<ErrorBody>(&response.body)
        .ok()
        .and_then(|body| body.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP {}", response.status))
}
