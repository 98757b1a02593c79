//! Admin routes.
//!
//! Handlers take the parsed request pieces and return a [`Reply`]; sending
//! it over the socket is `response`'s job.

use serde::Deserialize;
use serde_json::json;
use tiny_http::Method;

use super::state::{AdminState, StateError, repo_label};
use crate::embed::admin::{ADMIN_CSS, ADMIN_HTML, ADMIN_JS, AdminVars};
use crate::registry::Selection;
use crate::utils::mime::types::{CSS, HTML, JAVASCRIPT, JSON, PLAIN};

/// A response waiting to be sent.
#[derive(Debug)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    /// File name for `Content-Disposition: attachment`.
    pub attachment: Option<String>,
}

impl Reply {
    fn new(status: u16, content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
            attachment: None,
        }
    }

    fn json(status: u16, value: &impl serde::Serialize) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self::new(status, JSON, body),
            Err(e) => Self::error(500, &e.to_string()),
        }
    }

    fn error(status: u16, message: &str) -> Self {
        Self::json_value(status, &json!({ "error": message }))
    }

    fn json_value(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status, JSON, value.to_string())
    }

    pub fn not_found() -> Self {
        Self::new(404, PLAIN, "404 Not Found")
    }
}

#[derive(Deserialize)]
struct LoadBody {
    lang: String,
    page: String,
}

#[derive(Deserialize)]
struct FieldBody {
    /// Load the edit was made against.
    generation: u64,
    key: String,
    value: String,
}

#[derive(Deserialize)]
struct PublishBody {
    #[serde(default)]
    token: String,
    #[serde(default)]
    message: String,
}

/// Route one request. `path` has its query string removed.
pub fn handle(state: &AdminState, method: &Method, path: &str, body: &str) -> Reply {
    match (method, path) {
        (Method::Get, "/" | "/index.html") => index(state),
        (Method::Get, "/admin.js") => Reply::new(200, JAVASCRIPT, ADMIN_JS),
        (Method::Get, "/admin.css") => Reply::new(200, CSS, ADMIN_CSS),
        (Method::Get, "/api/state") => Reply::json(200, &state.view()),
        (Method::Post, "/api/load") => load(state, body),
        (Method::Post, "/api/field") => field(state, body),
        (Method::Get, "/api/download") => download(state),
        (Method::Post, "/api/publish") => publish(state, body),
        _ => Reply::not_found(),
    }
}

fn index(state: &AdminState) -> Reply {
    let config = state.config();
    let html = ADMIN_HTML.render(&AdminVars {
        site: &config.site.name,
        origin: config.origin(),
        repo: &repo_label(config),
        version: env!("CARGO_PKG_VERSION"),
    });
    Reply::new(200, HTML, html)
}

fn parse<'a, T: Deserialize<'a>>(body: &'a str) -> Result<T, Reply> {
    serde_json::from_str(body).map_err(|e| Reply::error(400, &format!("invalid request: {e}")))
}

fn load(state: &AdminState, body: &str) -> Reply {
    let body: LoadBody = match parse(body) {
        Ok(body) => body,
        Err(reply) => return reply,
    };
    // A failed load is already in the activity log; the page resyncs to
    // whatever is still open.
    let _ = state.load(&Selection::new(body.lang, body.page));
    Reply::json(200, &state.view())
}

fn field(state: &AdminState, body: &str) -> Reply {
    let body: FieldBody = match parse(body) {
        Ok(body) => body,
        Err(reply) => return reply,
    };
    match state.edit(body.generation, &body.key, &body.value) {
        Ok(session) => Reply::json_value(200, &json!({ "preview": state.preview(&session) })),
        Err(e) => rejection(&e),
    }
}

fn download(state: &AdminState) -> Reply {
    match state.download() {
        Ok(export) => Reply {
            status: 200,
            content_type: export.content_type(),
            body: export.content.into_bytes(),
            attachment: Some(export.file_name),
        },
        Err(e) => rejection(&e),
    }
}

fn publish(state: &AdminState, body: &str) -> Reply {
    let body: PublishBody = match parse(body) {
        Ok(body) => body,
        Err(reply) => return reply,
    };
    match state.publish(&body.token, &body.message) {
        Ok(()) => Reply::json_value(200, &json!({ "ok": true, "log": state.activity().text() })),
        // Publish failures are reported through the log
        Err(StateError::Publish(_)) => {
            Reply::json_value(200, &json!({ "ok": false, "log": state.activity().text() }))
        }
        Err(e) => rejection(&e),
    }
}

fn rejection(err: &StateError) -> Reply {
    let status = match err {
        StateError::NoDocument | StateError::Busy | StateError::Stale(_) => 409,
        StateError::Edit(_) => 400,
        StateError::Publish(_) => 502,
    };
    Reply::error(status, &err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdminConfig;
    use crate::net::mock::MockTransport;
    use std::sync::Arc;

    const PAGE: &str = r#"<!DOCTYPE html><html><head></head><body><h1 data-edit="hero.title">Hi</h1></body></html>"#;

    fn state(mock: MockTransport) -> AdminState {
        AdminState::new(Arc::new(AdminConfig::default()), Box::new(mock))
    }

    fn loaded() -> AdminState {
        let state = state(MockTransport::new().reply(200, PAGE));
        state.load(&Selection::default()).unwrap();
        state
    }

    fn body_json(reply: &Reply) -> serde_json::Value {
        serde_json::from_slice(&reply.body).unwrap()
    }

    #[test]
    fn test_static_routes() {
        let state = state(MockTransport::new());
        let reply = handle(&state, &Method::Get, "/", "");
        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type, HTML);
        assert!(String::from_utf8(reply.body).unwrap().contains("/admin.js"));

        assert_eq!(handle(&state, &Method::Get, "/admin.js", "").content_type, JAVASCRIPT);
        assert_eq!(handle(&state, &Method::Get, "/admin.css", "").content_type, CSS);
        assert_eq!(handle(&state, &Method::Get, "/nope", "").status, 404);
        assert_eq!(handle(&state, &Method::Post, "/", "").status, 404);
    }

    #[test]
    fn test_state_route() {
        let state = loaded();
        let reply = handle(&state, &Method::Get, "/api/state", "");
        assert_eq!(reply.content_type, JSON);
        let json = body_json(&reply);
        assert_eq!(json["selection"]["lang"], "en");
        assert_eq!(json["generation"], 1);
        assert_eq!(json["pages"], json!(["home", "privacy", "terms"]));
        assert_eq!(json["groups"][0]["fields"][0]["key"], "hero.title");
        assert_eq!(json["publishing"], false);
    }

    #[test]
    fn test_load_route() {
        let state = state(MockTransport::new().reply(200, PAGE));
        let reply = handle(&state, &Method::Post, "/api/load", r#"{"lang":"zh","page":"terms"}"#);
        assert_eq!(reply.status, 200);
        assert_eq!(body_json(&reply)["selection"]["page"], "terms");

        let reply = handle(&state, &Method::Post, "/api/load", "not json");
        assert_eq!(reply.status, 400);
    }

    #[test]
    fn test_field_route() {
        let state = state(MockTransport::new());
        let edit = r#"{"generation":1,"key":"hero.title","value":"Hello"}"#;
        assert_eq!(handle(&state, &Method::Post, "/api/field", edit).status, 409);

        let state = loaded();
        let reply = handle(&state, &Method::Post, "/api/field", edit);
        assert_eq!(reply.status, 200);
        let preview = body_json(&reply)["preview"].as_str().unwrap().to_string();
        assert!(preview.contains(">Hello</h1>"));
        assert!(preview.contains("<base href="));

        let unknown = r#"{"generation":1,"key":"x","value":""}"#;
        let reply = handle(&state, &Method::Post, "/api/field", unknown);
        assert_eq!(reply.status, 400);
        assert!(body_json(&reply)["error"].as_str().unwrap().contains("`x`"));

        let unnumbered = r#"{"key":"hero.title","value":"x"}"#;
        assert_eq!(handle(&state, &Method::Post, "/api/field", unnumbered).status, 400);
    }

    #[test]
    fn test_field_route_after_reload() {
        let state = state(MockTransport::new().reply(200, PAGE).reply(200, PAGE));
        let reload = r#"{"lang":"en","page":"home"}"#;
        let generations: Vec<_> = (0..2)
            .map(|_| body_json(&handle(&state, &Method::Post, "/api/load", reload))["generation"].as_u64())
            .collect();
        assert_eq!(generations, [Some(1), Some(2)]);

        let late = r#"{"generation":1,"key":"hero.title","value":"Late"}"#;
        let reply = handle(&state, &Method::Post, "/api/field", late);
        assert_eq!(reply.status, 409);
        assert!(body_json(&reply)["error"].as_str().unwrap().contains("reloaded"));
        assert!(state.session().unwrap().to_html().contains(">Hi</h1>"));

        let current = r#"{"generation":2,"key":"hero.title","value":"Now"}"#;
        assert_eq!(handle(&state, &Method::Post, "/api/field", current).status, 200);
    }

    #[test]
    fn test_download_route() {
        let state = state(MockTransport::new());
        assert_eq!(handle(&state, &Method::Get, "/api/download", "").status, 409);
        assert!(state.activity().is_empty());

        let state = loaded();
        let reply = handle(&state, &Method::Get, "/api/download", "");
        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type, "text/html;charset=utf-8");
        let name = reply.attachment.unwrap();
        assert!(name.starts_with("site-en-home-") && name.ends_with(".html"));
        assert!(String::from_utf8(reply.body).unwrap().starts_with("<!doctype html>"));
    }

    #[test]
    fn test_publish_route() {
        let state = state(MockTransport::new());
        assert_eq!(
            handle(&state, &Method::Post, "/api/publish", r#"{"token":"t"}"#).status,
            409
        );

        let state = loaded();
        let reply = handle(&state, &Method::Post, "/api/publish", r#"{"token":"","message":""}"#);
        assert_eq!(reply.status, 200);
        let json = body_json(&reply);
        assert_eq!(json["ok"], false);
        assert!(json["log"].as_str().unwrap().contains("Paste your GitHub token first."));
    }
}
