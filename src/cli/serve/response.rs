//! Sending replies over tiny_http.

use super::api::Reply;
use anyhow::{Result, anyhow};
use tiny_http::{Header, Request, Response, StatusCode};

/// Send a routed reply.
pub fn send_reply(request: Request, reply: Reply) -> Result<()> {
    let mut response = Response::from_data(reply.body)
        .with_status_code(StatusCode(reply.status))
        .with_header(make_header("Content-Type", reply.content_type)?)
        .with_header(make_header("Cache-Control", "no-store")?);

    if let Some(name) = &reply.attachment {
        let disposition = format!("attachment; filename=\"{}\"", name.replace('"', ""));
        response = response.with_header(make_header("Content-Disposition", &disposition)?);
    }

    request.respond(response)?;
    Ok(())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    use crate::utils::mime::types::PLAIN;
    let response = Response::from_string("503 Service Unavailable")
        .with_status_code(StatusCode(503))
        .with_header(make_header("Content-Type", PLAIN)?);
    request.respond(response)?;
    Ok(())
}

/// Respond with 413 when a request body exceeds the limit.
pub fn respond_too_large(request: Request) -> Result<()> {
    use crate::utils::mime::types::PLAIN;
    let response = Response::from_string("413 Payload Too Large")
        .with_status_code(StatusCode(413))
        .with_header(make_header("Content-Type", PLAIN)?);
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &str, value: &str) -> Result<Header> {
    Header::from_bytes(key, value).map_err(|()| anyhow!("invalid header {key}: {value}"))
}
