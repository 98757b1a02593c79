//! Local admin server.
//!
//! Serves the admin page and a small JSON API over tiny_http. All editing
//! logic runs here; the browser forwards input and shows what comes back.

mod api;
mod lifecycle;
mod response;
mod state;

use crate::{config::cfg, core::register_server, log, net::Transport, registry::Selection};
use anyhow::Result;
use crossbeam::channel;
use state::AdminState;
use std::io::Read;
use std::sync::Arc;
use tiny_http::{Request, Server};

/// Largest request body accepted (an edited field value).
const MAX_BODY_BYTES: u64 = 4 * 1024 * 1024;

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    state: Arc<AdminState>,
}

/// Bind the HTTP server without starting the request loop
///
/// Requests that arrive before [`BoundServer::run`] wait in the listener's
/// queue until the initial page load finishes.
pub fn bind_server(transport: Box<dyn Transport>) -> Result<BoundServer> {
    let config = cfg();
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    register_server(Arc::clone(&server));

    log!("serve"; "http://{}", addr);

    Ok(BoundServer {
        server,
        state: Arc::new(AdminState::new(config, transport)),
    })
}

impl BoundServer {
    /// Open the home page, then start the request loop (blocking).
    pub fn run(self) -> Result<()> {
        // Failures are already in the activity log
        let _ = self.state.load(&Selection::default());
        run_request_loop(&self.server, &self.state)
    }
}

fn run_request_loop(server: &Server, state: &Arc<AdminState>) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new().num_threads(4).build()?;

    // Each handler holds a sender; shutdown waits for all of them to drop
    let (done_tx, done_rx) = channel::unbounded::<()>();

    for request in server.incoming_requests() {
        let state = Arc::clone(state);
        let done = done_tx.clone();
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &state) {
                log!("serve"; "request error: {e}");
            }
            drop(done);
        });
    }

    drop(done_tx);
    lifecycle::wait_for_requests(done_rx);
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(mut request: Request, state: &AdminState) -> Result<()> {
    // Early exit if shutdown requested
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    let mut body = String::new();
    let read = request
        .as_reader()
        .take(MAX_BODY_BYTES + 1)
        .read_to_string(&mut body)?;
    if read as u64 > MAX_BODY_BYTES {
        return response::respond_too_large(request);
    }

    let method = request.method().clone();
    let path = request.url().split('?').next().unwrap_or("/").to_string();
    crate::debug!("serve"; "{} {}", method, path);

    let reply = api::handle(state, &method, &path, &body);
    response::send_reply(request, reply)
}
