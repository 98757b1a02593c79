//! Server lifecycle management.

use crate::{debug, log};
use anyhow::Result;
use crossbeam::channel::{Receiver, RecvTimeoutError};
use std::{net::SocketAddr, time::Duration};
use tiny_http::Server;

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// How long shutdown waits for running requests (a publish in progress).
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Bind to the specified interface and port, with automatic port retry.
pub fn bind_with_retry(
    interface: std::net::IpAddr,
    base_port: u16,
) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;
    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }
    Err(anyhow::anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        MAX_PORT_RETRIES,
        base_port,
        base_port.saturating_add(MAX_PORT_RETRIES - 1),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

/// Wait until every request handler has dropped its sender, or give up
/// after [`SHUTDOWN_GRACE`].
pub fn wait_for_requests(done: Receiver<()>) {
    match done.recv_timeout(SHUTDOWN_GRACE) {
        Err(RecvTimeoutError::Timeout) => {
            log!("serve"; "requests still running after {}s, exiting", SHUTDOWN_GRACE.as_secs());
        }
        _ => debug!("serve"; "all requests finished"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam::channel;
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn test_bind_retries_next_port() {
        let localhost = IpAddr::V4(Ipv4Addr::LOCALHOST);
        let (first, addr) = bind_with_retry(localhost, 0).unwrap();
        let taken = first.server_addr().to_ip().unwrap().port();
        assert_eq!(addr.port(), 0);

        let (_second, addr) = bind_with_retry(localhost, taken).unwrap();
        assert_ne!(addr.port(), taken);
    }

    #[test]
    fn test_wait_returns_when_senders_drop() {
        let (tx, rx) = channel::unbounded::<()>();
        let worker = tx.clone();
        drop(tx);
        let handle = std::thread::spawn(move || drop(worker));
        wait_for_requests(rx);
        handle.join().unwrap();
    }
}
