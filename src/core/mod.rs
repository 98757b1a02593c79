//! Process-level state shared by the server and the signal handler.

mod state;

pub use state::{is_shutdown, register_server, setup_shutdown_handler};
