//! User-visible activity log.
//!
//! Every user action reports what happened here: loads, empty-page notices,
//! downloads, publish progress, and every failure as a readable line.
//! Entries are timestamped and kept newest first, the order the admin page
//! shows them in.

use chrono::Local;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Oldest entries are dropped beyond this.
const MAX_ENTRIES: usize = 500;

#[derive(Debug, Default)]
pub struct ActivityLog {
    entries: Mutex<VecDeque<String>>,
    /// Also print entries to the terminal.
    echo: bool,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A log that mirrors entries to the terminal (CLI commands).
    pub fn echoing() -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            echo: true,
        }
    }

    /// Record a line, stamped with the local time.
    pub fn push(&self, line: impl AsRef<str>) {
        let line = line.as_ref();
        let stamp = Local::now().format("%H:%M:%S");
        if self.echo {
            crate::log!("pagedit"; "{}", line);
        } else {
            crate::debug!("activity"; "{}", line);
        }

        let mut entries = self.entries.lock();
        entries.push_front(format!("[{stamp}] {line}"));
        entries.truncate(MAX_ENTRIES);
    }

    /// Entries, newest first.
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().iter().cloned().collect()
    }

    /// Entries joined as the admin page displays them.
    pub fn text(&self) -> String {
        self.entries
            .lock()
            .iter()
            .map(|line| format!("{line}\n"))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Whether any entry contains `needle` (after its timestamp).
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.lock().iter().any(|line| line.contains(needle))
    }
}
