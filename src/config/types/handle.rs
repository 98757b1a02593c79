//! Global config handle.
//!
//! Uses `arc-swap` for lock-free reads. The config is installed once at
//! startup; request handlers on the server's worker threads read it
//! through [`cfg`].

use crate::config::AdminConfig;
use arc_swap::ArcSwap;
use std::sync::{Arc, LazyLock};

/// Global config storage.
pub static CONFIG: LazyLock<ArcSwap<AdminConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(AdminConfig::default()));

#[inline]
pub fn cfg() -> Arc<AdminConfig> {
    CONFIG.load_full()
}

#[inline]
pub fn init_config(config: AdminConfig) -> Arc<AdminConfig> {
    let arc = Arc::new(config);
    CONFIG.store(Arc::clone(&arc));
    arc
}
