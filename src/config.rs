//! Configuration for heap file access.
//!
//! Goals:
//! - Single place for the tunables instead of scattering env lookups.
//! - The core never reads the environment itself: callers build a HeapConfig
//!   (default, from_env() or builder-style) and hand it to HeapFile.
//!
//! Defaults:
//! - data_fsync = false (no sync_data after each page write/append)
//! - file_lock = true (fs2 advisory lock per call: exclusive for writes, shared for reads)

use serde::Serialize;
use std::fmt;

use crate::consts::{ENV_DATA_FSYNC, ENV_FILE_LOCK};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HeapConfig {
    /// Whether to sync_data() after write_page / append_page.
    /// Env: HEAPDB_DATA_FSYNC (default false; "1|true|on|yes" => true)
    pub data_fsync: bool,

    /// Take an advisory lock on the heap file for the duration of each call.
    /// Env: HEAPDB_FILE_LOCK (default true; "0|false|off|no" => false)
    pub file_lock: bool,
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self {
            data_fsync: false,
            file_lock: true,
        }
    }
}

#[inline]
fn env_flag(name: &str) -> Option<bool> {
    let v = std::env::var(name).ok()?;
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl HeapConfig {
    /// Load configuration from environment variables; unknown values keep the default.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(on) = env_flag(ENV_DATA_FSYNC) {
            cfg.data_fsync = on;
        }
        if let Some(on) = env_flag(ENV_FILE_LOCK) {
            cfg.file_lock = on;
        }
        cfg
    }

    pub fn with_data_fsync(mut self, on: bool) -> Self {
        self.data_fsync = on;
        self
    }

    pub fn with_file_lock(mut self, on: bool) -> Self {
        self.file_lock = on;
        self
    }
}

impl fmt::Display for HeapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HeapConfig {{ data_fsync: {}, file_lock: {} }}",
            self.data_fsync, self.file_lock
        )
    }
}
