//! Lightweight global metrics for heapdb.
//!
//! Потокобезопасные атомарные счётчики для heap-слоя:
//! - страничный I/O (read/write/append)
//! - размещение записей (first-fit в существующую страницу vs новая страница)

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

// ----- Page I/O -----
static PAGES_READ: AtomicU64 = AtomicU64::new(0);
static PAGES_WRITTEN: AtomicU64 = AtomicU64::new(0);
static PAGES_APPENDED: AtomicU64 = AtomicU64::new(0);

// ----- Placement -----
static RECORDS_INSERTED: AtomicU64 = AtomicU64::new(0);
static RECORD_BYTES_INSERTED: AtomicU64 = AtomicU64::new(0);
static INSERTS_INTO_EXISTING: AtomicU64 = AtomicU64::new(0);
static INSERTS_INTO_NEW_PAGE: AtomicU64 = AtomicU64::new(0);
static PAGES_PROBED: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSnapshot {
    pub pages_read: u64,
    pub pages_written: u64,
    pub pages_appended: u64,

    pub records_inserted: u64,
    pub record_bytes_inserted: u64,
    pub inserts_into_existing: u64,
    pub inserts_into_new_page: u64,
    /// Страниц просмотрено first-fit поиском (включая ту, что подошла).
    pub pages_probed: u64,
}

impl MetricsSnapshot {
    /// Среднее число страниц, прочитанных на одну вставку.
    pub fn avg_probe_len(&self) -> f64 {
        if self.records_inserted == 0 {
            0.0
        } else {
            self.pages_probed as f64 / self.records_inserted as f64
        }
    }
}

pub fn record_page_read() {
    PAGES_READ.fetch_add(1, Ordering::Relaxed);
}
pub fn record_page_written() {
    PAGES_WRITTEN.fetch_add(1, Ordering::Relaxed);
}
pub fn record_page_appended() {
    PAGES_APPENDED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_insert(len: usize, into_new_page: bool, probed: u64) {
    RECORDS_INSERTED.fetch_add(1, Ordering::Relaxed);
    RECORD_BYTES_INSERTED.fetch_add(len as u64, Ordering::Relaxed);
    PAGES_PROBED.fetch_add(probed, Ordering::Relaxed);
    if into_new_page {
        INSERTS_INTO_NEW_PAGE.fetch_add(1, Ordering::Relaxed);
    } else {
        INSERTS_INTO_EXISTING.fetch_add(1, Ordering::Relaxed);
    }
}

pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        pages_read: PAGES_READ.load(Ordering::Relaxed),
        pages_written: PAGES_WRITTEN.load(Ordering::Relaxed),
        pages_appended: PAGES_APPENDED.load(Ordering::Relaxed),
        records_inserted: RECORDS_INSERTED.load(Ordering::Relaxed),
        record_bytes_inserted: RECORD_BYTES_INSERTED.load(Ordering::Relaxed),
        inserts_into_existing: INSERTS_INTO_EXISTING.load(Ordering::Relaxed),
        inserts_into_new_page: INSERTS_INTO_NEW_PAGE.load(Ordering::Relaxed),
        pages_probed: PAGES_PROBED.load(Ordering::Relaxed),
    }
}
