//! heap — heap-файл как последовательность страниц по 4096 байт.
//!
//! Подмодули:
//! - core.rs   — HeapFile, create(), открытие файла под fs2-блокировкой.
//! - io.rs     — page_count / read_page / write_page / append_page.
//! - insert.rs — insert_record (first-fit, иначе новая страница).
//! - scan.rs   — scan_all_records / scan_stream / read_record / page_stats.
//! - doctor.rs — check(): структурная проверка всех страниц.
//!
//! Раскладка внутри страницы целиком делегирована модулю page.
//!
//! Ниже — функции "по пути": каждая открывает файл,
//! делает одно действие и закрывает его; конфигурация по умолчанию.

pub mod core;
pub mod io;
pub mod insert;
pub mod scan;
pub mod doctor;

use std::path::Path;

use crate::config::HeapConfig;
use crate::error::Result;
use crate::page::{PageBuf, RecordId, SlotId};

pub use self::core::HeapFile;
pub use doctor::{CheckReport, PageReport};
pub use scan::PageStat;

/// Создать пустой файл (0 страниц); AlreadyExists, если файл уже есть.
pub fn create(path: &Path) -> Result<()> {
    HeapFile::create(path, HeapConfig::default()).map(|_| ())
}

pub fn page_count(path: &Path) -> Result<u64> {
    HeapFile::new(path).page_count()
}

pub fn read_page(path: &Path, page: u64) -> Result<Box<PageBuf>> {
    HeapFile::new(path).read_page(page)
}

pub fn write_page(path: &Path, page: u64, buf: &[u8]) -> Result<()> {
    HeapFile::new(path).write_page(page, buf)
}

pub fn append_page(path: &Path, buf: &[u8]) -> Result<u64> {
    HeapFile::new(path).append_page(buf)
}

pub fn insert_record(path: &Path, record: &[u8]) -> Result<RecordId> {
    HeapFile::new(path).insert_record(record)
}

pub fn scan_all_records(path: &Path) -> Result<Vec<Vec<u8>>> {
    HeapFile::new(path).scan_all_records()
}

pub fn read_record(path: &Path, page: u64, slot: SlotId) -> Result<Vec<u8>> {
    HeapFile::new(path).read_record(page, slot)
}
