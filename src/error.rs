//! Типизированные ошибки ядра (page codec + heap file manager).
//!
//! Слои выше (record codec, query, CLI) работают через anyhow и при необходимости
//! достают HeapError через `downcast_ref`.

use std::path::PathBuf;

use thiserror::Error;

use crate::page::SlotId;

pub type Result<T> = std::result::Result<T, HeapError>;

#[derive(Debug, Error)]
pub enum HeapError {
    /// page_number >= page_count.
    #[error("page {page} out of range (file has {page_count} pages)")]
    PageOutOfRange { page: u64, page_count: u64 },

    /// Буфер для write/append не равен PAGE_SIZE.
    #[error("invalid page buffer size: expected {expected}, got {actual}")]
    InvalidPageSize { expected: usize, actual: usize },

    /// Конкретная страница не вмещает запись. Не выходит за пределы insert_record.
    #[error("not enough free space in page: need {required} bytes, have {available}")]
    InsufficientSpace { required: usize, available: usize },

    /// Запись не помещается даже в пустую страницу.
    #[error("record of {len} bytes exceeds page capacity of {max} bytes")]
    RecordTooLarge { len: usize, max: usize },

    /// Длина файла не кратна PAGE_SIZE.
    #[error("heap file length {len} is not a multiple of the page size")]
    NotAligned { len: u64 },

    #[error("slot {slot} out of range (page has {slot_count} slots)")]
    SlotOutOfRange { slot: SlotId, slot_count: u16 },

    #[error("heap file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    /// Футер описывает больше байт, чем есть в странице.
    #[error("corrupt footer: slot_count={slot_count}, free_space_offset={free_space_offset}")]
    CorruptFooter { slot_count: u16, free_space_offset: u16 },

    /// Слот указывает за пределы области записей (футер/слоты испорчены снаружи).
    #[error("corrupt slot {slot}: record [{offset}, +{length}) lies outside the record area")]
    CorruptSlot { slot: SlotId, offset: u16, length: u16 },

    #[error("lock {}: {source}", .path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HeapError {
    /// Страница не вмещает запись; insert_record в этом случае идёт к следующей странице.
    pub fn is_insufficient_space(&self) -> bool {
        matches!(self, HeapError::InsufficientSpace { .. })
    }
}
