//! page — формат slotted-страницы (4096 байт) и операции над ней в памяти.
//!
//! Подмодули:
//! - common.rs  — футер, слоты, PageBuf/SlotId/RecordId.
//! - slotted.rs — free_space / insert / read_record / read_all_records.
//! - check.rs   — структурная проверка страницы.
//!
//! I/O здесь нет: страницы читает и пишет модуль heap.

pub mod common;
pub mod slotted;
pub mod check;

pub use common::{footer_read, PageBuf, PageFooter, RecordId, SlotEntry, SlotId};
pub use slotted::{
    for_each_record, free_space, insert, page_init, read_all_records, read_record, slot_count,
};
pub use check::{check_page, PageIssue};
