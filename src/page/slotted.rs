//! page/slotted — операции над одной страницей в памяти (без I/O).
//!
//! Раскладка:
//! - [0, free_space_offset)           — записи подряд, в порядке вставки, без выравнивания;
//! - слот i по адресу 4092 - 4*(i+1)  — (record_offset, record_length);
//! - [4092, 4096)                     — футер (slot_count, free_space_offset).
//!
//! Записи растут вперёд от 0, слоты — назад от футера. Единственный барьер между ними —
//! проверка free_space >= len + SLOT_SIZE в insert().

use crate::consts::{MAX_RECORD_LEN, PAGE_SIZE, SLOT_SIZE};
use crate::error::{HeapError, Result};

use super::common::{
    footer_read, footer_write, slot_pos, slot_read, slot_write, PageBuf, PageFooter, SlotEntry,
    SlotId,
};

/// Новая пустая страница (slot_count=0, free_space_offset=0).
pub fn page_init() -> Box<PageBuf> {
    Box::new([0u8; PAGE_SIZE])
}

/// Свободное место по футеру: 4096 - (free_space_offset + slot_count*4 + 4).
pub fn free_space(page: &PageBuf) -> usize {
    footer_read(page).free_space()
}

pub fn slot_count(page: &PageBuf) -> u16 {
    footer_read(page).slot_count
}

/// Вставить запись в страницу (in place). Возвращает slot_id новой записи.
///
/// Ошибки:
/// - RecordTooLarge — запись не влезает даже в пустую страницу (и в u16 длины);
/// - InsufficientSpace — на этой странице не хватает места (страница не меняется).
pub fn insert(page: &mut PageBuf, record: &[u8]) -> Result<SlotId> {
    let len = record.len();
    if len > MAX_RECORD_LEN {
        return Err(HeapError::RecordTooLarge { len, max: MAX_RECORD_LEN });
    }

    let footer = footer_read(page);
    let required = len + SLOT_SIZE;
    let available = footer.free_space();
    if available < required {
        return Err(HeapError::InsufficientSpace { required, available });
    }

    let start = footer.free_space_offset as usize;
    page[start..start + len].copy_from_slice(record);

    let slot = footer.slot_count;
    // available >= SLOT_SIZE гарантирует, что слот лежит внутри страницы
    let pos = slot_pos(slot).ok_or(HeapError::CorruptFooter {
        slot_count: footer.slot_count,
        free_space_offset: footer.free_space_offset,
    })?;
    slot_write(page, pos, SlotEntry::new(footer.free_space_offset, len as u16));

    footer_write(
        page,
        PageFooter {
            slot_count: slot + 1,
            free_space_offset: footer.free_space_offset + len as u16,
        },
    );
    Ok(slot)
}

/// Прочитать запись по slot_id. O(1).
pub fn read_record(page: &PageBuf, slot: SlotId) -> Result<&[u8]> {
    let footer = checked_footer(page)?;
    if slot >= footer.slot_count {
        return Err(HeapError::SlotOutOfRange { slot, slot_count: footer.slot_count });
    }
    record_at(page, &footer, slot)
}

/// Все записи страницы в порядке слотов 0..slot_count.
pub fn read_all_records(page: &PageBuf) -> Result<Vec<&[u8]>> {
    let footer = checked_footer(page)?;
    let mut out = Vec::with_capacity(footer.slot_count as usize);
    for slot in 0..footer.slot_count {
        out.push(record_at(page, &footer, slot)?);
    }
    Ok(out)
}

/// Обойти записи страницы в порядке слотов, не собирая их в вектор.
pub fn for_each_record<'a, F>(page: &'a PageBuf, mut f: F) -> Result<()>
where
    F: FnMut(SlotId, &'a [u8]),
{
    let footer = checked_footer(page)?;
    for slot in 0..footer.slot_count {
        f(slot, record_at(page, &footer, slot)?);
    }
    Ok(())
}

fn checked_footer(page: &PageBuf) -> Result<PageFooter> {
    let footer = footer_read(page);
    if !footer.is_consistent() {
        return Err(HeapError::CorruptFooter {
            slot_count: footer.slot_count,
            free_space_offset: footer.free_space_offset,
        });
    }
    Ok(footer)
}

fn record_at<'a>(page: &'a PageBuf, footer: &PageFooter, slot: SlotId) -> Result<&'a [u8]> {
    let pos = slot_pos(slot).ok_or(HeapError::CorruptFooter {
        slot_count: footer.slot_count,
        free_space_offset: footer.free_space_offset,
    })?;
    let s = slot_read(page, pos);
    if s.end() > footer.free_space_offset as usize {
        return Err(HeapError::CorruptSlot { slot, offset: s.offset, length: s.length });
    }
    Ok(&page[s.offset as usize..s.end()])
}
