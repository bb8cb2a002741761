//! page/common — футер страницы, слот-записи и идентификаторы записей.
//!
//! Все многобайтовые поля — u16 big-endian. Смещения берутся из crate::consts.

use byteorder::{BigEndian, ByteOrder};

use crate::consts::{FOOTER_LEN, OFF_FREE_SPACE, OFF_SLOT_COUNT, PAGE_SIZE, SLOT_DIR_END, SLOT_SIZE};

/// Ровно одна страница.
pub type PageBuf = [u8; PAGE_SIZE];

/// Номер слота внутри страницы.
pub type SlotId = u16;

/// Глобальный идентификатор записи: (page_number, slot_id).
/// Не меняется после вставки (нет удаления и компакции).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId {
    pub page: u64,
    pub slot: SlotId,
}

impl RecordId {
    pub fn new(page: u64, slot: SlotId) -> Self {
        Self { page, slot }
    }
}

/// Футер страницы: последние 4 байта.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageFooter {
    pub slot_count: u16,
    pub free_space_offset: u16,
}

impl PageFooter {
    /// free_space_offset + slot_count*4 + 4. Может превышать PAGE_SIZE только на испорченной странице.
    #[inline]
    pub fn used_bytes(&self) -> usize {
        self.free_space_offset as usize + self.slot_count as usize * SLOT_SIZE + FOOTER_LEN
    }

    /// 4096 - used_bytes, с насыщением в 0.
    #[inline]
    pub fn free_space(&self) -> usize {
        PAGE_SIZE.saturating_sub(self.used_bytes())
    }

    /// Футер согласован: области записей и слотов не пересекаются.
    #[inline]
    pub fn is_consistent(&self) -> bool {
        self.used_bytes() <= PAGE_SIZE
    }
}

pub fn footer_read(page: &PageBuf) -> PageFooter {
    PageFooter {
        slot_count: BigEndian::read_u16(&page[OFF_SLOT_COUNT..OFF_SLOT_COUNT + 2]),
        free_space_offset: BigEndian::read_u16(&page[OFF_FREE_SPACE..OFF_FREE_SPACE + 2]),
    }
}

pub fn footer_write(page: &mut PageBuf, f: PageFooter) {
    BigEndian::write_u16(&mut page[OFF_SLOT_COUNT..OFF_SLOT_COUNT + 2], f.slot_count);
    BigEndian::write_u16(&mut page[OFF_FREE_SPACE..OFF_FREE_SPACE + 2], f.free_space_offset);
}

/// Слот: [record_offset u16][record_length u16].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotEntry {
    pub offset: u16,
    pub length: u16,
}

impl SlotEntry {
    pub const fn new(offset: u16, length: u16) -> Self {
        Self { offset, length }
    }

    /// Конец записи (исключительно).
    #[inline]
    pub fn end(&self) -> usize {
        self.offset as usize + self.length as usize
    }
}

/// Байтовое смещение слота `slot` в странице: 4092 - 4*(slot+1).
/// None, если слот не помещается в страницу.
#[inline]
pub fn slot_pos(slot: SlotId) -> Option<usize> {
    SLOT_DIR_END.checked_sub(SLOT_SIZE * (slot as usize + 1))
}

/// Прочитать слот без проверки slot_count (вызывающий обязан проверить границы).
pub(crate) fn slot_read(page: &PageBuf, pos: usize) -> SlotEntry {
    SlotEntry {
        offset: BigEndian::read_u16(&page[pos..pos + 2]),
        length: BigEndian::read_u16(&page[pos + 2..pos + 4]),
    }
}

pub(crate) fn slot_write(page: &mut PageBuf, pos: usize, s: SlotEntry) {
    BigEndian::write_u16(&mut page[pos..pos + 2], s.offset);
    BigEndian::write_u16(&mut page[pos + 2..pos + 4], s.length);
}
