//! page/check — структурная проверка страницы (для `heapdb check`).
//!
//! Проверяется то, на что опирается формат:
//! - футер согласован (used_bytes <= PAGE_SIZE);
//! - записи лежат в [0, free_space_offset), идут подряд в порядке слотов
//!   (record_offset слота i == конец слота i-1), не пересекаются.

use serde::Serialize;

use super::common::{footer_read, slot_pos, slot_read, PageBuf, SlotId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageIssue {
    CorruptFooter { slot_count: u16, free_space_offset: u16 },
    SlotOutsideRecordArea { slot: SlotId, offset: u16, length: u16 },
    SlotNotContiguous { slot: SlotId, expected_offset: u16, offset: u16 },
    TrailingBytes { records_end: u16, free_space_offset: u16 },
}

/// Вернуть список нарушений (пусто — страница валидна).
pub fn check_page(page: &PageBuf) -> Vec<PageIssue> {
    let footer = footer_read(page);
    if !footer.is_consistent() {
        return vec![PageIssue::CorruptFooter {
            slot_count: footer.slot_count,
            free_space_offset: footer.free_space_offset,
        }];
    }

    let mut issues = Vec::new();
    let mut expected: usize = 0;
    for slot in 0..footer.slot_count {
        let Some(pos) = slot_pos(slot) else { break };
        let s = slot_read(page, pos);
        if s.end() > footer.free_space_offset as usize {
            issues.push(PageIssue::SlotOutsideRecordArea {
                slot,
                offset: s.offset,
                length: s.length,
            });
            continue;
        }
        if s.offset as usize != expected {
            issues.push(PageIssue::SlotNotContiguous {
                slot,
                expected_offset: expected as u16,
                offset: s.offset,
            });
        }
        expected = s.end();
    }

    if issues.is_empty() && expected != footer.free_space_offset as usize {
        issues.push(PageIssue::TrailingBytes {
            records_end: expected as u16,
            free_space_offset: footer.free_space_offset,
        });
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::slotted::{insert, page_init};

    #[test]
    fn fresh_and_filled_pages_are_clean() {
        let mut page = page_init();
        assert!(check_page(&page).is_empty());
        for i in 0..20u8 {
            insert(&mut page, &vec![i; i as usize * 3]).unwrap();
        }
        assert!(check_page(&page).is_empty());
    }

    #[test]
    fn detects_overlapping_slot() {
        let mut page = page_init();
        insert(&mut page, b"aaaa").unwrap();
        insert(&mut page, b"bbbb").unwrap();
        // слот 1 теперь указывает на начало записи 0
        page[4084..4088].copy_from_slice(&[0, 0, 0, 4]);
        let issues = check_page(&page);
        assert_eq!(
            issues,
            vec![PageIssue::SlotNotContiguous { slot: 1, expected_offset: 4, offset: 0 }]
        );
    }

    #[test]
    fn detects_gap_before_free_space() {
        let mut page = page_init();
        insert(&mut page, b"abc").unwrap();
        // free_space_offset сдвинут вперёд без новой записи
        page[4094..4096].copy_from_slice(&10u16.to_be_bytes());
        assert_eq!(
            check_page(&page),
            vec![PageIssue::TrailingBytes { records_end: 3, free_space_offset: 10 }]
        );
    }
}
