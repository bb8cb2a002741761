//! heap/scan — чтение записей из файла.
//!
//! Порядок полного скана — (номер страницы, номер слота) по возрастанию. Это и есть
//! "порядок таблицы", на который опираются слои выше.

use serde::Serialize;

use crate::error::Result;
use crate::page::{self, footer_read, RecordId};

use super::core::{Access, HeapFile};
use super::io::{page_count_of, read_page_at};

/// Сводка по одной странице (для status).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageStat {
    pub page: u64,
    pub slot_count: u16,
    pub free_space_offset: u16,
    pub free_space: usize,
}

impl HeapFile {
    /// Обойти все записи, не собирая их: f(RecordId, bytes).
    pub fn scan_stream<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(RecordId, &[u8]),
    {
        let mut g = self.open(Access::Read)?;
        let count = page_count_of(g.file())?;
        for page_no in 0..count {
            let buf = read_page_at(g.file_mut(), page_no, count)?;
            page::for_each_record(&buf, |slot, rec| f(RecordId::new(page_no, slot), rec))?;
        }
        Ok(())
    }

    /// Все записи файла в порядке (страница, слот).
    pub fn scan_all_records(&self) -> Result<Vec<Vec<u8>>> {
        let mut out = Vec::new();
        self.scan_stream(|_, rec| out.push(rec.to_vec()))?;
        Ok(out)
    }

    /// Одна запись по (page, slot).
    pub fn read_record(&self, page_no: u64, slot: page::SlotId) -> Result<Vec<u8>> {
        let buf = self.read_page(page_no)?;
        Ok(page::read_record(&buf, slot)?.to_vec())
    }

    /// Футер и свободное место каждой страницы.
    pub fn page_stats(&self) -> Result<Vec<PageStat>> {
        let mut g = self.open(Access::Read)?;
        let count = page_count_of(g.file())?;
        let mut out = Vec::with_capacity(count as usize);
        for page_no in 0..count {
            let buf = read_page_at(g.file_mut(), page_no, count)?;
            let f = footer_read(&buf);
            out.push(PageStat {
                page: page_no,
                slot_count: f.slot_count,
                free_space_offset: f.free_space_offset,
                free_space: f.free_space(),
            });
        }
        Ok(out)
    }
}
