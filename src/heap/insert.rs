//! heap/insert — размещение записи в файле (first-fit).
//!
//! Алгоритм:
//! 1) страницы просматриваются по возрастанию номера;
//! 2) первая страница, где free_space >= len + SLOT_SIZE, получает запись
//!    (read-modify-write только этой страницы);
//! 3) если места нет нигде — новая нулевая страница с записью дописывается в конец.
//!
//! Вся процедура идёт под одной exclusive-блокировкой файла, так что конкурентный
//! писатель не может потерять обновление между чтением и записью страницы.
//! InsufficientSpace отдельной страницы наружу не выходит.

use log::{debug, info};

use crate::consts::MAX_RECORD_LEN;
use crate::error::{HeapError, Result};
use crate::metrics::record_insert;
use crate::page::{self, page_init, RecordId};

use super::core::{Access, HeapFile};
use super::io::{append_page_to, page_count_of, read_page_at, write_page_at};

impl HeapFile {
    /// Вставить запись. Возвращает её (page, slot).
    ///
    /// Отсутствующий файл трактуется как файл из 0 страниц и создаётся.
    /// Ошибка RecordTooLarge — запись не влезает даже в пустую страницу.
    pub fn insert_record(&self, record: &[u8]) -> Result<RecordId> {
        let len = record.len();
        if len > MAX_RECORD_LEN {
            return Err(HeapError::RecordTooLarge { len, max: MAX_RECORD_LEN });
        }

        let mut g = self.open(Access::Append)?;
        let count = page_count_of(g.file())?;

        let mut probed = 0u64;
        for page_no in 0..count {
            let mut buf = read_page_at(g.file_mut(), page_no, count)?;
            probed += 1;
            let slot = match page::insert(&mut buf, record) {
                Ok(slot) => slot,
                Err(e) if e.is_insufficient_space() => continue,
                Err(e) => return Err(e),
            };
            write_page_at(g.file_mut(), page_no, count, &buf[..])?;
            self.sync(&g)?;
            record_insert(len, false, probed);
            debug!(
                "insert_record: {} B -> page {} slot {} (probed {} of {} pages)",
                len, page_no, slot, probed, count
            );
            return Ok(RecordId::new(page_no, slot));
        }

        let mut buf = page_init();
        let slot = page::insert(&mut buf, record)?;
        let page_no = append_page_to(g.file_mut(), &buf[..])?;
        self.sync(&g)?;
        record_insert(len, true, probed);
        info!(
            "insert_record: no room in {} existing pages of {}, appended page {}",
            count,
            self.path.display(),
            page_no
        );
        Ok(RecordId::new(page_no, slot))
    }
}
