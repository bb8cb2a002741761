//! heap/io — постраничный ввод/вывод:
//! - page_count: len / PAGE_SIZE (NotAligned, если длина не кратна);
//! - read_page: один seek + read_exact ровно PAGE_SIZE байт;
//! - write_page: перезапись существующей страницы на месте (файл не растёт);
//! - append_page: дописать страницу в конец — единственный путь роста файла.
//!
//! Низкоуровневые *_at функции работают с уже открытым (и заблокированным) файлом,
//! чтобы insert_record мог сделать read-modify-write под одной блокировкой.

use log::debug;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};

use crate::consts::PAGE_SIZE;
use crate::error::{HeapError, Result};
use crate::metrics::{record_page_appended, record_page_read, record_page_written};
use crate::page::{page_init, PageBuf};

use super::core::{Access, HeapFile};

pub(crate) fn page_count_of(file: &File) -> Result<u64> {
    let len = file.metadata()?.len();
    if len % PAGE_SIZE as u64 != 0 {
        return Err(HeapError::NotAligned { len });
    }
    Ok(len / PAGE_SIZE as u64)
}

#[inline]
fn check_page_no(page: u64, page_count: u64) -> Result<()> {
    if page >= page_count {
        return Err(HeapError::PageOutOfRange { page, page_count });
    }
    Ok(())
}

#[inline]
fn check_buf_len(buf: &[u8]) -> Result<()> {
    if buf.len() != PAGE_SIZE {
        return Err(HeapError::InvalidPageSize { expected: PAGE_SIZE, actual: buf.len() });
    }
    Ok(())
}

pub(crate) fn read_page_at(file: &mut File, page: u64, page_count: u64) -> Result<Box<PageBuf>> {
    check_page_no(page, page_count)?;
    let mut buf = page_init();
    file.seek(SeekFrom::Start(page * PAGE_SIZE as u64))?;
    file.read_exact(&mut buf[..])?;
    record_page_read();
    Ok(buf)
}

pub(crate) fn write_page_at(file: &mut File, page: u64, page_count: u64, buf: &[u8]) -> Result<()> {
    check_page_no(page, page_count)?;
    check_buf_len(buf)?;
    file.seek(SeekFrom::Start(page * PAGE_SIZE as u64))?;
    file.write_all(buf)?;
    record_page_written();
    Ok(())
}

/// Дописать страницу в конец. Возвращает номер новой страницы.
pub(crate) fn append_page_to(file: &mut File, buf: &[u8]) -> Result<u64> {
    check_buf_len(buf)?;
    // не дописываем к файлу с "хвостом" — это испортило бы выравнивание всех следующих страниц
    let page = page_count_of(file)?;
    file.seek(SeekFrom::End(0))?;
    file.write_all(buf)?;
    record_page_appended();
    Ok(page)
}

impl HeapFile {
    /// Число страниц в файле.
    pub fn page_count(&self) -> Result<u64> {
        let g = self.open(Access::Read)?;
        page_count_of(g.file())
    }

    /// Прочитать страницу `page` (PageOutOfRange, если её нет).
    pub fn read_page(&self, page: u64) -> Result<Box<PageBuf>> {
        let mut g = self.open(Access::Read)?;
        let count = page_count_of(g.file())?;
        read_page_at(g.file_mut(), page, count)
    }

    /// Перезаписать существующую страницу. Файл не удлиняется.
    pub fn write_page(&self, page: u64, buf: &[u8]) -> Result<()> {
        let mut g = self.open(Access::Write)?;
        let count = page_count_of(g.file())?;
        write_page_at(g.file_mut(), page, count, buf)?;
        self.sync(&g)?;
        debug!("write_page: {} page {}", self.path.display(), page);
        Ok(())
    }

    /// Дописать страницу в конец файла. Возвращает её номер.
    pub fn append_page(&self, buf: &[u8]) -> Result<u64> {
        check_buf_len(buf)?;
        let mut g = self.open(Access::Append)?;
        let page = append_page_to(g.file_mut(), buf)?;
        self.sync(&g)?;
        debug!("append_page: {} -> page {}", self.path.display(), page);
        Ok(page)
    }
}
