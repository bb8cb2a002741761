//! heap/doctor — проверка целостности heap-файла и отчёт (текст/JSON).
//!
//! Семантика:
//! - длина файла не кратна PAGE_SIZE → trailing_bytes > 0, проверяются только целые страницы;
//! - каждая страница проходит page::check_page (футер, границы и непрерывность слотов);
//! - записи считаются только на чистых страницах.
//!
//! Ничего не чинит: формат не хранит избыточности, восстанавливать не из чего.

use log::warn;
use serde::Serialize;
use std::io::{Read, Seek, SeekFrom};

use crate::consts::PAGE_SIZE;
use crate::error::Result;
use crate::metrics::record_page_read;
use crate::page::{check_page, footer_read, page_init, PageIssue};

use super::core::{Access, HeapFile};

#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    pub page: u64,
    pub issues: Vec<PageIssue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub path: String,
    pub file_len: u64,
    pub pages: u64,
    pub trailing_bytes: u64,
    pub ok_pages: u64,
    pub records: u64,
    pub bad_pages: Vec<PageReport>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.trailing_bytes == 0 && self.bad_pages.is_empty()
    }
}

impl HeapFile {
    /// Проверить все страницы файла.
    pub fn check(&self) -> Result<CheckReport> {
        let mut g = self.open(Access::Read)?;
        let file_len = g.file().metadata()?.len();
        let pages = file_len / PAGE_SIZE as u64;
        let trailing_bytes = file_len % PAGE_SIZE as u64;
        if trailing_bytes != 0 {
            warn!(
                "check: {} has {} trailing bytes after {} whole pages",
                self.path.display(),
                trailing_bytes,
                pages
            );
        }

        let mut report = CheckReport {
            path: self.path.display().to_string(),
            file_len,
            pages,
            trailing_bytes,
            ok_pages: 0,
            records: 0,
            bad_pages: Vec::new(),
        };

        let file = g.file_mut();
        let mut buf = page_init();
        for page_no in 0..pages {
            file.seek(SeekFrom::Start(page_no * PAGE_SIZE as u64))?;
            file.read_exact(&mut buf[..])?;
            record_page_read();

            let issues = check_page(&buf);
            if issues.is_empty() {
                report.ok_pages += 1;
                report.records += footer_read(&buf).slot_count as u64;
            } else {
                warn!("check: page {} has {} issue(s): {:?}", page_no, issues.len(), issues);
                report.bad_pages.push(PageReport { page: page_no, issues });
            }
        }
        Ok(report)
    }
}
