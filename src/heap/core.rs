//! heap/core — структура HeapFile, create() и открытие файла под блокировкой.
//!
//! HeapFile не держит открытый дескриптор между вызовами: каждая операция
//! открывает файл, берёт блокировку (если включена), делает своё и закрывает.

use log::info;
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::HeapConfig;
use crate::error::{HeapError, Result};
use crate::lock::{acquire_lock, LockGuard, LockMode};

/// Режим открытия файла на время одного вызова.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Access {
    /// read_page / read_record / scan — shared lock.
    Read,
    /// write_page — файл должен существовать, exclusive lock.
    Write,
    /// append_page / insert_record — файл создаётся при отсутствии, exclusive lock.
    Append,
}

/// Heap-файл: путь + конфигурация доступа.
#[derive(Debug, Clone)]
pub struct HeapFile {
    pub(crate) path: PathBuf,
    pub(crate) cfg: HeapConfig,
}

impl HeapFile {
    /// Хэндл на (возможно ещё не существующий) файл с конфигурацией по умолчанию.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self::with_config(path, HeapConfig::default())
    }

    pub fn with_config<P: AsRef<Path>>(path: P, cfg: HeapConfig) -> Self {
        Self { path: path.as_ref().to_path_buf(), cfg }
    }

    /// Создать пустой файл (0 страниц). Существующий файл не трогается: AlreadyExists.
    pub fn create<P: AsRef<Path>>(path: P, cfg: HeapConfig) -> Result<Self> {
        let hf = Self::with_config(path, cfg);
        match OpenOptions::new().write(true).create_new(true).open(&hf.path) {
            Ok(f) => {
                if hf.cfg.data_fsync {
                    f.sync_all()?;
                }
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(HeapError::AlreadyExists(hf.path.clone()));
            }
            Err(e) => return Err(e.into()),
        }
        info!("created heap file {}", hf.path.display());
        Ok(hf)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &HeapConfig {
        &self.cfg
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Открыть файл в нужном режиме и взять блокировку (если cfg.file_lock).
    pub(crate) fn open(&self, access: Access) -> Result<LockGuard> {
        let mut opts = OpenOptions::new();
        opts.read(true);
        match access {
            Access::Read => {}
            Access::Write => {
                opts.write(true);
            }
            Access::Append => {
                opts.write(true).create(true);
            }
        }
        let file = opts.open(&self.path)?;

        if !self.cfg.file_lock {
            return Ok(LockGuard::unlocked(file, &self.path));
        }
        let mode = match access {
            Access::Read => LockMode::Shared,
            Access::Write | Access::Append => LockMode::Exclusive,
        };
        acquire_lock(file, &self.path, mode)
    }

    /// fsync данных после записи страницы (если cfg.data_fsync).
    pub(crate) fn sync(&self, guard: &LockGuard) -> Result<()> {
        if self.cfg.data_fsync {
            guard.file().sync_data()?;
        }
        Ok(())
    }
}
