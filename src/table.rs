//! table — строки таблиц поверх heap-файлов.
//!
//! Каждая таблица схемы живёт в своём heap-файле (TableDef::file_name).
//! Файл создаётся при первой вставке; чтение отсутствующего файла даёт пустую таблицу.

use anyhow::{Context, Result};
use log::debug;

use crate::config::HeapConfig;
use crate::error::HeapError;
use crate::heap::HeapFile;
use crate::page::RecordId;
use crate::record::{decode_row, encode_row, Row, Schema, TableDef};

fn heap_for(table: &TableDef, cfg: &HeapConfig) -> HeapFile {
    HeapFile::with_config(&table.file_name, cfg.clone())
}

/// Закодировать и вставить строку. Возвращает RecordId вставленной записи.
pub fn insert_row(schema: &Schema, table_name: &str, row: &Row, cfg: &HeapConfig) -> Result<RecordId> {
    let table = schema.table(table_name)?;
    let bytes = encode_row(table, row)?;
    let hf = heap_for(table, cfg);
    if !hf.exists() {
        match HeapFile::create(hf.path(), cfg.clone()) {
            Ok(_) | Err(HeapError::AlreadyExists(_)) => {}
            Err(e) => {
                return Err(e).with_context(|| format!("create table file {}", hf.path().display()))
            }
        }
    }

    let rid = hf
        .insert_record(&bytes)
        .with_context(|| format!("insert into {}", table.table_name))?;
    debug!("insert_row: {} -> {:?}", table.table_name, rid);
    Ok(rid)
}

/// Все строки таблицы в порядке скана heap-файла.
pub fn read_rows(schema: &Schema, table_name: &str, cfg: &HeapConfig) -> Result<Vec<Row>> {
    let table = schema.table(table_name)?;
    let hf = heap_for(table, cfg);
    if !hf.exists() {
        return Ok(Vec::new());
    }
    let raw = hf
        .scan_all_records()
        .with_context(|| format!("scan {}", hf.path().display()))?;
    raw.iter().map(|r| decode_row(table, r)).collect()
}
