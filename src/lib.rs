// Ядро: формат страницы + heap-файл
pub mod consts;
pub mod error;
pub mod page;   // src/page/{mod,common,slotted,check}.rs
pub mod heap;   // src/heap/{mod,core,io,insert,scan,doctor}.rs

// Окружение ядра
pub mod config;
pub mod lock;
pub mod metrics;

// Слои над heap: схема/кодек записей, таблицы, запросы
pub mod record; // src/record/{mod,schema,value,codec}.rs
pub mod table;
pub mod query;  // src/query/{mod,parse,exec}.rs

// CLI (используется бинарём heapdb)
pub mod cli;

// Удобные реэкспорты
pub use config::HeapConfig;
pub use error::HeapError;
pub use heap::{
    append_page, create, insert_record, page_count, read_page, read_record, scan_all_records,
    write_page, HeapFile,
};
pub use page::{PageBuf, RecordId, SlotId};
