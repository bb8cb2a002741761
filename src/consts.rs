//! Общие константы формата heap-файла (страница, футер, слот-директория).
//!
//! Формат страницы (4096 байт, big-endian):
//! [record area -->     free     <-- slot dir][slot_count u16][free_space_offset u16]
//!
//! Заголовка файла нет: файл — это просто конкатенация страниц.

// -------- Page --------
pub const PAGE_SIZE: usize = 4096;

// -------- Footer (последние 4 байта страницы) --------
pub const FOOTER_LEN: usize = 4;
/// slot_count (u16 BE): [4092, 4094)
pub const OFF_SLOT_COUNT: usize = PAGE_SIZE - FOOTER_LEN;
/// free_space_offset (u16 BE): [4094, 4096)
pub const OFF_FREE_SPACE: usize = PAGE_SIZE - 2;

// -------- Slot directory --------
// Слот i лежит по адресу SLOT_DIR_END - SLOT_SIZE*(i+1): [record_offset u16][record_length u16].
pub const SLOT_SIZE: usize = 4;
pub const SLOT_DIR_END: usize = OFF_SLOT_COUNT;

/// Максимальная запись, которую принимает пустая страница:
/// 4096 - (0 + 1*4 + 4) = 4088.
pub const MAX_RECORD_LEN: usize = PAGE_SIZE - FOOTER_LEN - SLOT_SIZE;

// -------- Config env --------
pub const ENV_DATA_FSYNC: &str = "HEAPDB_DATA_FSYNC";
pub const ENV_FILE_LOCK: &str = "HEAPDB_FILE_LOCK";
