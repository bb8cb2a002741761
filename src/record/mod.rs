//! record — схема таблиц и кодек "строка таблицы <-> сырые байты записи".
//!
//! Слой над heap: heap хранит непрозрачные байты, здесь им придаётся структура.

pub mod schema;
pub mod value;
pub mod codec;

pub use codec::{decode_record, decode_row, encode_record, encode_row};
pub use schema::{FieldDef, FieldType, Schema, TableDef, VARCHAR_MAX};
pub use value::{Row, Value};
