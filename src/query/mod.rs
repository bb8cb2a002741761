//! query — минимальный текстовый слой запросов (SELECT / INSERT) над таблицами.
//!
//! Никаких инвариантов хранения здесь нет: parse → table::{insert_row, read_rows}.

pub mod parse;
pub mod exec;

pub use exec::{execute, execute_parsed, QueryOutput};
pub use parse::{parse, parse_literal, Condition, InsertQuery, Projection, Query, SelectQuery};
