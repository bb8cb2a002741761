//! query/exec — выполнение разобранного запроса через table-слой.

use anyhow::Result;
use log::debug;
use serde::Serialize;

use crate::config::HeapConfig;
use crate::page::RecordId;
use crate::record::{Row, Schema};
use crate::table::{insert_row, read_rows};

use super::parse::{parse, InsertQuery, Projection, Query, SelectQuery};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryOutput {
    Rows { rows: Vec<Row> },
    Inserted { page: u64, slot: u16 },
}

impl QueryOutput {
    pub fn rows(&self) -> Option<&[Row]> {
        match self {
            QueryOutput::Rows { rows } => Some(rows),
            QueryOutput::Inserted { .. } => None,
        }
    }
}

fn exec_select(schema: &Schema, q: &SelectQuery, cfg: &HeapConfig) -> Result<Vec<Row>> {
    let table = schema.table(&q.table)?;
    let fields = match &q.projection {
        Projection::All => table.field_names(),
        Projection::Fields(f) => f.clone(),
    };

    let rows = read_rows(schema, &q.table, cfg)?;
    let total = rows.len();
    let out: Vec<Row> = rows
        .into_iter()
        .filter(|r| match &q.condition {
            Some(c) => r.get(&c.field).map_or(false, |v| v.loose_eq(&c.value)),
            None => true,
        })
        .map(|r| r.project(&fields))
        .collect();
    debug!("select {}: {} of {} rows matched", q.table, out.len(), total);
    Ok(out)
}

fn exec_insert(schema: &Schema, q: &InsertQuery, cfg: &HeapConfig) -> Result<RecordId> {
    let row: Row = q.fields.iter().cloned().zip(q.values.iter().cloned()).collect();
    insert_row(schema, &q.table, &row, cfg)
}

/// Выполнить уже разобранный запрос.
pub fn execute_parsed(query: &Query, schema: &Schema, cfg: &HeapConfig) -> Result<QueryOutput> {
    match query {
        Query::Select(q) => Ok(QueryOutput::Rows { rows: exec_select(schema, q, cfg)? }),
        Query::Insert(q) => {
            let rid = exec_insert(schema, q, cfg)?;
            Ok(QueryOutput::Inserted { page: rid.page, slot: rid.slot })
        }
    }
}

/// Разобрать и выполнить запрос.
pub fn execute(query: &str, schema: &Schema, cfg: &HeapConfig) -> Result<QueryOutput> {
    execute_parsed(&parse(query)?, schema, cfg)
}
