//! record/schema — описание таблиц (JSON) и типы полей.
//!
//! Формат файла схемы — массив таблиц:
//! [
//!   {"table_name": "Employee", "file_name": "employee.bin",
//!    "fields": [{"name": "id", "type": "int"}, {"name": "name", "type": "char(20)"}]}
//! ]
//!
//! Типы полей: int, float, char(N), varchar(N) (N <= 255: длина varchar хранится в u8).

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Максимальная длина varchar: префикс длины — один байт.
pub const VARCHAR_MAX: usize = u8::MAX as usize;

/// Закрытое множество типов полей.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldType {
    /// i32 big-endian, 4 байта.
    Int,
    /// f32 big-endian, 4 байта.
    Float,
    /// Ровно N байт UTF-8, добитых нулями.
    Char(usize),
    /// [len u8][bytes], len <= N.
    Varchar(usize),
}

fn parse_len(s: &str, prefix: &str) -> Option<Result<usize>> {
    let inner = s.strip_prefix(prefix)?.trim_start().strip_prefix('(')?.strip_suffix(')')?;
    Some(
        inner
            .trim()
            .parse::<usize>()
            .map_err(|e| anyhow!("bad length in field type '{}': {}", s, e)),
    )
}

impl std::str::FromStr for FieldType {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        let s = raw.trim().to_ascii_lowercase();
        match s.as_str() {
            "int" => return Ok(FieldType::Int),
            "float" => return Ok(FieldType::Float),
            _ => {}
        }
        if let Some(n) = parse_len(&s, "varchar") {
            let n = n?;
            if n > VARCHAR_MAX {
                return Err(anyhow!("varchar({}) exceeds maximum length {}", n, VARCHAR_MAX));
            }
            return Ok(FieldType::Varchar(n));
        }
        if let Some(n) = parse_len(&s, "char") {
            return Ok(FieldType::Char(n?));
        }
        Err(anyhow!("unknown field type '{}'", raw))
    }
}

impl TryFrom<String> for FieldType {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<FieldType> for String {
    fn from(t: FieldType) -> Self {
        t.to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Int => write!(f, "int"),
            FieldType::Float => write!(f, "float"),
            FieldType::Char(n) => write!(f, "char({})", n),
            FieldType::Varchar(n) => write!(f, "varchar({})", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: FieldType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDef {
    pub table_name: String,
    pub file_name: PathBuf,
    pub fields: Vec<FieldDef>,
}

impl TableDef {
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    pub tables: Vec<TableDef>,
}

impl Schema {
    /// Разобрать схему из JSON. Пути file_name остаются как есть.
    pub fn from_json(json: &str) -> Result<Self> {
        let schema: Schema = serde_json::from_str(json).context("parse schema json")?;
        schema.validate()?;
        Ok(schema)
    }

    /// Прочитать схему из файла. Относительные file_name считаются от каталога файла схемы.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read schema {}", path.display()))?;
        let mut schema = Self::from_json(&raw)
            .with_context(|| format!("load schema {}", path.display()))?;
        if let Some(dir) = path.parent() {
            schema.rebase(dir);
        }
        Ok(schema)
    }

    /// Сделать относительные file_name относительными к `dir`.
    pub fn rebase(&mut self, dir: &Path) {
        for t in &mut self.tables {
            if t.file_name.is_relative() {
                t.file_name = dir.join(&t.file_name);
            }
        }
    }

    pub fn table(&self, name: &str) -> Result<&TableDef> {
        self.tables
            .iter()
            .find(|t| t.table_name == name)
            .ok_or_else(|| anyhow!("table {} not found in schema", name))
    }

    fn validate(&self) -> Result<()> {
        for (i, t) in self.tables.iter().enumerate() {
            if self.tables[..i].iter().any(|o| o.table_name == t.table_name) {
                return Err(anyhow!("duplicate table {} in schema", t.table_name));
            }
            for (j, f) in t.fields.iter().enumerate() {
                if t.fields[..j].iter().any(|o| o.name == f.name) {
                    return Err(anyhow!("duplicate field {} in table {}", f.name, t.table_name));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"[
      {"table_name": "Employee", "file_name": "employee.bin",
       "fields": [{"name": "id", "type": "int"},
                  {"name": "name", "type": "char(20)"},
                  {"name": "salary", "type": "float"}]},
      {"table_name": "Dept", "file_name": "dept.bin",
       "fields": [{"name": "id", "type": "int"},
                  {"name": "Location", "type": "VARCHAR( 40 )"}]}
    ]"#;

    #[test]
    fn parses_schema_and_types() {
        let s = Schema::from_json(SCHEMA).unwrap();
        let emp = s.table("Employee").unwrap();
        assert_eq!(emp.file_name, PathBuf::from("employee.bin"));
        assert_eq!(emp.field("name").unwrap().ty, FieldType::Char(20));
        assert_eq!(emp.field_names(), vec!["id", "name", "salary"]);
        let dept = s.table("Dept").unwrap();
        assert_eq!(dept.field("Location").unwrap().ty, FieldType::Varchar(40));
        assert!(s.table("Nope").is_err());
    }

    #[test]
    fn field_type_text_forms() {
        assert_eq!("int".parse::<FieldType>().unwrap(), FieldType::Int);
        assert_eq!(" Float ".parse::<FieldType>().unwrap(), FieldType::Float);
        assert_eq!("char(3)".parse::<FieldType>().unwrap(), FieldType::Char(3));
        assert_eq!(FieldType::Varchar(9).to_string(), "varchar(9)");
        assert!("varchar(256)".parse::<FieldType>().is_err());
        assert!("char(x)".parse::<FieldType>().is_err());
        assert!("text".parse::<FieldType>().is_err());
    }

    #[test]
    fn rejects_duplicate_fields() {
        let bad = r#"[{"table_name": "T", "file_name": "t.bin",
                       "fields": [{"name": "a", "type": "int"}, {"name": "a", "type": "int"}]}]"#;
        assert!(Schema::from_json(bad).is_err());
    }

    #[test]
    fn rebase_only_touches_relative_paths() {
        let mut s = Schema::from_json(SCHEMA).unwrap();
        s.tables[1].file_name = PathBuf::from("/abs/dept.bin");
        s.rebase(Path::new("/data"));
        assert_eq!(s.tables[0].file_name, PathBuf::from("/data/employee.bin"));
        assert_eq!(s.tables[1].file_name, PathBuf::from("/abs/dept.bin"));
    }
}
