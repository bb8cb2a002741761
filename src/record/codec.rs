//! record/codec — кодирование строки таблицы в сырые байты записи и обратно.
//!
//! Поля пишутся подряд в порядке схемы, без заголовка записи:
//! - int        → i32 BE (4 байта)
//! - float      → f32 BE (4 байта)
//! - char(N)    → ровно N байт UTF-8; короче — добивается нулями, длиннее — обрезается
//!                по границе символа
//! - varchar(N) → [len u8][bytes], len <= N
//!
//! Heap-слой о формате ничего не знает: он видит только Vec<u8>.

use anyhow::{anyhow, Context, Result};
use byteorder::{BigEndian, ByteOrder};

use super::schema::{FieldType, Schema, TableDef};
use super::value::{Row, Value};

fn to_int(v: &Value) -> Result<i32> {
    match v {
        Value::Int(i) => Ok(*i),
        Value::Float(f) => {
            let t = f.trunc();
            if t.is_finite() && t >= i32::MIN as f32 && t <= i32::MAX as f32 {
                Ok(t as i32)
            } else {
                Err(anyhow!("float {} does not fit int", f))
            }
        }
        Value::Text(s) => s
            .trim()
            .parse::<i32>()
            .map_err(|e| anyhow!("'{}' is not an int: {}", s, e)),
    }
}

fn to_float(v: &Value) -> Result<f32> {
    match v {
        Value::Int(i) => Ok(*i as f32),
        Value::Float(f) => Ok(*f),
        Value::Text(s) => s
            .trim()
            .parse::<f32>()
            .map_err(|e| anyhow!("'{}' is not a float: {}", s, e)),
    }
}

/// Самый длинный префикс `s` не длиннее `max` байт, не разрывающий символ.
fn utf8_prefix(s: &str, max: usize) -> &[u8] {
    if s.len() <= max {
        return s.as_bytes();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s.as_bytes()[..end]
}

fn encode_field(out: &mut Vec<u8>, ty: FieldType, v: &Value) -> Result<()> {
    match ty {
        FieldType::Int => {
            let mut b = [0u8; 4];
            BigEndian::write_i32(&mut b, to_int(v)?);
            out.extend_from_slice(&b);
        }
        FieldType::Float => {
            let mut b = [0u8; 4];
            BigEndian::write_f32(&mut b, to_float(v)?);
            out.extend_from_slice(&b);
        }
        FieldType::Char(n) => {
            let text = v.render();
            let bytes = utf8_prefix(&text, n);
            out.extend_from_slice(bytes);
            out.resize(out.len() + (n - bytes.len()), 0);
        }
        FieldType::Varchar(n) => {
            let text = v.render();
            if text.len() > n {
                return Err(anyhow!("value of {} bytes exceeds varchar({})", text.len(), n));
            }
            out.push(text.len() as u8);
            out.extend_from_slice(text.as_bytes());
        }
    }
    Ok(())
}

/// Закодировать строку по определению таблицы. Лишние поля строки игнорируются.
pub fn encode_row(table: &TableDef, row: &Row) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for f in &table.fields {
        let v = row
            .get(&f.name)
            .ok_or_else(|| anyhow!("missing field {} for table {}", f.name, table.table_name))?;
        encode_field(&mut out, f.ty, v)
            .with_context(|| format!("encode {}.{} ({})", table.table_name, f.name, f.ty))?;
    }
    Ok(out)
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos + n;
        if end > self.buf.len() {
            return Err(anyhow!(
                "record truncated: need {} bytes at offset {}, have {}",
                n,
                self.pos,
                self.buf.len() - self.pos
            ));
        }
        let s = &self.buf[self.pos..end];
        self.pos = end;
        Ok(s)
    }
}

fn decode_text(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec()).map_err(|e| anyhow!("invalid utf-8 in text field: {}", e))
}

fn decode_field(r: &mut Reader<'_>, ty: FieldType) -> Result<Value> {
    Ok(match ty {
        FieldType::Int => Value::Int(BigEndian::read_i32(r.take(4)?)),
        FieldType::Float => Value::Float(BigEndian::read_f32(r.take(4)?)),
        FieldType::Char(n) => {
            let raw = r.take(n)?;
            let end = raw.iter().rposition(|&b| b != 0).map_or(0, |p| p + 1);
            Value::Text(decode_text(&raw[..end])?)
        }
        FieldType::Varchar(_) => {
            let len = r.take(1)?[0] as usize;
            Value::Text(decode_text(r.take(len)?)?)
        }
    })
}

/// Декодировать сырые байты записи в строку таблицы.
pub fn decode_row(table: &TableDef, bytes: &[u8]) -> Result<Row> {
    let mut r = Reader { buf: bytes, pos: 0 };
    let mut row = Row::new();
    for f in &table.fields {
        let v = decode_field(&mut r, f.ty)
            .with_context(|| format!("decode {}.{} ({})", table.table_name, f.name, f.ty))?;
        row.set(f.name.clone(), v);
    }
    if r.pos != bytes.len() {
        return Err(anyhow!(
            "record for table {} has {} trailing bytes",
            table.table_name,
            bytes.len() - r.pos
        ));
    }
    Ok(row)
}

/// encode_row по имени таблицы.
pub fn encode_record(schema: &Schema, table_name: &str, row: &Row) -> Result<Vec<u8>> {
    encode_row(schema.table(table_name)?, row)
}

/// decode_row по имени таблицы.
pub fn decode_record(schema: &Schema, table_name: &str, bytes: &[u8]) -> Result<Row> {
    decode_row(schema.table(table_name)?, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema::from_json(
            r#"[
              {"table_name": "Employee", "file_name": "employee.bin",
               "fields": [{"name": "id", "type": "int"},
                          {"name": "name", "type": "char(8)"},
                          {"name": "salary", "type": "float"}]},
              {"table_name": "Dept", "file_name": "dept.bin",
               "fields": [{"name": "id", "type": "int"},
                          {"name": "Location", "type": "varchar(10)"}]}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn employee_layout_is_fixed_width() {
        let s = schema();
        let row = Row::new().with("id", 1).with("name", "Alice").with("salary", 5000.0f32);
        let bytes = encode_record(&s, "Employee", &row).unwrap();
        assert_eq!(bytes.len(), 4 + 8 + 4);
        assert_eq!(&bytes[0..4], &[0, 0, 0, 1]);
        assert_eq!(&bytes[4..12], b"Alice\0\0\0");
        assert_eq!(&bytes[12..16], &5000.0f32.to_be_bytes());

        let back = decode_record(&s, "Employee", &bytes).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn varchar_has_length_prefix() {
        let s = schema();
        let row = Row::new().with("id", 7).with("Location", "Oslo");
        let bytes = encode_record(&s, "Dept", &row).unwrap();
        assert_eq!(&bytes[4..], b"\x04Oslo");
        assert_eq!(decode_record(&s, "Dept", &bytes).unwrap(), row);

        let long = Row::new().with("id", 7).with("Location", "Reykjavik-North");
        assert!(encode_record(&s, "Dept", &long).is_err());
    }

    #[test]
    fn char_truncates_on_char_boundary() {
        let s = schema();
        // "ÅÅÅÅÅ" = 10 байт; в char(8) влезает 4 символа
        let row = Row::new().with("id", 1).with("name", "ÅÅÅÅÅ").with("salary", 1.5f32);
        let bytes = encode_record(&s, "Employee", &row).unwrap();
        let back = decode_record(&s, "Employee", &bytes).unwrap();
        assert_eq!(back.get("name"), Some(&Value::Text("ÅÅÅÅ".into())));
    }

    #[test]
    fn coerces_numeric_inputs() {
        let s = schema();
        let row = Row::new().with("id", "42").with("name", 12).with("salary", 3);
        let back = decode_record(&s, "Employee", &encode_record(&s, "Employee", &row).unwrap())
            .unwrap();
        assert_eq!(back.get("id"), Some(&Value::Int(42)));
        assert_eq!(back.get("name"), Some(&Value::Text("12".into())));
        assert_eq!(back.get("salary"), Some(&Value::Float(3.0)));
    }

    #[test]
    fn errors_name_the_problem() {
        let s = schema();
        let err = encode_record(&s, "Employee", &Row::new().with("id", 1)).unwrap_err();
        assert!(err.to_string().contains("missing field name"), "{}", err);

        let err = encode_record(&s, "Nope", &Row::new()).unwrap_err();
        assert!(err.to_string().contains("Nope"));

        let err = decode_record(&s, "Employee", &[0, 0, 0, 1, b'A']).unwrap_err();
        assert!(format!("{:#}", err).contains("truncated"), "{:#}", err);

        let err = decode_record(&s, "Dept", b"\0\0\0\x01\x01Xjunk").unwrap_err();
        assert!(err.to_string().contains("trailing"));
    }
}
