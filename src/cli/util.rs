//! cli/util — значение записи из аргумента командной строки и его печать.
//!
//! Формы аргумента --value:
//!   -          stdin
//!   @path      содержимое файла
//!   hex:4142   байты в hex (регистр не важен, пробелы между байтами допустимы)
//!   иначе      UTF-8 байты строки
//!
//! Длина проверяется до чтения, насколько это возможно: для файла по metadata,
//! для stdin читается не больше MAX_RECORD_LEN + 1 байт.

use anyhow::{anyhow, Context, Result};
use std::fmt::Write as _;
use std::io::Read;
use std::path::PathBuf;

use crate::consts::MAX_RECORD_LEN;
use crate::error::HeapError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSource {
    Stdin,
    File(PathBuf),
    Hex(String),
    Literal(String),
}

impl RecordSource {
    pub fn parse(arg: &str) -> Self {
        if arg == "-" {
            RecordSource::Stdin
        } else if let Some(p) = arg.strip_prefix('@') {
            RecordSource::File(PathBuf::from(p))
        } else if let Some(hx) = arg.strip_prefix("hex:") {
            RecordSource::Hex(hx.to_string())
        } else {
            RecordSource::Literal(arg.to_string())
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecordSource::Stdin => "stdin",
            RecordSource::File(_) => "file",
            RecordSource::Hex(_) => "hex",
            RecordSource::Literal(_) => "literal",
        }
    }

    /// Байты записи. Слишком длинное значение — HeapError::RecordTooLarge.
    pub fn load(&self) -> Result<Vec<u8>> {
        let bytes = match self {
            RecordSource::Stdin => read_capped(std::io::stdin().lock())?,
            RecordSource::File(p) => {
                let len = std::fs::metadata(p)
                    .with_context(|| format!("stat value file {}", p.display()))?
                    .len();
                ensure_fits(usize::try_from(len).unwrap_or(usize::MAX))?;
                let f = std::fs::File::open(p)
                    .with_context(|| format!("open value file {}", p.display()))?;
                read_capped(f)?
            }
            RecordSource::Hex(hx) => {
                let digits: String = hx.chars().filter(|c| !c.is_whitespace()).collect();
                ensure_fits(digits.len() / 2)?;
                parse_hex(&digits)?
            }
            RecordSource::Literal(s) => s.as_bytes().to_vec(),
        };
        ensure_fits(bytes.len())?;
        Ok(bytes)
    }
}

fn ensure_fits(len: usize) -> Result<()> {
    if len > MAX_RECORD_LEN {
        return Err(HeapError::RecordTooLarge { len, max: MAX_RECORD_LEN }.into());
    }
    Ok(())
}

/// Прочитать не больше MAX_RECORD_LEN + 1 байт: этого хватает, чтобы отличить
/// допустимую запись от слишком длинной.
fn read_capped<R: Read>(r: R) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    r.take(MAX_RECORD_LEN as u64 + 1).read_to_end(&mut buf)?;
    Ok(buf)
}

fn parse_hex(digits: &str) -> Result<Vec<u8>> {
    if !digits.is_ascii() || digits.len() % 2 != 0 {
        return Err(anyhow!("hex value must be an even number of ASCII hex digits"));
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| anyhow!("invalid hex byte '{}' at {}", &digits[i..i + 2], i))
        })
        .collect()
}

/// Запись в той же нотации, что принимает --value: UTF-8 как есть, иначе hex:...
pub fn render_record(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) if !s.chars().any(|c| c.is_control()) => s.to_string(),
        _ => format!("hex:{}", hex_string(bytes)),
    }
}

pub fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        let _ = write!(s, "{:02x}", b);
        s
    })
}
