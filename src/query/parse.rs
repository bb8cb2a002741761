//! query/parse — разбор двух форм запросов:
//!
//!   SELECT <field, ... | *> FROM <table> [WHERE <field> = <literal>]
//!   INSERT INTO <table> (<field>, ...) VALUES (<literal>, ...)
//!
//! Ключевые слова без учёта регистра. Литералы:
//! - 'text'           → Text (кавычка внутри — удвоенная '')
//! - только цифры     → Int
//! - парсится как f32 → Float (в т.ч. -3, 7000.0, 1e3)
//! - иначе            → Text как есть

use anyhow::{anyhow, Result};

use crate::record::Value;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Quoted(String),
    Comma,
    LParen,
    RParen,
    Eq,
    Star,
}

fn tokenize(q: &str) -> Result<Vec<Token>> {
    let mut out = Vec::new();
    let mut chars = q.char_indices().peekable();
    while let Some(&(i, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            ',' => {
                chars.next();
                out.push(Token::Comma);
            }
            '(' => {
                chars.next();
                out.push(Token::LParen);
            }
            ')' => {
                chars.next();
                out.push(Token::RParen);
            }
            '=' => {
                chars.next();
                out.push(Token::Eq);
            }
            '*' => {
                chars.next();
                out.push(Token::Star);
            }
            '\'' => {
                chars.next();
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some((_, '\'')) => {
                            if matches!(chars.peek(), Some((_, '\''))) {
                                chars.next();
                                s.push('\'');
                            } else {
                                break;
                            }
                        }
                        Some((_, ch)) => s.push(ch),
                        None => return Err(anyhow!("unterminated string literal at {}", i)),
                    }
                }
                out.push(Token::Quoted(s));
            }
            _ => {
                let mut s = String::new();
                while let Some(&(_, ch)) = chars.peek() {
                    if ch.is_whitespace() || matches!(ch, ',' | '(' | ')' | '=' | '*' | '\'') {
                        break;
                    }
                    s.push(ch);
                    chars.next();
                }
                out.push(Token::Word(s));
            }
        }
    }
    Ok(out)
}

/// Литерал запроса → значение.
pub fn parse_literal(raw: &str) -> Value {
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(v) = raw.parse::<i32>() {
            return Value::Int(v);
        }
    }
    match raw.parse::<f32>() {
        Ok(v) => Value::Float(v),
        Err(_) => Value::Text(raw.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    All,
    Fields(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub projection: Projection,
    pub table: String,
    pub condition: Option<Condition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertQuery {
    pub table: String,
    pub fields: Vec<String>,
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Select(SelectQuery),
    Insert(InsertQuery),
}

struct Parser {
    toks: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.toks.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let t = self.toks.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn is_keyword(&self, kw: &str) -> bool {
        matches!(self.peek(), Some(Token::Word(w)) if w.eq_ignore_ascii_case(kw))
    }

    fn keyword(&mut self, kw: &str) -> Result<()> {
        if self.is_keyword(kw) {
            self.pos += 1;
            Ok(())
        } else {
            Err(anyhow!("expected {}, got {}", kw, self.describe_next()))
        }
    }

    fn expect(&mut self, want: Token) -> Result<()> {
        match self.next() {
            Some(t) if t == want => Ok(()),
            other => Err(anyhow!("expected {:?}, got {:?}", want, other)),
        }
    }

    fn ident(&mut self) -> Result<String> {
        match self.next() {
            Some(Token::Word(w)) if w.chars().all(|c| c.is_alphanumeric() || c == '_') => Ok(w),
            other => Err(anyhow!("expected identifier, got {:?}", other)),
        }
    }

    fn literal(&mut self) -> Result<Value> {
        match self.next() {
            Some(Token::Quoted(s)) => Ok(Value::Text(s)),
            Some(Token::Word(w)) => Ok(parse_literal(&w)),
            other => Err(anyhow!("expected literal, got {:?}", other)),
        }
    }

    /// a, b, c — до токена, на котором список кончается.
    fn list<T>(&mut self, mut item: impl FnMut(&mut Self) -> Result<T>) -> Result<Vec<T>> {
        let mut out = vec![item(self)?];
        while self.peek() == Some(&Token::Comma) {
            self.pos += 1;
            out.push(item(self)?);
        }
        Ok(out)
    }

    fn end(&self) -> Result<()> {
        match self.peek() {
            None => Ok(()),
            Some(_) => Err(anyhow!("unexpected trailing input: {}", self.describe_next())),
        }
    }

    fn describe_next(&self) -> String {
        match self.peek() {
            Some(t) => format!("{:?}", t),
            None => "end of query".to_string(),
        }
    }

    fn select(&mut self) -> Result<SelectQuery> {
        self.keyword("SELECT")?;
        let projection = if self.peek() == Some(&Token::Star) {
            self.pos += 1;
            Projection::All
        } else {
            Projection::Fields(self.list(Self::ident)?)
        };
        self.keyword("FROM")?;
        let table = self.ident()?;
        let condition = if self.is_keyword("WHERE") {
            self.pos += 1;
            let field = self.ident()?;
            self.expect(Token::Eq)?;
            let value = self.literal()?;
            Some(Condition { field, value })
        } else {
            None
        };
        self.end()?;
        Ok(SelectQuery { projection, table, condition })
    }

    fn insert(&mut self) -> Result<InsertQuery> {
        self.keyword("INSERT")?;
        self.keyword("INTO")?;
        let table = self.ident()?;
        self.expect(Token::LParen)?;
        let fields = self.list(Self::ident)?;
        self.expect(Token::RParen)?;
        self.keyword("VALUES")?;
        self.expect(Token::LParen)?;
        let values = self.list(Self::literal)?;
        self.expect(Token::RParen)?;
        self.end()?;
        if fields.len() != values.len() {
            return Err(anyhow!(
                "INSERT lists {} fields but {} values",
                fields.len(),
                values.len()
            ));
        }
        Ok(InsertQuery { table, fields, values })
    }
}

/// Разобрать запрос (SELECT или INSERT).
pub fn parse(query: &str) -> Result<Query> {
    let mut p = Parser { toks: tokenize(query.trim())?, pos: 0 };
    if p.is_keyword("SELECT") {
        Ok(Query::Select(p.select().map_err(|e| anyhow!("invalid SELECT query: {}", e))?))
    } else if p.is_keyword("INSERT") {
        Ok(Query::Insert(p.insert().map_err(|e| anyhow!("invalid INSERT query: {}", e))?))
    } else {
        Err(anyhow!("unsupported query type"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_star() {
        let q = parse("SELECT * FROM Employee").unwrap();
        assert_eq!(
            q,
            Query::Select(SelectQuery {
                projection: Projection::All,
                table: "Employee".into(),
                condition: None,
            })
        );
    }

    #[test]
    fn select_fields_with_condition() {
        let q = parse("select name, salary from Employee where id = 2").unwrap();
        let Query::Select(s) = q else { panic!("expected select") };
        assert_eq!(s.projection, Projection::Fields(vec!["name".into(), "salary".into()]));
        assert_eq!(s.condition, Some(Condition { field: "id".into(), value: Value::Int(2) }));

        let Query::Select(s) = parse("SELECT id FROM Employee WHERE name='O''Brien'").unwrap()
        else {
            panic!("expected select")
        };
        assert_eq!(s.condition.unwrap().value, Value::Text("O'Brien".into()));
    }

    #[test]
    fn insert_with_mixed_literals() {
        let q = parse("INSERT INTO Employee (id, name, salary) VALUES (3, 'Charlie, Jr', 7000.0)")
            .unwrap();
        assert_eq!(
            q,
            Query::Insert(InsertQuery {
                table: "Employee".into(),
                fields: vec!["id".into(), "name".into(), "salary".into()],
                values: vec![Value::Int(3), Value::Text("Charlie, Jr".into()), Value::Float(7000.0)],
            })
        );
    }

    #[test]
    fn literal_classification() {
        assert_eq!(parse_literal("42"), Value::Int(42));
        assert_eq!(parse_literal("-3"), Value::Float(-3.0));
        assert_eq!(parse_literal("1e3"), Value::Float(1000.0));
        assert_eq!(parse_literal("Bob"), Value::Text("Bob".into()));
    }

    #[test]
    fn rejects_malformed() {
        assert!(parse("DELETE FROM Employee").is_err());
        assert!(parse("SELECT FROM Employee").is_err());
        assert!(parse("SELECT id FROM").is_err());
        assert!(parse("SELECT id FROM Employee WHERE id = 1 extra").is_err());
        assert!(parse("INSERT INTO T (a, b) VALUES (1)").is_err());
        assert!(parse("INSERT INTO T (a) VALUES ('open").is_err());
    }
}
