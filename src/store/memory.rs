use super::{record_id, ContentStore, Record, RecordPage};
use crate::query::{Comparison, Field, ListQuery, OrderBy, PageRequest, Predicate, Relation, SortDirection};
use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Record>,
    next_id: i64,
}

impl Table {
    fn push(&mut self, mut record: Record) -> Record {
        let id = match record_id(&record) {
            Some(id) => id,
            None => self.next_id.max(1),
        };
        self.next_id = self.next_id.max(id + 1);
        record.insert("id".to_string(), Value::from(id));
        self.rows.push(record.clone());
        record
    }
}

/// In-process store evaluating `ListQuery` predicates over JSON rows.
///
/// Matching mirrors the SQL the Postgres store emits: case-insensitive LIKE
/// with `\` escapes, text-form equality, JSON containment and NULLS LAST
/// ordering.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a table; rows without an `id` get the next free one.
    pub fn with_records(mut self, table: &str, records: Vec<Value>) -> Self {
        let tables = self.tables.get_mut();
        let table = tables.entry(table.to_string()).or_default();
        for value in records {
            if let Value::Object(record) = value {
                table.push(record);
            }
        }
        self
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn fetch_page(&self, query: &ListQuery, page: PageRequest) -> Result<RecordPage> {
        let tables = self.tables.read().await;
        let mut matching: Vec<&Record> = tables
            .get(query.table)
            .map(|table| {
                table
                    .rows
                    .iter()
                    .filter(|row| query.predicates.iter().all(|p| matches(row, p)))
                    .collect()
            })
            .unwrap_or_default();

        matching.sort_by(|a, b| compare_rows(a, b, &query.order));

        let total = matching.len() as u64;
        let records = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page() as usize)
            .cloned()
            .collect();

        debug!("Memory store matched {} rows in {}", total, query.table);
        Ok(RecordPage { records, total })
    }

    async fn find(&self, table: &str, id: i64) -> Result<Option<Record>> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(table)
            .and_then(|t| t.rows.iter().find(|row| record_id(row) == Some(id)))
            .cloned())
    }

    async fn related(&self, relation: &Relation, parent_id: i64) -> Result<Vec<Record>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<&Record> = tables
            .get(relation.table)
            .map(|t| {
                t.rows
                    .iter()
                    .filter(|row| {
                        row.get(relation.foreign_key).and_then(text_form)
                            == Some(parent_id.to_string())
                    })
                    .collect()
            })
            .unwrap_or_default();

        let order = [
            OrderBy {
                column: relation.order_by,
                direction: SortDirection::Asc,
            },
            OrderBy {
                column: "id",
                direction: SortDirection::Asc,
            },
        ];
        rows.sort_by(|a, b| compare_rows(a, b, &order));
        Ok(rows.into_iter().cloned().collect())
    }

    async fn insert(&self, table: &str, mut record: Record) -> Result<Record> {
        record.remove("id");
        record
            .entry("created_at")
            .or_insert_with(|| Value::String(Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()));

        let mut tables = self.tables.write().await;
        Ok(tables.entry(table.to_string()).or_default().push(record))
    }

    async fn update(&self, table: &str, id: i64, patch: Record) -> Result<Option<Record>> {
        if patch.contains_key("id") {
            bail!("Refusing to change the id of {} #{}", table, id);
        }

        let mut tables = self.tables.write().await;
        let Some(row) = tables
            .get_mut(table)
            .and_then(|t| t.rows.iter_mut().find(|row| record_id(row) == Some(id)))
        else {
            return Ok(None);
        };

        for (key, value) in patch {
            row.insert(key, value);
        }
        Ok(Some(row.clone()))
    }

    async fn delete(&self, table: &str, id: i64) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let Some(t) = tables.get_mut(table) else {
            return Ok(false);
        };
        let before = t.rows.len();
        t.rows.retain(|row| record_id(row) != Some(id));
        Ok(t.rows.len() < before)
    }
}

fn field_value<'a>(row: &'a Record, field: &Field) -> Option<&'a Value> {
    let value = match field {
        Field::Column(column) => row.get(*column),
        Field::JsonKey { column, key } => row.get(*column)?.get(*key),
    };
    value.filter(|v| !v.is_null())
}

/// Text form of a value, as `::text` renders it.
fn text_form(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn matches(row: &Record, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::Like { field, pattern } => field_value(row, field)
            .and_then(text_form)
            .is_some_and(|text| like_match(&text, pattern)),
        Predicate::Equals { field, value } => {
            field_value(row, field).and_then(text_form).as_deref() == Some(value.as_str())
        }
        Predicate::Compare { field, op, value } => field_value(row, field)
            .and_then(text_form)
            .is_some_and(|text| {
                let ordering = text.as_str().cmp(value.as_str());
                match op {
                    Comparison::Gte => ordering != Ordering::Less,
                    Comparison::Lte => ordering != Ordering::Greater,
                    Comparison::Lt => ordering == Ordering::Less,
                }
            }),
        Predicate::JsonContains { field, value } => field_value(row, field)
            .is_some_and(|stored| json_contains(stored, value)),
        Predicate::Any(alternatives) => alternatives.iter().any(|p| matches(row, p)),
    }
}

/// Postgres `@>` semantics for the shapes the query layer produces.
fn json_contains(stored: &Value, wanted: &Value) -> bool {
    match (stored, wanted) {
        (Value::Array(items), Value::Array(wanted)) => wanted
            .iter()
            .all(|w| items.iter().any(|item| json_contains(item, w))),
        (Value::Object(map), Value::Object(wanted)) => wanted
            .iter()
            .all(|(k, w)| map.get(k).is_some_and(|v| json_contains(v, w))),
        (stored, wanted) => stored == wanted,
    }
}

#[derive(Debug, PartialEq)]
enum Token {
    AnyRun,
    AnyOne,
    Literal(char),
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(ch) = chars.next() {
        tokens.push(match ch {
            '\\' => Token::Literal(chars.next().unwrap_or('\\')),
            '%' => Token::AnyRun,
            '_' => Token::AnyOne,
            other => Token::Literal(other),
        });
    }
    tokens
}

/// Case-insensitive LIKE with `\` as the escape character.
fn like_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.to_lowercase().chars().collect();
    let tokens: Vec<Token> = tokenize(&pattern.to_lowercase());

    // dp[j]: tokens[..i] match text[..j]
    let mut dp = vec![false; text.len() + 1];
    dp[0] = true;
    for token in &tokens {
        let mut next = vec![false; text.len() + 1];
        match token {
            Token::AnyRun => {
                let mut reachable = false;
                for j in 0..=text.len() {
                    reachable |= dp[j];
                    next[j] = reachable;
                }
            }
            Token::AnyOne => {
                for j in 1..=text.len() {
                    next[j] = dp[j - 1];
                }
            }
            Token::Literal(ch) => {
                for j in 1..=text.len() {
                    next[j] = dp[j - 1] && text[j - 1] == *ch;
                }
            }
        }
        dp = next;
    }
    dp[text.len()]
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => text_form(a).cmp(&text_form(b)),
    }
}

fn compare_rows(a: &Record, b: &Record, order: &[OrderBy]) -> Ordering {
    for OrderBy { column, direction } in order {
        let left = a.get(*column).filter(|v| !v.is_null());
        let right = b.get(*column).filter(|v| !v.is_null());
        let ordering = match (left, right) {
            (None, None) => Ordering::Equal,
            // NULLS LAST in both directions
            (None, Some(_)) => return Ordering::Greater,
            (Some(_), None) => return Ordering::Less,
            (Some(x), Some(y)) => {
                let ordering = compare_values(x, y);
                match direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            }
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
