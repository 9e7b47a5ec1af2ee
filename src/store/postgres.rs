use super::{ContentStore, Record, RecordPage};
use crate::query::{Field, ListQuery, OrderBy, PageRequest, Predicate, Relation};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{Postgres, QueryBuilder, Row};
use tracing::{debug, info};

/// PostgreSQL-backed content store.
///
/// Rows are selected as `to_jsonb(t)`, so every table is read through the same
/// code path. Identifiers come from static resource descriptors; every value
/// that originates in a request is bound as a parameter.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to connect to PostgreSQL")?;

        info!("Connected to PostgreSQL (max {} connections)", max_connections);
        Ok(Self { pool })
    }

    /// Apply pending schema migrations from `migrations/`.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        info!("Database migrations applied");
        Ok(())
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn quote_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Field as text, the form `Like`, `Equals` and `Compare` operate on.
fn push_text_field(builder: &mut QueryBuilder<'_, Postgres>, field: &Field) {
    match field {
        Field::Column(column) => builder.push(format!("t.{}::text", quote_ident(column))),
        Field::JsonKey { column, key } => builder.push(format!(
            "(t.{} ->> {})",
            quote_ident(column),
            quote_literal(key)
        )),
    };
}

/// Field as jsonb, for containment checks.
fn push_json_field(builder: &mut QueryBuilder<'_, Postgres>, field: &Field) {
    match field {
        Field::Column(column) => builder.push(format!("t.{}", quote_ident(column))),
        Field::JsonKey { column, key } => builder.push(format!(
            "(t.{} -> {})",
            quote_ident(column),
            quote_literal(key)
        )),
    };
}

fn push_predicate(builder: &mut QueryBuilder<'_, Postgres>, predicate: &Predicate) {
    match predicate {
        Predicate::Like { field, pattern } => {
            push_text_field(builder, field);
            builder.push(" ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" ESCAPE '\\'");
        }
        Predicate::Equals { field, value } => {
            push_text_field(builder, field);
            builder.push(" = ");
            builder.push_bind(value.clone());
        }
        Predicate::Compare { field, op, value } => {
            // Byte-wise collation keeps ISO date text in chronological order
            push_text_field(builder, field);
            builder.push(format!(" COLLATE \"C\" {} ", op.as_sql()));
            builder.push_bind(value.clone());
        }
        Predicate::JsonContains { field, value } => {
            push_json_field(builder, field);
            builder.push(" @> ");
            builder.push_bind(Json(value.clone()));
        }
        Predicate::Any(alternatives) => {
            if alternatives.is_empty() {
                builder.push("FALSE");
                return;
            }
            builder.push("(");
            for (i, alternative) in alternatives.iter().enumerate() {
                if i > 0 {
                    builder.push(" OR ");
                }
                push_predicate(builder, alternative);
            }
            builder.push(")");
        }
    }
}

fn push_where(builder: &mut QueryBuilder<'_, Postgres>, predicates: &[Predicate]) {
    for (i, predicate) in predicates.iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        push_predicate(builder, predicate);
    }
}

fn push_order(builder: &mut QueryBuilder<'_, Postgres>, order: &[OrderBy]) {
    if order.is_empty() {
        builder.push(" ORDER BY t.id ASC");
        return;
    }
    let clauses: Vec<String> = order
        .iter()
        .map(|o| format!("t.{} {} NULLS LAST", quote_ident(o.column), o.direction.as_sql()))
        .collect();
    builder.push(" ORDER BY ");
    builder.push(clauses.join(", "));
}

fn list_sql(query: &ListQuery, page: PageRequest) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT to_jsonb(t) AS record, COUNT(*) OVER () AS total FROM ");
    builder.push(quote_ident(query.table));
    builder.push(" t");
    push_where(&mut builder, &query.predicates);
    push_order(&mut builder, &query.order);
    builder.push(" LIMIT ");
    builder.push_bind(page.per_page() as i64);
    builder.push(" OFFSET ");
    builder.push_bind(page.offset() as i64);
    builder
}

fn count_sql(query: &ListQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) AS total FROM ");
    builder.push(quote_ident(query.table));
    builder.push(" t");
    push_where(&mut builder, &query.predicates);
    builder
}

fn decode_record(row: &PgRow) -> Result<Record> {
    let value: Value = row.try_get("record").context("Row is missing the record column")?;
    match value {
        Value::Object(record) => Ok(record),
        other => bail!("Expected a JSON object row, got {}", other),
    }
}

fn column_list(record: &Record) -> Vec<String> {
    record
        .keys()
        .filter(|key| key.as_str() != "id")
        .map(|key| quote_ident(key))
        .collect()
}

#[async_trait]
impl ContentStore for PgStore {
    async fn fetch_page(&self, query: &ListQuery, page: PageRequest) -> Result<RecordPage> {
        let rows = list_sql(query, page)
            .build()
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Failed to list {}", query.table))?;

        let total = match rows.first() {
            Some(row) => row.try_get::<i64, _>("total")? as u64,
            None if page.offset() == 0 => 0,
            // Past the last page: the window count is unavailable
            None => {
                let row = count_sql(query)
                    .build()
                    .fetch_one(&self.pool)
                    .await
                    .with_context(|| format!("Failed to count {}", query.table))?;
                row.try_get::<i64, _>("total")? as u64
            }
        };

        let records = rows.iter().map(decode_record).collect::<Result<Vec<_>>>()?;
        debug!("Fetched {} of {} rows from {}", records.len(), total, query.table);
        Ok(RecordPage { records, total })
    }

    async fn find(&self, table: &str, id: i64) -> Result<Option<Record>> {
        let sql = format!(
            "SELECT to_jsonb(t) AS record FROM {} t WHERE t.id = $1",
            quote_ident(table)
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to load {} #{}", table, id))?;

        row.as_ref().map(decode_record).transpose()
    }

    async fn related(&self, relation: &Relation, parent_id: i64) -> Result<Vec<Record>> {
        let sql = format!(
            "SELECT to_jsonb(t) AS record FROM {} t WHERE t.{} = $1 ORDER BY t.{} ASC NULLS LAST, t.id ASC",
            quote_ident(relation.table),
            quote_ident(relation.foreign_key),
            quote_ident(relation.order_by),
        );
        let rows = sqlx::query(&sql)
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Failed to load {} for #{}", relation.name, parent_id))?;

        rows.iter().map(decode_record).collect()
    }

    async fn insert(&self, table: &str, record: Record) -> Result<Record> {
        let columns = column_list(&record);
        let table_ident = quote_ident(table);

        let result = if columns.is_empty() {
            let sql = format!(
                "INSERT INTO {} AS t DEFAULT VALUES RETURNING to_jsonb(t) AS record",
                table_ident
            );
            sqlx::query(&sql).fetch_one(&self.pool).await
        } else {
            let columns = columns.join(", ");
            let sql = format!(
                "INSERT INTO {table_ident} AS t ({columns}) \
                 SELECT {columns} FROM jsonb_populate_record(NULL::{table_ident}, $1) \
                 RETURNING to_jsonb(t) AS record"
            );
            sqlx::query(&sql)
                .bind(Json(Value::Object(record)))
                .fetch_one(&self.pool)
                .await
        };
        let row = result.with_context(|| format!("Failed to insert into {}", table))?;

        decode_record(&row)
    }

    async fn update(&self, table: &str, id: i64, patch: Record) -> Result<Option<Record>> {
        let columns = column_list(&patch);
        if columns.is_empty() {
            return self.find(table, id).await;
        }

        let table_ident = quote_ident(table);
        let assignments: Vec<String> = columns.iter().map(|c| format!("{c} = p.{c}")).collect();
        let sql = format!(
            "UPDATE {table_ident} AS t SET {} \
             FROM jsonb_populate_record(NULL::{table_ident}, $1) AS p \
             WHERE t.id = $2 RETURNING to_jsonb(t) AS record",
            assignments.join(", ")
        );
        let row = sqlx::query(&sql)
            .bind(Json(Value::Object(patch)))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to update {} #{}", table, id))?;

        row.as_ref().map(decode_record).transpose()
    }

    async fn delete(&self, table: &str, id: i64) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", quote_ident(table));
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to delete {} #{}", table, id))?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{where_date_from, where_json_contains, Comparison, SortDirection};
    use serde_json::json;

    #[test]
    fn test_quote_ident_and_literal() {
        assert_eq!(quote_ident("news"), "\"news\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
        assert_eq!(quote_literal("it's"), "'it''s'");
    }

    #[test]
    fn test_list_sql_without_predicates() {
        let query = ListQuery::new("news");
        let builder = list_sql(&query, PageRequest::default());
        assert_eq!(
            builder.sql(),
            "SELECT to_jsonb(t) AS record, COUNT(*) OVER () AS total FROM \"news\" t \
             ORDER BY t.id ASC LIMIT $1 OFFSET $2"
        );
    }

    #[test]
    fn test_list_sql_binds_search_values() {
        let query = ListQuery::new("news")
            .and_where(Predicate::Any(vec![
                Predicate::Like {
                    field: Field::JsonKey { column: "title", key: "ru" },
                    pattern: "%summit%".into(),
                },
                Predicate::Like {
                    field: Field::Column("slug"),
                    pattern: "%summit%".into(),
                },
            ]))
            .order_by("published_at", SortDirection::Desc)
            .order_by("id", SortDirection::Desc);

        let builder = list_sql(&query, PageRequest::new(2, 10));
        let sql = builder.sql();

        assert!(sql.contains(
            "WHERE ((t.\"title\" ->> 'ru') ILIKE $1 ESCAPE '\\' OR t.\"slug\"::text ILIKE $2 ESCAPE '\\')"
        ));
        assert!(sql.contains("ORDER BY t.\"published_at\" DESC NULLS LAST, t.\"id\" DESC NULLS LAST"));
        assert!(sql.ends_with("LIMIT $3 OFFSET $4"));
        assert!(!sql.contains("summit"), "search text must be bound, not inlined");
    }

    #[test]
    fn test_list_sql_json_contains_and_dates() {
        let query = where_json_contains(ListQuery::new("news"), "tags", &json!("policy"));
        let query = where_date_from(query, "published_at", &json!("2025-01-01"));
        let builder = count_sql(&query);

        assert_eq!(
            builder.sql(),
            "SELECT COUNT(*) AS total FROM \"news\" t WHERE (t.\"tags\" @> $1) \
             AND t.\"published_at\"::text COLLATE \"C\" >= $2"
        );
    }

    #[test]
    fn test_empty_any_is_false() {
        let query = ListQuery::new("news").and_where(Predicate::Any(Vec::new()));
        assert!(count_sql(&query).sql().ends_with("WHERE FALSE"));
    }

    #[test]
    fn test_compare_ops_render() {
        assert_eq!(Comparison::Lt.as_sql(), "<");
        assert_eq!(Comparison::Lte.as_sql(), "<=");
    }

    #[test]
    fn test_column_list_skips_id() {
        let record = json!({"id": 1, "title": {}, "slug": "x"}).as_object().cloned().unwrap();
        let columns = column_list(&record);
        assert_eq!(columns, vec!["\"slug\"", "\"title\""]);
    }
}
