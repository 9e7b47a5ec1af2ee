//! Pure request-to-query functions.
//!
//! Each function takes a `ListQuery` by value and returns the extended query.
//! Nothing here fails: unsupported fields, blank values and malformed input
//! leave the query unchanged.

use super::{
    Comparison, Field, ListQuery, ListRequest, Predicate, ResourceDescriptor, SearchField,
    SortDirection, FALLBACK_SORT_FIELD,
};
use crate::i18n::Locale;
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::BTreeMap;

/// Compose search, filters and sort for a list request.
pub fn build_list_query(descriptor: &ResourceDescriptor, request: &ListRequest) -> ListQuery {
    let query = ListQuery::new(descriptor.table);
    let query = apply_search(query, descriptor, request.search.as_deref());
    let query = apply_filters(query, descriptor, &request.filters);
    apply_sort(
        query,
        descriptor,
        request.sort_by.as_deref(),
        request.sort_direction.as_deref(),
    )
}

/// Escape LIKE metacharacters so user input only ever matches literally.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// OR-match the search term against every searchable field.
///
/// Flat columns and JSON keys share one pattern, built from the escaped term.
pub fn apply_search(
    query: ListQuery,
    descriptor: &ResourceDescriptor,
    search: Option<&str>,
) -> ListQuery {
    let term = match search.map(str::trim) {
        Some(term) if !term.is_empty() => term,
        _ => return query,
    };
    if descriptor.searchable.is_empty() {
        return query;
    }

    let pattern = format!("%{}%", escape_like(term));
    let alternatives = descriptor
        .searchable
        .iter()
        .flat_map(|field| search_targets(*field))
        .map(|field| Predicate::Like {
            field,
            pattern: pattern.clone(),
        })
        .collect();

    query.and_where(Predicate::Any(alternatives))
}

fn search_targets(field: SearchField) -> Vec<Field> {
    match field {
        SearchField::Column(column) => vec![Field::Column(column)],
        SearchField::JsonKey(column, key) => vec![Field::JsonKey { column, key }],
        SearchField::Localized(column) => Locale::ALL
            .iter()
            .map(|locale| Field::JsonKey {
                column,
                key: locale.code(),
            })
            .collect(),
    }
}

/// Requested sort field if allow-listed, else the first sortable field.
pub fn resolve_sort_field(descriptor: &ResourceDescriptor, requested: Option<&str>) -> &'static str {
    requested
        .and_then(|name| {
            descriptor
                .sortable
                .iter()
                .copied()
                .find(|field| *field == name.trim())
        })
        .or_else(|| descriptor.sortable.first().copied())
        .unwrap_or(FALLBACK_SORT_FIELD)
}

pub fn resolve_direction(requested: Option<&str>, default: SortDirection) -> SortDirection {
    requested.and_then(SortDirection::parse).unwrap_or(default)
}

/// Order by the resolved field, with `id` as a stable tiebreaker.
pub fn apply_sort(
    query: ListQuery,
    descriptor: &ResourceDescriptor,
    sort_by: Option<&str>,
    direction: Option<&str>,
) -> ListQuery {
    let field = resolve_sort_field(descriptor, sort_by);
    let direction = resolve_direction(direction, descriptor.default_direction);

    let query = query.order_by(field, direction);
    if field == "id" {
        query
    } else {
        query.order_by("id", direction)
    }
}

/// `null`, `""` and `[]` (or a list of only blank entries) count as absent.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Array(items) => items.iter().all(is_blank),
        _ => false,
    }
}

/// Run the descriptor's handler for every present, non-blank filter key.
pub fn apply_filters(
    query: ListQuery,
    descriptor: &ResourceDescriptor,
    filters: &BTreeMap<String, Value>,
) -> ListQuery {
    filters
        .iter()
        .filter(|(_, value)| !is_blank(value))
        .fold(query, |query, (key, value)| match descriptor.filter(key) {
            Some(handler) => (handler.apply)(query, value),
            None => query,
        })
}

/// Non-blank scalar entries of a filter value, as text.
fn scalar_entries(value: &Value) -> Vec<String> {
    let items = match value {
        Value::Array(items) => items.iter().collect::<Vec<_>>(),
        other => vec![other],
    };
    items
        .into_iter()
        .filter(|item| !is_blank(item))
        .filter_map(|item| match item {
            Value::String(text) => Some(text.trim().to_string()),
            Value::Number(number) => Some(number.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            _ => None,
        })
        .collect()
}

/// Equality on a column; a list value matches any of its entries.
pub fn where_equals(query: ListQuery, column: &'static str, value: &Value) -> ListQuery {
    let mut entries = scalar_entries(value);
    match entries.len() {
        0 => query,
        1 => query.and_where(Predicate::Equals {
            field: Field::Column(column),
            value: entries.remove(0),
        }),
        _ => query.and_where(Predicate::Any(
            entries
                .into_iter()
                .map(|value| Predicate::Equals {
                    field: Field::Column(column),
                    value,
                })
                .collect(),
        )),
    }
}

/// JSON-array containment; a scalar is treated as a one-entry list and the
/// entries are OR-ed.
pub fn where_json_contains(query: ListQuery, column: &'static str, value: &Value) -> ListQuery {
    let entries: Vec<Value> = match value {
        Value::Array(items) => items.iter().filter(|v| !is_blank(v)).cloned().collect(),
        other if is_blank(other) => Vec::new(),
        other => vec![other.clone()],
    };
    if entries.is_empty() {
        return query;
    }

    let alternatives = entries
        .into_iter()
        .map(|entry| Predicate::JsonContains {
            field: Field::Column(column),
            value: Value::Array(vec![normalize_entry(entry)]),
        })
        .collect();
    query.and_where(Predicate::Any(alternatives))
}

fn normalize_entry(entry: Value) -> Value {
    match entry {
        Value::String(text) => Value::String(text.trim().to_string()),
        other => other,
    }
}

fn parse_date(value: &Value) -> Option<NaiveDate> {
    let text = value.as_str()?.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(text, "%d.%m.%Y"))
        .ok()
}

fn where_date(query: ListQuery, column: &'static str, op: Comparison, value: &Value) -> ListQuery {
    match parse_date(value) {
        Some(date) => {
            // Upper bounds cover the whole day for timestamp columns
            let value = match op {
                Comparison::Lte => format!("{}~", date.format("%Y-%m-%d")),
                _ => date.format("%Y-%m-%d").to_string(),
            };
            query.and_where(Predicate::Compare {
                field: Field::Column(column),
                op,
                value,
            })
        }
        None => query,
    }
}

/// `column >= date`; accepts `YYYY-MM-DD` or `dd.mm.yyyy`, ignores anything else.
pub fn where_date_from(query: ListQuery, column: &'static str, value: &Value) -> ListQuery {
    where_date(query, column, Comparison::Gte, value)
}

/// `column <= date` (inclusive of the whole day).
pub fn where_date_to(query: ListQuery, column: &'static str, value: &Value) -> ListQuery {
    where_date(query, column, Comparison::Lte, value)
}

fn parse_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => number.as_i64().map(|n| n != 0),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Boolean column filter; unrecognized flag values are ignored.
pub fn where_flag(query: ListQuery, column: &'static str, value: &Value) -> ListQuery {
    match parse_flag(value) {
        Some(flag) => query.and_where(Predicate::Equals {
            field: Field::Column(column),
            value: flag.to_string(),
        }),
        None => query,
    }
}

/// Truthy flag keeps rows dated today or later, falsy keeps earlier rows.
pub fn where_relative_to_today(
    query: ListQuery,
    column: &'static str,
    value: &Value,
    today: NaiveDate,
) -> ListQuery {
    let op = match parse_flag(value) {
        Some(true) => Comparison::Gte,
        Some(false) => Comparison::Lt,
        None => return query,
    };
    query.and_where(Predicate::Compare {
        field: Field::Column(column),
        op,
        value: today.format("%Y-%m-%d").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{FilterHandler, PageRequest};
    use serde_json::json;

    fn by_status(query: ListQuery, value: &Value) -> ListQuery {
        where_equals(query, "status", value)
    }

    fn by_tags(query: ListQuery, value: &Value) -> ListQuery {
        where_json_contains(query, "tags", value)
    }

    static DESCRIPTOR: ResourceDescriptor = ResourceDescriptor {
        name: "articles",
        table: "articles",
        searchable: &[SearchField::Localized("title"), SearchField::Column("slug")],
        sortable: &["published_at", "created_at", "views"],
        default_direction: SortDirection::Desc,
        filters: &[
            FilterHandler {
                key: "status",
                apply: by_status,
            },
            FilterHandler {
                key: "tags",
                apply: by_tags,
            },
        ],
        fields: &[],
        relations: &[],
    };

    static BARE: ResourceDescriptor = ResourceDescriptor {
        name: "bare",
        table: "bare",
        searchable: &[],
        sortable: &[],
        default_direction: SortDirection::Desc,
        filters: &[],
        fields: &[],
        relations: &[],
    };

    fn filters(entries: &[(&str, Value)]) -> BTreeMap<String, Value> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    // ==================== Search Tests ====================

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b\\c"), "a\\_b\\\\c");
        assert_eq!(escape_like("summit"), "summit");
    }

    #[test]
    fn test_search_builds_or_over_all_fields() {
        let query = apply_search(ListQuery::new("articles"), &DESCRIPTOR, Some("summit"));
        assert_eq!(query.predicates.len(), 1);

        let Predicate::Any(alternatives) = &query.predicates[0] else {
            panic!("expected an OR predicate");
        };
        // title.ru, title.en, slug
        assert_eq!(alternatives.len(), 3);
        assert!(alternatives.contains(&Predicate::Like {
            field: Field::JsonKey {
                column: "title",
                key: "en"
            },
            pattern: "%summit%".into(),
        }));
        assert!(alternatives.contains(&Predicate::Like {
            field: Field::Column("slug"),
            pattern: "%summit%".into(),
        }));
    }

    #[test]
    fn test_search_escapes_wildcards_for_every_field_kind() {
        let query = apply_search(ListQuery::new("articles"), &DESCRIPTOR, Some("50%_off"));
        let Predicate::Any(alternatives) = &query.predicates[0] else {
            panic!("expected an OR predicate");
        };
        for alternative in alternatives {
            let Predicate::Like { pattern, .. } = alternative else {
                panic!("expected LIKE");
            };
            assert_eq!(pattern, "%50\\%\\_off%");
        }
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let query = apply_search(ListQuery::new("articles"), &DESCRIPTOR, Some("   "));
        assert!(query.predicates.is_empty());
        let query = apply_search(ListQuery::new("articles"), &DESCRIPTOR, None);
        assert!(query.predicates.is_empty());
    }

    #[test]
    fn test_search_without_searchable_fields() {
        let query = apply_search(ListQuery::new("bare"), &BARE, Some("summit"));
        assert!(query.predicates.is_empty());
    }

    // ==================== Sort Tests ====================

    #[test]
    fn test_sort_allowed_field() {
        assert_eq!(resolve_sort_field(&DESCRIPTOR, Some("views")), "views");
    }

    #[test]
    fn test_sort_unknown_field_falls_back_to_first() {
        assert_eq!(
            resolve_sort_field(&DESCRIPTOR, Some("invalid_field")),
            "published_at"
        );
        assert_eq!(resolve_sort_field(&DESCRIPTOR, None), "published_at");
    }

    #[test]
    fn test_sort_without_declared_fields_uses_created_at() {
        assert_eq!(resolve_sort_field(&BARE, Some("title")), "created_at");
    }

    #[test]
    fn test_sort_direction_fallback() {
        assert_eq!(resolve_direction(Some("ASC"), SortDirection::Desc), SortDirection::Asc);
        assert_eq!(
            resolve_direction(Some("random"), SortDirection::Desc),
            SortDirection::Desc
        );
        assert_eq!(resolve_direction(None, SortDirection::Asc), SortDirection::Asc);
    }

    #[test]
    fn test_apply_sort_adds_id_tiebreaker() {
        let query = apply_sort(ListQuery::new("articles"), &DESCRIPTOR, Some("views"), Some("asc"));
        assert_eq!(query.order.len(), 2);
        assert_eq!(query.order[0].column, "views");
        assert_eq!(query.order[1].column, "id");
        assert_eq!(query.order[1].direction, SortDirection::Asc);
    }

    // ==================== Filter Tests ====================

    #[test]
    fn test_unknown_filters_are_ignored() {
        let with_unknown = apply_filters(
            ListQuery::new("articles"),
            &DESCRIPTOR,
            &filters(&[("colour", json!("red")), ("status", json!("published"))]),
        );
        let without = apply_filters(
            ListQuery::new("articles"),
            &DESCRIPTOR,
            &filters(&[("status", json!("published"))]),
        );
        assert_eq!(with_unknown, without);
    }

    #[test]
    fn test_blank_filter_values_are_skipped() {
        let query = apply_filters(
            ListQuery::new("articles"),
            &DESCRIPTOR,
            &filters(&[
                ("status", json!("")),
                ("tags", json!([])),
                ("other", Value::Null),
            ]),
        );
        assert!(query.predicates.is_empty());
    }

    #[test]
    fn test_status_filter_with_empty_string_is_noop() {
        let query = by_status(ListQuery::new("articles"), &json!(""));
        assert_eq!(query, ListQuery::new("articles"));
    }

    #[test]
    fn test_where_equals_list_becomes_or() {
        let query = where_equals(ListQuery::new("t"), "status", &json!(["draft", "", "published"]));
        let Predicate::Any(alternatives) = &query.predicates[0] else {
            panic!("expected an OR predicate");
        };
        assert_eq!(alternatives.len(), 2);
    }

    #[test]
    fn test_json_contains_wraps_scalar() {
        let query = where_json_contains(ListQuery::new("t"), "tags", &json!("policy"));
        assert_eq!(
            query.predicates,
            vec![Predicate::Any(vec![Predicate::JsonContains {
                field: Field::Column("tags"),
                value: json!(["policy"]),
            }])]
        );
    }

    #[test]
    fn test_json_contains_or_across_entries() {
        let query = where_json_contains(ListQuery::new("t"), "tags", &json!(["a", "b"]));
        let Predicate::Any(alternatives) = &query.predicates[0] else {
            panic!("expected an OR predicate");
        };
        assert_eq!(alternatives.len(), 2);
    }

    #[test]
    fn test_date_filters() {
        let query = where_date_from(ListQuery::new("t"), "date", &json!("2025-05-01"));
        assert_eq!(
            query.predicates[0],
            Predicate::Compare {
                field: Field::Column("date"),
                op: Comparison::Gte,
                value: "2025-05-01".into(),
            }
        );

        let query = where_date_to(ListQuery::new("t"), "date", &json!("31.05.2025"));
        let Predicate::Compare { value, .. } = &query.predicates[0] else {
            panic!("expected a comparison");
        };
        assert!(value.starts_with("2025-05-31"));

        let query = where_date_from(ListQuery::new("t"), "date", &json!("yesterday"));
        assert!(query.predicates.is_empty());
    }

    #[test]
    fn test_flag_filters() {
        let query = where_flag(ListQuery::new("t"), "is_featured", &json!("1"));
        assert_eq!(
            query.predicates[0],
            Predicate::Equals {
                field: Field::Column("is_featured"),
                value: "true".into(),
            }
        );
        let query = where_flag(ListQuery::new("t"), "is_featured", &json!("maybe"));
        assert!(query.predicates.is_empty());
    }

    #[test]
    fn test_relative_to_today() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let query = where_relative_to_today(ListQuery::new("t"), "date", &json!("0"), today);
        assert_eq!(
            query.predicates[0],
            Predicate::Compare {
                field: Field::Column("date"),
                op: Comparison::Lt,
                value: "2025-06-01".into(),
            }
        );
    }

    // ==================== Composition Tests ====================

    #[test]
    fn test_build_list_query_scenario() {
        let request = ListRequest {
            search: Some("summit".into()),
            sort_by: Some("invalid_field".into()),
            sort_direction: None,
            filters: BTreeMap::new(),
            page: PageRequest::new(2, 10),
        };
        let query = build_list_query(&DESCRIPTOR, &request);

        assert_eq!(query.table, "articles");
        assert_eq!(query.predicates.len(), 1);
        assert_eq!(query.order[0].column, "published_at");
        assert_eq!(query.order[0].direction, SortDirection::Desc);
    }
}
