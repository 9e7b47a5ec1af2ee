//! Declarative list-query construction shared by every resource endpoint.
//!
//! A list request is translated into a `ListQuery` value by pure functions in
//! `builder`, driven by the static `ResourceDescriptor` of the resource. The
//! query value is then executed by a `ContentStore`, which owns pagination.

mod builder;
mod descriptor;
mod page;
mod request;

pub use builder::{
    apply_filters, apply_search, apply_sort, build_list_query, escape_like, is_blank,
    resolve_direction, resolve_sort_field, where_date_from, where_date_to, where_equals,
    where_flag, where_json_contains, where_relative_to_today,
};
pub use descriptor::{
    FieldKind, FieldSpec, FilterFn, FilterHandler, Relation, ResourceDescriptor, SearchField,
};
pub use page::{PageMeta, Paginated};
pub use request::{ListRequest, PageRequest, DEFAULT_PER_PAGE, MAX_PER_PAGE, RESERVED_KEYS};

use serde_json::Value;

/// Column used when a resource declares no sortable fields.
pub const FALLBACK_SORT_FIELD: &str = "created_at";

/// Sort direction, restricted to the two SQL directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Case-insensitive parse; anything but `asc`/`desc` is `None`.
    pub fn parse(value: &str) -> Option<SortDirection> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Where a predicate reads its value from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// A plain column
    Column(&'static str),
    /// A key inside a JSON object column, compared on its decoded text
    JsonKey {
        column: &'static str,
        key: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Gte,
    Lte,
    Lt,
}

impl Comparison {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Comparison::Gte => ">=",
            Comparison::Lte => "<=",
            Comparison::Lt => "<",
        }
    }
}

/// A single WHERE condition.
///
/// Values compared with `Equals` and `Compare` are matched on the text form of
/// the stored value, so numeric, boolean and date columns all compare the
/// way they print. `Compare` is only built for ISO dates, whose text order
/// matches chronological order.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Case-insensitive LIKE; `pattern` is already escaped with `\`
    Like { field: Field, pattern: String },
    Equals { field: Field, value: String },
    Compare {
        field: Field,
        op: Comparison,
        value: String,
    },
    /// JSON containment of `value` in the column (`@>`)
    JsonContains { field: Field, value: Value },
    Any(Vec<Predicate>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: &'static str,
    pub direction: SortDirection,
}

/// A composed list query against one table.
///
/// Predicates are combined with AND. An empty order falls back to `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub table: &'static str,
    pub predicates: Vec<Predicate>,
    pub order: Vec<OrderBy>,
}

impl ListQuery {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            predicates: Vec::new(),
            order: Vec::new(),
        }
    }

    pub fn and_where(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn order_by(mut self, column: &'static str, direction: SortDirection) -> Self {
        self.order.push(OrderBy { column, direction });
        self
    }
}
