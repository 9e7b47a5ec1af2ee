use super::{ListQuery, SortDirection};
use serde_json::Value;

/// A named filter handler: takes the query and the (non-empty) request value.
pub type FilterFn = fn(ListQuery, &Value) -> ListQuery;

#[derive(Debug, Clone, Copy)]
pub struct FilterHandler {
    /// Request key that selects this handler (`?status=...`)
    pub key: &'static str,
    pub apply: FilterFn,
}

/// A field taking part in free-text search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    /// Plain text column
    Column(&'static str),
    /// One key of a JSON object column
    JsonKey(&'static str, &'static str),
    /// A localized JSON column; searches every locale key
    Localized(&'static str),
}

/// Storage type of a writable field, used to validate write payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Localized,
    LocalizedList,
    TextList,
    Integer,
    Boolean,
    Date,
    Time,
    Timestamp,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }

    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }
}

/// A child collection loaded for detail views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    /// Key under which the collection is attached
    pub name: &'static str,
    pub table: &'static str,
    pub foreign_key: &'static str,
    pub order_by: &'static str,
}

/// Everything the generic list/detail pipeline needs to know about a resource.
///
/// Descriptors are static data; every identifier in one is trusted and may be
/// embedded into SQL, while request values are always bound as parameters.
#[derive(Debug)]
pub struct ResourceDescriptor {
    /// URL segment under `/api`
    pub name: &'static str,
    pub table: &'static str,
    pub searchable: &'static [SearchField],
    /// Allowed sort columns; the first entry is the default
    pub sortable: &'static [&'static str],
    pub default_direction: SortDirection,
    pub filters: &'static [FilterHandler],
    pub fields: &'static [FieldSpec],
    pub relations: &'static [Relation],
}

impl ResourceDescriptor {
    pub fn filter(&self, key: &str) -> Option<&FilterHandler> {
        self.filters.iter().find(|handler| handler.key == key)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }
}
