use super::{RecordView, Related};
use crate::i18n::Localized;
use crate::query::{
    where_date_from, where_date_to, where_equals, where_json_contains, FieldKind, FieldSpec,
    FilterHandler, ListQuery, ResourceDescriptor, SearchField, SortDirection,
};
use crate::store::Record;
use serde::Serialize;
use serde_json::Value;

fn filter_by_status(query: ListQuery, value: &Value) -> ListQuery {
    where_equals(query, "status", value)
}

fn filter_by_category(query: ListQuery, value: &Value) -> ListQuery {
    where_equals(query, "category", value)
}

fn filter_by_tags(query: ListQuery, value: &Value) -> ListQuery {
    where_json_contains(query, "tags", value)
}

fn filter_by_date_from(query: ListQuery, value: &Value) -> ListQuery {
    where_date_from(query, "published_at", value)
}

fn filter_by_date_to(query: ListQuery, value: &Value) -> ListQuery {
    where_date_to(query, "published_at", value)
}

pub static DESCRIPTOR: ResourceDescriptor = ResourceDescriptor {
    name: "news",
    table: "news",
    searchable: &[
        SearchField::Localized("title"),
        SearchField::Localized("excerpt"),
        SearchField::Localized("content"),
        SearchField::Column("slug"),
    ],
    sortable: &["published_at", "created_at", "views"],
    default_direction: SortDirection::Desc,
    filters: &[
        FilterHandler { key: "status", apply: filter_by_status },
        FilterHandler { key: "category", apply: filter_by_category },
        FilterHandler { key: "tags", apply: filter_by_tags },
        FilterHandler { key: "date_from", apply: filter_by_date_from },
        FilterHandler { key: "date_to", apply: filter_by_date_to },
    ],
    fields: &[
        FieldSpec::required("title", FieldKind::Localized),
        FieldSpec::optional("slug", FieldKind::Text),
        FieldSpec::optional("excerpt", FieldKind::Localized),
        FieldSpec::optional("content", FieldKind::Localized),
        FieldSpec::optional("image", FieldKind::Text),
        FieldSpec::optional("category", FieldKind::Text),
        FieldSpec::optional("tags", FieldKind::TextList),
        FieldSpec::optional("status", FieldKind::Text),
        FieldSpec::optional("published_at", FieldKind::Timestamp),
    ],
    relations: &[],
};

#[derive(Debug, Serialize)]
pub struct NewsResource {
    pub id: i64,
    pub title: Localized,
    pub slug: Option<String>,
    pub excerpt: Localized,
    pub content: Localized,
    pub image: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub status: Option<String>,
    pub published_at: Option<String>,
    pub published_time: Option<String>,
    pub views: i64,
    pub created_at: Option<String>,
}

pub fn transform(record: &Record, _related: &Related) -> NewsResource {
    let row = RecordView::new(record);
    NewsResource {
        id: row.id(),
        title: row.localized("title"),
        slug: row.text("slug"),
        excerpt: row.localized("excerpt"),
        content: row.localized("content"),
        image: row.text("image"),
        category: row.text("category"),
        tags: row.text_list("tags"),
        status: row.text("status"),
        published_at: row.date("published_at"),
        published_time: row.time("published_at"),
        views: row.integer("views").unwrap_or(0),
        created_at: row.date("created_at"),
    }
}
