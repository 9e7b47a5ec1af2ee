use super::{RecordView, Related};
use crate::i18n::Localized;
use crate::query::{
    where_equals, FieldKind, FieldSpec, FilterHandler, ListQuery, ResourceDescriptor, SearchField,
    SortDirection,
};
use crate::store::Record;
use serde::Serialize;
use serde_json::Value;

fn filter_by_year(query: ListQuery, value: &Value) -> ListQuery {
    where_equals(query, "year", value)
}

fn filter_by_category(query: ListQuery, value: &Value) -> ListQuery {
    where_equals(query, "category", value)
}

pub static DESCRIPTOR: ResourceDescriptor = ResourceDescriptor {
    name: "awards",
    table: "awards",
    searchable: &[
        SearchField::Localized("title"),
        SearchField::Localized("winner"),
        SearchField::Localized("description"),
    ],
    sortable: &["year", "created_at"],
    default_direction: SortDirection::Desc,
    filters: &[
        FilterHandler { key: "year", apply: filter_by_year },
        FilterHandler { key: "category", apply: filter_by_category },
    ],
    fields: &[
        FieldSpec::required("title", FieldKind::Localized),
        FieldSpec::optional("description", FieldKind::Localized),
        FieldSpec::optional("winner", FieldKind::Localized),
        FieldSpec::optional("year", FieldKind::Integer),
        FieldSpec::optional("category", FieldKind::Text),
        FieldSpec::optional("image", FieldKind::Text),
        FieldSpec::optional("nominations", FieldKind::LocalizedList),
    ],
    relations: &[],
};

#[derive(Debug, Serialize)]
pub struct AwardResource {
    pub id: i64,
    pub title: Localized,
    pub description: Localized,
    pub winner: Localized,
    pub year: Option<i64>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub nominations: Vec<Localized>,
}

pub fn transform(record: &Record, _related: &Related) -> AwardResource {
    let row = RecordView::new(record);
    AwardResource {
        id: row.id(),
        title: row.localized("title"),
        description: row.localized("description"),
        winner: row.localized("winner"),
        year: row.integer("year"),
        category: row.text("category"),
        image: row.text("image"),
        nominations: row.localized_list("nominations"),
    }
}
