use super::{RecordView, Related};
use crate::i18n::Localized;
use crate::query::{
    where_equals, FieldKind, FieldSpec, FilterHandler, ListQuery, ResourceDescriptor, SearchField,
    SortDirection,
};
use crate::store::Record;
use serde::Serialize;
use serde_json::Value;

fn filter_by_role(query: ListQuery, value: &Value) -> ListQuery {
    where_equals(query, "role", value)
}

pub static DESCRIPTOR: ResourceDescriptor = ResourceDescriptor {
    name: "committee-members",
    table: "committee_members",
    searchable: &[SearchField::Localized("name"), SearchField::Localized("position")],
    sortable: &["sort_order", "created_at"],
    default_direction: SortDirection::Asc,
    filters: &[FilterHandler { key: "role", apply: filter_by_role }],
    fields: &[
        FieldSpec::required("name", FieldKind::Localized),
        FieldSpec::optional("position", FieldKind::Localized),
        FieldSpec::optional("bio", FieldKind::Localized),
        FieldSpec::optional("photo", FieldKind::Text),
        FieldSpec::optional("role", FieldKind::Text),
        FieldSpec::optional("sort_order", FieldKind::Integer),
    ],
    relations: &[],
};

#[derive(Debug, Serialize)]
pub struct CommitteeMemberResource {
    pub id: i64,
    pub name: Localized,
    pub position: Localized,
    pub bio: Localized,
    pub photo: Option<String>,
    pub role: Option<String>,
    pub sort_order: i64,
}

pub fn transform(record: &Record, _related: &Related) -> CommitteeMemberResource {
    let row = RecordView::new(record);
    CommitteeMemberResource {
        id: row.id(),
        name: row.localized("name"),
        position: row.localized("position"),
        bio: row.localized("bio"),
        photo: row.text("photo"),
        role: row.text("role"),
        sort_order: row.integer("sort_order").unwrap_or(0),
    }
}
