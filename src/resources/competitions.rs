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
    where_json_contains(query, "categories", value)
}

fn filter_by_deadline_from(query: ListQuery, value: &Value) -> ListQuery {
    where_date_from(query, "deadline", value)
}

fn filter_by_deadline_to(query: ListQuery, value: &Value) -> ListQuery {
    where_date_to(query, "deadline", value)
}

pub static DESCRIPTOR: ResourceDescriptor = ResourceDescriptor {
    name: "competitions",
    table: "competitions",
    searchable: &[SearchField::Localized("title"), SearchField::Localized("description")],
    sortable: &["deadline", "created_at"],
    default_direction: SortDirection::Desc,
    filters: &[
        FilterHandler { key: "status", apply: filter_by_status },
        FilterHandler { key: "category", apply: filter_by_category },
        FilterHandler { key: "date_from", apply: filter_by_deadline_from },
        FilterHandler { key: "date_to", apply: filter_by_deadline_to },
    ],
    fields: &[
        FieldSpec::required("title", FieldKind::Localized),
        FieldSpec::optional("description", FieldKind::Localized),
        FieldSpec::optional("rules", FieldKind::Localized),
        FieldSpec::optional("deadline", FieldKind::Date),
        FieldSpec::optional("status", FieldKind::Text),
        FieldSpec::optional("image", FieldKind::Text),
        FieldSpec::optional("categories", FieldKind::TextList),
    ],
    relations: &[],
};

#[derive(Debug, Serialize)]
pub struct CompetitionResource {
    pub id: i64,
    pub title: Localized,
    pub description: Localized,
    pub rules: Localized,
    pub deadline: Option<String>,
    pub status: Option<String>,
    pub image: Option<String>,
    pub categories: Vec<String>,
    pub created_at: Option<String>,
}

pub fn transform(record: &Record, _related: &Related) -> CompetitionResource {
    let row = RecordView::new(record);
    CompetitionResource {
        id: row.id(),
        title: row.localized("title"),
        description: row.localized("description"),
        rules: row.localized("rules"),
        deadline: row.date("deadline"),
        status: row.text("status"),
        image: row.text("image"),
        categories: row.text_list("categories"),
        created_at: row.date("created_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transform_deadline() {
        let row = json!({"id": 1, "title": {"en": "Essay"}, "deadline": "2025-09-01", "categories": ["youth"]});
        let competition = transform(row.as_object().unwrap(), &Related::new());
        assert_eq!(competition.deadline.as_deref(), Some("01.09.2025"));
        assert_eq!(competition.categories, vec!["youth"]);
    }
}
