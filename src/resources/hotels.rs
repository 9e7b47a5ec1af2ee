use super::{RecordView, Related};
use crate::i18n::Localized;
use crate::query::{
    where_equals, FieldKind, FieldSpec, FilterHandler, ListQuery, ResourceDescriptor, SearchField,
    SortDirection,
};
use crate::store::Record;
use serde::Serialize;
use serde_json::Value;

fn filter_by_stars(query: ListQuery, value: &Value) -> ListQuery {
    where_equals(query, "stars", value)
}

pub static DESCRIPTOR: ResourceDescriptor = ResourceDescriptor {
    name: "hotels",
    table: "hotels",
    searchable: &[SearchField::Localized("name"), SearchField::Localized("address")],
    sortable: &["stars", "price_from", "created_at"],
    default_direction: SortDirection::Desc,
    filters: &[FilterHandler { key: "stars", apply: filter_by_stars }],
    fields: &[
        FieldSpec::required("name", FieldKind::Localized),
        FieldSpec::optional("address", FieldKind::Localized),
        FieldSpec::optional("description", FieldKind::Localized),
        FieldSpec::optional("stars", FieldKind::Integer),
        FieldSpec::optional("website", FieldKind::Text),
        FieldSpec::optional("phone", FieldKind::Text),
        FieldSpec::optional("image", FieldKind::Text),
        FieldSpec::optional("distance", FieldKind::Text),
        FieldSpec::optional("price_from", FieldKind::Integer),
    ],
    relations: &[],
};

#[derive(Debug, Serialize)]
pub struct HotelResource {
    pub id: i64,
    pub name: Localized,
    pub address: Localized,
    pub description: Localized,
    pub stars: Option<i64>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub image: Option<String>,
    pub distance: Option<String>,
    pub price_from: Option<i64>,
}

pub fn transform(record: &Record, _related: &Related) -> HotelResource {
    let row = RecordView::new(record);
    HotelResource {
        id: row.id(),
        name: row.localized("name"),
        address: row.localized("address"),
        description: row.localized("description"),
        stars: row.integer("stars"),
        website: row.text("website"),
        phone: row.text("phone"),
        image: row.text("image"),
        distance: row.text("distance"),
        price_from: row.integer("price_from"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transform() {
        let row = json!({"id": 4, "name": {"ru": "Гостиница"}, "stars": 5, "distance": "1.2 km"});
        let hotel = transform(row.as_object().unwrap(), &Related::new());
        assert_eq!(hotel.stars, Some(5));
        assert_eq!(hotel.distance.as_deref(), Some("1.2 km"));
        assert!(hotel.price_from.is_none());
    }
}
