//! Partners and the sponsorship packages they subscribe to.

use super::{RecordView, Related};
use crate::i18n::Localized;
use crate::query::{
    where_equals, where_flag, FieldKind, FieldSpec, FilterHandler, ListQuery, ResourceDescriptor,
    SearchField, SortDirection,
};
use crate::store::Record;
use serde::Serialize;
use serde_json::Value;

fn filter_by_category(query: ListQuery, value: &Value) -> ListQuery {
    where_equals(query, "category", value)
}

fn filter_by_package(query: ListQuery, value: &Value) -> ListQuery {
    where_equals(query, "package_id", value)
}

fn filter_by_active(query: ListQuery, value: &Value) -> ListQuery {
    where_flag(query, "is_active", value)
}

pub static DESCRIPTOR: ResourceDescriptor = ResourceDescriptor {
    name: "partners",
    table: "partners",
    searchable: &[SearchField::Localized("name"), SearchField::Localized("description")],
    sortable: &["sort_order", "created_at"],
    default_direction: SortDirection::Asc,
    filters: &[
        FilterHandler { key: "category", apply: filter_by_category },
        FilterHandler { key: "package", apply: filter_by_package },
    ],
    fields: &[
        FieldSpec::required("name", FieldKind::Localized),
        FieldSpec::optional("description", FieldKind::Localized),
        FieldSpec::optional("logo", FieldKind::Text),
        FieldSpec::optional("website", FieldKind::Text),
        FieldSpec::optional("category", FieldKind::Text),
        FieldSpec::optional("package_id", FieldKind::Integer),
        FieldSpec::optional("sort_order", FieldKind::Integer),
    ],
    relations: &[],
};

pub static PACKAGE_DESCRIPTOR: ResourceDescriptor = ResourceDescriptor {
    name: "partner-packages",
    table: "partner_packages",
    searchable: &[SearchField::Localized("name")],
    sortable: &["sort_order", "price", "created_at"],
    default_direction: SortDirection::Asc,
    filters: &[FilterHandler { key: "active", apply: filter_by_active }],
    fields: &[
        FieldSpec::required("name", FieldKind::Localized),
        FieldSpec::optional("description", FieldKind::Localized),
        FieldSpec::optional("price", FieldKind::Integer),
        FieldSpec::optional("currency", FieldKind::Text),
        FieldSpec::optional("benefits", FieldKind::LocalizedList),
        FieldSpec::optional("sort_order", FieldKind::Integer),
        FieldSpec::optional("is_active", FieldKind::Boolean),
    ],
    relations: &[],
};

#[derive(Debug, Serialize)]
pub struct PartnerResource {
    pub id: i64,
    pub name: Localized,
    pub description: Localized,
    pub logo: Option<String>,
    pub website: Option<String>,
    pub category: Option<String>,
    pub package_id: Option<i64>,
    pub sort_order: i64,
}

#[derive(Debug, Serialize)]
pub struct PartnerPackageResource {
    pub id: i64,
    pub name: Localized,
    pub description: Localized,
    pub price: Option<i64>,
    pub currency: Option<String>,
    pub benefits: Vec<Localized>,
    pub sort_order: i64,
    pub is_active: bool,
}

pub fn transform(record: &Record, _related: &Related) -> PartnerResource {
    let row = RecordView::new(record);
    PartnerResource {
        id: row.id(),
        name: row.localized("name"),
        description: row.localized("description"),
        logo: row.text("logo"),
        website: row.text("website"),
        category: row.text("category"),
        package_id: row.integer("package_id"),
        sort_order: row.integer("sort_order").unwrap_or(0),
    }
}

pub fn transform_package(record: &Record, _related: &Related) -> PartnerPackageResource {
    let row = RecordView::new(record);
    PartnerPackageResource {
        id: row.id(),
        name: row.localized("name"),
        description: row.localized("description"),
        price: row.integer("price"),
        currency: row.text("currency"),
        benefits: row.localized_list("benefits"),
        sort_order: row.integer("sort_order").unwrap_or(0),
        is_active: row.flag("is_active"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partner_transform() {
        let row = json!({"id": 2, "name": {"en": "Acme"}, "package_id": "3"});
        let partner = transform(row.as_object().unwrap(), &Related::new());
        assert_eq!(partner.package_id, Some(3));
        assert_eq!(partner.sort_order, 0);
        assert!(partner.logo.is_none());
    }

    #[test]
    fn test_package_transform_benefits() {
        let row = json!({
            "id": 1,
            "name": {"ru": "Генеральный партнёр"},
            "benefits": [{"ru": "Логотип на сцене", "en": "Stage logo"}],
            "is_active": true,
        });
        let package = transform_package(row.as_object().unwrap(), &Related::new());
        assert_eq!(package.benefits.len(), 1);
        assert!(package.is_active);
        assert!(package.price.is_none());
    }
}
