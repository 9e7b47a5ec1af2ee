use super::{RecordView, Related};
use crate::i18n::Localized;
use crate::query::{
    where_date_from, where_date_to, where_equals, where_flag, where_relative_to_today, FieldKind,
    FieldSpec, FilterHandler, ListQuery, Relation, ResourceDescriptor, SearchField, SortDirection,
};
use crate::store::Record;
use chrono::Local;
use serde::Serialize;
use serde_json::Value;

pub const SCHEDULE: Relation = Relation {
    name: "schedule",
    table: "event_schedule_items",
    foreign_key: "event_id",
    order_by: "sort_order",
};

pub const SPEAKERS: Relation = Relation {
    name: "speakers",
    table: "event_speakers",
    foreign_key: "event_id",
    order_by: "sort_order",
};

pub const FAQ: Relation = Relation {
    name: "faq",
    table: "event_faqs",
    foreign_key: "event_id",
    order_by: "sort_order",
};

fn filter_by_status(query: ListQuery, value: &Value) -> ListQuery {
    where_equals(query, "status", value)
}

fn filter_by_type(query: ListQuery, value: &Value) -> ListQuery {
    where_equals(query, "type", value)
}

fn filter_by_featured(query: ListQuery, value: &Value) -> ListQuery {
    where_flag(query, "is_featured", value)
}

fn filter_by_date_from(query: ListQuery, value: &Value) -> ListQuery {
    where_date_from(query, "date", value)
}

fn filter_by_date_to(query: ListQuery, value: &Value) -> ListQuery {
    where_date_to(query, "date", value)
}

fn filter_by_upcoming(query: ListQuery, value: &Value) -> ListQuery {
    where_relative_to_today(query, "date", value, Local::now().date_naive())
}

pub static DESCRIPTOR: ResourceDescriptor = ResourceDescriptor {
    name: "events",
    table: "events",
    searchable: &[
        SearchField::Localized("title"),
        SearchField::Localized("description"),
        SearchField::Localized("location"),
    ],
    sortable: &["date", "created_at", "views"],
    default_direction: SortDirection::Asc,
    filters: &[
        FilterHandler { key: "status", apply: filter_by_status },
        FilterHandler { key: "type", apply: filter_by_type },
        FilterHandler { key: "featured", apply: filter_by_featured },
        FilterHandler { key: "date_from", apply: filter_by_date_from },
        FilterHandler { key: "date_to", apply: filter_by_date_to },
        FilterHandler { key: "upcoming", apply: filter_by_upcoming },
    ],
    fields: &[
        FieldSpec::required("title", FieldKind::Localized),
        FieldSpec::optional("description", FieldKind::Localized),
        FieldSpec::optional("location", FieldKind::Localized),
        FieldSpec::required("date", FieldKind::Date),
        FieldSpec::optional("start_time", FieldKind::Time),
        FieldSpec::optional("end_time", FieldKind::Time),
        FieldSpec::optional("image", FieldKind::Text),
        FieldSpec::optional("type", FieldKind::Text),
        FieldSpec::optional("status", FieldKind::Text),
        FieldSpec::optional("is_featured", FieldKind::Boolean),
    ],
    relations: &[SCHEDULE, SPEAKERS, FAQ],
};

#[derive(Debug, Serialize)]
pub struct ScheduleItemResource {
    pub id: i64,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub title: Localized,
    pub description: Localized,
    pub speaker: Localized,
}

#[derive(Debug, Serialize)]
pub struct SpeakerResource {
    pub id: i64,
    pub name: Localized,
    pub position: Localized,
    pub company: Localized,
    pub photo: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FaqResource {
    pub id: i64,
    pub question: Localized,
    pub answer: Localized,
}

#[derive(Debug, Serialize)]
pub struct EventResource {
    pub id: i64,
    pub title: Localized,
    pub description: Localized,
    pub location: Localized,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub image: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub status: Option<String>,
    pub is_featured: bool,
    pub views: i64,
    pub created_at: Option<String>,
    pub schedule: Vec<ScheduleItemResource>,
    pub speakers: Vec<SpeakerResource>,
    pub faq: Vec<FaqResource>,
}

fn schedule_item(record: &Record) -> ScheduleItemResource {
    let row = RecordView::new(record);
    ScheduleItemResource {
        id: row.id(),
        start_time: row.time("start_time"),
        end_time: row.time("end_time"),
        title: row.localized("title"),
        description: row.localized("description"),
        speaker: row.localized("speaker"),
    }
}

fn speaker(record: &Record) -> SpeakerResource {
    let row = RecordView::new(record);
    SpeakerResource {
        id: row.id(),
        name: row.localized("name"),
        position: row.localized("position"),
        company: row.localized("company"),
        photo: row.text("photo"),
    }
}

fn faq_entry(record: &Record) -> FaqResource {
    let row = RecordView::new(record);
    FaqResource {
        id: row.id(),
        question: row.localized("question"),
        answer: row.localized("answer"),
    }
}

pub fn transform(record: &Record, related: &Related) -> EventResource {
    let row = RecordView::new(record);
    let collect = |relation: &Relation| related.get(relation.name).map(Vec::as_slice).unwrap_or_default();

    EventResource {
        id: row.id(),
        title: row.localized("title"),
        description: row.localized("description"),
        location: row.localized("location"),
        date: row.date("date"),
        start_time: row.time("start_time"),
        end_time: row.time("end_time"),
        image: row.text("image"),
        event_type: row.text("type"),
        status: row.text("status"),
        is_featured: row.flag("is_featured"),
        views: row.integer("views").unwrap_or(0),
        created_at: row.date("created_at"),
        schedule: collect(&SCHEDULE).iter().map(schedule_item).collect(),
        speakers: collect(&SPEAKERS).iter().map(speaker).collect(),
        faq: collect(&FAQ).iter().map(faq_entry).collect(),
    }
}
