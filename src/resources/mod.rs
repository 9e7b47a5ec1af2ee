//! Public resource types and the record → JSON transform layer.
//!
//! Each resource module declares its static `ResourceDescriptor` (search,
//! sort, filter and write capabilities) and a pure `transform` producing the
//! stable public shape. `ResourceKind` ties the two together for the API.

pub mod awards;
pub mod committee;
pub mod competitions;
pub mod events;
pub mod hotels;
pub mod news;
pub mod partners;
mod payload;
mod record;

pub use payload::{validate_payload, FieldErrors, PayloadError, PayloadMode};
pub use record::{parse_date, parse_time, RecordView, DATE_FORMAT, TIME_FORMAT};

use crate::query::ResourceDescriptor;
use crate::store::Record;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Eagerly loaded child collections keyed by relation name.
pub type Related = BTreeMap<&'static str, Vec<Record>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Events,
    News,
    Partners,
    PartnerPackages,
    Hotels,
    CommitteeMembers,
    Competitions,
    Awards,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 8] = [
        ResourceKind::Events,
        ResourceKind::News,
        ResourceKind::Partners,
        ResourceKind::PartnerPackages,
        ResourceKind::Hotels,
        ResourceKind::CommitteeMembers,
        ResourceKind::Competitions,
        ResourceKind::Awards,
    ];

    /// Resolve the `/api/{segment}` path segment.
    pub fn from_segment(segment: &str) -> Option<ResourceKind> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.descriptor().name == segment)
    }

    pub fn descriptor(&self) -> &'static ResourceDescriptor {
        match self {
            ResourceKind::Events => &events::DESCRIPTOR,
            ResourceKind::News => &news::DESCRIPTOR,
            ResourceKind::Partners => &partners::DESCRIPTOR,
            ResourceKind::PartnerPackages => &partners::PACKAGE_DESCRIPTOR,
            ResourceKind::Hotels => &hotels::DESCRIPTOR,
            ResourceKind::CommitteeMembers => &committee::DESCRIPTOR,
            ResourceKind::Competitions => &competitions::DESCRIPTOR,
            ResourceKind::Awards => &awards::DESCRIPTOR,
        }
    }

    /// Public JSON for one record.
    pub fn transform(&self, record: &Record, related: &Related) -> Result<Value> {
        match self {
            ResourceKind::Events => to_json(events::transform(record, related)),
            ResourceKind::News => to_json(news::transform(record, related)),
            ResourceKind::Partners => to_json(partners::transform(record, related)),
            ResourceKind::PartnerPackages => to_json(partners::transform_package(record, related)),
            ResourceKind::Hotels => to_json(hotels::transform(record, related)),
            ResourceKind::CommitteeMembers => to_json(committee::transform(record, related)),
            ResourceKind::Competitions => to_json(competitions::transform(record, related)),
            ResourceKind::Awards => to_json(awards::transform(record, related)),
        }
    }

    /// Record field holding the human-readable heading of this resource.
    pub fn heading_field(&self) -> &'static str {
        match self.descriptor().field("title") {
            Some(_) => "title",
            None => "name",
        }
    }
}

fn to_json<T: Serialize>(resource: T) -> Result<Value> {
    serde_json::to_value(resource).context("Failed to serialize resource")
}
