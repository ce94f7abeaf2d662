//! Ministry types: the electable roles of a church.

use serde::{Deserialize, Serialize};

/// A nameable church role or department with one or more seats.
///
/// Built-in ministries come from the catalog; custom ones are created by
/// the committee and always carry [`Category::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ministry {
    pub id: String,
    pub name: String,
    pub description: String,
    pub explanation: String,
    pub category: Category,
    pub seats: Vec<Seat>,
}

impl Ministry {
    /// The first seat, used as the label of a result.
    pub fn first_seat(&self) -> Option<&Seat> {
        self.seats.first()
    }
}

/// How a ministry is grouped when presented to the committee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Leadership,
    Ministry,
    Club,
    Custom,
}

/// One electable position within a ministry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub id: String,
    pub name: String,
    pub kind: SeatKind,
}

/// The kind of position a seat represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SeatKind {
    Principal,
    Director,
    AssociateDirector,
    Secretary,
    Treasurer,
    Elder,
}
