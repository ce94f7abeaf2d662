//! Committee-level configuration types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Stage;

/// Seat-count overrides keyed by ministry id.
///
/// Stored for any id, but only consulted for ministries whose panel size
/// is configurable (see [`crate::catalog::seat_count`]).
pub type SeatOverrides = BTreeMap<String, u32>;

/// Suggestions entered before the committee sits: who leads the ministry
/// today and who has shown interest in serving.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreRegistration {
    pub current_director: String,
    pub associate_director: Option<String>,
    pub interested: Vec<String>,
}

impl PreRegistration {
    /// Every name on record, director first, without blanks.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.current_director.as_str())
            .chain(self.associate_director.as_deref())
            .chain(self.interested.iter().map(String::as_str))
            .filter(|n| !n.trim().is_empty())
    }
}

/// Where a ministry stands for this committee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinistryStatus {
    /// No result yet and not being voted.
    Pending,

    /// Currently in the wizard at the given stage.
    Active(Stage),

    /// Has a result.
    Finalized,
}
