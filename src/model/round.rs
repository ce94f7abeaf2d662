//! Round types: candidates, wizard stages, and finalized results.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where the active ministry stands in the wizard.
///
/// Stages only move one step at a time. There is no stage before
/// `Explanation`: going back from it deactivates the ministry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    #[default]
    Explanation,
    Nomination,
    Voting,
}

impl Stage {
    /// The following stage, or `None` at `Voting`.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Explanation => Some(Self::Nomination),
            Self::Nomination => Some(Self::Voting),
            Self::Voting => None,
        }
    }

    /// The preceding stage, or `None` at `Explanation`.
    pub fn previous(self) -> Option<Self> {
        match self {
            Self::Explanation => None,
            Self::Nomination => Some(Self::Explanation),
            Self::Voting => Some(Self::Nomination),
        }
    }

    /// One-based position, as shown in the wizard header.
    pub fn number(self) -> u8 {
        match self {
            Self::Explanation => 1,
            Self::Nomination => 2,
            Self::Voting => 3,
        }
    }
}

/// A person nominated in the current round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: Uuid,
    pub name: String,
    pub votes: u32,
}

impl Candidate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            votes: 0,
        }
    }
}

/// The immutable record produced when a round ends.
///
/// One per ministry: finalizing or closing a ministry again replaces
/// the previous record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinistryResult {
    pub ministry_id: String,
    pub ministry_name: String,
    pub seat_id: String,
    pub seat_name: String,

    /// Candidates with their final counts, in nomination order.
    pub candidates: Vec<Candidate>,

    /// First candidate reaching the highest count. `None` when closed empty.
    pub winner: Option<String>,

    pub recorded_at: Timestamp,
    pub elapsed_seconds: u64,
    pub closed_without_candidates: bool,
}
