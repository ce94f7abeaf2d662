//! Core data model for the nominating committee.
//!
//! These types represent the committee's vocabulary:
//! ministries and their seats, nomination rounds, candidates, results,
//! and the committee-level configuration entered before voting starts.

mod committee;
mod ministry;
mod round;

pub use committee::{MinistryStatus, PreRegistration, SeatOverrides};
pub use ministry::{Category, Ministry, Seat, SeatKind};
pub use round::{Candidate, MinistryResult, Stage};
