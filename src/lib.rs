//! Nominate: a church nominating committee, one ministry at a time.
//!
//! The [`session::Committee`] state machine walks each ministry through
//! explanation, nomination and voting, and writes every change through to
//! a [`store::KeyValueStore`] so a sitting survives a restart.

pub mod catalog;
pub mod cli;
pub mod clock;
pub mod config;
pub mod metrics;
pub mod model;
pub mod notify;
pub mod report;
pub mod session;
pub mod store;
pub mod validate;
