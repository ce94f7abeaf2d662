//! The committee session: the state machine behind the voting wizard.
//!
//! One [`Committee`] owns every piece of mutable state and is the only
//! way to change it. Each mutation is applied in memory and written
//! through to the injected store before the call returns, so the two
//! never diverge between calls. On the next start, [`Committee::load`]
//! rehydrates everything from the same store.
//!
//! Operations are total. Input that doesn't resolve (an unknown ministry,
//! a candidate that isn't in the round, a stage boundary already reached)
//! is an idle transition, not an error. Validation of names and readiness
//! lives in [`crate::validate`] and is the caller's job.
//!
//! Mutation takes `&mut self`, so two operations can never interleave.
//! Callers sharing a committee across threads wrap it in a `Mutex`.
//!
//! Stage transitions while a ministry is active:
//!
//! ```text
//! (none) --select--> Explanation --advance--> Nomination --advance--> Voting --finalize--> (none)
//!    ^                    |                       |                      |
//!    +----retreat---------+        <--retreat-----+      <--retreat------+
//! ```

mod round;
mod setup;

use std::collections::{BTreeMap, HashSet};

use jiff::Timestamp;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog;
use crate::clock::{Clock, SystemClock};
use crate::metrics;
use crate::model::{
    Candidate, Ministry, MinistryResult, MinistryStatus, PreRegistration, SeatOverrides, Stage,
};
use crate::notify::{NoopNotifier, Notifier};
use crate::store::{KeyValueStore, Slots};

/// Store keys, one slot per top-level field.
mod keys {
    pub const ACTIVE_MINISTRY: &str = "activeMinistryId";
    pub const STAGE: &str = "stage";
    pub const CANDIDATES: &str = "candidates";
    pub const VOTE_HISTORY: &str = "voteHistory";
    pub const RESULTS: &str = "results";
    pub const CHURCH_NAME: &str = "churchName";
    pub const SELECTED: &str = "selectedMinistryIds";
    pub const CUSTOM: &str = "customMinistries";
    pub const PRE_REGISTRATIONS: &str = "preRegistrations";
    pub const SEAT_OVERRIDES: &str = "seatOverrides";
    pub const STARTED_AT: &str = "committeeStartedAt";
    pub const CLOSED: &str = "committeeClosed";
    pub const NOTIFIED: &str = "completionNotified";
    pub const EXPLAINED: &str = "explainedMinistries";

    pub const ALL: [&str; 14] = [
        ACTIVE_MINISTRY,
        STAGE,
        CANDIDATES,
        VOTE_HISTORY,
        RESULTS,
        CHURCH_NAME,
        SELECTED,
        CUSTOM,
        PRE_REGISTRATIONS,
        SEAT_OVERRIDES,
        STARTED_AT,
        CLOSED,
        NOTIFIED,
        EXPLAINED,
    ];
}

/// Everything the committee persists.
///
/// The stage start time is not part of it: it restarts whenever the
/// committee is loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitteeState {
    // ── Round ──
    pub active_ministry_id: Option<String>,
    pub stage: Stage,
    pub candidates: Vec<Candidate>,

    /// One candidate id per vote cast in the round, most recent last.
    pub vote_history: Vec<Uuid>,

    pub results: Vec<MinistryResult>,

    // ── Configuration ──
    pub church_name: String,

    /// Empty means every available ministry is in play.
    pub selected_ministry_ids: Vec<String>,

    pub custom_ministries: Vec<Ministry>,
    pub pre_registrations: BTreeMap<String, PreRegistration>,
    pub seat_overrides: SeatOverrides,
    pub started_at: Option<Timestamp>,
    pub closed: bool,
    pub notified: bool,
    pub explained_ministry_ids: Vec<String>,
}

/// A nominating committee sitting, backed by a key-value store.
pub struct Committee<S, N = NoopNotifier, C = SystemClock> {
    store: S,
    notifier: N,
    clock: C,
    state: CommitteeState,
    stage_started_at: Timestamp,
}

impl<S: KeyValueStore> Committee<S> {
    /// Loads a committee using the system clock and no completion notices.
    pub fn load(store: S) -> Self {
        Self::load_with(store, NoopNotifier, SystemClock)
    }
}

impl<S: KeyValueStore, N: Notifier, C: Clock> Committee<S, N, C> {
    /// Loads a committee from `store`, starting fresh for any slot that is
    /// missing or unreadable.
    pub fn load_with(store: S, notifier: N, clock: C) -> Self {
        let mut state = CommitteeState {
            active_ministry_id: store.load(keys::ACTIVE_MINISTRY, None),
            stage: store.load(keys::STAGE, Stage::Explanation),
            candidates: store.load(keys::CANDIDATES, Vec::new()),
            vote_history: store.load(keys::VOTE_HISTORY, Vec::new()),
            results: store.load(keys::RESULTS, Vec::new()),
            church_name: store.load(keys::CHURCH_NAME, String::new()),
            selected_ministry_ids: store.load(keys::SELECTED, Vec::new()),
            custom_ministries: store.load(keys::CUSTOM, Vec::new()),
            pre_registrations: store.load(keys::PRE_REGISTRATIONS, BTreeMap::new()),
            seat_overrides: store.load(keys::SEAT_OVERRIDES, SeatOverrides::new()),
            started_at: store.load(keys::STARTED_AT, None),
            closed: store.load(keys::CLOSED, false),
            notified: store.load(keys::NOTIFIED, false),
            explained_ministry_ids: store.load(keys::EXPLAINED, Vec::new()),
        };

        let dangling = state.active_ministry_id.as_deref().is_some_and(|id| {
            catalog::find_built_in(id).is_none() && !state.custom_ministries.iter().any(|m| m.id == id)
        });
        if dangling {
            warn!(
                "active ministry {:?} no longer exists, discarding its round",
                state.active_ministry_id
            );
            state.active_ministry_id = None;
            state.stage = Stage::Explanation;
            state.candidates.clear();
            state.vote_history.clear();
        }

        let stage_started_at = clock.now();
        let mut committee = Self {
            store,
            notifier,
            clock,
            state,
            stage_started_at,
        };
        if dangling {
            committee.persist_round();
        }
        debug!(
            "committee loaded: {} results, active {:?}",
            committee.state.results.len(),
            committee.state.active_ministry_id
        );
        committee
    }

    // ── Accessors ──

    pub fn state(&self) -> &CommitteeState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Consumes the committee, handing back its store.
    pub fn into_store(self) -> S {
        self.store
    }

    pub fn stage(&self) -> Stage {
        self.state.stage
    }

    pub fn stage_started_at(&self) -> Timestamp {
        self.stage_started_at
    }

    pub fn active_ministry_id(&self) -> Option<&str> {
        self.state.active_ministry_id.as_deref()
    }

    pub fn active_ministry(&self) -> Option<&Ministry> {
        self.active_ministry_id().and_then(|id| self.find_ministry(id))
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.state.candidates
    }

    pub fn candidate(&self, id: Uuid) -> Option<&Candidate> {
        self.state.candidates.iter().find(|c| c.id == id)
    }

    pub fn vote_history(&self) -> &[Uuid] {
        &self.state.vote_history
    }

    pub fn results(&self) -> &[MinistryResult] {
        &self.state.results
    }

    pub fn result_for(&self, ministry_id: &str) -> Option<&MinistryResult> {
        self.state
            .results
            .iter()
            .find(|r| r.ministry_id == ministry_id)
    }

    pub fn church_name(&self) -> &str {
        &self.state.church_name
    }

    pub fn selected_ministry_ids(&self) -> &[String] {
        &self.state.selected_ministry_ids
    }

    pub fn custom_ministries(&self) -> &[Ministry] {
        &self.state.custom_ministries
    }

    pub fn pre_registration(&self, ministry_id: &str) -> Option<&PreRegistration> {
        self.state.pre_registrations.get(ministry_id)
    }

    pub fn seat_overrides(&self) -> &SeatOverrides {
        &self.state.seat_overrides
    }

    pub fn started_at(&self) -> Option<Timestamp> {
        self.state.started_at
    }

    pub fn is_closed(&self) -> bool {
        self.state.closed
    }

    // ── Ministries ──

    /// Built-in ministries followed by custom ones.
    pub fn available_ministries(&self) -> impl Iterator<Item = &Ministry> {
        catalog::built_in_ministries()
            .iter()
            .chain(self.state.custom_ministries.iter())
    }

    pub fn find_ministry(&self, id: &str) -> Option<&Ministry> {
        self.available_ministries().find(|m| m.id == id)
    }

    /// The ministries this sitting votes on: the selection, or everything
    /// available when nothing is selected.
    pub fn visible_ministries(&self) -> Vec<&Ministry> {
        let selected = &self.state.selected_ministry_ids;
        self.available_ministries()
            .filter(|m| selected.is_empty() || selected.contains(&m.id))
            .collect()
    }

    pub fn is_selected(&self, ministry_id: &str) -> bool {
        self.state
            .selected_ministry_ids
            .iter()
            .any(|id| id == ministry_id)
    }

    pub fn status(&self, ministry_id: &str) -> MinistryStatus {
        if self.active_ministry_id() == Some(ministry_id) {
            MinistryStatus::Active(self.state.stage)
        } else if self.result_for(ministry_id).is_some() {
            MinistryStatus::Finalized
        } else {
            MinistryStatus::Pending
        }
    }

    /// Effective number of seats for a ministry, see [`catalog::seat_count`].
    pub fn seat_count(&self, ministry_id: &str) -> u32 {
        catalog::seat_count(
            ministry_id,
            &self.state.seat_overrides,
            &self.state.custom_ministries,
        )
    }

    // ── Derived metrics ──

    /// Visible ministries that have a result.
    pub fn finalized_count(&self) -> usize {
        let visible: HashSet<&str> = self
            .visible_ministries()
            .into_iter()
            .map(|m| m.id.as_str())
            .collect();
        self.state
            .results
            .iter()
            .filter(|r| visible.contains(r.ministry_id.as_str()))
            .count()
    }

    pub fn completion_percentage(&self) -> u32 {
        metrics::completion_percentage(self.finalized_count(), self.visible_ministries().len())
    }

    pub fn estimated_remaining_seconds(&self) -> u64 {
        metrics::estimated_remaining_seconds(
            &self.state.results,
            self.finalized_count(),
            self.visible_ministries().len(),
        )
    }

    /// Names worth offering while nominating for the active ministry:
    /// its pre-registered people, then everyone who stood in earlier
    /// rounds. Names already in the round are left out, ignoring case.
    pub fn suggestions(&self) -> Vec<String> {
        let Some(active) = self.active_ministry_id() else {
            return Vec::new();
        };

        let mut seen: HashSet<String> = self
            .state
            .candidates
            .iter()
            .map(|c| c.name.to_lowercase())
            .collect();

        let pre_registered = self
            .state
            .pre_registrations
            .get(active)
            .into_iter()
            .flat_map(PreRegistration::names);
        let previous = self
            .state
            .results
            .iter()
            .flat_map(|r| r.candidates.iter().map(|c| c.name.as_str()));

        pre_registered
            .chain(previous)
            .filter(|name| seen.insert(name.to_lowercase()))
            .map(str::to_string)
            .collect()
    }

    // ── Stage transitions ──

    /// Makes `ministry_id` the active ministry at `Explanation`, with an
    /// empty round. Any round in progress is discarded.
    ///
    /// Does nothing if the id isn't a known ministry.
    pub fn select_ministry(&mut self, ministry_id: &str) {
        if self.find_ministry(ministry_id).is_none() {
            debug!("select_ministry: unknown ministry {ministry_id}");
            return;
        }
        self.state.active_ministry_id = Some(ministry_id.to_string());
        self.state.stage = Stage::Explanation;
        self.state.candidates.clear();
        self.state.vote_history.clear();
        self.restart_stage_clock();
        self.persist_round();
        info!("ministry {ministry_id} selected");
    }

    /// Moves one stage forward. Does nothing at `Voting` or with no
    /// active ministry.
    pub fn advance_stage(&mut self) {
        if self.state.active_ministry_id.is_none() {
            return;
        }
        let Some(next) = self.state.stage.next() else {
            return;
        };
        self.state.stage = next;
        self.restart_stage_clock();
        self.store.save(keys::STAGE, &self.state.stage);
        debug!("advanced to {next:?}");
    }

    /// Moves one stage back. At `Explanation` this cancels the ministry.
    pub fn retreat_stage(&mut self) {
        if self.state.active_ministry_id.is_none() {
            return;
        }
        match self.state.stage.previous() {
            Some(previous) => {
                self.state.stage = previous;
                self.restart_stage_clock();
                self.store.save(keys::STAGE, &self.state.stage);
                debug!("retreated to {previous:?}");
            }
            None => self.cancel_ministry(),
        }
    }

    /// Deactivates the current ministry and discards its round.
    pub fn cancel_ministry(&mut self) {
        if let Some(id) = &self.state.active_ministry_id {
            info!("ministry {id} cancelled");
        }
        self.end_round();
    }

    // ── Reset ──

    /// Forgets everything: round, results and configuration.
    pub fn reset_system(&mut self) {
        self.state = CommitteeState::default();
        for key in keys::ALL {
            self.store.clear(key);
        }
        self.restart_stage_clock();
        info!("committee reset");
    }

    // ── Internals ──

    fn restart_stage_clock(&mut self) {
        self.stage_started_at = self.clock.now();
    }

    /// Clears the active ministry and its round.
    fn end_round(&mut self) {
        self.state.active_ministry_id = None;
        self.state.stage = Stage::Explanation;
        self.state.candidates.clear();
        self.state.vote_history.clear();
        self.persist_round();
    }

    fn persist_round(&mut self) {
        self.store
            .save(keys::ACTIVE_MINISTRY, &self.state.active_ministry_id);
        self.store.save(keys::STAGE, &self.state.stage);
        self.persist_candidates();
    }

    fn persist_candidates(&mut self) {
        self.store.save(keys::CANDIDATES, &self.state.candidates);
        self.store.save(keys::VOTE_HISTORY, &self.state.vote_history);
    }

    fn persist_results(&mut self) {
        self.store.save(keys::RESULTS, &self.state.results);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;

    use jiff::Timestamp;

    use crate::clock::ManualClock;
    use crate::notify::{CompletionNotice, Notifier, NotifyError};
    use crate::store::MemoryStore;

    use super::Committee;

    /// Records every notice, optionally failing delivery.
    #[derive(Debug, Default)]
    pub struct RecordingNotifier {
        pub sent: RefCell<Vec<CompletionNotice>>,
        pub fail: bool,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notice: &CompletionNotice) -> Result<(), NotifyError> {
            self.sent.borrow_mut().push(notice.clone());
            if self.fail {
                return Err(NotifyError::Failed {
                    program: "test".into(),
                    status: "exit status: 1".into(),
                });
            }
            Ok(())
        }
    }

    pub type TestCommittee = Committee<MemoryStore, RecordingNotifier, ManualClock>;

    pub fn start() -> Timestamp {
        Timestamp::from_second(1_700_000_000).unwrap()
    }

    pub fn test_committee() -> TestCommittee {
        load(MemoryStore::new())
    }

    pub fn load(store: MemoryStore) -> TestCommittee {
        Committee::load_with(store, RecordingNotifier::default(), ManualClock::new(start()))
    }

    /// Reloads from a copy of the committee's store, as a browser reload would.
    pub fn reload(committee: &TestCommittee) -> TestCommittee {
        load(committee.store().clone())
    }
}
