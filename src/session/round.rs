//! Nomination and voting within the active ministry's round.

use log::{debug, info};
use uuid::Uuid;

use crate::clock::{Clock, elapsed_seconds};
use crate::model::{Candidate, MinistryResult};
use crate::notify::Notifier;
use crate::store::KeyValueStore;

use super::Committee;

impl<S: KeyValueStore, N: Notifier, C: Clock> Committee<S, N, C> {
    /// Nominates a candidate for the active ministry, with zero votes.
    ///
    /// The name is trimmed. Returns the new candidate's id, or `None` when
    /// the name is blank or no ministry is active. Length and uniqueness
    /// rules are not checked here, see [`crate::validate::candidate_name`].
    pub fn add_candidate(&mut self, name: &str) -> Option<Uuid> {
        let name = name.trim();
        if name.is_empty() || self.state.active_ministry_id.is_none() {
            return None;
        }
        let candidate = Candidate::new(name);
        let id = candidate.id;
        self.state.candidates.push(candidate);
        self.persist_candidates();
        debug!("candidate {name} nominated as {id}");
        Some(id)
    }

    /// Withdraws a candidate from the round, along with the undo entries
    /// for the votes it received. Returns whether it was present.
    pub fn remove_candidate(&mut self, candidate_id: Uuid) -> bool {
        let before = self.state.candidates.len();
        self.state.candidates.retain(|c| c.id != candidate_id);
        if self.state.candidates.len() == before {
            return false;
        }
        self.state.vote_history.retain(|id| *id != candidate_id);
        self.persist_candidates();
        debug!("candidate {candidate_id} withdrawn");
        true
    }

    /// Adds one vote and remembers it for undo. Returns whether the
    /// candidate was found.
    pub fn cast_vote(&mut self, candidate_id: Uuid) -> bool {
        let Some(candidate) = self
            .state
            .candidates
            .iter_mut()
            .find(|c| c.id == candidate_id)
        else {
            return false;
        };
        candidate.votes += 1;
        self.state.vote_history.push(candidate_id);
        self.persist_candidates();
        true
    }

    /// Takes back the most recent vote.
    ///
    /// The history entry is consumed even when there is nothing left to
    /// take back (the candidate's votes were reset to zero). Returns the
    /// consumed entry, or `None` when the history is empty.
    pub fn undo_last_vote(&mut self) -> Option<Uuid> {
        let candidate_id = self.state.vote_history.pop()?;
        if let Some(candidate) = self
            .state
            .candidates
            .iter_mut()
            .find(|c| c.id == candidate_id && c.votes > 0)
        {
            candidate.votes -= 1;
        }
        self.persist_candidates();
        Some(candidate_id)
    }

    /// Sets a candidate's votes back to zero. Returns whether it was found.
    ///
    /// Undo entries for the candidate stay in the history. Undoing one of
    /// them later finds zero votes and does nothing.
    pub fn reset_candidate_votes(&mut self, candidate_id: Uuid) -> bool {
        let Some(candidate) = self
            .state
            .candidates
            .iter_mut()
            .find(|c| c.id == candidate_id)
        else {
            return false;
        };
        candidate.votes = 0;
        self.persist_candidates();
        true
    }

    /// Total votes cast in the round.
    pub fn total_votes(&self) -> u32 {
        self.state.candidates.iter().map(|c| c.votes).sum()
    }

    /// The candidate currently leading: highest count, ties going to the
    /// one nominated first.
    pub fn leader(&self) -> Option<&Candidate> {
        leader(&self.state.candidates)
    }

    /// Ends the round with its tally and deactivates the ministry.
    ///
    /// Returns the recorded result, or `None` with no active ministry.
    /// Having at least one vote is the caller's precondition
    /// ([`crate::validate::ready_to_finalize`]); without votes the first
    /// candidate wins.
    pub fn finalize_ministry(&mut self) -> Option<&MinistryResult> {
        let winner = leader(&self.state.candidates).map(|c| c.name.clone());
        let candidates = self.state.candidates.clone();
        self.record_result(candidates, winner, false)
    }

    /// Ends the round with no candidates, recording that nobody stood.
    ///
    /// Returns the recorded result, or `None` with no active ministry.
    pub fn close_without_candidates(&mut self) -> Option<&MinistryResult> {
        self.record_result(Vec::new(), None, true)
    }

    /// Throws away a ministry's result and starts its round again from
    /// `Explanation`.
    pub fn reopen_nomination(&mut self, ministry_id: &str) {
        let before = self.state.results.len();
        self.state.results.retain(|r| r.ministry_id != ministry_id);
        if self.state.results.len() != before {
            self.persist_results();
            info!("result for {ministry_id} discarded");
        }
        self.select_ministry(ministry_id);
    }

    fn record_result(
        &mut self,
        candidates: Vec<Candidate>,
        winner: Option<String>,
        closed_without_candidates: bool,
    ) -> Option<&MinistryResult> {
        let ministry = self.active_ministry()?;
        let now = self.clock.now();
        let seat = ministry.first_seat();
        let result = MinistryResult {
            ministry_id: ministry.id.clone(),
            ministry_name: ministry.name.clone(),
            seat_id: seat.map(|s| s.id.clone()).unwrap_or_default(),
            seat_name: seat.map(|s| s.name.clone()).unwrap_or_default(),
            candidates,
            winner,
            recorded_at: now,
            elapsed_seconds: elapsed_seconds(self.stage_started_at, now),
            closed_without_candidates,
        };

        info!(
            "ministry {} {} after {}s, winner {:?}",
            result.ministry_id,
            if closed_without_candidates {
                "closed without candidates"
            } else {
                "finalized"
            },
            result.elapsed_seconds,
            result.winner
        );

        // One result per ministry.
        self.state
            .results
            .retain(|r| r.ministry_id != result.ministry_id);
        self.state.results.push(result);
        self.persist_results();
        self.end_round();
        self.state.results.last()
    }
}

/// Left fold over nomination order, replacing the leader only on a
/// strictly higher count.
fn leader(candidates: &[Candidate]) -> Option<&Candidate> {
    candidates
        .iter()
        .reduce(|best, c| if c.votes > best.votes { c } else { best })
}
