//! Committee configuration: church, ministry selection, custom ministries,
//! pre-registration, seat overrides, and the committee clock.

use log::{debug, info, warn};
use uuid::Uuid;

use crate::clock::{Clock, elapsed_seconds};
use crate::model::{Category, Ministry, Seat, SeatKind};
use crate::notify::{CompletionNotice, Notifier};
use crate::store::{KeyValueStore, Slots};
use crate::validate::MAX_CUSTOM_SEATS;

use super::{Committee, keys};

impl<S: KeyValueStore, N: Notifier, C: Clock> Committee<S, N, C> {
    pub fn set_church_name(&mut self, name: &str) {
        self.state.church_name = name.to_string();
        self.store.save(keys::CHURCH_NAME, &self.state.church_name);
    }

    // ── Selection ──

    /// Adds the ministry to the selection, or removes it if already there.
    /// Unknown ids are ignored.
    pub fn toggle_ministry_selected(&mut self, ministry_id: &str) {
        if let Some(pos) = self
            .state
            .selected_ministry_ids
            .iter()
            .position(|id| id == ministry_id)
        {
            self.state.selected_ministry_ids.remove(pos);
        } else if self.find_ministry(ministry_id).is_some() {
            self.state
                .selected_ministry_ids
                .push(ministry_id.to_string());
        } else {
            debug!("toggle_ministry_selected: unknown ministry {ministry_id}");
            return;
        }
        self.persist_selection();
    }

    /// Selects every available ministry, custom ones included.
    pub fn select_all_ministries(&mut self) {
        self.state.selected_ministry_ids = self.available_ministries().map(|m| m.id.clone()).collect();
        self.persist_selection();
    }

    pub fn deselect_all_ministries(&mut self) {
        self.state.selected_ministry_ids.clear();
        self.persist_selection();
    }

    // ── Custom ministries ──

    /// Creates a custom ministry with `seat_count` numbered seats and
    /// selects it. Returns its id.
    ///
    /// The seat count is clamped to `1..=MAX_CUSTOM_SEATS`, the same
    /// limits [`crate::validate::custom_ministry`] checks in a front end.
    pub fn add_custom_ministry(&mut self, name: &str, description: &str, seat_count: u32) -> String {
        let id = format!("custom-{}", Uuid::new_v4());
        let seats = (1..=seat_count.clamp(1, MAX_CUSTOM_SEATS))
            .map(|n| Seat {
                id: format!("{id}-seat-{n}"),
                name: format!("{} {n}", name.trim()),
                kind: SeatKind::Principal,
            })
            .collect();
        self.state.custom_ministries.push(Ministry {
            id: id.clone(),
            name: name.trim().to_string(),
            description: description.trim().to_string(),
            explanation: description.trim().to_string(),
            category: Category::Custom,
            seats,
        });
        self.state.selected_ministry_ids.push(id.clone());
        self.store
            .save(keys::CUSTOM, &self.state.custom_ministries);
        self.persist_selection();
        info!("custom ministry {id} created");
        id
    }

    /// Deletes a custom ministry and deselects it. If it was being voted,
    /// its round is discarded. Built-in ministries can't be removed.
    ///
    /// Returns whether a custom ministry was removed.
    pub fn remove_custom_ministry(&mut self, ministry_id: &str) -> bool {
        let before = self.state.custom_ministries.len();
        self.state
            .custom_ministries
            .retain(|m| m.id != ministry_id);
        if self.state.custom_ministries.len() == before {
            return false;
        }
        self.state
            .selected_ministry_ids
            .retain(|id| id != ministry_id);
        if self.active_ministry_id() == Some(ministry_id) {
            self.end_round();
        }
        self.store
            .save(keys::CUSTOM, &self.state.custom_ministries);
        self.persist_selection();
        info!("custom ministry {ministry_id} removed");
        true
    }

    // ── Pre-registration ──

    /// Records who leads the ministry today. A blank associate is stored
    /// as none. Interested people already on record are kept.
    pub fn set_current_leadership(
        &mut self,
        ministry_id: &str,
        director: &str,
        associate_director: Option<&str>,
    ) {
        let entry = self
            .state
            .pre_registrations
            .entry(ministry_id.to_string())
            .or_default();
        entry.current_director = director.trim().to_string();
        entry.associate_director = associate_director
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string);
        self.persist_pre_registrations();
    }

    /// Adds someone who wants to serve. Exact duplicates are ignored.
    pub fn add_interested_person(&mut self, ministry_id: &str, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        let entry = self
            .state
            .pre_registrations
            .entry(ministry_id.to_string())
            .or_default();
        if entry.interested.iter().any(|n| n == name) {
            return;
        }
        entry.interested.push(name.to_string());
        self.persist_pre_registrations();
    }

    pub fn remove_interested_person(&mut self, ministry_id: &str, name: &str) {
        let Some(entry) = self.state.pre_registrations.get_mut(ministry_id) else {
            return;
        };
        let before = entry.interested.len();
        entry.interested.retain(|n| n != name);
        if entry.interested.len() != before {
            self.persist_pre_registrations();
        }
    }

    /// Stores a seat count for any ministry. Only ministries with a
    /// configurable panel consult it.
    pub fn set_seat_count_override(&mut self, ministry_id: &str, count: u32) {
        self.state
            .seat_overrides
            .insert(ministry_id.to_string(), count);
        self.store
            .save(keys::SEAT_OVERRIDES, &self.state.seat_overrides);
    }

    // ── Explanations ──

    /// Remembers that the ministry's explanation has been read out.
    pub fn mark_explained(&mut self, ministry_id: &str) {
        if self.was_explained(ministry_id) {
            return;
        }
        self.state
            .explained_ministry_ids
            .push(ministry_id.to_string());
        self.store
            .save(keys::EXPLAINED, &self.state.explained_ministry_ids);
    }

    pub fn was_explained(&self, ministry_id: &str) -> bool {
        self.state
            .explained_ministry_ids
            .iter()
            .any(|id| id == ministry_id)
    }

    // ── Committee clock ──

    /// Starts the committee clock. Later calls leave it running from the
    /// first start.
    pub fn start_committee_clock(&mut self) {
        if self.state.started_at.is_some() {
            return;
        }
        let now = self.clock.now();
        self.state.started_at = Some(now);
        self.store.save(keys::STARTED_AT, &self.state.started_at);
        info!("committee started at {now}");
    }

    /// Marks the committee closed and, the first time only, sends the
    /// completion notice. A failed delivery is logged; the committee is
    /// closed either way.
    pub fn close_committee(&mut self) {
        self.state.closed = true;
        self.store.save(keys::CLOSED, &true);

        if self.state.notified {
            return;
        }
        let elapsed = self
            .state
            .started_at
            .map_or(0, |start| elapsed_seconds(start, self.clock.now()));
        let notice = CompletionNotice {
            church_name: self.state.church_name.clone(),
            elapsed_seconds: elapsed,
        };
        if let Err(e) = self.notifier.notify(&notice) {
            warn!("completion notice not delivered: {e}");
        }
        self.state.notified = true;
        self.store.save(keys::NOTIFIED, &true);
        info!("committee closed after {elapsed}s");
    }

    fn persist_selection(&mut self) {
        self.store
            .save(keys::SELECTED, &self.state.selected_ministry_ids);
    }

    fn persist_pre_registrations(&mut self) {
        self.store
            .save(keys::PRE_REGISTRATIONS, &self.state.pre_registrations);
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;

    use crate::catalog;
    use crate::model::PreRegistration;

    #[test]
    fn church_name_persists() {
        let mut committee = test_committee();
        committee.set_church_name("Central Church");

        assert_eq!(committee.church_name(), "Central Church");
        assert_eq!(reload(&committee).church_name(), "Central Church");
    }

    #[test]
    fn toggle_selects_and_deselects() {
        let mut committee = test_committee();
        committee.toggle_ministry_selected("musica");
        assert!(committee.is_selected("musica"));
        committee.toggle_ministry_selected("musica");
        assert!(!committee.is_selected("musica"));
    }

    #[test]
    fn toggle_unknown_is_noop() {
        let mut committee = test_committee();
        committee.toggle_ministry_selected("nope");
        assert!(committee.selected_ministry_ids().is_empty());
    }

    #[test]
    fn select_all_and_deselect_all() {
        let mut committee = test_committee();
        committee.add_custom_ministry("Drama", "Plays", 2);
        committee.select_all_ministries();
        assert_eq!(
            committee.selected_ministry_ids().len(),
            catalog::built_in_ministries().len() + 1
        );

        committee.deselect_all_ministries();
        assert!(committee.selected_ministry_ids().is_empty());
        // Empty selection means everything is in play.
        assert_eq!(
            committee.visible_ministries().len(),
            catalog::built_in_ministries().len() + 1
        );
    }

    #[test]
    fn custom_ministry_is_created_and_selected() {
        let mut committee = test_committee();
        let id = committee.add_custom_ministry(" Drama ", "Church plays", 3);

        let ministry = committee.find_ministry(&id).unwrap();
        assert_eq!(ministry.name, "Drama");
        assert_eq!(ministry.category, Category::Custom);
        assert_eq!(ministry.seats.len(), 3);
        assert_eq!(ministry.seats[0].name, "Drama 1");
        assert!(committee.is_selected(&id));
        assert_eq!(committee.seat_count(&id), 3);
    }

    #[test]
    fn custom_ministry_with_zero_seats_gets_one() {
        let mut committee = test_committee();
        let id = committee.add_custom_ministry("Drama", "Plays", 0);
        assert_eq!(committee.seat_count(&id), 1);
    }

    #[test]
    fn custom_ministry_seats_are_capped() {
        let mut committee = test_committee();
        let id = committee.add_custom_ministry("Drama", "Plays", u32::MAX);

        assert_eq!(
            committee.find_ministry(&id).unwrap().seats.len(),
            MAX_CUSTOM_SEATS as usize
        );
        assert_eq!(committee.seat_count(&id), MAX_CUSTOM_SEATS);
    }

    #[test]
    fn custom_ministries_get_distinct_ids() {
        let mut committee = test_committee();
        let a = committee.add_custom_ministry("Drama", "Plays", 1);
        let b = committee.add_custom_ministry("Drama", "Plays", 1);
        assert_ne!(a, b);
    }

    #[test]
    fn remove_custom_ministry_deselects_it() {
        let mut committee = test_committee();
        let id = committee.add_custom_ministry("Drama", "Plays", 2);

        assert!(committee.remove_custom_ministry(&id));

        assert!(committee.find_ministry(&id).is_none());
        assert!(!committee.is_selected(&id));
        assert!(!committee.remove_custom_ministry(&id));
    }

    #[test]
    fn built_in_ministry_cannot_be_removed() {
        let mut committee = test_committee();
        assert!(!committee.remove_custom_ministry("musica"));
        assert!(committee.find_ministry("musica").is_some());
    }

    #[test]
    fn removing_active_custom_ministry_discards_round() {
        let mut committee = test_committee();
        let id = committee.add_custom_ministry("Drama", "Plays", 2);
        committee.select_ministry(&id);
        committee.advance_stage();
        committee.add_candidate("Alice");

        committee.remove_custom_ministry(&id);

        assert!(committee.active_ministry_id().is_none());
        assert!(committee.candidates().is_empty());
    }

    #[test]
    fn leadership_keeps_interested_people() {
        let mut committee = test_committee();
        committee.add_interested_person("musica", "Grace");
        committee.set_current_leadership("musica", " Erin ", Some("  "));

        assert_eq!(
            committee.pre_registration("musica"),
            Some(&PreRegistration {
                current_director: "Erin".into(),
                associate_director: None,
                interested: vec!["Grace".into()],
            })
        );
    }

    #[test]
    fn interested_people_are_exact_match_unique() {
        let mut committee = test_committee();
        committee.add_interested_person("musica", "Grace");
        committee.add_interested_person("musica", "Grace");
        committee.add_interested_person("musica", "grace");
        committee.add_interested_person("musica", "   ");

        let interested = &committee.pre_registration("musica").unwrap().interested;
        assert_eq!(interested, &vec!["Grace".to_string(), "grace".to_string()]);

        committee.remove_interested_person("musica", "Grace");
        committee.remove_interested_person("saude", "Grace");
        let interested = &committee.pre_registration("musica").unwrap().interested;
        assert_eq!(interested, &vec!["grace".to_string()]);
    }

    #[test]
    fn seat_override_only_matters_where_configurable() {
        let mut committee = test_committee();
        committee.set_seat_count_override("anciao", 6);
        committee.set_seat_count_override("desbravadores", 9);
        committee.set_seat_count_override("musica", 9);

        assert_eq!(committee.seat_count("anciao"), 6);
        assert_eq!(committee.seat_count("desbravadores"), 3);
        assert_eq!(committee.seat_count("musica"), 2);
        assert_eq!(committee.seat_overrides().len(), 3);
    }

    #[test]
    fn explained_ministries() {
        let mut committee = test_committee();
        assert!(!committee.was_explained("musica"));
        committee.mark_explained("musica");
        committee.mark_explained("musica");
        assert!(committee.was_explained("musica"));
        assert_eq!(committee.state().explained_ministry_ids.len(), 1);
        assert!(reload(&committee).was_explained("musica"));
    }

    #[test]
    fn committee_clock_starts_once() {
        let mut committee = test_committee();
        committee.start_committee_clock();
        let first = committee.started_at().unwrap();
        committee.clock().advance(100);
        committee.start_committee_clock();

        assert_eq!(committee.started_at(), Some(first));
    }

    #[test]
    fn close_sends_one_notice() {
        let mut committee = test_committee();
        committee.set_church_name("Central Church");
        committee.start_committee_clock();
        committee.clock().advance(3_723);

        committee.close_committee();
        committee.close_committee();

        assert!(committee.is_closed());
        let sent = committee.notifier().sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].church_name, "Central Church");
        assert_eq!(sent[0].elapsed_seconds, 3_723);
    }

    #[test]
    fn close_without_start_reports_zero() {
        let mut committee = test_committee();
        committee.close_committee();
        assert_eq!(committee.notifier().sent.borrow()[0].elapsed_seconds, 0);
    }

    #[test]
    fn notice_is_not_resent_after_reload() {
        let mut committee = test_committee();
        committee.close_committee();

        let mut reloaded = reload(&committee);
        reloaded.close_committee();

        assert!(reloaded.is_closed());
        assert!(reloaded.notifier().sent.borrow().is_empty());
    }

    #[test]
    fn failed_notice_still_closes() {
        let mut committee = Committee::load_with(
            crate::store::MemoryStore::new(),
            RecordingNotifier {
                fail: true,
                ..RecordingNotifier::default()
            },
            crate::clock::ManualClock::new(start()),
        );

        committee.close_committee();
        committee.close_committee();

        assert!(committee.is_closed());
        assert!(committee.state().notified);
        assert_eq!(committee.notifier().sent.borrow().len(), 1);
    }
}
