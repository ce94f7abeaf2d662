//! The results report: what a document generator needs once the
//! committee has voted.
//!
//! Nothing here mutates the committee. Reports are plain serde values so
//! the shell can print them as text or JSON.

use jiff::Timestamp;
use serde::Serialize;

use crate::clock::Clock;
use crate::model::{Candidate, MinistryResult};
use crate::notify::Notifier;
use crate::session::Committee;
use crate::store::KeyValueStore;

/// One line of a vote tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyLine {
    pub name: String,
    pub votes: u32,
    /// Share of the round's votes, rounded half up. Zero with no votes.
    pub percent: u32,
}

/// Candidates by votes, highest first. Equal counts keep nomination order.
pub fn tally(candidates: &[Candidate]) -> Vec<TallyLine> {
    let total: u64 = candidates.iter().map(|c| u64::from(c.votes)).sum();
    let mut sorted: Vec<&Candidate> = candidates.iter().collect();
    sorted.sort_by(|a, b| b.votes.cmp(&a.votes));
    sorted
        .into_iter()
        .map(|c| TallyLine {
            name: c.name.clone(),
            votes: c.votes,
            percent: share(u64::from(c.votes), total),
        })
        .collect()
}

fn share(part: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    let percent = (200 * part + total) / (2 * total);
    u32::try_from(percent).unwrap_or(100)
}

/// The people a result elects: the top `seat_count` candidates by votes.
///
/// Zero counts are not skipped; a panel of three with two voted
/// candidates and one unvoted elects all three.
pub fn elected(result: &MinistryResult, seat_count: u32) -> Vec<&Candidate> {
    let mut sorted: Vec<&Candidate> = result.candidates.iter().collect();
    sorted.sort_by(|a, b| b.votes.cmp(&a.votes));
    sorted.truncate(usize::try_from(seat_count).unwrap_or(usize::MAX));
    sorted
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEntry {
    pub ministry_id: String,
    pub ministry_name: String,
    pub seat_name: String,
    pub winner: Option<String>,
    pub elected: Vec<String>,
    pub tally: Vec<TallyLine>,
    pub seat_count: u32,
    pub elapsed_seconds: u64,
    pub closed_without_candidates: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub church_name: String,
    pub started_at: Option<Timestamp>,
    pub entries: Vec<ReportEntry>,
    /// Sum of seat counts over every result.
    pub total_elected: u32,
    /// Sum of the rounds' elapsed times.
    pub total_elapsed_seconds: u64,
}

/// Builds the report from the committee's results, in the order they
/// were recorded.
pub fn build<S, N, C>(committee: &Committee<S, N, C>) -> Report
where
    S: KeyValueStore,
    N: Notifier,
    C: Clock,
{
    let entries: Vec<ReportEntry> = committee
        .results()
        .iter()
        .map(|result| {
            let seat_count = committee.seat_count(&result.ministry_id);
            ReportEntry {
                ministry_id: result.ministry_id.clone(),
                ministry_name: result.ministry_name.clone(),
                seat_name: result.seat_name.clone(),
                winner: result.winner.clone(),
                elected: elected(result, seat_count)
                    .into_iter()
                    .map(|c| c.name.clone())
                    .collect(),
                tally: tally(&result.candidates),
                seat_count,
                elapsed_seconds: result.elapsed_seconds,
                closed_without_candidates: result.closed_without_candidates,
            }
        })
        .collect();

    Report {
        church_name: committee.church_name().to_string(),
        started_at: committee.started_at(),
        total_elected: entries.iter().map(|e| e.seat_count).sum(),
        total_elapsed_seconds: entries.iter().map(|e| e.elapsed_seconds).sum(),
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::*;

    fn candidate(name: &str, votes: u32) -> Candidate {
        Candidate {
            votes,
            ..Candidate::new(name)
        }
    }

    #[test]
    fn tally_sorts_by_votes_keeping_ties_in_order() {
        let lines = tally(&[candidate("A", 1), candidate("B", 2), candidate("C", 1)]);

        let names: Vec<&str> = lines.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
        assert_eq!(lines[0].percent, 50);
        assert_eq!(lines[1].percent, 25);
    }

    #[test]
    fn tally_rounds_shares() {
        let lines = tally(&[candidate("A", 2), candidate("B", 1)]);
        assert_eq!(lines[0].percent, 67);
        assert_eq!(lines[1].percent, 33);
    }

    #[test]
    fn tally_without_votes_is_zero_percent() {
        let lines = tally(&[candidate("A", 0), candidate("B", 0)]);
        assert!(lines.iter().all(|l| l.percent == 0));
        assert!(tally(&[]).is_empty());
    }

    #[test]
    fn elected_takes_top_seats_including_zero_counts() {
        let mut committee = test_committee();
        committee.select_ministry("desbravadores");
        committee.advance_stage();
        let a = committee.add_candidate("A").unwrap();
        let b = committee.add_candidate("B").unwrap();
        committee.add_candidate("C");
        committee.add_candidate("D");
        committee.advance_stage();
        committee.cast_vote(b);
        committee.cast_vote(b);
        committee.cast_vote(a);
        let result = committee.finalize_ministry().unwrap().clone();

        let names: Vec<&str> = elected(&result, 3).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
        assert_eq!(elected(&result, 10).len(), 4);
    }

    #[test]
    fn report_sums_seats_and_time() {
        let mut committee = test_committee();
        committee.set_church_name("Central Church");
        committee.start_committee_clock();

        committee.select_ministry("desbravadores");
        committee.advance_stage();
        let a = committee.add_candidate("Alice").unwrap();
        committee.advance_stage();
        committee.cast_vote(a);
        committee.clock().advance(90);
        committee.finalize_ministry();

        committee.select_ministry("saude");
        committee.clock().advance(30);
        committee.close_without_candidates();

        let report = build(&committee);

        assert_eq!(report.church_name, "Central Church");
        assert_eq!(report.started_at, Some(start()));
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.entries[0].winner.as_deref(), Some("Alice"));
        assert_eq!(report.entries[0].elected, vec!["Alice"]);
        assert!(report.entries[1].closed_without_candidates);
        assert!(report.entries[1].elected.is_empty());
        assert_eq!(report.total_elected, 3 + 2);
        assert_eq!(report.total_elapsed_seconds, 120);
    }

    #[test]
    fn report_serializes_camel_case() {
        let committee = test_committee();
        let json = serde_json::to_value(build(&committee)).unwrap();
        assert_eq!(json["totalElected"], 0);
        assert!(json["entries"].as_array().unwrap().is_empty());
    }
}
