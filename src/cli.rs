//! CLI interface for Nominate.
//!
//! Each invocation is one operation on the committee stored in the
//! database: arguments in, the new state out. Commands follow the wizard:
//!
//! - `nominate setup ...` configures the sitting before it starts.
//! - `nominate start` checks readiness and starts the committee clock.
//! - `nominate select <ministry>`, `next`, `back`, `cancel` move through
//!   the stages of one ministry.
//! - `nominate candidate add|remove`, `vote`, `undo`, `reset-votes`,
//!   `finalize`, `close-empty` run the round.
//! - `nominate results|report|close` wrap up.
//!
//! Candidates are referenced by full id, unambiguous id prefix, or name.
//! Ministries by id or name.

mod format;

use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::catalog;
use crate::clock::Clock;
use crate::model::{Ministry, Stage};
use crate::notify::Notifier;
use crate::report;
use crate::session::Committee;
use crate::store::KeyValueStore;
use crate::validate;

use format::{format_candidates, format_duration_line, format_report, format_result, format_status};

/// Nominate: run a church nominating committee.
#[derive(Debug, Parser)]
#[command(name = "nominate", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r#"Workflow: one ministry
  1. nominate setup church "Central Church"
  2. nominate setup toggle musica
  3. nominate start
  4. nominate select musica           (explain the ministry)
  5. nominate next                    (nominations)
  6. nominate candidate add "Alice Moore"
  7. nominate next                    (voting)
  8. nominate vote alice
  9. nominate finalize

When every ministry is done:
  nominate report
  nominate close"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the sitting: church, ministries, seats, pre-registration.
    Setup {
        #[command(subcommand)]
        command: SetupCommand,
    },

    /// Check the sitting is ready and start the committee clock.
    Start,

    /// List the ministries in play with their status.
    Ministries {
        /// List every available ministry, not just the selected ones.
        #[arg(long)]
        all: bool,
    },

    /// Show progress and the active round.
    Status,

    /// Make a ministry active at the explanation stage.
    ///
    /// Discards any round in progress.
    Select {
        /// Ministry id or name.
        ministry: String,
    },

    /// Move to the next stage.
    Next,

    /// Move to the previous stage. At explanation this cancels the ministry.
    Back,

    /// Deactivate the current ministry and discard its round.
    Cancel,

    /// Nominate or withdraw candidates.
    Candidate {
        #[command(subcommand)]
        command: CandidateCommand,
    },

    /// Cast one vote.
    Vote {
        /// Candidate id, id prefix, or name.
        candidate: String,
    },

    /// Take back the most recent vote.
    Undo,

    /// Set a candidate's votes back to zero.
    ResetVotes {
        /// Candidate id, id prefix, or name.
        candidate: String,
    },

    /// Record the round's result and deactivate the ministry.
    Finalize,

    /// Record that nobody stood for the active ministry.
    CloseEmpty,

    /// Discard a ministry's result and vote it again.
    Reopen {
        /// Ministry id or name.
        ministry: String,
    },

    /// List the results recorded so far.
    Results {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Print the results report.
    Report {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Close the committee and send the completion notice.
    Close,

    /// Forget everything: results, round, and configuration.
    Reset {
        /// Confirm the reset.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum SetupCommand {
    /// Set the church name.
    Church { name: String },

    /// Select or deselect a ministry.
    Toggle {
        /// Ministry id or name.
        ministry: String,
    },

    /// Select every available ministry.
    SelectAll,

    /// Clear the selection.
    DeselectAll,

    /// Create a ministry that isn't in the catalog. Prints its id.
    AddCustom {
        name: String,
        description: String,

        /// Number of seats on the panel.
        #[arg(long, default_value_t = 1)]
        seats: u32,
    },

    /// Delete a custom ministry.
    RemoveCustom {
        /// Ministry id or name.
        ministry: String,
    },

    /// Set the panel size of a ministry with a configurable panel.
    Seats {
        /// Ministry id or name.
        ministry: String,
        count: u32,
    },

    /// Record who leads a ministry today.
    Leadership {
        /// Ministry id or name.
        ministry: String,
        director: String,

        #[arg(long)]
        associate: Option<String>,
    },

    /// Record someone interested in serving.
    InterestedAdd {
        /// Ministry id or name.
        ministry: String,
        name: String,
    },

    /// Remove someone from a ministry's interested list.
    InterestedRemove {
        /// Ministry id or name.
        ministry: String,
        name: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum CandidateCommand {
    /// Nominate someone. Prints the candidate id.
    Add { name: String },

    /// Withdraw a candidate and the votes it received.
    Remove {
        /// Candidate id, id prefix, or name.
        candidate: String,
    },
}

/// Run a parsed command against the committee, returning an error message
/// on failure.
pub fn run<S, N, C>(cli: Cli, committee: &mut Committee<S, N, C>) -> Result<(), String>
where
    S: KeyValueStore,
    N: Notifier,
    C: Clock,
{
    match cli.command {
        Command::Setup { command } => cmd_setup(committee, command),
        Command::Start => {
            validate::ready_to_start(committee.church_name(), committee.selected_ministry_ids())
                .map_err(|e| e.to_string())?;
            committee.start_committee_clock();
            println!(
                "{} started with {} ministries",
                committee.church_name(),
                committee.visible_ministries().len()
            );
            Ok(())
        }
        Command::Ministries { all } => {
            cmd_ministries(committee, all);
            Ok(())
        }
        Command::Status => {
            print!("{}", format_status(committee));
            Ok(())
        }
        Command::Select { ministry } => {
            let id = resolve_ministry(committee, &ministry)?.id.clone();
            if committee.is_closed() {
                return Err("the committee is closed".to_string());
            }
            committee.select_ministry(&id);
            if let Some(m) = committee.active_ministry() {
                println!("{}\n\n{}", m.name, m.explanation);
            }
            committee.mark_explained(&id);
            Ok(())
        }
        Command::Next => {
            require_active(committee)?;
            if committee.stage() == Stage::Nomination {
                validate::ready_to_vote(committee.candidates()).map_err(|e| e.to_string())?;
            }
            committee.advance_stage();
            println!("{}", format::format_stage(committee.stage()));
            Ok(())
        }
        Command::Back => {
            require_active(committee)?;
            committee.retreat_stage();
            match committee.active_ministry_id() {
                Some(_) => println!("{}", format::format_stage(committee.stage())),
                None => println!("Ministry cancelled"),
            }
            Ok(())
        }
        Command::Cancel => {
            require_active(committee)?;
            committee.cancel_ministry();
            println!("Ministry cancelled");
            Ok(())
        }
        Command::Candidate { command } => cmd_candidate(committee, command),
        Command::Vote { candidate } => {
            require_stage(committee, Stage::Voting)?;
            let id = resolve_candidate(committee, &candidate)?;
            committee.cast_vote(id);
            print!("{}", format_candidates(committee.candidates()));
            Ok(())
        }
        Command::Undo => {
            require_stage(committee, Stage::Voting)?;
            if committee.undo_last_vote().is_none() {
                return Err("no votes to undo".to_string());
            }
            print!("{}", format_candidates(committee.candidates()));
            Ok(())
        }
        Command::ResetVotes { candidate } => {
            require_stage(committee, Stage::Voting)?;
            let id = resolve_candidate(committee, &candidate)?;
            committee.reset_candidate_votes(id);
            print!("{}", format_candidates(committee.candidates()));
            Ok(())
        }
        Command::Finalize => {
            require_stage(committee, Stage::Voting)?;
            validate::ready_to_finalize(committee.candidates()).map_err(|e| e.to_string())?;
            let result = committee
                .finalize_ministry()
                .ok_or("no active ministry")?;
            print!("{}", format_result(result));
            Ok(())
        }
        Command::CloseEmpty => {
            require_active(committee)?;
            let result = committee
                .close_without_candidates()
                .ok_or("no active ministry")?;
            print!("{}", format_result(result));
            Ok(())
        }
        Command::Reopen { ministry } => {
            let id = resolve_ministry(committee, &ministry)?.id.clone();
            if committee.result_for(&id).is_none() {
                return Err(format!("{id} has no result to reopen"));
            }
            committee.reopen_nomination(&id);
            println!("{id} reopened");
            Ok(())
        }
        Command::Results { json } => {
            if json {
                let out = serde_json::to_string_pretty(committee.results())
                    .map_err(|e| format!("failed to serialize results: {e}"))?;
                println!("{out}");
            } else if committee.results().is_empty() {
                println!("No results");
            } else {
                for result in committee.results() {
                    print!("{}", format_result(result));
                }
            }
            Ok(())
        }
        Command::Report { json } => {
            let report = report::build(committee);
            if json {
                let out = serde_json::to_string_pretty(&report)
                    .map_err(|e| format!("failed to serialize report: {e}"))?;
                println!("{out}");
            } else {
                print!("{}", format_report(&report));
            }
            Ok(())
        }
        Command::Close => {
            committee.close_committee();
            println!(
                "Committee closed. {}",
                format_duration_line(committee.started_at(), committee.clock().now())
            );
            Ok(())
        }
        Command::Reset { yes } => {
            if !yes {
                return Err("reset forgets everything; pass --yes to confirm".to_string());
            }
            committee.reset_system();
            println!("Committee reset");
            Ok(())
        }
    }
}

fn cmd_setup<S, N, C>(committee: &mut Committee<S, N, C>, command: SetupCommand) -> Result<(), String>
where
    S: KeyValueStore,
    N: Notifier,
    C: Clock,
{
    match command {
        SetupCommand::Church { name } => {
            let name = name.trim();
            if name.is_empty() {
                return Err(validate::ValidationError::MissingChurchName.to_string());
            }
            committee.set_church_name(name);
        }
        SetupCommand::Toggle { ministry } => {
            let id = resolve_ministry(committee, &ministry)?.id.clone();
            committee.toggle_ministry_selected(&id);
            let state = if committee.is_selected(&id) {
                "selected"
            } else {
                "deselected"
            };
            println!("{id} {state}");
        }
        SetupCommand::SelectAll => committee.select_all_ministries(),
        SetupCommand::DeselectAll => committee.deselect_all_ministries(),
        SetupCommand::AddCustom {
            name,
            description,
            seats,
        } => {
            validate::custom_ministry(&name, &description, seats).map_err(|e| e.to_string())?;
            let id = committee.add_custom_ministry(&name, &description, seats);
            println!("{id}");
        }
        SetupCommand::RemoveCustom { ministry } => {
            let id = resolve_ministry(committee, &ministry)?.id.clone();
            if !committee.remove_custom_ministry(&id) {
                return Err(format!("{id} is not a custom ministry"));
            }
        }
        SetupCommand::Seats { ministry, count } => {
            let id = resolve_ministry(committee, &ministry)?.id.clone();
            if !catalog::has_configurable_seats(&id) {
                return Err(format!(
                    "{id} has a fixed panel of {}",
                    committee.seat_count(&id)
                ));
            }
            if count == 0 {
                return Err("seat count must be at least 1".to_string());
            }
            committee.set_seat_count_override(&id, count);
        }
        SetupCommand::Leadership {
            ministry,
            director,
            associate,
        } => {
            let id = resolve_ministry(committee, &ministry)?.id.clone();
            let director = validate::person_name(&director).map_err(|e| e.to_string())?;
            let associate = associate
                .as_deref()
                .filter(|a| !a.trim().is_empty())
                .map(validate::person_name)
                .transpose()
                .map_err(|e| e.to_string())?;
            committee.set_current_leadership(&id, director, associate);
        }
        SetupCommand::InterestedAdd { ministry, name } => {
            let id = resolve_ministry(committee, &ministry)?.id.clone();
            let name = validate::person_name(&name).map_err(|e| e.to_string())?;
            committee.add_interested_person(&id, name);
        }
        SetupCommand::InterestedRemove { ministry, name } => {
            let id = resolve_ministry(committee, &ministry)?.id.clone();
            committee.remove_interested_person(&id, name.trim());
        }
    }
    Ok(())
}

fn cmd_candidate<S, N, C>(
    committee: &mut Committee<S, N, C>,
    command: CandidateCommand,
) -> Result<(), String>
where
    S: KeyValueStore,
    N: Notifier,
    C: Clock,
{
    require_stage(committee, Stage::Nomination)?;
    match command {
        CandidateCommand::Add { name } => {
            let name = validate::candidate_name(&name, committee.candidates())
                .map_err(|e| e.to_string())?;
            let id = committee
                .add_candidate(name)
                .ok_or("no active ministry")?;
            println!("{id}");
        }
        CandidateCommand::Remove { candidate } => {
            let id = resolve_candidate(committee, &candidate)?;
            committee.remove_candidate(id);
            print!("{}", format_candidates(committee.candidates()));
        }
    }
    Ok(())
}

fn cmd_ministries<S, N, C>(committee: &Committee<S, N, C>, all: bool)
where
    S: KeyValueStore,
    N: Notifier,
    C: Clock,
{
    let ministries: Vec<&Ministry> = if all {
        committee.available_ministries().collect()
    } else {
        committee.visible_ministries()
    };
    for m in ministries {
        let mark = if committee.is_selected(&m.id) { "*" } else { " " };
        println!(
            "{mark} {:<28} {:<12} seats {:>2}  {}",
            m.id,
            format::format_ministry_status(committee.status(&m.id)),
            committee.seat_count(&m.id),
            m.name
        );
    }
}

fn require_active<S, N, C>(committee: &Committee<S, N, C>) -> Result<(), String>
where
    S: KeyValueStore,
    N: Notifier,
    C: Clock,
{
    if committee.active_ministry_id().is_none() {
        return Err("no ministry selected; use `nominate select <ministry>`".to_string());
    }
    Ok(())
}

fn require_stage<S, N, C>(committee: &Committee<S, N, C>, stage: Stage) -> Result<(), String>
where
    S: KeyValueStore,
    N: Notifier,
    C: Clock,
{
    require_active(committee)?;
    if committee.stage() != stage {
        return Err(format!(
            "this command needs the {} stage, the ministry is at {}",
            format::stage_name(stage),
            format::stage_name(committee.stage())
        ));
    }
    Ok(())
}

/// Resolve a ministry by exact id, then by case-insensitive name.
fn resolve_ministry<'a, S, N, C>(
    committee: &'a Committee<S, N, C>,
    reference: &str,
) -> Result<&'a Ministry, String>
where
    S: KeyValueStore,
    N: Notifier,
    C: Clock,
{
    if let Some(m) = committee.find_ministry(reference) {
        return Ok(m);
    }
    let lowered = reference.trim().to_lowercase();
    committee
        .available_ministries()
        .find(|m| m.name.to_lowercase() == lowered)
        .ok_or_else(|| format!("no ministry matching '{reference}'"))
}

/// Resolve a candidate in the round by full id, unambiguous id prefix, or
/// case-insensitive name.
fn resolve_candidate<S, N, C>(committee: &Committee<S, N, C>, reference: &str) -> Result<Uuid, String>
where
    S: KeyValueStore,
    N: Notifier,
    C: Clock,
{
    let candidates = committee.candidates();
    if reference.trim().is_empty() {
        return Err(format!("no candidate matching '{reference}'"));
    }

    // Try full UUID first.
    if let Ok(id) = reference.parse::<Uuid>() {
        return candidates
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.id)
            .ok_or_else(|| format!("candidate {id} is not in this round"));
    }

    let lowered = reference.trim().to_lowercase();
    if let Some(c) = candidates.iter().find(|c| c.name.to_lowercase() == lowered) {
        return Ok(c.id);
    }

    let matches: Vec<Uuid> = candidates
        .iter()
        .map(|c| c.id)
        .filter(|id| id.to_string().starts_with(&lowered))
        .collect();

    match matches.as_slice() {
        [] => Err(format!("no candidate matching '{reference}'")),
        [id] => Ok(*id),
        many => Err(format!(
            "'{reference}' is ambiguous: matches {} candidates",
            many.len()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("nominate").chain(args.iter().copied())).unwrap()
    }

    fn exec(committee: &mut TestCommittee, args: &[&str]) -> Result<(), String> {
        run(parse(args), committee)
    }

    fn voting_on_music(committee: &mut TestCommittee) {
        exec(committee, &["select", "musica"]).unwrap();
        exec(committee, &["next"]).unwrap();
        exec(committee, &["candidate", "add", "Alice Moore"]).unwrap();
        exec(committee, &["candidate", "add", "Bob Stone"]).unwrap();
        exec(committee, &["next"]).unwrap();
    }

    // ── Resolution ──

    #[test]
    fn ministry_resolves_by_id_or_name() {
        let committee = test_committee();
        assert_eq!(resolve_ministry(&committee, "musica").unwrap().id, "musica");
        assert_eq!(
            resolve_ministry(&committee, "music ministry").unwrap().id,
            "musica"
        );
        assert!(resolve_ministry(&committee, "nothing").is_err());
    }

    #[test]
    fn candidate_resolves_by_id_prefix_or_name() {
        let mut committee = test_committee();
        voting_on_music(&mut committee);
        let alice = committee.candidates()[0].id;

        assert_eq!(resolve_candidate(&committee, "ALICE moore").unwrap(), alice);
        assert_eq!(
            resolve_candidate(&committee, &alice.to_string()).unwrap(),
            alice
        );
        assert_eq!(
            resolve_candidate(&committee, &alice.to_string()[..8]).unwrap(),
            alice
        );
        assert!(resolve_candidate(&committee, "carol").is_err());
    }

    #[test]
    fn shared_prefix_is_ambiguous() {
        let mut committee = test_committee();
        voting_on_music(&mut committee);
        let alice = committee.candidates()[0].id;
        let bob = committee.candidates()[1].id;
        let shared = alice
            .to_string()
            .chars()
            .zip(bob.to_string().chars())
            .take_while(|(a, b)| a == b)
            .count();
        // Ids that share no leading characters can't be ambiguous.
        if shared > 0 {
            let prefix = &alice.to_string()[..shared];
            let err = resolve_candidate(&committee, prefix).unwrap_err();
            assert!(err.contains("ambiguous"));
        }
    }

    #[test]
    fn blank_reference_matches_nobody() {
        let mut committee = test_committee();
        exec(&mut committee, &["select", "musica"]).unwrap();
        exec(&mut committee, &["next"]).unwrap();
        exec(&mut committee, &["candidate", "add", "Alice Moore"]).unwrap();
        exec(&mut committee, &["next"]).unwrap();
        let alice = committee.candidates()[0].id;

        assert!(resolve_candidate(&committee, "").is_err());
        assert!(resolve_candidate(&committee, "   ").is_err());
        assert!(exec(&mut committee, &["vote", ""]).is_err());
        assert!(exec(&mut committee, &["reset-votes", " "]).is_err());
        assert_eq!(committee.candidate(alice).unwrap().votes, 0);
    }

    // ── Validation before the core ──

    #[test]
    fn start_requires_church_and_selection() {
        let mut committee = test_committee();
        assert!(exec(&mut committee, &["start"]).is_err());

        exec(&mut committee, &["setup", "church", "Central Church"]).unwrap();
        assert!(exec(&mut committee, &["start"]).is_err());

        exec(&mut committee, &["setup", "toggle", "musica"]).unwrap();
        exec(&mut committee, &["start"]).unwrap();
        assert_eq!(committee.started_at(), Some(start()));
    }

    #[test]
    fn short_or_duplicate_names_are_refused() {
        let mut committee = test_committee();
        voting_on_music(&mut committee);
        exec(&mut committee, &["back"]).unwrap();

        assert!(exec(&mut committee, &["candidate", "add", "Al"]).is_err());
        assert!(exec(&mut committee, &["candidate", "add", " alice MOORE "]).is_err());
        assert_eq!(committee.candidates().len(), 2);
    }

    #[test]
    fn voting_needs_a_candidate() {
        let mut committee = test_committee();
        exec(&mut committee, &["select", "musica"]).unwrap();
        exec(&mut committee, &["next"]).unwrap();

        assert!(exec(&mut committee, &["next"]).is_err());
        assert_eq!(committee.stage(), Stage::Nomination);
    }

    #[test]
    fn finalize_needs_a_vote() {
        let mut committee = test_committee();
        voting_on_music(&mut committee);

        assert!(exec(&mut committee, &["finalize"]).is_err());
        exec(&mut committee, &["vote", "bob stone"]).unwrap();
        exec(&mut committee, &["finalize"]).unwrap();

        let result = committee.result_for("musica").unwrap();
        assert_eq!(result.winner.as_deref(), Some("Bob Stone"));
    }

    #[test]
    fn votes_need_the_voting_stage() {
        let mut committee = test_committee();
        exec(&mut committee, &["select", "musica"]).unwrap();
        assert!(exec(&mut committee, &["vote", "alice"]).is_err());
        assert!(exec(&mut committee, &["undo"]).is_err());
    }

    #[test]
    fn custom_ministry_rules() {
        let mut committee = test_committee();
        assert!(exec(&mut committee, &["setup", "add-custom", "Drama", "Plays", "--seats", "11"]).is_err());
        assert!(exec(&mut committee, &["setup", "add-custom", "Drama", " "]).is_err());
        exec(&mut committee, &["setup", "add-custom", "Drama", "Plays", "--seats", "2"]).unwrap();

        let id = committee.custom_ministries()[0].id.clone();
        assert_eq!(committee.seat_count(&id), 2);
        exec(&mut committee, &["setup", "remove-custom", "drama"]).unwrap();
        assert!(committee.custom_ministries().is_empty());
        assert!(exec(&mut committee, &["setup", "remove-custom", "musica"]).is_err());
    }

    #[test]
    fn seats_only_for_configurable_panels() {
        let mut committee = test_committee();
        exec(&mut committee, &["setup", "seats", "anciao", "7"]).unwrap();
        assert_eq!(committee.seat_count("anciao"), 7);
        assert!(exec(&mut committee, &["setup", "seats", "musica", "3"]).is_err());
        assert!(exec(&mut committee, &["setup", "seats", "anciao", "0"]).is_err());
    }

    #[test]
    fn reset_needs_confirmation() {
        let mut committee = test_committee();
        exec(&mut committee, &["setup", "church", "Central Church"]).unwrap();

        assert!(exec(&mut committee, &["reset"]).is_err());
        assert_eq!(committee.church_name(), "Central Church");

        exec(&mut committee, &["reset", "--yes"]).unwrap();
        assert_eq!(committee.church_name(), "");
    }

    #[test]
    fn reopen_needs_a_result() {
        let mut committee = test_committee();
        assert!(exec(&mut committee, &["reopen", "musica"]).is_err());

        exec(&mut committee, &["select", "musica"]).unwrap();
        exec(&mut committee, &["close-empty"]).unwrap();
        exec(&mut committee, &["reopen", "musica"]).unwrap();

        assert!(committee.result_for("musica").is_none());
        assert_eq!(committee.active_ministry_id(), Some("musica"));
    }

    #[test]
    fn full_sitting() {
        let mut committee = test_committee();
        exec(&mut committee, &["setup", "church", "Central Church"]).unwrap();
        exec(&mut committee, &["setup", "toggle", "musica"]).unwrap();
        exec(&mut committee, &["start"]).unwrap();
        voting_on_music(&mut committee);
        exec(&mut committee, &["vote", "alice moore"]).unwrap();
        exec(&mut committee, &["vote", "alice moore"]).unwrap();
        exec(&mut committee, &["undo"]).unwrap();
        exec(&mut committee, &["finalize"]).unwrap();
        exec(&mut committee, &["report"]).unwrap();
        exec(&mut committee, &["close"]).unwrap();

        assert_eq!(committee.completion_percentage(), 100);
        assert!(committee.is_closed());
        assert_eq!(committee.notifier().sent.borrow().len(), 1);
        assert!(exec(&mut committee, &["select", "musica"]).is_err());
    }
}
